//! Network URI canonicalization and prefix containment.

use crate::path::{CanonicalPath, has_encoding_hazard, normalize_guarded_path};
use url::Url;

/// An absolute URI with an authority and a canonical path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetUri {
    url: Url,
    path: CanonicalPath,
}

impl NetUri {
    /// Parse and canonicalize a URI.
    ///
    /// The raw path text is inspected before the parser gets to it, since
    /// the parser resolves dot segments and rewrites backslashes on its own.
    /// Backslashes, `%XX` triplets and `..` segments are rejected. So are
    /// tab, CR and LF anywhere (the parser strips them silently) and any
    /// input not spelled `scheme://authority`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.contains(['\t', '\n', '\r']) {
            return None;
        }
        let (before_query, _) = split_query_fragment(raw);
        if before_query.contains('\\') {
            return None;
        }
        let path = raw_path(before_query)?;
        if has_encoding_hazard(path) || path.split('/').any(|segment| segment == "..") {
            return None;
        }

        let url = Url::parse(raw).ok()?;
        if !url.has_authority() {
            return None;
        }
        let path = match url.path() {
            "" => normalize_guarded_path("/")?,
            p => normalize_guarded_path(p)?,
        };
        Some(Self { url, path })
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &CanonicalPath {
        &self.path
    }

    /// Whether this (requested) URI falls under `allowed`.
    ///
    /// Scheme, host, effective port and credentials must match exactly. A
    /// requested fragment, or a query or fragment on the allowed entry, is
    /// never a match.
    pub fn within(&self, allowed: &NetUri) -> bool {
        let (req, allow) = (&self.url, &allowed.url);
        if req.scheme() != allow.scheme()
            || req.host_str() != allow.host_str()
            || req.port_or_known_default() != allow.port_or_known_default()
            || req.username() != allow.username()
            || req.password() != allow.password()
        {
            return false;
        }
        if req.fragment().is_some() || allow.query().is_some() || allow.fragment().is_some() {
            return false;
        }
        allowed.path.contains(&self.path)
    }
}

/// Whether the `requested` URI lies under the `allowed` URI prefix.
///
/// Either side failing to canonicalize is a non-match.
pub fn net_within_prefix(requested: &str, allowed: &str) -> bool {
    match (NetUri::parse(requested), NetUri::parse(allowed)) {
        (Some(requested), Some(allowed)) => requested.within(&allowed),
        _ => false,
    }
}

fn split_query_fragment(raw: &str) -> (&str, &str) {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    raw.split_at(end)
}

/// The path portion of `scheme://authority/path`, `""` when the path is
/// empty, or `None` when the input does not start with `scheme://`.
fn raw_path(before_query: &str) -> Option<&str> {
    let (scheme, rest) = before_query.split_once("://")?;
    if !is_scheme(scheme) {
        return None;
    }
    Some(match rest.find('/') {
        Some(start) => &rest[start..],
        None => "",
    })
}

/// RFC 3986 `scheme`: a letter followed by letters, digits, `+`, `-` or `.`.
fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
