//! Segment-boundary prefix matching.

/// Whether `candidate` is `prefix` itself or lies underneath it.
///
/// Both arguments are expected in canonical form. Matching only happens at
/// `/` boundaries, so `/data` covers `/data/a.txt` but not `/data2/a.txt`.
pub fn within_prefix(candidate: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return candidate.starts_with('/');
    }
    match candidate.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_covers_every_absolute_path() {
        assert!(within_prefix("/", "/"));
        assert!(within_prefix("/etc/passwd", "/"));
        assert!(!within_prefix("relative", "/"));
    }

    #[test]
    fn test_exact_match() {
        assert!(within_prefix("/data", "/data"));
    }

    #[test]
    fn test_nested_match() {
        assert!(within_prefix("/data/a.txt", "/data"));
        assert!(within_prefix("/data/x/y/z", "/data/x"));
    }

    #[test]
    fn test_segment_boundary() {
        assert!(!within_prefix("/data2/a.txt", "/data"));
        assert!(!within_prefix("/database", "/data"));
        assert!(!within_prefix("/dat", "/data"));
        assert!(!within_prefix("/data", "/data/a"));
    }
}
