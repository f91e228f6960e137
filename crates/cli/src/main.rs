mod config;
mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use conformance::{
    CAPABILITY_VECTORS_DIR, Harness, JsonSchemaValidator, POLICY_DOCUMENTS_DIR, Report,
    discover_root,
};
use policy::{CapabilityRequest, Decision, Policy};
use tracing_subscriber::EnvFilter;

use config::Config;
use error::{Error, Result};

const LOG_ENV: &str = "CAPGATE_LOG";

/// Process exit code for a denied request, a dirty lint or failing vectors.
const EXIT_DENIED: i32 = 2;

#[derive(Parser)]
#[command(name = "capgate")]
#[command(about = "Capability decisions against a policy ceiling", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: capgate.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `policy=debug`
    #[arg(long, global = true)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decide a single capability request
    Check {
        /// Policy document (json, yaml or toml)
        #[arg(short, long)]
        policy: Option<PathBuf>,
        /// Capability kind, e.g. fs.read
        #[arg(short, long)]
        kind: String,
        /// Requested value, e.g. a path or URI
        #[arg(short, long)]
        value: String,
        /// Print the denial reason
        #[arg(long)]
        explain: bool,
    },
    /// Report ceiling entries that can never match
    Lint {
        /// Policy document (json, yaml or toml)
        #[arg(short, long)]
        policy: Option<PathBuf>,
    },
    /// Run capability-eval vectors and policy schema documents
    Conformance {
        /// Vector directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Policy document directory holding valid/ and invalid/
        #[arg(long)]
        policies: Option<PathBuf>,
    },
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref())?;
    init_logging(cli.log.as_deref(), &config);

    match cli.command {
        Commands::Check {
            policy,
            kind,
            value,
            explain,
        } => cmd_check(&config, policy.as_deref(), &kind, value, explain),
        Commands::Lint { policy } => cmd_lint(&config, policy.as_deref()),
        Commands::Conformance { dir, policies } => cmd_conformance(&config, dir, policies),
    }
}

fn init_logging(flag: Option<&str>, config: &Config) {
    let directive = flag
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .unwrap_or_else(|| config.log.filter.clone());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("Warning: invalid log filter {directive:?}: {e}");
        EnvFilter::new("warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_check(
    config: &Config,
    policy_path: Option<&Path>,
    kind: &str,
    value: String,
    explain: bool,
) -> Result<i32> {
    let policy = load_policy(config, policy_path)?;

    let decision = match CapabilityRequest::parse(kind, value) {
        Ok(request) => Some(policy.check(&request)),
        Err(e) => {
            tracing::debug!("{e}");
            None
        }
    };

    match decision {
        Some(Decision::Allow) => {
            println!("allow");
            return Ok(0);
        }
        Some(deny @ Decision::Deny { .. }) if explain => println!("{deny}"),
        None if explain => println!("deny (unknown capability kind)"),
        _ => println!("deny"),
    }
    Ok(EXIT_DENIED)
}

fn cmd_lint(config: &Config, policy_path: Option<&Path>) -> Result<i32> {
    let policy = load_policy(config, policy_path)?;
    let findings = policy::lint(&policy);

    if findings.is_empty() {
        println!("OK no findings");
        return Ok(0);
    }
    for finding in &findings {
        println!("{finding}");
    }
    println!("{} finding(s)", findings.len());
    Ok(EXIT_DENIED)
}

fn cmd_conformance(
    config: &Config,
    dir: Option<PathBuf>,
    policies: Option<PathBuf>,
) -> Result<i32> {
    let dir = dir.or_else(|| config.conformance.vectors.clone());
    let policies = policies.or_else(|| config.conformance.policies.clone());
    let (dir, policies) = match (dir, policies) {
        (Some(dir), Some(policies)) => (dir, policies),
        (dir, policies) => {
            let root = discover_root(".")?;
            (
                dir.unwrap_or_else(|| root.join(CAPABILITY_VECTORS_DIR)),
                policies.unwrap_or_else(|| root.join(POLICY_DOCUMENTS_DIR)),
            )
        }
    };

    let harness = Harness::new(JsonSchemaValidator::bundled()?);
    let mut report = Report::default();
    harness.run_vectors(&dir, &mut report)?;
    harness.run_policy_documents(&policies, &mut report)?;

    if report.is_success() {
        println!("OK conformance checks={}", report.checks());
        return Ok(0);
    }
    for failure in &report.failures {
        println!("{failure}");
    }
    for failure in &report.document_failures {
        println!("{failure}");
    }
    println!(
        "FAILED conformance failures={} checks={}",
        report.failures.len() + report.document_failures.len(),
        report.checks()
    );
    Ok(EXIT_DENIED)
}

fn load_policy(config: &Config, explicit: Option<&Path>) -> Result<Policy> {
    let path = explicit
        .or(config.policy.as_deref())
        .ok_or(Error::MissingPolicy)?;
    let policy = conformance::load_policy(path, &JsonSchemaValidator::bundled()?)?;
    for finding in policy::lint(&policy) {
        tracing::warn!("{finding}");
    }
    Ok(policy)
}
