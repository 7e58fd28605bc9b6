//! Repostats - per-language line statistics for GitHub repos
//!
//! A CLI tool that combines repository metadata from the GitHub API with
//! per-language line counts from either a remote counting API or a local
//! scc run, and emits a combined JSON or Markdown report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (metadata fetch, config, argument failure)
//!   2 - Degraded result with --strict set

mod analysis;
mod cli;
mod config;
mod error;
mod github;
mod models;
mod repo;
mod report;
mod stats;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use error::ProviderError;
use futures::future::join;
use models::{AnalysisMethod, RawStats, RepositoryKey, RepositoryResult};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Repostats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .repostats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".repostats.toml");

    if path.exists() {
        eprintln!("⚠️  .repostats.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .repostats.toml")?;

    println!("✅ Created .repostats.toml with default settings.");
    println!("   Edit it to customize API endpoints, the scc binary, and excludes.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis workflow. Returns exit code (0 or 2).
async fn run(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let key = resolve_repository_key(&args)?;
    let method = AnalysisMethod::from(args.method);

    if !args.quiet {
        eprintln!("🔎 Analyzing repository: {} ({})", key.full_name(), method);
    }

    let github = github::GithubClient::new(
        &config.github.api_url,
        config.github.token.clone(),
        config.github.timeout_seconds,
    )?;

    // Metadata and statistics come from independent providers.
    let (metadata, raw_stats) = join(
        github.fetch_repository(&key),
        fetch_stats(&key, method, &args, &config),
    )
    .await;

    // Metadata failure is fatal; statistics failure degrades the result.
    let metadata = metadata
        .with_context(|| format!("Failed to fetch metadata for {}", key.full_name()))?;

    let result = match raw_stats {
        Ok(raw) => analysis::aggregate(&key, metadata, &raw, method),
        Err(e) => {
            warn!("Statistics unavailable for {}: {}", key.full_name(), e);
            analysis::degraded(
                &key,
                metadata,
                method,
                format!("statistics unavailable: {}", e),
            )
        }
    };

    // Render and write the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&result)?,
        OutputFormat::Markdown => report::generate_markdown_report(&result),
    };

    let output_path = args
        .output
        .clone()
        .or_else(|| config.general.output.as_ref().map(PathBuf::from));

    match output_path {
        Some(path) => {
            std::fs::write(&path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✅ Report saved to: {}", path.display());
            print_summary(&result);
        }
        None => {
            println!("{}", output);
            if let Some(ref e) = result.error {
                eprintln!("⚠️  Partial result: {}", e);
            }
        }
    }

    if config.general.strict && result.is_degraded() {
        eprintln!("\n⛔ Result is degraded and --strict is set. Failing (exit code 2).");
        return Ok(2);
    }

    Ok(0)
}

/// Obtain raw statistics via the selected provider.
async fn fetch_stats(
    key: &RepositoryKey,
    method: AnalysisMethod,
    args: &Args,
    config: &Config,
) -> Result<Vec<RawStats>, ProviderError> {
    match method {
        AnalysisMethod::CountlocApi => {
            let client = stats::CountlocClient::new(
                &config.countloc.api_url,
                config.countloc.timeout_seconds,
            )?;
            client.fetch_stats(key).await
        }
        AnalysisMethod::SccLocal => {
            let runner =
                stats::SccRunner::new(config.scc.binary.clone(), config.scc.excludes.clone());

            if let Some(ref local) = args.local {
                info!("Using local directory: {}", local.display());
                return runner.run(local).await;
            }

            let url = repo::https_url(key);
            let options = repo::CloneOptions {
                branch: args.branch.clone(),
                depth: Some(1), // Shallow clone
                show_progress: !args.quiet,
            };

            // git2 clones synchronously; keep it off the async workers.
            let clone = tokio::task::spawn_blocking(move || repo::clone_repository(&url, options))
                .await
                .map_err(|e| ProviderError::Tool(format!("clone task failed: {}", e)))?
                .map_err(|e| ProviderError::Tool(format!("{:#}", e)))?;

            runner.run(clone.path()).await
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .repostats.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Resolve the repository key from the CLI reference.
fn resolve_repository_key(args: &Args) -> Result<RepositoryKey> {
    let raw = args.repo_ref();
    repo::parse_repo_ref(raw)
        .with_context(|| format!("Unrecognized repository reference: '{}'", raw))
}

/// Print a short console summary after writing the report to a file.
fn print_summary(result: &RepositoryResult) {
    println!("\n📊 Analysis Summary:");
    println!("   Repository: {}", result.repository);
    println!(
        "   ⭐ Stars: {} | 🍴 Forks: {} | 👀 Watchers: {}",
        result.metadata.n_stars, result.metadata.n_forks, result.metadata.n_watchers
    );
    println!("   Languages: {}", result.languages.len());
    println!(
        "   Total: {} lines across {} files",
        result.total_lines, result.total_files
    );
    println!("   Method: {}", result.analysis_method);
    if let Some(ref e) = result.error {
        println!("   ⚠️  Degraded: {}", e);
    }
}
