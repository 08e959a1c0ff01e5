//! DNS propagation checker CLI
//!
//! Resolves each domain's canonical records, then asks every configured
//! regional resolver for the domain's A record and reports which agree.
//! Results go to stdout; logs go to stderr.

mod render;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dns_propagation_core::{
    CheckerOptions, PropagationService, RegionTable, DEFAULT_QUERY_TIMEOUT_SECS,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable report
    Text,
    /// One pretty-printed JSON document per domain
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "dns-propagation")]
#[command(version)]
#[command(about = "Check how a domain resolves from public resolvers around the world")]
struct Cli {
    /// Domains to check
    #[arg(required = true)]
    domains: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// JSON file with the region table (defaults to the built-in table)
    #[arg(short, long)]
    regions: Option<PathBuf>,

    /// Per-query timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_QUERY_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Default log level (RUST_LOG overrides)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs to stderr so stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(log_filter(
            cli.log_level,
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .init();

    colored::control::set_override(std::io::stdout().is_terminal());

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

/// Filter from `RUST_LOG`-style directives, falling back to `default_level`
/// when none are given.
fn log_filter(default_level: tracing::Level, directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(directives.unwrap_or_default())
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let regions = match &cli.regions {
        Some(path) => load_regions(path)?,
        None => RegionTable::reference(),
    };
    let options = CheckerOptions::with_timeout_secs(cli.timeout_secs)
        .context("Invalid --timeout-secs")?;

    tracing::info!(
        "Checking {} domain(s) against {} regions (timeout {}s)",
        cli.domains.len(),
        regions.len(),
        cli.timeout_secs
    );

    let service = PropagationService::with_config(regions, options);
    for domain in &cli.domains {
        let result = service.check_domain(domain).await;
        match cli.format {
            OutputFormat::Text => println!("{}", render::render_text(&result)),
            OutputFormat::Json => println!(
                "{}",
                render::render_json(&result).context("Failed to serialize result")?
            ),
        }
    }

    Ok(())
}

fn load_regions(path: &Path) -> anyhow::Result<RegionTable> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read region file {}", path.display()))?;
    let regions = RegionTable::from_json(&json)
        .with_context(|| format!("Invalid region file {}", path.display()))?;
    tracing::debug!("Loaded {} regions from {}", regions.len(), path.display());
    Ok(regions)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    const SAMPLE_REGIONS: &str = include_str!("../regions.json");

    #[test]
    fn test_sample_regions_file_matches_reference() {
        assert_eq!(
            RegionTable::from_json(SAMPLE_REGIONS).unwrap(),
            RegionTable::reference()
        );
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["dns-propagation", "example.com"]).unwrap();
        assert_eq!(cli.domains, ["example.com"]);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.regions.is_none());
        assert_eq!(cli.timeout_secs, DEFAULT_QUERY_TIMEOUT_SECS);
        assert_eq!(cli.log_level, tracing::Level::WARN);
    }

    #[test]
    fn test_cli_all_options() {
        let cli = Cli::try_parse_from([
            "dns-propagation",
            "example.com",
            "example.org",
            "--format",
            "json",
            "--regions",
            "regions.json",
            "--timeout-secs",
            "2",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.domains.len(), 2);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.regions, Some(PathBuf::from("regions.json")));
        assert_eq!(cli.timeout_secs, 2);
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
    }

    #[test]
    fn test_cli_requires_domain() {
        assert!(Cli::try_parse_from(["dns-propagation"]).is_err());
    }

    #[tokio::test]
    async fn test_zero_timeout_is_rejected() {
        let cli = Cli::try_parse_from(["dns-propagation", "example.com", "-t", "0"]).unwrap();
        assert!(run(&cli).await.is_err());
    }

    // ==================== logging tests ====================

    #[test]
    fn test_log_filter_defaults_to_cli_level() {
        let filter = log_filter(tracing::Level::WARN, None);
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));

        let filter = log_filter(tracing::Level::DEBUG, Some(""));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_log_filter_env_overrides_cli_level() {
        let filter = log_filter(tracing::Level::WARN, Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = log_filter(tracing::Level::WARN, Some("error"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn test_load_regions_missing_file() {
        let err = load_regions(Path::new("/nonexistent/regions.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read region file"));
    }
}
