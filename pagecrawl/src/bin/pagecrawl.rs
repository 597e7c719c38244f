//! Command-line crawler.
//!
//! Prints one JSON array of per-URL outcomes to stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use pagecrawl::observability::init_tracing;
use pagecrawl::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "pagecrawl")]
#[command(about = "Fetch pages, extract their readable content and print it as chunks")]
struct Args {
    /// Maximum characters per chunk (defaults to the configured size)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// JSON file of extra site profiles, keyed by domain
    #[arg(long)]
    profiles: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Pages to crawl
    #[arg(required = true)]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    let profiles = ProfileRegistry::builtin();
    if let Some(path) = &args.profiles {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profiles from {}", path.display()))?;
        let count = profiles
            .load_json(&json)
            .with_context(|| format!("Failed to parse profiles in {}", path.display()))?;
        tracing::info!(count, path = %path.display(), "loaded site profiles");
    }

    let crawler = PageCrawler::new(CrawlConfig::default())
        .context("Failed to build HTTP client")?
        .with_profiles(Arc::new(profiles))
        .with_observer(Arc::new(LoggingCrawlObserver::default()));

    let outcomes = crawler.crawl_many(&args.urls, args.chunk_size).await;
    let json = serde_json::Value::Array(outcomes.iter().map(CrawlOutcome::to_json).collect());
    println!("{}", serde_json::to_string_pretty(&json)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn args(list: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("pagecrawl").chain(list.iter().copied()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&[
            "--chunk-size",
            "500",
            "--profiles",
            "sites.json",
            "--json-logs",
            "https://a.test/",
            "https://b.test/",
        ])
        .unwrap();

        assert_eq!(parsed.chunk_size, Some(500));
        assert_eq!(parsed.profiles, Some(PathBuf::from("sites.json")));
        assert!(parsed.json_logs);
        assert_eq!(parsed.urls, vec!["https://a.test/", "https://b.test/"]);
    }

    #[test]
    fn test_parse_args_defaults() {
        let parsed = args(&["https://a.test/"]).unwrap();
        assert_eq!(parsed.chunk_size, None);
        assert_eq!(parsed.profiles, None);
        assert!(!parsed.json_logs);
    }

    #[test]
    fn test_parse_args_errors() {
        assert_eq!(
            args(&[]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
        assert!(args(&["--chunk-size"]).is_err());
        assert_eq!(
            args(&["--chunk-size", "lots", "https://a.test/"]).unwrap_err().kind(),
            ErrorKind::ValueValidation
        );
        assert_eq!(
            args(&["--verbose", "https://a.test/"]).unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
    }
}
