//! flyercat CLI - batch image metadata extraction into JSON flyer catalogs.
//!
//! flyercat inspects every image in a folder concurrently and writes a
//! catalog of entries (dimensions, format, orientation) plus a summary
//! document.
//!
//! # Usage
//!
//! ```bash
//! # Catalog a folder into ./flyers.json and ./imagesMetadata.json
//! flyercat build ./images --url https://cdn.example.com/fliers
//!
//! # One combined document with embedded images
//! flyercat build ./images --layout combined --embed-images -o ./out
//!
//! # View configuration
//! flyercat config show
//! ```

use clap::{Parser, Subcommand};
use std::time::Duration;

mod cli;
mod logging;

/// flyercat - batch image metadata extraction into JSON flyer catalogs.
#[derive(Parser, Debug)]
#[command(name = "flyercat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Catalog an image folder into JSON documents
    Build(cli::build::BuildArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

/// How long shutdown waits for blocking reads that are still running.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run(cli));
    shutdown(runtime);
    result
}

/// Stop the runtime without joining inspections that outlived their deadline.
///
/// Dropping a runtime waits for every blocking task, so a read stuck on a
/// FIFO or a dead network mount would keep the process alive forever.
fn shutdown(runtime: tokio::runtime::Runtime) {
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match flyercat_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `flyercat config path`."
            );
            flyercat_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("flyercat v{}", flyercat_core::VERSION);

    match cli.command {
        Commands::Build(args) => cli::build::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_build_flags() {
        let parsed = Cli::try_parse_from([
            "flyercat",
            "build",
            "images",
            "--batch-size",
            "3",
            "--layout",
            "combined",
            "--entry-url",
            "collection",
            "--embed-images",
        ])
        .unwrap();
        match parsed.command {
            Commands::Build(args) => {
                assert_eq!(args.batch_size, Some(3));
                assert!(matches!(args.layout, Some(cli::build::Layout::Combined)));
                assert!(matches!(
                    args.entry_url,
                    Some(cli::build::UrlMode::Collection)
                ));
                assert!(args.embed_images);
            }
            Commands::Config(_) => panic!("expected build"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn shutdown_returns_while_a_read_is_stuck() {
        let dir = tempfile::tempdir().unwrap();
        let fifo = dir.path().join("stuck.png");
        let status = std::process::Command::new("mkfifo")
            .arg(&fifo)
            .status()
            .unwrap();
        assert!(status.success());

        let mut config = flyercat_core::Config::default();
        config.limits.inspect_timeout_ms = 100;
        let catalog = flyercat_core::FlyerCatalog::new(config).unwrap();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let report = runtime
            .block_on(catalog.build_catalog(dir.path(), "", 1))
            .unwrap();
        assert!(report.catalog.flyers.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(report.skipped[0].reason.contains("timed out"));

        // Nothing ever opens the FIFO for writing, so the read never returns
        let started = std::time::Instant::now();
        shutdown(runtime);
        assert!(started.elapsed() < SHUTDOWN_GRACE + Duration::from_secs(4));
    }
}
