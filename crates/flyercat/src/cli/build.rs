//! The `flyercat build` command: catalog an image folder.

use clap::{Args, ValueEnum};
use flyercat_core::{CatalogLayout, Config, EntryUrl, FlyerCatalog, RunReport};
use std::path::PathBuf;

/// Arguments for the `build` command.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory containing the images
    #[arg(required = true)]
    pub input: PathBuf,

    /// Collection URL recorded in the summary
    #[arg(short, long, env = "FLYERCAT_URL", default_value = "")]
    pub url: String,

    /// Entries per concurrent worker (defaults to batch.batch_size)
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Directory to write the documents into
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Split documents or one combined document
    #[arg(long, value_enum)]
    pub layout: Option<Layout>,

    /// What each entry's url holds
    #[arg(long, value_enum)]
    pub entry_url: Option<UrlMode>,

    /// Embed each image as a base64 data URI
    #[arg(long)]
    pub embed_images: bool,

    /// Per-file inspection deadline in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Maximum number of batches running at once
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Also print the documents to stdout
    #[arg(long)]
    pub echo: bool,
}

/// Output layout.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Layout {
    /// flyers.json + imagesMetadata.json
    Split,
    /// A single output.json
    Combined,
}

impl From<Layout> for CatalogLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Split => CatalogLayout::Split,
            Layout::Combined => CatalogLayout::Combined,
        }
    }
}

/// Entry url mode.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum UrlMode {
    /// Forward-slash file path
    Path,
    /// Collection URL joined with the file name
    Collection,
}

impl From<UrlMode> for EntryUrl {
    fn from(mode: UrlMode) -> Self {
        match mode {
            UrlMode::Path => EntryUrl::Path,
            UrlMode::Collection => EntryUrl::Collection,
        }
    }
}

impl BuildArgs {
    /// Layer command-line overrides on top of the loaded config.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(batch_size) = self.batch_size {
            config.batch.batch_size = batch_size;
        }
        if let Some(max) = self.max_concurrent {
            config.batch.max_concurrent_batches = Some(max);
        }
        if let Some(dir) = &self.out_dir {
            config.output.dir = dir.clone();
        }
        if let Some(layout) = self.layout {
            config.output.layout = layout.into();
        }
        if let Some(mode) = self.entry_url {
            config.output.entry_url = mode.into();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.limits.inspect_timeout_ms = timeout_ms;
        }
        config.output.embed_image_data |= self.embed_images;
        config.output.echo |= self.echo;
        config
    }
}

/// Execute the build command.
pub async fn execute(args: BuildArgs, config: Config) -> anyhow::Result<()> {
    let config = args.apply(config);
    let batch_size = config.batch.batch_size;
    let echo = config.output.echo;
    let catalog = FlyerCatalog::new(config)?;

    let report = catalog
        .read_and_forward(&args.input, &args.url, batch_size)
        .await?;

    if echo {
        for artifact in &report.artifacts {
            println!("{}", artifact.as_str());
        }
    }

    for skipped in &report.skipped {
        tracing::debug!("Skipped {:?}: {}", skipped.path, skipped.reason);
    }

    print_summary(&report);
    Ok(())
}

/// Print a formatted summary table after a run.
fn print_summary(report: &RunReport) {
    let succeeded = report.catalog.metadata.total_flyers;
    let skipped = report.skipped.len();
    let secs = report.elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        succeeded as f64 / secs
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Catalogued:   {:>8}", succeeded);
    if skipped > 0 {
        eprintln!("    Skipped:      {:>8}", skipped);
    }
    eprintln!("    Batches:      {:>8}", report.batches);
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", secs);
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    for artifact in &report.artifacts {
        eprintln!("    Wrote:        {}", artifact.path.display());
    }
    eprintln!("  ====================================");
}
