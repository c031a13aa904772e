//! Command-line interface for raydor.
//!
//! ```bash
//! raydor site.yaml                 # build into ./output
//! raydor site.yaml -o public       # build into ./public
//! raydor --verbose site.yaml       # debug logging on stderr
//! RUST_LOG=raydor=trace raydor site.yaml
//! ```
//!
//! Progress (`<output>.. done`) and the final summary go to stdout; logs and
//! errors go to stderr. The output directory is deleted and recreated on every
//! run.

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::build::SiteBuilder;
use crate::manifest::Manifest;

/// Logging filter used when neither a flag nor `RUST_LOG` says otherwise.
pub const DEFAULT_LOG_FILTER: &str = "raydor=warn";

/// Runtime settings derived from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Explicit log filter; `None` defers to `RUST_LOG` or the default.
    pub log_level: Option<String>,
    /// Disable logging entirely.
    pub quiet: bool,
}

impl CliConfig {
    /// The tracing filter for this configuration, or `None` for no logging.
    #[must_use]
    pub fn filter(&self) -> Option<EnvFilter> {
        if self.quiet {
            return None;
        }
        let filter = match &self.log_level {
            Some(level) => EnvFilter::new(level),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        };
        Some(filter)
    }
}

/// Build a static site from a manifest.
#[derive(Parser, Debug)]
#[command(
    name = "raydor",
    about = "Build a static site from a manifest of templates, data and files",
    version,
    long_about = "raydor reads a YAML or JSON manifest mapping output paths to templates, \
                  data files and copy sources, and writes the rendered site to an output directory."
)]
pub struct Cli {
    /// Manifest file (`.yaml`, `.yml` or `.json`); its directory is the site root.
    manifest: PathBuf,

    /// Output directory, deleted and recreated on each build.
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Enable debug logging.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable logging; errors are still reported.
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Settings implied by the parsed flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        CliConfig {
            log_level: self.verbose.then(|| "raydor=debug".to_string()),
            quiet: self.quiet,
        }
    }

    /// Initialize logging and run the build.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        init_logging(&config);
        self.execute_with_config(&config)
    }

    /// Run the build without touching global logging state.
    pub fn execute_with_config(self, config: &CliConfig) -> Result<()> {
        debug!("Running with {config:?}");
        let manifest = Manifest::load(&self.manifest)?;

        let stdout = io::stdout();
        let mut progress = stdout.lock();
        let summary = SiteBuilder::new(&manifest, &self.output).build(&mut progress)?;
        writeln!(progress, "{summary}")?;
        Ok(())
    }
}

/// Install the global tracing subscriber, writing to stderr.
pub fn init_logging(config: &CliConfig) {
    let Some(filter) = config.filter() else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
