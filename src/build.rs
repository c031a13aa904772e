//! The build: wipe the output directory, then produce every manifest entry.
//!
//! Entries are processed in manifest order and every error is fatal; files
//! written before the failure stay in place.
//!
//! ```rust,no_run
//! use raydor::build::SiteBuilder;
//! use raydor::manifest::Manifest;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let manifest = Manifest::load(Path::new("site/site.yaml"))?;
//! let summary = SiteBuilder::new(&manifest, "output").build(&mut std::io::stdout())?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

use anyhow::Result;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::RaydorError;
use crate::data::Loader;
use crate::generator::expand_generator;
use crate::manifest::{Manifest, ManifestEntry};
use crate::render::{RenderDispatcher, RenderEntry};
use crate::utils::recreate_dir;

/// Counts of what a build produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Manifest entries processed.
    pub entries: usize,
    /// Files rendered from direct entries.
    pub rendered: usize,
    /// Files rendered from generator entries.
    pub generated: usize,
    /// Copy entries (files or directories) copied.
    pub copied: usize,
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Built {} entries: {} rendered, {} generated, {} copied",
            self.entries, self.rendered, self.generated, self.copied
        )
    }
}

/// Builds a site from a loaded manifest.
pub struct SiteBuilder<'a> {
    manifest: &'a Manifest,
    output_dir: PathBuf,
}

impl<'a> SiteBuilder<'a> {
    /// Create a builder writing to `output_dir`.
    pub fn new(manifest: &'a Manifest, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            output_dir: output_dir.into(),
        }
    }

    /// Run the build, writing `<output>.. done` progress lines to `progress`.
    ///
    /// # Errors
    ///
    /// Fails on the first entry that cannot be produced, or when the output
    /// directory would contain the site itself.
    pub fn build<W: Write>(&self, progress: &mut W) -> Result<BuildSummary> {
        let config = &self.manifest.config;
        self.check_output_dir()?;

        info!(
            "Building {} into {}",
            self.manifest.path.display(),
            self.output_dir.display()
        );
        recreate_dir(&self.output_dir)?;

        let loader = Loader::new(config.root.clone(), config.markdown.clone());
        let mut dispatcher = RenderDispatcher::new(config, self.output_dir.clone());
        let mut summary = BuildSummary::default();

        for entry in &self.manifest.entries {
            write!(progress, "{}.. ", entry.output())?;
            progress.flush()?;

            match entry {
                ManifestEntry::Copy {
                    output,
                    source,
                } => {
                    dispatcher.copy(source, output)?;
                    summary.copied += 1;
                }
                ManifestEntry::Render {
                    output,
                    template,
                    vars,
                } => {
                    let render = RenderEntry::direct(output, template, vars.as_ref(), config)?;
                    dispatcher.render(&render)?;
                    summary.rendered += 1;
                }
                ManifestEntry::Generator(spec) => {
                    let renders = expand_generator(spec, &loader, config)?;
                    for render in &renders {
                        debug!("Generating {}", render.output);
                        dispatcher.render(render)?;
                    }
                    summary.generated += renders.len();
                }
            }

            writeln!(progress, "done")?;
            summary.entries += 1;
        }

        info!("{summary}");
        Ok(summary)
    }

    /// Refuse to wipe a directory that holds the site sources.
    fn check_output_dir(&self) -> Result<()> {
        let Ok(output) = self.output_dir.canonicalize() else {
            // Does not exist yet, nothing to wipe.
            return Ok(());
        };
        let root = canonical_or_self(&self.manifest.config.root);

        if root.starts_with(&output) {
            return Err(RaydorError::Other {
                message: format!(
                    "Refusing to use {} as output directory: it contains the site at {}",
                    self.output_dir.display(),
                    self.manifest.config.root.display()
                ),
            }
            .into());
        }
        Ok(())
    }
}

fn canonical_or_self(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
