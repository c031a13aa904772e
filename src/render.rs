//! Rendering entries and writing them to the output tree.
//!
//! A [`RenderEntry`] is fully resolved: a concrete output path, a template
//! identifier and the final variable mapping. The [`RenderDispatcher`] owns
//! the template renderer and the output directory and turns entries (and copy
//! entries) into files.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::SiteConfig;
use crate::core::RaydorError;
use crate::data::{Map, Value};
use crate::generator::into_map;
use crate::templating::TemplateRenderer;
use crate::utils::{copy_path, write_file};

/// One file to render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderEntry {
    /// Path relative to the output directory.
    pub output: String,
    /// Template identifier, relative to the site root.
    pub template: String,
    /// Final template variables.
    pub vars: Map,
}

impl RenderEntry {
    /// Build the entry for a direct render from its manifest `vars`.
    ///
    /// `vars` were expanded when the manifest was loaded; a single data path
    /// has become the loaded document, which must be a mapping. Globals are
    /// merged last.
    ///
    /// # Errors
    ///
    /// [`RaydorError::InvalidVariables`](crate::core::RaydorError::InvalidVariables)
    /// when `vars` are not a mapping.
    pub fn direct(
        output: &str,
        template: &str,
        vars: Option<&Value>,
        config: &SiteConfig,
    ) -> Result<Self, RaydorError> {
        let mut vars = match vars {
            Some(vars) => into_map(vars.clone(), output)?,
            None => Map::new(),
        };
        config.merge_globals(&mut vars);

        Ok(Self {
            output: output.to_string(),
            template: template.to_string(),
            vars,
        })
    }
}

/// Renders entries and copies sources into the output directory.
pub struct RenderDispatcher {
    renderer: TemplateRenderer,
    root: PathBuf,
    output_dir: PathBuf,
}

impl RenderDispatcher {
    /// Create a dispatcher writing below `output_dir`.
    pub fn new(config: &SiteConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer: TemplateRenderer::new(config.root.clone(), config.markdown.clone()),
            root: config.root.clone(),
            output_dir: output_dir.into(),
        }
    }

    /// The directory outputs are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render `entry` and write it, creating parent directories.
    pub fn render(&mut self, entry: &RenderEntry) -> Result<PathBuf> {
        let html = self
            .renderer
            .render(&entry.template, &entry.vars)
            .with_context(|| format!("Failed to render {}", entry.output))?;

        let target = self.output_dir.join(&entry.output);
        write_file(&target, html.as_bytes())?;
        debug!("Rendered {} -> {}", entry.template, target.display());
        Ok(target)
    }

    /// Copy a file or directory from the site root to `output`.
    pub fn copy(&self, source: &str, output: &str) -> Result<PathBuf> {
        let target = self.output_dir.join(output);
        copy_path(&self.root.join(source), &target)
            .with_context(|| format!("Failed to copy {source} to {output}"))?;
        Ok(target)
    }
}
