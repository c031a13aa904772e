//! Template rendering engine with Tera.
//!
//! Templates are identified by their path relative to the site root, e.g.
//! `templates/post.html`, and are read from disk the first time they are
//! rendered. Parents named by `{% extends %}`, `{% include %}` and
//! `{% import %}` are loaded before the template that names them, so
//! inheritance and macros resolve the same way a filesystem loader would.

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};
use tracing::{debug, trace};

use super::filters;
use crate::core::RaydorError;
use crate::data::Map;
use crate::markdown::MarkdownOptions;
use crate::utils::to_slash;

/// Maximum allowed Levenshtein distance as a percentage of the name length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Suffixes of templates that are auto-escaped.
const AUTOESCAPE_SUFFIXES: [&str; 3] = [".html", ".htm", ".xml"];

/// Tera wrapper that loads templates from the site root on demand.
pub struct TemplateRenderer {
    tera: Tera,
    root: PathBuf,
    loaded: HashSet<String>,
}

impl TemplateRenderer {
    /// Create a renderer for templates under `root` with the site filters registered.
    pub fn new(root: impl Into<PathBuf>, markdown: MarkdownOptions) -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(AUTOESCAPE_SUFFIXES.to_vec());
        filters::register(&mut tera, markdown);

        Self {
            tera,
            root: root.into(),
            loaded: HashSet::new(),
        }
    }

    /// Render template `name` with `vars` as the context.
    ///
    /// # Errors
    ///
    /// - [`RaydorError::TemplateNotFound`] when the template (or one it depends on) is missing
    /// - [`RaydorError::TemplateRenderFailed`] for syntax errors and runtime failures
    pub fn render(&mut self, name: &str, vars: &Map) -> Result<String> {
        self.ensure_loaded(name)?;

        let context = TeraContext::from_serialize(vars).map_err(|e| {
            RaydorError::TemplateRenderFailed {
                template: name.to_string(),
                reason: Self::format_tera_error(&e),
            }
        })?;

        trace!("Rendering {name} with {} variables", vars.len());
        self.tera.render(name, &context).map_err(|e| {
            RaydorError::TemplateRenderFailed {
                template: name.to_string(),
                reason: Self::format_tera_error(&e),
            }
            .into()
        })
    }

    fn ensure_loaded(&mut self, name: &str) -> Result<()> {
        let mut visiting = Vec::new();
        self.load_template(name, false, &mut visiting)
    }

    fn load_template(
        &mut self,
        name: &str,
        optional: bool,
        visiting: &mut Vec<String>,
    ) -> Result<()> {
        if self.loaded.contains(name) || visiting.iter().any(|v| v == name) {
            return Ok(());
        }

        let path = self.root.join(name);
        if !path.is_file() {
            if optional {
                trace!("Skipping missing optional template {name}");
                return Ok(());
            }
            return Err(RaydorError::TemplateNotFound {
                name: name.to_string(),
                suggestions: self.suggest(name),
            }
            .into());
        }

        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read template: {}", path.display()))?;

        visiting.push(name.to_string());
        for dependency in template_dependencies(&source) {
            self.load_template(&dependency.name, dependency.optional, visiting)
                .with_context(|| format!("Failed to load '{}' used by {name}", dependency.name))?;
        }
        visiting.pop();

        debug!("Loading template {name}");
        self.tera.add_raw_template(name, &source).map_err(|e| RaydorError::TemplateRenderFailed {
            template: name.to_string(),
            reason: Self::format_tera_error(&e),
        })?;
        self.loaded.insert(name.to_string());
        Ok(())
    }

    /// Templates next to where `name` was expected, closest first.
    fn suggest(&self, name: &str) -> Vec<String> {
        let parent = Path::new(name).parent().unwrap_or_else(|| Path::new(""));
        let Ok(entries) = fs::read_dir(self.root.join(parent)) else {
            return Vec::new();
        };

        let available: Vec<String> = entries
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .map(|entry| to_slash(&parent.join(entry.file_name())))
            .collect();

        Self::find_similar_names(name, &available)
    }

    /// Find similar names using Levenshtein distance
    fn find_similar_names(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> = available
            .iter()
            .map(|candidate| {
                let distance = levenshtein(target, candidate);
                (candidate.clone(), distance)
            })
            .collect();

        // Sort by distance (closest first), then by name for stable output
        scored.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        // Return top 3 suggestions within reasonable distance
        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(name, _)| name)
            .collect()
    }

    /// Format a Tera error with its whole cause chain.
    ///
    /// Tera errors are nested: "Failed to render 'x'" wraps the actual problem
    /// ("Variable `foo` not found", "Filter `bar` not found", a parse error with
    /// its location). All levels are kept, joined with arrows.
    pub fn format_tera_error(error: &tera::Error) -> String {
        use std::error::Error;

        let mut messages = vec![error.to_string()];
        let mut current_error: Option<&dyn Error> = error.source();
        while let Some(err) = current_error {
            messages.push(err.to_string());
            current_error = err.source();
        }

        let messages: Vec<String> = messages
            .into_iter()
            .map(|msg| msg.trim().to_string())
            .filter(|msg| !msg.is_empty())
            .collect();

        if messages.is_empty() {
            "Template error (no details available)".to_string()
        } else {
            messages.join("\n  → ")
        }
    }
}

/// A template named by `extends`, `include` or `import`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TemplateDependency {
    name: String,
    optional: bool,
}

fn dependency_regex() -> Option<&'static Regex> {
    static DEPENDENCY: OnceLock<Option<Regex>> = OnceLock::new();
    DEPENDENCY
        .get_or_init(|| {
            Regex::new(r#"\{%-?\s*(?:extends|include|import)\s+["']([^"']+)["']([^%]*)-?%\}"#)
                .ok()
        })
        .as_ref()
}

fn template_dependencies(source: &str) -> Vec<TemplateDependency> {
    let Some(regex) = dependency_regex() else {
        return Vec::new();
    };
    regex
        .captures_iter(source)
        .map(|caps| TemplateDependency {
            name: caps[1].to_string(),
            optional: caps[2].contains("ignore missing"),
        })
        .collect()
}
