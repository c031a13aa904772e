//! Typed loading of structured data files.
//!
//! The [`Loader`] picks a parser from the file extension:
//!
//! | Extension | Format | Notes |
//! |---|---|---|
//! | `.json` | JSON | parsed directly |
//! | `.yaml`, `.yml` | YAML | `!load` tags resolved while converting |
//! | `.md` | Markdown | YAML frontmatter plus `content` and `filename` keys |
//!
//! Relative paths are resolved against the site root, the directory holding
//! the manifest. A document may pull in other documents through `!load`; the
//! loader tracks which files are currently being loaded and rejects a chain
//! that comes back to one of them.
//!
//! ```rust,no_run
//! use raydor::data::Loader;
//! use raydor::markdown::MarkdownOptions;
//!
//! # fn example() -> anyhow::Result<()> {
//! let loader = Loader::new("site", MarkdownOptions::default());
//! let post = loader.load("src/blog/test.md")?;
//! println!("{}", post["title"]);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::reference::ReferenceResolver;
use super::{Map, Value, type_name};
use crate::core::RaydorError;
use crate::markdown::{self, MarkdownOptions, frontmatter};

/// Structured formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
    /// `.md` with a YAML frontmatter block
    Markdown,
}

impl DataFormat {
    /// Detect the format from a path's extension. Matching is case-sensitive.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "md" => Some(Self::Markdown),
            _ => None,
        }
    }
}

/// Loads data files relative to a site root.
#[derive(Debug)]
pub struct Loader {
    root: PathBuf,
    markdown: MarkdownOptions,
    /// Files currently being loaded: (canonical path, path as referenced).
    active: RefCell<Vec<(PathBuf, String)>>,
}

/// Pops the active-file stack when a load finishes, successfully or not.
struct ActiveGuard<'a> {
    stack: &'a RefCell<Vec<(PathBuf, String)>>,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.stack.borrow_mut().pop();
    }
}

impl Loader {
    /// Create a loader for the site rooted at `root`.
    pub fn new(root: impl Into<PathBuf>, markdown: MarkdownOptions) -> Self {
        Self {
            root: root.into(),
            markdown,
            active: RefCell::new(Vec::new()),
        }
    }

    /// The site root all relative paths are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Markdown options used for document bodies.
    #[must_use]
    pub const fn markdown(&self) -> &MarkdownOptions {
        &self.markdown
    }

    /// Resolve a manifest path against the site root.
    #[must_use]
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(candidate)
        }
    }

    /// Load a data file into a [`Value`].
    ///
    /// # Errors
    ///
    /// - [`RaydorError::UnsupportedFormat`] for an unknown extension
    /// - [`RaydorError::SourceNotFound`] when the file does not exist
    /// - [`RaydorError::MalformedDocument`] when the file does not parse
    /// - [`RaydorError::CircularReference`] when `!load` tags loop back
    pub fn load(&self, path: &str) -> Result<Value> {
        let format = DataFormat::from_path(Path::new(path)).ok_or_else(|| {
            RaydorError::UnsupportedFormat {
                path: path.to_string(),
            }
        })?;

        let full_path = self.resolve_path(path);
        if !full_path.is_file() {
            return Err(RaydorError::SourceNotFound {
                path: path.to_string(),
            }
            .into());
        }

        let canonical = full_path
            .canonicalize()
            .with_context(|| format!("Failed to canonicalize path: {}", full_path.display()))?;
        let _guard = self.enter(canonical, path)?;

        debug!("Loading {path} as {format:?}");
        let content = fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read file: {}", full_path.display()))?;

        match format {
            DataFormat::Json => parse_json(path, &content),
            DataFormat::Yaml => self.parse_yaml(path, &content),
            DataFormat::Markdown => self.parse_markdown(path, &content),
        }
    }

    fn enter(&self, canonical: PathBuf, path: &str) -> Result<ActiveGuard<'_>> {
        let mut stack = self.active.borrow_mut();
        if let Some(start) = stack.iter().position(|(active, _)| *active == canonical) {
            let mut chain: Vec<&str> = stack[start..].iter().map(|(_, name)| name.as_str()).collect();
            chain.push(path);
            return Err(RaydorError::CircularReference {
                chain: chain.join(" -> "),
            }
            .into());
        }
        trace!("Entering {path} (depth {})", stack.len());
        stack.push((canonical, path.to_string()));
        drop(stack);

        Ok(ActiveGuard {
            stack: &self.active,
        })
    }

    fn parse_yaml(&self, path: &str, content: &str) -> Result<Value> {
        let document: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| RaydorError::MalformedDocument {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        ReferenceResolver::new(self, path).resolve(document)
    }

    fn parse_markdown(&self, path: &str, content: &str) -> Result<Value> {
        let content = frontmatter::normalize_newlines(content);
        let parts = frontmatter::split(&content).ok_or_else(|| RaydorError::MalformedDocument {
            path: path.to_string(),
            reason: frontmatter::diagnose(&content).to_string(),
        })?;

        let metadata = if parts.metadata.trim().is_empty() {
            Value::Null
        } else {
            self.parse_yaml(path, parts.metadata)?
        };

        let mut document = match metadata {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(RaydorError::MalformedDocument {
                    path: path.to_string(),
                    reason: format!("frontmatter must be a mapping, found {}", type_name(&other)),
                }
                .into());
            }
        };

        let filename = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        document.insert(
            "content".to_string(),
            Value::String(markdown::to_html(parts.body, &self.markdown)),
        );
        document.insert("filename".to_string(), Value::String(filename));

        Ok(Value::Object(document))
    }
}

fn parse_json(path: &str, content: &str) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| {
        RaydorError::MalformedDocument {
            path: path.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
