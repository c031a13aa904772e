//! Recursive expansion of path-like strings in template variables.
//!
//! Template variables written in the manifest may mention data files by path.
//! [`DataExpander::expand`] walks the tree and swaps every string whose
//! extension the [`Loader`] understands for the loaded document:
//!
//! ```yaml
//! blog.html:
//!   template: templates/blog.html
//!   vars:
//!     projects: src/projects.json   # replaced by the parsed JSON
//!     posts: src/blog/*.md          # replaced by a sequence, one entry per post
//!     title: Blog                   # left alone
//! ```
//!
//! A string containing `*` is a glob: it becomes a sequence of loaded documents
//! in lexicographic path order, possibly empty.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

use super::loader::{DataFormat, Loader};
use super::{Map, Value};
use crate::pattern::PatternMatcher;
use crate::utils::to_slash;

/// Replaces loadable paths in a value tree with their contents.
pub struct DataExpander<'a> {
    loader: &'a Loader,
}

impl<'a> DataExpander<'a> {
    /// Create an expander that loads through `loader`.
    #[must_use]
    pub const fn new(loader: &'a Loader) -> Self {
        Self {
            loader,
        }
    }

    /// Expand every loadable string in `value`.
    ///
    /// Mapping keys and order, sequence order and all non-path scalars are kept.
    pub fn expand(&self, value: Value) -> Result<Value> {
        match value {
            Value::Object(map) => {
                let mut expanded = Map::with_capacity(map.len());
                for (key, item) in map {
                    let item =
                        self.expand(item).with_context(|| format!("Failed to expand '{key}'"))?;
                    expanded.insert(key, item);
                }
                Ok(Value::Object(expanded))
            }
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.expand(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Value::String(s) if is_loadable(&s) => self.expand_path(&s),
            other => Ok(other),
        }
    }

    fn expand_path(&self, path: &str) -> Result<Value> {
        if !path.contains('*') {
            return self.loader.load(path);
        }

        let matches = PatternMatcher::new(path)?.find_matches(self.loader.root())?;
        debug!("Glob {path} matched {} files", matches.len());

        matches
            .iter()
            .map(|matched| self.loader.load(&to_slash(matched)))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

/// Whether a string names a file the [`Loader`] can read.
#[must_use]
pub fn is_loadable(s: &str) -> bool {
    DataFormat::from_path(Path::new(s)).is_some()
}
