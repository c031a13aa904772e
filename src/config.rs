//! Site-wide configuration built once from the manifest.
//!
//! [`SiteConfig`] carries everything that is not an output entry: the site
//! root, Markdown options for the loader and the `markdown` filter, the
//! expanded `globals` mapping and the policy for merging it into template
//! variables. It is passed by reference to every stage of the build.

use serde::Deserialize;
use std::path::PathBuf;

use crate::data::Map;
use crate::markdown::MarkdownOptions;

/// How `globals` combine with an entry's own variables.
///
/// Applies the same way to direct renders and generated entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalsMerge {
    /// Global keys replace same-named entry keys.
    #[default]
    Override,
    /// Globals only fill keys the entry does not define.
    Fallback,
}

impl GlobalsMerge {
    /// Merge `globals` into `vars` according to the policy.
    pub fn apply(self, vars: &mut Map, globals: &Map) {
        match self {
            Self::Override => {
                for (key, value) in globals {
                    vars.insert(key.clone(), value.clone());
                }
            }
            Self::Fallback => {
                for (key, value) in globals {
                    vars.entry(key.clone()).or_insert_with(|| value.clone());
                }
            }
        }
    }
}

/// Configuration shared by the loader, renderer and dispatcher.
#[derive(Debug, Clone, Default)]
pub struct SiteConfig {
    /// Directory containing the manifest; every relative path starts here.
    pub root: PathBuf,
    /// Substitution table and code highlighting for Markdown.
    pub markdown: MarkdownOptions,
    /// Variables available to every render, already expanded.
    pub globals: Map,
    /// Direction of the globals merge.
    pub globals_merge: GlobalsMerge,
}

impl SiteConfig {
    /// Apply the globals to one entry's variables.
    pub fn merge_globals(&self, vars: &mut Map) {
        self.globals_merge.apply(vars, &self.globals);
    }
}
