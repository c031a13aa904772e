//! Manifest parsing for raydor sites.
//!
//! The manifest is a single JSON or YAML mapping that lists every file of the
//! output tree. Its directory is the *site root*: all relative paths in it
//! (copy sources, templates, data files) are resolved from there.
//!
//! # Basic Structure
//!
//! ```yaml
//! markdown_substitutions:
//!   "--": "&#8211;"
//! codehighlight:
//!   style: monokai
//! globals:
//!   site_name: My Site
//!   nav: data/nav.yaml
//! globals_merge: override
//!
//! index.html:
//!   template: templates/index.html
//! projects.html:
//!   template: templates/projects.html
//!   vars:
//!     projects: src/projects.json
//! blog.html:
//!   template: templates/blog.html
//!   vars:
//!     posts: src/blog/*.md
//! blog/%.html:
//!   generator: src/blog/%.md
//!   template: templates/blogpost.html
//! about.html:
//!   template: templates/page.html
//!   vars: !load src/about.md
//! images/: images/
//! ```
//!
//! # Reserved Keys
//!
//! - `markdown_substitutions` - text → HTML replacements merged over the defaults
//! - `codehighlight` - `true`/`false` or `{style: NAME}`
//! - `globals` - variables merged into every render (expanded once)
//! - `globals_merge` - `override` (default) or `fallback`
//!
//! # Entry Formats
//!
//! Every other key is an output path relative to the output directory:
//!
//! - **Copy**: a string naming a file or directory to copy
//! - **Render**: `{template, vars?}`; `vars` is a mapping or a single data path
//!   (`globals` and `vars` are expanded while the manifest loads; documents
//!   pulled in with `!load` are used as they are)
//! - **Generator**: `{generator, template, vars?}`; the key and `generator`
//!   each contain exactly one `%`
//!
//! Entries are built in document order.

mod manifest_io;


use std::path::PathBuf;

use crate::config::SiteConfig;
use crate::data::Value;
use crate::pattern::GeneratorPattern;

/// Keys that configure the site instead of naming an output.
pub const RESERVED_KEYS: [&str; 4] =
    ["markdown_substitutions", "codehighlight", "globals", "globals_merge"];

/// A parsed manifest: site configuration plus output entries in order.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Path the manifest was loaded from.
    pub path: PathBuf,
    /// Configuration from the reserved keys.
    pub config: SiteConfig,
    /// Output entries in document order.
    pub entries: Vec<ManifestEntry>,
}

/// One output of the build.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestEntry {
    /// Copy a file or directory tree.
    Copy {
        /// Output path
        output: String,
        /// Source path relative to the site root
        source: String,
    },
    /// Render one template into one file.
    Render {
        /// Output path
        output: String,
        /// Template identifier
        template: String,
        /// Variables with their data paths expanded, if any
        vars: Option<Value>,
    },
    /// Render one file per source matching a `%` pattern.
    Generator(GeneratorSpec),
}

impl ManifestEntry {
    /// The manifest key of this entry.
    #[must_use]
    pub fn output(&self) -> &str {
        match self {
            Self::Copy { output, .. } | Self::Render { output, .. } => output,
            Self::Generator(spec) => spec.output.as_str(),
        }
    }
}

/// A generator entry: output pattern, source pattern and template.
#[derive(Debug, Clone)]
pub struct GeneratorSpec {
    /// Output path pattern, e.g. `posts/%.html`.
    pub output: GeneratorPattern,
    /// Source file pattern, e.g. `src/blog/%.md`.
    pub source: GeneratorPattern,
    /// Template identifier used for every generated file.
    pub template: String,
    /// Default variables every generated file starts from, expanded.
    pub vars: Option<Value>,
}

impl PartialEq for GeneratorSpec {
    fn eq(&self, other: &Self) -> bool {
        self.output.as_str() == other.output.as_str()
            && self.source.as_str() == other.source.as_str()
            && self.template == other.template
            && self.vars == other.vars
    }
}
