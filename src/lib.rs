//! raydor - a static site generator driven by a declarative manifest
//!
//! A manifest maps output paths to what produces them: a source to copy, a
//! template to render with variables, or a generator that renders one page per
//! matching data file. Data files (JSON, YAML, Markdown with frontmatter) are
//! loaded by path, YAML may pull in other files with `!load`, and any string in
//! a variable mapping that names a data file, or globs several, is replaced by
//! the loaded data.
//!
//! # Architecture Overview
//!
//! ```text
//! CLI -> Manifest::load -> SiteConfig -> SiteBuilder::build
//!          |                               |-- copy       (utils::fs)
//!          |                               |-- render     (RenderEntry::direct -> RenderDispatcher)
//!          |                               `-- generator  (expand_generator -> RenderDispatcher)
//!          `-- ReferenceResolver (!load)   DataExpander -> Loader -> markdown
//! ```
//!
//! # Core Modules
//!
//! - [`cli`] - command-line parsing and logging setup
//! - [`core`] - [`RaydorError`](core::RaydorError) and user-facing error reports
//! - [`manifest`] - manifest parsing into typed entries and a [`SiteConfig`](config::SiteConfig)
//! - [`config`] - site-wide settings and the globals merge policy
//! - [`data`] - typed loading, `!load` references and variable expansion
//! - [`markdown`] - Markdown to HTML with substitutions and code block wrapping
//! - [`pattern`] - globbing and `%` generator patterns
//! - [`generator`] - generator entries to render entries
//! - [`render`] - resolved render entries and the output writer
//! - [`templating`] - Tera rendering and the custom filters
//! - [`build`] - the full build over a manifest
//! - [`utils`] - filesystem helpers
//!
//! # Manifest Format
//!
//! ```yaml
//! markdown_substitutions:
//!   "(c)": "&copy;"
//! codehighlight:
//!   style: monokai
//! globals:
//!   site: My Site
//!   nav: !load data/nav.yaml
//!
//! index.html:
//!   template: templates/index.html
//!   vars:
//!     posts: src/blog/*.md
//! posts/%.html:
//!   generator: src/blog/%.md
//!   template: templates/post.html
//! static/: static/
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use raydor::build::SiteBuilder;
//! use raydor::manifest::Manifest;
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let manifest = Manifest::load(Path::new("site.yaml"))?;
//! let summary = SiteBuilder::new(&manifest, "output").build(&mut std::io::stdout())?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

pub mod build;
pub mod cli;
pub mod config;
pub mod core;
pub mod data;
pub mod generator;
pub mod manifest;
pub mod markdown;
pub mod pattern;
pub mod render;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
