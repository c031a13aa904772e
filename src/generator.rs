//! Generator expansion: one render entry per source file.
//!
//! A generator entry such as
//!
//! ```yaml
//! posts/%.html:
//!   generator: src/blog/%.md
//!   template: templates/post.html
//!   vars:
//!     section: blog
//! ```
//!
//! globs `src/blog/*.md`, captures the text bound to `%` in each match
//! (`test` for `src/blog/test.md`) and produces `posts/test.html`, rendered
//! with the entry's default `vars` (expanded with the manifest), then the
//! loaded file's own mapping on top, then the site globals merged per
//! [`GlobalsMerge`](crate::config::GlobalsMerge).

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::SiteConfig;
use crate::core::RaydorError;
use crate::data::{Loader, Map, Value, type_name};
use crate::manifest::GeneratorSpec;
use crate::pattern::{PatternMatcher, validate_output_path};
use crate::render::RenderEntry;
use crate::utils::to_slash;

/// Expand a generator into render entries, in sorted source path order.
///
/// # Errors
///
/// - [`RaydorError::PatternMismatch`] when a globbed path does not fit the pattern
/// - [`RaydorError::InvalidVariables`] when the defaults or a loaded file are not mappings
/// - any loading error for the matched files
pub fn expand_generator(
    spec: &GeneratorSpec,
    loader: &Loader,
    config: &SiteConfig,
) -> Result<Vec<RenderEntry>> {
    let defaults = match &spec.vars {
        Some(vars) => into_map(vars.clone(), spec.output.as_str())?,
        None => Map::new(),
    };

    let glob = spec.source.glob();
    let matches = PatternMatcher::new(&glob)?.find_matches(loader.root())?;
    debug!("Generator {} matched {} files with {glob}", spec.output.as_str(), matches.len());

    let mut entries = Vec::with_capacity(matches.len());
    for matched in matches {
        let source = to_slash(&matched);
        let captured = spec.source.capture(&source).ok_or_else(|| RaydorError::PatternMismatch {
            pattern: spec.source.as_str().to_string(),
            path: source.clone(),
        })?;

        let output = spec.output.substitute(captured);
        validate_output_path(&output)?;

        let data = loader.load(&source).with_context(|| format!("Failed to load {source}"))?;
        let mut vars = defaults.clone();
        vars.extend(into_map(data, &output)?);
        config.merge_globals(&mut vars);

        entries.push(RenderEntry {
            output,
            template: spec.template.clone(),
            vars,
        });
    }

    Ok(entries)
}

/// Require a mapping for the variables of `output`.
pub(crate) fn into_map(value: Value, output: &str) -> Result<Map, RaydorError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(RaydorError::InvalidVariables {
            output: output.to_string(),
            found: type_name(&other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobalsMerge;
    use crate::markdown::MarkdownOptions;
    use crate::pattern::GeneratorPattern;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write(temp: &TempDir, path: &str, content: &str) {
        let full = temp.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn spec(output: &str, source: &str, vars: Option<Value>) -> GeneratorSpec {
        GeneratorSpec {
            output: GeneratorPattern::parse(output).unwrap(),
            source: GeneratorPattern::parse(source).unwrap(),
            template: "templates/post.html".to_string(),
            vars,
        }
    }

    fn config(temp: &TempDir, globals: Value, globals_merge: GlobalsMerge) -> SiteConfig {
        SiteConfig {
            root: temp.path().to_path_buf(),
            markdown: MarkdownOptions::default(),
            globals: globals.as_object().cloned().unwrap(),
            globals_merge,
        }
    }

    #[test]
    fn test_one_entry_per_match_in_sorted_order() {
        let temp = TempDir::new().unwrap();
        write(&temp, "src/blog/test2.md", "---\ntitle: Second\n---\nTwo\n");
        write(&temp, "src/blog/test.md", "---\ntitle: First\n---\nOne\n");
        write(&temp, "src/blog/notes.txt", "ignored");

        let config = config(&temp, json!({}), GlobalsMerge::Override);
        let loader = Loader::new(temp.path(), MarkdownOptions::default());
        let entries =
            expand_generator(&spec("posts/%.html", "src/blog/%.md", None), &loader, &config)
                .unwrap();

        let outputs: Vec<&str> = entries.iter().map(|e| e.output.as_str()).collect();
        assert_eq!(outputs, ["posts/test.html", "posts/test2.html"]);
        assert_eq!(entries[0].template, "templates/post.html");
        assert_eq!(entries[0].vars["title"], "First");
        assert_eq!(entries[0].vars["filename"], "test.md");
        assert_eq!(entries[1].vars["content"], "<p>Two</p>\n");
    }

    #[test]
    fn test_zero_matches() {
        let temp = TempDir::new().unwrap();
        let config = config(&temp, json!({}), GlobalsMerge::Override);
        let loader = Loader::new(temp.path(), MarkdownOptions::default());

        let entries =
            expand_generator(&spec("posts/%.html", "src/blog/%.md", None), &loader, &config)
                .unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_variable_layering_override() {
        let temp = TempDir::new().unwrap();
        write(&temp, "data/a.json", r#"{"title": "A", "lang": "de"}"#);

        let config = config(&temp, json!({"lang": "en", "site": "raydor"}), GlobalsMerge::Override);
        let loader = Loader::new(temp.path(), MarkdownOptions::default());
        let entries = expand_generator(
            &spec("%.html", "data/%.json", Some(json!({"title": "Default", "section": "data"}))),
            &loader,
            &config,
        )
        .unwrap();

        assert_eq!(
            serde_json::Value::Object(entries[0].vars.clone()),
            json!({"title": "A", "section": "data", "lang": "en", "site": "raydor"})
        );
    }

    #[test]
    fn test_variable_layering_fallback() {
        let temp = TempDir::new().unwrap();
        write(&temp, "data/a.json", r#"{"title": "A", "lang": "de"}"#);

        let config = config(&temp, json!({"lang": "en", "site": "raydor"}), GlobalsMerge::Fallback);
        let loader = Loader::new(temp.path(), MarkdownOptions::default());
        let entries =
            expand_generator(&spec("%.html", "data/%.json", None), &loader, &config).unwrap();

        assert_eq!(entries[0].vars["lang"], "de");
        assert_eq!(entries[0].vars["site"], "raydor");
    }

    #[test]
    fn test_non_mapping_source_file() {
        let temp = TempDir::new().unwrap();
        write(&temp, "data/list.json", "[1, 2]");

        let config = config(&temp, json!({}), GlobalsMerge::Override);
        let loader = Loader::new(temp.path(), MarkdownOptions::default());
        let error =
            expand_generator(&spec("%.html", "data/%.json", None), &loader, &config).unwrap_err();

        match error.downcast_ref::<RaydorError>() {
            Some(RaydorError::InvalidVariables { output, found }) => {
                assert_eq!(output, "list.html");
                assert_eq!(found, "sequence");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
