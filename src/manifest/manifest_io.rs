//! Loading manifests from JSON and YAML files.
//!
//! Loading happens in two passes. The first reads the reserved keys, which
//! decide how Markdown is converted. The second builds a [`Loader`] with those
//! options, resolves `!load` tags in the remaining entries and classifies each
//! one as a copy, a render or a generator.

use anyhow::{Context, Result};
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{GeneratorSpec, Manifest, ManifestEntry, RESERVED_KEYS};
use crate::config::{GlobalsMerge, SiteConfig};
use crate::core::RaydorError;
use crate::data::reference::yaml_type_name;
use crate::data::{Loader, Map, ReferenceResolver, Value, type_name};
use crate::markdown::{HighlightConfig, MarkdownOptions};
use crate::pattern::{GENERATOR_MARKER, GeneratorPattern, validate_output_path};

/// The reserved keys, parsed but not yet applied.
#[derive(Debug, Default)]
struct ManifestSettings {
    substitutions: BTreeMap<String, String>,
    highlight: Option<HighlightConfig>,
    globals: Option<YamlValue>,
    globals_merge: GlobalsMerge,
}

impl Manifest {
    /// Load a manifest from a `.json`, `.yaml` or `.yml` file.
    ///
    /// `globals` are resolved and expanded here, once; entry variables stay
    /// unexpanded until the entry is built.
    ///
    /// # Errors
    ///
    /// - [`RaydorError::UnsupportedFormat`] for any other extension
    /// - [`RaydorError::SourceNotFound`] when the file does not exist
    /// - [`RaydorError::ManifestParseError`] for syntax errors or a non-mapping top level
    /// - [`RaydorError::InvalidManifestEntry`] for unusable entries or settings
    /// - any error from loading `!load` references or `globals` data
    pub fn load(path: &Path) -> Result<Self> {
        let manifest_name = path.display().to_string();
        let is_json = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => true,
            Some("yaml" | "yml") => false,
            _ => {
                return Err(RaydorError::UnsupportedFormat {
                    path: manifest_name,
                }
                .into());
            }
        };

        if !path.is_file() {
            return Err(RaydorError::SourceNotFound {
                path: manifest_name,
            }
            .into());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        let document = parse_document(&manifest_name, &content, is_json)?;

        let mapping = match document {
            YamlValue::Mapping(mapping) => mapping,
            YamlValue::Null => serde_yaml::Mapping::new(),
            other => {
                return Err(RaydorError::ManifestParseError {
                    file: manifest_name,
                    reason: format!(
                        "top level must be a mapping, found {}",
                        yaml_type_name(&other)
                    ),
                }
                .into());
            }
        };

        let mut settings = ManifestSettings::default();
        let mut outputs = Vec::new();
        for (key, node) in mapping {
            let key = match key {
                YamlValue::String(key) => key,
                other => {
                    return Err(RaydorError::InvalidManifestEntry {
                        key: format!("{other:?}"),
                        reason: "manifest keys must be strings".to_string(),
                    }
                    .into());
                }
            };

            if RESERVED_KEYS.contains(&key.as_str()) {
                settings.apply(&key, node)?;
            } else {
                outputs.push((key, node));
            }
        }

        let root = site_root(path);
        let mut markdown = MarkdownOptions::default();
        markdown.extend_substitutions(settings.substitutions);
        markdown.highlight = settings.highlight;

        let loader = Loader::new(root.clone(), markdown.clone());
        let resolver = ReferenceResolver::new(&loader, &manifest_name);

        let globals = match settings.globals {
            Some(node) => {
                let value = resolver
                    .expanding()
                    .resolve(node)
                    .context("Failed to resolve globals")?;
                match value {
                    Value::Object(map) => map,
                    Value::Null => Map::new(),
                    other => {
                        return Err(RaydorError::InvalidManifestEntry {
                            key: "globals".to_string(),
                            reason: format!("must be a mapping, found {}", type_name(&other)),
                        }
                        .into());
                    }
                }
            }
            None => Map::new(),
        };

        let mut entries = Vec::with_capacity(outputs.len());
        for (key, node) in outputs {
            let value = resolve_entry(&resolver, node)
                .with_context(|| format!("Failed to resolve manifest entry '{key}'"))?;
            entries.push(parse_entry(key, value)?);
        }

        debug!(
            "Loaded manifest {} with {} entries (root {})",
            path.display(),
            entries.len(),
            root.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            config: SiteConfig {
                root,
                markdown,
                globals,
                globals_merge: settings.globals_merge,
            },
            entries,
        })
    }
}

impl ManifestSettings {
    fn apply(&mut self, key: &str, node: YamlValue) -> Result<(), RaydorError> {
        let invalid = |reason: String| RaydorError::InvalidManifestEntry {
            key: key.to_string(),
            reason,
        };

        match key {
            "markdown_substitutions" => {
                if !node.is_null() {
                    self.substitutions = serde_yaml::from_value(node).map_err(|e| {
                        invalid(format!("expected a mapping of strings to strings: {e}"))
                    })?;
                }
            }
            "codehighlight" => {
                self.highlight = match node {
                    YamlValue::Bool(true) => Some(HighlightConfig::default()),
                    YamlValue::Bool(false) | YamlValue::Null => None,
                    YamlValue::Mapping(_) => Some(
                        serde_yaml::from_value(node)
                            .map_err(|e| invalid(format!("invalid highlight settings: {e}")))?,
                    ),
                    other => {
                        return Err(invalid(format!(
                            "expected true, false or a mapping, found {}",
                            yaml_type_name(&other)
                        )));
                    }
                };
            }
            "globals" => self.globals = Some(node),
            "globals_merge" => {
                self.globals_merge = serde_yaml::from_value(node)
                    .map_err(|e| invalid(format!("expected 'override' or 'fallback': {e}")))?;
            }
            _ => warn!("Unhandled reserved key '{key}'"),
        }
        Ok(())
    }
}

/// Convert an entry node, expanding the data paths written in its `vars`.
///
/// Only inline `vars` are expanded: an entry pulled in whole with `!load` is
/// data already, and `template`/`generator` are paths that must stay strings.
fn resolve_entry(resolver: &ReferenceResolver<'_>, node: YamlValue) -> Result<Value> {
    let YamlValue::Mapping(mapping) = node else {
        return resolver.resolve(node);
    };

    let mut fields = Map::with_capacity(mapping.len());
    for (field, value) in mapping {
        let YamlValue::String(field) = field else {
            return Err(RaydorError::InvalidData {
                path: "manifest entry".to_string(),
                reason: format!("field names must be strings, found {}", yaml_type_name(&field)),
            }
            .into());
        };
        let value = if field == "vars" {
            resolver.expanding().resolve(value).context("Failed to expand vars")?
        } else {
            resolver.resolve(value)?
        };
        fields.insert(field, value);
    }
    Ok(Value::Object(fields))
}

/// Classify one output entry.
fn parse_entry(key: String, value: Value) -> Result<ManifestEntry, RaydorError> {
    validate_output_path(&key)?;

    let invalid = |key: &str, reason: String| RaydorError::InvalidManifestEntry {
        key: key.to_string(),
        reason,
    };

    match value {
        Value::String(source) => {
            if key.contains(GENERATOR_MARKER) {
                return Err(invalid(&key, "copy entries cannot contain '%'".to_string()));
            }
            Ok(ManifestEntry::Copy {
                output: key,
                source,
            })
        }
        Value::Object(mut fields) => {
            let template = match fields.remove("template") {
                Some(Value::String(template)) => template,
                Some(other) => {
                    return Err(invalid(
                        &key,
                        format!("'template' must be a string, found {}", type_name(&other)),
                    ));
                }
                None => return Err(invalid(&key, "missing 'template'".to_string())),
            };
            let vars = fields.remove("vars");
            let generator = fields.remove("generator");

            for unknown in fields.keys() {
                warn!("Ignoring unknown field '{unknown}' in manifest entry '{key}'");
            }

            match generator {
                Some(Value::String(generator)) => Ok(ManifestEntry::Generator(GeneratorSpec {
                    output: GeneratorPattern::parse(&key)?,
                    source: GeneratorPattern::parse(&generator)?,
                    template,
                    vars,
                })),
                Some(other) => Err(invalid(
                    &key,
                    format!("'generator' must be a string, found {}", type_name(&other)),
                )),
                None if key.contains(GENERATOR_MARKER) => Err(invalid(
                    &key,
                    "output contains '%' but the entry has no 'generator'".to_string(),
                )),
                None => Ok(ManifestEntry::Render {
                    output: key,
                    template,
                    vars,
                }),
            }
        }
        other => Err(invalid(
            &key,
            format!(
                "expected a source path or a mapping with 'template', found {}",
                type_name(&other)
            ),
        )),
    }
}

fn parse_document(manifest_name: &str, content: &str, is_json: bool) -> Result<YamlValue> {
    let parsed = if is_json {
        serde_json::from_str::<YamlValue>(content).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<YamlValue>(content).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| {
        RaydorError::ManifestParseError {
            file: manifest_name.to_string(),
            reason,
        }
        .into()
    })
}

/// The directory containing the manifest.
fn site_root(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
