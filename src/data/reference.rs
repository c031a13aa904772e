//! Lazy references in YAML documents.
//!
//! A scalar tagged `!load` names another data file to load in its place:
//!
//! ```yaml
//! site: raydor
//! projects: !load src/projects.json
//! author: !load data/author.yaml
//! ```
//!
//! The reference is resolved while the YAML tree is converted into a
//! [`Value`], so the loaded document replaces the tagged node in place. Tagged
//! paths are taken literally and never globbed. Any other tag is ignored and
//! its inner value kept.
//!
//! For template variables the resolver also runs untagged strings through the
//! [`DataExpander`] (see [`ReferenceResolver::expanding`]). Loaded documents are
//! never expanded a second time, so strings such as a Markdown file's
//! `filename` stay strings.

use anyhow::{Context, Result};
use serde_yaml::Value as YamlValue;
use tracing::debug;

use super::expand::DataExpander;
use super::loader::Loader;
use super::{Map, Value};
use crate::core::RaydorError;

/// The tag marking a lazy reference.
pub const LOAD_TAG: &str = "!load";

/// A YAML node, classified as either inline data or a reference to load.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolvable {
    /// Ordinary data, converted as-is.
    Inline(YamlValue),
    /// A `!load` path, relative to the site root.
    Reference(String),
}

impl Resolvable {
    /// Classify a node from `document`.
    ///
    /// # Errors
    ///
    /// [`RaydorError::InvalidReference`] when `!load` is attached to anything
    /// other than a string.
    pub fn classify(node: YamlValue, document: &str) -> Result<Self, RaydorError> {
        match node {
            YamlValue::Tagged(tagged) if tagged.tag == LOAD_TAG => match tagged.value {
                YamlValue::String(path) => Ok(Self::Reference(path)),
                other => Err(RaydorError::InvalidReference {
                    path: document.to_string(),
                    reason: format!(
                        "{LOAD_TAG} expects a path string, found {}",
                        yaml_type_name(&other)
                    ),
                }),
            },
            YamlValue::Tagged(tagged) => Self::classify(tagged.value, document),
            other => Ok(Self::Inline(other)),
        }
    }
}

/// Converts parsed YAML into a [`Value`], loading references on the way.
#[derive(Clone, Copy)]
pub struct ReferenceResolver<'a> {
    loader: &'a Loader,
    document: &'a str,
    expand_paths: bool,
}

impl<'a> ReferenceResolver<'a> {
    /// Create a resolver for nodes of `document` (used in error messages).
    #[must_use]
    pub const fn new(loader: &'a Loader, document: &'a str) -> Self {
        Self {
            loader,
            document,
            expand_paths: false,
        }
    }

    /// Also expand path-like strings written inline in the tree.
    ///
    /// Strings inside `!load`ed documents are left untouched.
    #[must_use]
    pub const fn expanding(self) -> Self {
        Self {
            expand_paths: true,
            ..self
        }
    }

    /// Convert a YAML tree, resolving every `!load` reference in it.
    pub fn resolve(&self, node: YamlValue) -> Result<Value> {
        match Resolvable::classify(node, self.document)? {
            Resolvable::Reference(path) => {
                debug!("Resolving {LOAD_TAG} {path} from {}", self.document);
                self.loader.load(&path).with_context(|| {
                    format!("Failed to resolve {LOAD_TAG} {path} in {}", self.document)
                })
            }
            Resolvable::Inline(node) => self.convert(node),
        }
    }

    fn convert(&self, node: YamlValue) -> Result<Value> {
        match node {
            YamlValue::Null => Ok(Value::Null),
            YamlValue::Bool(b) => Ok(Value::Bool(b)),
            YamlValue::Number(n) => Ok(number_to_value(&n)),
            YamlValue::String(s) if self.expand_paths => DataExpander::new(self.loader)
                .expand(Value::String(s.clone()))
                .with_context(|| format!("Failed to expand '{s}' in {}", self.document)),
            YamlValue::String(s) => Ok(Value::String(s)),
            YamlValue::Sequence(items) => items
                .into_iter()
                .map(|item| self.resolve(item))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            YamlValue::Mapping(mapping) => {
                let mut map = Map::with_capacity(mapping.len());
                for (key, value) in mapping {
                    let key = self.key_to_string(key)?;
                    map.insert(key, self.resolve(value)?);
                }
                Ok(Value::Object(map))
            }
            YamlValue::Tagged(tagged) => self.resolve(tagged.value),
        }
    }

    fn key_to_string(&self, key: YamlValue) -> Result<String> {
        match key {
            YamlValue::String(s) => Ok(s),
            YamlValue::Number(n) => Ok(n.to_string()),
            YamlValue::Bool(b) => Ok(b.to_string()),
            YamlValue::Null => Ok("null".to_string()),
            YamlValue::Tagged(tagged) => self.key_to_string(tagged.value),
            other => Err(RaydorError::InvalidData {
                path: self.document.to_string(),
                reason: format!("mapping keys must be scalars, found {}", yaml_type_name(&other)),
            }
            .into()),
        }
    }
}

/// YAML numbers JSON cannot hold (NaN, infinities) become null.
fn number_to_value(n: &serde_yaml::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::from(i)
    } else if let Some(u) = n.as_u64() {
        Value::from(u)
    } else {
        n.as_f64().and_then(serde_json::Number::from_f64).map_or(Value::Null, Value::Number)
    }
}

/// Short name of a YAML node's type, for error messages.
pub(crate) const fn yaml_type_name(node: &YamlValue) -> &'static str {
    match node {
        YamlValue::Null => "null",
        YamlValue::Bool(_) => "boolean",
        YamlValue::Number(_) => "number",
        YamlValue::String(_) => "string",
        YamlValue::Sequence(_) => "sequence",
        YamlValue::Mapping(_) => "mapping",
        YamlValue::Tagged(_) => "tagged value",
    }
}
