//! Structured data: loading, lazy references and recursive expansion.
//!
//! Every document the build reads ends up as a [`Value`], the same JSON-like
//! tree tera consumes. Mapping order is preserved from the source file.
//!
//! - [`loader`] - dispatch on file extension to the JSON, YAML or Markdown parser
//! - [`reference`] - `!load <path>` tags in YAML, resolved while converting
//! - [`expand`] - replace path-like strings (and globs) inside a value tree

pub mod expand;
pub mod loader;
pub mod reference;

pub use expand::DataExpander;
pub use loader::{DataFormat, Loader};
pub use reference::{ReferenceResolver, Resolvable};

/// The in-memory value model shared by loaders, templates and the manifest.
pub type Value = serde_json::Value;

/// An insertion-ordered mapping of string keys to values.
pub type Map = serde_json::Map<String, Value>;

/// Short name of a value's type, for error messages.
#[must_use]
pub const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
