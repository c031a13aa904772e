//! Error handling for raydor
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** ([`RaydorError`]) so callers and tests can match on
//!    the precise failure
//! 2. **User-friendly messages** ([`ErrorContext`]) with details and a suggestion
//!    for the CLI
//!
//! Every error is fatal for a build. Functions propagate with `anyhow::Result`,
//! raising a [`RaydorError`] where the failure has a name, and the binary turns
//! whatever reaches `main` into an [`ErrorContext`] through [`user_friendly_error`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use raydor::core::{RaydorError, user_friendly_error};
//!
//! let error = anyhow::Error::from(RaydorError::TemplateNotFound {
//!     name: "templates/post.html".to_string(),
//!     suggestions: vec!["templates/posts.html".to_string()],
//! });
//!
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for raydor operations.
///
/// # Error Categories
///
/// ## Loading data
/// - [`UnsupportedFormat`] - file extension has no structured-data loader
/// - [`MalformedDocument`] - Markdown source without a valid frontmatter block
/// - [`InvalidData`] - a document parsed but cannot be represented as a value
/// - [`InvalidReference`] - a `!load` tag on something other than a path string
/// - [`CircularReference`] - a `!load` chain that leads back to itself
///
/// ## Manifest
/// - [`ManifestParseError`] - the manifest is not valid JSON/YAML
/// - [`InvalidManifestEntry`] - an output entry has an unusable shape
/// - [`InvalidPattern`] - a generator pattern without exactly one `%`
/// - [`PatternMismatch`] - a globbed file does not fit its generator pattern
///
/// ## Rendering and output
/// - [`TemplateNotFound`] - no template file for an identifier
/// - [`TemplateRenderFailed`] - tera failed while rendering
/// - [`InvalidVariables`] - template variables did not resolve to a mapping
/// - [`SourceNotFound`] - a referenced source file does not exist
/// - [`FileSystemError`] - any other filesystem failure
///
/// [`UnsupportedFormat`]: RaydorError::UnsupportedFormat
/// [`MalformedDocument`]: RaydorError::MalformedDocument
/// [`InvalidData`]: RaydorError::InvalidData
/// [`InvalidReference`]: RaydorError::InvalidReference
/// [`CircularReference`]: RaydorError::CircularReference
/// [`ManifestParseError`]: RaydorError::ManifestParseError
/// [`InvalidManifestEntry`]: RaydorError::InvalidManifestEntry
/// [`InvalidPattern`]: RaydorError::InvalidPattern
/// [`PatternMismatch`]: RaydorError::PatternMismatch
/// [`TemplateNotFound`]: RaydorError::TemplateNotFound
/// [`TemplateRenderFailed`]: RaydorError::TemplateRenderFailed
/// [`InvalidVariables`]: RaydorError::InvalidVariables
/// [`SourceNotFound`]: RaydorError::SourceNotFound
/// [`FileSystemError`]: RaydorError::FileSystemError
#[derive(Error, Debug, Clone)]
pub enum RaydorError {
    /// The file extension matches none of the structured formats.
    #[error("Unsupported file format: {path}")]
    UnsupportedFormat {
        /// The offending path
        path: String,
    },

    /// A Markdown file does not match `---\n<metadata>\n---\n<body>`.
    #[error("Malformed document {path}: {reason}")]
    MalformedDocument {
        /// The offending path
        path: String,
        /// What did not match
        reason: String,
    },

    /// A document parsed but contains something the value model cannot hold.
    #[error("Invalid data in {path}: {reason}")]
    InvalidData {
        /// The offending path
        path: String,
        /// Description of the problem
        reason: String,
    },

    /// A `!load` tag was attached to a value that is not a path string.
    #[error("Invalid !load reference in {path}: {reason}")]
    InvalidReference {
        /// The document containing the tag
        path: String,
        /// Description of the problem
        reason: String,
    },

    /// Lazy references form a cycle.
    #[error("Circular reference detected: {chain}")]
    CircularReference {
        /// The files involved, joined with ` -> `
        chain: String,
    },

    /// The manifest could not be parsed.
    #[error("Failed to parse manifest {file}: {reason}")]
    ManifestParseError {
        /// The manifest path
        file: String,
        /// Parser message
        reason: String,
    },

    /// An output entry in the manifest has an unusable shape.
    #[error("Invalid manifest entry '{key}': {reason}")]
    InvalidManifestEntry {
        /// The output key of the entry
        key: String,
        /// Description of the problem
        reason: String,
    },

    /// A generator pattern is not usable.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written in the manifest
        pattern: String,
        /// Description of the problem
        reason: String,
    },

    /// A path returned by the glob does not fit the capturing pattern.
    #[error("Path {path} does not match generator pattern '{pattern}'")]
    PatternMismatch {
        /// The generator source pattern
        pattern: String,
        /// The matched path that failed to capture
        path: String,
    },

    /// The renderer has no template under this identifier.
    #[error("Template not found: {name}")]
    TemplateNotFound {
        /// The template identifier
        name: String,
        /// Similarly named templates, closest first
        suggestions: Vec<String>,
    },

    /// Tera failed while rendering a template.
    #[error("Failed to render template {template}: {reason}")]
    TemplateRenderFailed {
        /// The template identifier
        template: String,
        /// Formatted tera error chain
        reason: String,
    },

    /// The variables for an output did not resolve to a mapping.
    #[error("Template variables for {output} must be a mapping, found {found}")]
    InvalidVariables {
        /// The output path being rendered
        output: String,
        /// The JSON type that was found instead
        found: String,
    },

    /// A source file or directory does not exist.
    #[error("Source not found: {path}")]
    SourceNotFound {
        /// The missing path
        path: String,
    },

    /// A filesystem operation failed.
    #[error("File system error during {operation}: {path}")]
    FileSystemError {
        /// The operation that failed (e.g. "write", "copy")
        operation: String,
        /// The path involved
        path: String,
    },

    /// Anything without a dedicated variant.
    #[error("{message}")]
    Other {
        /// The message to show
        message: String,
    },
}

/// An error with optional details and a suggestion, ready for display.
///
/// ```rust,no_run
/// use raydor::core::{ErrorContext, RaydorError};
///
/// let context = ErrorContext::new(RaydorError::SourceNotFound {
///     path: "images/".to_string(),
/// })
/// .with_suggestion("Create the directory or remove the entry from the manifest")
/// .with_details("Copy entries must point at an existing file or directory");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: RaydorError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: RaydorError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`RaydorError`] anywhere in the chain (the outermost one wins),
/// then [`std::io::Error`], and falls back to the full error chain as the message.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let typed = error
        .downcast_ref::<RaydorError>()
        .or_else(|| error.chain().find_map(|e| e.downcast_ref::<RaydorError>()));
    if let Some(raydor_error) = typed {
        let mut context = create_error_context(raydor_error.clone());
        let outer = error.to_string();
        if context.details.is_none() && outer != raydor_error.to_string() {
            context.details = Some(outer);
        }
        return context;
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(RaydorError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check file ownership and permissions of the site and output directories")
                .with_details(io_error.to_string());
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(RaydorError::FileSystemError {
                    operation: "file access".to_string(),
                    path: "unknown".to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct")
                .with_details(io_error.to_string());
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(RaydorError::Other {
        message,
    })
}

/// Attach a tailored suggestion to each known error.
fn create_error_context(error: RaydorError) -> ErrorContext {
    match &error {
        RaydorError::UnsupportedFormat { .. } => ErrorContext::new(error)
            .with_suggestion("Use one of the supported data formats: .json, .yaml, .yml or .md"),

        RaydorError::MalformedDocument { path, .. } => {
            let suggestion = format!(
                "Start {path} with a '---' line, then the YAML metadata, then a closing '---' line before the body"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        RaydorError::CircularReference { .. } => ErrorContext::new(error)
            .with_suggestion("Remove one of the !load references so the files no longer include each other"),

        RaydorError::TemplateNotFound { suggestions, .. } => {
            let suggestion = if suggestions.is_empty() {
                "Template identifiers are paths relative to the directory containing the manifest"
                    .to_string()
            } else {
                format!("Did you mean: {}?", suggestions.join(", "))
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        RaydorError::TemplateRenderFailed { .. } => ErrorContext::new(error).with_suggestion(
            "Check template syntax: variables use {{ var }}, control flow uses {% %}. \
             Ensure every referenced variable exists for this output",
        ),

        RaydorError::SourceNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Paths in the manifest are relative to the directory containing the manifest"),

        RaydorError::InvalidPattern { .. } | RaydorError::PatternMismatch { .. } => {
            ErrorContext::new(error).with_suggestion(
                "Generator entries need exactly one '%' in both the output key and the generator pattern",
            )
        }

        RaydorError::InvalidVariables { .. } => ErrorContext::new(error)
            .with_suggestion("Make 'vars' a mapping, or point it at a file whose top level is a mapping"),

        _ => ErrorContext::new(error),
    }
}
