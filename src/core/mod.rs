//! Core types shared by every stage of the build.
//!
//! - [`RaydorError`] - the typed failure modes of a build
//! - [`ErrorContext`] - an error plus details and a suggestion for the CLI
//! - [`user_friendly_error`] - convert any `anyhow::Error` for display

pub mod error;

pub use error::{ErrorContext, RaydorError, user_friendly_error};
