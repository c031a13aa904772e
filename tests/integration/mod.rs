//! Integration test suite for raydor
//!
//! End-to-end tests driving the `raydor` binary with `assert_cmd` and the
//! library API on sites laid out in temporary directories.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! - **build**: copy and render entries, progress output, output directory handling
//! - **generator**: `%` generator entries
//! - **data**: globbed and `!load`ed variables, globals merging, Markdown options
//! - **errors**: failure reporting and exit codes

#[path = "../common/mod.rs"]
mod common;

mod build;
mod data;
mod errors;
mod generator;
