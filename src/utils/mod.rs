//! Filesystem utilities used by the build.
//!
//! - [`fs`] - directory wipe/recreate, recursive copy, writes with parent creation

pub mod fs;

pub use fs::{copy_path, ensure_dir, recreate_dir, to_slash, write_file};
