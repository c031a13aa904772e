//! File system helpers for writing the output tree.
//!
//! All helpers return `anyhow::Result` with the offending path in the context
//! message, so a failing build always names the file it was working on.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Component, Path};
use tracing::{debug, trace};

use crate::core::RaydorError;

/// Ensures a directory exists, creating it and its parents if needed.
///
/// Fails if the path exists but is not a directory.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Ensures the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    Ok(())
}

/// Writes `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, content).map_err(|e| {
        anyhow::Error::new(e).context(RaydorError::FileSystemError {
            operation: "write".to_string(),
            path: path.display().to_string(),
        })
    })?;
    trace!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Recursively copies a directory, merging into `dst` if it already exists.
///
/// Symlinks and other special files are skipped.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!(
                    "Failed to copy file from {} to {}",
                    src_path.display(),
                    dst_path.display()
                )
            })?;
        }
    }

    Ok(())
}

/// Copies a file or a directory tree to `dst`.
///
/// A file copied to a `dst` that ends with a separator, or that is an existing
/// directory, lands inside it under its own name. A missing source is a
/// [`RaydorError::SourceNotFound`].
pub fn copy_path(src: &Path, dst: &Path) -> Result<()> {
    if src.is_dir() {
        debug!("Copying directory {} -> {}", src.display(), dst.display());
        copy_dir(src, dst)
    } else if src.is_file() {
        let target = match src.file_name() {
            Some(name) if names_directory(dst) || dst.is_dir() => {
                ensure_dir(dst)?;
                dst.join(name)
            }
            _ => {
                ensure_parent_dir(dst)?;
                dst.to_path_buf()
            }
        };
        debug!("Copying file {} -> {}", src.display(), target.display());
        fs::copy(src, &target).with_context(|| {
            format!("Failed to copy file from {} to {}", src.display(), target.display())
        })?;
        Ok(())
    } else {
        Err(RaydorError::SourceNotFound {
            path: src.display().to_string(),
        }
        .into())
    }
}

/// Whether `path` is spelled with a trailing separator (`icons/`).
fn names_directory(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().chars().last().is_some_and(std::path::is_separator)
}

/// Removes a directory tree. A directory that does not exist is not an error.
fn remove_dir_all(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove directory: {}", path.display()))?;
    }
    Ok(())
}

/// Deletes `path` if present and creates it again, empty.
pub fn recreate_dir(path: &Path) -> Result<()> {
    remove_dir_all(path)?;
    ensure_dir(path)
}

/// Renders a path with forward slashes regardless of platform.
///
/// Used wherever paths are compared against manifest patterns. A root or
/// drive prefix is kept, so absolute paths stay absolute.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => out.push('/'),
            Component::CurDir => {}
            Component::ParentDir => push_component(&mut out, ".."),
            Component::Normal(part) => push_component(&mut out, &part.to_string_lossy()),
        }
    }
    out
}

fn push_component(out: &mut String, part: &str) {
    if !out.is_empty() && !out.ends_with('/') {
        out.push('/');
    }
    out.push_str(part);
}
