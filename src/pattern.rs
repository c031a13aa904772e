//! Glob enumeration and `%` generator patterns.
//!
//! Two kinds of patterns appear in a manifest:
//!
//! - **Data globs** such as `src/blog/*.md`, used inside template variables.
//!   [`PatternMatcher`] enumerates the files they match under the site root.
//! - **Generator patterns** such as `src/blog/%.md`, with exactly one `%`.
//!   [`GeneratorPattern`] turns one into a glob (`%` becomes `*`) and a
//!   capturing regex, so each matched file yields the substring to substitute
//!   into the output pattern (`posts/%.html`).
//!
//! # Pattern Syntax
//!
//! - `*` matches any sequence of characters within a single path component
//! - `**` matches any sequence of path components
//! - `?` matches any single character
//! - `[abc]` matches any character in the set
//!
//! Wildcards never match a leading `.`, so `src/blog/*.md` skips
//! `src/blog/.draft.md`. Symlinked files and directories are followed.
//!
//! Paths are compared with forward slashes on every platform and results are
//! always sorted lexicographically, so builds do not depend on directory
//! iteration order.
//!
//! # Examples
//!
//! ```rust,no_run
//! use raydor::pattern::GeneratorPattern;
//!
//! # fn example() -> anyhow::Result<()> {
//! let source = GeneratorPattern::parse("src/blog/%.md")?;
//! let output = GeneratorPattern::parse("posts/%.html")?;
//!
//! assert_eq!(source.glob(), "src/blog/*.md");
//! let name = source.capture("src/blog/test.md").unwrap();
//! assert_eq!(output.substitute(name), "posts/test.html");
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::core::RaydorError;
use crate::utils::to_slash;

/// The wildcard marker in generator patterns.
pub const GENERATOR_MARKER: char = '%';

const GLOB_META: [char; 3] = ['*', '?', '['];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Glob matcher for files below a base directory.
///
/// # Examples
///
/// ```rust,no_run
/// use raydor::pattern::PatternMatcher;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// let matcher = PatternMatcher::new("src/blog/*.md")?;
///
/// assert!(matcher.matches("src/blog/test.md"));
/// assert!(!matcher.matches("src/blog/drafts/old.md"));
///
/// let matches = matcher.find_matches(Path::new("/path/to/site"))?;
/// println!("Found {} posts", matches.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Pattern,
    original_pattern: String,
}

impl PatternMatcher {
    /// Compile a glob pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern has invalid glob syntax.
    pub fn new(pattern_str: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern_str)
            .with_context(|| format!("Invalid glob pattern: {pattern_str}"))?;

        Ok(Self {
            pattern,
            original_pattern: pattern_str.to_string(),
        })
    }

    /// Finds all files matching the pattern below `base_path`.
    ///
    /// Returns paths relative to `base_path`, sorted lexicographically. An
    /// absolute pattern is walked from its own prefix and yields absolute
    /// paths. The walk starts at the pattern's literal directory prefix and
    /// follows symlinks. A prefix directory that does not exist yields no
    /// matches.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory below the prefix cannot be read or a
    /// symlink loop is found.
    pub fn find_matches(&self, base_path: &Path) -> Result<Vec<PathBuf>> {
        let prefix = literal_prefix(&self.original_pattern);
        let absolute = Path::new(&self.original_pattern).is_absolute();
        let walk_root = base_path.join(prefix);
        debug!("Searching for pattern '{}' in {}", self.original_pattern, walk_root.display());

        if !walk_root.is_dir() {
            debug!("No directory {} for pattern '{}'", walk_root.display(), self.original_pattern);
            return Ok(Vec::new());
        }

        let mut walker = WalkDir::new(&walk_root).follow_links(true);
        if let Some(depth) = walk_depth(&self.original_pattern[prefix.len()..]) {
            walker = walker.max_depth(depth);
        }

        let mut matches = Vec::new();
        for entry in walker {
            let entry = entry
                .with_context(|| format!("Failed to walk directory: {}", walk_root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let candidate = if absolute {
                entry.path()
            } else {
                let Ok(relative_path) = entry.path().strip_prefix(base_path) else {
                    continue;
                };
                relative_path
            };
            let candidate_str = to_slash(candidate);
            trace!("Checking path: {candidate_str}");

            if self.matches(&candidate_str) {
                matches.push(candidate.to_path_buf());
            }
        }

        matches.sort();
        debug!("Found {} matches for pattern '{}'", matches.len(), self.original_pattern);
        Ok(matches)
    }

    /// Checks a forward-slash relative path against the pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.matches_with(path, MATCH_OPTIONS)
    }

    /// The pattern string as written.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.original_pattern
    }
}

/// The directory part of a glob before its first wildcard.
///
/// `src/blog/*.md` gives `src/blog`, `*.md` gives the empty string and
/// `/*.md` gives `/`.
fn literal_prefix(pattern: &str) -> &str {
    let literal = pattern.find(GLOB_META).map_or(pattern, |idx| &pattern[..idx]);
    match literal.rfind('/') {
        Some(0) => &literal[..1],
        Some(idx) => &literal[..idx],
        None => "",
    }
}

/// How deep below the prefix a pattern can reach; `None` once `**` appears.
fn walk_depth(rest: &str) -> Option<usize> {
    if rest.contains("**") {
        return None;
    }
    Some(rest.trim_start_matches('/').matches('/').count() + 1)
}

/// A pattern with exactly one `%` wildcard.
///
/// Used both for the source side of a generator (to find and capture files)
/// and for the output side (to substitute the captured text).
#[derive(Debug, Clone)]
pub struct GeneratorPattern {
    original: String,
    before: String,
    after: String,
    regex: Regex,
}

impl GeneratorPattern {
    /// Parse a pattern containing exactly one `%`.
    ///
    /// # Errors
    ///
    /// [`RaydorError::InvalidPattern`] when the marker is missing or repeated.
    pub fn parse(pattern: &str) -> Result<Self, RaydorError> {
        let count = pattern.matches(GENERATOR_MARKER).count();
        if count != 1 {
            return Err(RaydorError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: format!("expected exactly one '{GENERATOR_MARKER}', found {count}"),
            });
        }

        let (before, after) =
            pattern.split_once(GENERATOR_MARKER).ok_or_else(|| RaydorError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: format!("missing '{GENERATOR_MARKER}'"),
            })?;

        let regex = Regex::new(&format!(
            r"(?s)\A{}(.*){}\z",
            regex::escape(before),
            regex::escape(after)
        ))
        .map_err(|e| RaydorError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            original: pattern.to_string(),
            before: before.to_string(),
            after: after.to_string(),
            regex,
        })
    }

    /// The glob matching every candidate path: `%` becomes `*`, the rest is literal.
    #[must_use]
    pub fn glob(&self) -> String {
        format!("{}*{}", Pattern::escape(&self.before), Pattern::escape(&self.after))
    }

    /// The text bound to `%` in `path`, or `None` if the path does not fit.
    #[must_use]
    pub fn capture<'p>(&self, path: &'p str) -> Option<&'p str> {
        self.regex.captures(path).and_then(|caps| caps.get(1)).map(|m| m.as_str())
    }

    /// Replace `%` with `captured`.
    #[must_use]
    pub fn substitute(&self, captured: &str) -> String {
        format!("{}{captured}{}", self.before, self.after)
    }

    /// The pattern as written in the manifest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.original
    }
}

/// Rejects output paths that would escape the output directory.
///
/// Output keys must be relative and must not contain `..` components.
///
/// ```rust,no_run
/// use raydor::pattern::validate_output_path;
///
/// assert!(validate_output_path("blog/test.html").is_ok());
/// assert!(validate_output_path("images/").is_ok());
/// assert!(validate_output_path("../etc/passwd").is_err());
/// assert!(validate_output_path("/etc/passwd").is_err());
/// ```
pub fn validate_output_path(key: &str) -> Result<(), RaydorError> {
    let invalid = |reason: &str| RaydorError::InvalidManifestEntry {
        key: key.to_string(),
        reason: reason.to_string(),
    };

    if key.is_empty() {
        return Err(invalid("output path is empty"));
    }

    if key.starts_with('/') || key.starts_with('\\') || Path::new(key).is_absolute() {
        return Err(invalid("output path must be relative to the output directory"));
    }

    if cfg!(windows) && key.contains(':') {
        return Err(invalid("output path must be relative to the output directory"));
    }

    if key.split(['/', '\\']).any(|component| component == "..") {
        return Err(invalid("output path contains path traversal (..)"));
    }

    Ok(())
}
