//! Splitting Markdown sources into frontmatter metadata and body.
//!
//! A document must look exactly like
//!
//! ```text
//! ---
//! title: Hello
//! date: 2022-03-04T12:34+01:00
//! ---
//! The body, in Markdown.
//! ```
//!
//! The opening delimiter must be the very first line, the metadata block ends at
//! the first `\n---\n`, and everything after it is the body. There is no fallback
//! for documents without frontmatter: they are rejected as malformed.
//! Windows line endings are accepted once passed through [`normalize_newlines`].

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Metadata and body text of a Markdown document, borrowed from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontmatterSplit<'a> {
    /// The raw YAML between the two `---` lines (without delimiters).
    pub metadata: &'a str,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

fn frontmatter_regex() -> Option<&'static Regex> {
    static FRONTMATTER: OnceLock<Option<Regex>> = OnceLock::new();
    FRONTMATTER.get_or_init(|| Regex::new(r"(?s)\A---\n(.*?)\n---\n(.*)\z").ok()).as_ref()
}

/// Rewrite `\r\n` line endings to `\n`, borrowing when there are none.
#[must_use]
pub fn normalize_newlines(content: &str) -> Cow<'_, str> {
    if content.contains("\r\n") {
        Cow::Owned(content.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(content)
    }
}

/// Split a document into metadata and body.
///
/// Returns `None` when the document does not have the exact delimiter structure,
/// including when the closing `---` line is missing.
#[must_use]
pub fn split(content: &str) -> Option<FrontmatterSplit<'_>> {
    let captures = frontmatter_regex()?.captures(content)?;
    let metadata = captures.get(1)?.as_str();
    let body = captures.get(2)?.as_str();
    Some(FrontmatterSplit {
        metadata,
        body,
    })
}

/// Describe why [`split`] rejected a document, for error messages.
#[must_use]
pub fn diagnose(content: &str) -> &'static str {
    if !content.starts_with("---\n") {
        "document must start with a '---' line"
    } else if !content[4..].contains("\n---\n") {
        "missing closing '---' line after the metadata block"
    } else {
        "frontmatter delimiters do not match '---\\n<metadata>\\n---\\n<body>'"
    }
}
