//! Markdown to HTML conversion.
//!
//! Uses pulldown-cmark with tables, strikethrough and task lists enabled, plus
//! two site-level tweaks configured through [`MarkdownOptions`]:
//!
//! - **Substitutions**: literal strings in text nodes replaced with raw HTML,
//!   e.g. `'` → `&#8217;` and `...` → `&#8230;`. Code spans and code blocks are
//!   never touched.
//! - **Code highlighting**: when enabled, code blocks are wrapped in
//!   `<div class="codehilite" data-style="...">` with a `language-*` class on the
//!   `<code>` element, ready for a client-side highlighter and its theme.
//!
//! ```rust,no_run
//! use raydor::markdown::{MarkdownOptions, to_html};
//!
//! let html = to_html("It's *done*...", &MarkdownOptions::default());
//! assert_eq!(html, "<p>It&#8217;s <em>done</em>&#8230;</p>\n");
//! ```

pub mod frontmatter;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html::push_html};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Style name used when highlighting is enabled without an explicit style.
pub const DEFAULT_HIGHLIGHT_STYLE: &str = "default";

/// Code-block highlighting settings, from the manifest's `codehighlight` key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HighlightConfig {
    /// Theme name emitted as `data-style` on the wrapper element.
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_style() -> String {
    DEFAULT_HIGHLIGHT_STYLE.to_string()
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            style: default_style(),
        }
    }
}

/// Options for [`to_html`], built once from the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    /// Literal text → raw HTML replacements applied to text nodes.
    pub substitutions: BTreeMap<String, String>,
    /// Code highlighting, if enabled.
    pub highlight: Option<HighlightConfig>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            substitutions: default_substitutions(),
            highlight: None,
        }
    }
}

impl MarkdownOptions {
    /// Merge extra substitutions over the current table; later keys win.
    pub fn extend_substitutions<I>(&mut self, extra: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.substitutions.extend(extra);
    }
}

/// The smart-punctuation replacements every site starts with.
#[must_use]
pub fn default_substitutions() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("'".to_string(), "&#8217;".to_string()),
        ("...".to_string(), "&#8230;".to_string()),
    ])
}

/// Convert Markdown text to HTML.
#[must_use]
pub fn to_html(text: &str, options: &MarkdownOptions) -> String {
    let parser_options =
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS | Options::ENABLE_TABLES;
    let parser = Parser::new_ext(text, parser_options);

    // Longest key first so "..." wins over "." at the same position.
    let mut keys: Vec<(&str, &str)> = options
        .substitutions
        .iter()
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

    let mut events: Vec<Event<'_>> = Vec::new();
    // (language, collected code) while inside a block that will be highlighted
    let mut code_block: Option<(String, String)> = None;
    let mut in_plain_code = false;
    // Alt text is escaped again by the writer, so substitutions stay out of it.
    let mut image_depth = 0usize;

    for event in parser {
        match event {
            Event::Start(Tag::Image { .. }) => {
                image_depth += 1;
                events.push(event);
            }
            Event::End(TagEnd::Image) => {
                image_depth = image_depth.saturating_sub(1);
                events.push(event);
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                if options.highlight.is_some() {
                    let lang = match &kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().unwrap_or_default().to_string()
                        }
                        CodeBlockKind::Indented => String::new(),
                    };
                    code_block = Some((lang, String::new()));
                } else {
                    in_plain_code = true;
                    events.push(Event::Start(Tag::CodeBlock(kind)));
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((lang, code)) = code_block.take() {
                    let style = options
                        .highlight
                        .as_ref()
                        .map_or(DEFAULT_HIGHLIGHT_STYLE, |h| h.style.as_str());
                    events.push(Event::Html(CowStr::from(highlighted_block(&lang, &code, style))));
                } else {
                    in_plain_code = false;
                    events.push(Event::End(TagEnd::CodeBlock));
                }
            }
            Event::Text(content) => {
                if let Some((_, code)) = code_block.as_mut() {
                    code.push_str(&content);
                } else if in_plain_code || image_depth > 0 || keys.is_empty() {
                    events.push(Event::Text(content));
                } else {
                    match substitute(&content, &keys) {
                        Some(html) => events.push(Event::InlineHtml(CowStr::from(html))),
                        None => events.push(Event::Text(content)),
                    }
                }
            }
            other => events.push(other),
        }
    }

    let mut html = String::with_capacity(text.len() * 2);
    push_html(&mut html, events.into_iter());
    html
}

/// Apply substitutions to one text node, escaping everything else.
///
/// Returns `None` when nothing matched so the event can stay plain text.
fn substitute(text: &str, keys: &[(&str, &str)]) -> Option<String> {
    let mut out = String::with_capacity(text.len() + 16);
    let mut matched = false;
    let mut rest = text;

    while !rest.is_empty() {
        if let Some((key, replacement)) = keys.iter().find(|(k, _)| rest.starts_with(k)) {
            out.push_str(replacement);
            rest = &rest[key.len()..];
            matched = true;
            continue;
        }
        let Some(ch) = rest.chars().next() else {
            break;
        };
        escape_char(ch, &mut out);
        rest = &rest[ch.len_utf8()..];
    }

    matched.then_some(out)
}

fn highlighted_block(lang: &str, code: &str, style: &str) -> String {
    let mut out = String::with_capacity(code.len() + 96);
    out.push_str("<div class=\"codehilite\" data-style=\"");
    out.push_str(&escape_html(style));
    out.push_str("\"><pre><code");
    if !lang.is_empty() {
        out.push_str(" class=\"language-");
        out.push_str(&escape_html(lang));
        out.push('"');
    }
    out.push('>');
    out.push_str(&escape_html(code));
    out.push_str("</code></pre></div>\n");
    out
}

fn escape_char(ch: char, out: &mut String) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(ch),
    }
}

/// Escape text for inclusion in HTML element content or attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        escape_char(ch, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_substitutions() {
        let html = to_html("It's done...", &MarkdownOptions::default());
        assert_eq!(html, "<p>It&#8217;s done&#8230;</p>\n");
    }

    #[test]
    fn test_text_without_substitution_is_escaped_normally() {
        let html = to_html("a < b & c", &MarkdownOptions::default());
        assert_eq!(html, "<p>a &lt; b &amp; c</p>\n");
    }

    #[test]
    fn test_substituted_text_is_still_escaped() {
        let html = to_html("Tom's 3 < 4", &MarkdownOptions::default());
        assert!(html.contains("Tom&#8217;s 3 &lt; 4"), "{html}");
    }

    #[test]
    fn test_custom_substitutions_merge() {
        let mut options = MarkdownOptions::default();
        options.extend_substitutions([("--".to_string(), "&#8211;".to_string())]);
        let html = to_html("a -- b's", &options);
        assert_eq!(html, "<p>a &#8211; b&#8217;s</p>\n");
    }

    #[test]
    fn test_code_is_not_substituted() {
        let html = to_html("`it's`\n\n```\nwait...\n```\n", &MarkdownOptions::default());
        assert!(html.contains("<code>it's</code>"), "{html}");
        assert!(html.contains("wait...\n</code></pre>"), "{html}");
    }

    #[test]
    fn test_image_alt_text_is_not_substituted() {
        let html = to_html("![It's](x.png) it's", &MarkdownOptions::default());
        assert_eq!(html, "<p><img src=\"x.png\" alt=\"It's\" /> it&#8217;s</p>\n");
    }

    #[test]
    fn test_highlighted_code_block() {
        let options = MarkdownOptions {
            highlight: Some(HighlightConfig {
                style: "monokai".to_string(),
            }),
            ..MarkdownOptions::default()
        };
        let html = to_html("```rust\nfn main() { a < b }\n```\n", &options);
        assert_eq!(
            html,
            "<div class=\"codehilite\" data-style=\"monokai\"><pre><code class=\"language-rust\">fn main() { a &lt; b }\n</code></pre></div>\n"
        );
    }

    #[test]
    fn test_plain_code_block_without_highlight() {
        let html = to_html("```rust\nlet x = 1;\n```\n", &MarkdownOptions::default());
        assert_eq!(html, "<pre><code class=\"language-rust\">let x = 1;\n</code></pre>\n");
    }

    #[test]
    fn test_tables_enabled() {
        let html = to_html("| a | b |\n|---|---|\n| 1 | 2 |\n", &MarkdownOptions::default());
        assert!(html.contains("<table>"));
    }
}
