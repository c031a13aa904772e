//! Custom Tera filters for site templates.
//!
//! | Filter | Example | Result |
//! |---|---|---|
//! | `markdown` | `{{ page.intro \| markdown }}` | HTML, not escaped again |
//! | `datetime` | `{{ post.date \| datetime(fmt="%B %d, %Y") }}` | `March 04, 2022` |
//! | `limit` | `{{ post.summary \| limit(delim=".", n=2) }}` | first two sentences + ` ...` |
//!
//! `datetime` accepts the output of `date -Iminutes` (`2022-03-04T12:34+01:00`),
//! RFC 3339 timestamps, naive date-times, plain dates and integer unix
//! timestamps. `limit` returns the text unchanged when it has fewer than `n`
//! delimiters.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fmt::Write;
use tera::{Tera, Value};

use crate::markdown::{self, MarkdownOptions};

/// Register every site filter on `tera`.
pub fn register(tera: &mut Tera, markdown: MarkdownOptions) {
    tera.register_filter("markdown", MarkdownFilter::new(markdown));
    tera.register_filter("datetime", datetime_filter);
    tera.register_filter("limit", limit_filter);
}

/// Converts Markdown to HTML with the site's substitutions and highlighting.
pub struct MarkdownFilter {
    options: MarkdownOptions,
}

impl MarkdownFilter {
    /// Create the filter with the options it will convert with.
    #[must_use]
    pub const fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
        }
    }
}

impl tera::Filter for MarkdownFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| tera::Error::msg("markdown filter requires a string"))?;
        Ok(Value::String(markdown::to_html(text, &self.options)))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// Naive formats tried in order after RFC 3339 and `date -Iminutes`.
const NAIVE_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

fn parse_timestamp(value: &Value) -> tera::Result<Timestamp> {
    if let Some(seconds) = value.as_i64() {
        return DateTime::from_timestamp(seconds, 0)
            .map(|utc| Timestamp::Zoned(utc.fixed_offset()))
            .ok_or_else(|| tera::Error::msg(format!("datetime: timestamp {seconds} out of range")));
    }

    let text = value.as_str().ok_or_else(|| {
        tera::Error::msg("datetime filter requires an ISO 8601 string or a unix timestamp")
    })?;

    if let Ok(zoned) = DateTime::parse_from_rfc3339(text) {
        return Ok(Timestamp::Zoned(zoned));
    }
    if let Ok(zoned) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M%:z") {
        return Ok(Timestamp::Zoned(zoned));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Timestamp::Naive(naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Timestamp::Naive)
        .ok_or_else(|| tera::Error::msg(format!("datetime: '{text}' is not an ISO 8601 date")))
}

/// `datetime(fmt=...)`: format a date or date-time with a strftime string.
pub fn datetime_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let fmt = args
        .get("fmt")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("datetime filter requires a `fmt` string argument"))?;

    let items: Vec<Item<'_>> = StrftimeItems::new(fmt).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(tera::Error::msg(format!("datetime: invalid format string '{fmt}'")));
    }

    let mut out = String::new();
    let written = match parse_timestamp(value)? {
        Timestamp::Zoned(zoned) => write!(out, "{}", zoned.format_with_items(items.iter())),
        Timestamp::Naive(naive) => write!(out, "{}", naive.format_with_items(items.iter())),
    };
    written.map_err(|_| {
        tera::Error::msg(format!("datetime: format '{fmt}' needs a time zone the value does not have"))
    })?;

    Ok(Value::String(out))
}

/// `limit(delim=..., n=...)`: cut the text after the `n`-th delimiter.
///
/// Use `delim=" "` to limit words and `delim="."` to limit sentences.
pub fn limit_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text =
        value.as_str().ok_or_else(|| tera::Error::msg("limit filter requires a string"))?;
    let delim = args
        .get("delim")
        .and_then(Value::as_str)
        .ok_or_else(|| tera::Error::msg("limit filter requires a `delim` string argument"))?;
    let n = args
        .get("n")
        .and_then(Value::as_u64)
        .ok_or_else(|| tera::Error::msg("limit filter requires a non-negative integer `n`"))?;

    if delim.is_empty() {
        return Err(tera::Error::msg("limit filter requires a non-empty `delim`"));
    }

    let mut pos = 0;
    for _ in 0..n {
        match text[pos..].find(delim) {
            Some(idx) => pos += idx + delim.len(),
            None => return Ok(Value::String(text.to_string())),
        }
    }

    Ok(Value::String(format!("{} ...", &text[..pos])))
}
