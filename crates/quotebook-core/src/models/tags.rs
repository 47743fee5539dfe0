//! Comma-separated tag strings
//!
//! Quotes store their tags as a single display string (`"philosophy, stoicism"`).
//! Everything that writes that string goes through [`normalize_tags`] so the
//! stored form is always trimmed, de-duplicated and joined by `", "`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

const TAG_SEPARATOR: &str = ", ";

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("Invalid regex"))
}

/// How a bulk tag edit combines with the tags a quote already has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagsEditMode {
    /// Discard existing tags and use the new value
    #[default]
    Replace,
    /// Append new tags that are not already present
    Add,
    /// Drop existing tags that appear in the new value
    Remove,
}

/// Split a comma-separated tag string into clean tags.
///
/// Each tag is trimmed and has inner whitespace collapsed; empty entries are
/// dropped and later case-insensitive duplicates are discarded, keeping the
/// first spelling and the original order.
///
/// # Examples
///
/// ```
/// use quotebook_core::models::parse_tags;
///
/// let tags = parse_tags(" stoicism,  Latin ,STOICISM,, ");
/// assert_eq!(tags, vec!["stoicism", "Latin"]);
/// ```
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.split(',')
        .map(|tag| whitespace_run().replace_all(tag.trim(), " ").into_owned())
        .filter(|tag| !tag.is_empty())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .collect()
}

/// Join tags into the stored display form.
#[must_use]
pub fn format_tags(tags: &[String]) -> String {
    tags.join(TAG_SEPARATOR)
}

/// Normalize a raw tag string into its stored form.
#[must_use]
pub fn normalize_tags(raw: &str) -> String {
    format_tags(&parse_tags(raw))
}

/// Combine `current` tags with `value` according to `mode`.
#[must_use]
pub fn apply_tags_edit(current: &str, mode: TagsEditMode, value: &str) -> String {
    match mode {
        TagsEditMode::Replace => normalize_tags(value),
        TagsEditMode::Add => {
            let mut combined = current.to_string();
            combined.push(',');
            combined.push_str(value);
            normalize_tags(&combined)
        }
        TagsEditMode::Remove => {
            let removed: HashSet<String> = parse_tags(value)
                .into_iter()
                .map(|tag| tag.to_lowercase())
                .collect();
            let kept: Vec<String> = parse_tags(current)
                .into_iter()
                .filter(|tag| !removed.contains(&tag.to_lowercase()))
                .collect();
            format_tags(&kept)
        }
    }
}
