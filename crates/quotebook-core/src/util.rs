//! Shared utility functions used across multiple modules.

use chrono::{DateTime, Utc};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Current Unix timestamp in milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// First character of the uppercased value, or `#` when it is empty.
///
/// Uppercasing the whole string first keeps the initial consistent with
/// text sort keys when one character expands to several (`ß` -> `SS`).
pub fn initial_of(value: &str) -> String {
    value
        .to_uppercase()
        .chars()
        .next()
        .map_or_else(|| "#".to_string(), String::from)
}

/// Lowercase `value` and strip combining diacritics, so `Café` folds to `cafe`.
pub fn fold_for_search(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

fn datetime_from_ms(timestamp_ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(timestamp_ms).unwrap_or_default()
}

/// Section label for the calendar month of a timestamp, e.g. `October 2026`.
pub fn month_label(timestamp_ms: i64) -> String {
    datetime_from_ms(timestamp_ms).format("%B %Y").to_string()
}

/// Section label for the calendar day of a timestamp, e.g. `2026-10-18`.
pub fn day_label(timestamp_ms: i64) -> String {
    datetime_from_ms(timestamp_ms).format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
    }

    #[test]
    fn normalize_text_option_trims_value() {
        assert_eq!(
            normalize_text_option(Some(" Seneca ".to_string())),
            Some("Seneca".to_string())
        );
    }

    #[test]
    fn initial_follows_whole_string_uppercase() {
        assert_eq!(initial_of("stoa"), "S");
        assert_eq!(initial_of("ßb"), "S");
        assert_eq!(initial_of("ﬁne"), "F");
        assert_eq!(initial_of("éloge"), "É");
        assert_eq!(initial_of(""), "#");
    }

    #[test]
    fn fold_for_search_drops_case_and_accents() {
        assert_eq!(fold_for_search("Café"), "cafe");
        assert_eq!(fold_for_search("NIETZSCHE"), "nietzsche");
        assert_eq!(fold_for_search("Ça va"), "ca va");
    }

    #[test]
    fn month_and_day_labels() {
        // 2021-12-07T12:00:00Z
        let ts = 1_638_878_400_000;
        assert_eq!(month_label(ts), "December 2021");
        assert_eq!(day_label(ts), "2021-12-07");
    }
}
