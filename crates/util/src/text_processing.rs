//! # Text Processing Utilities
//!
//! Case-insensitive matching helpers used by navigation search, plus
//! display-width aware truncation for rendering labels in fixed-width cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Normalizes a free-text query for matching.
///
/// Returns `None` for empty or whitespace-only input so callers can skip
/// evaluation entirely.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Case-insensitive substring test. `needle_lower` must already be lowercased
/// (see [`normalize_query`]).
pub fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Truncates `text` to at most `max_width` display columns, appending an
/// ellipsis when anything was cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Interprets common truthy spellings used in environment variables.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enable" | "enabled"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_queries_normalize_to_none() {
        assert_eq!(normalize_query(""), None);
        assert_eq!(normalize_query("   \t"), None);
        assert_eq!(normalize_query("  Sensor "), Some("sensor".to_string()));
    }

    #[test]
    fn matching_ignores_case() {
        assert!(contains_ignore_case("Room Sensors", "sensor"));
        assert!(contains_ignore_case("DUCT", "duct"));
        assert!(!contains_ignore_case("Gateways", "sensor"));
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate_to_width("Products", 20), "Products");
        assert_eq!(truncate_to_width("Differential Pressure", 8), "Differe…");
        assert_eq!(truncate_to_width("日本語テキスト", 5), "日本…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn truthy_values() {
        assert!(is_truthy("Yes"));
        assert!(is_truthy(" 1 "));
        assert!(!is_truthy("off"));
    }
}
