//! Display formatting for free-text clinical fields.
//!
//! Intake fields arrive as whatever the capture side typed: plain
//! scalars, comma-separated lists, or JSON-encoded arrays. These
//! helpers normalize all of them into title-cased display strings and
//! always return an owned `String`. Absent values map to documented
//! fallback text, so the presentation layer needs no null checks.

use std::fmt::Display;

/// Title-case each space-separated word: first character uppercased,
/// the rest lowercased.
pub fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a list-like field. A JSON array parses first (string
/// elements title-cased, anything else rendered as-is); otherwise the
/// value is split on commas, trimmed, and title-cased. Both encodings
/// of the same list normalize identically.
pub fn format_list(list: Option<&str>) -> String {
    let Some(list) = list.filter(|s| !s.is_empty()) else {
        return String::new();
    };

    if let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(list) {
        return items
            .iter()
            .map(|item| match item {
                serde_json::Value::String(s) => capitalize_words(s),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");
    }

    list.split(',')
        .map(|item| capitalize_words(item.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Single value with proper capitalization; absent → `"N/A"`.
pub fn format_value<T: Display>(value: Option<T>) -> String {
    match value {
        None => "N/A".to_string(),
        Some(v) => capitalize_words(&v.to_string()),
    }
}

/// Person name; absent → `"Unknown"`.
pub fn format_name(name: Option<&str>) -> String {
    match name.filter(|s| !s.is_empty()) {
        None => "Unknown".to_string(),
        Some(n) => capitalize_words(n),
    }
}

/// Street address; absent → `"No address on file"`.
pub fn format_address(address: Option<&str>) -> String {
    match address.filter(|s| !s.is_empty()) {
        None => "No address on file".to_string(),
        Some(a) => capitalize_words(a),
    }
}

/// Condition/severity label; absent → `"None recorded"`.
pub fn format_medical_condition(condition: Option<&str>) -> String {
    match condition.filter(|s| !s.is_empty()) {
        None => "None recorded".to_string(),
        Some(c) => capitalize_words(c),
    }
}

/// List-shaped medical field (allergies, history, current meds);
/// absent → `"None recorded"`.
pub fn format_medical_conditions(conditions: Option<&str>) -> String {
    match conditions.filter(|s| !s.is_empty()) {
        None => "None recorded".to_string(),
        Some(c) => format_list(Some(c)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_words_title_cases() {
        assert_eq!(capitalize_words("chest pain"), "Chest Pain");
        assert_eq!(capitalize_words("ALTERED MENTAL STATUS"), "Altered Mental Status");
        assert_eq!(capitalize_words(""), "");
    }

    #[test]
    fn json_and_comma_lists_normalize_identically() {
        let from_json = format_list(Some(r#"["chest pain","nausea"]"#));
        let from_csv = format_list(Some("chest pain, nausea"));
        assert_eq!(from_json, "Chest Pain, Nausea");
        assert_eq!(from_csv, from_json);
    }

    #[test]
    fn format_list_passes_non_string_json_elements_through() {
        assert_eq!(format_list(Some(r#"["aspirin", 81]"#)), "Aspirin, 81");
    }

    #[test]
    fn format_list_absent_is_empty() {
        assert_eq!(format_list(None), "");
        assert_eq!(format_list(Some("")), "");
    }

    #[test]
    fn format_value_fallback_and_number() {
        assert_eq!(format_value::<&str>(None), "N/A");
        assert_eq!(format_value(Some(42)), "42");
        assert_eq!(format_value(Some("male")), "Male");
    }

    #[test]
    fn format_name_fallback() {
        assert_eq!(format_name(None), "Unknown");
        assert_eq!(format_name(Some("")), "Unknown");
        assert_eq!(format_name(Some("jane doe")), "Jane Doe");
    }

    #[test]
    fn format_address_fallback() {
        assert_eq!(format_address(None), "No address on file");
        assert_eq!(format_address(Some("12 main st")), "12 Main St");
    }

    #[test]
    fn format_medical_condition_fallbacks_and_casing() {
        assert_eq!(format_medical_condition(None), "None recorded");
        assert_eq!(format_medical_condition(Some("critical")), "Critical");
    }

    #[test]
    fn format_medical_conditions_handles_both_shapes() {
        assert_eq!(format_medical_conditions(None), "None recorded");
        assert_eq!(
            format_medical_conditions(Some(r#"["asthma","copd"]"#)),
            "Asthma, Copd"
        );
        assert_eq!(format_medical_conditions(Some("asthma,copd")), "Asthma, Copd");
    }
}
