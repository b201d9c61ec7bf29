use serde::{Deserialize, Serialize};

/// Display classification of the free-text acuity/severity label.
///
/// The label is whatever the capture side typed; classification is a
/// case-insensitive substring match so "Critical - unresponsive" and
/// "severe bleeding" both land in the critical tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcuityLevel {
    Critical,
    Moderate,
    Minor,
    Unknown,
}

impl AcuityLevel {
    /// Classify a free-text acuity or severity label.
    pub fn classify(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return AcuityLevel::Unknown;
        };
        let lower = label.to_lowercase();
        if lower.contains("critical") || lower.contains("severe") {
            AcuityLevel::Critical
        } else if lower.contains("moderate") {
            AcuityLevel::Moderate
        } else if lower.contains("minor") || lower.contains("low") {
            AcuityLevel::Minor
        } else {
            AcuityLevel::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AcuityLevel::Critical => "critical",
            AcuityLevel::Moderate => "moderate",
            AcuityLevel::Minor => "minor",
            AcuityLevel::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn critical_and_severe_map_to_critical() {
        assert_eq!(AcuityLevel::classify(Some("Critical")), AcuityLevel::Critical);
        assert_eq!(AcuityLevel::classify(Some("severe bleeding")), AcuityLevel::Critical);
        assert_eq!(AcuityLevel::classify(Some("CRITICAL - unresponsive")), AcuityLevel::Critical);
    }

    #[test]
    fn moderate_maps_to_moderate() {
        assert_eq!(AcuityLevel::classify(Some("Moderate")), AcuityLevel::Moderate);
    }

    #[test]
    fn minor_and_low_map_to_minor() {
        assert_eq!(AcuityLevel::classify(Some("minor laceration")), AcuityLevel::Minor);
        assert_eq!(AcuityLevel::classify(Some("Low")), AcuityLevel::Minor);
    }

    #[test]
    fn absent_or_unrecognized_is_unknown() {
        assert_eq!(AcuityLevel::classify(None), AcuityLevel::Unknown);
        assert_eq!(AcuityLevel::classify(Some("Stable")), AcuityLevel::Unknown);
    }
}
