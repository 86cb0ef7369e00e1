use std::fmt;

use regex::{Regex, RegexBuilder};

use super::registry::{DetectionResult, DetectorRegistry, Tier};

/// Risk assigned to a file. Ordered so that `Alto` is the greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    NonClassificato,
    Medio,
    Alto,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Alto => "Alto",
            RiskLevel::Medio => "Medio",
            RiskLevel::NonClassificato => "NonClassificato",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a match set into a risk level. Alto dominates Medio.
pub fn classify(result: &DetectionResult) -> RiskLevel {
    if result.is_empty() {
        RiskLevel::NonClassificato
    } else if result.has_tier(Tier::Alto) {
        RiskLevel::Alto
    } else {
        RiskLevel::Medio
    }
}

/// Case-insensitive pattern a file's text must contain to be reported
#[derive(Debug, Clone)]
pub struct ContentFilter {
    regex: Regex,
}

impl ContentFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Outcome of matching one file's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub detection: DetectionResult,
    pub risk: RiskLevel,
}

/// Gate, detect and classify `text`.
///
/// Returns `None` when a content filter is set and the text does not match it.
pub fn assess(
    text: &str,
    filter: Option<&ContentFilter>,
    registry: &DetectorRegistry,
) -> Option<Assessment> {
    if let Some(filter) = filter
        && !filter.is_match(text)
    {
        return None;
    }

    let detection = registry.detect(text);
    let risk = classify(&detection);
    Some(Assessment { detection, risk })
}
