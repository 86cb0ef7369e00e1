//! Built-in sensitive-data detectors.
//!
//! Every detector carries its tier, so a non-empty match set always resolves
//! to either Alto or Medio.

use regex::Regex;

/// Risk tier a detector label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Alto,
    Medio,
}

/// Name, tier and pattern of every built-in detector, in report order.
pub const BUILTIN_DETECTORS: &[(&str, Tier, &str)] = &[
    (
        "Codice Fiscale",
        Tier::Alto,
        r"[A-Z]{6}[0-9]{2}[A-Z][0-9]{2}[A-Z][0-9]{3}[A-Z]",
    ),
    ("Email", Tier::Medio, r"[\w\.-]+@[\w\.-]+"),
    ("Telefono", Tier::Medio, r"\b\d{9,11}\b"),
    ("IBAN", Tier::Alto, r"\b[A-Z]{2}\d{2}[A-Z0-9]{11,30}\b"),
    ("Carta di credito", Tier::Alto, r"\b(?:\d[ -]*?){13,16}\b"),
    (
        "Termini sanitari",
        Tier::Alto,
        r"(?i)\b(patologia|farmaco|diagnosi|terapia|esame|tumore|diabete|asma|invalidità)\b",
    ),
    (
        "Religione",
        Tier::Medio,
        r"(?i)\b(cristiano|musulmano|ebraico|ateo|cattolico)\b",
    ),
    (
        "Politica",
        Tier::Medio,
        r"(?i)\b(partito|comunista|fascista|democratico|lega|movimento 5 stelle)\b",
    ),
    ("Sindacati", Tier::Medio, r"(?i)\b(cgil|cisl|uil|sindacato)\b"),
    (
        "Giudiziario",
        Tier::Alto,
        r"(?i)\b(condanna|tribunale|avvocato|processo|penale|ricorso)\b",
    ),
    (
        "Password",
        Tier::Alto,
        r"(?i)\b(pass|password|pwd|passcode|credenziali|login|cred|accesso|accessi)\b",
    ),
];

/// A named, tiered pattern
#[derive(Debug, Clone)]
pub struct Detector {
    pub name: &'static str,
    pub tier: Tier,
    regex: Regex,
}

impl Detector {
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// A label found in a file's text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedLabel {
    pub name: &'static str,
    pub tier: Tier,
}

/// Labels whose detector matched at least once, in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectionResult {
    labels: Vec<DetectedLabel>,
}

impl DetectionResult {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[DetectedLabel] {
        &self.labels
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.labels.iter().map(|l| l.name).collect()
    }

    pub fn has_tier(&self, tier: Tier) -> bool {
        self.labels.iter().any(|l| l.tier == tier)
    }

    /// Serialized form used in the `Tags` column.
    pub fn joined(&self) -> String {
        self.names().join(", ")
    }
}

impl FromIterator<DetectedLabel> for DetectionResult {
    fn from_iter<I: IntoIterator<Item = DetectedLabel>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

/// Immutable set of compiled detectors, built once per process
#[derive(Debug, Clone)]
pub struct DetectorRegistry {
    detectors: Vec<Detector>,
}

impl DetectorRegistry {
    /// Compiles the built-in detector set.
    pub fn builtin() -> Result<Self, regex::Error> {
        Self::from_definitions(BUILTIN_DETECTORS)
    }

    pub fn from_definitions(definitions: &[(&'static str, Tier, &str)]) -> Result<Self, regex::Error> {
        let detectors = definitions
            .iter()
            .map(|&(name, tier, pattern)| {
                Ok(Detector {
                    name,
                    tier,
                    regex: Regex::new(pattern)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { detectors })
    }

    pub fn detectors(&self) -> &[Detector] {
        &self.detectors
    }

    pub fn tier_of(&self, name: &str) -> Option<Tier> {
        self.detectors
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.tier)
    }

    /// Runs every detector against `text`.
    pub fn detect(&self, text: &str) -> DetectionResult {
        self.detectors
            .iter()
            .filter(|d| d.is_match(text))
            .map(|d| DetectedLabel {
                name: d.name,
                tier: d.tier,
            })
            .collect()
    }
}
