//! Sensitive-data detection and risk classification

pub mod classify;
pub mod registry;

pub use classify::{Assessment, ContentFilter, RiskLevel, assess, classify};
pub use registry::{BUILTIN_DETECTORS, DetectedLabel, DetectionResult, Detector, DetectorRegistry, Tier};
