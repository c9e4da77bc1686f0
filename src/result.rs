//! Outcome of a single detection call

use std::fmt;

use serde::Serialize;

/// Best language guess for a snippet, with a confidence in `[0.0, 1.0]`.
///
/// A result is a plain value: it is built once per [`Detector::detect`](crate::Detector::detect)
/// call and never mutated. Every constructor clamps the confidence, so a
/// `DetectionResult` is always valid no matter what raw number produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResult {
    language: Option<String>,
    confidence: f64,
}

impl DetectionResult {
    /// Threshold used by [`is_likely`](Self::is_likely)
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    /// Confidence given to a definitive (tokenizer-confirmed) result
    pub const DEFINITIVE_CONFIDENCE: f64 = 0.98;

    /// Create a result, clamping `confidence` to `[0.0, 1.0]` (NaN becomes 0.0)
    pub fn new(language: Option<String>, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            language,
            confidence,
        }
    }

    /// No language detected
    pub fn none() -> Self {
        Self::new(None, 0.0)
    }

    /// A language confirmed by an exact check
    pub fn definitive(language: impl Into<String>) -> Self {
        Self::definitive_with(language, Self::DEFINITIVE_CONFIDENCE)
    }

    pub fn definitive_with(language: impl Into<String>, confidence: f64) -> Self {
        Self::new(Some(language.into()), confidence)
    }

    /// Language identifier (e.g. `"php"`), or `None` when no guess cleared the threshold
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// True when a language is present and its confidence reaches `threshold`
    pub fn is_confident(&self, threshold: f64) -> bool {
        self.language.is_some() && self.confidence >= threshold
    }

    /// [`is_confident`](Self::is_confident) at [`DEFAULT_THRESHOLD`](Self::DEFAULT_THRESHOLD)
    pub fn is_likely(&self) -> bool {
        self.is_confident(Self::DEFAULT_THRESHOLD)
    }

    pub fn into_language(self) -> Option<String> {
        self.language
    }
}

impl fmt::Display for DetectionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(lang) => write!(f, "{} ({:.2})", lang, self.confidence),
            None => write!(f, "unknown ({:.2})", self.confidence),
        }
    }
}
