//! Detector configuration
//!
//! The scoring constants are empirical calibration, not derived values. They
//! are exposed here as named defaults and can be overridden from a TOML file:
//!
//! ```toml
//! exact_check = true
//!
//! [calibration]
//! reasonable_max = 30.0
//! confidence_threshold = 0.25
//!
//! [limits]
//! max_pattern_input = 262144
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LangSniffError, Result};

/// Snippets shorter than this (in characters, after trimming) are not scored
pub const MIN_LENGTH: usize = 10;
/// Minimum confidence for a result to carry a language
pub const CONFIDENCE_THRESHOLD: f64 = 0.25;
/// A leading score must exceed this to count as a detection at all
pub const SCORE_EPSILON: f64 = 0.1;
/// Score considered "very confident"; scores are divided by it
pub const REASONABLE_MAX: f64 = 30.0;

/// Tunable constants of the confidence model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Calibration {
    pub min_length: usize,
    pub confidence_threshold: f64,
    pub score_epsilon: f64,
    pub reasonable_max: f64,
    /// Above this runner-up/leader ratio the strong damping applies
    pub strong_ambiguity_ratio: f64,
    pub strong_ambiguity_damping: f64,
    /// Above this ratio (and not above the strong one) the weak damping applies
    pub weak_ambiguity_ratio: f64,
    pub weak_ambiguity_damping: f64,
    /// Largest bonus a long snippet can earn
    pub length_boost_cap: f64,
    /// Divisor applied to the snippet length to compute the bonus
    pub length_boost_scale: f64,
    /// Exact-check confidence when the language also has a profile
    pub definitive_confidence: f64,
    /// Exact-check confidence when the language has no profile
    pub unprofiled_confidence: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            min_length: MIN_LENGTH,
            confidence_threshold: CONFIDENCE_THRESHOLD,
            score_epsilon: SCORE_EPSILON,
            reasonable_max: REASONABLE_MAX,
            strong_ambiguity_ratio: 0.7,
            strong_ambiguity_damping: 0.8,
            weak_ambiguity_ratio: 0.5,
            weak_ambiguity_damping: 0.5,
            length_boost_cap: 0.1,
            length_boost_scale: 2000.0,
            definitive_confidence: 0.98,
            unprofiled_confidence: 0.90,
        }
    }
}

/// Bounds on regular-expression work per snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    /// Patterns only see this many leading bytes of a snippet
    pub max_pattern_input: usize,
    /// Backtracking steps allowed per pattern match before it counts as no-match
    pub backtrack_limit: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_pattern_input: 256 * 1024,
            backtrack_limit: 1_000_000,
        }
    }
}

/// Full detector configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub calibration: Calibration,
    pub limits: Limits,
    /// Run the tokenizer-based exact check before heuristic scoring
    pub exact_check: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),
            limits: Limits::default(),
            exact_check: true,
        }
    }
}

impl DetectorConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| LangSniffError::invalid_config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LangSniffError::invalid_config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Per-user config location (`<config dir>/langsniff/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("langsniff").join("config.toml"))
    }

    /// Load the per-user config if one exists, defaults otherwise
    pub fn load_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reject values that would break the confidence model
    pub fn validate(&self) -> Result<()> {
        let c = &self.calibration;

        if c.reasonable_max.is_nan() || c.reasonable_max <= 0.0 {
            return Err(LangSniffError::invalid_config(
                "calibration.reasonable_max must be positive",
            ));
        }
        if c.length_boost_scale.is_nan() || c.length_boost_scale <= 0.0 {
            return Err(LangSniffError::invalid_config(
                "calibration.length_boost_scale must be positive",
            ));
        }

        let unit_fields = [
            ("confidence_threshold", c.confidence_threshold),
            ("strong_ambiguity_ratio", c.strong_ambiguity_ratio),
            ("strong_ambiguity_damping", c.strong_ambiguity_damping),
            ("weak_ambiguity_ratio", c.weak_ambiguity_ratio),
            ("weak_ambiguity_damping", c.weak_ambiguity_damping),
            ("length_boost_cap", c.length_boost_cap),
            ("definitive_confidence", c.definitive_confidence),
            ("unprofiled_confidence", c.unprofiled_confidence),
        ];
        for (name, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(LangSniffError::invalid_config(format!(
                    "calibration.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if c.score_epsilon < 0.0 || c.score_epsilon.is_nan() {
            return Err(LangSniffError::invalid_config(
                "calibration.score_epsilon must not be negative",
            ));
        }
        if self.limits.max_pattern_input == 0 || self.limits.backtrack_limit == 0 {
            return Err(LangSniffError::invalid_config(
                "limits must be greater than zero",
            ));
        }
        Ok(())
    }
}
