//! Heuristic language detection
//!
//! Every profile in the store is scored against the trimmed snippet:
//!
//! 1. The first marker that prefixes the snippet adds its weight; later
//!    markers are not consulted.
//! 2. Every keyword found case-insensitively adds its weight.
//! 3. Every pattern that matches adds its weight. Patterns see the original
//!    case, clipped to `limits.max_pattern_input` bytes.
//! 4. Every negative keyword found case-insensitively adds its (negative) weight.
//!
//! The sum is floored at zero. The leader and runner-up of one pass over the
//! table (in table order, so ties go to the earlier profile) are then turned
//! into a confidence by [`confidence`].

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::{Calibration, DetectorConfig};
use crate::error::Result;
use crate::exact::{ExactCheck, PhpExactCheck};
use crate::profile::LanguageProfile;
use crate::result::DetectionResult;
use crate::store::ProfileStore;
use crate::utils::{clip_to_char_boundary, snippet_preview};

/// Bytes of snippet shown in debug logs
const PREVIEW_BYTES: usize = 60;

/// Score of one profile, split by signal kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageScore {
    pub language: String,
    /// Final score: the component sum floored at zero
    pub total: f64,
    pub marker: f64,
    pub keywords: f64,
    pub patterns: f64,
    /// Sum of negative-keyword weights (zero or below for sane profiles)
    pub penalties: f64,
}

/// Leader and runner-up of a ranking pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranking<'a> {
    pub leader: &'a str,
    pub max: f64,
    pub second: f64,
}

/// Pick the highest and second-highest score in one pass.
///
/// A score equal to the current maximum does not take the lead but does
/// become the runner-up, so for a tie at the top `second == max`. Both
/// values are exact for any iteration order. Returns `None` for an empty input.
pub fn rank<'a, I>(scores: I) -> Option<Ranking<'a>>
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    let mut leader = None;
    let mut max = -1.0;
    let mut second = -1.0;

    for (language, score) in scores {
        if score > max {
            second = max;
            max = score;
            leader = Some(language);
        } else if score > second {
            second = score;
        }
    }

    leader.map(|leader| Ranking {
        leader,
        max,
        second,
    })
}

/// Turn the leading scores and snippet length into a confidence in `[0, 1]`.
///
/// `length` is the trimmed snippet length in characters.
pub fn confidence(calibration: &Calibration, max: f64, second: f64, length: usize) -> f64 {
    let c = calibration;
    let mut confidence = (max / c.reasonable_max).min(1.0);

    if second > 0.0 && max > 0.0 {
        let ratio = second / max;
        if ratio > c.strong_ambiguity_ratio {
            confidence *= 1.0 - ratio * c.strong_ambiguity_damping;
        } else if ratio > c.weak_ambiguity_ratio {
            confidence *= 1.0 - ratio * c.weak_ambiguity_damping;
        }
    }

    let length_boost = (length as f64 / c.length_boost_scale).min(c.length_boost_cap);
    (confidence + length_boost).min(1.0)
}

/// Scores snippets against a [`ProfileStore`].
///
/// A detector is immutable once built and can be shared across threads.
pub struct Detector {
    store: ProfileStore,
    config: DetectorConfig,
    exact_check: Option<Box<dyn ExactCheck>>,
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("languages", &self.store.len())
            .field("config", &self.config)
            .field(
                "exact_check",
                &self.exact_check.as_ref().map(|check| check.language()),
            )
            .finish()
    }
}

impl Detector {
    /// Detector with default calibration and the PHP exact check
    pub fn new(store: ProfileStore) -> Self {
        Self {
            store,
            config: DetectorConfig::default(),
            exact_check: Some(Box::new(PhpExactCheck)),
        }
    }

    /// Detector with explicit configuration.
    ///
    /// `config.limits.backtrack_limit` has to reach the store through
    /// [`ProfileStoreBuilder::limits`](crate::ProfileStoreBuilder::limits);
    /// patterns are already compiled by the time they reach the detector, so
    /// a store compiled with a different limit is reported and kept as is.
    pub fn with_config(store: ProfileStore, config: DetectorConfig) -> Result<Self> {
        config.validate()?;
        if store.backtrack_limit() != config.limits.backtrack_limit {
            warn!(
                "Store patterns were compiled with backtrack limit {}, configured limit {} is not applied",
                store.backtrack_limit(),
                config.limits.backtrack_limit
            );
        }
        let exact_check: Option<Box<dyn ExactCheck>> = if config.exact_check {
            Some(Box::new(PhpExactCheck))
        } else {
            None
        };
        Ok(Self {
            store,
            config,
            exact_check,
        })
    }

    /// Detector over the bundled profiles
    #[cfg(feature = "embedded-profiles")]
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(ProfileStore::builtin()?))
    }

    /// Replace the exact pre-check
    pub fn with_exact_check(mut self, check: Box<dyn ExactCheck>) -> Self {
        self.exact_check = Some(check);
        self
    }

    /// Score every snippet heuristically, with no pre-check
    pub fn without_exact_check(mut self) -> Self {
        self.exact_check = None;
        self
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Best language guess for `code`
    pub fn detect(&self, code: &str) -> DetectionResult {
        let c = &self.config.calibration;
        let code = code.trim();
        let length = code.chars().count();

        if length < c.min_length {
            trace!("Snippet too short ({} chars)", length);
            return DetectionResult::none();
        }

        if let Some(check) = &self.exact_check {
            if check.is_certain(code) {
                let language = check.language();
                let confidence = if self.store.contains(language) {
                    c.definitive_confidence
                } else {
                    c.unprofiled_confidence
                };
                debug!(
                    "Exact check confirmed {} for \"{}\"",
                    language,
                    snippet_preview(code, PREVIEW_BYTES)
                );
                return DetectionResult::definitive_with(language, confidence);
            }
        }

        let scores = self.score_trimmed(code);
        let ranking = match rank(scores.iter().map(|s| (s.language.as_str(), s.total))) {
            Some(ranking) if ranking.max > c.score_epsilon => ranking,
            _ => {
                debug!(
                    "No profile scored for \"{}\"",
                    snippet_preview(code, PREVIEW_BYTES)
                );
                return DetectionResult::none();
            }
        };

        let confidence = confidence(c, ranking.max, ranking.second, length);
        debug!(
            "Leader {} (score {:.2}, runner-up {:.2}, confidence {:.3}) for \"{}\"",
            ranking.leader,
            ranking.max,
            ranking.second,
            confidence,
            snippet_preview(code, PREVIEW_BYTES)
        );

        if confidence < c.confidence_threshold {
            return DetectionResult::new(None, confidence);
        }
        DetectionResult::new(Some(ranking.leader.to_string()), confidence)
    }

    /// Detect many snippets in parallel; results keep input order
    pub fn detect_batch<S>(&self, snippets: &[S]) -> Vec<DetectionResult>
    where
        S: AsRef<str> + Sync,
    {
        snippets
            .par_iter()
            .map(|snippet| self.detect(snippet.as_ref()))
            .collect()
    }

    /// Heuristic score of every profile for `code`, in table order.
    ///
    /// Applies the same trimming as [`detect`](Self::detect) but neither the
    /// length floor nor the exact check.
    pub fn scores(&self, code: &str) -> Vec<LanguageScore> {
        self.score_trimmed(code.trim())
    }

    fn score_trimmed(&self, code: &str) -> Vec<LanguageScore> {
        let lowered = code.to_lowercase();
        let pattern_input = clip_to_char_boundary(code, self.config.limits.max_pattern_input);

        self.store
            .all_profiles()
            .iter()
            .map(|(language, profile)| {
                let score = score_profile(language, profile, code, &lowered, pattern_input);
                trace!("{}: {:.2}", language, score.total);
                score
            })
            .collect()
    }
}

fn score_profile(
    language: &str,
    profile: &LanguageProfile,
    code: &str,
    lowered: &str,
    pattern_input: &str,
) -> LanguageScore {
    let marker = profile
        .markers()
        .iter()
        .find(|m| code.starts_with(m.text.as_str()))
        .map_or(0.0, |m| m.weight);

    let keywords: f64 = profile
        .keywords()
        .iter()
        .filter(|k| k.found_in(lowered))
        .map(|k| k.weight())
        .sum();

    let patterns: f64 = profile
        .patterns()
        .iter()
        .filter(|p| p.is_match(pattern_input))
        .map(|p| p.weight())
        .sum();

    let penalties: f64 = profile
        .negative_keywords()
        .iter()
        .filter(|k| k.found_in(lowered))
        .map(|k| k.weight())
        .sum();

    LanguageScore {
        language: language.to_string(),
        total: (marker + keywords + patterns + penalties).max(0.0),
        marker,
        keywords,
        patterns,
        penalties,
    }
}
