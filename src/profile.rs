//! Language profiles: the weighted rule set describing one language's surface syntax
//!
//! Profiles are authored as loosely structured TOML and validated into a
//! strongly typed [`LanguageProfile`] at load time. Entries that cannot be
//! used for scoring (empty needles, non-numeric weights, patterns that do not
//! compile) are dropped one by one here, so the scorer never re-checks them.
//!
//! ```toml
//! [php]
//! markers = [{ text = "<?php", weight = 10 }, "<?="]
//! comment_markers = ["//", "#"]
//!
//! [php.keywords]
//! echo = 2
//!
//! [php.patterns]
//! '->' = 5
//!
//! [php.negative_keywords]
//! "console.log" = -5
//! ```

use fancy_regex::{Regex, RegexBuilder};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

/// Weight of a marker written as a bare string
pub const DEFAULT_MARKER_WEIGHT: f64 = 10.0;

// =============================================================================
// Validated profile
// =============================================================================

/// Literal prefix signal
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub text: String,
    pub weight: f64,
}

/// Case-insensitive substring signal (keyword or penalty)
#[derive(Debug, Clone, PartialEq)]
pub struct Needle {
    text: String,
    lowered: String,
    weight: f64,
}

impl Needle {
    fn new(text: String, weight: f64) -> Self {
        let lowered = text.to_lowercase();
        Self {
            text,
            lowered,
            weight,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Match against an already lower-cased haystack
    pub fn found_in(&self, haystack_lower: &str) -> bool {
        haystack_lower.contains(&self.lowered)
    }
}

/// Compiled regular-expression signal
#[derive(Debug, Clone)]
pub struct WeightedPattern {
    regex: Regex,
    weight: f64,
}

impl WeightedPattern {
    fn compile(source: &str, weight: f64, backtrack_limit: usize) -> Result<Self, fancy_regex::Error> {
        let regex = RegexBuilder::new(source)
            .backtrack_limit(backtrack_limit)
            .build()?;
        Ok(Self { regex, weight })
    }

    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// True if the pattern matches anywhere; a runtime failure such as an
    /// exhausted backtrack budget counts as no match
    pub fn is_match(&self, haystack: &str) -> bool {
        match self.regex.is_match(haystack) {
            Ok(matched) => matched,
            Err(e) => {
                debug!("Pattern {} abandoned: {}", self.source(), e);
                false
            }
        }
    }
}

/// Heuristic rule set for one language
#[derive(Debug, Clone, Default)]
pub struct LanguageProfile {
    markers: Vec<Marker>,
    keywords: Vec<Needle>,
    patterns: Vec<WeightedPattern>,
    negative_keywords: Vec<Needle>,
    comment_markers: Vec<String>,
}

impl LanguageProfile {
    /// Prefix markers in priority order
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn keywords(&self) -> &[Needle] {
        &self.keywords
    }

    pub fn patterns(&self) -> &[WeightedPattern] {
        &self.patterns
    }

    pub fn negative_keywords(&self) -> &[Needle] {
        &self.negative_keywords
    }

    /// Advisory only, never scored
    pub fn comment_markers(&self) -> &[String] {
        &self.comment_markers
    }

    /// True when the profile carries no scoring signal at all
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
            && self.keywords.is_empty()
            && self.patterns.is_empty()
            && self.negative_keywords.is_empty()
    }

    pub(crate) fn from_raw(language: &str, raw: RawProfile, backtrack_limit: usize) -> Self {
        let markers = raw
            .markers
            .into_iter()
            .filter_map(|value| marker_from_value(language, value))
            .filter(|m| !m.text.is_empty())
            .collect();

        let patterns = weighted_entries(language, "patterns", raw.patterns)
            .filter_map(|(source, weight)| {
                match WeightedPattern::compile(&source, weight, backtrack_limit) {
                    Ok(pattern) => Some(pattern),
                    Err(e) => {
                        warn!(
                            "Skipping pattern {:?} in profile '{}': {}",
                            source, language, e
                        );
                        None
                    }
                }
            })
            .collect();

        let comment_markers = raw
            .comment_markers
            .into_iter()
            .filter_map(|value| match value {
                toml::Value::String(text) => Some(text),
                other => {
                    warn!(
                        "Skipping comment marker in profile '{}': expected a string, found {}",
                        language,
                        other.type_str()
                    );
                    None
                }
            })
            .collect();

        Self {
            markers,
            keywords: needles(language, "keywords", raw.keywords),
            patterns,
            negative_keywords: needles(language, "negative_keywords", raw.negative_keywords),
            comment_markers,
        }
    }
}

fn needles(language: &str, field: &str, table: IndexMap<String, toml::Value>) -> Vec<Needle> {
    weighted_entries(language, field, table)
        .map(|(text, weight)| Needle::new(text, weight))
        .collect()
}

/// Non-empty entries of a weight table whose weight reads as a number
fn weighted_entries<'a>(
    language: &'a str,
    field: &'a str,
    table: IndexMap<String, toml::Value>,
) -> impl Iterator<Item = (String, f64)> + 'a {
    table
        .into_iter()
        .filter(|(key, _)| !key.is_empty())
        .filter_map(move |(key, value)| match numeric_weight(&value) {
            Some(weight) => Some((key, weight)),
            None => {
                warn!(
                    "Skipping {} entry {:?} in profile '{}': weight {} is not a number",
                    field, key, language, value
                );
                None
            }
        })
}

/// Integers, floats and numeric strings are accepted as weights
fn numeric_weight(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Integer(i) => Some(*i as f64),
        toml::Value::Float(f) if f.is_finite() => Some(*f),
        toml::Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// A bare string, or a `{ text, weight }` table with an optional weight
fn marker_from_value(language: &str, value: toml::Value) -> Option<Marker> {
    match value {
        toml::Value::String(text) => Some(Marker {
            text,
            weight: DEFAULT_MARKER_WEIGHT,
        }),
        toml::Value::Table(mut table) => {
            let text = match table.remove("text") {
                Some(toml::Value::String(text)) => text,
                _ => {
                    warn!("Skipping marker without text in profile '{}'", language);
                    return None;
                }
            };
            let weight = match table.get("weight") {
                None => DEFAULT_MARKER_WEIGHT,
                Some(value) => match numeric_weight(value) {
                    Some(weight) => weight,
                    None => {
                        warn!(
                            "Skipping marker {:?} in profile '{}': weight {} is not a number",
                            text, language, value
                        );
                        return None;
                    }
                },
            };
            Some(Marker { text, weight })
        }
        other => {
            warn!(
                "Skipping marker in profile '{}': expected a string or table, found {}",
                language,
                other.type_str()
            );
            None
        }
    }
}

// =============================================================================
// Source representation
// =============================================================================

/// Profile as written in a TOML source; every field is optional.
///
/// Entries stay as raw TOML values so one bad weight or marker is skipped on
/// its own instead of failing the whole profile.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawProfile {
    markers: Vec<toml::Value>,
    keywords: IndexMap<String, toml::Value>,
    patterns: IndexMap<String, toml::Value>,
    negative_keywords: IndexMap<String, toml::Value>,
    comment_markers: Vec<toml::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(toml_src: &str) -> LanguageProfile {
        let raw: RawProfile = toml::from_str(toml_src).unwrap();
        LanguageProfile::from_raw("test", raw, 1_000_000)
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let profile = compile("");
        assert!(profile.is_empty());
        assert!(profile.comment_markers().is_empty());
    }

    #[test]
    fn test_bare_and_weighted_markers_keep_order() {
        let profile = compile(
            r#"markers = ["<!DOCTYPE html", { text = "<?xml ", weight = 8 }, "<html"]"#,
        );
        let markers: Vec<(&str, f64)> = profile
            .markers()
            .iter()
            .map(|m| (m.text.as_str(), m.weight))
            .collect();
        assert_eq!(
            markers,
            vec![("<!DOCTYPE html", 10.0), ("<?xml ", 8.0), ("<html", 10.0)]
        );
    }

    #[test]
    fn test_integer_and_fractional_weights() {
        let profile = compile(
            r#"
[keywords]
echo = 2
color = 0.5
"#,
        );
        assert_eq!(profile.keywords()[0].weight(), 2.0);
        assert_eq!(profile.keywords()[1].weight(), 0.5);
    }

    #[test]
    fn test_non_numeric_weight_skips_only_that_entry() {
        let profile = compile(
            r#"
markers = [{ text = "package ", weight = "heavy" }, "func main", 42]
comment_markers = ["//", 7]

[keywords]
"func " = 10
"package " = "high"
"chan " = "2.5"

[patterns]
':=' = true
'\bgo\s+\w+' = 3

[negative_keywords]
"def " = [1]
"console.log" = -5
"#,
        );
        let markers: Vec<&str> = profile.markers().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(markers, vec!["func main"]);

        let keywords: Vec<(&str, f64)> = profile
            .keywords()
            .iter()
            .map(|k| (k.text(), k.weight()))
            .collect();
        assert_eq!(keywords, vec![("func ", 10.0), ("chan ", 2.5)]);

        assert_eq!(profile.patterns().len(), 1);
        assert_eq!(profile.patterns()[0].source(), r"\bgo\s+\w+");
        assert_eq!(profile.negative_keywords().len(), 1);
        assert_eq!(profile.comment_markers(), ["//".to_string()]);
    }

    #[test]
    fn test_weighted_marker_without_weight_uses_default() {
        let profile = compile(r#"markers = [{ text = "<?xml " }]"#);
        assert_eq!(profile.markers()[0].weight, DEFAULT_MARKER_WEIGHT);
    }

    #[test]
    fn test_empty_needles_are_dropped() {
        let profile = compile(
            r#"
markers = [""]

[keywords]
"" = 3
def = 2

[negative_keywords]
"" = -4
"#,
        );
        assert!(profile.markers().is_empty());
        assert_eq!(profile.keywords().len(), 1);
        assert!(profile.negative_keywords().is_empty());
    }

    #[test]
    fn test_invalid_pattern_skipped_others_kept() {
        let profile = compile(
            r#"
[patterns]
'func\s+\w+' = 3
'(unclosed' = 9
'\bchan\s+\w+' = 2
"#,
        );
        let sources: Vec<&str> = profile.patterns().iter().map(|p| p.source()).collect();
        assert_eq!(sources, vec![r"func\s+\w+", r"\bchan\s+\w+"]);
    }

    #[test]
    fn test_lookaround_and_backreference_patterns_compile() {
        let profile = compile(
            r#"
[patterns]
'(?<!\w)@media\s+' = 3
'(?si)<([a-z]+)\b[^>]*>.*?</\1\s*>' = 4
"#,
        );
        assert_eq!(profile.patterns().len(), 2);
        assert!(profile.patterns()[0].is_match("@media screen"));
        assert!(!profile.patterns()[0].is_match("mail@media screen"));
        assert!(profile.patterns()[1].is_match("<P>Text</P>"));
        assert!(!profile.patterns()[1].is_match("<p>Text</div>"));
    }

    #[test]
    fn test_needle_matching_is_case_insensitive() {
        let profile = compile(
            r#"
[keywords]
SELECT = 2
"#,
        );
        let needle = &profile.keywords()[0];
        assert_eq!(needle.text(), "SELECT");
        assert!(needle.found_in("select * from users"));
        assert!(!needle.found_in("delete from users"));
    }

    #[test]
    fn test_exhausted_backtrack_budget_is_no_match() {
        let raw: RawProfile = toml::from_str(
            r#"
[patterns]
'(a+)+\1b' = 1
"#,
        )
        .unwrap();
        let profile = LanguageProfile::from_raw("test", raw, 10);
        let input = "a".repeat(40);
        assert!(!profile.patterns()[0].is_match(&input));
    }
}
