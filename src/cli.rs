//! CLI argument definitions and report formatting

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::detector::LanguageScore;
use crate::error::Result;
use crate::result::DetectionResult;

/// Name used for standard input in reports
pub const STDIN_SOURCE: &str = "-";

/// Guess the language of code snippets
#[derive(Parser, Debug)]
#[command(name = "langsniff")]
#[command(about = "Heuristic programming-language detection for code snippets")]
#[command(version)]
pub struct Cli {
    /// Files to classify; reads standard input when omitted or "-"
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Profile directory or single profile file (defaults to the built-in profiles)
    #[arg(short, long, value_name = "PATH", env = "LANGSNIFF_PROFILES")]
    pub profiles: Option<PathBuf>,

    /// Detector configuration file (defaults to the per-user config if present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Include the per-language score breakdown
    #[arg(long)]
    pub scores: bool,

    /// Skip the PHP tokenizer check and rely on heuristics only
    #[arg(long)]
    pub no_exact_check: bool,

    /// Confidence needed for a result to be reported as confident
    #[arg(short, long, default_value_t = DetectionResult::DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Log scoring decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per input
    #[default]
    Text,
    /// Pretty-printed JSON array
    Json,
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "langsniff=debug"
        } else {
            "warn"
        }
    }

    /// Read every input as `(source name, contents)`
    pub fn read_inputs(&self) -> Result<Vec<(String, String)>> {
        if self.files.is_empty() {
            return Ok(vec![(STDIN_SOURCE.to_string(), read_stdin()?)]);
        }

        self.files
            .iter()
            .map(|path| {
                if path.as_os_str() == STDIN_SOURCE {
                    Ok((STDIN_SOURCE.to_string(), read_stdin()?))
                } else {
                    Ok((path.display().to_string(), fs::read_to_string(path)?))
                }
            })
            .collect()
    }
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Detection outcome for one input
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub source: String,
    #[serde(flatten)]
    pub result: DetectionResult,
    pub confident: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<LanguageScore>>,
}

impl Report {
    pub fn new(source: impl Into<String>, result: DetectionResult, threshold: f64) -> Self {
        let confident = result.is_confident(threshold);
        Self {
            source: source.into(),
            result,
            confident,
            scores: None,
        }
    }

    /// Attach a score breakdown, keeping non-zero entries, highest first
    pub fn with_scores(mut self, mut scores: Vec<LanguageScore>) -> Self {
        scores.retain(|s| s.total > 0.0 || s.penalties < 0.0);
        scores.sort_by(|a, b| b.total.total_cmp(&a.total));
        self.scores = Some(scores);
        self
    }
}

/// Render reports in the requested format
pub fn format_reports(reports: &[Report], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
        OutputFormat::Text => Ok(format_text(reports)),
    }
}

fn format_text(reports: &[Report]) -> String {
    let mut out = String::new();
    let label_sources = reports.len() > 1;

    for report in reports {
        if label_sources {
            let _ = write!(out, "{}: ", report.source);
        }
        let _ = writeln!(out, "{}", report.result);

        if let Some(scores) = &report.scores {
            for s in scores {
                let _ = writeln!(
                    out,
                    "  {:<12} {:>7.2}  (marker {:.2}, keywords {:.2}, patterns {:.2}, penalties {:.2})",
                    s.language, s.total, s.marker, s.keywords, s.patterns, s.penalties
                );
            }
        }
    }

    out.truncate(out.trim_end().len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(language: &str, total: f64, penalties: f64) -> LanguageScore {
        LanguageScore {
            language: language.to_string(),
            total,
            marker: 0.0,
            keywords: total - penalties,
            patterns: 0.0,
            penalties,
        }
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "langsniff",
            "--format",
            "json",
            "--scores",
            "--no-exact-check",
            "--threshold",
            "0.7",
            "a.txt",
            "b.txt",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.scores);
        assert!(cli.no_exact_check);
        assert_eq!(cli.threshold, 0.7);
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["langsniff", "-v"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.threshold, 0.5);
        assert!(cli.files.is_empty());
        assert_eq!(cli.log_filter(), "langsniff=debug");
    }

    #[test]
    fn test_read_inputs_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snippet.go");
        fs::write(&path, "package main").unwrap();

        let cli = Cli::try_parse_from(["langsniff".into(), path.clone().into_os_string()]).unwrap();
        let inputs = cli.read_inputs().unwrap();
        assert_eq!(inputs, vec![(path.display().to_string(), "package main".to_string())]);
    }

    #[test]
    fn test_missing_input_file_is_io_error() {
        let cli = Cli::try_parse_from(["langsniff", "/definitely/not/here.txt"]).unwrap();
        assert!(matches!(
            cli.read_inputs(),
            Err(crate::error::LangSniffError::Io(_))
        ));
    }

    #[test]
    fn test_text_single_report() {
        let report = Report::new("-", DetectionResult::new(Some("go".to_string()), 0.75), 0.5);
        let out = format_reports(&[report], OutputFormat::Text).unwrap();
        assert_eq!(out, "go (0.75)");
    }

    #[test]
    fn test_text_labels_multiple_sources() {
        let reports = vec![
            Report::new("a.css", DetectionResult::new(Some("css".to_string()), 0.4), 0.5),
            Report::new("b.txt", DetectionResult::none(), 0.5),
        ];
        let out = format_reports(&reports, OutputFormat::Text).unwrap();
        assert_eq!(out, "a.css: css (0.40)\nb.txt: unknown (0.00)");
    }

    #[test]
    fn test_scores_are_filtered_and_sorted() {
        let report = Report::new("-", DetectionResult::none(), 0.5).with_scores(vec![
            score("css", 2.0, 0.0),
            score("go", 0.0, 0.0),
            score("php", 9.0, 0.0),
            score("js", 0.0, -4.0),
        ]);
        let langs: Vec<&str> = report
            .scores
            .as_ref()
            .unwrap()
            .iter()
            .map(|s| s.language.as_str())
            .collect();
        assert_eq!(langs, vec!["php", "css", "js"]);
    }

    #[test]
    fn test_json_report_shape() {
        let report = Report::new("x.php", DetectionResult::definitive("php"), 0.9);
        let out = format_reports(&[report], OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["source"], "x.php");
        assert_eq!(value[0]["language"], "php");
        assert_eq!(value[0]["confidence"], 0.98);
        assert_eq!(value[0]["confident"], true);
        assert!(value[0].get("scores").is_none());
    }
}
