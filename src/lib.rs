//! langsniff: heuristic language detection for code snippets
//!
//! Guesses the programming or markup language of a short text snippet by
//! scoring it against weighted per-language profiles (prefix markers,
//! keywords, regular expressions, penalties). PHP gets an additional exact
//! check backed by the tree-sitter PHP grammar, which settles snippets with
//! a PHP open tag before any scoring happens.
//!
//! # Bundled Profiles
//!
//! - CSS, SCSS
//! - Go, Java, JavaScript, TypeScript, PHP, Python, Ruby
//! - HTML, SVG, XML, Twig
//!
//! # Example
//!
//! ```no_run
//! use langsniff::Detector;
//!
//! let detector = Detector::builtin()?;
//! let result = detector.detect("<?php echo \"Hello\";");
//!
//! assert_eq!(result.language(), Some("php"));
//! assert!(result.is_likely());
//! # Ok::<(), langsniff::LangSniffError>(())
//! ```
//!
//! Profiles can also be loaded from TOML files:
//!
//! ```no_run
//! use std::path::Path;
//! use langsniff::{Detector, ProfileStore};
//!
//! let store = ProfileStore::from_path(Path::new("data/language"))?;
//! let detector = Detector::new(store);
//! println!("{}", detector.detect("package main\n\nfunc main() {}"));
//! # Ok::<(), langsniff::LangSniffError>(())
//! ```

#[cfg(feature = "embedded-profiles")]
mod builtin;

pub mod cli;
pub mod config;
pub mod detector;
pub mod error;
pub mod exact;
pub mod profile;
pub mod result;
pub mod store;
pub mod tokenizer;
pub mod utils;

// Re-export commonly used types
pub use cli::{Cli, OutputFormat};
pub use config::{Calibration, DetectorConfig, Limits};
pub use detector::{confidence, rank, Detector, LanguageScore, Ranking};
pub use error::{LangSniffError, Result};
pub use exact::{ExactCheck, PhpExactCheck};
pub use profile::{LanguageProfile, Marker, Needle, WeightedPattern};
pub use result::DetectionResult;
pub use store::{ProfileStore, ProfileStoreBuilder};
pub use tokenizer::{tokenize, PhpToken, TokenizeError};
