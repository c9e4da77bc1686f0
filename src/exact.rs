//! Exact pre-checks that settle a snippet's language before heuristic scoring

use tracing::{debug, trace};

use crate::tokenizer;

/// Substrings without which a snippet cannot be PHP worth tokenizing
const PHP_TELLTALES: &[&str] = &["<?", "$", "->", "::"];

/// Minimum number of non-blank tokens before counting alone can confirm PHP
const PHP_TOKEN_FLOOR: usize = 5;

/// A grammar-backed check for one privileged language.
///
/// Implementations must be cheap to reject unrelated text and must never
/// fail: anything that prevents a confident answer is simply `false`.
pub trait ExactCheck: Send + Sync {
    /// Identifier of the language this check confirms, as used in profiles
    fn language(&self) -> &str;

    /// True only when `code` is certainly written in [`language`](Self::language)
    fn is_certain(&self, code: &str) -> bool;
}

/// Confirms PHP using the tree-sitter PHP grammar
#[derive(Debug, Default, Clone, Copy)]
pub struct PhpExactCheck;

impl ExactCheck for PhpExactCheck {
    fn language(&self) -> &str {
        "php"
    }

    fn is_certain(&self, code: &str) -> bool {
        if !PHP_TELLTALES.iter().any(|t| code.contains(t)) {
            return false;
        }

        let tokens = match tokenizer::tokenize(code) {
            Ok(tokens) => tokens,
            Err(e) => {
                debug!("PHP tokenizer unavailable: {}", e);
                return false;
            }
        };
        if tokens.len() < 2 {
            return false;
        }

        let mut has_unique = false;
        let mut has_open_tag = false;
        let mut significant = 0usize;
        for token in &tokens {
            if token.is_blank() {
                continue;
            }
            significant += 1;
            has_open_tag |= token.is_open_tag();
            has_unique |= token.is_unique();
        }

        trace!(
            "PHP check: {} tokens, {} significant, open_tag={}, unique={}",
            tokens.len(),
            significant,
            has_open_tag,
            has_unique
        );
        has_unique && (has_open_tag || significant > PHP_TOKEN_FLOOR)
    }
}
