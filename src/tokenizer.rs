//! PHP token stream built from the tree-sitter PHP grammar
//!
//! The grammar is the HTML-aware variant: anything outside `<?php ... ?>`
//! becomes a single `text` leaf, the way PHP itself treats inline HTML.
//! Malformed input still yields a best-effort token sequence; the parser
//! recovers with error nodes instead of rejecting the snippet.

use thiserror::Error;
use tree_sitter::{Node, Parser};

/// Leaf kinds that only occur in PHP syntax
const UNIQUE_KINDS: &[&str] = &[
    "$",
    "variable_name",
    "echo",
    "namespace",
    "use",
    "class",
    "interface",
    "trait",
    "function",
    "public",
    "private",
    "protected",
    "static",
    "abstract",
    "final",
    "->",
    "?->",
    "::",
    "global",
    "require",
    "require_once",
    "include",
    "include_once",
    "array",
    "list",
    "empty",
    "isset",
    "unset",
    "new",
    "clone",
    "instanceof",
    "goto",
    "yield",
    "throw",
    "finally",
    "match",
];

/// Identifiers that are PHP-specific regardless of where they appear
const MAGIC_NAMES: &[&str] = &["__construct", "__destruct", "__call", "__get", "__set"];

/// Language constructs the grammar parses as ordinary calls
const CONSTRUCT_NAMES: &[&str] = &["isset", "empty", "unset", "list", "array"];

#[derive(Error, Debug)]
pub enum TokenizeError {
    #[error("PHP grammar could not be loaded: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("Parser produced no tree")]
    NoTree,
}

/// One leaf of the PHP syntax tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhpToken {
    /// Grammar node kind (`"php_tag"`, `"echo"`, `"->"`, `"name"`, ...)
    pub kind: &'static str,
    pub text: String,
}

impl PhpToken {
    /// `<?php` or `<?=`; a bare `<?` also opens XML declarations and
    /// processing instructions, so it is not evidence of PHP
    pub fn is_open_tag(&self) -> bool {
        self.kind == "php_tag" && (self.text.eq_ignore_ascii_case("<?php") || self.text == "<?=")
    }

    /// True for tokens that identify PHP on their own
    pub fn is_unique(&self) -> bool {
        if self.is_open_tag() || UNIQUE_KINDS.contains(&self.kind) {
            return true;
        }
        match self.kind {
            "name" => {
                let lowered = self.text.to_ascii_lowercase();
                MAGIC_NAMES.contains(&lowered.as_str())
                    || CONSTRUCT_NAMES.contains(&lowered.as_str())
            }
            "visibility_modifier" => {
                let lowered = self.text.to_ascii_lowercase();
                UNIQUE_KINDS.contains(&lowered.as_str())
            }
            _ => false,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Split `code` into PHP leaf tokens in source order
pub fn tokenize(code: &str) -> Result<Vec<PhpToken>, TokenizeError> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_php::LANGUAGE_PHP.into())?;
    let tree = parser.parse(code, None).ok_or(TokenizeError::NoTree)?;

    let mut tokens = Vec::new();
    collect_leaves(&tree.root_node(), code, &mut tokens);
    Ok(tokens)
}

fn collect_leaves(node: &Node, code: &str, tokens: &mut Vec<PhpToken>) {
    if node.is_missing() {
        return;
    }
    if node.child_count() == 0 {
        let text = code.get(node.byte_range()).unwrap_or_default();
        tokens.push(PhpToken {
            kind: node.kind(),
            text: text.to_string(),
        });
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_leaves(&child, code, tokens);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(code: &str) -> Vec<&'static str> {
        tokenize(code).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_open_tag_and_echo() {
        let tokens = tokenize("<?php echo \"Hello\";").unwrap();
        assert!(tokens[0].is_open_tag());
        assert_eq!(tokens[0].text, "<?php");
        assert!(tokens.iter().any(|t| t.kind == "echo" && t.is_unique()));
    }

    #[test]
    fn test_text_outside_tags_is_inline() {
        let tokens = tokenize("$user->name = 'x'; // no open tag").unwrap();
        assert!(tokens.iter().all(|t| !t.is_open_tag()));
        assert!(tokens.iter().all(|t| !t.is_unique()));
    }

    #[test]
    fn test_variables_and_member_access() {
        let kinds = kinds("<?php $user->save(); Foo::bar();");
        assert!(kinds.contains(&"$"));
        assert!(kinds.contains(&"->"));
        assert!(kinds.contains(&"::"));
    }

    #[test]
    fn test_magic_method_name_is_unique() {
        let tokens = tokenize("<?php class A { function __construct() {} }").unwrap();
        let magic = tokens
            .iter()
            .find(|t| t.text == "__construct")
            .expect("magic method token");
        assert!(magic.is_unique());
    }

    #[test]
    fn test_ordinary_names_are_not_unique() {
        let token = PhpToken {
            kind: "name",
            text: "strlen".to_string(),
        };
        assert!(!token.is_unique());

        let token = PhpToken {
            kind: "name",
            text: "ISSET".to_string(),
        };
        assert!(token.is_unique());
    }

    #[test]
    fn test_malformed_input_still_tokenizes() {
        let tokens = tokenize("<?php function ( { $").unwrap();
        assert!(tokens.iter().any(|t| t.is_open_tag()));
        assert!(tokens.iter().all(|t| !t.kind.is_empty()));
    }

    #[test]
    fn test_bare_short_tag_is_not_an_open_tag() {
        let tokens = tokenize("<?xml version=\"1.0\"?>\n<note/>").unwrap();
        assert!(tokens.iter().all(|t| !t.is_open_tag()));
        assert!(tokens.iter().all(|t| !t.is_unique()));
    }

    #[test]
    fn test_blank_tokens() {
        let token = PhpToken {
            kind: "text",
            text: "  \n".to_string(),
        };
        assert!(token.is_blank());
    }
}
