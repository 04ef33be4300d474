//! Markdown tokenizer
//!
//! Splits Markdown text into classified block tokens.
//!
//! # Supported Syntax
//!
//! - Front matter: `---` delimited `key: value` lines at the top
//! - Headings: `#` through `######`
//! - Fenced code: triple backticks with an optional language
//! - Pipe tables with a separator row
//! - Blockquotes: `>` prefixed lines
//! - Horizontal rules: `---`, `***`, `___`
//! - Lists: `-`, `*`, `+`, `1.`, `1)` with two-space nesting
//! - Inline: links, images, inline code, `*`/`_` emphasis
//!
//! Anything else is a paragraph. Parsing never fails.
//!
//! # Example
//!
//! ```
//! use mdoffice_core::token::TokenKind;
//! use mdoffice_core::tokenizer;
//!
//! let tokens = tokenizer::parse("# Title\n\nHello *world*.");
//!
//! assert_eq!(tokens[0].kind, TokenKind::Heading);
//! assert_eq!(tokens[1].kind, TokenKind::Paragraph);
//! assert_eq!(tokens[1].metadata.inline.emphasis.len(), 1);
//! ```

pub(crate) mod blocks;
pub(crate) mod matchers;

use crate::diagnostics::Diagnostic;
use crate::token::{Token, TokenKind, TokenMetadata};
use crate::validate::ValidationEngine;

/// Markdown tokenizer
///
/// Holds no per-document state; one instance may parse any number of
/// documents, from any number of threads.
pub struct Tokenizer {
    engine: ValidationEngine,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Create a tokenizer with the default validators
    pub fn new() -> Self {
        Self::with_engine(ValidationEngine::with_defaults())
    }

    /// Create a tokenizer with a custom validation engine
    pub fn with_engine(engine: ValidationEngine) -> Self {
        Self { engine }
    }

    /// Split `text` into tokens
    pub fn parse(&self, text: &str) -> Vec<Token> {
        let text = text.replace("\r\n", "\n");
        let lines: Vec<&str> = text.split('\n').collect();
        let mut tokens = Vec::new();

        let (front_matter, consumed) = blocks::split_front_matter(&lines);
        if let Some(front_matter) = front_matter {
            let metadata = TokenMetadata {
                front_matter: front_matter.pairs,
                ..Default::default()
            };
            tokens.push(
                Token::new(TokenKind::FrontMatter, front_matter.raw, 1).with_metadata(metadata),
            );
        }

        for block in blocks::split_blocks(&lines[consumed..], consumed + 1) {
            tokens.extend(matchers::classify(&block));
        }

        tokens
    }

    /// Report structural anomalies without touching the tokens
    pub fn validate(&self, tokens: &[Token]) -> Vec<Diagnostic> {
        self.engine.validate(tokens)
    }
}

/// Split `text` into tokens with a default [`Tokenizer`]
pub fn parse(text: &str) -> Vec<Token> {
    Tokenizer::new().parse(text)
}

/// Validate tokens with the default validators
pub fn validate(tokens: &[Token]) -> Vec<Diagnostic> {
    Tokenizer::new().validate(tokens)
}
