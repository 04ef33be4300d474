//! mdoffice-core - Markdown to office documents, front end
//!
//! Turns Markdown text into a document tree and structure report that
//! office-format renderers consume.
//!
//! The stages can be used one by one:
//!
//! - [`tokenizer`]: Markdown text to classified block tokens
//! - [`validate`]: structural diagnostics over the tokens
//! - [`builder`]: tokens to an [`Ast`](mdoffice_ast::Ast) of nested sections
//! - [`mdoffice_analyze`]: tree to a [`Report`](mdoffice_analyze::Report)
//!
//! or all at once through [`Pipeline`], which also routes finished
//! conversions to registered [`Renderer`]s.
//!
//! # Example
//!
//! ```
//! use mdoffice_ast::NodeType;
//! use mdoffice_core::{builder, tokenizer};
//!
//! let tokens = tokenizer::parse("# Intro\n\nSee [docs](https://example.com).");
//! let ast = builder::build(tokens);
//!
//! let section = ast.children(ast.root())[0];
//! assert_eq!(ast[section].node_type, NodeType::Section);
//! assert_eq!(ast.children(section).len(), 2);
//! ```

pub mod builder;
pub mod diagnostics;
pub mod error;
pub mod inline;
pub mod options;
pub mod pipeline;
pub mod router;
pub mod token;
pub mod tokenizer;
pub mod validate;

// Re-export main types and functions
pub use builder::{build, AstBuilder};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use error::{Error, ParseError, Result};
pub use options::RenderOptions;
pub use pipeline::{BatchEntry, Conversion, Pipeline};
pub use router::{ContentRouter, OutputFormat, Renderer};
pub use token::{Token, TokenKind, TokenMetadata};
pub use tokenizer::{parse, Tokenizer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
