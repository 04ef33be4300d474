//! Error types for the conversion pipeline.
//!
//! Parsing itself never fails. Errors come from the orchestration layer:
//! blocking diagnostics, file I/O, render options and renderers.

use std::path::PathBuf;

use thiserror::Error;

use crate::diagnostics::{excerpt, Diagnostic};
use crate::router::OutputFormat;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// A structural problem severe enough to stop a conversion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", describe(.line_number, .excerpt, .message))]
pub struct ParseError {
    /// 1-based line of the offending block
    pub line_number: Option<usize>,
    /// Up to the first 100 characters of the offending text
    pub excerpt: Option<String>,
    /// What went wrong
    pub message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line_number: None,
            excerpt: None,
            message: message.into(),
        }
    }

    /// Set the line number
    pub fn with_line(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    /// Set the excerpt, truncated to the excerpt length
    pub fn with_excerpt(mut self, text: &str) -> Self {
        self.excerpt = Some(excerpt(text));
        self
    }
}

/// `line N: message ("excerpt")`, omitting whatever is unknown
fn describe(line_number: &Option<usize>, excerpt: &Option<String>, message: &str) -> String {
    let mut text = match line_number {
        Some(line) => format!("line {}: {}", line, message),
        None => message.to_string(),
    };
    if let Some(excerpt) = excerpt {
        text.push_str(&format!(" ({:?})", excerpt));
    }
    text
}

impl From<&Diagnostic> for ParseError {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            line_number: diagnostic.line,
            excerpt: diagnostic.excerpt.clone(),
            message: match &diagnostic.code {
                Some(code) => format!("[{}] {}", code, diagnostic.message),
                None => diagnostic.message.clone(),
            },
        }
    }
}

/// Errors that can occur while converting documents
#[derive(Error, Debug)]
pub enum Error {
    /// Validation produced a blocking diagnostic
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Input file could not be read
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid UTF-8
    #[error("Invalid UTF-8 in {path}")]
    InvalidUtf8 { path: PathBuf },

    /// No renderer registered for a requested format
    #[error("No renderer registered for format: {format}")]
    RendererNotRegistered { format: OutputFormat },

    /// Format name not recognized
    #[error("Unsupported format: {name}")]
    UnsupportedFormat { name: String },

    /// A renderer failed
    #[error("Render error ({format}): {source}")]
    Render {
        format: OutputFormat,
        #[source]
        source: anyhow::Error,
    },

    /// Render options could not be parsed
    #[error("Invalid render options: {0}")]
    Options(#[from] toml::de::Error),
}

impl Error {
    /// Create an I/O error for `path`
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid UTF-8 error for `path`
    pub fn invalid_utf8(path: impl Into<PathBuf>) -> Self {
        Self::InvalidUtf8 { path: path.into() }
    }

    /// Create a missing renderer error
    pub fn renderer_not_registered(format: OutputFormat) -> Self {
        Self::RendererNotRegistered { format }
    }

    /// Create an unsupported format error
    pub fn unsupported_format(name: impl Into<String>) -> Self {
        Self::UnsupportedFormat { name: name.into() }
    }

    /// Wrap a renderer failure
    pub fn render(format: OutputFormat, source: anyhow::Error) -> Self {
        Self::Render { format, source }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "MDO001",
            Self::Io { .. } => "MDO002",
            Self::InvalidUtf8 { .. } => "MDO003",
            Self::RendererNotRegistered { .. } => "MDO004",
            Self::Render { .. } => "MDO005",
            Self::Options(_) => "MDO006",
            Self::UnsupportedFormat { .. } => "MDO007",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("Heading level jumps from H1 to H3")
            .with_line(7)
            .with_excerpt("Deep");
        assert_eq!(
            err.to_string(),
            "line 7: Heading level jumps from H1 to H3 (\"Deep\")"
        );
        assert_eq!(ParseError::new("bad").to_string(), "bad");
        assert_eq!(
            ParseError::new("bad").with_excerpt("x").to_string(),
            "bad (\"x\")"
        );
    }

    #[test]
    fn test_parse_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ParseError::new("bad").with_line(3));
        assert_eq!(err.to_string(), "line 3: bad");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_parse_error_excerpt_truncated() {
        let long = "x".repeat(250);
        let err = ParseError::new("too long").with_excerpt(&long);
        assert_eq!(err.excerpt.map(|e| e.chars().count()), Some(100));
    }

    #[test]
    fn test_parse_error_from_diagnostic() {
        let diagnostic = Diagnostic::warning("Heading level jumps from H2 to H5")
            .with_code("MD101")
            .with_line(12)
            .with_excerpt("Deep dive");
        let err = ParseError::from(&diagnostic);

        assert_eq!(err.line_number, Some(12));
        assert_eq!(err.excerpt.as_deref(), Some("Deep dive"));
        assert!(err.message.starts_with("[MD101]"));
    }

    #[test]
    fn test_error_codes() {
        let err = Error::from(ParseError::new("x"));
        assert_eq!(err.code(), "MDO001");

        let err = Error::invalid_utf8("notes.md");
        assert_eq!(err.code(), "MDO003");
        assert!(err.to_string().contains("notes.md"));

        let err = Error::renderer_not_registered(OutputFormat::Pdf);
        assert_eq!(err.code(), "MDO004");
        assert!(err.to_string().contains("pdf"));
    }

    #[test]
    fn test_error_constructors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io("a.md", io);
        assert_eq!(err.code(), "MDO002");
        assert!(err.to_string().contains("a.md"));

        let err = Error::unsupported_format("odt");
        assert_eq!(err.code(), "MDO007");

        let err = Error::render(OutputFormat::Word, anyhow::anyhow!("template missing"));
        assert_eq!(err.code(), "MDO005");
        assert!(err.to_string().contains("template missing"));
    }
}
