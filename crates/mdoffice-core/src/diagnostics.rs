//! Validation diagnostics
//!
//! Structural problems found in a token stream are reported as
//! [`Diagnostic`]s rather than errors: the tokenizer and builder always
//! produce output, and only the pipeline decides whether a diagnostic is
//! fatal.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest excerpt kept on a diagnostic or parse error, in characters
pub const EXCERPT_LEN: usize = 100;

/// A diagnostic message from validation
///
/// # Example
///
/// ```
/// use mdoffice_core::diagnostics::{Diagnostic, Severity};
///
/// let diag = Diagnostic::warning("Heading level jumps from H1 to H3")
///     .with_code("MD101")
///     .with_line(12)
///     .with_help("Add an H2 between them");
///
/// assert_eq!(diag.severity, Severity::Warning);
/// assert!(diag.to_string().starts_with("warning[MD101]"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,

    pub message: String,

    /// Validator code (e.g., "MD101")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// 1-based source line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,

    /// Offending source text, truncated to [`EXCERPT_LEN`] characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    /// Suggested fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Extra context lines
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Severity level of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; structure was normalized, nothing is wrong
    Info,

    /// Structural anomaly; fatal only under a strict pipeline
    Warning,

    /// Reserved for callers that escalate diagnostics
    Error,
}

impl Diagnostic {
    /// Diagnostic with only a severity and message
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
            line: None,
            excerpt: None,
            help: None,
            notes: Vec::new(),
        }
    }

    /// Shorthand for [`Severity::Error`]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Shorthand for [`Severity::Warning`]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Shorthand for [`Severity::Info`]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    /// Attach the validator code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Set the source line
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Set the excerpt, truncating long text
    pub fn with_excerpt(mut self, text: &str) -> Self {
        self.excerpt = Some(excerpt(text));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }

    /// Whether a strict pipeline refuses to continue on this diagnostic
    pub fn is_blocking(&self) -> bool {
        self.severity >= Severity::Warning
    }
}

/// Truncate `text` to [`EXCERPT_LEN`] characters
pub fn excerpt(text: &str) -> String {
    text.chars().take(EXCERPT_LEN).collect()
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(ref code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;

        if let Some(line) = self.line {
            write!(f, "\n  --> line {}", line)?;
        }
        if let Some(ref excerpt) = self.excerpt {
            write!(f, "\n   | {}", excerpt)?;
        }
        if let Some(ref help) = self.help {
            write!(f, "\n  = help: {}", help)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {}", note)?;
        }

        Ok(())
    }
}

/// Diagnostics from one validation run, in line order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.is_error())
    }

    /// Number of warning-level entries
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// First diagnostic a strict pipeline would stop on
    pub fn first_blocking(&self) -> Option<&Diagnostic> {
        self.diagnostics.iter().find(|d| d.is_blocking())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_builder() {
        let diag = Diagnostic::warning("Heading level jumps from H1 to H3")
            .with_code("MD101")
            .with_line(7)
            .with_excerpt("Deep dive")
            .with_help("Insert an H2");

        assert!(diag.is_warning());
        assert!(diag.is_blocking());
        assert_eq!(diag.code.as_deref(), Some("MD101"));
        assert_eq!(diag.line, Some(7));
        assert_eq!(diag.excerpt.as_deref(), Some("Deep dive"));
    }

    #[test]
    fn test_info_is_not_blocking() {
        assert!(!Diagnostic::info("row padded").is_blocking());
        assert!(Diagnostic::error("bad").is_blocking());
    }

    #[test]
    fn test_excerpt_truncates_by_chars() {
        let long = "é".repeat(EXCERPT_LEN + 20);
        let diag = Diagnostic::info("long").with_excerpt(&long);
        assert_eq!(diag.excerpt.unwrap().chars().count(), EXCERPT_LEN);
    }

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_diagnostics_collection() {
        let diags = Diagnostics::from(vec![
            Diagnostic::info("note"),
            Diagnostic::warning("jump").with_line(3),
            Diagnostic::warning("jump again"),
        ]);

        assert!(!diags.has_errors());
        assert_eq!(diags.warning_count(), 2);
        assert_eq!(diags.len(), 3);
        assert_eq!(diags.first_blocking().and_then(|d| d.line), Some(3));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::warning("Heading level jumps from H2 to H4")
            .with_code("MD101")
            .with_line(12)
            .with_help("Add an H3");

        let display = format!("{}", diag);
        assert!(display.contains("warning[MD101]"));
        assert!(display.contains("--> line 12"));
        assert!(display.contains("help: Add an H3"));
    }

    #[test]
    fn test_diagnostic_serialize() {
        let diag = Diagnostic::warning("jump").with_code("MD101");

        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("\"code\":\"MD101\""));
        assert!(!json.contains("excerpt"));

        let restored: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, diag);
    }
}
