//! Token validation
//!
//! Validators inspect a token stream and report structural anomalies as
//! diagnostics. They never alter the tokens; the builder accepts anything
//! the tokenizer produces.
//!
//! # Example
//!
//! ```
//! use mdoffice_core::tokenizer;
//! use mdoffice_core::validate::ValidationEngine;
//!
//! let tokens = tokenizer::parse("# Intro\n\n### Details\n");
//! let diagnostics = ValidationEngine::with_defaults().validate(&tokens);
//!
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].code.as_deref(), Some("MD101"));
//! ```

pub mod hierarchy;
pub mod shape;

use crate::diagnostics::Diagnostic;
use crate::token::Token;

pub use hierarchy::HeadingHierarchyValidator;
pub use shape::{ListDepthValidator, TableShapeValidator};

/// Trait for token validators
///
/// Each validator has a unique code prefix for its diagnostics.
pub trait TokenValidator: Send + Sync {
    /// The validator's code prefix (e.g., "MD1" for heading structure)
    fn code(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str {
        "unnamed"
    }

    /// Inspect the tokens and return any diagnostics
    fn validate(&self, tokens: &[Token]) -> Vec<Diagnostic>;
}

/// Runs a set of validators over a token stream
pub struct ValidationEngine {
    validators: Vec<Box<dyn TokenValidator>>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationEngine {
    /// Create an engine with no validators
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    /// Create an engine with the heading, table and list validators
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_validator(Box::new(HeadingHierarchyValidator));
        engine.add_validator(Box::new(TableShapeValidator));
        engine.add_validator(Box::new(ListDepthValidator));
        engine
    }

    /// Register a validator
    pub fn add_validator(&mut self, validator: Box<dyn TokenValidator>) {
        self.validators.push(validator);
    }

    /// Number of registered validators
    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    /// Names of all registered validators
    pub fn validator_names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.name()).collect()
    }

    /// Run every validator, ordering the diagnostics by line
    pub fn validate(&self, tokens: &[Token]) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = self
            .validators
            .iter()
            .flat_map(|v| v.validate(tokens))
            .collect();
        // stable: diagnostics on one line keep validator order
        diagnostics.sort_by_key(|d| d.line.unwrap_or(0));
        diagnostics
    }
}
