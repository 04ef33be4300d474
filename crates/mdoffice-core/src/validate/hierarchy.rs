//! Heading hierarchy validator
//!
//! Flags headings that go more than one level deeper than the heading
//! before them (e.g., H1 followed directly by H3). The builder nests such
//! headings under the nearest shallower one, so this is a warning only.

use crate::diagnostics::Diagnostic;
use crate::token::Token;

use super::TokenValidator;

/// Validates heading level progression
///
/// # Diagnostic Codes
///
/// - `MD101`: Heading level jump
pub struct HeadingHierarchyValidator;

impl TokenValidator for HeadingHierarchyValidator {
    fn code(&self) -> &'static str {
        "MD1"
    }

    fn name(&self) -> &'static str {
        "heading-hierarchy"
    }

    fn validate(&self, tokens: &[Token]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut previous: Option<u8> = None;

        for token in tokens.iter().filter(|t| t.is_heading()) {
            let Some(level) = token.level else {
                continue;
            };

            // The first heading may start at any level
            if let Some(prev) = previous {
                if level > prev + 1 {
                    diagnostics.push(
                        Diagnostic::warning(format!(
                            "Heading level jumps from H{} to H{}",
                            prev, level
                        ))
                        .with_code("MD101")
                        .with_line(token.line_number)
                        .with_excerpt(&token.text)
                        .with_help(format!(
                            "Missing H{}? The heading is nested under the previous H{}.",
                            prev + 1,
                            prev
                        )),
                    );
                }
            }

            previous = Some(level);
        }

        diagnostics
    }
}
