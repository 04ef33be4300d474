//! Table and list shape validators
//!
//! Both report at info level: the builder normalizes what they find, so
//! nothing is lost, but a renderer author may still want to know.

use crate::diagnostics::Diagnostic;
use crate::token::{Token, TokenKind};

use super::TokenValidator;

/// Flags table rows whose cell count differs from the column count
///
/// # Diagnostic Codes
///
/// - `MD201`: Row padded or truncated to the column count
pub struct TableShapeValidator;

impl TokenValidator for TableShapeValidator {
    fn code(&self) -> &'static str {
        "MD2"
    }

    fn name(&self) -> &'static str {
        "table-shape"
    }

    fn validate(&self, tokens: &[Token]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for token in tokens.iter().filter(|t| t.kind == TokenKind::Table) {
            let Some(table) = token.metadata.table.as_ref() else {
                continue;
            };
            let columns = table.column_count();

            for (index, row) in table.rows.iter().enumerate() {
                if row.len() == columns {
                    continue;
                }
                // header and separator occupy the first two lines
                let line = token.line_number + 2 + index;
                let action = if row.len() < columns { "padded" } else { "truncated" };
                diagnostics.push(
                    Diagnostic::info(format!(
                        "Table row has {} cells, expected {}; row {}",
                        row.len(),
                        columns,
                        action
                    ))
                    .with_code("MD201")
                    .with_line(line)
                    .with_excerpt(&row.join(" | ")),
                );
            }
        }

        diagnostics
    }
}

/// Flags list items nested more than one level below the previous item
///
/// # Diagnostic Codes
///
/// - `MD301`: List depth jump
pub struct ListDepthValidator;

impl TokenValidator for ListDepthValidator {
    fn code(&self) -> &'static str {
        "MD3"
    }

    fn name(&self) -> &'static str {
        "list-depth"
    }

    fn validate(&self, tokens: &[Token]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        // depth of the previous item in the current run of list items
        let mut previous: Option<u8> = None;

        for token in tokens {
            if token.kind != TokenKind::ListItem {
                previous = None;
                continue;
            }
            let depth = token.level.unwrap_or(0);
            let allowed = previous.map_or(0, |p| p.saturating_add(1));
            if depth > allowed {
                diagnostics.push(
                    Diagnostic::info(format!(
                        "List item at depth {} follows depth {}",
                        depth,
                        previous.map_or_else(|| "none".to_string(), |p| p.to_string())
                    ))
                    .with_code("MD301")
                    .with_line(token.line_number)
                    .with_excerpt(&token.text),
                );
            }
            previous = Some(depth);
        }

        diagnostics
    }
}
