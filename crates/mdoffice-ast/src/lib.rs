//! mdoffice-ast - Document tree definitions
//!
//! This crate provides the arena-backed tree produced by the mdoffice
//! builder and read by the structure analyzer and renderers.
//!
//! # Example
//!
//! ```
//! use mdoffice_ast::{Ast, Node, NodeType};
//!
//! let mut ast = Ast::new();
//! let section = ast.add_child(ast.root(), Node::new(NodeType::Section).with_level(1));
//! let heading = ast.add_child(section, Node::new(NodeType::Heading).with_content("Hello"));
//!
//! assert_eq!(ast.parent(heading), Some(section));
//! assert_eq!(ast.ancestors(heading), vec![section, ast.root()]);
//! ```

pub mod document;
pub mod node;

pub use document::{Ast, Descendants};
pub use node::{Metadata, Node, NodeId, NodeType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
