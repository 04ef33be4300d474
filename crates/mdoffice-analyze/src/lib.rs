//! mdoffice-analyze - Structure analysis of document trees
//!
//! Summarizes an [`Ast`] for renderers: the heading hierarchy, node counts
//! by type, per-section summaries, table of contents candidates, document
//! metadata and totals. Analysis only reads the tree.
//!
//! # Example
//!
//! ```
//! use mdoffice_ast::{Ast, Node, NodeType};
//! use mdoffice_analyze::StructureAnalyzer;
//!
//! let mut ast = Ast::new();
//! let section = ast.add_child(ast.root(), Node::new(NodeType::Section).with_level(1));
//! ast.add_child(
//!     section,
//!     Node::new(NodeType::Heading).with_level(1).with_content("Overview"),
//! );
//!
//! let analyzer = StructureAnalyzer::new(&ast);
//! let report = analyzer.analyze();
//!
//! assert_eq!(report.heading_hierarchy.total_headings, 1);
//! assert_eq!(report.title(), Some("Overview"));
//! ```

pub mod census;
pub mod hierarchy;
pub mod report;

use std::cell::OnceCell;

use mdoffice_ast::Ast;
use serde_json::Value;

pub use report::{
    ContentTypes, HeadingHierarchy, HeadingInfo, Report, SectionSummary, Statistics, TocEntry,
};

/// Analyzes one document tree, caching the report
///
/// The first call to [`analyze`](Self::analyze) computes the report; later
/// calls return the same one.
#[derive(Debug)]
pub struct StructureAnalyzer<'a> {
    ast: &'a Ast,
    cache: OnceCell<Report>,
}

impl<'a> StructureAnalyzer<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Self {
            ast,
            cache: OnceCell::new(),
        }
    }

    /// The tree under analysis
    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    /// Compute the report, or return the cached one
    pub fn analyze(&self) -> &Report {
        self.cache.get_or_init(|| analyze(self.ast))
    }

    /// Take the report, computing it if needed
    pub fn into_report(self) -> Report {
        let ast = self.ast;
        self.cache.into_inner().unwrap_or_else(|| analyze(ast))
    }
}

/// Analyze a tree without caching
pub fn analyze(ast: &Ast) -> Report {
    let mut metadata = ast.metadata().clone();
    // The first H1 names the document, even over a front-matter title
    if let Some(title) = hierarchy::first_h1(ast) {
        metadata.insert("title".to_string(), Value::from(title));
    }

    Report {
        heading_hierarchy: hierarchy::heading_hierarchy(ast),
        content_types: census::content_types(ast),
        sections: census::sections(ast),
        toc_candidates: hierarchy::toc_candidates(ast),
        metadata,
        statistics: census::statistics(ast),
    }
}
