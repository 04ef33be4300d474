//! Structure report types
//!
//! Everything here serializes with serde to the key set renderers consume:
//! `heading_hierarchy`, `content_types`, `sections`, `toc_candidates`,
//! `metadata` and `statistics`.

use std::collections::BTreeMap;

use mdoffice_ast::{Metadata, NodeType};
use serde::{Deserialize, Serialize};

/// Per-type node counts
pub type ContentTypes = BTreeMap<NodeType, usize>;

/// Full structure report for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub heading_hierarchy: HeadingHierarchy,
    /// Every node in the tree counted by type, the Document included
    pub content_types: ContentTypes,
    /// One summary per Section, in document order
    pub sections: Vec<SectionSummary>,
    pub toc_candidates: Vec<TocEntry>,
    /// Document metadata, with `title` taken from the first H1 when there is one
    pub metadata: Metadata,
    pub statistics: Statistics,
}

impl Report {
    /// Document title: the first H1, else the front-matter title
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(|v| v.as_str())
    }

    /// TOC entries for headings at `max_level` or shallower
    pub fn toc_up_to(&self, max_level: u8) -> Vec<&TocEntry> {
        self.toc_candidates
            .iter()
            .filter(|entry| entry.level <= max_level)
            .collect()
    }
}

/// Headings in document order with level statistics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadingHierarchy {
    pub headings: Vec<HeadingInfo>,
    /// Deepest heading level, 0 without headings
    pub max_level: u8,
    pub level_counts: BTreeMap<u8, usize>,
    pub total_headings: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingInfo {
    pub level: u8,
    pub content: String,
    /// Enclosing headings down to this one, e.g. `H1: Intro > H2: Scope`
    pub path: String,
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub level: u8,
    pub heading: String,
    /// Direct children, the heading included
    pub child_count: usize,
    /// Nodes below the section, excluding Sections and Headings
    pub content_types: ContentTypes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    pub level: u8,
    pub content: String,
    /// Nesting depth, 0 for top-level sections
    pub depth: usize,
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statistics {
    pub total_nodes: usize,
    pub total_sections: usize,
    pub total_paragraphs: usize,
    pub total_lists: usize,
    pub total_tables: usize,
    pub total_code_blocks: usize,
    pub total_images: usize,
    pub total_links: usize,
}
