//! Heading hierarchy and table of contents
//!
//! Both walk the tree in pre-order, which is document order for headings.
//! Nesting comes from the Section chain rather than raw heading levels, so
//! a skipped level (H1 then H3) still yields depth 1 for the H3.

use std::collections::BTreeMap;

use mdoffice_ast::{Ast, NodeId, NodeType};

use crate::report::{HeadingHierarchy, HeadingInfo, TocEntry};

/// Characters of heading text kept per path segment
pub const PATH_SEGMENT_LEN: usize = 30;

pub(crate) fn heading_hierarchy(ast: &Ast) -> HeadingHierarchy {
    let headings: Vec<HeadingInfo> = headings(ast)
        .map(|id| HeadingInfo {
            level: ast[id].level.unwrap_or(1),
            content: ast[id].content.clone(),
            path: heading_path(ast, id),
            anchor: ast[id].attr("anchor").map(str::to_string),
        })
        .collect();

    let mut level_counts = BTreeMap::new();
    for heading in &headings {
        *level_counts.entry(heading.level).or_insert(0) += 1;
    }

    HeadingHierarchy {
        max_level: headings.iter().map(|h| h.level).max().unwrap_or(0),
        total_headings: headings.len(),
        level_counts,
        headings,
    }
}

pub(crate) fn toc_candidates(ast: &Ast) -> Vec<TocEntry> {
    headings(ast)
        .map(|id| {
            let sections = enclosing_sections(ast, id).count();
            TocEntry {
                level: ast[id].level.unwrap_or(1),
                content: ast[id].content.clone(),
                depth: sections.saturating_sub(1),
                anchor: ast[id].attr("anchor").map(str::to_string),
            }
        })
        .collect()
}

/// Text of the first level-1 heading
pub(crate) fn first_h1(ast: &Ast) -> Option<&str> {
    headings(ast)
        .find(|&id| ast[id].level == Some(1))
        .map(|id| ast[id].content.as_str())
}

fn headings(ast: &Ast) -> impl Iterator<Item = NodeId> + '_ {
    ast.iter()
        .filter(move |&id| ast[id].node_type == NodeType::Heading)
}

fn enclosing_sections(ast: &Ast, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    ast.ancestors(id)
        .into_iter()
        .filter(move |&a| ast[a].node_type == NodeType::Section)
}

/// `H1: Parent > H2: Child` for the headings of every enclosing Section
fn heading_path(ast: &Ast, id: NodeId) -> String {
    let mut segments: Vec<String> = enclosing_sections(ast, id)
        .filter_map(|section| ast.find_children(section, NodeType::Heading).first().copied())
        .map(|heading| {
            let node = &ast[heading];
            let text: String = node.content.chars().take(PATH_SEGMENT_LEN).collect();
            format!("H{}: {}", node.level.unwrap_or(1), text)
        })
        .collect();
    segments.reverse();
    segments.join(" > ")
}
