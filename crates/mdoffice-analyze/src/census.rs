//! Node counts: global content types, per-section summaries, statistics

use mdoffice_ast::{Ast, NodeId, NodeType};

use crate::report::{ContentTypes, SectionSummary, Statistics};

pub(crate) fn content_types(ast: &Ast) -> ContentTypes {
    count_types(ast, ast.root(), |_| true)
}

pub(crate) fn sections(ast: &Ast) -> Vec<SectionSummary> {
    ast.iter()
        .filter(|&id| ast[id].node_type == NodeType::Section)
        .map(|id| {
            let node = &ast[id];
            SectionSummary {
                level: node.level.unwrap_or(1),
                heading: node
                    .meta("heading")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                child_count: node.children().len(),
                content_types: count_types(ast, id, |t| {
                    !matches!(t, NodeType::Section | NodeType::Heading)
                }),
            }
        })
        .collect()
}

pub(crate) fn statistics(ast: &Ast) -> Statistics {
    let mut stats = Statistics::default();
    for id in ast.iter() {
        stats.total_nodes += 1;
        match ast[id].node_type {
            NodeType::Section => stats.total_sections += 1,
            NodeType::Paragraph => stats.total_paragraphs += 1,
            NodeType::List => stats.total_lists += 1,
            NodeType::Table => stats.total_tables += 1,
            NodeType::CodeBlock => stats.total_code_blocks += 1,
            NodeType::Image => stats.total_images += 1,
            NodeType::Link => stats.total_links += 1,
            _ => {}
        }
    }
    stats
}

fn count_types(ast: &Ast, from: NodeId, include: impl Fn(NodeType) -> bool) -> ContentTypes {
    let mut counts = ContentTypes::new();
    for id in ast.descendants(from) {
        let node_type = ast[id].node_type;
        if include(node_type) {
            *counts.entry(node_type).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdoffice_ast::Node;

    fn sample() -> Ast {
        let mut ast = Ast::new();
        let root = ast.root();
        ast.add_child(root, Node::new(NodeType::Paragraph));

        let intro = ast.add_child(
            root,
            Node::new(NodeType::Section)
                .with_level(1)
                .with_meta("heading", "Intro"),
        );
        ast.add_child(intro, Node::new(NodeType::Heading).with_level(1));
        let para = ast.add_child(intro, Node::new(NodeType::Paragraph));
        ast.add_child(para, Node::new(NodeType::Link));
        ast.add_child(para, Node::new(NodeType::Image));

        let nested = ast.add_child(intro, Node::new(NodeType::Section).with_level(2));
        ast.add_child(nested, Node::new(NodeType::Heading).with_level(2));
        ast.add_child(nested, Node::new(NodeType::CodeBlock));
        ast
    }

    #[test]
    fn test_content_types_include_document() {
        let counts = content_types(&sample());
        assert_eq!(counts.get(&NodeType::Document), Some(&1));
        assert_eq!(counts.get(&NodeType::Section), Some(&2));
        assert_eq!(counts.get(&NodeType::Paragraph), Some(&2));
        assert_eq!(counts.get(&NodeType::Table), None);
    }

    #[test]
    fn test_section_summaries() {
        let summaries = sections(&sample());
        assert_eq!(summaries.len(), 2);

        let intro = &summaries[0];
        assert_eq!(intro.heading, "Intro");
        assert_eq!(intro.child_count, 3);
        assert_eq!(intro.content_types.get(&NodeType::Paragraph), Some(&1));
        assert_eq!(intro.content_types.get(&NodeType::CodeBlock), Some(&1));
        assert!(!intro.content_types.contains_key(&NodeType::Section));
        assert!(!intro.content_types.contains_key(&NodeType::Heading));

        let nested = &summaries[1];
        assert_eq!(nested.level, 2);
        assert_eq!(nested.heading, "");
    }

    #[test]
    fn test_statistics() {
        let stats = statistics(&sample());
        assert_eq!(stats.total_nodes, 10);
        assert_eq!(stats.total_sections, 2);
        assert_eq!(stats.total_paragraphs, 2);
        assert_eq!(stats.total_code_blocks, 1);
        assert_eq!(stats.total_links, 1);
        assert_eq!(stats.total_images, 1);
        assert_eq!(stats.total_tables, 0);
    }
}
