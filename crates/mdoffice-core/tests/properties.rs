//! Structural properties that hold for any input

use std::thread;

use mdoffice_ast::{Ast, NodeId, NodeType};
use mdoffice_core::token::{Token, TokenKind};
use mdoffice_core::{builder, tokenizer, Tokenizer};

const SAMPLES: &[&str] = &[
    "",
    "Just a paragraph.",
    "# A\n## B\n### C\n# D",
    "# A\n### B\n## C\n#### D",
    "### Deep start\n# Top\n## Mid",
    "## Two\n## Two again\n# One\n###### Six",
    "- a\n  - b\n    - c\n- d\n\ntext\n\n1. x\n2. y",
    "| A | B |\n|---|---|\n| 1 |\n| 1 | 2 | 3 |",
    "| | |\n|---|---|\n| a | b | c |\n| d |",
    "---\ntitle: T\n---\n# T\n\n```\n# not a heading\n```\n\n## Sub",
];

fn sections(ast: &Ast) -> impl Iterator<Item = NodeId> + '_ {
    ast.iter()
        .filter(move |&id| ast[id].node_type == NodeType::Section)
}

/// Number of distinct heading levels along the longest chain of headings
/// where each one nests under the nearest shallower predecessor
fn deepest_heading_chain(input: &str) -> usize {
    let levels: Vec<u8> = tokenizer::parse(input)
        .iter()
        .filter(|t| t.kind == TokenKind::Heading)
        .filter_map(|t| t.level)
        .collect();

    let mut stack: Vec<u8> = Vec::new();
    let mut deepest = 0;
    for level in levels {
        while stack.last().is_some_and(|&top| top >= level) {
            stack.pop();
        }
        stack.push(level);
        deepest = deepest.max(stack.len());
    }
    deepest
}

#[test]
fn section_depth_matches_heading_chain() {
    for input in SAMPLES {
        let ast = builder::build(tokenizer::parse(input));
        assert_eq!(
            ast.section_depth(),
            deepest_heading_chain(input),
            "input: {:?}",
            input
        );
    }
}

#[test]
fn section_parent_is_nearest_shallower_section() {
    for input in SAMPLES {
        let ast = builder::build(tokenizer::parse(input));
        for section in sections(&ast) {
            let level = ast[section].level.unwrap_or(0);
            let parent = ast.parent(section).unwrap_or(ast.root());
            match ast[parent].node_type {
                NodeType::Document => {}
                NodeType::Section => {
                    assert!(ast[parent].level.unwrap_or(0) < level, "input: {:?}", input);
                }
                other => panic!("section under {} in {:?}", other, input),
            }
        }
    }
}

#[test]
fn every_section_starts_with_its_heading() {
    for input in SAMPLES {
        let ast = builder::build(tokenizer::parse(input));
        for section in sections(&ast) {
            let first = ast.children(section)[0];
            assert_eq!(ast[first].node_type, NodeType::Heading);
            assert_eq!(ast[first].level, ast[section].level);
        }
    }
}

#[test]
fn build_is_idempotent() {
    for input in SAMPLES {
        let tokens = tokenizer::parse(input);
        let first = builder::build(tokens.clone());
        let second = builder::build(tokens);
        assert_eq!(first, second, "input: {:?}", input);
    }
}

#[test]
fn list_items_match_consecutive_tokens() {
    let input = "- a\n- b\n  - b1\n\n# H\n\n1. one\n2. two\n3. three\n\npara\n\n* x";
    let tokens = tokenizer::parse(input);

    let mut runs = Vec::new();
    let mut current = 0;
    for token in &tokens {
        if token.kind == TokenKind::ListItem {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    if current > 0 {
        runs.push(current);
    }

    let ast = builder::build(tokens);
    let lists: Vec<usize> = ast
        .iter()
        .filter(|&id| ast[id].node_type == NodeType::List)
        .map(|id| ast.children(id).len())
        .collect();

    assert_eq!(lists, runs);
    assert_eq!(lists, vec![3, 3, 1]);
}

#[test]
fn non_list_token_splits_lists() {
    let tokens = vec![
        Token::new(TokenKind::ListItem, "a", 1).with_level(0),
        Token::new(TokenKind::HorizontalRule, "---", 2),
        Token::new(TokenKind::ListItem, "b", 3).with_level(0),
    ];
    let ast = builder::build(tokens);
    let lists: Vec<NodeId> = ast
        .iter()
        .filter(|&id| ast[id].node_type == NodeType::List)
        .collect();
    assert_eq!(lists.len(), 2);
}

#[test]
fn table_rows_are_well_formed() {
    for input in SAMPLES {
        let ast = builder::build(tokenizer::parse(input));
        for table in ast.iter().filter(|&id| ast[id].node_type == NodeType::Table) {
            let widths: Vec<usize> = ast
                .children(table)
                .iter()
                .map(|&row| ast.children(row).len())
                .collect();
            assert!(widths.windows(2).all(|w| w[0] == w[1]), "input: {:?}", input);
        }
    }
}

#[test]
fn headerless_table_uses_widest_row() {
    let ast = builder::build(tokenizer::parse("| | |\n|---|---|\n| a | b | c |\n| d |"));
    let table = ast.children(ast.root())[0];
    for &row in ast.children(table) {
        assert_eq!(ast.children(row).len(), 3);
    }
}

#[test]
fn every_node_is_reachable_and_linked() {
    for input in SAMPLES {
        let ast = builder::build(tokenizer::parse(input));
        assert_eq!(ast.iter().count(), ast.len());
        for id in ast.iter().skip(1) {
            let parent = ast.parent(id).expect("non-root node has a parent");
            assert!(ast.children(parent).contains(&id));
        }
    }
}

#[test]
fn conversions_run_in_parallel() {
    let tokenizer = Tokenizer::new();
    let expected: Vec<Ast> = SAMPLES
        .iter()
        .map(|input| builder::build(tokenizer.parse(input)))
        .collect();

    let tokenizer = &tokenizer;
    let results: Vec<Ast> = thread::scope(|scope| {
        let handles: Vec<_> = SAMPLES
            .iter()
            .map(|input| scope.spawn(move || builder::build(tokenizer.parse(input))))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("worker thread panicked"))
            .collect()
    });

    assert_eq!(results, expected);
}

#[test]
fn finished_tree_is_shared_across_threads() {
    let ast = builder::build(tokenizer::parse("# A\n## B\n\ntext\n\n## C"));
    let ast = &ast;
    let counts: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || sections(ast).count()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(counts, vec![3; 4]);
}
