//! Block classification
//!
//! [`MATCHERS`] is the ordered dispatch table used by [`classify`]: each
//! matcher either claims a block and returns its tokens or declines. The
//! first matcher to claim a block wins; blocks nobody claims are paragraphs.

use std::sync::OnceLock;

use regex::Regex;

use super::blocks::RawBlock;
use crate::inline;
use crate::token::{Alignment, ListMarker, TableData, Token, TokenKind, TokenMetadata};

/// Columns per list nesting level
const INDENT_UNIT: usize = 2;

/// A block matcher: `Some(tokens)` claims the block
pub(crate) type Matcher = fn(&RawBlock<'_>) -> Option<Vec<Token>>;

/// Matchers in priority order
pub(crate) const MATCHERS: &[(&str, Matcher)] = &[
    ("heading", match_heading),
    ("code_block", match_code_block),
    ("table", match_table),
    ("blockquote", match_blockquote),
    ("horizontal_rule", match_horizontal_rule),
    ("list", match_list),
];

/// Classify a block into one or more tokens
pub(crate) fn classify(block: &RawBlock<'_>) -> Vec<Token> {
    MATCHERS
        .iter()
        .find_map(|(_, matcher)| matcher(block))
        .unwrap_or_else(|| vec![paragraph(block)])
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^ {0,3}(#{1,6})[ \t]+(\S.*?)\s*$").expect("heading regex is valid")
    })
}

fn list_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([ \t]*)([-*+]|\d{1,9}[.)])[ \t]+(\S.*)$").expect("list item regex is valid")
    })
}

/// Level and text of an ATX heading line
pub(crate) fn heading_line(line: &str) -> Option<(u8, &str)> {
    let caps = heading_re().captures(line)?;
    let level = caps.get(1)?.as_str().len() as u8;
    Some((level, caps.get(2)?.as_str()))
}

fn match_heading(block: &RawBlock<'_>) -> Option<Vec<Token>> {
    let (level, text) = heading_line(block.lines.first()?)?;
    Some(vec![
        Token::new(TokenKind::Heading, text, block.start_line).with_level(level),
    ])
}

fn match_code_block(block: &RawBlock<'_>) -> Option<Vec<Token>> {
    let fence = block.fence.as_ref()?;
    Some(vec![Token::new(
        TokenKind::CodeBlock,
        fence.body.join("\n"),
        block.start_line,
    )
    .with_language(fence.language())])
}

fn is_pipe_row(line: &str) -> bool {
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

fn is_separator_row(line: &str) -> bool {
    is_pipe_row(line)
        && line.contains('-')
        && line
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':') || c.is_whitespace())
}

/// Split a pipe row into trimmed cells, honouring `\|` escapes
pub(crate) fn split_cells(line: &str) -> Vec<String> {
    let inner = line.trim();
    let inner = inner.strip_prefix('|').unwrap_or(inner);
    let inner = match inner.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

fn alignment(cell: &str) -> Option<Alignment> {
    match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Some(Alignment::Center),
        (true, false) => Some(Alignment::Left),
        (false, true) => Some(Alignment::Right),
        (false, false) => None,
    }
}

fn match_table(block: &RawBlock<'_>) -> Option<Vec<Token>> {
    let rows: Vec<&str> = block.lines.iter().map(|l| l.trim()).collect();
    if rows.len() < 2 || !rows.iter().all(|r| is_pipe_row(r)) || !is_separator_row(rows[1]) {
        return None;
    }

    let headers = split_cells(rows[0]);
    let mut alignments: Vec<Option<Alignment>> =
        split_cells(rows[1]).iter().map(|c| alignment(c)).collect();
    alignments.resize(headers.len(), None);

    let table = TableData {
        headers,
        alignments,
        rows: rows[2..].iter().map(|r| split_cells(r)).collect(),
    };

    let metadata = TokenMetadata {
        table: Some(table),
        ..Default::default()
    };
    Some(vec![
        Token::new(TokenKind::Table, block.lines.join("\n"), block.start_line)
            .with_metadata(metadata),
    ])
}

fn match_blockquote(block: &RawBlock<'_>) -> Option<Vec<Token>> {
    if !block.lines.first()?.trim_start().starts_with('>') {
        return None;
    }

    let text = block
        .lines
        .iter()
        .map(|line| {
            let trimmed = line.trim_start();
            match trimmed.strip_prefix('>') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest).trim_end(),
                None => line.trim(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    Some(vec![Token::new(
        TokenKind::Blockquote,
        text.trim_end(),
        block.start_line,
    )])
}

fn match_horizontal_rule(block: &RawBlock<'_>) -> Option<Vec<Token>> {
    let [line] = block.lines.as_slice() else {
        return None;
    };

    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let first = marks.next()?;
    if !matches!(first, '-' | '*' | '_') {
        return None;
    }
    let mut count = 1;
    for c in marks {
        if c != first {
            return None;
        }
        count += 1;
    }

    (count >= 3).then(|| {
        vec![Token::new(
            TokenKind::HorizontalRule,
            line.trim(),
            block.start_line,
        )]
    })
}

/// Leading whitespace width in columns (tab = one indent unit)
fn indent_width(indent: &str) -> usize {
    indent
        .chars()
        .map(|c| if c == '\t' { INDENT_UNIT } else { 1 })
        .sum()
}

fn is_ordered_marker(marker: &str) -> bool {
    let digits = marker.trim_end_matches(&['.', ')'][..]);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

struct PendingItem {
    text: String,
    depth: u8,
    marker: String,
    line_number: usize,
}

fn match_list(block: &RawBlock<'_>) -> Option<Vec<Token>> {
    let re = list_item_re();
    if !re.is_match(block.lines.first()?) {
        return None;
    }

    let mut items: Vec<PendingItem> = Vec::new();
    for (offset, line) in block.lines.iter().enumerate() {
        match re.captures(line) {
            Some(caps) => {
                let depth = indent_width(&caps[1]) / INDENT_UNIT;
                items.push(PendingItem {
                    text: caps[3].trim_end().to_string(),
                    depth: u8::try_from(depth).unwrap_or(u8::MAX),
                    marker: caps[2].to_string(),
                    line_number: block.start_line + offset,
                });
            }
            // Lazy continuation of the previous item
            None => {
                if let Some(last) = items.last_mut() {
                    last.text.push('\n');
                    last.text.push_str(line.trim());
                }
            }
        }
    }

    Some(
        items
            .into_iter()
            .map(|item| {
                let metadata = TokenMetadata {
                    inline: inline::extract(&item.text),
                    list: Some(ListMarker {
                        ordered: is_ordered_marker(&item.marker),
                        marker: item.marker,
                    }),
                    ..Default::default()
                };
                Token::new(TokenKind::ListItem, item.text, item.line_number)
                    .with_level(item.depth)
                    .with_metadata(metadata)
            })
            .collect(),
    )
}

fn paragraph(block: &RawBlock<'_>) -> Token {
    let text = block
        .lines
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();

    let metadata = TokenMetadata {
        inline: inline::extract(text),
        ..Default::default()
    };
    Token::new(TokenKind::Paragraph, text, block.start_line).with_metadata(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::blocks::Fence;

    fn block(text: &str) -> RawBlock<'_> {
        RawBlock::new(text.split('\n').collect(), 1)
    }

    fn matcher(name: &str) -> Matcher {
        MATCHERS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, m)| *m)
            .unwrap()
    }

    #[test]
    fn test_dispatch_order() {
        let names: Vec<&str> = MATCHERS.iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec!["heading", "code_block", "table", "blockquote", "horizontal_rule", "list"]
        );
    }

    #[test]
    fn test_heading_line() {
        assert_eq!(heading_line("## Setup  "), Some((2, "Setup")));
        assert_eq!(heading_line("###### Deep"), Some((6, "Deep")));
        assert_eq!(heading_line("####### Too deep"), None);
        assert_eq!(heading_line("#hashtag"), None);
        assert_eq!(heading_line("# "), None);
    }

    #[test]
    fn test_code_block_needs_fence() {
        assert!(matcher("code_block")(&block("plain")).is_none());

        let mut fenced = block("```py\nprint(1)\n```");
        fenced.fence = Some(Fence {
            info: "py",
            body: vec!["print(1)"],
        });
        let tokens = matcher("code_block")(&fenced).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::CodeBlock);
        assert_eq!(tokens[0].text, "print(1)");
        assert_eq!(tokens[0].language.as_deref(), Some("py"));
    }

    #[test]
    fn test_table() {
        let input = "| Name | Qty |\n|:-----|----:|\n| a | 1 |\n| b | 2 |";
        let tokens = matcher("table")(&block(input)).unwrap();
        let table = tokens[0].metadata.table.as_ref().unwrap();
        assert_eq!(table.headers, vec!["Name", "Qty"]);
        assert_eq!(table.alignments, vec![Some(Alignment::Left), Some(Alignment::Right)]);
        assert_eq!(table.rows, vec![vec!["a", "1"], vec!["b", "2"]]);
    }

    #[test]
    fn test_table_without_data_rows() {
        let tokens = matcher("table")(&block("| A | B |\n|---|---|")).unwrap();
        assert!(tokens[0].metadata.table.as_ref().unwrap().rows.is_empty());
    }

    #[test]
    fn test_table_requires_separator() {
        assert!(matcher("table")(&block("| A | B |\n| 1 | 2 |")).is_none());
        assert!(matcher("table")(&block("| A | B |")).is_none());
        assert!(matcher("table")(&block("| A | B |\n|---|---|\nloose text")).is_none());
    }

    #[test]
    fn test_split_cells_escaped_pipe() {
        assert_eq!(split_cells(r"| a \| b | c |"), vec!["a | b", "c"]);
        assert_eq!(split_cells("| | x |"), vec!["", "x"]);
    }

    #[test]
    fn test_blockquote() {
        let tokens = matcher("blockquote")(&block("> first\n>second\nlazy")).unwrap();
        assert_eq!(tokens[0].text, "first\nsecond\nlazy");
        assert!(matcher("blockquote")(&block("not > quote")).is_none());
    }

    #[test]
    fn test_horizontal_rule() {
        let hr = matcher("horizontal_rule");
        assert!(hr(&block("---")).is_some());
        assert!(hr(&block("* * *")).is_some());
        assert!(hr(&block("_____")).is_some());
        assert!(hr(&block("--")).is_none());
        assert!(hr(&block("-*-")).is_none());
        assert!(hr(&block("---\ntext")).is_none());
    }

    #[test]
    fn test_list_depth_and_markers() {
        let tokens = matcher("list")(&block("- top\n  - nested\n    3. deeper")).unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].level, Some(0));
        assert_eq!(tokens[1].level, Some(1));
        assert_eq!(tokens[2].level, Some(2));

        let marker = tokens[2].metadata.list.as_ref().unwrap();
        assert!(marker.ordered);
        assert_eq!(marker.marker, "3.");
        assert!(!tokens[0].metadata.list.as_ref().unwrap().ordered);
        assert_eq!(tokens[2].line_number, 3);
    }

    #[test]
    fn test_list_continuation_lines() {
        let tokens = matcher("list")(&block("1) first\n   wrapped\n2) second")).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "first\nwrapped");
        assert!(tokens[1].metadata.list.as_ref().unwrap().ordered);
    }

    #[test]
    fn test_list_requires_leading_item() {
        assert!(matcher("list")(&block("text\n- item")).is_none());
        assert!(matcher("list")(&block("*emphasis* start")).is_none());
    }

    #[test]
    fn test_list_item_inline_spans() {
        let tokens = matcher("list")(&block("- see [site](http://x.y)")).unwrap();
        assert_eq!(tokens[0].metadata.inline.links.len(), 1);
    }

    #[test]
    fn test_first_match_wins() {
        // A rule made of dashes must not become a list item
        let tokens = classify(&block("- - -"));
        assert_eq!(tokens[0].kind, TokenKind::HorizontalRule);
    }

    #[test]
    fn test_fallback_paragraph() {
        let tokens = classify(&block("Some **bold** text  \nnext line"));
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Paragraph);
        assert_eq!(tokens[0].text, "Some **bold** text\nnext line");
        assert_eq!(tokens[0].metadata.inline.emphasis.len(), 1);
    }
}
