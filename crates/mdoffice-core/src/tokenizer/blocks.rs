//! Block splitting
//!
//! Turns the document's lines into [`RawBlock`]s: front matter is peeled off
//! first, fenced code is swapped for indexed placeholders so blank lines
//! inside code do not split it, the remaining lines are split on blank lines,
//! and finally each placeholder is restored as its own block.

use std::collections::BTreeMap;

use super::matchers::heading_line;

const FRONT_MATTER_DELIMITER: &str = "---";
const FENCE: &str = "```";

/// Front matter found at the top of a document
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FrontMatter {
    /// Lines between the delimiters
    pub raw: String,
    /// Parsed `key: value` pairs
    pub pairs: BTreeMap<String, String>,
}

/// A fenced code block lifted out before splitting
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Fence<'a> {
    /// Info string after the opening backticks
    pub info: &'a str,
    /// Lines between the fences
    pub body: Vec<&'a str>,
}

impl Fence<'_> {
    /// First word of the info string
    pub fn language(&self) -> Option<String> {
        self.info.split_whitespace().next().map(str::to_string)
    }
}

/// A run of lines to classify
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawBlock<'a> {
    /// Source lines, indentation preserved
    pub lines: Vec<&'a str>,
    /// 1-based line number of the first line
    pub start_line: usize,
    /// Set when the block is a restored fenced code block
    pub fence: Option<Fence<'a>>,
}

impl<'a> RawBlock<'a> {
    pub fn new(lines: Vec<&'a str>, start_line: usize) -> Self {
        Self {
            lines,
            start_line,
            fence: None,
        }
    }
}

/// Split off a `---` delimited front matter block
///
/// Returns the parsed front matter (if any) and the number of lines it
/// occupied, delimiters included.
pub(crate) fn split_front_matter(lines: &[&str]) -> (Option<FrontMatter>, usize) {
    let opens = lines
        .first()
        .is_some_and(|l| l.trim_end() == FRONT_MATTER_DELIMITER);
    if !opens {
        return (None, 0);
    }

    let close = lines
        .iter()
        .skip(1)
        .position(|l| l.trim_end() == FRONT_MATTER_DELIMITER)
        .map(|i| i + 1);

    match close {
        Some(close) => {
            let body = &lines[1..close];
            let front_matter = FrontMatter {
                raw: body.join("\n"),
                pairs: parse_pairs(body),
            };
            (Some(front_matter), close + 1)
        }
        None => (None, 0),
    }
}

/// Parse flat `key: value` lines; values are always strings
fn parse_pairs(lines: &[&str]) -> BTreeMap<String, String> {
    let mut pairs = BTreeMap::new();
    for line in lines {
        if line.trim_start().starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        pairs.insert(key.to_string(), unquote(value.trim()).to_string());
    }
    pairs
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// One line after fence extraction
enum Slot<'a> {
    Text { line: &'a str, line_number: usize },
    Placeholder { index: usize, line_number: usize },
}

/// Info string of a fence opener, or `None` if the line opens no fence
///
/// An info string containing a backtick means the line starts with an
/// inline code span instead.
fn fence_opener(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix(FENCE)?;
    let info = rest.trim_start_matches('`').trim();
    (!info.contains('`')).then_some(info)
}

/// A closing fence is a line of backticks only
fn is_fence_close(line: &str) -> bool {
    let line = line.trim();
    line.len() >= FENCE.len() && line.chars().all(|c| c == '`')
}

/// Replace each closed fenced code block with a placeholder slot
fn lift_fences<'a>(lines: &[&'a str], first_line: usize) -> (Vec<Slot<'a>>, Vec<Fence<'a>>) {
    let mut slots = Vec::with_capacity(lines.len());
    let mut fences = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let line_number = first_line + i;

        if let Some(info) = fence_opener(line) {
            let close = lines[i + 1..].iter().position(|l| is_fence_close(l));
            if let Some(offset) = close {
                let end = i + 1 + offset;
                fences.push(Fence {
                    info,
                    body: lines[i + 1..end].to_vec(),
                });
                slots.push(Slot::Placeholder {
                    index: fences.len() - 1,
                    line_number,
                });
                i = end + 1;
                continue;
            }
        }

        slots.push(Slot::Text { line, line_number });
        i += 1;
    }

    (slots, fences)
}

/// Split document lines into blocks
///
/// `first_line` is the 1-based number of `lines[0]` in the original input.
/// Blank lines separate blocks; heading lines and fenced code always form
/// blocks of their own.
pub(crate) fn split_blocks<'a>(lines: &[&'a str], first_line: usize) -> Vec<RawBlock<'a>> {
    let (slots, fences) = lift_fences(lines, first_line);
    let mut fences: Vec<Option<Fence<'a>>> = fences.into_iter().map(Some).collect();

    let mut blocks = Vec::new();
    let mut current: Option<RawBlock<'a>> = None;

    for slot in slots {
        match slot {
            Slot::Text { line, .. } if line.trim().is_empty() => {
                blocks.extend(current.take());
            }
            Slot::Text { line, line_number } if heading_line(line).is_some() => {
                blocks.extend(current.take());
                blocks.push(RawBlock::new(vec![line], line_number));
            }
            Slot::Text { line, line_number } => {
                current
                    .get_or_insert_with(|| RawBlock::new(Vec::new(), line_number))
                    .lines
                    .push(line);
            }
            Slot::Placeholder { index, line_number } => {
                blocks.extend(current.take());
                if let Some(fence) = fences.get_mut(index).and_then(Option::take) {
                    blocks.push(restore_fence(fence, lines, first_line, line_number));
                }
            }
        }
    }
    blocks.extend(current.take());

    blocks
}

/// Put the original fenced text back as a block of its own
fn restore_fence<'a>(
    fence: Fence<'a>,
    lines: &[&'a str],
    first_line: usize,
    line_number: usize,
) -> RawBlock<'a> {
    let start = line_number - first_line;
    let end = (start + fence.body.len() + 2).min(lines.len());
    RawBlock {
        lines: lines[start..end].to_vec(),
        start_line: line_number,
        fence: Some(fence),
    }
}
