//! Tokens produced by the tokenizer
//!
//! A [`Token`] is one classified block of Markdown. Structured details that
//! only some kinds carry (inline spans, table cells, list markers, front
//! matter pairs) live in [`TokenMetadata`].

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Block classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Heading,
    Paragraph,
    ListItem,
    CodeBlock,
    Table,
    Blockquote,
    HorizontalRule,
    FrontMatter,
}

/// A classified block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Block kind
    pub kind: TokenKind,
    /// Raw content (heading text, paragraph text, code body, ...)
    pub text: String,
    /// Heading level (1-6) or list item depth (0-based)
    pub level: Option<u8>,
    /// Code block info string
    pub language: Option<String>,
    /// 1-based line where the block starts
    pub line_number: usize,
    /// Kind-specific details
    pub metadata: TokenMetadata,
}

impl Token {
    /// Create a token with empty metadata
    pub fn new(kind: TokenKind, text: impl Into<String>, line_number: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            level: None,
            language: None,
            line_number,
            metadata: TokenMetadata::default(),
        }
    }

    /// Set the level
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    /// Set the code language
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Replace the metadata
    pub fn with_metadata(mut self, metadata: TokenMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Whether this is a heading token
    pub fn is_heading(&self) -> bool {
        self.kind == TokenKind::Heading
    }
}

/// Kind-specific token details
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenMetadata {
    /// Inline spans found in the text (paragraphs and list items)
    #[serde(default, skip_serializing_if = "InlineSpans::is_empty")]
    pub inline: InlineSpans,
    /// Table shape (table tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<TableData>,
    /// Marker details (list item tokens)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ListMarker>,
    /// Key/value pairs (front matter tokens)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub front_matter: BTreeMap<String, String>,
}

/// Inline spans, each with a byte range into the token text
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InlineSpans {
    pub links: Vec<LinkSpan>,
    pub images: Vec<ImageSpan>,
    pub emphasis: Vec<EmphasisSpan>,
    pub code: Vec<CodeSpan>,
}

impl InlineSpans {
    /// Whether no spans were found
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
            && self.images.is_empty()
            && self.emphasis.is_empty()
            && self.code.is_empty()
    }

    /// Total number of spans
    pub fn len(&self) -> usize {
        self.links.len() + self.images.len() + self.emphasis.len() + self.code.len()
    }
}

/// `[text](url)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSpan {
    pub text: String,
    pub url: String,
    pub range: Range<usize>,
}

/// `![alt](src "title")`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSpan {
    pub alt: String,
    pub src: String,
    pub title: Option<String>,
    pub range: Range<usize>,
}

/// Emphasis strength, from the number of delimiter characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisStyle {
    Italic,
    Bold,
    BoldItalic,
}

impl EmphasisStyle {
    /// Style for a delimiter run of `len` characters
    pub fn from_delimiter_len(len: usize) -> Self {
        match len {
            1 => EmphasisStyle::Italic,
            2 => EmphasisStyle::Bold,
            _ => EmphasisStyle::BoldItalic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmphasisStyle::Italic => "italic",
            EmphasisStyle::Bold => "bold",
            EmphasisStyle::BoldItalic => "bold_italic",
        }
    }
}

/// `*text*`, `**text**`, `___text___`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmphasisSpan {
    pub style: EmphasisStyle,
    pub text: String,
    pub range: Range<usize>,
}

/// `` `code` ``
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSpan {
    pub code: String,
    pub range: Range<usize>,
}

/// Column alignment from a table separator row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Raw table shape as written in the source
///
/// Rows are kept exactly as split; normalizing them to `column_count` is
/// left to the builder so validation can still see ragged rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub alignments: Vec<Option<Alignment>>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Whether any header cell has text
    pub fn has_headers(&self) -> bool {
        self.headers.iter().any(|h| !h.is_empty())
    }

    /// Number of columns every row is normalized to
    ///
    /// The header width when headers exist, otherwise the widest data row.
    pub fn column_count(&self) -> usize {
        if self.has_headers() {
            self.headers.len()
        } else {
            self.rows.iter().map(Vec::len).max().unwrap_or(0)
        }
    }
}

/// List item marker details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMarker {
    pub ordered: bool,
    pub marker: String,
}
