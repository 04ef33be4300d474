//! AST builder
//!
//! Folds a token stream into an [`Ast`]. Headings open Sections whose
//! parent is found with a heading stack: on a heading of level `L`, every
//! open heading of level `>= L` is closed, and the new Section is attached
//! under whatever remains on top (or the Document). A skipped level
//! therefore nests under the nearest shallower heading.
//!
//! # Example
//!
//! ```
//! use mdoffice_ast::NodeType;
//! use mdoffice_core::{builder, tokenizer};
//!
//! let ast = builder::build(tokenizer::parse("# A\n### B\n"));
//! let a = ast.children(ast.root())[0];
//! let b = ast.children(a)[1];
//!
//! assert_eq!(ast[a].node_type, NodeType::Section);
//! assert_eq!(ast[b].level, Some(3));
//! ```

use std::collections::HashSet;
use std::iter::Peekable;

use mdoffice_ast::{Ast, Node, NodeId, NodeType};
use serde_json::{json, Value};

use crate::token::{Alignment, InlineSpans, TableData, Token, TokenKind};

/// Builds document trees from tokens
///
/// The builder itself is stateless; every call to [`AstBuilder::build`]
/// works on its own [`BuildContext`].
#[derive(Debug, Default, Clone, Copy)]
pub struct AstBuilder;

impl AstBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build a tree from a token stream
    pub fn build(&self, tokens: impl IntoIterator<Item = Token>) -> Ast {
        let mut context = BuildContext::new();
        let mut tokens = tokens.into_iter().peekable();

        while let Some(token) = tokens.next() {
            match token.kind {
                TokenKind::FrontMatter => context.merge_front_matter(token),
                TokenKind::Heading => context.open_section(token),
                TokenKind::ListItem => {
                    let items = collect_list_run(token, &mut tokens);
                    context.append_list(items);
                }
                TokenKind::Paragraph => context.append_paragraph(token),
                TokenKind::CodeBlock => context.append_code_block(token),
                TokenKind::Table => context.append_table(token),
                TokenKind::Blockquote => context.append_blockquote(token),
                TokenKind::HorizontalRule => context.append_rule(token),
            }
        }

        context.finish()
    }
}

/// Build a tree with a default [`AstBuilder`]
pub fn build(tokens: impl IntoIterator<Item = Token>) -> Ast {
    AstBuilder::new().build(tokens)
}

/// Take `first` and every list item token directly after it
fn collect_list_run<I>(first: Token, tokens: &mut Peekable<I>) -> Vec<Token>
where
    I: Iterator<Item = Token>,
{
    let mut items = vec![first];
    while let Some(token) = tokens.next_if(|t| t.kind == TokenKind::ListItem) {
        items.push(token);
    }
    items
}

/// Per-call builder state
struct BuildContext {
    ast: Ast,
    /// Open headings as (level, owning section)
    heading_stack: Vec<(u8, NodeId)>,
    current_section: NodeId,
    /// Every anchor issued so far, suffixed ones included
    anchors: HashSet<String>,
}

impl BuildContext {
    fn new() -> Self {
        let ast = Ast::new();
        let root = ast.root();
        Self {
            ast,
            heading_stack: Vec::new(),
            current_section: root,
            anchors: HashSet::new(),
        }
    }

    fn finish(self) -> Ast {
        self.ast
    }

    fn append(&mut self, node: Node) -> NodeId {
        self.ast.add_child(self.current_section, node)
    }

    fn merge_front_matter(&mut self, token: Token) {
        for (key, value) in token.metadata.front_matter {
            self.ast.set_metadata(key, value);
        }
    }

    fn open_section(&mut self, token: Token) {
        let level = token.level.unwrap_or(1);

        while self
            .heading_stack
            .last()
            .is_some_and(|&(open, _)| open >= level)
        {
            self.heading_stack.pop();
        }

        let parent = self
            .heading_stack
            .last()
            .map_or(self.ast.root(), |&(_, section)| section);

        let anchor = self.unique_anchor(&token.text);
        let section = self.ast.add_child(
            parent,
            Node::new(NodeType::Section)
                .with_level(level)
                .with_meta("heading", token.text.as_str()),
        );
        self.ast.add_child(
            section,
            Node::new(NodeType::Heading)
                .with_content(token.text)
                .with_level(level)
                .with_meta("line_number", token.line_number)
                .with_attr("anchor", anchor),
        );

        self.heading_stack.push((level, section));
        self.current_section = section;
    }

    /// Slug for `text`, suffixed with `-1`, `-2`, ... until unused
    fn unique_anchor(&mut self, text: &str) -> String {
        let base = slugify(text);
        let mut anchor = base.clone();
        let mut suffix = 0;
        while self.anchors.contains(&anchor) {
            suffix += 1;
            anchor = format!("{}-{}", base, suffix);
        }
        self.anchors.insert(anchor.clone());
        anchor
    }

    fn append_paragraph(&mut self, token: Token) {
        let inline = token.metadata.inline;
        let node = Node::new(NodeType::Paragraph)
            .with_content(token.text)
            .with_meta("line_number", token.line_number)
            .with_meta("inline", spans_value(&inline));
        let paragraph = self.append(node);
        self.attach_inline(paragraph, inline);
    }

    fn append_list(&mut self, items: Vec<Token>) {
        let ordered = items
            .first()
            .and_then(|t| t.metadata.list.as_ref())
            .is_some_and(|m| m.ordered);
        let max_depth = items.iter().filter_map(|t| t.level).max().unwrap_or(0);

        let list = self.append(
            Node::new(NodeType::List)
                .with_meta("ordered", ordered)
                .with_meta("item_count", items.len())
                .with_meta("max_depth", max_depth)
                .with_meta("line_number", items.first().map_or(0, |t| t.line_number)),
        );

        for token in items {
            let (item_ordered, marker) = token
                .metadata
                .list
                .map_or((false, "-".to_string()), |m| (m.ordered, m.marker));
            let inline = token.metadata.inline;

            let item = self.ast.add_child(
                list,
                Node::new(NodeType::ListItem)
                    .with_content(token.text)
                    .with_level(token.level.unwrap_or(0))
                    .with_meta("ordered", item_ordered)
                    .with_meta("marker", marker)
                    .with_meta("line_number", token.line_number)
                    .with_meta("inline", spans_value(&inline)),
            );
            self.attach_inline(item, inline);
        }
    }

    /// Add typed children for inline spans, in source order
    fn attach_inline(&mut self, parent: NodeId, spans: InlineSpans) {
        let mut nodes: Vec<(usize, usize, Node)> = Vec::with_capacity(spans.len());

        for link in spans.links {
            let node = Node::new(NodeType::Link)
                .with_content(link.text)
                .with_attr("url", link.url);
            nodes.push((link.range.start, link.range.end, node));
        }
        for image in spans.images {
            let mut node = Node::new(NodeType::Image)
                .with_content(image.alt)
                .with_attr("src", image.src);
            if let Some(title) = image.title {
                node = node.with_attr("title", title);
            }
            nodes.push((image.range.start, image.range.end, node));
        }
        for emphasis in spans.emphasis {
            let node = Node::new(NodeType::Emphasis)
                .with_content(emphasis.text)
                .with_meta("style", emphasis.style.as_str());
            nodes.push((emphasis.range.start, emphasis.range.end, node));
        }
        for code in spans.code {
            let node = Node::new(NodeType::InlineCode).with_content(code.code);
            nodes.push((code.range.start, code.range.end, node));
        }

        nodes.sort_by_key(|(start, _, _)| *start);
        for (start, end, node) in nodes {
            let node = node.with_meta("start", start).with_meta("end", end);
            self.ast.add_child(parent, node);
        }
    }

    fn append_code_block(&mut self, token: Token) {
        let mut node = Node::new(NodeType::CodeBlock)
            .with_content(token.text)
            .with_meta("language", token.language.clone().map_or(Value::Null, Value::from))
            .with_meta("line_number", token.line_number);
        if let Some(language) = token.language {
            node = node.with_attr("language", language);
        }
        self.append(node);
    }

    fn append_table(&mut self, token: Token) {
        let Some(data) = token.metadata.table else {
            // not produced by the tokenizer, but keep the text
            self.append(
                Node::new(NodeType::Paragraph)
                    .with_content(token.text)
                    .with_meta("line_number", token.line_number),
            );
            return;
        };

        let columns = data.column_count();
        let has_headers = data.has_headers();
        let alignments: Vec<Value> = (0..columns)
            .map(|i| match data.alignments.get(i).copied().flatten() {
                Some(align) => Value::from(align.as_str()),
                None => Value::Null,
            })
            .collect();

        let table = self.append(
            Node::new(NodeType::Table)
                .with_meta("column_count", columns)
                .with_meta("row_count", data.rows.len())
                .with_meta("has_header", has_headers)
                .with_meta("alignments", alignments)
                .with_meta("line_number", token.line_number),
        );

        let TableData {
            headers,
            alignments,
            rows,
        } = data;

        if has_headers {
            self.append_row(table, headers, columns, &alignments, true);
        }
        for row in rows {
            self.append_row(table, row, columns, &alignments, false);
        }
    }

    fn append_row(
        &mut self,
        table: NodeId,
        mut cells: Vec<String>,
        columns: usize,
        alignments: &[Option<Alignment>],
        is_header: bool,
    ) {
        cells.resize(columns, String::new());

        let row = self.ast.add_child(
            table,
            Node::new(NodeType::TableRow).with_meta("is_header", is_header),
        );
        for (column, text) in cells.into_iter().enumerate() {
            let mut cell = Node::new(NodeType::TableCell)
                .with_content(text)
                .with_meta("is_header", is_header)
                .with_meta("column", column);
            if let Some(align) = alignments.get(column).copied().flatten() {
                cell = cell.with_meta("align", align.as_str());
            }
            self.ast.add_child(row, cell);
        }
    }

    fn append_blockquote(&mut self, token: Token) {
        self.append(
            Node::new(NodeType::Blockquote)
                .with_content(token.text)
                .with_meta("line_number", token.line_number),
        );
    }

    fn append_rule(&mut self, token: Token) {
        self.append(
            Node::new(NodeType::HorizontalRule).with_meta("line_number", token.line_number),
        );
    }
}

/// Raw span data kept on the owning node for renderers that format runs
fn spans_value(spans: &InlineSpans) -> Value {
    serde_json::to_value(spans).unwrap_or_else(|_| json!({}))
}

/// Lowercase alphanumerics, every other run collapsed to `-`
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}
