//! Node definitions for the document tree
//!
//! This module defines the node kinds that make up an [`Ast`](crate::Ast):
//! structural nodes (document, section), block nodes (paragraph, list,
//! table, ...) and inline nodes (link, image, emphasis, inline code).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Free-form node metadata
pub type Metadata = BTreeMap<String, Value>;

/// Index of a node inside its owning [`Ast`](crate::Ast)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// The unique tree root
    Document,
    /// Synthetic wrapper around a heading and its content
    Section,
    /// A heading (level 1-6)
    Heading,
    /// A paragraph of text
    Paragraph,
    /// A run of list items
    List,
    /// A single list item (depth carried in `level`)
    ListItem,
    /// A fenced code block
    CodeBlock,
    /// A pipe table
    Table,
    /// A table row
    TableRow,
    /// A table cell
    TableCell,
    /// A block quotation
    Blockquote,
    /// A thematic break
    HorizontalRule,
    /// An inline hyperlink
    Link,
    /// An inline image
    Image,
    /// An emphasis span (italic, bold, or both)
    Emphasis,
    /// An inline code span
    InlineCode,
}

impl NodeType {
    /// Snake-case name used in reports and serialized output
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Document => "document",
            NodeType::Section => "section",
            NodeType::Heading => "heading",
            NodeType::Paragraph => "paragraph",
            NodeType::List => "list",
            NodeType::ListItem => "list_item",
            NodeType::CodeBlock => "code_block",
            NodeType::Table => "table",
            NodeType::TableRow => "table_row",
            NodeType::TableCell => "table_cell",
            NodeType::Blockquote => "blockquote",
            NodeType::HorizontalRule => "horizontal_rule",
            NodeType::Link => "link",
            NodeType::Image => "image",
            NodeType::Emphasis => "emphasis",
            NodeType::InlineCode => "inline_code",
        }
    }

    /// Whether this node kind appears inside a paragraph or list item
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            NodeType::Link | NodeType::Image | NodeType::Emphasis | NodeType::InlineCode
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single tree node
///
/// Parent and child links are arena indices; they are maintained by
/// [`Ast::add_child`](crate::Ast::add_child) and cannot be set directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node kind
    pub node_type: NodeType,
    /// Text content
    pub content: String,
    /// Heading/section level or list item depth
    pub level: Option<u8>,
    /// Free-form metadata (line numbers, table flags, inline span data)
    pub metadata: Metadata,
    /// String attributes (`url`, `src`, `anchor`, `language`)
    pub attributes: BTreeMap<String, String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// Create a detached node of the given kind
    pub fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            content: String::new(),
            level: None,
            metadata: Metadata::new(),
            attributes: BTreeMap::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Set the text content
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the level
    pub fn with_level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    /// Insert a metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Insert an attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Parent of this node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered children of this node
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Get a metadata value
    pub fn meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Get a metadata value as a bool
    pub fn meta_bool(&self, key: &str) -> Option<bool> {
        self.metadata.get(key).and_then(Value::as_bool)
    }

    /// Get an attribute
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_builder() {
        let node = Node::new(NodeType::Heading)
            .with_content("Intro")
            .with_level(2)
            .with_meta("line_number", 3)
            .with_attr("anchor", "intro");

        assert_eq!(node.content, "Intro");
        assert_eq!(node.level, Some(2));
        assert_eq!(node.meta("line_number"), Some(&Value::from(3)));
        assert_eq!(node.attr("anchor"), Some("intro"));
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_node_type_names() {
        assert_eq!(NodeType::ListItem.as_str(), "list_item");
        assert_eq!(NodeType::HorizontalRule.to_string(), "horizontal_rule");

        let json = serde_json::to_string(&NodeType::CodeBlock).unwrap();
        assert_eq!(json, "\"code_block\"");
    }

    #[test]
    fn test_inline_kinds() {
        assert!(NodeType::Link.is_inline());
        assert!(NodeType::InlineCode.is_inline());
        assert!(!NodeType::Paragraph.is_inline());
        assert!(!NodeType::Section.is_inline());
    }
}
