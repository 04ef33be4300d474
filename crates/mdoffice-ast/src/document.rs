//! Document tree storage
//!
//! An [`Ast`] owns every node of one document in a flat arena. The
//! Document node always sits at index 0; all other nodes are reachable from
//! it through child links, and each node records its parent as a
//! non-owning [`NodeId`].

use std::ops::Index;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::node::{Metadata, Node, NodeId, NodeType};

/// A complete document tree
///
/// Deserializing checks the arena links, so a decoded tree upholds the same
/// invariants as one grown through [`Ast::add_child`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAst")]
pub struct Ast {
    nodes: Vec<Node>,
}

/// Unchecked wire form of [`Ast`]
#[derive(Deserialize)]
struct RawAst {
    nodes: Vec<Node>,
}

impl TryFrom<RawAst> for Ast {
    type Error = String;

    fn try_from(raw: RawAst) -> Result<Self, Self::Error> {
        let nodes = raw.nodes;
        match nodes.first() {
            Some(root) if root.node_type == NodeType::Document && root.parent.is_none() => {}
            _ => return Err("first node must be a parentless Document".to_string()),
        }

        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                // parents precede children, which rules out cycles
                let parent = node
                    .parent
                    .filter(|p| p.0 < i)
                    .ok_or_else(|| format!("node {} has no valid parent", i))?;
                if !nodes[parent.0].children.contains(&NodeId(i)) {
                    return Err(format!("node {} is missing from its parent's children", i));
                }
            }
            for child in &node.children {
                if nodes.get(child.0).and_then(|c| c.parent) != Some(NodeId(i)) {
                    return Err(format!("node {} lists child {} it does not own", i, child.0));
                }
            }
        }

        Ok(Self { nodes })
    }
}

impl Ast {
    /// Create a tree holding only the Document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeType::Document)],
        }
    }

    /// The Document root
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Document-level metadata (front matter)
    pub fn metadata(&self) -> &Metadata {
        &self.nodes[0].metadata
    }

    /// Set a document-level metadata entry
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.nodes[0].metadata.insert(key.into(), value.into());
    }

    /// Attach `node` as the last child of `parent` and return its id
    ///
    /// Any links already present on `node` are discarded.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Ordered children of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// All ancestors, nearest first, ending with the root
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent(parent);
        }
        ancestors
    }

    /// Other children of this node's parent, in order
    pub fn siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.parent(id) {
            Some(parent) => self
                .children(parent)
                .iter()
                .copied()
                .filter(|&child| child != id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Direct children of a given kind
    pub fn find_children(&self, id: NodeId, node_type: NodeType) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self[child].node_type == node_type)
            .collect()
    }

    /// Pre-order walk of the subtree rooted at `id` (including `id`)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            ast: self,
            stack: vec![id],
        }
    }

    /// Pre-order walk of the whole tree
    pub fn iter(&self) -> Descendants<'_> {
        self.descendants(self.root())
    }

    /// Number of nodes, including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document has no content below the root
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Number of Section nodes on the deepest root-to-leaf chain
    pub fn section_depth(&self) -> usize {
        self.section_depth_from(self.root())
    }

    fn section_depth_from(&self, id: NodeId) -> usize {
        let below = self
            .children(id)
            .iter()
            .map(|&child| self.section_depth_from(child))
            .max()
            .unwrap_or(0);
        if self[id].node_type == NodeType::Section {
            below + 1
        } else {
            below
        }
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for Ast {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// Pre-order iterator over node ids
pub struct Descendants<'a> {
    ast: &'a Ast,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.ast.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Ast, NodeId, NodeId, NodeId) {
        let mut ast = Ast::new();
        let root = ast.root();
        let section = ast.add_child(root, Node::new(NodeType::Section).with_level(1));
        let heading = ast.add_child(
            section,
            Node::new(NodeType::Heading).with_level(1).with_content("Title"),
        );
        let para = ast.add_child(section, Node::new(NodeType::Paragraph).with_content("Body"));
        (ast, section, heading, para)
    }

    #[test]
    fn test_empty_document() {
        let ast = Ast::new();
        assert!(ast.is_empty());
        assert_eq!(ast.len(), 1);
        assert_eq!(ast[ast.root()].node_type, NodeType::Document);
        assert!(ast.parent(ast.root()).is_none());
    }

    #[test]
    fn test_add_child_links_parent() {
        let (ast, section, heading, para) = sample();
        assert_eq!(ast.parent(heading), Some(section));
        assert_eq!(ast.children(section), &[heading, para]);
        assert_eq!(ast.parent(section), Some(ast.root()));
    }

    #[test]
    fn test_ancestors_and_siblings() {
        let (ast, section, heading, para) = sample();
        assert_eq!(ast.ancestors(para), vec![section, ast.root()]);
        assert_eq!(ast.siblings(para), vec![heading]);
        assert!(ast.siblings(ast.root()).is_empty());
    }

    #[test]
    fn test_find_children() {
        let (ast, section, heading, _) = sample();
        assert_eq!(ast.find_children(section, NodeType::Heading), vec![heading]);
        assert!(ast.find_children(section, NodeType::Table).is_empty());
    }

    #[test]
    fn test_preorder_walk() {
        let (ast, section, heading, para) = sample();
        let order: Vec<NodeId> = ast.iter().collect();
        assert_eq!(order, vec![ast.root(), section, heading, para]);
    }

    #[test]
    fn test_section_depth() {
        let (mut ast, section, _, _) = sample();
        assert_eq!(ast.section_depth(), 1);
        let nested = ast.add_child(section, Node::new(NodeType::Section).with_level(3));
        ast.add_child(nested, Node::new(NodeType::Heading).with_level(3));
        assert_eq!(ast.section_depth(), 2);
    }

    #[test]
    fn test_document_metadata() {
        let mut ast = Ast::new();
        ast.set_metadata("title", "Report");
        assert_eq!(ast.metadata().get("title"), Some(&Value::from("Report")));
    }

    #[test]
    fn test_serde_roundtrip_keeps_links() {
        let (ast, section, _, para) = sample();
        let json = serde_json::to_string(&ast).unwrap();
        let restored: Ast = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, ast);
        assert_eq!(restored.parent(para), Some(section));
    }

    #[test]
    fn test_deserialize_rejects_empty_arena() {
        let result = serde_json::from_value::<Ast>(serde_json::json!({ "nodes": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_rejects_broken_links() {
        let (ast, _, _, _) = sample();

        let mut orphaned = serde_json::to_value(&ast).unwrap();
        orphaned["nodes"][0]["children"] = serde_json::json!([]);
        assert!(serde_json::from_value::<Ast>(orphaned).is_err());

        let mut dangling = serde_json::to_value(&ast).unwrap();
        dangling["nodes"][3]["children"] = serde_json::json!([42]);
        assert!(serde_json::from_value::<Ast>(dangling).is_err());
    }
}
