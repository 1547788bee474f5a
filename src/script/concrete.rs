//! Concrete node tree produced by the script parser.
//!
//! Nodes are stored in a flat arena and refer to each other by `NodeId`.
//! The `parent` link is only used for navigation; the arena owns every
//! node.

use std::ops::Index;

use serde::Serialize;

use super::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConcreteNodeKind {
    Import,
    Variable,
    Word,
    Quote,
    LeftBrace,
    RightBrace,
    Colon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcreteNode {
    pub token: String,
    pub kind: ConcreteNodeKind,
    pub file: String,
    pub line: u32,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl ConcreteNode {
    /// Unlinked node carrying the token's text.  Quote marks are stripped.
    pub fn from_token(token: &Token, kind: ConcreteNodeKind) -> Self {
        let text = if kind == ConcreteNodeKind::Quote {
            strip_quotes(&token.lexeme)
        } else {
            &token.lexeme
        };

        Self {
            token: text.to_string(),
            kind,
            file: token.file.clone(),
            line: token.line,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Drops exactly the first and last character.
fn strip_quotes(lexeme: &str) -> &str {
    let mut chars = lexeme.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcreteTree {
    nodes: Vec<ConcreteNode>,
    roots: Vec<NodeId>,
}

impl ConcreteTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn root_nodes(&self) -> impl Iterator<Item = &ConcreteNode> + '_ {
        self.roots.iter().map(move |id| &self[*id])
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &ConcreteNode> + '_ {
        self[id].children.iter().map(move |child| &self[*child])
    }

    /// Appends `node` under `parent`, or as a new root when `parent` is
    /// `None`, keeping the parent/children links consistent.
    pub fn insert(&mut self, mut node: ConcreteNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);

        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Nested, serializable copy of the tree in document order.
    pub fn to_view(&self) -> Vec<NodeView> {
        self.roots.iter().map(|id| self.view(*id)).collect()
    }

    fn view(&self, id: NodeId) -> NodeView {
        let node = &self[id];
        NodeView {
            token: node.token.clone(),
            kind: node.kind,
            line: node.line,
            children: node.children.iter().map(|c| self.view(*c)).collect(),
        }
    }
}

impl Index<NodeId> for ConcreteTree {
    type Output = ConcreteNode;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeView {
    pub token: String,
    pub kind: ConcreteNodeKind,
    pub line: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeView>,
}
