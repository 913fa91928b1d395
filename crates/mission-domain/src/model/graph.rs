//! Visual graph types
//!
//! `Graph` is what the projector produces for the canvas. `GraphSnapshot` is
//! the identifier-level view of a graph that the reconciliation engine diffs:
//! the projection converts into one, and the host hands one back after every
//! interaction.

use std::collections::HashSet;

use super::layout::Position;

/// Closed classification of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Initial,
    Normal,
    Terminal,
    ErrorRole,
    Undefined,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Initial => "initial",
            NodeRole::Normal => "normal",
            NodeRole::Terminal => "terminal",
            NodeRole::ErrorRole => "error",
            NodeRole::Undefined => "undefined",
        }
    }
}

impl core::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub id: String,
    /// Presentation role: `Initial` for the initial state, `Undefined` for
    /// placeholders, the structural role otherwise
    pub role: NodeRole,
    /// Role derived from the node id and its outgoing transitions
    pub structural_role: NodeRole,
    /// Synthesized for a dangling reference, no backing state
    pub placeholder: bool,
    pub label: String,
    pub position: Position,
}

impl VisualNode {
    pub fn is_deletable(&self) -> bool {
        !self.placeholder
    }

    pub fn can_start_edge(&self) -> bool {
        !self.placeholder
    }
}

/// What a visual edge stands for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// Ordinary transitions, by ascending index in the source state
    Transitions(Vec<usize>),
    /// The source state's error transition
    Error,
}

/// Deterministic identity of a visual edge.
///
/// String form: `source|target|0,2` or `source|target|error`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeId {
    source: String,
    target: String,
    kind: EdgeKind,
}

impl EdgeId {
    pub fn transitions(source: impl Into<String>, target: impl Into<String>, mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        Self {
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Transitions(indices),
        }
    }

    pub fn error(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Error,
        }
    }

    /// Decode an identifier produced by [`EdgeId::encode`].
    ///
    /// The source is read up to the first `|` and the kind after the last
    /// one, so targets containing `|` still decode.
    pub fn parse(id: &str) -> Option<Self> {
        let (source, rest) = id.split_once('|')?;
        let (target, kind) = rest.rsplit_once('|')?;
        let kind = if kind == "error" {
            EdgeKind::Error
        } else {
            let indices = kind
                .split(',')
                .map(|i| i.trim().parse::<usize>())
                .collect::<Result<Vec<_>, _>>()
                .ok()?;
            EdgeKind::Transitions(indices)
        };
        Some(Self {
            source: source.to_string(),
            target: target.to_string(),
            kind,
        })
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn kind(&self) -> &EdgeKind {
        &self.kind
    }

    pub fn is_error(&self) -> bool {
        self.kind == EdgeKind::Error
    }
}

impl core::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}|{}|", self.source, self.target)?;
        match &self.kind {
            EdgeKind::Error => f.write_str("error"),
            EdgeKind::Transitions(indices) => {
                let joined = indices.iter().map(usize::to_string).collect::<Vec<_>>().join(",");
                f.write_str(&joined)
            }
        }
    }
}

/// An edge on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct VisualEdge {
    pub id: EdgeId,
    pub label: String,
}

impl VisualEdge {
    pub fn source(&self) -> &str {
        self.id.source()
    }

    pub fn target(&self) -> &str {
        self.id.target()
    }

    /// Error edges are drawn dashed and never merged with transition edges
    pub fn is_error(&self) -> bool {
        self.id.is_error()
    }
}

/// A projected graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &VisualNode> {
        self.nodes.iter().filter(|n| n.placeholder)
    }

    /// Identifier-level view used as the "before" side of a reconciliation
    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeRef::new(n.id.clone(), Some(n.position)))
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| EdgeRef::new(e.id.encode(), e.source(), e.target()))
                .collect(),
        }
    }
}

/// Node as seen by the diff
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRef {
    pub id: String,
    pub position: Option<Position>,
}

impl NodeRef {
    pub fn new(id: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// Edge as seen by the diff. Edges drawn by the user carry whatever id the
/// host assigned, so source and target travel with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRef {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl EdgeRef {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

/// One complete graph state, before or after a user interaction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeRef>,
    pub edges: Vec<EdgeRef>,
}

impl GraphSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn edge_ids(&self) -> HashSet<&str> {
        self.edges.iter().map(|e| e.id.as_str()).collect()
    }

    pub fn node(&self, id: &str) -> Option<&NodeRef> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Draw an edge, as the canvas does when the user connects two nodes
    pub fn add_edge(&mut self, id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) {
        self.edges.push(EdgeRef::new(id, source, target));
    }

    /// Delete an edge by id; returns whether it existed
    pub fn remove_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        before != self.edges.len()
    }

    /// Delete a node together with every edge attached to it
    pub fn remove_node(&mut self, id: &str) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| e.source != id && e.target != id);
        before != self.nodes.len()
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = Some(position);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_id_encoding() {
        let id = EdgeId::transitions("search", "report", vec![2, 0, 1]);
        assert_eq!(id.encode(), "search|report|0,1,2");
        assert_eq!(EdgeId::parse("search|report|0,1,2"), Some(id));

        let error = EdgeId::error("search", "error");
        assert_eq!(error.encode(), "search|error|error");
        assert!(EdgeId::parse("search|error|error").unwrap().is_error());
    }

    #[test]
    fn test_edge_id_rejects_foreign_ids() {
        assert_eq!(EdgeId::parse("reactflow__edge-a-b"), None);
        assert_eq!(EdgeId::parse("a|b|x"), None);
        assert_eq!(EdgeId::parse("a|b"), None);
    }

    #[test]
    fn test_remove_node_drops_attached_edges() {
        let mut snapshot = GraphSnapshot::new();
        snapshot.nodes.push(NodeRef::new("a", None));
        snapshot.nodes.push(NodeRef::new("b", None));
        snapshot.add_edge("a|b|0", "a", "b");
        snapshot.add_edge("b|b|0", "b", "b");

        assert!(snapshot.remove_node("a"));
        assert_eq!(snapshot.edge_ids(), HashSet::from(["b|b|0"]));
    }
}
