//! JSON form of a projected graph, as exchanged with a canvas host
//!
//! `graph` prints the full form. `apply` reads a graph back after the host
//! edited it; only ids, positions and edge endpoints are required then.

use mission_domain::{EdgeRef, Graph, GraphSnapshot, NodeRef, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structural_role: Option<String>,
    #[serde(default)]
    pub placeholder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionDocument {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDocument {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub error: bool,
}

impl From<&Graph> for GraphDocument {
    fn from(graph: &Graph) -> Self {
        Self {
            nodes: graph
                .nodes
                .iter()
                .map(|n| NodeDocument {
                    id: n.id.clone(),
                    position: Some(PositionDocument {
                        x: n.position.x,
                        y: n.position.y,
                    }),
                    role: Some(n.role.to_string()),
                    structural_role: Some(n.structural_role.to_string()),
                    placeholder: n.placeholder,
                    label: Some(n.label.clone()),
                })
                .collect(),
            edges: graph
                .edges
                .iter()
                .map(|e| EdgeDocument {
                    id: e.id.encode(),
                    source: e.source().to_string(),
                    target: e.target().to_string(),
                    label: Some(e.label.clone()),
                    error: e.is_error(),
                })
                .collect(),
        }
    }
}

impl GraphDocument {
    /// Identifier-level view for reconciliation
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeRef::new(n.id.clone(), n.position.map(|p| Position::new(p.x, p.y))))
                .collect(),
            edges: self
                .edges
                .iter()
                .map(|e| EdgeRef::new(e.id.clone(), e.source.clone(), e.target.clone()))
                .collect(),
        }
    }
}
