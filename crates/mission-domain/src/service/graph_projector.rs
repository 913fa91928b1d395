//! GraphProjector - StateMachine to visual graph
//!
//! Pure and deterministic: the same machine and layout always yield the same
//! nodes, edges and edge identities. This is what lets the reconciliation
//! engine diff a user-edited graph against the last projection.

use std::collections::HashMap;

use crate::model::graph::{EdgeId, Graph, NodeRole, VisualEdge, VisualNode};
use crate::model::layout::{LayoutMetadata, Position};
use crate::model::state::{State, END_STATE, ERROR_STATE};
use crate::model::state_machine::StateMachine;

/// Fallback placement for nodes without a stored position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub origin: Position,
    pub x_spacing: f64,
    pub y_spacing: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 2,
            origin: Position::new(100.0, 80.0),
            x_spacing: 300.0,
            y_spacing: 200.0,
        }
    }
}

impl GridLayout {
    /// Slot for the node at `index`: row = index / columns, column = index % columns
    pub fn slot(&self, index: usize) -> Position {
        let columns = self.columns.max(1);
        let (row, col) = (index / columns, index % columns);
        Position::new(
            self.origin.x + col as f64 * self.x_spacing,
            self.origin.y + row as f64 * self.y_spacing,
        )
    }
}

/// Bounds for edge labels, in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPolicy {
    /// Max length of a lone condition
    pub single_max: usize,
    /// Conditions at least this long are shortened in a grouped label
    pub item_max: usize,
    /// Max length of the joined label before collapsing to a count
    pub joined_max: usize,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self {
            single_max: 30,
            item_max: 25,
            joined_max: 50,
        }
    }
}

impl LabelPolicy {
    /// Label for a group of conditions sharing one (source, target) pair
    pub fn label(&self, conditions: &[&str]) -> String {
        match conditions {
            [] => String::new(),
            [single] => truncate(single, self.single_max),
            many => {
                let joined = many
                    .iter()
                    .map(|c| shorten_item(c, self.item_max))
                    .collect::<Vec<_>>()
                    .join(" | ");
                if joined.chars().count() > self.joined_max {
                    format!("{} conditions", many.len())
                } else {
                    joined
                }
            }
        }
    }
}

/// Cut `text` to `max` characters, ending in `...` when shortened
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    ellipsize(text, max)
}

/// Grouped items are kept whole only below `bound`
fn shorten_item(text: &str, bound: usize) -> String {
    if text.chars().count() < bound {
        return text.to_string();
    }
    ellipsize(text, bound)
}

fn ellipsize(text: &str, max: usize) -> String {
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Structural role of a node.
///
/// `end` and `error` are sentinels. A defined state whose transitions all
/// lead to a sentinel is terminal. A referenced id with no state is undefined.
pub fn classify_state(id: &str, state: Option<&State>) -> NodeRole {
    match id {
        END_STATE => return NodeRole::Terminal,
        ERROR_STATE => return NodeRole::ErrorRole,
        _ => {}
    }
    let Some(state) = state else {
        return NodeRole::Undefined;
    };
    let transitions = state.transitions();
    let only_sentinels = transitions
        .iter()
        .all(|t| t.target_state_id == END_STATE || t.target_state_id == ERROR_STATE);
    if !transitions.is_empty() && only_sentinels {
        NodeRole::Terminal
    } else {
        NodeRole::Normal
    }
}

/// Projects state machines into visual graphs
#[derive(Debug, Clone, Default)]
pub struct GraphProjector {
    grid: GridLayout,
    labels: LabelPolicy,
}

impl GraphProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&self, machine: &StateMachine, layout: &LayoutMetadata) -> Graph {
        let mut graph = Graph::default();

        for state in machine.states() {
            let index = graph.nodes.len();
            let structural_role = classify_state(state.id(), Some(state));
            let role = if state.id() == machine.initial_state_id() {
                NodeRole::Initial
            } else {
                structural_role
            };
            graph.nodes.push(VisualNode {
                id: state.id().to_string(),
                role,
                structural_role,
                placeholder: false,
                label: state.id().to_string(),
                position: self.position_of(state.id(), index, layout),
            });

            self.push_edges(state, &mut graph.edges);
        }

        // Placeholders come after every defined node so their fallback slots
        // never shift the defined ones.
        for id in machine.undefined_targets() {
            let index = graph.nodes.len();
            graph.nodes.push(VisualNode {
                id: id.to_string(),
                role: NodeRole::Undefined,
                structural_role: classify_state(id, None),
                placeholder: true,
                label: id.to_string(),
                position: self.position_of(id, index, layout),
            });
        }

        graph
    }

    fn position_of(&self, id: &str, index: usize, layout: &LayoutMetadata) -> Position {
        layout.position(id).unwrap_or_else(|| self.grid.slot(index))
    }

    /// One edge per distinct target (in first-seen order), then the error edge
    fn push_edges(&self, state: &State, edges: &mut Vec<VisualEdge>) {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<(usize, &str)>> = HashMap::new();

        for (index, transition) in state.transitions().iter().enumerate() {
            let target = transition.target_state_id.as_str();
            if target.is_empty() {
                continue;
            }
            let group = groups.entry(target).or_insert_with(|| {
                order.push(target);
                Vec::new()
            });
            group.push((index, transition.condition.as_str()));
        }

        for target in order {
            let group = &groups[target];
            let conditions: Vec<&str> = group.iter().map(|(_, c)| *c).collect();
            let indices = group.iter().map(|(i, _)| *i).collect();
            edges.push(VisualEdge {
                id: EdgeId::transitions(state.id(), target, indices),
                label: self.labels.label(&conditions),
            });
        }

        if let Some(error) = state.error_transition() {
            if !error.target_state_id.is_empty() {
                edges.push(VisualEdge {
                    id: EdgeId::error(state.id(), error.target_state_id.as_str()),
                    label: "error".to_string(),
                });
            }
        }
    }
}
