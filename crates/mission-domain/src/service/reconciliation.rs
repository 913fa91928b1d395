//! ReconciliationEngine - Apply a visual edit to the state machine
//!
//! The engine compares the graph the user was shown (`before`, always a
//! projection) with the graph the host returned after one interaction
//! (`after`). Differences are computed over identifiers, never positions in
//! a list, in three passes:
//!
//! 1. new edges    -> default `True` transition, unless one already exists
//! 2. deleted edges -> error edge cleared, or first matching transition removed
//! 3. deleted nodes -> state removed with cascade, stored position purged
//!
//! The engine works on copies and returns them. Nothing is committed until
//! the caller decides to (typically after persistence succeeded), so an
//! interaction is applied completely or not at all.

use crate::model::graph::{EdgeId, GraphSnapshot};
use crate::model::layout::LayoutMetadata;
use crate::model::state_machine::StateMachine;

/// One mutation applied by a reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChange {
    TransitionAdded {
        source: String,
        target: String,
    },
    TransitionRemoved {
        source: String,
        target: String,
        condition: String,
    },
    ErrorTransitionCleared {
        source: String,
    },
    StateRemoved {
        state_id: String,
        /// References to the state removed from other states
        cascaded: usize,
    },
}

/// Result of reconciling one interaction
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub state_machine: StateMachine,
    pub layout: LayoutMetadata,
    pub changes: Vec<ModelChange>,
}

impl Reconciliation {
    /// The single "model changed" signal for the interaction
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Stateless diff-and-apply service
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn reconcile(
        &self,
        machine: &StateMachine,
        layout: &LayoutMetadata,
        before: &GraphSnapshot,
        after: &GraphSnapshot,
    ) -> Reconciliation {
        let mut result = Reconciliation {
            state_machine: machine.clone(),
            layout: layout.clone(),
            changes: Vec::new(),
        };

        self.apply_new_edges(&mut result, before, after);
        self.apply_deleted_edges(&mut result, before, after);
        self.apply_deleted_nodes(&mut result, before, after);

        result
    }

    fn apply_new_edges(&self, result: &mut Reconciliation, before: &GraphSnapshot, after: &GraphSnapshot) {
        let known = before.edge_ids();

        for edge in after.edges.iter().filter(|e| !known.contains(e.id.as_str())) {
            // Sources without a backing state are refused at the editing
            // boundary; an unknown source here simply has nothing to mutate.
            if let Ok(true) = result.state_machine.ensure_transition(&edge.source, &edge.target) {
                result.changes.push(ModelChange::TransitionAdded {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
        }
    }

    fn apply_deleted_edges(&self, result: &mut Reconciliation, before: &GraphSnapshot, after: &GraphSnapshot) {
        let remaining = after.edge_ids();

        for edge in before.edges.iter().filter(|e| !remaining.contains(e.id.as_str())) {
            // Endpoints come from the snapshot; the id only tells the kind
            let source = edge.source.clone();
            let target = edge.target.clone();
            let is_error = EdgeId::parse(&edge.id).is_some_and(|id| id.is_error());

            if is_error {
                if let Ok(true) = result.state_machine.clear_error_transition(&source) {
                    result.changes.push(ModelChange::ErrorTransitionCleared { source });
                }
            } else if let Ok(Some(removed)) = result.state_machine.remove_first_transition_to(&source, &target) {
                result.changes.push(ModelChange::TransitionRemoved {
                    source,
                    target,
                    condition: removed.condition,
                });
            }
        }
    }

    fn apply_deleted_nodes(&self, result: &mut Reconciliation, before: &GraphSnapshot, after: &GraphSnapshot) {
        let remaining = after.node_ids();

        for node in before.nodes.iter().filter(|n| !remaining.contains(n.id.as_str())) {
            if let Ok((_, cascaded)) = result.state_machine.remove_state(&node.id) {
                result.layout.remove(&node.id);
                result.changes.push(ModelChange::StateRemoved {
                    state_id: node.id.clone(),
                    cascaded,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::layout::Position;
    use crate::model::state::{State, Transition};
    use crate::service::graph_projector::GraphProjector;

    fn machine() -> StateMachine {
        StateMachine::from_parts(
            "execution",
            [
                State::new("execution")
                    .with_transition(Transition::new("{next_goal} == 'ground'", "conclusion"))
                    .with_transition(Transition::new("{locations_to_be_visited} == []", "conclusion"))
                    .with_transition(Transition::new("else", "execution"))
                    .with_error_transition("error"),
                State::new("conclusion").with_transition(Transition::always("end")),
            ],
        )
    }

    fn snapshot(machine: &StateMachine, layout: &LayoutMetadata) -> GraphSnapshot {
        GraphProjector::new().project(machine, layout).snapshot()
    }

    #[test]
    fn test_unchanged_graph_is_noop() {
        let machine = machine();
        let layout = LayoutMetadata::new();
        let before = snapshot(&machine, &layout);

        let result = ReconciliationEngine::new().reconcile(&machine, &layout, &before, &before.clone());

        assert!(!result.changed());
        assert_eq!(result.state_machine, machine);
        assert_eq!(result.layout, layout);
    }

    #[test]
    fn test_new_edge_adds_single_default_transition() {
        let engine = ReconciliationEngine::new();
        let machine = machine();
        let layout = LayoutMetadata::new();
        let before = snapshot(&machine, &layout);
        let mut after = before.clone();
        after.add_edge("reactflow__edge-conclusion-execution", "conclusion", "execution");

        let first = engine.reconcile(&machine, &layout, &before, &after);

        assert_eq!(
            first.changes,
            [ModelChange::TransitionAdded {
                source: "conclusion".to_string(),
                target: "execution".to_string(),
            }]
        );
        let conclusion = first.state_machine.state("conclusion").unwrap();
        assert_eq!(conclusion.transitions()[1], Transition::always("execution"));

        let again = engine.reconcile(&first.state_machine, &first.layout, &before, &after);
        assert!(!again.changed());
        assert_eq!(again.state_machine, first.state_machine);
    }

    #[test]
    fn test_new_edge_to_existing_target_is_noop() {
        let machine = machine();
        let layout = LayoutMetadata::new();
        let before = snapshot(&machine, &layout);
        let mut after = before.clone();
        after.add_edge("drawn-1", "execution", "conclusion");

        let result = ReconciliationEngine::new().reconcile(&machine, &layout, &before, &after);

        assert!(!result.changed());
    }

    #[test]
    fn test_deleted_grouped_edge_removes_first_matching_transition() {
        let machine = machine();
        let layout = LayoutMetadata::new();
        let before = snapshot(&machine, &layout);
        let mut after = before.clone();
        assert!(after.remove_edge("execution|conclusion|0,1"));

        let result = ReconciliationEngine::new().reconcile(&machine, &layout, &before, &after);

        let conditions: Vec<_> = result
            .state_machine
            .state("execution")
            .unwrap()
            .transitions()
            .iter()
            .map(|t| t.condition.as_str())
            .collect();
        assert_eq!(conditions, ["{locations_to_be_visited} == []", "else"]);
    }

    #[test]
    fn test_deleted_error_edge_clears_error_transition() {
        let machine = machine();
        let layout = LayoutMetadata::new();
        let before = snapshot(&machine, &layout);
        let mut after = before.clone();
        assert!(after.remove_edge("execution|error|error"));

        let result = ReconciliationEngine::new().reconcile(&machine, &layout, &before, &after);

        assert_eq!(
            result.changes,
            [ModelChange::ErrorTransitionCleared {
                source: "execution".to_string()
            }]
        );
        let execution = result.state_machine.state("execution").unwrap();
        assert!(execution.error_transition().is_none());
        assert_eq!(execution.transitions().len(), 3);
    }

    #[test]
    fn test_deleted_edge_from_state_with_separator_in_id() {
        let machine = StateMachine::from_parts(
            "a|b",
            [
                State::new("a|b")
                    .with_transition(Transition::always("c"))
                    .with_error_transition("error"),
                State::new("c"),
            ],
        );
        let layout = LayoutMetadata::new();
        let before = snapshot(&machine, &layout);
        let mut after = before.clone();
        assert!(after.remove_edge("a|b|c|0"));

        let result = ReconciliationEngine::new().reconcile(&machine, &layout, &before, &after);

        assert_eq!(
            result.changes,
            [ModelChange::TransitionRemoved {
                source: "a|b".to_string(),
                target: "c".to_string(),
                condition: "True".to_string(),
            }]
        );
        assert!(result.state_machine.state("a|b").unwrap().transitions().is_empty());

        let mut after = before.clone();
        assert!(after.remove_edge("a|b|error|error"));
        let result = ReconciliationEngine::new().reconcile(&machine, &layout, &before, &after);
        assert!(result.state_machine.state("a|b").unwrap().error_transition().is_none());
    }

    #[test]
    fn test_deleted_node_cascades_and_purges_position() {
        let machine = machine();
        let mut layout = LayoutMetadata::new();
        layout.set_position("conclusion", Position::new(400.0, 80.0));
        let before = snapshot(&machine, &layout);
        let mut after = before.clone();
        assert!(after.remove_node("conclusion"));

        let result = ReconciliationEngine::new().reconcile(&machine, &layout, &before, &after);

        assert!(result.changed());
        assert!(!result.state_machine.contains("conclusion"));
        assert!(result
            .state_machine
            .states()
            .flat_map(|s| s.transitions())
            .all(|t| t.target_state_id != "conclusion"));
        assert_eq!(result.layout.position("conclusion"), None);
        assert!(result.changes.contains(&ModelChange::StateRemoved {
            state_id: "conclusion".to_string(),
            cascaded: 1,
        }));
    }

    #[test]
    fn test_placeholder_node_removal_is_ignored() {
        let machine = machine();
        let layout = LayoutMetadata::new();
        let before = snapshot(&machine, &layout);
        let mut after = before.clone();
        after.nodes.retain(|n| n.id != "end");

        let result = ReconciliationEngine::new().reconcile(&machine, &layout, &before, &after);

        assert!(!result.changed());
    }

    #[test]
    fn test_edge_from_undefined_source_is_ignored() {
        let machine = machine();
        let layout = LayoutMetadata::new();
        let before = snapshot(&machine, &layout);
        let mut after = before.clone();
        after.add_edge("drawn-2", "end", "execution");

        let result = ReconciliationEngine::new().reconcile(&machine, &layout, &before, &after);

        assert!(!result.changed());
    }
}
