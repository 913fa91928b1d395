//! EditorSession - One open mission type
//!
//! The session is the single owner of a mission type while it is edited.
//! Every change, whether typed into a side panel or drawn on the canvas,
//! runs the same cycle:
//!
//! ```text
//! copy model -> mutate copy -> save copy -> commit -> re-project
//! ```
//!
//! If any step before the commit fails, the session keeps its previous model,
//! layout and graph.

use mission_domain::{
    validate_state_name, ConditionTemplateCatalog, Graph, GraphProjector, GraphSnapshot, LayoutMetadata,
    MissionTypeId, MissionTypeRepository, MissionTypeSpec, ModelChange, ReconciliationEngine, State,
    StateDetails, StateMachine, StateTemplate, Transition,
};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

/// What one canvas interaction did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    /// Model mutations, in the order they were applied
    pub changes: Vec<ModelChange>,
    /// Nodes whose stored position changed
    pub moved: Vec<String>,
}

impl EditOutcome {
    /// Model changed; fired once per interaction
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn is_noop(&self) -> bool {
        self.changes.is_empty() && self.moved.is_empty()
    }
}

/// Editing session over a repository
pub struct EditorSession<R: MissionTypeRepository> {
    repository: R,
    spec: MissionTypeSpec,
    layout: LayoutMetadata,
    /// Last projection shown to the host; the "before" of the next edit
    graph: Graph,
    projector: GraphProjector,
    engine: ReconciliationEngine,
    conditions: ConditionTemplateCatalog,
}

impl<R: MissionTypeRepository> EditorSession<R> {
    /// Open a stored mission type
    pub fn open(repository: R, id: &MissionTypeId) -> SessionResult<Self> {
        let spec = repository.load_spec(id)?;
        let layout = repository.load_layout(id)?;
        info!(mission_type = %id, states = spec.state_machine().len(), "Opened mission type");
        Ok(Self::from_parts(repository, spec, layout))
    }

    /// Create and store a new mission type with an empty state machine
    pub fn create(mut repository: R, id: MissionTypeId, description: impl Into<String>) -> SessionResult<Self> {
        if !id.is_valid() {
            return Err(SessionError::InvalidMissionTypeName { name: id.to_string() });
        }
        if repository.exists(&id)? {
            return Err(SessionError::AlreadyExists { id: id.to_string() });
        }
        let spec = MissionTypeSpec::new(id, description);
        let layout = LayoutMetadata::new();
        repository.save_spec(&spec, &layout)?;
        info!(mission_type = %spec.id(), "Created mission type");
        Ok(Self::from_parts(repository, spec, layout))
    }

    fn from_parts(repository: R, spec: MissionTypeSpec, layout: LayoutMetadata) -> Self {
        let projector = GraphProjector::new();
        let graph = projector.project(spec.state_machine(), &layout);
        Self {
            repository,
            spec,
            layout,
            graph,
            projector,
            engine: ReconciliationEngine::new(),
            conditions: ConditionTemplateCatalog::new(),
        }
    }

    // ========== Getters ==========

    pub fn id(&self) -> &MissionTypeId {
        self.spec.id()
    }

    pub fn spec(&self) -> &MissionTypeSpec {
        &self.spec
    }

    pub fn state_machine(&self) -> &StateMachine {
        self.spec.state_machine()
    }

    pub fn layout(&self) -> &LayoutMetadata {
        &self.layout
    }

    /// The current projection
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn into_repository(self) -> R {
        self.repository
    }

    /// Targets offered for a new transition out of `source`
    pub fn possible_targets(&self, source: &str) -> Vec<String> {
        self.state_machine().possible_targets(source)
    }

    // ========== Canvas interactions ==========

    /// Apply the graph the host returned after one interaction.
    ///
    /// Positions of moved nodes are stored, then the model is reconciled
    /// against the last projection. Deleting a placeholder, or drawing an
    /// edge from or to one, rejects the whole interaction.
    pub fn apply_edit(&mut self, after: &GraphSnapshot) -> SessionResult<EditOutcome> {
        self.check_edit(after)?;

        let before = self.graph.snapshot();
        let mut layout = self.layout.clone();
        let mut moved = Vec::new();
        for node in &after.nodes {
            let Some(position) = node.position else {
                continue;
            };
            let previous = before.node(&node.id).and_then(|n| n.position);
            if previous != Some(position) {
                layout.set_position(node.id.clone(), position);
                moved.push(node.id.clone());
            }
        }

        let reconciliation = self
            .engine
            .reconcile(self.spec.state_machine(), &layout, &before, after);
        let outcome = EditOutcome {
            changes: reconciliation.changes,
            moved,
        };

        if outcome.is_noop() {
            debug!(mission_type = %self.id(), "Interaction changed nothing");
            return Ok(outcome);
        }

        self.commit(reconciliation.state_machine, reconciliation.layout)?;
        for change in &outcome.changes {
            info!(mission_type = %self.id(), change = ?change, "Applied canvas edit");
        }
        Ok(outcome)
    }

    fn check_edit(&self, after: &GraphSnapshot) -> SessionResult<()> {
        let remaining = after.node_ids();
        for node in self.graph.placeholders() {
            if !remaining.contains(node.id.as_str()) {
                return Err(self.reject(SessionError::PlaceholderEdit {
                    node_id: node.id.clone(),
                }));
            }
        }

        let shown = self.graph.snapshot();
        let known_edges = shown.edge_ids();
        for edge in after.edges.iter().filter(|e| !known_edges.contains(e.id.as_str())) {
            for end in [&edge.source, &edge.target] {
                match self.graph.node(end) {
                    None => {
                        return Err(self.reject(SessionError::UnknownNode { node_id: end.clone() }));
                    }
                    Some(node) if node.placeholder => {
                        return Err(self.reject(SessionError::PlaceholderEdit { node_id: end.clone() }));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    fn reject(&self, error: SessionError) -> SessionError {
        warn!(mission_type = %self.id(), %error, "Rejected canvas edit");
        error
    }

    // ========== Side panel operations ==========

    /// Create a state from a template.
    ///
    /// `selected` is the state the user had selected: its details are copied
    /// by [`StateTemplate::CopySelected`] and the new node is placed next to it.
    pub fn create_state(&mut self, name: &str, template: StateTemplate, selected: Option<&str>) -> SessionResult<()> {
        validate_state_name(name)?;
        let source = selected.and_then(|id| self.state_machine().state(id));
        let state = State::from_template(name, template, source);

        self.transact(|machine, layout| {
            machine.add_state(state)?;
            let position = layout.placement_for_new_state(selected);
            layout.set_position(name, position);
            Ok(())
        })?;
        info!(mission_type = %self.id(), state = name, template = template.label(), "Created state");
        Ok(())
    }

    /// Delete a state and every reference to it; returns the number of
    /// references removed from other states
    pub fn delete_state(&mut self, id: &str) -> SessionResult<usize> {
        let cascaded = self.transact(|machine, layout| {
            let (_, cascaded) = machine.remove_state(id)?;
            layout.remove(id);
            Ok(cascaded)
        })?;
        info!(mission_type = %self.id(), state = id, cascaded, "Deleted state");
        Ok(cascaded)
    }

    pub fn set_initial_state(&mut self, id: &str) -> SessionResult<()> {
        self.transact(|machine, _| Ok(machine.set_initial_state(id)?))
    }

    pub fn update_details(&mut self, id: &str, details: StateDetails) -> SessionResult<()> {
        self.transact(|machine, _| Ok(machine.update_details(id, details)?))
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> SessionResult<()> {
        let mut spec = self.spec.clone();
        spec.set_description(description);
        self.repository.save_spec(&spec, &self.layout)?;
        self.spec = spec;
        Ok(())
    }

    /// Add a transition with a literal condition; returns its index
    pub fn add_transition(&mut self, source: &str, target: &str, condition: impl Into<String>) -> SessionResult<usize> {
        let transition = Transition::new(condition, target);
        let index = self.transact(|machine, _| Ok(machine.add_transition(source, transition)?))?;
        debug!(mission_type = %self.id(), source, target, index, "Added transition");
        Ok(index)
    }

    /// Resolve a condition template by key or label
    pub fn resolve_condition(&self, template: &str, value: &str) -> SessionResult<String> {
        self.conditions
            .resolve(template, value)
            .ok_or_else(|| SessionError::UnknownConditionTemplate {
                name: template.to_string(),
            })
    }

    pub fn update_condition(&mut self, source: &str, index: usize, condition: impl Into<String>) -> SessionResult<()> {
        let condition = condition.into();
        self.transact(|machine, _| Ok(machine.update_condition(source, index, condition)?))
    }

    /// Delete one condition of a state, leaving its siblings in place
    pub fn delete_condition(&mut self, source: &str, index: usize) -> SessionResult<Transition> {
        let removed = self.transact(|machine, _| Ok(machine.remove_transition_at(source, index)?))?;
        debug!(mission_type = %self.id(), source, index, condition = %removed.condition, "Deleted condition");
        Ok(removed)
    }

    pub fn set_error_transition(&mut self, source: &str, target: &str) -> SessionResult<()> {
        self.transact(|machine, _| Ok(machine.set_error_transition(source, target)?))
    }

    /// Returns whether an error transition was present
    pub fn clear_error_transition(&mut self, source: &str) -> SessionResult<bool> {
        self.transact(|machine, _| Ok(machine.clear_error_transition(source)?))
    }

    /// Forget every stored position; the grid fallback takes over
    pub fn reset_layout(&mut self) -> SessionResult<()> {
        self.transact(|_, layout| {
            layout.clear();
            Ok(())
        })
    }

    // ========== Internals ==========

    /// Run an operation on copies and commit them once they are saved
    fn transact<T>(
        &mut self,
        operation: impl FnOnce(&mut StateMachine, &mut LayoutMetadata) -> SessionResult<T>,
    ) -> SessionResult<T> {
        let mut machine = self.spec.state_machine().clone();
        let mut layout = self.layout.clone();
        let value = operation(&mut machine, &mut layout)?;
        self.commit(machine, layout)?;
        Ok(value)
    }

    fn commit(&mut self, machine: StateMachine, layout: LayoutMetadata) -> SessionResult<()> {
        let mut spec = self.spec.clone();
        spec.replace_state_machine(machine);
        self.repository.save_spec(&spec, &layout)?;

        self.spec = spec;
        self.layout = layout;
        self.graph = self.projector.project(self.spec.state_machine(), &self.layout);
        Ok(())
    }
}
