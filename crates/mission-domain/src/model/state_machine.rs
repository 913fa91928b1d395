//! StateMachine - The owned, invariant-keeping core of a mission type
//!
//! Every mutation goes through the explicit operations below. Callers never
//! write fields directly, so the invariants hold after each call:
//!
//! - state ids are unique
//! - a non-empty machine always has a valid initial state
//! - deleting a state removes every transition and error transition into it

use std::collections::{BTreeMap, BTreeSet};

use super::state::{ErrorTransition, State, StateDetails, Transition, END_STATE, ERROR_STATE};

/// Errors raised by StateMachine operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    /// No state with this id
    StateNotFound { id: String },
    /// A state with this id already exists
    DuplicateState { id: String },
    /// Name contains characters other than ASCII letters, digits, underscores
    InvalidStateName { name: String },
    /// Transition index out of range for the state
    TransitionNotFound { state_id: String, index: usize },
}

impl core::fmt::Display for StateMachineError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StateMachineError::StateNotFound { id } => write!(f, "State '{}' not found", id),
            StateMachineError::DuplicateState { id } => write!(f, "State '{}' already exists", id),
            StateMachineError::InvalidStateName { name } => write!(
                f,
                "Invalid state name '{}' - use letters, numbers, underscores",
                name
            ),
            StateMachineError::TransitionNotFound { state_id, index } => {
                write!(f, "State '{}' has no transition #{}", state_id, index)
            }
        }
    }
}

impl std::error::Error for StateMachineError {}

/// Names the editor creates: non-empty ASCII letters, digits and underscores
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check a name for an explicitly created state
pub fn validate_state_name(name: &str) -> Result<(), StateMachineError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(StateMachineError::InvalidStateName {
            name: name.to_string(),
        })
    }
}

/// A mission state machine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateMachine {
    initial_state_id: String,
    states: BTreeMap<String, State>,
}

impl StateMachine {
    /// Empty machine: no states, empty initial pointer
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a machine from loaded parts, repairing the initial pointer.
    ///
    /// Later states with an id already seen replace earlier ones.
    pub fn from_parts(initial_state_id: impl Into<String>, states: impl IntoIterator<Item = State>) -> Self {
        let mut machine = Self {
            initial_state_id: initial_state_id.into(),
            states: states
                .into_iter()
                .map(|s| (s.id().to_string(), s))
                .collect(),
        };
        machine.repair_initial_state();
        machine
    }

    // ========== Queries ==========

    pub fn initial_state_id(&self) -> &str {
        &self.initial_state_id
    }

    /// States in id order
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn state_ids(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn state(&self, id: &str) -> Option<&State> {
        self.states.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.states.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Every id referenced by a transition or error transition
    pub fn referenced_targets(&self) -> BTreeSet<&str> {
        let mut targets = BTreeSet::new();
        for state in self.states.values() {
            for transition in state.transitions() {
                targets.insert(transition.target_state_id.as_str());
            }
            if let Some(error) = state.error_transition() {
                targets.insert(error.target_state_id.as_str());
            }
        }
        targets
    }

    /// Referenced ids with no backing state (placeholders)
    pub fn undefined_targets(&self) -> BTreeSet<&str> {
        self.referenced_targets()
            .into_iter()
            .filter(|id| !id.is_empty() && !self.contains(id))
            .collect()
    }

    /// Targets offered when authoring a transition out of `source`:
    /// every defined state plus the sentinels, without `source` itself
    pub fn possible_targets(&self, source: &str) -> Vec<String> {
        let mut targets: Vec<String> = self.states.keys().cloned().collect();
        for sentinel in [END_STATE, ERROR_STATE] {
            if !self.contains(sentinel) {
                targets.push(sentinel.to_string());
            }
        }
        targets.retain(|t| t != source);
        targets
    }

    // ========== State operations ==========

    /// Add a state. The first state added becomes the initial state.
    pub fn add_state(&mut self, state: State) -> Result<(), StateMachineError> {
        if self.contains(state.id()) {
            return Err(StateMachineError::DuplicateState {
                id: state.id().to_string(),
            });
        }
        self.states.insert(state.id().to_string(), state);
        self.repair_initial_state();
        Ok(())
    }

    /// Remove a state and cascade: every transition and error transition
    /// targeting it disappears. Returns the state and the number of
    /// references removed from the remaining states.
    pub fn remove_state(&mut self, id: &str) -> Result<(State, usize), StateMachineError> {
        let removed = self
            .states
            .remove(id)
            .ok_or_else(|| StateMachineError::StateNotFound { id: id.to_string() })?;

        let cascaded = self
            .states
            .values_mut()
            .map(|s| s.purge_references_to(id))
            .sum();

        if self.initial_state_id == id {
            self.initial_state_id.clear();
        }
        self.repair_initial_state();
        Ok((removed, cascaded))
    }

    pub fn set_initial_state(&mut self, id: &str) -> Result<(), StateMachineError> {
        if !self.contains(id) {
            return Err(StateMachineError::StateNotFound { id: id.to_string() });
        }
        self.initial_state_id = id.to_string();
        Ok(())
    }

    /// Replace prompt, tools and observations of a state
    pub fn update_details(&mut self, id: &str, details: StateDetails) -> Result<(), StateMachineError> {
        self.state_mut(id)?.set_details(details);
        Ok(())
    }

    // ========== Transition operations ==========

    /// Append a transition; returns its index within the source state
    pub fn add_transition(&mut self, source: &str, transition: Transition) -> Result<usize, StateMachineError> {
        Ok(self.state_mut(source)?.push_transition(transition))
    }

    /// Append a default `True` transition unless `source` already has one
    /// targeting `target`. Returns whether a transition was added.
    pub fn ensure_transition(&mut self, source: &str, target: &str) -> Result<bool, StateMachineError> {
        let state = self.state_mut(source)?;
        if state.has_transition_to(target) {
            return Ok(false);
        }
        state.push_transition(Transition::always(target));
        Ok(true)
    }

    /// Remove the first transition of `source` targeting `target`
    pub fn remove_first_transition_to(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<Option<Transition>, StateMachineError> {
        Ok(self.state_mut(source)?.remove_first_transition_to(target))
    }

    /// Remove exactly one transition by index, leaving siblings untouched
    pub fn remove_transition_at(&mut self, source: &str, index: usize) -> Result<Transition, StateMachineError> {
        self.state_mut(source)?
            .remove_transition_at(index)
            .ok_or_else(|| StateMachineError::TransitionNotFound {
                state_id: source.to_string(),
                index,
            })
    }

    pub fn update_condition(
        &mut self,
        source: &str,
        index: usize,
        condition: impl Into<String>,
    ) -> Result<(), StateMachineError> {
        let slot = self
            .state_mut(source)?
            .condition_mut(index)
            .ok_or_else(|| StateMachineError::TransitionNotFound {
                state_id: source.to_string(),
                index,
            })?;
        *slot = condition.into();
        Ok(())
    }

    pub fn set_error_transition(&mut self, source: &str, target: impl Into<String>) -> Result<(), StateMachineError> {
        self.state_mut(source)?
            .set_error_transition(Some(ErrorTransition::new(target)));
        Ok(())
    }

    /// Clear the error transition; returns whether one was present
    pub fn clear_error_transition(&mut self, source: &str) -> Result<bool, StateMachineError> {
        let state = self.state_mut(source)?;
        let had_error = state.error_transition().is_some();
        state.set_error_transition(None);
        Ok(had_error)
    }

    // ========== Internals ==========

    fn state_mut(&mut self, id: &str) -> Result<&mut State, StateMachineError> {
        self.states
            .get_mut(id)
            .ok_or_else(|| StateMachineError::StateNotFound { id: id.to_string() })
    }

    /// Point the initial state at an existing state when it is missing or
    /// dangling. Leaves it empty only when there are no states.
    fn repair_initial_state(&mut self) {
        if self.states.contains_key(&self.initial_state_id) {
            return;
        }
        self.initial_state_id = self.states.keys().next().cloned().unwrap_or_default();
    }
}
