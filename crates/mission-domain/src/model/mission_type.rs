//! MissionTypeSpec - A named behavioral profile for the controller
//!
//! A mission type is an Entity: its identity is the name it is stored under,
//! and it owns exactly one state machine.

use super::state_machine::{is_valid_name, StateMachine};

/// Unique identifier (file stem) of a mission type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MissionTypeId(String);

impl MissionTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the editor may create a mission type under this id.
    /// Stored ids are loaded as they are.
    pub fn is_valid(&self) -> bool {
        is_valid_name(&self.0)
    }

    /// Human-readable name: `locate_and_track` -> `Locate And Track`
    pub fn display_name(&self) -> String {
        self.0
            .split('_')
            .filter(|word| !word.is_empty())
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }
}

impl core::fmt::Display for MissionTypeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mission type specification (logical content only, no layout)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionTypeSpec {
    id: MissionTypeId,
    description: String,
    state_machine: StateMachine,
}

impl MissionTypeSpec {
    /// New mission type with an empty state machine
    pub fn new(id: MissionTypeId, description: impl Into<String>) -> Self {
        Self::with_state_machine(id, description, StateMachine::new())
    }

    pub fn with_state_machine(
        id: MissionTypeId,
        description: impl Into<String>,
        state_machine: StateMachine,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            state_machine,
        }
    }

    pub fn id(&self) -> &MissionTypeId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn state_machine(&self) -> &StateMachine {
        &self.state_machine
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replace the state machine wholesale (used after a committed edit)
    pub fn replace_state_machine(&mut self, state_machine: StateMachine) {
        self.state_machine = state_machine;
    }
}
