//! Persisted document shape and its mapping to the domain model
//!
//! ```text
//! description: ...
//! default_state:
//!   initial_state: search
//!   states:
//!     search:
//!       prompt: ...
//!       tools: [...]
//!       observations: [...]
//!       state_transitions:
//!         conditions: [{condition: ..., next_state: ...}]
//!         error: {next_state: ...}
//! ui_metadata:
//!   positions: {search: [100, 80]}
//! ```
//!
//! Decoding is lenient: partial or oddly shaped records degrade to empty
//! values instead of failing. Keys the editor does not interpret are kept in
//! `extra` maps and written back on save.

use std::collections::BTreeMap;

use mission_domain::{
    LayoutMetadata, MissionTypeId, MissionTypeSpec, Position, State, StateMachine, Transition,
    DEFAULT_CONDITION,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Top-level record of one mission type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionTypeDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(default)]
    pub default_state: DefaultStateDocument,

    /// Editor-only sidecar, absent for runtime consumers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_metadata: Option<UiMetadataDocument>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefaultStateDocument {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub initial_state: String,

    #[serde(default)]
    pub states: BTreeMap<String, StateDocument>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub prompt: String,

    #[serde(default, deserialize_with = "lenient_list")]
    pub tools: Vec<String>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub observations: Vec<String>,

    #[serde(default)]
    pub state_transitions: TransitionsDocument,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionsDocument {
    #[serde(default)]
    pub conditions: Vec<ConditionDocument>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDocument>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDocument {
    #[serde(default = "default_condition", deserialize_with = "lenient_string")]
    pub condition: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub next_state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub next_state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiMetadataDocument {
    #[serde(default)]
    pub positions: BTreeMap<String, [f64; 2]>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_condition() -> String {
    DEFAULT_CONDITION.to_string()
}

/// Null becomes empty; scalars other than strings keep their text form
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Anything that is not a list becomes an empty list
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl MissionTypeDocument {
    /// Decode a parsed record (YAML or JSON) stored under `id`.
    ///
    /// Records without `description` and `default_state` are "flat": the
    /// whole record is the default state and the description is derived
    /// from the id.
    pub fn from_value(id: &MissionTypeId, value: Value) -> Result<Self, serde_json::Error> {
        let mut record = match value {
            Value::Object(map) if map.contains_key("default_state") || map.contains_key("description") => map,
            flat => {
                let mut map = Map::new();
                map.insert("description".to_string(), Value::String(id.display_name()));
                map.insert("default_state".to_string(), flat);
                map
            }
        };

        if let Some(default_state) = record.get_mut("default_state") {
            normalize_default_state(default_state);
        }
        serde_json::from_value(Value::Object(record))
    }

    /// Domain view of the record
    pub fn to_spec(&self, id: &MissionTypeId) -> MissionTypeSpec {
        let states = self
            .default_state
            .states
            .iter()
            .map(|(state_id, doc)| doc.to_state(state_id));
        let machine = StateMachine::from_parts(self.default_state.initial_state.clone(), states);
        MissionTypeSpec::with_state_machine(id.clone(), self.description.clone(), machine)
    }

    /// Stored positions (empty when there is no sidecar)
    pub fn to_layout(&self) -> LayoutMetadata {
        self.ui_metadata
            .as_ref()
            .map(|ui| {
                LayoutMetadata::from_positions(
                    ui.positions
                        .iter()
                        .map(|(id, [x, y])| (id.clone(), Position::new(*x, *y))),
                )
            })
            .unwrap_or_default()
    }

    /// Build a record from the domain model.
    ///
    /// Uninterpreted keys are carried over from `previous` (the record being
    /// overwritten) for the parts that still exist.
    pub fn from_spec(spec: &MissionTypeSpec, layout: Option<&LayoutMetadata>, previous: Option<&Self>) -> Self {
        let machine = spec.state_machine();
        let previous_states = previous.map(|p| &p.default_state.states);

        let states = machine
            .states()
            .map(|state| {
                let carried = previous_states.and_then(|s| s.get(state.id()));
                (state.id().to_string(), StateDocument::from_state(state, carried))
            })
            .collect();

        let ui_metadata = layout.filter(|l| !l.is_empty()).map(|l| UiMetadataDocument {
            positions: l.positions().map(|(id, p)| (id.to_string(), [p.x, p.y])).collect(),
            extra: previous
                .and_then(|p| p.ui_metadata.as_ref())
                .map(|ui| ui.extra.clone())
                .unwrap_or_default(),
        });

        Self {
            description: spec.description().to_string(),
            default_state: DefaultStateDocument {
                initial_state: machine.initial_state_id().to_string(),
                states,
                extra: previous
                    .map(|p| p.default_state.extra.clone())
                    .unwrap_or_default(),
            },
            ui_metadata,
            extra: previous.map(|p| p.extra.clone()).unwrap_or_default(),
        }
    }

    /// Same record without the editor sidecar
    pub fn without_ui_metadata(mut self) -> Self {
        self.ui_metadata = None;
        self
    }
}

impl StateDocument {
    fn to_state(&self, id: &str) -> State {
        let mut state = State::new(id)
            .with_prompt(self.prompt.clone())
            .with_tools(self.tools.iter().cloned())
            .with_observations(self.observations.iter().cloned());
        for condition in &self.state_transitions.conditions {
            state = state.with_transition(Transition::new(
                condition.condition.clone(),
                condition.next_state.clone(),
            ));
        }
        match &self.state_transitions.error {
            Some(error) if !error.next_state.is_empty() => state.with_error_transition(error.next_state.clone()),
            _ => state,
        }
    }

    fn from_state(state: &State, previous: Option<&StateDocument>) -> Self {
        Self {
            prompt: state.prompt().to_string(),
            tools: state.tools().to_vec(),
            observations: state.observations().to_vec(),
            state_transitions: TransitionsDocument {
                conditions: state
                    .transitions()
                    .iter()
                    .map(|t| ConditionDocument {
                        condition: t.condition.clone(),
                        next_state: t.target_state_id.clone(),
                    })
                    .collect(),
                error: state.error_transition().map(|e| ErrorDocument {
                    next_state: e.target_state_id.clone(),
                }),
                extra: previous
                    .map(|p| p.state_transitions.extra.clone())
                    .unwrap_or_default(),
            },
            extra: previous.map(|p| p.extra.clone()).unwrap_or_default(),
        }
    }
}

/// Coerce `default_state` and its `states` into mappings
fn normalize_default_state(value: &mut Value) {
    if !value.is_object() {
        let initial = std::mem::take(value);
        let mut map = Map::new();
        if !is_falsy(&initial) {
            map.insert("initial_state".to_string(), initial);
        }
        *value = Value::Object(map);
    }

    let Some(map) = value.as_object_mut() else {
        return;
    };
    match map.get_mut("states") {
        Some(Value::Object(states)) => {
            for state in states.values_mut() {
                if !state.is_object() {
                    *state = Value::Object(Map::new());
                }
                if let Some(transitions) = state.get_mut("state_transitions") {
                    normalize_transitions(transitions);
                }
            }
        }
        Some(other) => *other = Value::Object(Map::new()),
        None => {}
    }
}

fn normalize_transitions(value: &mut Value) {
    let Some(map) = value.as_object_mut() else {
        *value = Value::Object(Map::new());
        return;
    };
    if let Some(conditions) = map.get_mut("conditions") {
        match conditions {
            Value::Array(items) => items.retain(Value::is_object),
            other => *other = Value::Array(Vec::new()),
        }
    }
    if map.get("error").is_some_and(|e| !e.is_object()) {
        map.remove("error");
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn id() -> MissionTypeId {
        MissionTypeId::new("locate_and_track")
    }

    #[test]
    fn test_nested_record() {
        let value = json!({
            "description": "Track it",
            "default_state": {
                "initial_state": "execution",
                "image_resolution": {"width": 640, "height": 480},
                "states": {
                    "execution": {
                        "prompt": "Go",
                        "tools": ["next_goal"],
                        "verifiers": [{"formatted_verifier": {"reward_factor": 1.0}}],
                        "state_transitions": {
                            "conditions": [
                                {"condition": "{next_goal} == 'ground'", "next_state": "conclusion"},
                                {"next_state": "execution"}
                            ],
                            "error": {"next_state": "error"}
                        }
                    }
                }
            }
        });

        let doc = MissionTypeDocument::from_value(&id(), value).unwrap();
        let spec = doc.to_spec(&id());
        let execution = spec.state_machine().state("execution").unwrap();

        assert_eq!(spec.description(), "Track it");
        assert_eq!(execution.transitions()[1].condition, "True");
        assert_eq!(execution.error_transition().unwrap().target_state_id, "error");
        assert!(doc.default_state.extra.contains_key("image_resolution"));
        assert!(doc.default_state.states["execution"].extra.contains_key("verifiers"));
    }

    #[test]
    fn test_flat_record_takes_description_from_id() {
        let value = json!({"zoom_level": 1, "report_format": "standard"});

        let doc = MissionTypeDocument::from_value(&id(), value).unwrap();

        assert_eq!(doc.description, "Locate And Track");
        assert!(doc.default_state.states.is_empty());
        assert_eq!(doc.default_state.extra["zoom_level"], json!(1));
    }

    #[test]
    fn test_partial_records_degrade() {
        let value = json!({
            "description": null,
            "default_state": {
                "initial_state": "missing",
                "states": {
                    "a": null,
                    "b": {"tools": "not a list", "state_transitions": {"conditions": "nope"}}
                }
            }
        });

        let doc = MissionTypeDocument::from_value(&id(), value).unwrap();
        let spec = doc.to_spec(&id());

        assert_eq!(spec.description(), "");
        assert_eq!(spec.state_machine().initial_state_id(), "a");
        assert!(spec.state_machine().state("b").unwrap().tools().is_empty());
    }

    #[test]
    fn test_scalar_default_state_becomes_initial_state() {
        let value = json!({"description": "d", "default_state": "execution"});
        let doc = MissionTypeDocument::from_value(&id(), value).unwrap();
        assert_eq!(doc.default_state.initial_state, "execution");

        let empty = json!({"description": "d", "default_state": null});
        let doc = MissionTypeDocument::from_value(&id(), empty).unwrap();
        assert_eq!(doc.default_state, DefaultStateDocument::default());
    }

    #[test]
    fn test_from_spec_carries_uninterpreted_keys() {
        let previous = MissionTypeDocument::from_value(
            &id(),
            json!({
                "description": "old",
                "default_state": {
                    "image_resolution": {"width": 640},
                    "states": {"a": {"output_keys": ["x"]}, "gone": {"output_keys": ["y"]}}
                }
            }),
        )
        .unwrap();
        let spec = previous.to_spec(&id());

        let written = MissionTypeDocument::from_spec(&spec, None, Some(&previous));

        assert_eq!(written.default_state.extra["image_resolution"], json!({"width": 640}));
        assert_eq!(written.default_state.states["a"].extra["output_keys"], json!(["x"]));
        assert!(written.ui_metadata.is_none());
    }

    #[test]
    fn test_layout_round_trip() {
        let mut layout = LayoutMetadata::new();
        layout.set_position("a", Position::new(100.0, 80.0));
        let spec = MissionTypeSpec::new(id(), "d");

        let doc = MissionTypeDocument::from_spec(&spec, Some(&layout), None);

        assert_eq!(doc.ui_metadata.as_ref().unwrap().positions["a"], [100.0, 80.0]);
        assert_eq!(doc.to_layout(), layout);
        assert!(doc.without_ui_metadata().ui_metadata.is_none());
    }
}
