//! Built-in mission types seeded into an empty store

use std::collections::BTreeMap;

use mission_domain::MissionTypeId;
use serde_json::Value;
use shared::Result;

use super::document::MissionTypeDocument;

const DEFAULT_MISSION_TYPES: &str = r#"
locate_and_report:
  description: Locate the target and report its position.
  default_state:
    zoom_level: 1
    report_format: standard
locate_and_land_safely:
  description: Locate the target and perform a safe landing procedure.
  default_state:
    landing_zone_radius: 5
    safety_check: true
locate_and_track:
  description: Locate the target and maintain tracking.
  default_state:
    initial_state: execution
    image_resolution:
      width: 640
      height: 480
    states:
      execution:
        prompt: |
          You are a **UAV controller** executing a multi-step task plan...
        output_keys:
          - justification: {type: string, max_length: 300}
          - tool_call: {type: object}
          - information: {type: string, max_length: 300}
        observations: [current_location, locations_to_be_visited, past_locations, plan]
        tools: [next_goal]
        verifiers:
          - formatted_verifier: {reward_factor: 1.0}
        state_transitions:
          conditions:
            - condition: "{next_goal} == 'ground'"
              next_state: conclusion_generation
            - condition: "{locations_to_be_visited} == []"
              next_state: conclusion_generation
            - condition: else
              next_state: execution
          error:
            next_state: error
      conclusion_generation:
        prompt: |
          You are the **UAV controller** responsible for providing the final answer...
        output_keys:
          - justification: string
          - tool_call: object
        tools: [report_final_conclusion]
        state_transitions:
          conditions:
            - condition: "True"
              next_state: end
"#;

/// The default mission types, by id
pub fn default_documents() -> Result<Vec<(MissionTypeId, MissionTypeDocument)>> {
    let records: BTreeMap<String, Value> = serde_yaml::from_str(DEFAULT_MISSION_TYPES)?;
    records
        .into_iter()
        .map(|(name, value)| -> Result<(MissionTypeId, MissionTypeDocument)> {
            let id = MissionTypeId::new(name);
            let document = MissionTypeDocument::from_value(&id, value)?;
            Ok((id, document))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        let defaults = default_documents().unwrap();
        let names: Vec<_> = defaults.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(names, ["locate_and_land_safely", "locate_and_report", "locate_and_track"]);

        let (id, track) = &defaults[2];
        let spec = track.to_spec(id);
        let machine = spec.state_machine();
        assert_eq!(machine.initial_state_id(), "execution");
        assert_eq!(machine.len(), 2);
        let undefined: Vec<_> = machine.undefined_targets().into_iter().collect();
        assert_eq!(undefined, ["end", "error"]);
    }
}
