//! State - A node of the mission state machine
//!
//! A State carries the directive ("prompt") given to the controller while it
//! is active, plus the tools and observations it may use. Outgoing edges are
//! guarded transitions and an optional error transition.

/// Well-known terminal sentinel. Never requires a backing state.
pub const END_STATE: &str = "end";

/// Well-known error sentinel.
pub const ERROR_STATE: &str = "error";

/// Condition used for transitions drawn without an explicit guard.
pub const DEFAULT_CONDITION: &str = "True";

/// A guarded edge to another state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Guard expression, opaque to this crate
    pub condition: String,
    /// Target state id (may dangle)
    pub target_state_id: String,
}

impl Transition {
    pub fn new(condition: impl Into<String>, target_state_id: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            target_state_id: target_state_id.into(),
        }
    }

    /// Transition with the default `True` guard
    pub fn always(target_state_id: impl Into<String>) -> Self {
        Self::new(DEFAULT_CONDITION, target_state_id)
    }
}

/// Edge taken when the controller fails inside a state. Has no condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTransition {
    pub target_state_id: String,
}

impl ErrorTransition {
    pub fn new(target_state_id: impl Into<String>) -> Self {
        Self {
            target_state_id: target_state_id.into(),
        }
    }
}

/// The editable, non-structural part of a state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateDetails {
    pub prompt: String,
    pub tools: Vec<String>,
    pub observations: Vec<String>,
}

/// Starting content for a newly created state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTemplate {
    /// No prompt, tools, observations or transitions
    Empty,
    /// Controller executing a task plan
    Execution,
    /// Final answer state that hands over to `end`
    Conclusion,
    /// Copy of another state's details, without its transitions
    CopySelected,
}

impl StateTemplate {
    pub const ALL: [StateTemplate; 4] = [
        StateTemplate::Empty,
        StateTemplate::Execution,
        StateTemplate::Conclusion,
        StateTemplate::CopySelected,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StateTemplate::Empty => "Empty State",
            StateTemplate::Execution => "Execution State",
            StateTemplate::Conclusion => "Conclusion State",
            StateTemplate::CopySelected => "Copy Selected",
        }
    }

    /// Parse a template from its kebab/snake-case key
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().replace('-', "_").as_str() {
            "empty" => Some(StateTemplate::Empty),
            "execution" => Some(StateTemplate::Execution),
            "conclusion" => Some(StateTemplate::Conclusion),
            "copy" | "copy_selected" => Some(StateTemplate::CopySelected),
            _ => None,
        }
    }
}

/// State - one node of a mission state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: String,
    details: StateDetails,
    transitions: Vec<Transition>,
    error_transition: Option<ErrorTransition>,
}

impl State {
    /// Create an empty state
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            details: StateDetails::default(),
            transitions: Vec::new(),
            error_transition: None,
        }
    }

    /// Create a state from a template.
    ///
    /// `selected` is the state copied by [`StateTemplate::CopySelected`];
    /// without one that template behaves like [`StateTemplate::Empty`].
    pub fn from_template(
        id: impl Into<String>,
        template: StateTemplate,
        selected: Option<&State>,
    ) -> Self {
        let state = Self::new(id);
        match template {
            StateTemplate::Empty => state,
            StateTemplate::Execution => state
                .with_prompt(
                    "You are a UAV controller executing a task plan.\n\n## Reasoning\nPut your thought process inside <think></think> tags.",
                )
                .with_tools(["next_goal"])
                .with_observations(["current_location", "plan", "locations_to_be_visited"]),
            StateTemplate::Conclusion => state
                .with_prompt("Provide the final answer based on all gathered data.")
                .with_tools(["report_final_conclusion"])
                .with_observations(["plan"])
                .with_transition(Transition::always(END_STATE)),
            StateTemplate::CopySelected => match selected {
                Some(source) => {
                    let mut copy = state;
                    copy.details = source.details.clone();
                    copy
                }
                None => state,
            },
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.details.prompt = prompt.into();
        self
    }

    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_observations<I, S>(mut self, observations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.observations = observations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transitions.push(transition);
        self
    }

    pub fn with_error_transition(mut self, target_state_id: impl Into<String>) -> Self {
        self.error_transition = Some(ErrorTransition::new(target_state_id));
        self
    }

    // ========== Getters ==========

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.details.prompt
    }

    pub fn tools(&self) -> &[String] {
        &self.details.tools
    }

    pub fn observations(&self) -> &[String] {
        &self.details.observations
    }

    pub fn details(&self) -> &StateDetails {
        &self.details
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn error_transition(&self) -> Option<&ErrorTransition> {
        self.error_transition.as_ref()
    }

    /// Whether any ordinary transition targets `target`
    pub fn has_transition_to(&self, target: &str) -> bool {
        self.transitions.iter().any(|t| t.target_state_id == target)
    }

    /// Short tool preview: first two tools, `...` when there are more
    pub fn tools_preview(&self) -> String {
        let tools = self.tools();
        if tools.is_empty() {
            return "none".to_string();
        }
        let mut preview = tools.iter().take(2).cloned().collect::<Vec<_>>().join(", ");
        if tools.len() > 2 {
            preview.push_str("...");
        }
        preview
    }

    // ========== Mutations (crate-internal, driven by StateMachine) ==========

    pub(crate) fn set_details(&mut self, details: StateDetails) {
        self.details = details;
    }

    pub(crate) fn push_transition(&mut self, transition: Transition) -> usize {
        self.transitions.push(transition);
        self.transitions.len() - 1
    }

    pub(crate) fn remove_transition_at(&mut self, index: usize) -> Option<Transition> {
        if index < self.transitions.len() {
            Some(self.transitions.remove(index))
        } else {
            None
        }
    }

    pub(crate) fn remove_first_transition_to(&mut self, target: &str) -> Option<Transition> {
        let index = self
            .transitions
            .iter()
            .position(|t| t.target_state_id == target)?;
        Some(self.transitions.remove(index))
    }

    /// Drop every reference to `target`; returns how many were removed
    pub(crate) fn purge_references_to(&mut self, target: &str) -> usize {
        let before = self.transitions.len();
        self.transitions.retain(|t| t.target_state_id != target);
        let mut removed = before - self.transitions.len();

        if self
            .error_transition
            .as_ref()
            .is_some_and(|e| e.target_state_id == target)
        {
            self.error_transition = None;
            removed += 1;
        }
        removed
    }

    pub(crate) fn condition_mut(&mut self, index: usize) -> Option<&mut String> {
        self.transitions.get_mut(index).map(|t| &mut t.condition)
    }

    pub(crate) fn set_error_transition(&mut self, error: Option<ErrorTransition>) {
        self.error_transition = error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conclusion_template_hands_over_to_end() {
        let state = State::from_template("wrap_up", StateTemplate::Conclusion, None);

        assert_eq!(state.tools(), ["report_final_conclusion"]);
        assert_eq!(state.transitions(), [Transition::always(END_STATE)]);
    }

    #[test]
    fn test_copy_template_drops_transitions() {
        let source = State::new("scan")
            .with_prompt("Scan the area")
            .with_tools(["next_goal"])
            .with_transition(Transition::always("end"))
            .with_error_transition("error");

        let copy = State::from_template("scan_again", StateTemplate::CopySelected, Some(&source));

        assert_eq!(copy.id(), "scan_again");
        assert_eq!(copy.prompt(), "Scan the area");
        assert!(copy.transitions().is_empty());
        assert!(copy.error_transition().is_none());
    }

    #[test]
    fn test_tools_preview() {
        assert_eq!(State::new("a").tools_preview(), "none");
        let state = State::new("b").with_tools(["x", "y", "z"]);
        assert_eq!(state.tools_preview(), "x, y...");
    }

    #[test]
    fn test_purge_references_counts_error_edge() {
        let mut state = State::new("a")
            .with_transition(Transition::always("b"))
            .with_transition(Transition::new("else", "c"))
            .with_transition(Transition::new("x > 1", "b"))
            .with_error_transition("b");

        assert_eq!(state.purge_references_to("b"), 3);
        assert_eq!(state.transitions().len(), 1);
        assert!(state.error_transition().is_none());
    }
}
