//! Styled terminal output

use console::{style, Style};
use mission_domain::{classify_state, ModelChange, NodeRole, State, StateMachine};
use mission_usecase::EditOutcome;
use shared::CapabilityCatalog;

pub struct Display;

impl Display {
    pub fn new() -> Self {
        Self
    }

    pub fn print_header(&self, text: &str) {
        println!();
        println!("{}", style(text).bold().cyan());
        println!("{}", style("═".repeat(60)).dim());
        println!();
    }

    pub fn role_style(&self, role: NodeRole) -> Style {
        match role {
            NodeRole::Initial => Style::new().green().bold(),
            NodeRole::Normal => Style::new().blue(),
            NodeRole::Terminal => Style::new().magenta(),
            NodeRole::ErrorRole => Style::new().red(),
            NodeRole::Undefined => Style::new().dim(),
        }
    }

    /// One state with its transitions, flagging capabilities outside the catalog
    pub fn print_state(&self, machine: &StateMachine, state: &State, capabilities: &CapabilityCatalog) {
        let structural = classify_state(state.id(), Some(state));
        let role = if machine.initial_state_id() == state.id() {
            NodeRole::Initial
        } else {
            structural
        };

        println!(
            "{}  {}  tools: {}",
            self.role_style(role).apply_to(state.id()),
            style(format!("[{}]", role)).dim(),
            state.tools_preview()
        );

        let unknown_tools: Vec<_> = state.tools().iter().filter(|t| !capabilities.is_known_tool(t)).collect();
        let unknown_observations: Vec<_> = state
            .observations()
            .iter()
            .filter(|o| !capabilities.is_known_observation(o))
            .collect();
        if !state.observations().is_empty() {
            println!("    observations: {}", state.observations().join(", "));
        }
        if !unknown_tools.is_empty() || !unknown_observations.is_empty() {
            let extra: Vec<&str> = unknown_tools
                .iter()
                .chain(unknown_observations.iter())
                .map(|s| s.as_str())
                .collect();
            println!("    {} {}", style("not in catalog:").yellow(), extra.join(", "));
        }

        for (index, transition) in state.transitions().iter().enumerate() {
            let target_role = classify_state(&transition.target_state_id, machine.state(&transition.target_state_id));
            println!(
                "    {} {} -> {}",
                style(format!("#{}", index)).dim(),
                transition.condition,
                self.role_style(target_role).apply_to(&transition.target_state_id)
            );
        }
        if let Some(error) = state.error_transition() {
            println!(
                "    {} -> {}",
                style("on error").red(),
                self.role_style(NodeRole::ErrorRole).apply_to(&error.target_state_id)
            );
        }
    }

    pub fn print_outcome(&self, outcome: &EditOutcome) {
        if outcome.is_noop() {
            println!("{}", style("No changes").dim());
            return;
        }
        for change in &outcome.changes {
            println!("  {} {}", style("•").cyan(), describe_change(change));
        }
        if !outcome.moved.is_empty() {
            println!("  {} moved {}", style("•").cyan(), outcome.moved.join(", "));
        }
        println!("{}", style("✓ Saved").green());
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

pub fn describe_change(change: &ModelChange) -> String {
    match change {
        ModelChange::TransitionAdded { source, target } => {
            format!("added transition {} -> {} (True)", source, target)
        }
        ModelChange::TransitionRemoved {
            source,
            target,
            condition,
        } => format!("removed transition {} -> {} ({})", source, target, condition),
        ModelChange::ErrorTransitionCleared { source } => format!("cleared error transition of {}", source),
        ModelChange::StateRemoved { state_id, cascaded } => {
            format!("deleted state {} ({} references removed)", state_id, cascaded)
        }
    }
}
