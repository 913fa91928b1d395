//! mission-types transition command

use clap::{Args, Subcommand};
use console::style;
use mission_adapter::FileMissionTypeRepository;
use mission_domain::DEFAULT_CONDITION;
use mission_usecase::EditorSession;

use crate::context::Context;

/// A condition typed in full or built from a template
#[derive(Debug, Args)]
pub struct ConditionArgs {
    /// Condition expression, taken verbatim
    #[arg(short, long, conflicts_with = "template")]
    pub condition: Option<String>,

    /// Condition template key or label (see `templates`)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Value substituted into a parametrized template
    #[arg(long)]
    pub value: Option<String>,
}

impl ConditionArgs {
    /// Resolve to a condition; `True` when nothing was given
    pub fn resolve(&self, session: &EditorSession<FileMissionTypeRepository>) -> anyhow::Result<String> {
        if let Some(condition) = &self.condition {
            return Ok(condition.clone());
        }
        match &self.template {
            Some(template) => Ok(session.resolve_condition(template, self.value.as_deref().unwrap_or(""))?),
            None => Ok(DEFAULT_CONDITION.to_string()),
        }
    }
}

#[derive(Debug, Args)]
pub struct TransitionCommand {
    #[command(subcommand)]
    pub command: TransitionSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum TransitionSubcommand {
    /// Add a transition
    Add {
        mission: String,
        source: String,
        target: String,
        #[command(flatten)]
        condition: ConditionArgs,
    },
    /// Delete one condition by index, keeping the others
    Delete {
        mission: String,
        source: String,
        index: usize,
    },
    /// Replace the condition of a transition
    Condition {
        mission: String,
        source: String,
        index: usize,
        #[command(flatten)]
        condition: ConditionArgs,
    },
    /// Set or clear the error transition
    Error {
        mission: String,
        source: String,
        /// Target state, `error` when omitted
        target: Option<String>,
        #[arg(long, conflicts_with = "target")]
        clear: bool,
    },
    /// List the targets a new transition could point at
    Targets {
        mission: String,
        source: String,
    },
}

impl TransitionCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        match &self.command {
            TransitionSubcommand::Add {
                mission,
                source,
                target,
                condition,
            } => {
                let mut session = ctx.session(mission)?;
                if !session.possible_targets(source).contains(target) {
                    println!(
                        "{} '{}' is not a defined state; it will show as a placeholder",
                        style("!").yellow(),
                        target
                    );
                }
                let condition = condition.resolve(&session)?;
                let index = session.add_transition(source, target, condition.as_str())?;
                println!("✓ Added #{} {} -> {} ({})", index, source, target, condition);
            }
            TransitionSubcommand::Delete { mission, source, index } => {
                let mut session = ctx.session(mission)?;
                let removed = session.delete_condition(source, *index)?;
                println!(
                    "✓ Removed {} -> {} ({})",
                    source, removed.target_state_id, removed.condition
                );
            }
            TransitionSubcommand::Condition {
                mission,
                source,
                index,
                condition,
            } => {
                let mut session = ctx.session(mission)?;
                let condition = condition.resolve(&session)?;
                session.update_condition(source, *index, condition.as_str())?;
                println!("✓ Condition #{} of '{}' is now {}", index, source, condition);
            }
            TransitionSubcommand::Error {
                mission,
                source,
                target,
                clear,
            } => {
                let mut session = ctx.session(mission)?;
                if *clear {
                    if session.clear_error_transition(source)? {
                        println!("✓ Cleared error transition of '{}'", source);
                    } else {
                        println!("'{}' had no error transition", source);
                    }
                } else {
                    let target = target.as_deref().unwrap_or(mission_domain::ERROR_STATE);
                    session.set_error_transition(source, target)?;
                    println!("✓ On error '{}' goes to '{}'", source, target);
                }
            }
            TransitionSubcommand::Targets { mission, source } => {
                let session = ctx.session(mission)?;
                for target in session.possible_targets(source) {
                    println!("{}", target);
                }
            }
        }
        Ok(())
    }
}
