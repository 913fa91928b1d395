//! mission-types state command

use anyhow::{anyhow, Context as _};
use clap::{Args, Subcommand};
use console::style;
use mission_domain::{StateDetails, StateTemplate};

use crate::context::Context;

#[derive(Debug, Args)]
pub struct StateCommand {
    #[command(subcommand)]
    pub command: StateSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum StateSubcommand {
    /// Add a state
    Add {
        /// Mission type name
        mission: String,
        /// State name (letters, numbers, underscores)
        name: String,
        /// empty, execution, conclusion or copy
        #[arg(short, long, default_value = "empty")]
        template: String,
        /// State to copy from and place the new node next to
        #[arg(short, long)]
        selected: Option<String>,
    },
    /// Delete a state and every transition into it
    Delete {
        mission: String,
        name: String,
    },
    /// Make a state the initial state
    Initial {
        mission: String,
        name: String,
    },
    /// Edit prompt, tools or observations
    Edit {
        mission: String,
        name: String,
        #[arg(long, conflicts_with = "prompt_file")]
        prompt: Option<String>,
        /// Read the prompt from a file
        #[arg(long)]
        prompt_file: Option<std::path::PathBuf>,
        /// Comma-separated tool ids, replaces the current list
        #[arg(long, value_delimiter = ',')]
        tools: Option<Vec<String>>,
        /// Comma-separated observation ids, replaces the current list
        #[arg(long, value_delimiter = ',')]
        observations: Option<Vec<String>>,
    },
}

impl StateCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        match &self.command {
            StateSubcommand::Add {
                mission,
                name,
                template,
                selected,
            } => {
                let template = StateTemplate::from_key(template)
                    .ok_or_else(|| anyhow!("Unknown state template '{}'", template))?;
                let mut session = ctx.session(mission)?;
                session.create_state(name, template, selected.as_deref())?;
                println!("✓ Added state '{}' ({})", name, template.label());
            }
            StateSubcommand::Delete { mission, name } => {
                let mut session = ctx.session(mission)?;
                let cascaded = session.delete_state(name)?;
                println!("✓ Deleted state '{}', {} references removed", name, cascaded);
            }
            StateSubcommand::Initial { mission, name } => {
                let mut session = ctx.session(mission)?;
                session.set_initial_state(name)?;
                println!("✓ '{}' is now the initial state", name);
            }
            StateSubcommand::Edit {
                mission,
                name,
                prompt,
                prompt_file,
                tools,
                observations,
            } => {
                let mut session = ctx.session(mission)?;
                let current = session
                    .state_machine()
                    .state(name)
                    .ok_or_else(|| anyhow!("State '{}' not found", name))?;
                let mut details = current.details().clone();

                if let Some(prompt) = prompt {
                    details.prompt = prompt.clone();
                }
                if let Some(path) = prompt_file {
                    details.prompt = std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read prompt from {}", path.display()))?;
                }
                if let Some(tools) = tools {
                    details.tools = tools.clone();
                }
                if let Some(observations) = observations {
                    details.observations = observations.clone();
                }

                warn_unknown(ctx, &details);
                session.update_details(name, details)?;
                println!("✓ Updated state '{}'", name);
            }
        }
        Ok(())
    }
}

/// Identifiers outside the catalog are accepted, just pointed out
fn warn_unknown(ctx: &Context, details: &StateDetails) {
    let catalog = &ctx.config.capabilities;
    for tool in details.tools.iter().filter(|t| !catalog.is_known_tool(t)) {
        println!("{} tool '{}' is not in the capability catalog", style("!").yellow(), tool);
    }
    for observation in details
        .observations
        .iter()
        .filter(|o| !catalog.is_known_observation(o))
    {
        println!(
            "{} observation '{}' is not in the capability catalog",
            style("!").yellow(),
            observation
        );
    }
}
