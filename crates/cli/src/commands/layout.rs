//! mission-types layout command

use clap::{Args, Subcommand};

use crate::context::Context;

#[derive(Debug, Args)]
pub struct LayoutCommand {
    #[command(subcommand)]
    pub command: LayoutSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum LayoutSubcommand {
    /// Forget stored positions and fall back to the grid
    Reset { mission: String },
}

impl LayoutCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        match &self.command {
            LayoutSubcommand::Reset { mission } => {
                let mut session = ctx.session(mission)?;
                session.reset_layout()?;
                println!("✓ Layout of '{}' reset", mission);
            }
        }
        Ok(())
    }
}
