//! Mission type lifecycle: new, delete, export

use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use mission_adapter::Encoding;
use mission_domain::{MissionTypeId, MissionTypeRepository};
use mission_usecase::EditorSession;
use tracing::info;

use crate::context::Context;

#[derive(Debug, Args)]
pub struct NewCommand {
    /// Mission type name (snake_case)
    pub name: String,

    /// Description shown to operators
    #[arg(long, default_value = "")]
    pub description: String,
}

impl NewCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let id = MissionTypeId::new(self.name.clone());
        let description = if self.description.is_empty() {
            id.display_name()
        } else {
            self.description.clone()
        };
        EditorSession::create(ctx.repository.clone(), id, description)?;
        println!("✓ Created mission type '{}'", self.name);
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Mission type name
    pub name: String,
}

impl DeleteCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let mut repository = ctx.repository.clone();
        if !repository.delete(&MissionTypeId::new(self.name.clone()))? {
            bail!("Mission type '{}' not found", self.name);
        }
        println!("✓ Deleted mission type '{}'", self.name);
        Ok(())
    }
}

/// Write the record as the execution runtime consumes it
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Mission type name
    pub name: String,

    /// yaml or json (default: the stored encoding)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ExportCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let encoding = match &self.format {
            Some(name) => match Encoding::from_name(name) {
                Some(encoding) => Some(encoding),
                None => bail!("Unknown format '{}', expected yaml or json", name),
            },
            None => None,
        };

        let text = ctx
            .repository
            .export_runtime(&MissionTypeId::new(self.name.clone()), encoding)?;

        match &self.output {
            Some(path) => {
                std::fs::write(path, text)?;
                info!(mission_type = %self.name, path = %path.display(), "Exported mission type");
                println!("✓ Exported '{}' to {}", self.name, path.display());
            }
            None => print!("{}", text),
        }
        Ok(())
    }
}
