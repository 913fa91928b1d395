//! mission-types apply command
//!
//! Feeds a graph edited by a canvas host back into the model. The file holds
//! the complete graph after one interaction, in the form `graph` prints.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;

use crate::context::Context;
use crate::display::Display;
use crate::graph_file::GraphDocument;

#[derive(Debug, Args)]
pub struct ApplyCommand {
    /// Mission type name
    pub mission: String,

    /// Edited graph JSON, `-` for stdin
    pub graph: PathBuf,
}

impl ApplyCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let text = if self.graph.as_os_str() == "-" {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        } else {
            std::fs::read_to_string(&self.graph)
                .with_context(|| format!("Failed to read {}", self.graph.display()))?
        };
        let document: GraphDocument = serde_json::from_str(&text).context("Edited graph is not valid JSON")?;

        let mut session = ctx.session(&self.mission)?;
        let outcome = session.apply_edit(&document.to_snapshot())?;

        if ctx.json {
            let updated = GraphDocument::from(session.graph());
            println!("{}", serde_json::to_string_pretty(&updated)?);
        } else {
            Display::new().print_outcome(&outcome);
        }
        Ok(())
    }
}
