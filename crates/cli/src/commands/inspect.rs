//! Read-only commands: list, show, graph, templates

use clap::Args;
use console::style;
use mission_domain::{ConditionTemplateCatalog, MissionTypeRepository, StateTemplate};

use crate::context::Context;
use crate::display::Display;
use crate::graph_file::GraphDocument;

/// List stored mission types
pub fn list(ctx: &Context) -> anyhow::Result<()> {
    let ids = ctx.repository.list_ids()?;

    if ctx.json {
        let names: Vec<&str> = ids.iter().map(|id| id.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    if ids.is_empty() {
        println!("No mission types in {}", ctx.repository.dir().display());
        return Ok(());
    }
    for id in &ids {
        let spec = ctx.repository.load_spec(id)?;
        println!(
            "{}  {}  {}",
            style(id.as_str()).bold(),
            style(format!("({} states)", spec.state_machine().len())).dim(),
            spec.description()
        );
    }
    Ok(())
}

/// Show condition and state templates
pub fn templates(ctx: &Context) -> anyhow::Result<()> {
    let catalog = ConditionTemplateCatalog::new();

    if ctx.json {
        let conditions: Vec<_> = catalog
            .templates()
            .iter()
            .map(|t| {
                serde_json::json!({
                    "key": t.key,
                    "label": t.label,
                    "template": t.template(),
                    "needsValue": t.needs_value(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&conditions)?);
        return Ok(());
    }

    println!("{}", style("Condition templates:").bold());
    for template in catalog.templates() {
        println!("  {:<28} {:<28} {}", template.key, template.label, style(template.template()).dim());
    }
    println!();
    println!("{}", style("State templates:").bold());
    for template in StateTemplate::ALL {
        println!("  {}", template.label());
    }
    Ok(())
}

/// Show a mission type's states and transitions
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Mission type name
    pub name: String,
}

impl ShowCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let session = ctx.session(&self.name)?;
        let spec = session.spec();
        let machine = spec.state_machine();
        let display = Display::new();

        display.print_header(&format!("Mission type: {}", spec.id().display_name()));
        println!("Description: {}", style(spec.description()).bold());
        println!("Initial:     {}", machine.initial_state_id());
        println!();

        for state in machine.states() {
            display.print_state(machine, state, &ctx.config.capabilities);
        }

        let undefined = machine.undefined_targets();
        if !undefined.is_empty() {
            println!();
            let names: Vec<&str> = undefined.into_iter().collect();
            println!("{} {}", style("Referenced, not defined:").dim(), names.join(", "));
        }

        // Catalog entries first, then whatever this mission type adds
        let tools: Vec<String> = machine.states().flat_map(|s| s.tools().iter().cloned()).collect();
        let observations: Vec<String> = machine
            .states()
            .flat_map(|s| s.observations().iter().cloned())
            .collect();
        let capabilities = &ctx.config.capabilities;
        println!();
        println!("{} {}", style("Tool options:").dim(), capabilities.tool_options(&tools).join(", "));
        println!(
            "{} {}",
            style("Observation options:").dim(),
            capabilities.observation_options(&observations).join(", ")
        );
        Ok(())
    }
}

/// Print the projected graph as JSON
#[derive(Debug, Args)]
pub struct GraphCommand {
    /// Mission type name
    pub name: String,
}

impl GraphCommand {
    pub fn run(&self, ctx: &Context) -> anyhow::Result<()> {
        let session = ctx.session(&self.name)?;
        let document = GraphDocument::from(session.graph());
        println!("{}", serde_json::to_string_pretty(&document)?);
        Ok(())
    }
}
