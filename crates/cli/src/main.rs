//! mission-types - Edit mission type state machines
//!
//! Usage:
//!   mission-types init [dir]                       - Create config.json and seed mission types
//!   mission-types list                             - List mission types
//!   mission-types show <mission>                   - Show states and transitions
//!   mission-types graph <mission>                  - Print the projected graph as JSON
//!   mission-types apply <mission> <graph.json>     - Apply an edited graph
//!   mission-types state add <mission> <name>       - Add a state
//!   mission-types transition add <mission> <a> <b> - Add a transition
//!   mission-types export <mission>                 - Print the runtime record

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cli::commands::{
    inspect, ApplyCommand, DeleteCommand, ExportCommand, GraphCommand, InitCommand, LayoutCommand, NewCommand,
    ShowCommand, StateCommand, TransitionCommand,
};
use cli::context::Context;

#[derive(Parser)]
#[command(name = "mission-types")]
#[command(about = "Mission type state machine editor")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(long, global = true, default_value = "config.json")]
    config: PathBuf,

    /// Mission type directory, overrides the configuration
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new mission type project
    Init(InitCommand),
    /// List mission types
    List,
    /// Show a mission type
    Show(ShowCommand),
    /// Print the projected graph
    Graph(GraphCommand),
    /// Show condition and state templates
    Templates,
    /// Create an empty mission type
    New(NewCommand),
    /// Delete a mission type
    Delete(DeleteCommand),
    /// Manage states
    State(StateCommand),
    /// Manage transitions
    Transition(TransitionCommand),
    /// Apply a graph edited on a canvas
    Apply(ApplyCommand),
    /// Node positions
    Layout(LayoutCommand),
    /// Export the runtime record (no editor metadata)
    Export(ExportCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Init(cmd) = &cli.command {
        return cmd.run();
    }

    let ctx = Context::load(&cli.config, cli.dir.clone(), cli.json)?;

    match cli.command {
        Commands::Init(_) => Ok(()),
        Commands::List => inspect::list(&ctx),
        Commands::Show(cmd) => cmd.run(&ctx),
        Commands::Graph(cmd) => cmd.run(&ctx),
        Commands::Templates => inspect::templates(&ctx),
        Commands::New(cmd) => cmd.run(&ctx),
        Commands::Delete(cmd) => cmd.run(&ctx),
        Commands::State(cmd) => cmd.run(&ctx),
        Commands::Transition(cmd) => cmd.run(&ctx),
        Commands::Apply(cmd) => cmd.run(&ctx),
        Commands::Layout(cmd) => cmd.run(&ctx),
        Commands::Export(cmd) => cmd.run(&ctx),
    }
}
