//! Command implementations behind the `mission-types` binary

pub mod commands;
pub mod context;
pub mod display;
pub mod graph_file;
