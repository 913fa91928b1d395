//! # Mission Type Editor Shared
//!
//! Error type and configuration used by the adapter and CLI crates.

pub mod config;
pub mod error;

// Re-exports
pub use config::*;
pub use error::*;
