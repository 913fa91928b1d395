//! Domain Services - Stateless logic over the model

pub mod condition_templates;
pub mod graph_projector;
pub mod reconciliation;
