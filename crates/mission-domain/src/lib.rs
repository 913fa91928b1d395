//! # Mission Domain Layer
//!
//! Mission types as state machines, and the machinery that keeps them in
//! sync with an interactively edited graph.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - MissionTypeSpec, StateMachine, layout, graph  ││
//! │  │  repository/- Persistence port (trait only)                 ││
//! │  │  service/   - GraphProjector, ReconciliationEngine,         ││
//! │  │               ConditionTemplateCatalog                      ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Sync Cycle
//!
//! ```text
//! spec ─▶ GraphProjector ─▶ graph ─▶ user edit ─▶ ReconciliationEngine
//!  ▲                                                      │
//!  └──────────────── repository.save_spec ◀───────────────┘
//! ```
//!
//! **This crate has ZERO external dependencies.** Encodings, files and
//! logging belong to the outer layers.

pub mod model;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use model::{
    graph::{EdgeId, EdgeKind, EdgeRef, Graph, GraphSnapshot, NodeRef, NodeRole, VisualEdge, VisualNode},
    layout::{LayoutMetadata, Position},
    mission_type::{MissionTypeId, MissionTypeSpec},
    state::{
        ErrorTransition, State, StateDetails, StateTemplate, Transition, DEFAULT_CONDITION, END_STATE,
        ERROR_STATE,
    },
    state_machine::{is_valid_name, validate_state_name, StateMachine, StateMachineError},
};

pub use repository::mission_type_repository::{MissionTypeRepository, RepositoryError};

pub use service::{
    condition_templates::{ConditionTemplate, ConditionTemplateCatalog, TemplateKind},
    graph_projector::{classify_state, GraphProjector, GridLayout, LabelPolicy},
    reconciliation::{ModelChange, Reconciliation, ReconciliationEngine},
};
