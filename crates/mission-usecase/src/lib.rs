//! # Mission Type Use Case Layer
//!
//! Application-specific business rules.
//! This layer orchestrates the flow of data between the domain and adapters:
//! an [`EditorSession`] owns one mission type while it is edited and routes
//! every change through the domain operations, the repository port and the
//! projector.

pub use mission_domain;

pub mod error;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use session::{EditOutcome, EditorSession};
