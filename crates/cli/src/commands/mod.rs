//! CLI Commands

pub mod apply;
pub mod init;
pub mod inspect;
pub mod layout;
pub mod mission;
pub mod state;
pub mod transition;

pub use apply::ApplyCommand;
pub use init::InitCommand;
pub use inspect::{GraphCommand, ShowCommand};
pub use layout::LayoutCommand;
pub use mission::{DeleteCommand, ExportCommand, NewCommand};
pub use state::StateCommand;
pub use transition::TransitionCommand;
