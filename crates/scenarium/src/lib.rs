//! ## Crate layout
//! - `core`: entity model, the in-memory store with its executors, and the
//!   change bus.
//! - `views`: bus-kept table models, edit sessions, and the scenario panels.
//!
//! The `prelude` module mirrors the surface embedders use.

pub use scenarium_core as core;
pub use scenarium_views as views;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::{db::Db, error::InternalError};

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::views::prelude::*;
}
