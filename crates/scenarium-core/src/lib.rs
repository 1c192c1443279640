//! Core runtime for Scenarium: entity traits, the in-memory store with its
//! executors, change notification, and the vocabulary exported via `prelude`.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod db;
pub mod entity;
pub mod error;
pub mod notify;
pub mod serialize;
pub mod traits;
pub mod types;
pub mod value;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, executors, stores, serializers, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        entity::{
            FileEntry, RequestCommand, RequestStatus, RuntimeRequest, Scenario, Variable,
        },
        traits::{ChildOf, EntityIdentity, EntityKind, EntityTag, Named, Path},
        types::{Id, Timestamp},
        value::Value,
    };
}
