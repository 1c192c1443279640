use crate::types::{Id, Timestamp};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::{self, Debug};

// ============================================================================
// FOUNDATIONAL KINDS
// ============================================================================
//
// These traits define *where* something lives in the system,
// not what data it contains.
//

///
/// Path
/// Fully-qualified schema path.
///

pub trait Path {
    const PATH: &'static str;
}

///
/// EntityTag
///
/// Entity-kind discriminant shared by store partitions and bus topics.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum EntityTag {
    Scenario,
    Variable,
    File,
    RuntimeRequest,
}

impl EntityTag {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scenario => "scenario",
            Self::Variable => "variable",
            Self::File => "file",
            Self::RuntimeRequest => "runtime_request",
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// ENTITY IDENTITY & RUNTIME CONTRACT
// ============================================================================

///
/// EntityIdentity
///
/// Semantic identity metadata about an entity kind.
/// `TAG` keys store partitions and bus topics; `ENTITY_NAME` is the stable
/// display name used in keys and error messages.
///

pub trait EntityIdentity: Path {
    const TAG: EntityTag;
    const ENTITY_NAME: &'static str;
}

///
/// EntityKind
///
/// Fully runtime-bound entity.
///
/// This is the *maximum* entity contract and should only be required by code
/// that actually touches storage or execution. Implementors store primitive
/// key material internally; `id()` constructs a typed [`Id`] view on demand.
///

pub trait EntityKind:
    EntityIdentity + Lifecycle + Clone + Debug + PartialEq + Serialize + DeserializeOwned + 'static
{
    fn id(&self) -> Id<Self>;
}

///
/// ChildOf
///
/// Parent relationship by identifier. Parentage checks are plain key
/// comparisons against the explicit parent-id field; entities never hold
/// back-pointers into their parents.
///

pub trait ChildOf: EntityKind {
    type Parent: EntityIdentity;

    fn parent_id(&self) -> Id<Self::Parent>;
}

// ============================================================================
// DOMAIN SEAMS
// ============================================================================

///
/// Named
///
/// Access to the user-facing name field. The uniqueness-checked edit flow is
/// generic over this seam; comparisons are case-sensitive on trimmed values.
///

pub trait Named {
    fn name(&self) -> &str;

    fn set_name(&mut self, name: String);
}

///
/// Lifecycle
///
/// Save-time hook, run by the save executor against the injected clock just
/// before an entity is persisted. The default is a no-op; entities that carry
/// bookkeeping timestamps override it.
///

pub trait Lifecycle {
    fn touch(&mut self, _now: Timestamp) {}
}
