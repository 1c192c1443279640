use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    serialize::deserialize,
    traits::{EntityIdentity, EntityKind, EntityTag},
    types::{Id, Ulid},
};
use derive_more::{Deref, DerefMut};
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};
use thiserror::Error as ThisError;

///
/// DataStore
///
/// Ordered in-memory row arena. One per database handle; entities of
/// every kind share it, grouped by tag through the key ordering.
///

#[derive(Debug, Default, Deref, DerefMut)]
pub struct DataStore(BTreeMap<DataKey, RawRow>);

impl DataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows of one entity kind, in id order.
    pub fn rows_of(&self, tag: EntityTag) -> impl Iterator<Item = (&DataKey, &RawRow)> {
        self.0
            .range(DataKey::tag_lower_bound(tag)..=DataKey::tag_upper_bound(tag))
    }

    /// Sum of bytes used by all stored rows.
    pub fn memory_bytes(&self) -> u64 {
        let key_size = std::mem::size_of::<DataKey>() as u64;

        self.0
            .values()
            .map(|row| key_size + row.len() as u64)
            .sum()
    }
}

///
/// RawRowError
///

#[derive(Debug, ThisError)]
pub enum RawRowError {
    #[error("row exceeds max size: {len} bytes (limit {MAX_ROW_BYTES})")]
    TooLarge { len: usize },
}

impl RawRowError {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        ErrorClass::Unsupported
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        ErrorOrigin::Store
    }
}

impl From<RawRowError> for InternalError {
    fn from(err: RawRowError) -> Self {
        Self::new(err.class(), err.origin(), err.to_string())
    }
}

///
/// RowDecodeError
///

#[derive(Debug, ThisError)]
pub enum RowDecodeError {
    #[error("row exceeds max size: {len} bytes (limit {MAX_ROW_BYTES})")]
    TooLarge { len: usize },
    #[error("row failed to deserialize")]
    Deserialize,
}

///
/// RawRow
///

/// Max serialized bytes for a single row to keep value loads bounded.
/// File payloads live inline, so the cap is generous.
pub const MAX_ROW_BYTES: u32 = 4 * 1024 * 1024;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawRow(Vec<u8>);

impl RawRow {
    pub fn try_new(bytes: Vec<u8>) -> Result<Self, RawRowError> {
        if bytes.len() > MAX_ROW_BYTES as usize {
            return Err(RawRowError::TooLarge { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn try_decode<E: EntityKind>(&self) -> Result<E, RowDecodeError> {
        if self.0.len() > MAX_ROW_BYTES as usize {
            return Err(RowDecodeError::TooLarge { len: self.0.len() });
        }

        deserialize::<E>(&self.0).map_err(|_| RowDecodeError::Deserialize)
    }
}

pub type DataRow = (DataKey, RawRow);

///
/// DataKey
///
/// Tag-then-id composite. The derived ordering groups a kind's rows
/// into one contiguous range, so per-kind scans are plain range reads.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DataKey {
    tag: EntityTag,
    id: Ulid,
}

impl DataKey {
    #[must_use]
    /// Build a data key for the given entity type and id.
    pub fn new<E: EntityIdentity>(id: Id<E>) -> Self {
        Self {
            tag: E::TAG,
            id: id.ulid(),
        }
    }

    #[must_use]
    pub const fn lower_bound<E: EntityIdentity>() -> Self {
        Self::tag_lower_bound(E::TAG)
    }

    #[must_use]
    pub const fn upper_bound<E: EntityIdentity>() -> Self {
        Self::tag_upper_bound(E::TAG)
    }

    #[must_use]
    pub const fn tag_lower_bound(tag: EntityTag) -> Self {
        Self {
            tag,
            id: Ulid::MIN,
        }
    }

    #[must_use]
    pub const fn tag_upper_bound(tag: EntityTag) -> Self {
        Self {
            tag,
            id: Ulid::MAX,
        }
    }

    #[must_use]
    pub const fn tag(&self) -> EntityTag {
        self.tag
    }

    #[must_use]
    pub const fn id(&self) -> Ulid {
        self.id
    }

    /// Recovers the typed id when the key belongs to entity kind `E`.
    #[must_use]
    pub fn typed<E: EntityIdentity>(&self) -> Option<Id<E>> {
        (self.tag == E::TAG).then(|| Id::new(self.id))
    }
}

impl Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.tag, self.id)
    }
}

///
/// TESTS
///
