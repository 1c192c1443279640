use derive_more::{Deref, DerefMut, Display};
use serde::{Deserialize, Serialize};
use std::{
    str::FromStr,
    sync::{LazyLock, Mutex},
};
use thiserror::Error as ThisError;

///
/// UlidError
///

#[derive(Debug, ThisError, Eq, PartialEq)]
pub enum UlidError {
    #[error("invalid ulid string: {0}")]
    InvalidString(String),

    #[error("ulid generator mutex is poisoned")]
    GeneratorUnavailable,

    #[error("ulid random component overflowed within one millisecond")]
    GeneratorOverflow,
}

///
/// Ulid
///
/// Sortable 128-bit identifier used for every entity key.
/// Wraps the `ulid` crate type so trait impls and generation
/// stay under our control.
///

#[derive(
    Clone,
    Copy,
    Debug,
    Deref,
    DerefMut,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Ulid(::ulid::Ulid);

impl Ulid {
    pub const MIN: Self = Self(::ulid::Ulid(u128::MIN));
    pub const MAX: Self = Self(::ulid::Ulid(u128::MAX));

    /// Returns the nil ulid (all zeroes).
    #[must_use]
    pub const fn nil() -> Self {
        Self(::ulid::Ulid(0))
    }

    /// Checks if the ulid is nil.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Generates the next monotonic ulid.
    ///
    /// Overflow of the random component inside a single millisecond is
    /// the only failure mode; a fresh random ulid stands in for it.
    #[must_use]
    pub fn generate() -> Self {
        Self::try_generate().unwrap_or_else(|_| Self(::ulid::Ulid::new()))
    }

    /// Generates the next monotonic ulid, surfacing generator failures.
    pub fn try_generate() -> Result<Self, UlidError> {
        monotonic().map(Self)
    }

    #[must_use]
    pub const fn from_parts(timestamp_ms: u64, random: u128) -> Self {
        Self(::ulid::Ulid::from_parts(timestamp_ms, random))
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(::ulid::Ulid::from_bytes(bytes))
    }

    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 16] {
        self.0.to_bytes()
    }

    /// Milliseconds since the unix epoch encoded in the time component.
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        self.0.timestamp_ms()
    }
}

impl Default for Ulid {
    fn default() -> Self {
        Self::nil()
    }
}

impl From<::ulid::Ulid> for Ulid {
    fn from(ulid: ::ulid::Ulid) -> Self {
        Self(ulid)
    }
}

impl FromStr for Ulid {
    type Err = UlidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ::ulid::Ulid::from_string(s)
            .map(Self)
            .map_err(|err| UlidError::InvalidString(format!("{s}: {err}")))
    }
}

// =========================================================================
// GENERATOR
// =========================================================================

// One process-wide generator keeps ids monotonic across call sites.
static GENERATOR: LazyLock<Mutex<::ulid::Generator>> =
    LazyLock::new(|| Mutex::new(::ulid::Generator::new()));

fn monotonic() -> Result<::ulid::Ulid, UlidError> {
    let mut generator = GENERATOR
        .lock()
        .map_err(|_| UlidError::GeneratorUnavailable)?;

    generator
        .generate()
        .map_err(|_| UlidError::GeneratorOverflow)
}

// =========================================================================
// TESTS
// =========================================================================
