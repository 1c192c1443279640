use crate::{
    traits::EntityIdentity,
    types::{Ulid, UlidError},
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

///
/// Id
///
/// A strongly-typed entity identifier. The phantom parameter pins the id
/// to one entity kind so a variable id can never be passed where a
/// scenario id is expected.
///
/// `PhantomData<fn() -> E>` keeps the type covariant without implying
/// ownership of an `E`.
///

#[repr(transparent)]
pub struct Id<E: EntityIdentity> {
    key: Ulid,
    _marker: PhantomData<fn() -> E>,
}

impl<E: EntityIdentity> Id<E> {
    #[must_use]
    pub const fn new(key: Ulid) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    /// Mints a fresh monotonic id.
    #[must_use]
    pub fn generate() -> Self {
        Self::new(Ulid::generate())
    }

    #[must_use]
    pub const fn nil() -> Self {
        Self::new(Ulid::nil())
    }

    /// Returns the underlying ulid.
    #[must_use]
    pub const fn ulid(&self) -> Ulid {
        self.key
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.key.is_nil()
    }
}

// ====================================================================
// the derive macros would bound E itself, so these are spelled out
// ====================================================================

impl<E: EntityIdentity> Clone for Id<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E: EntityIdentity> Copy for Id<E> {}

impl<E: EntityIdentity> fmt::Debug for Id<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.key).finish()
    }
}

impl<E: EntityIdentity> Default for Id<E> {
    fn default() -> Self {
        Self::nil()
    }
}

impl<E: EntityIdentity> fmt::Display for Id<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}

impl<E: EntityIdentity> Eq for Id<E> {}

impl<E: EntityIdentity> PartialEq for Id<E> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<E: EntityIdentity> Hash for Id<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<E: EntityIdentity> Ord for Id<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl<E: EntityIdentity> PartialOrd for Id<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: EntityIdentity> From<Ulid> for Id<E> {
    fn from(key: Ulid) -> Self {
        Self::new(key)
    }
}

impl<E: EntityIdentity> FromStr for Id<E> {
    type Err = UlidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ulid>().map(Self::new)
    }
}

impl<E: EntityIdentity> Serialize for Id<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.key.serialize(serializer)
    }
}

impl<'de, E: EntityIdentity> Deserialize<'de> for Id<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ulid::deserialize(deserializer).map(Self::new)
    }
}

// =========================================================================
// TESTS
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{EntityTag, Path};

    struct Widget;

    impl Path for Widget {
        const PATH: &'static str = "tests::Widget";
    }

    impl EntityIdentity for Widget {
        const TAG: EntityTag = EntityTag::Scenario;
        const ENTITY_NAME: &'static str = "widget";
    }

    #[test]
    fn default_is_nil() {
        let id: Id<Widget> = Id::default();

        assert!(id.is_nil());
        assert_eq!(id, Id::nil());
    }

    #[test]
    fn ids_sort_like_their_ulids() {
        let older = Id::<Widget>::new(Ulid::from_parts(1_000, 1));
        let newer = Id::<Widget>::new(Ulid::from_parts(2_000, 1));

        assert!(older < newer);
        assert_eq!(older.cmp(&newer), Ordering::Less);
    }

    #[test]
    fn display_matches_the_ulid() {
        let ulid = Ulid::generate();
        let id = Id::<Widget>::new(ulid);

        assert_eq!(id.to_string(), ulid.to_string());
    }

    #[test]
    fn serde_roundtrip() {
        let id = Id::<Widget>::generate();
        let json = serde_json::to_string(&id).unwrap();
        let back: Id<Widget> = serde_json::from_str(&json).unwrap();

        assert_eq!(back, id);
    }

    #[test]
    fn parse_roundtrip() {
        let id = Id::<Widget>::generate();

        assert_eq!(id.to_string().parse::<Id<Widget>>().ok(), Some(id));
    }
}
