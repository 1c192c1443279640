use crate::{
    db::{
        Db,
        executor::{ExecutorError, decode_checked},
        store::{DataKey, RawRow},
    },
    error::InternalError,
    notify::ChangeEvent,
    serialize::serialize,
    traits::EntityKind,
};
use derive_more::Display;
use std::marker::PhantomData;

///
/// SaveMode
///
/// Insert  : will only insert a row if it's empty
/// Replace : will change the row regardless of what was there
/// Update  : will only change an existing row
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, PartialEq)]
pub enum SaveMode {
    #[default]
    Insert,
    Replace,
    Update,
}

///
/// SaveRule
///
/// Canonical save precondition for resolving the current row baseline.
///

#[derive(Clone, Copy)]
enum SaveRule {
    RequireAbsent,
    RequirePresent,
    AllowAny,
}

impl SaveRule {
    const fn from_mode(mode: SaveMode) -> Self {
        match mode {
            SaveMode::Insert => Self::RequireAbsent,
            SaveMode::Update => Self::RequirePresent,
            SaveMode::Replace => Self::AllowAny,
        }
    }
}

///
/// SaveExecutor
///

pub(crate) struct SaveExecutor<E: EntityKind> {
    db: Db,
    debug: bool,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> SaveExecutor<E> {
    #[must_use]
    pub(crate) const fn new(db: Db, debug: bool) -> Self {
        Self {
            db,
            debug,
            _marker: PhantomData,
        }
    }

    /// Insert a brand-new entity (errors if the key already exists).
    pub(crate) fn insert(&self, entity: E) -> Result<E, InternalError> {
        self.save_entity(SaveMode::Insert, entity)
    }

    /// Update an existing entity (errors if it does not exist).
    pub(crate) fn update(&self, entity: E) -> Result<E, InternalError> {
        self.save_entity(SaveMode::Update, entity)
    }

    /// Replace an entity, inserting if missing.
    pub(crate) fn replace(&self, entity: E) -> Result<E, InternalError> {
        self.save_entity(SaveMode::Replace, entity)
    }

    fn save_entity(&self, mode: SaveMode, entity: E) -> Result<E, InternalError> {
        let mut entity = entity;
        let rule = SaveRule::from_mode(mode);

        // Lifecycle stamps land before the after-image is encoded.
        entity.touch(self.db.now());

        let key = DataKey::new(entity.id());
        let old = self.resolve_existing_row(key, rule)?;

        let bytes = serialize(&entity)?;
        let row = RawRow::try_new(bytes)?;

        self.db.with_store_mut(|store| store.insert(key, row))?;

        // The event reflects what actually happened to the row, not the
        // mode the caller asked for: a Replace over nothing is an add.
        let event = if old.is_some() {
            ChangeEvent::updated(entity.id())
        } else {
            ChangeEvent::added(entity.id())
        };

        self.debug_log(format!("{mode} {key}"));
        self.db.publish(event);

        Ok(entity)
    }

    // Resolve the "before" row according to one canonical save rule.
    fn resolve_existing_row(
        &self,
        key: DataKey,
        rule: SaveRule,
    ) -> Result<Option<RawRow>, InternalError> {
        let old = self.db.with_store(|store| store.get(&key).cloned())?;

        match rule {
            SaveRule::RequireAbsent => {
                if let Some(existing) = old {
                    Self::validate_existing_row_identity(key, &existing)?;
                    return Err(ExecutorError::KeyExists(key).into());
                }

                Ok(None)
            }
            SaveRule::RequirePresent => {
                let old_row =
                    old.ok_or_else(|| InternalError::store_not_found(key.to_string()))?;
                Self::validate_existing_row_identity(key, &old_row)?;

                Ok(Some(old_row))
            }
            SaveRule::AllowAny => {
                if let Some(old_row) = old.as_ref() {
                    Self::validate_existing_row_identity(key, old_row)?;
                }

                Ok(old)
            }
        }
    }

    // Decode an existing row and verify it is consistent with the target key.
    fn validate_existing_row_identity(key: DataKey, row: &RawRow) -> Result<(), InternalError> {
        decode_checked::<E>(key, row).map(|_| ())
    }

    fn debug_log(&self, message: impl AsRef<str>) {
        if self.debug {
            log::debug!("save<{}>: {}", E::ENTITY_NAME, message.as_ref());
        }
    }
}
