use crate::{
    db::{
        Db,
        executor::{DeleteExecutor, LoadExecutor, SaveExecutor},
    },
    error::InternalError,
    traits::{ChildOf, EntityKind},
    types::Id,
};

///
/// DbSession
///
/// Session-scoped database handle with policy (debug) and execution
/// routing. Views and panels talk to the store exclusively through one
/// of these.
///

#[derive(Clone, Debug)]
pub struct DbSession {
    db: Db,
    debug: bool,
}

impl DbSession {
    #[must_use]
    pub const fn new(db: Db) -> Self {
        Self { db, debug: false }
    }

    /// Enable debug logging for every executor this session creates.
    #[must_use]
    pub const fn debug(mut self) -> Self {
        self.debug = true;
        self
    }

    #[must_use]
    pub const fn db(&self) -> &Db {
        &self.db
    }

    // ---------------------------------------------------------------------
    // Query entry points (public, intent-level)
    // ---------------------------------------------------------------------

    /// Load one entity by id; absence is `None`, never an error.
    pub fn query_by_id<E: EntityKind>(&self, id: Id<E>) -> Result<Option<E>, InternalError> {
        self.load_executor::<E>().try_one(id)
    }

    /// Load one entity by id, erroring when it is absent.
    pub fn require_by_id<E: EntityKind>(&self, id: Id<E>) -> Result<E, InternalError> {
        self.load_executor::<E>().one(id)
    }

    /// Load every child of `parent`, in id (= creation) order.
    pub fn children_of<E>(&self, parent: Id<E::Parent>) -> Result<Vec<E>, InternalError>
    where
        E: EntityKind + ChildOf,
    {
        self.load_executor::<E>().children_of(parent)
    }

    // ---------------------------------------------------------------------
    // High-level write API (public, intent-level)
    // ---------------------------------------------------------------------

    /// Insert a brand-new entity (errors if the key already exists).
    pub fn insert<E: EntityKind>(&self, entity: E) -> Result<E, InternalError> {
        self.save_executor::<E>().insert(entity)
    }

    /// Update an existing entity (errors if it does not exist).
    pub fn update<E: EntityKind>(&self, entity: E) -> Result<E, InternalError> {
        self.save_executor::<E>().update(entity)
    }

    /// Save regardless of prior presence (upsert).
    pub fn save<E: EntityKind>(&self, entity: E) -> Result<E, InternalError> {
        self.save_executor::<E>().replace(entity)
    }

    /// Delete by id; returns whether a row was actually removed.
    pub fn delete<E: EntityKind>(&self, id: Id<E>) -> Result<bool, InternalError> {
        self.delete_executor::<E>().one(id)
    }

    // ---------------------------------------------------------------------
    // Low-level executors (crate-internal; execution primitives)
    // ---------------------------------------------------------------------

    #[must_use]
    pub(crate) fn load_executor<E: EntityKind>(&self) -> LoadExecutor<E> {
        LoadExecutor::new(self.db.clone(), self.debug)
    }

    #[must_use]
    pub(crate) fn save_executor<E: EntityKind>(&self) -> SaveExecutor<E> {
        SaveExecutor::new(self.db.clone(), self.debug)
    }

    #[must_use]
    pub(crate) fn delete_executor<E: EntityKind>(&self) -> DeleteExecutor<E> {
        DeleteExecutor::new(self.db.clone(), self.debug)
    }
}

///
/// TESTS
///
