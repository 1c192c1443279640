use crate::{
    db::{Db, store::DataKey},
    error::InternalError,
    notify::ChangeEvent,
    traits::EntityKind,
    types::Id,
};
use std::marker::PhantomData;

///
/// DeleteExecutor
///

pub(crate) struct DeleteExecutor<E: EntityKind> {
    db: Db,
    debug: bool,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> DeleteExecutor<E> {
    #[must_use]
    pub(crate) const fn new(db: Db, debug: bool) -> Self {
        Self {
            db,
            debug,
            _marker: PhantomData,
        }
    }

    /// Delete one entity by id. Absence is not an error; the return
    /// value says whether a row was actually removed, and no event
    /// fires for a miss.
    pub(crate) fn one(&self, id: Id<E>) -> Result<bool, InternalError> {
        let key = DataKey::new(id);
        let removed = self.db.with_store_mut(|store| store.remove(&key))?;

        if removed.is_none() {
            self.debug_log(format!("delete {key} (missing)"));
            return Ok(false);
        }

        self.debug_log(format!("delete {key}"));
        self.db.publish(ChangeEvent::removed(id));

        Ok(true)
    }

    fn debug_log(&self, message: impl AsRef<str>) {
        if self.debug {
            log::debug!("delete<{}>: {}", E::ENTITY_NAME, message.as_ref());
        }
    }
}
