use crate::{
    db::{
        Db,
        executor::decode_checked,
        store::{DataKey, DataRow},
    },
    error::InternalError,
    traits::{ChildOf, EntityKind},
    types::Id,
};
use std::marker::PhantomData;

///
/// LoadExecutor
///
/// Read side of the store. Loads always decode through the identity
/// check, so a corrupt row surfaces at the first read instead of
/// leaking bad data into a view.
///

pub(crate) struct LoadExecutor<E: EntityKind> {
    db: Db,
    debug: bool,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> LoadExecutor<E> {
    #[must_use]
    pub(crate) const fn new(db: Db, debug: bool) -> Self {
        Self {
            db,
            debug,
            _marker: PhantomData,
        }
    }

    /// Load one entity by id, mapping absence to `None`.
    pub(crate) fn try_one(&self, id: Id<E>) -> Result<Option<E>, InternalError> {
        let key = DataKey::new(id);
        let row = self.db.with_store(|store| store.get(&key).cloned())?;

        row.map(|row| decode_checked::<E>(key, &row)).transpose()
    }

    /// Load one entity by id, erroring when it is absent.
    pub(crate) fn one(&self, id: Id<E>) -> Result<E, InternalError> {
        self.try_one(id)?
            .ok_or_else(|| InternalError::store_not_found(DataKey::new(id).to_string()))
    }

    /// Load every entity of this kind, in id order.
    pub(crate) fn all(&self) -> Result<Vec<E>, InternalError> {
        let rows: Vec<DataRow> = self.db.with_store(|store| {
            store
                .rows_of(E::TAG)
                .map(|(key, row)| (*key, row.clone()))
                .collect()
        })?;

        let mut out = Vec::with_capacity(rows.len());
        for (key, row) in rows {
            out.push(decode_checked::<E>(key, &row)?);
        }

        self.debug_log(format!("all -> {} row(s)", out.len()));

        Ok(out)
    }

    fn debug_log(&self, message: impl AsRef<str>) {
        if self.debug {
            log::debug!("load<{}>: {}", E::ENTITY_NAME, message.as_ref());
        }
    }
}

impl<E: EntityKind + ChildOf> LoadExecutor<E> {
    /// Load every child of `parent`, in id order.
    pub(crate) fn children_of(&self, parent: Id<E::Parent>) -> Result<Vec<E>, InternalError> {
        let mut children = self.all()?;
        children.retain(|entity| entity.parent_id() == parent);

        Ok(children)
    }
}
