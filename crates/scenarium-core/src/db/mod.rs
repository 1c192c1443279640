pub mod executor;
pub mod session;
pub mod store;

pub use executor::SaveMode;
pub use session::DbSession;
pub use store::{DataKey, DataRow, MAX_ROW_BYTES, RawRow};

use crate::{
    error::InternalError,
    notify::{ChangeBus, ChangeEvent},
    types::{Clock, SystemClock, Timestamp},
};
use std::{cell::RefCell, fmt, rc::Rc};
use store::DataStore;

///
/// Db
///
/// Cheap-to-clone handle over one store + bus + clock scope. Everything
/// a host builds (sessions, panels, view models) hangs off a clone of
/// one handle; two independently constructed handles share nothing.
///

#[derive(Clone)]
pub struct Db {
    inner: Rc<DbInner>,
}

struct DbInner {
    store: RefCell<DataStore>,
    bus: ChangeBus,
    clock: Rc<dyn Clock>,
}

impl Db {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Rc::new(SystemClock))
    }

    /// Build a handle with an injected clock.
    #[must_use]
    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(DbInner {
                store: RefCell::new(DataStore::new()),
                bus: ChangeBus::new(),
                clock,
            }),
        }
    }

    /// Open a session on this handle.
    #[must_use]
    pub fn session(&self) -> DbSession {
        DbSession::new(self.clone())
    }

    /// The change bus scoped to this handle.
    #[must_use]
    pub fn bus(&self) -> &ChangeBus {
        &self.inner.bus
    }

    /// Current time from the handle's clock.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.inner.clock.now()
    }

    /// Number of rows across every entity kind.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.with_store(|store| store.len()).unwrap_or(0)
    }

    /// Bytes used by stored rows.
    #[must_use]
    pub fn memory_bytes(&self) -> u64 {
        self.with_store(DataStore::memory_bytes).unwrap_or(0)
    }

    pub(crate) fn publish(&self, event: ChangeEvent) {
        self.inner.bus.publish(event);
    }

    // Store access goes through try_borrow so a re-entrant access shows
    // up as a classified invariant violation instead of a panic.
    pub(crate) fn with_store<R>(
        &self,
        f: impl FnOnce(&DataStore) -> R,
    ) -> Result<R, InternalError> {
        let store = self.inner.store.try_borrow().map_err(|_| {
            InternalError::store_invariant("data store is already mutably borrowed")
        })?;

        Ok(f(&store))
    }

    pub(crate) fn with_store_mut<R>(
        &self,
        f: impl FnOnce(&mut DataStore) -> R,
    ) -> Result<R, InternalError> {
        let mut store = self
            .inner
            .store
            .try_borrow_mut()
            .map_err(|_| InternalError::store_invariant("data store is already borrowed"))?;

        Ok(f(&mut store))
    }
}

impl Default for Db {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("rows", &self.row_count())
            .field("sinks", &self.bus().sink_count())
            .finish()
    }
}
