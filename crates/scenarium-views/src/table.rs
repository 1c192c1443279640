use crate::column::Column;
use scenarium_core::{
    db::{Db, DbSession},
    error::InternalError,
    notify::{ChangeAction, ChangeBus, ChangeEvent, ChangeSink, Subscription},
    traits::{ChildOf, EntityKind},
    types::Id,
    value::Value,
};
use std::{cell::RefCell, fmt, rc::Rc};

///
/// TableModel
///
/// Id-keyed row mirror for one entity kind, scoped to one parent. The rows
/// stay in insertion/load order; nothing here re-sorts them.
///
/// Every model supports two update paths. Edit flows use the local row ops
/// (`append_row`, `replace_row`, `remove_row`) directly; everything else
/// reaches the model through the id-keyed ops, usually via a bus-wired
/// `TableSink`. A panel uses one path or the other for a given model, never
/// both, so a mutation is applied exactly once.
///

pub struct TableModel<E: EntityKind + ChildOf> {
    session: DbSession,
    columns: &'static [Column<E>],
    scope: Option<Id<E::Parent>>,
    rows: Vec<E>,
}

impl<E: EntityKind + ChildOf> TableModel<E> {
    #[must_use]
    pub fn new(db: &Db, columns: &'static [Column<E>], scope: Option<Id<E::Parent>>) -> Self {
        Self {
            session: db.session(),
            columns,
            scope,
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn into_shared(self) -> SharedTableModel<E> {
        Rc::new(RefCell::new(self))
    }

    // ---------------------
    // accessors
    // ---------------------

    #[must_use]
    pub const fn session(&self) -> &DbSession {
        &self.session
    }

    #[must_use]
    pub const fn scope(&self) -> Option<Id<E::Parent>> {
        self.scope
    }

    #[must_use]
    pub fn rows(&self) -> &[E] {
        &self.rows
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&E> {
        self.rows.get(index)
    }

    #[must_use]
    pub fn row_by_id(&self, id: Id<E>) -> Option<&E> {
        self.index_of(id).map(|index| &self.rows[index])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub const fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn column_title(&self, column: usize) -> Option<&'static str> {
        self.columns.get(column).map(|c| c.title)
    }

    /// Projects one cell; any out-of-range coordinate is `Null`.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Value {
        let Some(entity) = self.rows.get(row) else {
            return Value::Null;
        };

        self.columns
            .get(column)
            .map_or(Value::Null, |c| c.cell(entity))
    }

    // ---------------------
    // load / clear
    // ---------------------

    /// Re-scopes the model to `parent` and replaces every row with that
    /// parent's children. A parent with no children yields an empty model.
    pub fn load(&mut self, parent: Id<E::Parent>) -> Result<(), InternalError> {
        let rows = self.session.children_of::<E>(parent)?;
        self.scope = Some(parent);
        self.rows = rows;

        Ok(())
    }

    /// Drops every row and the scope; the model ignores id-keyed ops until
    /// the next `load`.
    pub fn clear(&mut self) {
        self.scope = None;
        self.rows.clear();
    }

    // ---------------------
    // id-keyed ops (bus path)
    // ---------------------

    /// Fetches `id` and appends it at the end. An unscoped model, a missing
    /// row, or a row belonging to another parent is a no-op.
    pub fn append_by_id(&mut self, id: Id<E>) -> bool {
        let Some(scope) = self.scope else {
            return false;
        };
        let Some(entity) = self.fetch(id) else {
            return false;
        };
        if entity.parent_id() != scope {
            return false;
        }

        self.rows.push(entity);
        true
    }

    /// Re-fetches `id` and replaces the held row in place, preserving its
    /// position. Rows the model does not hold are a no-op.
    pub fn update_by_id(&mut self, id: Id<E>) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let Some(entity) = self.fetch(id) else {
            return false;
        };

        self.rows[index] = entity;
        true
    }

    /// Removes the held row for `id`, shifting later rows up.
    pub fn remove_by_id(&mut self, id: Id<E>) -> bool {
        self.remove_row(id)
    }

    // ---------------------
    // local row ops (edit-flow path)
    // ---------------------

    pub fn append_row(&mut self, entity: E) {
        self.rows.push(entity);
    }

    pub fn replace_row(&mut self, entity: E) -> bool {
        match self.index_of(entity.id()) {
            Some(index) => {
                self.rows[index] = entity;
                true
            }
            None => false,
        }
    }

    pub fn remove_row(&mut self, id: Id<E>) -> bool {
        match self.index_of(id) {
            Some(index) => {
                self.rows.remove(index);
                true
            }
            None => false,
        }
    }

    // ---------------------
    // internals
    // ---------------------

    fn index_of(&self, id: Id<E>) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    // notifications are informative, not authoritative: an unreadable
    // referent degrades to a no-op like a missing one
    fn fetch(&self, id: Id<E>) -> Option<E> {
        match self.session.query_by_id(id) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("table<{}>: fetch {id} failed: {err}", E::ENTITY_NAME);
                None
            }
        }
    }
}

impl<E: EntityKind + ChildOf> fmt::Debug for TableModel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableModel")
            .field("entity", &E::ENTITY_NAME)
            .field("scope", &self.scope)
            .field("rows", &self.rows.len())
            .field("columns", &self.columns.len())
            .finish()
    }
}

/// A model shared between its panel and a bus sink.
pub type SharedTableModel<E> = Rc<RefCell<TableModel<E>>>;

///
/// TableSink
///
/// Bus adapter forwarding id-keyed events into a shared model. Viewer
/// panels hold one per attached model; editor panels hold none, keeping
/// their models on the local path only.
///

pub struct TableSink<E: EntityKind + ChildOf> {
    model: SharedTableModel<E>,
}

impl<E: EntityKind + ChildOf> TableSink<E> {
    #[must_use]
    pub fn new(model: &SharedTableModel<E>) -> Rc<Self> {
        Rc::new(Self {
            model: Rc::clone(model),
        })
    }

    /// Wires `model` to `bus` for this entity kind's events. Delivery stops
    /// when either returned value is dropped.
    #[must_use]
    pub fn subscribe(bus: &ChangeBus, model: &SharedTableModel<E>) -> (Rc<Self>, Subscription) {
        let sink = Self::new(model);
        let subscription = bus.subscribe(E::TAG, &sink);

        (sink, subscription)
    }
}

impl<E: EntityKind + ChildOf> ChangeSink for TableSink<E> {
    fn notify(&self, event: &ChangeEvent) {
        let Some(id) = event.id_for::<E>() else {
            return;
        };

        let mut model = self.model.borrow_mut();
        match event.action {
            ChangeAction::Added => model.append_by_id(id),
            ChangeAction::Updated => model.update_by_id(id),
            ChangeAction::Removed => model.remove_by_id(id),
        };
    }
}

impl<E: EntityKind + ChildOf> fmt::Debug for TableSink<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableSink")
            .field("entity", &E::ENTITY_NAME)
            .finish()
    }
}

///
/// TESTS
///
