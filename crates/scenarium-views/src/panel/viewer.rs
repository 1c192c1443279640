use crate::{
    panel::{PanelError, WiredTable},
    table::SharedTableModel,
    topology::{HostPredicate, TopologyDirectory},
};
use scenarium_core::{
    db::{Db, DbSession},
    entity::{FileEntry, Scenario, Variable},
    notify::{ChangeAction, ChangeEvent, ChangeSink, Subscription},
    traits::EntityTag,
    types::Id,
};
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

///
/// ScenarioViewer
///
/// Bus-driven read surface over one scenario: a description mirror plus
/// attached variables/files tables. Everything it shows arrives through
/// the change bus; the viewer itself never mutates an entity, so it can
/// coexist with any number of edit surfaces without double-applying.
///
/// Wiring order is attach, then `load`.
///

pub struct ScenarioViewer {
    inner: Rc<ViewerInner>,
    _subscription: Subscription,
}

struct ViewerInner {
    session: DbSession,
    bound: Cell<Option<Id<Scenario>>>,
    description: RefCell<String>,
    topology_name: RefCell<Option<String>>,
    variables: RefCell<Option<WiredTable<Variable>>>,
    files: RefCell<Option<WiredTable<FileEntry>>>,
    host_source: RefCell<Option<(Rc<dyn TopologyDirectory>, HostPredicate)>>,
}

impl ScenarioViewer {
    #[must_use]
    pub fn new(db: &Db) -> Self {
        let inner = Rc::new(ViewerInner {
            session: db.session(),
            bound: Cell::new(None),
            description: RefCell::new(String::new()),
            topology_name: RefCell::new(None),
            variables: RefCell::new(None),
            files: RefCell::new(None),
            host_source: RefCell::new(None),
        });
        let subscription = db.bus().subscribe(EntityTag::Scenario, &inner);

        Self {
            inner,
            _subscription: subscription,
        }
    }

    // ---------------------
    // wiring
    // ---------------------

    /// Attaches and bus-wires the variables table. One per panel.
    pub fn attach_variables(&mut self, model: SharedTableModel<Variable>) -> Result<(), PanelError> {
        let mut slot = self.inner.variables.borrow_mut();
        if slot.is_some() {
            return Err(PanelError::TableAlreadyAttached { slot: "variables" });
        }

        *slot = Some(WiredTable::wire(self.inner.session.db().bus(), model));
        Ok(())
    }

    /// Attaches and bus-wires the files table. One per panel.
    pub fn attach_files(&mut self, model: SharedTableModel<FileEntry>) -> Result<(), PanelError> {
        let mut slot = self.inner.files.borrow_mut();
        if slot.is_some() {
            return Err(PanelError::TableAlreadyAttached { slot: "files" });
        }

        *slot = Some(WiredTable::wire(self.inner.session.db().bus(), model));
        Ok(())
    }

    /// Provides the topology collaborator `host_count` reads from.
    pub fn set_topology(&mut self, directory: Rc<dyn TopologyDirectory>, filter: HostPredicate) {
        *self.inner.host_source.borrow_mut() = Some((directory, filter));
    }

    // ---------------------
    // reads
    // ---------------------

    #[must_use]
    pub fn bound(&self) -> Option<Id<Scenario>> {
        self.inner.bound.get()
    }

    #[must_use]
    pub fn description(&self) -> String {
        self.inner.description.borrow().clone()
    }

    #[must_use]
    pub fn topology_name(&self) -> Option<String> {
        self.inner.topology_name.borrow().clone()
    }

    #[must_use]
    pub fn has_variables_table(&self) -> bool {
        self.inner.variables.borrow().is_some()
    }

    #[must_use]
    pub fn has_files_table(&self) -> bool {
        self.inner.files.borrow().is_some()
    }

    /// Hosts of the bound scenario's topology that satisfy the predicate.
    /// Without a topology, a directory, or a bound scenario this is zero.
    #[must_use]
    pub fn host_count(&self) -> usize {
        let source = self.inner.host_source.borrow();
        let Some((directory, filter)) = source.as_ref() else {
            return 0;
        };
        let name = self.inner.topology_name.borrow();
        let Some(name) = name.as_deref() else {
            return 0;
        };

        directory.hosts(name).iter().filter(|host| filter(host)).count()
    }

    // ---------------------
    // load
    // ---------------------

    /// Binds the panel to `id`: clears every surface, then loads the
    /// scenario mirror and each attached table independently. A missing
    /// scenario leaves the mirrors empty.
    pub fn load(&mut self, id: Id<Scenario>) -> Result<(), PanelError> {
        self.inner.clear();
        self.inner.bound.set(Some(id));

        if let Some(scenario) = self.inner.session.query_by_id::<Scenario>(id)? {
            *self.inner.description.borrow_mut() = scenario.description;
            *self.inner.topology_name.borrow_mut() = scenario.topology;
        }

        if let Some(wired) = &*self.inner.variables.borrow() {
            wired.model.borrow_mut().load(id)?;
        }
        if let Some(wired) = &*self.inner.files.borrow() {
            wired.model.borrow_mut().load(id)?;
        }

        Ok(())
    }
}

impl fmt::Debug for ScenarioViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioViewer")
            .field("bound", &self.inner.bound.get())
            .field("variables", &self.has_variables_table())
            .field("files", &self.has_files_table())
            .finish()
    }
}

impl ViewerInner {
    fn clear(&self) {
        self.bound.set(None);
        self.description.borrow_mut().clear();
        *self.topology_name.borrow_mut() = None;

        if let Some(wired) = &*self.variables.borrow() {
            wired.model.borrow_mut().clear();
        }
        if let Some(wired) = &*self.files.borrow() {
            wired.model.borrow_mut().clear();
        }
    }

    // bus path: a missing or unreadable scenario degrades to a no-op
    fn refresh_scenario(&self) {
        let Some(id) = self.bound.get() else {
            return;
        };

        match self.session.query_by_id::<Scenario>(id) {
            Ok(Some(scenario)) => {
                *self.description.borrow_mut() = scenario.description;
                *self.topology_name.borrow_mut() = scenario.topology;
            }
            Ok(None) => {}
            Err(err) => log::warn!("viewer: refresh {id} failed: {err}"),
        }
    }
}

impl ChangeSink for ViewerInner {
    fn notify(&self, event: &ChangeEvent) {
        let Some(id) = event.id_for::<Scenario>() else {
            return;
        };
        if self.bound.get() != Some(id) {
            return;
        }

        match event.action {
            ChangeAction::Added | ChangeAction::Updated => self.refresh_scenario(),
            ChangeAction::Removed => self.clear(),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        column::{FILE_COLUMNS, VARIABLE_COLUMNS},
        table::TableModel,
        topology::{HostRecord, StaticTopology},
    };
    use scenarium_core::types::Ulid;

    fn wired(db: &Db) -> (
        ScenarioViewer,
        SharedTableModel<Variable>,
        SharedTableModel<FileEntry>,
    ) {
        let mut viewer = ScenarioViewer::new(db);
        let variables = TableModel::new(db, VARIABLE_COLUMNS, None).into_shared();
        let files = TableModel::new(db, FILE_COLUMNS, None).into_shared();
        viewer.attach_variables(Rc::clone(&variables)).unwrap();
        viewer.attach_files(Rc::clone(&files)).unwrap();

        (viewer, variables, files)
    }

    fn scenario_named(db: &Db, name: &str) -> Scenario {
        db.session().insert(Scenario::new(name)).unwrap()
    }

    #[test]
    fn attaching_a_second_table_is_an_error() {
        let db = Db::new();
        let mut viewer = ScenarioViewer::new(&db);

        let first = TableModel::new(&db, VARIABLE_COLUMNS, None).into_shared();
        let second = TableModel::new(&db, VARIABLE_COLUMNS, None).into_shared();
        viewer.attach_variables(first).unwrap();

        assert!(matches!(
            viewer.attach_variables(second),
            Err(PanelError::TableAlreadyAttached { slot: "variables" })
        ));
        assert!(viewer.has_variables_table());
    }

    #[test]
    fn load_fills_the_mirror_and_both_tables() {
        let db = Db::new();
        let mut scenario = Scenario::new("demo");
        scenario.description = "a demo".to_string();
        let scenario = db.session().insert(scenario).unwrap();
        db.session()
            .insert(Variable::new(scenario.id, "v1"))
            .unwrap();
        db.session()
            .insert(FileEntry::new(scenario.id, "f1"))
            .unwrap();

        let (mut viewer, variables, files) = wired(&db);
        viewer.load(scenario.id).unwrap();

        assert_eq!(viewer.bound(), Some(scenario.id));
        assert_eq!(viewer.description(), "a demo");
        assert_eq!(variables.borrow().len(), 1);
        assert_eq!(files.borrow().len(), 1);
    }

    #[test]
    fn loading_a_missing_scenario_leaves_the_mirrors_empty() {
        let db = Db::new();
        let (mut viewer, variables, _files) = wired(&db);

        viewer.load(Id::from(Ulid::generate())).unwrap();

        assert!(viewer.bound().is_some());
        assert_eq!(viewer.description(), "");
        assert!(variables.borrow().is_empty());
    }

    #[test]
    fn child_events_land_only_in_the_matching_panel() {
        let db = Db::new();
        let ours = scenario_named(&db, "ours");
        let theirs = scenario_named(&db, "theirs");

        let (mut viewer, variables, _files) = wired(&db);
        viewer.load(ours.id).unwrap();

        db.session().insert(Variable::new(theirs.id, "far")).unwrap();
        assert!(variables.borrow().is_empty());

        db.session().insert(Variable::new(ours.id, "near")).unwrap();
        assert_eq!(variables.borrow().len(), 1);
    }

    #[test]
    fn a_scenario_update_refreshes_the_description_mirror() {
        let db = Db::new();
        let scenario = scenario_named(&db, "demo");
        let other = scenario_named(&db, "other");

        let (mut viewer, _variables, _files) = wired(&db);
        viewer.load(scenario.id).unwrap();

        let mut changed = scenario.clone();
        changed.description = "fresh".to_string();
        db.session().update(changed).unwrap();
        assert_eq!(viewer.description(), "fresh");

        let mut unrelated = other.clone();
        unrelated.description = "noise".to_string();
        db.session().update(unrelated).unwrap();
        assert_eq!(viewer.description(), "fresh");
    }

    #[test]
    fn removing_the_bound_scenario_clears_the_panel() {
        let db = Db::new();
        let scenario = scenario_named(&db, "doomed");
        db.session()
            .insert(Variable::new(scenario.id, "v"))
            .unwrap();

        let (mut viewer, variables, files) = wired(&db);
        viewer.load(scenario.id).unwrap();
        assert_eq!(variables.borrow().len(), 1);

        db.session().delete::<Scenario>(scenario.id).unwrap();

        assert_eq!(viewer.bound(), None);
        assert_eq!(viewer.description(), "");
        assert!(variables.borrow().is_empty());
        assert!(files.borrow().is_empty());
    }

    #[test]
    fn removing_another_scenario_changes_nothing() {
        let db = Db::new();
        let scenario = scenario_named(&db, "keep");
        let other = scenario_named(&db, "drop");

        let (mut viewer, _variables, _files) = wired(&db);
        viewer.load(scenario.id).unwrap();

        db.session().delete::<Scenario>(other.id).unwrap();

        assert_eq!(viewer.bound(), Some(scenario.id));
    }

    #[test]
    fn an_unattached_panel_still_loads_the_mirror() {
        let db = Db::new();
        let mut scenario = Scenario::new("bare");
        scenario.description = "no tables".to_string();
        let scenario = db.session().insert(scenario).unwrap();

        let mut viewer = ScenarioViewer::new(&db);
        viewer.load(scenario.id).unwrap();

        assert_eq!(viewer.description(), "no tables");
        assert!(!viewer.has_variables_table());
        assert!(!viewer.has_files_table());
    }

    #[test]
    fn host_count_applies_the_predicate_to_the_bound_topology() {
        let db = Db::new();
        let mut scenario = Scenario::new("networked");
        scenario.topology = Some("lab".to_string());
        let scenario = db.session().insert(scenario).unwrap();

        let mut directory = StaticTopology::new();
        directory.add_host("lab", HostRecord::new("pc-1", "workstation"));
        directory.add_host("lab", HostRecord::new("pc-2", "workstation"));
        directory.add_host("lab", HostRecord::new("sw-1", "switch"));

        let (mut viewer, _variables, _files) = wired(&db);
        assert_eq!(viewer.host_count(), 0); // no directory yet

        viewer.set_topology(
            Rc::new(directory),
            Box::new(|host| host.kind == "workstation"),
        );
        assert_eq!(viewer.host_count(), 0); // not loaded yet

        viewer.load(scenario.id).unwrap();
        assert_eq!(viewer.host_count(), 2);
        assert_eq!(viewer.topology_name().as_deref(), Some("lab"));
    }

    #[test]
    fn host_count_is_zero_without_a_topology_reference() {
        let db = Db::new();
        let scenario = scenario_named(&db, "plain");

        let (mut viewer, _variables, _files) = wired(&db);
        viewer.set_topology(Rc::new(StaticTopology::new()), Box::new(|_| true));
        viewer.load(scenario.id).unwrap();

        assert_eq!(viewer.host_count(), 0);
    }
}
