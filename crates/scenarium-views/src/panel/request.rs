use crate::{
    column::REQUEST_COLUMNS,
    panel::{PanelError, WiredTable},
    table::{SharedTableModel, TableModel},
};
use scenarium_core::{
    db::{Db, DbSession},
    entity::{RequestCommand, RequestStatus, RuntimeRequest, Scenario},
    types::Id,
};
use std::fmt;

///
/// RequestActions
///
/// Which request commands are currently enabled. Derived, never stored:
/// the selection's status decides, and with no selection only `run` can be
/// on (it files a new request).
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RequestActions {
    pub run: bool,
    pub pause: bool,
    pub resume: bool,
    pub stop: bool,
}

///
/// RequestPanel
///
/// Runtime requests of one scenario. The panel owns a bus-wired model, so
/// its own saves come back to it the same way everyone else's do; command
/// methods never touch the rows directly.
///

pub struct RequestPanel {
    session: DbSession,
    table: WiredTable<RuntimeRequest>,
    bound: Option<Id<Scenario>>,
    selection: Option<usize>,
}

impl RequestPanel {
    #[must_use]
    pub fn new(db: &Db) -> Self {
        let model = TableModel::new(db, REQUEST_COLUMNS, None).into_shared();

        Self {
            session: db.session(),
            table: WiredTable::wire(db.bus(), model),
            bound: None,
            selection: None,
        }
    }

    /// Binds the panel to `scenario` and loads its requests.
    pub fn bind(&mut self, scenario: Id<Scenario>) -> Result<(), PanelError> {
        self.bound = Some(scenario);
        self.selection = None;
        self.table.model.borrow_mut().load(scenario)?;

        Ok(())
    }

    // ---------------------
    // reads
    // ---------------------

    #[must_use]
    pub const fn bound(&self) -> Option<Id<Scenario>> {
        self.bound
    }

    #[must_use]
    pub const fn selection(&self) -> Option<usize> {
        self.selection
    }

    #[must_use]
    pub fn model(&self) -> &SharedTableModel<RuntimeRequest> {
        &self.table.model
    }

    /// Selects a row by index; anything out of range clears the selection.
    pub fn select(&mut self, index: Option<usize>) {
        let len = self.table.model.borrow().len();
        self.selection = index.filter(|i| *i < len);
    }

    /// Enabled commands for the current selection.
    #[must_use]
    pub fn available_actions(&self) -> RequestActions {
        match self.selected_request() {
            None => RequestActions {
                run: self.bound.is_some(),
                ..RequestActions::default()
            },
            Some(request) => RequestActions {
                run: request.status.accepts(RequestCommand::Run),
                pause: request.status.accepts(RequestCommand::Pause),
                resume: request.status.accepts(RequestCommand::Resume),
                stop: request.status.accepts(RequestCommand::Stop),
            },
        }
    }

    // ---------------------
    // commands
    // ---------------------

    /// Runs the selected request, or files a new one for the bound
    /// scenario when nothing is selected.
    pub fn run(&mut self) -> Result<(), PanelError> {
        match self.selected_request() {
            Some(request) => self.apply(request.id, RequestCommand::Run),
            None => {
                let Some(scenario) = self.bound else {
                    return Err(PanelError::NoScenarioBound);
                };

                let mut request = RuntimeRequest::new(scenario);
                request.status = request.status.apply(RequestCommand::Run)?;
                self.session.insert(request)?;

                Ok(())
            }
        }
    }

    pub fn pause(&mut self) -> Result<(), PanelError> {
        self.apply_to_selection(RequestCommand::Pause)
    }

    pub fn resume(&mut self) -> Result<(), PanelError> {
        self.apply_to_selection(RequestCommand::Resume)
    }

    pub fn stop(&mut self) -> Result<(), PanelError> {
        self.apply_to_selection(RequestCommand::Stop)
    }

    // ---------------------
    // internals
    // ---------------------

    fn selected_request(&self) -> Option<RuntimeRequest> {
        let index = self.selection?;
        self.table.model.borrow().row(index).cloned()
    }

    fn apply_to_selection(&mut self, command: RequestCommand) -> Result<(), PanelError> {
        let Some(request) = self.selected_request() else {
            return Err(PanelError::NoSelection);
        };

        self.apply(request.id, command)
    }

    // fetch fresh before transitioning: the held row may be stale
    fn apply(&mut self, id: Id<RuntimeRequest>, command: RequestCommand) -> Result<(), PanelError> {
        let Some(mut request) = self.session.query_by_id::<RuntimeRequest>(id)? else {
            return Err(PanelError::SelectionGone);
        };

        request.status = request.status.apply(command)?;
        if request.status == RequestStatus::Stopped {
            request.finished_at = Some(self.session.db().now());
        }

        self.session.update(request)?;
        Ok(())
    }
}

impl fmt::Debug for RequestPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPanel")
            .field("bound", &self.bound)
            .field("selection", &self.selection)
            .field("rows", &self.table.model.borrow().len())
            .finish()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use scenarium_core::types::{ManualClock, Timestamp};
    use std::rc::Rc;

    fn harness() -> (Db, Rc<ManualClock>, RequestPanel, Id<Scenario>) {
        let clock = Rc::new(ManualClock::starting_at(500));
        let db = Db::with_clock(Rc::<ManualClock>::clone(&clock));
        let scenario = db.session().insert(Scenario::new("emulated")).unwrap();

        let mut panel = RequestPanel::new(&db);
        panel.bind(scenario.id).unwrap();

        (db, clock, panel, scenario.id)
    }

    fn statuses(panel: &RequestPanel) -> Vec<RequestStatus> {
        panel.model().borrow().rows().iter().map(|r| r.status).collect()
    }

    #[test]
    fn an_unbound_panel_only_errors() {
        let db = Db::new();
        let mut panel = RequestPanel::new(&db);

        assert_eq!(panel.available_actions(), RequestActions::default());
        assert!(matches!(panel.run(), Err(PanelError::NoScenarioBound)));
    }

    #[test]
    fn run_without_a_selection_files_a_running_request() {
        let (_db, _clock, mut panel, _scenario) = harness();

        assert_eq!(
            panel.available_actions(),
            RequestActions {
                run: true,
                ..RequestActions::default()
            }
        );

        panel.run().unwrap();

        // the new request arrives through the bus, not a local append
        assert_eq!(statuses(&panel), [RequestStatus::Running]);
        let request = panel.model().borrow().rows()[0].clone();
        assert_eq!(request.requested_at, Some(Timestamp::from_seconds(500)));
        assert_eq!(request.finished_at, None);
    }

    #[test]
    fn the_selection_status_gates_the_actions() {
        let (_db, _clock, mut panel, _scenario) = harness();
        panel.run().unwrap();
        panel.select(Some(0));

        assert_eq!(
            panel.available_actions(),
            RequestActions {
                pause: true,
                stop: true,
                ..RequestActions::default()
            }
        );

        panel.pause().unwrap();
        assert_eq!(
            panel.available_actions(),
            RequestActions {
                resume: true,
                stop: true,
                ..RequestActions::default()
            }
        );
    }

    #[test]
    fn a_full_lifecycle_updates_the_row_in_place() {
        let (_db, clock, mut panel, _scenario) = harness();
        panel.run().unwrap();
        panel.run().unwrap();
        panel.select(Some(0));

        panel.pause().unwrap();
        panel.resume().unwrap();
        clock.advance(120);
        panel.stop().unwrap();

        assert_eq!(
            statuses(&panel),
            [RequestStatus::Stopped, RequestStatus::Running]
        );
        let stopped = panel.model().borrow().rows()[0].clone();
        assert_eq!(stopped.finished_at, Some(Timestamp::from_seconds(620)));
    }

    #[test]
    fn invalid_commands_are_rejected_and_change_nothing() {
        let (_db, _clock, mut panel, _scenario) = harness();
        panel.run().unwrap();
        panel.select(Some(0));
        panel.stop().unwrap();

        assert_eq!(panel.available_actions(), RequestActions::default());
        assert!(matches!(panel.pause(), Err(PanelError::Transition(_))));
        assert!(matches!(panel.run(), Err(PanelError::Transition(_))));
        assert_eq!(statuses(&panel), [RequestStatus::Stopped]);
    }

    #[test]
    fn commands_without_a_selection_are_rejected() {
        let (_db, _clock, mut panel, _scenario) = harness();

        assert!(matches!(panel.pause(), Err(PanelError::NoSelection)));
        assert!(matches!(panel.stop(), Err(PanelError::NoSelection)));
    }

    #[test]
    fn requests_of_other_scenarios_never_show_up() {
        let (db, _clock, panel, _scenario) = harness();
        let other = db.session().insert(Scenario::new("other")).unwrap();

        db.session()
            .insert(RuntimeRequest::new(other.id))
            .unwrap();

        assert!(panel.model().borrow().is_empty());
    }

    #[test]
    fn a_created_request_can_be_run_from_the_selection() {
        let (db, _clock, mut panel, scenario) = harness();

        db.session()
            .insert(RuntimeRequest::new(scenario))
            .unwrap();
        assert_eq!(statuses(&panel), [RequestStatus::Created]);

        panel.select(Some(0));
        assert_eq!(
            panel.available_actions(),
            RequestActions {
                run: true,
                ..RequestActions::default()
            }
        );

        panel.run().unwrap();
        assert_eq!(statuses(&panel), [RequestStatus::Running]);
    }

    #[test]
    fn out_of_range_selections_clear() {
        let (_db, _clock, mut panel, _scenario) = harness();
        panel.run().unwrap();

        panel.select(Some(7));
        assert_eq!(panel.selection(), None);

        panel.select(Some(0));
        assert_eq!(panel.selection(), Some(0));

        panel.select(None);
        assert_eq!(panel.selection(), None);
    }

    #[test]
    fn rebinding_clears_the_selection() {
        let (db, _clock, mut panel, _scenario) = harness();
        panel.run().unwrap();
        panel.select(Some(0));

        let other = db.session().insert(Scenario::new("elsewhere")).unwrap();
        panel.bind(other.id).unwrap();

        assert_eq!(panel.selection(), None);
        assert!(panel.model().borrow().is_empty());
    }
}
