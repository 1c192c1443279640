pub mod editor;
pub mod request;
pub mod viewer;

pub use editor::ScenarioEditor;
pub use request::{RequestActions, RequestPanel};
pub use viewer::ScenarioViewer;

use crate::table::{SharedTableModel, TableSink};
use scenarium_core::{
    entity::TransitionError,
    error::InternalError,
    notify::{ChangeBus, Subscription},
    traits::{ChildOf, EntityKind},
};
use std::rc::Rc;
use thiserror::Error as ThisError;

///
/// PanelError
///
/// Recoverable panel-layer failures: wiring mistakes and rejected actions.
/// `Store` carries through anything fatal from below.
///

#[derive(Debug, ThisError)]
pub enum PanelError {
    #[error("a {slot} table is already attached")]
    TableAlreadyAttached { slot: &'static str },

    #[error("no scenario is bound")]
    NoScenarioBound,

    #[error("no request is selected")]
    NoSelection,

    #[error("the selected request no longer exists")]
    SelectionGone,

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Store(#[from] InternalError),
}

///
/// WiredTable
///
/// A shared model plus the bus wiring feeding it. Dropping this detaches
/// the model; afterwards it no longer follows the bus.
///

pub(crate) struct WiredTable<E: EntityKind + ChildOf> {
    pub(crate) model: SharedTableModel<E>,
    _sink: Rc<TableSink<E>>,
    _subscription: Subscription,
}

impl<E: EntityKind + ChildOf> WiredTable<E> {
    pub(crate) fn wire(bus: &ChangeBus, model: SharedTableModel<E>) -> Self {
        let (sink, subscription) = TableSink::subscribe(bus, &model);

        Self {
            model,
            _sink: sink,
            _subscription: subscription,
        }
    }
}

///
/// TESTS
///
/// Cross-panel flows: one mutation, two panels, each update path applied
/// exactly once.
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        column::VARIABLE_COLUMNS,
        table::{SharedTableModel, TableModel},
        test_support::ScriptedPrompter,
    };
    use scenarium_core::{
        db::Db,
        entity::{Scenario, Variable},
        notify::ChangeEvent,
        types::{Id, Ulid},
    };

    fn wired_viewer(db: &Db) -> (ScenarioViewer, SharedTableModel<Variable>) {
        let mut viewer = ScenarioViewer::new(db);
        let model = TableModel::new(db, VARIABLE_COLUMNS, None).into_shared();
        viewer.attach_variables(Rc::clone(&model)).unwrap();

        (viewer, model)
    }

    fn wired_editor(
        db: &Db,
        prompter: &Rc<ScriptedPrompter>,
    ) -> (ScenarioEditor, SharedTableModel<Variable>) {
        let mut editor = ScenarioEditor::new(db, Rc::<ScriptedPrompter>::clone(prompter));
        let model = TableModel::new(db, VARIABLE_COLUMNS, None).into_shared();
        editor.attach_variables(Rc::clone(&model)).unwrap();

        (editor, model)
    }

    #[test]
    fn an_edit_in_one_panel_reaches_the_other_exactly_once() {
        let db = Db::new();
        let scenario = db.session().insert(Scenario::new("shared")).unwrap();

        let prompter = ScriptedPrompter::answering([true]);
        let (mut editor, editor_vars) = wired_editor(&db, &prompter);
        editor.load(scenario.id).unwrap();

        let (mut viewer, viewer_vars) = wired_viewer(&db);
        viewer.load(scenario.id).unwrap();

        let mut session = editor.new_variable("speed").unwrap();
        assert!(editor.commit_variable(&mut session).unwrap());

        // local path on the editor, bus path on the viewer, one row each
        assert_eq!(editor_vars.borrow().len(), 1);
        assert_eq!(viewer_vars.borrow().len(), 1);

        let id = editor_vars.borrow().rows()[0].id;
        assert!(editor.remove_variable(id).unwrap());
        assert!(editor_vars.borrow().is_empty());
        assert!(viewer_vars.borrow().is_empty());
    }

    #[test]
    fn a_description_edit_reaches_the_viewer_mirror() {
        let db = Db::new();
        let mut scenario = Scenario::new("shared");
        scenario.description = "before".to_string();
        let scenario = db.session().insert(scenario).unwrap();

        let (mut viewer, _viewer_vars) = wired_viewer(&db);
        viewer.load(scenario.id).unwrap();
        assert_eq!(viewer.description(), "before");

        let prompter = ScriptedPrompter::answering([]);
        let (mut editor, _editor_vars) = wired_editor(&db, &prompter);
        editor.load(scenario.id).unwrap();

        editor.scenario_mut().unwrap().description = "after".to_string();
        editor.save_scenario().unwrap();

        assert_eq!(viewer.description(), "after");
    }

    #[test]
    fn declining_the_confirm_leaves_every_surface_untouched() {
        let db = Db::new();
        let scenario = db.session().insert(Scenario::new("shared")).unwrap();

        let prompter = ScriptedPrompter::answering([false]);
        let (mut editor, editor_vars) = wired_editor(&db, &prompter);
        editor.load(scenario.id).unwrap();

        let (mut viewer, viewer_vars) = wired_viewer(&db);
        viewer.load(scenario.id).unwrap();

        let mut session = editor.new_variable("keep-me").unwrap();
        assert!(editor.commit_variable(&mut session).unwrap());
        let id = editor_vars.borrow().rows()[0].id;
        let rows_before = db.row_count();

        assert!(!editor.remove_variable(id).unwrap());

        assert_eq!(db.row_count(), rows_before);
        assert_eq!(editor_vars.borrow().len(), 1);
        assert_eq!(viewer_vars.borrow().len(), 1);
        assert_eq!(prompter.confirms().len(), 1);
    }

    #[test]
    fn panels_bound_to_other_scenarios_stay_untouched() {
        let db = Db::new();
        let ours = db.session().insert(Scenario::new("ours")).unwrap();
        let theirs = db.session().insert(Scenario::new("theirs")).unwrap();

        let (mut viewer, viewer_vars) = wired_viewer(&db);
        viewer.load(ours.id).unwrap();

        let prompter = ScriptedPrompter::answering([]);
        let (mut editor, _editor_vars) = wired_editor(&db, &prompter);
        editor.load(theirs.id).unwrap();

        let mut session = editor.new_variable("not-yours").unwrap();
        assert!(editor.commit_variable(&mut session).unwrap());

        assert!(viewer_vars.borrow().is_empty());
        assert_eq!(viewer.description(), "");
    }

    #[test]
    fn a_dropped_viewer_detaches_its_models() {
        let db = Db::new();
        let scenario = db.session().insert(Scenario::new("shared")).unwrap();

        let (mut viewer, viewer_vars) = wired_viewer(&db);
        viewer.load(scenario.id).unwrap();
        drop(viewer);

        db.session()
            .insert(Variable::new(scenario.id, "late"))
            .unwrap();

        assert!(viewer_vars.borrow().is_empty());
    }

    #[test]
    fn events_for_missing_referents_are_no_ops() {
        let db = Db::new();
        let scenario = db.session().insert(Scenario::new("shared")).unwrap();

        let (mut viewer, viewer_vars) = wired_viewer(&db);
        viewer.load(scenario.id).unwrap();

        let ghost = Id::<Variable>::from(Ulid::generate());
        db.bus().publish(ChangeEvent::added(ghost));
        db.bus().publish(ChangeEvent::updated(ghost));
        db.bus().publish(ChangeEvent::removed(ghost));

        assert!(viewer_vars.borrow().is_empty());
        assert_eq!(viewer.bound(), Some(scenario.id));
    }
}
