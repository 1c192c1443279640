use crate::{
    edit::{EditError, EditSession},
    panel::PanelError,
    prompt::Prompter,
    table::SharedTableModel,
};
use scenarium_core::{
    db::{Db, DbSession},
    entity::{FileEntry, Scenario, Variable},
    traits::{ChildOf, EntityKind, Named},
    types::Id,
};
use std::{fmt, rc::Rc};

///
/// ScenarioEditor
///
/// Local-path edit surface over one scenario. Its models are deliberately
/// not bus-wired: every mutation made here is applied to them directly,
/// and other panels learn about it from the events the store publishes.
///
/// Deletes are gated by the prompter; name conflicts are surfaced through
/// it and leave everything untouched.
///

pub struct ScenarioEditor {
    session: DbSession,
    prompter: Rc<dyn Prompter>,
    scenario: Option<Scenario>,
    variables: Option<SharedTableModel<Variable>>,
    files: Option<SharedTableModel<FileEntry>>,
}

impl ScenarioEditor {
    #[must_use]
    pub fn new(db: &Db, prompter: Rc<dyn Prompter>) -> Self {
        Self {
            session: db.session(),
            prompter,
            scenario: None,
            variables: None,
            files: None,
        }
    }

    // ---------------------
    // wiring
    // ---------------------

    /// Attaches the variables table, unwired. One per panel.
    pub fn attach_variables(&mut self, model: SharedTableModel<Variable>) -> Result<(), PanelError> {
        if self.variables.is_some() {
            return Err(PanelError::TableAlreadyAttached { slot: "variables" });
        }

        self.variables = Some(model);
        Ok(())
    }

    /// Attaches the files table, unwired. One per panel.
    pub fn attach_files(&mut self, model: SharedTableModel<FileEntry>) -> Result<(), PanelError> {
        if self.files.is_some() {
            return Err(PanelError::TableAlreadyAttached { slot: "files" });
        }

        self.files = Some(model);
        Ok(())
    }

    // ---------------------
    // reads
    // ---------------------

    #[must_use]
    pub const fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    pub const fn scenario_mut(&mut self) -> Option<&mut Scenario> {
        self.scenario.as_mut()
    }

    #[must_use]
    pub fn bound(&self) -> Option<Id<Scenario>> {
        self.scenario.as_ref().map(|s| s.id)
    }

    // ---------------------
    // load / save
    // ---------------------

    /// Binds the panel to `id` and loads each attached table. A missing
    /// scenario leaves the panel unbound.
    pub fn load(&mut self, id: Id<Scenario>) -> Result<(), PanelError> {
        self.scenario = self.session.query_by_id::<Scenario>(id)?;

        if let Some(model) = &self.variables {
            model.borrow_mut().load(id)?;
        }
        if let Some(model) = &self.files {
            model.borrow_mut().load(id)?;
        }

        Ok(())
    }

    /// Updates the draft's file-store settings; persisted on the next
    /// `save_scenario`.
    pub fn set_file_store(&mut self, enabled: bool, path: impl Into<String>) {
        if let Some(scenario) = &mut self.scenario {
            scenario.use_file_store = enabled;
            scenario.file_store_path = path.into();
        }
    }

    /// Persists the bound scenario. The save path stamps `updated_at` (and
    /// `created_at` on a first save); the stamped copy becomes the new
    /// draft.
    pub fn save_scenario(&mut self) -> Result<(), PanelError> {
        let Some(scenario) = self.scenario.clone() else {
            return Err(PanelError::NoScenarioBound);
        };

        let saved = self.session.update(scenario)?;
        self.scenario = Some(saved);

        Ok(())
    }

    // ---------------------
    // variable flows
    // ---------------------

    /// Opens a create session for a new variable of the bound scenario.
    #[must_use]
    pub fn new_variable(&self, name: impl Into<String>) -> Option<EditSession<Variable>> {
        let scenario = self.scenario.as_ref()?;
        Some(EditSession::create(Variable::new(scenario.id, name)))
    }

    /// Opens an edit session over a variable the attached table holds.
    #[must_use]
    pub fn edit_variable(&self, id: Id<Variable>) -> Option<EditSession<Variable>> {
        let model = self.variables.as_ref()?;
        let row = model.borrow().row_by_id(id).cloned()?;

        Some(EditSession::edit(&row))
    }

    /// Runs `session` against the attached variables table. A duplicate
    /// name goes to the prompter and leaves the session open; the return
    /// value says whether the draft was accepted.
    pub fn commit_variable(
        &mut self,
        session: &mut EditSession<Variable>,
    ) -> Result<bool, PanelError> {
        let Some(model) = &self.variables else {
            return Ok(false);
        };

        Self::commit(self.prompter.as_ref(), session, model)
    }

    /// Deletes a variable after a confirm. Declining, or naming a row the
    /// table does not hold, changes nothing anywhere.
    pub fn remove_variable(&mut self, id: Id<Variable>) -> Result<bool, PanelError> {
        let Some(model) = &self.variables else {
            return Ok(false);
        };

        let name = model.borrow().row_by_id(id).map(|v| v.name.clone());
        let Some(name) = name else {
            return Ok(false);
        };

        if !self.prompter.confirm(&format!("Delete variable \"{name}\"?")) {
            return Ok(false);
        }

        self.session.delete::<Variable>(id)?;
        model.borrow_mut().remove_row(id);

        Ok(true)
    }

    // ---------------------
    // file flows
    // ---------------------

    /// Opens a create session for a new file entry of the bound scenario.
    #[must_use]
    pub fn new_file(&self, name: impl Into<String>) -> Option<EditSession<FileEntry>> {
        let scenario = self.scenario.as_ref()?;
        Some(EditSession::create(FileEntry::new(scenario.id, name)))
    }

    /// Opens an edit session over a file entry the attached table holds.
    #[must_use]
    pub fn edit_file(&self, id: Id<FileEntry>) -> Option<EditSession<FileEntry>> {
        let model = self.files.as_ref()?;
        let row = model.borrow().row_by_id(id).cloned()?;

        Some(EditSession::edit(&row))
    }

    /// Runs `session` against the attached files table; see
    /// `commit_variable`.
    pub fn commit_file(
        &mut self,
        session: &mut EditSession<FileEntry>,
    ) -> Result<bool, PanelError> {
        let Some(model) = &self.files else {
            return Ok(false);
        };

        Self::commit(self.prompter.as_ref(), session, model)
    }

    /// Deletes a file entry after a confirm; see `remove_variable`.
    pub fn remove_file(&mut self, id: Id<FileEntry>) -> Result<bool, PanelError> {
        let Some(model) = &self.files else {
            return Ok(false);
        };

        let name = model.borrow().row_by_id(id).map(|f| f.name.clone());
        let Some(name) = name else {
            return Ok(false);
        };

        if !self.prompter.confirm(&format!("Delete file \"{name}\"?")) {
            return Ok(false);
        }

        self.session.delete::<FileEntry>(id)?;
        model.borrow_mut().remove_row(id);

        Ok(true)
    }

    // ---------------------
    // internals
    // ---------------------

    fn commit<E>(
        prompter: &dyn Prompter,
        session: &mut EditSession<E>,
        model: &SharedTableModel<E>,
    ) -> Result<bool, PanelError>
    where
        E: EntityKind + Named + ChildOf,
    {
        match session.accept(&mut model.borrow_mut()) {
            Ok(()) => Ok(true),
            Err(EditError::DuplicateName { name }) => {
                prompter.error(&format!("The name \"{name}\" is already in use."));
                Ok(false)
            }
            Err(EditError::SessionClosed) => Ok(false),
            Err(EditError::Store(err)) => Err(err.into()),
        }
    }
}

impl fmt::Debug for ScenarioEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScenarioEditor")
            .field("bound", &self.bound())
            .field("variables", &self.variables.is_some())
            .field("files", &self.files.is_some())
            .finish()
    }
}

///
/// TESTS
///
