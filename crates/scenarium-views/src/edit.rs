use crate::table::TableModel;
use scenarium_core::{
    error::InternalError,
    traits::{ChildOf, EntityKind, Named},
};
use thiserror::Error as ThisError;

///
/// EditError
///
/// Locally recovered edit-flow failures. Only `Store` is fatal; the others
/// leave the session open for another attempt.
///

#[derive(Debug, ThisError)]
pub enum EditError {
    #[error("the name \"{name}\" is already in use")]
    DuplicateName { name: String },

    #[error("edit session is no longer open")]
    SessionClosed,

    #[error(transparent)]
    Store(#[from] InternalError),
}

///
/// EditState
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditState {
    Open,
    Accepted,
    Cancelled,
}

///
/// EditMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditMode {
    Create,
    Edit,
}

///
/// EditSession
///
/// One create-or-rename flow over a named child entity. The session owns a
/// draft; nothing is persisted or shown until `accept` clears the name
/// uniqueness scan. Name comparison is trimmed and case-sensitive, and a
/// row never clashes with itself: exclusion is by id, not by name.
///

#[derive(Debug)]
pub struct EditSession<E: EntityKind + Named> {
    draft: E,
    prior_name: String,
    mode: EditMode,
    state: EditState,
}

impl<E: EntityKind + Named> EditSession<E> {
    /// Starts a session over a fresh draft that is not yet in any model.
    #[must_use]
    pub fn create(draft: E) -> Self {
        Self {
            prior_name: draft.name().to_string(),
            draft,
            mode: EditMode::Create,
            state: EditState::Open,
        }
    }

    /// Starts a session over a copy of an existing row, remembering its
    /// pre-edit name for restore-on-conflict.
    #[must_use]
    pub fn edit(existing: &E) -> Self {
        Self {
            draft: existing.clone(),
            prior_name: existing.name().to_string(),
            mode: EditMode::Edit,
            state: EditState::Open,
        }
    }

    #[must_use]
    pub const fn draft(&self) -> &E {
        &self.draft
    }

    pub const fn draft_mut(&mut self) -> &mut E {
        &mut self.draft
    }

    #[must_use]
    pub const fn mode(&self) -> EditMode {
        self.mode
    }

    #[must_use]
    pub const fn state(&self) -> EditState {
        self.state
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, EditState::Open)
    }

    /// Validates the draft's name against `model`'s current rows, persists,
    /// and applies the local row op. On a duplicate the draft's name is
    /// restored, the session stays open, and the model is untouched.
    pub fn accept(&mut self, model: &mut TableModel<E>) -> Result<(), EditError>
    where
        E: ChildOf,
    {
        if self.state != EditState::Open {
            return Err(EditError::SessionClosed);
        }

        let candidate = self.draft.name().trim().to_string();
        let clash = model
            .rows()
            .iter()
            .any(|row| row.id() != self.draft.id() && row.name().trim() == candidate);

        if clash {
            self.draft.set_name(self.prior_name.clone());
            return Err(EditError::DuplicateName { name: candidate });
        }

        // the trimmed text is what gets persisted and displayed
        self.draft.set_name(candidate);

        let saved = match self.mode {
            EditMode::Create => model.session().insert(self.draft.clone())?,
            EditMode::Edit => model.session().update(self.draft.clone())?,
        };

        match self.mode {
            EditMode::Create => model.append_row(saved),
            EditMode::Edit => {
                model.replace_row(saved);
            }
        }

        self.state = EditState::Accepted;
        Ok(())
    }

    /// Discards the draft. Nothing is persisted and no model changes.
    pub fn cancel(&mut self) {
        if self.state == EditState::Open {
            self.state = EditState::Cancelled;
        }
    }
}

///
/// TESTS
///
