//! Scripted prompter for panel tests.

use crate::prompt::Prompter;
use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
};

///
/// ScriptedPrompter
///
/// Answers confirms from a queue and records every message it was shown.
/// An exhausted queue answers `false`, so a test that forgets to script an
/// answer fails loudly instead of deleting things.
///

#[derive(Debug, Default)]
pub(crate) struct ScriptedPrompter {
    answers: RefCell<VecDeque<bool>>,
    confirms: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    pub(crate) fn answering(answers: impl IntoIterator<Item = bool>) -> Rc<Self> {
        Rc::new(Self {
            answers: RefCell::new(answers.into_iter().collect()),
            ..Self::default()
        })
    }

    pub(crate) fn confirms(&self) -> Vec<String> {
        self.confirms.borrow().clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str) -> bool {
        self.confirms.borrow_mut().push(message.to_string());
        self.answers.borrow_mut().pop_front().unwrap_or(false)
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}
