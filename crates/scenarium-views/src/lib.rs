//! View layer for Scenarium: table models kept live by the change bus,
//! uniqueness-checked edit sessions, and the scenario panels built on both.

#![warn(unreachable_pub)]

pub mod column;
pub mod edit;
pub mod panel;
pub mod prompt;
pub mod table;
pub mod topology;

#[cfg(test)]
pub(crate) mod test_support;

pub mod prelude {
    //! Prelude contains the panel vocabulary.

    pub use crate::{
        column::{Column, FILE_COLUMNS, REQUEST_COLUMNS, VARIABLE_COLUMNS},
        edit::{EditError, EditMode, EditSession, EditState},
        panel::{PanelError, RequestActions, RequestPanel, ScenarioEditor, ScenarioViewer},
        prompt::Prompter,
        table::{SharedTableModel, TableModel, TableSink},
        topology::{HostPredicate, HostRecord, StaticTopology, TopologyDirectory},
    };
}
