use crate::{
    entity::Scenario,
    traits::{ChildOf, EntityIdentity, EntityKind, EntityTag, Lifecycle, Named, Path},
    types::Id,
};
use serde::{Deserialize, Serialize};

///
/// FileEntry
///
/// A named payload attached to one scenario. `data_ready` tracks
/// whether the inline bytes are current; when the owning scenario uses
/// an external file store the payload may live outside the row.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FileEntry {
    pub id: Id<FileEntry>,
    pub scenario_id: Id<Scenario>,
    pub name: String,
    pub type_name: String,
    pub data_ready: bool,
    pub data: Vec<u8>,
    pub use_file_store: bool,
    pub description: String,
}

impl FileEntry {
    #[must_use]
    pub fn new(scenario_id: Id<Scenario>, name: impl Into<String>) -> Self {
        Self {
            id: Id::generate(),
            scenario_id,
            name: name.into(),
            type_name: String::new(),
            data_ready: false,
            data: Vec::new(),
            use_file_store: false,
            description: String::new(),
        }
    }
}

impl Path for FileEntry {
    const PATH: &'static str = "entity::FileEntry";
}

impl EntityIdentity for FileEntry {
    const TAG: EntityTag = EntityTag::File;
    const ENTITY_NAME: &'static str = "file";
}

impl EntityKind for FileEntry {
    fn id(&self) -> Id<Self> {
        self.id
    }
}

impl ChildOf for FileEntry {
    type Parent = Scenario;

    fn parent_id(&self) -> Id<Scenario> {
        self.scenario_id
    }
}

impl Named for FileEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Lifecycle for FileEntry {}
