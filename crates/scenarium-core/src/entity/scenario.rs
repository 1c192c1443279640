use crate::{
    traits::{EntityIdentity, EntityKind, EntityTag, Lifecycle, Named, Path},
    types::{Id, Timestamp},
};
use serde::{Deserialize, Serialize};

///
/// Scenario
///
/// Root entity of the editor: everything else hangs off one of these
/// through an explicit `scenario_id`. The stand and group references
/// are opaque here; resolving them belongs to the host application.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Scenario {
    pub id: Id<Scenario>,
    pub name: String,
    pub stand: String,
    pub group: String,
    pub description: String,

    /// Written exactly once, on the first save that finds it unset.
    pub created_at: Option<Timestamp>,

    /// Refreshed on every save.
    pub updated_at: Option<Timestamp>,

    /// When set, file payloads live under `file_store_path` instead of
    /// inline rows. The path travels with the flag.
    pub use_file_store: bool,
    pub file_store_path: String,

    /// Opaque key into the host's topology directory, if any canvas is
    /// associated with this scenario.
    pub topology: Option<String>,
}

impl Scenario {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Id::generate(),
            name: name.into(),
            stand: String::new(),
            group: String::new(),
            description: String::new(),
            created_at: None,
            updated_at: None,
            use_file_store: false,
            file_store_path: String::new(),
            topology: None,
        }
    }
}

impl Path for Scenario {
    const PATH: &'static str = "entity::Scenario";
}

impl EntityIdentity for Scenario {
    const TAG: EntityTag = EntityTag::Scenario;
    const ENTITY_NAME: &'static str = "scenario";
}

impl EntityKind for Scenario {
    fn id(&self) -> Id<Self> {
        self.id
    }
}

impl Named for Scenario {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Lifecycle for Scenario {
    fn touch(&mut self, now: Timestamp) {
        if self.created_at.is_none() {
            self.created_at = Some(now);
        }
        self.updated_at = Some(now);
    }
}

///
/// TESTS
///
