use crate::{
    entity::Scenario,
    traits::{ChildOf, EntityIdentity, EntityKind, EntityTag, Lifecycle, Named, Path},
    types::Id,
};
use serde::{Deserialize, Serialize};

///
/// Variable
///
/// A typed value slot belonging to one scenario. Payloads are opaque
/// bytes; the editor only moves them around.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Variable {
    pub id: Id<Variable>,
    pub scenario_id: Id<Scenario>,
    pub name: String,

    /// Display name of the referenced value type.
    pub type_name: String,

    /// `None` means "arbitrary length".
    pub length: Option<u32>,

    pub has_default: bool,
    pub default_value: Vec<u8>,
    pub value: Vec<u8>,
    pub description: String,
}

impl Variable {
    #[must_use]
    pub fn new(scenario_id: Id<Scenario>, name: impl Into<String>) -> Self {
        Self {
            id: Id::generate(),
            scenario_id,
            name: name.into(),
            type_name: String::new(),
            length: None,
            has_default: false,
            default_value: Vec::new(),
            value: Vec::new(),
            description: String::new(),
        }
    }

    /// Accepts a raw signed length. Negative values mean "arbitrary",
    /// the same as absent.
    pub fn set_length_raw(&mut self, raw: i64) {
        self.length = u32::try_from(raw).ok();
    }
}

impl Path for Variable {
    const PATH: &'static str = "entity::Variable";
}

impl EntityIdentity for Variable {
    const TAG: EntityTag = EntityTag::Variable;
    const ENTITY_NAME: &'static str = "variable";
}

impl EntityKind for Variable {
    fn id(&self) -> Id<Self> {
        self.id
    }
}

impl ChildOf for Variable {
    type Parent = Scenario;

    fn parent_id(&self) -> Id<Scenario> {
        self.scenario_id
    }
}

impl Named for Variable {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }
}

impl Lifecycle for Variable {}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_raw_lengths_mean_arbitrary() {
        let mut variable = Variable::new(Id::generate(), "len");

        variable.set_length_raw(16);
        assert_eq!(variable.length, Some(16));

        variable.set_length_raw(-1);
        assert_eq!(variable.length, None);

        variable.set_length_raw(0);
        assert_eq!(variable.length, Some(0));
    }
}
