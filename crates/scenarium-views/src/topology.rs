use scenarium_core::types::Ulid;
use std::collections::HashMap;

///
/// HostRecord
///
/// One host on a topology canvas. The `kind` code is opaque at this layer;
/// callers classify hosts through a predicate, so no type code is
/// hard-wired here.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HostRecord {
    pub id: Ulid,
    pub name: String,
    pub kind: String,
}

impl HostRecord {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: Ulid::generate(),
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// Classifies hosts for counting. The meaning of the classification belongs
/// to whoever supplies the predicate.
pub type HostPredicate = Box<dyn Fn(&HostRecord) -> bool>;

///
/// TopologyDirectory
///
/// Read access to the hosts of named topology canvases. Scenarios refer to
/// a canvas by name only; everything about the canvas itself lives behind
/// this seam.
///

pub trait TopologyDirectory {
    /// Hosts of the named canvas; an unknown name is an empty canvas.
    fn hosts(&self, topology: &str) -> Vec<HostRecord>;
}

///
/// StaticTopology
///
/// In-memory directory filled up front.
///

#[derive(Debug, Default)]
pub struct StaticTopology {
    canvases: HashMap<String, Vec<HostRecord>>,
}

impl StaticTopology {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_host(&mut self, topology: impl Into<String>, host: HostRecord) {
        self.canvases.entry(topology.into()).or_default().push(host);
    }
}

impl TopologyDirectory for StaticTopology {
    fn hosts(&self, topology: &str) -> Vec<HostRecord> {
        self.canvases.get(topology).cloned().unwrap_or_default()
    }
}

///
/// TESTS
///
