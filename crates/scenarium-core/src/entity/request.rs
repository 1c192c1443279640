use crate::{
    entity::Scenario,
    traits::{ChildOf, EntityIdentity, EntityKind, EntityTag, Lifecycle, Path},
    types::{Id, Timestamp},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error as ThisError;

///
/// RequestStatus
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum RequestStatus {
    #[default]
    Created,
    Running,
    Paused,
    Stopped,
}

impl RequestStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        }
    }

    /// Applies a command, returning the next status.
    pub const fn apply(self, command: RequestCommand) -> Result<Self, TransitionError> {
        match (self, command) {
            (Self::Created, RequestCommand::Run) => Ok(Self::Running),
            (Self::Running, RequestCommand::Pause) => Ok(Self::Paused),
            (Self::Paused, RequestCommand::Resume) => Ok(Self::Running),
            (Self::Running | Self::Paused, RequestCommand::Stop) => Ok(Self::Stopped),
            (from, command) => Err(TransitionError { from, command }),
        }
    }

    /// Whether `command` is valid from this status.
    #[must_use]
    pub const fn accepts(self, command: RequestCommand) -> bool {
        self.apply(command).is_ok()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// RequestCommand
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequestCommand {
    Run,
    Pause,
    Resume,
    Stop,
}

impl RequestCommand {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for RequestCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

///
/// TransitionError
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, ThisError)]
#[error("invalid request transition: {command} from {from}")]
pub struct TransitionError {
    pub from: RequestStatus,
    pub command: RequestCommand,
}

///
/// RuntimeRequest
///
/// One ask to execute a scenario on the runtime. The status machine is
/// deliberately small; the runtime's own execution states stay on the
/// runtime side.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RuntimeRequest {
    pub id: Id<RuntimeRequest>,
    pub scenario_id: Id<Scenario>,
    pub status: RequestStatus,

    /// Written once, by the first save.
    pub requested_at: Option<Timestamp>,

    /// Written when the request reaches `Stopped`.
    pub finished_at: Option<Timestamp>,
}

impl RuntimeRequest {
    #[must_use]
    pub fn new(scenario_id: Id<Scenario>) -> Self {
        Self {
            id: Id::generate(),
            scenario_id,
            status: RequestStatus::Created,
            requested_at: None,
            finished_at: None,
        }
    }
}

impl Path for RuntimeRequest {
    const PATH: &'static str = "entity::RuntimeRequest";
}

impl EntityIdentity for RuntimeRequest {
    const TAG: EntityTag = EntityTag::RuntimeRequest;
    const ENTITY_NAME: &'static str = "runtime_request";
}

impl EntityKind for RuntimeRequest {
    fn id(&self) -> Id<Self> {
        self.id
    }
}

impl ChildOf for RuntimeRequest {
    type Parent = Scenario;

    fn parent_id(&self) -> Id<Scenario> {
        self.scenario_id
    }
}

impl Lifecycle for RuntimeRequest {
    fn touch(&mut self, now: Timestamp) {
        if self.requested_at.is_none() {
            self.requested_at = Some(now);
        }
    }
}

///
/// TESTS
///
