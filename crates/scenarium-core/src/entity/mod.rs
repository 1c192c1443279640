mod file;
mod request;
mod scenario;
mod variable;

pub use file::FileEntry;
pub use request::{RequestCommand, RequestStatus, RuntimeRequest, TransitionError};
pub use scenario::Scenario;
pub use variable::Variable;
