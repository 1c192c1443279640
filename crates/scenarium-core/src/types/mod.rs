mod clock;
mod id;
mod timestamp;
mod ulid;

pub use clock::{Clock, ManualClock, SystemClock};
pub use id::Id;
pub use timestamp::Timestamp;
pub use ulid::{Ulid, UlidError};
