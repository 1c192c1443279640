use crate::types::Timestamp;
use std::{
    cell::Cell,
    time::{SystemTime, UNIX_EPOCH},
};

///
/// Clock
///
/// Source of wall-clock time for lifecycle stamps. Injected through the
/// database handle so hosts and tests control what "now" means.
///

pub trait Clock {
    fn now(&self) -> Timestamp;
}

///
/// SystemClock
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(Timestamp::EPOCH, |d| Timestamp::from_seconds(d.as_secs()))
    }
}

///
/// ManualClock
///
/// A clock that only moves when told to. Hosts that replay recorded
/// sessions use it, as do tests that assert on exact stamps.
///

#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    #[must_use]
    pub const fn starting_at(secs: u64) -> Self {
        Self {
            now: Cell::new(secs),
        }
    }

    pub fn set(&self, secs: u64) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get().saturating_add(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_seconds(self.now.get())
    }
}

///
/// TESTS
///
