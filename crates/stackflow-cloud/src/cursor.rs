//! Read position of a single watch operation

use chrono::{DateTime, Utc};

/// Highest event timestamp already delivered
///
/// Never moves backwards. Lives only as long as one `poll`/`tail` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<T> {
    position: T,
}

impl<T: Ord + Copy> Cursor<T> {
    pub fn starting_at(position: T) -> Self {
        Self { position }
    }

    pub fn position(&self) -> T {
        self.position
    }

    /// Whether an event at `timestamp` is newer than anything delivered so far
    pub fn admits(&self, timestamp: T) -> bool {
        timestamp > self.position
    }

    pub fn advance(&mut self, timestamp: T) {
        if timestamp > self.position {
            self.position = timestamp;
        }
    }
}

impl Cursor<DateTime<Utc>> {
    /// Cursor that admits every lifecycle event
    pub fn from_epoch() -> Self {
        Self::starting_at(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Cursor<i64> {
    /// Inclusive start bound for the next log query. The remote bound is
    /// inclusive, so the next millisecond excludes records already delivered.
    pub fn next_start_time(&self) -> i64 {
        self.position.saturating_add(1)
    }
}
