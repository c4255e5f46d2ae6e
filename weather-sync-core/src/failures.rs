//! Concurrency-safe accumulator of cities that failed during a batch.

use parking_lot::Mutex;

/// Append-only list of failed city names, shared by all tasks of a batch.
///
/// Duplicates are kept; `drain` returns names in the order they were recorded.
#[derive(Debug, Default)]
pub struct FailureTracker {
    failed: Mutex<Vec<String>>,
}

impl FailureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, city: impl Into<String>) {
        self.failed.lock().push(city.into());
    }

    /// Take every recorded name, leaving the tracker empty.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.failed.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.failed.lock().is_empty()
    }
}
