//! Tracker shared between a capture thread and a query thread.

use std::sync::{Arc, Mutex, MutexGuard};

use super::{Observation, Status, StatusTracker, TrackerSnapshot};

/// Cloneable handle to a mutex-protected [`StatusTracker`].
///
/// Readers get owned snapshots computed under the lock, never a live view
/// of the log.
#[derive(Debug, Clone)]
pub struct SharedTracker {
    inner: Arc<Mutex<StatusTracker>>,
}

impl SharedTracker {
    pub fn new(tracker: StatusTracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StatusTracker> {
        // A panic mid-add loses at most one sample.
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub fn add(&self, observation: Observation) -> usize {
        self.lock().add(observation)
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn status(&self) -> Status {
        self.lock().status()
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        self.lock().snapshot()
    }
}
