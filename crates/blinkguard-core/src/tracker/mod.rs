//! Sliding-window blink-rate tracking.
//!
//! This module contains:
//! - `observation`: Eye state and timestamped samples
//! - `log`: Time-bounded observation log with eviction policies
//! - `estimator`: Blink counting and blinks-per-minute computation
//! - `status`: Rate to status classification
//! - `shared`: Mutex-protected tracker for capture-thread designs

pub mod estimator;
pub mod log;
pub mod observation;
pub mod shared;
pub mod status;

use serde::Serialize;

pub use self::log::{BlinkEventLog, EvictionPolicy};
pub use self::observation::{EyeState, Observation};
pub use self::status::Status;

/// Point-in-time view of the tracker, computed in one pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub blinks_per_minute: Option<u32>,
    pub status: Status,
    pub observations: usize,
    pub span_seconds: Option<f64>,
    pub blinks: usize,
}

/// Observation log plus the rate estimate and status derived from it.
#[derive(Debug, Clone)]
pub struct StatusTracker {
    log: BlinkEventLog,
    safe_boundary: u32,
}

impl StatusTracker {
    pub const DEFAULT_SAFE_BOUNDARY: u32 = 15;

    pub fn new(keep_seconds: f64, safe_boundary: u32) -> Self {
        Self::with_policy(keep_seconds, safe_boundary, EvictionPolicy::default())
    }

    pub fn with_policy(keep_seconds: f64, safe_boundary: u32, policy: EvictionPolicy) -> Self {
        Self {
            log: BlinkEventLog::with_policy(keep_seconds, policy),
            safe_boundary,
        }
    }

    pub fn add(&mut self, observation: Observation) -> usize {
        self.log.add(observation)
    }

    pub fn reset(&mut self) {
        self.log.reset();
    }

    pub fn blinks_per_minute(&self) -> Option<u32> {
        estimator::blinks_per_minute(&self.log)
    }

    pub fn status(&self) -> Status {
        status::classify(self.blinks_per_minute(), self.safe_boundary)
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        let blinks_per_minute = self.blinks_per_minute();
        TrackerSnapshot {
            blinks_per_minute,
            status: status::classify(blinks_per_minute, self.safe_boundary),
            observations: self.log.len(),
            span_seconds: self.log.span(),
            blinks: estimator::count_blinks(&self.log),
        }
    }

    pub fn safe_boundary(&self) -> u32 {
        self.safe_boundary
    }

    pub fn log(&self) -> &BlinkEventLog {
        &self.log
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new(BlinkEventLog::DEFAULT_KEEP_SECONDS, Self::DEFAULT_SAFE_BOUNDARY)
    }
}

/// Renders an optional rate the way the status line shows it (`-1` = unknown).
pub fn display_rate(blinks_per_minute: Option<u32>) -> String {
    blinks_per_minute.map_or_else(|| "-1".to_string(), |rate| rate.to_string())
}
