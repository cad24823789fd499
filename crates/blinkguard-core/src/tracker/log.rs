//! Time-bounded observation log.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::observation::Observation;

/// How stale observations are dropped after an insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Drop at most the single oldest observation per insertion.
    ///
    /// A burst of insertions can leave the log spanning more than the
    /// retention window for a few steps.
    #[default]
    OnePerInsert,
    /// Drop oldest observations until the span fits the window again.
    DrainStale,
}

impl EvictionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnePerInsert => "one_per_insert",
            Self::DrainStale => "drain_stale",
        }
    }
}

/// Append-only sequence of observations, trimmed by age on insertion.
#[derive(Debug, Clone)]
pub struct BlinkEventLog {
    history: VecDeque<Observation>,
    keep_seconds: f64,
    policy: EvictionPolicy,
}

impl BlinkEventLog {
    pub const DEFAULT_KEEP_SECONDS: f64 = 60.0;

    pub fn new(keep_seconds: f64) -> Self {
        Self::with_policy(keep_seconds, EvictionPolicy::default())
    }

    pub fn with_policy(keep_seconds: f64, policy: EvictionPolicy) -> Self {
        Self {
            history: VecDeque::new(),
            keep_seconds,
            policy,
        }
    }

    /// Appends an observation and evicts stale ones per the policy.
    ///
    /// Returns the number of observations evicted.
    pub fn add(&mut self, observation: Observation) -> usize {
        self.history.push_back(observation);

        let mut evicted = 0;
        while self.history.len() > 1 && self.is_stale() {
            self.history.pop_front();
            evicted += 1;
            if self.policy == EvictionPolicy::OnePerInsert {
                break;
            }
        }

        if evicted > 0 {
            debug!(
                evicted,
                retained = self.history.len(),
                "evicted stale observations"
            );
        }
        evicted
    }

    fn is_stale(&self) -> bool {
        self.span().is_some_and(|span| span > self.keep_seconds)
    }

    /// Seconds between the oldest and newest retained observation.
    ///
    /// `None` until at least two observations are held.
    pub fn span(&self) -> Option<f64> {
        if self.history.len() < 2 {
            return None;
        }
        let oldest = self.history.front()?;
        let newest = self.history.back()?;
        Some(newest.seconds_since(oldest))
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.history.iter()
    }

    pub fn keep_seconds(&self) -> f64 {
        self.keep_seconds
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }
}

impl Default for BlinkEventLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_KEEP_SECONDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timestamps(log: &BlinkEventLog) -> Vec<f64> {
        log.iter().map(|o| o.timestamp).collect()
    }

    #[test]
    fn span_requires_two_observations() {
        let mut log = BlinkEventLog::new(60.0);
        assert_eq!(log.span(), None);
        log.add(Observation::open(5.0));
        assert_eq!(log.span(), None);
        log.add(Observation::open(7.5));
        assert_eq!(log.span(), Some(2.5));
    }

    #[test]
    fn evicts_one_per_insert_once_window_exceeded() {
        let mut log = BlinkEventLog::new(10.0);
        for t in 0..=10 {
            assert_eq!(log.add(Observation::open(f64::from(t))), 0);
        }
        assert_eq!(log.len(), 11);

        // Every later insertion pushes the span to 11s and drops exactly one.
        for t in 11..40 {
            assert_eq!(log.add(Observation::open(f64::from(t))), 1);
            assert_eq!(log.len(), 11);
            assert_eq!(log.span(), Some(10.0));
        }
    }

    #[test]
    fn span_equal_to_window_is_kept() {
        let mut log = BlinkEventLog::new(2.0);
        log.add(Observation::open(0.0));
        log.add(Observation::open(1.0));
        log.add(Observation::open(2.0));
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn one_per_insert_leaves_burst_over_window() {
        let mut log = BlinkEventLog::new(10.0);
        for t in [0.0, 1.0, 2.0] {
            log.add(Observation::open(t));
        }
        assert_eq!(log.add(Observation::open(100.0)), 1);
        assert_eq!(timestamps(&log), vec![1.0, 2.0, 100.0]);
        assert_eq!(log.span(), Some(99.0));
    }

    #[test]
    fn drain_stale_trims_to_window() {
        let mut log = BlinkEventLog::with_policy(10.0, EvictionPolicy::DrainStale);
        for t in [0.0, 1.0, 2.0, 95.0] {
            log.add(Observation::open(t));
        }
        assert_eq!(timestamps(&log), vec![95.0]);

        log.add(Observation::open(100.0));
        assert_eq!(log.add(Observation::open(106.0)), 1);
        assert_eq!(timestamps(&log), vec![100.0, 106.0]);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut log = BlinkEventLog::default();
        log.reset();
        assert!(log.is_empty());

        log.add(Observation::open(1.0));
        log.add(Observation::closed(1.2));
        log.reset();
        log.reset();
        assert!(log.is_empty());
        assert_eq!(log.span(), None);
        assert!((log.keep_seconds() - 60.0).abs() < f64::EPSILON);
    }
}
