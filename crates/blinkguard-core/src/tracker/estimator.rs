//! Blinks-per-minute estimation over the retained log.

use std::collections::HashSet;

use super::log::BlinkEventLog;
use super::observation::EyeState;

/// Fewer observations than this and the rate is reported as unknown.
pub const MIN_OBSERVATIONS: usize = 100;

/// Rounds half up (`floor(x + 0.5)`), never to even.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// The whole-second bucket of a timestamp: add a half, then truncate
/// toward zero. Equals [`round_half_up`] for non-negative timestamps.
pub fn second_bucket(timestamp: f64) -> i64 {
    (timestamp + 0.5).trunc() as i64
}

/// Counts open-to-closed transitions, at most one per second bucket.
///
/// The bucket is that of the open observation.
pub fn count_blinks(log: &BlinkEventLog) -> usize {
    let observations: Vec<_> = log.iter().collect();
    observations
        .windows(2)
        .filter(|pair| pair[0].state == EyeState::Open && pair[1].state == EyeState::Closed)
        .map(|pair| second_bucket(pair[0].timestamp))
        .collect::<HashSet<_>>()
        .len()
}

/// Blinks per minute, or `None` during cold start or for a degenerate span.
pub fn blinks_per_minute(log: &BlinkEventLog) -> Option<u32> {
    if log.len() < MIN_OBSERVATIONS {
        return None;
    }
    let span = log.span()?;
    rate_from(count_blinks(log), span)
}

/// Applies the rate formula to a blink count and span in seconds.
pub fn rate_from(blinks: usize, span: f64) -> Option<u32> {
    if !span.is_finite() || span <= 0.0 {
        return None;
    }
    Some(round_half_up(blinks as f64 * 60.0 / span) as u32)
}
