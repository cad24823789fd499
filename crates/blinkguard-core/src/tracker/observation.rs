use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Eye state reported by the classifier for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeState {
    Open,
    Closed,
}

impl EyeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for EyeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an eye-state token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown eye state '{0}' (expected open, closed, 1 or 0)")]
pub struct ParseEyeStateError(pub String);

impl FromStr for EyeState {
    type Err = ParseEyeStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" | "1" => Ok(Self::Open),
            "closed" | "close" | "0" => Ok(Self::Closed),
            other => Err(ParseEyeStateError(other.to_string())),
        }
    }
}

/// A timestamped eye-state sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Seconds on a monotonic-ish clock.
    pub timestamp: f64,
    pub state: EyeState,
}

impl Observation {
    pub fn new(timestamp: f64, state: EyeState) -> Self {
        Self { timestamp, state }
    }

    pub fn open(timestamp: f64) -> Self {
        Self::new(timestamp, EyeState::Open)
    }

    pub fn closed(timestamp: f64) -> Self {
        Self::new(timestamp, EyeState::Closed)
    }

    /// Seconds elapsed from `earlier` to `self`.
    pub fn seconds_since(&self, earlier: &Observation) -> f64 {
        self.timestamp - earlier.timestamp
    }
}
