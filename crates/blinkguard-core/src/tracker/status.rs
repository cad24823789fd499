use std::fmt;

use serde::{Deserialize, Serialize};

/// Eye-strain status derived from the blink rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Not enough samples (or no usable span) to estimate a rate.
    Unknown,
    Safe,
    Danger,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Safe => "safe",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a rate against the safe boundary. The boundary itself is safe.
pub fn classify(blinks_per_minute: Option<u32>, safe_boundary: u32) -> Status {
    match blinks_per_minute {
        None => Status::Unknown,
        Some(rate) if rate >= safe_boundary => Status::Safe,
        Some(_) => Status::Danger,
    }
}
