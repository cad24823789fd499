//! Replays recorded eye-state observations as a frame source.
//!
//! One observation per line, either `<timestamp> <state>` (whitespace or
//! comma separated) or a JSON object `{"timestamp": 1.5, "state": "open"}`.
//! Blank lines and `#` comments are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::warn;

use super::source::{FrameSource, SourceError, Timestamped};
use crate::tracker::{EyeState, Observation};

pub struct ReplaySource<R> {
    reader: R,
    line: usize,
    buf: String,
    last_timestamp: Option<f64>,
    pacing: Option<Pacing>,
}

/// Anchors recorded timestamps to the wall clock.
struct Pacing {
    started: Instant,
    first_timestamp: Option<f64>,
}

impl ReplaySource<Box<dyn BufRead>> {
    /// Opens a file, or stdin when `input` is `-`.
    pub fn open(input: &str) -> Result<Self> {
        let reader: Box<dyn BufRead> = if input == "-" {
            Box::new(BufReader::new(io::stdin()))
        } else {
            let path = Path::new(input);
            let file = File::open(path)
                .with_context(|| format!("open observations from {}", path.display()))?;
            Box::new(BufReader::new(file))
        };
        Ok(Self::new(reader))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
            last_timestamp: None,
            pacing: None,
        }
    }

    /// Sleeps between frames so they arrive at their recorded spacing.
    #[must_use]
    pub fn paced(mut self, pace: bool) -> Self {
        self.pacing = pace.then(|| Pacing {
            started: Instant::now(),
            first_timestamp: None,
        });
        self
    }

    fn next_observation(&mut self) -> Result<Option<Observation>, SourceError> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let trimmed = self.buf.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return parse_record(trimmed)
                .map(Some)
                .map_err(|message| SourceError::Parse {
                    line: self.line,
                    message,
                });
        }
    }

    fn wait_until(&mut self, timestamp: f64) {
        let Some(pacing) = self.pacing.as_mut() else {
            return;
        };
        let first = *pacing.first_timestamp.get_or_insert(timestamp);
        let offset = timestamp - first;
        if !offset.is_finite() || offset <= 0.0 {
            return;
        }
        let due = pacing.started + Duration::from_secs_f64(offset);
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
    }
}

impl<R: BufRead> FrameSource for ReplaySource<R> {
    type Frame = EyeState;

    fn read(&mut self) -> Result<Option<Timestamped<EyeState>>, SourceError> {
        let Some(obs) = self.next_observation()? else {
            return Ok(None);
        };

        if let Some(last) = self.last_timestamp
            && obs.timestamp < last
        {
            warn!(
                line = self.line,
                timestamp = obs.timestamp,
                previous = last,
                "timestamp went backwards"
            );
        }
        self.last_timestamp = Some(obs.timestamp);

        self.wait_until(obs.timestamp);
        Ok(Some(Timestamped::new(obs.timestamp, obs.state)))
    }
}

/// Parses one non-empty record.
pub fn parse_record(record: &str) -> Result<Observation, String> {
    if record.starts_with('{') {
        return serde_json::from_str::<Observation>(record).map_err(|e| e.to_string());
    }

    let mut fields = record
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty());
    let (Some(ts), Some(state), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(format!("expected '<timestamp> <state>', got '{record}'"));
    };

    let timestamp: f64 = ts
        .parse()
        .map_err(|e| format!("invalid timestamp '{ts}': {e}"))?;
    if !timestamp.is_finite() {
        return Err(format!("invalid timestamp '{ts}'"));
    }
    let state = state
        .parse::<EyeState>()
        .map_err(|e| e.to_string())?;
    Ok(Observation::new(timestamp, state))
}
