//! Frame-to-alert control loop.

use tracing::{debug, info, warn};

use super::classifier::EyeClassifier;
use super::gate::{AlertGate, GateDecision};
use super::sink::{Acknowledgement, Alert, AlertSink};
use super::source::{FrameSource, SourceError, Timestamped};
use crate::interrupt;
use crate::tracker::{Observation, Status, StatusTracker, TrackerSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("can not read frame after {attempts} attempt(s)")]
    FrameRead {
        attempts: u64,
        #[source]
        source: SourceError,
    },
    #[error("frame source exhausted")]
    SourceExhausted,
}

/// Why [`BlinkMonitor::run`] returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The user chose to exit from an alert.
    Exit,
    Interrupted,
    SourceExhausted,
    /// Reading a frame failed, retries included.
    FrameRead(String),
    /// The alert sink returned an error.
    SinkFailed(String),
}

impl StopReason {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FrameRead(_) | Self::SinkFailed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub alerts: u64,
    pub suppressed: u64,
    pub stop: StopReason,
}

/// Pulls frames, classifies them, and feeds the tracker.
pub struct BlinkMonitor<S, C> {
    source: S,
    classifier: C,
    tracker: StatusTracker,
    gate: AlertGate,
    max_read_retries: u32,
    frames: u64,
}

impl<S, C> BlinkMonitor<S, C>
where
    S: FrameSource,
    C: EyeClassifier<S::Frame>,
{
    pub fn new(source: S, classifier: C, tracker: StatusTracker) -> Self {
        Self {
            source,
            classifier,
            tracker,
            gate: AlertGate::new(),
            max_read_retries: 0,
            frames: 0,
        }
    }

    /// Retry failed reads this many times before giving up (default 0).
    ///
    /// Only transient errors are retried; parse errors are fatal.
    #[must_use]
    pub fn with_read_retries(mut self, max_read_retries: u32) -> Self {
        self.max_read_retries = max_read_retries;
        self
    }

    /// Reads, classifies and records one frame.
    pub fn proc(&mut self) -> Result<Observation, MonitorError> {
        let frame = self.read_frame()?;
        let state = self.classifier.classify(&frame.frame);
        let observation = Observation::new(frame.timestamp, state);
        self.tracker.add(observation);
        self.frames += 1;
        Ok(observation)
    }

    fn read_frame(&mut self) -> Result<Timestamped<S::Frame>, MonitorError> {
        let mut attempts: u64 = 0;
        loop {
            attempts += 1;
            match self.source.read() {
                Ok(Some(frame)) => return Ok(frame),
                Ok(None) => return Err(MonitorError::SourceExhausted),
                Err(source)
                    if !source.is_transient() || attempts > u64::from(self.max_read_retries) =>
                {
                    return Err(MonitorError::FrameRead { attempts, source });
                }
                Err(err) => {
                    warn!(attempt = attempts, error = %err, "frame read failed, retrying");
                }
            }
        }
    }

    pub fn status(&self) -> Status {
        self.tracker.status()
    }

    pub fn blinks_per_minute(&self) -> Option<u32> {
        self.tracker.blinks_per_minute()
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        self.tracker.snapshot()
    }

    /// Clears history and re-arms the alert gate.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.gate.rearm();
        info!("blink history reset");
    }

    pub fn tracker(&self) -> &StatusTracker {
        &self.tracker
    }

    /// Runs until exit, interrupt, or a fatal read.
    ///
    /// `on_tick` sees the snapshot after every recorded frame.
    pub fn run<K, T>(&mut self, sink: &mut K, mut on_tick: T) -> RunSummary
    where
        K: AlertSink + ?Sized,
        T: FnMut(&TrackerSnapshot),
    {
        let mut alerts = 0;
        let mut suppressed = 0;

        let stop = loop {
            if interrupt::is_interrupted() {
                break StopReason::Interrupted;
            }

            match self.proc() {
                Ok(_) => {}
                Err(MonitorError::SourceExhausted) => break StopReason::SourceExhausted,
                Err(err @ MonitorError::FrameRead { .. }) => {
                    warn!(error = %err, "stopping monitor");
                    break StopReason::FrameRead(format!("{:#}", anyhow::Error::new(err)));
                }
            }

            let snapshot = self.tracker.snapshot();
            on_tick(&snapshot);

            match self.gate.observe(snapshot.status) {
                GateDecision::Ignore => {}
                GateDecision::Suppress => suppressed += 1,
                GateDecision::Fire => {
                    let alert = self.alert_from(&snapshot);
                    alerts += 1;
                    info!(
                        blinks_per_minute = alert.blinks_per_minute,
                        safe_boundary = alert.safe_boundary,
                        "low blink rate alert"
                    );
                    let ack = sink.alert(&alert);
                    self.reset();
                    match ack {
                        Ok(Acknowledgement::Dismissed) => debug!("alert dismissed"),
                        Ok(Acknowledgement::Exit) => break StopReason::Exit,
                        Err(err) => {
                            warn!(error = %err, "alert sink failed");
                            break StopReason::SinkFailed(format!("{err:#}"));
                        }
                    }
                }
            }
        };

        RunSummary {
            frames: self.frames,
            alerts,
            suppressed,
            stop,
        }
    }

    /// A Danger snapshot always carries a rate and a span.
    fn alert_from(&self, snapshot: &TrackerSnapshot) -> Alert {
        Alert {
            blinks_per_minute: snapshot.blinks_per_minute.unwrap_or_default(),
            safe_boundary: self.tracker.safe_boundary(),
            observations: snapshot.observations,
            span_seconds: snapshot.span_seconds.unwrap_or_default(),
        }
    }
}
