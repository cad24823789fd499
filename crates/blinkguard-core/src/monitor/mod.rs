//! Monitor module: the driver loop and the seams around the tracker.
//!
//! This module contains:
//! - `source`: Frame source trait and read errors
//! - `classifier`: Eye-state classifier trait
//! - `sink`: Alert sink trait and acknowledgements
//! - `gate`: One-shot debounce for the first Danger status
//! - `driver`: `BlinkMonitor` loop tying them together
//! - `replay`: Frame source over recorded observations

pub mod classifier;
pub mod driver;
pub mod gate;
pub mod replay;
pub mod sink;
pub mod source;

pub use classifier::{EyeClassifier, PassThrough};
pub use driver::{BlinkMonitor, MonitorError, RunSummary, StopReason};
pub use gate::{AlertGate, GateState};
pub use replay::ReplaySource;
pub use sink::{Acknowledgement, Alert, AlertSink};
pub use source::{FrameSource, SourceError, Timestamped};
