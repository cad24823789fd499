use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Low-blink-rate warning handed to an [`AlertSink`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub blinks_per_minute: u32,
    pub safe_boundary: u32,
    pub observations: usize,
    pub span_seconds: f64,
}

/// How the user answered an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acknowledgement {
    /// Keep monitoring with fresh history.
    Dismissed,
    /// Stop monitoring.
    Exit,
}

impl Acknowledgement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dismissed => "dismissed",
            Self::Exit => "exit",
        }
    }
}

/// Presents alerts and blocks until they are acknowledged.
pub trait AlertSink {
    fn alert(&mut self, alert: &Alert) -> Result<Acknowledgement>;
}

impl<S: AlertSink + ?Sized> AlertSink for Box<S> {
    fn alert(&mut self, alert: &Alert) -> Result<Acknowledgement> {
        (**self).alert(alert)
    }
}
