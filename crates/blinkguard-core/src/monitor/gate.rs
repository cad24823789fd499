//! One-shot debounce in front of the alert sink.

use tracing::debug;

use crate::tracker::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// The next Danger is swallowed.
    #[default]
    Armed,
    /// A Danger was already swallowed; the next one fires.
    Suppressed,
}

/// What the driver should do with the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Ignore,
    Suppress,
    Fire,
}

/// Swallows the first Danger after start or reset.
///
/// Returning to Safe does not re-arm the gate; only [`AlertGate::rearm`] does.
#[derive(Debug, Clone, Default)]
pub struct AlertGate {
    state: GateState,
}

impl AlertGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, status: Status) -> GateDecision {
        if status != Status::Danger {
            return GateDecision::Ignore;
        }
        match self.state {
            GateState::Armed => {
                debug!("first danger status suppressed");
                self.state = GateState::Suppressed;
                GateDecision::Suppress
            }
            GateState::Suppressed => GateDecision::Fire,
        }
    }

    pub fn rearm(&mut self) {
        self.state = GateState::Armed;
    }

    pub fn state(&self) -> GateState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_danger_is_swallowed() {
        let mut gate = AlertGate::new();
        assert_eq!(gate.observe(Status::Unknown), GateDecision::Ignore);
        assert_eq!(gate.observe(Status::Danger), GateDecision::Suppress);
        assert_eq!(gate.state(), GateState::Suppressed);
        assert_eq!(gate.observe(Status::Danger), GateDecision::Fire);
    }

    #[test]
    fn safe_does_not_rearm() {
        let mut gate = AlertGate::new();
        gate.observe(Status::Danger);
        assert_eq!(gate.observe(Status::Safe), GateDecision::Ignore);
        assert_eq!(gate.observe(Status::Danger), GateDecision::Fire);
    }

    #[test]
    fn rearm_restores_suppression() {
        let mut gate = AlertGate::new();
        gate.observe(Status::Danger);
        gate.rearm();
        assert_eq!(gate.state(), GateState::Armed);
        assert_eq!(gate.observe(Status::Danger), GateDecision::Suppress);
    }
}
