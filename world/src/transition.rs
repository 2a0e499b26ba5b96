//! Curtain gate that defers phase swaps to animation milestones.
//!
//! The gate never measures time itself. A close or open request triggers an
//! animation and the gate waits for the matching finished notification before
//! raising its signal. Each request raises its signal at most once; repeated
//! notifications are ignored because the gate has already moved on.

use lineup_core::Animation;

/// Lifecycle of the curtain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GateState {
    /// Curtain open and no transition in flight.
    #[default]
    Idle,
    /// Waiting for the curtain-close animation to finish.
    Closing,
    /// Curtain shut; the next phase is being prepared behind it.
    Closed,
    /// Waiting for the curtain-open animation to finish.
    Opening,
}

/// Milestones raised by the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GateSignal {
    /// The curtain finished closing.
    Closed,
    /// The curtain finished opening.
    Opened,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct TransitionGate {
    state: GateState,
}

impl TransitionGate {
    pub(crate) fn state(&self) -> GateState {
        self.state
    }

    /// Starts closing the curtain. Only accepted while idle.
    pub(crate) fn request_close(&mut self) -> bool {
        if self.state != GateState::Idle {
            return false;
        }
        self.state = GateState::Closing;
        true
    }

    /// Starts opening the curtain. Only accepted once fully closed.
    pub(crate) fn request_open(&mut self) -> bool {
        if self.state != GateState::Closed {
            return false;
        }
        self.state = GateState::Opening;
        true
    }

    pub(crate) fn notify(&mut self, animation: Animation) -> Option<GateSignal> {
        match (self.state, animation) {
            (GateState::Closing, Animation::CurtainClose) => {
                self.state = GateState::Closed;
                Some(GateSignal::Closed)
            }
            (GateState::Opening, Animation::CurtainOpen) => {
                self.state = GateState::Idle;
                Some(GateSignal::Opened)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_signal_fires_once_per_request() {
        let mut gate = TransitionGate::default();
        assert!(gate.request_close());
        assert_eq!(gate.notify(Animation::CurtainClose), Some(GateSignal::Closed));
        assert_eq!(gate.notify(Animation::CurtainClose), None);
        assert_eq!(gate.state(), GateState::Closed);
    }

    #[test]
    fn open_signal_fires_once_per_request() {
        let mut gate = TransitionGate::default();
        assert!(gate.request_close());
        let _ = gate.notify(Animation::CurtainClose);
        assert!(gate.request_open());
        assert_eq!(gate.notify(Animation::CurtainOpen), Some(GateSignal::Opened));
        assert_eq!(gate.notify(Animation::CurtainOpen), None);
        assert_eq!(gate.state(), GateState::Idle);
    }

    #[test]
    fn unrelated_notifications_are_ignored() {
        let mut gate = TransitionGate::default();
        assert_eq!(gate.notify(Animation::CurtainClose), None);
        assert!(gate.request_close());
        assert_eq!(gate.notify(Animation::CurtainOpen), None);
        assert_eq!(gate.notify(Animation::Crush), None);
        assert_eq!(gate.state(), GateState::Closing);
    }

    #[test]
    fn requests_out_of_order_are_rejected() {
        let mut gate = TransitionGate::default();
        assert!(!gate.request_open());
        assert!(gate.request_close());
        assert!(!gate.request_close());
        assert!(!gate.request_open());
    }
}
