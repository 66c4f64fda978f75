//! State transitions - FSM transition logic
//!
//! Implements the state machine that handles event-driven state transitions.

use super::events::SessionEvent;
use super::states::{SessionOutcome, SessionState};

/// Represents a state transition result.
#[derive(Debug, Clone)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: SessionState,
    /// The state after the transition.
    pub to: SessionState,
    /// The event that triggered the transition.
    pub event: SessionEvent,
    /// Whether the state actually changed.
    pub changed: bool,
}

/// State machine for one registration session.
#[derive(Debug, Clone)]
pub struct StateMachine {
    /// Current state.
    current_state: SessionState,
    /// Transition history (limited).
    history: Vec<StateTransition>,
    /// Max history entries to keep.
    max_history: usize,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// Create a new state machine in the AwaitingAddress state.
    pub fn new() -> Self {
        Self {
            current_state: SessionState::AwaitingAddress,
            history: Vec::new(),
            max_history: 16,
        }
    }

    /// Get the current state.
    pub fn state(&self) -> &SessionState {
        &self.current_state
    }

    /// Get the transition history.
    pub fn history(&self) -> &[StateTransition] {
        &self.history
    }

    /// Handle an event and transition to a new state.
    pub fn handle_event(&mut self, event: SessionEvent) -> StateTransition {
        let old_state = self.current_state;
        let new_state = compute_next_state(&old_state, &event);
        let changed = old_state != new_state;

        self.current_state = new_state;

        let transition = StateTransition {
            from: old_state,
            to: new_state,
            event,
            changed,
        };

        self.history.push(transition.clone());
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }

        transition
    }
}

/// Compute the next state given current state and event.
fn compute_next_state(state: &SessionState, event: &SessionEvent) -> SessionState {
    use SessionEvent::*;
    use SessionState::*;

    match (state, event) {
        // An entry command re-initializes the flow from any state,
        // discarding whatever came before.
        (_, EntryReceived) => AwaitingAddress,

        // ========== Awaiting the address ==========
        (AwaitingAddress, AddressRejected { .. }) => AwaitingAddress,
        (AwaitingAddress, AddressAccepted) => Terminated {
            outcome: SessionOutcome::Registered,
        },
        (AwaitingAddress, StoreFailed) => Terminated {
            outcome: SessionOutcome::StoreFailed,
        },
        (AwaitingAddress, CancelReceived) => Terminated {
            outcome: SessionOutcome::Cancelled,
        },

        // ========== Default: terminal states absorb everything ==========
        _ => *state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_core::ValidationError;

    #[test]
    fn test_invalid_address_keeps_session_awaiting() {
        let mut sm = StateMachine::new();

        let t = sm.handle_event(SessionEvent::AddressRejected {
            reason: ValidationError::BadPrefix,
        });
        assert!(!t.changed);
        assert_eq!(sm.state(), &SessionState::AwaitingAddress);
    }

    #[test]
    fn test_accepted_address_terminates_registered() {
        let mut sm = StateMachine::new();

        let t = sm.handle_event(SessionEvent::AddressAccepted);
        assert!(t.changed);
        assert_eq!(
            sm.state(),
            &SessionState::Terminated {
                outcome: SessionOutcome::Registered
            }
        );
    }

    #[test]
    fn test_store_failure_still_terminates() {
        let mut sm = StateMachine::new();

        sm.handle_event(SessionEvent::StoreFailed);
        assert_eq!(
            sm.state(),
            &SessionState::Terminated {
                outcome: SessionOutcome::StoreFailed
            }
        );
    }

    #[test]
    fn test_cancel_terminates_without_registration() {
        let mut sm = StateMachine::new();

        sm.handle_event(SessionEvent::CancelReceived);
        assert_eq!(
            sm.state(),
            &SessionState::Terminated {
                outcome: SessionOutcome::Cancelled
            }
        );
    }

    #[test]
    fn test_terminal_state_absorbs_messages() {
        let mut sm = StateMachine::new();
        sm.handle_event(SessionEvent::AddressAccepted);

        let t = sm.handle_event(SessionEvent::AddressRejected {
            reason: ValidationError::Empty,
        });
        assert!(!t.changed);
        assert!(sm.state().is_terminal());
    }

    #[test]
    fn test_entry_reinitializes_after_terminal() {
        let mut sm = StateMachine::new();
        sm.handle_event(SessionEvent::CancelReceived);
        assert!(sm.state().is_terminal());

        let t = sm.handle_event(SessionEvent::EntryReceived);
        assert!(t.changed);
        assert_eq!(sm.state(), &SessionState::AwaitingAddress);
    }

    #[test]
    fn test_history_tracking() {
        let mut sm = StateMachine::new();
        sm.handle_event(SessionEvent::AddressRejected {
            reason: ValidationError::NonHex,
        });
        sm.handle_event(SessionEvent::AddressAccepted);

        assert_eq!(sm.history().len(), 2);
        assert!(sm.history()[1].changed);
    }
}
