//! One live registration session: the FSM plus per-conversation context.

use std::time::Duration;

use tokio::time::Instant;

use wallet_core::Identity;
use wallet_state::{SessionEvent, SessionState, StateMachine, StateTransition};

/// In-memory state for one user's active conversation.
///
/// Created when the entry command arrives, dropped when the machine reaches
/// a terminal state or the router evicts it as stale. Never persisted.
#[derive(Debug)]
pub struct Session {
    identity: Identity,
    display_name: String,
    machine: StateMachine,
    last_activity: Instant,
}

impl Session {
    pub fn new(identity: Identity, display_name: String) -> Self {
        Self {
            identity,
            display_name,
            machine: StateMachine::new(),
            last_activity: Instant::now(),
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Re-initialize for a fresh entry command, discarding any prior
    /// in-flight state and picking up the latest display name.
    pub fn restart(&mut self, display_name: String) {
        self.display_name = display_name;
        self.apply(SessionEvent::EntryReceived);
    }

    /// Feed one event through the machine, refreshing the activity stamp.
    pub fn apply(&mut self, event: SessionEvent) -> StateTransition {
        self.last_activity = Instant::now();
        self.machine.handle_event(event)
    }

    pub fn state(&self) -> &SessionState {
        self.machine.state()
    }

    pub fn is_terminal(&self) -> bool {
        self.machine.state().is_terminal()
    }

    pub fn idle_for(&self) -> Duration {
        self.last_activity.elapsed()
    }
}
