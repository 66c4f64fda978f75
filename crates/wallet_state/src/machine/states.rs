//! Session states - Defines the lifecycle of one registration conversation.

use serde::{Deserialize, Serialize};

/// Why a session reached its terminal state.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Address validated and stored.
    Registered,
    /// Address validated but the store rejected or timed out on the write.
    StoreFailed,
    /// User cancelled before submitting a valid address.
    Cancelled,
}

/// Defines the possible states of a registration session.
///
/// A single-turn flow: the session waits for an address and terminates on
/// the first decisive event. There are no intermediate states.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Prompt sent, waiting for the user to submit an address.
    AwaitingAddress,
    /// Final state. A fresh entry command starts a new session.
    Terminated { outcome: SessionOutcome },
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::AwaitingAddress
    }
}

impl SessionState {
    /// Check if this is a terminal state (no more transitions expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated { .. })
    }

    /// Check if this state allows user input.
    pub fn accepts_user_input(&self) -> bool {
        matches!(self, Self::AwaitingAddress)
    }

    /// Get a human-readable description of the current state.
    pub fn description(&self) -> &str {
        match self {
            Self::AwaitingAddress => "Waiting for a wallet address",
            Self::Terminated {
                outcome: SessionOutcome::Registered,
            } => "Address registered",
            Self::Terminated {
                outcome: SessionOutcome::StoreFailed,
            } => "Storage failed",
            Self::Terminated {
                outcome: SessionOutcome::Cancelled,
            } => "Cancelled",
        }
    }
}
