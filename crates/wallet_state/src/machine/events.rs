//! Session events - Defines events that trigger state transitions.

use serde::{Deserialize, Serialize};
use wallet_core::ValidationError;

/// Defines the events that can trigger state transitions in the FSM.
///
/// The service layer resolves raw inbound text against the validator (and
/// the store result) before feeding the machine, so the machine never
/// performs validation or I/O itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// Entry command received; (re)starts the flow.
    EntryReceived,

    /// Submitted text passed validation and the upsert committed.
    AddressAccepted,

    /// Submitted text failed validation.
    AddressRejected { reason: ValidationError },

    /// Submitted text passed validation but the upsert failed or timed out.
    StoreFailed,

    /// Cancel command received.
    CancelReceived,
}

impl SessionEvent {
    /// Check if this event came directly from the user rather than from a
    /// validation or storage outcome.
    pub fn is_user_event(&self) -> bool {
        matches!(self, Self::EntryReceived | Self::CancelReceived)
    }
}
