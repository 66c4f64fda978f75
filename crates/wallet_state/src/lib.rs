//! wallet_state - State machine for the wallet registration conversation
//!
//! This crate provides the pure session state machine: which state one
//! user's registration flow is in, and how inbound events move it forward.
//! It performs no I/O; the service layer resolves validation and storage
//! results into events before feeding the machine.

pub mod machine;

// Re-export commonly used types
pub use machine::{SessionEvent, SessionOutcome, SessionState, StateMachine, StateTransition};
