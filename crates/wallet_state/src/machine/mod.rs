//! State machine module
//!
//! Contains the FSM implementation for the registration session lifecycle.

mod events;
mod states;
mod transitions;

pub use events::SessionEvent;
pub use states::{SessionOutcome, SessionState};
pub use transitions::{StateMachine, StateTransition};
