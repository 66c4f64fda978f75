//! wallet_service - Session routing and transport boundary
//!
//! Connects the chat transport to the session state machine and the
//! registration store:
//! - `transport` - inbound event and outbound reply interfaces
//! - `router` - identity -> live session registry and the event driver
//! - `session` - one conversation's in-memory state
//! - `replies` - outbound message texts
//! - `console` - stdin/stdout transport for local runs

pub mod console;
pub mod logging;
pub mod replies;
pub mod router;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use router::SessionRouter;
pub use session::Session;
pub use transport::{ChatEvent, ReplyFormat, ReplySink, TransportError};
