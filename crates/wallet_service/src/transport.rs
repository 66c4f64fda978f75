//! Transport boundary - inbound chat events and the outbound reply sink.
//!
//! The concrete chat platform lives behind these two seams. Inbound events
//! arrive already authenticated; outbound replies are fire-and-forget from
//! the router's perspective.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wallet_core::Identity;

/// Inbound events delivered by the chat transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatEvent {
    /// The user issued the entry command (e.g. `/start`).
    EntryCommand {
        identity: Identity,
        display_name: String,
    },
    /// The user sent free-form text.
    TextMessage { identity: Identity, text: String },
    /// The user issued the cancel command (e.g. `/cancel`).
    CancelCommand { identity: Identity },
}

impl ChatEvent {
    pub fn identity(&self) -> Identity {
        match self {
            Self::EntryCommand { identity, .. }
            | Self::TextMessage { identity, .. }
            | Self::CancelCommand { identity } => *identity,
        }
    }
}

/// How a reply should be rendered by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyFormat {
    #[default]
    Plain,
    Markdown,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("reply delivery failed: {0}")]
    Delivery(String),
}

/// Outbound reply channel exposed by the chat transport.
///
/// Delivery failure is the transport's concern; the router logs it and
/// never retries.
#[async_trait]
pub trait ReplySink: Send + Sync {
    async fn send_reply(
        &self,
        identity: Identity,
        text: &str,
        format: ReplyFormat,
    ) -> Result<(), TransportError>;
}
