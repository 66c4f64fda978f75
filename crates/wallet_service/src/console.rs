//! Console transport - a minimal local stand-in for a chat platform.
//!
//! Drives the router from stdin as a single fixed identity: `/start` and
//! `/cancel` map to the entry and cancel commands, anything else is a text
//! message. Replies print to stdout.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};

use wallet_core::Identity;

use crate::router::SessionRouter;
use crate::transport::{ChatEvent, ReplyFormat, ReplySink, TransportError};

pub struct ConsoleSink;

#[async_trait]
impl ReplySink for ConsoleSink {
    async fn send_reply(
        &self,
        _identity: Identity,
        text: &str,
        _format: ReplyFormat,
    ) -> Result<(), TransportError> {
        println!("{text}");
        Ok(())
    }
}

/// Read stdin until EOF or `/quit`, dispatching each line to the router.
pub async fn run_console(
    router: &SessionRouter,
    identity: Identity,
    display_name: String,
) -> std::io::Result<()> {
    println!("wallet-registrar console. /start to begin, /cancel to abort, /quit to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        let event = match input {
            "" => continue,
            "/quit" => break,
            "/start" => ChatEvent::EntryCommand {
                identity,
                display_name: display_name.clone(),
            },
            "/cancel" => ChatEvent::CancelCommand { identity },
            _ => ChatEvent::TextMessage {
                identity,
                text: input.to_string(),
            },
        };
        router.dispatch(event).await;
    }
    Ok(())
}
