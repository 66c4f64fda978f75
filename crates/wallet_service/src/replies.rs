//! Reply texts sent back to the user, one per handled inbound event.

/// Greeting plus the address prompt, sent on the entry command.
pub fn greeting(display_name: &str) -> String {
    if display_name.is_empty() {
        "Hi! 👋\n\nPlease send me your EVM wallet address.".to_string()
    } else {
        format!("Hi {display_name}! 👋\n\nPlease send me your EVM wallet address.")
    }
}

/// Re-prompt with guidance after a rejected address.
pub fn invalid_address() -> &'static str {
    "That doesn't look like a valid EVM wallet address. \
     Please make sure it starts with '0x' followed by 40 hexadecimal characters.\n\n\
     Send me your wallet address again:"
}

/// Confirmation after a stored registration; rendered as Markdown so the
/// address appears in a code span.
pub fn registered(address: &str) -> String {
    format!(
        "Thank you! Your wallet address has been successfully recorded. ✅\n\n\
         Address: `{address}`"
    )
}

/// Generic failure message when the store rejects or times out.
pub fn store_failure() -> &'static str {
    "Sorry, there was an error saving your information. Please try again later."
}

/// Acknowledgment for a cancelled session.
pub fn cancelled() -> &'static str {
    "Operation cancelled."
}

/// Nudge for text or cancel arriving with no live session.
pub fn no_active_session() -> &'static str {
    "You don't have an active registration. Send /start to begin."
}
