//! Registration types - the identity key and the durable wallet record.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique key identifying a user within the chat platform.
///
/// Opaque and immutable once assigned. The numeric width matches the
/// platform's user ids.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Identity(pub i64);

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for Identity {
    fn from(raw: i64) -> Self {
        Identity(raw)
    }
}

/// The durable (identity -> wallet) record.
///
/// At most one record exists per identity; every successful registration
/// overwrites `display_name`, `wallet_address` and `last_registered_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub identity: Identity,
    /// Human-readable label, possibly empty.
    pub display_name: String,
    pub wallet_address: String,
    pub last_registered_at: DateTime<Utc>,
}
