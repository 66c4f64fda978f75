use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use wallet_core::{Identity, RegistrationRecord};

pub type StoreResult<T> = Result<T, StorageError>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("time parse error: {0}")]
    Chrono(#[from] chrono::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task join error: {0}")]
    Task(String),

    #[error("storage operation timed out")]
    Timeout,
}

/// Durable (identity -> wallet) registrations.
///
/// `upsert` is the only write: insert when the identity is unseen,
/// otherwise overwrite the existing row. Implementations must be safe
/// under concurrent calls; for one identity the last committed write wins.
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Create the schema if it does not exist.
    async fn init(&self) -> StoreResult<()>;

    /// Insert or overwrite the record for `identity`, stamping it with the
    /// current time. The address is assumed already validated by the
    /// caller; no re-validation happens here.
    async fn upsert(
        &self,
        identity: Identity,
        display_name: &str,
        address: &str,
    ) -> StoreResult<()>;

    /// Read back the record for `identity`, if any.
    async fn fetch(&self, identity: Identity) -> StoreResult<Option<RegistrationRecord>>;
}

/// SQLite-backed store. Opens a fresh connection per call on a blocking
/// worker; WAL mode plus a busy timeout lets concurrent writers for
/// distinct identities serialize instead of erroring.
#[derive(Debug, Clone)]
pub struct SqliteRegistrationStore {
    db_path: PathBuf,
}

impl SqliteRegistrationStore {
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    async fn with_connection<T, F>(&self, func: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let connection = open_connection(&db_path)?;
            func(&connection)
        })
        .await
        .map_err(|error| StorageError::Task(error.to_string()))?
    }
}

#[async_trait]
impl RegistrationStore for SqliteRegistrationStore {
    async fn init(&self) -> StoreResult<()> {
        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS wallet_users (
                    identity INTEGER PRIMARY KEY,
                    display_name TEXT NOT NULL DEFAULT '',
                    wallet_address TEXT NOT NULL,
                    last_registered_at TEXT NOT NULL
                );
                "#,
            )?;
            Ok(())
        })
        .await
    }

    async fn upsert(
        &self,
        identity: Identity,
        display_name: &str,
        address: &str,
    ) -> StoreResult<()> {
        let display_name = display_name.to_string();
        let address = address.to_string();
        let registered_at = format_timestamp(Utc::now());

        self.with_connection(move |connection| {
            connection.execute(
                r#"
                INSERT INTO wallet_users (
                    identity, display_name, wallet_address, last_registered_at
                ) VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(identity) DO UPDATE SET
                    display_name = excluded.display_name,
                    wallet_address = excluded.wallet_address,
                    last_registered_at = excluded.last_registered_at
                "#,
                params![identity.0, display_name, address, registered_at],
            )?;
            Ok(())
        })
        .await
    }

    async fn fetch(&self, identity: Identity) -> StoreResult<Option<RegistrationRecord>> {
        self.with_connection(move |connection| {
            let row = connection
                .query_row(
                    r#"
                    SELECT identity, display_name, wallet_address, last_registered_at
                    FROM wallet_users
                    WHERE identity = ?1
                    "#,
                    params![identity.0],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, String>(3)?,
                        ))
                    },
                )
                .optional()?;

            row.map(|(id, display_name, wallet_address, registered_at)| {
                Ok(RegistrationRecord {
                    identity: Identity(id),
                    display_name,
                    wallet_address,
                    last_registered_at: parse_timestamp(&registered_at)?,
                })
            })
            .transpose()
        })
        .await
    }
}

fn open_connection(path: &Path) -> StoreResult<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let connection = Connection::open(path)?;
    connection.busy_timeout(Duration::from_secs(5))?;
    connection.pragma_update(None, "journal_mode", "WAL")?;
    Ok(connection)
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339()
}

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
