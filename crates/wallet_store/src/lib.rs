//! wallet_store - Persistence for wallet registrations
//!
//! `RegistrationStore` is the async contract consumed by the service layer;
//! `SqliteRegistrationStore` is the bundled-SQLite implementation.

mod storage;

pub use storage::{RegistrationStore, SqliteRegistrationStore, StorageError, StoreResult};
