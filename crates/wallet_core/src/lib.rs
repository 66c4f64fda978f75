//! wallet_core - Core types and validation for the wallet registrar
//!
//! This crate provides the foundational pieces shared across the registrar crates:
//! - `registration` - Identity and the durable registration record
//! - `address` - EVM address validation (syntax + EIP-55 checksum)
//! - `config` - process configuration, constructed once at startup

pub mod address;
pub mod config;
pub mod registration;

// Re-export commonly used types
pub use address::{AddressValidator, ValidationError};
pub use config::Config;
pub use registration::{Identity, RegistrationRecord};
