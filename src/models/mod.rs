//! Database models shared across the leads repository.

#[cfg(feature = "server")]
pub mod config;
pub mod lead;
