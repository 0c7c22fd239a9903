//! Shared types, errors, and configuration for Weekclose.
//!
//! This crate provides common types used across all other crates:
//! - Fixed-point money type
//! - Typed IDs for type-safe entity references
//! - Errors reported by collaborator stores
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LoggingConfig, ReconcileConfig};
pub use error::{StoreError, StoreResult};
pub use types::{GoalId, LedgerEntryId, Money, MoneyError};
