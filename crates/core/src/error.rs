//! Error taxonomy for store operations
//!
//! Absence is not an error: reads return `Option<Item>` and absence flows
//! through the `None` arm, never through this enum. The variants here split
//! by how the caller should react — validation failures are caller bugs and
//! never retried, throttling and transient faults are retryable with
//! backoff, everything else is permanent.

use thiserror::Error;

/// Result alias used across the stash crates.
pub type Result<T> = std::result::Result<T, StashError>;

/// Store operation errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StashError {
    /// Caller-supplied data is malformed. Never retried; the message names
    /// the violated constraint.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// The named table does not exist (or is not yet active).
    #[error("table not found: {table}")]
    TableNotFound { table: String },

    /// A table of this name already exists. Callers building idempotent
    /// create flows treat this as success-equivalent.
    #[error("table already exists: {table}")]
    TableAlreadyExists { table: String },

    /// Bounded wait for table activation expired.
    #[error("table {table} did not become active within {waited_ms}ms")]
    TableCreateTimeout { table: String, waited_ms: u64 },

    /// A value outside the storage format's closed type set. Indicates a
    /// caller bug; never retried.
    #[error("unsupported value: {reason}")]
    UnsupportedValue { reason: String },

    /// Backing engine capacity exceeded. Retry with backoff.
    #[error("throttled: {reason}")]
    Throttled { reason: String },

    /// Network or service fault. Safe to retry.
    #[error("transient failure: {reason}")]
    Transient { reason: String },

    /// Anything else. Logged with full context, not retried.
    #[error("permanent failure: {reason}")]
    Permanent { reason: String },
}

impl StashError {
    /// Whether the caller may retry the failed operation with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StashError::Throttled { .. } | StashError::Transient { .. }
        )
    }

    /// Shorthand for a validation failure.
    pub fn validation(reason: impl Into<String>) -> Self {
        StashError::Validation {
            reason: reason.into(),
        }
    }
}
