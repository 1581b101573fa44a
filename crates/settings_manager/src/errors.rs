//! Settings engine error types.
//!
//! Domain-specific errors for configuration lookup, persistence and
//! authorization. Absence of a value at a level is never an error; it is
//! represented as `Option::None` so callers can fall back to a broader
//! level or to their own default.

use thiserror::Error;

/// Settings engine errors.
///
/// Authorization and invalid-state failures abort an operation before any
/// write is issued; bulk saves are therefore all-or-nothing. Storage
/// failures are surfaced as [`SettingsError::Storage`] by repository
/// implementations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unknown configuration key: {key}")]
    UnknownKey { key: String },

    #[error("User '{username}' does not exist")]
    UnknownUser { username: String },

    #[error("User is not an owner of organization {organization_id}")]
    NotAnOwner { organization_id: i32 },

    #[error("Event {event_id} does not exist")]
    EventNotFound { event_id: i32 },

    #[error("Mandatory configuration key {key} is not present")]
    RequiredValueMissing { key: String },

    #[error("Storage error: {reason}")]
    Storage { reason: String },
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
