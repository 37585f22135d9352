//! Error types for dalil-ap
//!
//! Collaborator failures are reported through these and then folded into the
//! session's `Error` phase; nothing here is fatal.

use thiserror::Error;

/// Main error type for dalil-ap
#[derive(Error, Debug)]
pub enum Error {
    /// Audio resource could not be acquired
    #[error("Audio load error: {0}")]
    Load(String),

    /// Loaded resource could not start or resume output
    #[error("Audio output error: {0}")]
    Output(String),

    /// Operation not valid in the current session phase
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Convenience Result type using dalil-ap Error
pub type Result<T> = std::result::Result<T, Error>;
