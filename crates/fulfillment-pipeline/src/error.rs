//! # Pipeline Error Types
//!
//! Errors raised by configuration loading and by the collaborators the
//! pipeline talks to.
//!
//! ## Where They End Up
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Config load/save ──► PipelineError ──► runner exits (anyhow)           │
//! │                                                                         │
//! │  Store call       ──► PipelineError::Store    ──► FailureReason::       │
//! │                                                   StoreError            │
//! │  Order log write  ──► PipelineError::LogWrite ──► FailureReason::       │
//! │                                                   LogWriteFailed        │
//! │  Notifier send    ──► PipelineError::Notify   ──► warn! and continue    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! Collaborator errors never escape `FulfillmentPipeline::process`.

use fulfillment_core::ValidationError;
use fulfillment_db::DbError;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    /// The order store rejected a read or write.
    #[error("Store error: {0}")]
    Store(String),

    /// Notification delivery failed.
    #[error("Notification failed: {0}")]
    Notify(String),

    /// Appending to the order log failed.
    #[error("Order log write failed: {0}")]
    LogWrite(String),

    // =========================================================================
    // I/O Errors
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DbError> for PipelineError {
    fn from(err: DbError) -> Self {
        PipelineError::Store(err.to_string())
    }
}

impl From<ValidationError> for PipelineError {
    fn from(err: ValidationError) -> Self {
        PipelineError::InvalidConfig(err.to_string())
    }
}

impl From<reqwest::Error> for PipelineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PipelineError::Notify(format!("request timed out: {}", err))
        } else {
            PipelineError::Notify(err.to_string())
        }
    }
}
