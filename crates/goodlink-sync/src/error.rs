//! # Sync Error Types
//!
//! Error types for engine operations.
//!
//! ## What Is Not an Error
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A simulated sync failure ("Connection timeout", "Retry failed") is     │
//! │  a terminal record status plus a notification. Callers get Ok(..).     │
//! │                                                                         │
//! │  SyncError covers only:                                                │
//! │  • configuration problems                                              │
//! │  • storage failures                                                    │
//! │  • bad input (unknown record, invalid SKU)                             │
//! │  • task lifecycle (background task failed)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use goodlink_core::{CoreError, ValidationError};
use goodlink_store::StoreError;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Sync engine error type.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid sync configuration.
    #[error("Invalid sync configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Storage Errors
    // =========================================================================
    /// Persisted state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// No record for the requested key.
    #[error("Inventory record not found: {sku} on {marketplace}")]
    RecordNotFound { sku: String, marketplace: String },

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Channel send/receive failed.
    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<CoreError> for SyncError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RecordNotFound { sku, marketplace } => {
                SyncError::RecordNotFound { sku, marketplace }
            }
            CoreError::Validation(v) => SyncError::Validation(v),
        }
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_conversion() {
        let err: SyncError = CoreError::RecordNotFound {
            sku: "GL-009".into(),
            marketplace: "OTTO".into(),
        }
        .into();
        assert!(matches!(err, SyncError::RecordNotFound { .. }));
        assert_eq!(err.to_string(), "Inventory record not found: GL-009 on OTTO");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: SyncError = StoreError::PoolExhausted.into();
        assert_eq!(err.to_string(), "Storage error: Connection pool exhausted");
    }
}
