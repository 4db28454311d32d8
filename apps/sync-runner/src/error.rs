//! # API Error Type
//!
//! Unified error type for console commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Runner                             │
//! │                                                                         │
//! │  > retry GL-009 OTTO                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Storage Error? ─── StoreError::QueryFailed("...") ──┐          │  │
//! │  │         │                                            │          │  │
//! │  │         ▼                                            ▼          │  │
//! │  │  Unknown record? ─── SyncError::RecordNotFound ──── ApiError ──►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Console prints: error: [NotFound] Inventory record not found: ...      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A simulated sync failure is not an `ApiError`: the command succeeds and
//! reports the record's `error` status.

use serde::Serialize;

use goodlink_core::ValidationError;
use goodlink_store::StoreError;
use goodlink_sync::SyncError;

/// API error returned from console commands.
///
/// ## Serialization
/// Serialized, a failed command looks like:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Inventory record not found: GL-009 on OTTO"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Record not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Key-value store operation failed
    StorageError,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Console input did not parse
    UnknownCommand,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unknown-command error.
    pub fn unknown_command(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::UnknownCommand, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Database connection failed")
            }
            StoreError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::StorageError, "Database migration failed")
            }
            StoreError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Store query failed: {}", e);
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
            StoreError::Serialization { key, message } => {
                tracing::error!(key = %key, "Stored value is unreadable: {}", message);
                ApiError::new(
                    ErrorCode::StorageError,
                    format!("Stored value for '{}' is unreadable", key),
                )
            }
            StoreError::PoolExhausted => {
                ApiError::new(ErrorCode::StorageError, "Database pool exhausted")
            }
            StoreError::Internal(e) => {
                tracing::error!("Internal store error: {}", e);
                ApiError::new(ErrorCode::StorageError, "Storage operation failed")
            }
        }
    }
}

/// Converts sync engine errors to API errors.
impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::RecordNotFound { sku, marketplace } => {
                ApiError::not_found("Inventory record", &format!("{} on {}", sku, marketplace))
            }
            SyncError::Validation(e) => e.into(),
            SyncError::Storage(e) => e.into(),
            SyncError::InvalidConfig(_)
            | SyncError::ConfigLoadFailed(_)
            | SyncError::ConfigSaveFailed(_) => ApiError::new(ErrorCode::ConfigError, err.to_string()),
            SyncError::ChannelError(_) => ApiError::internal(err.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_not_found_maps_to_not_found() {
        let err: ApiError = SyncError::RecordNotFound {
            sku: "GL-009".into(),
            marketplace: "OTTO".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Inventory record not found: GL-009 on OTTO");
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::validation("sku is required");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["message"], "sku is required");
    }

    #[test]
    fn test_storage_errors_hide_details() {
        let err: ApiError = SyncError::Storage(StoreError::QueryFailed("disk I/O error".into())).into();
        assert_eq!(err.code, ErrorCode::StorageError);
        assert!(!err.message.contains("disk"));
    }
}
