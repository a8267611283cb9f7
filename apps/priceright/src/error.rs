//! # Error Types
//!
//! `AppError` for the library internals and `ApiError` for command replies.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in PriceRight                             │
//! │                                                                         │
//! │  stdin: "save"                                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Handler                                                 │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation? ─── ValidationError::Required ──────┐              │  │
//! │  │         │                                        │              │  │
//! │  │         ▼                                        ▼              │  │
//! │  │  Collaborator? ─ CollaboratorError ─(generic)─► ApiError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stdout: {"ok":false,"error":{"code":"VALIDATION_ERROR",               │
//! │           "message":"itemName is required"}}                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Corrupt persisted state never reaches this module: the store quarantines
//! it and the session starts from defaults.

use serde::Serialize;
use thiserror::Error;

use priceright_core::{CoreError, ValidationError};
use priceright_store::StoreError;

use crate::collaborators::CollaboratorError;

/// Message shown for any collaborator failure. Details go to the log only.
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again.";

// =============================================================================
// AppError
// =============================================================================

/// Library-level error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    /// Configuration is present but unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for library operations.
pub type AppResult<T> = Result<T, AppError>;

// =============================================================================
// ApiError
// =============================================================================

/// Error returned from a command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "itemName is required"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed; state unchanged
    ValidationError,

    /// Margin advisor or checkout failed; state unchanged
    CollaboratorError,

    /// First word of the line is not a command
    UnknownCommand,

    /// The state store itself failed
    StorageError,

    /// Anything else
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

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unknown command error.
    pub fn unknown_command(name: &str) -> Self {
        ApiError::new(
            ErrorCode::UnknownCommand,
            format!("Unknown command '{}'. Try 'help'.", name),
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::from(e),
            CoreError::EmptyCheckout => ApiError::validation(err.to_string()),
            CoreError::InconsistentItem { .. } => {
                tracing::error!(error = %err, "Refusing inconsistent inventory item");
                ApiError::internal(err.to_string())
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the actual error but return a generic message
        tracing::error!(error = %err, "State store failure");
        ApiError::new(ErrorCode::StorageError, "Saved state could not be accessed")
    }
}

/// Collaborator failures are logged in full and shown generically.
impl From<CollaboratorError> for ApiError {
    fn from(err: CollaboratorError) -> Self {
        tracing::error!(error = %err, "Collaborator call failed");
        ApiError::new(ErrorCode::CollaboratorError, GENERIC_FAILURE_MESSAGE)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(e) => e.into(),
            AppError::Core(e) => e.into(),
            AppError::Store(e) => e.into(),
            AppError::Collaborator(e) => e.into(),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
