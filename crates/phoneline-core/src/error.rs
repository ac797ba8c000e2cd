//! Unified error handling for phoneline billing
//!
//! Contract operations have preconditions (a bill must be bound, the contract
//! must not be cancelled). Instead of panicking on a violated precondition the
//! contracts surface it as one of these variants.

use thiserror::Error;

/// Main application error type
///
/// All errors in the workspace should be converted to this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    // ==================== Contract Lifecycle Errors ====================
    #[error("No active bill: new_month must be called before billing or cancelling")]
    NoActiveBill,

    #[error("Contract already cancelled")]
    ContractCancelled,

    // ==================== Driver Errors ====================
    #[error("Line not found: {0}")]
    LineNotFound(String),

    #[error("Line already exists: {0}")]
    LineAlreadyExists(String),

    // ==================== Validation Errors ====================
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ==================== Internal Errors ====================
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns a stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NoActiveBill => "no_active_bill",
            AppError::ContractCancelled => "contract_cancelled",
            AppError::LineNotFound(_) => "line_not_found",
            AppError::LineAlreadyExists(_) => "line_already_exists",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
