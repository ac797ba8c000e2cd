//! Phoneline Billing Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the phoneline billing system. It includes:
//!
//! - Domain models (Bill, Call)
//! - The `BillLedger` trait contracts price calls into
//! - Unified error handling
//! - Application and pricing configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::{AppConfig, PricingConfig};
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
