//! Error types for Synheart ROI

use thiserror::Error;

/// Errors that can occur while computing or mutating the dashboard
#[derive(Debug, Error)]
pub enum RoiError {
    #[error("Insufficient history: need {required} samples, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Invalid investment: {0}")]
    InvalidInvestment(String),

    #[error("Division by zero: {0} baseline is zero")]
    DivisionByZero(String),

    #[error("Investment not found: {0}")]
    InvestmentNotFound(u64),

    #[error("Invalid sample for day {day}: {reason}")]
    InvalidSample { day: u32, reason: String },

    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
