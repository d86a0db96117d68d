//! Error kinds raised by strategies and the bank.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InvestmentError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvestmentError {
    /// A monetary amount was not strictly positive.
    #[error("Investment amount must be positive, got {0}")]
    InvalidAmount(f64),

    /// A strategy configuration value is outside its valid domain.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Risk rating must be between 0.0 and 1.0, got {0}")]
    InvalidRisk(f64),

    #[error("Strategy cannot be null")]
    NullStrategy,

    #[error("No investment strategy set")]
    NoStrategy,

    #[error("Insufficient funds for investment: requested {requested}, available {available}")]
    InsufficientFunds { requested: f64, available: f64 },

    /// Initial funds were negative or not a finite number.
    #[error("Initial funds must be a finite, non-negative amount, got {0}")]
    NegativeInitialFunds(f64),

    /// The parameter exists, but not on this strategy variant.
    #[error("Parameter '{parameter}' is not supported by the {strategy} strategy")]
    UnsupportedParameter {
        parameter: &'static str,
        strategy: String,
    },
}

impl InvestmentError {
    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        InvestmentError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Rejects amounts that are not strictly positive and finite.
pub(crate) fn ensure_positive_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(InvestmentError::InvalidAmount(amount))
    }
}

/// Rejects negative or non-finite rate values.
pub(crate) fn ensure_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(InvestmentError::invalid_parameter(
            name,
            format!("must be non-negative, got {value}"),
        ))
    }
}
