//! Error types for rule evaluation and table loading

use thiserror::Error;

use crate::member::{Country, MemberFinancialProfile};

/// Errors raised while evaluating a calculator
///
/// Calculators never panic on bad input. Values that are out of range are
/// rejected here instead of being clamped to a "safe" default, so callers can
/// tell a legitimately zero result apart from an input problem.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RulesError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Rules for {expected} cannot evaluate a {found} member")]
    JurisdictionMismatch { expected: Country, found: Country },

    #[error("Failed to serialize result: {0}")]
    Serialization(String),
}

impl RulesError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        RulesError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Errors raised while loading rule tables, citations or member files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown country code: {0}")]
    UnknownCountry(String),

    #[error("Unknown {field}: {value}")]
    UnknownValue { field: &'static str, value: String },

    #[error("Invalid bracket table for {country}: {reason}")]
    InvalidBrackets { country: Country, reason: String },
}

/// Require a monetary amount to be finite and non-negative
pub(crate) fn check_amount(field: &'static str, value: f64) -> Result<f64, RulesError> {
    if !value.is_finite() {
        return Err(RulesError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(RulesError::invalid(field, format!("must be >= 0, got {}", value)));
    }
    Ok(value)
}

/// Require an age to fall inside the modeled lifespan
pub(crate) fn check_age(field: &'static str, value: u32) -> Result<u32, RulesError> {
    if value > MAX_MODELED_AGE {
        return Err(RulesError::invalid(
            field,
            format!("must be <= {}, got {}", MAX_MODELED_AGE, value),
        ));
    }
    Ok(value)
}

/// Require a projection horizon short enough to compound without overflow
pub(crate) fn check_years(field: &'static str, value: u32) -> Result<u32, RulesError> {
    if value > MAX_PROJECTION_YEARS {
        return Err(RulesError::invalid(
            field,
            format!("must be <= {}, got {}", MAX_PROJECTION_YEARS, value),
        ));
    }
    Ok(value)
}

/// Reject a profile that belongs to another jurisdiction
pub(crate) fn ensure_country(expected: Country, profile: &MemberFinancialProfile) -> Result<(), RulesError> {
    if profile.country != expected {
        return Err(RulesError::JurisdictionMismatch {
            expected,
            found: profile.country,
        });
    }
    Ok(())
}

/// Oldest age any calculator accepts
pub const MAX_MODELED_AGE: u32 = 120;

/// Longest projection horizon any projector accepts
pub const MAX_PROJECTION_YEARS: u32 = 100;
