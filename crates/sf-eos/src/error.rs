//! Equation-of-state errors.

use sf_core::ErrorKind;
use thiserror::Error;

/// Result type for equation-of-state operations.
pub type EosResult<T> = Result<T, EosError>;

/// Errors that can occur while evaluating an equation of state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EosError {
    /// No formulation is registered under this tag.
    #[error("Unknown equation of state: {tag}")]
    UnknownMethod { tag: String },

    /// The parameter set lacks a value this formulation needs.
    #[error("Missing parameter {name} required by {method}")]
    MissingParameter {
        name: &'static str,
        method: &'static str,
    },

    /// A parameter is present but not usable (negative, NaN, ...).
    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Non-physical input or output value.
    #[error("Non-physical value for {what}: {value}")]
    NonPhysical { what: &'static str, value: f64 },

    /// Volume inversion failed (no bracketed root, or iteration cap hit).
    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },
}

impl EosError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EosError::UnknownMethod { .. }
            | EosError::MissingParameter { .. }
            | EosError::InvalidParameter { .. } => ErrorKind::Configuration,
            EosError::NonPhysical { .. } => ErrorKind::Domain,
            EosError::ConvergenceFailed { .. } => ErrorKind::Convergence,
        }
    }
}
