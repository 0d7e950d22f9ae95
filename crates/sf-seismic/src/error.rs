//! Errors for the moduli pipeline, averaging and misfit metrics.

use sf_core::{ErrorKind, SfError};
use sf_minerals::MaterialError;
use thiserror::Error;

pub type SeismicResult<T> = Result<T, SeismicError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeismicError {
    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Numeric(#[from] SfError),

    /// A per-sample failure inside a batch evaluation.
    #[error("Sample {index} (P = {pressure:e} Pa, T = {temperature} K): {source}")]
    AtSample {
        index: usize,
        pressure: f64,
        temperature: f64,
        #[source]
        source: MaterialError,
    },

    /// A per-entry failure in a post-processing pass over a profile.
    #[error("Entry {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: MaterialError,
    },

    #[error("Length mismatch: {what} (expected {expected}, got {actual})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-physical value for {what}: {value}")]
    Domain { what: &'static str, value: f64 },
}

impl SeismicError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SeismicError::Material(err) => err.kind(),
            SeismicError::AtSample { source, .. } | SeismicError::AtIndex { source, .. } => {
                source.kind()
            }
            SeismicError::Numeric(err) => err.kind(),
            SeismicError::LengthMismatch { .. } | SeismicError::InvalidArg { .. } => {
                ErrorKind::Configuration
            }
            SeismicError::Domain { .. } => ErrorKind::Domain,
        }
    }

    /// Index of the failing sample, if the error came from a batch.
    pub fn sample_index(&self) -> Option<usize> {
        match self {
            SeismicError::AtSample { index, .. } | SeismicError::AtIndex { index, .. } => {
                Some(*index)
            }
            _ => None,
        }
    }
}

pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> SeismicResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SeismicError::LengthMismatch {
            what,
            expected,
            actual,
        })
    }
}
