//! Errors for reference models, geotherms and the depth/pressure solver.

use sf_core::{ErrorKind, SfError};
use sf_minerals::MaterialError;
use sf_seismic::SeismicError;
use thiserror::Error;

pub type ProfileResult<T> = Result<T, ProfileError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    #[error(transparent)]
    Seismic(#[from] SeismicError),

    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Numeric(#[from] SfError),

    /// Malformed reference or geotherm table.
    #[error("Invalid table: {what}")]
    Table { what: String },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// The self-consistent iteration hit its cap before meeting tolerance.
    #[error("Convergence failed after {iterations} iterations (nrmse = {residual:e})")]
    ConvergenceFailed { iterations: usize, residual: f64 },
}

impl ProfileError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProfileError::Seismic(err) => err.kind(),
            ProfileError::Material(err) => err.kind(),
            ProfileError::Numeric(err) => err.kind(),
            ProfileError::Table { .. } | ProfileError::InvalidArg { .. } => {
                ErrorKind::Configuration
            }
            ProfileError::ConvergenceFailed { .. } => ErrorKind::Convergence,
        }
    }

    pub(crate) fn table(what: impl Into<String>) -> Self {
        ProfileError::Table { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convergence_error_kind_and_message() {
        let err = ProfileError::ConvergenceFailed {
            iterations: 100,
            residual: 3.0e-4,
        };
        assert_eq!(err.kind(), ErrorKind::Convergence);
        assert!(err.to_string().contains("100 iterations"));
    }

    #[test]
    fn wrapped_errors_keep_kind() {
        let err: ProfileError = MaterialError::State { what: "density" }.into();
        assert_eq!(err.kind(), ErrorKind::State);
    }
}
