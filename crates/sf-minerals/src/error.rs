//! Mineral and composite errors.

use sf_core::ErrorKind;
use sf_eos::EosError;
use thiserror::Error;

/// Result type for mineral and composite operations.
pub type MaterialResult<T> = Result<T, MaterialError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// Failure inside the bound equation of state.
    #[error(transparent)]
    Eos(#[from] EosError),

    /// A state-dependent quantity was requested before `set_state`.
    #[error("State not set: {what}")]
    State { what: &'static str },

    /// Bad fractions, unknown names, missing equation of state.
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    /// A non-physical modulus or density reached a conversion.
    #[error("Non-physical value for {what}: {value}")]
    Domain { what: &'static str, value: f64 },
}

impl MaterialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MaterialError::Eos(err) => err.kind(),
            MaterialError::State { .. } => ErrorKind::State,
            MaterialError::Configuration { .. } => ErrorKind::Configuration,
            MaterialError::Domain { .. } => ErrorKind::Domain,
        }
    }

    pub(crate) fn config(what: impl Into<String>) -> Self {
        MaterialError::Configuration { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eos_errors_keep_their_kind() {
        let err: MaterialError = EosError::UnknownMethod { tag: "vinet".into() }.into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("vinet"));

        let err: MaterialError = EosError::ConvergenceFailed {
            what: "volume".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Convergence);
    }

    #[test]
    fn state_error_kind() {
        let err = MaterialError::State { what: "density" };
        assert_eq!(err.kind(), ErrorKind::State);
        assert!(err.to_string().contains("density"));
    }
}
