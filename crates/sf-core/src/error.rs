use core::fmt;
use thiserror::Error;

pub type SfResult<T> = Result<T, SfError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SfError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Length mismatch: {what} (expected {expected}, got {actual})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Value out of range for {what}: {value}")]
    OutOfRange { what: &'static str, value: f64 },
}

impl SfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SfError::NonFinite { .. } => ErrorKind::Domain,
            SfError::InvalidArg { .. }
            | SfError::LengthMismatch { .. }
            | SfError::OutOfRange { .. } => ErrorKind::Configuration,
        }
    }
}

/// Coarse classification shared by every error type in the workspace.
///
/// Each crate keeps its own error enum, but all of them can be mapped onto
/// one of these kinds so batch callers can decide how to report a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ErrorKind {
    /// Bad fractions, unknown tags, malformed parameter sets or inputs.
    Configuration,
    /// A state-dependent quantity was queried before the state was set.
    State,
    /// A non-physical value (negative modulus, density, NaN) was produced.
    Domain,
    /// An iterative procedure ran out of iterations or lost its bracket.
    Convergence,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::State => "state",
            ErrorKind::Domain => "domain",
            ErrorKind::Convergence => "convergence",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_assigned() {
        let err = SfError::NonFinite {
            what: "density",
            value: f64::NAN,
        };
        assert_eq!(err.kind(), ErrorKind::Domain);

        let err = SfError::LengthMismatch {
            what: "integrand",
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("integrand"));
    }

    #[test]
    fn kind_display() {
        assert_eq!(ErrorKind::Convergence.to_string(), "convergence");
    }
}
