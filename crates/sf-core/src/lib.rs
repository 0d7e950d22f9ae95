//! sf-core: stable foundation for seismoflow.
//!
//! Contains:
//! - units (uom SI types + constructors, physical constants)
//! - numeric (Real + tolerances + float helpers, quadrature, interpolation)
//! - error (shared error types and the error taxonomy)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{ErrorKind, SfError, SfResult};
pub use numeric::*;
pub use units::*;
