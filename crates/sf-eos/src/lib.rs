//! sf-eos: mineral equations of state for seismoflow.
//!
//! Provides:
//! - `ParameterSet`, the immutable per-mineral parameter table
//! - `EquationOfState`, the evaluation contract every formulation honours
//! - Birch–Murnaghan (isothermal), Mie–Grüneisen–Debye and
//!   Stixrude & Lithgow-Bertelloni formulations, each in a second- and
//!   third-order shear variant
//! - `EosMethod` tags and an `EosRegistry` mapping tags to formulations
//!
//! # Units
//!
//! Everything is SI: pressure in Pa, temperature in K, molar volume in
//! m³/mol, molar mass in kg/mol, moduli in Pa, heat capacity in J/(mol·K).
//!
//! # Example
//!
//! ```
//! use sf_eos::{EosMethod, ParameterSet};
//!
//! let params = ParameterSet::new(11.24e-6, 161.0e9, 3.8, 0.0403, 2.0)
//!     .with_shear(131.0e9, 2.1);
//! let eos = EosMethod::Bm3.model();
//! let v = eos.volume(25.0e9, 300.0, &params).unwrap();
//! assert!(v < params.v_0);
//! ```

pub mod birch_murnaghan;
pub mod debye;
pub mod eos;
pub mod error;
pub mod method;
pub mod mgd;
pub mod params;
pub mod root;
pub mod slb;

// Re-exports for ergonomics
pub use birch_murnaghan::BirchMurnaghan;
pub use eos::{EquationOfState, ShearOrder};
pub use error::{EosError, EosResult};
pub use method::{EosMethod, EosRegistry};
pub use mgd::MieGrueneisenDebye;
pub use params::{DebyeParams, ParameterSet};
pub use root::RootConfig;
pub use slb::StixrudeLithgowBertelloni;
