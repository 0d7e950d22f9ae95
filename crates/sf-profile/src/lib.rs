//! sf-profile: rock columns in hydrostatic equilibrium.
//!
//! - `ReferenceModel` and the tabulated reference Earth
//! - geotherms (linear, tabulated, adiabatic)
//! - `pressures_for_rock` / `depths_for_rock` self-consistent solvers

pub mod error;
pub mod geotherm;
pub mod profile;
pub mod reference;
pub mod solver;

pub use error::{ProfileError, ProfileResult};
pub use geotherm::{AdiabaticGeotherm, Geotherm, LinearGeotherm, TableGeotherm, adiabatic_gradient};
pub use profile::Profile;
pub use reference::{Gravity, ReferenceModel, ReferenceSamples, TabulatedReference};
pub use solver::{SolverConfig, depths_for_rock, pressures_for_rock};
