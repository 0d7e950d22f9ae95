//! sf-minerals: minerals, rocks and compositional helpers for seismoflow.
//!
//! - `Mineral`: a parameter set bound to an equation of state, with a
//!   settable (P, T) state and derived properties
//! - `Material`: a mineral, a nested `Composite`, or a `SpinTransition`
//! - `SeismicVelocities`: modulus to wave-speed conversion
//! - `catalog`: the built-in mineral database
//! - `partitioning`: bulk composition to phase proportions, Fe partitioning

pub mod catalog;
pub mod composite;
pub mod error;
pub mod mineral;
pub mod partitioning;
pub mod velocity;

pub use composite::{Composite, FRACTION_TOLERANCE, Material, PhaseEntry, SpinTransition};
pub use error::{MaterialError, MaterialResult};
pub use mineral::Mineral;
pub use partitioning::{
    IronPartition, PhaseProportions, RelativeMoles, WeightFractions,
    calculate_partition_coefficient, calculate_phase_percents,
};
pub use velocity::SeismicVelocities;
