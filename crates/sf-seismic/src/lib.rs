//! sf-seismic: from rocks to seismic observables.
//!
//! - `calculate_moduli`: per-phase elastic properties, parallel over samples
//! - `AveragingScheme` and its variants (Voigt, Reuss, VRH,
//!   Hashin–Shtrikman bounds and average, linear)
//! - velocity profiles, `velocities_from_rock`, attenuation correction
//! - misfit metrics (`l2`, `nrmse`, `chi_factor`)

pub mod averaging;
pub mod elastic;
pub mod error;
pub mod metrics;
pub mod velocities;

pub use averaging::{
    Averaging, AveragingScheme, HashinShtrikmanAverage, HashinShtrikmanLower,
    HashinShtrikmanUpper, Linear, Reuss, Voigt, VoigtReussHill, average_moduli,
};
pub use elastic::{ElasticProperties, calculate_moduli, densities_from_rock, phase_properties};
pub use error::{SeismicError, SeismicResult};
pub use metrics::{Misfit, chi_factor, compare_chifactor, compare_l2, l2, nrmse};
pub use velocities::{
    RockProperties, VelocityProfile, apply_attenuation_correction, attenuation_correction,
    compute_velocities, velocities_from_rock,
};
