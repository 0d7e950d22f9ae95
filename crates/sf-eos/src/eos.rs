//! The equation-of-state evaluation contract.

use crate::error::{EosError, EosResult};
use crate::params::ParameterSet;
use std::fmt;

/// Order of the finite-strain shear modulus expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShearOrder {
    Second,
    Third,
}

/// Trait for mineral equations of state.
///
/// Implementations must be thread-safe (Send + Sync) so one formulation can
/// be shared by every mineral that selects it, including minerals evaluated
/// on different worker threads.
///
/// `volume` inverts the pressure equation; every other property takes the
/// already-resolved volume so callers never solve the implicit equation twice
/// for one state. All inputs and outputs are SI.
pub trait EquationOfState: Send + Sync + fmt::Debug {
    /// Tag of this formulation (for logging and error messages).
    fn name(&self) -> &'static str;

    /// Check that `params` carries every parameter the volume and bulk
    /// properties need. Shear parameters are checked when shear is queried,
    /// so density-only minerals remain usable.
    fn check_params(&self, params: &ParameterSet) -> EosResult<()>;

    /// Molar volume [m³/mol] at the given pressure [Pa] and temperature [K].
    fn volume(&self, pressure: f64, temperature: f64, params: &ParameterSet) -> EosResult<f64>;

    /// Density [kg/m³] at the given pressure and temperature.
    fn density(&self, pressure: f64, temperature: f64, params: &ParameterSet) -> EosResult<f64> {
        let volume = self.volume(pressure, temperature, params)?;
        Ok(params.molar_mass / volume)
    }

    /// Isothermal bulk modulus K_T [Pa].
    fn isothermal_bulk_modulus(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64>;

    /// Adiabatic bulk modulus K_S [Pa].
    fn adiabatic_bulk_modulus(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64>;

    /// Shear modulus G [Pa].
    fn shear_modulus(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64>;

    /// Isochoric heat capacity C_v [J/(mol·K)].
    fn heat_capacity_v(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64>;

    /// Isobaric heat capacity C_p [J/(mol·K)].
    fn heat_capacity_p(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64>;

    /// Volumetric thermal expansivity α [1/K].
    fn thermal_expansivity(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64>;

    /// Grüneisen parameter γ (dimensionless).
    fn grueneisen_parameter(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64>;
}

/// Reject non-positive or non-finite temperatures for thermal formulations.
pub(crate) fn check_temperature(temperature: f64) -> EosResult<()> {
    if !temperature.is_finite() || temperature <= 0.0 {
        return Err(EosError::NonPhysical {
            what: "temperature must be positive and finite",
            value: temperature,
        });
    }
    Ok(())
}

/// Reject non-positive or non-finite volumes.
pub(crate) fn check_volume(volume: f64) -> EosResult<()> {
    if !volume.is_finite() || volume <= 0.0 {
        return Err(EosError::NonPhysical {
            what: "volume must be positive and finite",
            value: volume,
        });
    }
    Ok(())
}

/// Surface NaN/inf results instead of letting them leak into averages.
pub(crate) fn finite_output(value: f64, what: &'static str) -> EosResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EosError::NonPhysical { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temperature_guard() {
        assert!(check_temperature(300.0).is_ok());
        assert!(check_temperature(0.0).is_err());
        assert!(check_temperature(f64::NAN).is_err());
    }

    #[test]
    fn volume_guard() {
        assert!(check_volume(1e-5).is_ok());
        assert!(check_volume(-1e-5).is_err());
    }
}
