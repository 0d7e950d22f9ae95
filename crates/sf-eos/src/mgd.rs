//! Mie–Grüneisen–Debye thermal equation of state.
//!
//! A Birch–Murnaghan cold curve plus a Debye thermal pressure, referenced
//! to T₀ = 300 K. The Grüneisen parameter follows γ = γ₀ (V/V₀)^q₀.

use crate::birch_murnaghan as bm;
use crate::debye;
use crate::eos::{EquationOfState, ShearOrder, check_temperature, check_volume, finite_output};
use crate::error::EosResult;
use crate::params::{DebyeParams, ParameterSet};
use crate::root::{RootConfig, solve_volume};
use sf_core::units::constants::{GAS_CONSTANT, REFERENCE_TEMPERATURE_K};

#[derive(Debug, Clone)]
pub struct MieGrueneisenDebye {
    order: ShearOrder,
    root: RootConfig,
}

impl MieGrueneisenDebye {
    pub fn second_order() -> Self {
        Self {
            order: ShearOrder::Second,
            root: RootConfig::default(),
        }
    }

    pub fn third_order() -> Self {
        Self {
            order: ShearOrder::Third,
            root: RootConfig::default(),
        }
    }

    pub fn with_root_config(mut self, root: RootConfig) -> Self {
        self.root = root;
        self
    }

    fn debye(&self, params: &ParameterSet) -> EosResult<DebyeParams> {
        params.debye(self.name())
    }
}

/// γ = γ₀ (V/V₀)^q₀
fn grueneisen(volume: f64, params: &ParameterSet, d: &DebyeParams) -> f64 {
    d.grueneisen_0 * (volume / params.v_0).powf(d.q_0)
}

/// θ = θ₀ exp((γ₀ − γ)/q₀)
fn debye_temperature(volume: f64, params: &ParameterSet, d: &DebyeParams) -> f64 {
    let gamma = grueneisen(volume, params, d);
    if d.q_0 == 0.0 {
        // γ is constant; the q₀ → 0 limit of the integral gives θ₀ (V₀/V)^γ₀
        return d.debye_0 * (params.v_0 / volume).powf(d.grueneisen_0);
    }
    d.debye_0 * ((d.grueneisen_0 - gamma) / d.q_0).exp()
}

fn thermal_pressure(t: f64, volume: f64, params: &ParameterSet, d: &DebyeParams) -> f64 {
    let gamma = grueneisen(volume, params, d);
    let theta = debye_temperature(volume, params, d);
    gamma * debye::thermal_energy(t, theta, params.n) / volume
}

fn thermal_bulk_modulus(t: f64, volume: f64, params: &ParameterSet, d: &DebyeParams) -> f64 {
    let gamma = grueneisen(volume, params, d);
    let theta = debye_temperature(volume, params, d);
    let x = theta / t;
    3.0 * params.n * GAS_CONSTANT * t / volume
        * gamma
        * ((1.0 - d.q_0 - 3.0 * gamma) * debye::debye_fn(x) + 3.0 * gamma * debye::bose_factor(x))
}

fn thermal_shear_modulus(t: f64, volume: f64, params: &ParameterSet, d: &DebyeParams) -> f64 {
    let gamma = grueneisen(volume, params, d);
    let theta = debye_temperature(volume, params, d);
    let k_th = thermal_bulk_modulus(t, volume, params, d);
    0.6 * (k_th - 6.0 * GAS_CONSTANT * t * params.n / volume * gamma * debye::debye_fn(theta / t))
}

impl EquationOfState for MieGrueneisenDebye {
    fn name(&self) -> &'static str {
        match self.order {
            ShearOrder::Second => "mgd2",
            ShearOrder::Third => "mgd3",
        }
    }

    fn check_params(&self, params: &ParameterSet) -> EosResult<()> {
        params.validate()?;
        self.debye(params)?;
        Ok(())
    }

    fn volume(&self, pressure: f64, temperature: f64, params: &ParameterSet) -> EosResult<f64> {
        check_temperature(temperature)?;
        let d = self.debye(params)?;
        let t_0 = REFERENCE_TEMPERATURE_K;
        solve_volume(
            |v| {
                Ok(bm::pressure(v, params) + thermal_pressure(temperature, v, params, &d)
                    - thermal_pressure(t_0, v, params, &d)
                    - pressure)
            },
            params.v_0,
            &self.root,
        )
    }

    fn isothermal_bulk_modulus(
        &self,
        _pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        check_temperature(temperature)?;
        check_volume(volume)?;
        let d = self.debye(params)?;
        let k_t = bm::bulk_modulus(volume, params)
            + thermal_bulk_modulus(temperature, volume, params, &d)
            - thermal_bulk_modulus(REFERENCE_TEMPERATURE_K, volume, params, &d);
        finite_output(k_t, "isothermal bulk modulus")
    }

    fn adiabatic_bulk_modulus(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        let k_t = self.isothermal_bulk_modulus(pressure, temperature, volume, params)?;
        let alpha = self.thermal_expansivity(pressure, temperature, volume, params)?;
        let gamma = self.grueneisen_parameter(pressure, temperature, volume, params)?;
        finite_output(k_t * (1.0 + gamma * alpha * temperature), "adiabatic bulk modulus")
    }

    fn shear_modulus(
        &self,
        _pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        check_temperature(temperature)?;
        check_volume(volume)?;
        let d = self.debye(params)?;
        let cold = bm::shear_modulus(self.order, volume, params, self.name())?;
        let g = cold + thermal_shear_modulus(temperature, volume, params, &d)
            - thermal_shear_modulus(REFERENCE_TEMPERATURE_K, volume, params, &d);
        finite_output(g, "shear modulus")
    }

    fn heat_capacity_v(
        &self,
        _pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        check_temperature(temperature)?;
        check_volume(volume)?;
        let d = self.debye(params)?;
        let theta = debye_temperature(volume, params, &d);
        Ok(debye::heat_capacity_v(temperature, theta, params.n))
    }

    fn heat_capacity_p(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        let c_v = self.heat_capacity_v(pressure, temperature, volume, params)?;
        let alpha = self.thermal_expansivity(pressure, temperature, volume, params)?;
        let gamma = self.grueneisen_parameter(pressure, temperature, volume, params)?;
        Ok(c_v * (1.0 + gamma * alpha * temperature))
    }

    fn thermal_expansivity(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        let c_v = self.heat_capacity_v(pressure, temperature, volume, params)?;
        let gamma = self.grueneisen_parameter(pressure, temperature, volume, params)?;
        let k_t = self.isothermal_bulk_modulus(pressure, temperature, volume, params)?;
        finite_output(gamma * c_v / (k_t * volume), "thermal expansivity")
    }

    fn grueneisen_parameter(
        &self,
        _pressure: f64,
        _temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        check_volume(volume)?;
        let d = self.debye(params)?;
        Ok(grueneisen(volume, params, &d))
    }
}
