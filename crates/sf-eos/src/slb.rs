//! Stixrude & Lithgow-Bertelloni thermal equation of state.
//!
//! Finite-strain thermodynamics with a Debye vibrational term whose
//! characteristic temperature follows the strain expansion
//! (θ/θ₀)² = 1 + a₁f + a₂f²/2. Reference temperature is T₀ = 300 K.

use crate::birch_murnaghan as bm;
use crate::debye;
use crate::eos::{EquationOfState, ShearOrder, check_temperature, check_volume, finite_output};
use crate::error::{EosError, EosResult};
use crate::params::{DebyeParams, ParameterSet};
use crate::root::{RootConfig, solve_volume};
use sf_core::units::constants::REFERENCE_TEMPERATURE_K;

#[derive(Debug, Clone)]
pub struct StixrudeLithgowBertelloni {
    order: ShearOrder,
    root: RootConfig,
}

/// Strain-dependent lattice quantities at one volume.
#[derive(Debug, Clone, Copy)]
struct Lattice {
    f: f64,
    nu_sq: f64,
    a2: f64,
    theta: f64,
    gamma: f64,
}

impl Lattice {
    fn at(volume: f64, params: &ParameterSet, d: &DebyeParams) -> EosResult<Self> {
        let f = bm::eulerian_strain(params.v_0 / volume);
        let a1 = 6.0 * d.grueneisen_0;
        let a2 = -12.0 * d.grueneisen_0 + 36.0 * d.grueneisen_0.powi(2)
            - 18.0 * d.q_0 * d.grueneisen_0;
        let nu_sq = 1.0 + a1 * f + 0.5 * a2 * f * f;
        if !(nu_sq > 0.0) {
            return Err(EosError::NonPhysical {
                what: "squared Debye frequency ratio",
                value: nu_sq,
            });
        }
        let theta = d.debye_0 * nu_sq.sqrt();
        let gamma = (2.0 * f + 1.0) * (a1 + a2 * f) / (6.0 * nu_sq);
        Ok(Self {
            f,
            nu_sq,
            a2,
            theta,
            gamma,
        })
    }

    /// γ (γ + 1 − q), written without dividing by γ so γ = 0 stays finite.
    fn gamma_times_one_plus_gamma_minus_q(&self) -> f64 {
        let g = self.gamma;
        let strain = (2.0 * self.f + 1.0).powi(2);
        g * (g + 1.0) - (18.0 * g * g - 6.0 * g - 0.5 / self.nu_sq * strain * self.a2) / 9.0
    }

    /// Shear strain derivative of γ, η_S.
    fn eta_s(&self, d: &DebyeParams, eta_s_0: f64) -> f64 {
        let a2s = -2.0 * d.grueneisen_0 - 2.0 * eta_s_0;
        -self.gamma - 0.5 / self.nu_sq * (2.0 * self.f + 1.0).powi(2) * a2s
    }
}

impl StixrudeLithgowBertelloni {
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

    /// E_th(T) − E_th(T₀) at the lattice's Debye temperature.
    fn excess_thermal_energy(&self, t: f64, lattice: &Lattice, params: &ParameterSet) -> f64 {
        debye::thermal_energy(t, lattice.theta, params.n)
            - debye::thermal_energy(REFERENCE_TEMPERATURE_K, lattice.theta, params.n)
    }
}

impl EquationOfState for StixrudeLithgowBertelloni {
    fn name(&self) -> &'static str {
        match self.order {
            ShearOrder::Second => "slb2",
            ShearOrder::Third => "slb3",
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
        let b_iikk = 9.0 * params.k_0;
        let b_iikkmm = 27.0 * params.k_0 * (params.kprime_0 - 4.0);
        solve_volume(
            |v| {
                let lattice = Lattice::at(v, params, &d)?;
                let f = lattice.f;
                let cold = (1.0 / 3.0)
                    * (1.0 + 2.0 * f).powf(2.5)
                    * (b_iikk * f + 0.5 * b_iikkmm * f * f);
                let thermal =
                    lattice.gamma * self.excess_thermal_energy(temperature, &lattice, params) / v;
                Ok(cold + thermal - pressure)
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
        let lattice = Lattice::at(volume, params, &d)?;
        let t_0 = REFERENCE_TEMPERATURE_K;
        let c_v = debye::heat_capacity_v(temperature, lattice.theta, params.n);
        let c_v_ref = debye::heat_capacity_v(t_0, lattice.theta, params.n);
        let k_t = bm::bulk_modulus(volume, params)
            + lattice.gamma_times_one_plus_gamma_minus_q() / volume
                * self.excess_thermal_energy(temperature, &lattice, params)
            - lattice.gamma.powi(2) / volume * (c_v * temperature - c_v_ref * t_0);
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
        let eta_s_0 = params.eta_s(self.name())?;
        let lattice = Lattice::at(volume, params, &d)?;
        let cold = bm::shear_modulus(self.order, volume, params, self.name())?;
        let g = cold
            - lattice.eta_s(&d, eta_s_0) * self.excess_thermal_energy(temperature, &lattice, params)
                / volume;
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
        let lattice = Lattice::at(volume, params, &d)?;
        Ok(debye::heat_capacity_v(temperature, lattice.theta, params.n))
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
        Ok(Lattice::at(volume, params, &d)?.gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periclase() -> ParameterSet {
        ParameterSet::new(11.24e-6, 161.0e9, 3.8, 0.0403, 2.0)
            .with_shear(131.0e9, 2.1)
            .with_debye(773.0, 1.5, 1.5)
            .with_eta_s(2.8)
    }

    #[test]
    fn reference_state_is_recovered() {
        let p = periclase();
        let eos = StixrudeLithgowBertelloni::third_order();
        let v = eos.volume(0.0, 300.0, &p).unwrap();
        assert!((v - p.v_0).abs() / p.v_0 < 1e-10);
        let k = eos.isothermal_bulk_modulus(0.0, 300.0, v, &p).unwrap();
        assert!((k - p.k_0).abs() / p.k_0 < 1e-8);
        let g = eos.shear_modulus(0.0, 300.0, v, &p).unwrap();
        assert!((g - 131.0e9).abs() / 131.0e9 < 1e-8);
        let gamma = eos.grueneisen_parameter(0.0, 300.0, v, &p).unwrap();
        assert!((gamma - 1.5).abs() < 1e-8);
    }

    #[test]
    fn heating_expands_and_softens_shear() {
        let p = periclase();
        let eos = StixrudeLithgowBertelloni::second_order();
        let v_cold = eos.volume(25.0e9, 300.0, &p).unwrap();
        let v_hot = eos.volume(25.0e9, 2000.0, &p).unwrap();
        assert!(v_hot > v_cold);
        let g_cold = eos.shear_modulus(25.0e9, 300.0, v_cold, &p).unwrap();
        let g_hot = eos.shear_modulus(25.0e9, 2000.0, v_hot, &p).unwrap();
        assert!(g_hot < g_cold);
    }

    #[test]
    fn zero_grueneisen_stays_finite() {
        let p = ParameterSet::new(11.24e-6, 161.0e9, 3.8, 0.0403, 2.0)
            .with_shear(131.0e9, 2.1)
            .with_debye(773.0, 0.0, 1.0)
            .with_eta_s(0.0);
        let eos = StixrudeLithgowBertelloni::third_order();
        let v = eos.volume(10.0e9, 1500.0, &p).unwrap();
        let k = eos.isothermal_bulk_modulus(10.0e9, 1500.0, v, &p).unwrap();
        assert!(k.is_finite() && k > 0.0);
        assert_eq!(eos.thermal_expansivity(10.0e9, 1500.0, v, &p).unwrap(), 0.0);
    }

    #[test]
    fn eta_s_is_required_for_shear() {
        let p = ParameterSet::new(11.24e-6, 161.0e9, 3.8, 0.0403, 2.0)
            .with_shear(131.0e9, 2.1)
            .with_debye(773.0, 1.5, 1.5);
        let eos = StixrudeLithgowBertelloni::third_order();
        eos.check_params(&p).unwrap();
        let v = eos.volume(10.0e9, 1000.0, &p).unwrap();
        let err = eos.shear_modulus(10.0e9, 1000.0, v, &p).unwrap_err();
        assert!(matches!(err, EosError::MissingParameter { name: "eta_s_0", .. }));
    }

    #[test]
    fn thermal_consistency_of_heat_capacities() {
        let p = periclase();
        let eos = StixrudeLithgowBertelloni::third_order();
        let (pr, t) = (60.0e9, 2500.0);
        let v = eos.volume(pr, t, &p).unwrap();
        let k_t = eos.isothermal_bulk_modulus(pr, t, v, &p).unwrap();
        let k_s = eos.adiabatic_bulk_modulus(pr, t, v, &p).unwrap();
        let c_v = eos.heat_capacity_v(pr, t, v, &p).unwrap();
        let c_p = eos.heat_capacity_p(pr, t, v, &p).unwrap();
        assert!(k_s > k_t);
        assert!((k_s / k_t - c_p / c_v).abs() < 1e-12);
    }
}
