//! Isothermal third-order Birch–Murnaghan equation of state.
//!
//! The cold-compression curve here is shared by the thermal formulations:
//! MGD and SLB add thermal pressure and thermal moduli on top of it.

use crate::eos::{EquationOfState, ShearOrder, check_volume, finite_output};
use crate::error::EosResult;
use crate::params::ParameterSet;
use crate::root::{RootConfig, solve_volume};
use sf_core::units::constants::GAS_CONSTANT;

/// Eulerian finite strain f = ((V₀/V)^(2/3) − 1)/2 for compression x = V₀/V.
#[inline]
pub fn eulerian_strain(x: f64) -> f64 {
    0.5 * (x.powf(2.0 / 3.0) - 1.0)
}

/// Third-order BM pressure [Pa] at molar volume `volume`.
pub fn pressure(volume: f64, params: &ParameterSet) -> f64 {
    let x = params.v_0 / volume;
    1.5 * params.k_0
        * (x.powf(7.0 / 3.0) - x.powf(5.0 / 3.0))
        * (1.0 + 0.75 * (params.kprime_0 - 4.0) * (x.powf(2.0 / 3.0) - 1.0))
}

/// Third-order BM isothermal bulk modulus [Pa] at molar volume `volume`.
pub fn bulk_modulus(volume: f64, params: &ParameterSet) -> f64 {
    let f = eulerian_strain(params.v_0 / volume);
    let k_0 = params.k_0;
    let kp = params.kprime_0;
    (1.0 + 2.0 * f).powf(2.5)
        * (k_0 + (3.0 * k_0 * kp - 5.0 * k_0) * f + 13.5 * (k_0 * kp - 4.0 * k_0) * f * f)
}

/// Finite-strain shear modulus [Pa], truncated at second order in f.
pub fn shear_modulus_second_order(volume: f64, params: &ParameterSet, g_0: f64, gprime_0: f64) -> f64 {
    let f = eulerian_strain(params.v_0 / volume);
    (1.0 + 2.0 * f).powf(2.5) * (g_0 + (3.0 * params.k_0 * gprime_0 - 5.0 * g_0) * f)
}

/// Finite-strain shear modulus [Pa], truncated at third order in f.
pub fn shear_modulus_third_order(volume: f64, params: &ParameterSet, g_0: f64, gprime_0: f64) -> f64 {
    let f = eulerian_strain(params.v_0 / volume);
    let k_0 = params.k_0;
    (1.0 + 2.0 * f).powf(2.5)
        * (g_0
            + (3.0 * k_0 * gprime_0 - 5.0 * g_0) * f
            + (6.0 * k_0 * gprime_0 - 24.0 * k_0 - 14.0 * g_0 + 4.5 * k_0 * params.kprime_0)
                * f
                * f)
}

/// Cold shear modulus at `volume` for the requested truncation order.
pub fn shear_modulus(
    order: ShearOrder,
    volume: f64,
    params: &ParameterSet,
    method: &'static str,
) -> EosResult<f64> {
    let (g_0, gprime_0) = params.shear(method)?;
    Ok(match order {
        ShearOrder::Second => shear_modulus_second_order(volume, params, g_0, gprime_0),
        ShearOrder::Third => shear_modulus_third_order(volume, params, g_0, gprime_0),
    })
}

/// Temperature-independent Birch–Murnaghan formulation.
///
/// Temperature is accepted but ignored; the adiabatic and isothermal bulk
/// moduli coincide, thermal expansivity and the Grüneisen parameter are zero,
/// and the heat capacity is the Dulong–Petit limit 3nR.
#[derive(Debug, Clone)]
pub struct BirchMurnaghan {
    order: ShearOrder,
    root: RootConfig,
}

impl BirchMurnaghan {
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

    pub fn order(&self) -> ShearOrder {
        self.order
    }
}

impl EquationOfState for BirchMurnaghan {
    fn name(&self) -> &'static str {
        match self.order {
            ShearOrder::Second => "bm2",
            ShearOrder::Third => "bm3",
        }
    }

    fn check_params(&self, params: &ParameterSet) -> EosResult<()> {
        params.validate()
    }

    fn volume(&self, pressure: f64, _temperature: f64, params: &ParameterSet) -> EosResult<f64> {
        solve_volume(|v| Ok(self::pressure(v, params) - pressure), params.v_0, &self.root)
    }

    fn isothermal_bulk_modulus(
        &self,
        _pressure: f64,
        _temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        check_volume(volume)?;
        finite_output(bulk_modulus(volume, params), "isothermal bulk modulus")
    }

    fn adiabatic_bulk_modulus(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        self.isothermal_bulk_modulus(pressure, temperature, volume, params)
    }

    fn shear_modulus(
        &self,
        _pressure: f64,
        _temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        check_volume(volume)?;
        let g = shear_modulus(self.order, volume, params, self.name())?;
        finite_output(g, "shear modulus")
    }

    fn heat_capacity_v(
        &self,
        _pressure: f64,
        _temperature: f64,
        _volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        Ok(3.0 * params.n * GAS_CONSTANT)
    }

    fn heat_capacity_p(
        &self,
        pressure: f64,
        temperature: f64,
        volume: f64,
        params: &ParameterSet,
    ) -> EosResult<f64> {
        self.heat_capacity_v(pressure, temperature, volume, params)
    }

    fn thermal_expansivity(
        &self,
        _pressure: f64,
        _temperature: f64,
        _volume: f64,
        _params: &ParameterSet,
    ) -> EosResult<f64> {
        Ok(0.0)
    }

    fn grueneisen_parameter(
        &self,
        _pressure: f64,
        _temperature: f64,
        _volume: f64,
        _params: &ParameterSet,
    ) -> EosResult<f64> {
        Ok(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn periclase() -> ParameterSet {
        ParameterSet::new(11.24e-6, 161.0e9, 3.8, 0.0403, 2.0).with_shear(131.0e9, 2.1)
    }

    #[test]
    fn reference_state_is_recovered() {
        let p = periclase();
        let eos = BirchMurnaghan::third_order();
        let v = eos.volume(0.0, 300.0, &p).unwrap();
        assert!((v - p.v_0).abs() / p.v_0 < 1e-10);
        let k = eos.isothermal_bulk_modulus(0.0, 300.0, v, &p).unwrap();
        assert!((k - p.k_0).abs() / p.k_0 < 1e-8);
        let g = eos.shear_modulus(0.0, 300.0, v, &p).unwrap();
        assert!((g - 131.0e9).abs() / 131.0e9 < 1e-8);
    }

    #[test]
    fn volume_inverts_pressure() {
        let p = periclase();
        let eos = BirchMurnaghan::third_order();
        let target = 50.0e9;
        let v = eos.volume(target, 0.0, &p).unwrap();
        assert!((pressure(v, &p) - target).abs() / target < 1e-9);
    }

    #[test]
    fn second_order_shear_is_truncation_of_third() {
        // Both truncations agree to first order in strain.
        let p = periclase();
        let v = p.v_0 * 0.999;
        let g2 = shear_modulus_second_order(v, &p, 131.0e9, 2.1);
        let g3 = shear_modulus_third_order(v, &p, 131.0e9, 2.1);
        assert!((g2 - g3).abs() / g3 < 1e-4);
    }

    #[test]
    fn kprime_four_reduces_to_second_order_pressure() {
        let mut p = periclase();
        p.kprime_0 = 4.0;
        let v = p.v_0 * 0.8;
        let x: f64 = p.v_0 / v;
        let expected = 1.5 * p.k_0 * (x.powf(7.0 / 3.0) - x.powf(5.0 / 3.0));
        assert!((pressure(v, &p) - expected).abs() / expected < 1e-14);
    }

    #[test]
    fn missing_shear_parameters_only_fail_shear_queries() {
        let p = ParameterSet::new(11.24e-6, 161.0e9, 3.8, 0.0403, 2.0);
        let eos = BirchMurnaghan::third_order();
        eos.check_params(&p).unwrap();
        let v = eos.volume(10.0e9, 300.0, &p).unwrap();
        assert!(eos.isothermal_bulk_modulus(10.0e9, 300.0, v, &p).is_ok());
        assert!(matches!(
            eos.shear_modulus(10.0e9, 300.0, v, &p),
            Err(crate::EosError::MissingParameter { name: "g_0", .. })
        ));
    }

    #[test]
    fn temperature_is_ignored() {
        let p = periclase();
        let eos = BirchMurnaghan::second_order();
        let cold = eos.volume(20.0e9, 300.0, &p).unwrap();
        let hot = eos.volume(20.0e9, 3000.0, &p).unwrap();
        assert_eq!(cold, hot);
        assert_eq!(eos.thermal_expansivity(0.0, 3000.0, cold, &p).unwrap(), 0.0);
    }
}
