//! Temperature as a function of pressure.

use crate::error::{ProfileError, ProfileResult};
use sf_core::{interp_sorted, is_strictly_increasing};
use sf_minerals::{Material, MaterialResult};

/// Maps a pressure profile to temperatures.
///
/// The rock is passed for formulations that depend on its thermodynamics;
/// implementations must not keep state from it.
pub trait Geotherm: Send + Sync {
    fn temperatures(&self, pressures: &[f64], rock: &Material) -> ProfileResult<Vec<f64>>;
}

/// Temperature linear in pressure through two anchor points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGeotherm {
    p_0: f64,
    t_0: f64,
    gradient: f64,
}

impl LinearGeotherm {
    /// Line through (p_0, t_0) and (p_1, t_1), pressures in Pa.
    pub fn through(p_0: f64, t_0: f64, p_1: f64, t_1: f64) -> ProfileResult<Self> {
        if p_1 == p_0 {
            return Err(ProfileError::InvalidArg {
                what: "linear geotherm anchors share a pressure",
            });
        }
        Ok(Self {
            p_0,
            t_0,
            gradient: (t_1 - t_0) / (p_1 - p_0),
        })
    }

    /// Constant temperature.
    pub fn isothermal(t: f64) -> Self {
        Self {
            p_0: 0.0,
            t_0: t,
            gradient: 0.0,
        }
    }
}

impl Geotherm for LinearGeotherm {
    fn temperatures(&self, pressures: &[f64], _rock: &Material) -> ProfileResult<Vec<f64>> {
        Ok(pressures
            .iter()
            .map(|p| self.t_0 + self.gradient * (p - self.p_0))
            .collect())
    }
}

/// Piecewise-linear (P, T) table; pressures outside the table are rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGeotherm {
    pressures: Vec<f64>,
    temperatures: Vec<f64>,
}

impl TableGeotherm {
    pub fn new(pressures: Vec<f64>, temperatures: Vec<f64>) -> ProfileResult<Self> {
        if pressures.len() != temperatures.len() || pressures.is_empty() {
            return Err(ProfileError::table(format!(
                "geotherm table has {} pressures and {} temperatures",
                pressures.len(),
                temperatures.len()
            )));
        }
        if !is_strictly_increasing(&pressures) {
            return Err(ProfileError::table("geotherm pressures must be strictly increasing"));
        }
        Ok(Self {
            pressures,
            temperatures,
        })
    }
}

impl Geotherm for TableGeotherm {
    fn temperatures(&self, pressures: &[f64], _rock: &Material) -> ProfileResult<Vec<f64>> {
        pressures
            .iter()
            .map(|&p| Ok(interp_sorted(&self.pressures, &self.temperatures, p)?))
            .collect()
    }
}

/// Isentrope of the rock itself, anchored at the first pressure.
///
/// Integrates dT/dP = T Σ(fᵢ γᵢ C_p,ᵢ / K_S,ᵢ) / Σ(fᵢ C_p,ᵢ) with classical
/// RK4, `substeps` steps between consecutive output pressures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdiabaticGeotherm {
    pub anchor_temperature: f64,
    pub substeps: usize,
}

impl AdiabaticGeotherm {
    pub const DEFAULT_SUBSTEPS: usize = 4;

    pub fn new(anchor_temperature: f64) -> Self {
        Self {
            anchor_temperature,
            substeps: Self::DEFAULT_SUBSTEPS,
        }
    }

    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps;
        self
    }
}

/// Adiabatic gradient dT/dP [K/Pa] of `rock` at (P, T).
pub fn adiabatic_gradient(rock: &mut Material, pressure: f64, temperature: f64) -> MaterialResult<f64> {
    rock.set_state_si(pressure, temperature)?;
    let mut top = 0.0;
    let mut bottom = 0.0;
    for (fraction, mineral) in rock.unroll()? {
        let gamma = mineral.grueneisen_parameter()?;
        let k_s = mineral.adiabatic_bulk_modulus()?;
        let c_p = mineral.heat_capacity_p()?;
        top += fraction * gamma * c_p / k_s;
        bottom += fraction * c_p;
    }
    Ok(temperature * top / bottom)
}

impl Geotherm for AdiabaticGeotherm {
    fn temperatures(&self, pressures: &[f64], rock: &Material) -> ProfileResult<Vec<f64>> {
        if self.substeps == 0 {
            return Err(ProfileError::InvalidArg {
                what: "adiabatic geotherm needs at least one substep",
            });
        }
        let Some(&first) = pressures.first() else {
            return Ok(Vec::new());
        };
        let mut rock = rock.clone();
        let mut rhs = |p: f64, t: f64| adiabatic_gradient(&mut rock, p, t);

        let mut out = Vec::with_capacity(pressures.len());
        let mut t = self.anchor_temperature;
        let mut p = first;
        out.push(t);
        for &target in &pressures[1..] {
            let h = (target - p) / self.substeps as f64;
            for _ in 0..self.substeps {
                let k1 = rhs(p, t)?;
                let k2 = rhs(p + 0.5 * h, t + 0.5 * h * k1)?;
                let k3 = rhs(p + 0.5 * h, t + 0.5 * h * k2)?;
                let k4 = rhs(p + h, t + h * k3)?;
                t += h / 6.0 * (k1 + 2.0 * k2 + 2.0 * k3 + k4);
                p += h;
            }
            p = target;
            out.push(t);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_eos::{EosMethod, ParameterSet};
    use sf_minerals::{Mineral, catalog};

    fn cold_rock() -> Material {
        Mineral::new(
            "periclase",
            ParameterSet::new(11.24e-6, 161.0e9, 3.8, 0.0403, 2.0).with_method(EosMethod::Bm3),
        )
        .into()
    }

    #[test]
    fn linear_through_two_points() {
        let g = LinearGeotherm::through(0.0, 300.0, 100.0e9, 2300.0).unwrap();
        let t = g.temperatures(&[0.0, 50.0e9, 100.0e9], &cold_rock()).unwrap();
        assert_eq!(t, vec![300.0, 1300.0, 2300.0]);
        assert!(LinearGeotherm::through(1.0, 300.0, 1.0, 400.0).is_err());
    }

    #[test]
    fn table_interpolates_and_rejects_outside() {
        let g = TableGeotherm::new(vec![0.0, 10.0e9], vec![1000.0, 2000.0]).unwrap();
        let t = g.temperatures(&[5.0e9], &cold_rock()).unwrap();
        assert_eq!(t, vec![1500.0]);
        assert!(g.temperatures(&[20.0e9], &cold_rock()).is_err());
        assert!(TableGeotherm::new(vec![1.0, 0.0], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn isothermal_rock_stays_at_anchor() {
        // Birch–Murnaghan has zero Grüneisen parameter
        let g = AdiabaticGeotherm::new(1600.0);
        let t = g.temperatures(&[25.0e9, 50.0e9, 75.0e9], &cold_rock()).unwrap();
        assert_eq!(t, vec![1600.0; 3]);
    }

    #[test]
    fn mantle_adiabat_heats_with_depth() {
        let rock = catalog::lookup("mg_perovskite").unwrap();
        let pressures = [25.0e9, 50.0e9, 75.0e9, 100.0e9, 125.0e9];
        let t = AdiabaticGeotherm::new(1900.0).temperatures(&pressures, &rock).unwrap();
        assert_eq!(t[0], 1900.0);
        for w in t.windows(2) {
            assert!(w[1] > w[0]);
        }
        // a lower-mantle adiabat gains a few hundred kelvin, not thousands
        assert!(t[4] - t[0] > 100.0 && t[4] - t[0] < 1500.0, "{t:?}");

        let fine = AdiabaticGeotherm::new(1900.0)
            .with_substeps(16)
            .temperatures(&pressures, &rock)
            .unwrap();
        assert!((fine[4] - t[4]).abs() < 0.5);
    }

    #[test]
    fn empty_pressures_give_empty_profile() {
        let t = AdiabaticGeotherm::new(1600.0).temperatures(&[], &cold_rock()).unwrap();
        assert!(t.is_empty());
    }
}
