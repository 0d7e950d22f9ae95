//! Seismic reference models consulted by the solver and for comparison.

use crate::error::{ProfileError, ProfileResult};
use serde::{Deserialize, Serialize};
use sf_core::{cumtrapz, interp_sorted, is_strictly_increasing};

/// Reference quantities sampled at a set of depths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSamples {
    /// Pressure [Pa]
    pub pressure: Vec<f64>,
    /// Density [kg/m³]
    pub density: Vec<f64>,
    pub v_p: Vec<f64>,
    pub v_s: Vec<f64>,
    pub v_phi: Vec<f64>,
}

/// Read-only view of a reference Earth model.
pub trait ReferenceModel: Send + Sync {
    /// Pressure, density and velocities at each depth [m].
    fn evaluate_all_at(&self, depths: &[f64]) -> ProfileResult<ReferenceSamples>;

    /// Gravitational acceleration [m/s²] at each depth [m].
    fn grav(&self, depths: &[f64]) -> ProfileResult<Vec<f64>>;

    /// Gravitational acceleration [m/s²] where the model reaches each
    /// pressure [Pa].
    fn grav_at_pressures(&self, pressures: &[f64]) -> ProfileResult<Vec<f64>>;

    /// Depth [m] at which the model reaches `pressure` [Pa].
    fn depth(&self, pressure: f64) -> ProfileResult<f64>;
}

/// Gravity profile of a tabulated model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gravity {
    /// Same acceleration at every depth [m/s²].
    Constant(f64),
    /// Acceleration at each table depth [m/s²].
    Tabulated(Vec<f64>),
}

/// Depth-indexed reference table with linear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedReference {
    depth: Vec<f64>,
    pressure: Vec<f64>,
    density: Vec<f64>,
    v_p: Vec<f64>,
    v_s: Vec<f64>,
    gravity: Gravity,
}

impl TabulatedReference {
    /// Build a table. Depths and pressures must both be strictly increasing
    /// so depth ↔ pressure lookups are unambiguous.
    pub fn new(
        depth: Vec<f64>,
        pressure: Vec<f64>,
        density: Vec<f64>,
        v_p: Vec<f64>,
        v_s: Vec<f64>,
        gravity: Gravity,
    ) -> ProfileResult<Self> {
        let n = depth.len();
        if n < 2 {
            return Err(ProfileError::table("reference needs at least two depths"));
        }
        for (what, len) in [
            ("pressure", pressure.len()),
            ("density", density.len()),
            ("v_p", v_p.len()),
            ("v_s", v_s.len()),
        ] {
            if len != n {
                return Err(ProfileError::table(format!(
                    "reference column {what} has {len} rows, expected {n}"
                )));
            }
        }
        match &gravity {
            Gravity::Constant(g) if !(g.is_finite() && *g > 0.0) => {
                return Err(ProfileError::table(format!("gravity must be positive, got {g}")));
            }
            Gravity::Tabulated(g) if g.len() != n => {
                return Err(ProfileError::table(format!(
                    "reference column gravity has {} rows, expected {n}",
                    g.len()
                )));
            }
            _ => {}
        }
        if !is_strictly_increasing(&depth) {
            return Err(ProfileError::table("reference depths must be strictly increasing"));
        }
        if !is_strictly_increasing(&pressure) {
            return Err(ProfileError::table("reference pressures must be strictly increasing"));
        }
        if let Some(row) = v_p
            .iter()
            .zip(&v_s)
            .position(|(vp, vs)| vp * vp < 4.0 / 3.0 * vs * vs)
        {
            return Err(ProfileError::table(format!(
                "reference row {row} has v_p {} below sqrt(4/3) v_s {}",
                v_p[row], v_s[row]
            )));
        }
        Ok(Self {
            depth,
            pressure,
            density,
            v_p,
            v_s,
            gravity,
        })
    }

    /// Build a table whose pressures follow hydrostatic equilibrium,
    /// P(z) = P_surface + ∫ ρ g dz, under constant gravity `g`.
    pub fn hydrostatic(
        depth: Vec<f64>,
        density: Vec<f64>,
        v_p: Vec<f64>,
        v_s: Vec<f64>,
        g: f64,
        surface_pressure: f64,
    ) -> ProfileResult<Self> {
        let load: Vec<f64> = density.iter().map(|rho| rho * g).collect();
        let pressure = cumtrapz(&depth, &load)?
            .into_iter()
            .map(|p| surface_pressure + p)
            .collect();
        Self::new(depth, pressure, density, v_p, v_s, Gravity::Constant(g))
    }

    pub fn depths(&self) -> &[f64] {
        &self.depth
    }

    pub fn pressures(&self) -> &[f64] {
        &self.pressure
    }

    fn column(&self, column: &[f64], depths: &[f64]) -> ProfileResult<Vec<f64>> {
        depths
            .iter()
            .map(|&z| Ok(interp_sorted(&self.depth, column, z)?))
            .collect()
    }
}

impl ReferenceModel for TabulatedReference {
    fn evaluate_all_at(&self, depths: &[f64]) -> ProfileResult<ReferenceSamples> {
        let v_p = self.column(&self.v_p, depths)?;
        let v_s = self.column(&self.v_s, depths)?;
        let v_phi = v_p
            .iter()
            .zip(&v_s)
            .map(|(vp, vs)| (vp * vp - 4.0 / 3.0 * vs * vs).sqrt())
            .collect();
        Ok(ReferenceSamples {
            pressure: self.column(&self.pressure, depths)?,
            density: self.column(&self.density, depths)?,
            v_p,
            v_s,
            v_phi,
        })
    }

    fn grav(&self, depths: &[f64]) -> ProfileResult<Vec<f64>> {
        match &self.gravity {
            Gravity::Constant(g) => Ok(vec![*g; depths.len()]),
            Gravity::Tabulated(g) => self.column(g, depths),
        }
    }

    fn grav_at_pressures(&self, pressures: &[f64]) -> ProfileResult<Vec<f64>> {
        match &self.gravity {
            Gravity::Constant(g) => Ok(vec![*g; pressures.len()]),
            Gravity::Tabulated(g) => pressures
                .iter()
                .map(|&p| Ok(interp_sorted(&self.pressure, g, p)?))
                .collect(),
        }
    }

    fn depth(&self, pressure: f64) -> ProfileResult<f64> {
        Ok(interp_sorted(&self.pressure, &self.depth, pressure)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::ErrorKind;

    fn table() -> TabulatedReference {
        TabulatedReference::hydrostatic(
            vec![0.0, 1000.0e3, 2000.0e3],
            vec![4000.0, 5000.0, 5500.0],
            vec![11_000.0, 12_000.0, 13_000.0],
            vec![6_000.0, 6_500.0, 7_000.0],
            10.0,
            0.0,
        )
        .unwrap()
    }

    #[test]
    fn hydrostatic_pressures() {
        let t = table();
        // 1000 km at mean density 4500 and g = 10
        assert!((t.pressures()[1] - 45.0e9).abs() < 1.0);
        assert!((t.pressures()[2] - 97.5e9).abs() < 1.0);
    }

    #[test]
    fn depth_pressure_inverse() {
        let t = table();
        let s = t.evaluate_all_at(&[500.0e3]).unwrap();
        let z = t.depth(s.pressure[0]).unwrap();
        assert!((z - 500.0e3).abs() < 1e-6);
    }

    #[test]
    fn bulk_sound_from_vp_vs() {
        let t = table();
        let s = t.evaluate_all_at(&[0.0]).unwrap();
        let expected = (11_000.0_f64.powi(2) - 4.0 / 3.0 * 6_000.0_f64.powi(2)).sqrt();
        assert!((s.v_phi[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn outside_table_is_rejected() {
        let t = table();
        let err = t.evaluate_all_at(&[3000.0e3]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(t.depth(-1.0).is_err());
    }

    #[test]
    fn tabulated_gravity_interpolates() {
        let t = TabulatedReference::new(
            vec![0.0, 100.0],
            vec![0.0, 1.0e6],
            vec![3000.0; 2],
            vec![8000.0; 2],
            vec![4500.0; 2],
            Gravity::Tabulated(vec![9.8, 10.0]),
        )
        .unwrap();
        let g = t.grav(&[50.0]).unwrap();
        assert!((g[0] - 9.9).abs() < 1e-12);
    }

    #[test]
    fn gravity_at_pressure() {
        let t = TabulatedReference::new(
            vec![0.0, 100.0],
            vec![0.0, 1.0e6],
            vec![3000.0; 2],
            vec![8000.0; 2],
            vec![4500.0; 2],
            Gravity::Tabulated(vec![9.8, 10.0]),
        )
        .unwrap();
        let g = t.grav_at_pressures(&[0.5e6]).unwrap();
        assert!((g[0] - 9.9).abs() < 1e-12);
        assert!(t.grav_at_pressures(&[2.0e6]).is_err());

        // constant gravity needs no lookup, even past the end of the table
        let g = table().grav_at_pressures(&[0.0, 500.0e9]).unwrap();
        assert_eq!(g, vec![10.0, 10.0]);
    }

    #[test]
    fn shear_faster_than_compression_is_rejected() {
        let err = TabulatedReference::new(
            vec![0.0, 100.0],
            vec![0.0, 1.0e6],
            vec![3000.0; 2],
            vec![8000.0, 5000.0],
            vec![4500.0; 2],
            Gravity::Constant(9.8),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("row 1"), "{err}");
    }

    #[test]
    fn malformed_tables_are_rejected() {
        assert!(TabulatedReference::new(
            vec![0.0, 100.0],
            vec![0.0],
            vec![3000.0; 2],
            vec![8000.0; 2],
            vec![4500.0; 2],
            Gravity::Constant(9.8),
        )
        .is_err());
        assert!(TabulatedReference::new(
            vec![100.0, 0.0],
            vec![0.0, 1.0e6],
            vec![3000.0; 2],
            vec![8000.0; 2],
            vec![4500.0; 2],
            Gravity::Constant(9.8),
        )
        .is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn depth_inverts_pressure(
            densities in prop::collection::vec(2500.0_f64..13_000.0, 2..20),
            frac in 0.0_f64..0.999,
        ) {
            let n = densities.len();
            let depth: Vec<f64> = (0..n).map(|i| i as f64 * 100.0e3).collect();
            let t = TabulatedReference::hydrostatic(
                depth.clone(),
                densities,
                vec![10_000.0; n],
                vec![5_000.0; n],
                9.8,
                1.0e5,
            )
            .unwrap();
            let z = frac * depth[n - 1];
            let p = t.evaluate_all_at(&[z]).unwrap().pressure[0];
            prop_assert!((t.depth(p).unwrap() - z).abs() < 1e-3);
        }
    }
}
