//! Self-consistent pressure and depth profiles for a rock column.
//!
//! Pressure at depth follows from hydrostatic equilibrium,
//! P(z) = P(z₀) + ∫ g ρ dz, where the density depends on the pressure
//! through the rock's equation of state and the geotherm. The two are
//! iterated to a fixed point.

use crate::error::{ProfileError, ProfileResult};
use crate::geotherm::Geotherm;
use crate::profile::Profile;
use crate::reference::ReferenceModel;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use sf_core::{cumtrapz, is_strictly_increasing};
use sf_minerals::Material;
use sf_seismic::{densities_from_rock, nrmse};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Stop once the nrmse between successive pressure profiles drops below this.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-6,
            max_iterations: 100,
        }
    }
}

impl SolverConfig {
    fn validate(&self) -> ProfileResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ProfileError::InvalidArg {
                what: "solver tolerance must be positive",
            });
        }
        if self.max_iterations == 0 {
            return Err(ProfileError::InvalidArg {
                what: "solver needs at least one iteration",
            });
        }
        Ok(())
    }
}

/// Depths [m] at which `rock` reaches `pressures` along `temperatures`.
///
/// The top of the column sits at the reference depth of the first pressure.
/// Gravity is sampled from the reference by pressure, so only that anchor
/// needs to fall inside the reference table.
pub fn depths_for_rock(
    rock: &Material,
    pressures: &[f64],
    temperatures: &[f64],
    reference: &dyn ReferenceModel,
) -> ProfileResult<Vec<f64>> {
    let Some(&p_0) = pressures.first() else {
        return Ok(Vec::new());
    };
    if !is_strictly_increasing(pressures) {
        return Err(ProfileError::InvalidArg {
            what: "pressures must be strictly increasing",
        });
    }
    let gravity = DVector::from_vec(reference.grav_at_pressures(pressures)?);
    let density = DVector::from_vec(densities_from_rock(rock, pressures, temperatures)?);

    let dz_dp = gravity.component_mul(&density).map(|g_rho| 1.0 / g_rho);
    let d_0 = reference.depth(p_0)?;
    let depths = cumtrapz(pressures, dz_dp.as_slice())?
        .into_iter()
        .map(|dz| d_0 + dz)
        .collect();
    Ok(depths)
}

/// Pressures [Pa] at `depths` for `rock` in hydrostatic equilibrium.
///
/// Seeds with the reference pressures, then alternates geotherm, density and
/// integration until successive profiles agree to `config.tolerance`. The
/// pressure at the first depth stays at its reference value.
pub fn pressures_for_rock(
    rock: &Material,
    depths: &[f64],
    geotherm: &dyn Geotherm,
    reference: &dyn ReferenceModel,
    config: &SolverConfig,
) -> ProfileResult<Profile> {
    config.validate()?;
    if depths.is_empty() {
        return Err(ProfileError::InvalidArg {
            what: "depth profile is empty",
        });
    }
    if !is_strictly_increasing(depths) {
        return Err(ProfileError::InvalidArg {
            what: "depths must be strictly increasing",
        });
    }

    let mut pressure = reference.evaluate_all_at(depths)?.pressure;
    let gravity = DVector::from_vec(reference.grav(depths)?);
    let p_0 = pressure[0];

    let mut residual = f64::INFINITY;
    for iteration in 1..=config.max_iterations {
        let temperature = geotherm.temperatures(&pressure, rock)?;
        let density = DVector::from_vec(densities_from_rock(rock, &pressure, &temperature)?);
        let load = gravity.component_mul(&density);
        let next: Vec<f64> = cumtrapz(depths, load.as_slice())?
            .into_iter()
            .map(|dp| p_0 + dp)
            .collect();

        residual = nrmse(&next, &pressure)?;
        pressure = next;
        debug!(iteration, residual, "pressure iteration");

        if residual < config.tolerance {
            info!(
                iterations = iteration,
                residual,
                samples = depths.len(),
                "pressure profile converged"
            );
            let temperature = geotherm.temperatures(&pressure, rock)?;
            let density = densities_from_rock(rock, &pressure, &temperature)?;
            return Ok(Profile {
                depth: depths.to_vec(),
                pressure,
                temperature,
                density,
            });
        }
    }

    warn!(
        iterations = config.max_iterations,
        residual, "pressure profile did not converge"
    );
    Err(ProfileError::ConvergenceFailed {
        iterations: config.max_iterations,
        residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geotherm::LinearGeotherm;
    use crate::reference::TabulatedReference;
    use sf_core::{ErrorKind, linspace};
    use sf_eos::{EosMethod, ParameterSet};
    use sf_minerals::Mineral;

    fn periclase() -> Material {
        Mineral::new(
            "periclase",
            ParameterSet::new(11.24e-6, 161.0e9, 3.8, 0.0403, 2.0).with_method(EosMethod::Bm3),
        )
        .into()
    }

    fn reference() -> TabulatedReference {
        let depth = linspace(0.0, 1.0e6, 11);
        let density = depth.iter().map(|z| 3500.0 + 1.0e-3 * z).collect();
        let v_p = vec![9000.0; 11];
        let v_s = vec![5000.0; 11];
        TabulatedReference::hydrostatic(depth, density, v_p, v_s, 10.0, 0.0).unwrap()
    }

    #[test]
    fn single_iteration_cap_reports_failure() {
        let depths = linspace(0.0, 8.0e5, 9);
        let config = SolverConfig {
            tolerance: 1.0e-12,
            max_iterations: 1,
        };
        let err = pressures_for_rock(
            &periclase(),
            &depths,
            &LinearGeotherm::isothermal(300.0),
            &reference(),
            &config,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Convergence);
        assert!(matches!(err, ProfileError::ConvergenceFailed { iterations: 1, .. }));
    }

    #[test]
    fn converged_profile_is_hydrostatic() {
        let depths = linspace(0.0, 8.0e5, 9);
        let profile = pressures_for_rock(
            &periclase(),
            &depths,
            &LinearGeotherm::isothermal(300.0),
            &reference(),
            &SolverConfig::default(),
        )
        .unwrap();
        assert_eq!(profile.len(), 9);
        assert_eq!(profile.pressure[0], 0.0);
        let load: Vec<f64> = profile.density.iter().map(|rho| 10.0 * rho).collect();
        let integrated = cumtrapz(&depths, &load).unwrap();
        for (p, q) in profile.pressure.iter().zip(&integrated) {
            assert!((p - q).abs() <= 1.0e-4 * q.max(1.0e9), "{p} vs {q}");
        }
        for w in profile.density.windows(2) {
            assert!(w[1] > w[0]);
        }
    }

    #[test]
    fn rejects_bad_depths_and_config() {
        let geotherm = LinearGeotherm::isothermal(300.0);
        let config = SolverConfig::default();
        let rock = periclase();
        let reference = reference();
        assert!(pressures_for_rock(&rock, &[], &geotherm, &reference, &config).is_err());
        assert!(
            pressures_for_rock(&rock, &[2.0e5, 1.0e5], &geotherm, &reference, &config).is_err()
        );
        let zero = SolverConfig {
            max_iterations: 0,
            ..config
        };
        assert!(pressures_for_rock(&rock, &[0.0, 1.0e5], &geotherm, &reference, &zero).is_err());
    }

    #[test]
    fn dense_rock_below_light_reference_recovers_depths() {
        let depth = linspace(0.0, 1.0e6, 21);
        let light = TabulatedReference::hydrostatic(
            depth.clone(),
            vec![3000.0; 21],
            vec![9000.0; 21],
            vec![5000.0; 21],
            10.0,
            0.0,
        )
        .unwrap();
        let rock = periclase();
        let profile = pressures_for_rock(
            &rock,
            &depth,
            &LinearGeotherm::isothermal(300.0),
            &light,
            &SolverConfig::default(),
        )
        .unwrap();
        // the column runs past the deepest reference pressure
        assert!(profile.pressure[20] > light.pressures()[20]);

        let back = depths_for_rock(&rock, &profile.pressure, &profile.temperature, &light).unwrap();
        for (z, expected) in back.iter().zip(&depth) {
            assert!((z - expected).abs() < 50.0, "{z} vs {expected}");
        }
    }

    #[test]
    fn depths_require_increasing_pressure() {
        let rock = periclase();
        let err = depths_for_rock(&rock, &[2.0e9, 1.0e9], &[300.0, 300.0], &reference());
        assert!(err.is_err());
        assert!(depths_for_rock(&rock, &[], &[], &reference()).unwrap().is_empty());
    }
}
