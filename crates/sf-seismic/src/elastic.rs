//! Per-phase elastic properties and the parallel moduli pass.

use crate::error::{SeismicError, SeismicResult, check_len};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sf_minerals::{Material, MaterialResult};

/// Elastic snapshot of one phase (or of a whole assemblage after averaging).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticProperties {
    /// Phase volume: molar fraction times molar volume [m³/mol]
    pub volume: f64,
    /// Density [kg/m³]
    pub density: f64,
    /// Adiabatic bulk modulus [Pa]
    pub bulk_modulus: f64,
    /// Shear modulus [Pa]
    pub shear_modulus: f64,
    /// Molar fraction of the phase in the rock
    pub fraction: f64,
}

/// Set `rock` to (P, T) and evaluate every leaf phase.
pub fn phase_properties(
    rock: &mut Material,
    pressure: f64,
    temperature: f64,
) -> MaterialResult<Vec<ElasticProperties>> {
    rock.set_state_si(pressure, temperature)?;
    rock.unroll()?
        .into_iter()
        .map(|(fraction, mineral)| {
            let molar_volume = mineral.molar_volume()?;
            Ok(ElasticProperties {
                volume: fraction * molar_volume,
                density: mineral.molar_mass() / molar_volume,
                bulk_modulus: mineral.adiabatic_bulk_modulus()?,
                shear_modulus: mineral.shear_modulus()?,
                fraction,
            })
        })
        .collect()
}

/// Evaluate every phase of `rock` at each (P, T) sample.
///
/// Samples run in parallel. Each worker owns a private clone of the rock,
/// so no mineral state is shared between samples. Output is indexed
/// `[sample][phase]`.
pub fn calculate_moduli(
    rock: &Material,
    pressures: &[f64],
    temperatures: &[f64],
) -> SeismicResult<Vec<Vec<ElasticProperties>>> {
    check_len("temperatures", pressures.len(), temperatures.len())?;
    pressures
        .par_iter()
        .zip(temperatures.par_iter())
        .enumerate()
        .map_init(
            || rock.clone(),
            |rock, (index, (&pressure, &temperature))| {
                phase_properties(rock, pressure, temperature).map_err(|source| {
                    SeismicError::AtSample {
                        index,
                        pressure,
                        temperature,
                        source,
                    }
                })
            },
        )
        .collect()
}

/// Volume-weighted bulk density of `rock` at each sample [kg/m³].
///
/// Needs only molar volumes, so it also works for minerals without shear
/// parameters.
pub fn densities_from_rock(
    rock: &Material,
    pressures: &[f64],
    temperatures: &[f64],
) -> SeismicResult<Vec<f64>> {
    check_len("temperatures", pressures.len(), temperatures.len())?;
    pressures
        .par_iter()
        .zip(temperatures.par_iter())
        .enumerate()
        .map_init(
            || rock.clone(),
            |rock, (index, (&pressure, &temperature))| {
                bulk_density(rock, pressure, temperature).map_err(|source| {
                    SeismicError::AtSample {
                        index,
                        pressure,
                        temperature,
                        source,
                    }
                })
            },
        )
        .collect()
}

fn bulk_density(rock: &mut Material, pressure: f64, temperature: f64) -> MaterialResult<f64> {
    rock.set_state_si(pressure, temperature)?;
    let phases = rock.unroll()?;
    if let [(_, mineral)] = phases.as_slice() {
        return mineral.density_si();
    }
    let mut mass = 0.0;
    let mut volume = 0.0;
    for (fraction, mineral) in phases {
        mass += fraction * mineral.molar_mass();
        volume += fraction * mineral.molar_volume()?;
    }
    Ok(mass / volume)
}
