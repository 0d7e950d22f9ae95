//! Executing a project's computation.

use crate::ProjectResult;
use crate::build::{build_geotherm, build_reference, build_rock};
use crate::schema::{ComputationDef, Project};
use serde::{Deserialize, Serialize};
use sf_profile::{Profile, ReferenceModel, depths_for_rock, pressures_for_rock};
use sf_seismic::{
    Misfit, RockProperties, VelocityProfile, apply_attenuation_correction, compare_chifactor,
    compare_l2, densities_from_rock, velocities_from_rock,
};
use tracing::info;

/// Misfit of computed velocities against the reference model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MisfitReport {
    pub l2: Misfit,
    pub chi_factor: Misfit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityReport {
    pub pressure: Vec<f64>,
    pub temperature: Vec<f64>,
    #[serde(flatten)]
    pub properties: RockProperties,
    /// Velocities after the anelastic correction, when one was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corrected: Option<VelocityProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misfit: Option<MisfitReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunOutput {
    Velocities(VelocityReport),
    Depths(Profile),
    Pressures(Profile),
}

/// Run the computation a validated project asks for.
pub fn run_project(project: &Project) -> ProjectResult<RunOutput> {
    let rock = build_rock(project)?;
    let geotherm = build_geotherm(&project.geotherm)?;
    info!(
        project = %project.name,
        computation = project.computation.key(),
        rock = rock.name(),
        "running project"
    );

    let output = match &project.computation {
        ComputationDef::Velocities {
            pressure_pa,
            attenuation,
            compare,
        } => {
            let pressure = pressure_pa.generate_points();
            let temperature = geotherm.temperatures(&pressure, &rock)?;
            let properties =
                velocities_from_rock(&rock, &pressure, &temperature, project.averaging.scheme())?;
            let corrected = attenuation
                .map(|q| apply_attenuation_correction(&properties.velocities(), q.q_s, q.q_phi))
                .transpose()?;

            let misfit = match (&project.reference, compare) {
                (Some(reference), true) => {
                    let reference = build_reference(reference)?;
                    let velocities = corrected.clone().unwrap_or_else(|| properties.velocities());
                    Some(score(&reference, &pressure, &properties, &velocities)?)
                }
                _ => None,
            };

            RunOutput::Velocities(VelocityReport {
                pressure,
                temperature,
                properties,
                corrected,
                misfit,
            })
        }
        ComputationDef::Depths { pressure_pa } => {
            let reference = required_reference(project)?;
            let pressure = pressure_pa.generate_points();
            let temperature = geotherm.temperatures(&pressure, &rock)?;
            let depth = depths_for_rock(&rock, &pressure, &temperature, &reference)?;
            let density = densities_from_rock(&rock, &pressure, &temperature)?;
            RunOutput::Depths(Profile {
                depth,
                pressure,
                temperature,
                density,
            })
        }
        ComputationDef::Pressures { depth_m } => {
            let reference = required_reference(project)?;
            let depth = depth_m.generate_points();
            RunOutput::Pressures(pressures_for_rock(
                &rock,
                &depth,
                geotherm.as_ref(),
                &reference,
                &project.solver,
            )?)
        }
    };
    info!(computation = project.computation.key(), "project run finished");
    Ok(output)
}

fn required_reference(project: &Project) -> ProjectResult<sf_profile::TabulatedReference> {
    match &project.reference {
        Some(reference) => build_reference(reference),
        None => Err(crate::ValidationError::MissingReference {
            id: "reference".to_string(),
            context: format!("computation '{}'", project.computation.key()),
        }
        .into()),
    }
}

fn score(
    reference: &dyn ReferenceModel,
    pressure: &[f64],
    properties: &RockProperties,
    velocities: &VelocityProfile,
) -> ProjectResult<MisfitReport> {
    let depth = pressure
        .iter()
        .map(|&p| reference.depth(p))
        .collect::<Result<Vec<_>, _>>()?;
    let seismic = reference.evaluate_all_at(&depth)?;
    Ok(MisfitReport {
        l2: compare_l2(
            &depth,
            &velocities.v_s,
            &velocities.v_phi,
            &properties.density,
            &seismic.v_s,
            &seismic.v_phi,
            &seismic.density,
        )?,
        chi_factor: compare_chifactor(
            &velocities.v_s,
            &velocities.v_phi,
            &properties.density,
            &seismic.v_s,
            &seismic.v_phi,
            &seismic.density,
        )?,
    })
}
