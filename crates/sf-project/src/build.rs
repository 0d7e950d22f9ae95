//! Turning a validated project into runtime objects.

use crate::ProjectResult;
use crate::schema::{GeothermDef, Project, ReferenceDef, RockDef};
use sf_core::pa;
use sf_minerals::{Composite, Material, MaterialError, Mineral, SpinTransition, catalog};
use sf_profile::{AdiabaticGeotherm, Geotherm, LinearGeotherm, TableGeotherm, TabulatedReference};

/// The rock described by the project, with the project method applied.
pub fn build_rock(project: &Project) -> ProjectResult<Material> {
    let mut rock = rock_from_def(project, &project.rock)?;
    if let Some(method) = project.method {
        rock.set_method(method.tag())?;
    }
    Ok(rock)
}

fn rock_from_def(project: &Project, def: &RockDef) -> ProjectResult<Material> {
    match def {
        RockDef::Mineral { name } => match project_mineral(project, name) {
            Some(mineral) => Ok(mineral.into()),
            None => Ok(catalog::lookup(name)?),
        },
        RockDef::Composite { phases } => {
            let phases = phases
                .iter()
                .map(|phase| Ok((phase.fraction, rock_from_def(project, &phase.rock)?)))
                .collect::<ProjectResult<Vec<_>>>()?;
            Ok(Composite::new(phases)?.into())
        }
        RockDef::SpinTransition {
            name,
            transition_pressure_pa,
            low_spin,
            high_spin,
        } => Ok(SpinTransition::new(
            name.clone(),
            pa(*transition_pressure_pa),
            mineral(project, low_spin)?,
            mineral(project, high_spin)?,
        )
        .into()),
    }
}

fn project_mineral(project: &Project, name: &str) -> Option<Mineral> {
    project
        .minerals
        .iter()
        .find(|m| m.id == name)
        .map(|m| Mineral::new(m.id.clone(), m.params.clone()))
}

fn mineral(project: &Project, name: &str) -> Result<Mineral, MaterialError> {
    match project_mineral(project, name) {
        Some(mineral) => Ok(mineral),
        None => Ok(Mineral::new(name, catalog::parameters(name)?)),
    }
}

pub fn build_geotherm(def: &GeothermDef) -> ProjectResult<Box<dyn Geotherm>> {
    let geotherm: Box<dyn Geotherm> = match def {
        GeothermDef::Isothermal { temperature_k } => {
            Box::new(LinearGeotherm::isothermal(*temperature_k))
        }
        GeothermDef::Linear {
            p0_pa,
            t0_k,
            p1_pa,
            t1_k,
        } => Box::new(LinearGeotherm::through(*p0_pa, *t0_k, *p1_pa, *t1_k)?),
        GeothermDef::Table {
            pressure_pa,
            temperature_k,
        } => Box::new(TableGeotherm::new(pressure_pa.clone(), temperature_k.clone())?),
        GeothermDef::Adiabatic {
            anchor_temperature_k,
            substeps,
        } => {
            let geotherm = AdiabaticGeotherm::new(*anchor_temperature_k);
            Box::new(match substeps {
                Some(n) => geotherm.with_substeps(*n),
                None => geotherm,
            })
        }
    };
    Ok(geotherm)
}

pub fn build_reference(def: &ReferenceDef) -> ProjectResult<TabulatedReference> {
    Ok(match def {
        ReferenceDef::Table {
            depth_m,
            pressure_pa,
            density_kg_m3,
            vp_mps,
            vs_mps,
            gravity,
        } => TabulatedReference::new(
            depth_m.clone(),
            pressure_pa.clone(),
            density_kg_m3.clone(),
            vp_mps.clone(),
            vs_mps.clone(),
            gravity.clone(),
        )?,
        ReferenceDef::Hydrostatic {
            depth_m,
            density_kg_m3,
            vp_mps,
            vs_mps,
            gravity_mps2,
            surface_pressure_pa,
        } => TabulatedReference::hydrostatic(
            depth_m.clone(),
            density_kg_m3.clone(),
            vp_mps.clone(),
            vs_mps.clone(),
            *gravity_mps2,
            *surface_pressure_pa,
        )?,
    })
}
