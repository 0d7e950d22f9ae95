//! Project validation logic.

use crate::schema::{
    ComputationDef, GeothermDef, MineralDef, Project, RangeDef, ReferenceDef, RockDef, Spacing,
};
use sf_minerals::{FRACTION_TOLERANCE, catalog};
use sf_profile::Gravity;
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, value, "must be positive and finite"));
    }
    Ok(())
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut mineral_ids = HashSet::new();
    for mineral in &project.minerals {
        if !mineral_ids.insert(mineral.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: mineral.id.clone(),
                context: "minerals".to_string(),
            });
        }
        validate_mineral(mineral, project.method.is_some())?;
    }

    validate_rock(&project.rock, &mineral_ids, "rock")?;
    validate_geotherm(&project.geotherm)?;

    match &project.reference {
        Some(reference) => validate_reference(reference)?,
        None if project.computation.needs_reference() => {
            return Err(ValidationError::MissingReference {
                id: "reference".to_string(),
                context: format!("computation '{}'", project.computation.key()),
            });
        }
        None => {}
    }

    validate_computation(&project.computation)?;

    positive("solver tolerance", project.solver.tolerance)?;
    if project.solver.max_iterations == 0 {
        return Err(invalid("solver max_iterations", 0, "must be at least 1"));
    }
    Ok(())
}

fn validate_mineral(mineral: &MineralDef, method_set: bool) -> Result<(), ValidationError> {
    let field = format!("mineral '{}' params", mineral.id);
    if mineral.id.trim().is_empty() {
        return Err(invalid("mineral id", "\"\"", "must not be empty"));
    }
    mineral
        .params
        .validate()
        .map_err(|err| invalid(field.clone(), "..", &err.to_string()))?;
    if !method_set && mineral.params.equation_of_state.is_none() {
        return Err(invalid(
            format!("mineral '{}' equation_of_state", mineral.id),
            "none",
            "required when the project sets no method",
        ));
    }
    Ok(())
}

fn validate_rock(
    rock: &RockDef,
    mineral_ids: &HashSet<&str>,
    context: &str,
) -> Result<(), ValidationError> {
    match rock {
        RockDef::Mineral { name } => {
            if !mineral_ids.contains(name.as_str()) && catalog::lookup(name).is_err() {
                return Err(ValidationError::MissingReference {
                    id: name.clone(),
                    context: context.to_string(),
                });
            }
            Ok(())
        }
        RockDef::Composite { phases } => {
            if phases.is_empty() {
                return Err(invalid(context, "[]", "composite needs at least one phase"));
            }
            let mut total = 0.0;
            for (i, phase) in phases.iter().enumerate() {
                let field = format!("{context}.phases[{i}]");
                if !phase.fraction.is_finite() || phase.fraction <= 0.0 || phase.fraction > 1.0 {
                    return Err(invalid(
                        format!("{field}.fraction"),
                        phase.fraction,
                        "must lie in (0, 1]",
                    ));
                }
                total += phase.fraction;
                validate_rock(&phase.rock, mineral_ids, &field)?;
            }
            if (total - 1.0).abs() > FRACTION_TOLERANCE {
                return Err(invalid(
                    format!("{context} fractions"),
                    total,
                    "must sum to 1",
                ));
            }
            Ok(())
        }
        RockDef::SpinTransition {
            name,
            transition_pressure_pa,
            low_spin,
            high_spin,
        } => {
            positive(&format!("{context} '{name}' transition_pressure_pa"), *transition_pressure_pa)?;
            for half in [low_spin, high_spin] {
                if !mineral_ids.contains(half.as_str()) && catalog::parameters(half).is_err() {
                    return Err(ValidationError::MissingReference {
                        id: half.clone(),
                        context: format!("{context} spin transition '{name}'"),
                    });
                }
            }
            Ok(())
        }
    }
}

fn validate_geotherm(geotherm: &GeothermDef) -> Result<(), ValidationError> {
    match geotherm {
        GeothermDef::Isothermal { temperature_k } => positive("geotherm temperature_k", *temperature_k),
        GeothermDef::Linear {
            p0_pa,
            t0_k,
            p1_pa,
            t1_k,
        } => {
            positive("geotherm t0_k", *t0_k)?;
            positive("geotherm t1_k", *t1_k)?;
            if !(p0_pa.is_finite() && p1_pa.is_finite()) || p0_pa == p1_pa {
                return Err(invalid(
                    "geotherm p1_pa",
                    p1_pa,
                    "must be finite and differ from p0_pa",
                ));
            }
            Ok(())
        }
        GeothermDef::Table {
            pressure_pa,
            temperature_k,
        } => {
            same_length("geotherm table", pressure_pa.len(), &[temperature_k.len()])?;
            if pressure_pa.is_empty() {
                return Err(invalid("geotherm table", "[]", "must not be empty"));
            }
            if !sf_core::is_strictly_increasing(pressure_pa) {
                return Err(invalid("geotherm pressure_pa", "..", "must be strictly increasing"));
            }
            temperature_k
                .iter()
                .try_for_each(|&t| positive("geotherm temperature_k", t))
        }
        GeothermDef::Adiabatic {
            anchor_temperature_k,
            substeps,
        } => {
            positive("geotherm anchor_temperature_k", *anchor_temperature_k)?;
            if *substeps == Some(0) {
                return Err(invalid("geotherm substeps", 0, "must be at least 1"));
            }
            Ok(())
        }
    }
}

fn same_length(field: &str, expected: usize, others: &[usize]) -> Result<(), ValidationError> {
    if let Some(&len) = others.iter().find(|&&len| len != expected) {
        return Err(invalid(
            field,
            format!("{len} rows"),
            &format!("every column needs {expected} rows"),
        ));
    }
    Ok(())
}

fn validate_reference(reference: &ReferenceDef) -> Result<(), ValidationError> {
    let (depth, gravity) = match reference {
        ReferenceDef::Table {
            depth_m,
            pressure_pa,
            density_kg_m3,
            vp_mps,
            vs_mps,
            gravity,
        } => {
            same_length(
                "reference table",
                depth_m.len(),
                &[pressure_pa.len(), density_kg_m3.len(), vp_mps.len(), vs_mps.len()],
            )?;
            if !sf_core::is_strictly_increasing(pressure_pa) {
                return Err(invalid("reference pressure_pa", "..", "must be strictly increasing"));
            }
            (depth_m, Some(gravity))
        }
        ReferenceDef::Hydrostatic {
            depth_m,
            density_kg_m3,
            vp_mps,
            vs_mps,
            gravity_mps2,
            ..
        } => {
            same_length(
                "reference table",
                depth_m.len(),
                &[density_kg_m3.len(), vp_mps.len(), vs_mps.len()],
            )?;
            positive("reference gravity_mps2", *gravity_mps2)?;
            (depth_m, None)
        }
    };
    if depth.len() < 2 {
        return Err(invalid("reference depth_m", depth.len(), "needs at least 2 rows"));
    }
    if !sf_core::is_strictly_increasing(depth) {
        return Err(invalid("reference depth_m", "..", "must be strictly increasing"));
    }
    match gravity {
        Some(Gravity::Constant(g)) => positive("reference gravity", *g),
        Some(Gravity::Tabulated(g)) => {
            same_length("reference gravity", depth.len(), &[g.len()])?;
            g.iter().try_for_each(|&g| positive("reference gravity", g))
        }
        None => Ok(()),
    }
}

fn validate_range(field: &str, range: &RangeDef) -> Result<(), ValidationError> {
    if !(range.start.is_finite() && range.end.is_finite()) {
        return Err(invalid(field, format!("{}..{}", range.start, range.end), "bounds must be finite"));
    }
    if range.points == 0 {
        return Err(invalid(format!("{field}.points"), 0, "must be at least 1"));
    }
    if range.points > 1 && range.end <= range.start {
        return Err(invalid(
            field,
            format!("{}..{}", range.start, range.end),
            "end must exceed start",
        ));
    }
    if range.spacing == Spacing::Log && range.start <= 0.0 {
        return Err(invalid(
            format!("{field}.start"),
            range.start,
            "log spacing needs positive bounds",
        ));
    }
    Ok(())
}

fn validate_computation(computation: &ComputationDef) -> Result<(), ValidationError> {
    match computation {
        ComputationDef::Velocities {
            pressure_pa,
            attenuation,
            ..
        } => {
            validate_range("computation pressure_pa", pressure_pa)?;
            if let Some(q) = attenuation {
                positive("attenuation q_s", q.q_s)?;
                positive("attenuation q_phi", q.q_phi)?;
            }
            Ok(())
        }
        ComputationDef::Depths { pressure_pa } => {
            validate_range("computation pressure_pa", pressure_pa)
        }
        ComputationDef::Pressures { depth_m } => validate_range("computation depth_m", depth_m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttenuationDef, PhaseDef};
    use sf_eos::{EosMethod, ParameterSet};
    use sf_profile::SolverConfig;
    use sf_seismic::Averaging;

    fn project(rock: RockDef) -> Project {
        Project {
            version: LATEST_VERSION,
            name: "test".to_string(),
            method: None,
            averaging: Averaging::Vrh,
            minerals: vec![],
            rock,
            geotherm: GeothermDef::Isothermal {
                temperature_k: 2000.0,
            },
            reference: None,
            computation: ComputationDef::Velocities {
                pressure_pa: RangeDef::linear(25.0e9, 100.0e9, 4),
                attenuation: None,
                compare: false,
            },
            solver: SolverConfig::default(),
        }
    }

    fn mineral(name: &str) -> RockDef {
        RockDef::Mineral {
            name: name.to_string(),
        }
    }

    #[test]
    fn catalog_rock_is_valid() {
        validate_project(&project(mineral("periclase"))).unwrap();
    }

    #[test]
    fn unknown_mineral_is_missing_reference() {
        let err = validate_project(&project(mineral("unobtainium"))).unwrap_err();
        assert!(matches!(err, ValidationError::MissingReference { .. }));
    }

    #[test]
    fn fractions_must_sum_to_one() {
        let rock = RockDef::Composite {
            phases: vec![
                PhaseDef {
                    fraction: 0.6,
                    rock: mineral("mg_perovskite"),
                },
                PhaseDef {
                    fraction: 0.3,
                    rock: mineral("periclase"),
                },
            ],
        };
        let err = validate_project(&project(rock)).unwrap_err();
        assert!(err.to_string().contains("must sum to 1"), "{err}");
    }

    #[test]
    fn nested_errors_name_their_path() {
        let rock = RockDef::Composite {
            phases: vec![PhaseDef {
                fraction: 1.0,
                rock: RockDef::Composite {
                    phases: vec![PhaseDef {
                        fraction: 1.5,
                        rock: mineral("periclase"),
                    }],
                },
            }],
        };
        let err = validate_project(&project(rock)).unwrap_err();
        assert!(err.to_string().contains("rock.phases[0].phases[0].fraction"), "{err}");
    }

    #[test]
    fn custom_minerals_need_a_method() {
        let mut p = project(mineral("my_mgo"));
        p.minerals.push(MineralDef {
            id: "my_mgo".to_string(),
            params: ParameterSet::new(11.24e-6, 161.0e9, 3.8, 0.0403, 2.0),
        });
        assert!(validate_project(&p).is_err());
        p.method = Some(EosMethod::Bm3);
        validate_project(&p).unwrap();

        p.minerals.push(p.minerals[0].clone());
        assert!(matches!(
            validate_project(&p).unwrap_err(),
            ValidationError::DuplicateId { .. }
        ));
    }

    #[test]
    fn depths_need_a_reference() {
        let mut p = project(mineral("periclase"));
        p.computation = ComputationDef::Depths {
            pressure_pa: RangeDef::linear(25.0e9, 100.0e9, 4),
        };
        assert!(matches!(
            validate_project(&p).unwrap_err(),
            ValidationError::MissingReference { .. }
        ));
    }

    #[test]
    fn ranges_and_attenuation_are_checked() {
        let mut p = project(mineral("periclase"));
        p.computation = ComputationDef::Velocities {
            pressure_pa: RangeDef::log(0.0, 100.0e9, 4),
            attenuation: None,
            compare: false,
        };
        assert!(validate_project(&p).is_err());
        p.computation = ComputationDef::Velocities {
            pressure_pa: RangeDef::linear(100.0e9, 25.0e9, 4),
            attenuation: None,
            compare: false,
        };
        assert!(validate_project(&p).is_err());
        p.computation = ComputationDef::Velocities {
            pressure_pa: RangeDef::linear(25.0e9, 100.0e9, 4),
            attenuation: Some(AttenuationDef {
                q_s: 0.0,
                q_phi: 1000.0,
            }),
            compare: false,
        };
        assert!(validate_project(&p).is_err());
    }

    #[test]
    fn spin_transition_halves_resolve() {
        let rock = RockDef::SpinTransition {
            name: "fp".to_string(),
            transition_pressure_pa: 60.0e9,
            low_spin: "speziale_fe_periclase_ls".to_string(),
            high_spin: "speziale_fe_periclase_hs".to_string(),
        };
        validate_project(&project(rock)).unwrap();
    }

    #[test]
    fn newer_versions_are_rejected() {
        let mut p = project(mineral("periclase"));
        p.version = LATEST_VERSION + 1;
        assert_eq!(
            validate_project(&p).unwrap_err(),
            ValidationError::UnsupportedVersion { version: 2 }
        );
    }
}
