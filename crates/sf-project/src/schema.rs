//! Project schema definitions.
//!
//! Quantities are stored in SI units; field suffixes name the unit.

use serde::{Deserialize, Serialize};
use sf_eos::{EosMethod, ParameterSet};
use sf_profile::{Gravity, SolverConfig};
use sf_seismic::Averaging;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    /// Formulation applied to every mineral, overriding per-mineral choices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<EosMethod>,
    #[serde(default)]
    pub averaging: Averaging,
    /// Minerals defined in the project, referenced from `rock` by id.
    #[serde(default)]
    pub minerals: Vec<MineralDef>,
    pub rock: RockDef,
    pub geotherm: GeothermDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceDef>,
    pub computation: ComputationDef,
    #[serde(default)]
    pub solver: SolverConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MineralDef {
    pub id: String,
    pub params: ParameterSet,
}

/// A rock: a mineral, a mixture or a spin-transition pair.
///
/// Mineral names resolve first against the project's own minerals and then
/// against the builtin catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RockDef {
    Mineral {
        name: String,
    },
    Composite {
        phases: Vec<PhaseDef>,
    },
    SpinTransition {
        name: String,
        transition_pressure_pa: f64,
        low_spin: String,
        high_spin: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseDef {
    pub fraction: f64,
    pub rock: RockDef,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    #[default]
    Linear,
    Log,
}

/// Sample points between two bounds, both included.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RangeDef {
    pub start: f64,
    pub end: f64,
    pub points: usize,
    #[serde(default)]
    pub spacing: Spacing,
}

impl RangeDef {
    pub fn linear(start: f64, end: f64, points: usize) -> Self {
        Self {
            start,
            end,
            points,
            spacing: Spacing::Linear,
        }
    }

    pub fn log(start: f64, end: f64, points: usize) -> Self {
        Self {
            start,
            end,
            points,
            spacing: Spacing::Log,
        }
    }

    /// The sample points. Assumes a validated range.
    pub fn generate_points(&self) -> Vec<f64> {
        match self.spacing {
            Spacing::Linear => sf_core::linspace(self.start, self.end, self.points),
            Spacing::Log => {
                let mut points: Vec<f64> =
                    sf_core::linspace(self.start.ln(), self.end.ln(), self.points)
                        .into_iter()
                        .map(f64::exp)
                        .collect();
                // exact endpoints
                if let Some(first) = points.first_mut() {
                    *first = self.start;
                }
                if let Some(last) = points.last_mut() {
                    *last = self.end;
                }
                points
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeothermDef {
    Isothermal {
        temperature_k: f64,
    },
    /// Linear in pressure through two (P, T) points.
    Linear {
        p0_pa: f64,
        t0_k: f64,
        p1_pa: f64,
        t1_k: f64,
    },
    Table {
        pressure_pa: Vec<f64>,
        temperature_k: Vec<f64>,
    },
    Adiabatic {
        anchor_temperature_k: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        substeps: Option<usize>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReferenceDef {
    /// Full table with pressures given.
    Table {
        depth_m: Vec<f64>,
        pressure_pa: Vec<f64>,
        density_kg_m3: Vec<f64>,
        vp_mps: Vec<f64>,
        vs_mps: Vec<f64>,
        gravity: Gravity,
    },
    /// Pressures integrated from density under constant gravity.
    Hydrostatic {
        depth_m: Vec<f64>,
        density_kg_m3: Vec<f64>,
        vp_mps: Vec<f64>,
        vs_mps: Vec<f64>,
        gravity_mps2: f64,
        #[serde(default)]
        surface_pressure_pa: f64,
    },
}

/// Anelastic quality factors for the attenuation correction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AttenuationDef {
    pub q_s: f64,
    pub q_phi: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComputationDef {
    /// Rock velocities along a pressure range, temperatures from the geotherm.
    Velocities {
        pressure_pa: RangeDef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attenuation: Option<AttenuationDef>,
        /// Score the result against the reference model at the same pressures.
        #[serde(default)]
        compare: bool,
    },
    /// Depths at which the rock reaches each pressure.
    Depths { pressure_pa: RangeDef },
    /// Self-consistent pressures at each depth.
    Pressures { depth_m: RangeDef },
}

impl ComputationDef {
    pub fn key(&self) -> &'static str {
        match self {
            ComputationDef::Velocities { .. } => "velocities",
            ComputationDef::Depths { .. } => "depths",
            ComputationDef::Pressures { .. } => "pressures",
        }
    }

    pub fn needs_reference(&self) -> bool {
        match self {
            ComputationDef::Velocities { compare, .. } => *compare,
            ComputationDef::Depths { .. } | ComputationDef::Pressures { .. } => true,
        }
    }
}
