//! Equation-of-state tags and the registry that resolves them.

use crate::birch_murnaghan::BirchMurnaghan;
use crate::eos::EquationOfState;
use crate::error::{EosError, EosResult};
use crate::mgd::MieGrueneisenDebye;
use crate::slb::StixrudeLithgowBertelloni;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Built-in equation-of-state formulations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EosMethod {
    /// Birch–Murnaghan, second-order shear
    Bm2,
    /// Birch–Murnaghan, third-order shear
    Bm3,
    /// Mie–Grüneisen–Debye, second-order shear
    Mgd2,
    /// Mie–Grüneisen–Debye, third-order shear
    Mgd3,
    /// Stixrude & Lithgow-Bertelloni, second-order shear
    Slb2,
    /// Stixrude & Lithgow-Bertelloni, third-order shear
    Slb3,
}

impl EosMethod {
    pub const ALL: [EosMethod; 6] = [
        EosMethod::Bm2,
        EosMethod::Bm3,
        EosMethod::Mgd2,
        EosMethod::Mgd3,
        EosMethod::Slb2,
        EosMethod::Slb3,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            EosMethod::Bm2 => "bm2",
            EosMethod::Bm3 => "bm3",
            EosMethod::Mgd2 => "mgd2",
            EosMethod::Mgd3 => "mgd3",
            EosMethod::Slb2 => "slb2",
            EosMethod::Slb3 => "slb3",
        }
    }

    /// Whether the formulation has a temperature dependence.
    pub fn is_thermal(&self) -> bool {
        !matches!(self, EosMethod::Bm2 | EosMethod::Bm3)
    }

    /// Shared instance of the formulation this tag names.
    pub fn model(&self) -> Arc<dyn EquationOfState> {
        match self {
            EosMethod::Bm2 => Arc::new(BirchMurnaghan::second_order()),
            EosMethod::Bm3 => Arc::new(BirchMurnaghan::third_order()),
            EosMethod::Mgd2 => Arc::new(MieGrueneisenDebye::second_order()),
            EosMethod::Mgd3 => Arc::new(MieGrueneisenDebye::third_order()),
            EosMethod::Slb2 => Arc::new(StixrudeLithgowBertelloni::second_order()),
            EosMethod::Slb3 => Arc::new(StixrudeLithgowBertelloni::third_order()),
        }
    }
}

impl fmt::Display for EosMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl std::str::FromStr for EosMethod {
    type Err = EosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bm2" => Ok(EosMethod::Bm2),
            // bare "bm" is the third-order form
            "bm3" | "bm" => Ok(EosMethod::Bm3),
            "mgd2" => Ok(EosMethod::Mgd2),
            "mgd3" | "mgd" => Ok(EosMethod::Mgd3),
            "slb2" => Ok(EosMethod::Slb2),
            "slb3" | "slb" => Ok(EosMethod::Slb3),
            _ => Err(EosError::UnknownMethod { tag: s.to_string() }),
        }
    }
}

/// Maps tags to formulations.
///
/// The built-in set covers every `EosMethod`; callers can register further
/// implementations under their own tags.
#[derive(Debug, Clone, Default)]
pub struct EosRegistry {
    entries: BTreeMap<String, Arc<dyn EquationOfState>>,
}

impl EosRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the six built-in formulations.
    pub fn builtin() -> &'static EosRegistry {
        static BUILTIN: OnceLock<EosRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let mut registry = EosRegistry::new();
            for method in EosMethod::ALL {
                registry.register(method.tag(), method.model());
            }
            registry
        })
    }

    /// Register (or replace) a formulation under `tag`.
    pub fn register(&mut self, tag: &str, eos: Arc<dyn EquationOfState>) {
        let key = tag.trim().to_ascii_lowercase();
        tracing::trace!(tag = %key, eos = eos.name(), "registering equation of state");
        self.entries.insert(key, eos);
    }

    /// Resolve `tag`, case-insensitively.
    ///
    /// Built-in aliases (`bm`, `mgd`, `slb`) resolve to their third-order form.
    pub fn get(&self, tag: &str) -> EosResult<Arc<dyn EquationOfState>> {
        let key = tag.trim().to_ascii_lowercase();
        if let Some(eos) = self.entries.get(&key) {
            return Ok(Arc::clone(eos));
        }
        let method: EosMethod = key.parse()?;
        self.entries
            .get(method.tag())
            .cloned()
            .ok_or(EosError::UnknownMethod {
                tag: tag.to_string(),
            })
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
