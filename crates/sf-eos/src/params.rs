//! Mineral parameter sets.

use crate::error::{EosError, EosResult};
use crate::method::EosMethod;
use serde::{Deserialize, Serialize};

/// Material parameters of a single mineral end-member.
///
/// Mandatory fields are those every formulation needs (reference volume,
/// bulk modulus and its pressure derivative, molar mass, atoms per formula
/// unit). Shear and thermal parameters are optional here and required by the
/// formulations that use them; asking for a missing one is a configuration
/// error rather than a silent default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Reference molar volume V₀ [m³/mol]
    pub v_0: f64,
    /// Reference isothermal bulk modulus K₀ [Pa]
    pub k_0: f64,
    /// Pressure derivative of the bulk modulus K₀' (dimensionless)
    pub kprime_0: f64,
    /// Reference shear modulus G₀ [Pa]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g_0: Option<f64>,
    /// Pressure derivative of the shear modulus G₀' (dimensionless)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gprime_0: Option<f64>,
    /// Molar mass [kg/mol]
    pub molar_mass: f64,
    /// Number of atoms per formula unit
    pub n: f64,
    /// Reference Debye temperature θ₀ [K]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debye_0: Option<f64>,
    /// Reference Grüneisen parameter γ₀
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grueneisen_0: Option<f64>,
    /// Logarithmic volume derivative of the Grüneisen parameter q₀
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q_0: Option<f64>,
    /// Shear strain derivative of the Grüneisen parameter η_S₀
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eta_s_0: Option<f64>,
    /// Preferred formulation for this mineral, if the database names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equation_of_state: Option<EosMethod>,
}

/// The Debye-model subset of a parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebyeParams {
    pub debye_0: f64,
    pub grueneisen_0: f64,
    pub q_0: f64,
}

impl ParameterSet {
    /// Create a parameter set with the mandatory isothermal parameters.
    pub fn new(v_0: f64, k_0: f64, kprime_0: f64, molar_mass: f64, n: f64) -> Self {
        Self {
            v_0,
            k_0,
            kprime_0,
            g_0: None,
            gprime_0: None,
            molar_mass,
            n,
            debye_0: None,
            grueneisen_0: None,
            q_0: None,
            eta_s_0: None,
            equation_of_state: None,
        }
    }

    pub fn with_shear(mut self, g_0: f64, gprime_0: f64) -> Self {
        self.g_0 = Some(g_0);
        self.gprime_0 = Some(gprime_0);
        self
    }

    pub fn with_debye(mut self, debye_0: f64, grueneisen_0: f64, q_0: f64) -> Self {
        self.debye_0 = Some(debye_0);
        self.grueneisen_0 = Some(grueneisen_0);
        self.q_0 = Some(q_0);
        self
    }

    pub fn with_eta_s(mut self, eta_s_0: f64) -> Self {
        self.eta_s_0 = Some(eta_s_0);
        self
    }

    pub fn with_method(mut self, method: EosMethod) -> Self {
        self.equation_of_state = Some(method);
        self
    }

    /// Look a parameter up by name.
    ///
    /// Accepts both the snake_case field names and the conventional
    /// symbols used in mineral physics tables (`V_0`, `K_0`, `Kprime_0`, ...).
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "v_0" | "V_0" => Some(self.v_0),
            "k_0" | "K_0" => Some(self.k_0),
            "kprime_0" | "Kprime_0" => Some(self.kprime_0),
            "g_0" | "G_0" => self.g_0,
            "gprime_0" | "Gprime_0" => self.gprime_0,
            "molar_mass" => Some(self.molar_mass),
            "n" => Some(self.n),
            "debye_0" | "Debye_0" => self.debye_0,
            "grueneisen_0" => self.grueneisen_0,
            "q_0" => self.q_0,
            "eta_s_0" => self.eta_s_0,
            _ => None,
        }
    }

    /// Check that the mandatory parameters are finite and physically usable.
    pub fn validate(&self) -> EosResult<()> {
        positive("v_0", self.v_0)?;
        positive("k_0", self.k_0)?;
        finite("kprime_0", self.kprime_0)?;
        positive("molar_mass", self.molar_mass)?;
        positive("n", self.n)?;

        if let Some(g_0) = self.g_0 {
            if !g_0.is_finite() || g_0 < 0.0 {
                return Err(EosError::InvalidParameter {
                    name: "g_0",
                    value: g_0,
                });
            }
        }
        if let Some(v) = self.gprime_0 {
            finite("gprime_0", v)?;
        }
        if let Some(v) = self.debye_0 {
            positive("debye_0", v)?;
        }
        if let Some(v) = self.grueneisen_0 {
            finite("grueneisen_0", v)?;
        }
        if let Some(v) = self.q_0 {
            finite("q_0", v)?;
        }
        if let Some(v) = self.eta_s_0 {
            finite("eta_s_0", v)?;
        }
        Ok(())
    }

    /// Shear modulus and its pressure derivative, required by `method`.
    pub fn shear(&self, method: &'static str) -> EosResult<(f64, f64)> {
        let g_0 = self.g_0.ok_or(EosError::MissingParameter {
            name: "g_0",
            method,
        })?;
        let gprime_0 = self.gprime_0.ok_or(EosError::MissingParameter {
            name: "gprime_0",
            method,
        })?;
        Ok((g_0, gprime_0))
    }

    /// Debye-model parameters, required by `method`.
    pub fn debye(&self, method: &'static str) -> EosResult<DebyeParams> {
        let debye_0 = self.debye_0.ok_or(EosError::MissingParameter {
            name: "debye_0",
            method,
        })?;
        let grueneisen_0 = self.grueneisen_0.ok_or(EosError::MissingParameter {
            name: "grueneisen_0",
            method,
        })?;
        let q_0 = self.q_0.ok_or(EosError::MissingParameter {
            name: "q_0",
            method,
        })?;
        Ok(DebyeParams {
            debye_0,
            grueneisen_0,
            q_0,
        })
    }

    /// Shear strain derivative of the Grüneisen parameter, required by `method`.
    pub fn eta_s(&self, method: &'static str) -> EosResult<f64> {
        self.eta_s_0.ok_or(EosError::MissingParameter {
            name: "eta_s_0",
            method,
        })
    }
}

fn finite(name: &'static str, value: f64) -> EosResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EosError::InvalidParameter { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> EosResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EosError::InvalidParameter { name, value })
    }
}
