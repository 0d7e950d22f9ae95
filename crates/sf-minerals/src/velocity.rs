//! Conversion of elastic moduli and density into seismic wave speeds.

use crate::error::{MaterialError, MaterialResult};
use serde::{Deserialize, Serialize};
use sf_core::units::{Velocity, mps};

/// Compressional, shear and bulk-sound velocities [m/s].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeismicVelocities {
    pub v_p: f64,
    pub v_s: f64,
    pub v_phi: f64,
}

impl SeismicVelocities {
    /// Velocities from adiabatic bulk modulus `k` [Pa], shear modulus `g` [Pa]
    /// and density `rho` [kg/m³].
    ///
    /// Every input must be strictly positive and finite; anything else means
    /// an equation of state was extrapolated out of its physical range.
    pub fn from_moduli(k: f64, g: f64, rho: f64) -> MaterialResult<Self> {
        positive("bulk modulus", k)?;
        positive("shear modulus", g)?;
        positive("density", rho)?;
        Ok(Self {
            v_p: ((k + 4.0 / 3.0 * g) / rho).sqrt(),
            v_s: (g / rho).sqrt(),
            v_phi: (k / rho).sqrt(),
        })
    }

    pub fn vp(&self) -> Velocity {
        mps(self.v_p)
    }

    pub fn vs(&self) -> Velocity {
        mps(self.v_s)
    }

    pub fn vphi(&self) -> Velocity {
        mps(self.v_phi)
    }
}

fn positive(what: &'static str, value: f64) -> MaterialResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MaterialError::Domain { what, value })
    }
}
