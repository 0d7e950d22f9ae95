//! Velocity profiles, the one-call rock pipeline and attenuation correction.

use crate::averaging::{AveragingScheme, average_moduli};
use crate::elastic::{ElasticProperties, calculate_moduli};
use crate::error::{SeismicError, SeismicResult, check_len};
use serde::{Deserialize, Serialize};
use sf_minerals::{Material, SeismicVelocities};
use std::f64::consts::PI;

/// Frequency dependence exponent of Q (Matas et al. 2007).
pub const ATTENUATION_BETA: f64 = 0.3;

/// Wave speeds along a profile [m/s].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityProfile {
    pub v_p: Vec<f64>,
    pub v_s: Vec<f64>,
    pub v_phi: Vec<f64>,
}

impl VelocityProfile {
    pub fn len(&self) -> usize {
        self.v_p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.v_p.is_empty()
    }

    fn push(&mut self, v: SeismicVelocities) {
        self.v_p.push(v.v_p);
        self.v_s.push(v.v_s);
        self.v_phi.push(v.v_phi);
    }
}

/// Averaged rock properties along a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RockProperties {
    /// Density [kg/m³]
    pub density: Vec<f64>,
    pub v_p: Vec<f64>,
    pub v_s: Vec<f64>,
    pub v_phi: Vec<f64>,
    /// Adiabatic bulk modulus [Pa]
    pub bulk_modulus: Vec<f64>,
    /// Shear modulus [Pa]
    pub shear_modulus: Vec<f64>,
}

impl RockProperties {
    pub fn velocities(&self) -> VelocityProfile {
        VelocityProfile {
            v_p: self.v_p.clone(),
            v_s: self.v_s.clone(),
            v_phi: self.v_phi.clone(),
        }
    }
}

/// Vp, Vs and Vφ for each averaged sample.
pub fn compute_velocities(moduli: &[ElasticProperties]) -> SeismicResult<VelocityProfile> {
    let mut out = VelocityProfile::default();
    for (index, m) in moduli.iter().enumerate() {
        let v = SeismicVelocities::from_moduli(m.bulk_modulus, m.shear_modulus, m.density)
            .map_err(|source| SeismicError::AtIndex { index, source })?;
        out.push(v);
    }
    Ok(out)
}

/// Moduli, averaging and velocity conversion in one call.
pub fn velocities_from_rock(
    rock: &Material,
    pressures: &[f64],
    temperatures: &[f64],
    scheme: &dyn AveragingScheme,
) -> SeismicResult<RockProperties> {
    let moduli = calculate_moduli(rock, pressures, temperatures)?;
    let averaged = average_moduli(&moduli, scheme)?;
    let velocities = compute_velocities(&averaged).map_err(|err| match err {
        SeismicError::AtIndex { index, source } => SeismicError::AtSample {
            index,
            pressure: pressures[index],
            temperature: temperatures[index],
            source,
        },
        other => other,
    })?;
    tracing::debug!(
        samples = pressures.len(),
        scheme = scheme.name(),
        "rock velocities computed"
    );
    Ok(RockProperties {
        density: averaged.iter().map(|m| m.density).collect(),
        v_p: velocities.v_p,
        v_s: velocities.v_s,
        v_phi: velocities.v_phi,
        bulk_modulus: averaged.iter().map(|m| m.bulk_modulus).collect(),
        shear_modulus: averaged.iter().map(|m| m.shear_modulus).collect(),
    })
}

/// Anelastic correction of one set of velocities for quality factors
/// `q_s` (shear) and `q_phi` (bulk).
///
/// Qp is derived from Qs as (3/4)(Vp/Vs)² Qs.
pub fn attenuation_correction(
    v_p: f64,
    v_s: f64,
    v_phi: f64,
    q_s: f64,
    q_phi: f64,
) -> SeismicResult<SeismicVelocities> {
    for (what, value) in [("Qs", q_s), ("Qphi", q_phi), ("shear velocity", v_s)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(SeismicError::Domain { what, value });
        }
    }
    let q_p = 0.75 * (v_p / v_s).powi(2) * q_s;
    let cot = 1.0 / (ATTENUATION_BETA * PI / 2.0).tan();
    Ok(SeismicVelocities {
        v_p: v_p * (1.0 - 0.5 * cot / q_p),
        v_s: v_s * (1.0 - 0.5 * cot / q_s),
        v_phi: v_phi * (1.0 - 0.5 * cot / q_phi),
    })
}

/// `attenuation_correction` applied along a whole profile.
pub fn apply_attenuation_correction(
    profile: &VelocityProfile,
    q_s: f64,
    q_phi: f64,
) -> SeismicResult<VelocityProfile> {
    check_len("v_s", profile.v_p.len(), profile.v_s.len())?;
    check_len("v_phi", profile.v_p.len(), profile.v_phi.len())?;
    let mut out = VelocityProfile::default();
    for ((&v_p, &v_s), &v_phi) in profile.v_p.iter().zip(&profile.v_s).zip(&profile.v_phi) {
        out.push(attenuation_correction(v_p, v_s, v_phi, q_s, q_phi)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::averaging::{Averaging, Voigt};
    use sf_core::ErrorKind;
    use sf_eos::{EosMethod, ParameterSet};
    use sf_minerals::Mineral;

    fn periclase() -> Material {
        Mineral::new(
            "periclase",
            ParameterSet::new(11.24e-6, 161.0e9, 3.8, 0.0403, 2.0)
                .with_shear(131.0e9, 2.1)
                .with_method(EosMethod::Bm3),
        )
        .into()
    }

    #[test]
    fn single_mineral_rock_matches_mineral_velocities() {
        let rock = periclase();
        let pressures = [10.0e9, 60.0e9];
        let temperatures = [300.0, 300.0];
        let props = velocities_from_rock(&rock, &pressures, &temperatures, &Voigt).unwrap();

        let mut m = periclase();
        m.set_state_si(60.0e9, 300.0).unwrap();
        let leaf = m.unroll().unwrap()[0].1.velocities().unwrap();
        assert_eq!(props.v_s[1], leaf.v_s);
        assert_eq!(props.v_p[1], leaf.v_p);
        assert!(props.density[1] > props.density[0]);
    }

    #[test]
    fn compute_velocities_reports_bad_entry() {
        let good = ElasticProperties {
            volume: 1.0e-5,
            density: 4000.0,
            bulk_modulus: 160.0e9,
            shear_modulus: 130.0e9,
            fraction: 1.0,
        };
        let bad = ElasticProperties {
            shear_modulus: -1.0,
            ..good
        };
        let err = compute_velocities(&[good, bad]).unwrap_err();
        assert_eq!(err.sample_index(), Some(1));
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn attenuation_slows_every_wave() {
        let v = attenuation_correction(13_000.0, 7_000.0, 10_000.0, 300.0, 1000.0).unwrap();
        assert!(v.v_p < 13_000.0 && v.v_s < 7_000.0 && v.v_phi < 10_000.0);
        let cot = 1.0 / (0.3 * PI / 2.0).tan();
        assert!((v.v_s - 7_000.0 * (1.0 - 0.5 * cot / 300.0)).abs() < 1e-9);
    }

    #[test]
    fn attenuation_rejects_non_positive_q() {
        assert!(attenuation_correction(13_000.0, 7_000.0, 10_000.0, 0.0, 1000.0).is_err());
    }

    #[test]
    fn profile_attenuation_keeps_length() {
        let profile = VelocityProfile {
            v_p: vec![12_000.0, 13_000.0],
            v_s: vec![6_500.0, 7_000.0],
            v_phi: vec![9_000.0, 10_000.0],
        };
        let corrected = apply_attenuation_correction(&profile, 250.0, 1000.0).unwrap();
        assert_eq!(corrected.len(), 2);
    }

    #[test]
    fn every_scheme_runs_end_to_end() {
        let rock = periclase();
        for averaging in Averaging::ALL {
            let props =
                velocities_from_rock(&rock, &[30.0e9], &[300.0], averaging.scheme()).unwrap();
            assert_eq!(props.v_p.len(), 1);
        }
    }
}
