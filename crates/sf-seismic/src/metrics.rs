//! Misfit between a computed profile and a reference profile.
//!
//! Pure reductions, used for scoring only.

use crate::error::{SeismicError, SeismicResult, check_len};
use serde::{Deserialize, Serialize};
use sf_core::{is_strictly_monotonic, trapz};

/// Assumed fractional a-priori uncertainty of a reference model.
pub const CHI_FACTOR_UNCERTAINTY: f64 = 0.01;

/// Per-quantity misfits of density, bulk-sound and shear velocity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Misfit {
    pub density: f64,
    pub v_phi: f64,
    pub v_s: f64,
}

impl Misfit {
    pub fn total(&self) -> f64 {
        self.density + self.v_phi + self.v_s
    }
}

fn check_pair(a: &[f64], b: &[f64]) -> SeismicResult<()> {
    check_len("compared series", a.len(), b.len())?;
    if a.is_empty() {
        return Err(SeismicError::InvalidArg {
            what: "misfit of an empty series",
        });
    }
    Ok(())
}

/// ∫ (a − b)² dx by the trapezoid rule; `x` must be strictly monotonic.
pub fn l2(x: &[f64], a: &[f64], b: &[f64]) -> SeismicResult<f64> {
    check_pair(a, b)?;
    check_len("sample axis", a.len(), x.len())?;
    if !is_strictly_monotonic(x) {
        return Err(SeismicError::InvalidArg {
            what: "l2 sample axis must be strictly monotonic",
        });
    }
    let diff_sq: Vec<f64> = a.iter().zip(b).map(|(a, b)| (a - b).powi(2)).collect();
    Ok(trapz(x, &diff_sq)?)
}

/// Root-mean-square difference normalised by the range of `a`.
///
/// A flat `a` has no range; the absolute RMS difference is returned instead.
pub fn nrmse(a: &[f64], b: &[f64]) -> SeismicResult<f64> {
    check_pair(a, b)?;
    let n = a.len() as f64;
    let rmse = (a.iter().zip(b).map(|(a, b)| (a - b).powi(2)).sum::<f64>() / n).sqrt();
    let (min, max) = a
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;
    Ok(if range > 0.0 { rmse / range } else { rmse })
}

/// Mean squared deviation in units of a 1 % uncertainty on `observed`.
pub fn chi_factor(calculated: &[f64], observed: &[f64]) -> SeismicResult<f64> {
    check_pair(calculated, observed)?;
    let n = observed.len() as f64;
    let sigma = CHI_FACTOR_UNCERTAINTY * observed.iter().sum::<f64>() / n;
    if sigma == 0.0 {
        return Err(SeismicError::Domain {
            what: "mean of observed series",
            value: 0.0,
        });
    }
    Ok(calculated
        .iter()
        .zip(observed)
        .map(|(c, o)| ((c - o) / sigma).powi(2))
        .sum::<f64>()
        / n)
}

/// L2 misfits of density, Vφ and Vs over depth.
#[allow(clippy::too_many_arguments)]
pub fn compare_l2(
    depth: &[f64],
    mat_vs: &[f64],
    mat_vphi: &[f64],
    mat_rho: &[f64],
    seis_vs: &[f64],
    seis_vphi: &[f64],
    seis_rho: &[f64],
) -> SeismicResult<Misfit> {
    Ok(Misfit {
        density: l2(depth, mat_rho, seis_rho)?,
        v_phi: l2(depth, mat_vphi, seis_vphi)?,
        v_s: l2(depth, mat_vs, seis_vs)?,
    })
}

/// Chi factors of density, Vφ and Vs.
pub fn compare_chifactor(
    mat_vs: &[f64],
    mat_vphi: &[f64],
    mat_rho: &[f64],
    seis_vs: &[f64],
    seis_vphi: &[f64],
    seis_rho: &[f64],
) -> SeismicResult<Misfit> {
    Ok(Misfit {
        density: chi_factor(mat_rho, seis_rho)?,
        v_phi: chi_factor(mat_vphi, seis_vphi)?,
        v_s: chi_factor(mat_vs, seis_vs)?,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn nrmse_of_identical_series_is_zero(f in prop::collection::vec(-1.0e6_f64..1.0e6, 1..50)) {
            prop_assert_eq!(nrmse(&f, &f).unwrap(), 0.0);
        }

        #[test]
        fn l2_is_non_negative(
            a in prop::collection::vec(-10.0_f64..10.0, 2..20),
            shift in -5.0_f64..5.0,
        ) {
            let x: Vec<f64> = (0..a.len()).map(|i| i as f64).collect();
            let b: Vec<f64> = a.iter().map(|v| v + shift).collect();
            prop_assert!(l2(&x, &a, &b).unwrap() >= 0.0);
        }
    }
}
