//! Averaging schemes that mix per-phase moduli into rock moduli.
//!
//! Every scheme weights phases by volume fraction V_i / ΣV except `Linear`,
//! which weights by mass. Density is always the volume-weighted mean. A
//! single phase returns its own values exactly under every scheme.

use crate::elastic::ElasticProperties;
use crate::error::{SeismicError, SeismicResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy for mixing elastic moduli of coexisting phases.
///
/// Implementations are stateless. The per-quantity methods expect a
/// non-empty slice with positive volumes; `average` checks that first.
pub trait AveragingScheme: Send + Sync {
    fn name(&self) -> &'static str;

    fn average_bulk_moduli(&self, phases: &[ElasticProperties]) -> f64;

    fn average_shear_moduli(&self, phases: &[ElasticProperties]) -> f64;

    fn average_density(&self, phases: &[ElasticProperties]) -> f64 {
        voigt(phases, |p| p.density)
    }

    /// Mix `phases` into one assemblage-level snapshot.
    fn average(&self, phases: &[ElasticProperties]) -> SeismicResult<ElasticProperties> {
        check_phases(phases)?;
        Ok(ElasticProperties {
            volume: phases.iter().map(|p| p.volume).sum(),
            density: self.average_density(phases),
            bulk_modulus: self.average_bulk_moduli(phases),
            shear_modulus: self.average_shear_moduli(phases),
            fraction: 1.0,
        })
    }
}

fn check_phases(phases: &[ElasticProperties]) -> SeismicResult<()> {
    if phases.is_empty() {
        return Err(SeismicError::InvalidArg {
            what: "averaging needs at least one phase",
        });
    }
    for p in phases {
        if !(p.volume.is_finite() && p.volume > 0.0) {
            return Err(SeismicError::Domain {
                what: "phase volume",
                value: p.volume,
            });
        }
    }
    Ok(())
}

fn single(phases: &[ElasticProperties], value: impl Fn(&ElasticProperties) -> f64) -> Option<f64> {
    match phases {
        [only] => Some(value(only)),
        _ => None,
    }
}

/// Volume-weighted arithmetic mean.
fn voigt(phases: &[ElasticProperties], value: impl Fn(&ElasticProperties) -> f64) -> f64 {
    if let Some(v) = single(phases, &value) {
        return v;
    }
    let total: f64 = phases.iter().map(|p| p.volume).sum();
    phases.iter().map(|p| p.volume * value(p)).sum::<f64>() / total
}

/// Volume-weighted harmonic mean.
fn reuss(phases: &[ElasticProperties], value: impl Fn(&ElasticProperties) -> f64) -> f64 {
    if let Some(v) = single(phases, &value) {
        return v;
    }
    let total: f64 = phases.iter().map(|p| p.volume).sum();
    total / phases.iter().map(|p| p.volume / value(p)).sum::<f64>()
}

/// Mass-weighted arithmetic mean.
fn mass_weighted(phases: &[ElasticProperties], value: impl Fn(&ElasticProperties) -> f64) -> f64 {
    if let Some(v) = single(phases, &value) {
        return v;
    }
    let total: f64 = phases.iter().map(|p| p.volume * p.density).sum();
    phases
        .iter()
        .map(|p| p.volume * p.density * value(p))
        .sum::<f64>()
        / total
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
    Upper,
    Lower,
}

/// Reference medium of the Hashin–Shtrikman bound: the stiffest phase moduli
/// for the upper bound, the softest for the lower.
fn reference_moduli(phases: &[ElasticProperties], bound: Bound) -> (f64, f64) {
    let pick = |a: f64, b: f64| match bound {
        Bound::Upper => a.max(b),
        Bound::Lower => a.min(b),
    };
    let start = match bound {
        Bound::Upper => f64::NEG_INFINITY,
        Bound::Lower => f64::INFINITY,
    };
    phases.iter().fold((start, start), |(k, g), p| {
        (pick(k, p.bulk_modulus), pick(g, p.shear_modulus))
    })
}

fn hashin_shtrikman_bulk(phases: &[ElasticProperties], bound: Bound) -> f64 {
    if let Some(v) = single(phases, |p| p.bulk_modulus) {
        return v;
    }
    let (k_n, g_n) = reference_moduli(phases, bound);
    let total: f64 = phases.iter().map(|p| p.volume).sum();
    let alpha = -3.0 / (3.0 * k_n + 4.0 * g_n);
    let a: f64 = phases
        .iter()
        .filter(|p| p.bulk_modulus != k_n)
        .map(|p| (p.volume / total) / (1.0 / (p.bulk_modulus - k_n) - alpha))
        .sum();
    k_n + a / (1.0 + alpha * a)
}

fn hashin_shtrikman_shear(phases: &[ElasticProperties], bound: Bound) -> f64 {
    if let Some(v) = single(phases, |p| p.shear_modulus) {
        return v;
    }
    let (k_n, g_n) = reference_moduli(phases, bound);
    if g_n == 0.0 {
        // a fluid reference medium carries no shear
        return 0.0;
    }
    let total: f64 = phases.iter().map(|p| p.volume).sum();
    let beta = -3.0 * (k_n + 2.0 * g_n) / (5.0 * g_n * (3.0 * k_n + 4.0 * g_n));
    let b: f64 = phases
        .iter()
        .filter(|p| p.shear_modulus != g_n)
        .map(|p| (p.volume / total) / (1.0 / (2.0 * (p.shear_modulus - g_n)) - beta))
        .sum();
    g_n + 0.5 * b / (1.0 + beta * b)
}

/// Voigt (iso-strain) upper bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct Voigt;

impl AveragingScheme for Voigt {
    fn name(&self) -> &'static str {
        "voigt"
    }
    fn average_bulk_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        voigt(phases, |p| p.bulk_modulus)
    }
    fn average_shear_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        voigt(phases, |p| p.shear_modulus)
    }
}

/// Reuss (iso-stress) lower bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reuss;

impl AveragingScheme for Reuss {
    fn name(&self) -> &'static str {
        "reuss"
    }
    fn average_bulk_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        reuss(phases, |p| p.bulk_modulus)
    }
    fn average_shear_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        reuss(phases, |p| p.shear_modulus)
    }
}

/// Mean of the Voigt and Reuss bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoigtReussHill;

impl AveragingScheme for VoigtReussHill {
    fn name(&self) -> &'static str {
        "vrh"
    }
    fn average_bulk_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        0.5 * (Voigt.average_bulk_moduli(phases) + Reuss.average_bulk_moduli(phases))
    }
    fn average_shear_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        0.5 * (Voigt.average_shear_moduli(phases) + Reuss.average_shear_moduli(phases))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HashinShtrikmanUpper;

impl AveragingScheme for HashinShtrikmanUpper {
    fn name(&self) -> &'static str {
        "hs_upper"
    }
    fn average_bulk_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        hashin_shtrikman_bulk(phases, Bound::Upper)
    }
    fn average_shear_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        hashin_shtrikman_shear(phases, Bound::Upper)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HashinShtrikmanLower;

impl AveragingScheme for HashinShtrikmanLower {
    fn name(&self) -> &'static str {
        "hs_lower"
    }
    fn average_bulk_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        hashin_shtrikman_bulk(phases, Bound::Lower)
    }
    fn average_shear_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        hashin_shtrikman_shear(phases, Bound::Lower)
    }
}

/// Mean of the Hashin–Shtrikman bounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashinShtrikmanAverage;

impl AveragingScheme for HashinShtrikmanAverage {
    fn name(&self) -> &'static str {
        "hs_average"
    }
    fn average_bulk_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        0.5 * (hashin_shtrikman_bulk(phases, Bound::Upper)
            + hashin_shtrikman_bulk(phases, Bound::Lower))
    }
    fn average_shear_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        0.5 * (hashin_shtrikman_shear(phases, Bound::Upper)
            + hashin_shtrikman_shear(phases, Bound::Lower))
    }
}

/// Mass-weighted mean of the moduli. Not a bound; diagnostic only.
#[derive(Debug, Clone, Copy, Default)]
pub struct Linear;

impl AveragingScheme for Linear {
    fn name(&self) -> &'static str {
        "linear"
    }
    fn average_bulk_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        mass_weighted(phases, |p| p.bulk_modulus)
    }
    fn average_shear_moduli(&self, phases: &[ElasticProperties]) -> f64 {
        mass_weighted(phases, |p| p.shear_modulus)
    }
}

/// Named choice of averaging scheme, as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Averaging {
    Voigt,
    Reuss,
    #[default]
    Vrh,
    HsUpper,
    HsLower,
    HsAverage,
    Linear,
}

impl Averaging {
    pub const ALL: [Averaging; 7] = [
        Averaging::Voigt,
        Averaging::Reuss,
        Averaging::Vrh,
        Averaging::HsUpper,
        Averaging::HsLower,
        Averaging::HsAverage,
        Averaging::Linear,
    ];

    pub fn scheme(&self) -> &'static dyn AveragingScheme {
        match self {
            Averaging::Voigt => &Voigt,
            Averaging::Reuss => &Reuss,
            Averaging::Vrh => &VoigtReussHill,
            Averaging::HsUpper => &HashinShtrikmanUpper,
            Averaging::HsLower => &HashinShtrikmanLower,
            Averaging::HsAverage => &HashinShtrikmanAverage,
            Averaging::Linear => &Linear,
        }
    }

    pub fn key(&self) -> &'static str {
        self.scheme().name()
    }
}

impl fmt::Display for Averaging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Averaging {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "voigt" => Ok(Averaging::Voigt),
            "reuss" => Ok(Averaging::Reuss),
            "vrh" | "voigt_reuss_hill" => Ok(Averaging::Vrh),
            "hs_upper" | "hashin_shtrikman_upper" => Ok(Averaging::HsUpper),
            "hs_lower" | "hashin_shtrikman_lower" => Ok(Averaging::HsLower),
            "hs_average" | "hashin_shtrikman_average" => Ok(Averaging::HsAverage),
            "linear" => Ok(Averaging::Linear),
            _ => Err("unknown averaging scheme"),
        }
    }
}

/// Average every sample of a `[sample][phase]` table.
pub fn average_moduli(
    moduli: &[Vec<ElasticProperties>],
    scheme: &dyn AveragingScheme,
) -> SeismicResult<Vec<ElasticProperties>> {
    moduli.iter().map(|phases| scheme.average(phases)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(volume: f64, density: f64, k: f64, g: f64) -> ElasticProperties {
        ElasticProperties {
            volume,
            density,
            bulk_modulus: k,
            shear_modulus: g,
            fraction: 0.5,
        }
    }

    fn two_phases() -> Vec<ElasticProperties> {
        vec![
            phase(10.0e-6, 4000.0, 250.0e9, 175.0e9),
            phase(10.0e-6, 3600.0, 160.0e9, 130.0e9),
        ]
    }

    #[test]
    fn single_phase_is_returned_exactly() {
        let only = [phase(0.37 * 11.24e-6, 3585.1, 161.3e9, 131.7e9)];
        for averaging in Averaging::ALL {
            let avg = averaging.scheme().average(&only).unwrap();
            assert_eq!(avg.bulk_modulus, only[0].bulk_modulus, "{averaging}");
            assert_eq!(avg.shear_modulus, only[0].shear_modulus, "{averaging}");
            assert_eq!(avg.density, only[0].density, "{averaging}");
        }
    }

    #[test]
    fn equal_volumes_give_textbook_means() {
        let phases = two_phases();
        assert_eq!(Voigt.average_bulk_moduli(&phases), 205.0e9);
        let reuss = Reuss.average_bulk_moduli(&phases);
        let expected = 2.0 / (1.0 / 250.0e9 + 1.0 / 160.0e9);
        assert!((reuss - expected).abs() < 1.0);
        let vrh = VoigtReussHill.average_bulk_moduli(&phases);
        assert!((vrh - 0.5 * (205.0e9 + expected)).abs() < 1.0);
        assert_eq!(Voigt.average_density(&phases), 3800.0);
    }

    #[test]
    fn hashin_shtrikman_bounds_nest_inside_voigt_reuss() {
        let phases = two_phases();
        let voigt = Voigt.average_bulk_moduli(&phases);
        let reuss = Reuss.average_bulk_moduli(&phases);
        let upper = HashinShtrikmanUpper.average_bulk_moduli(&phases);
        let lower = HashinShtrikmanLower.average_bulk_moduli(&phases);
        assert!(voigt >= upper && upper >= lower && lower >= reuss);

        let voigt = Voigt.average_shear_moduli(&phases);
        let reuss = Reuss.average_shear_moduli(&phases);
        let upper = HashinShtrikmanUpper.average_shear_moduli(&phases);
        let lower = HashinShtrikmanLower.average_shear_moduli(&phases);
        assert!(voigt >= upper && upper >= lower && lower >= reuss);
    }

    #[test]
    fn fluid_phase_zeroes_hs_lower_shear() {
        let phases = vec![
            phase(10.0e-6, 4000.0, 250.0e9, 175.0e9),
            phase(10.0e-6, 1000.0, 2.2e9, 0.0),
        ];
        assert_eq!(HashinShtrikmanLower.average_shear_moduli(&phases), 0.0);
        assert_eq!(Reuss.average_shear_moduli(&phases), 0.0);
    }

    #[test]
    fn linear_weights_by_mass() {
        let phases = vec![
            phase(10.0e-6, 3000.0, 100.0e9, 50.0e9),
            phase(10.0e-6, 1000.0, 200.0e9, 50.0e9),
        ];
        let k = Linear.average_bulk_moduli(&phases);
        assert!((k - 125.0e9).abs() < 1.0);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(Voigt.average(&[]).is_err());
        let bad = [phase(0.0, 3000.0, 1.0e9, 1.0e9)];
        assert!(Reuss.average(&bad).is_err());
    }

    #[test]
    fn averaging_parses_and_serializes() {
        for averaging in Averaging::ALL {
            let parsed: Averaging = averaging.key().parse().unwrap();
            assert_eq!(parsed, averaging);
        }
        assert_eq!("Voigt-Reuss-Hill".parse::<Averaging>().unwrap(), Averaging::Vrh);
        assert_eq!(Averaging::default(), Averaging::Vrh);
    }
}
