//! Bulk composition to phase proportions, and iron partitioning between
//! ferropericlase and perovskite.

use crate::error::{MaterialError, MaterialResult};
use serde::{Deserialize, Serialize};
use sf_core::units::constants::GAS_CONSTANT;
use sf_core::units::{Pressure, Temperature};

/// Molar masses of the elements [kg/mol].
pub mod molar_mass {
    pub const FE: f64 = 55.845e-3;
    pub const MG: f64 = 24.305e-3;
    pub const O: f64 = 15.999e-3;
    pub const AL: f64 = 26.982e-3;
    pub const CA: f64 = 40.078e-3;
    pub const SI: f64 = 28.085e-3;
}

/// Average activation volume of the Fe–Mg exchange [m³/mol] (Nakajima et al. 2012).
const EXCHANGE_DELTA_V: f64 = 2.0e-7;

/// Reference pressure of the exchange coefficient [Pa].
const EXCHANGE_REFERENCE_PRESSURE: f64 = 25.0e9;

/// Bulk composition as element weight fractions (1.0 = 100 wt%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightFractions {
    pub mg: f64,
    pub fe: f64,
    pub si: f64,
    #[serde(default)]
    pub ca: f64,
    #[serde(default)]
    pub al: f64,
}

/// Perovskite and ferropericlase molar proportions; they sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseProportions {
    pub pv: f64,
    pub fp: f64,
}

/// Oxide moles relative to MgO + FeO.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeMoles {
    pub mgo: f64,
    pub feo: f64,
    pub sio2: f64,
    pub ca: f64,
    pub al: f64,
}

/// Iron fractions in each phase.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IronPartition {
    /// Fe/(Fe + Mg) in ferropericlase
    pub ferropericlase: f64,
    /// Fe/(Fe + Mg) in perovskite
    pub perovskite: f64,
}

/// Convert weight fractions into phase proportions.
///
/// All silicon is assigned to perovskite and the remaining Mg and Fe to
/// ferropericlase. Fails if there is no silicon, no Mg + Fe, or more
/// silicon than Mg + Fe.
pub fn calculate_phase_percents(
    input: &WeightFractions,
) -> MaterialResult<(PhaseProportions, RelativeMoles)> {
    for (name, value) in [
        ("mg", input.mg),
        ("fe", input.fe),
        ("si", input.si),
        ("ca", input.ca),
        ("al", input.al),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(MaterialError::config(format!(
                "weight fraction of {name} must be non-negative, got {value}"
            )));
        }
    }
    if input.si == 0.0 {
        return Err(MaterialError::config("composition contains no silicon"));
    }

    let mgo = input.mg / molar_mass::MG;
    let feo = input.fe / molar_mass::FE;
    let norm = mgo + feo;
    if norm == 0.0 {
        return Err(MaterialError::config("composition contains no Mg or Fe"));
    }
    let moles = RelativeMoles {
        mgo: mgo / norm,
        feo: feo / norm,
        sio2: input.si / molar_mass::SI / norm,
        ca: input.ca / molar_mass::CA / norm,
        al: input.al / molar_mass::AL / norm,
    };
    if moles.sio2 > 1.0 {
        return Err(MaterialError::config(format!(
            "silicon exceeds Mg + Fe (relative SiO2 {:.4})",
            moles.sio2
        )));
    }
    let phases = PhaseProportions {
        pv: moles.sio2,
        fp: 1.0 - moles.sio2,
    };
    Ok((phases, moles))
}

/// Iron partitioning between ferropericlase and perovskite.
///
/// The exchange coefficient K(P, T) = Kd₀ exp((25 GPa − P) ΔV / RT) closes
/// the iron mass balance `a (1 − x_SiO2) + b x_SiO2 = x_FeO` together with
/// `K = [b/(1 − b)] / [a/(1 − a)]`.
pub fn calculate_partition_coefficient(
    pressure: Pressure,
    temperature: Temperature,
    moles: &RelativeMoles,
    initial_distribution_coefficient: f64,
) -> MaterialResult<IronPartition> {
    let p = pressure.value;
    let t = temperature.value;
    let kd_0 = initial_distribution_coefficient;
    if !(t.is_finite() && t > 0.0) {
        return Err(MaterialError::Domain {
            what: "temperature",
            value: t,
        });
    }
    if !(kd_0.is_finite() && kd_0 > 0.0) {
        return Err(MaterialError::config(format!(
            "initial distribution coefficient must be positive, got {kd_0}"
        )));
    }
    let feo = moles.feo;
    let sio2 = moles.sio2;
    if sio2 == 0.0 {
        return Err(MaterialError::config("composition contains no silicon"));
    }

    let rs = (EXCHANGE_REFERENCE_PRESSURE - p) * EXCHANGE_DELTA_V / (GAS_CONSTANT * t) + kd_0.ln();
    let k = rs.exp();
    // K = 1 splits iron evenly and the quadratic below degenerates
    if (1.0 - k).abs() < 1e-12 {
        return Ok(IronPartition {
            ferropericlase: feo,
            perovskite: feo,
        });
    }

    let num = -4.0 * feo * (k - 1.0) * k * sio2 + (1.0 + feo * (k - 1.0) + (k - 1.0) * sio2).powi(2);
    if num < 0.0 {
        return Err(MaterialError::Domain {
            what: "partitioning discriminant",
            value: num,
        });
    }
    let b = (-1.0 + feo - feo * k + sio2 - sio2 * k + num.sqrt()) / (2.0 * sio2 * (1.0 - k));
    let a = b / ((1.0 - b) * k + b);
    Ok(IronPartition {
        ferropericlase: a,
        perovskite: b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::ErrorKind;
    use sf_core::units::{gpa, k};

    fn pyrolite_like() -> WeightFractions {
        WeightFractions {
            mg: 0.213,
            fe: 0.0626,
            si: 0.242,
            ca: 0.0,
            al: 0.0,
        }
    }

    #[test]
    fn phase_proportions_sum_to_one() {
        let (phases, moles) = calculate_phase_percents(&pyrolite_like()).unwrap();
        assert!((phases.pv + phases.fp - 1.0).abs() < 1e-15);
        assert!((moles.mgo + moles.feo - 1.0).abs() < 1e-15);
        assert!((phases.pv - 0.8717).abs() < 1e-3);
        assert!((moles.feo - 0.1134).abs() < 1e-3);
    }

    #[test]
    fn zero_silicon_is_configuration_error() {
        let input = WeightFractions {
            si: 0.0,
            ..pyrolite_like()
        };
        let err = calculate_phase_percents(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn zero_mg_and_fe_is_configuration_error() {
        let input = WeightFractions {
            mg: 0.0,
            fe: 0.0,
            ..pyrolite_like()
        };
        assert!(calculate_phase_percents(&input).is_err());
    }

    #[test]
    fn negative_input_is_rejected() {
        let input = WeightFractions {
            fe: -0.01,
            ..pyrolite_like()
        };
        assert!(calculate_phase_percents(&input).is_err());
    }

    #[test]
    fn partition_closes_iron_mass_balance() {
        let (_, moles) = calculate_phase_percents(&pyrolite_like()).unwrap();
        let part = calculate_partition_coefficient(gpa(23.83), k(1900.0), &moles, 0.5).unwrap();
        let a = part.ferropericlase;
        let b = part.perovskite;
        assert!(0.0 < b && b < a && a < 1.0);
        assert!((a * (1.0 - moles.sio2) + b * moles.sio2 - moles.feo).abs() < 1e-10);
        assert!((a - 0.1845).abs() < 1e-3);
        assert!((b - 0.1030).abs() < 1e-3);

        let rs = (25.0e9 - 23.83e9) * 2.0e-7 / (GAS_CONSTANT * 1900.0) + 0.5_f64.ln();
        let kd = (b / (1.0 - b)) / (a / (1.0 - a));
        assert!((kd - rs.exp()).abs() < 1e-10);
    }

    #[test]
    fn unit_exchange_coefficient_splits_iron_evenly() {
        let (_, moles) = calculate_phase_percents(&pyrolite_like()).unwrap();
        let part = calculate_partition_coefficient(gpa(25.0), k(2000.0), &moles, 1.0).unwrap();
        assert_eq!(part.ferropericlase, moles.feo);
        assert_eq!(part.perovskite, moles.feo);

        // continuous with a coefficient just above 1
        let near = calculate_partition_coefficient(gpa(25.0), k(2000.0), &moles, 1.001).unwrap();
        assert!((near.ferropericlase - moles.feo).abs() < 1e-3);
        assert!((near.perovskite - moles.feo).abs() < 1e-3);
        assert!(near.perovskite > near.ferropericlase);
    }

    #[test]
    fn partition_rejects_bad_temperature() {
        let (_, moles) = calculate_phase_percents(&pyrolite_like()).unwrap();
        let err = calculate_partition_coefficient(gpa(30.0), k(0.0), &moles, 0.5).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }
}
