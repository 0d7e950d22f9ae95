//! Debye model of lattice vibrations.
//!
//! The thermal formulations (MGD and SLB) describe the vibrational free
//! energy with a single Debye temperature. Everything here is per mole of
//! formula units with `n` atoms each.

use sf_core::units::constants::GAS_CONSTANT;
use std::f64::consts::PI;

/// Bernoulli-series coefficients B_k / (k! (k+3)) for the small-x expansion
/// of the Debye function, indexed by k = 0, 1, 2, 4, 6, ...
const SMALL_X_SERIES: [(i32, f64); 8] = [
    (0, 1.0 / 3.0),
    (1, -1.0 / 8.0),
    (2, 1.0 / 60.0),
    (4, -1.0 / 5040.0),
    (6, 1.0 / 272_160.0),
    (8, -1.0 / 13_305_600.0),
    (10, 1.0 / 622_702_080.0),
    (12, -691.0 / 19_615_115_520_000.0),
];

/// Crossover between the power series and the exponential series.
const SERIES_CROSSOVER: f64 = 1.0;

const MAX_EXP_TERMS: usize = 200;

/// Third-order Debye function D₃(x) = 3/x³ ∫₀ˣ t³/(eᵗ − 1) dt.
///
/// D₃(0) = 1 and D₃(x) → π⁴/(5x³) for large x.
pub fn debye_fn(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < SERIES_CROSSOVER {
        let sum: f64 = SMALL_X_SERIES
            .iter()
            .map(|&(k, c)| c * x.powi(k))
            .sum();
        return 3.0 * sum;
    }

    // ∫₀ˣ = π⁴/15 − Σₖ e^{−kx} (x³/k + 3x²/k² + 6x/k³ + 6/k⁴)
    let x2 = x * x;
    let x3 = x2 * x;
    let mut tail = 0.0;
    for k in 1..=MAX_EXP_TERMS {
        let kf = k as f64;
        let term = (-kf * x).exp() * (x3 / kf + 3.0 * x2 / kf.powi(2) + 6.0 * x / kf.powi(3)
            + 6.0 / kf.powi(4));
        tail += term;
        if term < 1e-17 * tail {
            break;
        }
    }
    let integral = PI.powi(4) / 15.0 - tail;
    3.0 * integral / x3
}

/// Vibrational thermal energy E_th = 3nRT·D₃(θ/T) [J/mol].
pub fn thermal_energy(temperature: f64, debye_temperature: f64, n: f64) -> f64 {
    if temperature <= 0.0 {
        return 0.0;
    }
    3.0 * n * GAS_CONSTANT * temperature * debye_fn(debye_temperature / temperature)
}

/// Isochoric heat capacity C_v = 3nR (4D₃(x) − 3x/(eˣ − 1)), x = θ/T [J/(mol·K)].
pub fn heat_capacity_v(temperature: f64, debye_temperature: f64, n: f64) -> f64 {
    if temperature <= 0.0 {
        return 0.0;
    }
    let x = debye_temperature / temperature;
    3.0 * n * GAS_CONSTANT * (4.0 * debye_fn(x) - 3.0 * bose_factor(x))
}

/// x/(eˣ − 1), with the x → 0 limit of 1.
pub(crate) fn bose_factor(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        x / x.exp_m1()
    }
}
