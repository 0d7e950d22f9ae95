//! Bounded root finding for volume inversion.

use crate::error::{EosError, EosResult};

/// Bracket and iteration budget for inverting P(V, T) = P.
///
/// The bracket is expressed as multiples of the reference volume V₀; the
/// pressure equation is monotonically decreasing in V inside any physically
/// sensible bracket, so Brent's method is guaranteed to terminate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootConfig {
    /// Lower end of the bracket as a fraction of V₀
    pub lower_factor: f64,
    /// Upper end of the bracket as a fraction of V₀
    pub upper_factor: f64,
    /// Maximum number of Brent iterations
    pub max_iterations: usize,
    /// Convergence tolerance on V relative to V₀
    pub rel_tol: f64,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            lower_factor: 0.5,
            upper_factor: 1.5,
            max_iterations: 100,
            rel_tol: 1e-12,
        }
    }
}

impl RootConfig {
    /// Absolute bracket for a mineral with reference volume `v_0`.
    pub fn bracket(&self, v_0: f64) -> (f64, f64) {
        (self.lower_factor * v_0, self.upper_factor * v_0)
    }
}

/// Solve `residual(V) = 0` for V inside the bracket derived from `v_0`.
pub fn solve_volume<F>(residual: F, v_0: f64, config: &RootConfig) -> EosResult<f64>
where
    F: FnMut(f64) -> EosResult<f64>,
{
    if !(config.lower_factor > 0.0 && config.upper_factor > config.lower_factor) {
        return Err(EosError::InvalidParameter {
            name: "root bracket",
            value: config.lower_factor,
        });
    }
    let (lower, upper) = config.bracket(v_0);
    brent(residual, lower, upper, config.rel_tol * v_0, config.max_iterations)
}

/// Brent's method on `[lower, upper]`.
///
/// Requires a sign change across the bracket. Non-finite residuals are
/// reported as `NonPhysical` rather than steering the iteration.
pub fn brent<F>(
    mut f: F,
    lower: f64,
    upper: f64,
    x_tol: f64,
    max_iterations: usize,
) -> EosResult<f64>
where
    F: FnMut(f64) -> EosResult<f64>,
{
    let mut eval = |x: f64| -> EosResult<f64> {
        let v = f(x)?;
        if v.is_finite() {
            Ok(v)
        } else {
            Err(EosError::NonPhysical {
                what: "pressure residual",
                value: v,
            })
        }
    };

    let mut a = lower;
    let mut b = upper;
    let mut fa = eval(a)?;
    let mut fb = eval(b)?;

    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }
    if (fa > 0.0) == (fb > 0.0) {
        return Err(EosError::ConvergenceFailed {
            what: format!("no root bracketed in [{a:e}, {b:e}] (f = {fa:e}, {fb:e})"),
        });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iterations {
        if (fb > 0.0) == (fc > 0.0) {
            // Root lies between a and b; reset c
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * x_tol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol1 || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation (or secant when a == c)
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let qq = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * qq * (qq - r) - (b - a) * (r - 1.0)),
                    (qq - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            // Bisection
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.copysign(xm);
        }
        fb = eval(b)?;
    }

    Err(EosError::ConvergenceFailed {
        what: format!("maximum iterations {max_iterations} reached, last estimate {b:e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_square_root() {
        let root = brent(|x| Ok(x * x - 2.0), 0.0, 2.0, 1e-14, 100).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn decreasing_function() {
        // Same shape as a pressure residual: decreasing in x
        let root = brent(|x| Ok(1.0 / x - 4.0), 0.1, 1.0, 1e-14, 100).unwrap();
        assert!((root - 0.25).abs() < 1e-12);
    }

    #[test]
    fn unbracketed_root_is_reported() {
        let err = brent(|x| Ok(x * x + 1.0), -1.0, 1.0, 1e-12, 100).unwrap_err();
        assert!(matches!(err, EosError::ConvergenceFailed { .. }));
    }

    #[test]
    fn iteration_cap_is_honoured() {
        let err = brent(|x| Ok(x * x * x - 0.3), 0.0, 1.0, 0.0, 1).unwrap_err();
        assert!(matches!(err, EosError::ConvergenceFailed { .. }));
    }

    #[test]
    fn nan_residual_is_non_physical() {
        let err = brent(|_| Ok(f64::NAN), 0.0, 1.0, 1e-12, 10).unwrap_err();
        assert!(matches!(err, EosError::NonPhysical { .. }));
    }

    #[test]
    fn volume_bracket_scales_with_reference() {
        let cfg = RootConfig::default();
        let (lo, hi) = cfg.bracket(10.0e-6);
        assert!((lo - 5.0e-6).abs() < 1e-18);
        assert!((hi - 15.0e-6).abs() < 1e-18);
        let v = solve_volume(|v| Ok(10.0e-6 - v), 10.0e-6, &cfg).unwrap();
        assert!((v - 10.0e-6).abs() < 1e-16);
    }
}
