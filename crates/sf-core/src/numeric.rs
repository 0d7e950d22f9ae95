use crate::SfError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, SfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(SfError::NonFinite { what, value: v })
    }
}

fn ensure_same_len(x: &[Real], y: &[Real], what: &'static str) -> Result<(), SfError> {
    if x.len() != y.len() {
        return Err(SfError::LengthMismatch {
            what,
            expected: x.len(),
            actual: y.len(),
        });
    }
    Ok(())
}

/// True when every sample is strictly larger than the one before it.
pub fn is_strictly_increasing(x: &[Real]) -> bool {
    x.windows(2).all(|w| w[1] > w[0])
}

/// True when the samples are strictly increasing or strictly decreasing.
pub fn is_strictly_monotonic(x: &[Real]) -> bool {
    is_strictly_increasing(x) || x.windows(2).all(|w| w[1] < w[0])
}

/// Trapezoidal integral of `y` over the sample axis `x`.
pub fn trapz(x: &[Real], y: &[Real]) -> Result<Real, SfError> {
    ensure_same_len(x, y, "trapz samples")?;
    Ok(x
        .windows(2)
        .zip(y.windows(2))
        .map(|(xw, yw)| 0.5 * (xw[1] - xw[0]) * (yw[0] + yw[1]))
        .sum())
}

/// Cumulative trapezoidal integral of `y` over `x`.
///
/// The result has the same length as the input and starts at zero, so
/// `out[i]` is the integral from `x[0]` to `x[i]`.
pub fn cumtrapz(x: &[Real], y: &[Real]) -> Result<Vec<Real>, SfError> {
    ensure_same_len(x, y, "cumtrapz samples")?;
    let mut out = Vec::with_capacity(x.len());
    if x.is_empty() {
        return Ok(out);
    }
    let mut acc = 0.0;
    out.push(acc);
    for i in 1..x.len() {
        acc += 0.5 * (x[i] - x[i - 1]) * (y[i] + y[i - 1]);
        out.push(acc);
    }
    Ok(out)
}

/// Piecewise-linear interpolation of `(xs, ys)` at `x`.
///
/// `xs` must be strictly increasing. Values outside the table are rejected
/// rather than extrapolated.
pub fn interp(xs: &[Real], ys: &[Real], x: Real) -> Result<Real, SfError> {
    if !is_strictly_increasing(xs) {
        return Err(SfError::InvalidArg {
            what: "interpolation table abscissae must be strictly increasing",
        });
    }
    interp_sorted(xs, ys, x)
}

/// [`interp`] for tables whose `xs` were already checked to be strictly
/// increasing, typically once at construction. Each lookup is O(log n).
pub fn interp_sorted(xs: &[Real], ys: &[Real], x: Real) -> Result<Real, SfError> {
    ensure_same_len(xs, ys, "interpolation table")?;
    if xs.is_empty() {
        return Err(SfError::InvalidArg {
            what: "empty interpolation table",
        });
    }
    if !x.is_finite() {
        return Err(SfError::NonFinite {
            what: "interpolation abscissa",
            value: x,
        });
    }
    let first = xs[0];
    let last = xs[xs.len() - 1];
    if x < first || x > last {
        return Err(SfError::OutOfRange {
            what: "interpolation abscissa",
            value: x,
        });
    }
    if xs.len() == 1 {
        return Ok(ys[0]);
    }

    // First index with xs[idx] >= x
    let idx = xs.partition_point(|&v| v < x);
    if idx == 0 {
        return Ok(ys[0]);
    }
    let (x0, x1) = (xs[idx - 1], xs[idx]);
    let (y0, y1) = (ys[idx - 1], ys[idx]);
    let w = (x - x0) / (x1 - x0);
    Ok(y0 + w * (y1 - y0))
}

/// `n` evenly spaced points from `start` to `end`, endpoints included.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let delta = (end - start) / (n - 1) as Real;
            let mut points: Vec<Real> = (0..n).map(|i| start + i as Real * delta).collect();
            // Ensure exact endpoint
            points[n - 1] = end;
            points
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cumtrapz_is_monotone_for_positive_integrand(
            ys in prop::collection::vec(0.0_f64..1e3, 2..40)
        ) {
            let xs = linspace(0.0, 10.0, ys.len());
            let cum = cumtrapz(&xs, &ys).unwrap();
            prop_assert!(cum.windows(2).all(|w| w[1] >= w[0]));
        }
    }
}
