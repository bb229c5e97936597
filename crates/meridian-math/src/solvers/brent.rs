//! Brent's root-finding algorithm.

use log::debug;

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Brent's root-finding algorithm.
///
/// Keeps three points: the current best estimate `b`, the previous estimate
/// `a`, and a contrapoint `c` with `f(c)` of opposite sign to `f(b)`. Each
/// step tries inverse quadratic interpolation (or the secant step when only
/// two distinct points are available) and falls back to bisection whenever
/// the interpolated step would leave the bracket or fails to shrink faster
/// than the step before last.
///
/// Requires: `f(a)` and `f(b)` of opposite sign, or one of them exactly zero.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `a` - One end of the bracket
/// * `b` - The other end of the bracket
/// * `config` - Solver configuration
///
/// # Errors
///
/// * [`MathError::InvalidBracket`] when the endpoints share a sign
/// * [`MathError::ConvergenceFailed`] when `max_iterations` is exhausted
/// * [`MathError::InvalidInput`] on a non-finite evaluation
///
/// # Example
///
/// ```rust
/// use meridian_math::solvers::{brent, SolverConfig};
///
/// // Find root of x^3 - x - 2
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((f(result.root)).abs() < 1e-8);
/// ```
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if !fa.is_finite() || !fb.is_finite() {
        return Err(MathError::invalid_input(format!(
            "non-finite function value at bracket end: f({a}) = {fa}, f({b}) = {fb}"
        )));
    }

    // An endpoint that is already a root, including the zero-width bracket
    if fa == 0.0 {
        return Ok(SolverResult {
            root: a,
            iterations: 0,
            residual: fa,
        });
    }
    if fb == 0.0 {
        return Ok(SolverResult {
            root: b,
            iterations: 0,
            residual: fb,
        });
    }

    if fa.signum() == fb.signum() {
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 1..=config.max_iterations {
        // Re-establish the contrapoint on the other side of the root
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }

        // Keep b as the best estimate
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.abscissa_tolerance(b);
        let xm = 0.5 * (c - b);

        if xm.abs() <= tol || fb == 0.0 || fb.abs() <= config.function_tolerance {
            debug!("brent converged to {b} after {iteration} iterations");
            return Ok(SolverResult {
                root: b,
                iterations: iteration,
                residual: fb,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // Secant step
                (2.0 * xm * s, 1.0 - s)
            } else {
                // Inverse quadratic interpolation
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = f(b);

        if !fb.is_finite() {
            return Err(MathError::invalid_input(format!(
                "non-finite function value f({b}) = {fb}"
            )));
        }
    }

    Err(MathError::convergence_failed(config.max_iterations, fb.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;

        let result = brent(f, 0.0, 2.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_reversed_bracket() {
        let f = |x: f64| x * x - 2.0;

        let result = brent(f, 2.0, 0.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_cubic() {
        // x^3 - x - 2 has a root near 1.52
        let f = |x: f64| x * x * x - x - 2.0;

        let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();

        assert!(f(result.root).abs() < 1e-8);
        assert_relative_eq!(result.root, 1.521_379_706_804_568, epsilon = 1e-9);
    }

    #[test]
    fn test_sin() {
        let f = |x: f64| x.sin();

        let result = brent(f, 3.0, 4.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::PI, epsilon = 1e-9);
    }

    #[test]
    fn test_endpoint_root() {
        let f = |x: f64| x - 1.0;

        let result = brent(f, 1.0, 3.0, &SolverConfig::default()).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);

        let zero_width = brent(f, 1.0, 1.0, &SolverConfig::default()).unwrap();
        assert_eq!(zero_width.root, 1.0);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;

        let result = brent(f, 2.0, 3.0, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_iteration_ceiling() {
        // A root at a steep step needs many bisections at this tolerance
        let f = |x: f64| if x < 0.3 { -1.0 } else { 1.0 };
        let config = SolverConfig::new(1e-14, 5);

        let result = brent(f, 0.0, 1.0, &config);

        assert!(matches!(
            result,
            Err(MathError::ConvergenceFailed { iterations: 5, .. })
        ));
    }

    #[test]
    fn test_function_tolerance() {
        let f = |x: f64| x - 0.5;
        let config = SolverConfig::default().with_function_tolerance(0.6);

        let result = brent(f, 0.0, 2.0, &config).unwrap();

        assert!(f(result.root).abs() <= 0.6);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_relative_tolerance_on_large_root() {
        let f = |x: f64| x - 1.0e8;
        let config = SolverConfig::new(1e-12, 100)
            .with_tolerance_kind(crate::solvers::ToleranceKind::Relative);

        let result = brent(f, 0.0, 2.0e8, &config).unwrap();

        assert_relative_eq!(result.root, 1.0e8, max_relative = 1e-10);
    }

    #[test]
    fn test_faster_than_bisection() {
        let f = |x: f64| x * x - 2.0;
        let config = SolverConfig::default();

        let brent_result = brent(f, 1.0, 2.0, &config).unwrap();

        // Bisection needs ~34 iterations for 1e-10 tolerance
        assert!(brent_result.iterations < 20);
    }
}
