//! Brent's one-dimensional minimisation.

use log::debug;

use crate::error::{MathError, MathResult};
use crate::minimization::{eval_or_inf, LineMinimum, MinimizerConfig, MinimumBracket};

/// Complement of the golden ratio, `(3 - sqrt(5)) / 2`.
const GOLDEN_SECTION: f64 = 0.381_966_011_250_105;

/// Absolute floor on the tolerance, for a minimum sitting exactly at zero.
const ZEPS: f64 = f64::EPSILON * 1.0e-3;

/// Brent's minimisation within a bracket.
///
/// Tracks the best point `x`, the second best `w` and the previous `w` in
/// `v`. A parabola through the three is accepted when its vertex falls
/// inside the bracket and the step is less than half the step before last;
/// otherwise a golden-section step into the larger segment is taken. This is
/// the same safeguard structure Brent's root finder uses, applied to
/// minimisation.
///
/// # Errors
///
/// [`MathError::ConvergenceFailed`] when `max_iterations` is exhausted.
///
/// # Example
///
/// ```rust
/// use meridian_math::minimization::{brent_minimize, MinimizerConfig, MinimumBracket};
///
/// let bracket = MinimumBracket::new(0.0, 3.0).unwrap();
/// let min = brent_minimize(|x: f64| (x - 1.2).powi(2) + 0.5, &bracket, &MinimizerConfig::default()).unwrap();
/// assert!((min.x - 1.2).abs() < 1e-6);
/// assert!((min.value - 0.5).abs() < 1e-12);
/// ```
pub fn brent_minimize<F>(
    f: F,
    bracket: &MinimumBracket,
    config: &MinimizerConfig,
) -> MathResult<LineMinimum>
where
    F: Fn(f64) -> f64,
{
    let tolerance = config.effective_tolerance();
    let eval = |x: f64| eval_or_inf(f(x));

    let mut a = bracket.lower;
    let mut b = bracket.upper;
    let mut x = bracket.interior;
    let mut w = x;
    let mut v = x;
    let mut fx = eval(x);
    let mut fw = fx;
    let mut fv = fx;

    // Step before last, and last step
    let mut e: f64 = 0.0;
    let mut d: f64 = 0.0;

    for iteration in 1..=config.max_iterations {
        let xm = 0.5 * (a + b);
        let tol1 = tolerance * x.abs() + ZEPS;
        let tol2 = 2.0 * tol1;

        if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
            debug!("brent minimisation converged to {x} after {iteration} iterations");
            return Ok(LineMinimum {
                x,
                value: fx,
                iterations: iteration,
            });
        }

        let mut golden = true;
        if e.abs() > tol1 {
            // Trial parabolic fit
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let e_prev = e;
            e = d;

            if p.abs() < (0.5 * q * e_prev).abs() && p > q * (a - x) && p < q * (b - x) {
                d = p / q;
                let u = x + d;
                if u - a < tol2 || b - u < tol2 {
                    d = tol1.copysign(xm - x);
                }
                golden = false;
            }
        }

        if golden {
            e = if x >= xm { a - x } else { b - x };
            d = GOLDEN_SECTION * e;
        }

        let u = if d.abs() >= tol1 {
            x + d
        } else {
            x + tol1.copysign(d)
        };
        let fu = eval(u);

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            w = x;
            x = u;
            fv = fw;
            fw = fx;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                w = u;
                fv = fw;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    Err(MathError::convergence_failed(config.max_iterations, fx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::minimization::bracket_minimum;
    use approx::assert_relative_eq;

    #[test]
    fn test_parabola() {
        let f = |x: f64| (x - 2.0).powi(2) + 1.0;
        let bracket = bracket_minimum(f, 0.0, 1.0, 50).unwrap();

        let min = brent_minimize(f, &bracket, &MinimizerConfig::default()).unwrap();

        assert_relative_eq!(min.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(min.value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quartic_flat_bottom() {
        // Flat minimum, parabolic steps are poor and golden steps take over
        let f = |x: f64| (x - 0.7).powi(4);
        let bracket = bracket_minimum(f, 0.0, 0.1, 50).unwrap();

        let min = brent_minimize(f, &bracket, &MinimizerConfig::default()).unwrap();

        assert!((min.x - 0.7).abs() < 1e-3);
        assert!(min.value < 1e-12);
    }

    #[test]
    fn test_cosine() {
        let f = |x: f64| x.cos();
        let bracket = MinimumBracket::new(2.0, 4.5).unwrap();

        let min = brent_minimize(f, &bracket, &MinimizerConfig::default()).unwrap();

        assert_relative_eq!(min.x, std::f64::consts::PI, epsilon = 1e-6);
        assert_relative_eq!(min.value, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_plain_interval_boundary_minimum() {
        // Decreasing over the whole interval, so the minimum sits at the upper end
        let f = |x: f64| -x;
        let bracket = MinimumBracket::new(0.0, 1.0).unwrap();

        let min = brent_minimize(f, &bracket, &MinimizerConfig::default()).unwrap();

        assert!((min.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iteration_ceiling() {
        let f = |x: f64| (x - 0.3).abs().sqrt();
        let bracket = MinimumBracket::new(-10.0, 10.0).unwrap();

        let result = brent_minimize(f, &bracket, &MinimizerConfig::new(1e-8, 3));

        assert!(matches!(
            result,
            Err(MathError::ConvergenceFailed { iterations: 3, .. })
        ));
    }

    #[test]
    fn test_never_worse_than_start() {
        let f = |x: f64| (3.0 * x).sin() + 0.1 * x * x;
        let bracket = MinimumBracket::with_interior(-2.0, -0.5, 1.0).unwrap();

        let min = brent_minimize(f, &bracket, &MinimizerConfig::default()).unwrap();

        assert!(min.value <= f(-0.5));
    }
}
