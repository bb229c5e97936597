//! Bracketing a one-dimensional minimum.

use crate::error::{MathError, MathResult};
use crate::minimization::eval_or_inf;

/// Golden ratio used for default step magnification.
const GOLDEN: f64 = 1.618_033_988_749_895;

/// Maximum magnification allowed for a parabolic-fit step.
const PARABOLIC_LIMIT: f64 = 100.0;

/// Guards the parabolic step against a vanishing denominator.
const TINY: f64 = 1e-20;

/// Fraction of the interval at which [`MinimumBracket::new`] places the
/// interior point.
const GOLDEN_SECTION: f64 = 0.381_966_011_250_105;

/// Three abscissas `lower < interior < upper` enclosing a minimum.
///
/// When produced by [`bracket_minimum`], `f(interior)` is no greater than
/// `f(lower)` and `f(upper)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimumBracket {
    /// Lower end.
    pub lower: f64,
    /// Interior point, used as the starting estimate.
    pub interior: f64,
    /// Upper end.
    pub upper: f64,
}

impl MinimumBracket {
    /// Builds a bracket over a plain interval, with the interior point at
    /// the golden section from `lower`.
    ///
    /// Minimisation over such a bracket finds a local minimum of the
    /// function restricted to `[lower, upper]`.
    pub fn new(lower: f64, upper: f64) -> MathResult<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower == upper {
            return Err(MathError::invalid_input(format!(
                "minimum bracket needs two distinct finite ends, got {lower} and {upper}"
            )));
        }
        let (lower, upper) = (lower.min(upper), lower.max(upper));
        Ok(Self {
            lower,
            interior: lower + GOLDEN_SECTION * (upper - lower),
            upper,
        })
    }

    /// Builds a bracket from an explicit triple.
    pub fn with_interior(lower: f64, interior: f64, upper: f64) -> MathResult<Self> {
        let (lower, upper) = (lower.min(upper), lower.max(upper));
        if !(lower < interior && interior < upper) {
            return Err(MathError::invalid_input(format!(
                "interior point {interior} must lie strictly inside ({lower}, {upper})"
            )));
        }
        Ok(Self {
            lower,
            interior,
            upper,
        })
    }

    /// Width of the bracket.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Searches downhill from `a` through `b` for a triple enclosing a minimum.
///
/// Steps grow by the golden ratio, and a parabolic extrapolation through
/// the last three points is tried first whenever it stays within
/// `100x` the current step.
///
/// # Errors
///
/// * [`MathError::InvalidInput`] for equal or non-finite seeds, or when `f`
///   is infinite at both seeds
/// * [`MathError::BracketNotFound`] when no minimum is enclosed after
///   `max_iterations` steps (e.g. a function unbounded below)
pub fn bracket_minimum<F>(f: F, a: f64, b: f64, max_iterations: u32) -> MathResult<MinimumBracket>
where
    F: Fn(f64) -> f64,
{
    if !a.is_finite() || !b.is_finite() || a == b {
        return Err(MathError::invalid_input(format!(
            "minimum bracketing needs two distinct finite seeds, got {a} and {b}"
        )));
    }

    let eval = |x: f64| eval_or_inf(f(x));

    let mut a = a;
    let mut b = b;
    let mut fa = eval(a);
    let mut fb = eval(b);

    if fa.is_infinite() && fb.is_infinite() {
        return Err(MathError::invalid_input(format!(
            "objective is infinite at both seeds {a} and {b}"
        )));
    }

    // Walk downhill from a to b
    if fb > fa {
        std::mem::swap(&mut a, &mut b);
        std::mem::swap(&mut fa, &mut fb);
    }

    let mut c = b + GOLDEN * (b - a);
    let mut fc = eval(c);

    let mut iterations = 0;
    while fb > fc {
        if iterations >= max_iterations || !c.is_finite() {
            return Err(MathError::BracketNotFound {
                attempts: iterations,
                lower: a.min(c),
                upper: a.max(c),
            });
        }
        iterations += 1;

        // Parabolic extrapolation through (a, b, c)
        let r = (b - a) * (fb - fc);
        let q = (b - c) * (fb - fa);
        let denom = (q - r).abs().max(TINY).copysign(q - r);
        let mut u = b - ((b - c) * q - (b - a) * r) / (2.0 * denom);
        let u_limit = b + PARABOLIC_LIMIT * (c - b);
        let mut fu;

        if (b - u) * (u - c) > 0.0 {
            // Parabolic u lies between b and c
            fu = eval(u);
            if fu < fc {
                return Ok(ordered(b, u, c));
            } else if fu > fb {
                return Ok(ordered(a, b, u));
            }
            u = c + GOLDEN * (c - b);
            fu = eval(u);
        } else if (c - u) * (u - u_limit) > 0.0 {
            // Parabolic u lies between c and its allowed limit
            fu = eval(u);
            if fu < fc {
                b = c;
                c = u;
                u = c + GOLDEN * (c - b);
                fb = fc;
                fc = fu;
                fu = eval(u);
            }
        } else if (u - u_limit) * (u_limit - c) >= 0.0 {
            u = u_limit;
            fu = eval(u);
        } else {
            // Parabolic step rejected (or undefined), use golden magnification
            u = c + GOLDEN * (c - b);
            fu = eval(u);
        }

        a = b;
        b = c;
        c = u;
        fa = fb;
        fb = fc;
        fc = fu;
    }

    Ok(ordered(a, b, c))
}

fn ordered(a: f64, interior: f64, c: f64) -> MinimumBracket {
    MinimumBracket {
        lower: a.min(c),
        interior,
        upper: a.max(c),
    }
}
