//! Root bracketing by outward expansion.

use log::debug;

use crate::error::{MathError, MathResult};

/// Default growth factor applied to the interval on each expansion.
pub const DEFAULT_GROWTH_FACTOR: f64 = 1.6;

/// Default number of expansions before giving up.
pub const DEFAULT_MAX_EXPANSIONS: u32 = 50;

/// Configuration for [`bracket_root`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BracketConfig {
    /// Multiple of the current width added to the moving end.
    pub growth_factor: f64,
    /// Maximum number of expansions.
    pub max_expansions: u32,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            growth_factor: DEFAULT_GROWTH_FACTOR,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

impl BracketConfig {
    /// Creates a new bracketing configuration.
    #[must_use]
    pub fn new(growth_factor: f64, max_expansions: u32) -> Self {
        Self {
            growth_factor,
            max_expansions,
        }
    }

    /// Sets the maximum number of expansions.
    #[must_use]
    pub fn with_max_expansions(mut self, max_expansions: u32) -> Self {
        self.max_expansions = max_expansions;
        self
    }
}

/// An interval `[lower, upper]` over which a function changes sign.
///
/// A zero-width bracket (`lower == upper`) marks an exact root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Lower end.
    pub lower: f64,
    /// Upper end.
    pub upper: f64,
}

impl Bracket {
    /// Width of the bracket.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Returns true when the bracket has collapsed onto an exact root.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.lower == self.upper
    }
}

/// Expands `[x0, x1]` until `f` changes sign across it.
///
/// Each step moves the end with the smaller `|f|` outward by
/// `growth_factor` times the current width. No monotonicity is assumed.
///
/// # Errors
///
/// * [`MathError::InvalidInput`] for equal or non-finite seeds
/// * [`MathError::BracketNotFound`] when `f` is non-finite at a trial point
///   or the expansion budget runs out
pub fn bracket_root<F>(f: F, x0: f64, x1: f64, config: &BracketConfig) -> MathResult<Bracket>
where
    F: Fn(f64) -> f64,
{
    if !x0.is_finite() || !x1.is_finite() {
        return Err(MathError::invalid_input(format!(
            "bracket seeds must be finite, got {x0} and {x1}"
        )));
    }
    if x0 == x1 {
        return Err(MathError::invalid_input(
            "bracket seeds must be distinct points",
        ));
    }
    if !config.growth_factor.is_finite() || config.growth_factor <= 0.0 {
        return Err(MathError::invalid_input("growth factor must be positive"));
    }

    let mut lower = x0.min(x1);
    let mut upper = x0.max(x1);
    let mut f_lower = f(lower);
    let mut f_upper = f(upper);

    for attempt in 0..=config.max_expansions {
        if !f_lower.is_finite() || !f_upper.is_finite() {
            return Err(MathError::BracketNotFound {
                attempts: attempt,
                lower,
                upper,
            });
        }

        if f_lower == 0.0 {
            return Ok(Bracket {
                lower,
                upper: lower,
            });
        }
        if f_upper == 0.0 {
            return Ok(Bracket {
                lower: upper,
                upper,
            });
        }
        if f_lower.signum() != f_upper.signum() {
            debug!("bracketed root in [{lower}, {upper}] after {attempt} expansions");
            return Ok(Bracket { lower, upper });
        }

        if attempt == config.max_expansions {
            break;
        }

        let width = upper - lower;
        if f_lower.abs() < f_upper.abs() {
            lower -= config.growth_factor * width;
            f_lower = f(lower);
        } else {
            upper += config.growth_factor * width;
            f_upper = f(upper);
        }
    }

    Err(MathError::BracketNotFound {
        attempts: config.max_expansions,
        lower,
        upper,
    })
}
