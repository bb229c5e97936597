//! Per-parameter limit transforms.

use crate::error::{MathError, MathResult};

/// Beyond this fitting-space magnitude the exponential branch is continued
/// along its tangent so the model value stays finite.
const EXP_CUTOFF: f64 = 50.0;

/// A bijection between the real line (fitting space) and the open set a
/// model parameter is allowed to take (model space).
///
/// | Limits | `transform(x)` | Model space |
/// |--------|----------------|-------------|
/// | `Unbounded` | `x` | ℝ |
/// | `GreaterThan(a)` | `a + exp(x)` | `(a, ∞)` |
/// | `LessThan(a)` | `a - exp(-x)` | `(-∞, a)` |
/// | `Range { lower, upper }` | `mid + half * tanh(x)` | `(lower, upper)` |
///
/// Every transform is strictly increasing, so an ordering found in fitting
/// space is preserved in model space. The bounds themselves are excluded:
/// [`inverse_transform`](Self::inverse_transform) rejects them with
/// [`MathError::Domain`] instead of clamping. Where `tanh` saturates or `exp`
/// underflows, [`transform`](Self::transform) returns the nearest value
/// strictly inside the bound, so its output always inverts.
///
/// The variants are public. Limits built directly rather than through
/// [`greater_than`](Self::greater_than), [`less_than`](Self::less_than) or
/// [`range`](Self::range) must pass [`validate`](Self::validate) before use;
/// deserialised limits are validated on the way in.
///
/// # Example
///
/// ```rust
/// use meridian_math::transform::ParameterLimitsTransform;
///
/// let rho = ParameterLimitsTransform::range(-1.0, 1.0).unwrap();
/// let x = rho.inverse_transform(0.3).unwrap();
/// assert!((rho.transform(x) - 0.3).abs() < 1e-14);
/// assert!(rho.inverse_transform(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(rename_all = "snake_case", try_from = "serde_impl::RawLimits")
)]
pub enum ParameterLimitsTransform {
    /// No constraint.
    Unbounded,
    /// Model value strictly greater than the limit.
    GreaterThan(f64),
    /// Model value strictly less than the limit.
    LessThan(f64),
    /// Model value strictly inside `(lower, upper)`.
    Range {
        /// Lower bound (excluded).
        lower: f64,
        /// Upper bound (excluded).
        upper: f64,
    },
}

impl Default for ParameterLimitsTransform {
    fn default() -> Self {
        Self::Unbounded
    }
}

impl ParameterLimitsTransform {
    /// Creates a `GreaterThan` transform.
    pub fn greater_than(limit: f64) -> MathResult<Self> {
        let transform = Self::GreaterThan(limit);
        transform.validate()?;
        Ok(transform)
    }

    /// Creates a `LessThan` transform.
    pub fn less_than(limit: f64) -> MathResult<Self> {
        let transform = Self::LessThan(limit);
        transform.validate()?;
        Ok(transform)
    }

    /// Creates a `Range` transform over `(lower, upper)`.
    pub fn range(lower: f64, upper: f64) -> MathResult<Self> {
        let transform = Self::Range { lower, upper };
        transform.validate()?;
        Ok(transform)
    }

    /// Checks that the limits are finite and, for ranges, ordered.
    pub fn validate(&self) -> MathResult<()> {
        match *self {
            Self::Unbounded => Ok(()),
            Self::GreaterThan(limit) | Self::LessThan(limit) => {
                if limit.is_finite() {
                    Ok(())
                } else {
                    Err(MathError::invalid_input(format!(
                        "parameter limit must be finite, got {limit}"
                    )))
                }
            }
            Self::Range { lower, upper } => {
                if !lower.is_finite() || !upper.is_finite() {
                    Err(MathError::invalid_input(format!(
                        "range limits must be finite, got ({lower}, {upper})"
                    )))
                } else if lower >= upper {
                    Err(MathError::invalid_input(format!(
                        "range lower limit {lower} must be below upper limit {upper}"
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Open model-space interval as `(lower, upper)`, with infinities for
    /// missing bounds.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Unbounded => (f64::NEG_INFINITY, f64::INFINITY),
            Self::GreaterThan(limit) => (limit, f64::INFINITY),
            Self::LessThan(limit) => (f64::NEG_INFINITY, limit),
            Self::Range { lower, upper } => (lower, upper),
        }
    }

    /// Returns true if `value` lies strictly inside the model-space domain.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        let (lower, upper) = self.bounds();
        match self {
            Self::Unbounded => value.is_finite(),
            _ => value.is_finite() && value > lower && value < upper,
        }
    }

    /// Maps a fitting-space value to model space.
    #[must_use]
    pub fn transform(&self, x: f64) -> f64 {
        match *self {
            Self::Unbounded => x,
            Self::GreaterThan(limit) => above(limit, limit + exp_continued(x)),
            Self::LessThan(limit) => below(limit, limit - exp_continued(-x)),
            Self::Range { lower, upper } => {
                let (mid, half) = mid_half(lower, upper);
                below(upper, above(lower, mid + half * x.tanh()))
            }
        }
    }

    /// Maps a model-space value back to fitting space.
    ///
    /// # Errors
    ///
    /// [`MathError::Domain`] when `y` is not strictly inside the open domain.
    pub fn inverse_transform(&self, y: f64) -> MathResult<f64> {
        if !self.contains(y) {
            let (lower, upper) = self.bounds();
            return Err(MathError::domain(y, lower, upper));
        }

        let x = match *self {
            Self::Unbounded => y,
            Self::GreaterThan(limit) => ln_continued(y - limit),
            Self::LessThan(limit) => -ln_continued(limit - y),
            Self::Range { lower, upper } => unit_offset(y, lower, upper).atanh(),
        };

        if x.is_finite() {
            Ok(x)
        } else {
            let (lower, upper) = self.bounds();
            Err(MathError::domain(y, lower, upper))
        }
    }

    /// Derivative `d model / d fitting` at fitting-space value `x`.
    #[must_use]
    pub fn transform_gradient(&self, x: f64) -> f64 {
        match *self {
            Self::Unbounded => 1.0,
            Self::GreaterThan(_) => exp_continued_gradient(x),
            Self::LessThan(_) => exp_continued_gradient(-x),
            Self::Range { lower, upper } => {
                let (_, half) = mid_half(lower, upper);
                let t = x.tanh();
                half * (1.0 - t * t)
            }
        }
    }

    /// Derivative `d fitting / d model` at model-space value `y`.
    ///
    /// # Errors
    ///
    /// [`MathError::Domain`] when `y` is not strictly inside the open domain.
    pub fn inverse_transform_gradient(&self, y: f64) -> MathResult<f64> {
        if !self.contains(y) {
            let (lower, upper) = self.bounds();
            return Err(MathError::domain(y, lower, upper));
        }

        Ok(match *self {
            Self::Unbounded => 1.0,
            Self::GreaterThan(limit) => ln_continued_gradient(y - limit),
            Self::LessThan(limit) => ln_continued_gradient(limit - y),
            Self::Range { lower, upper } => {
                let (_, half) = mid_half(lower, upper);
                let t = unit_offset(y, lower, upper);
                1.0 / (half * (1.0 - t * t))
            }
        })
    }
}

/// `(y - mid) / half` for a `y` inside `(lower, upper)`, kept off ±1 where
/// the division rounds onto them.
fn unit_offset(y: f64, lower: f64, upper: f64) -> f64 {
    let (mid, half) = mid_half(lower, upper);
    ((y - mid) / half).clamp(-next_down(1.0), next_down(1.0))
}

/// `y`, or the smallest float above `limit` when `y` has rounded onto or
/// below it.
fn above(limit: f64, y: f64) -> f64 {
    if y <= limit {
        next_up(limit)
    } else {
        y
    }
}

/// `y`, or the largest float below `limit` when `y` has rounded onto or
/// above it.
fn below(limit: f64, y: f64) -> f64 {
    if y >= limit {
        next_down(limit)
    } else {
        y
    }
}

fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        x
    } else if x == 0.0 {
        f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() + 1)
    } else {
        f64::from_bits(x.to_bits() - 1)
    }
}

fn next_down(x: f64) -> f64 {
    -next_up(-x)
}

fn mid_half(lower: f64, upper: f64) -> (f64, f64) {
    (0.5 * (lower + upper), 0.5 * (upper - lower))
}

/// `exp(x)` up to the cutoff, then its tangent line.
fn exp_continued(x: f64) -> f64 {
    if x > EXP_CUTOFF {
        EXP_CUTOFF.exp() * (1.0 + x - EXP_CUTOFF)
    } else {
        x.exp()
    }
}

fn exp_continued_gradient(x: f64) -> f64 {
    x.min(EXP_CUTOFF).exp()
}

/// Inverse of [`exp_continued`] for `d > 0`.
fn ln_continued(d: f64) -> f64 {
    let knee = EXP_CUTOFF.exp();
    if d > knee {
        EXP_CUTOFF + d / knee - 1.0
    } else {
        d.ln()
    }
}

fn ln_continued_gradient(d: f64) -> f64 {
    1.0 / d.min(EXP_CUTOFF.exp())
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::ParameterLimitsTransform;
    use crate::error::MathError;

    #[derive(serde::Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RawLimits {
        Unbounded,
        GreaterThan(f64),
        LessThan(f64),
        Range { lower: f64, upper: f64 },
    }

    impl TryFrom<RawLimits> for ParameterLimitsTransform {
        type Error = MathError;

        fn try_from(raw: RawLimits) -> Result<Self, Self::Error> {
            let limits = match raw {
                RawLimits::Unbounded => Self::Unbounded,
                RawLimits::GreaterThan(limit) => Self::GreaterThan(limit),
                RawLimits::LessThan(limit) => Self::LessThan(limit),
                RawLimits::Range { lower, upper } => Self::Range { lower, upper },
            };
            limits.validate()?;
            Ok(limits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unbounded_is_identity() {
        let t = ParameterLimitsTransform::Unbounded;

        assert_eq!(t.transform(-3.5), -3.5);
        assert_eq!(t.inverse_transform(7.25).unwrap(), 7.25);
        assert_eq!(t.transform_gradient(1.0), 1.0);
    }

    #[test]
    fn test_greater_than_round_trip() {
        let t = ParameterLimitsTransform::greater_than(0.0).unwrap();

        for &x in &[-20.0, -1.0, 0.0, 2.5, 49.0, 51.0, 500.0] {
            let y = t.transform(x);
            assert!(y > 0.0);
            assert_relative_eq!(t.inverse_transform(y).unwrap(), x, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_less_than_round_trip() {
        let t = ParameterLimitsTransform::less_than(2.0).unwrap();

        for &x in &[-500.0, -51.0, -3.0, 0.0, 4.0, 10.0] {
            let y = t.transform(x);
            assert!(y < 2.0);
            assert_relative_eq!(t.inverse_transform(y).unwrap(), x, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_range_round_trip() {
        let t = ParameterLimitsTransform::range(0.0, 2.0).unwrap();

        for &x in &[-8.0, -1.0, 0.0, 0.5, 8.0] {
            let y = t.transform(x);
            assert!(y > 0.0 && y < 2.0);
            assert_relative_eq!(t.inverse_transform(y).unwrap(), x, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_bounds_are_excluded() {
        let gt = ParameterLimitsTransform::greater_than(1.0).unwrap();
        let lt = ParameterLimitsTransform::less_than(1.0).unwrap();
        let range = ParameterLimitsTransform::range(-1.0, 1.0).unwrap();

        assert!(matches!(gt.inverse_transform(1.0), Err(MathError::Domain { .. })));
        assert!(matches!(gt.inverse_transform(0.5), Err(MathError::Domain { .. })));
        assert!(matches!(lt.inverse_transform(1.0), Err(MathError::Domain { .. })));
        assert!(matches!(range.inverse_transform(-1.0), Err(MathError::Domain { .. })));
        assert!(matches!(range.inverse_transform(1.0), Err(MathError::Domain { .. })));
        assert!(matches!(range.inverse_transform(3.0), Err(MathError::Domain { .. })));
    }

    #[test]
    fn test_non_finite_model_value() {
        let t = ParameterLimitsTransform::Unbounded;

        assert!(t.inverse_transform(f64::NAN).is_err());
        assert!(t.inverse_transform(f64::INFINITY).is_err());
    }

    #[test]
    fn test_monotone_across_cutoff() {
        let t = ParameterLimitsTransform::greater_than(-1.0).unwrap();
        let xs = [48.0, 49.999, 50.0, 50.001, 60.0];

        for pair in xs.windows(2) {
            assert!(t.transform(pair[0]) < t.transform(pair[1]));
        }
    }

    #[test]
    fn test_gradients_match_finite_differences() {
        let transforms = [
            ParameterLimitsTransform::Unbounded,
            ParameterLimitsTransform::greater_than(0.5).unwrap(),
            ParameterLimitsTransform::less_than(-0.5).unwrap(),
            ParameterLimitsTransform::range(0.0, 2.0).unwrap(),
        ];
        let h = 1e-6;

        for t in &transforms {
            for &x in &[-1.5, 0.0, 0.7] {
                let fd = (t.transform(x + h) - t.transform(x - h)) / (2.0 * h);
                assert_relative_eq!(t.transform_gradient(x), fd, max_relative = 1e-6);

                let y = t.transform(x);
                let inverse = t.inverse_transform_gradient(y).unwrap();
                assert_relative_eq!(inverse * t.transform_gradient(x), 1.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_invalid_limits() {
        assert!(ParameterLimitsTransform::range(1.0, 1.0).is_err());
        assert!(ParameterLimitsTransform::range(2.0, 1.0).is_err());
        assert!(ParameterLimitsTransform::range(0.0, f64::INFINITY).is_err());
        assert!(ParameterLimitsTransform::greater_than(f64::NAN).is_err());

        // Variants built directly are caught by validate
        assert!(ParameterLimitsTransform::GreaterThan(f64::NAN).validate().is_err());
        assert!(ParameterLimitsTransform::Range { lower: 1.0, upper: -1.0 }
            .validate()
            .is_err());
    }

    #[test]
    fn test_saturated_range_stays_inside_bounds() {
        let t = ParameterLimitsTransform::range(-1.0, 1.0).unwrap();

        for x in [-475.0, -40.0, 25.0, 475.0, f64::INFINITY] {
            let y = t.transform(x);
            assert!(t.contains(y), "transform({x}) = {y} left (-1, 1)");
            assert!(t.inverse_transform(y).unwrap().is_finite());
            assert!(t.inverse_transform_gradient(y).unwrap().is_finite());
        }
        assert_eq!(t.transform(475.0), next_down(1.0));
        assert_eq!(t.transform(-475.0), next_up(-1.0));
    }

    #[test]
    fn test_offset_range_stays_inside_bounds() {
        let t = ParameterLimitsTransform::range(0.25, 3.0).unwrap();

        for x in [-100.0, 100.0] {
            let y = t.transform(x);
            assert!(y > 0.25 && y < 3.0);
            assert!(t.inverse_transform(y).is_ok());
        }
    }

    #[test]
    fn test_exp_underflow_stays_above_limit() {
        let gt = ParameterLimitsTransform::greater_than(2.0).unwrap();
        let lt = ParameterLimitsTransform::less_than(-3.0).unwrap();

        let y = gt.transform(-800.0);
        assert!(y > 2.0);
        assert!(gt.inverse_transform(y).is_ok());

        let y = lt.transform(800.0);
        assert!(y < -3.0);
        assert!(lt.inverse_transform(y).is_ok());

        let zero = ParameterLimitsTransform::greater_than(0.0).unwrap();
        assert!(zero.transform(-800.0) > 0.0);
    }

    #[test]
    fn test_next_float() {
        assert!(next_up(1.0) > 1.0);
        assert!(next_down(1.0) < 1.0);
        assert!(next_up(-1.0) > -1.0);
        assert_eq!(next_up(0.0), f64::from_bits(1));
        assert_eq!(next_down(next_up(2.5)), 2.5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialised_limits_are_validated() {
        #[derive(serde::Deserialize)]
        struct Holder {
            limits: ParameterLimitsTransform,
        }

        let ok: Holder = toml::from_str("limits = { range = { lower = -1.0, upper = 1.0 } }").unwrap();
        assert_eq!(ok.limits, ParameterLimitsTransform::Range { lower: -1.0, upper: 1.0 });

        let inverted = toml::from_str::<Holder>("limits = { range = { lower = 1.0, upper = -1.0 } }");
        assert!(inverted.is_err());

        let infinite = toml::from_str::<Holder>("limits = { greater_than = inf }");
        assert!(infinite.is_err());
    }
}
