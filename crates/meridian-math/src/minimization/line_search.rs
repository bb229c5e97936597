//! Minimisation of an n-dimensional function along a ray.

use crate::error::{MathError, MathResult};
use crate::minimization::{bracket_minimum, brent_minimize, LineMinimum, MinimizerConfig};

/// Minimises `t ↦ f(point + t·direction)`.
///
/// The minimum is first bracketed from the seeds `t = 0` and `t = 1`, then
/// refined with [`brent_minimize`].
#[derive(Debug, Clone, Copy)]
pub struct LineSearch {
    config: MinimizerConfig,
    bracket_max_iterations: u32,
}

impl Default for LineSearch {
    fn default() -> Self {
        Self::new(
            MinimizerConfig::default(),
            super::DEFAULT_BRACKET_MAX_ITERATIONS,
        )
    }
}

impl LineSearch {
    /// Creates a line search.
    #[must_use]
    pub fn new(config: MinimizerConfig, bracket_max_iterations: u32) -> Self {
        Self {
            config,
            bracket_max_iterations,
        }
    }

    /// One-dimensional minimiser settings.
    #[must_use]
    pub fn config(&self) -> &MinimizerConfig {
        &self.config
    }

    /// Finds the step `t` minimising `f(point + t·direction)`.
    ///
    /// The returned [`LineMinimum::x`] is the step length along
    /// `direction`, not a coordinate.
    ///
    /// # Errors
    ///
    /// * [`MathError::DimensionMismatch`] when `point` and `direction` differ in length
    /// * errors from [`bracket_minimum`] and [`brent_minimize`]
    pub fn minimise<F>(&self, f: &F, point: &[f64], direction: &[f64]) -> MathResult<LineMinimum>
    where
        F: Fn(&[f64]) -> f64,
    {
        if point.len() != direction.len() {
            return Err(MathError::dimension_mismatch(point.len(), direction.len()));
        }

        let along = |t: f64| {
            let trial: Vec<f64> = point
                .iter()
                .zip(direction)
                .map(|(&p, &d)| p + t * d)
                .collect();
            f(&trial)
        };

        let bracket = bracket_minimum(along, 0.0, 1.0, self.bracket_max_iterations)?;
        let minimum = brent_minimize(along, &bracket, &self.config)?;

        Ok(minimum)
    }
}
