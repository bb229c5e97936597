//! Derivative-free minimisation.
//!
//! This module provides the minimisers used by calibration:
//!
//! - [`bracket_minimum`]: golden-ratio search for a triple enclosing a minimum
//! - [`brent_minimize`]: one-dimensional Brent minimisation
//! - [`LineSearch`]: minimisation of an n-dimensional function along a ray
//! - [`powell`]: conjugate-direction minimisation in ℝⁿ
//!
//! Objectives are plain closures. `NaN` objective values are treated as
//! `+∞`, so a model that fails at a trial point simply rejects that point.
//!
//! # Example
//!
//! ```rust
//! use meridian_math::minimization::{powell, PowellConfig};
//!
//! // Minimize (x-2)^2 + (y-3)^2 + 1
//! let f = |p: &[f64]| (p[0] - 2.0).powi(2) + (p[1] - 3.0).powi(2) + 1.0;
//!
//! let result = powell(f, &[0.0, 0.0], &PowellConfig::default()).unwrap();
//! assert!(result.converged);
//! assert!((result.parameters[0] - 2.0).abs() < 1e-6);
//! assert!((result.parameters[1] - 3.0).abs() < 1e-6);
//! ```

mod bracket;
mod brent;
mod line_search;
mod powell;

pub use bracket::{bracket_minimum, MinimumBracket};
pub use brent::brent_minimize;
pub use line_search::LineSearch;
pub use powell::powell;

/// Default fractional tolerance for one-dimensional minimisation.
///
/// Minimisation cannot locate the abscissa more precisely than about
/// `sqrt(ε)`; smaller values are raised to that floor.
pub const DEFAULT_LINE_TOLERANCE: f64 = 3.0e-8;

/// Default iteration ceiling for one-dimensional minimisation.
pub const DEFAULT_LINE_MAX_ITERATIONS: u32 = 100;

/// Default iteration ceiling for minimum bracketing.
pub const DEFAULT_BRACKET_MAX_ITERATIONS: u32 = 50;

/// Default relative decrease tolerance between sweeps.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default sweep ceiling for [`powell`].
pub const DEFAULT_MAX_SWEEPS: u32 = 200;

/// Configuration for one-dimensional minimisation.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MinimizerConfig {
    /// Fractional tolerance on the abscissa.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for MinimizerConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_LINE_TOLERANCE,
            max_iterations: DEFAULT_LINE_MAX_ITERATIONS,
        }
    }
}

impl MinimizerConfig {
    /// Creates a new configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Tolerance actually used, floored at `sqrt(ε)`.
    #[must_use]
    pub fn effective_tolerance(&self) -> f64 {
        self.tolerance.max(f64::EPSILON.sqrt())
    }
}

/// Configuration for [`powell`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowellConfig {
    /// Relative decrease in the objective between sweeps that counts as
    /// converged.
    pub tolerance: f64,
    /// Maximum number of sweeps.
    pub max_iterations: u32,
    /// Line minimisation settings.
    pub line: MinimizerConfig,
    /// Iteration ceiling for bracketing each line minimum.
    pub bracket_max_iterations: u32,
}

impl Default for PowellConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_SWEEPS,
            line: MinimizerConfig::default(),
            bracket_max_iterations: DEFAULT_BRACKET_MAX_ITERATIONS,
        }
    }
}

impl PowellConfig {
    /// Creates a new configuration with default line-search settings.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Sets the sweep tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the sweep ceiling.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the line minimisation settings.
    #[must_use]
    pub fn with_line(mut self, line: MinimizerConfig) -> Self {
        self.line = line;
        self
    }

    /// The line search implied by this configuration.
    #[must_use]
    pub fn line_search(&self) -> LineSearch {
        LineSearch::new(self.line, self.bracket_max_iterations)
    }
}

/// Result of a one-dimensional minimisation.
#[derive(Debug, Clone, Copy)]
pub struct LineMinimum {
    /// Abscissa of the minimum.
    pub x: f64,
    /// Objective value at `x`.
    pub value: f64,
    /// Number of iterations used.
    pub iterations: u32,
}

/// Result of an n-dimensional minimisation.
#[derive(Debug, Clone)]
pub struct MinimizationResult {
    /// Best point found.
    pub parameters: Vec<f64>,
    /// Objective value at `parameters`.
    pub objective_value: f64,
    /// Number of sweeps used.
    pub iterations: u32,
    /// Whether the convergence test was met. `false` means the sweep
    /// ceiling was hit and `parameters` is the best point so far.
    pub converged: bool,
}

/// Maps a `NaN` objective value to `+∞`.
pub(crate) fn eval_or_inf(value: f64) -> f64 {
    if value.is_nan() {
        f64::INFINITY
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_effective_tolerance_floor() {
        let config = MinimizerConfig::new(1e-14, 100);
        assert_relative_eq!(config.effective_tolerance(), f64::EPSILON.sqrt());

        let loose = MinimizerConfig::new(1e-4, 100);
        assert_relative_eq!(loose.effective_tolerance(), 1e-4);
    }

    #[test]
    fn test_powell_config_builders() {
        let config = PowellConfig::default()
            .with_tolerance(1e-6)
            .with_max_iterations(10)
            .with_line(MinimizerConfig::new(1e-6, 20));

        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.line.max_iterations, 20);
        assert_eq!(config.bracket_max_iterations, DEFAULT_BRACKET_MAX_ITERATIONS);
    }

    #[test]
    fn test_nan_maps_to_infinity() {
        assert_eq!(eval_or_inf(f64::NAN), f64::INFINITY);
        assert_eq!(eval_or_inf(1.5), 1.5);
    }
}
