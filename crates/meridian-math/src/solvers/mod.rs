//! Root-finding algorithms.
//!
//! This module provides bracketing solvers for scalar equations:
//!
//! - [`bracket_root`]: expands a seed interval until it brackets a sign change
//! - [`brent`]: inverse quadratic interpolation with a bisection safeguard
//! - [`bisection`]: plain interval halving
//!
//! # Choosing a Solver
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Brent | Fast (superlinear) | Guaranteed | Bracket |
//! | Bisection | Slow (linear) | Guaranteed | Bracket |
//!
//! Both solvers stop at a hard iteration ceiling. Callers that need more
//! iterations should re-invoke with a tighter bracket.
//!
//! # Example: Implied Rate
//!
//! ```rust
//! use meridian_math::solvers::{bracket_root, brent, BracketConfig, SolverConfig};
//!
//! // Continuously compounded rate implied by a 5y discount factor of 0.80
//! let f = |r: f64| (-5.0 * r).exp() - 0.80;
//!
//! let bracket = bracket_root(f, 0.01, 0.02, &BracketConfig::default()).unwrap();
//! let result = brent(f, bracket.lower, bracket.upper, &SolverConfig::default()).unwrap();
//! assert!((result.root - 0.8f64.ln() / -5.0).abs() < 1e-9);
//! ```

mod bisection;
mod bracket;
mod brent;

pub use bisection::bisection;
pub use bracket::{bracket_root, Bracket, BracketConfig};
pub use brent::brent;

use crate::error::MathResult;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// How [`SolverConfig::tolerance`] is measured against the current abscissa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ToleranceKind {
    /// Bracket width compared directly with the tolerance.
    #[default]
    Absolute,
    /// Bracket width compared with `tolerance * max(|x|, 1)`.
    Relative,
}

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Tolerance for convergence on the abscissa.
    pub tolerance: f64,
    /// Whether the tolerance is absolute or relative.
    pub tolerance_kind: ToleranceKind,
    /// Accept any point with `|f(x)|` at or below this value.
    pub function_tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            tolerance_kind: ToleranceKind::Absolute,
            function_tolerance: 0.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with an absolute tolerance.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets how the tolerance is measured.
    #[must_use]
    pub fn with_tolerance_kind(mut self, kind: ToleranceKind) -> Self {
        self.tolerance_kind = kind;
        self
    }

    /// Sets the function-value tolerance.
    #[must_use]
    pub fn with_function_tolerance(mut self, function_tolerance: f64) -> Self {
        self.function_tolerance = function_tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Absolute abscissa tolerance in effect at `x`.
    #[must_use]
    pub fn abscissa_tolerance(&self, x: f64) -> f64 {
        match self.tolerance_kind {
            ToleranceKind::Absolute => self.tolerance,
            ToleranceKind::Relative => self.tolerance * x.abs().max(1.0),
        }
    }
}

/// Trait for bracketing root finders.
///
/// Implementors are stateless, so a single instance can be shared freely
/// across threads.
///
/// # Example
///
/// ```rust
/// use meridian_math::solvers::{BrentRootFinder, RootFinder, SolverConfig};
///
/// let solver = BrentRootFinder;
/// let result = solver
///     .find_root(|x: f64| x * x - 2.0, 0.0, 2.0, &SolverConfig::default())
///     .unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub trait RootFinder: Send + Sync {
    /// Finds a root of `f` inside `[lower, upper]`.
    fn find_root<F>(
        &self,
        f: F,
        lower: f64,
        upper: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64;

    /// Returns the name of the solver.
    fn name(&self) -> &'static str;
}

/// Brent's method solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrentRootFinder;

impl RootFinder for BrentRootFinder {
    fn find_root<F>(
        &self,
        f: F,
        lower: f64,
        upper: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        brent(f, lower, upper, config)
    }

    fn name(&self) -> &'static str {
        "Brent"
    }
}

/// Bisection solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BisectionRootFinder;

impl RootFinder for BisectionRootFinder {
    fn find_root<F>(
        &self,
        f: F,
        lower: f64,
        upper: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        bisection(f, lower, upper, config)
    }

    fn name(&self) -> &'static str {
        "Bisection"
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}
