//! Calibration configuration.
//!
//! Every field has a serde default, so a TOML document only needs to name
//! the settings it changes.

use serde::{Deserialize, Serialize};

use meridian_math::minimization::{
    MinimizerConfig, PowellConfig, DEFAULT_BRACKET_MAX_ITERATIONS, DEFAULT_LINE_MAX_ITERATIONS,
    DEFAULT_LINE_TOLERANCE, DEFAULT_MAX_SWEEPS, DEFAULT_TOLERANCE,
};

use crate::error::{CalibrationResult, Validate, ValidationError};

// =============================================================================
// CALIBRATION CONFIGURATION
// =============================================================================

/// Settings for [`LeastSquaresCalibrator`](crate::LeastSquaresCalibrator).
///
/// # Example
///
/// ```rust
/// use meridian_calibration::CalibrationConfig;
///
/// let config = CalibrationConfig::from_toml_str("tolerance = 1e-8\nmax_sweeps = 500").unwrap();
/// assert_eq!(config.max_sweeps, 500);
/// assert_eq!(config.line_max_iterations, 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// Relative chi-square decrease between sweeps that counts as converged.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Maximum number of minimiser sweeps.
    #[serde(default = "default_max_sweeps")]
    pub max_sweeps: u32,

    /// Fractional tolerance of each line minimisation.
    #[serde(default = "default_line_tolerance")]
    pub line_tolerance: f64,

    /// Iteration ceiling of each line minimisation.
    #[serde(default = "default_line_max_iterations")]
    pub line_max_iterations: u32,

    /// Iteration ceiling when bracketing each line minimum.
    #[serde(default = "default_bracket_max_iterations")]
    pub bracket_max_iterations: u32,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_max_sweeps() -> u32 {
    DEFAULT_MAX_SWEEPS
}

fn default_line_tolerance() -> f64 {
    DEFAULT_LINE_TOLERANCE
}

fn default_line_max_iterations() -> u32 {
    DEFAULT_LINE_MAX_ITERATIONS
}

fn default_bracket_max_iterations() -> u32 {
    DEFAULT_BRACKET_MAX_ITERATIONS
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            max_sweeps: default_max_sweeps(),
            line_tolerance: default_line_tolerance(),
            line_max_iterations: default_line_max_iterations(),
            bracket_max_iterations: default_bracket_max_iterations(),
        }
    }
}

impl CalibrationConfig {
    /// Parses a TOML document and validates the result.
    ///
    /// # Errors
    ///
    /// * [`CalibrationError::Config`](crate::CalibrationError::Config) for malformed TOML
    /// * [`CalibrationError::Validation`](crate::CalibrationError::Validation) for out-of-range values
    pub fn from_toml_str(text: &str) -> CalibrationResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Builder method to set the sweep tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Builder method to set the sweep ceiling.
    #[must_use]
    pub fn with_max_sweeps(mut self, max_sweeps: u32) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// The minimiser settings implied by this configuration.
    #[must_use]
    pub fn to_powell_config(&self) -> PowellConfig {
        PowellConfig {
            tolerance: self.tolerance,
            max_iterations: self.max_sweeps,
            line: MinimizerConfig::new(self.line_tolerance, self.line_max_iterations),
            bracket_max_iterations: self.bracket_max_iterations,
        }
    }
}

impl Validate for CalibrationConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.tolerance.is_finite() && self.tolerance > 0.0 && self.tolerance < 1.0) {
            errors.push(ValidationError::with_rule(
                "tolerance",
                "Tolerance must lie in (0, 1)",
                "valid_tolerance",
            ));
        }

        if self.max_sweeps == 0 || self.max_sweeps > 100_000 {
            errors.push(ValidationError::with_rule(
                "max_sweeps",
                "Max sweeps must be between 1 and 100000",
                "valid_iterations",
            ));
        }

        if !(self.line_tolerance.is_finite() && self.line_tolerance > 0.0 && self.line_tolerance < 1.0)
        {
            errors.push(ValidationError::with_rule(
                "line_tolerance",
                "Line tolerance must lie in (0, 1)",
                "valid_tolerance",
            ));
        }

        if self.line_max_iterations == 0 {
            errors.push(ValidationError::new(
                "line_max_iterations",
                "Line iterations must be at least 1",
            ));
        }

        if self.bracket_max_iterations == 0 {
            errors.push(ValidationError::new(
                "bracket_max_iterations",
                "Bracket iterations must be at least 1",
            ));
        }

        errors
    }
}
