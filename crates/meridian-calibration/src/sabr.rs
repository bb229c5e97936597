//! SABR smile fitting.
//!
//! The model is Hagan et al. (2002)'s lognormal implied volatility
//! approximation. Parameters are ordered `(alpha, beta, rho, nu)` wherever
//! they appear as a vector.

use tracing::debug;

use meridian_math::transform::ParameterLimitsTransform;

use crate::calibrator::LeastSquaresCalibrator;
use crate::config::CalibrationConfig;
use crate::error::{CalibrationError, CalibrationResult};
use crate::instrument::CalibrationInstrument;
use crate::result::FittedModelResult;

/// Below this `|z|` the ratio `z / x(z)` is replaced by its expansion.
const SMALL_Z: f64 = 1e-8;

/// SABR model parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SabrParameters {
    /// Initial volatility level.
    pub alpha: f64,
    /// CEV exponent.
    pub beta: f64,
    /// Correlation between the forward and its volatility.
    pub rho: f64,
    /// Volatility of volatility.
    pub nu: f64,
}

impl SabrParameters {
    /// Number of SABR parameters.
    pub const DIMENSION: usize = 4;

    /// Creates a parameter set.
    pub fn new(alpha: f64, beta: f64, rho: f64, nu: f64) -> Self {
        Self {
            alpha,
            beta,
            rho,
            nu,
        }
    }

    /// `[alpha, beta, rho, nu]`.
    pub fn to_vec(&self) -> Vec<f64> {
        vec![self.alpha, self.beta, self.rho, self.nu]
    }

    /// Reads `[alpha, beta, rho, nu]`.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::InvalidInput`] unless the slice has four entries.
    pub fn from_slice(values: &[f64]) -> CalibrationResult<Self> {
        match *values {
            [alpha, beta, rho, nu] => Ok(Self::new(alpha, beta, rho, nu)),
            _ => Err(CalibrationError::invalid_input(format!(
                "SABR needs {} parameters, got {}",
                Self::DIMENSION,
                values.len()
            ))),
        }
    }

    /// Fitting limits: `alpha > 0`, `0 < beta < 2`, `-1 < rho < 1`, `nu > 0`.
    pub fn limits() -> [ParameterLimitsTransform; 4] {
        [
            ParameterLimitsTransform::GreaterThan(0.0),
            ParameterLimitsTransform::Range {
                lower: 0.0,
                upper: 2.0,
            },
            ParameterLimitsTransform::Range {
                lower: -1.0,
                upper: 1.0,
            },
            ParameterLimitsTransform::GreaterThan(0.0),
        ]
    }
}

/// Hagan's lognormal implied volatility.
///
/// Returns `NaN` for a non-positive forward or strike or a negative expiry,
/// which the chi-square objective treats as an unpriceable point.
///
/// # Example
///
/// ```rust
/// use meridian_calibration::sabr::{hagan_volatility, SabrParameters};
///
/// // beta = 1, nu = 0 is Black with constant volatility alpha
/// let params = SabrParameters::new(0.2, 1.0, 0.0, 0.0);
/// assert!((hagan_volatility(0.05, 0.06, 2.0, &params) - 0.2).abs() < 1e-12);
/// ```
pub fn hagan_volatility(forward: f64, strike: f64, expiry: f64, params: &SabrParameters) -> f64 {
    if forward <= 0.0 || strike <= 0.0 || expiry < 0.0 {
        return f64::NAN;
    }

    let SabrParameters {
        alpha,
        beta,
        rho,
        nu,
    } = *params;

    let one_minus_beta = 1.0 - beta;
    let b2 = one_minus_beta * one_minus_beta;
    let fk = forward * strike;
    let fk_half = fk.powf(0.5 * one_minus_beta);
    let log_fk = (forward / strike).ln();
    let log_fk2 = log_fk * log_fk;

    let z = nu / alpha * fk_half * log_fk;
    let ratio = if z.abs() < SMALL_Z {
        1.0 - 0.5 * rho * z
    } else {
        let root = (1.0 - 2.0 * rho * z + z * z).sqrt();
        z / ((root + z - rho) / (1.0 - rho)).ln()
    };

    let denominator = fk_half * (1.0 + b2 / 24.0 * log_fk2 + b2 * b2 / 1920.0 * log_fk2 * log_fk2);
    let correction = 1.0
        + (b2 / 24.0 * alpha * alpha / (fk_half * fk_half)
            + 0.25 * rho * beta * nu * alpha / fk_half
            + (2.0 - 3.0 * rho * rho) / 24.0 * nu * nu)
            * expiry;

    alpha / denominator * ratio * correction
}

// =============================================================================
// SMILE FITTER
// =============================================================================

/// Fits SABR parameters to a single-expiry smile.
///
/// Each strike becomes a [`CalibrationInstrument`] whose observable is the
/// strike, and the model is [`hagan_volatility`] at the fitter's forward and
/// expiry.
#[derive(Debug)]
pub struct SabrModelFitter {
    forward: f64,
    expiry: f64,
    instruments: Vec<CalibrationInstrument<f64>>,
    config: CalibrationConfig,
}

impl SabrModelFitter {
    /// Creates a fitter for implied volatilities `vols` at `strikes`.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::InvalidInput`] for a non-positive forward or
    /// expiry, mismatched arrays, or invalid volatilities or errors.
    pub fn new(
        forward: f64,
        expiry: f64,
        strikes: &[f64],
        vols: &[f64],
        errors: &[f64],
    ) -> CalibrationResult<Self> {
        if !(forward.is_finite() && forward > 0.0) {
            return Err(CalibrationError::invalid_input(format!(
                "forward must be positive, got {forward}"
            )));
        }
        if !(expiry.is_finite() && expiry > 0.0) {
            return Err(CalibrationError::invalid_input(format!(
                "expiry must be positive, got {expiry}"
            )));
        }

        let instruments = CalibrationInstrument::from_arrays(strikes.to_vec(), vols, errors)?;

        Ok(Self {
            forward,
            expiry,
            instruments,
            config: CalibrationConfig::default(),
        })
    }

    /// Builder method to set the calibration settings.
    #[must_use]
    pub fn with_config(mut self, config: CalibrationConfig) -> Self {
        self.config = config;
        self
    }

    /// Forward of the smile.
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// Expiry of the smile in years.
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Instruments built from the smile.
    pub fn instruments(&self) -> &[CalibrationInstrument<f64>] {
        &self.instruments
    }

    /// Fits the smile from `start`, keeping parameters flagged in `fixed`
    /// (ordered `alpha, beta, rho, nu`) at their start values.
    ///
    /// # Errors
    ///
    /// * [`CalibrationError::Validation`] when a strike is not positive
    /// * any error from [`LeastSquaresCalibrator::calibrate`]
    pub fn fit(&self, start: &SabrParameters, fixed: &[bool; 4]) -> CalibrationResult<FittedModelResult> {
        let forward = self.forward;
        let expiry = self.expiry;

        debug!(
            forward,
            expiry,
            strikes = self.instruments.len(),
            "fitting SABR smile"
        );

        let calibrator = LeastSquaresCalibrator::new(self.config)
            .with_validator(|strike: &f64| strike.is_finite() && *strike > 0.0);

        calibrator.calibrate(
            &self.instruments,
            |p: &[f64], strike: &f64| {
                let params = SabrParameters::new(p[0], p[1], p[2], p[3]);
                hagan_volatility(forward, *strike, expiry, &params)
            },
            &start.to_vec(),
            &SabrParameters::limits(),
            fixed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_black_limit() {
        let params = SabrParameters::new(0.3, 1.0, 0.0, 0.0);

        for strike in [0.5, 1.0, 1.5] {
            assert_relative_eq!(hagan_volatility(1.0, strike, 1.0, &params), 0.3, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_atm_matches_closed_form() {
        let params = SabrParameters::new(0.04, 0.5, -0.3, 0.4);
        let (f, t) = (0.03_f64, 2.0);

        let f_beta = f.powf(0.5);
        let expected = params.alpha / f_beta
            * (1.0
                + (0.25 / 24.0 * params.alpha * params.alpha / f
                    + 0.25 * params.rho * params.beta * params.nu * params.alpha / f_beta
                    + (2.0 - 3.0 * params.rho * params.rho) / 24.0 * params.nu * params.nu)
                    * t);

        assert_relative_eq!(hagan_volatility(f, f, t, &params), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_continuous_through_atm() {
        let params = SabrParameters::new(0.04, 0.5, -0.3, 0.4);
        let f = 0.03;

        let atm = hagan_volatility(f, f, 1.0, &params);
        let near = hagan_volatility(f, f * (1.0 + 1e-7), 1.0, &params);

        assert_relative_eq!(atm, near, max_relative = 1e-6);
    }

    #[test]
    fn test_negative_rho_skews_down() {
        let params = SabrParameters::new(0.04, 0.5, -0.5, 0.4);
        let f = 0.03;

        let low = hagan_volatility(f, 0.02, 1.0, &params);
        let high = hagan_volatility(f, 0.04, 1.0, &params);

        assert!(low > high);
    }

    #[test]
    fn test_invalid_inputs_give_nan() {
        let params = SabrParameters::new(0.2, 1.0, 0.0, 0.3);

        assert!(hagan_volatility(-1.0, 1.0, 1.0, &params).is_nan());
        assert!(hagan_volatility(1.0, 0.0, 1.0, &params).is_nan());
        assert!(hagan_volatility(1.0, 1.0, -1.0, &params).is_nan());
    }

    #[test]
    fn test_parameter_vector_round_trip() {
        let params = SabrParameters::new(0.2, 0.7, -0.25, 0.5);

        assert_eq!(SabrParameters::from_slice(&params.to_vec()).unwrap(), params);
        assert!(SabrParameters::from_slice(&[0.1, 0.2]).is_err());
    }

    #[test]
    fn test_fitter_rejects_bad_setup() {
        assert!(SabrModelFitter::new(0.0, 1.0, &[1.0], &[0.2], &[0.01]).is_err());
        assert!(SabrModelFitter::new(1.0, 0.0, &[1.0], &[0.2], &[0.01]).is_err());
        assert!(SabrModelFitter::new(1.0, 1.0, &[1.0, 2.0], &[0.2], &[0.01]).is_err());
    }

    #[test]
    fn test_fitter_rejects_negative_strike() {
        let fitter = SabrModelFitter::new(1.0, 1.0, &[-0.5, 1.0], &[0.2, 0.2], &[0.01, 0.01]).unwrap();

        let result = fitter.fit(&SabrParameters::new(0.2, 1.0, 0.0, 0.3), &[false, true, false, false]);

        assert!(matches!(result, Err(CalibrationError::Validation(_))));
    }
}
