//! Market observations to calibrate against.

use crate::error::{CalibrationError, CalibrationResult};

/// One observed market value with its measurement error.
///
/// `I` is whatever the model needs to price the observation, such as a
/// strike or an option description. The error weights the observation in
/// the chi-square sum and is always finite and positive.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationInstrument<I> {
    observable: I,
    market_value: f64,
    error: f64,
}

impl<I> CalibrationInstrument<I> {
    /// Creates an instrument.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::InvalidInput`] for a non-finite market value or
    /// an error that is not finite and positive.
    pub fn new(observable: I, market_value: f64, error: f64) -> CalibrationResult<Self> {
        if !market_value.is_finite() {
            return Err(CalibrationError::invalid_input(format!(
                "market value must be finite, got {market_value}"
            )));
        }
        if !(error.is_finite() && error > 0.0) {
            return Err(CalibrationError::invalid_input(format!(
                "measurement error must be finite and positive, got {error}"
            )));
        }

        Ok(Self {
            observable,
            market_value,
            error,
        })
    }

    /// Creates an instrument with unit measurement error.
    pub fn with_unit_error(observable: I, market_value: f64) -> CalibrationResult<Self> {
        Self::new(observable, market_value, 1.0)
    }

    /// Builds instruments from parallel arrays.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::InvalidInput`] when the arrays are empty, differ
    /// in length, or contain an invalid value or error.
    pub fn from_arrays(
        observables: Vec<I>,
        market_values: &[f64],
        errors: &[f64],
    ) -> CalibrationResult<Vec<Self>> {
        if observables.is_empty() {
            return Err(CalibrationError::invalid_input("no observables given"));
        }
        if observables.len() != market_values.len() || observables.len() != errors.len() {
            return Err(CalibrationError::invalid_input(format!(
                "array lengths differ: {} observables, {} values, {} errors",
                observables.len(),
                market_values.len(),
                errors.len()
            )));
        }

        observables
            .into_iter()
            .zip(market_values.iter().zip(errors))
            .map(|(observable, (&value, &error))| Self::new(observable, value, error))
            .collect()
    }

    /// What the model prices.
    pub fn observable(&self) -> &I {
        &self.observable
    }

    /// Observed market value.
    pub fn market_value(&self) -> f64 {
        self.market_value
    }

    /// Measurement error.
    pub fn error(&self) -> f64 {
        self.error
    }
}
