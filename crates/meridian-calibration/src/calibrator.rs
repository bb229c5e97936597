//! Least-squares calibration over constrained parameters.

use std::fmt;

use tracing::{debug, info, warn};

use meridian_math::minimization::powell;
use meridian_math::MathError;
use meridian_math::transform::{ParameterLimitsTransform, UncoupledParameterTransform};

use crate::config::CalibrationConfig;
use crate::error::{CalibrationError, CalibrationResult, ValidationError};
use crate::instrument::CalibrationInstrument;
use crate::objective::ChiSquareObjective;
use crate::result::FittedModelResult;

type InstrumentValidator<I> = Box<dyn Fn(&I) -> bool + Send + Sync>;

/// Fits model parameters to instruments by minimising chi-square.
///
/// Parameters are mapped to an unconstrained fitting space with an
/// [`UncoupledParameterTransform`], so limits such as `alpha > 0` or
/// `-1 < rho < 1` hold at every trial point. Fixed parameters keep their
/// start values. The minimiser is Powell's direction-set method.
///
/// # Example
///
/// ```rust
/// use meridian_calibration::{CalibrationInstrument, LeastSquaresCalibrator};
/// use meridian_math::transform::ParameterLimitsTransform;
///
/// // Recover a and b in y = a * exp(b * x)
/// let xs: Vec<f64> = vec![0.0, 0.5, 1.0, 1.5];
/// let ys: Vec<f64> = xs.iter().map(|x| 2.0 * (0.3 * x).exp()).collect();
/// let instruments = CalibrationInstrument::from_arrays(xs, &ys, &[1e-3; 4]).unwrap();
///
/// let result = LeastSquaresCalibrator::default()
///     .calibrate(
///         &instruments,
///         |p: &[f64], x: &f64| p[0] * (p[1] * x).exp(),
///         &[1.0, 0.0],
///         &[ParameterLimitsTransform::greater_than(0.0).unwrap(), ParameterLimitsTransform::Unbounded],
///         &[false, false],
///     )
///     .unwrap();
///
/// assert!((result.model_parameters()[0] - 2.0).abs() < 1e-5);
/// assert!((result.model_parameters()[1] - 0.3).abs() < 1e-5);
/// ```
pub struct LeastSquaresCalibrator<I> {
    config: CalibrationConfig,
    validator: Option<InstrumentValidator<I>>,
}

impl<I> Default for LeastSquaresCalibrator<I> {
    fn default() -> Self {
        Self::new(CalibrationConfig::default())
    }
}

impl<I> fmt::Debug for LeastSquaresCalibrator<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeastSquaresCalibrator")
            .field("config", &self.config)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

impl<I> LeastSquaresCalibrator<I> {
    /// Creates a calibrator.
    pub fn new(config: CalibrationConfig) -> Self {
        Self {
            config,
            validator: None,
        }
    }

    /// Adds a predicate every instrument must satisfy, e.g. that all
    /// options share the expiry the model was built for.
    #[must_use]
    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: Fn(&I) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Calibration settings.
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Fits the free parameters to `instruments`.
    ///
    /// `start`, `limits` and `fixed` describe the full model vector. The
    /// model receives the full vector, fixed entries included.
    ///
    /// When every parameter is fixed no minimisation runs: chi-square is
    /// evaluated at `start` and the result reports zero sweeps. A non-finite
    /// chi-square there is an error, as it is for a start point with free
    /// parameters.
    ///
    /// # Errors
    ///
    /// * [`CalibrationError::InvalidInput`] for no instruments, mismatched
    ///   or empty parameter arrays, or a free start value outside its limits
    /// * [`CalibrationError::Validation`] when the instrument validator
    ///   rejects an instrument
    /// * [`CalibrationError::Math`] when chi-square is not finite at the
    ///   start or the minimiser fails
    pub fn calibrate<M>(
        &self,
        instruments: &[CalibrationInstrument<I>],
        model: M,
        start: &[f64],
        limits: &[ParameterLimitsTransform],
        fixed: &[bool],
    ) -> CalibrationResult<FittedModelResult>
    where
        M: Fn(&[f64], &I) -> f64,
    {
        if instruments.is_empty() {
            return Err(CalibrationError::invalid_input("no instruments to calibrate to"));
        }
        if start.is_empty() {
            return Err(CalibrationError::invalid_input("no model parameters given"));
        }
        if limits.len() != start.len() || fixed.len() != start.len() {
            return Err(CalibrationError::invalid_input(format!(
                "parameter arrays differ in length: {} start values, {} limits, {} fixed flags",
                start.len(),
                limits.len(),
                fixed.len()
            )));
        }

        self.check_instruments(instruments)?;

        let transform =
            UncoupledParameterTransform::new(start.to_vec(), limits.to_vec(), fixed.to_vec())
                .map_err(|e| {
                    CalibrationError::invalid_input(format!("invalid parameter setup: {e}"))
                })?;
        let objective = ChiSquareObjective::new(instruments, model);

        info!(
            instruments = instruments.len(),
            parameters = start.len(),
            free = transform.fitting_dimension(),
            "starting calibration"
        );

        if transform.fitting_dimension() == 0 {
            let chi_square = objective.chi_square(start);
            if !chi_square.is_finite() {
                return Err(MathError::invalid_input(format!(
                    "chi-square is not finite at the fixed parameters: {chi_square}"
                ))
                .into());
            }
            info!(chi_square, "all parameters fixed, no minimisation run");
            return Ok(FittedModelResult::new(
                start.to_vec(),
                Vec::new(),
                chi_square,
                transform,
                0,
                true,
            ));
        }

        let fitting_start = transform.fitting_start()?;
        let chi_square_in_fitting_space = |x: &[f64]| match transform.transform(x) {
            Ok(parameters) => objective.chi_square(&parameters),
            Err(_) => f64::INFINITY,
        };

        let minimum = powell(
            chi_square_in_fitting_space,
            &fitting_start,
            &self.config.to_powell_config(),
        )?;
        let model_parameters = transform.transform(&minimum.parameters)?;

        if minimum.converged {
            info!(
                chi_square = minimum.objective_value,
                sweeps = minimum.iterations,
                "calibration converged"
            );
        } else {
            warn!(
                chi_square = minimum.objective_value,
                sweeps = minimum.iterations,
                "calibration stopped at the sweep ceiling before converging"
            );
        }

        Ok(FittedModelResult::new(
            model_parameters,
            minimum.parameters,
            minimum.objective_value,
            transform,
            minimum.iterations,
            minimum.converged,
        ))
    }

    fn check_instruments(&self, instruments: &[CalibrationInstrument<I>]) -> CalibrationResult<()> {
        let Some(validator) = &self.validator else {
            return Ok(());
        };

        let errors: Vec<ValidationError> = instruments
            .iter()
            .enumerate()
            .filter(|(_, inst)| !validator(inst.observable()))
            .map(|(i, _)| {
                ValidationError::with_rule(
                    format!("instruments[{i}]"),
                    "Instrument rejected by the calibrator's validator",
                    "instrument_validator",
                )
            })
            .collect();

        debug!(
            instruments = instruments.len(),
            rejected = errors.len(),
            "validated instruments"
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CalibrationError::Validation(errors))
        }
    }
}
