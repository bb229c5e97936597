//! # Meridian Calibration
//!
//! Least-squares calibration of model parameters to market observations.
//!
//! This crate provides:
//!
//! - **Instruments**: Observed values with measurement errors
//! - **Objective**: Error-weighted chi-square over a caller-supplied model
//! - **Calibrator**: Constrained minimisation of chi-square with fixed-parameter
//!   support
//! - **SABR**: Hagan's implied volatility formula and a smile fitter
//!
//! ## Logging
//!
//! Progress is reported as `tracing` events. The library never installs a
//! subscriber.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]

pub mod calibrator;
pub mod config;
pub mod error;
pub mod instrument;
pub mod objective;
pub mod result;
pub mod sabr;

pub use calibrator::LeastSquaresCalibrator;
pub use config::CalibrationConfig;
pub use error::{CalibrationError, CalibrationResult, Validate, ValidationError};
pub use instrument::CalibrationInstrument;
pub use objective::ChiSquareObjective;
pub use result::FittedModelResult;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calibrator::LeastSquaresCalibrator;
    pub use crate::config::CalibrationConfig;
    pub use crate::error::{CalibrationError, CalibrationResult, Validate, ValidationError};
    pub use crate::instrument::CalibrationInstrument;
    pub use crate::objective::ChiSquareObjective;
    pub use crate::result::FittedModelResult;
    pub use crate::sabr::{hagan_volatility, SabrModelFitter, SabrParameters};
    pub use meridian_math::transform::ParameterLimitsTransform;
}
