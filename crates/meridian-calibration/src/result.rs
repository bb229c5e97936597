//! Calibration output.

use meridian_math::transform::UncoupledParameterTransform;
use nalgebra::DMatrix;

/// Result of a least-squares calibration.
///
/// The covariance matrix is not estimated: [`covariance`](Self::covariance)
/// returns a zero matrix of the model dimension and
/// [`covariance_computed`](Self::covariance_computed) is `false`.
#[derive(Debug, Clone)]
pub struct FittedModelResult {
    model_parameters: Vec<f64>,
    fitting_parameters: Vec<f64>,
    chi_square: f64,
    transform: UncoupledParameterTransform,
    covariance: DMatrix<f64>,
    iterations: u32,
    converged: bool,
}

impl FittedModelResult {
    /// Creates a result.
    pub fn new(
        model_parameters: Vec<f64>,
        fitting_parameters: Vec<f64>,
        chi_square: f64,
        transform: UncoupledParameterTransform,
        iterations: u32,
        converged: bool,
    ) -> Self {
        let n = model_parameters.len();
        Self {
            model_parameters,
            fitting_parameters,
            chi_square,
            transform,
            covariance: DMatrix::zeros(n, n),
            iterations,
            converged,
        }
    }

    /// Fitted model parameters, fixed entries included.
    pub fn model_parameters(&self) -> &[f64] {
        &self.model_parameters
    }

    /// Free parameters in fitting space.
    pub fn fitting_parameters(&self) -> &[f64] {
        &self.fitting_parameters
    }

    /// Chi-square at the fitted parameters.
    pub fn chi_square(&self) -> f64 {
        self.chi_square
    }

    /// Transform between model and fitting space used by the fit.
    pub fn transform(&self) -> &UncoupledParameterTransform {
        &self.transform
    }

    /// Parameter covariance placeholder.
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// Whether [`covariance`](Self::covariance) holds an estimate. Always `false`.
    pub fn covariance_computed(&self) -> bool {
        false
    }

    /// Minimiser sweeps used. Zero when every parameter was fixed.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Whether the minimiser met its tolerance.
    pub fn converged(&self) -> bool {
        self.converged
    }
}
