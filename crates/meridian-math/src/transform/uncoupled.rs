//! Vector-level transform built from independent per-parameter limits.

use nalgebra::{DMatrix, DVector};

use crate::error::{MathError, MathResult};
use crate::transform::ParameterLimitsTransform;

/// Maps a full model-parameter vector to the vector of free fitting-space
/// coordinates and back.
///
/// Each parameter is transformed independently by its own
/// [`ParameterLimitsTransform`]. Fixed parameters do not appear in fitting
/// space at all; [`transform`](Self::transform) fills them in from the start
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct UncoupledParameterTransform {
    start: Vec<f64>,
    limits: Vec<ParameterLimitsTransform>,
    fixed: Vec<bool>,
    free_indices: Vec<usize>,
}

impl UncoupledParameterTransform {
    /// Creates a transform from start values, limits and a fixed mask.
    ///
    /// # Errors
    ///
    /// * [`MathError::InsufficientData`] for an empty parameter vector
    /// * [`MathError::DimensionMismatch`] when the three inputs differ in length
    /// * [`MathError::InvalidInput`] for malformed limits
    /// * [`MathError::Domain`] when a free start value violates its limits
    pub fn new(
        start: Vec<f64>,
        limits: Vec<ParameterLimitsTransform>,
        fixed: Vec<bool>,
    ) -> MathResult<Self> {
        let n = start.len();
        if n == 0 {
            return Err(MathError::insufficient_data(1, 0));
        }
        if limits.len() != n {
            return Err(MathError::dimension_mismatch(n, limits.len()));
        }
        if fixed.len() != n {
            return Err(MathError::dimension_mismatch(n, fixed.len()));
        }

        for (i, (limit, &value)) in limits.iter().zip(&start).enumerate() {
            limit.validate()?;
            if !value.is_finite() {
                return Err(MathError::invalid_input(format!(
                    "start value {i} is not finite: {value}"
                )));
            }
            if !fixed[i] {
                limit.inverse_transform(value)?;
            }
        }

        let free_indices = (0..n).filter(|&i| !fixed[i]).collect();

        Ok(Self {
            start,
            limits,
            fixed,
            free_indices,
        })
    }

    /// Creates a transform with every parameter free.
    pub fn all_free(start: Vec<f64>, limits: Vec<ParameterLimitsTransform>) -> MathResult<Self> {
        let fixed = vec![false; start.len()];
        Self::new(start, limits, fixed)
    }

    /// Number of model parameters.
    #[must_use]
    pub fn model_dimension(&self) -> usize {
        self.start.len()
    }

    /// Number of free (fitted) parameters.
    #[must_use]
    pub fn fitting_dimension(&self) -> usize {
        self.free_indices.len()
    }

    /// Start values, which also supply the fixed parameters.
    #[must_use]
    pub fn start_values(&self) -> &[f64] {
        &self.start
    }

    /// Per-parameter limits.
    #[must_use]
    pub fn limits(&self) -> &[ParameterLimitsTransform] {
        &self.limits
    }

    /// The fixed mask.
    #[must_use]
    pub fn fixed(&self) -> &[bool] {
        &self.fixed
    }

    /// Indices of the free parameters in model order.
    #[must_use]
    pub fn free_indices(&self) -> &[usize] {
        &self.free_indices
    }

    /// Maps a fitting-space vector to the full model vector.
    pub fn transform(&self, fitting: &[f64]) -> MathResult<Vec<f64>> {
        self.check_fitting_len(fitting)?;

        let mut model = self.start.clone();
        for (&x, &i) in fitting.iter().zip(&self.free_indices) {
            model[i] = self.limits[i].transform(x);
        }
        Ok(model)
    }

    /// Maps a full model vector to fitting space, dropping fixed entries.
    pub fn inverse_transform(&self, model: &[f64]) -> MathResult<Vec<f64>> {
        if model.len() != self.model_dimension() {
            return Err(MathError::dimension_mismatch(self.model_dimension(), model.len()));
        }

        self.free_indices
            .iter()
            .map(|&i| self.limits[i].inverse_transform(model[i]))
            .collect()
    }

    /// Fitting-space start point.
    pub fn fitting_start(&self) -> MathResult<Vec<f64>> {
        self.inverse_transform(&self.start)
    }

    /// Jacobian `d model_free / d fitting` at `fitting`, a diagonal matrix
    /// of size `fitting_dimension()`.
    pub fn jacobian(&self, fitting: &[f64]) -> MathResult<DMatrix<f64>> {
        self.check_fitting_len(fitting)?;

        let diagonal: Vec<f64> = fitting
            .iter()
            .zip(&self.free_indices)
            .map(|(&x, &i)| self.limits[i].transform_gradient(x))
            .collect();
        Ok(DMatrix::from_diagonal(&DVector::from_vec(diagonal)))
    }

    /// Jacobian `d fitting / d model_free` at the full model vector `model`.
    pub fn inverse_jacobian(&self, model: &[f64]) -> MathResult<DMatrix<f64>> {
        if model.len() != self.model_dimension() {
            return Err(MathError::dimension_mismatch(self.model_dimension(), model.len()));
        }

        let diagonal = self
            .free_indices
            .iter()
            .map(|&i| self.limits[i].inverse_transform_gradient(model[i]))
            .collect::<MathResult<Vec<f64>>>()?;
        Ok(DMatrix::from_diagonal(&DVector::from_vec(diagonal)))
    }

    fn check_fitting_len(&self, fitting: &[f64]) -> MathResult<()> {
        if fitting.len() == self.fitting_dimension() {
            Ok(())
        } else {
            Err(MathError::dimension_mismatch(self.fitting_dimension(), fitting.len()))
        }
    }
}
