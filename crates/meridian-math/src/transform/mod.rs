//! Constrained parameter transforms.
//!
//! Model parameters usually live on a restricted set (a volatility must be
//! positive, a correlation must lie in `(-1, 1)`), while generic minimisers
//! work on the whole of ℝⁿ. This module provides the bijections between
//! the two:
//!
//! - [`ParameterLimitsTransform`]: one parameter, one set of limits
//! - [`UncoupledParameterTransform`]: a full parameter vector with a fixed
//!   mask, each entry transformed independently
//!
//! "Fitting space" is the unconstrained side seen by the minimiser; "model
//! space" is the constrained side seen by the model.

mod limits;
mod uncoupled;

pub use limits::ParameterLimitsTransform;
pub use uncoupled::UncoupledParameterTransform;
