//! # Meridian Math
//!
//! Numerical core of the Meridian model calibration library.
//!
//! This crate provides:
//!
//! - **Solvers**: Root bracketing and bracketing root finders (Brent, Bisection)
//! - **Minimization**: Minimum bracketing, Brent line minimisation and Powell's
//!   direction-set method
//! - **Transform**: Bijections between constrained model parameters and
//!   unconstrained fitting coordinates
//! - **Statistics**: Trimmed and winsorized means, IQR, MAD
//! - **Linear Algebra**: Closed-form 2x2 SVD
//!
//! ## Design Philosophy
//!
//! - **Pure functions**: Inputs are borrowed and never mutated; results are values
//! - **Explicit failure**: Every failure mode is a [`MathError`] variant
//! - **Bounded work**: Every iterative method has an iteration ceiling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod linear_algebra;
pub mod minimization;
pub mod solvers;
pub mod statistics;
pub mod transform;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{svd_2x2, Svd2x2};
    pub use crate::minimization::{
        bracket_minimum, brent_minimize, powell, LineSearch, MinimizationResult,
        MinimizerConfig, MinimumBracket, PowellConfig,
    };
    pub use crate::solvers::{
        bisection, bracket_root, brent, BisectionRootFinder, Bracket, BracketConfig,
        BrentRootFinder, RootFinder, SolverConfig, SolverResult, ToleranceKind,
    };
    pub use crate::statistics::{
        interquartile_range, median, median_absolute_deviation, trimmed_mean, winsorized_mean,
    };
    pub use crate::transform::{ParameterLimitsTransform, UncoupledParameterTransform};
}

pub use error::{MathError, MathResult};
