//! Robust summary statistics.
//!
//! All estimators are pure: they sort a private copy of the data and leave
//! the caller's slice untouched. Empty or too-short input is reported as
//! [`MathError::InsufficientData`](crate::error::MathError::InsufficientData).

mod robust;

pub use robust::{
    interquartile_range, median, median_absolute_deviation, trimmed_mean, winsorized_mean,
};
