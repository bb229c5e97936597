//! Linear algebra utilities.
//!
//! General matrix work goes through `nalgebra`. This module only adds the
//! closed-form kernels that `nalgebra` does not expose directly.

mod svd_2x2;

pub use svd_2x2::{svd_2x2, Svd2x2};
