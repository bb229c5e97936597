//! Singular value decomposition of a 2x2 upper triangular matrix.

use nalgebra::Matrix2;

/// Relative machine precision with rounding, `ε / 2`.
const HALF_EPSILON: f64 = f64::EPSILON / 2.0;

/// Singular values and rotations of `[[f, g], [0, h]]`.
///
/// The rotations satisfy
///
/// ```text
/// [ cos_left  sin_left ] [ f  g ] [ cos_right -sin_right ]   [ sigma_max     0     ]
/// [-sin_left  cos_left ] [ 0  h ] [ sin_right  cos_right ] = [     0     sigma_min ]
/// ```
///
/// with `|sigma_max| >= |sigma_min|`. The singular values carry signs so that
/// the identity holds exactly; their absolute values are the usual singular
/// values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Svd2x2 {
    /// Singular value of larger magnitude.
    pub sigma_max: f64,
    /// Singular value of smaller magnitude.
    pub sigma_min: f64,
    /// Cosine of the left rotation.
    pub cos_left: f64,
    /// Sine of the left rotation.
    pub sin_left: f64,
    /// Cosine of the right rotation.
    pub cos_right: f64,
    /// Sine of the right rotation.
    pub sin_right: f64,
}

impl Svd2x2 {
    /// Left rotation `[[cos_left, sin_left], [-sin_left, cos_left]]`.
    #[must_use]
    pub fn left(&self) -> Matrix2<f64> {
        Matrix2::new(self.cos_left, self.sin_left, -self.sin_left, self.cos_left)
    }

    /// Right rotation `[[cos_right, -sin_right], [sin_right, cos_right]]`.
    #[must_use]
    pub fn right(&self) -> Matrix2<f64> {
        Matrix2::new(self.cos_right, -self.sin_right, self.sin_right, self.cos_right)
    }

    /// `diag(sigma_max, sigma_min)`.
    #[must_use]
    pub fn singular_values(&self) -> Matrix2<f64> {
        Matrix2::new(self.sigma_max, 0.0, 0.0, self.sigma_min)
    }
}

/// Computes the SVD of the upper triangular matrix `[[f, g], [0, h]]`.
///
/// Follows the branch structure of LAPACK's `dlasv2`: the larger diagonal
/// entry is moved to the top left (`swap`), the position of the entry of
/// largest magnitude is tracked (`pmax`), and a very large off-diagonal `g`
/// is handled separately (`gasmal` false) to avoid overflow and loss of
/// accuracy. The result is accurate to a few ulps barring over/underflow.
///
/// # Example
///
/// ```rust
/// use meridian_math::linear_algebra::svd_2x2;
///
/// let svd = svd_2x2(3.0, 0.0, 4.0);
/// assert_eq!((svd.sigma_max, svd.sigma_min), (4.0, 3.0));
/// assert_eq!((svd.cos_left, svd.sin_left), (0.0, 1.0));
/// ```
#[must_use]
pub fn svd_2x2(f: f64, g: f64, h: f64) -> Svd2x2 {
    let mut ft = f;
    let mut fa = ft.abs();
    let mut ht = h;
    let mut ha = h.abs();

    // pmax: 1 when f is largest, 2 when g is, 3 when h is
    let mut pmax = 1;
    let swap = ha > fa;
    if swap {
        pmax = 3;
        std::mem::swap(&mut ft, &mut ht);
        std::mem::swap(&mut fa, &mut ha);
    }

    let gt = g;
    let ga = gt.abs();

    let (mut ssmax, mut ssmin, clt, slt, crt, srt);
    if ga == 0.0 {
        // Already diagonal
        ssmin = ha;
        ssmax = fa;
        clt = 1.0;
        crt = 1.0;
        slt = 0.0;
        srt = 0.0;
    } else if ga > fa && fa / ga < HALF_EPSILON {
        // g dominates to working precision
        pmax = 2;
        ssmax = ga;
        ssmin = if ha > 1.0 { fa / (ga / ha) } else { (fa / ga) * ha };
        clt = 1.0;
        slt = ht / gt;
        srt = 1.0;
        crt = ft / gt;
    } else {
        if ga > fa {
            pmax = 2;
        }

        let d = fa - ha;
        // l lies in [0, 1]; copying fa avoids rounding when ha is tiny
        let l = if d == fa { 1.0 } else { d / fa };
        let m = gt / ft;
        let t = 2.0 - l;
        let mm = m * m;
        let tt = t * t;
        let s = (tt + mm).sqrt();
        let r = if l == 0.0 { m.abs() } else { (l * l + mm).sqrt() };
        let a = 0.5 * (s + r);

        ssmin = ha / a;
        ssmax = fa * a;

        let t = if mm == 0.0 {
            if l == 0.0 {
                2.0_f64.copysign(ft) * 1.0_f64.copysign(gt)
            } else {
                gt / d.copysign(ft) + m / t
            }
        } else {
            (m / (s + t) + m / (r + l)) * (1.0 + a)
        };

        let l = (t * t + 4.0).sqrt();
        crt = 2.0 / l;
        srt = t / l;
        clt = (crt + srt * m) / a;
        slt = (ht / ft) * srt / a;
    }

    let (cos_left, sin_left, cos_right, sin_right) = if swap {
        (srt, crt, slt, clt)
    } else {
        (clt, slt, crt, srt)
    };

    // Restore signs so the rotated matrix is exactly diagonal
    let tsign = match pmax {
        1 => sign(cos_right) * sign(cos_left) * sign(f),
        2 => sign(sin_right) * sign(cos_left) * sign(g),
        _ => sign(sin_right) * sign(sin_left) * sign(h),
    };
    ssmax = ssmax.copysign(tsign);
    ssmin = ssmin.copysign(tsign * sign(f) * sign(h));

    Svd2x2 {
        sigma_max: ssmax,
        sigma_min: ssmin,
        cos_left,
        sin_left,
        cos_right,
        sin_right,
    }
}

/// `±1` carrying the sign of `x`, with zero counted as positive.
fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_diagonalises(f: f64, g: f64, h: f64) {
        let svd = svd_2x2(f, g, h);
        let a = Matrix2::new(f, g, 0.0, h);

        let product = svd.left() * a * svd.right();
        let scale = f.abs().max(g.abs()).max(h.abs());

        assert_relative_eq!(product[(0, 0)], svd.sigma_max, epsilon = 1e-13 * scale);
        assert_relative_eq!(product[(1, 1)], svd.sigma_min, epsilon = 1e-13 * scale);
        assert!(product[(0, 1)].abs() <= 1e-13 * scale);
        assert!(product[(1, 0)].abs() <= 1e-13 * scale);
        assert!(svd.sigma_max.abs() >= svd.sigma_min.abs());

        // Rotations are orthonormal
        assert_relative_eq!(svd.cos_left.hypot(svd.sin_left), 1.0, epsilon = 1e-14);
        assert_relative_eq!(svd.cos_right.hypot(svd.sin_right), 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_swapped_diagonal() {
        let svd = svd_2x2(3.0, 0.0, 4.0);

        assert_eq!(svd.sigma_max, 4.0);
        assert_eq!(svd.sigma_min, 3.0);
        assert_eq!(svd.cos_left, 0.0);
        assert_eq!(svd.sin_left, 1.0);
        assert_eq!(svd.cos_right, 0.0);
        assert_eq!(svd.sin_right, 1.0);
        assert_diagonalises(3.0, 0.0, 4.0);
    }

    #[test]
    fn test_diagonal_is_identity_rotation() {
        let svd = svd_2x2(5.0, 0.0, 2.0);

        assert_eq!((svd.sigma_max, svd.sigma_min), (5.0, 2.0));
        assert_eq!(svd.left(), Matrix2::identity());
        assert_eq!(svd.right(), Matrix2::identity());
    }

    #[test]
    fn test_general_matrices() {
        assert_diagonalises(2.0, 3.0, -1.0);
        assert_diagonalises(1.0, 1.0, 1.0);
        assert_diagonalises(-4.0, 0.5, 2.5);
        assert_diagonalises(0.3, -7.0, 0.2);
        assert_diagonalises(1.0, 2.0, 0.0);
    }

    #[test]
    fn test_singular_values_match_invariants() {
        let (f, g, h) = (2.0_f64, 3.0_f64, -1.0_f64);
        let svd = svd_2x2(f, g, h);

        // |det| and Frobenius norm are preserved
        assert_relative_eq!((svd.sigma_max * svd.sigma_min).abs(), (f * h).abs(), epsilon = 1e-13);
        assert_relative_eq!(
            svd.sigma_max.powi(2) + svd.sigma_min.powi(2),
            f * f + g * g + h * h,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_dominant_off_diagonal() {
        // f / g below working precision takes the large-g branch
        let (f, g, h) = (1.0e-17, 1.0, 2.0e-17);
        let svd = svd_2x2(f, g, h);

        assert_relative_eq!(svd.sigma_max.abs(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(svd.sigma_min.abs(), 2.0e-34, max_relative = 1e-12);
        assert_diagonalises(f, g, h);
    }
}
