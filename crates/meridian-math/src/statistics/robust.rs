//! Order-statistic estimators.

use crate::error::{MathError, MathResult};

/// Median of the data.
///
/// # Errors
///
/// * [`MathError::InsufficientData`] for empty input
/// * [`MathError::InvalidInput`] when the data contains `NaN`
pub fn median(data: &[f64]) -> MathResult<f64> {
    let sorted = sorted_copy(data, 1)?;
    Ok(median_of_sorted(&sorted))
}

/// Mean after discarding the `k = round(n·gamma)` smallest and largest
/// values.
///
/// `gamma` must lie in `[0, 1]`; values above one half are reflected to
/// `1 - gamma`. `k` never exceeds `(n - 1) / 2`, so the middle value (odd
/// `n`) or the middle pair (even `n`) always survives.
///
/// # Example
///
/// ```rust
/// use meridian_math::statistics::trimmed_mean;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 100.0];
/// assert_eq!(trimmed_mean(&data, 0.2).unwrap(), 3.0);
/// ```
pub fn trimmed_mean(data: &[f64], gamma: f64) -> MathResult<f64> {
    if !(0.0..=1.0).contains(&gamma) {
        return Err(MathError::invalid_input(format!(
            "trimming fraction must lie in [0, 1], got {gamma}"
        )));
    }

    let sorted = sorted_copy(data, 1)?;
    let k = trim_count(sorted.len(), gamma);

    Ok(anchored_mean(&sorted[k..sorted.len() - k]))
}

/// Mean after replacing the `k = round(n·gamma)` smallest values by the
/// `(k+1)`-th smallest and the `k` largest by the `(k+1)`-th largest.
///
/// `gamma` must lie in `(0, 1)`; the reflection and the cap on `k` follow
/// [`trimmed_mean`].
pub fn winsorized_mean(data: &[f64], gamma: f64) -> MathResult<f64> {
    if !(gamma > 0.0 && gamma < 1.0) {
        return Err(MathError::invalid_input(format!(
            "winsorizing fraction must lie in (0, 1), got {gamma}"
        )));
    }

    let mut sorted = sorted_copy(data, 1)?;
    let n = sorted.len();
    let k = trim_count(n, gamma);

    let low = sorted[k];
    let high = sorted[n - 1 - k];
    sorted[..k].fill(low);
    sorted[n - k..].fill(high);

    Ok(anchored_mean(&sorted))
}

/// Distance between the upper and lower quartiles.
///
/// The sorted data is split into halves at `n / 2`, both halves including
/// the median when `n` is odd, and each quartile is the median of its half.
///
/// # Errors
///
/// [`MathError::InsufficientData`] unless `n > 3`.
pub fn interquartile_range(data: &[f64]) -> MathResult<f64> {
    let sorted = sorted_copy(data, 4)?;
    let n = sorted.len();
    let half = n / 2;

    let (lower, upper) = if n % 2 == 0 {
        (&sorted[..half], &sorted[half..])
    } else {
        (&sorted[..=half], &sorted[half..])
    };

    Ok(median_of_sorted(upper) - median_of_sorted(lower))
}

/// Median of the absolute deviations from the median.
///
/// # Errors
///
/// [`MathError::InsufficientData`] unless `n > 1`.
pub fn median_absolute_deviation(data: &[f64]) -> MathResult<f64> {
    let sorted = sorted_copy(data, 2)?;
    let centre = median_of_sorted(&sorted);

    let mut deviations: Vec<f64> = sorted.iter().map(|x| (x - centre).abs()).collect();
    deviations.sort_by(f64::total_cmp);

    Ok(median_of_sorted(&deviations))
}

fn sorted_copy(data: &[f64], required: usize) -> MathResult<Vec<f64>> {
    if data.len() < required {
        return Err(MathError::insufficient_data(required, data.len()));
    }
    if data.iter().any(|x| x.is_nan()) {
        return Err(MathError::invalid_input("data contains NaN"));
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

fn trim_count(n: usize, gamma: f64) -> usize {
    let gamma = if gamma > 0.5 { 1.0 - gamma } else { gamma };
    let k = (n as f64 * gamma).round() as usize;
    k.min((n - 1) / 2)
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    let mid = n / 2;
    if n % 2 == 0 {
        0.5 * (sorted[mid - 1] + sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Mean taken about the first value, exact when all values are equal.
fn anchored_mean(values: &[f64]) -> f64 {
    let anchor = values[0];
    let offset: f64 = values.iter().map(|x| x - anchor).sum();
    anchor + offset / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
        assert_eq!(median(&[7.0]).unwrap(), 7.0);
        assert!(matches!(
            median(&[]),
            Err(MathError::InsufficientData { required: 1, actual: 0 })
        ));
    }

    #[test]
    fn test_trimmed_mean_drops_outliers() {
        let data = [-50.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 1000.0];

        // k = round(10 * 0.1) = 1
        assert_relative_eq!(trimmed_mean(&data, 0.1).unwrap(), 4.5, epsilon = 1e-14);
        assert_relative_eq!(trimmed_mean(&data, 0.0).unwrap(), 98.6, epsilon = 1e-12);
    }

    #[test]
    fn test_trimmed_mean_reflects_gamma() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 80.0];

        let low = trimmed_mean(&data, 0.25).unwrap();
        let high = trimmed_mean(&data, 0.75).unwrap();

        assert_eq!(low, high);
        assert_relative_eq!(low, 4.5, epsilon = 1e-14);
    }

    #[test]
    fn test_trim_keeps_middle() {
        let odd = [1.0, 2.0, 30.0, 40.0, 50.0];
        let even = [1.0, 2.0, 3.0, 4.0];

        assert_eq!(trimmed_mean(&odd, 0.5).unwrap(), 30.0);
        assert_eq!(trimmed_mean(&even, 0.5).unwrap(), 2.5);
        assert_eq!(trimmed_mean(&[9.0], 0.4).unwrap(), 9.0);
    }

    #[test]
    fn test_winsorized_mean() {
        let data = [-100.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];

        // k = 1: -100 is raised to 1 and 9 is lowered to 8
        let expected = (1.0 + 1.0 + 2.0 + 3.0 + 4.0 + 5.0 + 6.0 + 7.0 + 8.0 + 8.0) / 10.0;
        assert_relative_eq!(winsorized_mean(&data, 0.1).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_fraction_validation() {
        let data = [1.0, 2.0, 3.0];

        assert!(trimmed_mean(&data, -0.1).is_err());
        assert!(trimmed_mean(&data, 1.1).is_err());
        assert!(trimmed_mean(&data, f64::NAN).is_err());
        assert!(trimmed_mean(&data, 1.0).is_ok());
        assert!(winsorized_mean(&data, 0.0).is_err());
        assert!(winsorized_mean(&data, 1.0).is_err());
    }

    #[test]
    fn test_constant_input_is_exact() {
        let data = [0.1; 7];

        assert_eq!(trimmed_mean(&data, 0.2).unwrap(), 0.1);
        assert_eq!(winsorized_mean(&data, 0.2).unwrap(), 0.1);
    }

    #[test]
    fn test_interquartile_range() {
        let even: Vec<f64> = (1..=8).map(f64::from).collect();
        assert_relative_eq!(interquartile_range(&even).unwrap(), 4.0);

        // Odd: both halves share the median 4
        let odd: Vec<f64> = (1..=7).map(f64::from).collect();
        assert_relative_eq!(interquartile_range(&odd).unwrap(), 5.5 - 2.5);

        assert!(matches!(
            interquartile_range(&[1.0, 2.0, 3.0]),
            Err(MathError::InsufficientData { required: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_median_absolute_deviation() {
        let data = [1.0, 1.0, 2.0, 2.0, 4.0, 6.0, 9.0];

        // Median 2, deviations [1, 1, 0, 0, 2, 4, 7]
        assert_eq!(median_absolute_deviation(&data).unwrap(), 1.0);
        assert!(median_absolute_deviation(&[1.0]).is_err());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let data = vec![5.0, 3.0, 9.0, 1.0, 7.0];
        let copy = data.clone();

        let _ = trimmed_mean(&data, 0.2).unwrap();
        let _ = winsorized_mean(&data, 0.2).unwrap();
        let _ = interquartile_range(&data).unwrap();
        let _ = median_absolute_deviation(&data).unwrap();

        assert_eq!(data, copy);
    }

    #[test]
    fn test_nan_rejected() {
        assert!(matches!(
            median(&[1.0, f64::NAN]),
            Err(MathError::InvalidInput { .. })
        ));
    }
}
