//! Statistical utilities for classification

/// Quantile class limits.
///
/// Returns `classes + 1` non-decreasing values: the minimum, the linearly
/// interpolated quantile at `(n - 1) * i / classes` for each inner break,
/// and the maximum. Empty input gives no limits.
pub fn quantile_limits(values: &[f64], classes: usize) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    if n == 0 {
        return Vec::new();
    }
    let classes = classes.max(1);

    let mut limits = Vec::with_capacity(classes + 1);
    limits.push(sorted[0]);
    for i in 1..classes {
        let idx = (n - 1) as f64 * i as f64 / classes as f64;
        limits.push(interpolate(&sorted, idx));
    }
    limits.push(sorted[n - 1]);
    limits
}

fn interpolate(sorted: &[f64], idx: f64) -> f64 {
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_span_data() {
        let limits = quantile_limits(&[5.0, 3.0, 9.0], 8);
        assert_eq!(limits.len(), 9);
        assert_eq!(limits[0], 3.0);
        assert_eq!(limits[8], 9.0);
        assert!(limits.windows(2).all(|w| w[0] <= w[1]));
        // (n - 1) * 4 / 8 = 1 -> the median
        assert_eq!(limits[4], 5.0);
        // (n - 1) * 1 / 8 = 0.25 -> between 3 and 5
        assert_eq!(limits[1], 3.5);
    }

    #[test]
    fn test_ties_collapse() {
        let limits = quantile_limits(&[2.0, 2.0, 2.0, 2.0], 8);
        assert_eq!(limits.len(), 9);
        assert!(limits.iter().all(|&l| l == 2.0));
    }

    #[test]
    fn test_empty_input() {
        assert!(quantile_limits(&[], 8).is_empty());
    }

    #[test]
    fn test_single_value() {
        assert_eq!(quantile_limits(&[7.0], 2), vec![7.0, 7.0, 7.0]);
    }
}
