use crate::percentiles;

/// Descriptive statistics summarizing one metric column.
///
/// Missing observations never reach this type: the constructors drop `None`
/// and `NaN` values first, so `count` is the number of observed values.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// Number of non-missing observations.
    pub count: usize,
    /// The minimum observed value.
    pub min: f64,
    /// The maximum observed value.
    pub max: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The median, averaging the two middle values for even counts.
    pub median: f64,
    /// Sample variance (`N - 1` denominator), `None` with fewer than two values.
    pub variance: Option<f64>,
    /// Sample standard deviation, `None` with fewer than two values.
    pub std_dev: Option<f64>,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// `NaN` values are treated as missing and skipped.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if at least one value is observed
    /// * `None` - if every value is missing or the input is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use swingdash_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, f64::NAN, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values
            .into_iter()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Like [`Self::new`], but for columns that mark missing values with `None`.
    #[must_use]
    pub fn from_optional<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        Self::new(values.into_iter().flatten())
    }

    /// Computes descriptive statistics from pre-sorted, non-missing values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = percentiles::compute_percentile(sorted_values, 50.0);
        let variance = (count > 1).then(|| {
            sorted_values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0)
        });
        let std_dev = variance.map(f64::sqrt);

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_all_missing() {
        assert!(DescriptiveStats::new(Vec::<f64>::new()).is_none());
        assert!(DescriptiveStats::from_optional([None, None]).is_none());
        assert!(DescriptiveStats::new([f64::NAN]).is_none());
    }

    #[test]
    fn test_single_value_has_no_spread() {
        let stats = DescriptiveStats::new([42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.variance, None);
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn test_sample_standard_deviation() {
        // mean 5, squared deviations sum to 32, N - 1 = 7
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((stats.std_dev.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_even_count_median_is_midpoint() {
        let stats = DescriptiveStats::new([4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let stats = DescriptiveStats::from_optional([Some(1.0), None, Some(3.0)]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
        assert_eq!(stats.median, 2.0);
    }
}
