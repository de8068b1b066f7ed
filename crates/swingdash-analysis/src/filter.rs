//! IQR outlier filter

use swingdash_stats::percentiles::Percentiles;

use crate::dataset::Dataset;

/// Acceptance interval `[Q1 - w * IQR, Q3 + w * IQR]` for one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFence {
    pub q1: f64,
    pub q3: f64,
    pub low: f64,
    pub high: f64,
}

impl IqrFence {
    /// Builds the fence from the observed values of a column.
    ///
    /// Returns `None` when the IQR is zero or not finite, in which case the
    /// column imposes no constraint.
    #[must_use]
    pub fn from_values(values: &[f64], whisker: f64) -> Option<Self> {
        let quartiles = Percentiles::new(values, &[25.0, 75.0]);
        let q1 = quartiles.get(25.0)?;
        let q3 = quartiles.get(75.0)?;
        let iqr = q3 - q1;
        if !iqr.is_finite() || iqr <= 0.0 {
            return None;
        }
        Some(Self {
            q1,
            q3,
            low: q1 - whisker * iqr,
            high: q3 + whisker * iqr,
        })
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }
}

/// Drops every row that is an outlier on any of `columns`.
///
/// Quartiles are computed per column on `dataset` as given. Missing values
/// never cause a row to be dropped, and columns the dataset lacks are skipped.
#[must_use]
pub fn iqr_filter<S>(dataset: &Dataset, columns: &[S], whisker: f64) -> Dataset
where
    S: AsRef<str>,
{
    let mut mask = vec![true; dataset.len()];
    for name in dataset.present_columns(columns) {
        let Some(values) = dataset.numeric(name) else {
            continue;
        };
        let observed = values.iter().flatten().copied().collect::<Vec<_>>();
        let Some(fence) = IqrFence::from_values(&observed, whisker) else {
            log::debug!("IQR of '{name}' is degenerate; column not filtered");
            continue;
        };
        for (keep, value) in mask.iter_mut().zip(&values) {
            if let Some(value) = value {
                *keep &= fence.contains(*value);
            }
        }
    }
    let filtered = dataset.filter_rows(&mask);
    log::debug!(
        "IQR filter (whisker {whisker}) kept {} of {} rows",
        filtered.len(),
        dataset.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn column(name: &str, values: &[Option<f64>]) -> (String, Vec<Value>) {
        (name.to_owned(), values.iter().map(|v| Value::from(*v)).collect())
    }

    fn speeds() -> Dataset {
        Dataset::from_columns([
            column(
                "Club Speed",
                &[Some(90.0), Some(91.0), Some(92.0), Some(93.0), Some(94.0), Some(150.0), None],
            ),
            column(
                "Spin Rate",
                &[
                    Some(2500.0),
                    Some(2500.0),
                    Some(2500.0),
                    Some(2500.0),
                    Some(2500.0),
                    Some(2500.0),
                    Some(9000.0),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_outlier_is_dropped_and_missing_kept() {
        let filtered = iqr_filter(&speeds(), &["Club Speed"], 1.5);
        assert_eq!(filtered.len(), 6);
        let speeds = filtered.numeric("Club Speed").unwrap();
        assert!(!speeds.contains(&Some(150.0)));
        assert!(speeds.contains(&None));
    }

    #[test]
    fn test_zero_iqr_imposes_no_constraint() {
        // Spin Rate has IQR 0, so 9000 survives
        let filtered = iqr_filter(&speeds(), &["Spin Rate"], 1.5);
        assert_eq!(filtered.len(), 7);
    }

    #[test]
    fn test_any_column_outlier_drops_row() {
        let mut dataset = speeds();
        dataset.set_column(
            "Carry Distance",
            [150.0, 151.0, 152.0, 153.0, 154.0, 155.0, 400.0]
                .into_iter()
                .map(Value::number)
                .collect(),
        );
        let filtered = iqr_filter(&dataset, &["Club Speed", "Carry Distance"], 1.5);
        assert_eq!(filtered.len(), 5);
    }

    #[test]
    fn test_absent_columns_are_ignored() {
        let filtered = iqr_filter(&speeds(), &["Total Distance"], 1.5);
        assert_eq!(filtered, speeds());
    }

    #[test]
    fn test_wider_whisker_keeps_superset() {
        let mut dataset = speeds();
        dataset.set_column(
            "Row",
            (0..7).map(|i| Value::number(f64::from(i))).collect(),
        );
        let rows = |whisker: f64| {
            iqr_filter(&dataset, &["Club Speed"], whisker)
                .numeric("Row")
                .unwrap()
        };
        for (narrow, wide) in [(0.5, 1.0), (1.0, 3.0), (3.0, 30.0)] {
            let kept_narrow = rows(narrow);
            let kept_wide = rows(wide);
            assert!(kept_narrow.iter().all(|row| kept_wide.contains(row)));
        }
        assert_eq!(rows(30.0).len(), 7);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Widening the whisker never drops a row that a narrower one kept
            #[test]
            fn prop_wider_whisker_keeps_superset(
                speeds in prop::collection::vec(prop::option::of(60.0f64..130.0), 1..40),
                narrow in 0.1f64..3.0,
                extra in 0.0f64..5.0,
            ) {
                let mut dataset = Dataset::from_columns([column("Club Speed", &speeds)]).unwrap();
                dataset.set_column(
                    "Row",
                    (0..speeds.len())
                        .map(|i| Value::number(f64::from(u32::try_from(i).unwrap())))
                        .collect(),
                );
                let rows = |whisker: f64| {
                    iqr_filter(&dataset, &["Club Speed"], whisker)
                        .numeric("Row")
                        .unwrap()
                };
                let kept_narrow = rows(narrow);
                let kept_wide = rows(narrow + extra);
                prop_assert!(kept_narrow.iter().all(|row| kept_wide.contains(row)));
                prop_assert!(kept_narrow.len() <= kept_wide.len());
            }
        }
    }
}
