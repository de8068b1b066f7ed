//! Per-metric summaries and cross-session deltas
//!
//! - [`describe_session`]: count / mean / median / sample std per metric
//! - [`compare_sessions`]: signed deltas between two summaries, ranked by
//!   improvement
//! - [`compute_kpis`] and [`kpi_series_for_metrics`]: the headline subset

use std::{cmp::Ordering, collections::BTreeMap};

use serde::Serialize;
use swingdash_stats::descriptive::DescriptiveStats;

use crate::{catalogue::MetricCatalogue, dataset::Dataset};

/// Below this magnitude a baseline mean is treated as zero and no
/// percentage change is reported.
const PCT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub metric: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
}

/// One [`MetricSummary`] per metric, in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DescriptiveSummary {
    pub rows: Vec<MetricSummary>,
}

impl DescriptiveSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn get(&self, metric: &str) -> Option<&MetricSummary> {
        self.rows.iter().find(|row| row.metric == metric)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDelta {
    pub metric: String,
    pub mean_old: Option<f64>,
    pub mean_new: Option<f64>,
    pub median_old: Option<f64>,
    pub median_new: Option<f64>,
    /// `mean_new - mean_old`.
    pub delta: Option<f64>,
    /// `100 * delta / mean_old`, undefined for a (near) zero baseline.
    pub pct_change: Option<f64>,
    /// `+1` improved, `-1` worse, `0` unchanged, `None` for neutral metrics.
    pub improvement_sign: Option<i8>,
}

/// Delta rows sorted by improvement, best first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonDelta {
    pub rows: Vec<MetricDelta>,
}

impl ComparisonDelta {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiRow {
    pub metric: String,
    pub old: Option<f64>,
    pub new: Option<f64>,
    pub delta: Option<f64>,
    pub pct: Option<f64>,
}

/// Headline figure for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KpiTile {
    pub old: Option<f64>,
    pub new: Option<f64>,
    pub delta: Option<f64>,
    pub pct: Option<f64>,
}

/// Summarizes each metric of `metrics` that `dataset` has.
///
/// Metrics without any observed value get a zero count and undefined
/// statistics; the standard deviation needs at least two values.
#[must_use]
pub fn describe_session<S>(dataset: &Dataset, metrics: &[S]) -> DescriptiveSummary
where
    S: AsRef<str>,
{
    let rows = dataset
        .present_columns(metrics)
        .into_iter()
        .filter_map(|metric| {
            let values = dataset.numeric(metric)?;
            let stats = DescriptiveStats::from_optional(values);
            Some(MetricSummary {
                metric: metric.to_owned(),
                count: stats.as_ref().map_or(0, |s| s.count),
                mean: stats.as_ref().map(|s| s.mean),
                median: stats.as_ref().map(|s| s.median),
                std: stats.as_ref().and_then(|s| s.std_dev),
            })
        })
        .collect();
    DescriptiveSummary { rows }
}

fn pct_change(delta: Option<f64>, base: Option<f64>) -> Option<f64> {
    let base = base.filter(|b| b.abs() > PCT_EPSILON)?;
    Some(100.0 * delta? / base)
}

fn mean_delta(old: Option<f64>, new: Option<f64>) -> Option<f64> {
    Some(new? - old?).filter(|d| d.is_finite())
}

/// Orders `Some` values descending and puts `None` after them.
fn desc_nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Joins two summaries on metric name and computes signed deltas.
///
/// Rows follow `old` order before sorting by improvement sign, then by
/// percentage change, both descending with undefined values last. The result
/// is empty when either summary is empty or they share no metric.
#[must_use]
pub fn compare_sessions(
    old: &DescriptiveSummary,
    new: &DescriptiveSummary,
    catalogue: &MetricCatalogue,
) -> ComparisonDelta {
    let mut rows = old
        .rows
        .iter()
        .filter_map(|o| {
            let n = new.get(&o.metric)?;
            let delta = mean_delta(o.mean, n.mean);
            let polarity = catalogue.polarity(&o.metric).sign();
            let improvement_sign = delta
                .filter(|_| polarity != 0)
                .map(|d| sign_of(d) * polarity);
            Some(MetricDelta {
                metric: o.metric.clone(),
                mean_old: o.mean,
                mean_new: n.mean,
                median_old: o.median,
                median_new: n.median,
                delta,
                pct_change: pct_change(delta, o.mean),
                improvement_sign,
            })
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| {
        desc_nulls_last(a.improvement_sign, b.improvement_sign)
            .then_with(|| desc_nulls_last(a.pct_change, b.pct_change))
    });
    ComparisonDelta { rows }
}

fn sign_of(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Mean-based KPI rows for the metrics of `kpi_metrics` found in both
/// summaries, in `old` order.
#[must_use]
pub fn compute_kpis<S>(
    old: &DescriptiveSummary,
    new: &DescriptiveSummary,
    kpi_metrics: &[S],
) -> Vec<KpiRow>
where
    S: AsRef<str>,
{
    old.rows
        .iter()
        .filter(|o| kpi_metrics.iter().any(|k| k.as_ref() == o.metric))
        .filter_map(|o| {
            let n = new.get(&o.metric)?;
            let delta = mean_delta(o.mean, n.mean);
            Some(KpiRow {
                metric: o.metric.clone(),
                old: o.mean,
                new: n.mean,
                delta,
                pct: pct_change(delta, o.mean),
            })
        })
        .collect()
}

/// [`compute_kpis`] keyed by metric name.
#[must_use]
pub fn kpi_series_for_metrics<S>(
    old: &DescriptiveSummary,
    new: &DescriptiveSummary,
    kpi_metrics: &[S],
) -> BTreeMap<String, KpiTile>
where
    S: AsRef<str>,
{
    compute_kpis(old, new, kpi_metrics)
        .into_iter()
        .map(|row| {
            let tile = KpiTile {
                old: row.old,
                new: row.new,
                delta: row.delta,
                pct: row.pct,
            };
            (row.metric, tile)
        })
        .collect()
}
