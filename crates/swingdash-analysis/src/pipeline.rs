//! End-to-end comparison of two sessions
//!
//! ```text
//! raw ─► preprocess ─► side ─► IQR ─► group ─┐
//!                                            ├─► balance ─► describe ─► compare / KPIs
//! raw ─► preprocess ─► side ─► IQR ─► group ─┘
//! ```
//!
//! Both sessions go through the same configuration in lockstep, and every
//! stage returns a new [`Dataset`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    analytics::{self, ComparisonDelta, DescriptiveSummary, KpiRow, KpiTile},
    balance,
    catalogue::{MetricCatalogue, columns},
    cleaning,
    config::{ConfigError, PipelineConfig},
    dataset::{Dataset, Value},
    filter, grouping, side,
};

/// Maximum number of shots in [`ShotTable`].
pub const SHOT_TABLE_LIMIT: usize = 1000;

/// Format of the `Date` column of the shot table.
pub const SHOT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const SHOT_TABLE_DESCRIPTORS: [&str; 7] = [
    columns::PLAYER,
    columns::CLUB_NAME,
    columns::CLUB_TYPE,
    columns::NOTE,
    columns::TAG,
    columns::SIDE,
    columns::GROUP,
];

const SHOT_TABLE_METRICS: [&str; 10] = [
    columns::CLUB_SPEED,
    columns::BALL_SPEED,
    columns::LAUNCH_ANGLE,
    columns::SPIN_RATE,
    columns::CARRY_DISTANCE,
    columns::TOTAL_DISTANCE,
    columns::CARRY_DEVIATION_DISTANCE,
    columns::TOTAL_DEVIATION_DISTANCE,
    columns::ABS_CARRY_DEV,
    columns::ABS_TOTAL_DEV,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionLabels {
    pub baseline: String,
    pub comparison: String,
}

impl Default for SessionLabels {
    fn default() -> Self {
        Self {
            baseline: "Baseline".to_owned(),
            comparison: "Comparison".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum Stage {
    Raw,
    Processed,
    Balanced,
}

/// Row counts of both sessions after one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: Stage,
    pub baseline: usize,
    pub comparison: usize,
}

/// Balanced shots of both sessions, baseline first.
///
/// `rows` holds at most [`SHOT_TABLE_LIMIT`] shots; `total_rows` is the
/// number before truncation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShotTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub total_rows: usize,
    pub truncated: bool,
}

impl ShotTable {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub labels: SessionLabels,
    pub stage_counts: Vec<StageCount>,
    /// No baseline shot survived processing.
    pub baseline_empty: bool,
    /// No comparison shot survived processing.
    pub comparison_empty: bool,
    pub baseline_summary: DescriptiveSummary,
    pub comparison_summary: DescriptiveSummary,
    pub comparison: ComparisonDelta,
    pub kpis: Vec<KpiRow>,
    pub kpi_tiles: BTreeMap<String, KpiTile>,
    pub shots: ShotTable,
}

/// Cleans one session and applies the per-session stages of `config`:
/// side classification, the IQR filter and grouping.
#[must_use]
pub fn process_session(
    raw: &Dataset,
    label: &str,
    config: &PipelineConfig,
    catalogue: &MetricCatalogue,
) -> Dataset {
    apply_session_stages(cleaning::preprocess(raw, label, catalogue), config, catalogue)
}

fn apply_session_stages(
    mut dataset: Dataset,
    config: &PipelineConfig,
    catalogue: &MetricCatalogue,
) -> Dataset {
    if config.classify_side {
        dataset = side::add_side_column(
            &dataset,
            &config.primary_deviation_col,
            config.dead_zone,
            config.handed,
            config.invert,
        );
    }
    if config.apply_iqr {
        let iqr_columns = if config.iqr_columns.is_empty() {
            catalogue.key_metric_names()
        } else {
            config.iqr_columns.clone()
        };
        dataset = filter::iqr_filter(&dataset, &iqr_columns, config.iqr_whisker);
    }
    if let Some(thresholds) = &config.grouping {
        dataset = grouping::add_group_column(&dataset, thresholds);
    }
    dataset
}

/// Runs the full comparison of `raw_old` (baseline) against `raw_new`.
pub fn run_comparison(
    raw_old: &Dataset,
    raw_new: &Dataset,
    labels: &SessionLabels,
    config: &PipelineConfig,
    catalogue: &MetricCatalogue,
) -> Result<ComparisonReport, ConfigError> {
    config.validate()?;

    let old_clean = cleaning::preprocess(raw_old, &labels.baseline, catalogue);
    let new_clean = cleaning::preprocess(raw_new, &labels.comparison, catalogue);
    let raw_counts = (old_clean.len(), new_clean.len());
    let old_processed = apply_session_stages(old_clean, config, catalogue);
    let new_processed = apply_session_stages(new_clean, config, catalogue);
    log::info!(
        "processed '{}': {} -> {} shots, '{}': {} -> {} shots",
        labels.baseline,
        raw_counts.0,
        old_processed.len(),
        labels.comparison,
        raw_counts.1,
        new_processed.len()
    );
    if old_processed.is_empty() {
        log::warn!("no shots left in '{}' after processing", labels.baseline);
    }
    if new_processed.is_empty() {
        log::warn!("no shots left in '{}' after processing", labels.comparison);
    }

    let (old_balanced, new_balanced) = balance::balance_samples(
        &old_processed,
        &new_processed,
        config.balance,
        &config.balance_mode,
        config.balance_seed,
        &config.stratify_columns,
    );

    let metrics = catalogue.key_metric_names();
    let baseline_summary = analytics::describe_session(&old_balanced, &metrics);
    let comparison_summary = analytics::describe_session(&new_balanced, &metrics);
    let comparison =
        analytics::compare_sessions(&baseline_summary, &comparison_summary, catalogue);
    let kpis =
        analytics::compute_kpis(&baseline_summary, &comparison_summary, &config.kpi_metrics);
    let kpi_tiles = analytics::kpi_series_for_metrics(
        &baseline_summary,
        &comparison_summary,
        &config.kpi_metrics,
    );

    let stage_counts = vec![
        StageCount {
            stage: Stage::Raw,
            baseline: raw_counts.0,
            comparison: raw_counts.1,
        },
        StageCount {
            stage: Stage::Processed,
            baseline: old_processed.len(),
            comparison: new_processed.len(),
        },
        StageCount {
            stage: Stage::Balanced,
            baseline: old_balanced.len(),
            comparison: new_balanced.len(),
        },
    ];

    Ok(ComparisonReport {
        labels: labels.clone(),
        stage_counts,
        baseline_empty: old_processed.is_empty(),
        comparison_empty: new_processed.is_empty(),
        baseline_summary,
        comparison_summary,
        comparison,
        kpis,
        kpi_tiles,
        shots: shot_table(&[&old_balanced, &new_balanced], SHOT_TABLE_LIMIT),
    })
}

/// Projects the rows of `sessions`, in order, onto the shot-table columns
/// any of them has. Cells of columns a session lacks are missing.
#[must_use]
pub fn shot_table(sessions: &[&Dataset], limit: usize) -> ShotTable {
    let has = |name: &str| sessions.iter().any(|d| d.has_column(name));
    let has_date = has(columns::DATE_PARSED);

    let mut sources = vec![columns::SESSION];
    if has_date {
        sources.push(columns::DATE_PARSED);
    }
    sources.extend(
        SHOT_TABLE_DESCRIPTORS
            .iter()
            .chain(&SHOT_TABLE_METRICS)
            .copied()
            .filter(|name| has(name)),
    );
    let header = sources
        .iter()
        .map(|&name| if name == columns::DATE_PARSED { columns::DATE } else { name })
        .map(str::to_owned)
        .collect();

    let total_rows = sessions.iter().map(|d| d.len()).sum::<usize>();
    let rows = sessions
        .iter()
        .flat_map(|&dataset| dataset.rows())
        .take(limit)
        .map(|row| {
            sources
                .iter()
                .map(|&name| {
                    let value = row.get(name).cloned().unwrap_or_default();
                    match value {
                        Value::Timestamp(ts) if name == columns::DATE_PARSED => {
                            Value::text(ts.format(SHOT_DATE_FORMAT))
                        }
                        value => value,
                    }
                })
                .collect()
        })
        .collect::<Vec<_>>();

    ShotTable {
        columns: header,
        truncated: rows.len() < total_rows,
        rows,
        total_rows,
    }
}
