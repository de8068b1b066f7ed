//! Coarse behavioural buckets per shot

use serde::{Deserialize, Serialize};

use crate::{
    catalogue::columns,
    dataset::{Dataset, Value},
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Group {
    Normal,
    #[serde(rename = "Short practice")]
    #[display("Short practice")]
    ShortPractice,
    #[serde(rename = "Long shank")]
    #[display("Long shank")]
    LongShank,
}

/// Cut-offs for [`assign_group`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupThresholds {
    pub club_speed_max: f64,
    pub spin_rate_max: f64,
    pub carry_distance_max: f64,
    /// Column compared against `deviation_min`; without one no shot is a shank.
    #[serde(default)]
    pub deviation_column: Option<String>,
    pub deviation_min: f64,
}

/// Buckets every row of `dataset`.
///
/// A shot is short practice when club speed, spin rate and carry distance are
/// all at or below their maxima, otherwise a long shank when the deviation is
/// at or above `deviation_min`, otherwise normal. Missing values or columns
/// never satisfy a comparison.
#[must_use]
pub fn assign_group(dataset: &Dataset, thresholds: &GroupThresholds) -> Vec<Group> {
    let at_most = |value: Option<f64>, max: f64| value.is_some_and(|v| v <= max);
    dataset
        .rows()
        .map(|row| {
            let short = at_most(row.number(columns::CLUB_SPEED), thresholds.club_speed_max)
                && at_most(row.number(columns::SPIN_RATE), thresholds.spin_rate_max)
                && at_most(
                    row.number(columns::CARRY_DISTANCE),
                    thresholds.carry_distance_max,
                );
            let shank = thresholds
                .deviation_column
                .as_deref()
                .and_then(|column| row.number(column))
                .is_some_and(|v| v >= thresholds.deviation_min);
            if short {
                Group::ShortPractice
            } else if shank {
                Group::LongShank
            } else {
                Group::Normal
            }
        })
        .collect()
}

/// Returns a copy of `dataset` with a `Group` column from [`assign_group`].
#[must_use]
pub fn add_group_column(dataset: &Dataset, thresholds: &GroupThresholds) -> Dataset {
    let groups = assign_group(dataset, thresholds)
        .into_iter()
        .map(|group| Value::text(group.to_string()))
        .collect();
    let mut dataset = dataset.clone();
    dataset.set_column(columns::GROUP, groups);
    dataset
}
