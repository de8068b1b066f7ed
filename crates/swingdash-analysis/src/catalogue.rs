//! Metric catalogue for launch-monitor exports
//!
//! The catalogue is plain data: which columns are numeric candidates (and
//! thereby checked for a units header row), which metrics are tracked for
//! comparison and in which direction they improve, and the unit tokens that
//! are stripped from text cells during coercion.
//!
//! A catalogue is built once (usually [`MetricCatalogue::default`]) and passed
//! by reference into every stage that needs it.

use serde::{Deserialize, Serialize};

/// Column names used by the pipeline.
pub mod columns {
    pub const CLUB_SPEED: &str = "Club Speed";
    pub const BALL_SPEED: &str = "Ball Speed";
    pub const SMASH_FACTOR: &str = "Smash Factor";
    pub const LAUNCH_ANGLE: &str = "Launch Angle";
    pub const LAUNCH_DIRECTION: &str = "Launch Direction";
    pub const ATTACK_ANGLE: &str = "Attack Angle";
    pub const CLUB_PATH: &str = "Club Path";
    pub const CLUB_FACE: &str = "Club Face";
    pub const FACE_TO_PATH: &str = "Face to Path";
    pub const BACKSPIN: &str = "Backspin";
    pub const SIDESPIN: &str = "Sidespin";
    pub const SPIN_RATE: &str = "Spin Rate";
    pub const SPIN_RATE_TYPE: &str = "Spin Rate Type";
    pub const SPIN_AXIS: &str = "Spin Axis";
    pub const APEX_HEIGHT: &str = "Apex Height";
    pub const CARRY_DISTANCE: &str = "Carry Distance";
    pub const CARRY_DEVIATION_ANGLE: &str = "Carry Deviation Angle";
    pub const CARRY_DEVIATION_DISTANCE: &str = "Carry Deviation Distance";
    pub const TOTAL_DISTANCE: &str = "Total Distance";
    pub const TOTAL_DEVIATION_ANGLE: &str = "Total Deviation Angle";
    pub const TOTAL_DEVIATION_DISTANCE: &str = "Total Deviation Distance";
    pub const AIR_DENSITY: &str = "Air Density";
    pub const TEMPERATURE: &str = "Temperature";
    pub const AIR_PRESSURE: &str = "Air Pressure";
    pub const RELATIVE_HUMIDITY: &str = "Relative Humidity";

    pub const ABS_CARRY_DEV: &str = "|Carry Dev|";
    pub const ABS_TOTAL_DEV: &str = "|Total Dev|";

    pub const DATE: &str = "Date";
    pub const DATE_PARSED: &str = "Date_parsed";
    pub const SESSION: &str = "Session";
    pub const SIDE: &str = "Side";
    pub const GROUP: &str = "Group";
    pub const CLUB_TYPE: &str = "Club Type";
    pub const CLUB_NAME: &str = "Club Name";
    pub const PLAYER: &str = "Player";
    pub const NOTE: &str = "Note";
    pub const TAG: &str = "Tag";
}

/// Direction in which a metric improves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Larger values are better (`+1`).
    HigherIsBetter,
    /// Smaller values are better (`-1`).
    LowerIsBetter,
    /// No preferred direction (`0`).
    Neutral,
}

impl Polarity {
    /// Numeric form of the polarity: `+1`, `-1` or `0`.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Self::HigherIsBetter => 1,
            Self::LowerIsBetter => -1,
            Self::Neutral => 0,
        }
    }
}

/// A metric tracked for session comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetric {
    pub name: String,
    pub polarity: Polarity,
}

impl KeyMetric {
    fn new(name: &str, polarity: Polarity) -> Self {
        Self {
            name: name.to_owned(),
            polarity,
        }
    }
}

/// Static description of the metrics found in launch-monitor exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCatalogue {
    /// Columns coerced to numbers during cleaning and inspected for a
    /// `[unit]` header row.
    pub numeric_candidates: Vec<String>,
    /// Metrics summarised and compared, in display order.
    pub key_metrics: Vec<KeyMetric>,
    /// Unit tokens removed from text cells before parsing.
    pub unit_tokens: Vec<String>,
}

impl Default for MetricCatalogue {
    #[allow(clippy::wildcard_imports)]
    fn default() -> Self {
        use columns::*;
        use Polarity::{HigherIsBetter, LowerIsBetter, Neutral};

        let numeric_candidates = [
            CLUB_SPEED,
            ATTACK_ANGLE,
            CLUB_PATH,
            CLUB_FACE,
            FACE_TO_PATH,
            BALL_SPEED,
            SMASH_FACTOR,
            LAUNCH_ANGLE,
            LAUNCH_DIRECTION,
            BACKSPIN,
            SIDESPIN,
            SPIN_RATE,
            SPIN_RATE_TYPE,
            SPIN_AXIS,
            APEX_HEIGHT,
            CARRY_DISTANCE,
            CARRY_DEVIATION_ANGLE,
            CARRY_DEVIATION_DISTANCE,
            TOTAL_DISTANCE,
            TOTAL_DEVIATION_ANGLE,
            TOTAL_DEVIATION_DISTANCE,
            AIR_DENSITY,
            TEMPERATURE,
            AIR_PRESSURE,
            RELATIVE_HUMIDITY,
        ];
        let key_metrics = vec![
            KeyMetric::new(CLUB_SPEED, HigherIsBetter),
            KeyMetric::new(BALL_SPEED, HigherIsBetter),
            KeyMetric::new(SMASH_FACTOR, HigherIsBetter),
            KeyMetric::new(LAUNCH_ANGLE, Neutral),
            KeyMetric::new(SPIN_RATE, Neutral),
            KeyMetric::new(APEX_HEIGHT, Neutral),
            KeyMetric::new(CARRY_DISTANCE, HigherIsBetter),
            KeyMetric::new(TOTAL_DISTANCE, HigherIsBetter),
            KeyMetric::new(CARRY_DEVIATION_DISTANCE, LowerIsBetter),
            KeyMetric::new(TOTAL_DEVIATION_DISTANCE, LowerIsBetter),
            KeyMetric::new(ATTACK_ANGLE, Neutral),
            KeyMetric::new(CLUB_PATH, Neutral),
            KeyMetric::new(CLUB_FACE, Neutral),
            KeyMetric::new(FACE_TO_PATH, Neutral),
            KeyMetric::new(SPIN_AXIS, Neutral),
        ];
        let unit_tokens = [
            "mph", "km/h", "kph", "m/s", "rpm", "°", "degrees", "degree", "deg", "yards",
            "yard", "yds", "yd", "m", "cm", "kPa", "Pa", "bar", "psi", "%", ",",
        ];

        Self {
            numeric_candidates: numeric_candidates.map(str::to_owned).to_vec(),
            key_metrics,
            unit_tokens: unit_tokens.map(str::to_owned).to_vec(),
        }
    }
}

impl MetricCatalogue {
    /// Polarity of `metric`; metrics outside the key list are neutral.
    #[must_use]
    pub fn polarity(&self, metric: &str) -> Polarity {
        self.key_metrics
            .iter()
            .find(|m| m.name == metric)
            .map_or(Polarity::Neutral, |m| m.polarity)
    }

    /// Names of the key metrics, in display order.
    #[must_use]
    pub fn key_metric_names(&self) -> Vec<String> {
        self.key_metrics.iter().map(|m| m.name.clone()).collect()
    }

    #[must_use]
    pub fn is_numeric_candidate(&self, column: &str) -> bool {
        self.numeric_candidates.iter().any(|c| c == column)
    }
}
