//! Pipeline configuration
//!
//! Every field has a default, so a partial JSON document such as
//! `{"balance": true, "balance_mode": "Stratified"}` is a complete config.

use serde::{Deserialize, Serialize};

use crate::{
    balance::{BalanceMode, DEFAULT_STRATIFY_COLUMNS},
    catalogue::columns,
    grouping::GroupThresholds,
    side::Handedness,
};

/// Metrics shown as headline KPIs when none are configured.
pub const DEFAULT_KPI_METRICS: [&str; 5] = [
    columns::CLUB_SPEED,
    columns::BALL_SPEED,
    columns::CARRY_DISTANCE,
    columns::TOTAL_DISTANCE,
    columns::CARRY_DEVIATION_DISTANCE,
];

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("IQR whisker must be a positive finite number, got {value}")]
    InvalidWhisker { value: f64 },
    #[display("dead zone must be a non-negative finite number of degrees, got {value}")]
    InvalidDeadZone { value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub apply_iqr: bool,
    pub iqr_whisker: f64,
    /// Columns checked by the IQR filter; empty means the key metrics.
    pub iqr_columns: Vec<String>,
    pub balance: bool,
    pub balance_mode: BalanceMode,
    pub balance_seed: u64,
    pub stratify_columns: Vec<String>,
    pub classify_side: bool,
    pub primary_deviation_col: String,
    pub dead_zone: f64,
    pub handed: Handedness,
    pub invert: bool,
    pub kpi_metrics: Vec<String>,
    /// Adds a `Group` column when set.
    pub grouping: Option<GroupThresholds>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            apply_iqr: true,
            iqr_whisker: 3.0,
            iqr_columns: vec![],
            balance: false,
            balance_mode: BalanceMode::Simple,
            balance_seed: 42,
            stratify_columns: DEFAULT_STRATIFY_COLUMNS.map(str::to_owned).to_vec(),
            classify_side: true,
            primary_deviation_col: columns::CARRY_DEVIATION_ANGLE.to_owned(),
            dead_zone: 2.0,
            handed: Handedness::RightHanded,
            invert: false,
            kpi_metrics: DEFAULT_KPI_METRICS.map(str::to_owned).to_vec(),
            grouping: None,
        }
    }
}

impl PipelineConfig {
    /// Rejects numeric settings no stage can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.iqr_whisker.is_finite() && self.iqr_whisker > 0.0) {
            return Err(ConfigError::InvalidWhisker {
                value: self.iqr_whisker,
            });
        }
        if !(self.dead_zone.is_finite() && self.dead_zone >= 0.0) {
            return Err(ConfigError::InvalidDeadZone {
                value: self.dead_zone,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert!(config.apply_iqr);
        assert!(!config.balance);
        assert_eq!(config.balance_seed, 42);
        assert_eq!(config.stratify_columns, vec!["Club Type", "Side"]);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        for whisker in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = PipelineConfig {
                iqr_whisker: whisker,
                ..PipelineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidWhisker { .. })
            ));
        }
        for dead_zone in [-0.5, f64::NAN] {
            let config = PipelineConfig {
                dead_zone,
                ..PipelineConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidDeadZone { .. })
            ));
        }
        let config = PipelineConfig {
            dead_zone: 0.0,
            ..PipelineConfig::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json() {
        let config: PipelineConfig = serde_json::from_str(
            r#"{
                "balance": true,
                "balance_mode": "Stratified: Club Type + Side",
                "handed": "Left-handed",
                "grouping": {
                    "club_speed_max": 60.0,
                    "spin_rate_max": 3000.0,
                    "carry_distance_max": 50.0,
                    "deviation_min": 25.0
                }
            }"#,
        )
        .unwrap();
        assert!(config.balance);
        assert_eq!(config.balance_mode, BalanceMode::Stratified);
        assert_eq!(config.handed, Handedness::LeftHanded);
        assert_eq!(config.iqr_whisker, 3.0);
        assert_eq!(config.grouping.unwrap().deviation_column, None);
    }
}
