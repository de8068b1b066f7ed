//! Left / Straight / Right classification from a deviation angle

use serde::{Deserialize, Serialize};

use crate::{
    catalogue::columns,
    dataset::{Dataset, Value},
};

/// Direction a shot finished relative to the target line.
///
/// The ordering `Left < Straight < Right` is for stable display only.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Side {
    Left,
    Straight,
    Right,
}

impl Side {
    #[must_use]
    fn mirrored(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Straight => Self::Straight,
            Self::Right => Self::Left,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Handedness {
    #[default]
    #[serde(rename = "Right-handed")]
    #[display("Right-handed")]
    RightHanded,
    #[serde(rename = "Left-handed")]
    #[display("Left-handed")]
    LeftHanded,
}

/// Classifies every row by the sign of `primary_column`.
///
/// `|value| <= dead_zone` is straight, positive is right and negative is left;
/// `invert` flips the sign first and left-handed players have left and right
/// swapped afterwards. Missing or non-numeric values, or a missing column,
/// classify as `None`.
#[must_use]
pub fn classify_side(
    dataset: &Dataset,
    primary_column: &str,
    dead_zone: f64,
    handedness: Handedness,
    invert: bool,
) -> Vec<Option<Side>> {
    let Some(values) = dataset.numeric(primary_column) else {
        log::warn!("deviation column '{primary_column}' not found; side left unclassified");
        return vec![None; dataset.len()];
    };
    values
        .into_iter()
        .map(|value| {
            let value = if invert { -value? } else { value? };
            let side = if value.abs() <= dead_zone {
                Side::Straight
            } else if value > 0.0 {
                Side::Right
            } else {
                Side::Left
            };
            Some(match handedness {
                Handedness::RightHanded => side,
                Handedness::LeftHanded => side.mirrored(),
            })
        })
        .collect()
}

/// Returns a copy of `dataset` with a `Side` column from [`classify_side`].
#[must_use]
pub fn add_side_column(
    dataset: &Dataset,
    primary_column: &str,
    dead_zone: f64,
    handedness: Handedness,
    invert: bool,
) -> Dataset {
    let sides = classify_side(dataset, primary_column, dead_zone, handedness, invert)
        .into_iter()
        .map(|side| side.map_or(Value::Missing, |s| Value::text(s.to_string())))
        .collect();
    let mut dataset = dataset.clone();
    dataset.set_column(columns::SIDE, sides);
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angles(values: &[Option<f64>]) -> Dataset {
        Dataset::from_columns([(
            columns::CARRY_DEVIATION_ANGLE,
            values.iter().map(|v| Value::from(*v)).collect(),
        )])
        .unwrap()
    }

    fn classify(angle: f64, dead_zone: f64, handedness: Handedness) -> Option<Side> {
        classify_side(
            &angles(&[Some(angle)]),
            columns::CARRY_DEVIATION_ANGLE,
            dead_zone,
            handedness,
            false,
        )[0]
    }

    #[test]
    fn test_dead_zone_is_straight() {
        assert_eq!(classify(1.5, 2.0, Handedness::RightHanded), Some(Side::Straight));
        assert_eq!(classify(-2.0, 2.0, Handedness::RightHanded), Some(Side::Straight));
    }

    #[test]
    fn test_outside_dead_zone() {
        assert_eq!(classify(1.5, 1.0, Handedness::RightHanded), Some(Side::Right));
        assert_eq!(classify(-1.5, 1.0, Handedness::RightHanded), Some(Side::Left));
    }

    #[test]
    fn test_left_handed_swaps_sides() {
        assert_eq!(classify(5.0, 2.0, Handedness::LeftHanded), Some(Side::Left));
        assert_eq!(classify(-5.0, 2.0, Handedness::LeftHanded), Some(Side::Right));
        assert_eq!(classify(0.5, 2.0, Handedness::LeftHanded), Some(Side::Straight));
    }

    #[test]
    fn test_invert_negates_before_classifying() {
        let dataset = angles(&[Some(5.0), Some(-5.0)]);
        let sides = classify_side(
            &dataset,
            columns::CARRY_DEVIATION_ANGLE,
            2.0,
            Handedness::RightHanded,
            true,
        );
        assert_eq!(sides, vec![Some(Side::Left), Some(Side::Right)]);
    }

    #[test]
    fn test_missing_input_stays_missing() {
        let dataset = angles(&[None, Some(3.0)]);
        let sides = classify_side(
            &dataset,
            columns::CARRY_DEVIATION_ANGLE,
            2.0,
            Handedness::RightHanded,
            false,
        );
        assert_eq!(sides, vec![None, Some(Side::Right)]);

        let sides = classify_side(
            &dataset,
            columns::TOTAL_DEVIATION_ANGLE,
            2.0,
            Handedness::RightHanded,
            false,
        );
        assert_eq!(sides, vec![None, None]);
    }

    #[test]
    fn test_side_column_labels() {
        let dataset = add_side_column(
            &angles(&[Some(-4.0), Some(0.0), None]),
            columns::CARRY_DEVIATION_ANGLE,
            1.0,
            Handedness::RightHanded,
            false,
        );
        assert_eq!(
            dataset.column(columns::SIDE).unwrap(),
            &[Value::text("Left"), Value::text("Straight"), Value::Missing]
        );
    }

    #[test]
    fn test_display_order() {
        let mut sides = vec![Side::Right, Side::Left, Side::Straight];
        sides.sort();
        assert_eq!(sides, [Side::Left, Side::Straight, Side::Right]);
        assert_eq!(Handedness::LeftHanded.to_string(), "Left-handed");
    }
}
