//! Typed records extracted from `Export.xml`.
//!
//! Each qualifying element is turned into one [`HealthRecord`] variant. The
//! variant carries exactly the attributes its normalized point needs; all
//! other attributes of the element are ignored.

use crate::core::point::NormalizedPoint;
use crate::util::constants::{
    ACTIVITY_SUMMARY_MEASUREMENT, QUANTITY_TYPE_PREFIX, WORKOUT_MEASUREMENT, WORKOUT_TYPE_PREFIX,
};

/// The three element kinds the importer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordCategory {
    /// `<Record type="HKQuantityTypeIdentifier...">`
    Quantity,
    /// `<Workout workoutActivityType="HKWorkoutActivityType...">`
    Workout,
    /// `<ActivitySummary dateComponents="...">`
    ActivitySummary,
}

impl RecordCategory {
    /// Map an element name to its category. Anything else (`Me`,
    /// `MetadataEntry`, `Correlation`, ...) is not imported.
    pub fn from_element(name: &str) -> Option<Self> {
        match name {
            "Record" => Some(Self::Quantity),
            "Workout" => Some(Self::Workout),
            "ActivitySummary" => Some(Self::ActivitySummary),
            _ => None,
        }
    }

    /// Attribute holding the type identifier, if the category has one.
    pub fn type_attribute(self) -> Option<&'static str> {
        match self {
            Self::Quantity => Some("type"),
            Self::Workout => Some("workoutActivityType"),
            Self::ActivitySummary => None,
        }
    }

    /// Attribute holding the start-date compared against the watermark.
    pub fn start_attribute(self) -> &'static str {
        match self {
            Self::Quantity | Self::Workout => "startDate",
            Self::ActivitySummary => "dateComponents",
        }
    }

    /// Resolve the semantic type name for this category.
    ///
    /// Returns `None` when the identifier lacks the category's prefix (e.g.
    /// `HKCategoryTypeIdentifierSleepAnalysis` on a `<Record>`); such
    /// elements are skipped.
    pub fn semantic_type<'a>(self, type_identifier: Option<&'a str>) -> Option<&'a str> {
        match self {
            Self::Quantity => type_identifier?.strip_prefix(QUANTITY_TYPE_PREFIX),
            Self::Workout => type_identifier?.strip_prefix(WORKOUT_TYPE_PREFIX),
            Self::ActivitySummary => Some(ACTIVITY_SUMMARY_MEASUREMENT),
        }
    }
}

/// A single scalar sample such as a heart-rate reading.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantitySample {
    /// Type name with the `HKQuantityTypeIdentifier` prefix removed.
    pub type_name: String,
    pub source_name: String,
    pub start_date: String,
    pub value: f64,
}

/// A recorded workout session.
#[derive(Debug, Clone, PartialEq)]
pub struct Workout {
    /// Activity type with the `HKWorkoutActivityType` prefix removed.
    pub activity_type: String,
    pub source_name: String,
    pub start_date: String,
    pub duration: f64,
    pub total_distance: f64,
    pub total_energy_burned: f64,
}

/// Daily rollup of the three activity rings.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySummary {
    /// The `dateComponents` attribute, `YYYY-MM-DD`.
    pub date: String,
    pub active_energy_burned: f64,
    pub active_energy_burned_goal: f64,
    pub apple_move_time: f64,
    pub apple_move_time_goal: f64,
    pub apple_exercise_time: f64,
    pub apple_exercise_time_goal: f64,
    pub apple_stand_hours: f64,
    pub apple_stand_hours_goal: f64,
}

/// One importable element of the export.
#[derive(Debug, Clone, PartialEq)]
pub enum HealthRecord {
    Quantity(QuantitySample),
    Workout(Workout),
    ActivitySummary(ActivitySummary),
}

impl HealthRecord {
    /// The timestamp compared against the watermark and used as point time.
    pub fn start_date(&self) -> &str {
        match self {
            Self::Quantity(q) => &q.start_date,
            Self::Workout(w) => &w.start_date,
            Self::ActivitySummary(a) => &a.date,
        }
    }

    /// Name reported in the "record types seen" statistics.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Quantity(q) => &q.type_name,
            Self::Workout(w) => &w.activity_type,
            Self::ActivitySummary(_) => ACTIVITY_SUMMARY_MEASUREMENT,
        }
    }

    /// Normalize into the point written to the time-series store.
    pub fn to_point(&self) -> NormalizedPoint {
        match self {
            Self::Quantity(q) => NormalizedPoint::new(&q.type_name, &q.start_date)
                .field("value", q.value)
                .tag("sourceName", &q.source_name),
            Self::Workout(w) => NormalizedPoint::new(WORKOUT_MEASUREMENT, &w.start_date)
                .field("duration", w.duration)
                .field("totalDistance", w.total_distance)
                .field("totalEnergyBurned", w.total_energy_burned)
                .tag("sourceName", &w.source_name)
                .tag("workoutActivityType", &w.activity_type),
            Self::ActivitySummary(a) => {
                NormalizedPoint::new(ACTIVITY_SUMMARY_MEASUREMENT, &a.date)
                    .field("activeEnergyBurned", a.active_energy_burned)
                    .field("activeEnergyBurnedGoal", a.active_energy_burned_goal)
                    .field("appleMoveTime", a.apple_move_time)
                    .field("appleMoveTimeGoal", a.apple_move_time_goal)
                    .field("appleExerciseTime", a.apple_exercise_time)
                    .field("appleExerciseTimeGoal", a.apple_exercise_time_goal)
                    .field("appleStandHours", a.apple_stand_hours)
                    .field("appleStandHoursGoal", a.apple_stand_hours_goal)
            }
        }
    }
}
