//! XML parser for the Apple Health `Export.xml` document.
//!
//! Uses `roxmltree` to build a read-only tree of the whole document, then
//! turns individual elements into typed [`HealthRecord`]s. Parsing an
//! element is split in two so that records already covered by the
//! watermark are never inspected beyond their type and start-date:
//!
//! 1. [`classify`] resolves category, semantic type and start-date.
//! 2. [`extract_record`] reads the kind-specific attributes.

use crate::core::health_record::{
    ActivitySummary, HealthRecord, QuantitySample, RecordCategory, Workout,
};
use crate::util::error::{missing_attribute, HealthFluxError, Result};

/// Category, type name and start-date of a candidate record element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader<'a> {
    pub category: RecordCategory,
    /// Semantic type name (prefix stripped), e.g. `StepCount`.
    pub type_name: &'a str,
    pub start_date: &'a str,
}

/// Parse the full export document.
///
/// The export starts with an internal DTD subset
/// (`<!DOCTYPE HealthData [ <!ELEMENT ...> ]>`), so DTD parsing is enabled.
///
/// # Errors
/// Returns [`HealthFluxError::XmlParse`] if the document is malformed.
pub fn parse_document(xml: &str) -> Result<roxmltree::Document<'_>> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(xml, options)
        .map_err(|e| HealthFluxError::XmlParse(format!("Failed to parse XML: {e}")))
}

/// Decide whether `node` is an importable record.
///
/// Returns `Ok(None)` for non-record elements and for records whose type
/// identifier lacks the expected prefix.
///
/// # Errors
/// Returns [`HealthFluxError::MissingAttribute`] if a record element lacks
/// its type or start-date attribute.
pub fn classify<'a, 'input: 'a>(
    node: roxmltree::Node<'a, 'input>,
) -> Result<Option<RecordHeader<'a>>> {
    if !node.is_element() {
        return Ok(None);
    }
    let Some(category) = RecordCategory::from_element(node.tag_name().name()) else {
        return Ok(None);
    };

    let type_identifier = match category.type_attribute() {
        Some(attr) => Some(required_attr(node, attr)?),
        None => None,
    };
    let Some(type_name) = category.semantic_type(type_identifier) else {
        return Ok(None);
    };

    let start_date = required_attr(node, category.start_attribute())?;
    Ok(Some(RecordHeader {
        category,
        type_name,
        start_date,
    }))
}

/// Read the kind-specific attributes of a classified element.
///
/// # Errors
/// Returns [`HealthFluxError::MissingAttribute`] or
/// [`HealthFluxError::InvalidNumber`] on the first bad attribute.
pub fn extract_record(node: roxmltree::Node, header: &RecordHeader) -> Result<HealthRecord> {
    let record = match header.category {
        RecordCategory::Quantity => HealthRecord::Quantity(QuantitySample {
            type_name: header.type_name.to_string(),
            source_name: required_attr(node, "sourceName")?.to_string(),
            start_date: header.start_date.to_string(),
            value: required_f64(node, "value")?,
        }),
        RecordCategory::Workout => HealthRecord::Workout(Workout {
            activity_type: header.type_name.to_string(),
            source_name: required_attr(node, "sourceName")?.to_string(),
            start_date: header.start_date.to_string(),
            duration: required_f64(node, "duration")?,
            total_distance: required_f64(node, "totalDistance")?,
            total_energy_burned: required_f64(node, "totalEnergyBurned")?,
        }),
        RecordCategory::ActivitySummary => HealthRecord::ActivitySummary(ActivitySummary {
            date: header.start_date.to_string(),
            active_energy_burned: required_f64(node, "activeEnergyBurned")?,
            active_energy_burned_goal: required_f64(node, "activeEnergyBurnedGoal")?,
            apple_move_time: required_f64(node, "appleMoveTime")?,
            apple_move_time_goal: required_f64(node, "appleMoveTimeGoal")?,
            apple_exercise_time: required_f64(node, "appleExerciseTime")?,
            apple_exercise_time_goal: required_f64(node, "appleExerciseTimeGoal")?,
            apple_stand_hours: required_f64(node, "appleStandHours")?,
            apple_stand_hours_goal: required_f64(node, "appleStandHoursGoal")?,
        }),
    };
    Ok(record)
}

fn required_attr<'a>(node: roxmltree::Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| missing_attribute(node.tag_name().name(), name))
}

fn required_f64(node: roxmltree::Node, name: &str) -> Result<f64> {
    let raw = required_attr(node, name)?;
    raw.trim()
        .parse()
        .map_err(|_| HealthFluxError::InvalidNumber {
            element: node.tag_name().name().to_string(),
            attribute: name.to_string(),
            value: raw.to_string(),
        })
}
