//! InfluxDB line-protocol encoding.
//!
//! `measurement[,tag=value...] field=value[,field=value...] timestamp`
//! with the timestamp in whole seconds (writes use `precision=s`).

use crate::core::point::{FieldValue, NormalizedPoint};
use crate::util::error::{HealthFluxError, Result};
use crate::util::time::parse_export_timestamp;

/// Encode one point as a single line (no trailing newline).
///
/// # Errors
/// Returns [`HealthFluxError::InvalidTimestamp`] if the point time cannot
/// be parsed, or [`HealthFluxError::Encode`] if the point has no fields or
/// carries a non-finite float.
pub fn encode_point(point: &NormalizedPoint) -> Result<String> {
    if point.fields.is_empty() {
        return Err(HealthFluxError::Encode(format!(
            "point '{}' has no fields",
            point.measurement
        )));
    }
    let ts = parse_export_timestamp(&point.time)
        .ok_or_else(|| HealthFluxError::InvalidTimestamp(point.time.clone()))?;

    let mut line = escape(&point.measurement, &[',', ' ']);
    for (key, value) in &point.tags {
        // Empty tag values are rejected by InfluxDB; omit the tag instead.
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape(key, &[',', '=', ' ']));
        line.push('=');
        line.push_str(&escape(value, &[',', '=', ' ']));
    }

    let mut fields = Vec::with_capacity(point.fields.len());
    for (key, value) in &point.fields {
        let encoded = match value {
            FieldValue::Float(v) if v.is_finite() => v.to_string(),
            FieldValue::Float(v) => {
                return Err(HealthFluxError::Encode(format!(
                    "field '{key}' of '{}' is not finite: {v}",
                    point.measurement
                )))
            }
            FieldValue::Str(s) => format!("\"{}\"", escape(s, &['"', '\\'])),
        };
        fields.push(format!("{}={encoded}", escape(key, &[',', '=', ' '])));
    }

    line.push(' ');
    line.push_str(&fields.join(","));
    line.push(' ');
    line.push_str(&ts.timestamp().to_string());
    Ok(line)
}

fn escape(s: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if special.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_quantity_point() {
        let point = NormalizedPoint::new("HeartRate", "2021-01-02 10:00:00 +0100")
            .field("value", 62.0)
            .tag("sourceName", "Jane's Apple Watch");
        assert_eq!(
            encode_point(&point).unwrap(),
            "HeartRate,sourceName=Jane's\\ Apple\\ Watch value=62 1609578000"
        );
    }

    #[test]
    fn test_encode_string_field_is_quoted() {
        let point = NormalizedPoint::new("Import", "2021-01-02 00:00:00 +0000")
            .field("latest_imported_timestamp", "2021-01-01 \"late\"")
            .tag("file", "export,old.zip");
        assert_eq!(
            encode_point(&point).unwrap(),
            "Import,file=export\\,old.zip latest_imported_timestamp=\"2021-01-01 \\\"late\\\"\" 1609545600"
        );
    }

    #[test]
    fn test_encode_date_only_time() {
        let point = NormalizedPoint::new("ActivitySummary", "2021-01-02")
            .field("appleStandHours", 10.0)
            .field("activeEnergyBurned", 410.5);
        assert_eq!(
            encode_point(&point).unwrap(),
            "ActivitySummary activeEnergyBurned=410.5,appleStandHours=10 1609545600"
        );
    }

    #[test]
    fn test_encode_rejects_nan_and_empty_fields() {
        let nan = NormalizedPoint::new("HeartRate", "2021-01-02").field("value", f64::NAN);
        assert!(matches!(encode_point(&nan), Err(HealthFluxError::Encode(_))));

        let empty = NormalizedPoint::new("HeartRate", "2021-01-02");
        assert!(matches!(encode_point(&empty), Err(HealthFluxError::Encode(_))));
    }

    #[test]
    fn test_encode_rejects_bad_time() {
        let point = NormalizedPoint::new("HeartRate", "last tuesday").field("value", 1.0);
        assert!(matches!(
            encode_point(&point),
            Err(HealthFluxError::InvalidTimestamp(_))
        ));
    }
}
