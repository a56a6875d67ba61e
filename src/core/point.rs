//! Normalized time-series point, independent of the destination store.

use std::collections::BTreeMap;

use crate::core::watermark::Watermark;
use crate::util::constants::{IMPORT_FILE_TAG, IMPORT_MEASUREMENT, WATERMARK_FIELD};

/// A single field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Str(String),
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

/// `{measurement, time, fields, tags}` as handed to a
/// [`PointSink`](crate::sink::PointSink).
///
/// `time` is kept verbatim from the export so it is byte-for-byte the
/// record's start-date; sinks that need an instant parse it on write.
/// Fields and tags are ordered maps so encodings are deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoint {
    pub measurement: String,
    pub time: String,
    pub fields: BTreeMap<String, FieldValue>,
    pub tags: BTreeMap<String, String>,
}

impl NormalizedPoint {
    pub fn new(measurement: &str, time: &str) -> Self {
        Self {
            measurement: measurement.to_string(),
            time: time.to_string(),
            fields: BTreeMap::new(),
            tags: BTreeMap::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    /// The per-run `Import` point recording the new watermark.
    ///
    /// `archive_name` is the export's file name; `now` is the run's
    /// wall-clock time in export format.
    pub fn watermark(watermark: &Watermark, archive_name: &str, now: &str) -> Self {
        Self::new(IMPORT_MEASUREMENT, now)
            .field(WATERMARK_FIELD, watermark.as_str())
            .tag(IMPORT_FILE_TAG, archive_name)
    }

    /// Watermark carried by an `Import` point, if this is one.
    pub fn watermark_value(&self) -> Option<Watermark> {
        if self.measurement != IMPORT_MEASUREMENT {
            return None;
        }
        match self.fields.get(WATERMARK_FIELD) {
            Some(FieldValue::Str(s)) => Some(Watermark::new(s)),
            _ => None,
        }
    }
}
