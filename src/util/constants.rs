//! Application-wide constants for healthflux.
//!
//! Names that appear on the wire (measurements, fields, tags) and the fixed
//! layout of the export bundle are kept here so the importer, the sinks and
//! the tests agree on them.

/// Application display name used in log output.
pub const APP_NAME: &str = "healthflux";

/// Application version string.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path of the XML document inside the Apple Health `export.zip`.
pub const EXPORT_XML_PATH: &str = "apple_health_export/Export.xml";

/// Prefix of the `type` attribute on quantity `<Record>` elements. The
/// remainder is the measurement name (e.g. `HeartRate`).
pub const QUANTITY_TYPE_PREFIX: &str = "HKQuantityTypeIdentifier";

/// Prefix of the `workoutActivityType` attribute on `<Workout>` elements.
pub const WORKOUT_TYPE_PREFIX: &str = "HKWorkoutActivityType";

/// Measurement name for workout points.
pub const WORKOUT_MEASUREMENT: &str = "Workout";

/// Measurement name for daily activity summary points.
pub const ACTIVITY_SUMMARY_MEASUREMENT: &str = "ActivitySummary";

/// Measurement holding one point per import run.
pub const IMPORT_MEASUREMENT: &str = "Import";

/// String field of the `Import` measurement that carries the watermark.
pub const WATERMARK_FIELD: &str = "latest_imported_timestamp";

/// Tag of the `Import` measurement naming the archive the run read.
pub const IMPORT_FILE_TAG: &str = "file";

/// Watermark assumed when no previous import exists.
pub const EPOCH_WATERMARK: &str = "1970-01-01";

/// Default InfluxDB host.
pub const DEFAULT_INFLUX_HOST: &str = "localhost";

/// Default InfluxDB HTTP port.
pub const DEFAULT_INFLUX_PORT: u16 = 8086;

/// Default InfluxDB database name.
pub const DEFAULT_DATABASE: &str = "healthdata";

/// Maximum number of characters of an error response body kept in
/// [`crate::util::error::HealthFluxError::Influx`].
pub const MAX_ERROR_BODY_CHARS: usize = 256;
