//! Unified error types for healthflux.
//!
//! All fallible operations return `Result<T, HealthFluxError>`. Nothing is
//! recovered per record: an error aborts the run and is reported by `main`.

/// Unified error type used throughout healthflux.
#[derive(Debug, thiserror::Error)]
pub enum HealthFluxError {
    /// The export archive could not be opened or the XML member is missing.
    #[error("Archive error: {0}")]
    Archive(String),

    /// `Export.xml` is not well-formed XML.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A record element lacks an attribute its category requires.
    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute {
        /// Element name, e.g. `Record`.
        element: String,
        /// Attribute name, e.g. `startDate`.
        attribute: String,
    },

    /// A numeric attribute could not be parsed as a float.
    #[error("<{element}> attribute '{attribute}' is not a number: {value:?}")]
    InvalidNumber {
        element: String,
        attribute: String,
        value: String,
    },

    /// A start-date could not be interpreted as a point in time.
    #[error("Unrecognised timestamp: {0:?}")]
    InvalidTimestamp(String),

    /// A point cannot be expressed in line protocol (no fields, NaN, ...).
    #[error("Cannot encode point: {0}")]
    Encode(String),

    /// Transport-level failure talking to InfluxDB.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// InfluxDB answered with a non-success status or a statement error.
    #[error("InfluxDB returned {status}: {body}")]
    Influx {
        /// HTTP status code (200 for statement-level errors).
        status: u16,
        /// Truncated response body or statement error message.
        body: String,
    },

    /// Catch-all for I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HealthFluxError>;

/// Build a [`HealthFluxError::MissingAttribute`] for `element`/`attribute`.
pub fn missing_attribute(element: &str, attribute: &str) -> HealthFluxError {
    HealthFluxError::MissingAttribute {
        element: element.to_string(),
        attribute: attribute.to_string(),
    }
}
