//! InfluxDB 1.x sink over the HTTP API.
//!
//! Uses a blocking `reqwest` client: the importer is a single sequential
//! pass, one request per point.

use serde::Deserialize;

use crate::core::point::NormalizedPoint;
use crate::core::watermark::Watermark;
use crate::sink::line_protocol::encode_point;
use crate::sink::PointSink;
use crate::util::constants::{IMPORT_MEASUREMENT, MAX_ERROR_BODY_CHARS, WATERMARK_FIELD};
use crate::util::error::{HealthFluxError, Result};

/// Connection parameters for one InfluxDB database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InfluxConfig {
    /// e.g. `http://localhost:8086`, without a trailing slash.
    pub base_url: String,
    pub database: String,
}

impl InfluxConfig {
    /// Build from a host name and port. A host that already carries a
    /// scheme (`https://influx.example`) is used verbatim and `port` is
    /// ignored.
    pub fn new(host: &str, port: u16, database: impl Into<String>) -> Self {
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{host}:{port}")
        };
        Self {
            base_url,
            database: database.into(),
        }
    }
}

/// Body of a `/query` response.
#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<StatementResult>,
}

#[derive(Debug, Deserialize)]
struct StatementResult {
    #[serde(default)]
    series: Vec<Series>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Series {
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// Client for one InfluxDB database.
#[derive(Clone, Debug)]
pub struct InfluxClient {
    config: InfluxConfig,
    client: reqwest::blocking::Client,
}

impl InfluxClient {
    /// # Errors
    /// Returns [`HealthFluxError::Http`] if the HTTP client cannot be built.
    pub fn new(config: InfluxConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { config, client })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.config.base_url)
    }

    /// Run an InfluxQL statement and fail on transport, status or
    /// statement-level errors.
    fn execute_query(&self, request: reqwest::blocking::RequestBuilder) -> Result<QueryResponse> {
        let resp = check_status(request.send()?)?;
        let body: QueryResponse = resp.json()?;
        if let Some(error) = body.results.iter().find_map(|r| r.error.as_ref()) {
            return Err(HealthFluxError::Influx {
                status: 200,
                body: truncate(error),
            });
        }
        Ok(body)
    }
}

impl PointSink for InfluxClient {
    fn ensure_database(&mut self) -> Result<()> {
        let statement = format!("CREATE DATABASE {}", quote_identifier(&self.config.database));
        tracing::debug!("{} at {}", statement, self.config.base_url);
        let request = self
            .client
            .post(self.url("query"))
            .query(&[("q", statement.as_str())]);
        self.execute_query(request)?;
        Ok(())
    }

    fn last_watermark(&mut self) -> Result<Option<Watermark>> {
        let statement = format!(
            "SELECT last({}) FROM {}",
            quote_identifier(WATERMARK_FIELD),
            quote_identifier(IMPORT_MEASUREMENT)
        );
        let request = self.client.get(self.url("query")).query(&[
            ("db", self.config.database.as_str()),
            ("q", statement.as_str()),
        ]);
        let body = self.execute_query(request)?;

        let watermark = body
            .results
            .iter()
            .flat_map(|r| r.series.iter())
            .find_map(|series| {
                let idx = series.columns.iter().position(|c| c == "last")?;
                series
                    .values
                    .first()?
                    .get(idx)?
                    .as_str()
                    .map(Watermark::new)
            });
        Ok(watermark)
    }

    fn write_point(&mut self, point: &NormalizedPoint) -> Result<()> {
        let line = encode_point(point)?;
        tracing::trace!("write {}", line);
        let resp = self
            .client
            .post(self.url("write"))
            .query(&[("db", self.config.database.as_str()), ("precision", "s")])
            .body(line)
            .send()?;
        check_status(resp)?;
        Ok(())
    }
}

/// Convert a non-success response into [`HealthFluxError::Influx`].
fn check_status(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().unwrap_or_default();
    Err(HealthFluxError::Influx {
        status: status.as_u16(),
        body: truncate(&body),
    })
}

fn truncate(s: &str) -> String {
    s.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// Double-quote an InfluxQL identifier.
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
}
