//! InfluxDB client against a mock HTTP server.
//!
//! The client is blocking, so every call runs on a `spawn_blocking` thread
//! while wiremock serves from the async runtime.

use std::io::Write;

use healthflux::core::importer::run_import;
use healthflux::core::point::NormalizedPoint;
use healthflux::core::watermark::Watermark;
use healthflux::sink::influx::{InfluxClient, InfluxConfig};
use healthflux::sink::PointSink;
use healthflux::util::constants::EXPORT_XML_PATH;
use healthflux::util::error::HealthFluxError;
use wiremock::matchers::{body_string, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LAST_WATERMARK_QUERY: &str = r#"SELECT last("latest_imported_timestamp") FROM "Import""#;

/// Build the client on the blocking thread that uses it: a blocking
/// `reqwest` client must not be created or dropped inside the runtime.
fn client_for(uri: &str) -> InfluxClient {
    InfluxClient::new(InfluxConfig::new(uri, 0, "healthdata")).expect("client")
}

async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.expect("blocking task")
}

fn empty_result() -> serde_json::Value {
    serde_json::json!({"results": [{"statement_id": 0}]})
}

#[tokio::test(flavor = "multi_thread")]
async fn ensure_database_issues_create_database() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .and(query_param("q", "CREATE DATABASE \"healthdata\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_result()))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    blocking(move || client_for(&uri).ensure_database())
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn last_watermark_reads_last_column() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("db", "healthdata"))
        .and(query_param("q", LAST_WATERMARK_QUERY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "statement_id": 0,
                "series": [{
                    "name": "Import",
                    "columns": ["time", "last"],
                    "values": [["2021-02-01T12:00:00Z", "2021-01-31 22:10:00 +0100"]]
                }]
            }]
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let wm = blocking(move || client_for(&uri).last_watermark())
        .await
        .unwrap();
    assert_eq!(wm, Some(Watermark::new("2021-01-31 22:10:00 +0100")));
}

#[tokio::test(flavor = "multi_thread")]
async fn last_watermark_is_none_without_series() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_result()))
        .mount(&server)
        .await;

    let uri = server.uri();
    let wm = blocking(move || client_for(&uri).last_watermark())
        .await
        .unwrap();
    assert!(wm.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn statement_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"statement_id": 0, "error": "database not found: healthdata"}]
        })))
        .mount(&server)
        .await;

    let uri = server.uri();
    let err = blocking(move || client_for(&uri).last_watermark())
        .await
        .unwrap_err();
    assert!(
        err.to_string().contains("database not found"),
        "unexpected error: {err}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn write_point_posts_one_line() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/write"))
        .and(query_param("db", "healthdata"))
        .and(query_param("precision", "s"))
        .and(body_string("HeartRate,sourceName=Watch value=62 1609578000"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let uri = server.uri();
    let point = NormalizedPoint::new("HeartRate", "2021-01-02 10:00:00 +0100")
        .field("value", 62.0)
        .tag("sourceName", "Watch");
    blocking(move || client_for(&uri).write_point(&point))
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_write_maps_to_influx_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/write"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"error": "partial write: field type conflict"})),
        )
        .mount(&server)
        .await;

    let uri = server.uri();
    let point = NormalizedPoint::new("HeartRate", "2021-01-02").field("value", 1.0);
    let err = blocking(move || client_for(&uri).write_point(&point))
        .await
        .unwrap_err();
    match err {
        HealthFluxError::Influx { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("field type conflict"), "body: {body}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn full_run_against_mock_server() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_result()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_result()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/write"))
        .and(body_string_contains("BodyMass"))
        .respond_with(ResponseTemplate::new(204))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/write"))
        .and(body_string_contains("Import,file=export.zip"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("export.zip");
    {
        let file = std::fs::File::create(&archive).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file(EXPORT_XML_PATH, zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(
            br#"<HealthData locale="en_US">
 <Record type="HKQuantityTypeIdentifierBodyMass" sourceName="Scale" unit="kg" startDate="2021-01-02 07:00:00 +0000" value="71.4"/>
 <Record type="HKQuantityTypeIdentifierBodyMass" sourceName="Scale" unit="kg" startDate="2021-01-09 07:00:00 +0000" value="71.1"/>
</HealthData>"#,
        )
        .unwrap();
        zip.finish().unwrap();
    }

    let uri = server.uri();
    let summary = blocking(move || run_import(&mut client_for(&uri), &archive))
        .await
        .unwrap();
    assert_eq!(summary.imported, 2);
    assert_eq!(
        summary.watermark,
        Watermark::new("2021-01-09 07:00:00 +0000")
    );
}
