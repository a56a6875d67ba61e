//! Incremental importer.
//!
//! One run:
//! 1. makes sure the destination database exists,
//! 2. reads the previous watermark (epoch if there is none),
//! 3. walks every element of the export once, writing one point per record
//!    newer than the watermark,
//! 4. writes an `Import` point carrying the new watermark.
//!
//! Any error aborts the run. Points written before the error stay written;
//! the watermark is not advanced, so the next run re-imports them.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::core::archive::{archive_name, read_export_xml};
use crate::core::point::NormalizedPoint;
use crate::core::watermark::{Watermark, WatermarkTracker};
use crate::core::xml_parser::{classify, extract_record, parse_document};
use crate::sink::PointSink;
use crate::util::error::Result;
use crate::util::time::{format_duration, format_export_timestamp};

/// Outcome of one import run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    /// Watermark read from the store at the start of the run.
    pub previous_watermark: Watermark,
    /// Watermark written at the end of the run.
    pub watermark: Watermark,
    /// Record points written (the `Import` point is not counted).
    pub imported: usize,
    /// Recognised records skipped because they are not newer than the
    /// previous watermark.
    pub skipped: usize,
    /// Imported record count per semantic type name.
    pub record_types: BTreeMap<String, usize>,
    pub elapsed: Duration,
}

/// Import the export archive at `path` into `sink`.
///
/// # Errors
/// Propagates archive, XML, attribute and sink errors unchanged.
pub fn run_import<S: PointSink>(sink: &mut S, path: &Path) -> Result<ImportSummary> {
    let xml = read_export_xml(path)?;
    import_export(sink, &xml, &archive_name(path))
}

/// Import an already-loaded `Export.xml` document. `source_name` tags the
/// run's `Import` point.
pub fn import_export<S: PointSink>(
    sink: &mut S,
    xml: &str,
    source_name: &str,
) -> Result<ImportSummary> {
    let start = Instant::now();

    sink.ensure_database()?;
    let previous = match sink.last_watermark()? {
        Some(wm) => {
            tracing::info!("Importing new records since previous import timestamp {wm}");
            wm
        }
        None => {
            tracing::info!("No previous import found. Importing all records");
            Watermark::epoch()
        }
    };

    let doc = parse_document(xml)?;
    let mut tracker = WatermarkTracker::new(previous.clone());
    let mut imported = 0usize;
    let mut skipped = 0usize;
    let mut record_types: BTreeMap<String, usize> = BTreeMap::new();

    for node in doc.descendants() {
        let Some(header) = classify(node)? else {
            continue;
        };
        if !tracker.observe(header.start_date) {
            skipped += 1;
            tracing::trace!(
                "Skipping {} at {} (not after {})",
                header.type_name,
                header.start_date,
                tracker.previous()
            );
            continue;
        }

        let record = extract_record(node, &header)?;
        sink.write_point(&record.to_point())?;
        imported += 1;

        let count = record_types.entry(record.type_name().to_string()).or_insert(0);
        if *count == 0 {
            tracing::info!("Found record type {}", record.type_name());
        }
        *count += 1;
    }

    let watermark = tracker.finish();
    tracing::info!("Latest imported timestamp: {watermark}");
    let now = format_export_timestamp(&Utc::now());
    sink.write_point(&NormalizedPoint::watermark(&watermark, source_name, &now))?;

    let elapsed = start.elapsed();
    tracing::info!(
        "Imported {} records with {} different record types in {} ({} already imported)",
        imported,
        record_types.len(),
        format_duration(elapsed),
        skipped
    );
    for (name, count) in &record_types {
        tracing::debug!("  {name}: {count}");
    }

    Ok(ImportSummary {
        previous_watermark: previous,
        watermark,
        imported,
        skipped,
        record_types,
        elapsed,
    })
}
