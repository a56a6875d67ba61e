//! Destinations for normalized points.
//!
//! The importer talks to its destination only through [`PointSink`]; the
//! same sink value is passed to every call of a run.

pub mod influx;
pub mod line_protocol;
pub mod memory;

use crate::core::point::NormalizedPoint;
use crate::core::watermark::Watermark;
use crate::util::error::Result;

/// A time-series store that the importer can read a watermark from and
/// write points to. All operations address one database.
pub trait PointSink {
    /// Create the destination database if it does not exist yet.
    fn ensure_database(&mut self) -> Result<()>;

    /// Watermark written by the most recent previous import, if any.
    fn last_watermark(&mut self) -> Result<Option<Watermark>>;

    /// Write a single point.
    fn write_point(&mut self, point: &NormalizedPoint) -> Result<()>;
}
