//! In-memory sink: records every point it is given.
//!
//! Mirrors the InfluxDB semantics the importer relies on: the watermark is
//! the field of the most recently written `Import` point.

use crate::core::point::NormalizedPoint;
use crate::core::watermark::Watermark;
use crate::sink::PointSink;
use crate::util::error::Result;

#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// Every point written, in write order.
    pub points: Vec<NormalizedPoint>,
    /// Set once `ensure_database` has been called.
    pub database_created: bool,
    seeded_watermark: Option<Watermark>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that reports `watermark` as the previous import.
    pub fn with_watermark(watermark: Watermark) -> Self {
        Self {
            seeded_watermark: Some(watermark),
            ..Self::default()
        }
    }

    /// Points other than `Import` watermark points.
    pub fn record_points(&self) -> Vec<&NormalizedPoint> {
        self.points
            .iter()
            .filter(|p| p.watermark_value().is_none())
            .collect()
    }
}

impl PointSink for MemorySink {
    fn ensure_database(&mut self) -> Result<()> {
        self.database_created = true;
        Ok(())
    }

    fn last_watermark(&mut self) -> Result<Option<Watermark>> {
        let written = self
            .points
            .iter()
            .rev()
            .find_map(NormalizedPoint::watermark_value);
        Ok(written.or_else(|| self.seeded_watermark.clone()))
    }

    fn write_point(&mut self, point: &NormalizedPoint) -> Result<()> {
        self.points.push(point.clone());
        Ok(())
    }
}
