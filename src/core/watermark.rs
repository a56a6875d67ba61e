//! Incremental-import watermark.
//!
//! The watermark is the start-date of the newest record imported so far. A
//! record qualifies iff its start-date is strictly greater, compared as
//! strings: the export's date formats sort lexicographically by date.

use std::fmt;

use crate::util::constants::EPOCH_WATERMARK;

/// Start-date boundary of the previous import.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Watermark(String);

impl Watermark {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Watermark used when the store holds no previous import.
    pub fn epoch() -> Self {
        Self(EPOCH_WATERMARK.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `true` if a record starting at `start_date` has not been imported yet.
    pub fn admits(&self, start_date: &str) -> bool {
        start_date > self.0.as_str()
    }
}

impl Default for Watermark {
    fn default() -> Self {
        Self::epoch()
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Running state of one import: the prior boundary and the newest
/// start-date admitted so far, across all record categories.
#[derive(Debug, Clone)]
pub struct WatermarkTracker {
    previous: Watermark,
    latest: Option<String>,
}

impl WatermarkTracker {
    pub fn new(previous: Watermark) -> Self {
        Self {
            previous,
            latest: None,
        }
    }

    pub fn previous(&self) -> &Watermark {
        &self.previous
    }

    /// Check `start_date` against the prior watermark and advance the
    /// running maximum if it qualifies. Returns whether it qualifies.
    pub fn observe(&mut self, start_date: &str) -> bool {
        if !self.previous.admits(start_date) {
            return false;
        }
        match &self.latest {
            Some(latest) if latest.as_str() >= start_date => {}
            _ => self.latest = Some(start_date.to_string()),
        }
        true
    }

    /// The watermark to persist: the newest admitted start-date, or the
    /// prior watermark when nothing qualified.
    pub fn finish(self) -> Watermark {
        self.latest.map(Watermark::new).unwrap_or(self.previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_start_date_is_not_admitted() {
        let wm = Watermark::new("2020-06-01");
        assert!(!wm.admits("2020-06-01"));
        assert!(!wm.admits("2020-01-01"));
        assert!(wm.admits("2020-06-01 00:00:01 +0000"));
    }

    #[test]
    fn test_tracker_keeps_maximum_regardless_of_order() {
        let mut tracker = WatermarkTracker::new(Watermark::new("2020-06-01"));
        assert!(tracker.observe("2021-01-02"));
        assert!(!tracker.observe("2020-01-01"));
        assert!(tracker.observe("2020-12-31"));
        assert_eq!(tracker.finish(), Watermark::new("2021-01-02"));
    }

    #[test]
    fn test_tracker_without_qualifying_records_keeps_previous() {
        let mut tracker = WatermarkTracker::new(Watermark::new("2022-01-01"));
        assert!(!tracker.observe("2021-05-05"));
        assert_eq!(tracker.finish(), Watermark::new("2022-01-01"));
    }

    #[test]
    fn test_epoch_admits_everything_real() {
        assert!(Watermark::epoch().admits("2015-04-01 08:00:00 +0200"));
    }
}
