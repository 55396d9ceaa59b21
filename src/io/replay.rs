//! Replay files: a route plus a recorded stream of position fixes.
//!
//! JSON layout:
//!
//! ```json
//! {
//!   "route": { "name": "...", "start": {..}, "end": {..}, "points": [..] },
//!   "fixes": [ { "lat": 59.91, "lon": 10.75, "timestamp_us": 0 } ]
//! }
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Coordinate, PositionFix, Timestamped};
use crate::error::Result;
use crate::route::Route;

/// One recorded fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixRecord {
    pub lat: f64,
    pub lon: f64,
    pub timestamp_us: u64,
}

impl From<&PositionFix> for FixRecord {
    fn from(fix: &PositionFix) -> Self {
        Self {
            lat: fix.data.lat,
            lon: fix.data.lon,
            timestamp_us: fix.timestamp_us,
        }
    }
}

impl From<FixRecord> for PositionFix {
    fn from(record: FixRecord) -> Self {
        Timestamped::new(Coordinate::new(record.lat, record.lon), record.timestamp_us)
    }
}

/// A route and the fixes recorded while riding it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayLog {
    pub route: Route,
    #[serde(default)]
    pub fixes: Vec<FixRecord>,
}

impl ReplayLog {
    pub fn new(route: Route, fixes: &[PositionFix]) -> Self {
        Self {
            route,
            fixes: fixes.iter().map(FixRecord::from).collect(),
        }
    }

    /// Load a replay file.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let log: ReplayLog = serde_json::from_reader(reader)?;
        log::debug!(
            "Loaded replay '{}': {} points, {} fixes",
            log.route.name,
            log.route.points.len(),
            log.fixes.len()
        );
        Ok(log)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Write as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Fixes as tracker input, in file order.
    pub fn fixes(&self) -> Vec<PositionFix> {
        self.fixes.iter().copied().map(PositionFix::from).collect()
    }

    /// Recording length in seconds (first to last fix).
    pub fn duration_secs(&self) -> f64 {
        match (self.fixes.first(), self.fixes.last()) {
            (Some(first), Some(last)) => {
                last.timestamp_us.saturating_sub(first.timestamp_us) as f64 / 1e6
            }
            _ => 0.0,
        }
    }
}
