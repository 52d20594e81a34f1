//! Render sinks.
//!
//! The pipeline knows nothing about how things are displayed, every output goes through one of
//! these traits.  The CLI provides terminal/file implementations, tests use recording ones.
//!

use eyre::Result;
use serde::Serialize;

use contrail_formats::FlightRecord;

use crate::{FleetSummary, RankedFlight, RefreshError};

/// One aircraft on the map.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapMarker {
    pub flight: FlightRecord,
    pub airline: String,
    /// Estimated emission rate in kg/h
    pub emission_rate: f64,
    /// End of the heading segment as (lat, lon), if any
    pub heading: Option<(f64, f64)>,
    /// Human-readable summary
    pub summary: String,
}

/// Replaces every marker (and heading line) at once.
///
pub trait MapSink: Send {
    fn replace(&mut self, markers: &[MapMarker]) -> Result<()>;
}

/// Replaces all leaderboard rows, already sorted.
///
pub trait LeaderboardSink: Send {
    fn replace(&mut self, rows: &[RankedFlight]) -> Result<()>;
}

/// Replaces the bar chart series, `labels` and `values` have the same length.
///
pub trait ChartSink: Send {
    fn replace(&mut self, labels: &[String], values: &[f64]) -> Result<()>;
}

pub trait StatsSink: Send {
    fn update(&mut self, summary: &FleetSummary) -> Result<()>;
}

/// User-visible failure notice.
///
pub trait Notifier: Send {
    fn alert(&mut self, err: &RefreshError);
}
