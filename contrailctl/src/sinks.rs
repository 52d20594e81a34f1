//! Terminal and file implementations of the render sinks.
//!
//! - `TableBoard` prints the leaderboard with `tabled`,
//! - `BarChart` prints one bar per flight,
//! - `SummaryLine` prints the fleet summary,
//! - `GeoJsonMap` writes the markers as a GeoJSON `FeatureCollection`, `LogMap` only logs them,
//! - `StderrNotifier` reports failed polls.
//!

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use eyre::Result;
use serde_json::{json, Value};
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{debug, info};

use contrail_common::to_feet;
use contrail_engine::{
    speed_kmh, ChartSink, FleetSummary, LeaderboardSink, MapMarker, MapSink, Notifier,
    RankedFlight, RefreshError, StatsSink,
};

/// Width of the longest bar
const BAR_WIDTH: usize = 40;

/// Leaderboard as a table
///
#[derive(Debug)]
pub struct TableBoard<W: Write + Send> {
    pub out: W,
}

impl<W: Write + Send> TableBoard<W> {
    pub fn new(out: W) -> Self {
        TableBoard { out }
    }
}

impl<W: Write + Send> LeaderboardSink for TableBoard<W> {
    fn replace(&mut self, rows: &[RankedFlight]) -> Result<()> {
        let mut builder = Builder::default();
        builder.push_record(["#", "Callsign", "Country", "Speed (km/h)", "CO₂ (kg/h)"]);

        rows.iter().enumerate().for_each(|(i, r)| {
            builder.push_record([
                (i + 1).to_string(),
                r.callsign.clone(),
                r.origin_country.clone(),
                format!("{:.0}", speed_kmh(&r.flight)),
                format!("{:.0}", r.emission_rate_kg_per_hour),
            ]);
        });

        let table = builder.build().with(Style::modern()).to_string();
        writeln!(self.out, "{table}")?;
        Ok(())
    }
}

/// Horizontal bar chart
///
#[derive(Debug)]
pub struct BarChart<W: Write + Send> {
    pub out: W,
}

impl<W: Write + Send> BarChart<W> {
    pub fn new(out: W) -> Self {
        BarChart { out }
    }
}

impl<W: Write + Send> ChartSink for BarChart<W> {
    fn replace(&mut self, labels: &[String], values: &[f64]) -> Result<()> {
        let max = values.iter().cloned().fold(0., f64::max);
        let width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

        for (label, value) in labels.iter().zip(values) {
            let len = if max > 0. {
                ((value / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            writeln!(
                self.out,
                "{label:<width$} {} {value:.0}",
                "█".repeat(len)
            )?;
        }
        Ok(())
    }
}

/// One line with the fleet summary
///
#[derive(Debug)]
pub struct SummaryLine<W: Write + Send> {
    pub out: W,
}

impl<W: Write + Send> SummaryLine<W> {
    pub fn new(out: W) -> Self {
        SummaryLine { out }
    }
}

impl<W: Write + Send> StatsSink for SummaryLine<W> {
    fn update(&mut self, summary: &FleetSummary) -> Result<()> {
        writeln!(
            self.out,
            "{} flights, average {:.1} km/h, {:.1} kg/h of CO₂ (as of {})",
            summary.count,
            summary.average_velocity_kmh,
            summary.average_emission_rate_kg_per_hour,
            summary.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        Ok(())
    }
}

/// Map markers saved as GeoJSON, the file is replaced as a whole.
///
#[derive(Debug)]
pub struct GeoJsonMap {
    pub path: PathBuf,
}

impl GeoJsonMap {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        GeoJsonMap { path: path.into() }
    }

    /// One `Point` per marker and one `LineString` per heading segment.
    ///
    pub fn to_geojson(markers: &[MapMarker]) -> Value {
        let features: Vec<Value> = markers
            .iter()
            .flat_map(|m| {
                let f = &m.flight;
                let point = json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [f.lon, f.lat] },
                    "properties": {
                        "id": f.id,
                        "callsign": f.callsign,
                        "airline": m.airline,
                        "country": f.origin_country,
                        "velocity_kmh": speed_kmh(f),
                        "altitude_ft": f.altitude_m.map(to_feet),
                        "emission_rate": m.emission_rate,
                        "summary": m.summary,
                    }
                });
                let line = m.heading.map(|(lat, lon)| {
                    json!({
                        "type": "Feature",
                        "geometry": {
                            "type": "LineString",
                            "coordinates": [[f.lon, f.lat], [lon, lat]]
                        },
                        "properties": { "id": f.id, "heading": f.track_deg }
                    })
                });
                std::iter::once(point).chain(line)
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }
}

impl MapSink for GeoJsonMap {
    fn replace(&mut self, markers: &[MapMarker]) -> Result<()> {
        let data = serde_json::to_string(&Self::to_geojson(markers))?;

        // Write aside then rename so readers never see a partial file
        //
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;

        debug!("{} markers written to {:?}", markers.len(), self.path);
        Ok(())
    }
}

/// No map, just a log line.
///
#[derive(Debug, Default)]
pub struct LogMap;

impl MapSink for LogMap {
    fn replace(&mut self, markers: &[MapMarker]) -> Result<()> {
        let headings = markers.iter().filter(|m| m.heading.is_some()).count();
        info!("{} markers, {} with heading", markers.len(), headings);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&mut self, err: &RefreshError) {
        eprintln!("Refresh failed: {err}");
    }
}
