//! The render step.
//!
//! `Dashboard` owns the sinks and the render state behind an async mutex.  Refreshes may
//! overlap, the one with the highest sequence number wins: an older snapshot arriving after a
//! newer one has been rendered is dropped.  Failures never touch the render state, they only
//! raise one notice.
//!

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, error, trace, warn};

use contrail_common::{project, to_feet};
use contrail_formats::{AirlineResolver, FlightRecord};
use contrail_sources::Fetchable;

use crate::{
    rate, speed_kmh, ChartSink, Engine, LeaderboardSink, MapMarker, MapSink, Notifier,
    PipelineOptions, RefreshError, Snapshot, Stats, StatsSink,
};

/// What happened to a refresh result.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Rendered(u64),
    Stale(u64),
    Failed(u64),
}

/// All the outputs of the dashboard.
///
/// Sinks are called synchronously with the render lock held, a slow sink delays every other
/// render.  Keep them cheap or hand the work off to another thread.
///
pub struct Sinks {
    pub map: Box<dyn MapSink>,
    pub leaderboard: Box<dyn LeaderboardSink>,
    pub chart: Box<dyn ChartSink>,
    pub stats: Box<dyn StatsSink>,
    pub notifier: Box<dyn Notifier>,
}

impl Debug for Sinks {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Sinks")
    }
}

#[derive(Debug)]
struct RenderState {
    /// Sequence number of the last rendered snapshot
    last: Option<u64>,
    sinks: Sinks,
}

#[derive(Debug)]
pub struct Dashboard {
    state: Mutex<RenderState>,
    airlines: AirlineResolver,
    include_heading: bool,
    heading_km: f64,
    rendered: AtomicU64,
    stale: AtomicU64,
}

impl Dashboard {
    pub fn new(sinks: Sinks, opts: &PipelineOptions, airlines: AirlineResolver) -> Self {
        Dashboard {
            state: Mutex::new(RenderState { last: None, sinks }),
            airlines,
            include_heading: opts.include_heading,
            heading_km: opts.heading_km,
            rendered: AtomicU64::new(0),
            stale: AtomicU64::new(0),
        }
    }

    /// Sequence number of what is currently displayed.
    ///
    pub async fn last(&self) -> Option<u64> {
        self.state.lock().await.last
    }

    /// Hand the result of one refresh to the sinks.
    ///
    #[tracing::instrument(skip(self, res))]
    pub async fn apply(&self, res: Result<Snapshot, RefreshError>) -> Applied {
        let mut state = self.state.lock().await;

        let snap = match res {
            Ok(snap) => snap,
            Err(e) => {
                error!("refresh failed: {e}");
                state.sinks.notifier.alert(&e);
                return Applied::Failed(e.seq);
            }
        };

        if state.last.is_some_and(|last| snap.seq <= last) {
            debug!("dropping stale snapshot #{} (shown: {:?})", snap.seq, state.last);
            self.stale.fetch_add(1, Ordering::Relaxed);
            return Applied::Stale(snap.seq);
        }
        state.last = Some(snap.seq);

        let markers = self.markers(&snap.flights);
        let (labels, values): (Vec<String>, Vec<f64>) = snap
            .ranking
            .iter()
            .map(|r| (r.callsign.clone(), r.emission_rate_kg_per_hour))
            .unzip();

        let sinks = &mut state.sinks;
        if let Err(e) = sinks.map.replace(&markers) {
            warn!("map: {e}");
        }
        if let Err(e) = sinks.leaderboard.replace(&snap.ranking) {
            warn!("leaderboard: {e}");
        }
        if let Err(e) = sinks.chart.replace(&labels, &values) {
            warn!("chart: {e}");
        }
        if let Err(e) = sinks.stats.update(&snap.summary) {
            warn!("stats: {e}");
        }

        self.rendered.fetch_add(1, Ordering::Relaxed);
        trace!("rendered #{}", snap.seq);
        Applied::Rendered(snap.seq)
    }

    /// One marker per flight, in snapshot order.
    ///
    pub fn markers(&self, flights: &[FlightRecord]) -> Vec<MapMarker> {
        flights.iter().map(|f| self.marker(f)).collect()
    }

    fn marker(&self, flight: &FlightRecord) -> MapMarker {
        // The callsign falls back to the transponder address, which is no airline
        //
        let callsign = (flight.callsign != flight.id).then_some(flight.callsign.as_str());
        let airline = self.airlines.resolve(callsign);
        let emission_rate = rate(flight);
        let heading = match flight.track_deg {
            Some(track) if self.include_heading => {
                Some(project(flight.lat, flight.lon, track, self.heading_km))
            }
            _ => None,
        };
        let altitude = flight
            .altitude_m
            .map(|a| format!("{:.0} ft", to_feet(a)))
            .unwrap_or_else(|| "n/a".to_string());
        let summary = format!(
            "{} | {} | {} | {:.0} km/h | {} | {:.0} kg/h",
            flight.callsign,
            airline,
            flight.origin_country,
            speed_kmh(flight),
            altitude,
            emission_rate
        );

        MapMarker {
            flight: flight.clone(),
            airline,
            emission_rate,
            heading,
            summary,
        }
    }

    /// Rendering side of the session counters.
    ///
    pub fn stats(&self) -> Stats {
        Stats {
            rendered: self.rendered.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            ..Default::default()
        }
    }
}

/// Shared entry point for manual and timer-driven refreshes.
///
pub async fn refresh_and_render<S: Fetchable>(engine: &Engine<S>, board: &Dashboard) -> Applied {
    board.apply(engine.refresh().await).await
}
