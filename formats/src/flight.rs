//! Our own view of an aircraft, built from a `RawStateVector`.
//!
//! A `FlightRecord` always has a valid position, everything else may be missing.  Records are
//! rebuilt from scratch at every poll, there is no identity kept from one snapshot to the next.
//!

use serde::Serialize;
use tracing::trace;

use crate::{RawStateVector, StateList};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlightRecord {
    /// ICAO24 transponder address
    pub id: String,
    /// Trimmed callsign, the transponder address if there is none
    pub callsign: String,
    pub origin_country: String,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Ground speed in m/s
    pub velocity_ms: Option<f64>,
    /// Track angle in degrees clockwise from north
    pub track_deg: Option<f64>,
    /// Geometric altitude if known, barometric otherwise, in m
    pub altitude_m: Option<f64>,
    pub on_ground: bool,
}

impl FlightRecord {
    /// Build a record from one state vector, `None` if the position is missing or not finite.
    ///
    /// Finite but out-of-range coordinates are kept as sent.
    ///
    pub fn from_state(state: &RawStateVector) -> Option<Self> {
        let lat = state.latitude.filter(|l| l.is_finite())?;
        let lon = state.longitude.filter(|l| l.is_finite())?;
        if lat.abs() > 90. || lon.abs() > 180. {
            trace!("{:?}: position out of range ({lat}, {lon})", state.icao24);
        }

        let id = state.icao24.as_deref().unwrap_or_default().trim().to_string();
        let callsign = match state.callsign.as_deref().map(str::trim) {
            Some(cs) if !cs.is_empty() => cs.to_string(),
            _ => id.clone(),
        };

        Some(FlightRecord {
            id,
            callsign,
            origin_country: state.origin_country.clone().unwrap_or_default(),
            lat,
            lon,
            velocity_ms: state.velocity,
            track_deg: state.true_track,
            altitude_m: state.geo_altitude.or(state.baro_altitude),
            on_ground: state.on_ground.unwrap_or(false),
        })
    }
}

/// Turn a snapshot into flight records, keeping the snapshot order and dropping every entry
/// without a usable position.
///
#[tracing::instrument(skip(list), fields(states = list.len()))]
pub fn normalize(list: &StateList) -> Vec<FlightRecord> {
    let flights: Vec<FlightRecord> = list
        .states()
        .iter()
        .filter_map(|s| {
            let r = FlightRecord::from_state(s);
            if r.is_none() {
                trace!("dropping {:?}: no position", s.icao24);
            }
            r
        })
        .collect();

    trace!("{} flights kept", flights.len());
    flights
}
