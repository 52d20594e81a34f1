//! Fleet-wide statistics and ranking.
//!

use std::fmt::{Display, Formatter};
use std::ops::Deref;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use contrail_formats::FlightRecord;

use crate::{rate, rate_from_kmh, speed_kmh};

/// Summary of one snapshot, computed over all the flights we kept (not only the top-N).
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FleetSummary {
    pub count: usize,
    pub average_velocity_kmh: f64,
    pub average_emission_rate_kg_per_hour: f64,
    pub timestamp: DateTime<Utc>,
}

impl Display for FleetSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "flights={} avg_speed={:.1}km/h avg_rate={:.1}kg/h at {}",
            self.count,
            self.average_velocity_kmh,
            self.average_emission_rate_kg_per_hour,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

/// A flight with its estimated emission rate
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RankedFlight {
    #[serde(flatten)]
    pub flight: FlightRecord,
    pub emission_rate_kg_per_hour: f64,
}

impl Deref for RankedFlight {
    type Target = FlightRecord;

    fn deref(&self) -> &Self::Target {
        &self.flight
    }
}

/// Summary as of now
///
pub fn summarize(flights: &[FlightRecord]) -> FleetSummary {
    summarize_at(flights, Utc::now())
}

/// Summary with the snapshot's own timestamp.  An empty set gives zeroes.
///
#[tracing::instrument(skip(flights), fields(count = flights.len()))]
pub fn summarize_at(flights: &[FlightRecord], timestamp: DateTime<Utc>) -> FleetSummary {
    let count = flights.len();
    let average_velocity_kmh = if count == 0 {
        0.
    } else {
        flights.iter().map(speed_kmh).sum::<f64>() / count as f64
    };

    FleetSummary {
        count,
        average_velocity_kmh,
        average_emission_rate_kg_per_hour: rate_from_kmh(average_velocity_kmh),
        timestamp,
    }
}

/// Top `n` flights by emission rate, highest first.
///
/// The sort is stable so flights with the same rate stay in snapshot order.
///
#[tracing::instrument(skip(flights), fields(count = flights.len()))]
pub fn rank(flights: &[FlightRecord], n: usize) -> Vec<RankedFlight> {
    let mut ranked: Vec<RankedFlight> = flights
        .iter()
        .map(|f| RankedFlight {
            flight: f.clone(),
            emission_rate_kg_per_hour: rate(f),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.emission_rate_kg_per_hour
            .total_cmp(&a.emission_rate_kg_per_hour)
    });
    ranked.truncate(n);

    trace!("kept {} of {}", ranked.len(), flights.len());
    ranked
}
