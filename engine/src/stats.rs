//! All about `Stats`.

use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::ops::Add;

/// Session counters, split between the `Engine` (polling side) and the `Dashboard` (rendering
/// side) and merged with `+`.
///
/// - `tm`: seconds since the engine was created
/// - `polls`: refreshes started
/// - `bytes`: size of all bodies received
/// - `flights`: flights kept by the last successful poll
/// - `hits`: successful polls
/// - `rendered`: snapshots applied to the sinks
/// - `stale`: snapshots dropped because a newer one was already rendered
/// - `err`: failed polls
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Stats {
    pub tm: u64,
    pub polls: u64,
    pub bytes: u64,
    pub flights: usize,
    pub hits: u64,
    pub rendered: u64,
    pub stale: u64,
    pub err: u64,
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "time={}s polls={} bytes={} flights={} hits={} rendered={} stale={} errors={}",
            self.tm,
            self.polls,
            self.bytes,
            self.flights,
            self.hits,
            self.rendered,
            self.stale,
            self.err
        )
    }
}

impl Add for Stats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Stats {
            tm: self.tm.max(rhs.tm),
            polls: self.polls + rhs.polls,
            bytes: self.bytes + rhs.bytes,
            flights: self.flights.max(rhs.flights),
            hits: self.hits + rhs.hits,
            rendered: self.rendered + rhs.rendered,
            stale: self.stale + rhs.stale,
            err: self.err + rhs.err,
        }
    }
}
