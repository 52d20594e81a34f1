//! Data formats used by contrail.
//!
//! - `StateList` and `RawStateVector` are what the OpenSky `/states/all` endpoint sends, an
//!   array of positional tuples with any field possibly `null`,
//! - `FlightRecord` is our own normalized view of one aircraft,
//! - `AirlineResolver` maps a callsign to a carrier name.
//!

pub use airline::*;
pub use error::*;
pub use flight::*;
pub use opensky::*;

mod airline;
mod error;
mod flight;
mod opensky;
