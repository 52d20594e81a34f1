//! Module to load the data coming from the Opensky `/states/all` endpoint.
//!
//! XXX they send out an array of arrays, each representing a specific state vector and
//!     any field of which can be `null`.  We can not use a typed tuple struct for them as one
//!     `null` in the wrong place would throw away the whole snapshot, so every field is read
//!     separately and anything missing or of the wrong type is `None`.
//!
//! Documentation is taken from [The Opensky site](https://openskynetwork.github.io/opensky-api/rest.html)
//!

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_repr::{Deserialize_repr, Serialize_repr};
use strum::Display;
use tracing::{debug, trace};

use crate::FormatError;

/// Origin of state's position
///
#[derive(Clone, Copy, Debug, Deserialize_repr, Display, PartialEq, Serialize_repr)]
#[repr(u8)]
pub enum Source {
    AdsB = 0,
    Asterix,
    MLAT,
    FLARM,
}

/// Aircraft category
///
/// By default, Opensky actually returns 17 fields, excluding this one.  It is only there
/// when asking with `extended=1`.
///
#[derive(Clone, Copy, Debug, Deserialize_repr, PartialEq, Serialize_repr)]
#[repr(u8)]
pub enum Category {
    NoInfo = 0,
    NoAdsBEmitterCategoryInfo,
    Light,
    Small,
    Large,
    HighVortexLarge,
    Heavy,
    HighPerformance,
    RotorCraft,
    Glider,
    Lighter,
    Skydiver,
    UltraLight,
    Reserved,
    Space,
    SurfaceEmergencyVehicule,
    SurfaceServiceVehicule,
    PointObstacle,
    ClusterObstacle,
    LineObstacle,
}

// Public structs

/// This is the main container for packets sent by the API.
/// It includes a UNIX timestamp and a set of `RawStateVector`.
///
/// `states` is `null` when there is no traffic.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateList {
    /// UNIX timestamp
    pub time: Option<i64>,
    /// The state vectors
    pub states: Option<Vec<RawStateVector>>,
}

impl StateList {
    /// Deserialize from json
    ///
    /// Only a body which is not a JSON object is an error, individual entries never are.
    /// Numbers are kept as text by `serde_json` (`arbitrary_precision`) so one beyond the
    /// `f64` range only makes its own field absent.
    ///
    #[tracing::instrument(skip(input), fields(len = input.len()))]
    pub fn from_json(input: &str) -> Result<Self, FormatError> {
        trace!("statelist::from_json");

        let data: Payload =
            serde_json::from_str(input).map_err(|e| FormatError::Decode(e.to_string()))?;

        let time = data
            .time
            .as_ref()
            .and_then(|t| t.as_i64().or_else(|| t.as_f64().map(|f| f as i64)));
        let states = data
            .states
            .map(|v| v.iter().map(RawStateVector::from).collect::<Vec<_>>());

        debug!(
            "time={:?} {} states",
            time,
            states.as_ref().map_or(0, |s| s.len())
        );
        Ok(StateList { time, states })
    }

    /// The state vectors, empty if there were none.
    ///
    pub fn states(&self) -> &[RawStateVector] {
        self.states.as_deref().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.states().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states().is_empty()
    }
}

/// Definition of a state vector as sent, field by field, in the order of the tuple.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RawStateVector {
    /// ICAO ID
    pub icao24: Option<String>,
    /// Call-sign of the vehicule, 8 chars padded with spaces
    pub callsign: Option<String>,
    /// Origin Country
    pub origin_country: Option<String>,
    pub time_position: Option<i64>,
    pub last_contact: Option<i64>,
    /// Position
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    /// Barometric altitude in m
    pub baro_altitude: Option<f64>,
    pub on_ground: Option<bool>,
    /// Ground speed in m/s
    pub velocity: Option<f64>,
    /// Track angle in degrees clockwise from north
    pub true_track: Option<f64>,
    pub vertical_rate: Option<f64>,
    pub sensors: Option<Vec<i64>>,
    /// Geometric altitude in m
    pub geo_altitude: Option<f64>,
    pub squawk: Option<String>,
    pub spi: Option<bool>,
    /// Position source
    pub position_source: Option<Source>,
    /// Aircraft category, only with `extended=1`
    pub category: Option<Category>,
}

impl From<&Value> for RawStateVector {
    /// Read every positional field separately, a non-array entry gives an empty vector.
    ///
    fn from(value: &Value) -> Self {
        let Some(r) = value.as_array() else {
            trace!("not an array: {value}");
            return RawStateVector::default();
        };

        let string = |n: usize| r.get(n).and_then(Value::as_str).map(str::to_owned);
        let float = |n: usize| r.get(n).and_then(Value::as_f64).filter(|f| f.is_finite());
        let int = |n: usize| r.get(n).and_then(Value::as_i64);
        let boolean = |n: usize| r.get(n).and_then(Value::as_bool);

        RawStateVector {
            icao24: string(0),
            callsign: string(1),
            origin_country: string(2),
            time_position: int(3),
            last_contact: int(4),
            longitude: float(5),
            latitude: float(6),
            baro_altitude: float(7),
            on_ground: boolean(8),
            velocity: float(9),
            true_track: float(10),
            vertical_rate: float(11),
            sensors: r.get(12).and_then(Value::as_array).map(|s| {
                s.iter().filter_map(Value::as_i64).collect()
            }),
            geo_altitude: float(13),
            squawk: string(14),
            spi: boolean(15),
            position_source: r
                .get(16)
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
            category: r
                .get(17)
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
        }
    }
}

// Private structs

/// Struct returned by the Opensky API, we only need the two top-level fields.
///
#[derive(Debug, Deserialize)]
struct Payload {
    /// UNIX timestamp
    #[serde(default)]
    time: Option<Value>,
    /// State vectors, an array of arrays
    #[serde(default)]
    states: Option<Vec<Value>>,
}
