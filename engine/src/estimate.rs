//! CO₂ emission estimation.
//!
//! This is a linear proxy and not a physical model: ground speed times a per passenger-km
//! emission factor times an assumed load.
//!

use contrail_common::to_kmh;
use contrail_formats::FlightRecord;

/// kg of CO₂ per passenger-km
pub const EMISSION_FACTOR: f64 = 0.11;

/// Assumed number of passengers on board
pub const ASSUMED_PAX: f64 = 150.;

/// Ground speed in km/h, missing or negative being 0.
///
#[inline]
pub fn speed_kmh(flight: &FlightRecord) -> f64 {
    to_kmh(flight.velocity_ms.unwrap_or(0.).max(0.))
}

/// Emission rate in kg/h for a given speed in km/h
///
#[inline]
pub fn rate_from_kmh(kmh: f64) -> f64 {
    kmh * EMISSION_FACTOR * ASSUMED_PAX
}

/// Estimated emission rate of a flight, in kg/h
///
#[inline]
pub fn rate(flight: &FlightRecord) -> f64 {
    rate_from_kmh(speed_kmh(flight))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn flight(velocity_ms: Option<f64>) -> FlightRecord {
        FlightRecord {
            id: "4ca7b3".to_string(),
            callsign: "EIN1".to_string(),
            origin_country: "Ireland".to_string(),
            lat: 53.4,
            lon: -6.2,
            velocity_ms,
            track_deg: None,
            altitude_m: None,
            on_ground: false,
        }
    }

    #[rstest]
    #[case(Some(100.), 5940.)]
    #[case(Some(50.), 2970.)]
    #[case(Some(0.), 0.)]
    #[case(None, 0.)]
    #[case(Some(-10.), 0.)]
    fn test_rate(#[case] v: Option<f64>, #[case] res: f64) {
        assert!((rate(&flight(v)) - res).abs() < 1e-9);
    }

    #[test]
    fn test_rate_is_pure() {
        let f = flight(Some(231.66));

        assert_eq!(rate(&f), rate(&f));
        assert_eq!(rate(&f), rate(&f.clone()));
    }

    #[test]
    fn test_rate_never_negative() {
        for v in [None, Some(-1.), Some(f64::NAN), Some(0.), Some(340.)] {
            assert!(rate(&flight(v)) >= 0.);
        }
    }
}
