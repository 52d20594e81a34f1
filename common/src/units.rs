//! Unit conversions.
//!
//! OpenSky sends everything in SI units, we display km/h and feet.
//!

/// m/s to km/h
const MS_TO_KMH: f64 = 3.6;

/// Meters to feet
const M_TO_FT: f64 = 3.28084;

/// Convert a velocity from m/s into km/h
///
#[inline]
pub fn to_kmh(a: f64) -> f64 {
    a * MS_TO_KMH
}

/// Convert into feet
///
#[inline]
pub fn to_feet(a: f64) -> f64 {
    a * M_TO_FT
}
