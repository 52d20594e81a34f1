//! Geographic helpers
//!
//! - great-circle destination point (used for the heading segment of a marker)
//! - bounding box used to restrict the area requested from the API
//!
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Mean Earth radius in km
pub const EARTH_RADIUS_KM: f64 = 6371.;

/// one degree is circumference of earth / 360°, convert into nautical miles
const ONE_DEG_NM: f64 = (40_000. / 1.852) / 360.;

/// Bring a longitude back into (-180, 180]
///
#[inline]
pub fn normalize_lon(lon: f64) -> f64 {
    let lon = (lon + 180.).rem_euclid(360.) - 180.;
    if lon == -180. {
        180.
    } else {
        lon
    }
}

/// Destination point given a start point, an initial bearing and a distance along a great
/// circle on a spherical Earth.
///
/// Angles are in degrees, `distance` is in km.  Returns `(lat, lon)` with the longitude in
/// (-180, 180].
///
pub fn project(lat: f64, lon: f64, bearing: f64, distance: f64) -> (f64, f64) {
    let phi1 = lat.to_radians();
    let lambda1 = lon.to_radians();
    let theta = bearing.to_radians();
    let delta = distance / EARTH_RADIUS_KM;

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1., 1.).asin();

    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * phi2.sin();
    let lambda2 = lambda1 + y.atan2(x);

    (phi2.to_degrees(), normalize_lon(lambda2.to_degrees()))
}

/// Geographical bounding box, named after the OpenSky query parameters.
///
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct BB {
    /// Latitude - Y0
    pub lamin: f64,
    /// Longitude - X0
    pub lomin: f64,
    /// Latitude - Y1
    pub lamax: f64,
    /// Longitude - X1
    pub lomax: f64,
}

impl BB {
    /// Take a lat lot tuple and create a bounding box of `dist` nautical miles away
    ///
    /// So from (lat, lon) we generate the following bounding box:
    /// (lat - dist, lon - dist, lat + dist, lon + dist)
    ///
    #[tracing::instrument]
    pub fn from_lat_lon(lat: f64, lon: f64, dist: u32) -> Self {
        let dist = dist as f64 / ONE_DEG_NM;

        Self {
            lamin: (lat - dist).max(-90.),
            lomin: (lon - dist).max(-180.),
            lamax: (lat + dist).min(90.),
            lomax: (lon + dist).min(180.),
        }
    }

    /// Query parameters as expected by the `/states/all` endpoint
    ///
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lamin", self.lamin.to_string()),
            ("lomin", self.lomin.to_string()),
            ("lamax", self.lamax.to_string()),
            ("lomax", self.lomax.to_string()),
        ]
    }
}

impl Display for BB {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.2},{:.2},{:.2},{:.2}",
            self.lamin, self.lomin, self.lamax, self.lomax
        )
    }
}

/// Parse `lamin,lomin,lamax,lomax`
///
impl FromStr for BB {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        trace!("bb::from_str({s})");

        let v = s
            .split(',')
            .map(|c| c.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| eyre!("bad bounding box {s}: {e}"))?;

        let &[lamin, lomin, lamax, lomax] = v.as_slice() else {
            return Err(eyre!("bounding box needs 4 values, got {}", v.len()));
        };
        if lamin > lamax || lomin > lomax {
            return Err(eyre!("bounding box {s} is inverted"));
        }
        if lamin < -90. || lamax > 90. || lomin < -180. || lomax > 180. {
            return Err(eyre!("bounding box {s} is out of range"));
        }
        Ok(BB {
            lamin,
            lomin,
            lamax,
            lomax,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tracing::info;

    #[inline]
    fn shorten(v: f64) -> String {
        format!("{:.3}", v)
    }

    #[test_pretty_log::test]
    fn test_project_east_on_equator() {
        let (lat, lon) = project(0., 0., 90., 50.);
        info!("lat={lat} lon={lon}");

        assert_eq!(shorten(0.), shorten(lat.abs()));
        assert!(lon > 0.);
        assert_eq!(shorten(50. / EARTH_RADIUS_KM * 180. / std::f64::consts::PI), shorten(lon));
    }

    #[test_pretty_log::test]
    fn test_project_north_one_degree() {
        let one_deg = EARTH_RADIUS_KM * std::f64::consts::PI / 180.;
        let (lat, lon) = project(50., 4., 0., one_deg);

        assert_eq!(shorten(51.), shorten(lat));
        assert_eq!(shorten(4.), shorten(lon));
    }

    #[test]
    fn test_project_zero_distance() {
        let (lat, lon) = project(54.7, -6.2, 123., 0.);

        assert_eq!(shorten(54.7), shorten(lat));
        assert_eq!(shorten(-6.2), shorten(lon));
    }

    #[rstest]
    #[case(179.9, 90.)]
    #[case(-179.9, 270.)]
    #[case(180., 90.)]
    #[case(0., 45.)]
    fn test_project_lon_range(#[case] lon: f64, #[case] bearing: f64) {
        let (_, lon2) = project(10., lon, bearing, 500.);

        assert!(lon2 > -180. && lon2 <= 180., "lon2={lon2}");
    }

    #[test]
    fn test_project_crosses_antimeridian() {
        let (_, lon) = project(0., 179.9, 90., 50.);
        assert!(lon < 0.);
    }

    #[rstest]
    #[case(-180., 180.)]
    #[case(180., 180.)]
    #[case(190., -170.)]
    #[case(-190., 170.)]
    #[case(540., 180.)]
    #[case(12.5, 12.5)]
    fn test_normalize_lon(#[case] inp: f64, #[case] out: f64) {
        assert_eq!(shorten(out), shorten(normalize_lon(inp)))
    }

    #[test_pretty_log::test]
    fn test_bb_from_lat_lon_bxl() {
        let bb = BB::from_lat_lon(50.8, 4.4, 25);

        assert_eq!(shorten(3.983), shorten(bb.lomin));
        assert_eq!(shorten(50.383), shorten(bb.lamin));
        assert_eq!(shorten(4.817), shorten(bb.lomax));
        assert_eq!(shorten(51.217), shorten(bb.lamax));
    }

    #[test]
    fn test_bb_from_str() -> Result<()> {
        let bb: BB = "45.8, 5.9, 47.8, 10.5".parse()?;

        assert_eq!(
            BB {
                lamin: 45.8,
                lomin: 5.9,
                lamax: 47.8,
                lomax: 10.5
            },
            bb
        );
        Ok(())
    }

    #[rstest]
    #[case("")]
    #[case("1,2,3")]
    #[case("a,b,c,d")]
    #[case("47.8,5.9,45.8,10.5")]
    #[case("-95,0,10,10")]
    fn test_bb_from_str_bad(#[case] s: &str) {
        assert!(s.parse::<BB>().is_err())
    }

    #[test]
    fn test_bb_to_query() {
        let bb = BB {
            lamin: 45.5,
            lomin: 5.,
            lamax: 47.,
            lomax: 10.25,
        };
        let q = bb.to_query();

        assert_eq!(("lamin", "45.5".to_string()), q[0]);
        assert_eq!(("lomax", "10.25".to_string()), q[3]);
    }
}
