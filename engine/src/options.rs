//! Knobs for the whole pipeline.
//!
//! There is a single pipeline, these options select what the different variants used to do
//! (heading lines or not, how many flights in the leaderboard, going through a CORS proxy).
//!

use std::time::Duration;

use serde::Serialize;

use contrail_common::BB;
use contrail_sources::{FetchError, Opensky, DEF_BASE_URL};

/// Default leaderboard size
pub const DEF_TOP_N: usize = 10;

/// Default length of the heading line, in km
pub const DEF_HEADING_KM: f64 = 50.;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PipelineOptions {
    /// Compute a heading segment for flights with a track angle
    pub include_heading: bool,
    /// Leaderboard & chart size
    pub top_n: usize,
    /// Prefix the upstream URL with this proxy
    pub cors_proxy: Option<String>,
    /// Length of the heading segment
    pub heading_km: f64,
    /// Restrict the query to this area
    pub bbox: Option<BB>,
    /// API endpoint
    pub base_url: String,
    /// Request timeout
    pub timeout: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            include_heading: true,
            top_n: DEF_TOP_N,
            cors_proxy: None,
            heading_km: DEF_HEADING_KM,
            bbox: None,
            base_url: DEF_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl PipelineOptions {
    /// Build the live source matching these options.
    ///
    pub fn site(&self) -> Result<Opensky, FetchError> {
        Opensky::new()
            .base_url(&self.base_url)
            .cors_proxy(self.cors_proxy.clone())
            .bbox(self.bbox)
            .timeout(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let o = PipelineOptions::default();

        assert!(o.include_heading);
        assert_eq!(10, o.top_n);
        assert_eq!(50., o.heading_km);
        assert!(o.cors_proxy.is_none());
        assert!(o.bbox.is_none());
    }

    #[test]
    fn test_options_site() -> Result<(), FetchError> {
        let o = PipelineOptions {
            cors_proxy: Some("https://proxy.example/?u=".to_string()),
            base_url: "http://localhost:8080/api/".to_string(),
            ..Default::default()
        };
        let site = o.site()?;

        assert_eq!("http://localhost:8080/api", site.base_url);
        assert_eq!(Some("https://proxy.example/?u=".to_string()), site.cors_proxy);
        Ok(())
    }
}
