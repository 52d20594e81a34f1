//! Configuration for `contrailctl`.
//!
//! Everything is optional, the defaults are those of `PipelineOptions` and command-line flags
//! win over the file:
//!
//! ```hcl
//! version = 1
//!
//! base_url = "https://opensky-network.org/api"
//! cors_proxy = "https://corsproxy.io/?url="
//! top_n = 10
//! include_heading = true
//! heading_km = 50
//! interval = 15
//! timeout = 30
//! airlines = "/home/me/.config/contrail/airlines.hcl"
//!
//! bbox {
//!   lamin = 45.8
//!   lomin = 5.9
//!   lamax = 47.8
//!   lomax = 10.5
//! }
//! ```
//!

use std::time::Duration;

use eyre::Result;
use serde::Deserialize;
use tracing::trace;

use contrail_common::{Versioned, BB};
use contrail_engine::PipelineOptions;
use contrail_formats::AirlineResolver;

use crate::RefreshOpts;

/// Current version
pub const CVERSION: usize = 1;

/// Default polling interval in seconds
pub const DEF_INTERVAL: u64 = 15;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Version number for safety
    pub version: usize,
    pub base_url: Option<String>,
    pub cors_proxy: Option<String>,
    pub top_n: Option<usize>,
    pub include_heading: Option<bool>,
    pub heading_km: Option<f64>,
    /// Seconds between polls for `watch`
    pub interval: Option<u64>,
    /// Request timeout in seconds
    pub timeout: Option<u64>,
    pub bbox: Option<BB>,
    /// Replacement airline table
    pub airlines: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: CVERSION,
            base_url: None,
            cors_proxy: None,
            top_n: None,
            include_heading: None,
            heading_km: None,
            interval: None,
            timeout: None,
            bbox: None,
            airlines: None,
        }
    }
}

impl Versioned for Config {
    const VERSION: usize = CVERSION;

    fn version(&self) -> usize {
        self.version
    }
}

impl Config {
    /// Merge file and command-line into the pipeline options.
    ///
    #[tracing::instrument(skip(self))]
    pub fn options(&self, ropts: &RefreshOpts) -> PipelineOptions {
        let def = PipelineOptions::default();

        let opts = PipelineOptions {
            include_heading: !ropts.no_heading
                && self.include_heading.unwrap_or(def.include_heading),
            top_n: ropts.top.or(self.top_n).unwrap_or(def.top_n),
            cors_proxy: ropts.proxy.clone().or_else(|| self.cors_proxy.clone()),
            heading_km: self.heading_km.unwrap_or(def.heading_km),
            bbox: ropts.bbox.or(self.bbox),
            base_url: self.base_url.clone().unwrap_or(def.base_url),
            timeout: self.timeout.map(Duration::from_secs),
        };
        trace!("{opts:?}");
        opts
    }

    /// Seconds between two polls, `--every` first.
    ///
    pub fn interval(&self, every: Option<u64>) -> Duration {
        Duration::from_secs(every.or(self.interval).unwrap_or(DEF_INTERVAL).max(1))
    }

    /// Airline table, the built-in one unless the configuration points to a file.
    ///
    pub fn resolver(&self) -> Result<AirlineResolver> {
        Ok(match &self.airlines {
            Some(fname) => AirlineResolver::from_file(fname)?,
            None => AirlineResolver::builtin(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    use contrail_common::{ConfigError, ConfigFile};

    use super::*;

    fn load(content: &str) -> Result<ConfigFile<Config>, ConfigError> {
        let mut f = NamedTempFile::new().unwrap();
        write!(f, "{}", content).unwrap();
        ConfigFile::<Config>::load(Some(f.path()))
    }

    #[test]
    fn test_config_full() -> Result<()> {
        let cfg = load(
            r##"
version = 1
base_url = "http://localhost:9090/api"
cors_proxy = "https://corsproxy.io/?url="
top_n = 5
include_heading = false
heading_km = 80
interval = 30
timeout = 10

bbox {
  lamin = 45.8
  lomin = 5.9
  lamax = 47.8
  lomax = 10.5
}
"##,
        )?;
        let cfg = cfg.inner();
        let opts = cfg.options(&RefreshOpts::default());

        assert_eq!(5, opts.top_n);
        assert!(!opts.include_heading);
        assert_eq!(80., opts.heading_km);
        assert_eq!("http://localhost:9090/api", opts.base_url);
        assert_eq!(Some("https://corsproxy.io/?url=".to_string()), opts.cors_proxy);
        assert_eq!(Some(Duration::from_secs(10)), opts.timeout);
        assert_eq!(Some(45.8), opts.bbox.map(|b| b.lamin));
        assert_eq!(Duration::from_secs(30), cfg.interval(None));
        Ok(())
    }

    #[test]
    fn test_config_minimal() -> Result<()> {
        let cfg = load("version = 1\n")?;
        let opts = cfg.inner().options(&RefreshOpts::default());

        assert_eq!(PipelineOptions::default(), opts);
        assert_eq!(Duration::from_secs(DEF_INTERVAL), cfg.inner().interval(None));
        Ok(())
    }

    #[test]
    fn test_config_bad_version() {
        let cfg = load("version = 2\n");

        assert!(matches!(cfg, Err(ConfigError::BadFileVersion { found: 2, .. })));
    }

    #[rstest]
    #[case(None, None, 10)]
    #[case(Some(3), None, 3)]
    #[case(None, Some(7), 7)]
    #[case(Some(3), Some(7), 7)]
    fn test_config_top_n(
        #[case] file: Option<usize>,
        #[case] flag: Option<usize>,
        #[case] res: usize,
    ) {
        let cfg = Config {
            top_n: file,
            ..Default::default()
        };
        let ropts = RefreshOpts {
            top: flag,
            ..Default::default()
        };

        assert_eq!(res, cfg.options(&ropts).top_n);
    }

    #[test]
    fn test_config_flags_win() {
        let cfg = Config {
            include_heading: Some(true),
            cors_proxy: Some("https://a.example/?".to_string()),
            ..Default::default()
        };
        let ropts = RefreshOpts {
            no_heading: true,
            proxy: Some("https://b.example/?".to_string()),
            ..Default::default()
        };
        let opts = cfg.options(&ropts);

        assert!(!opts.include_heading);
        assert_eq!(Some("https://b.example/?".to_string()), opts.cors_proxy);
        assert_eq!(Duration::from_secs(5), cfg.interval(Some(5)));
    }

    #[test]
    fn test_config_resolver() -> Result<()> {
        assert!(!Config::default().resolver()?.is_empty());

        let cfg = Config {
            airlines: Some("/nonexistent/airlines.hcl".to_string()),
            ..Default::default()
        };
        assert!(cfg.resolver().is_err());
        Ok(())
    }
}
