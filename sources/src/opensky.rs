//! OpenSky (.org) specific code
//!
//! We only use the anonymous `/states/all` endpoint which returns the current `StateList` for
//! the whole world or a bounding box.  Anonymous access has a 10s resolution so there is no
//! point in polling more often than that.
//!
//! Browsers can not call the API directly (no CORS headers), hence the optional proxy which
//! gets the full upstream URL percent-encoded and appended to it.
//!

use std::time::Duration;

use chrono::Utc;
use clap::{crate_name, crate_version};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};
use tracing::{debug, trace};

use contrail_common::BB;

use crate::{http_get, FetchError, Fetchable};

/// Public API endpoint
pub const DEF_BASE_URL: &str = "https://opensky-network.org/api";

/// Route for all state vectors
const DEF_GET: &str = "/states/all";

/// Default request timeout
const DEF_TIMEOUT: Duration = Duration::from_secs(30);

/// This is the Opensky client/source struct.
///
#[derive(Clone, Debug)]
pub struct Opensky {
    /// Base site url taken from config
    pub base_url: String,
    /// Add this to `base_url` to fetch data
    pub get: String,
    /// Prefix for the percent-encoded URL
    pub cors_proxy: Option<String>,
    /// Restrict to this area
    pub bbox: Option<BB>,
    /// reqwest async client
    pub client: Client,
}

impl Opensky {
    #[tracing::instrument]
    pub fn new() -> Self {
        trace!("opensky::new");

        Opensky {
            base_url: DEF_BASE_URL.to_owned(),
            get: DEF_GET.to_owned(),
            cors_proxy: None,
            bbox: None,
            client: Client::new(),
        }
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_owned();
        self
    }

    pub fn cors_proxy(mut self, proxy: Option<String>) -> Self {
        self.cors_proxy = proxy.filter(|p| !p.is_empty());
        self
    }

    pub fn bbox(mut self, bbox: Option<BB>) -> Self {
        self.bbox = bbox;
        self
    }

    /// Replace the client by one with a request timeout, `None` means the default one.
    ///
    pub fn timeout(mut self, timeout: Option<Duration>) -> Result<Self, FetchError> {
        self.client = Client::builder()
            .timeout(timeout.unwrap_or(DEF_TIMEOUT))
            .build()?;
        Ok(self)
    }

    /// Final URL for a poll at `now` (in ms), including the cache-busting parameter and going
    /// through the proxy if there is one.
    ///
    pub fn url(&self, now: i64) -> Result<String, FetchError> {
        let base = format!("{}{}", self.base_url, self.get);

        let mut params = self.bbox.map(|bb| bb.to_query()).unwrap_or_default();
        params.push(("_", now.to_string()));

        let url = Url::parse_with_params(&base, &params).map_err(|e| FetchError::BadUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;

        let url = match &self.cors_proxy {
            Some(proxy) => format!(
                "{}{}",
                proxy,
                utf8_percent_encode(url.as_str(), NON_ALPHANUMERIC)
            ),
            None => url.to_string(),
        };
        Ok(url)
    }
}

impl Default for Opensky {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetchable for Opensky {
    fn name(&self) -> String {
        "opensky".to_string()
    }

    /// Single call API
    ///
    #[tracing::instrument(skip(self))]
    async fn fetch(&self) -> Result<String, FetchError> {
        trace!("opensky::fetch");

        let url = self.url(Utc::now().timestamp_millis())?;
        trace!("Fetching data from {}…", url);

        let resp = http_get!(self, &url).await?;
        debug!("{:?}", &resp);

        // Check status
        //
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        trace!("Fetching raw data");
        Ok(resp.text().await?)
    }
}
