use eyre::Result;

use crate::Config;

/// Airline table in use, built-in or from the configuration.
///
pub fn list_airlines(cfg: &Config) -> Result<String> {
    Ok(cfg.resolver()?.list())
}
