//! This is the module handling the `refresh` sub-command.
//!

use eyre::{eyre, Result};
use tracing::{info, trace};

use contrail_engine::{refresh_and_render, Applied, Engine};

use crate::{dashboard_from, site_from, Config, RefreshOpts};

/// Poll once and display.
///
#[tracing::instrument(skip(cfg))]
pub async fn refresh_once(cfg: &Config, ropts: &RefreshOpts) -> Result<()> {
    trace!("refresh_once");

    let opts = cfg.options(ropts);
    let site = site_from(&opts, ropts)?;
    let board = dashboard_from(cfg, &opts, ropts)?;
    let engine = Engine::new(site, opts);

    let res = refresh_and_render(&engine, &board).await;
    info!("{}", engine.stats() + board.stats());

    match res {
        Applied::Failed(_) => Err(eyre!("no data")),
        _ => Ok(()),
    }
}
