//! All the sub-commands and what they share.
//!

use std::io;

use eyre::Result;
use tracing::trace;

use contrail_engine::{Dashboard, PipelineOptions, Sinks};
use contrail_sources::{Site, SnapshotFile};

use crate::{
    BarChart, Config, GeoJsonMap, LogMap, RefreshOpts, StderrNotifier, SummaryLine, TableBoard,
};

pub use list::*;
pub use refresh::*;
pub use watch::*;

mod list;
mod refresh;
mod watch;

/// The snapshot file if one was given, the live API otherwise.
///
#[tracing::instrument(skip(opts))]
pub fn site_from(opts: &PipelineOptions, ropts: &RefreshOpts) -> Result<Site> {
    let site = match &ropts.file {
        Some(fname) => Site::from(SnapshotFile::new(fname)),
        None => Site::from(opts.site()?),
    };
    trace!("using {site:?}");
    Ok(site)
}

/// Terminal sinks, plus the GeoJSON file if requested.
///
pub fn dashboard_from(
    cfg: &Config,
    opts: &PipelineOptions,
    ropts: &RefreshOpts,
) -> Result<Dashboard> {
    let sinks = Sinks {
        map: match &ropts.geojson {
            Some(fname) => Box::new(GeoJsonMap::new(fname)),
            None => Box::new(LogMap),
        },
        leaderboard: Box::new(TableBoard::new(io::stdout())),
        chart: Box::new(BarChart::new(io::stdout())),
        stats: Box::new(SummaryLine::new(io::stdout())),
        notifier: Box::new(StderrNotifier),
    };
    Ok(Dashboard::new(sinks, opts, cfg.resolver()?))
}
