//! This is the module handling the `watch` sub-command.
//!
//! Every trigger (timer tick or a line on stdin) spawns a refresh.  Refreshes may overlap if
//! the API is slow, the `Dashboard` only ever shows the latest one.
//!

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use eyre::Result;
use tokio::io::{stdin, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use contrail_engine::{refresh_and_render, Applied, Dashboard, Engine};
use contrail_sources::Site;

use crate::{dashboard_from, site_from, Config, WatchOpts};

/// Why a refresh was started
///
#[derive(Clone, Copy, Debug)]
enum Trigger {
    Timer,
    Manual,
}

/// Poll until Ctrl-C or the end of `--duration`.
///
#[tracing::instrument(skip(cfg))]
pub async fn watch(cfg: &Config, wopts: &WatchOpts) -> Result<()> {
    trace!("watch");

    let ropts = &wopts.refresh;
    let opts = cfg.options(ropts);
    let site = site_from(&opts, ropts)?;
    let board = Arc::new(dashboard_from(cfg, &opts, ropts)?);
    let engine = Arc::new(Engine::new(site, opts));

    let every = cfg.interval(wopts.every);
    info!("Polling every {}s, press Enter to refresh now", every.as_secs());

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let deadline = async {
        match wopts.duration {
            Some(secs) => sleep(Duration::from_secs(secs)).await,
            None => pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut lines = BufReader::new(stdin()).lines();
    let mut stdin_open = true;
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => spawn_refresh(&mut tasks, &engine, &board, Trigger::Timer),
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(_)) => spawn_refresh(&mut tasks, &engine, &board, Trigger::Manual),
                _ => {
                    debug!("stdin closed, timer only");
                    stdin_open = false;
                }
            },
            Some(res) = tasks.join_next() => {
                if let Err(e) = res {
                    warn!("refresh task: {e}");
                }
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
            _ = &mut deadline => {
                info!("Done");
                break;
            }
        }
    }

    // Let in-flight refreshes finish
    //
    while tasks.join_next().await.is_some() {}

    eprintln!("{}", engine.stats() + board.stats());
    Ok(())
}

fn spawn_refresh(
    tasks: &mut JoinSet<Applied>,
    engine: &Arc<Engine<Site>>,
    board: &Arc<Dashboard>,
    trigger: Trigger,
) {
    trace!("{trigger:?} refresh");

    let engine = Arc::clone(engine);
    let board = Arc::clone(board);
    tasks.spawn(async move { refresh_and_render(&engine, &board).await });
}
