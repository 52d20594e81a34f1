use std::io;

use clap::{crate_authors, crate_description, crate_version, CommandFactory, Parser};
use clap_complete::generate;
use eyre::Result;
use tokio::runtime::Builder;
use tracing::{info, trace};

use contrail_common::{init_logging, ConfigFile};
use contrailctl::{list_airlines, refresh_once, watch, Config, ListSubCommand, Opts, SubCommand};

/// Binary name, using a different binary name
pub const NAME: &str = env!("CARGO_BIN_NAME");
/// Binary version
pub const VERSION: &str = crate_version!();
/// Authors
pub const AUTHORS: &str = crate_authors!();

fn main() -> Result<()> {
    let opts = Opts::parse();

    // Initialise logging.
    //
    init_logging(NAME, opts.tree, opts.log_dir.clone())?;

    let cfg = ConfigFile::<Config>::load(opts.config.as_deref())?;
    if let Some(fname) = cfg.source() {
        info!("Using {fname:?}");
    }

    // Banner
    //
    banner()?;

    let rt = Builder::new_multi_thread().enable_all().build()?;
    let res = rt.block_on(handle_subcmd(cfg.inner(), &opts.subcmd));

    // The stdin reader of `watch` can not be cancelled, do not wait for it
    //
    rt.shutdown_background();
    res
}

pub async fn handle_subcmd(cfg: &Config, subcmd: &SubCommand) -> Result<()> {
    match subcmd {
        // Handle `refresh`
        //
        SubCommand::Refresh(ropts) => {
            trace!("refresh");

            refresh_once(cfg, ropts).await?;
        }

        // Handle `watch`
        //
        SubCommand::Watch(wopts) => {
            trace!("watch");

            watch(cfg, wopts).await?;
        }

        // Standalone completion generation
        //
        // NOTE: you can generate UNIX shells completion on Windows and vice-versa.  Not worth
        //       trying to limit depending on the OS.
        //
        SubCommand::Completion(copts) => {
            let generator = copts.shell;
            generate(generator, &mut Opts::command(), NAME, &mut io::stdout());
        }

        // Standalone `list` command
        //
        SubCommand::List(lopts) => match lopts.cmd {
            ListSubCommand::Airlines => {
                info!("Listing all airlines:");

                let str = list_airlines(cfg)?;
                eprintln!("{}", str);
            }
        },

        // Standalone `version` command
        //
        SubCommand::Version => {
            eprintln!("Modules: ");
            eprintln!("\t{}", contrail_common::version());
            eprintln!("\t{}", contrail_sources::version());
            eprintln!("\t{}", contrail_engine::version());
        }
    }
    Ok(())
}

/// Display banner
///
fn banner() -> Result<()> {
    Ok(eprintln!(
        r##"
{}/{} by {}
{}
"##,
        NAME,
        VERSION,
        AUTHORS,
        crate_description!()
    ))
}
