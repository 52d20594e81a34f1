//! Module describing all possible commands and sub-commands to the `contrailctl` main driver
//!
//! We have two main commands:
//!
//! - `refresh`
//! - `watch`
//!
//! `refresh` polls once, runs the pipeline and displays the leaderboard, chart and fleet
//! summary on the terminal.  The map markers can be saved as a GeoJSON file.
//!
//! `watch` does the same on a timer, a refresh can also be triggered manually by pressing
//! Enter.  It stops on Ctrl-C or after the given duration.
//!
//! `list airlines` shows the airline table used for name resolution and `completion` is here
//! just to configure the various shells completion system.
//!

use std::path::PathBuf;

use clap::{crate_authors, crate_description, crate_name, crate_version, Parser, ValueEnum};
use clap_complete::shells::Shell;

use contrail_common::BB;

/// CLI options
#[derive(Parser)]
#[command(disable_version_flag = true)]
#[clap(name = crate_name!(), about = crate_description!())]
#[clap(version = crate_version!(), author = crate_authors!())]
pub struct Opts {
    /// configuration file.
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
    /// Use hierarchical logging output.
    #[clap(short = 'T', long)]
    pub tree: bool,
    /// Also log into hourly files in this directory.
    #[clap(long)]
    pub log_dir: Option<String>,
    /// Sub-commands (see below).
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

// ------

/// All sub-commands:
///
/// `completion SHELL`
/// `refresh [--file FILE] [--geojson FILE] [-n N] [--no-heading]`
/// `watch [--every S] [--duration S] <refresh options>`
/// `list airlines`
/// `version`
///
#[derive(Debug, Parser)]
pub enum SubCommand {
    /// Generate Completion stuff
    Completion(ComplOpts),
    /// Poll once and display the result
    Refresh(RefreshOpts),
    /// Poll periodically, Enter for a manual refresh
    Watch(WatchOpts),
    /// List built-in tables
    List(ListOpts),
    /// List all package versions
    Version,
}

// ------

/// Options for one refresh, these override the configuration file.
///
#[derive(Debug, Default, Parser)]
pub struct RefreshOpts {
    /// Read a saved snapshot instead of polling the API.
    #[clap(short = 'f', long)]
    pub file: Option<PathBuf>,
    /// Write the map markers into this GeoJSON file.
    #[clap(short = 'G', long)]
    pub geojson: Option<PathBuf>,
    /// Leaderboard size.
    #[clap(short = 'n', long)]
    pub top: Option<usize>,
    /// Do not compute heading segments.
    #[clap(long)]
    pub no_heading: bool,
    /// Restrict to "lamin,lomin,lamax,lomax".
    #[clap(short = 'B', long)]
    pub bbox: Option<BB>,
    /// Go through this CORS proxy.
    #[clap(long)]
    pub proxy: Option<String>,
}

/// Options for `watch`.
///
#[derive(Debug, Parser)]
pub struct WatchOpts {
    /// Seconds between two polls.
    #[clap(short = 'e', long)]
    pub every: Option<u64>,
    /// Stop after that many seconds.
    #[clap(short = 'd', long)]
    pub duration: Option<u64>,
    #[clap(flatten)]
    pub refresh: RefreshOpts,
}

// ------

/// Options to generate completion files at runtime
///
#[derive(Debug, Parser)]
pub struct ComplOpts {
    #[clap(value_parser)]
    pub shell: Shell,
}

// ------

/// All `list` sub-commands:
///
/// `list airlines`
///
#[derive(Debug, Parser)]
pub struct ListOpts {
    #[clap(value_parser)]
    pub cmd: ListSubCommand,
}

/// These are the sub-commands for `list`
///
#[derive(Clone, Copy, Debug, Ord, PartialOrd, Eq, PartialEq, ValueEnum)]
pub enum ListSubCommand {
    /// List the airline designators known for name resolution
    Airlines,
}
