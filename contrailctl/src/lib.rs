//! Library part of the `contrailctl` utility.
//!
//! The pipeline itself is in `contrail-engine`, here we only have the command-line parsing,
//! the configuration file and the terminal sinks.
//!

pub use cli::*;
pub use cmds::*;
pub use config::*;
pub use sinks::*;

mod cli;
mod cmds;
mod config;
mod sinks;
