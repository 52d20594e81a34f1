//! This is the contrail engine.
//!
//! It takes a `Fetchable` source and turns every snapshot into:
//!
//! - a `FleetSummary` over all flights with a valid position,
//! - a ranking of the top-N flights by estimated CO₂ emission rate,
//! - map markers with an optional heading segment.
//!
//! The pure part (`estimate`, `aggregate`, `process()`) does not know anything about I/O,
//! `Engine` adds the fetch and `Dashboard` the render sinks.
//!

use clap::{crate_name, crate_version};

pub use aggregate::*;
pub use dashboard::*;
pub use estimate::*;
pub use options::*;
pub use pipeline::*;
pub use sink::*;
pub use stats::*;

mod aggregate;
mod dashboard;
mod estimate;
mod options;
mod pipeline;
mod sink;
mod stats;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

/// Returns the library version
///
pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
