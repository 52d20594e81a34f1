//! This library is there to share some common code amongst all contrail modules.
//!
//! - unit conversions (`to_kmh()`, `to_feet()`)
//! - great-circle projection and bounding boxes
//! - logging initialisation
//! - versioned configuration file loading
//!

mod config;
mod geo;
mod logging;
mod macros;
mod units;

use clap::{crate_name, crate_version};

pub use config::*;
pub use geo::*;
pub use logging::*;
pub use units::*;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}
