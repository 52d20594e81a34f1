//! Module to deal with the different kind of sources we can get a snapshot from.
//!
//! - `Opensky` polls the live `/states/all` endpoint,
//! - `SnapshotFile` reads a previously saved answer.
//!
//! Both return the raw body, decoding is done by the caller so that the pipeline is the same
//! whatever the source.
//!

use std::fmt::Debug;
use std::future::Future;

use clap::{crate_name, crate_version};

pub use error::*;
pub use file::*;
pub use opensky::*;
pub use site::*;

mod error;
mod file;
mod opensky;
mod site;

#[macro_use]
mod macros;

const NAME: &str = crate_name!();
const VERSION: &str = crate_version!();

pub fn version() -> String {
    format!("{}/{}", NAME, VERSION)
}

/// Anything we can get one full snapshot from.
///
pub trait Fetchable: Debug + Send + Sync {
    fn name(&self) -> String;

    /// Retrieve one snapshot, as-is.
    ///
    fn fetch(&self) -> impl Future<Output = Result<String, FetchError>> + Send;
}
