//! A `Site` is where the CLI gets its snapshots from, chosen at runtime.
//!

use crate::{FetchError, Fetchable, Opensky, SnapshotFile};

#[derive(Clone, Debug)]
pub enum Site {
    Opensky(Opensky),
    File(SnapshotFile),
}

impl Fetchable for Site {
    fn name(&self) -> String {
        match self {
            Site::Opensky(s) => s.name(),
            Site::File(s) => s.name(),
        }
    }

    async fn fetch(&self) -> Result<String, FetchError> {
        match self {
            Site::Opensky(s) => s.fetch().await,
            Site::File(s) => s.fetch().await,
        }
    }
}

impl From<Opensky> for Site {
    fn from(s: Opensky) -> Self {
        Site::Opensky(s)
    }
}

impl From<SnapshotFile> for Site {
    fn from(s: SnapshotFile) -> Self {
        Site::File(s)
    }
}
