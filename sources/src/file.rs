//! Saved snapshot, for offline use.
//!
//! Any answer from `/states/all` saved with `curl -o` can be replayed through the pipeline.
//!

use std::path::PathBuf;

use tracing::trace;

use crate::{FetchError, Fetchable};

#[derive(Clone, Debug)]
pub struct SnapshotFile {
    pub path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotFile { path: path.into() }
    }
}

impl Fetchable for SnapshotFile {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    /// The file is read again at every call, it can be replaced between polls.
    ///
    #[tracing::instrument(skip(self))]
    async fn fetch(&self) -> Result<String, FetchError> {
        trace!("reading {:?}", self.path);

        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FetchError::File {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })
    }
}
