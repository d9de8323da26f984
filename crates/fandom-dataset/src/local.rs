//! Dataset sink that mirrors the Apify local storage layout.
//!
//! Each item becomes `{dir}/{NNNNNNNNN}.json`, numbered from 1 with nine
//! digits. Numbering continues after any items already in the directory so
//! an earlier run is never overwritten.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::DatasetError;
use crate::sink::RecordSink;

pub struct LocalDatasetSink {
    dir: PathBuf,
    next_index: Option<u64>,
}

impl LocalDatasetSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_index: None,
        }
    }

    /// Creates the directory and finds the first free index.
    async fn prepare(&self) -> Result<u64, DatasetError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;
        let mut highest = 0u64;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.dir, e))?
        {
            if let Some(index) = item_index(&entry.path()) {
                highest = highest.max(index);
            }
        }
        Ok(highest + 1)
    }
}

#[async_trait]
impl RecordSink for LocalDatasetSink {
    async fn push(&mut self, item: &serde_json::Value) -> Result<(), DatasetError> {
        let index = match self.next_index {
            Some(index) => index,
            None => self.prepare().await?,
        };

        let path = self.dir.join(format!("{index:09}.json"));
        let body = serde_json::to_vec_pretty(item)?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| io_error(&path, e))?;

        self.next_index = Some(index + 1);
        tracing::debug!(path = %path.display(), "wrote local dataset item");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("local dataset {}", self.dir.display())
    }
}

/// Parses `000000042.json` into `42`. Anything else is ignored.
fn item_index(path: &Path) -> Option<u64> {
    if path.extension()? != "json" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.len() != 9 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

fn io_error(path: &Path, source: std::io::Error) -> DatasetError {
    DatasetError::Io {
        path: path.display().to_string(),
        source,
    }
}
