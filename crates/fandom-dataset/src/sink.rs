use async_trait::async_trait;

use crate::error::DatasetError;

/// Destination for scraped records, one JSON object per call.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Store one item. Items must land in call order.
    async fn push(&mut self, item: &serde_json::Value) -> Result<(), DatasetError>;

    /// Short human-readable description for logs, e.g. `"dataset abc123"`.
    fn describe(&self) -> String;
}
