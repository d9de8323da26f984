use std::path::PathBuf;

/// Process-level settings for a scrape run, read once from the environment.
///
/// Job input (targets, mode, credential) is not part of this; see
/// [`crate::JobConfig`].
#[derive(Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Pause after every processed target, success or failure.
    pub inter_item_delay_ms: u64,
    pub instagram_base_url: String,
    pub apify_token: Option<String>,
    /// Presence of a dataset id is what enables record pushing.
    pub dataset_id: Option<String>,
    pub apify_api_base_url: String,
    pub local_storage_dir: PathBuf,
    pub key_value_store_id: String,
}

impl RuntimeConfig {
    /// Location of the actor input document inside local storage:
    /// `{storage}/key_value_stores/{store}/INPUT.json`.
    #[must_use]
    pub fn input_path(&self) -> PathBuf {
        self.local_storage_dir
            .join("key_value_stores")
            .join(&self.key_value_store_id)
            .join("INPUT.json")
    }

    /// Directory that holds local dataset items for `dataset_id`.
    #[must_use]
    pub fn local_dataset_dir(&self, dataset_id: &str) -> PathBuf {
        self.local_storage_dir.join("datasets").join(dataset_id)
    }
}

impl std::fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_item_delay_ms", &self.inter_item_delay_ms)
            .field("instagram_base_url", &self.instagram_base_url)
            .field(
                "apify_token",
                &self.apify_token.as_ref().map(|_| "[redacted]"),
            )
            .field("dataset_id", &self.dataset_id)
            .field("apify_api_base_url", &self.apify_api_base_url)
            .field("local_storage_dir", &self.local_storage_dir)
            .field("key_value_store_id", &self.key_value_store_id)
            .finish()
    }
}
