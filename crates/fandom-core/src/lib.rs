pub mod app_config;
pub mod config;
pub mod input;
pub mod records;

use thiserror::Error;

pub use app_config::RuntimeConfig;
pub use config::{load_runtime_config, load_runtime_config_from_env};
pub use input::{
    resolve_job_input, InputSource, JobConfig, Mode, ResolvedInput, DEFAULT_FOLLOWER_LIMIT,
};
pub use records::{format_scraped_at, Attributes, JobSummary, ProfileRecord, PLATFORM};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("could not read job input from {path}: {source}")]
    InputRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse job input from {origin}: {source}")]
    InputParse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown mode \"{0}\" (expected \"enrich\" or \"followers\")")]
    UnknownMode(String),
}
