use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("dataset API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("could not write dataset item {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialize dataset item: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
