use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstagramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("profile not found: {0}")]
    NotFound(String),

    #[error("rate limited by Instagram (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("request rejected with HTTP {status}; the session may be missing or expired")]
    Unauthorized { status: u16 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("login required for this request")]
    LoginRequired,

    #[error("Instagram API error: {0}")]
    Api(String),

    #[error("invalid username \"{0}\"")]
    InvalidUsername(String),

    #[error("invalid profile id \"{0}\"")]
    InvalidProfileId(String),

    #[error("session authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
