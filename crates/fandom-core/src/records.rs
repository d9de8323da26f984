use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Identifier injected into every successful record.
pub const PLATFORM: &str = "instagram";

/// Free-form attribute mapping as returned by the platform.
pub type Attributes = serde_json::Map<String, Value>;

/// The result of scraping one target. Exactly one is produced per target.
///
/// Serializes flat: a scraped record is the attribute map itself, a failed
/// record is `{"username": ..., "error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProfileRecord {
    Scraped(Attributes),
    Failed { username: String, error: String },
}

impl ProfileRecord {
    /// Builds a successful record, injecting `platform` and `scrapedAt`.
    ///
    /// Both keys overwrite any same-named attribute from the platform.
    #[must_use]
    pub fn scraped(mut attributes: Attributes, scraped_at: DateTime<Utc>) -> Self {
        attributes.insert("platform".to_owned(), Value::from(PLATFORM));
        attributes.insert(
            "scrapedAt".to_owned(),
            Value::from(format_scraped_at(scraped_at)),
        );
        Self::Scraped(attributes)
    }

    /// Builds a failure record. An empty error message is replaced so the
    /// `error` field is never blank.
    pub fn failed(username: impl Into<String>, error: impl std::fmt::Display) -> Self {
        let mut error = error.to_string();
        if error.trim().is_empty() {
            error = "unknown error".to_owned();
        }
        Self::Failed {
            username: username.into(),
            error,
        }
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Looks up a top-level field as it appears in the serialized record.
    #[cfg(test)]
    pub(crate) fn field(&self, key: &str) -> Option<Value> {
        match self {
            Self::Scraped(attributes) => attributes.get(key).cloned(),
            Self::Failed { username, error } => match key {
                "username" => Some(Value::from(username.as_str())),
                "error" => Some(Value::from(error.as_str())),
                _ => None,
            },
        }
    }

    /// Returns the record as a JSON value, ready to hand to a sink.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scraped(attributes) => Value::Object(attributes.clone()),
            Self::Failed { username, error } => {
                serde_json::json!({ "username": username, "error": error })
            }
        }
    }
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SSZ`.
#[must_use]
pub fn format_scraped_at(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Totals reported when a run finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobSummary {
    pub records: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Records accepted by the sink. Zero when no sink is configured.
    pub pushed: usize,
}
