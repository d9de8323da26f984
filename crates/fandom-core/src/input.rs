//! Job input resolution.
//!
//! The actor input document arrives either as a JSON file in local storage or
//! as a serialized string in `APIFY_INPUT`. The file wins when it exists.
//! A document that cannot be read or parsed never aborts the job: the
//! resolver logs a warning and falls back to an empty job.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::ConfigError;

/// Environment variable carrying a serialized input document.
pub const INPUT_ENV_VAR: &str = "APIFY_INPUT";

/// Environment variable carrying an Instagram session id.
pub const SESSION_ENV_VAR: &str = "IG_SESSION_ID";

/// Follower cap used when the input document has no `limit`.
pub const DEFAULT_FOLLOWER_LIMIT: u32 = 100;

/// Which fetch behavior applies to every target in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Enrich,
    Followers,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Enrich => "enrich",
            Mode::Followers => "followers",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enrich" => Ok(Mode::Enrich),
            "followers" => Ok(Mode::Followers),
            _ => Err(ConfigError::UnknownMode(s.to_owned())),
        }
    }
}

/// Resolved job input. Built once at start-up and never mutated.
#[derive(Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub targets: Vec<String>,
    pub mode: Mode,
    pub credential: Option<String>,
    /// Upper bound on followers collected per profile in `followers` mode.
    pub follower_limit: u32,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            mode: Mode::Enrich,
            credential: None,
            follower_limit: DEFAULT_FOLLOWER_LIMIT,
        }
    }
}

impl std::fmt::Debug for JobConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobConfig")
            .field("targets", &self.targets)
            .field("mode", &self.mode)
            .field(
                "credential",
                &self.credential.as_ref().map(|_| "[redacted]"),
            )
            .field("follower_limit", &self.follower_limit)
            .finish()
    }
}

/// Where the job input came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Env,
    /// Nothing usable was found, or the document was malformed.
    Empty,
}

/// Output of the resolver: the job plus the environment-supplied credential.
///
/// The credential from the environment is carried separately so the session
/// initializer can apply its own precedence without reading the environment.
#[derive(Clone)]
pub struct ResolvedInput {
    pub job: JobConfig,
    pub env_credential: Option<String>,
    pub source: InputSource,
}

impl std::fmt::Debug for ResolvedInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedInput")
            .field("job", &self.job)
            .field(
                "env_credential",
                &self.env_credential.as_ref().map(|_| "[redacted]"),
            )
            .field("source", &self.source)
            .finish()
    }
}

/// Raw shape of the actor input document. Unknown fields are ignored.
///
/// Only `usernames` is strictly typed. The optional fields are read as raw
/// JSON so a badly typed value loses that field, not the whole job.
#[derive(Debug, Default, Deserialize)]
struct ActorInput {
    #[serde(default)]
    usernames: Option<Vec<String>>,
    #[serde(default)]
    mode: Option<Value>,
    #[serde(default)]
    session_id: Option<Value>,
    #[serde(default)]
    limit: Option<Value>,
}

/// Resolve job input from `input_path` and the process environment.
#[must_use]
pub fn resolve_job_input(input_path: &Path) -> ResolvedInput {
    resolve_with(input_path, |key| std::env::var(key))
}

/// Build the job from the input file or the `lookup`-provided environment.
fn resolve_with<F>(input_path: &Path, lookup: F) -> ResolvedInput
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let env_credential = non_empty(lookup(SESSION_ENV_VAR).ok());

    let (loaded, source) = if input_path.exists() {
        (
            read_input_file(input_path),
            InputSource::File(input_path.to_path_buf()),
        )
    } else {
        match non_empty(lookup(INPUT_ENV_VAR).ok()) {
            Some(raw) => (parse_actor_input(&raw, INPUT_ENV_VAR), InputSource::Env),
            None => (Ok(ActorInput::default()), InputSource::Empty),
        }
    };

    let (job, source) = match loaded {
        Ok(input) => (into_job_config(input), source),
        Err(e) => {
            tracing::warn!(error = %e, "could not load job input; continuing with an empty job");
            (JobConfig::default(), InputSource::Empty)
        }
    };

    ResolvedInput {
        job,
        env_credential,
        source,
    }
}

fn read_input_file(path: &Path) -> Result<ActorInput, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::InputRead {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_actor_input(&raw, &path.display().to_string())
}

fn parse_actor_input(raw: &str, origin: &str) -> Result<ActorInput, ConfigError> {
    serde_json::from_str::<ActorInput>(raw).map_err(|e| ConfigError::InputParse {
        origin: origin.to_owned(),
        source: e,
    })
}

fn into_job_config(input: ActorInput) -> JobConfig {
    let targets = input
        .usernames
        .unwrap_or_default()
        .into_iter()
        .map(|u| normalize_username(&u))
        .collect();

    let mode = match optional_string("mode", input.mode) {
        None => Mode::Enrich,
        Some(raw) => raw.parse::<Mode>().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to enrich mode");
            Mode::Enrich
        }),
    };

    JobConfig {
        targets,
        mode,
        credential: non_empty(optional_string("session_id", input.session_id)),
        follower_limit: follower_limit(input.limit),
    }
}

/// Reads an optional string field. Any other JSON type is dropped with a
/// warning.
fn optional_string(field: &str, value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => {
            tracing::warn!(field, kind = json_kind(&other), "ignoring non-string input field");
            None
        }
    }
}

/// Reads `limit` as a non-negative integer that fits in `u32`. Anything else
/// falls back to [`DEFAULT_FOLLOWER_LIMIT`] with a warning.
fn follower_limit(value: Option<Value>) -> u32 {
    let Some(value) = value.filter(|v| !v.is_null()) else {
        return DEFAULT_FOLLOWER_LIMIT;
    };
    match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
        Some(limit) => limit,
        None => {
            tracing::warn!(
                value = %value,
                default = DEFAULT_FOLLOWER_LIMIT,
                "ignoring invalid limit"
            );
            DEFAULT_FOLLOWER_LIMIT
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Trims whitespace and a single leading `@`. Empty names are kept so every
/// input entry still yields a record.
fn normalize_username(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed).to_owned()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
