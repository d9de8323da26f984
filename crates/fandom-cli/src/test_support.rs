//! In-memory stand-ins for the platform client and the dataset sink.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fandom_core::Attributes;
use fandom_dataset::{DatasetError, RecordSink};
use fandom_instagram::{InstagramError, PlatformClient};
use serde_json::Value;

pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

pub(crate) fn attrs(value: Value) -> Attributes {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Deterministic platform client. Unknown usernames fail with `NotFound`.
#[derive(Default)]
pub(crate) struct MockPlatform {
    profiles: HashMap<String, Attributes>,
    followers: HashMap<String, Vec<Attributes>>,
    reject_credentials: bool,
    fail_followers: bool,
    calls: CallLog,
}

impl MockPlatform {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_profile(mut self, username: &str, profile: Value) -> Self {
        self.profiles.insert(username.to_owned(), attrs(profile));
        self
    }

    pub(crate) fn with_followers(mut self, pk: &str, followers: &[Value]) -> Self {
        self.followers.insert(
            pk.to_owned(),
            followers.iter().cloned().map(attrs).collect(),
        );
        self
    }

    pub(crate) fn rejecting_credentials(mut self) -> Self {
        self.reject_credentials = true;
        self
    }

    pub(crate) fn failing_followers(mut self) -> Self {
        self.fail_followers = true;
        self
    }

    pub(crate) fn calls(&self) -> CallLog {
        Arc::clone(&self.calls)
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PlatformClient for MockPlatform {
    async fn authenticate(&mut self, credential: &str) -> Result<(), InstagramError> {
        self.record(format!("authenticate:{credential}"));
        if self.reject_credentials {
            return Err(InstagramError::AuthenticationFailed(
                "session id was rejected".to_owned(),
            ));
        }
        Ok(())
    }

    async fn fetch_profile(&self, username: &str) -> Result<Attributes, InstagramError> {
        self.record(format!("fetch_profile:{username}"));
        self.profiles
            .get(username)
            .cloned()
            .ok_or_else(|| InstagramError::NotFound(username.to_owned()))
    }

    async fn fetch_followers(
        &self,
        profile_id: &str,
        limit: u32,
    ) -> Result<Vec<Attributes>, InstagramError> {
        self.record(format!("fetch_followers:{profile_id}:{limit}"));
        if self.fail_followers {
            return Err(InstagramError::RateLimited {
                retry_after_secs: 60,
            });
        }
        let mut followers = self.followers.get(profile_id).cloned().unwrap_or_default();
        followers.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(followers)
    }
}

/// Sink that keeps every pushed item, or rejects them all.
pub(crate) struct RecordingSink {
    items: Arc<Mutex<Vec<Value>>>,
    fail: bool,
}

impl RecordingSink {
    pub(crate) fn new() -> (Self, Arc<Mutex<Vec<Value>>>) {
        let items = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                items: Arc::clone(&items),
                fail: false,
            },
            items,
        )
    }

    pub(crate) fn failing() -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    async fn push(&mut self, item: &Value) -> Result<(), DatasetError> {
        if self.fail {
            return Err(DatasetError::Api {
                status: 503,
                message: "dataset unavailable".to_owned(),
            });
        }
        self.items.lock().unwrap().push(item.clone());
        Ok(())
    }

    fn describe(&self) -> String {
        "recording sink".to_owned()
    }
}
