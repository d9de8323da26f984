//! HTTP client for Instagram's web/private profile endpoints.
//!
//! Profile lookups work anonymously. Follower lists and session validation
//! need a `sessionid` cookie, attached by [`PlatformClient::authenticate`].
//! There is no retry logic: a 429 surfaces as
//! [`InstagramError::RateLimited`] and the caller decides what to do.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use fandom_core::Attributes;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};

use crate::error::InstagramError;
use crate::normalize::{normalize_follower, normalize_user};
use crate::platform::PlatformClient;
use crate::types::{CurrentUserResponse, FailureEnvelope, FollowersPage, WebProfileResponse};

const DEFAULT_BASE_URL: &str = "https://i.instagram.com";

/// App id the Instagram web frontend sends; required by `web_profile_info`.
const WEB_APP_ID: &str = "936619743392459";

const FOLLOWERS_PAGE_SIZE: usize = 100;

/// Upper bound on follower pages per profile. Guards against cycling cursors.
const MAX_FOLLOWER_PAGES: usize = 50;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._]{1,30}$").expect("valid username regex"));

/// Network-backed [`PlatformClient`] for Instagram.
///
/// Use [`InstagramClient::new`] for production or
/// [`InstagramClient::with_base_url`] to point at a mock server in tests.
pub struct InstagramClient {
    client: Client,
    base_url: Url,
    session_id: Option<String>,
}

impl InstagramClient {
    /// Creates an anonymous client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`InstagramError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, InstagramError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates an anonymous client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`InstagramError::Http`] if the `reqwest::Client` cannot be
    /// constructed, or [`InstagramError::InvalidBaseUrl`] if `base_url` does
    /// not parse.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, InstagramError> {
        let mut headers = HeaderMap::new();
        headers.insert("x-ig-app-id", HeaderValue::from_static(WEB_APP_ID));

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| InstagramError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url: parsed,
            session_id: None,
        })
    }

    /// `true` once a session id has been accepted by [`PlatformClient::authenticate`].
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session_id.is_some()
    }

    /// Builds an endpoint URL under the base with percent-encoded query pairs.
    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, InstagramError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| InstagramError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET with the session cookie (if any), maps error statuses to
    /// typed errors, and parses the body as JSON.
    ///
    /// `subject` names what was requested and ends up in
    /// [`InstagramError::NotFound`].
    async fn get_json(&self, url: Url, subject: &str) -> Result<serde_json::Value, InstagramError> {
        let mut request = self.client.get(url.clone());
        if let Some(session_id) = &self.session_id {
            request = request.header(reqwest::header::COOKIE, format!("sessionid={session_id}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(InstagramError::RateLimited { retry_after_secs });
        }

        if status == StatusCode::NOT_FOUND {
            return Err(InstagramError::NotFound(subject.to_owned()));
        }

        let body = response.text().await?;

        if let Some(err) = failure_from_body(&body) {
            return Err(err);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(InstagramError::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            return Err(InstagramError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_query(&url),
            });
        }

        serde_json::from_str(&body).map_err(|e| InstagramError::Deserialize {
            context: redact_query(&url),
            source: e,
        })
    }
}

#[async_trait]
impl PlatformClient for InstagramClient {
    async fn authenticate(&mut self, credential: &str) -> Result<(), InstagramError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(InstagramError::AuthenticationFailed(
                "session id is empty".to_owned(),
            ));
        }

        self.session_id = Some(credential.to_owned());
        let url = self.endpoint("api/v1/accounts/current_user/", &[("edit", "true")])?;

        let outcome = match self.get_json(url, "current_user").await {
            Ok(body) => serde_json::from_value::<CurrentUserResponse>(body).map_err(|e| {
                InstagramError::AuthenticationFailed(format!("unexpected current_user payload: {e}"))
            }),
            Err(InstagramError::LoginRequired | InstagramError::Unauthorized { .. }) => Err(
                InstagramError::AuthenticationFailed("session id was rejected".to_owned()),
            ),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(current) => {
                tracing::info!(
                    pk = %current.user.pk,
                    username = %current.user.username,
                    "instagram session validated"
                );
                Ok(())
            }
            Err(e) => {
                self.session_id = None;
                Err(e)
            }
        }
    }

    async fn fetch_profile(&self, username: &str) -> Result<Attributes, InstagramError> {
        if !USERNAME_RE.is_match(username) {
            return Err(InstagramError::InvalidUsername(username.to_owned()));
        }

        let url = self.endpoint("api/v1/users/web_profile_info/", &[("username", username)])?;
        let body = self.get_json(url, username).await?;

        let parsed: WebProfileResponse =
            serde_json::from_value(body).map_err(|e| InstagramError::Deserialize {
                context: format!("web_profile_info(username={username})"),
                source: e,
            })?;

        let user = parsed
            .data
            .user
            .ok_or_else(|| InstagramError::NotFound(username.to_owned()))?;

        tracing::debug!(username, pk = %user.id, "fetched profile");
        Ok(normalize_user(user))
    }

    async fn fetch_followers(
        &self,
        profile_id: &str,
        limit: u32,
    ) -> Result<Vec<Attributes>, InstagramError> {
        if profile_id.is_empty() || !profile_id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InstagramError::InvalidProfileId(profile_id.to_owned()));
        }
        if self.session_id.is_none() {
            return Err(InstagramError::LoginRequired);
        }

        let target = usize::try_from(limit).unwrap_or(usize::MAX);
        let mut followers: Vec<Attributes> = Vec::new();
        let mut max_id: Option<String> = None;
        let path = format!("api/v1/friendships/{profile_id}/followers/");

        for _ in 0..MAX_FOLLOWER_PAGES {
            if followers.len() >= target {
                break;
            }

            let count = (target - followers.len()).min(FOLLOWERS_PAGE_SIZE).to_string();
            let mut query = vec![("count", count.as_str())];
            if let Some(cursor) = max_id.as_deref() {
                query.push(("max_id", cursor));
            }
            let url = self.endpoint(&path, &query)?;

            let body = self.get_json(url, profile_id).await?;
            let page: FollowersPage =
                serde_json::from_value(body).map_err(|e| InstagramError::Deserialize {
                    context: format!("followers(pk={profile_id})"),
                    source: e,
                })?;

            let exhausted = page.users.is_empty() || page.next_max_id.is_none();
            followers.extend(page.users.into_iter().map(normalize_follower));
            if exhausted {
                break;
            }
            max_id = page.next_max_id;
        }

        followers.truncate(target);
        tracing::debug!(pk = profile_id, count = followers.len(), "fetched followers");
        Ok(followers)
    }
}

/// Recognises Instagram's `{"status": "fail", "message": ...}` envelope.
fn failure_from_body(body: &str) -> Option<InstagramError> {
    let envelope = serde_json::from_str::<FailureEnvelope>(body).ok()?;
    if envelope.status.as_deref() != Some("fail") {
        return None;
    }
    let message = envelope.message.unwrap_or_default();
    if message == "login_required" {
        Some(InstagramError::LoginRequired)
    } else if message.is_empty() {
        Some(InstagramError::Api("request failed without a message".to_owned()))
    } else {
        Some(InstagramError::Api(message))
    }
}

/// Drops the query string so usernames and cursors stay out of error text.
fn redact_query(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
