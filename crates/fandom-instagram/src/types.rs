//! Instagram private/web API response types.
//!
//! ## Observed shapes
//!
//! ### `web_profile_info`
//! `GET /api/v1/users/web_profile_info/?username=...` wraps the profile in
//! `{"data": {"user": {...}}, "status": "ok"}`. The profile id is a numeric
//! **string** (`"id": "25025320"`). Counts are nested one level down in
//! GraphQL-style edges (`edge_followed_by.count`). A missing account yields
//! HTTP 404, or occasionally `"user": null` with a 200.
//!
//! ### `friendships/{pk}/followers`
//! Returns `{"users": [...], "next_max_id": "...", "status": "ok"}`. Here
//! `pk` may be a number or a string depending on API version; it is read as
//! either. `next_max_id` is absent on the last page.
//!
//! ### Failure envelope
//! Errors often arrive with a 200 or 400 and
//! `{"message": "login_required", "status": "fail"}`.

use serde::{Deserialize, Deserializer};

/// Top-level response from `web_profile_info`.
#[derive(Debug, Deserialize)]
pub struct WebProfileResponse {
    pub data: WebProfileData,
}

#[derive(Debug, Deserialize)]
pub struct WebProfileData {
    #[serde(default)]
    pub user: Option<RawUser>,
}

/// Profile as returned by `web_profile_info`.
#[derive(Debug, Deserialize)]
pub struct RawUser {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_business_account: bool,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub profile_pic_url_hd: Option<String>,
    #[serde(default)]
    pub edge_followed_by: EdgeCount,
    #[serde(default)]
    pub edge_follow: EdgeCount,
    #[serde(default)]
    pub edge_owner_to_timeline_media: EdgeCount,
}

#[derive(Debug, Default, Deserialize)]
pub struct EdgeCount {
    #[serde(default)]
    pub count: u64,
}

/// One page from the followers endpoint.
#[derive(Debug, Deserialize)]
pub struct FollowersPage {
    #[serde(default)]
    pub users: Vec<RawFollower>,
    #[serde(default)]
    pub next_max_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawFollower {
    #[serde(deserialize_with = "string_or_number")]
    pub pk: String,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_verified: bool,
}

/// Response from `accounts/current_user`, used to validate a session.
#[derive(Debug, Deserialize)]
pub struct CurrentUserResponse {
    pub user: CurrentUser,
}

#[derive(Debug, Deserialize)]
pub struct CurrentUser {
    #[serde(deserialize_with = "string_or_number")]
    pub pk: String,
    pub username: String,
}

/// `{"status": "fail", "message": ...}` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct FailureEnvelope {
    pub status: Option<String>,
    pub message: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}
