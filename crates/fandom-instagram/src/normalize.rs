//! Flattens raw Instagram API shapes into the attribute maps carried by
//! records.
//!
//! Field names follow the platform's own v1 user model (`pk`,
//! `follower_count`, ...) rather than the GraphQL edge layout.

use fandom_core::Attributes;
use serde::Serialize;
use serde_json::Value;

use crate::types::{RawFollower, RawUser};

#[derive(Debug, Serialize)]
struct UserInfo {
    pk: String,
    username: String,
    full_name: String,
    is_private: bool,
    is_verified: bool,
    is_business: bool,
    profile_pic_url: Option<String>,
    biography: String,
    external_url: Option<String>,
    category_name: Option<String>,
    media_count: u64,
    follower_count: u64,
    following_count: u64,
}

#[derive(Debug, Serialize)]
struct UserShort {
    pk: String,
    username: String,
    full_name: String,
    profile_pic_url: Option<String>,
    is_private: bool,
    is_verified: bool,
}

/// Converts a `web_profile_info` user into profile attributes.
///
/// Prefers the HD profile picture when present. Empty `external_url` and
/// `category_name` strings are treated as absent.
#[must_use]
pub fn normalize_user(user: RawUser) -> Attributes {
    let info = UserInfo {
        pk: user.id,
        username: user.username,
        full_name: user.full_name.unwrap_or_default(),
        is_private: user.is_private,
        is_verified: user.is_verified,
        is_business: user.is_business_account,
        profile_pic_url: user.profile_pic_url_hd.or(user.profile_pic_url),
        biography: user.biography.unwrap_or_default(),
        external_url: user.external_url.filter(|s| !s.is_empty()),
        category_name: user.category_name.filter(|s| !s.is_empty()),
        media_count: user.edge_owner_to_timeline_media.count,
        follower_count: user.edge_followed_by.count,
        following_count: user.edge_follow.count,
    };
    into_attributes(&info)
}

/// Converts a follower entry into attributes.
#[must_use]
pub fn normalize_follower(follower: RawFollower) -> Attributes {
    let short = UserShort {
        pk: follower.pk,
        username: follower.username,
        full_name: follower.full_name.unwrap_or_default(),
        profile_pic_url: follower.profile_pic_url,
        is_private: follower.is_private,
        is_verified: follower.is_verified,
    };
    into_attributes(&short)
}

fn into_attributes<T: Serialize>(value: &T) -> Attributes {
    // Plain structs of strings, bools, and integers always serialize to an object.
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Attributes::new(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
