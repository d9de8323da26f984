use async_trait::async_trait;
use fandom_core::Attributes;

use crate::error::InstagramError;

/// The capability the scrape loop needs from a social platform.
///
/// [`crate::InstagramClient`] is the network-backed implementation; tests
/// substitute deterministic fakes.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Attach a session credential. Called at most once per job, before any
    /// fetch.
    async fn authenticate(&mut self, credential: &str) -> Result<(), InstagramError>;

    /// Fetch public profile attributes for `username`.
    async fn fetch_profile(&self, username: &str) -> Result<Attributes, InstagramError>;

    /// Fetch up to `limit` followers of the profile with id `profile_id`.
    async fn fetch_followers(
        &self,
        profile_id: &str,
        limit: u32,
    ) -> Result<Vec<Attributes>, InstagramError>;
}
