use tracing::warn;

use super::segment;
use crate::api::{ApiClient, ApiError};
use crate::models::{Event, Post, Profile};

/// `/profile` endpoints.
///
/// Username lookup was removed server-side and these routes now answer
/// 404. Use [`super::Users`] with a user id instead.
pub struct ProfileApi<'a> {
    pub(super) client: &'a ApiClient,
}

impl ProfileApi<'_> {
    #[deprecated(note = "username lookup was removed; use users().get(id)")]
    pub async fn by_username(&self, username: &str) -> Result<Profile, ApiError> {
        warn!(username, "Profile lookup by username is deprecated");
        self.client.get(&format!("/profile/{}", segment(username))).await
    }

    #[deprecated(note = "username lookup was removed")]
    pub async fn posts(&self, username: &str) -> Result<Vec<Post>, ApiError> {
        warn!(username, "Profile posts by username is deprecated");
        self.client.get(&format!("/profile/{}/posts", segment(username))).await
    }

    #[deprecated(note = "username lookup was removed; use events().hosted()")]
    pub async fn events(&self, username: &str) -> Result<Vec<Event>, ApiError> {
        warn!(username, "Profile events by username is deprecated");
        self.client.get(&format!("/profile/{}/events", segment(username))).await
    }
}
