use super::segment;
use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{PageParams, Paginated, UpdateUserRequest, User, UserSettings, UserStats};

/// `/users` endpoints
pub struct Users<'a> {
    pub(super) client: &'a ApiClient,
}

impl Users<'_> {
    pub async fn me(&self) -> Result<User, ApiError> {
        self.client.get("/users/me").await
    }

    pub async fn update_me(&self, update: &UpdateUserRequest) -> Result<User, ApiError> {
        self.client.put("/users/me", update).await
    }

    pub async fn update_settings(
        &self,
        settings: &UserSettings,
    ) -> Result<UserSettings, ApiError> {
        self.client.put("/users/me/settings", settings).await
    }

    pub async fn get(&self, user_id: &str) -> Result<User, ApiError> {
        self.client.get(&format!("/users/{}", segment(user_id))).await
    }

    pub async fn followers(
        &self,
        user_id: &str,
        page: PageParams,
    ) -> Result<Paginated<User>, ApiError> {
        let path = format!("/users/{}/followers", segment(user_id));
        let request = ApiRequest::get(path).query_pairs(page.to_query());
        self.client.execute(&request).await
    }

    pub async fn following(
        &self,
        user_id: &str,
        page: PageParams,
    ) -> Result<Paginated<User>, ApiError> {
        let path = format!("/users/{}/following", segment(user_id));
        let request = ApiRequest::get(path).query_pairs(page.to_query());
        self.client.execute(&request).await
    }

    pub async fn follow(&self, user_id: &str) -> Result<(), ApiError> {
        let path = format!("/users/{}/follow", segment(user_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }

    pub async fn unfollow(&self, user_id: &str) -> Result<(), ApiError> {
        let path = format!("/users/{}/follow", segment(user_id));
        self.client.execute_unit(&ApiRequest::delete(path)).await
    }

    pub async fn stats(&self, user_id: &str) -> Result<UserStats, ApiError> {
        self.client.get(&format!("/users/{}/stats", segment(user_id))).await
    }

    /// Search users by name or email. The server wants at least 2 characters.
    pub async fn search(&self, query: &str, page: PageParams) -> Result<Paginated<User>, ApiError> {
        let request = ApiRequest::get("/users/search")
            .query("q", query)
            .query_pairs(page.to_query());
        self.client.execute(&request).await
    }
}
