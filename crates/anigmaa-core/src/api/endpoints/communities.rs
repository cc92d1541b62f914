use super::segment;
use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{
    Community, CommunityFilter, CommunityMember, CreateCommunityRequest, UpdateCommunityRequest,
};

/// `/communities` endpoints
pub struct Communities<'a> {
    pub(super) client: &'a ApiClient,
}

impl Communities<'_> {
    pub async fn list(&self, filter: &CommunityFilter) -> Result<Vec<Community>, ApiError> {
        let request = ApiRequest::get("/communities").query_pairs(filter.to_query());
        self.client.execute(&request).await
    }

    pub async fn mine(&self) -> Result<Vec<Community>, ApiError> {
        self.client.get("/communities/my-communities").await
    }

    pub async fn create(&self, community: &CreateCommunityRequest) -> Result<Community, ApiError> {
        self.client.post("/communities", community).await
    }

    pub async fn get(&self, community_id: &str) -> Result<Community, ApiError> {
        self.client.get(&format!("/communities/{}", segment(community_id))).await
    }

    pub async fn update(
        &self,
        community_id: &str,
        update: &UpdateCommunityRequest,
    ) -> Result<Community, ApiError> {
        self.client
            .put(&format!("/communities/{}", segment(community_id)), update)
            .await
    }

    pub async fn delete(&self, community_id: &str) -> Result<(), ApiError> {
        let path = format!("/communities/{}", segment(community_id));
        self.client.execute_unit(&ApiRequest::delete(path)).await
    }

    pub async fn join(&self, community_id: &str) -> Result<(), ApiError> {
        let path = format!("/communities/{}/join", segment(community_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }

    pub async fn leave(&self, community_id: &str) -> Result<(), ApiError> {
        let path = format!("/communities/{}/leave", segment(community_id));
        self.client.execute_unit(&ApiRequest::delete(path)).await
    }

    pub async fn members(
        &self,
        community_id: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<CommunityMember>, ApiError> {
        let path = format!("/communities/{}/members", segment(community_id));
        let mut request = ApiRequest::get(path);
        if let Some(limit) = limit {
            request = request.query("limit", limit);
        }
        if let Some(offset) = offset {
            request = request.query("offset", offset);
        }
        self.client.execute(&request).await
    }
}
