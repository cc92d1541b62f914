use super::segment;
use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{
    Event, EventAnalytics, HostRevenueSummary, PageParams, Paginated, TransactionDetail,
};

/// `/analytics` endpoints, available to event hosts
pub struct Analytics<'a> {
    pub(super) client: &'a ApiClient,
}

impl Analytics<'_> {
    pub async fn event(&self, event_id: &str) -> Result<EventAnalytics, ApiError> {
        self.client.get(&format!("/analytics/events/{}", segment(event_id))).await
    }

    pub async fn event_transactions(
        &self,
        event_id: &str,
        page: PageParams,
    ) -> Result<Paginated<TransactionDetail>, ApiError> {
        let path = format!("/analytics/events/{}/transactions", segment(event_id));
        let request = ApiRequest::get(path).query_pairs(page.to_query());
        self.client.execute(&request).await
    }

    pub async fn host_revenue(&self) -> Result<HostRevenueSummary, ApiError> {
        self.client.get("/analytics/host/revenue").await
    }

    pub async fn host_events(&self, page: PageParams) -> Result<Paginated<Event>, ApiError> {
        let request = ApiRequest::get("/analytics/host/events").query_pairs(page.to_query());
        self.client.execute(&request).await
    }
}
