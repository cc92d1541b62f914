use super::segment;
use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{
    CreateEventRequest, Event, EventAttendee, EventSearchParams, NearbyEventsParams, Paginated,
    Ticket, UpdateEventRequest,
};

/// `/events` endpoints
pub struct Events<'a> {
    pub(super) client: &'a ApiClient,
}

impl Events<'_> {
    pub async fn list(&self, params: &EventSearchParams) -> Result<Paginated<Event>, ApiError> {
        let request = ApiRequest::get("/events").query_pairs(params.to_query());
        self.client.execute(&request).await
    }

    /// Events within `radius` meters of a point
    pub async fn nearby(&self, params: NearbyEventsParams) -> Result<Vec<Event>, ApiError> {
        let mut request = ApiRequest::get("/events/nearby")
            .query("lat", params.lat)
            .query("lng", params.lng)
            .query("radius", params.radius);
        if let Some(category) = params.category {
            request = request.query("category", category);
        }
        self.client.execute(&request).await
    }

    pub async fn get(&self, event_id: &str) -> Result<Event, ApiError> {
        self.client.get(&format!("/events/{}", segment(event_id))).await
    }

    pub async fn create(&self, event: &CreateEventRequest) -> Result<Event, ApiError> {
        self.client.post("/events", event).await
    }

    pub async fn update(
        &self,
        event_id: &str,
        update: &UpdateEventRequest,
    ) -> Result<Event, ApiError> {
        self.client.put(&format!("/events/{}", segment(event_id)), update).await
    }

    pub async fn delete(&self, event_id: &str) -> Result<(), ApiError> {
        let path = format!("/events/{}", segment(event_id));
        self.client.execute_unit(&ApiRequest::delete(path)).await
    }

    pub async fn join(&self, event_id: &str) -> Result<(), ApiError> {
        let path = format!("/events/{}/join", segment(event_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }

    pub async fn leave(&self, event_id: &str) -> Result<(), ApiError> {
        let path = format!("/events/{}/join", segment(event_id));
        self.client.execute_unit(&ApiRequest::delete(path)).await
    }

    pub async fn my_events(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/events/my-events").await
    }

    pub async fn hosted(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/events/hosted").await
    }

    pub async fn joined(&self) -> Result<Vec<Event>, ApiError> {
        self.client.get("/events/joined").await
    }

    pub async fn attendees(&self, event_id: &str) -> Result<Vec<EventAttendee>, ApiError> {
        self.client.get(&format!("/events/{}/attendees", segment(event_id))).await
    }

    /// Tickets sold for an event (host only)
    pub async fn tickets(&self, event_id: &str) -> Result<Vec<Ticket>, ApiError> {
        self.client.get(&format!("/events/{}/tickets", segment(event_id))).await
    }
}
