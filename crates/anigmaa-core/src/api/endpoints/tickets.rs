use serde_json::Value;

use super::segment;
use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::{CheckInRequest, PurchaseTicketRequest, Ticket};

/// `/tickets` endpoints
pub struct Tickets<'a> {
    pub(super) client: &'a ApiClient,
}

impl Tickets<'_> {
    /// Buy `quantity` tickets for an event. Free events complete
    /// immediately; paid ones come back pending payment.
    pub async fn purchase(&self, event_id: &str, quantity: u32) -> Result<Ticket, ApiError> {
        let request = PurchaseTicketRequest {
            event_id: event_id.to_string(),
            quantity: quantity.max(1),
        };
        self.client.post("/tickets/purchase", &request).await
    }

    pub async fn my_tickets(&self) -> Result<Vec<Ticket>, ApiError> {
        self.client.get("/tickets/my-tickets").await
    }

    pub async fn get(&self, ticket_id: &str) -> Result<Ticket, ApiError> {
        self.client.get(&format!("/tickets/{}", segment(ticket_id))).await
    }

    pub async fn check_in(&self, ticket_id: &str) -> Result<Ticket, ApiError> {
        let request = CheckInRequest {
            ticket_id: ticket_id.to_string(),
        };
        self.client.post("/tickets/check-in", &request).await
    }

    pub async fn cancel(&self, ticket_id: &str) -> Result<(), ApiError> {
        let path = format!("/tickets/{}/cancel", segment(ticket_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }

    /// Payment transaction record. The shape depends on the payment
    /// provider, so it is returned as raw JSON.
    pub async fn transaction(&self, transaction_id: &str) -> Result<Value, ApiError> {
        self.client
            .get(&format!("/tickets/transactions/{}", segment(transaction_id)))
            .await
    }
}
