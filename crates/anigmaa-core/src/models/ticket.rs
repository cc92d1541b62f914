use serde::{Deserialize, Serialize};

use super::{Event, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Active,
    Used,
    Cancelled,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Ticket {
    pub id: String,
    pub event_id: String,
    pub event: Option<Event>,
    pub user_id: String,
    pub user: Option<User>,
    pub ticket_code: String,
    #[serde(default)]
    pub price: f64,
    pub status: TicketStatus,
    pub checked_in_at: Option<String>,
    pub purchased_at: String,
}

impl Ticket {
    pub fn is_usable(&self) -> bool {
        self.status == TicketStatus::Active && self.checked_in_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PurchaseTicketRequest {
    pub event_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CheckInRequest {
    pub ticket_id: String,
}
