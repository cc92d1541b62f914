use chrono::DateTime;
use serde::{Deserialize, Serialize};

use super::User;

/// Default search radius for nearby events, in meters
pub const DEFAULT_NEARBY_RADIUS_M: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum EventPrivacy {
    Public,
    Private,
    FriendsOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Coffee,
    Food,
    Gaming,
    Sports,
    Music,
    Movies,
    Study,
    Art,
    Other,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventCategory::Coffee => "coffee",
            EventCategory::Food => "food",
            EventCategory::Gaming => "gaming",
            EventCategory::Sports => "sports",
            EventCategory::Music => "music",
            EventCategory::Movies => "movies",
            EventCategory::Study => "study",
            EventCategory::Art => "art",
            EventCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coffee" => Ok(EventCategory::Coffee),
            "food" => Ok(EventCategory::Food),
            "gaming" => Ok(EventCategory::Gaming),
            "sports" => Ok(EventCategory::Sports),
            "music" => Ok(EventCategory::Music),
            "movies" => Ok(EventCategory::Movies),
            "study" => Ok(EventCategory::Study),
            "art" => Ok(EventCategory::Art),
            "other" => Ok(EventCategory::Other),
            other => Err(format!("unknown event category: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum AttendeeStatus {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EventImage {
    pub id: String,
    pub event_id: String,
    pub image_url: String,
    #[serde(default)]
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Event {
    pub id: String,
    pub host_id: String,
    pub host: Option<User>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: EventCategory,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub location_address: String,
    #[serde(default)]
    pub location_lat: f64,
    #[serde(default)]
    pub location_lng: f64,
    #[serde(default)]
    pub max_attendees: u32,
    #[serde(default)]
    pub attendees_count: u32,
    pub price: Option<f64>,
    #[serde(default)]
    pub is_free: bool,
    pub status: EventStatus,
    pub privacy: EventPrivacy,
    pub requirements: Option<String>,
    #[serde(default)]
    pub ticketing_enabled: bool,
    #[serde(default)]
    pub tickets_sold: u32,
    #[serde(default)]
    pub images: Vec<EventImage>,
    pub created_at: String,
    pub updated_at: String,
}

impl Event {
    /// Spots still open, or `None` when attendance is unlimited
    pub fn spots_left(&self) -> Option<u32> {
        if self.max_attendees == 0 {
            None
        } else {
            Some(self.max_attendees.saturating_sub(self.attendees_count))
        }
    }

    pub fn is_full(&self) -> bool {
        self.spots_left() == Some(0)
    }

    pub fn formatted_date(&self) -> String {
        match DateTime::parse_from_rfc3339(&self.start_time) {
            Ok(dt) => dt.format("%b %d, %Y %H:%M").to_string(),
            Err(_) => self.start_time.chars().take(10).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct EventAttendee {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub user: Option<User>,
    pub joined_at: String,
    pub status: AttendeeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CreateEventRequest {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub start_time: String,
    pub end_time: String,
    pub location_name: String,
    pub location_address: String,
    pub location_lat: f64,
    pub location_lng: f64,
    pub max_attendees: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    pub is_free: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<EventPrivacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticketing_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
}

/// Partial update: only the fields that are set are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UpdateEventRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EventCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<EventPrivacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticketing_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyEventsParams {
    pub lat: f64,
    pub lng: f64,
    /// Search radius in meters
    pub radius: u32,
    pub category: Option<EventCategory>,
}

impl NearbyEventsParams {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            radius: DEFAULT_NEARBY_RADIUS_M,
            category: None,
        }
    }

    pub fn radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    pub fn category(mut self, category: EventCategory) -> Self {
        self.category = Some(category);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    StartTime,
    CreatedAt,
    AttendeesCount,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::StartTime => "start_time",
            SortField::CreatedAt => "created_at",
            SortField::AttendeesCount => "attendees_count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Filters for `GET /events`
#[derive(Debug, Clone, Default)]
pub struct EventSearchParams {
    pub query: Option<String>,
    pub category: Option<EventCategory>,
    pub status: Option<EventStatus>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl EventSearchParams {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(q) = self.query.as_deref().filter(|q| !q.trim().is_empty()) {
            query.push(("query", q.to_string()));
        }
        if let Some(category) = self.category {
            query.push(("category", category.to_string()));
        }
        if let Some(status) = self.status {
            // Serialized as a bare JSON string, e.g. "upcoming"
            if let Ok(serde_json::Value::String(s)) = serde_json::to_value(status) {
                query.push(("status", s));
            }
        }
        if let Some(sort) = self.sort {
            query.push(("sort", sort.as_str().to_string()));
        }
        if let Some(order) = self.order {
            query.push(("order", order.as_str().to_string()));
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(max: u32, count: u32) -> Event {
        let json = serde_json::json!({
            "id": "e1",
            "host_id": "u1",
            "title": "Coffee meetup",
            "category": "coffee",
            "start_time": "2025-03-01T09:30:00Z",
            "end_time": "2025-03-01T11:00:00Z",
            "max_attendees": max,
            "attendees_count": count,
            "status": "upcoming",
            "privacy": "friends_only",
            "created_at": "2025-02-01T00:00:00Z",
            "updated_at": "2025-02-01T00:00:00Z"
        });
        serde_json::from_value(json).expect("valid event")
    }

    #[test]
    fn test_event_deserializes_with_defaults() {
        let event = sample_event(10, 3);
        assert_eq!(event.category, EventCategory::Coffee);
        assert_eq!(event.privacy, EventPrivacy::FriendsOnly);
        assert!(event.images.is_empty());
        assert!(!event.is_free);
    }

    #[test]
    fn test_spots_left() {
        assert_eq!(sample_event(10, 3).spots_left(), Some(7));
        assert!(sample_event(5, 5).is_full());
        assert!(sample_event(5, 7).is_full());
        assert_eq!(sample_event(0, 12).spots_left(), None);
    }

    #[test]
    fn test_formatted_date() {
        assert_eq!(sample_event(1, 0).formatted_date(), "Mar 01, 2025 09:30");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Music".parse::<EventCategory>(), Ok(EventCategory::Music));
        assert!("karaoke".parse::<EventCategory>().is_err());
    }

    #[test]
    fn test_search_params_query() {
        let params = EventSearchParams {
            query: Some("jazz".into()),
            category: Some(EventCategory::Music),
            status: Some(EventStatus::Upcoming),
            sort: Some(SortField::StartTime),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        let query = params.to_query();
        assert!(query.contains(&("query", "jazz".to_string())));
        assert!(query.contains(&("category", "music".to_string())));
        assert!(query.contains(&("status", "upcoming".to_string())));
        assert!(query.contains(&("sort", "start_time".to_string())));
        assert!(query.contains(&("order", "asc".to_string())));
        assert!(EventSearchParams::default().to_query().is_empty());
    }

    #[test]
    fn test_update_request_skips_unset_fields() {
        let update = UpdateEventRequest {
            title: Some("New title".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).expect("serializable");
        assert_eq!(json, serde_json::json!({"title": "New title"}));
    }
}
