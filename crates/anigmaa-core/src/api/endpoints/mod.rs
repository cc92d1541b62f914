//! Typed endpoint groups.
//!
//! Each group borrows the [`ApiClient`] and forwards to the request
//! pipeline, so every call gets bearer auth and the refresh-once retry.
//!
//! ```ignore
//! let events = client.events().nearby(NearbyEventsParams::new(-6.2, 106.8)).await?;
//! ```

mod analytics;
mod auth;
mod communities;
mod events;
mod posts;
mod profile;
mod qna;
mod tickets;
mod users;

pub use analytics::Analytics;
pub use auth::Auth;
pub use communities::Communities;
pub use events::Events;
pub use posts::Posts;
pub use profile::ProfileApi;
pub use qna::Qna;
pub use tickets::Tickets;
pub use users::Users;

use std::borrow::Cow;

use super::ApiClient;

/// Percent-encode an id for use as one path segment, so `/`, `?` and `#`
/// in an id cannot change the route or start a query string.
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

impl ApiClient {
    pub fn auth(&self) -> Auth<'_> {
        Auth { client: self }
    }

    pub fn users(&self) -> Users<'_> {
        Users { client: self }
    }

    pub fn events(&self) -> Events<'_> {
        Events { client: self }
    }

    pub fn posts(&self) -> Posts<'_> {
        Posts { client: self }
    }

    pub fn tickets(&self) -> Tickets<'_> {
        Tickets { client: self }
    }

    pub fn profile(&self) -> ProfileApi<'_> {
        ProfileApi { client: self }
    }

    pub fn analytics(&self) -> Analytics<'_> {
        Analytics { client: self }
    }

    pub fn qna(&self) -> Qna<'_> {
        Qna { client: self }
    }

    pub fn communities(&self) -> Communities<'_> {
        Communities { client: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_encodes_reserved_characters() {
        assert_eq!(segment("0b5e8a1c-42"), "0b5e8a1c-42");
        assert_eq!(segment("e1/attendees"), "e1%2Fattendees");
        assert_eq!(segment("e1?admin=true"), "e1%3Fadmin%3Dtrue");
        assert_eq!(segment("a b#c"), "a%20b%23c");
    }
}
