//! Data models for the Anigmaa API.
//!
//! This module contains the request and response bodies exchanged with
//! the API, including:
//!
//! - `User`, `UserStats`, `UserSettings`, `Profile`: accounts and profiles
//! - `Event`, `EventAttendee`: events and their attendance
//! - `Post`, `Comment`: the social feed
//! - `Ticket`: ticket purchase and check-in
//! - `EventAnalytics`, `HostRevenueSummary`: host analytics
//! - `Question`, `Community`: event Q&A and communities
//! - `Paginated`, `ErrorBody`: shared envelopes

pub mod analytics;
pub mod auth;
pub mod common;
pub mod community;
pub mod event;
pub mod post;
pub mod qna;
pub mod ticket;
pub mod user;

pub use analytics::{
    DailyRevenue, EventAnalytics, HostRevenueSummary, MonthlyRevenue, Profile, TransactionDetail,
};
pub use auth::AuthResponse;
pub use common::{ErrorBody, PageParams, Paginated, DEFAULT_PAGE_LIMIT};
pub use community::{
    Community, CommunityFilter, CommunityMember, CommunityPrivacy, CommunityRole,
    CreateCommunityRequest, UpdateCommunityRequest,
};
pub use event::{
    AttendeeStatus, CreateEventRequest, Event, EventAttendee, EventCategory, EventImage,
    EventPrivacy, EventSearchParams, EventStatus, NearbyEventsParams, SortField, SortOrder,
    UpdateEventRequest, DEFAULT_NEARBY_RADIUS_M,
};
pub use post::{
    Comment, CreateCommentRequest, CreatePostRequest, Post, PostImage, PostType,
    UpdateCommentRequest, UpdatePostRequest,
};
pub use qna::{Question, UserBasicInfo};
pub use ticket::{CheckInRequest, PurchaseTicketRequest, Ticket, TicketStatus};
pub use user::{PrivacyLevel, UpdateUserRequest, User, UserSettings, UserStats};
