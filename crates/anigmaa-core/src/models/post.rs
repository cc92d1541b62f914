use serde::{Deserialize, Serialize};

use super::{Event, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Text,
    Image,
    Event,
    Poll,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PostImage {
    pub id: String,
    pub post_id: String,
    pub image_url: String,
    #[serde(default)]
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub author: Option<User>,
    pub content: String,
    #[serde(rename = "type")]
    pub post_type: PostType,
    pub event_id: Option<String>,
    pub event: Option<Event>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default)]
    pub reposts_count: u64,
    #[serde(default)]
    pub shares_count: u64,
    #[serde(default)]
    pub images: Vec<PostImage>,
    pub is_liked: Option<bool>,
    pub is_reposted: Option<bool>,
    pub created_at: String,
    pub updated_at: String,
}

impl Post {
    pub fn liked(&self) -> bool {
        self.is_liked.unwrap_or(false)
    }

    /// Set the local like state, keeping `likes_count` in step.
    /// Setting the state it already has is a no-op.
    pub fn apply_like(&mut self, liked: bool) {
        if self.liked() == liked {
            return;
        }
        self.is_liked = Some(liked);
        if liked {
            self.likes_count += 1;
        } else {
            self.likes_count = self.likes_count.saturating_sub(1);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub post_type: Option<PostType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_urls: Vec<String>,
}

impl CreatePostRequest {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            post_type: Some(PostType::Text),
            event_id: None,
            image_urls: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UpdatePostRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RepostRequest<'a> {
    pub post_id: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub author: Option<User>,
    pub parent_id: Option<String>,
    pub content: String,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub replies_count: u64,
    pub is_liked: Option<bool>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CreateCommentRequest {
    pub post_id: String,
    pub content: String,
    // Sent as null for top-level comments
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(liked: Option<bool>, likes: u64) -> Post {
        serde_json::from_value(serde_json::json!({
            "id": "p1",
            "author_id": "u1",
            "content": "hello",
            "type": "text",
            "likes_count": likes,
            "is_liked": liked,
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z"
        }))
        .expect("valid post")
    }

    #[test]
    fn test_apply_like_adjusts_count() {
        let mut post = sample_post(None, 4);
        post.apply_like(true);
        assert!(post.liked());
        assert_eq!(post.likes_count, 5);

        post.apply_like(true);
        assert_eq!(post.likes_count, 5);

        post.apply_like(false);
        assert!(!post.liked());
        assert_eq!(post.likes_count, 4);
    }

    #[test]
    fn test_apply_unlike_never_underflows() {
        let mut post = sample_post(Some(true), 0);
        post.apply_like(false);
        assert_eq!(post.likes_count, 0);
    }

    #[test]
    fn test_comment_request_sends_null_parent() {
        let req = CreateCommentRequest {
            post_id: "p1".into(),
            content: "nice".into(),
            parent_id: None,
        };
        let json = serde_json::to_value(&req).expect("serializable");
        assert_eq!(json["parent_id"], serde_json::Value::Null);
    }
}
