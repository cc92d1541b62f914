use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum CommunityPrivacy {
    Public,
    Private,
    Secret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "snake_case")]
pub enum CommunityRole {
    Owner,
    Admin,
    Moderator,
    Member,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Community {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub cover_url: Option<String>,
    pub creator_id: String,
    pub privacy: CommunityPrivacy,
    #[serde(default)]
    pub members_count: u64,
    #[serde(default)]
    pub posts_count: u64,
    pub creator_name: Option<String>,
    #[serde(rename = "is_joined_by_current_user", default)]
    pub is_joined: bool,
    pub user_role: Option<CommunityRole>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CommunityMember {
    pub id: String,
    pub community_id: String,
    pub user_id: String,
    pub role: CommunityRole,
    pub joined_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct CreateCommunityRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub privacy: CommunityPrivacy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UpdateCommunityRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privacy: Option<CommunityPrivacy>,
}

/// Filters for `GET /communities`
#[derive(Debug, Clone, Default)]
pub struct CommunityFilter {
    pub search: Option<String>,
    pub privacy: Option<CommunityPrivacy>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl CommunityFilter {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.to_string()));
        }
        if let Some(privacy) = self.privacy {
            let value = match privacy {
                CommunityPrivacy::Public => "public",
                CommunityPrivacy::Private => "private",
                CommunityPrivacy::Secret => "secret",
            };
            query.push(("privacy", value.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        query
    }
}
