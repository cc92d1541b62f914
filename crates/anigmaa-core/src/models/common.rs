use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiError;

/// Default page size used by every paginated endpoint
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageParams {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub(crate) fn to_query(self) -> [(&'static str, String); 2] {
        [("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Error payload returned with non-2xx statuses.
///
/// The documented shape is `{error, details?, code?}`. The live backend also
/// answers with `{success: false, message, error: {code, details}}`, which
/// [`ErrorBody::parse`] folds into the same struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            code: None,
        }
    }

    /// Build an error body from a raw response body, falling back to the
    /// status reason when the body is empty or not JSON.
    pub fn parse(raw: &str, status: reqwest::StatusCode) -> Self {
        let fallback = || {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Self::new(status.canonical_reason().unwrap_or("Unknown error"))
            } else {
                Self::new(ApiError::truncate_body(trimmed))
            }
        };

        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) else {
            return fallback();
        };

        let text = |value: Option<&Value>| value.and_then(Value::as_str).map(str::to_string);

        match map.get("error") {
            Some(Value::String(message)) => Self {
                error: message.clone(),
                details: text(map.get("details")),
                code: text(map.get("code")),
            },
            Some(Value::Object(info)) => {
                let code = text(info.get("code"));
                Self {
                    error: text(map.get("message"))
                        .or_else(|| code.clone())
                        .unwrap_or_else(|| status.to_string()),
                    details: text(info.get("details")).filter(|d| !d.is_empty()),
                    code,
                }
            }
            _ => match text(map.get("message")) {
                Some(message) => Self::new(message),
                None => fallback(),
            },
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        if let Some(code) = &self.code {
            write!(f, " [{}]", code)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_parse_documented_error_shape() {
        let body = ErrorBody::parse(
            r#"{"error":"Event is full","details":"max 10 attendees","code":"EVENT_FULL"}"#,
            StatusCode::CONFLICT,
        );
        assert_eq!(body.error, "Event is full");
        assert_eq!(body.details.as_deref(), Some("max 10 attendees"));
        assert_eq!(body.code.as_deref(), Some("EVENT_FULL"));
        assert_eq!(body.to_string(), "Event is full (max 10 attendees) [EVENT_FULL]");
    }

    #[test]
    fn test_parse_enveloped_error_shape() {
        let body = ErrorBody::parse(
            r#"{"success":false,"message":"Invalid or expired refresh token","error":{"code":"UNAUTHORIZED","details":""}}"#,
            StatusCode::UNAUTHORIZED,
        );
        assert_eq!(body.error, "Invalid or expired refresh token");
        assert_eq!(body.code.as_deref(), Some("UNAUTHORIZED"));
        assert_eq!(body.details, None);
    }

    #[test]
    fn test_parse_non_json_falls_back() {
        let body = ErrorBody::parse("<html>Bad Gateway</html>", StatusCode::BAD_GATEWAY);
        assert_eq!(body.error, "<html>Bad Gateway</html>");

        let empty = ErrorBody::parse("", StatusCode::NOT_FOUND);
        assert_eq!(empty.error, "Not Found");
    }

    #[test]
    fn test_paginated_defaults_and_next_page() {
        let page: Paginated<u32> =
            serde_json::from_str(r#"{"data":[1,2],"page":1,"limit":2,"total":5,"total_pages":3}"#)
                .expect("valid page");
        assert!(page.has_next_page());
        assert_eq!(page.data, vec![1, 2]);

        let empty: Paginated<u32> = serde_json::from_str("{}").expect("empty page");
        assert!(empty.is_empty());
        assert!(!empty.has_next_page());
    }

    #[test]
    fn test_page_params_default() {
        let params = PageParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, DEFAULT_PAGE_LIMIT);
        assert_eq!(params.to_query()[1], ("limit", "20".to_string()));
    }
}
