use std::sync::Arc;

use thiserror::Error;

use crate::models::ErrorBody;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request ({status}): {body}")]
    BadRequest { status: u16, body: ErrorBody },

    #[error("Unauthorized - token may be expired: {0}")]
    Unauthorized(ErrorBody),

    #[error("Access denied: {0}")]
    AccessDenied(ErrorBody),

    #[error("Resource not found: {0}")]
    NotFound(ErrorBody),

    #[error("Conflict: {0}")]
    Conflict(ErrorBody),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {body}")]
    ServerError { status: u16, body: ErrorBody },

    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: ErrorBody },

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The refresh exchange failed and the stored credentials were cleared.
    /// Callers should send the user back through sign-in.
    #[error("Session expired, please sign in again: {0}")]
    SessionExpired(#[source] Arc<ApiError>),

    #[error("Not signed in: {0}")]
    NotAuthenticated(&'static str),

    #[error("Session storage error: {0:#}")]
    Storage(#[source] anyhow::Error),
}

/// Maximum length for raw error bodies kept in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let parsed = ErrorBody::parse(body, status);
        match status.as_u16() {
            code @ (400 | 422) => ApiError::BadRequest {
                status: code,
                body: parsed,
            },
            401 => ApiError::Unauthorized(parsed),
            403 => ApiError::AccessDenied(parsed),
            404 => ApiError::NotFound(parsed),
            409 => ApiError::Conflict(parsed),
            429 => ApiError::RateLimited,
            code @ 500..=599 => ApiError::ServerError {
                status: code,
                body: parsed,
            },
            code => ApiError::UnexpectedStatus {
                status: code,
                body: parsed,
            },
        }
    }

    /// HTTP status behind this error, when it came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest { status, .. }
            | ApiError::ServerError { status, .. }
            | ApiError::UnexpectedStatus { status, .. } => Some(*status),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::RateLimited => Some(429),
            _ => None,
        }
    }

    /// Decoded error body, when the server sent one
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            ApiError::BadRequest { body, .. }
            | ApiError::Unauthorized(body)
            | ApiError::AccessDenied(body)
            | ApiError::NotFound(body)
            | ApiError::Conflict(body)
            | ApiError::ServerError { body, .. }
            | ApiError::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True when the caller should route the user to sign-in again
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            ApiError::SessionExpired(_) | ApiError::Unauthorized(_) | ApiError::NotAuthenticated(_)
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::NetworkError(err)
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status_maps_codes() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND, r#"{"error":"Event not found"}"#),
            ApiError::NotFound(ref b) if b.error == "Event not found"
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream down"),
            ApiError::ServerError { status: 502, .. }
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, ""),
            ApiError::UnexpectedStatus { status: 418, .. }
        ));
    }

    #[test]
    fn test_status_keeps_actual_code() {
        let unavailable = ApiError::from_status(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(unavailable.status(), Some(503));
        assert!(matches!(unavailable, ApiError::ServerError { .. }));

        let invalid = ApiError::from_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"error":"Validation failed","details":"title is required"}"#,
        );
        assert_eq!(invalid.status(), Some(422));
        assert_eq!(invalid.body().map(|b| b.error.as_str()), Some("Validation failed"));

        assert_eq!(ApiError::from_status(StatusCode::BAD_REQUEST, "").status(), Some(400));
        assert_eq!(ApiError::from_status(StatusCode::NOT_FOUND, "").status(), Some(404));
    }

    #[test]
    fn test_truncate_body() {
        let short = "short body";
        assert_eq!(ApiError::truncate_body(short), short);

        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 100);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.contains("truncated, 600 total bytes"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let long = "é".repeat(MAX_ERROR_BODY_LENGTH);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_requires_reauthentication() {
        let expired = ApiError::SessionExpired(Arc::new(ApiError::Timeout));
        assert!(expired.requires_reauthentication());
        assert!(!ApiError::Timeout.requires_reauthentication());
        assert_eq!(expired.status(), None);
    }
}
