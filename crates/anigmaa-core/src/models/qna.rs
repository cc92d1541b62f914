use serde::{Deserialize, Serialize};

/// Minimal author info attached to questions and answers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct UserBasicInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub avatar: Option<String>,
}

/// An event Q&A entry. This endpoint family answers in camelCase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub event_id: String,
    pub question: String,
    pub answer: Option<String>,
    pub asked_by: Option<UserBasicInfo>,
    pub answered_by: Option<UserBasicInfo>,
    pub asked_at: String,
    pub answered_at: Option<String>,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(rename = "isUpvotedByCurrentUser", default)]
    pub is_upvoted: bool,
}

impl Question {
    pub fn is_answered(&self) -> bool {
        self.answer.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AskQuestionRequest<'a> {
    pub event_id: &'a str,
    pub question: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AnswerQuestionRequest<'a> {
    pub answer: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_question() {
        let json = r#"{"id":"q1","eventId":"e1","question":"Is parking available?","askedBy":{"id":"u1","name":"Rina","email":"r@example.com","createdAt":"2025-01-01T00:00:00Z"},"askedAt":"2025-01-02T10:00:00Z","upvotes":3,"isUpvotedByCurrentUser":true}"#;
        let question: Question = serde_json::from_str(json).expect("valid question");
        assert_eq!(question.event_id, "e1");
        assert!(question.is_upvoted);
        assert!(!question.is_answered());
        assert_eq!(question.asked_by.map(|u| u.name).as_deref(), Some("Rina"));
    }
}
