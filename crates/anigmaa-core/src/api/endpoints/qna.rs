use super::segment;
use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::qna::{AnswerQuestionRequest, AskQuestionRequest};
use crate::models::Question;

/// Event Q&A. Questions are listed and asked under `/events/{id}/qna`,
/// everything else lives under `/qna/{id}`.
pub struct Qna<'a> {
    pub(super) client: &'a ApiClient,
}

impl Qna<'_> {
    pub async fn for_event(&self, event_id: &str) -> Result<Vec<Question>, ApiError> {
        self.client.get(&format!("/events/{}/qna", segment(event_id))).await
    }

    pub async fn ask(&self, event_id: &str, question: &str) -> Result<Question, ApiError> {
        self.client
            .post(
                &format!("/events/{}/qna", segment(event_id)),
                &AskQuestionRequest { event_id, question },
            )
            .await
    }

    pub async fn upvote(&self, question_id: &str) -> Result<(), ApiError> {
        let path = format!("/qna/{}/upvote", segment(question_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }

    pub async fn remove_upvote(&self, question_id: &str) -> Result<(), ApiError> {
        let path = format!("/qna/{}/upvote", segment(question_id));
        self.client.execute_unit(&ApiRequest::delete(path)).await
    }

    /// Host-only
    pub async fn answer(&self, question_id: &str, answer: &str) -> Result<Question, ApiError> {
        self.client
            .post(
                &format!("/qna/{}/answer", segment(question_id)),
                &AnswerQuestionRequest { answer },
            )
            .await
    }

    pub async fn delete(&self, question_id: &str) -> Result<(), ApiError> {
        let path = format!("/qna/{}", segment(question_id));
        self.client.execute_unit(&ApiRequest::delete(path)).await
    }
}
