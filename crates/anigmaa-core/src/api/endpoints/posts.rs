use tracing::warn;

use super::segment;
use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::post::RepostRequest;
use crate::models::{
    Comment, CreateCommentRequest, CreatePostRequest, PageParams, Paginated, Post,
    UpdateCommentRequest, UpdatePostRequest,
};

/// `/posts` endpoints, comments included
pub struct Posts<'a> {
    pub(super) client: &'a ApiClient,
}

impl Posts<'_> {
    pub async fn feed(&self, page: PageParams) -> Result<Paginated<Post>, ApiError> {
        let request = ApiRequest::get("/posts/feed").query_pairs(page.to_query());
        self.client.execute(&request).await
    }

    pub async fn get(&self, post_id: &str) -> Result<Post, ApiError> {
        self.client.get(&format!("/posts/{}", segment(post_id))).await
    }

    pub async fn create(&self, post: &CreatePostRequest) -> Result<Post, ApiError> {
        self.client.post("/posts", post).await
    }

    pub async fn update(
        &self,
        post_id: &str,
        update: &UpdatePostRequest,
    ) -> Result<Post, ApiError> {
        self.client.put(&format!("/posts/{}", segment(post_id)), update).await
    }

    pub async fn delete(&self, post_id: &str) -> Result<(), ApiError> {
        let path = format!("/posts/{}", segment(post_id));
        self.client.execute_unit(&ApiRequest::delete(path)).await
    }

    pub async fn like(&self, post_id: &str) -> Result<(), ApiError> {
        let path = format!("/posts/{}/like", segment(post_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }

    pub async fn unlike(&self, post_id: &str) -> Result<(), ApiError> {
        let path = format!("/posts/{}/unlike", segment(post_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }

    /// Flip the like state of `post` in place and tell the server.
    ///
    /// The local change is applied before the request goes out; if the
    /// request fails, `post` is restored and the error is returned.
    pub async fn toggle_like(&self, post: &mut Post) -> Result<(), ApiError> {
        let was_liked = post.liked();
        let before = (post.is_liked, post.likes_count);
        post.apply_like(!was_liked);

        let result = if was_liked {
            self.unlike(&post.id).await
        } else {
            self.like(&post.id).await
        };

        if let Err(err) = &result {
            warn!(post_id = %post.id, error = %err, "Like toggle failed, reverting");
            (post.is_liked, post.likes_count) = before;
        }
        result
    }

    pub async fn repost(&self, post_id: &str) -> Result<Post, ApiError> {
        self.client.post("/posts/repost", &RepostRequest { post_id }).await
    }

    pub async fn undo_repost(&self, post_id: &str) -> Result<(), ApiError> {
        let path = format!("/posts/{}/undo-repost", segment(post_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }

    pub async fn bookmark(&self, post_id: &str) -> Result<(), ApiError> {
        let path = format!("/posts/{}/bookmark", segment(post_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }

    pub async fn remove_bookmark(&self, post_id: &str) -> Result<(), ApiError> {
        let path = format!("/posts/{}/bookmark", segment(post_id));
        self.client.execute_unit(&ApiRequest::delete(path)).await
    }

    pub async fn bookmarks(&self, page: PageParams) -> Result<Paginated<Post>, ApiError> {
        let request = ApiRequest::get("/posts/bookmarks").query_pairs(page.to_query());
        self.client.execute(&request).await
    }

    pub async fn comments(
        &self,
        post_id: &str,
        page: PageParams,
    ) -> Result<Paginated<Comment>, ApiError> {
        let path = format!("/posts/{}/comments", segment(post_id));
        let request = ApiRequest::get(path).query_pairs(page.to_query());
        self.client.execute(&request).await
    }

    pub async fn add_comment(&self, comment: &CreateCommentRequest) -> Result<Comment, ApiError> {
        self.client.post("/posts/comments", comment).await
    }

    pub async fn update_comment(
        &self,
        comment_id: &str,
        update: &UpdateCommentRequest,
    ) -> Result<Comment, ApiError> {
        self.client
            .put(&format!("/posts/comments/{}", segment(comment_id)), update)
            .await
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<(), ApiError> {
        let path = format!("/posts/comments/{}", segment(comment_id));
        self.client.execute_unit(&ApiRequest::delete(path)).await
    }

    pub async fn like_comment(&self, post_id: &str, comment_id: &str) -> Result<(), ApiError> {
        let path = format!("/posts/{}/comments/{}/like", segment(post_id), segment(comment_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }

    pub async fn unlike_comment(&self, post_id: &str, comment_id: &str) -> Result<(), ApiError> {
        let path = format!("/posts/{}/comments/{}/unlike", segment(post_id), segment(comment_id));
        self.client.execute_unit(&ApiRequest::post(path)).await
    }
}
