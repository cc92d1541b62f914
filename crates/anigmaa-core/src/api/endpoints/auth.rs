use crate::api::{ApiClient, ApiError, ApiRequest};
use crate::models::auth::{GoogleLoginRequest, VerifyEmailRequest};
use crate::models::AuthResponse;

/// `/auth` endpoints. Sign-in is Google OAuth only.
pub struct Auth<'a> {
    pub(super) client: &'a ApiClient,
}

impl Auth<'_> {
    /// Exchange a Google ID token for a session and persist its tokens
    pub async fn login_with_google(&self, google_token: &str) -> Result<AuthResponse, ApiError> {
        let tokens: AuthResponse = self
            .client
            .post("/auth/google", &GoogleLoginRequest { token: google_token })
            .await?;
        self.client.session().establish(&tokens).await?;
        Ok(tokens)
    }

    /// Sign out. Local credentials are cleared even when the call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self.client.execute_unit(&ApiRequest::post("/auth/logout")).await;
        let cleared = self.client.session().clear().await;
        result.and(cleared)
    }

    /// Exchange the stored refresh token for a new access token now
    pub async fn refresh_token(&self) -> Result<AuthResponse, ApiError> {
        let client = self.client;
        client
            .session()
            .force_refresh(move |refresh_token| async move {
                client.exchange_refresh_token(&refresh_token).await
            })
            .await
    }

    pub async fn verify_email(&self, token: &str) -> Result<(), ApiError> {
        let request = ApiRequest::post("/auth/verify-email").json(&VerifyEmailRequest { token })?;
        self.client.execute_unit(&request).await
    }

    pub async fn resend_verification_email(&self) -> Result<(), ApiError> {
        self.client
            .execute_unit(&ApiRequest::post("/auth/resend-verification"))
            .await
    }
}
