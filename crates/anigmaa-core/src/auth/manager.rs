use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::store::{Credentials, SessionStore};
use crate::api::ApiError;
use crate::models::AuthResponse;

/// Access token plus the session epoch it was read under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub access_token: Option<String>,
    pub epoch: u64,
}

#[derive(Default)]
struct RefreshState {
    // Outcome of the refresh that produced the current epoch, if it failed
    last_failure: Option<Arc<ApiError>>,
}

/// Owns the session store and serializes every change to it.
///
/// Each change (sign-in, refresh, clear) bumps the epoch. A request that was
/// rejected under an older epoch reuses whatever the newer epoch produced
/// instead of starting its own refresh exchange, so concurrent 401s share a
/// single exchange and its outcome.
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    epoch: AtomicU64,
    refresh: Mutex<RefreshState>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            epoch: AtomicU64::new(0),
            refresh: Mutex::new(RefreshState::default()),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    pub fn credentials(&self) -> Result<Credentials, ApiError> {
        self.store.get().map_err(ApiError::Storage)
    }

    /// Current access token and the epoch it belongs to.
    ///
    /// Taken under the refresh lock so a token written by an in-flight
    /// refresh is never paired with the epoch from before that refresh.
    pub async fn snapshot(&self) -> Result<SessionSnapshot, ApiError> {
        let _state = self.refresh.lock().await;
        self.read_snapshot()
    }

    // Caller must hold the refresh lock
    fn read_snapshot(&self) -> Result<SessionSnapshot, ApiError> {
        let credentials = self.credentials()?;
        Ok(SessionSnapshot {
            access_token: credentials.access_token,
            epoch: self.epoch(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials()
            .map(|c| c.access_token.is_some())
            .unwrap_or(false)
    }

    /// Persist the tokens from a successful sign-in
    pub async fn establish(&self, tokens: &AuthResponse) -> Result<(), ApiError> {
        let mut state = self.refresh.lock().await;
        self.store
            .set(&tokens.access_token, tokens.refresh_token())
            .map_err(ApiError::Storage)?;
        state.last_failure = None;
        self.bump();
        info!("Session established");
        Ok(())
    }

    /// Drop both stored credentials
    pub async fn clear(&self) -> Result<(), ApiError> {
        let mut state = self.refresh.lock().await;
        self.store.clear().map_err(ApiError::Storage)?;
        state.last_failure = None;
        self.bump();
        info!("Session cleared");
        Ok(())
    }

    /// Recover from a 401 received under `stale_epoch`.
    ///
    /// Returns `Ok(None)` when no refresh token is stored, in which case the
    /// caller propagates its original failure. A failed exchange clears the
    /// store and yields `ApiError::SessionExpired`.
    pub async fn refresh_after<F, Fut>(
        &self,
        stale_epoch: u64,
        exchange: F,
    ) -> Result<Option<SessionSnapshot>, ApiError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<AuthResponse, ApiError>>,
    {
        let mut state = self.refresh.lock().await;

        if self.epoch() != stale_epoch {
            if let Some(failure) = &state.last_failure {
                debug!("Session was invalidated by a concurrent refresh");
                return Err(ApiError::SessionExpired(Arc::clone(failure)));
            }
            debug!("Reusing token from a concurrent refresh");
            let snapshot = self.read_snapshot()?;
            return Ok(snapshot.access_token.is_some().then_some(snapshot));
        }

        let Some(refresh_token) = self.credentials()?.refresh_token else {
            return Ok(None);
        };

        let (tokens, epoch) = self.run_exchange(&mut state, refresh_token, exchange).await?;
        Ok(Some(SessionSnapshot {
            access_token: Some(tokens.access_token),
            epoch,
        }))
    }

    /// Exchange the stored refresh token now, regardless of epoch
    pub async fn force_refresh<F, Fut>(&self, exchange: F) -> Result<AuthResponse, ApiError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<AuthResponse, ApiError>>,
    {
        let mut state = self.refresh.lock().await;
        let refresh_token = self
            .credentials()?
            .refresh_token
            .ok_or(ApiError::NotAuthenticated("no refresh token stored"))?;
        let (tokens, _) = self.run_exchange(&mut state, refresh_token, exchange).await?;
        Ok(tokens)
    }

    async fn run_exchange<F, Fut>(
        &self,
        state: &mut RefreshState,
        refresh_token: String,
        exchange: F,
    ) -> Result<(AuthResponse, u64), ApiError>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<AuthResponse, ApiError>>,
    {
        match exchange(refresh_token).await {
            Ok(tokens) => {
                self.store
                    .set(&tokens.access_token, tokens.refresh_token())
                    .map_err(ApiError::Storage)?;
                state.last_failure = None;
                let epoch = self.bump();
                info!(epoch, "Access token refreshed");
                Ok((tokens, epoch))
            }
            Err(err) => {
                warn!(error = %err, "Token refresh failed, clearing session");
                if let Err(clear_err) = self.store.clear() {
                    error!(error = %clear_err, "Failed to clear session after refresh failure");
                }
                let err = Arc::new(err);
                state.last_failure = Some(Arc::clone(&err));
                self.bump();
                Err(ApiError::SessionExpired(err))
            }
        }
    }

    fn bump(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::AcqRel) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemorySessionStore;
    use crate::models::ErrorBody;
    use std::sync::atomic::AtomicUsize;

    fn tokens(access: &str, refresh: Option<&str>) -> AuthResponse {
        AuthResponse {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            user: None,
            expires_in: None,
        }
    }

    fn no_exchange() -> Result<AuthResponse, ApiError> {
        panic!("refresh exchange must not run")
    }

    fn manager(access: Option<&str>, refresh: Option<&str>) -> SessionManager {
        SessionManager::new(Arc::new(MemorySessionStore::with_tokens(access, refresh)))
    }

    #[tokio::test]
    async fn test_refresh_replaces_access_token() {
        let session = manager(Some("old"), Some("r1"));
        let stale = session.snapshot().await.unwrap();

        let next = session
            .refresh_after(stale.epoch, |rt| async move {
                assert_eq!(rt, "r1");
                Ok(tokens("new", None))
            })
            .await
            .unwrap()
            .expect("refreshed");

        assert_eq!(next.access_token.as_deref(), Some("new"));
        assert_eq!(next.epoch, stale.epoch + 1);
        let creds = session.credentials().unwrap();
        assert_eq!(creds.refresh_token.as_deref(), Some("r1"));
    }

    #[tokio::test]
    async fn test_refresh_stores_rotated_refresh_token() {
        let session = manager(Some("old"), Some("r1"));
        session
            .refresh_after(0, |_| async { Ok(tokens("new", Some("r2"))) })
            .await
            .unwrap();
        assert_eq!(
            session.credentials().unwrap().refresh_token.as_deref(),
            Some("r2")
        );
    }

    #[tokio::test]
    async fn test_no_refresh_token_returns_none() {
        let session = manager(Some("old"), None);
        let calls = AtomicUsize::new(0);
        let result = session
            .refresh_after(0, |_| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(tokens("new", None))
            })
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(session.epoch(), 0);
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_and_is_shared() {
        let session = manager(Some("old"), Some("r1"));

        let err = session
            .refresh_after(0, |_| async {
                Err::<AuthResponse, _>(ApiError::Unauthorized(ErrorBody::new(
                    "refresh token revoked",
                )))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired(_)));
        assert!(session.credentials().unwrap().is_empty());

        // A waiter rejected under the old epoch gets the same failure
        let err = session
            .refresh_after(0, |_| async { no_exchange() })
            .await
            .unwrap_err();
        match err {
            ApiError::SessionExpired(inner) => {
                assert!(matches!(*inner, ApiError::Unauthorized(_)))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_stale_waiter_reuses_new_token() {
        let session = manager(Some("old"), Some("r1"));
        session
            .refresh_after(0, |_| async { Ok(tokens("new", None)) })
            .await
            .unwrap();

        let reused = session
            .refresh_after(0, |_| async { no_exchange() })
            .await
            .unwrap()
            .expect("token from the earlier refresh");
        assert_eq!(reused.access_token.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_establish_resets_failure() {
        let session = manager(Some("old"), Some("r1"));
        let _ = session
            .refresh_after(0, |_| async { Err::<AuthResponse, _>(ApiError::Timeout) })
            .await;

        session.establish(&tokens("fresh", Some("r9"))).await.unwrap();
        assert!(session.is_authenticated());

        let reused = session
            .refresh_after(0, |_| async { no_exchange() })
            .await
            .unwrap()
            .expect("token from sign-in");
        assert_eq!(reused.access_token.as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_snapshot_waits_for_in_flight_refresh() {
        let session = Arc::new(manager(Some("old"), Some("r1")));
        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        let refreshing = {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                session
                    .refresh_after(0, |_| async move {
                        let _ = started_tx.send(());
                        let _ = release_rx.await;
                        Ok(tokens("new", None))
                    })
                    .await
            })
        };

        started_rx.await.unwrap();
        let snapshot = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.snapshot().await })
        };
        release_tx.send(()).unwrap();

        let snapshot = snapshot.await.unwrap().unwrap();
        refreshing.await.unwrap().unwrap();

        // The new token is only ever seen together with the new epoch
        assert_eq!(snapshot.access_token.as_deref(), Some("new"));
        assert_eq!(snapshot.epoch, 1);
    }

    #[tokio::test]
    async fn test_force_refresh_without_refresh_token() {
        let session = manager(Some("a"), None);
        let err = session
            .force_refresh(|_| async { Ok(tokens("b", None)) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotAuthenticated(_)));
    }
}
