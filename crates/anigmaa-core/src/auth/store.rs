use std::fmt;
use std::sync::RwLock;

use anyhow::{anyhow, Result};

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "anigmaa_token";

/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "anigmaa_refresh_token";

/// The stored credential pair. Either half may be missing.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl Credentials {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }
}

// Tokens never end up in logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |t: &Option<String>| t.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .finish()
    }
}

/// Persistence for the session credentials.
///
/// `set` with `refresh_token: None` replaces the access token and keeps
/// whatever refresh token is already stored.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Credentials>;
    fn set(&self, access_token: &str, refresh_token: Option<&str>) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Credentials>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access_token: Option<&str>, refresh_token: Option<&str>) -> Self {
        Self {
            inner: RwLock::new(Credentials {
                access_token: access_token.map(str::to_string),
                refresh_token: refresh_token.map(str::to_string),
            }),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Credentials> {
        let guard = self
            .inner
            .read()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        Ok(guard.clone())
    }

    fn set(&self, access_token: &str, refresh_token: Option<&str>) -> Result<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        guard.access_token = Some(access_token.to_string());
        if let Some(refresh) = refresh_token {
            guard.refresh_token = Some(refresh.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| anyhow!("session store lock poisoned"))?;
        *guard = Credentials::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_without_refresh_keeps_existing() {
        let store = MemorySessionStore::with_tokens(Some("old"), Some("refresh-1"));
        store.set("new", None).unwrap();

        let creds = store.get().unwrap();
        assert_eq!(creds.access_token.as_deref(), Some("new"));
        assert_eq!(creds.refresh_token.as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_set_with_refresh_replaces_both() {
        let store = MemorySessionStore::new();
        store.set("access", Some("refresh")).unwrap();
        store.set("access-2", Some("refresh-2")).unwrap();

        let creds = store.get().unwrap();
        assert_eq!(creds.access_token.as_deref(), Some("access-2"));
        assert_eq!(creds.refresh_token.as_deref(), Some("refresh-2"));
        assert!(creds.can_refresh());
    }

    #[test]
    fn test_clear_removes_both() {
        let store = MemorySessionStore::with_tokens(Some("a"), Some("r"));
        store.clear().unwrap();
        assert!(store.get().unwrap().is_empty());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let creds = Credentials {
            access_token: Some("secret-access".into()),
            refresh_token: None,
        };
        let printed = format!("{:?}", creds);
        assert!(!printed.contains("secret-access"));
        assert!(printed.contains("<redacted>"));
    }
}
