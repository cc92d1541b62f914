use anyhow::{Context, Result};
use keyring::Entry;

use super::store::{Credentials, SessionStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};

const SERVICE_NAME: &str = "anigmaa";

/// Session store backed by the OS keychain, one entry per storage key.
pub struct KeyringSessionStore {
    access: Entry,
    refresh: Entry,
}

impl KeyringSessionStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            access: Entry::new(SERVICE_NAME, ACCESS_TOKEN_KEY)
                .context("Failed to create keyring entry")?,
            refresh: Entry::new(SERVICE_NAME, REFRESH_TOKEN_KEY)
                .context("Failed to create keyring entry")?,
        })
    }

    fn read(entry: &Entry) -> Result<Option<String>> {
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn delete(entry: &Entry) -> Result<()> {
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

impl SessionStore for KeyringSessionStore {
    fn get(&self) -> Result<Credentials> {
        Ok(Credentials {
            access_token: Self::read(&self.access)?,
            refresh_token: Self::read(&self.refresh)?,
        })
    }

    fn set(&self, access_token: &str, refresh_token: Option<&str>) -> Result<()> {
        self.access
            .set_password(access_token)
            .context("Failed to store access token in keychain")?;
        if let Some(refresh) = refresh_token {
            self.refresh
                .set_password(refresh)
                .context("Failed to store refresh token in keychain")?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        Self::delete(&self.access)?;
        Self::delete(&self.refresh)
    }
}
