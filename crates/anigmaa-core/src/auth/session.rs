use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::store::{Credentials, SessionStore};

/// Session file name in cache directory
const SESSION_FILE: &str = "session.json";

/// On-disk form of the session. Field names are the fixed storage keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(rename = "anigmaa_token")]
    pub access_token: String,
    #[serde(rename = "anigmaa_refresh_token", default)]
    pub refresh_token: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl SessionData {
    pub fn age(&self) -> Duration {
        Utc::now() - self.saved_at
    }

    /// Get minutes since the tokens were last written (for display)
    pub fn minutes_since_saved(&self) -> i64 {
        self.age().num_minutes().max(0)
    }
}

/// Session store backed by a JSON file in the cache directory.
pub struct FileSessionStore {
    cache_dir: PathBuf,
    // Serializes read-modify-write of the file
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            cache_dir,
            lock: Mutex::new(()),
        }
    }

    pub fn session_path(&self) -> PathBuf {
        self.cache_dir.join(SESSION_FILE)
    }

    /// Load session from disk
    pub fn load(&self) -> Result<Option<SessionData>> {
        let path = self.session_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read session file")?;
        let data: SessionData =
            serde_json::from_str(&contents).context("Failed to parse session file")?;
        Ok(Some(data))
    }

    /// Save session to disk
    fn save(&self, data: &SessionData) -> Result<()> {
        let path = self.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create session directory")?;
        }
        let contents = serde_json::to_string_pretty(data)?;
        std::fs::write(&path, contents).context("Failed to write session file")?;
        restrict_permissions(&path)?;
        debug!(path = %path.display(), "Session saved");
        Ok(())
    }

    fn guard(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| anyhow!("session file lock poisoned"))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Credentials> {
        let _guard = self.guard()?;
        Ok(match self.load()? {
            Some(data) => Credentials {
                access_token: Some(data.access_token),
                refresh_token: data.refresh_token,
            },
            None => Credentials::default(),
        })
    }

    fn set(&self, access_token: &str, refresh_token: Option<&str>) -> Result<()> {
        let _guard = self.guard()?;
        let refresh_token = match refresh_token {
            Some(token) => Some(token.to_string()),
            // A corrupt file is about to be overwritten anyway
            None => self.load().ok().flatten().and_then(|d| d.refresh_token),
        };
        self.save(&SessionData {
            access_token: access_token.to_string(),
            refresh_token,
            saved_at: Utc::now(),
        })
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.guard()?;
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .context("Failed to restrict session file permissions")
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested"));

        assert!(store.get().unwrap().is_empty());

        store.set("access-1", Some("refresh-1")).unwrap();
        store.set("access-2", None).unwrap();

        let creds = store.get().unwrap();
        assert_eq!(creds.access_token.as_deref(), Some("access-2"));
        assert_eq!(creds.refresh_token.as_deref(), Some("refresh-1"));

        store.clear().unwrap();
        assert!(store.get().unwrap().is_empty());
        assert!(!store.session_path().exists());
    }

    #[test]
    fn test_file_uses_fixed_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf());
        store.set("a", Some("r")).unwrap();

        let raw = std::fs::read_to_string(store.session_path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["anigmaa_token"], "a");
        assert_eq!(json["anigmaa_refresh_token"], "r");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().to_path_buf());
        std::fs::write(store.session_path(), "not json").unwrap();
        assert!(store.get().is_err());

        // Writing a fresh session recovers
        store.set("a", Some("r")).unwrap();
        assert_eq!(store.get().unwrap().access_token.as_deref(), Some("a"));
    }

    #[test]
    fn test_minutes_since_saved() {
        let data = SessionData {
            access_token: "a".into(),
            refresh_token: None,
            saved_at: Utc::now() - Duration::minutes(42),
        };
        assert_eq!(data.minutes_since_saved(), 42);
    }
}
