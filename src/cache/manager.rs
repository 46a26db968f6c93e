use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::User;

/// Fixed cache key for the user collection snapshot
const USERS_CACHE: &str = "users";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        let now = Utc::now();
        (now - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Covers clock skew (negative) as well
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self { cache_dir })
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    /// Returns Ok(None) when no snapshot exists; a snapshot that exists
    /// but does not parse is an Err so the caller can tell the two apart.
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let cached = CachedData::new(data);
        let path = self.cache_path(name);
        let contents = serde_json::to_string_pretty(&cached)?;
        std::fs::write(&path, contents)?;
        Ok(())
    }

    // ===== Users =====

    pub fn load_users(&self) -> Result<Option<CachedData<Vec<User>>>> {
        self.load(USERS_CACHE)
    }

    pub fn save_users(&self, users: &[User]) -> Result<()> {
        self.save(USERS_CACHE, &users)
    }

    /// Age of the stored snapshot for the status bar, if one exists
    pub fn users_age(&self) -> Option<String> {
        match self.load_users() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(error = %e, "Failed to load cache for age display");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_manager() -> CacheManager {
        let dir = std::env::temp_dir().join(format!(
            "userdir-cache-test-{}-{}",
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::SeqCst)
        ));
        CacheManager::new(dir).expect("Failed to create temp cache dir")
    }

    #[test]
    fn test_cached_data_age_display_just_now() {
        let cached = CachedData::new(vec![1, 2, 3]);
        assert_eq!(cached.age_display(), "just now");
    }

    #[test]
    fn test_cached_data_age_display_older() {
        let mut cached = CachedData::new(());
        cached.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(cached.age_display(), "5m ago");

        cached.cached_at = Utc::now() - Duration::hours(3);
        assert_eq!(cached.age_display(), "3h ago");

        cached.cached_at = Utc::now() - Duration::days(2);
        assert_eq!(cached.age_display(), "2d ago");
    }

    #[test]
    fn test_load_users_missing_is_none() {
        let cache = temp_manager();
        let loaded = cache.load_users().expect("Load of missing cache failed");
        assert!(loaded.is_none());
        assert!(cache.users_age().is_none());
    }

    #[test]
    fn test_save_and_load_users_round_trip() {
        let cache = temp_manager();
        let users = vec![
            User::new(1, "Ann", "ann1", "a@x.com"),
            User::new(2, "Bo", "bo99", "b@x.com"),
        ];

        cache.save_users(&users).expect("Failed to save users");

        let loaded = cache
            .load_users()
            .expect("Failed to load users")
            .expect("Snapshot missing after save");
        assert_eq!(loaded.data, users);
        assert_eq!(cache.users_age().as_deref(), Some("just now"));
    }

    #[test]
    fn test_load_users_malformed_is_err() {
        let cache = temp_manager();
        std::fs::write(cache.cache_path(USERS_CACHE), "{not valid json")
            .expect("Failed to write malformed cache");

        assert!(cache.load_users().is_err());
        // Age display degrades gracefully
        assert!(cache.users_age().is_none());
    }
}
