//! The user directory store.
//!
//! `UserDirectory` owns the canonical in-memory user collection and keeps
//! it coherent with the persisted cache snapshot: every mutation writes a
//! whole-collection snapshot synchronously after the in-memory update.
//!
//! Initialization policy: the cache is consulted first; the remote source
//! is fetched only when no snapshot exists at all. A snapshot that exists
//! but does not parse leaves the directory empty without falling back to
//! the network.

use tracing::{debug, info, warn};

use crate::cache::CacheManager;
use crate::models::{User, UserDraft};
use crate::utils::contains_ignore_case;

/// Initialization state. `Ready` persists until process end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Uninitialized,
    Ready,
}

pub struct UserDirectory {
    users: Vec<User>,
    cache: CacheManager,
    state: StoreState,
}

impl UserDirectory {
    pub fn new(cache: CacheManager) -> Self {
        Self {
            users: Vec::new(),
            cache,
            state: StoreState::Uninitialized,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.state == StoreState::Ready
    }

    /// Full collection in insertion order
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Age of the persisted snapshot for the status bar, if one exists
    pub fn cache_age(&self) -> Option<String> {
        self.cache.users_age()
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize from the local cache snapshot.
    ///
    /// Returns true when initialization completed locally (a snapshot was
    /// found, or one was found but was unreadable and the directory starts
    /// empty). Returns false when no snapshot exists; the caller should
    /// fetch from the remote source and finish via `install_fetched` or
    /// `mark_ready`.
    pub fn load_from_cache(&mut self) -> bool {
        match self.cache.load_users() {
            Ok(Some(cached)) => {
                info!(count = cached.data.len(), "Loaded user directory from cache");
                self.users = cached.data;
                self.state = StoreState::Ready;
                true
            }
            Ok(None) => {
                debug!("No cache snapshot found");
                false
            }
            Err(e) => {
                // Unreadable snapshot counts as a cache miss, but without
                // a remote fallback: the directory starts empty.
                warn!(error = %e, "Cache snapshot unreadable, starting with empty directory");
                self.users.clear();
                self.state = StoreState::Ready;
                true
            }
        }
    }

    /// Install a freshly fetched collection and persist a snapshot.
    ///
    /// Replaces whatever is in memory unconditionally; a mutation made
    /// while the fetch was in flight is lost here.
    pub fn install_fetched(&mut self, users: Vec<User>) {
        self.users = users;
        self.state = StoreState::Ready;
        self.persist();
    }

    /// Finish initialization without data (the fetch failed).
    /// The collection stays empty; the failure is diagnostic-only.
    pub fn mark_ready(&mut self) {
        self.state = StoreState::Ready;
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Users whose name contains `term` as a case-insensitive substring,
    /// in collection order. An empty term matches all. Pure.
    pub fn search(&self, term: &str) -> Vec<&User> {
        self.users
            .iter()
            .filter(|u| contains_ignore_case(&u.name, term))
            .collect()
    }

    /// Append a new user built from the draft, assigning the next free id,
    /// and persist a snapshot. Returns the assigned id.
    ///
    /// Id policy is max-id + 1 (1 for an empty collection), so an id freed
    /// by a deletion is never handed out again while a higher one exists.
    pub fn add_user(&mut self, draft: &UserDraft) -> i64 {
        let id = self.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        self.users.push(User::new(
            id,
            draft.name.trim(),
            draft.username.trim(),
            draft.email.trim(),
        ));
        info!(id, "User added");
        self.persist();
        id
    }

    /// Remove the user with the given id and persist a snapshot.
    /// A missing id is not an error: the collection (and the snapshot)
    /// stay untouched. Returns whether a user was removed.
    pub fn delete_user(&mut self, id: i64) -> bool {
        let before = self.users.len();
        self.users.retain(|u| u.id != id);
        let removed = self.users.len() != before;
        if removed {
            info!(id, "User deleted");
            self.persist();
        } else {
            debug!(id, "Delete requested for unknown user id");
        }
        removed
    }

    /// Write a whole-collection snapshot.
    /// Write failures are logged and otherwise unobserved.
    fn persist(&self) {
        if let Err(e) = self.cache.save_users(&self.users) {
            warn!(error = %e, "Failed to write user directory snapshot");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
