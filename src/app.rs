//! Application state management for userdir.
//!
//! This module contains the `App` struct that owns the directory store,
//! the UI state, and the background fetch channel used during
//! initialization.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::cache::CacheManager;
use crate::config::Config;
use crate::models::{User, UserDraft};
use crate::store::UserDirectory;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background fetch message channel.
/// Initialization produces at most one message, so a small buffer suffices.
const CHANNEL_BUFFER_SIZE: usize = 8;

/// Maximum length for a form field or the search query
const MAX_INPUT_LENGTH: usize = 60;

/// Number of rows to scroll on page up/down
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    AddingUser,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

/// Add-user form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Username,
    Email,
}

impl DraftField {
    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Name => "Name",
            DraftField::Username => "Username",
            DraftField::Email => "Email",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            DraftField::Name => DraftField::Username,
            DraftField::Username => DraftField::Email,
            DraftField::Email => DraftField::Name,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            DraftField::Name => DraftField::Email,
            DraftField::Username => DraftField::Name,
            DraftField::Email => DraftField::Username,
        }
    }
}

// ============================================================================
// Background Fetch Results
// ============================================================================

/// Result of the one-shot background fetch performed when no cache exists.
enum FetchResult {
    /// The user collection was fetched successfully
    Users(Vec<User>),
    /// The fetch failed; the directory stays empty
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub api: ApiClient,
    pub store: UserDirectory,

    // UI state
    pub state: AppState,
    pub search_query: String,
    pub selection: usize,

    // Add-user form state
    pub draft: UserDraft,
    pub draft_focus: DraftField,
    pub draft_error: Option<String>,

    // Status bar
    pub status_message: Option<String>,
    pub cache_age: Option<String>,

    // Background fetch channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config
            .cache_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("./cache"));
        let store = UserDirectory::new(CacheManager::new(cache_dir)?);

        let mut api = ApiClient::new()?;
        if let Some(ref url) = config.users_url {
            api = api.with_users_url(url.clone());
        }

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            api,
            store,

            state: AppState::Normal,
            search_query: String::new(),
            selection: 0,

            draft: UserDraft::default(),
            draft_focus: DraftField::Name,
            draft_error: None,

            status_message: None,
            cache_age: None,

            fetch_rx: rx,
            fetch_tx: tx,
        })
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Populate the directory: from the cache snapshot when one exists,
    /// otherwise via a single background fetch from the remote source.
    pub fn initialize(&mut self) {
        if self.store.load_from_cache() {
            self.cache_age = self.store.cache_age();
            return;
        }
        self.fetch_users_background();
    }

    /// Spawn the one-shot fetch task. Called at most once per session.
    fn fetch_users_background(&mut self) {
        info!("No cache found, fetching user directory");

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();

        tokio::spawn(async move {
            let result = match api.fetch_users().await {
                Ok(users) => FetchResult::Users(users),
                Err(e) => {
                    error!(error = %e, "User directory fetch failed");
                    FetchResult::Error(e.to_string())
                }
            };
            if let Err(e) = tx.send(result).await {
                error!(error = %e, "Failed to send fetch result - channel closed");
            }
        });

        self.status_message = Some("Loading users...".to_string());
    }

    /// Drain completed background work and apply it
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.fetch_rx.try_recv() {
            self.process_fetch_result(result);
        }
    }

    fn process_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::Users(users) => {
                info!(count = users.len(), "User directory fetched");
                // Unconditional overwrite: anything added or deleted while
                // the fetch was in flight is replaced here.
                self.store.install_fetched(users);
                self.cache_age = self.store.cache_age();
                self.selection = 0;
                self.status_message = None;
            }
            FetchResult::Error(msg) => {
                self.store.mark_ready();
                let user_message = if msg.to_lowercase().contains("connect")
                    || msg.to_lowercase().contains("network")
                {
                    "Unable to reach the user service. Check your connection.".to_string()
                } else if msg.to_lowercase().contains("timed out")
                    || msg.to_lowercase().contains("timeout")
                {
                    "Connection timed out loading users.".to_string()
                } else {
                    format!("Failed to load users: {}", msg)
                };
                self.status_message = Some(user_message);
            }
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// The collection filtered by the current search query, in order
    pub fn filtered_users(&self) -> Vec<&User> {
        self.store.search(&self.search_query)
    }

    pub fn selected_user_id(&self) -> Option<i64> {
        self.filtered_users().get(self.selection).map(|u| u.id)
    }

    // =========================================================================
    // Intents from the presentation layer
    // =========================================================================

    pub fn start_search(&mut self) {
        self.state = AppState::Searching;
    }

    pub fn search_changed(&mut self, c: char) {
        if self.search_query.len() < MAX_INPUT_LENGTH {
            self.search_query.push(c);
            self.selection = 0;
        }
    }

    pub fn start_add_user(&mut self) {
        self.state = AppState::AddingUser;
        self.draft_focus = DraftField::Name;
        self.draft_error = None;
    }

    pub fn cancel_add_user(&mut self) {
        self.draft.clear();
        self.draft_error = None;
        self.state = AppState::Normal;
    }

    /// Append to the focused draft field
    pub fn draft_field_changed(&mut self, c: char) {
        let field = match self.draft_focus {
            DraftField::Name => &mut self.draft.name,
            DraftField::Username => &mut self.draft.username,
            DraftField::Email => &mut self.draft.email,
        };
        if field.len() < MAX_INPUT_LENGTH {
            field.push(c);
        }
        self.draft_error = None;
    }

    pub fn draft_field_backspace(&mut self) {
        let field = match self.draft_focus {
            DraftField::Name => &mut self.draft.name,
            DraftField::Username => &mut self.draft.username,
            DraftField::Email => &mut self.draft.email,
        };
        field.pop();
    }

    /// Submit the add-user form. Required-field presence is the only
    /// validation; the store assigns the id.
    pub fn submit_draft(&mut self) {
        if !self.draft.is_complete() {
            self.draft_error = Some("All fields are required".to_string());
            return;
        }

        let id = self.store.add_user(&self.draft);
        self.cache_age = self.store.cache_age();
        self.draft.clear();
        self.draft_error = None;
        self.state = AppState::Normal;
        self.status_message = Some(format!("Added user #{}", id));
    }

    /// Delete the user currently selected in the filtered view
    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_user_id() else {
            return;
        };

        if self.store.delete_user(id) {
            self.cache_age = self.store.cache_age();
            self.status_message = Some(format!("Deleted user #{}", id));
        }

        // Keep the selection on a valid row
        let visible = self.filtered_users().len();
        self.selection = self.selection.min(visible.saturating_sub(1));
    }

    // =========================================================================
    // Selection movement
    // =========================================================================

    pub fn move_selection_up(&mut self, rows: usize) {
        self.selection = self.selection.saturating_sub(rows);
    }

    pub fn move_selection_down(&mut self, rows: usize) {
        let visible = self.filtered_users().len();
        if visible == 0 {
            self.selection = 0;
        } else {
            self.selection = self.selection.saturating_add(rows).min(visible - 1);
        }
    }
}
