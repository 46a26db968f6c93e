//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application intents: search-text changes, draft-field changes,
//! add submission, and delete requests.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Handle add-user form
    if matches!(app.state, AppState::AddingUser) {
        return handle_draft_input(app, key);
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        return handle_search_input(app, key);
    }

    // Normal mode
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('/') => {
            app.start_search();
        }
        KeyCode::Char('a') => {
            app.start_add_user();
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            app.delete_selected();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.move_selection_up(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.move_selection_down(1);
        }
        KeyCode::PageUp => {
            app.move_selection_up(PAGE_SCROLL_SIZE);
        }
        KeyCode::PageDown => {
            app.move_selection_down(PAGE_SCROLL_SIZE);
        }
        KeyCode::Home => {
            app.selection = 0;
        }
        KeyCode::End => {
            app.move_selection_down(usize::MAX);
        }
        KeyCode::Esc => {
            // Clear an active filter
            app.search_query.clear();
            app.selection = 0;
        }
        _ => {}
    }

    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
            app.selection = 0;
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.selection = 0;
        }
        KeyCode::Char(c) => {
            app.search_changed(c);
        }
        _ => {}
    }
    Ok(false)
}

fn handle_draft_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.cancel_add_user();
        }
        KeyCode::Enter => {
            app.submit_draft();
        }
        KeyCode::Tab | KeyCode::Down => {
            app.draft_focus = app.draft_focus.next();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.draft_focus = app.draft_focus.prev();
        }
        KeyCode::Backspace => {
            app.draft_field_backspace();
        }
        KeyCode::Char(c) => {
            app.draft_field_changed(c);
        }
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn test_app() -> App {
        App::new().expect("Failed to create app")
    }

    #[test]
    fn test_quit_flow() {
        let mut app = test_app();
        assert!(!handle_input(&mut app, key(KeyCode::Char('q'))).unwrap());
        assert_eq!(app.state, AppState::ConfirmingQuit);

        assert!(!handle_input(&mut app, key(KeyCode::Char('n'))).unwrap());
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Char('q'))).unwrap();
        assert!(handle_input(&mut app, key(KeyCode::Char('y'))).unwrap());
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn test_search_mode_edits_query() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::Char('/'))).unwrap();
        assert_eq!(app.state, AppState::Searching);

        handle_input(&mut app, key(KeyCode::Char('a'))).unwrap();
        handle_input(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.search_query, "an");

        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.search_query, "a");

        // Enter keeps the query, Esc clears it
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.search_query, "a");

        handle_input(&mut app, key(KeyCode::Char('/'))).unwrap();
        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(app.search_query.is_empty());
    }

    #[test]
    fn test_draft_form_flow() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.state, AppState::AddingUser);

        handle_input(&mut app, key(KeyCode::Char('B'))).unwrap();
        handle_input(&mut app, key(KeyCode::Char('o'))).unwrap();
        assert_eq!(app.draft.name, "Bo");

        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        handle_input(&mut app, key(KeyCode::Char('b'))).unwrap();
        assert_eq!(app.draft.username, "b");

        // Incomplete submit stays on the form with an error
        handle_input(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.state, AppState::AddingUser);
        assert!(app.draft_error.is_some());

        // Cancel clears everything
        handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.state, AppState::Normal);
        assert!(app.draft.name.is_empty());
        assert!(app.draft_error.is_none());
    }
}
