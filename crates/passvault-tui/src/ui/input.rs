//! Keyboard input handling for the TUI.
//!
//! This module handles all terminal events: every one of them is first
//! normalized into an [`InteractionEvent`] for the session, then key presses
//! are translated into application state changes for the current view.

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};

use passvault_core::session::{InteractionEvent, Route};

use crate::app::{can_add_field_char, App, AppState, AuthFocus, PAGE_SCROLL_SIZE};

/// Normalize a terminal event for the activity tracker.
pub fn interaction_from(event: &Event) -> InteractionEvent {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => InteractionEvent::KeyDown,
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => InteractionEvent::PointerMove,
            MouseEventKind::Down(_) => InteractionEvent::PointerDown,
            _ => InteractionEvent::Other,
        },
        _ => InteractionEvent::Other,
    }
}

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.kind == KeyEventKind::Release {
        return Ok(false);
    }

    // Ctrl+L logs out from anywhere
    if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
        if app.session.is_authenticated() {
            app.logout();
        }
        return Ok(false);
    }

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

    match app.current_route() {
        Route::Login => handle_login_input(app, key).await,
        Route::Register => handle_register_input(app, key).await,
        Route::Dashboard => handle_dashboard_input(app, key),
        Route::Generator => handle_generator_input(app, key),
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::F(2) => app.navigate(Route::Register),
        KeyCode::F(3) => app.navigate(Route::Generator),
        KeyCode::Down | KeyCode::Tab => {
            app.login_form.focus = app.login_form.focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_form.focus = app.login_form.focus.prev();
        }
        KeyCode::Enter => match app.login_form.focus {
            AuthFocus::Username => app.login_form.focus = AuthFocus::Password,
            AuthFocus::Password | AuthFocus::Button => {
                // On failure login_form.error is set
                let _ = app.attempt_login().await;
            }
        },
        KeyCode::Backspace => app.login_form.pop_char(),
        KeyCode::Char(c) => app.login_form.push_char(c),
        _ => {}
    }
    Ok(false)
}

async fn handle_register_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.navigate(Route::Login),
        KeyCode::Down | KeyCode::Tab => {
            app.register_form.focus = app.register_form.focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.register_form.focus = app.register_form.focus.prev();
        }
        KeyCode::Enter => match app.register_form.focus {
            AuthFocus::Username => app.register_form.focus = AuthFocus::Password,
            AuthFocus::Password | AuthFocus::Button => {
                let _ = app.attempt_register().await;
            }
        },
        KeyCode::Backspace => app.register_form.pop_char(),
        KeyCode::Char(c) => app.register_form.push_char(c),
        _ => {}
    }
    Ok(false)
}

fn handle_dashboard_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::Searching => {
            handle_search_input(app, key);
            return Ok(false);
        }
        AppState::Editing => {
            handle_editor_input(app, key);
            return Ok(false);
        }
        AppState::Importing => {
            handle_import_input(app, key);
            return Ok(false);
        }
        AppState::ConfirmingDelete => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                }
                _ => {}
            }
            return Ok(false);
        }
        _ => {}
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('L') => app.logout(),
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
        }
        KeyCode::Esc => {
            app.search_query.clear();
            app.selection = 0;
        }
        KeyCode::Char('u') => app.refresh_passwords(),
        KeyCode::Char('n') => app.start_create(),
        KeyCode::Char('i') => app.start_import(),
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit(),
        KeyCode::Char('d') | KeyCode::Delete => app.start_delete(),
        KeyCode::Char('r') => app.reveal_value = !app.reveal_value,
        KeyCode::Char('g') => app.navigate(Route::Generator),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(1),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(1),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.selection = 0,
        KeyCode::End => app.select_next(usize::MAX / 2),
        _ => {}
    }
    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
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
            app.search_query.push(c);
            app.selection = 0;
        }
        _ => {}
    }
}

fn handle_import_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.state = AppState::Normal,
        KeyCode::Enter => app.submit_import(),
        KeyCode::Backspace => {
            app.import_path.pop();
        }
        KeyCode::Char(c) => {
            if can_add_field_char(app.import_path.chars().count(), c) {
                app.import_path.push(c);
            }
        }
        _ => {}
    }
}

fn handle_editor_input(app: &mut App, key: KeyEvent) {
    // Ctrl+G fills the password from the generator
    if key.code == KeyCode::Char('g') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.fill_generated_value();
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        KeyCode::Tab | KeyCode::Down => app.entry_form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.entry_form.focus_prev(),
        KeyCode::Enter => app.submit_entry_form(),
        KeyCode::Backspace => app.entry_form.pop_char(),
        KeyCode::Char(c) => app.entry_form.push_char(c),
        _ => {}
    }
}

fn handle_generator_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            let back = if app.session.is_authenticated() {
                Route::Dashboard
            } else {
                Route::Login
            };
            app.navigate(back);
        }
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Enter | KeyCode::Char(' ') => app.generate_password(),
        KeyCode::Char('+') | KeyCode::Right => app.generator.lengthen(),
        KeyCode::Char('-') | KeyCode::Left => app.generator.shorten(),
        KeyCode::Char('u') => app.generator.uppercase = !app.generator.uppercase,
        KeyCode::Char('d') => app.generator.digits = !app.generator.digits,
        KeyCode::Char('s') => app.generator.symbols = !app.generator.symbols,
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseButton, MouseEvent};

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_key_press_is_key_down() {
        let press = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(interaction_from(&press), InteractionEvent::KeyDown);

        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(interaction_from(&release), InteractionEvent::Other);
    }

    #[test]
    fn test_mouse_events_map_to_pointer() {
        assert_eq!(
            interaction_from(&mouse(MouseEventKind::Moved)),
            InteractionEvent::PointerMove
        );
        assert_eq!(
            interaction_from(&mouse(MouseEventKind::Drag(MouseButton::Left))),
            InteractionEvent::PointerMove
        );
        assert_eq!(
            interaction_from(&mouse(MouseEventKind::Down(MouseButton::Left))),
            InteractionEvent::PointerDown
        );
        assert_eq!(
            interaction_from(&mouse(MouseEventKind::ScrollDown)),
            InteractionEvent::Other
        );
    }

    #[tokio::test]
    async fn test_import_prompt_typing_and_cancel() {
        use std::sync::Arc;

        use passvault_core::clock::ManualClock;
        use passvault_core::config::Config;
        use passvault_core::session::MemoryStore;

        let config = Config {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let mut app = App::new(
            config,
            Box::new(MemoryStore::new()),
            Arc::new(ManualClock::default()),
        )
        .unwrap();
        app.complete_login("tok");

        let press = |c| KeyEvent::new(c, KeyModifiers::NONE);
        handle_input(&mut app, press(KeyCode::Char('i'))).await.unwrap();
        assert_eq!(app.state, AppState::Importing);

        for c in "a.csvx".chars() {
            handle_input(&mut app, press(KeyCode::Char(c))).await.unwrap();
        }
        handle_input(&mut app, press(KeyCode::Backspace)).await.unwrap();
        assert_eq!(app.import_path, "a.csv");

        handle_input(&mut app, press(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.import_path, "a.csv");
    }

    #[test]
    fn test_resize_and_focus_are_not_activity() {
        assert_eq!(interaction_from(&Event::Resize(80, 24)), InteractionEvent::Other);
        assert_eq!(interaction_from(&Event::FocusGained), InteractionEvent::Other);
    }
}
