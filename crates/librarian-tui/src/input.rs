//! Keyboard event processing, routed by view and input mode. Ctrl+C (quit)
//! is handled before this in the event loop.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::{App, InputMode, View};

pub(crate) fn handle_key(app: &mut App, key: KeyEvent) -> Result<()> {
    match app.view {
        View::Login => handle_login_key(app, key),
        View::Register => handle_register_key(app, key),
        View::Chat => handle_chat_key(app, key),
    }
    Ok(())
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('r') {
            app.view = View::Register;
        }
        return;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => app.login.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.login.prev_field(),
        KeyCode::Enter => app.submit_login(),
        KeyCode::Esc => app.quit(),
        KeyCode::Backspace => {
            app.login.focused_mut().pop();
        }
        KeyCode::Char(c) => app.login.focused_mut().push(c),
        _ => {}
    }
}

fn handle_register_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => app.register.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.register.prev_field(),
        KeyCode::Enter => app.submit_register(),
        KeyCode::Esc => app.view = View::Login,
        KeyCode::Backspace => {
            app.register.focused_mut().pop();
        }
        KeyCode::Char(c) => app.register.focused_mut().push(c),
        _ => {}
    }
}

fn handle_chat_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if key.code == KeyCode::Char('l') {
            app.logout();
        }
        return;
    }
    match app.input_mode {
        InputMode::Editing => match key.code {
            KeyCode::Enter => app.submit_chat(),
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                app.chat_input.pop();
            }
            KeyCode::PageUp => app.scroll_up(5),
            KeyCode::PageDown => app.scroll_down(5),
            KeyCode::Char(c) => app.chat_input.push(c),
            _ => {}
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('i') | KeyCode::Enter => app.input_mode = InputMode::Editing,
            KeyCode::Char('q') => app.quit(),
            KeyCode::Char('k') | KeyCode::Up => app.scroll_up(1),
            KeyCode::Char('j') | KeyCode::Down => app.scroll_down(1),
            KeyCode::PageUp => app.scroll_up(5),
            KeyCode::PageDown => app.scroll_down(5),
            KeyCode::Char('G') => app.scroll_to_bottom(),
            _ => {}
        },
    }
}
