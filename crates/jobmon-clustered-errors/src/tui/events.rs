/*
[INPUT]:  Crossterm key codes
[OUTPUT]: AppState mutations and quit requests
[POS]:    TUI key routing
[UPDATE]: When changing keybindings
*/

use crossterm::event::KeyCode;
use tui_input::InputRequest;

use super::app::{AppState, InputMode};

const SCROLL_STEP: i16 = 1;
const PAGE_STEP: i16 = 10;

/// Handles key events for the TUI.
///
/// Returns `true` if quit is requested, `false` otherwise.
pub(super) fn handle_key_event(app: &mut AppState, key: KeyCode) -> bool {
    if app.input_mode != InputMode::Normal {
        handle_input_key(app, key);
        return false;
    }
    if app.panel.selection().is_open() {
        return handle_modal_key(app, key);
    }

    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('t') => app.begin_template_edit(),
        KeyCode::Char('w') => app.begin_workflow_edit(),
        KeyCode::Char('L') => app.toggle_logs(),
        _ => {}
    }
    false
}

fn handle_modal_key(app: &mut AppState, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Esc => app.close_sample(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_sample(),
        KeyCode::Right | KeyCode::Char('l') => app.next_sample(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_modal(-SCROLL_STEP),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_modal(SCROLL_STEP),
        KeyCode::PageUp => app.scroll_modal(-PAGE_STEP),
        KeyCode::PageDown => app.scroll_modal(PAGE_STEP),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('L') => app.toggle_logs(),
        _ => {}
    }
    false
}

fn handle_input_key(app: &mut AppState, key: KeyCode) {
    let workflow = app.input_mode == InputMode::Workflow;
    let request = match key {
        KeyCode::Enter if workflow => return app.submit_workflow(),
        KeyCode::Enter => return app.submit_template(),
        KeyCode::Esc if workflow => return app.cancel_workflow_edit(),
        KeyCode::Esc => return app.cancel_template_edit(),
        KeyCode::Char(c) if c.is_ascii_digit() => InputRequest::InsertChar(c),
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return,
    };
    if let Some(input) = app.active_input_mut() {
        input.handle(request);
    }
}
