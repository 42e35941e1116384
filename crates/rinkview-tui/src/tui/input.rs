// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// orchestrator, or into local ViewState changes (search text, quit prompt).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// app orchestrator, `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Some terminals report Release as well as Press.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    if view_state.filter_mode {
        return handle_filter_mode(key_event, view_state);
    }

    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => move_cursor(view_state, -1),
        KeyCode::Down | KeyCode::Char('j') => move_cursor(view_state, 1),
        KeyCode::Home => move_cursor(view_state, isize::MIN),
        KeyCode::End => move_cursor(view_state, isize::MAX),

        KeyCode::Left | KeyCode::Char('h') => Some(UserCommand::PrevSeason),
        KeyCode::Right | KeyCode::Char('l') => Some(UserCommand::NextSeason),

        KeyCode::Char('/') => {
            view_state.filter_mode = true;
            None
        }
        KeyCode::Esc => {
            view_state.filter_text.clear();
            view_state.sync_cursor();
            None
        }

        KeyCode::Char('r') => Some(UserCommand::Reload),

        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }

        _ => None,
    }
}

/// `y`/`q` confirm, `n`/`Esc` cancel, everything else is blocked.
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Search input. Typing narrows the list; Enter keeps the text and charts
/// the player under the cursor; Esc clears the search.
fn handle_filter_mode(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Esc => {
            view_state.filter_mode = false;
            view_state.filter_text.clear();
            view_state.sync_cursor();
            None
        }
        KeyCode::Enter => {
            view_state.filter_mode = false;
            select_cursor_player(view_state)
        }
        KeyCode::Backspace => {
            view_state.filter_text.pop();
            view_state.cursor = 0;
            None
        }
        KeyCode::Up => move_cursor(view_state, -1),
        KeyCode::Down => move_cursor(view_state, 1),
        KeyCode::Char(c) => {
            view_state.filter_text.push(c);
            view_state.cursor = 0;
            None
        }
        _ => None,
    }
}

/// Move the cursor within the filtered list and select the player under it.
fn move_cursor(view_state: &mut ViewState, delta: isize) -> Option<UserCommand> {
    let len = view_state.filtered_players().len();
    if len == 0 {
        return None;
    }
    let target = view_state.cursor.saturating_add_signed(delta).min(len - 1);
    if target == view_state.cursor && view_state.cursor_player() == view_state.selected_player.as_deref() {
        return None;
    }
    view_state.cursor = target;
    select_cursor_player(view_state)
}

fn select_cursor_player(view_state: &mut ViewState) -> Option<UserCommand> {
    let player = view_state.cursor_player()?.to_string();
    if view_state.selected_player.as_deref() == Some(player.as_str()) {
        return None;
    }
    view_state.selected_player = Some(player.clone());
    Some(UserCommand::SelectPlayer(player))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
