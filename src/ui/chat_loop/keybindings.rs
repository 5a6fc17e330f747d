//! Translates key presses into app actions.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::app::ui_state::transcript_viewport_height;
use crate::core::app::AppAction;

/// Maps a key event to the action it triggers, if any. Esc is deliberately
/// unbound: a reply in flight runs to completion.
pub fn action_for_key(key: &KeyEvent, term_height: u16) -> Option<AppAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let page = transcript_viewport_height(term_height).max(1);

    match key.code {
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Some(AppAction::Quit),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(ch) => Some(AppAction::InsertChar { ch }),
        KeyCode::Enter => Some(AppAction::SubmitInput),
        KeyCode::Backspace => Some(AppAction::Backspace),
        KeyCode::Up => Some(AppAction::ScrollUp { lines: 1 }),
        KeyCode::Down => Some(AppAction::ScrollDown { lines: 1 }),
        KeyCode::PageUp => Some(AppAction::ScrollUp { lines: page }),
        KeyCode::PageDown => Some(AppAction::ScrollDown { lines: page }),
        KeyCode::End => Some(AppAction::ScrollToLatest),
        _ => None,
    }
}
