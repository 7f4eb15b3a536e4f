// File: src/tui/handlers.rs
// Handles keyboard, mouse and loader events for the TUI.
use crate::tui::action::{Action, AppEvent};
use crate::tui::state::{AppState, InputMode};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use std::path::PathBuf;
use std::time::Instant;

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: isize = 3;

pub fn handle_app_event(state: &mut AppState, event: AppEvent) {
    match event {
        AppEvent::Status(s) => state.message = s,
        AppEvent::ImportFinished(path, report) => {
            if !report.is_clean() {
                log::warn!(
                    "Import of {} produced {} diagnostic(s)",
                    path.display(),
                    report.diagnostics.len()
                );
            }
            state.apply_import(&path, report);
        }
    }
}

pub fn handle_mouse_event(mouse: MouseEvent, state: &mut AppState, at: Instant) {
    match mouse.kind {
        MouseEventKind::ScrollDown => state.user_scroll(WHEEL_STEP, at),
        MouseEventKind::ScrollUp => state.user_scroll(-WHEEL_STEP, at),
        _ => {}
    }
}

pub fn handle_key_event(key: KeyEvent, state: &mut AppState, at: Instant) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match state.mode {
        InputMode::Importing => match key.code {
            KeyCode::Enter => {
                let raw = state.input_buffer.trim().to_string();
                state.mode = InputMode::Normal;
                state.reset_input();
                if raw.is_empty() {
                    state.message = "Import cancelled.".to_string();
                    return None;
                }
                return Some(Action::Import(PathBuf::from(raw)));
            }
            KeyCode::Esc => {
                state.mode = InputMode::Normal;
                state.reset_input();
            }
            KeyCode::Char(c) => state.enter_char(c),
            KeyCode::Backspace => state.delete_char(),
            KeyCode::Left => state.move_cursor_left(),
            KeyCode::Right => state.move_cursor_right(),
            _ => {}
        },
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => return Some(Action::Quit),
            KeyCode::Char('?') => state.show_full_help = !state.show_full_help,
            KeyCode::Esc => {
                if !state.diagnostics.is_empty() {
                    state.dismiss_diagnostics();
                } else {
                    state.show_full_help = false;
                }
            }
            KeyCode::Char('d') => state.dismiss_diagnostics(),
            KeyCode::Char('a') => state.toggle_auto_scroll(),
            KeyCode::Char('i') => {
                state.mode = InputMode::Importing;
                state.reset_input();
            }
            KeyCode::Char(' ') | KeyCode::Enter => match state.toggle_selected() {
                Some(true) => state.message = "Marked done.".to_string(),
                Some(false) => state.message = "Marked not done.".to_string(),
                None => {}
            },
            KeyCode::Down | KeyCode::Char('j') => state.next(at),
            KeyCode::Up | KeyCode::Char('k') => state.previous(at),
            KeyCode::PageDown => {
                let page = state.viewport.height.max(1) as isize;
                state.user_scroll(page, at);
            }
            KeyCode::PageUp => {
                let page = state.viewport.height.max(1) as isize;
                state.user_scroll(-page, at);
            }
            _ => {}
        },
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoscroll::ScrollMode;
    use crate::config::Config;
    use crate::context::TestContext;
    use crate::import::ImportReport;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn state() -> AppState {
        let now = NaiveDate::from_ymd_opt(2026, 2, 1)
            .and_then(|d| d.and_hms_opt(8, 0, 0))
            .unwrap();
        AppState::new_with_ctx(Arc::new(TestContext::new()), Config::default(), now)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_import_prompt_returns_path() {
        let mut state = state();
        let t = Instant::now();
        assert!(handle_key_event(press(KeyCode::Char('i')), &mut state, t).is_none());
        assert_eq!(state.mode, InputMode::Importing);
        for c in "show.csv".chars() {
            handle_key_event(press(KeyCode::Char(c)), &mut state, t);
        }
        match handle_key_event(press(KeyCode::Enter), &mut state, t) {
            Some(Action::Import(path)) => assert_eq!(path, PathBuf::from("show.csv")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(state.mode, InputMode::Normal);
        assert!(state.input_buffer.is_empty());
    }

    #[test]
    fn test_q_in_prompt_is_text_not_quit() {
        let mut state = state();
        let t = Instant::now();
        handle_key_event(press(KeyCode::Char('i')), &mut state, t);
        assert!(handle_key_event(press(KeyCode::Char('q')), &mut state, t).is_none());
        assert_eq!(state.input_buffer, "q");
        handle_key_event(press(KeyCode::Esc), &mut state, t);
        assert!(matches!(
            handle_key_event(press(KeyCode::Char('q')), &mut state, t),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn test_page_down_is_a_user_scroll() {
        let mut state = state();
        handle_key_event(press(KeyCode::PageDown), &mut state, Instant::now());
        assert_eq!(state.run.autoscroll.mode(), ScrollMode::ManualOverride);
    }

    #[test]
    fn test_failed_import_event_shows_diagnostic() {
        let mut state = state();
        handle_app_event(
            &mut state,
            AppEvent::ImportFinished(PathBuf::from("x.csv"), ImportReport::failed("nope")),
        );
        assert_eq!(state.diagnostics.len(), 1);
        handle_key_event(press(KeyCode::Char('d')), &mut state, Instant::now());
        assert!(state.diagnostics.is_empty());
    }
}
