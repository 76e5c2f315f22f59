mod confirm;
mod navigate;
mod prompt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::model::{Change, Record, RecordId};
use crate::ops::record_ops::RecordError;
use crate::view::Nav;

use super::app::{App, LIST_TOP, Mode};

use confirm::handle_confirm;
use navigate::handle_navigate;
use prompt::handle_prompt;

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Continue,
    Quit,
}

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) -> Intent {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return Intent::Continue;
    }
    app.status = None;

    let key = normalize_key(key);
    match &app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Prompt(_) => handle_prompt(app, key),
        Mode::Confirm(_) => handle_confirm(app, key),
    }
}

/// Clicks select the row under the pointer; the wheel moves one row
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Navigate {
        return;
    }
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let Some(line) = mouse.row.checked_sub(LIST_TOP).map(usize::from) else {
                return;
            };
            if line < app.view.height() {
                app.view.navigate(Nav::Click(app.view.row_at(line)));
            }
        }
        MouseEventKind::ScrollUp => {
            app.view.navigate(Nav::Prev);
        }
        MouseEventKind::ScrollDown => {
            app.view.navigate(Nav::Next);
        }
        _ => {}
    }
}

/// Shift+letter arrives as lowercase with SHIFT on some terminals
fn normalize_key(mut key: KeyEvent) -> KeyEvent {
    if let KeyCode::Char(c) = key.code
        && key.modifiers.contains(KeyModifiers::SHIFT)
        && c.is_ascii_lowercase()
    {
        key.code = KeyCode::Char(c.to_ascii_uppercase());
    }
    key
}

/// Run a mutation on one record, then save and rebuild, or report the error
fn apply_to(
    app: &mut App,
    id: RecordId,
    f: impl FnOnce(&mut Record) -> Result<Change, RecordError>,
) {
    let Some(record) = app.collection.get_mut(id) else {
        app.set_error("record no longer exists");
        return;
    };
    match f(record) {
        Ok(change) => app.commit(change),
        Err(e) => app.set_error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use pretty_assertions::assert_eq;

    fn click(row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn quit_keys() {
        let (_dir, mut app) = app_from("a\n");
        assert_eq!(handle_key(&mut app, key('q')), Intent::Quit);
        assert_eq!(
            handle_key(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Intent::Quit
        );
    }

    #[test]
    fn key_press_clears_status() {
        let (_dir, mut app) = app_from("a\n");
        app.set_error("boom");
        handle_key(&mut app, code(KeyCode::Down));
        assert_eq!(app.status, None);
    }

    #[test]
    fn click_selects_row_under_pointer() {
        // rows: 0 [None] 1 a 2 [x] 3 b @x 4 c @x
        let (_dir, mut app) = app_from("a\nb @x\nc @x\n");
        handle_mouse(&mut app, click(LIST_TOP + 4));
        assert_eq!(app.selected_record().unwrap().text, "c @x");

        // Group heading continues in the direction of travel
        handle_mouse(&mut app, click(LIST_TOP + 2));
        assert_eq!(app.selected_record().unwrap().text, "a");

        // Title bar and rows past the end are ignored
        handle_mouse(&mut app, click(0));
        handle_mouse(&mut app, click(LIST_TOP + 9));
        assert_eq!(app.selected_record().unwrap().text, "a");
    }

    #[test]
    fn wheel_moves_selection() {
        let (_dir, mut app) = app_from("a\nb\n");
        let scroll = |kind| MouseEvent {
            kind,
            column: 0,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut app, scroll(MouseEventKind::ScrollDown));
        assert_eq!(app.selected_record().unwrap().text, "b");
        handle_mouse(&mut app, scroll(MouseEventKind::ScrollUp));
        assert_eq!(app.selected_record().unwrap().text, "a");
    }

    #[test]
    fn shifted_lowercase_is_normalized() {
        let (_dir, mut app) = app_from("a\n");
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('b'), KeyModifiers::SHIFT));
        assert_eq!(app.selected_record().unwrap().priority, Some('B'));
    }
}
