use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::model::{DUE_KEY, RECURRENCE_KEY, Record, THRESHOLD_KEY};
use crate::ops::record_ops;
use crate::tui::app::{App, ConfirmAction, Mode, Prompt, PromptKind};
use crate::view::Nav;

use super::{Intent, apply_to};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) -> Intent {
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
            return Intent::Quit;
        }

        // Movement
        (_, KeyCode::Up | KeyCode::Char('k')) => {
            app.view.navigate(Nav::Prev);
        }
        (_, KeyCode::Down | KeyCode::Char('j')) => {
            app.view.navigate(Nav::Next);
        }
        (_, KeyCode::PageUp) => {
            app.view.navigate(Nav::PageUp);
        }
        (_, KeyCode::PageDown) => {
            app.view.navigate(Nav::PageDown);
        }
        (_, KeyCode::Home) => {
            app.view.navigate(Nav::Home);
        }
        (_, KeyCode::End) => {
            app.view.navigate(Nav::End);
        }

        // Record mutations
        (_, KeyCode::Char(' ')) => toggle_completion(app),
        (_, KeyCode::Char(c @ 'A'..='F')) => {
            if let Some(id) = app.view.selected_id() {
                apply_to(app, id, |r| record_ops::set_priority(r, c));
            }
        }
        (_, KeyCode::Char('-')) => {
            if let Some(id) = app.view.selected_id() {
                apply_to(app, id, |r| Ok(record_ops::clear_priority(r)));
            }
        }
        (_, KeyCode::Char('h')) => {
            if let Some(id) = app.view.selected_id() {
                app.mode = Mode::Confirm(ConfirmAction::Hide(id));
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(id) = app.view.selected_id() {
                app.mode = Mode::Confirm(ConfirmAction::Delete(id));
            }
        }
        (_, KeyCode::Char('a')) => {
            if app.collection.iter().any(|r| r.is_completed()) {
                app.mode = Mode::Confirm(ConfirmAction::Archive);
            } else {
                app.set_info("nothing to archive");
            }
        }

        (_, KeyCode::Char('c')) => copy_selected(app),

        // Prompts
        (_, KeyCode::Char('n')) => open_prompt(app, PromptKind::New),
        (_, KeyCode::Char('e')) => open_prompt(app, PromptKind::Edit),
        (_, KeyCode::Char('d')) => open_prompt(app, PromptKind::Due),
        (_, KeyCode::Char('t')) => open_prompt(app, PromptKind::Threshold),
        (_, KeyCode::Char('r')) => open_prompt(app, PromptKind::Recurrence),
        _ => {}
    }
    Intent::Continue
}

/// Completing a recurring record also adds its next occurrence
fn toggle_completion(app: &mut App) {
    let today = app.today;
    let Some(record) = app
        .view
        .selected_id()
        .and_then(|id| app.collection.get_mut(id))
    else {
        return;
    };
    let (change, companion) = record_ops::toggle_completion(record, today);
    if let Some(companion) = companion {
        info!(line = %companion.to_line(), "added next occurrence");
        app.collection.push(companion);
        app.set_info("added next occurrence");
    }
    app.commit(change);
}

/// Put the selected record's todo.txt line on the clipboard
fn copy_selected(app: &mut App) {
    let Some(line) = app.selected_record().map(Record::to_line) else {
        return;
    };
    match app.clipboard.set_text(&line) {
        Ok(()) => {
            debug!(%line, "copied");
            app.set_info("copied");
        }
        Err(e) => {
            warn!(error = %e, "copy failed");
            app.set_error(format!("not copied: {}", e));
        }
    }
}

/// Open the bottom-line prompt, prefilled with the current value
fn open_prompt(app: &mut App, kind: PromptKind) {
    if kind == PromptKind::New {
        app.mode = Mode::Prompt(Prompt {
            kind,
            target: None,
            input: String::new(),
        });
        return;
    }
    let Some(record) = app.selected_record() else {
        return;
    };
    let id = record.id();
    let tag = |key: &str| {
        record
            .tag(key)
            .map(|v| v.first().to_string())
            .unwrap_or_default()
    };
    let input = match kind {
        PromptKind::Edit => record.editable_text(),
        PromptKind::Due => tag(DUE_KEY),
        PromptKind::Threshold => tag(THRESHOLD_KEY),
        PromptKind::Recurrence => tag(RECURRENCE_KEY),
        PromptKind::New => String::new(),
    };
    app.mode = Mode::Prompt(Prompt {
        kind,
        target: Some(id),
        input,
    });
}

#[cfg(test)]
mod tests {
    use crate::tui::app::{ConfirmAction, Mode, PromptKind};
    use crate::tui::input::handle_key;
    use crate::tui::render::test_helpers::*;
    use crossterm::event::KeyCode;
    use pretty_assertions::assert_eq;

    #[test]
    fn arrows_skip_group_headings() {
        let (_dir, mut app) = app_from("a\nb @x\n");
        handle_key(&mut app, code(KeyCode::Down));
        assert_eq!(app.selected_record().unwrap().text, "b @x");
        assert_eq!(app.view.selected(), 3);
        handle_key(&mut app, code(KeyCode::Up));
        assert_eq!(app.view.selected(), 1);
        handle_key(&mut app, code(KeyCode::End));
        assert_eq!(app.view.selected(), 3);
        handle_key(&mut app, code(KeyCode::Home));
        assert_eq!(app.view.selected(), 1);
    }

    #[test]
    fn space_completes_and_adds_next_occurrence() {
        let (_dir, mut app) = app_from("2024-06-01 water plants rec:1w\n");
        handle_key(&mut app, key(' '));

        let lines: Vec<String> = app.collection.iter().map(|r| r.to_line()).collect();
        assert_eq!(
            lines,
            vec![
                "x 2024-06-01 2024-06-10 water plants rec:1w",
                "2024-06-01 water plants rec:1w due:2024-06-17",
            ]
        );
        // Selection stays on the completed record
        assert!(app.selected_record().unwrap().is_completed());
        assert_eq!(
            std::fs::read_to_string(app.store.path()).unwrap(),
            lines.join("\n") + "\n"
        );
    }

    #[test]
    fn shift_letters_set_priority_and_dash_clears() {
        let (_dir, mut app) = app_from("a\n");
        handle_key(&mut app, key('C'));
        assert_eq!(app.selected_record().unwrap().priority, Some('C'));
        handle_key(&mut app, key('-'));
        assert_eq!(app.selected_record().unwrap().priority, None);
    }

    #[test]
    fn hiding_asks_first() {
        let (_dir, mut app) = app_from("a\n");
        let id = app.view.selected_id().unwrap();
        handle_key(&mut app, key('h'));
        assert_eq!(app.mode, Mode::Confirm(ConfirmAction::Hide(id)));
        assert!(!app.selected_record().unwrap().is_hidden());
    }

    #[test]
    fn c_copies_the_selected_line() {
        let (_dir, mut app) = app_from("(B) 2024-06-01 call mom @phone due:2024-06-12\n");
        let clipboard = MemoryClipboard::default();
        app.clipboard = Box::new(clipboard.clone());

        handle_key(&mut app, key('c'));
        assert_eq!(
            clipboard.contents().as_deref(),
            Some("(B) 2024-06-01 call mom @phone due:2024-06-12")
        );
        assert_eq!(app.status.as_ref().unwrap().text, "copied");
        assert!(!app.status.as_ref().unwrap().is_error);
    }

    #[test]
    fn c_with_nothing_selected_copies_nothing() {
        let (_dir, mut app) = app_from("");
        let clipboard = MemoryClipboard::default();
        app.clipboard = Box::new(clipboard.clone());

        handle_key(&mut app, key('c'));
        assert_eq!(clipboard.contents(), None);
        assert_eq!(app.status, None);
    }

    #[test]
    fn delete_and_archive_ask_first() {
        let (_dir, mut app) = app_from("a\n");
        let id = app.view.selected_id().unwrap();
        handle_key(&mut app, code(KeyCode::Delete));
        assert_eq!(app.mode, Mode::Confirm(ConfirmAction::Delete(id)));

        let (_dir, mut app) = app_from("a\n");
        handle_key(&mut app, key('a'));
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(app.status.as_ref().unwrap().text, "nothing to archive");

        let (_dir, mut app) = app_from("x a\n");
        handle_key(&mut app, key('a'));
        assert_eq!(app.mode, Mode::Confirm(ConfirmAction::Archive));
    }

    #[test]
    fn prompts_are_prefilled() {
        let (_dir, mut app) = app_from("(A) pay rent @home due:2024-07-01\n");
        handle_key(&mut app, key('e'));
        let Mode::Prompt(prompt) = &app.mode else {
            panic!("expected prompt");
        };
        assert_eq!(prompt.kind, PromptKind::Edit);
        assert_eq!(prompt.input, "pay rent @home due:2024-07-01");

        handle_key(&mut app, code(KeyCode::Esc));
        handle_key(&mut app, key('d'));
        let Mode::Prompt(prompt) = &app.mode else {
            panic!("expected prompt");
        };
        assert_eq!(prompt.input, "2024-07-01");
    }

    #[test]
    fn record_prompts_need_a_selection() {
        let (_dir, mut app) = app_from("");
        handle_key(&mut app, key('e'));
        assert_eq!(app.mode, Mode::Navigate);
        handle_key(&mut app, key('n'));
        assert!(matches!(app.mode, Mode::Prompt(_)));
    }
}
