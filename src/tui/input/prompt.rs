use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{Change, DUE_KEY, RECURRENCE_KEY, THRESHOLD_KEY};
use crate::ops::{list_ops, record_ops};
use crate::tui::app::{App, Mode, Prompt, PromptKind};

use super::{Intent, apply_to};

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) -> Intent {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.mode = Mode::Navigate,
        (_, KeyCode::Enter) => {
            if let Mode::Prompt(prompt) = std::mem::replace(&mut app.mode, Mode::Navigate) {
                submit(app, prompt);
            }
        }
        (modifiers, code) => {
            if let Mode::Prompt(prompt) = &mut app.mode {
                edit_input(&mut prompt.input, modifiers, code);
            }
        }
    }
    Intent::Continue
}

/// Append-only line editing: type, Backspace, Ctrl+U clears, Ctrl+W drops a word
fn edit_input(input: &mut String, modifiers: KeyModifiers, code: KeyCode) {
    match (modifiers, code) {
        (KeyModifiers::CONTROL, KeyCode::Char('u')) => input.clear(),
        (KeyModifiers::CONTROL, KeyCode::Char('w')) => {
            let kept = input.trim_end().rfind(' ').map_or(0, |i| i + 1);
            input.truncate(kept);
        }
        (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => input.push(c),
        (_, KeyCode::Backspace) => {
            input.pop();
        }
        _ => {}
    }
}

fn submit(app: &mut App, prompt: Prompt) {
    let input = prompt.input.trim();
    let today = app.today;

    let Some(id) = prompt.target else {
        if input.is_empty() {
            return;
        }
        match list_ops::add(&mut app.collection, input, today) {
            Ok(id) => {
                app.commit(Change::Added(id));
                if !app.view.select(id) {
                    app.set_info("added (not shown: hidden or before its threshold)");
                }
            }
            Err(e) => app.set_error(e.to_string()),
        }
        return;
    };

    match prompt.kind {
        PromptKind::Edit => {
            if input.is_empty() {
                app.set_error("text cannot be empty");
                return;
            }
            apply_to(app, id, |r| Ok(record_ops::set_text(r, input)));
        }
        PromptKind::Due => apply_to(app, id, |r| {
            if input.is_empty() {
                return Ok(record_ops::clear_tag(r, DUE_KEY));
            }
            let date = record_ops::parse_date_input(input, today)?;
            Ok(record_ops::set_due_date(r, date))
        }),
        PromptKind::Threshold => apply_to(app, id, |r| {
            if input.is_empty() {
                return Ok(record_ops::clear_tag(r, THRESHOLD_KEY));
            }
            let date = record_ops::parse_date_input(input, today)?;
            Ok(record_ops::set_threshold_date(r, date))
        }),
        PromptKind::Recurrence => apply_to(app, id, |r| {
            if input.is_empty() {
                return Ok(record_ops::clear_tag(r, RECURRENCE_KEY));
            }
            record_ops::set_recurrence(r, input)
        }),
        PromptKind::New => {}
    }
}
