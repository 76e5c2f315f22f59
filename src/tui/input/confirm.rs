use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::model::{Change, RecordId};
use crate::ops::record_ops;
use crate::tui::app::{App, ConfirmAction, Mode};

use super::{Intent, apply_to};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) -> Intent {
    match (key.modifiers, key.code) {
        // Confirm: y
        (KeyModifiers::NONE, KeyCode::Char('y')) => {
            if let Mode::Confirm(action) = std::mem::replace(&mut app.mode, Mode::Navigate) {
                match action {
                    ConfirmAction::Delete(id) => confirm_delete(app, id),
                    ConfirmAction::Hide(id) => {
                        apply_to(app, id, |r| Ok(record_ops::toggle_hidden(r)));
                    }
                    ConfirmAction::Archive => app.archive_completed(),
                }
            }
        }
        // Cancel: n or Esc
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.mode = Mode::Navigate;
        }
        _ => {}
    }
    Intent::Continue
}

fn confirm_delete(app: &mut App, id: RecordId) {
    let Some(removed) = app.collection.remove(id) else {
        app.set_error("record no longer exists");
        return;
    };
    info!(line = %removed.to_line(), "deleted");
    app.set_info("deleted");
    app.commit(Change::Removed(id));
}
