use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::io::store::FileStore;
use crate::model::Config;
use crate::tui::app::App;
use crate::tui::clipboard::Clipboard;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Fixed date used by TUI tests
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over a temporary `todo.txt` holding `content`, with a list area
/// of ten rows. Keep the `TempDir` alive for the duration of the test.
pub fn app_from(content: &str) -> (TempDir, App) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("todo.txt");
    std::fs::write(&path, content).unwrap();
    let app = App::new(FileStore::new(path, None), &Config::default(), 10, test_today()).unwrap();
    (dir, app)
}

pub fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

pub fn code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// Clipboard that keeps the last copied text; clones share it
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard(Rc<RefCell<Option<String>>>);

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.0.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), arboard::Error> {
        *self.0.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}
