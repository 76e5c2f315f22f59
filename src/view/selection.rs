use crate::model::record::RecordId;

use super::index::{Row, find_record};

/// Lowest row a selection may land on; row 0 is always a group heading.
pub const FIRST_SELECTABLE: usize = 1;

/// A navigation request from the keyboard or mouse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Prev,
    Next,
    PageUp,
    PageDown,
    Home,
    End,
    /// A click on an absolute row
    Click(usize),
}

/// Keeps the selection on the same record across rebuilds of the rows.
#[derive(Debug, Clone)]
pub struct SelectionTracker {
    selected: usize,
    tracked: Option<RecordId>,
    page_size: usize,
}

impl SelectionTracker {
    pub fn new(page_size: usize) -> Self {
        SelectionTracker {
            selected: FIRST_SELECTABLE,
            tracked: None,
            page_size: page_size.max(1),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Identity of the record the selection follows
    pub fn tracked(&self) -> Option<RecordId> {
        self.tracked
    }

    /// Re-find the tracked record in freshly built rows. If it is gone, keep
    /// the nearest position at or above the old one and follow whatever
    /// record is there now.
    pub fn resolve(&mut self, rows: &[Row]) {
        if let Some(id) = self.tracked
            && let Some(pos) = find_record(rows, id)
        {
            self.selected = pos;
            return;
        }

        let Some(last) = last_selectable(rows) else {
            self.selected = FIRST_SELECTABLE;
            self.tracked = None;
            return;
        };
        let mut pos = self.selected.clamp(FIRST_SELECTABLE, last);
        if rows[pos].is_group() {
            pos = pos.saturating_sub(1).max(FIRST_SELECTABLE);
        }
        self.selected = pos;
        self.tracked = rows[pos].record_id();
    }

    /// Move the selection. A move that lands on a group heading continues one
    /// more row in the direction of travel. Returns whether anything changed.
    pub fn navigate(&mut self, nav: Nav, rows: &[Row]) -> bool {
        let Some(last) = last_selectable(rows) else {
            return false;
        };
        let current = self.selected.min(last) as isize;
        let page = self.page_size as isize;

        let (target, step) = match nav {
            Nav::Prev => (current - 1, -1),
            Nav::Next => (current + 1, 1),
            Nav::PageUp => (current - page, -1),
            Nav::PageDown => (current + page, 1),
            Nav::Home => (FIRST_SELECTABLE as isize, 0),
            Nav::End => (last as isize, 0),
            Nav::Click(row) => {
                if row > last {
                    return false;
                }
                let row = row as isize;
                (row, (row - current).signum())
            }
        };
        if target == current {
            return false;
        }

        let mut target = target;
        if usize::try_from(target)
            .ok()
            .and_then(|t| rows.get(t))
            .is_some_and(Row::is_group)
        {
            target += step;
        }
        let pos = target.clamp(FIRST_SELECTABLE as isize, last as isize) as usize;
        let moved = pos != self.selected;
        self.selected = pos;
        self.tracked = rows[pos].record_id();
        moved
    }

    /// Select a specific record, e.g. one that was just added
    pub fn select_record(&mut self, id: RecordId, rows: &[Row]) -> bool {
        match find_record(rows, id) {
            Some(pos) => {
                self.selected = pos;
                self.tracked = Some(id);
                true
            }
            None => false,
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }
}

/// Last row index, or `None` when there is nothing selectable
fn last_selectable(rows: &[Row]) -> Option<usize> {
    let last = rows.len().checked_sub(1)?;
    (last >= FIRST_SELECTABLE).then_some(last)
}
