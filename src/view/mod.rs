pub mod index;
pub mod selection;
pub mod viewport;

pub use index::{NO_CONTEXT_LABEL, Row, build_rows};
pub use selection::{Nav, SelectionTracker};
pub use viewport::Viewport;

use chrono::NaiveDate;

use crate::model::collection::Collection;
use crate::model::record::RecordId;

/// Rows, selection and viewport of the list screen, recomputed together
/// after every change to the collection.
#[derive(Debug, Clone)]
pub struct ListView {
    rows: Vec<Row>,
    selection: SelectionTracker,
    viewport: Viewport,
}

impl ListView {
    pub fn new(page_size: usize, height: usize) -> Self {
        ListView {
            rows: Vec::new(),
            selection: SelectionTracker::new(page_size),
            viewport: Viewport::new(height),
        }
    }

    /// Rebuild rows from the collection and re-find the selected record
    pub fn rebuild(&mut self, collection: &Collection, today: NaiveDate) {
        let projection = collection.projection(today);
        self.rows = build_rows(&projection);
        self.selection.resolve(&self.rows);
        self.clamp_viewport();
    }

    pub fn navigate(&mut self, nav: Nav) -> bool {
        let moved = self.selection.navigate(nav, &self.rows);
        self.clamp_viewport();
        moved
    }

    /// Select a record if it is currently shown
    pub fn select(&mut self, id: RecordId) -> bool {
        let found = self.selection.select_record(id, &self.rows);
        self.clamp_viewport();
        found
    }

    pub fn resize(&mut self, height: usize) {
        self.viewport.set_height(height);
        self.clamp_viewport();
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn selected(&self) -> usize {
        self.selection.selected()
    }

    /// Record under the selection, if any
    pub fn selected_id(&self) -> Option<RecordId> {
        self.rows
            .get(self.selection.selected())
            .and_then(Row::record_id)
    }

    pub fn offset(&self) -> usize {
        self.viewport.offset()
    }

    pub fn height(&self) -> usize {
        self.viewport.height()
    }

    /// Rows on screen, each with its absolute index
    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        let range = self.viewport.visible(self.rows.len());
        let start = range.start;
        self.rows[range]
            .iter()
            .enumerate()
            .map(move |(i, row)| (start + i, row))
    }

    /// Absolute row index under a screen line of the list area
    pub fn row_at(&self, line: usize) -> usize {
        self.viewport.offset() + line
    }

    fn clamp_viewport(&mut self) {
        self.viewport.clamp(self.selection.selected(), self.rows.len());
    }
}
