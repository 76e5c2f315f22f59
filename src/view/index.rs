use crate::model::record::{Record, RecordId};

/// Label of the group holding records without a context
pub const NO_CONTEXT_LABEL: &str = "None";

/// One navigable line of the list view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    /// Heading of a run of records that share a first context
    Group { label: String, count: usize },
    /// A record, by identity
    Record(RecordId),
}

impl Row {
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Row::Record(id) => Some(*id),
            Row::Group { .. } => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Row::Group { .. })
    }
}

/// Flatten a sorted, filtered projection into rows, starting a new group
/// every time the first context changes.
pub fn build_rows(projection: &[&Record]) -> Vec<Row> {
    let mut rows = Vec::with_capacity(projection.len() + 8);
    let mut header: Option<usize> = None;
    let mut current: Option<Option<&str>> = None;

    for record in projection {
        let context = record.first_context();
        if current != Some(context) {
            let label = context.unwrap_or(NO_CONTEXT_LABEL).to_string();
            header = Some(rows.len());
            rows.push(Row::Group { label, count: 0 });
            current = Some(context);
        }
        if let Some(Row::Group { count, .. }) = header.and_then(|h| rows.get_mut(h)) {
            *count += 1;
        }
        rows.push(Row::Record(record.id()));
    }
    rows
}

/// Position of the row holding a record
pub fn find_record(rows: &[Row], id: RecordId) -> Option<usize> {
    rows.iter().position(|r| r.record_id() == Some(id))
}
