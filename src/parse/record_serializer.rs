use indexmap::IndexMap;

use crate::model::record::{DATE_FORMAT, Record, TagValue};

/// Serialize a record to its todo.txt line.
///
/// The creation date is written before the completion date. Lines written by
/// earlier versions rely on this order, so it is kept even though the usual
/// todo.txt convention is the reverse.
pub fn serialize_record(record: &Record) -> String {
    let mut line = String::with_capacity(record.text.len() + 32);
    push_header(&mut line, record, true);
    line.push_str(&record.text);
    push_tags(&mut line, &record.tags);
    line
}

/// Serialize for display: same as the stored line minus the creation date
pub fn display_record(record: &Record) -> String {
    let mut line = String::with_capacity(record.text.len() + 32);
    push_header(&mut line, record, false);
    line.push_str(&record.text);
    push_tags(&mut line, &record.tags);
    line
}

fn push_header(line: &mut String, record: &Record, with_creation_date: bool) {
    if record.is_completed() {
        line.push_str("x ");
    }
    if let Some(priority) = record.priority {
        line.push('(');
        line.push(priority);
        line.push_str(") ");
    }
    if with_creation_date && let Some(created) = record.creation_date {
        line.push_str(&created.format(DATE_FORMAT).to_string());
        line.push(' ');
    }
    if let Some(completed) = record.completion_date() {
        line.push_str(&completed.format(DATE_FORMAT).to_string());
        line.push(' ');
    }
}

/// Append ` key:value` for every tag value, repeating the key for lists
pub fn push_tags(out: &mut String, tags: &IndexMap<String, TagValue>) {
    for (key, value) in tags {
        for v in value.values() {
            out.push(' ');
            out.push_str(key);
            out.push(':');
            out.push_str(v);
        }
    }
}
