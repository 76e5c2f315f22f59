use serde::Serialize;

use crate::model::record::{DATE_FORMAT, Record, TagValue};
use crate::ops::list_ops::Listed;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct RecordJson {
    pub index: usize,
    pub fingerprint: String,
    pub line: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_on: Option<String>,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<String>,
    #[serde(skip_serializing_if = "indexmap::IndexMap::is_empty")]
    pub tags: indexmap::IndexMap<String, TagValue>,
}

/// Result of a mutating command
#[derive(Serialize)]
pub struct ChangeJson {
    pub action: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordJson>,
    /// Companion created by completing a recurring record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecordJson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

pub fn record_to_json(index: usize, record: &Record) -> RecordJson {
    RecordJson {
        index,
        fingerprint: record.fingerprint().to_string(),
        line: record.to_line(),
        completed: record.is_completed(),
        priority: record.priority,
        created: record
            .creation_date
            .map(|d| d.format(DATE_FORMAT).to_string()),
        completed_on: record
            .completion_date()
            .map(|d| d.format(DATE_FORMAT).to_string()),
        text: record.text.clone(),
        projects: record.projects.iter().cloned().collect(),
        contexts: record.contexts.iter().cloned().collect(),
        tags: record.tags.clone(),
    }
}

pub fn listing_to_json(listed: &[Listed<'_>]) -> Vec<RecordJson> {
    listed
        .iter()
        .map(|l| record_to_json(l.index, l.record))
        .collect()
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// `[index] fingerprint  line`
pub fn format_record_line(index: usize, record: &Record) -> String {
    format!("[{}] {}  {}", index, record.fingerprint(), record.to_line())
}

pub fn format_listing(listed: &[Listed<'_>]) -> Vec<String> {
    listed
        .iter()
        .map(|l| format_record_line(l.index, l.record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_line_has_index_fingerprint_and_line() {
        let r = Record::parse("(A) call mom @phone");
        let line = format_record_line(3, &r);
        assert_eq!(line, format!("[3] {}  (A) call mom @phone", r.fingerprint()));
    }

    #[test]
    fn json_skips_empty_fields() {
        let r = Record::parse("plain");
        let json = serde_json::to_value(record_to_json(0, &r)).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["line"], "plain");
        assert_eq!(obj["completed"], false);
        assert!(!obj.contains_key("priority"));
        assert!(!obj.contains_key("tags"));
        assert!(!obj.contains_key("projects"));
    }

    #[test]
    fn json_tags_keep_lists() {
        let r = Record::parse("x 2024-06-02 2024-06-01 read +books tag:a tag:b due:2024-07-01");
        let json = serde_json::to_value(record_to_json(1, &r)).unwrap();
        assert_eq!(json["tags"]["tag"], serde_json::json!(["a", "b"]));
        assert_eq!(json["tags"]["due"], "2024-07-01");
        assert_eq!(json["created"], "2024-06-01");
        assert_eq!(json["completed_on"], "2024-06-02");
        assert_eq!(json["projects"], serde_json::json!(["books"]));
    }
}
