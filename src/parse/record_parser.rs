use std::sync::LazyLock;

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;

use crate::model::record::{DATE_FORMAT, Record, TagValue};

static PROJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\+([A-Za-z0-9_.\-]+)").expect("valid project regex"));
static CONTEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)@([A-Za-z0-9_.\-]+)").expect("valid context regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([A-Za-z]+):(\S+)").expect("valid tag regex"));

/// Leading markers of a line: `x `, `(A) `, and up to two dates
#[derive(Debug, Default, PartialEq, Eq)]
struct Header {
    completed: bool,
    priority: Option<char>,
    completion_date: Option<NaiveDate>,
    creation_date: Option<NaiveDate>,
}

/// Fields scanned out of the free text after the header
#[derive(Debug, Default)]
pub struct Fields {
    /// Text with `key:value` tags removed
    pub text: String,
    pub projects: IndexSet<String>,
    pub contexts: IndexSet<String>,
    pub tags: IndexMap<String, TagValue>,
}

/// Parse a todo.txt line into a record with a fresh identity.
///
/// There is no failure mode: anything that does not match the grammar stays
/// in the description.
pub fn parse_record(line: &str) -> Record {
    let line = line.trim_end_matches(['\r', '\n']);
    let (header, rest) = split_header(line);

    let mut record = Record::new();
    record.completed = header.completed;
    record.priority = header.priority;
    record.creation_date = header.creation_date;
    record.completion_date = header.completion_date;
    apply_text(&mut record, rest);
    record
}

/// Replace description, projects, contexts and tags from `text`
pub(crate) fn apply_text(record: &mut Record, text: &str) {
    let fields = extract_fields(text);
    record.text = fields.text;
    record.projects = fields.projects;
    record.contexts = fields.contexts;
    record.tags = fields.tags;
}

/// Scan free text for `+project`, `@context` and `key:value` tags.
/// Tags (with their leading whitespace) are cut out of the returned text;
/// project and context references are left in place.
pub fn extract_fields(text: &str) -> Fields {
    let projects = PROJECT_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect();
    let contexts = CONTEXT_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect();

    let mut tags: IndexMap<String, TagValue> = IndexMap::new();
    let mut description = String::with_capacity(text.len());
    let mut last_end = 0;
    for caps in TAG_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        description.push_str(&text[last_end..whole.start()]);
        last_end = whole.end();

        let key = &caps[1];
        let value = caps[2].to_string();
        match tags.get_mut(key) {
            Some(existing) => existing.push(value),
            None => {
                tags.insert(key.to_string(), TagValue::Single(value));
            }
        }
    }
    description.push_str(&text[last_end..]);

    Fields {
        text: description,
        projects,
        contexts,
        tags,
    }
}

/// One leading marker and the text it was taken from
enum Marker<'a> {
    Completed(&'a str),
    Priority(char, &'a str),
    Date(NaiveDate, &'a str),
}

impl<'a> Marker<'a> {
    fn source(&self) -> &'a str {
        match self {
            Marker::Completed(from) | Marker::Priority(_, from) | Marker::Date(_, from) => *from,
        }
    }
}

/// Split the leading markers off a line. The description must not be
/// empty: when the markers use up the whole line, the last one is given back
/// to the text.
fn split_header(line: &str) -> (Header, &str) {
    let mut markers = Vec::with_capacity(4);
    let mut rest = line;

    if let Some(after) = rest.strip_prefix("x ") {
        markers.push(Marker::Completed(rest));
        rest = after;
    }
    let completed = !markers.is_empty();

    if let Some((priority, after)) = take_priority(rest) {
        markers.push(Marker::Priority(priority, rest));
        rest = after;
    }

    // Active records never take a second date
    let max_dates = if completed { 2 } else { 1 };
    for _ in 0..max_dates {
        let Some((date, after)) = take_date(rest) else {
            break;
        };
        markers.push(Marker::Date(date, rest));
        rest = after;
    }

    if rest.is_empty()
        && let Some(last) = markers.pop()
    {
        rest = last.source();
    }

    let mut header = Header::default();
    let mut dates = Vec::with_capacity(2);
    for marker in markers {
        match marker {
            Marker::Completed(_) => header.completed = true,
            Marker::Priority(priority, _) => header.priority = Some(priority),
            Marker::Date(date, _) => dates.push(date),
        }
    }
    // Two dates are completion then creation; a lone date is always the
    // creation date
    match dates[..] {
        [completion, creation] => {
            header.completion_date = Some(completion);
            header.creation_date = Some(creation);
        }
        [creation] => header.creation_date = Some(creation),
        _ => {}
    }
    (header, rest)
}

/// `(X) ` with X an uppercase ASCII letter
fn take_priority(s: &str) -> Option<(char, &str)> {
    let b = s.as_bytes();
    if b.len() >= 4 && b[0] == b'(' && b[1].is_ascii_uppercase() && b[2] == b')' && b[3] == b' '
    {
        Some((b[1] as char, &s[4..]))
    } else {
        None
    }
}

/// `YYYY-MM-DD ` where the date is a real calendar date
fn take_date(s: &str) -> Option<(NaiveDate, &str)> {
    let b = s.as_bytes();
    if b.len() < 11 || b[10] != b' ' {
        return None;
    }
    let shaped = b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && matches!(b[5], b'0' | b'1')
        && b[6].is_ascii_digit()
        && b[7] == b'-'
        && matches!(b[8], b'0'..=b'3')
        && b[9].is_ascii_digit();
    if !shaped {
        return None;
    }
    let date = NaiveDate::parse_from_str(&s[..10], DATE_FORMAT).ok()?;
    Some((date, &s[11..]))
}
