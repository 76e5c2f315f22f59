use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Tag key marking a record as hidden
pub const HIDDEN_KEY: &str = "h";
/// Tag key holding the due date
pub const DUE_KEY: &str = "due";
/// Tag key holding the threshold (start) date
pub const THRESHOLD_KEY: &str = "t";
/// Tag key holding the recurrence interval
pub const RECURRENCE_KEY: &str = "rec";

/// Date format used on the wire and in tags
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static NEXT_RECORD_ID: AtomicU64 = AtomicU64::new(1);

/// Process-local identity of a record. Survives every mutation of the record
/// and is never written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    fn next() -> Self {
        RecordId(NEXT_RECORD_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Short content hash of a record's serialized line. Changes whenever the
/// record does, so it is only a valid reference until the next mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Number of hex characters kept from the digest
    pub const LEN: usize = 8;

    pub fn of_line(line: &str) -> Self {
        let digest = Sha256::digest(line.as_bytes());
        let mut hex = hex::encode(digest);
        hex.truncate(Self::LEN);
        Fingerprint(hex)
    }

    /// Accepts exactly `LEN` hex characters (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        if s.len() == Self::LEN && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Fingerprint(s.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Value of an extended `key:value` tag. A key seen more than once holds all
/// of its values in encounter order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Single(String),
    Multi(Vec<String>),
}

impl TagValue {
    /// First value (the only one for `Single`)
    pub fn first(&self) -> &str {
        match self {
            TagValue::Single(v) => v,
            TagValue::Multi(vs) => vs.first().map_or("", |v| v.as_str()),
        }
    }

    pub fn values(&self) -> &[String] {
        match self {
            TagValue::Single(v) => std::slice::from_ref(v),
            TagValue::Multi(vs) => vs,
        }
    }

    /// Append another value, converting a single value into a list
    pub fn push(&mut self, value: String) {
        match self {
            TagValue::Single(v) => {
                let first = std::mem::take(v);
                *self = TagValue::Multi(vec![first, value]);
            }
            TagValue::Multi(vs) => vs.push(value),
        }
    }
}

/// One todo.txt task line in structured form.
///
/// Not `Clone`: a copy would share the identity used
/// for selection tracking. Use [`Record::duplicate`] to get a fresh one.
#[derive(Debug)]
pub struct Record {
    id: RecordId,
    /// Completion flag (`x ` marker)
    pub(crate) completed: bool,
    /// Priority letter `A`..=`Z`
    pub priority: Option<char>,
    pub creation_date: Option<NaiveDate>,
    /// Only ever set while `completed` is true
    pub(crate) completion_date: Option<NaiveDate>,
    /// Description with `key:value` tags stripped; `+project` and `@context`
    /// references stay in place
    pub text: String,
    pub projects: IndexSet<String>,
    pub contexts: IndexSet<String>,
    pub tags: IndexMap<String, TagValue>,
}

impl Record {
    /// An empty, active record with a fresh identity
    pub fn new() -> Self {
        Record {
            id: RecordId::next(),
            completed: false,
            priority: None,
            creation_date: None,
            completion_date: None,
            text: String::new(),
            projects: IndexSet::new(),
            contexts: IndexSet::new(),
            tags: IndexMap::new(),
        }
    }

    /// Parse one todo.txt line. Never fails; unrecognised syntax stays text.
    pub fn parse(line: &str) -> Self {
        crate::parse::parse_record(line)
    }

    /// Copy every field into a new record with its own identity
    pub fn duplicate(&self) -> Self {
        Record {
            id: RecordId::next(),
            completed: self.completed,
            priority: self.priority,
            creation_date: self.creation_date,
            completion_date: self.completion_date,
            text: self.text.clone(),
            projects: self.projects.clone(),
            contexts: self.contexts.clone(),
            tags: self.tags.clone(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn completion_date(&self) -> Option<NaiveDate> {
        self.completion_date
    }

    /// Mark complete or active. A completion date is only recorded alongside a
    /// creation date, and is always dropped when the record becomes active.
    pub(crate) fn set_completed(&mut self, completed: bool, on: NaiveDate) {
        self.completed = completed;
        self.completion_date = if completed && self.creation_date.is_some() {
            Some(on)
        } else {
            None
        };
    }

    /// The context used for grouping and sorting
    pub fn first_context(&self) -> Option<&str> {
        self.contexts.first().map(|c| c.as_str())
    }

    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    fn tag_date(&self, key: &str) -> Option<NaiveDate> {
        self.tag(key)
            .and_then(|v| NaiveDate::parse_from_str(v.first(), DATE_FORMAT).ok())
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.tag_date(DUE_KEY)
    }

    pub fn threshold_date(&self) -> Option<NaiveDate> {
        self.tag_date(THRESHOLD_KEY)
    }

    pub fn is_hidden(&self) -> bool {
        self.tag(HIDDEN_KEY).is_some_and(|v| v.first() != "0")
    }

    /// A due date names its midnight, so a record due today is already overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date().is_some_and(|due| due <= today)
    }

    pub fn is_passed_threshold(&self, today: NaiveDate) -> bool {
        self.threshold_date().is_none_or(|t| t <= today)
    }

    /// Shown in the overview: not hidden and past its threshold
    pub fn is_visible(&self, today: NaiveDate) -> bool {
        !self.is_hidden() && self.is_passed_threshold(today)
    }

    /// Serialized todo.txt line
    pub fn to_line(&self) -> String {
        crate::parse::serialize_record(self)
    }

    /// Line shown in the list view (omits the creation date)
    pub fn display_line(&self) -> String {
        crate::parse::display_record(self)
    }

    /// Description plus serialized tags: the text `set_text` expects back
    pub fn editable_text(&self) -> String {
        let mut out = self.text.clone();
        crate::parse::record_serializer::push_tags(&mut out, &self.tags);
        out
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_line(&self.to_line())
    }
}

impl Default for Record {
    fn default() -> Self {
        Record::new()
    }
}

/// Content equality; identity is ignored
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.completed == other.completed
            && self.priority == other.priority
            && self.creation_date == other.creation_date
            && self.completion_date == other.completion_date
            && self.text == other.text
            && self.projects == other.projects
            && self.contexts == other.contexts
            && self.tags == other.tags
    }
}

impl Eq for Record {}
