use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::debug;

use crate::model::collection::{Change, Collection, filter_hidden, sort_by_importance};
use crate::model::record::{Fingerprint, Record, RecordId};
use crate::ops::record_ops::{self, RecordError};

/// Error type for list-level operations addressed by reference
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("no record matches {0}")]
    NotFound(RecordRef),
    #[error("invalid record reference '{0}' (expected an index or an 8-character fingerprint)")]
    InvalidReference(String),
    #[error("record text is empty")]
    EmptyText,
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// How a caller names a record: a position in stored order, or the
/// fingerprint of its current line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    Index(usize),
    Fingerprint(Fingerprint),
}

impl FromStr for RecordRef {
    type Err = ListError;

    /// Exactly eight hex characters is a fingerprint; anything else must be a
    /// decimal index.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(fp) = Fingerprint::parse(s) {
            return Ok(RecordRef::Fingerprint(fp));
        }
        s.parse::<usize>()
            .map(RecordRef::Index)
            .map_err(|_| ListError::InvalidReference(s.to_string()))
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Index(i) => write!(f, "index {}", i),
            RecordRef::Fingerprint(fp) => write!(f, "fingerprint {}", fp),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Todo,
    Done,
}

/// Options layered over the importance order
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub status: StatusFilter,
    /// Case-insensitive substring of the serialized line
    pub search: Option<String>,
    /// Include hidden records and records before their threshold
    pub include_hidden: bool,
    pub offset: usize,
    pub limit: Option<usize>,
}

/// One listed record with its position in stored order
#[derive(Debug)]
pub struct Listed<'a> {
    pub index: usize,
    pub record: &'a Record,
}

/// Records in importance order, filtered and paged by `query`
pub fn list<'a>(collection: &'a Collection, query: &ListQuery, today: NaiveDate) -> Vec<Listed<'a>> {
    let sorted = sort_by_importance(collection.iter().collect(), today);
    let base = if query.include_hidden {
        sorted
    } else {
        filter_hidden(sorted, today)
    };
    let needle = query.search.as_deref().map(str::to_lowercase);

    base.into_iter()
        .filter(|r| match query.status {
            StatusFilter::All => true,
            StatusFilter::Todo => !r.is_completed(),
            StatusFilter::Done => r.is_completed(),
        })
        .filter(|r| {
            needle
                .as_deref()
                .is_none_or(|n| r.to_line().to_lowercase().contains(n))
        })
        .skip(query.offset)
        .take(query.limit.unwrap_or(usize::MAX))
        .filter_map(|record| {
            collection
                .position(record.id())
                .map(|index| Listed { index, record })
        })
        .collect()
}

/// Look up the record a reference names
pub fn resolve(collection: &Collection, reference: &RecordRef) -> Result<RecordId, ListError> {
    let found = match reference {
        RecordRef::Index(i) => collection.get_index(*i),
        RecordRef::Fingerprint(fp) => collection.find_by_fingerprint(fp),
    };
    found
        .map(|r| r.id())
        .ok_or_else(|| ListError::NotFound(reference.clone()))
}

/// Parse `text` as a new record and append it, stamping today's creation
/// date when the text has none
pub fn add(collection: &mut Collection, text: &str, today: NaiveDate) -> Result<RecordId, ListError> {
    if text.trim().is_empty() {
        return Err(ListError::EmptyText);
    }
    let mut record = Record::parse(text);
    if record.creation_date.is_none() {
        record.creation_date = Some(today);
    }
    let id = record.id();
    debug!(record = %id, line = %record.to_line(), "add");
    collection.push(record);
    Ok(id)
}

/// Replace the text (description, projects, contexts, tags) of a record
pub fn edit(collection: &mut Collection, reference: &RecordRef, text: &str) -> Result<Change, ListError> {
    if text.trim().is_empty() {
        return Err(ListError::EmptyText);
    }
    let id = resolve(collection, reference)?;
    let record = collection
        .get_mut(id)
        .ok_or_else(|| ListError::NotFound(reference.clone()))?;
    Ok(record_ops::set_text(record, text))
}

/// Mark a record done or active. Already in that state is a no-op. Completing
/// a recurring record appends its companion to the collection.
pub fn set_status(
    collection: &mut Collection,
    reference: &RecordRef,
    done: bool,
    today: NaiveDate,
) -> Result<Change, ListError> {
    let id = resolve(collection, reference)?;
    let record = collection
        .get_mut(id)
        .ok_or_else(|| ListError::NotFound(reference.clone()))?;
    if record.is_completed() == done {
        return Ok(Change::None);
    }
    let (change, companion) = record_ops::toggle_completion(record, today);
    if let Some(companion) = companion {
        debug!(record = %id, companion = %companion.id(), "recurrence");
        collection.push(companion);
    }
    Ok(change)
}

pub fn delete(collection: &mut Collection, reference: &RecordRef) -> Result<Record, ListError> {
    let id = resolve(collection, reference)?;
    collection
        .remove(id)
        .ok_or_else(|| ListError::NotFound(reference.clone()))
}

/// Remove every completed record and hand them back for archiving
pub fn archive_completed(collection: &mut Collection) -> Vec<Record> {
    collection.take_completed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_list;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn collection(text: &str) -> Collection {
        Collection::from_records(parse_list(text))
    }

    fn lines(collection: &Collection) -> Vec<String> {
        collection.iter().map(|r| r.to_line()).collect()
    }

    fn listed(collection: &Collection, query: &ListQuery) -> Vec<(usize, String)> {
        list(collection, query, today())
            .iter()
            .map(|l| (l.index, l.record.to_line()))
            .collect()
    }

    #[test]
    fn parse_reference() {
        assert_eq!("3".parse::<RecordRef>().unwrap(), RecordRef::Index(3));
        assert_eq!(
            "DEADBEEF".parse::<RecordRef>().unwrap(),
            RecordRef::Fingerprint(Fingerprint::parse("deadbeef").unwrap())
        );
        // Eight digits are hex too
        assert!(matches!(
            "12345678".parse::<RecordRef>().unwrap(),
            RecordRef::Fingerprint(_)
        ));
        assert!(matches!(
            "abc".parse::<RecordRef>(),
            Err(ListError::InvalidReference(_))
        ));
        assert!("-1".parse::<RecordRef>().is_err());
    }

    #[test]
    fn list_uses_importance_order_with_stored_index() {
        let c = collection("b\n(A) a\nx done\nhidden h:1\n");
        assert_eq!(
            listed(&c, &ListQuery::default()),
            vec![
                (1, "(A) a".to_string()),
                (0, "b".to_string()),
                (2, "x done".to_string()),
            ]
        );
    }

    #[test]
    fn list_filters() {
        let c = collection("b\n(A) a\nx done\nhidden h:1\n");
        let todo = ListQuery {
            status: StatusFilter::Todo,
            ..Default::default()
        };
        assert_eq!(listed(&c, &todo).len(), 2);

        let done = ListQuery {
            status: StatusFilter::Done,
            ..Default::default()
        };
        assert_eq!(listed(&c, &done), vec![(2, "x done".to_string())]);

        let all = ListQuery {
            include_hidden: true,
            search: Some("HIDDEN".into()),
            ..Default::default()
        };
        assert_eq!(listed(&c, &all), vec![(3, "hidden h:1".to_string())]);
    }

    #[test]
    fn list_pages() {
        let c = collection("a\nb\nc\nd\n");
        let page = ListQuery {
            offset: 1,
            limit: Some(2),
            ..Default::default()
        };
        assert_eq!(
            listed(&c, &page),
            vec![(1, "b".to_string()), (2, "c".to_string())]
        );
    }

    #[test]
    fn add_stamps_creation_date() {
        let mut c = Collection::new();
        let id = add(&mut c, "call mom @phone", today()).unwrap();
        assert_eq!(c.get(id).unwrap().to_line(), "2024-06-10 call mom @phone");

        add(&mut c, "2020-01-01 dated", today()).unwrap();
        assert_eq!(lines(&c)[1], "2020-01-01 dated");

        assert!(matches!(add(&mut c, "   ", today()), Err(ListError::EmptyText)));
    }

    #[test]
    fn edit_by_index_and_fingerprint() {
        let mut c = collection("(A) one\ntwo\n");
        edit(&mut c, &RecordRef::Index(1), "deux @fr").unwrap();
        assert_eq!(lines(&c), vec!["(A) one", "deux @fr"]);

        let fp = c.get_index(0).unwrap().fingerprint();
        edit(&mut c, &RecordRef::Fingerprint(fp.clone()), "uno").unwrap();
        assert_eq!(lines(&c), vec!["(A) uno", "deux @fr"]);

        // Stale after the edit
        assert!(matches!(
            edit(&mut c, &RecordRef::Fingerprint(fp), "again"),
            Err(ListError::NotFound(_))
        ));
    }

    #[test]
    fn not_found_is_explicit() {
        let mut c = collection("one\n");
        let err = set_status(&mut c, &RecordRef::Index(5), true, today()).unwrap_err();
        assert_eq!(err.to_string(), "no record matches index 5");
    }

    #[test]
    fn set_status_is_idempotent() {
        let mut c = collection("x done\ntodo\n");
        let change = set_status(&mut c, &RecordRef::Index(0), true, today()).unwrap();
        assert_eq!(change, Change::None);
        let change = set_status(&mut c, &RecordRef::Index(1), false, today()).unwrap();
        assert_eq!(change, Change::None);
        assert_eq!(lines(&c), vec!["x done", "todo"]);

        set_status(&mut c, &RecordRef::Index(1), true, today()).unwrap();
        set_status(&mut c, &RecordRef::Index(0), false, today()).unwrap();
        assert_eq!(lines(&c), vec!["done", "x todo"]);
    }

    #[test]
    fn set_status_appends_recurrence_companion() {
        let mut c = collection("2024-06-01 pay rent rec:1m\nother\n");
        set_status(&mut c, &RecordRef::Index(0), true, today()).unwrap();
        assert_eq!(
            lines(&c),
            vec![
                "x 2024-06-01 2024-06-10 pay rent rec:1m",
                "other",
                "2024-06-01 pay rent rec:1m due:2024-07-10",
            ]
        );
    }

    #[test]
    fn delete_removes_and_returns() {
        let mut c = collection("a\nb\nc\n");
        let removed = delete(&mut c, &RecordRef::Index(1)).unwrap();
        assert_eq!(removed.text, "b");
        assert_eq!(lines(&c), vec!["a", "c"]);
    }

    #[test]
    fn archive_takes_completed_only() {
        let mut c = collection("a\nx b\nc\nx d\n");
        let archived: Vec<String> = archive_completed(&mut c).iter().map(|r| r.to_line()).collect();
        assert_eq!(archived, vec!["x b", "x d"]);
        assert_eq!(lines(&c), vec!["a", "c"]);
    }
}
