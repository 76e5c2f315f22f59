use std::fmt;
use std::str::FromStr;

use chrono::{Days, Local, Months, NaiveDate};

use crate::model::collection::Change;
use crate::model::record::{
    DATE_FORMAT, DUE_KEY, HIDDEN_KEY, RECURRENCE_KEY, Record, THRESHOLD_KEY, TagValue,
};
use crate::parse::record_parser::apply_text;

/// Error type for record mutations that take user input
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid recurrence '{0}' (expected a count and unit, e.g. 3d, 2w, 1m, 1y)")]
    InvalidRecurrence(String),
    #[error("invalid date '{0}' (expected YYYY-MM-DD or +N followed by d, w, m or y)")]
    InvalidDate(String),
    #[error("invalid priority '{0}' (expected a letter A-Z)")]
    InvalidPriority(char),
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

// ---------------------------------------------------------------------------
// Recurrence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Day,
    Week,
    Month,
    Year,
}

/// A `rec:` interval such as `2w`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub amount: u32,
    pub unit: Unit,
}

impl Recurrence {
    /// Date `amount` units after `from`. Month and year steps clamp to the
    /// last day of the target month. `None` only on calendar overflow.
    pub fn advance(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self.unit {
            Unit::Day => from.checked_add_days(Days::new(u64::from(self.amount))),
            Unit::Week => from.checked_add_days(Days::new(u64::from(self.amount) * 7)),
            Unit::Month => from.checked_add_months(Months::new(self.amount)),
            Unit::Year => from.checked_add_months(Months::new(self.amount.checked_mul(12)?)),
        }
    }
}

impl FromStr for Recurrence {
    type Err = RecordError;

    /// `<digits><d|w|m|y>`, optionally with a leading `+`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RecordError::InvalidRecurrence(s.to_string());
        let body = s.strip_prefix('+').unwrap_or(s);
        let mut chars = body.chars();
        let unit = match chars.next_back() {
            Some('d') => Unit::Day,
            Some('w') => Unit::Week,
            Some('m') => Unit::Month,
            Some('y') => Unit::Year,
            _ => return Err(invalid()),
        };
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let amount = digits.parse().map_err(|_| invalid())?;
        Ok(Recurrence { amount, unit })
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.unit {
            Unit::Day => 'd',
            Unit::Week => 'w',
            Unit::Month => 'm',
            Unit::Year => 'y',
        };
        write!(f, "{}{}", self.amount, unit)
    }
}

/// Parse a date entered by a user: `YYYY-MM-DD`, or `+N[dwmy]` relative to
/// `today`
pub fn parse_date_input(input: &str, today: NaiveDate) -> Result<NaiveDate, RecordError> {
    let input = input.trim();
    if input.starts_with('+') {
        let rec: Recurrence = input
            .parse()
            .map_err(|_| RecordError::InvalidDate(input.to_string()))?;
        return rec
            .advance(today)
            .ok_or_else(|| RecordError::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| RecordError::InvalidDate(input.to_string()))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// Replace description, projects, contexts and tags from `text`.
/// Completion, priority and dates are untouched.
pub fn set_text(record: &mut Record, text: &str) -> Change {
    apply_text(record, text);
    Change::Edited(record.id())
}

/// Flip completion. Completing a record with a valid `rec:` tag also returns
/// a companion record (not yet inserted) that is active and due one interval
/// after `today`.
pub fn toggle_completion(record: &mut Record, today: NaiveDate) -> (Change, Option<Record>) {
    let completing = !record.is_completed();
    record.set_completed(completing, today);

    let companion = if completing {
        recurrence_companion(record, today)
    } else {
        None
    };
    (Change::Edited(record.id()), companion)
}

fn recurrence_companion(record: &Record, today: NaiveDate) -> Option<Record> {
    let rec: Recurrence = record.tag(RECURRENCE_KEY)?.first().parse().ok()?;
    let due = rec.advance(today)?;

    let mut companion = record.duplicate();
    companion.set_completed(false, today);
    set_date_tag(&mut companion, DUE_KEY, due);
    Some(companion)
}

pub fn set_priority(record: &mut Record, priority: char) -> Result<Change, RecordError> {
    if !priority.is_ascii_uppercase() {
        return Err(RecordError::InvalidPriority(priority));
    }
    record.priority = Some(priority);
    Ok(Change::Edited(record.id()))
}

pub fn clear_priority(record: &mut Record) -> Change {
    if record.priority.take().is_none() {
        return Change::None;
    }
    Change::Edited(record.id())
}

pub fn set_due_date(record: &mut Record, date: NaiveDate) -> Change {
    set_date_tag(record, DUE_KEY, date);
    Change::Edited(record.id())
}

pub fn set_threshold_date(record: &mut Record, date: NaiveDate) -> Change {
    set_date_tag(record, THRESHOLD_KEY, date);
    Change::Edited(record.id())
}

/// Validate and store a `rec:` interval in normalized form
pub fn set_recurrence(record: &mut Record, spec: &str) -> Result<Change, RecordError> {
    let rec: Recurrence = spec.trim().parse()?;
    record
        .tags
        .insert(RECURRENCE_KEY.to_string(), TagValue::Single(rec.to_string()));
    Ok(Change::Edited(record.id()))
}

/// Remove a tag such as `due`, `t` or `rec`
pub fn clear_tag(record: &mut Record, key: &str) -> Change {
    if record.tags.shift_remove(key).is_none() {
        return Change::None;
    }
    Change::Edited(record.id())
}

/// Hidden records get `h:1`; un-hiding removes the key
pub fn toggle_hidden(record: &mut Record) -> Change {
    if record.is_hidden() {
        record.tags.shift_remove(HIDDEN_KEY);
    } else {
        record
            .tags
            .insert(HIDDEN_KEY.to_string(), TagValue::Single("1".to_string()));
    }
    Change::Edited(record.id())
}

/// Overwrite a date tag, keeping its position if it already exists
fn set_date_tag(record: &mut Record, key: &str, date: NaiveDate) {
    let value = TagValue::Single(date.format(DATE_FORMAT).to_string());
    record.tags.insert(key.to_string(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn set_text_replaces_fields_only() {
        let mut r = Record::parse("x (A) 2024-06-02 2024-06-01 old +p @c k:v");
        let id = r.id();
        let change = set_text(&mut r, "new @d other:w");
        assert_eq!(change, Change::Edited(id));
        assert_eq!(r.text, "new @d");
        assert!(r.projects.is_empty());
        assert_eq!(r.first_context(), Some("d"));
        assert_eq!(r.tags.keys().collect::<Vec<_>>(), vec!["other"]);
        assert!(r.is_completed());
        assert_eq!(r.priority, Some('A'));
        assert_eq!(r.creation_date, Some(date("2024-06-01")));
        assert_eq!(r.completion_date(), Some(date("2024-06-02")));
    }

    #[test]
    fn editable_text_feeds_back_into_set_text() {
        let mut r = Record::parse("(B) call +bank due:2024-01-01 rec:1m");
        let before = r.to_line();
        let text = r.editable_text();
        assert_eq!(text, "call +bank due:2024-01-01 rec:1m");
        set_text(&mut r, &text);
        assert_eq!(r.to_line(), before);
    }

    #[test]
    fn toggle_completion_sets_and_clears_completion_date() {
        let today = date("2024-06-10");
        let mut r = Record::parse("2024-06-01 task");
        let (_, companion) = toggle_completion(&mut r, today);
        assert!(companion.is_none());
        assert!(r.is_completed());
        assert_eq!(r.completion_date(), Some(today));

        toggle_completion(&mut r, today);
        assert!(!r.is_completed());
        assert_eq!(r.completion_date(), None);
    }

    #[test]
    fn toggle_completion_without_creation_date() {
        let mut r = Record::parse("task");
        toggle_completion(&mut r, date("2024-06-10"));
        assert!(r.is_completed());
        assert_eq!(r.completion_date(), None);
        assert_eq!(r.to_line(), "x task");
    }

    #[test]
    fn recurrence_produces_companion() {
        let today = date("2024-06-10");
        let mut r = Record::parse("(A) 2024-06-01 water plants @home rec:2w due:2024-06-01");
        let (change, companion) = toggle_completion(&mut r, today);
        assert_eq!(change, Change::Edited(r.id()));

        let companion = companion.expect("companion");
        assert_ne!(companion.id(), r.id());
        assert!(!companion.is_completed());
        assert_eq!(companion.completion_date(), None);
        assert_eq!(companion.due_date(), Some(date("2024-06-24")));
        assert_eq!(companion.priority, Some('A'));
        assert_eq!(companion.text, "water plants @home");
        assert_eq!(
            companion.to_line(),
            "(A) 2024-06-01 water plants @home rec:2w due:2024-06-24"
        );
        // The completed record keeps its own due date
        assert_eq!(r.due_date(), Some(date("2024-06-01")));
    }

    #[test]
    fn recurrence_units() {
        let from = date("2024-01-31");
        for (spec, expected) in [
            ("3d", "2024-02-03"),
            ("1w", "2024-02-07"),
            ("1m", "2024-02-29"),
            ("+1y", "2025-01-31"),
            ("0d", "2024-01-31"),
        ] {
            let rec: Recurrence = spec.parse().unwrap();
            assert_eq!(rec.advance(from), Some(date(expected)), "{}", spec);
        }
    }

    #[test]
    fn malformed_recurrence_means_no_companion() {
        for tag in ["rec:often", "rec:2x", "rec:w", "rec:-1d"] {
            let mut r = Record::parse(&format!("task {}", tag));
            let (_, companion) = toggle_completion(&mut r, date("2024-06-10"));
            assert!(companion.is_none(), "{}", tag);
            assert!(r.is_completed());
        }
    }

    #[test]
    fn reopening_never_produces_companion() {
        let mut r = Record::parse("x task rec:1d");
        let (_, companion) = toggle_completion(&mut r, date("2024-06-10"));
        assert!(companion.is_none());
        assert!(!r.is_completed());
    }

    #[test]
    fn priority_set_and_clear() {
        let mut r = Record::parse("task");
        set_priority(&mut r, 'C').unwrap();
        assert_eq!(r.to_line(), "(C) task");
        assert!(set_priority(&mut r, 'c').is_err());
        assert_eq!(clear_priority(&mut r), Change::Edited(r.id()));
        assert_eq!(clear_priority(&mut r), Change::None);
        assert_eq!(r.to_line(), "task");
    }

    #[test]
    fn date_tags_replace_in_place() {
        let mut r = Record::parse("task due:2024-01-01 x:y");
        set_due_date(&mut r, date("2024-02-02"));
        set_threshold_date(&mut r, date("2024-01-15"));
        assert_eq!(r.to_line(), "task due:2024-02-02 x:y t:2024-01-15");
    }

    #[test]
    fn set_recurrence_validates() {
        let mut r = Record::parse("task");
        set_recurrence(&mut r, "+3d").unwrap();
        assert_eq!(r.to_line(), "task rec:3d");
        assert!(matches!(
            set_recurrence(&mut r, "soon"),
            Err(RecordError::InvalidRecurrence(_))
        ));
        assert_eq!(r.to_line(), "task rec:3d");
    }

    #[test]
    fn toggle_hidden_adds_and_removes_key() {
        let mut r = Record::parse("task");
        toggle_hidden(&mut r);
        assert_eq!(r.to_line(), "task h:1");
        assert!(r.is_hidden());
        toggle_hidden(&mut r);
        assert_eq!(r.to_line(), "task");
        assert!(!r.tags.contains_key(HIDDEN_KEY));
    }

    #[test]
    fn clear_tag_reports_missing_key() {
        let mut r = Record::parse("pay rent due:2024-07-01 rec:1m");
        let id = r.id();
        assert_eq!(clear_tag(&mut r, DUE_KEY), Change::Edited(id));
        assert_eq!(r.to_line(), "pay rent rec:1m");
        assert_eq!(clear_tag(&mut r, DUE_KEY), Change::None);
    }

    #[test]
    fn toggle_hidden_from_zero_sets_one() {
        let mut r = Record::parse("task h:0");
        toggle_hidden(&mut r);
        assert_eq!(r.to_line(), "task h:1");
    }

    #[test]
    fn date_input_absolute_and_relative() {
        let today = date("2024-06-10");
        assert_eq!(parse_date_input("2024-07-01", today).unwrap(), date("2024-07-01"));
        assert_eq!(parse_date_input(" +3d ", today).unwrap(), date("2024-06-13"));
        assert_eq!(parse_date_input("+1m", today).unwrap(), date("2024-07-10"));
        assert!(parse_date_input("tomorrow", today).is_err());
        assert!(parse_date_input("3d", today).is_err());
    }

    #[test]
    fn mutations_keep_identity() {
        let mut r = Record::parse("task");
        let id = r.id();
        set_text(&mut r, "other");
        set_priority(&mut r, 'A').unwrap();
        toggle_hidden(&mut r);
        toggle_completion(&mut r, date("2024-06-10"));
        assert_eq!(r.id(), id);
    }
}
