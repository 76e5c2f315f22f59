use crate::model::record::Record;

/// Parse a whole todo.txt file. Blank lines are skipped; every other line
/// becomes one record, in file order.
pub fn parse_list(text: &str) -> Vec<Record> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(crate::parse::parse_record)
        .collect()
}

/// Serialize records one per line with a trailing newline. An empty list
/// serializes to an empty file.
pub fn serialize_list<'a>(records: impl IntoIterator<Item = &'a Record>) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_line());
        out.push('\n');
    }
    out
}
