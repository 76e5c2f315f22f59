use crate::cli::commands::{AddArgs, EditArgs, RefArgs};
use crate::cli::output::*;
use crate::io::lock::FileLock;
use crate::io::store::{FileStore, Store};
use crate::model::collection::Collection;
use crate::model::record::{Record, RecordId};
use crate::ops::list_ops::{self, RecordRef};
use crate::ops::record_ops::today;

use super::load_collection;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

fn save(store: &FileStore, collection: &Collection) -> Result<(), crate::io::store::StoreError> {
    let records: Vec<&Record> = collection.iter().collect();
    store.save(&records)
}

/// Current index and record for an identity that must still be present
fn locate(collection: &Collection, id: RecordId) -> Result<(usize, &Record), Box<dyn std::error::Error>> {
    let index = collection
        .position(id)
        .ok_or_else(|| format!("record {} disappeared", id))?;
    let record = collection
        .get(id)
        .ok_or_else(|| format!("record {} disappeared", id))?;
    Ok((index, record))
}

fn print_record(
    action: &'static str,
    index: usize,
    record: &Record,
    companion: Option<(usize, &Record)>,
    json: bool,
) -> CmdResult {
    if json {
        let out = ChangeJson {
            action,
            record: Some(record_to_json(index, record)),
            recurrence: companion.map(|(i, r)| record_to_json(i, r)),
            count: None,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}: {}", action, format_record_line(index, record));
        if let Some((i, r)) = companion {
            println!("recurrence: {}", format_record_line(i, r));
        }
    }
    Ok(())
}

pub fn cmd_add(store: &FileStore, args: AddArgs, json: bool) -> CmdResult {
    let _lock = FileLock::acquire_default(&store.lock_path())?;
    let mut collection = load_collection(store)?;

    let id = list_ops::add(&mut collection, &args.text, today())?;
    save(store, &collection)?;

    let (index, record) = locate(&collection, id)?;
    print_record("added", index, record, None, json)
}

pub fn cmd_edit(store: &FileStore, args: EditArgs, json: bool) -> CmdResult {
    let reference: RecordRef = args.reference.parse()?;
    let _lock = FileLock::acquire_default(&store.lock_path())?;
    let mut collection = load_collection(store)?;

    let id = list_ops::resolve(&collection, &reference)?;
    list_ops::edit(&mut collection, &reference, &args.text)?;
    save(store, &collection)?;

    let (index, record) = locate(&collection, id)?;
    print_record("edited", index, record, None, json)
}

pub fn cmd_set_status(store: &FileStore, args: RefArgs, done: bool, json: bool) -> CmdResult {
    let reference: RecordRef = args.reference.parse()?;
    let _lock = FileLock::acquire_default(&store.lock_path())?;
    let mut collection = load_collection(store)?;
    let before = collection.len();

    let id = list_ops::resolve(&collection, &reference)?;
    let change = list_ops::set_status(&mut collection, &reference, done, today())?;
    let action = match (change.is_none(), done) {
        (true, true) => "already done",
        (true, false) => "already todo",
        (false, true) => "done",
        (false, false) => "todo",
    };
    if !change.is_none() {
        save(store, &collection)?;
    }

    let (index, record) = locate(&collection, id)?;
    let companion = if collection.len() > before {
        let last = collection.len() - 1;
        collection.get_index(last).map(|r| (last, r))
    } else {
        None
    };
    print_record(action, index, record, companion, json)
}

pub fn cmd_delete(store: &FileStore, args: RefArgs, json: bool) -> CmdResult {
    let reference: RecordRef = args.reference.parse()?;
    let _lock = FileLock::acquire_default(&store.lock_path())?;
    let mut collection = load_collection(store)?;

    let index = collection
        .position(list_ops::resolve(&collection, &reference)?)
        .unwrap_or_default();
    let removed = list_ops::delete(&mut collection, &reference)?;
    save(store, &collection)?;

    print_record("deleted", index, &removed, None, json)
}

pub fn cmd_archive(store: &FileStore, json: bool) -> CmdResult {
    let _lock = FileLock::acquire_default(&store.lock_path())?;
    let mut collection = load_collection(store)?;

    // done.txt is written before the list so a failed append loses nothing
    let completed: Vec<&Record> = collection.iter().filter(|r| r.is_completed()).collect();
    store.append_done(&completed)?;
    let archived = list_ops::archive_completed(&mut collection);
    if !archived.is_empty() {
        save(store, &collection)?;
    }

    if json {
        let out = ChangeJson {
            action: "archived",
            record: None,
            recurrence: None,
            count: Some(archived.len()),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "archived {} record{} to {}",
            archived.len(),
            if archived.len() == 1 { "" } else { "s" },
            store.done_path().display()
        );
    }
    Ok(())
}
