mod write;
pub use write::{cmd_add, cmd_archive, cmd_delete, cmd_edit, cmd_set_status};

use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::store::{FileStore, Store};
use crate::model::collection::Collection;
use crate::ops::list_ops::{self, ListQuery};
use crate::ops::record_ops::today;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let store = open_store(cli.file.as_deref())?;

    match cli.command {
        None => Err("no command given (run without a subcommand for the TUI)".into()),
        Some(cmd) => match cmd {
            Commands::List(args) => cmd_list(&store, args, json),
            Commands::Add(args) => cmd_add(&store, args, json),
            Commands::Edit(args) => cmd_edit(&store, args, json),
            Commands::Done(args) => cmd_set_status(&store, args, true, json),
            Commands::Undone(args) => cmd_set_status(&store, args, false, json),
            Commands::Delete(args) => cmd_delete(&store, args, json),
            Commands::Archive => cmd_archive(&store, json),
        },
    }
}

/// Resolve the list file from `--file`, tally.toml and the working directory
pub fn open_store(file: Option<&Path>) -> Result<FileStore, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let config = config_io::load_config(&cwd)?;
    let path = config_io::resolve_list_path(file, &config, &cwd);
    tracing::debug!(path = %path.display(), "using list file");
    Ok(FileStore::new(path, config.done_file))
}

fn load_collection(store: &FileStore) -> Result<Collection, Box<dyn std::error::Error>> {
    Ok(Collection::from_records(store.load()?))
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(store: &FileStore, args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let collection = load_collection(store)?;
    let query = ListQuery {
        status: args.status.into(),
        search: args.search,
        include_hidden: args.all,
        offset: args.offset,
        limit: args.limit,
    };
    let listed = list_ops::list(&collection, &query, today());

    if json {
        println!("{}", serde_json::to_string_pretty(&listing_to_json(&listed))?);
    } else {
        for line in format_listing(&listed) {
            println!("{}", line);
        }
    }
    Ok(())
}
