use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::ops::list_ops::StatusFilter;

#[derive(Parser)]
#[command(name = "tl", about = concat!("tally v", env!("CARGO_PKG_VERSION"), " - a todo.txt list for humans and agents"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// todo.txt file to use (default: from tally.toml, else ./todo.txt)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List records in importance order with their index and fingerprint
    List(ListArgs),
    /// Add a record (today's creation date is added when missing)
    Add(AddArgs),
    /// Replace the text of a record, keeping its status, priority and dates
    Edit(EditArgs),
    /// Mark a record done
    Done(RefArgs),
    /// Mark a record as not done
    Undone(RefArgs),
    /// Permanently delete a record
    Delete(RefArgs),
    /// Move completed records to done.txt
    Archive,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, value_enum, default_value_t = StatusArg::All)]
    pub status: StatusArg,
    /// Case-insensitive text to search for
    #[arg(long)]
    pub search: Option<String>,
    /// Include hidden records and records before their threshold date
    #[arg(long)]
    pub all: bool,
    /// Skip this many records
    #[arg(long, default_value_t = 0)]
    pub offset: usize,
    /// Show at most this many records
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StatusArg {
    Todo,
    Done,
    All,
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Todo => StatusFilter::Todo,
            StatusArg::Done => StatusFilter::Done,
            StatusArg::All => StatusFilter::All,
        }
    }
}

#[derive(Args)]
pub struct AddArgs {
    /// Record text in todo.txt format
    pub text: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Index or 8-character fingerprint
    pub reference: String,
    /// New text: description, +projects, @contexts and key:value tags
    pub text: String,
}

#[derive(Args)]
pub struct RefArgs {
    /// Index or 8-character fingerprint
    pub reference: String,
}
