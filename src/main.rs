use clap::Parser;
use tally::cli::commands::Cli;
use tally::cli::handlers;
use tally::logging;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        // No subcommand → launch TUI
        None => {
            logging::init_tui();
            tally::tui::run(cli.file.as_deref())
        }
        Some(_) => {
            logging::init_cli();
            handlers::dispatch(cli)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
