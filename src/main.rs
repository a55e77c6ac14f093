//! # ct - class and task tracker
//!
//! Command-line front end for the `classtrack` data layer.
//!
//! ```bash
//! # Create a class and file a task under it
//! ct class add Math --color "#3366FF"
//! ct task add "HW1" --due 2024-12-01 --class math
//!
//! # List, newest due date first, without finished work
//! ct sort due-date --descending
//! ct task list --hide-completed
//!
//! # Edit by id prefix or title
//! ct task edit hw1 --title "HW1 (all problems)"
//! ct task complete hw1
//! ```
//!
//! Data is stored in `~/.classtrack/` as one JSON file per slot
//! (`classes.json`, `tasks.json`, `sortByKey.json`, `sortOrderAscendingKey.json`).
//! Set `RUST_LOG=debug` to see every write.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use classtrack::crud::Controller;
use classtrack::slots::FileSlots;

mod cli;
mod cmd;

use cli::Cli;
use cmd::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let data_dir = cli.resolve_data_dir();
    let slots = match FileSlots::open(&data_dir) {
        Ok(slots) => slots,
        Err(e) => {
            eprintln!("Failed to create data directory {}: {}", data_dir.display(), e);
            std::process::exit(1);
        }
    };
    let mut ct = Controller::open(slots);

    let result = match cli.command {
        Commands::Completions { .. } => unreachable!("completions handled above"),
        Commands::Task { action } => cmd_task(&mut ct, action),
        Commands::Class { action } => cmd_class(&mut ct, action),
        Commands::Sort { key, descending } => {
            cmd_sort(&mut ct, key, descending);
            Ok(())
        }
        Commands::Summary => {
            cmd_summary(&ct);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
