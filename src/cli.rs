use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Track classes and the tasks filed under them.
/// Data lives in ~/.classtrack unless --data-dir or CLASSTRACK_DIR says otherwise.
#[derive(Parser)]
#[command(name = "ct", version, about = "Class and task tracker")]
pub struct Cli {
    /// Directory holding the data slots.
    #[arg(long, global = true, env = "CLASSTRACK_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// `--data-dir`, else `$HOME/.classtrack`, else `./.classtrack`.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".classtrack")
        })
    }
}
