use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "taskdeck",
    about = "Terminal client for the taskdeck task manager",
    version
)]
struct Cli {
    /// Show the session debug tab.
    #[arg(long)]
    dev_panel: bool,

    /// Write logs to this file instead of ~/.config/taskdeck/taskdeck.log.
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref());
    taskdeck_tui::run(taskdeck_tui::RunOptions {
        dev_panel: cli.dev_panel,
    })
}

/// Log to a file; stdout belongs to the terminal UI. Failing to open the log
/// file leaves logging off rather than breaking startup.
fn init_logging(path: Option<&Path>) {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let Ok(dir) = taskdeck_tui::config_dir() else {
                return;
            };
            let _ = std::fs::create_dir_all(&dir);
            dir.join("taskdeck.log")
        }
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}
