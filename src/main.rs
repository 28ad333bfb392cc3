//! planboard: stage-based project tracking in the terminal
//!
//! Runs the interactive dashboard, or writes exports headless with
//! `planboard export --format csv|report|kpi`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use planboard::domain::{Project, Workspace};
use planboard::services::{export_to, DocumentStore, ExportFormat, JsonStore};
use planboard::{App, PlanboardConfig};

#[derive(Parser, Debug)]
#[command(name = "planboard", version, about = "Stage-based project tracking dashboard")]
struct Cli {
    /// Workspace root (defaults to the nearest directory holding .planboard/)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an export of all projects and exit
    Export {
        /// csv, report or kpi
        #[arg(long, short, default_value = "csv")]
        format: ExportFormat,

        /// Output directory (defaults to the configured export directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Initialize logging with RUST_LOG support, writing to the workspace log file
fn init_logging(log_path: &Path) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let file = log_path
        .parent()
        .map(std::fs::create_dir_all)
        .transpose()
        .and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
        });

    match file {
        Ok(file) => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        Err(_) => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init(),
    }
}

/// Install a panic hook that restores the terminal before printing the panic
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

fn run_export(workspace: &Workspace, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let store = JsonStore::<Project>::open(&workspace.data_directory)
        .context("Failed to open the projects collection")?;
    let projects = store.list();
    let directory = output.unwrap_or_else(|| workspace.export_directory.clone());
    let path = export_to(
        &directory,
        format,
        &projects,
        workspace.config.progress.policy,
    )?;
    println!("{}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Find workspace root
    let root = cli
        .root
        .or_else(|| Workspace::discover(None))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let config = PlanboardConfig::load(Some(&root)).context("Failed to load configuration")?;
    let workspace = Workspace::new(root, config);

    init_logging(&workspace.log_path());
    tracing::info!("Starting planboard in {:?}", workspace.root_path);

    if let Some(Command::Export { format, output }) = cli.command {
        return run_export(&workspace, format, output);
    }

    // Install panic hook for graceful terminal restoration
    install_panic_hook();

    let mut app = App::new(workspace)?;

    // Setup terminal
    let mut terminal = setup_terminal()?;

    // Run with Ctrl+C signal handling
    let result = tokio::select! {
        res = app.run(&mut terminal) => res,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down gracefully");
            Ok(())
        }
    };

    // Restore terminal (always, even on error)
    restore_terminal(&mut terminal)?;

    result?;

    Ok(())
}
