use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app::App;
use crate::catalog::{Catalog, CatalogError};
use crate::catalog_import::{self, ImportError};
use crate::command::Command;
use crate::config::{self, Config, ConfigError};
use crate::hotkey_runtime::{self, HotkeyRegistration, HotkeyRuntimeError};
use crate::icon::{self, IconError};
use crate::logging;
use crate::notifier::Notifier;
use crate::query::QueryEngine;
use crate::shell::{self, ConsoleShell, Shell};
use crate::tray::{NativeTrayLauncher, TrayLauncher};
use crate::visibility::VisibilityController;

pub const APP_TITLE: &str = "TCode Helper";

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("errore durante il caricamento dei tcodes: {0}")]
    Catalog(#[from] CatalogError),
    #[error("errore durante il caricamento del logo: {0}")]
    Icon(#[from] IconError),
    #[error("hotkey runtime error: {0}")]
    Hotkey(#[from] HotkeyRuntimeError),
    #[error("import error: {0}")]
    Import(#[from] ImportError),
    #[error("console error: {0}")]
    Console(#[source] std::io::Error),
    #[error("failed to serialize entries: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Parser)]
#[command(name = "tcode-helper", version, about = "Find transaction codes by keyword")]
pub struct Cli {
    /// Config file (defaults to the per-user app data directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Catalog file, overriding the config.
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Icon file, overriding the config.
    #[arg(long)]
    pub icon: Option<PathBuf>,

    /// Start hidden in the tray.
    #[arg(long)]
    pub background: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print entries from a markdown code list that the catalog is missing.
    Import {
        /// Markdown file with lines like "- `SE16` Data Browser".
        list: PathBuf,
    },
}

pub fn run(cli: Cli) -> Result<(), RuntimeError> {
    let config = resolve_config(&cli)?;

    match logging::init(&config.log_level) {
        Ok(path) => tracing::info!(log_path = %path.display(), "logging initialized"),
        Err(error) => eprintln!("[tcode-helper] logging disabled: {error}"),
    }
    tracing::info!(
        config_path = %config.config_path.display(),
        catalog_path = %config.catalog_path.display(),
        icon_path = %config.icon_path.display(),
        hotkey = %config.hotkey,
        "startup"
    );

    match &cli.command {
        Some(CliCommand::Import { list }) => run_import(&config, list),
        None => run_app(&config, cli.background),
    }
}

/// Loads the config, writing the defaults out on first run, then applies the
/// command-line overrides. Overrides are never persisted.
pub fn resolve_config(cli: &Cli) -> Result<Config, RuntimeError> {
    let mut config = config::load(cli.config.as_deref())?;
    if !config.config_path.exists() {
        config::save(&config)?;
        println!(
            "[tcode-helper] wrote default config to {}",
            config.config_path.display()
        );
    }
    if let Some(catalog) = &cli.catalog {
        config.catalog_path = catalog.clone();
    }
    if let Some(icon) = &cli.icon {
        config.icon_path = icon.clone();
    }
    config::validate(&config)?;
    Ok(config)
}

fn run_app(config: &Config, background: bool) -> Result<(), RuntimeError> {
    // Everything that can fail fatally happens before the shell is built.
    let catalog = Arc::new(Catalog::load(&config.catalog_path)?);
    tracing::info!(
        entries = catalog.len(),
        "loaded {}",
        config.catalog_path.display()
    );
    let icon = icon::load_icon(&config.icon_path)?;

    let (events, commands) = mpsc::channel();
    let listener = hotkey_runtime::spawn_listener(&config.hotkey, events.clone())?;
    log_registration(listener.registration());

    let launcher = NativeTrayLauncher::new(icon, APP_TITLE, events.clone());
    let controller = VisibilityController::new(launcher, Notifier::for_hotkey(&config.hotkey));
    let engine = QueryEngine::new(Arc::clone(&catalog));
    let mut app = App::new(engine, controller, ConsoleShell::new(std::io::stdout()));

    println!(
        "{APP_TITLE} - {} ({} tcodes, {} per richiamare)",
        env!("CARGO_PKG_VERSION"),
        catalog.len(),
        config.hotkey
    );
    shell::spawn_console_reader(events).map_err(RuntimeError::Console)?;

    let first = if background {
        Command::RequestHide
    } else {
        Command::RequestShow
    };
    if app.handle(first).is_continue() {
        run_event_loop(&mut app, &commands);
    }

    drop(listener);
    tracing::info!("shutdown complete");
    Ok(())
}

/// Applies commands in arrival order until one asks to quit or every sender
/// is gone.
pub fn run_event_loop<S: Shell, L: TrayLauncher>(app: &mut App<S, L>, commands: &Receiver<Command>) {
    for command in commands.iter() {
        if app.handle(command).is_break() {
            return;
        }
    }
    tracing::info!("command queue closed");
}

fn run_import(config: &Config, list: &Path) -> Result<(), RuntimeError> {
    let catalog = Catalog::load(&config.catalog_path)?;
    let parsed = catalog_import::read_list(list)?;

    for rejected in &parsed.rejected {
        tracing::warn!(line = rejected.line_number, text = %rejected.text, "unparsed list line");
        eprintln!("!!!!!!! {}: {}", rejected.line_number, rejected.text);
    }

    let missing = catalog_import::missing_from(&parsed, &catalog);
    tracing::info!(
        parsed = parsed.entries.len(),
        missing = missing.len(),
        "list compared with catalog"
    );
    println!("{}", serde_json::to_string_pretty(&missing)?);
    Ok(())
}

fn log_registration(registration: &HotkeyRegistration) {
    match registration {
        HotkeyRegistration::Native(id) => {
            tracing::info!(native_id = id, "hotkey registered");
        }
        HotkeyRegistration::Noop(label) => {
            tracing::info!(noop = %label, "hotkey registered");
        }
    }
}

/// Surfaces a fatal error to the user before exiting.
pub fn report_fatal(error: &RuntimeError) {
    tracing::error!(%error, "fatal error");
    let message = format!("{error}. Il programma verrà terminato.");
    eprintln!("[tcode-helper] {message}");
    show_error_dialog(&message);
}

#[cfg(target_os = "windows")]
fn show_error_dialog(message: &str) {
    use windows_sys::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

    let text = to_wide(message);
    let caption = to_wide(APP_TITLE);
    unsafe {
        MessageBoxW(
            std::ptr::null_mut(),
            text.as_ptr(),
            caption.as_ptr(),
            MB_OK | MB_ICONERROR,
        );
    }
}

#[cfg(not(target_os = "windows"))]
fn show_error_dialog(_message: &str) {}

#[cfg(target_os = "windows")]
fn to_wide(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}
