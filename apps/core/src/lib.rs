pub mod app;
pub mod catalog;
pub mod catalog_import;
pub mod command;
pub mod config;
pub mod hotkey;
pub mod hotkey_runtime;
pub mod icon;
pub mod logging;
pub mod model;
pub mod notifier;
pub mod query;
pub mod runtime;
pub mod shell;
pub mod tray;
pub mod visibility;
