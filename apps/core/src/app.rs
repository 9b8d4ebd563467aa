use std::ops::ControlFlow;

use crate::command::Command;
use crate::model::{normalize_code, ScoredEntry};
use crate::query::{QueryEngine, QueryOutcome};
use crate::shell::Shell;
use crate::tray::TrayLauncher;
use crate::visibility::VisibilityController;

/// Applies queued commands to the query engine, the visibility controller and
/// the shell. Only the thread that owns the `App` mutates any of them.
pub struct App<S: Shell, L: TrayLauncher> {
    engine: QueryEngine,
    controller: VisibilityController<L>,
    shell: S,
    results: Vec<ScoredEntry>,
}

impl<S: Shell, L: TrayLauncher> App<S, L> {
    pub fn new(engine: QueryEngine, controller: VisibilityController<L>, shell: S) -> Self {
        Self {
            engine,
            controller,
            shell,
            results: Vec::new(),
        }
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn controller(&self) -> &VisibilityController<L> {
        &self.controller
    }

    pub fn results(&self) -> &[ScoredEntry] {
        &self.results
    }

    pub fn handle(&mut self, command: Command) -> ControlFlow<()> {
        tracing::trace!(command = command.label(), "dispatch");
        match command {
            Command::QueryChanged(text) => self.on_query(&text),
            Command::Select(code) => self.on_select(&code),
            Command::RequestShow => {
                if let Err(error) = self.controller.on_show(&mut self.shell) {
                    tracing::warn!(%error, "tray icon did not stop cleanly");
                }
            }
            Command::RequestHide => {
                if let Err(error) = self.controller.on_hide(&mut self.shell) {
                    tracing::error!(%error, "failed to start tray icon");
                }
            }
            Command::RequestQuit => {
                if let Err(error) = self.controller.on_quit(&mut self.shell) {
                    tracing::warn!(%error, "tray icon did not stop cleanly");
                }
                return ControlFlow::Break(());
            }
            Command::About => self.shell.show_about(),
        }
        ControlFlow::Continue(())
    }

    fn on_query(&mut self, text: &str) {
        match self.engine.on_query(text) {
            QueryOutcome::Unchanged => {}
            QueryOutcome::Changed(results) => {
                self.shell.render_results(&results);
                self.results = results;
            }
        }
    }

    fn on_select(&mut self, code: &str) {
        let key = normalize_code(code);
        if let Some(row) = self.results.iter().find(|row| row.entry.code_key() == key) {
            self.shell.render_detail(&row.entry, Some(row.score));
            return;
        }

        match self.engine.catalog().find(code) {
            Some(entry) => self.shell.render_detail(entry, None),
            None => tracing::warn!(code = %code, "selected code is not in the catalog"),
        }
    }
}
