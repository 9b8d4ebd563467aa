#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tcode_helper_core::catalog::Catalog;
use tcode_helper_core::model::{Entry, ScoredEntry};
use tcode_helper_core::shell::Shell;
use tcode_helper_core::tray::{TrayError, TrayLauncher, TrayRequest, TrayTask};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Show,
    Hide,
    Raise,
    Focus,
    Results(Vec<String>),
    Detail(String, Option<u32>),
    Notify(String),
    About,
    Close,
}

#[derive(Default)]
pub struct RecordingShell {
    pub events: Vec<ShellEvent>,
}

impl RecordingShell {
    pub fn count(&self, wanted: &ShellEvent) -> usize {
        self.events.iter().filter(|event| *event == wanted).count()
    }

    pub fn notifications(&self) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, ShellEvent::Notify(_)))
            .count()
    }

    pub fn renders(&self) -> Vec<Vec<String>> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ShellEvent::Results(codes) => Some(codes.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Shell for RecordingShell {
    fn show_window(&mut self) {
        self.events.push(ShellEvent::Show);
    }

    fn hide_window(&mut self) {
        self.events.push(ShellEvent::Hide);
    }

    fn raise_window(&mut self) {
        self.events.push(ShellEvent::Raise);
    }

    fn focus_search(&mut self) {
        self.events.push(ShellEvent::Focus);
    }

    fn render_results(&mut self, rows: &[ScoredEntry]) {
        self.events.push(ShellEvent::Results(
            rows.iter().map(|row| row.entry.code.clone()).collect(),
        ));
    }

    fn render_detail(&mut self, entry: &Entry, score: Option<u32>) {
        self.events
            .push(ShellEvent::Detail(entry.code.clone(), score));
    }

    fn notify(&mut self, message: &str) {
        self.events.push(ShellEvent::Notify(message.to_string()));
    }

    fn show_about(&mut self) {
        self.events.push(ShellEvent::About);
    }

    fn close(&mut self) {
        self.events.push(ShellEvent::Close);
    }
}

#[derive(Default)]
pub struct TrayStats {
    pub launches: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub notifications: Mutex<Vec<String>>,
}

impl TrayStats {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.lock().unwrap().clone()
    }
}

/// Tray launcher whose icons track how many of them are alive and which
/// notifications they were asked to show.
#[derive(Default)]
pub struct CountingLauncher {
    pub stats: Arc<TrayStats>,
}

impl TrayLauncher for CountingLauncher {
    fn launch(&mut self) -> Result<TrayTask, TrayError> {
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        let stats = Arc::clone(&self.stats);
        TrayTask::spawn(move |inbox| {
            let now = stats.active.fetch_add(1, Ordering::SeqCst) + 1;
            stats.max_active.fetch_max(now, Ordering::SeqCst);
            while let TrayRequest::Notify(message) = inbox.recv() {
                stats.notifications.lock().unwrap().push(message);
            }
            stats.active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

pub struct FailingLauncher;

impl TrayLauncher for FailingLauncher {
    fn launch(&mut self) -> Result<TrayTask, TrayError> {
        Err(TrayError::Icon("no tray available".to_string()))
    }
}

/// Tray launcher whose icons vanish right after starting.
pub struct VanishingLauncher;

impl TrayLauncher for VanishingLauncher {
    fn launch(&mut self) -> Result<TrayTask, TrayError> {
        let task = TrayTask::spawn(|_inbox| Ok(()))?;
        while !task.is_finished() {
            std::thread::yield_now();
        }
        Ok(task)
    }
}

pub fn entry(code: &str, keywords: &str) -> Entry {
    Entry::new(code, &format!("{code} description"), keywords)
}

pub fn sample_catalog() -> Catalog {
    Catalog::from_entries(vec![
        Entry::new("SE11", "ABAP Dictionary", "abap dictionary maintenance table"),
        Entry::new("SE16", "Data Browser", "display contents of table"),
        Entry::new("SE16N", "General Table Display", "general table display"),
        Entry::new("VA01", "Create Sales Order", "create sales order"),
        Entry::new("VA03", "Display Sales Order", "display sales order"),
        Entry::new("ME21N", "Create Purchase Order", "create purchase order"),
        Entry::new("SM30", "Table View Maintenance", "tablet view maintenance"),
    ])
    .expect("sample catalog is valid")
}
