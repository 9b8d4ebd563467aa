use std::io::{BufRead, Write};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use crate::command::Command;
use crate::model::{describe, Entry, ScoredEntry};

pub const ABOUT_TEXT: &str = "Un simpatico tool per chi non riesce a imparare\n\
a memoria millemila TCode.";

/// Presentation layer driven by the owning event loop.
pub trait Shell {
    fn show_window(&mut self);
    fn hide_window(&mut self);
    /// Brings the window to the foreground without leaving it pinned on top.
    fn raise_window(&mut self);
    fn focus_search(&mut self);
    fn render_results(&mut self, rows: &[ScoredEntry]);
    fn render_detail(&mut self, entry: &Entry, score: Option<u32>);
    fn notify(&mut self, message: &str);
    fn show_about(&mut self);
    fn close(&mut self);
}

/// Line-oriented shell over any writer; on Windows it also drives the
/// console window itself.
pub struct ConsoleShell<W: Write> {
    out: W,
    visible: bool,
}

impl<W: Write> ConsoleShell<W> {
    pub fn new(out: W) -> Self {
        Self { out, visible: true }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(error) = writeln!(self.out, "{text}") {
            tracing::warn!(%error, "console write failed");
        }
    }
}

impl<W: Write> Shell for ConsoleShell<W> {
    fn show_window(&mut self) {
        self.visible = true;
        native::show_console(true);
    }

    fn hide_window(&mut self) {
        self.visible = false;
        native::show_console(false);
    }

    fn raise_window(&mut self) {
        native::raise_console();
    }

    fn focus_search(&mut self) {
        let _ = write!(self.out, "> ");
        let _ = self.out.flush();
    }

    fn render_results(&mut self, rows: &[ScoredEntry]) {
        if rows.is_empty() {
            self.line("(nessun risultato)");
            return;
        }
        for row in rows {
            let line = format!("{:<12} {}", row.entry.code, row.entry.descr);
            self.line(&line);
        }
    }

    fn render_detail(&mut self, entry: &Entry, score: Option<u32>) {
        let text = describe(entry, score);
        self.line(&text);
    }

    fn notify(&mut self, message: &str) {
        let line = format!("[TCode Helper] {message}");
        self.line(&line);
    }

    fn show_about(&mut self) {
        self.line(ABOUT_TEXT);
    }

    fn close(&mut self) {
        let _ = self.out.flush();
    }
}

/// Maps one line of console input to a command.
pub fn parse_console_line(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed {
        ":hide" | ":esc" | "\u{1b}" => Command::RequestHide,
        ":show" => Command::RequestShow,
        ":quit" | ":q" => Command::RequestQuit,
        ":about" => Command::About,
        _ => match trimmed.strip_prefix(":open ") {
            Some(code) => Command::Select(code.trim().to_string()),
            None => Command::QueryChanged(line.trim_end_matches(['\r', '\n']).to_string()),
        },
    }
}

/// Feeds stdin lines into the command queue. Closing input quits.
pub fn spawn_console_reader(events: Sender<Command>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if events.send(parse_console_line(&line)).is_err() {
                    break;
                }
            }
            tracing::debug!("console input closed");
            let _ = events.send(Command::RequestQuit);
        })
}

#[cfg(target_os = "windows")]
mod native {
    use windows_sys::Win32::System::Console::GetConsoleWindow;
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        SetForegroundWindow, SetWindowPos, ShowWindow, HWND_NOTOPMOST, HWND_TOPMOST, SWP_NOMOVE,
        SWP_NOSIZE, SW_HIDE, SW_SHOW,
    };

    pub fn show_console(visible: bool) {
        let hwnd = unsafe { GetConsoleWindow() };
        if hwnd.is_null() {
            return;
        }
        unsafe {
            ShowWindow(hwnd, if visible { SW_SHOW } else { SW_HIDE });
        }
    }

    pub fn raise_console() {
        let hwnd = unsafe { GetConsoleWindow() };
        if hwnd.is_null() {
            return;
        }
        unsafe {
            SetWindowPos(hwnd, HWND_TOPMOST, 0, 0, 0, 0, SWP_NOMOVE | SWP_NOSIZE);
            SetWindowPos(hwnd, HWND_NOTOPMOST, 0, 0, 0, 0, SWP_NOMOVE | SWP_NOSIZE);
            SetForegroundWindow(hwnd);
        }
    }
}

#[cfg(not(target_os = "windows"))]
mod native {
    pub fn show_console(_visible: bool) {}

    pub fn raise_console() {}
}
