use crate::notifier::Notifier;
use crate::shell::Shell;
use crate::tray::{TrayError, TrayLauncher, TrayTask};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    WindowVisible,
    TrayOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Hidden { notified: bool },
    Shown,
    Refocused,
    Ignored,
}

/// Owns the window/tray lifecycle. At most one tray icon is alive at a time.
pub struct VisibilityController<L: TrayLauncher> {
    state: Visibility,
    notifier: Notifier,
    launcher: L,
    tray: Option<TrayTask>,
}

impl<L: TrayLauncher> VisibilityController<L> {
    pub fn new(launcher: L, notifier: Notifier) -> Self {
        Self {
            state: Visibility::default(),
            notifier,
            launcher,
            tray: None,
        }
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    pub fn has_tray(&self) -> bool {
        self.tray.is_some()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    /// Window closed or escape pressed.
    pub fn on_hide(&mut self, shell: &mut dyn Shell) -> Result<Transition, TrayError> {
        if self.state == Visibility::TrayOnly {
            return Ok(Transition::Ignored);
        }

        shell.hide_window();
        self.state = Visibility::TrayOnly;
        self.start_tray()?;

        let notified = self.notifier.notify_once();
        if notified {
            self.deliver_notification(shell);
        }
        tracing::info!(notified, "window hidden to tray");
        Ok(Transition::Hidden { notified })
    }

    /// Global hotkey or tray "show".
    pub fn on_show(&mut self, shell: &mut dyn Shell) -> Result<Transition, TrayError> {
        if self.state == Visibility::WindowVisible {
            shell.focus_search();
            return Ok(Transition::Refocused);
        }

        let stopped = self.stop_tray();
        self.state = Visibility::WindowVisible;
        shell.show_window();
        shell.raise_window();
        shell.focus_search();
        tracing::info!("window restored from tray");
        stopped.map(|()| Transition::Shown)
    }

    /// Tray "quit". Stops the tray icon and closes the window.
    pub fn on_quit(&mut self, shell: &mut dyn Shell) -> Result<(), TrayError> {
        let stopped = self.stop_tray();
        shell.close();
        tracing::info!("quit requested");
        stopped
    }

    fn start_tray(&mut self) -> Result<(), TrayError> {
        if let Err(error) = self.stop_tray() {
            tracing::warn!(%error, "previous tray icon ended with an error");
        }
        self.tray = Some(self.launcher.launch()?);
        Ok(())
    }

    // The window is already hidden; the shell only gets the message when the
    // tray icon is gone.
    fn deliver_notification(&self, shell: &mut dyn Shell) {
        let message = self.notifier.message();
        let delivered = match &self.tray {
            Some(task) => task.notify(message),
            None => Err(TrayError::Closed),
        };
        if let Err(error) = delivered {
            tracing::warn!(%error, "tray notification fell back to the shell");
            shell.notify(message);
        }
    }

    fn stop_tray(&mut self) -> Result<(), TrayError> {
        match self.tray.take() {
            Some(task) => task.stop(),
            None => Ok(()),
        }
    }
}

impl<L: TrayLauncher> Drop for VisibilityController<L> {
    fn drop(&mut self) {
        if let Err(error) = self.stop_tray() {
            tracing::warn!(%error, "tray icon ended with an error during shutdown");
        }
    }
}
