/// Fires its message at most once for as long as it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notifier {
    message: String,
    shown: bool,
}

impl Notifier {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown: false,
        }
    }

    /// Message shown the first time the app goes to the tray.
    pub fn for_hotkey(hotkey: &str) -> Self {
        Self::new(format!(
            "TCode Helper in esecuzione, premere {hotkey} per richiamare."
        ))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn has_fired(&self) -> bool {
        self.shown
    }

    pub fn notify_once(&mut self) -> bool {
        if self.shown {
            return false;
        }
        self.shown = true;
        true
    }
}
