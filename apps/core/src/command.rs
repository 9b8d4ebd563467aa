/// Everything the owning event loop reacts to.
///
/// Hotkey, tray menu, window and input callbacks are all translated into one
/// of these and queued, so transitions are applied on a single thread in
/// arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    QueryChanged(String),
    /// Row selection in the result list, by code.
    Select(String),
    RequestShow,
    /// Window close or escape key.
    RequestHide,
    RequestQuit,
    About,
}

impl Command {
    pub fn label(&self) -> &'static str {
        match self {
            Self::QueryChanged(_) => "query_changed",
            Self::Select(_) => "select",
            Self::RequestShow => "request_show",
            Self::RequestHide => "request_hide",
            Self::RequestQuit => "request_quit",
            Self::About => "about",
        }
    }
}
