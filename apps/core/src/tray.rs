use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::command::Command;
use crate::icon::IconImage;

#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
const POLL_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[error("failed to spawn tray thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("tray icon failed: {0}")]
    Icon(String),
    #[error("tray icon is no longer running")]
    Closed,
    #[error("tray thread panicked")]
    Panicked,
}

/// What the owner can ask of a running tray icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrayRequest {
    Notify(String),
    Stop,
}

/// Handed to a tray run loop; yields the owner's requests in order.
pub struct TrayInbox {
    rx: Receiver<TrayRequest>,
}

impl TrayInbox {
    /// Blocks for the next request. A dropped owner reads as `Stop`.
    pub fn recv(&self) -> TrayRequest {
        self.rx.recv().unwrap_or(TrayRequest::Stop)
    }

    /// Returns `None` when nothing arrived within `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TrayRequest> {
        match self.rx.recv_timeout(timeout) {
            Ok(request) => Some(request),
            Err(RecvTimeoutError::Disconnected) => Some(TrayRequest::Stop),
            Err(RecvTimeoutError::Timeout) => None,
        }
    }
}

/// A tray icon running its blocking loop on a background thread.
///
/// `stop` signals the loop and joins the thread, so once it returns the icon
/// is gone.
pub struct TrayTask {
    requests: Sender<TrayRequest>,
    handle: JoinHandle<Result<(), TrayError>>,
}

impl TrayTask {
    pub fn spawn<F>(run: F) -> Result<Self, TrayError>
    where
        F: FnOnce(TrayInbox) -> Result<(), TrayError> + Send + 'static,
    {
        let (requests, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("tray-icon".to_string())
            .spawn(move || run(TrayInbox { rx }))
            .map_err(TrayError::Spawn)?;
        Ok(Self { requests, handle })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Queues a balloon notification on the icon.
    pub fn notify(&self, message: &str) -> Result<(), TrayError> {
        self.requests
            .send(TrayRequest::Notify(message.to_string()))
            .map_err(|_| TrayError::Closed)
    }

    pub fn stop(self) -> Result<(), TrayError> {
        // The loop may already have exited on its own; a failed send is fine.
        let _ = self.requests.send(TrayRequest::Stop);
        match self.handle.join() {
            Ok(result) => result,
            Err(_) => Err(TrayError::Panicked),
        }
    }
}

pub trait TrayLauncher {
    fn launch(&mut self) -> Result<TrayTask, TrayError>;
}

/// Launches the platform tray icon. Menu picks are queued as commands.
pub struct NativeTrayLauncher {
    icon: IconImage,
    tooltip: String,
    events: Sender<Command>,
}

impl NativeTrayLauncher {
    pub fn new(icon: IconImage, tooltip: &str, events: Sender<Command>) -> Self {
        Self {
            icon,
            tooltip: tooltip.to_string(),
            events,
        }
    }
}

impl TrayLauncher for NativeTrayLauncher {
    fn launch(&mut self) -> Result<TrayTask, TrayError> {
        let icon = self.icon.clone();
        let tooltip = self.tooltip.clone();
        let events = self.events.clone();
        TrayTask::spawn(move |inbox| native::run_tray_loop(icon, tooltip, events, inbox))
    }
}

#[cfg(target_os = "windows")]
mod native {
    use std::sync::mpsc::Sender;

    use windows_sys::Win32::Foundation::{
        GetLastError, ERROR_CLASS_ALREADY_EXISTS, HWND, LPARAM, LRESULT, POINT, WPARAM,
    };
    use windows_sys::Win32::System::LibraryLoader::GetModuleHandleW;
    use windows_sys::Win32::UI::Shell::{
        Shell_NotifyIconW, NIF_ICON, NIF_INFO, NIF_MESSAGE, NIF_TIP, NIIF_INFO, NIM_ADD,
        NIM_DELETE, NIM_MODIFY, NOTIFYICONDATAW,
    };
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        AppendMenuW, CreateIcon, CreatePopupMenu, CreateWindowExW, DefWindowProcW, DestroyIcon,
        DestroyMenu, DestroyWindow, DispatchMessageW, GetCursorPos, GetWindowLongPtrW,
        PeekMessageW, PostMessageW, RegisterClassW, SetForegroundWindow, SetWindowLongPtrW,
        TrackPopupMenu, TranslateMessage, GWLP_USERDATA, HICON, HMENU, MF_STRING, MSG,
        PM_REMOVE, TPM_NONOTIFY, TPM_RETURNCMD, TPM_RIGHTBUTTON, WM_APP, WM_CONTEXTMENU,
        WM_LBUTTONDBLCLK, WM_NULL, WM_RBUTTONUP, WNDCLASSW, WS_EX_TOOLWINDOW,
    };

    use super::{TrayError, TrayInbox, TrayRequest, POLL_INTERVAL};
    use crate::command::Command;
    use crate::icon::IconImage;

    const CLASS_NAME: &str = "TCodeHelperTrayWindow";
    const BALLOON_TITLE: &str = "TCode Helper";
    const TRAY_ICON_ID: u32 = 1;
    const WM_TRAY_CALLBACK: u32 = WM_APP + 1;
    const MENU_SHOW: usize = 1;
    const MENU_QUIT: usize = 2;

    struct TrayWindowState {
        events: Sender<Command>,
        menu: HMENU,
    }

    /// Hidden owner window plus the notification-area icon it receives
    /// callbacks for. Dropping it removes the icon.
    struct TrayWindow {
        hwnd: HWND,
        icon: HICON,
        menu: HMENU,
        state: *mut TrayWindowState,
        added: bool,
    }

    impl TrayWindow {
        fn create(
            image: &IconImage,
            tooltip: &str,
            events: Sender<Command>,
        ) -> Result<Self, TrayError> {
            let mut window = Self {
                hwnd: std::ptr::null_mut(),
                icon: std::ptr::null_mut(),
                menu: std::ptr::null_mut(),
                state: std::ptr::null_mut(),
                added: false,
            };

            let (mask, bgra) = image.to_bgra_with_mask();
            window.icon = unsafe {
                CreateIcon(
                    std::ptr::null_mut(),
                    image.width as i32,
                    image.height as i32,
                    1,
                    32,
                    mask.as_ptr(),
                    bgra.as_ptr(),
                )
            };
            if window.icon.is_null() {
                return Err(last_error("CreateIcon"));
            }

            window.menu = unsafe { CreatePopupMenu() };
            if window.menu.is_null() {
                return Err(last_error("CreatePopupMenu"));
            }
            unsafe {
                AppendMenuW(
                    window.menu,
                    MF_STRING,
                    MENU_SHOW,
                    to_wide("Mostra finestra").as_ptr(),
                );
                AppendMenuW(
                    window.menu,
                    MF_STRING,
                    MENU_QUIT,
                    to_wide("Termina applicazione").as_ptr(),
                );
            }

            let instance = unsafe { GetModuleHandleW(std::ptr::null()) };
            let class_name = to_wide(CLASS_NAME);
            let mut class: WNDCLASSW = unsafe { std::mem::zeroed() };
            class.lpfnWndProc = Some(tray_wnd_proc);
            class.hInstance = instance;
            class.lpszClassName = class_name.as_ptr();
            if unsafe { RegisterClassW(&class) } == 0 {
                let error = unsafe { GetLastError() };
                if error != ERROR_CLASS_ALREADY_EXISTS {
                    return Err(TrayError::Icon(format!(
                        "RegisterClassW failed with error {error}"
                    )));
                }
            }

            window.hwnd = unsafe {
                CreateWindowExW(
                    WS_EX_TOOLWINDOW,
                    class_name.as_ptr(),
                    to_wide(BALLOON_TITLE).as_ptr(),
                    0,
                    0,
                    0,
                    0,
                    0,
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    instance,
                    std::ptr::null(),
                )
            };
            if window.hwnd.is_null() {
                return Err(last_error("CreateWindowExW"));
            }

            window.state = Box::into_raw(Box::new(TrayWindowState {
                events,
                menu: window.menu,
            }));
            unsafe {
                SetWindowLongPtrW(window.hwnd, GWLP_USERDATA, window.state as isize);
            }

            let mut data = window.notify_data();
            data.uFlags = NIF_ICON | NIF_MESSAGE | NIF_TIP;
            data.uCallbackMessage = WM_TRAY_CALLBACK;
            data.hIcon = window.icon;
            copy_wide(&mut data.szTip, tooltip);
            if unsafe { Shell_NotifyIconW(NIM_ADD, &data) } == 0 {
                return Err(TrayError::Icon("Shell_NotifyIconW(NIM_ADD) failed".to_string()));
            }
            window.added = true;

            Ok(window)
        }

        fn notify_data(&self) -> NOTIFYICONDATAW {
            let mut data: NOTIFYICONDATAW = unsafe { std::mem::zeroed() };
            data.cbSize = std::mem::size_of::<NOTIFYICONDATAW>() as u32;
            data.hWnd = self.hwnd;
            data.uID = TRAY_ICON_ID;
            data
        }

        fn balloon(&self, message: &str) {
            let mut data = self.notify_data();
            data.uFlags = NIF_INFO;
            data.dwInfoFlags = NIIF_INFO;
            copy_wide(&mut data.szInfoTitle, BALLOON_TITLE);
            copy_wide(&mut data.szInfo, message);
            if unsafe { Shell_NotifyIconW(NIM_MODIFY, &data) } == 0 {
                tracing::warn!("tray balloon could not be shown");
            }
        }

        fn pump(&self) {
            let mut msg: MSG = unsafe { std::mem::zeroed() };
            while unsafe { PeekMessageW(&mut msg, std::ptr::null_mut(), 0, 0, PM_REMOVE) } != 0 {
                unsafe {
                    TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }
        }
    }

    impl Drop for TrayWindow {
        fn drop(&mut self) {
            unsafe {
                if self.added {
                    let data = self.notify_data();
                    Shell_NotifyIconW(NIM_DELETE, &data);
                }
                if !self.hwnd.is_null() {
                    SetWindowLongPtrW(self.hwnd, GWLP_USERDATA, 0);
                    DestroyWindow(self.hwnd);
                }
                if !self.state.is_null() {
                    drop(Box::from_raw(self.state));
                }
                if !self.menu.is_null() {
                    DestroyMenu(self.menu);
                }
                if !self.icon.is_null() {
                    DestroyIcon(self.icon);
                }
            }
        }
    }

    pub fn run_tray_loop(
        icon: IconImage,
        tooltip: String,
        events: Sender<Command>,
        inbox: TrayInbox,
    ) -> Result<(), TrayError> {
        let window = TrayWindow::create(&icon, &tooltip, events)?;
        tracing::info!("tray icon started");

        loop {
            window.pump();
            match inbox.recv_timeout(POLL_INTERVAL) {
                Some(TrayRequest::Stop) => break,
                Some(TrayRequest::Notify(message)) => window.balloon(&message),
                None => {}
            }
        }

        drop(window);
        tracing::info!("tray icon stopped");
        Ok(())
    }

    extern "system" fn tray_wnd_proc(
        hwnd: HWND,
        message: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        if message != WM_TRAY_CALLBACK {
            return unsafe { DefWindowProcW(hwnd, message, wparam, lparam) };
        }

        let state_ptr = unsafe { GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *const TrayWindowState };
        if state_ptr.is_null() {
            return 0;
        }
        let state = unsafe { &*state_ptr };

        match (lparam as u32) & 0xFFFF {
            WM_LBUTTONDBLCLK => {
                let _ = state.events.send(Command::RequestShow);
            }
            WM_RBUTTONUP | WM_CONTEXTMENU => show_menu(hwnd, state),
            _ => {}
        }
        0
    }

    fn show_menu(hwnd: HWND, state: &TrayWindowState) {
        let mut point = POINT { x: 0, y: 0 };
        let picked = unsafe {
            GetCursorPos(&mut point);
            SetForegroundWindow(hwnd);
            let picked = TrackPopupMenu(
                state.menu,
                TPM_RETURNCMD | TPM_NONOTIFY | TPM_RIGHTBUTTON,
                point.x,
                point.y,
                0,
                hwnd,
                std::ptr::null(),
            );
            PostMessageW(hwnd, WM_NULL, 0, 0);
            picked
        };

        let command = match picked as usize {
            MENU_SHOW => Command::RequestShow,
            MENU_QUIT => Command::RequestQuit,
            _ => return,
        };
        let _ = state.events.send(command);
    }

    fn last_error(call: &str) -> TrayError {
        let error = unsafe { GetLastError() };
        TrayError::Icon(format!("{call} failed with error {error}"))
    }

    fn to_wide(value: &str) -> Vec<u16> {
        value.encode_utf16().chain(std::iter::once(0)).collect()
    }

    // Truncates to fit and keeps the trailing NUL of the zeroed buffer.
    fn copy_wide(target: &mut [u16], value: &str) {
        let room = target.len().saturating_sub(1);
        for (slot, unit) in target[..room].iter_mut().zip(value.encode_utf16()) {
            *slot = unit;
        }
    }
}

#[cfg(not(target_os = "windows"))]
mod native {
    use std::sync::mpsc::Sender;

    use super::{TrayError, TrayInbox, TrayRequest};
    use crate::command::Command;
    use crate::icon::IconImage;

    pub fn run_tray_loop(
        icon: IconImage,
        tooltip: String,
        _events: Sender<Command>,
        inbox: TrayInbox,
    ) -> Result<(), TrayError> {
        tracing::info!(
            tooltip = %tooltip,
            width = icon.width,
            height = icon.height,
            "headless tray placeholder active"
        );
        loop {
            match inbox.recv() {
                TrayRequest::Stop => break,
                TrayRequest::Notify(message) => {
                    tracing::info!(message = %message, "tray notification");
                    eprintln!("[{tooltip}] {message}");
                }
            }
        }
        tracing::info!("headless tray placeholder stopped");
        Ok(())
    }
}
