use std::sync::mpsc::Sender;

use crate::command::Command;
use crate::hotkey::parse_hotkey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyRegistration {
    Native(i32),
    Noop(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyRuntimeError {
    #[error("invalid hotkey: {0}")]
    InvalidHotkey(String),
    #[error("hotkey registration failed: {0}")]
    RegistrationFailed(String),
    #[error("hotkey event loop failed: {0}")]
    EventLoopFailed(String),
}

pub trait HotkeyRegistrar: Send {
    fn register_hotkey(&mut self, hotkey: &str) -> Result<HotkeyRegistration, HotkeyRuntimeError>;
    fn unregister_all(&mut self) -> Result<(), HotkeyRuntimeError>;
}

#[derive(Default)]
pub struct MockHotkeyRegistrar {
    registrations: Vec<String>,
}

impl MockHotkeyRegistrar {
    pub fn registrations(&self) -> &[String] {
        &self.registrations
    }
}

impl HotkeyRegistrar for MockHotkeyRegistrar {
    fn register_hotkey(&mut self, hotkey: &str) -> Result<HotkeyRegistration, HotkeyRuntimeError> {
        parse_hotkey(hotkey).map_err(HotkeyRuntimeError::InvalidHotkey)?;
        self.registrations.push(hotkey.to_string());
        Ok(HotkeyRegistration::Noop(hotkey.to_string()))
    }

    fn unregister_all(&mut self) -> Result<(), HotkeyRuntimeError> {
        self.registrations.clear();
        Ok(())
    }
}

#[cfg(not(target_os = "windows"))]
#[derive(Default)]
pub struct NoopHotkeyRegistrar {
    registrations: Vec<String>,
}

#[cfg(not(target_os = "windows"))]
impl HotkeyRegistrar for NoopHotkeyRegistrar {
    fn register_hotkey(&mut self, hotkey: &str) -> Result<HotkeyRegistration, HotkeyRuntimeError> {
        parse_hotkey(hotkey).map_err(HotkeyRuntimeError::InvalidHotkey)?;
        self.registrations.push(hotkey.to_string());
        Ok(HotkeyRegistration::Noop(hotkey.to_string()))
    }

    fn unregister_all(&mut self) -> Result<(), HotkeyRuntimeError> {
        self.registrations.clear();
        Ok(())
    }
}

#[cfg(target_os = "windows")]
pub struct WindowsHotkeyRegistrar {
    next_id: i32,
    registered_ids: Vec<i32>,
}

#[cfg(target_os = "windows")]
impl Default for WindowsHotkeyRegistrar {
    fn default() -> Self {
        Self {
            next_id: 1,
            registered_ids: Vec::new(),
        }
    }
}

#[cfg(target_os = "windows")]
impl HotkeyRegistrar for WindowsHotkeyRegistrar {
    fn register_hotkey(&mut self, hotkey: &str) -> Result<HotkeyRegistration, HotkeyRuntimeError> {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
            RegisterHotKey, MOD_ALT, MOD_CONTROL, MOD_NOREPEAT, MOD_SHIFT, VK_F1, VK_SPACE,
        };

        let parsed = parse_hotkey(hotkey).map_err(HotkeyRuntimeError::InvalidHotkey)?;

        let mut modifiers = MOD_NOREPEAT;
        for modifier in &parsed.modifiers {
            match modifier.to_ascii_lowercase().as_str() {
                "alt" => modifiers |= MOD_ALT,
                "ctrl" | "control" => modifiers |= MOD_CONTROL,
                "shift" => modifiers |= MOD_SHIFT,
                _ => {
                    return Err(HotkeyRuntimeError::InvalidHotkey(format!(
                        "unsupported modifier: {modifier}"
                    )))
                }
            }
        }

        let key_upper = parsed.key.to_ascii_uppercase();
        let function_key = key_upper
            .strip_prefix('F')
            .and_then(|number| number.parse::<u32>().ok())
            .filter(|number| (1..=24).contains(number));
        let vk: u32 = match (key_upper.as_str(), function_key) {
            ("SPACE", _) => VK_SPACE as u32,
            (_, Some(number)) => VK_F1 as u32 + number - 1,
            (key, None) if key.len() == 1 => key.as_bytes()[0] as u32,
            _ => {
                return Err(HotkeyRuntimeError::InvalidHotkey(format!(
                    "unsupported key: {}",
                    parsed.key
                )))
            }
        };

        let id = self.next_id;
        self.next_id += 1;

        let ok = unsafe { RegisterHotKey(std::ptr::null_mut(), id, modifiers, vk) };
        if ok == 0 {
            return Err(HotkeyRuntimeError::RegistrationFailed(format!(
                "RegisterHotKey failed for '{hotkey}'"
            )));
        }

        self.registered_ids.push(id);
        Ok(HotkeyRegistration::Native(id))
    }

    fn unregister_all(&mut self) -> Result<(), HotkeyRuntimeError> {
        use windows_sys::Win32::UI::Input::KeyboardAndMouse::UnregisterHotKey;

        for id in self.registered_ids.drain(..) {
            unsafe {
                UnregisterHotKey(std::ptr::null_mut(), id);
            }
        }
        Ok(())
    }
}

pub fn default_hotkey_registrar() -> Box<dyn HotkeyRegistrar> {
    #[cfg(target_os = "windows")]
    {
        Box::new(WindowsHotkeyRegistrar::default())
    }

    #[cfg(not(target_os = "windows"))]
    {
        Box::new(NoopHotkeyRegistrar::default())
    }
}

#[cfg(target_os = "windows")]
pub fn run_message_loop<F>(mut on_hotkey: F) -> Result<(), HotkeyRuntimeError>
where
    F: FnMut(i32),
{
    use windows_sys::Win32::UI::WindowsAndMessaging::{
        DispatchMessageW, GetMessageW, TranslateMessage, MSG, WM_HOTKEY,
    };

    let mut msg: MSG = unsafe { std::mem::zeroed() };
    loop {
        let status = unsafe { GetMessageW(&mut msg, std::ptr::null_mut(), 0, 0) };
        if status == -1 {
            return Err(HotkeyRuntimeError::EventLoopFailed(
                "GetMessageW returned -1".to_string(),
            ));
        }

        if status == 0 {
            return Ok(());
        }

        if msg.message == WM_HOTKEY {
            on_hotkey(msg.wParam as i32);
        }

        unsafe {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Keeps the global hotkey registered and forwards presses as
/// `Command::RequestShow`. Dropping it unregisters the hotkey.
pub struct HotkeyListener {
    registration: HotkeyRegistration,
    #[cfg(target_os = "windows")]
    thread_id: u32,
    #[cfg(target_os = "windows")]
    handle: Option<std::thread::JoinHandle<()>>,
    #[cfg(not(target_os = "windows"))]
    registrar: Box<dyn HotkeyRegistrar>,
}

impl HotkeyListener {
    pub fn registration(&self) -> &HotkeyRegistration {
        &self.registration
    }
}

/// Registers `hotkey` for the whole process.
///
/// On Windows the hotkey is owned by a dedicated thread running its own
/// message loop, since `WM_HOTKEY` is posted to the registering thread.
#[cfg(target_os = "windows")]
pub fn spawn_listener(
    hotkey: &str,
    events: Sender<Command>,
) -> Result<HotkeyListener, HotkeyRuntimeError> {
    use std::sync::mpsc;
    use windows_sys::Win32::System::Threading::GetCurrentThreadId;
    use windows_sys::Win32::UI::WindowsAndMessaging::{PeekMessageW, MSG, PM_NOREMOVE};

    let hotkey = hotkey.to_string();
    let (ready_tx, ready_rx) = mpsc::sync_channel(1);
    let handle = std::thread::Builder::new()
        .name("global-hotkey".to_string())
        .spawn(move || {
            // Make sure the thread has a message queue before anyone posts to it.
            let mut msg: MSG = unsafe { std::mem::zeroed() };
            unsafe {
                PeekMessageW(&mut msg, std::ptr::null_mut(), 0, 0, PM_NOREMOVE);
            }
            let thread_id = unsafe { GetCurrentThreadId() };

            let mut registrar = default_hotkey_registrar();
            let registration = registrar.register_hotkey(&hotkey);
            let registered = registration.is_ok();
            let _ = ready_tx.send(registration.map(|registration| (registration, thread_id)));
            if !registered {
                return;
            }

            let result = run_message_loop(|id| {
                tracing::debug!(hotkey_id = id, "hotkey_event received");
                let _ = events.send(Command::RequestShow);
            });
            if let Err(error) = result {
                tracing::error!(%error, "hotkey message loop ended");
            }
            let _ = registrar.unregister_all();
        })
        .map_err(|error| HotkeyRuntimeError::EventLoopFailed(error.to_string()))?;

    let (registration, thread_id) = ready_rx.recv().map_err(|_| {
        HotkeyRuntimeError::EventLoopFailed("hotkey thread exited early".to_string())
    })??;

    Ok(HotkeyListener {
        registration,
        thread_id,
        handle: Some(handle),
    })
}

#[cfg(not(target_os = "windows"))]
pub fn spawn_listener(
    hotkey: &str,
    _events: Sender<Command>,
) -> Result<HotkeyListener, HotkeyRuntimeError> {
    let mut registrar = default_hotkey_registrar();
    let registration = registrar.register_hotkey(hotkey)?;
    tracing::info!(hotkey = %hotkey, "non-windows runtime mode: no global hotkey loop");
    Ok(HotkeyListener {
        registration,
        registrar,
    })
}

impl Drop for HotkeyListener {
    #[cfg(target_os = "windows")]
    fn drop(&mut self) {
        use windows_sys::Win32::UI::WindowsAndMessaging::{PostThreadMessageW, WM_QUIT};

        unsafe {
            PostThreadMessageW(self.thread_id, WM_QUIT, 0, 0);
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    #[cfg(not(target_os = "windows"))]
    fn drop(&mut self) {
        let _ = self.registrar.unregister_all();
    }
}
