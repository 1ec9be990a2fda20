//! Modal error dialogs.
//!
//! A tray-only application has no window to host inline errors, so every
//! user-facing failure is reported through a blocking `MessageBoxW`.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use touchtray_core::Alerter;
use windows::core::HSTRING;
use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

/// Caption for errors that prevent the app from starting.
pub const LAUNCH_FAILURE_CAPTION: &str = "Failed to Launch";

/// Caption shown by the panic hook.
pub const CRASH_CAPTION: &str = "Program Terminated Unexpectedly";

/// Body text when a second instance is launched.
pub const ALREADY_RUNNING_TEXT: &str =
    "Instance already running.  Check your hidden icons and/or Task Manager.";

/// Shows a blocking error dialog with `caption` and `text`.
pub fn fatal(caption: &str, text: &str) {
    // SAFETY: modal message box over owned wide strings; no window handle is
    // required for a tray-only process.
    unsafe {
        MessageBoxW(
            None,
            &HSTRING::from(text),
            &HSTRING::from(caption),
            MB_OK | MB_ICONERROR,
        );
    }
}

/// [`Alerter`] implementation backed by [`fatal`].
pub struct ModalAlerter;

impl Alerter for ModalAlerter {
    fn error(&self, title: &str, detail: &str) {
        fatal(title, detail);
    }
}
