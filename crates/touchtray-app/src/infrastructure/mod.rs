//! Infrastructure layer: OS services behind the core abstractions.
//!
//! The storage and glyph modules are portable and carry the test suites;
//! the remaining modules talk to Win32 and only build on Windows.

pub mod device_control;
pub mod glyph;
pub mod storage;

#[cfg(target_os = "windows")]
pub mod dialogs;

#[cfg(target_os = "windows")]
pub mod event_loop;

#[cfg(target_os = "windows")]
pub mod instance;

#[cfg(target_os = "windows")]
pub mod tray;
