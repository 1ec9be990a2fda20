//! Single-instance enforcement via a named Win32 mutex.
//!
//! The mutex exists for the lifetime of the process that created it; a
//! second process sees `ERROR_ALREADY_EXISTS` and backs off.  The OS
//! releases the name when the owning process exits, even after a crash, so
//! no stale-lock cleanup is ever needed.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use windows::core::HSTRING;
use windows::Win32::Foundation::{CloseHandle, GetLastError, ERROR_ALREADY_EXISTS, HANDLE};
use windows::Win32::System::Threading::CreateMutexW;

/// Mutex name shared by every copy of the executable on the machine.
pub const LOCK_NAME: &str = "touchtray-single-instance";

/// Error type for instance lock acquisition.
#[derive(Debug, thiserror::Error)]
pub enum InstanceError {
    #[error("failed to create the single-instance mutex: {0}")]
    Mutex(String),
}

/// Owns the named mutex handle for the process lifetime.
///
/// Dropping the lock closes the handle and frees the name for the next
/// launch.
pub struct InstanceLock {
    handle: HANDLE,
}

impl InstanceLock {
    /// Attempts to become the single running instance.
    ///
    /// Returns `Ok(None)` when another instance already holds the name,
    /// in which case this process must exit without creating any UI.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::Mutex`] when mutex creation itself fails.
    pub fn acquire(name: &str) -> Result<Option<Self>, InstanceError> {
        // SAFETY: plain named-mutex creation with no security descriptor;
        // the returned handle is owned by the guard below.
        let handle = unsafe { CreateMutexW(None, false, &HSTRING::from(name)) }
            .map_err(|e| InstanceError::Mutex(e.message()))?;

        // SAFETY: read immediately after CreateMutexW on the same thread,
        // which is the documented way to detect an existing name.
        let already_exists = unsafe { GetLastError() } == ERROR_ALREADY_EXISTS;
        if already_exists {
            // SAFETY: handle came from CreateMutexW above and is not used
            // again.
            unsafe {
                let _ = CloseHandle(handle);
            }
            return Ok(None);
        }

        Ok(Some(Self { handle }))
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        // SAFETY: the handle is owned by this guard and closed exactly once.
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
