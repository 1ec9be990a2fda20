//! Hardware device control infrastructure.
//!
//! The production gateway uses the Windows SetupAPI to enumerate present
//! devices and flip their enablement through the class installer.  The
//! trait it implements, and the scripted double used in tests, live in
//! `touchtray-core`.

#[cfg(target_os = "windows")]
pub mod windows;
