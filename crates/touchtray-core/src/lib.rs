//! # touchtray-core
//!
//! Platform-free core of TouchTray: the tray presentation state machine,
//! the device control gateway contract, and the domain types they share.
//!
//! This crate is consumed by the `touchtray-app` binary, which supplies the
//! OS-facing implementations (SetupAPI device control, the native tray icon,
//! modal dialogs).  It has zero dependencies on OS APIs or UI frameworks,
//! which is what makes the state machine fully unit-testable.
//!
//! # Architecture overview
//!
//! TouchTray is a status-area utility that toggles one physical touch-screen
//! device on and off.  The pieces defined here:
//!
//! - **`domain`** – `DeviceHandle`, `DisplayState`, and `DeviceSnapshot`:
//!   the application's confirmed belief about the controlled device.
//!
//! - **`gateway`** – the `DeviceGateway` trait over device enumeration and
//!   enable/disable control, plus `resolve_target`, the startup rule that
//!   exactly one device may match the configured name filter.
//!
//! - **`application`** – `TrayController`, the state machine that owns the
//!   displayed state, drives gateway calls, and updates the presenter
//!   transactionally: the glyph changes if and only if the hardware call
//!   reported success.

pub mod application;
pub mod domain;
pub mod gateway;

// Re-export the most-used types at the crate root so callers can write
// `touchtray_core::TrayController` instead of the full module path.
pub use application::tray_controller::{
    Alerter, Directive, TrayController, TrayEvent, TrayPresenter,
};
pub use domain::device::{DeviceHandle, DeviceSnapshot, DisplayState};
pub use gateway::mock::ScriptedGateway;
pub use gateway::{resolve_target, DeviceGateway, GatewayError, ResolveError};
