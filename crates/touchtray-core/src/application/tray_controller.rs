//! TrayController: the state machine behind the tray icon.
//!
//! Owns the authoritative in-memory belief about the device state, drives
//! gateway calls, and updates the presenter atomically with the outcome.
//! Gesture events arrive from the host event loop; side effects the loop
//! itself must perform (window creation, loop termination) are returned as
//! [`Directive`] values instead of being invoked through callbacks.
//!
//! # Concurrency
//!
//! Single-threaded by design: every transition executes on the one UI event
//! thread, and gateway calls block that thread for their duration.  A hung
//! hardware call therefore hangs the application, an accepted limitation,
//! not something this layer papers over with timeouts or retries.  None of
//! the traits here carry `Send`/`Sync` bounds.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::device::{DeviceHandle, DisplayState};
use crate::gateway::{resolve_target, DeviceGateway, ResolveError};

/// A user gesture or window notification mapped to a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayEvent {
    /// Primary gesture (single click): toggle the device.
    ToggleRequested,
    /// Secondary gesture (double click or menu item): open/activate settings.
    SettingsRequested,
    /// Tertiary gesture (alternate button): reveal the interaction menu.
    MenuRequested,
    /// The tracked settings window has closed.
    SettingsClosed,
    /// Exit command from the menu.
    ExitRequested,
}

/// An action the host event loop must carry out after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Nothing for the loop to do.
    None,
    /// Create the settings window; the controller now tracks it as open.
    OpenSettings,
    /// Bring the existing settings window to the foreground.
    FocusSettings,
    /// Terminal: the icon is hidden, the loop should terminate.
    Shutdown,
}

/// Trait over the native tray icon.
///
/// The production implementation wraps the OS status-area icon and creates
/// it lazily on the first `apply_state` call, so a startup failure never
/// shows an icon.  The interaction menu is assembled in that same single
/// setup step and attached to the icon, which lets the toolkit reveal it
/// natively on the very first menu gesture.  Test implementations record
/// calls.
pub trait TrayPresenter {
    /// Shows the glyph for `state` (creating the icon, with its menu
    /// attached, if needed).
    fn apply_state(&self, state: DisplayState);

    /// Removes the icon from the status area.  Called exactly once.
    fn hide(&self);
}

/// Trait over blocking, user-visible error notifications.
pub trait Alerter {
    /// Shows a modal error with enough detail to identify the failed
    /// operation.  Blocks until dismissed.
    fn error(&self, title: &str, detail: &str);
}

/// The tray presentation state machine.
pub struct TrayController {
    gateway: Arc<dyn DeviceGateway>,
    presenter: Arc<dyn TrayPresenter>,
    alerter: Arc<dyn Alerter>,
    device: DeviceHandle,
    device_name: String,
    state: DisplayState,
    settings_open: bool,
    shutting_down: bool,
}

impl TrayController {
    /// Resolves the single target device and displays its reported state.
    ///
    /// The initial display state always comes from the gateway report,
    /// never assumed.  On a resolution failure the presenter is never
    /// touched, so no icon becomes visible.
    ///
    /// # Errors
    ///
    /// Propagates [`ResolveError`] when the name filter matches zero or
    /// multiple devices, or enumeration itself fails.
    pub fn new(
        gateway: Arc<dyn DeviceGateway>,
        presenter: Arc<dyn TrayPresenter>,
        alerter: Arc<dyn Alerter>,
        name_filter: &str,
    ) -> Result<Self, ResolveError> {
        let snapshot = resolve_target(gateway.as_ref(), name_filter)?;
        info!(
            "resolved target device \"{}\" ({}), currently {}",
            snapshot.display_name, snapshot.handle, snapshot.state
        );
        presenter.apply_state(snapshot.state);
        Ok(Self {
            gateway,
            presenter,
            alerter,
            device: snapshot.handle,
            device_name: snapshot.display_name,
            state: snapshot.state,
            settings_open: false,
            shutting_down: false,
        })
    }

    /// The last successfully confirmed hardware state.
    pub fn display_state(&self) -> DisplayState {
        self.state
    }

    /// `true` once the exit command has been processed.
    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down
    }

    /// Dispatches one event to completion and returns the loop directive.
    ///
    /// After shutdown every event is ignored: the state machine is terminal
    /// and accepts no further transitions.
    pub fn handle_event(&mut self, event: TrayEvent) -> Directive {
        if self.shutting_down {
            return Directive::None;
        }
        match event {
            TrayEvent::ToggleRequested => {
                self.toggle();
                Directive::None
            }
            TrayEvent::SettingsRequested => {
                if self.settings_open {
                    Directive::FocusSettings
                } else {
                    self.settings_open = true;
                    Directive::OpenSettings
                }
            }
            TrayEvent::MenuRequested => {
                // The menu was attached with the icon and is revealed
                // natively by the toolkit; the gesture must not alter the
                // display state or touch the device.
                Directive::None
            }
            TrayEvent::SettingsClosed => {
                self.settings_open = false;
                Directive::None
            }
            TrayEvent::ExitRequested => {
                self.presenter.hide();
                self.settings_open = false;
                self.shutting_down = true;
                info!("exit requested, tray icon removed");
                Directive::Shutdown
            }
        }
    }

    /// Transactional toggle: the display changes if and only if the
    /// hardware call reports success.
    fn toggle(&mut self) {
        let target = self.state.toggled();
        match self.gateway.set_enabled(&self.device, target.is_enabled()) {
            Ok(()) => {
                self.state = target;
                self.presenter.apply_state(target);
                info!("\"{}\" is now {}", self.device_name, target);
            }
            Err(err) => {
                warn!(
                    "could not switch \"{}\" to {}: {}",
                    self.device_name, target, err
                );
                let verb = if target.is_enabled() {
                    "enable"
                } else {
                    "disable"
                };
                self.alerter.error(
                    "Device Toggle Failed",
                    &format!("Could not {verb} \"{}\": {err}", self.device_name),
                );
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
