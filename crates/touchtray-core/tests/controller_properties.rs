//! Integration tests for the tray presentation pipeline.
//!
//! These tests exercise the public surface of touchtray-core end-to-end:
//! `TrayController` + `resolve_target` + the scripted gateway, driven the
//! way the host event loop drives them.

use std::sync::{Arc, Mutex};

use touchtray_core::{
    Alerter, DeviceHandle, DeviceSnapshot, Directive, DisplayState, GatewayError, ResolveError,
    ScriptedGateway, TrayController, TrayEvent, TrayPresenter,
};

// ── Test doubles ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct GlyphLog {
    applied: Mutex<Vec<DisplayState>>,
    hide_calls: Mutex<u32>,
}

impl TrayPresenter for GlyphLog {
    fn apply_state(&self, state: DisplayState) {
        self.applied.lock().unwrap().push(state);
    }

    fn hide(&self) {
        *self.hide_calls.lock().unwrap() += 1;
    }
}

#[derive(Default)]
struct AlertLog {
    alerts: Mutex<Vec<String>>,
}

impl Alerter for AlertLog {
    fn error(&self, _title: &str, detail: &str) {
        self.alerts.lock().unwrap().push(detail.to_string());
    }
}

fn touch_screen(state: DisplayState) -> DeviceSnapshot {
    DeviceSnapshot {
        handle: DeviceHandle::new("HID\\ELAN2514&COL01\\5&0&0000"),
        display_name: "HID-compliant touch screen".to_string(),
        state,
    }
}

fn boot(
    initial: DisplayState,
) -> (TrayController, Arc<ScriptedGateway>, Arc<GlyphLog>, Arc<AlertLog>) {
    let gateway = Arc::new(ScriptedGateway::with_devices(vec![touch_screen(initial)]));
    let presenter = Arc::new(GlyphLog::default());
    let alerter = Arc::new(AlertLog::default());
    let controller = TrayController::new(
        Arc::clone(&gateway) as _,
        Arc::clone(&presenter) as _,
        Arc::clone(&alerter) as _,
        "touch screen",
    )
    .expect("exactly one staged match");
    (controller, gateway, presenter, alerter)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_startup_with_disabled_hardware_shows_disabled_glyph() {
    let (controller, gateway, presenter, _) = boot(DisplayState::Disabled);

    assert_eq!(controller.display_state(), DisplayState::Disabled);
    assert_eq!(
        presenter.applied.lock().unwrap().as_slice(),
        &[DisplayState::Disabled]
    );
    assert_eq!(gateway.enumerate_calls(), 1);
}

#[test]
fn test_startup_failure_shows_no_icon_at_all() {
    let gateway = Arc::new(ScriptedGateway::new());
    let presenter = Arc::new(GlyphLog::default());

    let result = TrayController::new(
        gateway,
        Arc::clone(&presenter) as _,
        Arc::new(AlertLog::default()),
        "touch screen",
    );

    assert!(matches!(result, Err(ResolveError::NoMatch { .. })));
    assert!(presenter.applied.lock().unwrap().is_empty());
}

#[test]
fn test_click_session_with_a_driver_busy_failure_in_the_middle() {
    // Hardware starts disabled; the user toggles it on, a second toggle is
    // rejected by the driver, and a third succeeds.
    let (mut controller, gateway, presenter, alerter) = boot(DisplayState::Disabled);

    controller.handle_event(TrayEvent::ToggleRequested);
    assert_eq!(controller.display_state(), DisplayState::Enabled);

    gateway.push_set_outcome(Err(GatewayError::StateChange("driver busy".to_string())));
    controller.handle_event(TrayEvent::ToggleRequested);
    assert_eq!(controller.display_state(), DisplayState::Enabled);
    assert_eq!(alerter.alerts.lock().unwrap().len(), 1);
    assert!(alerter.alerts.lock().unwrap()[0].contains("driver busy"));

    controller.handle_event(TrayEvent::ToggleRequested);
    assert_eq!(controller.display_state(), DisplayState::Disabled);

    // Glyph history tracks confirmed transitions only: the failed toggle
    // never appears.
    assert_eq!(
        presenter.applied.lock().unwrap().as_slice(),
        &[
            DisplayState::Disabled,
            DisplayState::Enabled,
            DisplayState::Disabled
        ]
    );

    // And every call carried the target derived from the confirmed state.
    let targets: Vec<bool> = gateway.set_calls().iter().map(|(_, e)| *e).collect();
    assert_eq!(targets, vec![true, false, false]);
}

#[test]
fn test_settings_window_lifecycle_across_gestures() {
    let (mut controller, _, _, _) = boot(DisplayState::Enabled);

    // First request opens; repeats focus the same window.
    assert_eq!(
        controller.handle_event(TrayEvent::SettingsRequested),
        Directive::OpenSettings
    );
    assert_eq!(
        controller.handle_event(TrayEvent::SettingsRequested),
        Directive::FocusSettings
    );

    // Toggling while settings is open does not disturb the tracking.
    controller.handle_event(TrayEvent::ToggleRequested);
    assert_eq!(
        controller.handle_event(TrayEvent::SettingsRequested),
        Directive::FocusSettings
    );

    // Closing allows a fresh window next time.
    controller.handle_event(TrayEvent::SettingsClosed);
    assert_eq!(
        controller.handle_event(TrayEvent::SettingsRequested),
        Directive::OpenSettings
    );
}

#[test]
fn test_menu_requests_are_inert_and_exit_is_terminal() {
    let (mut controller, gateway, presenter, _) = boot(DisplayState::Enabled);

    // The menu ships attached to the icon, so repeated reveal gestures do
    // nothing beyond letting the toolkit pop it up.
    assert_eq!(
        controller.handle_event(TrayEvent::MenuRequested),
        Directive::None
    );
    assert_eq!(
        controller.handle_event(TrayEvent::MenuRequested),
        Directive::None
    );
    assert_eq!(controller.display_state(), DisplayState::Enabled);
    assert_eq!(presenter.applied.lock().unwrap().len(), 1);

    assert_eq!(
        controller.handle_event(TrayEvent::ExitRequested),
        Directive::Shutdown
    );
    assert_eq!(*presenter.hide_calls.lock().unwrap(), 1);

    // Post-shutdown gestures are inert: no glyph updates, no device access.
    let glyphs_before = presenter.applied.lock().unwrap().len();
    controller.handle_event(TrayEvent::ToggleRequested);
    controller.handle_event(TrayEvent::MenuRequested);
    assert_eq!(presenter.applied.lock().unwrap().len(), glyphs_before);
    assert!(gateway.set_calls().is_empty());
    assert_eq!(*presenter.hide_calls.lock().unwrap(), 1);
}

#[test]
fn test_startup_refuses_ambiguous_hardware() {
    let gateway = Arc::new(ScriptedGateway::with_devices(vec![
        touch_screen(DisplayState::Enabled),
        DeviceSnapshot {
            handle: DeviceHandle::new("HID\\WACOM\\1"),
            display_name: "Wacom touch screen".to_string(),
            state: DisplayState::Enabled,
        },
    ]));
    let presenter = Arc::new(GlyphLog::default());

    let err = TrayController::new(
        gateway,
        Arc::clone(&presenter) as _,
        Arc::new(AlertLog::default()),
        "touch screen",
    )
    .err()
    .expect("two matches must be rejected");

    // The diagnostic names both candidates so the user can tighten the filter.
    let text = err.to_string();
    assert!(text.contains("HID-compliant touch screen"));
    assert!(text.contains("Wacom touch screen"));
    assert!(presenter.applied.lock().unwrap().is_empty());
}
