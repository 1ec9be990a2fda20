//! The UI event loop.
//!
//! Tray and menu events arrive on toolkit callback threads and are forwarded
//! through an event-loop proxy, so every controller transition executes on
//! this one thread.  The loop owns the settings window because window
//! creation needs the `EventLoopWindowTarget`; the controller only tracks
//! whether such a window is believed open and answers with a [`Directive`].

#![cfg(target_os = "windows")]

use std::sync::Arc;

use tao::dpi::LogicalSize;
use tao::event::{Event, StartCause, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoopBuilder, EventLoopWindowTarget};
use tao::platform::run_return::EventLoopExtRunReturn;
use tao::window::{Window, WindowBuilder};
use touchtray_core::{Alerter, DeviceGateway, Directive, TrayController, TrayEvent, TrayPresenter};
use tracing::{error, info, warn};
use tray_icon::menu::MenuEvent;
use tray_icon::{MouseButton, MouseButtonState, TrayIconEvent};

use super::device_control::windows::SetupApiGateway;
use super::dialogs::{self, ModalAlerter, LAUNCH_FAILURE_CAPTION};
use super::storage::config::AppConfig;
use super::tray::{NativeTray, MENU_ID_EXIT, MENU_ID_SETTINGS};

/// Raw toolkit events forwarded onto the loop thread.
enum UserEvent {
    Tray(TrayIconEvent),
    Menu(MenuEvent),
}

/// Runs the tray application until exit and returns the process exit code.
///
/// Startup failures (unresolvable device, icon creation failure) are
/// reported through a modal dialog and yield a non-zero code before any
/// icon becomes visible.
pub fn run(config: &AppConfig) -> i32 {
    let mut event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();

    let proxy = event_loop.create_proxy();
    TrayIconEvent::set_event_handler(Some({
        let proxy = proxy.clone();
        move |event| {
            let _ = proxy.send_event(UserEvent::Tray(event));
        }
    }));
    MenuEvent::set_event_handler(Some(move |event| {
        let _ = proxy.send_event(UserEvent::Menu(event));
    }));

    let gateway: Arc<dyn DeviceGateway> = Arc::new(SetupApiGateway::new());
    let presenter = Arc::new(NativeTray::new(config.app.tooltip.clone()));
    let alerter: Arc<dyn Alerter> = Arc::new(ModalAlerter);
    let name_filter = config.device.name_filter.clone();

    let mut controller: Option<TrayController> = None;
    let mut settings_window: Option<Window> = None;

    event_loop.run_return(|event, window_target, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            // The icon must be created on the loop thread, after the loop
            // exists, so controller construction happens here rather than
            // before `run_return`.
            Event::NewEvents(StartCause::Init) => {
                match TrayController::new(
                    Arc::clone(&gateway),
                    Arc::clone(&presenter) as Arc<dyn TrayPresenter>,
                    Arc::clone(&alerter),
                    &name_filter,
                ) {
                    Ok(built) => {
                        if let Some(reason) = presenter.failure() {
                            dialogs::fatal(LAUNCH_FAILURE_CAPTION, &reason);
                            *control_flow = ControlFlow::ExitWithCode(1);
                        } else {
                            controller = Some(built);
                        }
                    }
                    Err(err) => {
                        error!("device resolution failed: {err}");
                        dialogs::fatal(LAUNCH_FAILURE_CAPTION, &err.to_string());
                        *control_flow = ControlFlow::ExitWithCode(1);
                    }
                }
            }

            Event::UserEvent(user) => {
                let Some(tray_event) = (match &user {
                    UserEvent::Tray(e) => tray_gesture(e),
                    UserEvent::Menu(e) => menu_command(e),
                }) else {
                    return;
                };
                let Some(active) = controller.as_mut() else {
                    return;
                };

                match active.handle_event(tray_event) {
                    Directive::None => {}
                    Directive::OpenSettings => {
                        match open_settings_window(window_target) {
                            Ok(window) => settings_window = Some(window),
                            Err(e) => {
                                warn!("could not create the settings window: {e}");
                                alerter.error(
                                    "Settings Unavailable",
                                    &format!("Could not open the settings window: {e}"),
                                );
                                // Undo the controller's open-window belief.
                                active.handle_event(TrayEvent::SettingsClosed);
                            }
                        }
                    }
                    Directive::FocusSettings => {
                        if let Some(window) = &settings_window {
                            window.set_focus();
                        }
                    }
                    Directive::Shutdown => {
                        settings_window = None;
                        info!("event loop stopping");
                        *control_flow = ControlFlow::ExitWithCode(0);
                    }
                }
            }

            Event::WindowEvent {
                window_id,
                event: WindowEvent::CloseRequested,
                ..
            } => {
                if settings_window.as_ref().map(|w| w.id()) == Some(window_id) {
                    settings_window = None;
                    if let Some(active) = controller.as_mut() {
                        active.handle_event(TrayEvent::SettingsClosed);
                    }
                }
            }

            _ => {}
        }
    })
}

/// Maps a raw tray icon event to a controller event.
///
/// Button-up is the click commit point; down events and hover traffic are
/// ignored.  A double click also delivers its constituent single clicks,
/// so opening settings toggles the device twice along the way; the display
/// stays consistent because both toggles complete transactionally.
fn tray_gesture(event: &TrayIconEvent) -> Option<TrayEvent> {
    match event {
        TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        } => Some(TrayEvent::ToggleRequested),
        TrayIconEvent::DoubleClick {
            button: MouseButton::Left,
            ..
        } => Some(TrayEvent::SettingsRequested),
        TrayIconEvent::Click {
            button: MouseButton::Right,
            button_state: MouseButtonState::Up,
            ..
        } => Some(TrayEvent::MenuRequested),
        _ => None,
    }
}

/// Maps a menu item activation to a controller event.
fn menu_command(event: &MenuEvent) -> Option<TrayEvent> {
    match event.id.0.as_str() {
        MENU_ID_SETTINGS => Some(TrayEvent::SettingsRequested),
        MENU_ID_EXIT => Some(TrayEvent::ExitRequested),
        _ => None,
    }
}

fn open_settings_window(
    target: &EventLoopWindowTarget<UserEvent>,
) -> Result<Window, tao::error::OsError> {
    WindowBuilder::new()
        .with_title("TouchTray Settings")
        .with_inner_size(LogicalSize::new(420.0, 180.0))
        .with_resizable(false)
        .build(target)
}
