//! Native status-area icon.
//!
//! [`NativeTray`] creates the OS icon lazily inside the first `apply_state`
//! call, so nothing appears in the status area until the target device has
//! been resolved.  The context menu is assembled in that same single setup
//! step and attached to the icon, which lets the toolkit reveal it natively
//! on the very first right click.  The presenter trait methods are
//! infallible by contract; a toolkit failure during creation is recorded
//! and surfaced through [`NativeTray::failure`], which the host checks once
//! right after startup.

#![cfg(target_os = "windows")]

use std::cell::RefCell;

use touchtray_core::{DisplayState, TrayPresenter};
use tracing::error;
use tray_icon::menu::{Menu, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use super::glyph::{glyph_rgba, GLYPH_SIZE};

/// Menu item id for the settings entry.
pub const MENU_ID_SETTINGS: &str = "settings";

/// Menu item id for the exit entry.
pub const MENU_ID_EXIT: &str = "exit";

/// [`TrayPresenter`] over a lazily created [`TrayIcon`].
pub struct NativeTray {
    tooltip: String,
    icon: RefCell<Option<TrayIcon>>,
    failure: RefCell<Option<String>>,
}

impl NativeTray {
    pub fn new(tooltip: impl Into<String>) -> Self {
        Self {
            tooltip: tooltip.into(),
            icon: RefCell::new(None),
            failure: RefCell::new(None),
        }
    }

    /// Error recorded by an earlier infallible trait call, if any.
    ///
    /// Checked once by the host after controller construction; a failure at
    /// that point means no usable icon exists and the launch must abort.
    pub fn failure(&self) -> Option<String> {
        self.failure.borrow().clone()
    }

    fn record_failure(&self, what: &str, err: impl std::fmt::Display) {
        error!("{what}: {err}");
        *self.failure.borrow_mut() = Some(format!("{what}: {err}"));
    }
}

/// Assembles the context menu attached to the icon at creation time.
fn build_menu() -> Result<Menu, tray_icon::menu::Error> {
    let menu = Menu::new();
    let settings = MenuItem::with_id(MENU_ID_SETTINGS, "&Settings", true, None);
    let exit = MenuItem::with_id(MENU_ID_EXIT, "&Exit", true, None);
    menu.append_items(&[&settings, &PredefinedMenuItem::separator(), &exit])?;
    Ok(menu)
}

impl TrayPresenter for NativeTray {
    fn apply_state(&self, state: DisplayState) {
        let icon = match Icon::from_rgba(glyph_rgba(state), GLYPH_SIZE, GLYPH_SIZE) {
            Ok(icon) => icon,
            Err(e) => {
                self.record_failure("could not build the tray glyph", e);
                return;
            }
        };

        let mut slot = self.icon.borrow_mut();
        match slot.as_ref() {
            Some(tray) => {
                if let Err(e) = tray.set_icon(Some(icon)) {
                    self.record_failure("could not update the tray glyph", e);
                }
            }
            None => {
                // First call: the device is resolved, the icon may appear.
                // The menu must ride along now; a missing menu would leave
                // the icon without an exit path, so its failure aborts the
                // launch the same way an icon failure does.
                let menu = match build_menu() {
                    Ok(menu) => menu,
                    Err(e) => {
                        self.record_failure("could not assemble the tray menu", e);
                        return;
                    }
                };
                match TrayIconBuilder::new()
                    .with_tooltip(&self.tooltip)
                    .with_icon(icon)
                    .with_menu(Box::new(menu))
                    .show_menu_on_left_click(false)
                    .build()
                {
                    Ok(tray) => *slot = Some(tray),
                    Err(e) => self.record_failure("could not create the tray icon", e),
                }
            }
        }
    }

    fn hide(&self) {
        // Dropping the handle removes the icon from the status area.
        self.icon.borrow_mut().take();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
