//! Device identity and enablement state.

use std::fmt;

/// Opaque identifier for the one controlled hardware device.
///
/// On Windows this wraps the device instance identifier (e.g.
/// `HID\ELAN2514&COL01\5&2D2E0191&0&0000`), but the core never interprets
/// the contents; it only hands the value back to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceHandle(String);

impl DeviceHandle {
    /// Wraps a gateway-provided identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier for gateway use and diagnostics.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The application's confirmed belief about the device's enablement.
///
/// Updated only after a hardware mutation reports success, never
/// optimistically before.  The tray glyph is derived 1:1 from this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Enabled,
    Disabled,
}

impl DisplayState {
    /// Maps a gateway-reported enabled flag to a display state.
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            DisplayState::Enabled
        } else {
            DisplayState::Disabled
        }
    }

    /// `true` when the device is enabled.
    pub fn is_enabled(self) -> bool {
        matches!(self, DisplayState::Enabled)
    }

    /// The opposite state, the target of a toggle gesture.
    pub fn toggled(self) -> Self {
        match self {
            DisplayState::Enabled => DisplayState::Disabled,
            DisplayState::Disabled => DisplayState::Enabled,
        }
    }
}

impl fmt::Display for DisplayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayState::Enabled => f.write_str("enabled"),
            DisplayState::Disabled => f.write_str("disabled"),
        }
    }
}

/// One device as reported by gateway enumeration: identity, human-readable
/// name, and current enablement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSnapshot {
    pub handle: DeviceHandle,
    pub display_name: String,
    pub state: DisplayState,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
