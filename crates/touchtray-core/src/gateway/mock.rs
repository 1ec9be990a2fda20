//! Scripted device gateway for testing.
//!
//! Allows tests to stage a device list and script per-call `set_enabled`
//! outcomes without touching OS device APIs.  Successful state changes are
//! reflected back into the staged device list, so a subsequent `enumerate`
//! reports the mutated hardware state, mirroring real hardware behaviour.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::device::{DeviceHandle, DeviceSnapshot, DisplayState};

use super::{DeviceGateway, GatewayError};

/// A scripted implementation of [`DeviceGateway`] that records calls.
#[derive(Default)]
pub struct ScriptedGateway {
    devices: Mutex<Vec<DeviceSnapshot>>,
    set_outcomes: Mutex<VecDeque<Result<(), GatewayError>>>,
    set_calls: Mutex<Vec<(DeviceHandle, bool)>>,
    enumerate_calls: Mutex<u32>,
}

impl ScriptedGateway {
    /// Creates an empty gateway (no devices present).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway with the given devices staged as "present".
    pub fn with_devices(devices: Vec<DeviceSnapshot>) -> Self {
        Self {
            devices: Mutex::new(devices),
            ..Self::default()
        }
    }

    /// Queues the outcome of the next unscripted `set_enabled` call.
    ///
    /// Calls with no queued outcome succeed.
    pub fn push_set_outcome(&self, outcome: Result<(), GatewayError>) {
        self.set_outcomes
            .lock()
            .expect("lock poisoned")
            .push_back(outcome);
    }

    /// Every `(handle, enabled)` pair passed to `set_enabled`, in order.
    pub fn set_calls(&self) -> Vec<(DeviceHandle, bool)> {
        self.set_calls.lock().expect("lock poisoned").clone()
    }

    /// Number of `enumerate` calls observed.
    pub fn enumerate_calls(&self) -> u32 {
        *self.enumerate_calls.lock().expect("lock poisoned")
    }
}

impl DeviceGateway for ScriptedGateway {
    fn enumerate(&self, pattern: &str) -> Result<Vec<DeviceSnapshot>, GatewayError> {
        *self.enumerate_calls.lock().expect("lock poisoned") += 1;
        let needle = pattern.to_lowercase();
        Ok(self
            .devices
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|d| d.display_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    fn set_enabled(&self, device: &DeviceHandle, enabled: bool) -> Result<(), GatewayError> {
        self.set_calls
            .lock()
            .expect("lock poisoned")
            .push((device.clone(), enabled));

        let outcome = self
            .set_outcomes
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or(Ok(()));

        if outcome.is_ok() {
            // A confirmed success is visible on the next enumeration.
            let mut devices = self.devices.lock().expect("lock poisoned");
            if let Some(entry) = devices.iter_mut().find(|d| &d.handle == device) {
                entry.state = DisplayState::from_enabled(enabled);
            }
        }
        outcome
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
