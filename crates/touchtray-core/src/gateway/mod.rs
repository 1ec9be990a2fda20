//! Device control gateway contract.
//!
//! The gateway is the abstraction boundary over hardware device enumeration
//! and enable/disable control.  The production implementation lives in
//! `touchtray-app` (Windows SetupAPI); tests use [`mock::ScriptedGateway`].
//!
//! Calls are synchronous and may block the caller for their duration; the
//! event loop deliberately accepts that (see the concurrency notes on
//! [`crate::application::tray_controller`]).

use thiserror::Error;

use crate::domain::device::{DeviceHandle, DeviceSnapshot};

pub mod mock;

/// Error type for gateway operations.
///
/// Both variants carry the failure detail verbatim; the controller surfaces
/// it to the user instead of retrying, since device errors (unplugged
/// hardware, driver fault) are not transient in a way blind retry would fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("device enumeration failed: {0}")]
    Enumerate(String),
    #[error("device state change failed: {0}")]
    StateChange(String),
}

/// Trait abstracting device enumeration and enablement control.
///
/// No `Send`/`Sync` bounds: every call happens on the single UI event
/// thread.
#[cfg_attr(test, mockall::automock)]
pub trait DeviceGateway {
    /// Returns all present devices whose display name matches `pattern`
    /// (case-insensitive substring), each annotated with its current state.
    fn enumerate(&self, pattern: &str) -> Result<Vec<DeviceSnapshot>, GatewayError>;

    /// Synchronously requests a hardware enablement change.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::StateChange`] when the hardware rejects the
    /// request (permissions, device removed, driver error).  A failure must
    /// leave the device in its prior state as far as the caller can tell.
    fn set_enabled(&self, device: &DeviceHandle, enabled: bool) -> Result<(), GatewayError>;
}

/// Error type for startup device resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The filter matched nothing: the device is absent or renamed.
    #[error("no device matching \"{pattern}\" is present")]
    NoMatch { pattern: String },

    /// The filter matched more than one device; refusing to guess which one
    /// the user meant is a fatal startup condition.
    #[error("{count} devices match \"{pattern}\" ({names}); expected exactly one")]
    Ambiguous {
        pattern: String,
        count: usize,
        names: String,
    },

    /// Enumeration itself failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Resolves the single target device for `pattern`.
///
/// Exactly one match is required; zero or multiple matches is a fatal
/// startup condition surfaced to the user before any tray icon exists.
///
/// # Errors
///
/// [`ResolveError::NoMatch`] / [`ResolveError::Ambiguous`] on a bad match
/// count, [`ResolveError::Gateway`] when enumeration fails.
pub fn resolve_target(
    gateway: &dyn DeviceGateway,
    pattern: &str,
) -> Result<DeviceSnapshot, ResolveError> {
    let mut matches = gateway.enumerate(pattern)?;
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(ResolveError::NoMatch {
            pattern: pattern.to_string(),
        }),
        count => Err(ResolveError::Ambiguous {
            pattern: pattern.to_string(),
            count,
            names: matches
                .iter()
                .map(|d| d.display_name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
