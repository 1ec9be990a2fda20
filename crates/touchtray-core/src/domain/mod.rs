//! Domain types shared by the state machine and the gateway contract.
//!
//! Pure data with no OS dependencies.  The single rule encoded here is that
//! [`device::DisplayState`] represents a *confirmed* hardware state: it is
//! only ever derived from a gateway report, never assumed.

pub mod device;
