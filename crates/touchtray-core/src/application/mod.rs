//! Application layer: the tray presentation state machine.
//!
//! The single use case here orchestrates the domain types against the
//! injected device gateway, tray presenter, and alerter abstractions. It
//! contains no OS calls of its own, so every transition is unit-testable
//! with scripted collaborators.

pub mod tray_controller;
