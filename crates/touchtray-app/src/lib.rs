//! TouchTray host application.
//!
//! The binary wires `touchtray-core` to the operating system: the SetupAPI
//! device gateway, the status-area icon, the single-instance mutex, modal
//! error dialogs, configuration on disk, and the event loop that pumps tray
//! gestures through the controller.
//!
//! Everything OS-facing lives under [`infrastructure`]; the decision logic
//! itself stays in `touchtray-core` where it is unit-tested against scripted
//! collaborators.

pub mod infrastructure;
