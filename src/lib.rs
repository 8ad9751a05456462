//! Clock synchronization for AK-series USB HID keyboards.
//!
//! The on-board display clock of these boards is set through a short
//! sequence of vendor feature reports on the vendor HID interface: two init
//! packets, a packed timestamp, and a commit packet. This crate implements
//! that sequence; the `ak-clock-sync` binary is a thin CLI on top.

pub mod devices;
pub mod error;
pub mod hid;
pub mod protocol;
pub mod session;

pub use error::SyncError;
