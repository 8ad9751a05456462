//! Sync error types

use thiserror::Error;

use crate::session::SyncStep;

/// Errors that can occur during a sync session. All of them are terminal
/// for the process; there is no retry path.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HID subsystem init failed: {0}")]
    Init(String),

    #[error("no HID interface {interface} found for VID {vid:04X} PID {pid:04X}")]
    DeviceNotFound { vid: u16, pid: u16, interface: i32 },

    #[error("failed to open device: {0}")]
    Open(String),

    #[error("HID permission denied: {0}")]
    PermissionDenied(String),

    #[error("HID error: {0}")]
    Hid(String),

    #[error("{step} step failed")]
    Exchange {
        step: SyncStep,
        #[source]
        source: Box<SyncError>,
    },

    #[error("{0} is not supported yet")]
    Unsupported(&'static str),
}

impl From<hidapi::HidError> for SyncError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if msg.contains("Permission denied") || msg.contains("EPERM") {
            SyncError::PermissionDenied(msg)
        } else {
            SyncError::Hid(msg)
        }
    }
}
