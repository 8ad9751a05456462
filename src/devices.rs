// Device Registry for AK-series Keyboards
// Defines known devices and whether their clock protocol is implemented

use crate::error::SyncError;

/// Selectable keyboard models
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceModel {
    Ak74,
    Ak47,
}

impl DeviceModel {
    /// Look up the definition for this model
    pub fn definition(self) -> &'static DeviceDefinition {
        match self {
            DeviceModel::Ak74 => &AK74,
            DeviceModel::Ak47 => &AK47,
        }
    }
}

/// Device definition with identification and capability
#[derive(Debug, Clone, Copy)]
pub struct DeviceDefinition {
    pub vid: u16,
    pub pid: u16,
    /// HID interface number carrying the vendor feature reports
    pub interface: i32,
    pub name: &'static str,
    pub display_name: &'static str,
    /// Whether the clock sync protocol has been verified on this model
    pub supported: bool,
}

/// AK74 (our primary test device)
pub const AK74: DeviceDefinition = DeviceDefinition {
    vid: 0x0C45,
    pid: 0x800A,
    interface: 3,
    name: "ak74",
    display_name: "AK74",
    supported: true,
};

/// AK47 - PID and interface are unverified placeholders, so the sync
/// protocol is not sent to this model yet
pub const AK47: DeviceDefinition = DeviceDefinition {
    vid: 0x0C45,
    pid: 0x7403,
    interface: 3,
    name: "ak47",
    display_name: "AK47",
    supported: false,
};

/// Gate for the sync path: models whose protocol is unverified are
/// refused here, before any HID subsystem activity.
pub fn check_supported(def: &DeviceDefinition) -> Result<(), SyncError> {
    if def.supported {
        Ok(())
    } else {
        Err(SyncError::Unsupported(def.display_name))
    }
}
