//! HID transport: device locating and feature-report exchange

use std::thread;

use hidapi::{HidApi, HidDevice};
use tracing::debug;

use crate::devices::DeviceDefinition;
use crate::error::SyncError;
use crate::protocol::{self, PAYLOAD_SIZE, SETTLE_DELAY};

/// Low-level feature report operations.
///
/// The settle wait sits on this trait so the exchanger's write/settle/read
/// ordering is observable in tests without sleeping for real.
pub trait FeatureIo {
    fn send_report(&mut self, data: &[u8]) -> Result<(), SyncError>;
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, SyncError>;

    /// Wait out the device settling interval between a write and the
    /// paired sync read
    fn settle(&mut self) {
        thread::sleep(SETTLE_DELAY);
    }
}

impl FeatureIo for HidDevice {
    fn send_report(&mut self, data: &[u8]) -> Result<(), SyncError> {
        self.send_feature_report(data)?;
        Ok(())
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, SyncError> {
        let n = self.get_feature_report(buf)?;
        Ok(n)
    }
}

/// One set/settle/get round trip per packet, no retries
pub struct ReportExchanger<T: FeatureIo> {
    io: T,
}

impl<T: FeatureIo> ReportExchanger<T> {
    pub fn new(io: T) -> Self {
        Self { io }
    }

    /// Consume the exchanger and give back the underlying transport
    pub fn into_inner(self) -> T {
        self.io
    }

    /// Send one payload and read the sync response.
    ///
    /// The read reuses the frame buffer and only synchronizes with
    /// device-side state; its contents are discarded. Either operation
    /// failing fails the call immediately.
    pub fn exchange(&mut self, payload: &[u8; PAYLOAD_SIZE]) -> Result<(), SyncError> {
        let mut frame = protocol::frame(payload);
        debug!("sending feature report: {:02X?}", &frame[..16]);
        self.io.send_report(&frame)?;
        self.io.settle();
        self.io.read_report(&mut frame)?;
        Ok(())
    }
}

/// Locate and open the vendor interface for a device definition.
///
/// Enumerates by VID/PID and takes the first entry on the definition's
/// interface number; the device path is only used to open the handle.
pub fn open_device(api: &HidApi, def: &DeviceDefinition) -> Result<HidDevice, SyncError> {
    let info = api
        .device_list()
        .find(|d| {
            d.vendor_id() == def.vid
                && d.product_id() == def.pid
                && d.interface_number() == def.interface
        })
        .ok_or(SyncError::DeviceNotFound {
            vid: def.vid,
            pid: def.pid,
            interface: def.interface,
        })?;

    debug!(
        "found {} at {}",
        def.display_name,
        info.path().to_string_lossy()
    );

    info.open_device(api)
        .map_err(|e| SyncError::Open(e.to_string()))
}
