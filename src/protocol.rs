// AK-series Clock Protocol Definitions
// Packet layouts captured from the vendor Windows utility

use std::fmt;
use std::time::Duration;

use chrono::{Datelike, Local, Timelike};

/// Feature report size on the wire (report ID + payload)
pub const REPORT_SIZE: usize = 65;
/// Payload size (report body without the report ID)
pub const PAYLOAD_SIZE: usize = 64;
/// Report ID used for all clock packets
pub const REPORT_ID: u8 = 0x00;

/// Settling time between a feature-report write and the paired sync read.
/// The controller needs this long to latch the write before it services a
/// Get_Report; shorter waits cause spurious read failures.
pub const SETTLE_DELAY: Duration = Duration::from_millis(50);

/// Command opcodes (payload byte 0 / byte 1)
pub mod cmd {
    /// Control packet class (init and commit packets)
    pub const CONTROL: u8 = 0x04;
    /// Handshake sub-command (first init packet)
    pub const HANDSHAKE: u8 = 0x18;
    /// Clock-set mode sub-command (second init packet)
    pub const CLOCK_MODE: u8 = 0x28;
    /// Commit sub-command, applies the previously sent time
    pub const APPLY: u8 = 0x02;

    /// Time packet tag (payload bytes 1-2)
    pub const TIME_TAG: u8 = 0x01;
    pub const TIME_SUBTAG: u8 = 0x5A;
    /// Trailing sentinel of the time packet (payload bytes 62-63)
    pub const TIME_SENTINEL: [u8; 2] = [0xAA, 0x55];
}

/// Wall-clock fields as the device wants them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl ClockTime {
    /// Capture the current local time
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            year: now.year() as u16,
            month: now.month() as u8,
            day: now.day() as u8,
            hour: now.hour() as u8,
            minute: now.minute() as u8,
            second: now.second() as u8,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Wrap a payload into the 65-byte transport frame (report ID + body)
pub fn frame(payload: &[u8; PAYLOAD_SIZE]) -> [u8; REPORT_SIZE] {
    let mut buf = [0u8; REPORT_SIZE];
    buf[0] = REPORT_ID;
    buf[1..].copy_from_slice(payload);
    buf
}

/// First init packet
pub fn init1_payload() -> [u8; PAYLOAD_SIZE] {
    let mut buf = [0u8; PAYLOAD_SIZE];
    buf[0] = cmd::CONTROL;
    buf[1] = cmd::HANDSHAKE;
    buf
}

/// Second init packet, puts the controller into clock-set mode
pub fn init2_payload() -> [u8; PAYLOAD_SIZE] {
    let mut buf = [0u8; PAYLOAD_SIZE];
    buf[0] = cmd::CONTROL;
    buf[1] = cmd::CLOCK_MODE;
    buf[8] = 0x01;
    buf
}

/// Time packet: the timestamp packed at fixed offsets
pub fn time_payload(t: &ClockTime) -> [u8; PAYLOAD_SIZE] {
    let mut buf = [0u8; PAYLOAD_SIZE];
    buf[1] = cmd::TIME_TAG;
    buf[2] = cmd::TIME_SUBTAG;
    buf[3] = (t.year % 100) as u8;
    buf[4] = t.month;
    buf[5] = t.day;
    buf[6] = t.hour;
    buf[7] = t.minute;
    buf[8] = t.second;
    buf[10] = 0x21;
    buf[11] = 0x01;
    buf[13] = cmd::CONTROL;
    buf[62] = cmd::TIME_SENTINEL[0];
    buf[63] = cmd::TIME_SENTINEL[1];
    buf
}

/// Commit packet, applies the previously sent time
pub fn apply_payload() -> [u8; PAYLOAD_SIZE] {
    let mut buf = [0u8; PAYLOAD_SIZE];
    buf[0] = cmd::CONTROL;
    buf[1] = cmd::APPLY;
    buf
}
