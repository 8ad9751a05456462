//! The four-step clock sync session.
//!
//! `Init1 -> Init2 -> TimeSync -> Apply`, strictly ordered. Each step runs
//! only if every prior step succeeded; the first failing exchange aborts the
//! rest of the sequence. There is no rollback - the device stays in whatever
//! state the last successful step left it in.

use std::fmt;

use tracing::debug;

use crate::error::SyncError;
use crate::hid::{FeatureIo, ReportExchanger};
use crate::protocol::{self, ClockTime, PAYLOAD_SIZE};

/// Protocol steps, in wire order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Init1,
    Init2,
    TimeSync,
    Apply,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStep::Init1 => "init-1",
            SyncStep::Init2 => "init-2",
            SyncStep::TimeSync => "time-sync",
            SyncStep::Apply => "apply",
        };
        f.write_str(name)
    }
}

/// Run the full sync sequence against an opened exchanger.
///
/// Returns the timestamp that was sent to the device.
pub fn run<T: FeatureIo>(ex: &mut ReportExchanger<T>) -> Result<ClockTime, SyncError> {
    run_with_clock(ex, ClockTime::now)
}

/// Same as [`run`] but with the wall-clock capture injectable.
///
/// The timestamp is sampled at the TimeSync step, not at session start, and
/// the returned value is exactly what went over the wire.
pub fn run_with_clock<T, C>(ex: &mut ReportExchanger<T>, clock: C) -> Result<ClockTime, SyncError>
where
    T: FeatureIo,
    C: FnOnce() -> ClockTime,
{
    step(ex, SyncStep::Init1, &protocol::init1_payload())?;
    step(ex, SyncStep::Init2, &protocol::init2_payload())?;

    let now = clock();
    debug!("setting device clock to {now}");
    step(ex, SyncStep::TimeSync, &protocol::time_payload(&now))?;
    step(ex, SyncStep::Apply, &protocol::apply_payload())?;

    Ok(now)
}

fn step<T: FeatureIo>(
    ex: &mut ReportExchanger<T>,
    step: SyncStep,
    payload: &[u8; PAYLOAD_SIZE],
) -> Result<(), SyncError> {
    debug!("running {step} step");
    ex.exchange(payload).map_err(|e| SyncError::Exchange {
        step,
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::REPORT_SIZE;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Op {
        Send,
        Settle,
        Get,
    }

    /// Records every transport operation; can be told to fail the n-th
    /// send or the n-th get (zero-based).
    #[derive(Default)]
    struct MockIo {
        ops: Vec<Op>,
        frames: Vec<Vec<u8>>,
        fail_send_at: Option<usize>,
        fail_get_at: Option<usize>,
        sends: usize,
        gets: usize,
    }

    impl FeatureIo for MockIo {
        fn send_report(&mut self, data: &[u8]) -> Result<(), SyncError> {
            self.ops.push(Op::Send);
            self.frames.push(data.to_vec());
            let idx = self.sends;
            self.sends += 1;
            if self.fail_send_at == Some(idx) {
                return Err(SyncError::Hid("send failed".into()));
            }
            Ok(())
        }

        fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, SyncError> {
            self.ops.push(Op::Get);
            let idx = self.gets;
            self.gets += 1;
            if self.fail_get_at == Some(idx) {
                return Err(SyncError::Hid("get failed".into()));
            }
            Ok(buf.len())
        }

        fn settle(&mut self) {
            self.ops.push(Op::Settle);
        }
    }

    fn fixture_time() -> ClockTime {
        ClockTime {
            year: 2024,
            month: 3,
            day: 15,
            hour: 14,
            minute: 30,
            second: 45,
        }
    }

    fn run_mock(io: MockIo) -> (Result<ClockTime, SyncError>, MockIo) {
        let mut ex = ReportExchanger::new(io);
        let result = run_with_clock(&mut ex, fixture_time);
        (result, ex.into_inner())
    }

    #[test]
    fn test_happy_path_sends_four_frames() {
        let (result, io) = run_mock(MockIo::default());

        assert_eq!(result.unwrap(), fixture_time());
        assert_eq!(io.sends, 4);
        assert_eq!(io.gets, 4);

        for frame in &io.frames {
            assert_eq!(frame.len(), REPORT_SIZE);
            assert_eq!(frame[0], 0x00);
        }

        // Frame order matches the protocol sequence
        assert_eq!(&io.frames[0][1..3], &[0x04, 0x18]);
        assert_eq!(&io.frames[1][1..3], &[0x04, 0x28]);
        assert_eq!(&io.frames[2][2..4], &[0x01, 0x5A]);
        assert_eq!(&io.frames[3][1..3], &[0x04, 0x02]);
    }

    #[test]
    fn test_settle_between_send_and_get() {
        let (result, io) = run_mock(MockIo::default());
        assert!(result.is_ok());

        assert_eq!(io.ops.len(), 12);
        for window in io.ops.chunks(3) {
            assert_eq!(window, &[Op::Send, Op::Settle, Op::Get]);
        }
    }

    #[test]
    fn test_time_frame_echoes_injected_clock() {
        let (result, io) = run_mock(MockIo::default());
        let synced = result.unwrap();

        // Frame bytes are offset by one for the report ID
        let time_frame = &io.frames[2];
        assert_eq!(time_frame[4], (synced.year % 100) as u8);
        assert_eq!(time_frame[5], synced.month);
        assert_eq!(time_frame[6], synced.day);
        assert_eq!(time_frame[7], synced.hour);
        assert_eq!(time_frame[8], synced.minute);
        assert_eq!(time_frame[9], synced.second);
        assert_eq!(time_frame[63], 0xAA);
        assert_eq!(time_frame[64], 0x55);
    }

    #[test]
    fn test_send_failure_short_circuits() {
        // Fail the second send (Init2)
        let io = MockIo {
            fail_send_at: Some(1),
            ..Default::default()
        };
        let (result, io) = run_mock(io);

        match result.unwrap_err() {
            SyncError::Exchange { step, .. } => assert_eq!(step, SyncStep::Init2),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(io.sends, 2);
        // No settle or get after the failed send, no later frames built
        assert_eq!(io.ops.last(), Some(&Op::Send));
        assert_eq!(io.gets, 1);
        assert_eq!(io.frames.len(), 2);
    }

    #[test]
    fn test_get_failure_short_circuits() {
        // Fail the third get (TimeSync)
        let io = MockIo {
            fail_get_at: Some(2),
            ..Default::default()
        };
        let (result, io) = run_mock(io);

        match result.unwrap_err() {
            SyncError::Exchange { step, .. } => assert_eq!(step, SyncStep::TimeSync),
            other => panic!("unexpected error: {other}"),
        }
        // Apply was never attempted
        assert_eq!(io.sends, 3);
        assert_eq!(io.gets, 3);
        assert_eq!(io.frames.len(), 3);
    }

    #[test]
    fn test_first_step_failure_sends_nothing_else() {
        let io = MockIo {
            fail_send_at: Some(0),
            ..Default::default()
        };
        let (result, io) = run_mock(io);

        match result.unwrap_err() {
            SyncError::Exchange { step, .. } => assert_eq!(step, SyncStep::Init1),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(io.sends, 1);
        assert_eq!(io.gets, 0);
    }
}
