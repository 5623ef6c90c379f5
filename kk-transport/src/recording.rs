//! In-memory transport that records every report
//!
//! Stands in for a keyboard in tests and dry runs. Can be told to start
//! failing after a number of writes to exercise error paths.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::{device_registry, Transport, TransportDeviceInfo, TransportError};

/// Transport that stores reports instead of writing them to hardware
pub struct RecordingTransport {
    info: TransportDeviceInfo,
    reports: Mutex<Vec<Vec<u8>>>,
    /// Number of writes that succeed before every write fails
    fail_after: Option<usize>,
    closed: AtomicBool,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    /// Create a recorder posing as an S61 MK1
    pub fn new() -> Self {
        Self::with_info(TransportDeviceInfo::from_ids(
            device_registry::VENDOR_ID,
            device_registry::PID_S61_MK1,
        ))
    }

    /// Create a recorder with custom device info
    pub fn with_info(info: TransportDeviceInfo) -> Self {
        Self {
            info,
            reports: Mutex::new(Vec::new()),
            fail_after: None,
            closed: AtomicBool::new(false),
        }
    }

    /// Make every write after the first `count` fail with [`TransportError::Write`]
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// All reports written so far
    pub fn reports(&self) -> Vec<Vec<u8>> {
        self.reports.lock().clone()
    }

    /// Number of reports written so far
    pub fn report_count(&self) -> usize {
        self.reports.lock().len()
    }

    /// Most recent report
    pub fn last_report(&self) -> Option<Vec<u8>> {
        self.reports.lock().last().cloned()
    }
}

impl Transport for RecordingTransport {
    fn send_report(&self, data: &[u8]) -> Result<(), TransportError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        let mut reports = self.reports.lock();
        if self.fail_after.is_some_and(|limit| reports.len() >= limit) {
            return Err(TransportError::Write("simulated write failure".into()));
        }
        reports.push(data.to_vec());
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn is_connected(&self) -> bool {
        !self.closed.load(Ordering::SeqCst)
    }

    fn close(&self) -> Result<(), TransportError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
