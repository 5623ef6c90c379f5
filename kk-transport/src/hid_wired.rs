//! HID transport implementation for direct USB connection

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::TransportError;
use crate::protocol;
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// HID transport for a Komplete Kontrol keyboard
///
/// Writes Light Guide reports as plain HID output reports. The first byte of
/// every report doubles as the report ID (`0xA0`, `0x81` or `0x82`).
pub struct HidLightGuideTransport {
    /// Output interface, `None` once closed
    device: Mutex<Option<HidDevice>>,
    /// Device information
    info: TransportDeviceInfo,
}

impl HidLightGuideTransport {
    /// Create a new transport from an opened HID device
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            device: Mutex::new(Some(device)),
            info,
        }
    }
}

impl Transport for HidLightGuideTransport {
    fn send_report(&self, data: &[u8]) -> Result<(), TransportError> {
        let guard = self.device.lock();
        let device = guard.as_ref().ok_or(TransportError::Closed)?;

        debug!(
            "Writing {} ({} bytes): {:02X?}",
            protocol::report_name(data.first().copied().unwrap_or(0)),
            data.len(),
            &data[..data.len().min(8)]
        );

        let written = device
            .write(data)
            .map_err(|e| TransportError::Write(e.to_string()))?;
        if written < data.len() {
            return Err(TransportError::ShortWrite {
                expected: data.len(),
                actual: written,
            });
        }
        Ok(())
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn is_connected(&self) -> bool {
        self.device.lock().is_some()
    }

    fn close(&self) -> Result<(), TransportError> {
        // HidDevice closes its handle on drop
        if self.device.lock().take().is_some() {
            debug!("Closed {}", self.info.describe());
        }
        Ok(())
    }
}

impl Drop for HidLightGuideTransport {
    fn drop(&mut self) {
        if self.device.get_mut().is_some() {
            debug!("HidLightGuideTransport dropped while open, closing");
        }
    }
}
