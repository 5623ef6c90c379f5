//! Transport layer for Komplete Kontrol Light Guide communication
//!
//! The Light Guide is driven by plain HID output reports: a one-byte mode
//! switch (`0xA0`) followed by full color frames. This crate provides the
//! open/write/close contract for that traffic:
//!
//! - HID (direct USB connection via hidapi)
//! - Printer middleware (hex dump of every report, for `--monitor`)
//! - Recording transport (captures reports in memory, used by tests)

pub mod device_registry;
pub mod error;
pub mod printer;
pub mod protocol;
pub mod recording;
pub mod types;

mod discovery;
mod hid_wired;

pub use device_registry::{is_light_guide_pid, product_name, KNOWN_PRODUCTS, VENDOR_ID};
pub use discovery::HidDiscovery;
pub use error::TransportError;
pub use hid_wired::HidLightGuideTransport;
pub use printer::{PacketFilter, PrinterConfig, PrinterTransport};
pub use recording::RecordingTransport;
pub use types::{DiscoveredDevice, TransportDeviceInfo};

use std::sync::Arc;

/// The core transport trait - all backends implement this
///
/// One call to [`Transport::send_report`] writes exactly one HID report.
/// Failures are surfaced to the caller; no backend retries on its own.
pub trait Transport: Send + Sync {
    /// Write one HID report
    ///
    /// # Arguments
    /// * `data` - Report bytes; byte 0 is the report/frame header
    fn send_report(&self, data: &[u8]) -> Result<(), TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Check if transport is still open
    fn is_connected(&self) -> bool;

    /// Close the transport. Further writes fail with [`TransportError::Closed`].
    fn close(&self) -> Result<(), TransportError>;
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn Transport>;

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send_report(&self, data: &[u8]) -> Result<(), TransportError> {
        (**self).send_report(data)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        (**self).device_info()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn close(&self) -> Result<(), TransportError> {
        (**self).close()
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send_report(&self, data: &[u8]) -> Result<(), TransportError> {
        (**self).send_report(data)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        (**self).device_info()
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }

    fn close(&self) -> Result<(), TransportError> {
        (**self).close()
    }
}
