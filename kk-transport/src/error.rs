//! Transport error types

use thiserror::Error;

/// Errors that can occur during transport operations
#[derive(Error, Debug)]
pub enum TransportError {
    // Open errors
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to open device: {0}")]
    Open(String),

    #[error("HID permission denied: {0}")]
    HidPermissionDenied(String),

    // Write errors
    #[error("Failed to write report: {0}")]
    Write(String),

    #[error("Short write: expected {expected} bytes, wrote {actual}")]
    ShortWrite { expected: usize, actual: usize },

    #[error("Transport is closed")]
    Closed,

    // Generic
    #[error("HID error: {0}")]
    HidError(String),
}

impl TransportError {
    /// Classify a failed `open()` as either a permission problem or a plain open error
    pub fn from_open_error(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if is_permission_message(&msg) {
            TransportError::HidPermissionDenied(msg)
        } else {
            TransportError::Open(msg)
        }
    }

    /// Whether this error ends the connection attempt while opening the device
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            Self::DeviceNotFound(_) | Self::Open(_) | Self::HidPermissionDenied(_)
        )
    }
}

fn is_permission_message(msg: &str) -> bool {
    msg.contains("Permission denied") || msg.contains("EPERM") || msg.contains("EACCES")
}

impl From<hidapi::HidError> for TransportError {
    fn from(e: hidapi::HidError) -> Self {
        let msg = e.to_string();
        if is_permission_message(&msg) {
            TransportError::HidPermissionDenied(msg)
        } else {
            TransportError::HidError(msg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_errors() {
        assert!(TransportError::DeviceNotFound("x".into()).is_open_error());
        assert!(TransportError::Open("x".into()).is_open_error());
        assert!(TransportError::HidPermissionDenied("x".into()).is_open_error());
        assert!(!TransportError::Write("x".into()).is_open_error());
        assert!(!TransportError::Closed.is_open_error());
    }

    #[test]
    fn test_permission_detection() {
        assert!(is_permission_message("open failed: Permission denied"));
        assert!(is_permission_message("hidraw: EACCES"));
        assert!(!is_permission_message("No such device"));
    }
}
