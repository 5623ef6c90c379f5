//! Common types for transport layer

/// Device identification information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// Device path or identifier (transport-specific)
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

impl TransportDeviceInfo {
    /// Info for a device known only by its VID/PID
    pub fn from_ids(vid: u16, pid: u16) -> Self {
        Self {
            vid,
            pid,
            device_path: format!("{vid:04x}:{pid:04x}"),
            serial: None,
            product_name: crate::device_registry::product_name(pid).map(str::to_string),
        }
    }

    /// Human-readable one-line description
    pub fn describe(&self) -> String {
        format!(
            "{} ({:04x}:{:04x})",
            self.product_name.as_deref().unwrap_or("Unknown"),
            self.vid,
            self.pid
        )
    }
}

/// Discovered device that can be opened
#[derive(Debug, Clone)]
pub struct DiscoveredDevice {
    /// Device information
    pub info: TransportDeviceInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ids_known_product() {
        let info = TransportDeviceInfo::from_ids(0x17CC, 0x1360);
        assert_eq!(info.device_path, "17cc:1360");
        assert_eq!(info.describe(), "Komplete Kontrol S61 MK1 (17cc:1360)");
    }

    #[test]
    fn test_from_ids_unknown_product() {
        let info = TransportDeviceInfo::from_ids(0x1234, 0x5678);
        assert!(info.product_name.is_none());
        assert_eq!(info.describe(), "Unknown (1234:5678)");
    }
}
