//! Device discovery for Komplete Kontrol keyboards

use hidapi::HidApi;
use tracing::{debug, info};

use crate::device_registry;
use crate::error::TransportError;
use crate::hid_wired::HidLightGuideTransport;
use crate::types::{DiscoveredDevice, TransportDeviceInfo};

/// HID device discovery for Light Guide keyboards
pub struct HidDiscovery {
    api: HidApi,
}

impl HidDiscovery {
    /// Create a new HID discovery instance
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            api: HidApi::new()?,
        })
    }

    /// Re-scan the HID bus
    pub fn refresh(&mut self) -> Result<(), TransportError> {
        self.api.refresh_devices()?;
        Ok(())
    }

    /// Build transport info from a hidapi device entry
    fn device_info(device_info: &hidapi::DeviceInfo) -> TransportDeviceInfo {
        TransportDeviceInfo {
            vid: device_info.vendor_id(),
            pid: device_info.product_id(),
            device_path: device_info.path().to_string_lossy().into_owned(),
            serial: device_info.serial_number().map(str::to_string),
            product_name: device_info
                .product_string()
                .map(str::to_string)
                .or_else(|| {
                    device_registry::product_name(device_info.product_id()).map(str::to_string)
                }),
        }
    }

    /// List connected Light Guide keyboards
    ///
    /// Each keyboard exposes several HID interfaces; only the first entry per
    /// VID/PID is reported, matching what [`HidDiscovery::open`] picks.
    pub fn list_devices(&self) -> Vec<DiscoveredDevice> {
        let mut devices: Vec<DiscoveredDevice> = Vec::new();
        for device_info in self.api.device_list() {
            if device_info.vendor_id() != device_registry::VENDOR_ID
                || !device_registry::is_light_guide_pid(device_info.product_id())
            {
                continue;
            }
            if devices
                .iter()
                .any(|d| d.info.pid == device_info.product_id())
            {
                continue;
            }
            debug!(
                "Found {:04x}:{:04x} at {:?}",
                device_info.vendor_id(),
                device_info.product_id(),
                device_info.path()
            );
            devices.push(DiscoveredDevice {
                info: Self::device_info(device_info),
            });
        }
        devices
    }

    /// Open a keyboard by vendor/product ID
    pub fn open(&self, vid: u16, pid: u16) -> Result<HidLightGuideTransport, TransportError> {
        let info = self
            .api
            .device_list()
            .find(|d| d.vendor_id() == vid && d.product_id() == pid)
            .map(Self::device_info)
            .ok_or_else(|| {
                TransportError::DeviceNotFound(format!(
                    "{} ({vid:04x}:{pid:04x})",
                    device_registry::product_name(pid).unwrap_or("unknown device")
                ))
            })?;

        let device = self
            .api
            .open(vid, pid)
            .map_err(TransportError::from_open_error)?;

        info!("Opened {}", info.describe());
        Ok(HidLightGuideTransport::new(device, info))
    }
}
