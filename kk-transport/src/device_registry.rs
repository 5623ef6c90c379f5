//! Device registry - Native Instruments product IDs
//!
//! Identity only. Frame layout per model lives in `kk-lightguide`'s profile table.

/// Native Instruments vendor ID
pub const VENDOR_ID: u16 = 0x17CC;

pub const PID_S61_MK2: u16 = 0x1620;
pub const PID_S88_MK2: u16 = 0x1630;
pub const PID_S49_MK2: u16 = 0x1610;
pub const PID_S61_MK1: u16 = 0x1360;
pub const PID_S88_MK1: u16 = 0x1410;
pub const PID_S49_MK1: u16 = 0x1350;
pub const PID_S25_MK1: u16 = 0x1340;

/// Known Komplete Kontrol keyboards with a Light Guide
pub const KNOWN_PRODUCTS: &[(u16, &str)] = &[
    (PID_S61_MK2, "Komplete Kontrol S61 MK2"),
    (PID_S88_MK2, "Komplete Kontrol S88 MK2"),
    (PID_S49_MK2, "Komplete Kontrol S49 MK2"),
    (PID_S61_MK1, "Komplete Kontrol S61 MK1"),
    (PID_S88_MK1, "Komplete Kontrol S88 MK1"),
    (PID_S49_MK1, "Komplete Kontrol S49 MK1"),
    (PID_S25_MK1, "Komplete Kontrol S25 MK1"),
];

/// Check if PID is a Light Guide keyboard
#[inline]
pub fn is_light_guide_pid(pid: u16) -> bool {
    KNOWN_PRODUCTS.iter().any(|&(p, _)| p == pid)
}

/// Product name for a known PID
pub fn product_name(pid: u16) -> Option<&'static str> {
    KNOWN_PRODUCTS
        .iter()
        .find(|&&(p, _)| p == pid)
        .map(|&(_, name)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pids() {
        assert!(is_light_guide_pid(0x1620));
        assert!(is_light_guide_pid(0x1340));
        assert_eq!(KNOWN_PRODUCTS.len(), 7);
    }

    #[test]
    fn test_unknown_pids() {
        assert!(!is_light_guide_pid(0x0000));
        assert!(!is_light_guide_pid(0x1500)); // not a keyboard
        assert!(product_name(0x0000).is_none());
    }

    #[test]
    fn test_product_name() {
        assert_eq!(product_name(PID_S88_MK2), Some("Komplete Kontrol S88 MK2"));
    }
}
