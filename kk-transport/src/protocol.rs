//! Protocol constants for the Light Guide HID reports

/// One-byte command that switches the keyboard into Light Guide receive mode.
/// Must be sent once after opening, before any color frame.
pub const LIGHT_GUIDE_MODE: u8 = 0xA0;

/// Frame header for second-generation (MK2) keyboards: 1 palette byte per key
pub const HEADER_MK2: u8 = 0x81;

/// Frame header for first-generation (MK1) keyboards: 3 RGB bytes per key
pub const HEADER_MK1: u8 = 0x82;

/// Short name for a report, keyed on its first byte
pub fn report_name(header: u8) -> &'static str {
    match header {
        LIGHT_GUIDE_MODE => "LIGHT_GUIDE_MODE",
        HEADER_MK2 => "FRAME_MK2",
        HEADER_MK1 => "FRAME_MK1",
        _ => "UNKNOWN",
    }
}

/// Whether a report is a color frame (as opposed to a command)
pub fn is_frame(data: &[u8]) -> bool {
    matches!(data.first(), Some(&HEADER_MK1) | Some(&HEADER_MK2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_names() {
        assert_eq!(report_name(0xA0), "LIGHT_GUIDE_MODE");
        assert_eq!(report_name(0x81), "FRAME_MK2");
        assert_eq!(report_name(0x82), "FRAME_MK1");
        assert_eq!(report_name(0x00), "UNKNOWN");
    }

    #[test]
    fn test_is_frame() {
        assert!(is_frame(&[HEADER_MK1, 0, 0, 0]));
        assert!(is_frame(&[HEADER_MK2, 0]));
        assert!(!is_frame(&[LIGHT_GUIDE_MODE]));
        assert!(!is_frame(&[]));
    }
}
