//! The Light Guide frame buffer

use std::ops::Range;

use crate::profile::{ColorEncoding, DeviceProfile};

/// One Light Guide frame: header byte followed by every key's color
///
/// The length is fixed at construction and byte 0 always holds the profile's
/// header. Writes that would fall outside the frame are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightBuffer {
    frame: Vec<u8>,
    bytes_per_key: usize,
    encoding: ColorEncoding,
}

impl LightBuffer {
    /// Zeroed frame for a profile
    pub fn new(profile: &DeviceProfile) -> Self {
        let mut frame = vec![0u8; profile.frame_len()];
        frame[0] = profile.header();
        Self {
            frame,
            bytes_per_key: profile.bytes_per_key(),
            encoding: profile.encoding(),
        }
    }

    /// Turn every key off (header untouched)
    pub fn clear(&mut self) {
        self.frame[1..].fill(0);
    }

    /// Write one key's color bytes
    ///
    /// Negative keys and writes that would run past the end of the frame are
    /// silently dropped. Returns whether the frame was written.
    pub fn write_color(&mut self, key_index: i32, bytes: &[u8]) -> bool {
        let Ok(key) = usize::try_from(key_index) else {
            return false;
        };
        let offset = 1 + key * self.bytes_per_key;
        let Some(slot) = self.frame.get_mut(offset..offset + bytes.len()) else {
            return false;
        };
        slot.copy_from_slice(bytes);
        true
    }

    /// Write the same color to a run of keys
    pub fn fill_keys(&mut self, keys: Range<usize>, bytes: &[u8]) {
        for key in keys {
            let Ok(key) = i32::try_from(key) else { break };
            if !self.write_color(key, bytes) {
                break;
            }
        }
    }

    /// Current frame, ready to send
    pub fn snapshot(&self) -> &[u8] {
        &self.frame
    }

    pub fn header(&self) -> u8 {
        self.frame[0]
    }

    pub fn encoding(&self) -> ColorEncoding {
        self.encoding
    }

    pub fn bytes_per_key(&self) -> usize {
        self.bytes_per_key
    }

    pub fn key_count(&self) -> usize {
        (self.frame.len() - 1) / self.bytes_per_key
    }

    /// Color bytes currently held for a key
    pub fn key(&self, key: usize) -> Option<&[u8]> {
        let offset = 1 + key * self.bytes_per_key;
        self.frame.get(offset..offset + self.bytes_per_key)
    }

    /// Whether every key is off
    pub fn is_dark(&self) -> bool {
        self.frame[1..].iter().all(|&b| b == 0)
    }
}
