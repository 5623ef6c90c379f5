//! Keyboard models and their Light Guide frame layout
//!
//! The table is closed: seven physical models, three second-generation (MK2,
//! palette-indexed) and four first-generation (MK1, direct RGB). Profiles are
//! never built at runtime; [`select_profile`] and [`KeyboardModel::profile`]
//! only look them up.

use std::fmt;
use std::str::FromStr;

use kk_transport::device_registry as ids;
use kk_transport::protocol::{HEADER_MK1, HEADER_MK2};

use crate::color::EncodedColor;
use crate::error::LightGuideError;

/// Hardware generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generation {
    /// First generation: 3 bytes of 7-bit RGB per key
    Mk1,
    /// Second generation: 1 palette index byte per key
    Mk2,
}

impl Generation {
    /// Frame header byte
    pub const fn header(self) -> u8 {
        match self {
            Self::Mk1 => HEADER_MK1,
            Self::Mk2 => HEADER_MK2,
        }
    }

    /// On-wire color encoding
    pub const fn encoding(self) -> ColorEncoding {
        match self {
            Self::Mk1 => ColorEncoding::Rgb7,
            Self::Mk2 => ColorEncoding::Palette,
        }
    }
}

/// On-wire color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorEncoding {
    /// R, G, B each halved into 7 bits
    Rgb7,
    /// Index into the keyboard's built-in palette
    Palette,
}

impl ColorEncoding {
    /// Bytes each key occupies in a frame
    pub const fn bytes_per_key(self) -> usize {
        match self {
            Self::Rgb7 => 3,
            Self::Palette => 1,
        }
    }

    /// The all-zero color for this encoding
    pub const fn off_color(self) -> EncodedColor {
        match self {
            Self::Rgb7 => EncodedColor::Rgb([0, 0, 0]),
            Self::Palette => EncodedColor::Palette(0),
        }
    }
}

/// Supported keyboard models, in selector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum KeyboardModel {
    S61Mk2 = 0,
    S88Mk2 = 1,
    S49Mk2 = 2,
    #[default]
    S61Mk1 = 3,
    S88Mk1 = 4,
    S49Mk1 = 5,
    S25Mk1 = 6,
}

impl KeyboardModel {
    /// All models in selector order
    pub const ALL: [KeyboardModel; 7] = [
        Self::S61Mk2,
        Self::S88Mk2,
        Self::S49Mk2,
        Self::S61Mk1,
        Self::S88Mk1,
        Self::S49Mk1,
        Self::S25Mk1,
    ];

    /// Selector index (0-6)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get model from selector index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Short identifier used on the command line (e.g. `s61-mk2`)
    pub fn name(self) -> &'static str {
        match self {
            Self::S61Mk2 => "s61-mk2",
            Self::S88Mk2 => "s88-mk2",
            Self::S49Mk2 => "s49-mk2",
            Self::S61Mk1 => "s61-mk1",
            Self::S88Mk1 => "s88-mk1",
            Self::S49Mk1 => "s49-mk1",
            Self::S25Mk1 => "s25-mk1",
        }
    }

    /// Product name
    pub fn display_name(self) -> &'static str {
        match self {
            Self::S61Mk2 => "Komplete Kontrol S61 MK2",
            Self::S88Mk2 => "Komplete Kontrol S88 MK2",
            Self::S49Mk2 => "Komplete Kontrol S49 MK2",
            Self::S61Mk1 => "Komplete Kontrol S61 MK1",
            Self::S88Mk1 => "Komplete Kontrol S88 MK1",
            Self::S49Mk1 => "Komplete Kontrol S49 MK1",
            Self::S25Mk1 => "Komplete Kontrol S25 MK1",
        }
    }

    /// Frame layout for this model
    pub fn profile(self) -> &'static DeviceProfile {
        &PROFILES[self.index()]
    }
}

impl fmt::Display for KeyboardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for KeyboardModel {
    type Err = LightGuideError;

    /// Accepts a selector index (`3`) or a name (`s61-mk1`, `S61MK1`, `s61_mk1`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = s.trim().parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| LightGuideError::UnknownModel(s.into()));
        }
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|m| m.name().replace('-', "") == normalized)
            .ok_or_else(|| LightGuideError::UnknownModel(s.into()))
    }
}

/// Frame layout and identity of one keyboard model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub model: KeyboardModel,
    /// USB product ID (vendor is always Native Instruments)
    pub product_id: u16,
    /// Number of keys with a light
    pub key_count: usize,
    /// Added to a MIDI note number to get the zero-based key index
    pub note_offset: i32,
    pub generation: Generation,
}

impl DeviceProfile {
    /// Frame header byte
    pub fn header(&self) -> u8 {
        self.generation.header()
    }

    /// On-wire color encoding
    pub fn encoding(&self) -> ColorEncoding {
        self.generation.encoding()
    }

    /// Bytes per key slot (3 for RGB, 1 for palette)
    pub fn bytes_per_key(&self) -> usize {
        self.encoding().bytes_per_key()
    }

    /// Total frame length including the header byte
    pub fn frame_len(&self) -> usize {
        self.key_count * self.bytes_per_key() + 1
    }

    /// Encoded "light off" color
    pub fn off_color(&self) -> EncodedColor {
        self.encoding().off_color()
    }

    /// USB vendor ID
    pub fn vendor_id(&self) -> u16 {
        ids::VENDOR_ID
    }

    /// Lowest and highest MIDI note that land on a key
    pub fn note_range(&self) -> (i32, i32) {
        let low = -self.note_offset;
        (low, low + self.key_count as i32 - 1)
    }
}

/// Profile table, indexed by [`KeyboardModel`] selector
pub const PROFILES: [DeviceProfile; 7] = [
    DeviceProfile {
        model: KeyboardModel::S61Mk2,
        product_id: ids::PID_S61_MK2,
        key_count: 61,
        note_offset: -36,
        generation: Generation::Mk2,
    },
    DeviceProfile {
        model: KeyboardModel::S88Mk2,
        product_id: ids::PID_S88_MK2,
        key_count: 88,
        note_offset: -21,
        generation: Generation::Mk2,
    },
    DeviceProfile {
        model: KeyboardModel::S49Mk2,
        product_id: ids::PID_S49_MK2,
        key_count: 49,
        note_offset: -36,
        generation: Generation::Mk2,
    },
    DeviceProfile {
        model: KeyboardModel::S61Mk1,
        product_id: ids::PID_S61_MK1,
        key_count: 61,
        note_offset: -36,
        generation: Generation::Mk1,
    },
    DeviceProfile {
        model: KeyboardModel::S88Mk1,
        product_id: ids::PID_S88_MK1,
        key_count: 88,
        note_offset: -21,
        generation: Generation::Mk1,
    },
    DeviceProfile {
        model: KeyboardModel::S49Mk1,
        product_id: ids::PID_S49_MK1,
        key_count: 49,
        note_offset: -36,
        generation: Generation::Mk1,
    },
    DeviceProfile {
        model: KeyboardModel::S25Mk1,
        product_id: ids::PID_S25_MK1,
        key_count: 25,
        note_offset: -48,
        generation: Generation::Mk1,
    },
];

/// Look up a profile by selector index
pub fn select_profile(index: usize) -> Result<DeviceProfile, LightGuideError> {
    KeyboardModel::from_index(index)
        .map(|m| *m.profile())
        .ok_or_else(|| LightGuideError::UnknownModel(index.to_string()))
}
