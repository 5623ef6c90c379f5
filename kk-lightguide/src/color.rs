//! Color types and the two on-wire encodings
//!
//! Colors are authored as 24-bit RGB (`#rrggbb`). MK1 keyboards take them
//! as 7-bit RGB triplets; MK2 keyboards take a single palette index, found by
//! nearest-color search over a user-supplied [`PaletteMap`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LightGuideError;
use crate::palette::{PaletteMap, BUILTIN_PALETTE, DEFAULT_PALETTE_INDEX};
use crate::profile::{ColorEncoding, DeviceProfile};

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black (light off)
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Red
    pub const RED: Self = Self::new(255, 0, 0);
    /// Green
    pub const GREEN: Self = Self::new(0, 255, 0);
    /// Blue
    pub const BLUE: Self = Self::new(0, 0, 255);

    /// Luminance-weighted distance to another color, on full 8-bit channels
    pub fn weighted_distance(&self, other: &Rgb) -> f64 {
        let dr = (self.r as i32 - other.r as i32).abs() as f64;
        let dg = (self.g as i32 - other.g as i32).abs() as f64;
        let db = (self.b as i32 - other.b as i32).abs() as f64;
        dr * 0.299 + dg * 0.587 + db * 0.114
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = LightGuideError;

    /// Parse `#rrggbb` (hex digits in either case)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LightGuideError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A color in a keyboard's native frame representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodedColor {
    /// 7-bit R, G, B
    Rgb([u8; 3]),
    /// Palette index
    Palette(u8),
}

impl EncodedColor {
    /// Bytes as written into a frame slot
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Rgb(rgb) => rgb,
            Self::Palette(index) => std::slice::from_ref(index),
        }
    }

    /// Number of bytes (1 or 3)
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Always false; present for symmetry with `len`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether every byte is zero
    pub fn is_off(&self) -> bool {
        self.as_bytes().iter().all(|&b| b == 0)
    }
}

impl fmt::Display for EncodedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb([r, g, b]) => write!(f, "rgb7({r:02x},{g:02x},{b:02x})"),
            Self::Palette(index) => write!(f, "palette(0x{index:02x})"),
        }
    }
}

/// Scale each channel into the 7 bits the device accepts (top bit is reserved)
pub fn encode_rgb(color: Rgb) -> [u8; 3] {
    [color.r / 2, color.g / 2, color.b / 2]
}

/// Nearest palette index for a color, or [`DEFAULT_PALETTE_INDEX`] for an empty palette
pub fn encode_palette(color: Rgb, palette: &PaletteMap) -> u8 {
    palette.nearest(color).unwrap_or(DEFAULT_PALETTE_INDEX)
}

/// Encode one color for a profile
///
/// Palette profiles without a palette map cannot search, so a lone color
/// falls back to [`DEFAULT_PALETTE_INDEX`]. Use [`encode_all`] for slot lists,
/// which applies the per-slot built-in defaults instead.
pub fn encode_color(profile: &DeviceProfile, color: Rgb, palette: Option<&PaletteMap>) -> EncodedColor {
    match profile.encoding() {
        ColorEncoding::Rgb7 => EncodedColor::Rgb(encode_rgb(color)),
        ColorEncoding::Palette => EncodedColor::Palette(
            palette.map_or(DEFAULT_PALETTE_INDEX, |p| encode_palette(color, p)),
        ),
    }
}

/// Number of color slots (default + 10 fingers + 2 hands)
pub const SLOT_COUNT: usize = 13;

/// Logical color slots; the slot number is the MIDI channel that selects it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColorSlot {
    Default = 0,
    LeftThumb = 1,
    LeftIndex = 2,
    LeftMiddle = 3,
    LeftRing = 4,
    LeftPinky = 5,
    RightThumb = 6,
    RightIndex = 7,
    RightMiddle = 8,
    RightRing = 9,
    RightPinky = 10,
    LeftHand = 11,
    RightHand = 12,
}

impl ColorSlot {
    /// All slots in channel order
    pub const ALL: [ColorSlot; SLOT_COUNT] = [
        Self::Default,
        Self::LeftThumb,
        Self::LeftIndex,
        Self::LeftMiddle,
        Self::LeftRing,
        Self::LeftPinky,
        Self::RightThumb,
        Self::RightIndex,
        Self::RightMiddle,
        Self::RightRing,
        Self::RightPinky,
        Self::LeftHand,
        Self::RightHand,
    ];

    /// MIDI channel (0-12)
    pub fn channel(self) -> u8 {
        self as u8
    }

    /// Slot for a MIDI channel
    pub fn from_channel(channel: u8) -> Option<Self> {
        Self::ALL.get(channel as usize).copied()
    }

    /// Key name as used in preference files
    pub fn key(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::LeftThumb => "left_thumb",
            Self::LeftIndex => "left_index",
            Self::LeftMiddle => "left_middle",
            Self::LeftRing => "left_ring",
            Self::LeftPinky => "left_pinky",
            Self::RightThumb => "right_thumb",
            Self::RightIndex => "right_index",
            Self::RightMiddle => "right_middle",
            Self::RightRing => "right_ring",
            Self::RightPinky => "right_pinky",
            Self::LeftHand => "left_hand",
            Self::RightHand => "right_hand",
        }
    }
}

impl fmt::Display for ColorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ColorSlot {
    type Err = String;

    /// Accepts a slot key (`left_thumb`, `left-thumb`) or a channel number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(channel) = s.parse::<u8>() {
            return Self::from_channel(channel).ok_or_else(|| format!("No slot for channel {s}"));
        }
        let key = s.to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|slot| slot.key() == key)
            .ok_or_else(|| format!("Unknown color slot: {s}"))
    }
}

/// The 13 user-authored colors, addressed by [`ColorSlot`]
///
/// Serialized as a table of named `#rrggbb` strings; slots missing from the
/// input keep their default color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColorAssignmentsRepr", into = "ColorAssignmentsRepr")]
pub struct ColorAssignments {
    colors: [Rgb; SLOT_COUNT],
}

impl Default for ColorAssignments {
    fn default() -> Self {
        let hex = |s: u32| Rgb::new((s >> 16) as u8, (s >> 8) as u8, s as u8);
        Self {
            colors: [
                hex(0xff0000), // default
                hex(0x00ffff), // left thumb
                hex(0x0099ff), // left index
                hex(0x0000ff), // left middle
                hex(0x6600ff), // left ring
                hex(0xff00ff), // left pinky
                hex(0xff8000), // right thumb
                hex(0xffd900), // right index
                hex(0xb3ff00), // right middle
                hex(0x00ff00), // right ring
                hex(0x00ffbf), // right pinky
                hex(0x0000ff), // left hand
                hex(0x00ff00), // right hand
            ],
        }
    }
}

impl ColorAssignments {
    /// Build from colors in channel order
    pub fn from_array(colors: [Rgb; SLOT_COUNT]) -> Self {
        Self { colors }
    }

    /// Color for a slot
    pub fn get(&self, slot: ColorSlot) -> Rgb {
        self.colors[slot as usize]
    }

    /// Replace the color for a slot
    pub fn set(&mut self, slot: ColorSlot, color: Rgb) {
        self.colors[slot as usize] = color;
    }

    /// Iterate `(slot, color)` in channel order
    pub fn iter(&self) -> impl Iterator<Item = (ColorSlot, Rgb)> + '_ {
        ColorSlot::ALL.into_iter().zip(self.colors.iter().copied())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(default)]
struct ColorAssignmentsRepr {
    default: Rgb,
    left_thumb: Rgb,
    left_index: Rgb,
    left_middle: Rgb,
    left_ring: Rgb,
    left_pinky: Rgb,
    right_thumb: Rgb,
    right_index: Rgb,
    right_middle: Rgb,
    right_ring: Rgb,
    right_pinky: Rgb,
    left_hand: Rgb,
    right_hand: Rgb,
}

impl Default for ColorAssignmentsRepr {
    fn default() -> Self {
        ColorAssignments::default().into()
    }
}

impl From<ColorAssignments> for ColorAssignmentsRepr {
    fn from(a: ColorAssignments) -> Self {
        let [default, left_thumb, left_index, left_middle, left_ring, left_pinky, right_thumb, right_index, right_middle, right_ring, right_pinky, left_hand, right_hand] =
            a.colors;
        Self {
            default,
            left_thumb,
            left_index,
            left_middle,
            left_ring,
            left_pinky,
            right_thumb,
            right_index,
            right_middle,
            right_ring,
            right_pinky,
            left_hand,
            right_hand,
        }
    }
}

impl From<ColorAssignmentsRepr> for ColorAssignments {
    fn from(r: ColorAssignmentsRepr) -> Self {
        Self {
            colors: [
                r.default,
                r.left_thumb,
                r.left_index,
                r.left_middle,
                r.left_ring,
                r.left_pinky,
                r.right_thumb,
                r.right_index,
                r.right_middle,
                r.right_ring,
                r.right_pinky,
                r.left_hand,
                r.right_hand,
            ],
        }
    }
}

/// All 13 slots encoded for one profile
///
/// Only ever built whole by [`encode_all`], so it is never partially stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedColorList {
    entries: [EncodedColor; SLOT_COUNT],
}

impl EncodedColorList {
    /// Encoded color for a MIDI channel, `None` outside 0-12
    pub fn get(&self, channel: u8) -> Option<&EncodedColor> {
        self.entries.get(channel as usize)
    }

    /// Encoded color for a slot
    pub fn slot(&self, slot: ColorSlot) -> &EncodedColor {
        &self.entries[slot as usize]
    }

    /// Iterate entries in channel order
    pub fn iter(&self) -> impl Iterator<Item = &EncodedColor> {
        self.entries.iter()
    }
}

/// Encode every slot for a profile
///
/// - RGB profiles: each color scaled to 7 bits.
/// - Palette profiles with a palette map: nearest-color search per slot.
/// - Palette profiles without one: the built-in per-slot index list.
pub fn encode_all(
    profile: &DeviceProfile,
    colors: &ColorAssignments,
    palette: Option<&PaletteMap>,
) -> EncodedColorList {
    let entries = match (profile.encoding(), palette) {
        (ColorEncoding::Rgb7, _) => colors.colors.map(|c| EncodedColor::Rgb(encode_rgb(c))),
        (ColorEncoding::Palette, Some(map)) => {
            colors.colors.map(|c| EncodedColor::Palette(encode_palette(c, map)))
        }
        (ColorEncoding::Palette, None) => BUILTIN_PALETTE.map(EncodedColor::Palette),
    };
    EncodedColorList { entries }
}
