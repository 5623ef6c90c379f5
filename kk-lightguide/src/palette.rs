//! Palette maps for MK2 keyboards
//!
//! MK2 keyboards address colors by index into a fixed on-device palette whose
//! RGB values are not published. Users record what each index looks like in a
//! [`PaletteMap`]; colors are then matched to the nearest recorded entry.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::buffer::LightBuffer;
use crate::color::{EncodedColor, Rgb, SLOT_COUNT};
use crate::error::LightGuideError;
use crate::profile::ColorEncoding;

/// Index used when nothing better is known (red on stock firmware)
pub const DEFAULT_PALETTE_INDEX: u8 = 0x07;

/// Per-slot indices used when no palette map is configured
pub const BUILTIN_PALETTE: [u8; SLOT_COUNT] = [
    0x07, 0x2D, 0x2F, 0x2F, 0x2F, 0x2F, 0x1F, 0x1B, 0x1B, 0x1B, 0x1B, 0x2F, 0x1B,
];

/// Keys lit by [`show_palette_index`]
pub const PROBE_KEYS: usize = 12;

/// Ordered palette index to RGB mapping
///
/// Order is significant: when two entries are equally close to a color the
/// earlier one wins. Deserialization keeps document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaletteMap {
    entries: Vec<(u8, Rgb)>,
}

impl PaletteMap {
    /// Create an empty palette map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the color for an index
    ///
    /// An existing index keeps its position; a new one is appended.
    pub fn insert(&mut self, index: u8, color: Rgb) -> Option<Rgb> {
        match self.entries.iter_mut().find(|(i, _)| *i == index) {
            Some((_, existing)) => Some(std::mem::replace(existing, color)),
            None => {
                self.entries.push((index, color));
                None
            }
        }
    }

    /// Remove an index, returning its color
    pub fn remove(&mut self, index: u8) -> Option<Rgb> {
        let pos = self.entries.iter().position(|(i, _)| *i == index)?;
        Some(self.entries.remove(pos).1)
    }

    /// Color recorded for an index
    pub fn get(&self, index: u8) -> Option<Rgb> {
        self.entries
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, Rgb)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index whose recorded color is nearest to `color`, `None` when empty
    pub fn nearest(&self, color: Rgb) -> Option<u8> {
        let mut best: Option<(u8, f64)> = None;
        for (index, candidate) in self.iter() {
            let d = color.weighted_distance(&candidate);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((index, d)),
            }
        }
        best.map(|(index, _)| index)
    }
}

impl FromIterator<(u8, Rgb)> for PaletteMap {
    fn from_iter<T: IntoIterator<Item = (u8, Rgb)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (index, color) in iter {
            map.insert(index, color);
        }
        map
    }
}

/// Parse a palette index written as `0xNN` (or bare hex)
pub fn parse_palette_index(s: &str) -> Result<u8, LightGuideError> {
    let trimmed = s.trim();
    let hex = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex.is_empty() || hex.len() > 2 {
        return Err(LightGuideError::InvalidPaletteIndex(s.to_string()));
    }
    u8::from_str_radix(hex, 16).map_err(|_| LightGuideError::InvalidPaletteIndex(s.to_string()))
}

/// Format a palette index as `0xNN`
pub fn format_palette_index(index: u8) -> String {
    format!("0x{index:02X}")
}

impl Serialize for PaletteMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (index, color) in &self.entries {
            map.serialize_entry(&format_palette_index(*index), color)?;
        }
        map.end()
    }
}

struct PaletteMapVisitor;

impl<'de> Visitor<'de> for PaletteMapVisitor {
    type Value = PaletteMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a table of \"0xNN\" = \"#rrggbb\" entries")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = PaletteMap::new();
        while let Some((key, color)) = access.next_entry::<String, Rgb>()? {
            let index = parse_palette_index(&key).map_err(serde::de::Error::custom)?;
            map.insert(index, color);
        }
        Ok(map)
    }
}

impl<'de> Deserialize<'de> for PaletteMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PaletteMapVisitor)
    }
}

/// Light the first [`PROBE_KEYS`] keys with a raw palette index
///
/// Lets a user see what an index looks like before recording it. Only
/// palette keyboards need this; index 0 is "off" and is rejected.
pub fn show_palette_index(buffer: &mut LightBuffer, index: u8) -> Result<(), LightGuideError> {
    if buffer.encoding() != ColorEncoding::Palette {
        return Err(LightGuideError::NotSupported(
            "MK1 keyboards do not need to be mapped".into(),
        ));
    }
    if index == 0 {
        return Err(LightGuideError::InvalidPaletteIndex(format_palette_index(
            index,
        )));
    }
    debug!("Probing palette index {}", format_palette_index(index));
    buffer.clear();
    let keys = PROBE_KEYS.min(buffer.key_count());
    buffer.fill_keys(0..keys, EncodedColor::Palette(index).as_bytes());
    Ok(())
}
