//! Note event to key color mapping

use tracing::trace;

use crate::buffer::LightBuffer;
use crate::color::{EncodedColor, EncodedColorList};
use crate::event::{NoteEvent, NoteEventKind};
use crate::profile::DeviceProfile;

/// Applies note events to a [`LightBuffer`]
///
/// The MIDI channel of a note-on selects the color slot. Notes that land
/// outside the keyboard and channels without a slot are dropped without error.
#[derive(Debug, Clone)]
pub struct NoteMapper {
    note_offset: i32,
    off_color: EncodedColor,
    colors: EncodedColorList,
}

impl NoteMapper {
    pub fn new(profile: &DeviceProfile, colors: EncodedColorList) -> Self {
        Self {
            note_offset: profile.note_offset,
            off_color: profile.off_color(),
            colors,
        }
    }

    /// Swap in a freshly encoded color list
    pub fn set_colors(&mut self, colors: EncodedColorList) {
        self.colors = colors;
    }

    pub fn colors(&self) -> &EncodedColorList {
        &self.colors
    }

    /// Key index a note lands on (may be out of range)
    pub fn key_for(&self, note: u8) -> i32 {
        note as i32 + self.note_offset
    }

    /// Apply one event to the buffer
    ///
    /// Returns true when the event was a note-off or a note-on with a color
    /// slot; the caller must transmit the frame after each of those.
    pub fn apply(&self, buffer: &mut LightBuffer, event: &NoteEvent) -> bool {
        let key = self.key_for(event.note);
        let color = match event.kind {
            NoteEventKind::NoteOff => &self.off_color,
            NoteEventKind::NoteOn => match self.colors.get(event.channel) {
                Some(color) => color,
                None => return false,
            },
            NoteEventKind::Other => return false,
        };
        trace!(
            "{:?} note={} ch={} -> key {} {}",
            event.kind,
            event.note,
            event.channel,
            key,
            color
        );
        buffer.write_color(key, color.as_bytes());
        true
    }
}
