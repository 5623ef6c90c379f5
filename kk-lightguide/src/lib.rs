//! Light Guide driver core for Komplete Kontrol keyboards
//!
//! Turns live note events into Light Guide frames:
//!
//! - [`profile`]: the seven supported models and their frame layout
//! - [`color`] / [`palette`]: 7-bit RGB and palette-index encodings
//! - [`buffer`]: the frame itself, with bounds-checked key writes
//! - [`mapper`]: note-on/note-off to key color
//! - [`sweep`]: the connect animation
//! - [`session`]: a connected keyboard driven from a worker thread
//!
//! Everything is written against [`kk_transport::Transport`], so the same
//! code drives real hardware and the in-memory recorder used in tests.

pub mod buffer;
pub mod color;
pub mod error;
pub mod event;
pub mod mapper;
pub mod palette;
pub mod profile;
pub mod session;
pub mod sweep;

pub use buffer::LightBuffer;
pub use color::{
    encode_all, encode_color, encode_palette, encode_rgb, ColorAssignments, ColorSlot,
    EncodedColor, EncodedColorList, Rgb, SLOT_COUNT,
};
pub use error::LightGuideError;
pub use event::{ChannelNoteSource, NoteEvent, NoteEventKind, NoteSource};
pub use mapper::NoteMapper;
pub use palette::{
    format_palette_index, parse_palette_index, show_palette_index, PaletteMap, BUILTIN_PALETTE,
    DEFAULT_PALETTE_INDEX, PROBE_KEYS,
};
pub use profile::{select_profile, ColorEncoding, DeviceProfile, Generation, KeyboardModel, PROFILES};
pub use session::{CancelToken, LightGuideSession, SessionConfig, SessionStats};
pub use sweep::{SweepColors, SweepDirection, SweepPattern, SweepStep};

/// Result alias for Light Guide operations
pub type Result<T> = std::result::Result<T, LightGuideError>;
