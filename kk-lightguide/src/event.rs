//! Note events and the source they are polled from

/// What kind of channel message an event is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteEventKind {
    NoteOn,
    NoteOff,
    /// Any other channel message (control change, pitch bend, ...)
    Other,
}

/// A decoded live MIDI channel message
///
/// For [`NoteEventKind::Other`], `note` and `velocity` hold the two data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteEvent {
    pub kind: NoteEventKind,
    pub note: u8,
    /// Zero-based MIDI channel (0-15); selects the color slot
    pub channel: u8,
    pub velocity: u8,
}

impl NoteEvent {
    pub fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self {
            kind: NoteEventKind::NoteOn,
            note,
            channel,
            velocity,
        }
    }

    pub fn note_off(channel: u8, note: u8) -> Self {
        Self {
            kind: NoteEventKind::NoteOff,
            note,
            channel,
            velocity: 0,
        }
    }

    /// Decode raw MIDI bytes
    ///
    /// - Note Off: `0x8n nn vv`
    /// - Note On: `0x9n nn vv`; velocity 0 decodes as Note Off
    /// - Other channel messages (`0xA0`-`0xEF`) decode as [`NoteEventKind::Other`]
    ///
    /// System messages and truncated input return `None`.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let &status = data.first()?;
        let channel = status & 0x0F;
        let data1 = data.get(1).copied().unwrap_or(0);
        let data2 = data.get(2).copied().unwrap_or(0);

        match status & 0xF0 {
            0x80 if data.len() >= 3 => Some(Self {
                kind: NoteEventKind::NoteOff,
                note: data1,
                channel,
                velocity: data2,
            }),
            0x90 if data.len() >= 3 => {
                if data2 == 0 {
                    Some(Self::note_off(channel, data1))
                } else {
                    Some(Self::note_on(channel, data1, data2))
                }
            }
            0xA0..=0xE0 if data.len() >= 2 => Some(Self {
                kind: NoteEventKind::Other,
                note: data1,
                channel,
                velocity: data2,
            }),
            _ => None,
        }
    }
}

/// A non-blocking source of note events
///
/// `poll` drains whatever has arrived since the last call and returns
/// immediately; an empty vector means nothing is pending.
pub trait NoteSource: Send {
    fn poll(&mut self) -> Vec<NoteEvent>;

    /// Release the underlying port
    fn close(&mut self) {}
}

impl<S: NoteSource + ?Sized> NoteSource for Box<S> {
    fn poll(&mut self) -> Vec<NoteEvent> {
        (**self).poll()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Note source fed through a flume channel
///
/// Backs the MIDI input callback, and doubles as a scripted source in tests.
pub struct ChannelNoteSource {
    rx: flume::Receiver<NoteEvent>,
}

impl ChannelNoteSource {
    pub fn new(rx: flume::Receiver<NoteEvent>) -> Self {
        Self { rx }
    }

    /// Create a source together with the sender that feeds it
    pub fn pair() -> (flume::Sender<NoteEvent>, Self) {
        let (tx, rx) = flume::unbounded();
        (tx, Self::new(rx))
    }
}

impl NoteSource for ChannelNoteSource {
    fn poll(&mut self) -> Vec<NoteEvent> {
        self.rx.try_iter().collect()
    }
}
