//! Live MIDI input via midir
//!
//! The midir callback runs on the MIDI driver's thread; it only decodes the
//! message and forwards it through a flume channel. The Light Guide worker
//! drains that channel with [`NoteSource::poll`].

use kk_lightguide::{ChannelNoteSource, LightGuideError, NoteEvent, NoteSource};
use midir::{MidiInput, MidiInputConnection};
use tracing::{debug, info};

const CLIENT_NAME: &str = "kk-lightguide";

/// Note source connected to a MIDI input port
pub struct MidiNoteSource {
    connection: Option<MidiInputConnection<flume::Sender<NoteEvent>>>,
    events: ChannelNoteSource,
    port_name: String,
}

impl MidiNoteSource {
    /// Connect to the first input port whose name contains `pattern`
    /// (case-insensitive)
    pub fn open(pattern: &str) -> Result<Self, LightGuideError> {
        let midi_in =
            MidiInput::new(CLIENT_NAME).map_err(|e| LightGuideError::Midi(e.to_string()))?;

        let ports = midi_in.ports();
        let names: Vec<String> = ports
            .iter()
            .map(|p| midi_in.port_name(p).unwrap_or_default())
            .collect();
        let index = find_port(&names, pattern)
            .ok_or_else(|| LightGuideError::PortNotFound(pattern.to_string()))?;
        let port_name = names[index].clone();
        info!("MIDI: Found input port: {}", port_name);

        let (tx, events) = ChannelNoteSource::pair();
        let connection = midi_in
            .connect(
                &ports[index],
                "kk-lightguide-input",
                |_timestamp, data, tx| {
                    if let Some(event) = NoteEvent::parse(data) {
                        debug!("[MIDI IN] {:?}", event);
                        let _ = tx.send(event);
                    }
                },
                tx,
            )
            .map_err(|e| LightGuideError::Midi(e.to_string()))?;

        Ok(Self {
            connection: Some(connection),
            events,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl NoteSource for MidiNoteSource {
    fn poll(&mut self) -> Vec<NoteEvent> {
        self.events.poll()
    }

    fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
            debug!("MIDI: Closed {}", self.port_name);
        }
    }
}

impl Drop for MidiNoteSource {
    fn drop(&mut self) {
        NoteSource::close(self);
    }
}

/// Names of all MIDI input ports
pub fn list_input_ports() -> Result<Vec<String>, LightGuideError> {
    let midi_in = MidiInput::new(CLIENT_NAME).map_err(|e| LightGuideError::Midi(e.to_string()))?;
    Ok(midi_in
        .ports()
        .iter()
        .filter_map(|p| midi_in.port_name(p).ok())
        .collect())
}

/// Index of the first name containing `pattern`, ignoring case
pub fn find_port(names: &[String], pattern: &str) -> Option<usize> {
    let pattern = pattern.to_lowercase();
    names
        .iter()
        .position(|name| name.to_lowercase().contains(&pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_find_port_substring() {
        let ports = names(&["Midi Through:0", "LoopBe Internal MIDI", "USB Keys"]);
        assert_eq!(find_port(&ports, "LoopBe"), Some(1));
        assert_eq!(find_port(&ports, "loopbe"), Some(1));
        assert_eq!(find_port(&ports, "keys"), Some(2));
    }

    #[test]
    fn test_find_port_first_match_wins() {
        let ports = names(&["LoopBe 1", "LoopBe 2"]);
        assert_eq!(find_port(&ports, "loopbe"), Some(0));
    }

    #[test]
    fn test_find_port_missing() {
        assert_eq!(find_port(&names(&["Midi Through:0"]), "LoopBe"), None);
        assert_eq!(find_port(&[], "LoopBe"), None);
    }
}
