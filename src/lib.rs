// Komplete Kontrol Light Guide driver - shared library
// Preferences and the live MIDI note source used by the CLI

pub mod config;
pub mod midi;

pub use config::DriverConfig;
pub use midi::{list_input_ports, MidiNoteSource};
