//! Light Guide error types

use std::time::Duration;

use kk_transport::TransportError;
use thiserror::Error;

/// Errors from Light Guide operations
///
/// Out-of-range keys and channels are not errors; they are dropped silently
/// while mapping notes.
#[derive(Error, Debug)]
pub enum LightGuideError {
    /// Model selector outside the supported table
    #[error("Unknown keyboard model: {0}")]
    UnknownModel(String),

    /// Transport layer error (open or write)
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// No MIDI input port matched the requested name
    #[error("No MIDI input port found matching: {0}")]
    PortNotFound(String),

    /// MIDI subsystem failed to initialize or connect
    #[error("MIDI error: {0}")]
    Midi(String),

    /// Color string is not `#rrggbb`
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Palette index string is not `0xNN`, or out of range
    #[error("Invalid palette index: {0}")]
    InvalidPaletteIndex(String),

    /// Operation not available for this keyboard
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Worker did not stop in time after cancellation
    #[error("Light Guide worker did not stop within {0:?}")]
    ShutdownTimeout(Duration),

    /// Worker thread could not be started
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// Worker thread panicked
    #[error("Light Guide worker panicked")]
    WorkerPanicked,
}
