//! PrinterTransport middleware for monitoring transport operations
//!
//! Wraps any Transport implementation and prints every report passing
//! through it.
//!
//! # Example
//!
//! ```ignore
//! use kk_transport::{HidDiscovery, PrinterConfig, PrinterTransport};
//!
//! let transport = HidDiscovery::new()?.open(0x17CC, 0x1360)?;
//! let monitored = PrinterTransport::wrap(Box::new(transport), PrinterConfig::default());
//! ```

use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::protocol;
use crate::{BoxedTransport, Transport, TransportDeviceInfo, TransportError};

/// Packet filter for selective display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacketFilter {
    #[default]
    All,
    /// Only color frames (`0x81`/`0x82`)
    Frames,
    /// Only non-frame commands (`0xA0`)
    Commands,
}

impl FromStr for PacketFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "frames" | "frame" => Ok(Self::Frames),
            "commands" | "cmd" | "cmds" => Ok(Self::Commands),
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}

/// Configuration for the PrinterTransport
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Dump every byte instead of a short summary
    pub show_hex: bool,
    /// Filter for selective display
    pub filter: PacketFilter,
}

impl PrinterConfig {
    /// Create config with hex output setting
    pub fn with_hex(mut self, show: bool) -> Self {
        self.show_hex = show;
        self
    }

    /// Create config with filter
    pub fn with_filter(mut self, filter: PacketFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Transport middleware that prints all reports
pub struct PrinterTransport {
    inner: BoxedTransport,
    config: PrinterConfig,
    sequence: AtomicU64,
}

impl PrinterTransport {
    /// Wrap a transport with printing middleware
    pub fn wrap(transport: BoxedTransport, config: PrinterConfig) -> BoxedTransport {
        Box::new(Self {
            inner: transport,
            config,
            sequence: AtomicU64::new(0),
        })
    }

    fn should_show(&self, data: &[u8]) -> bool {
        match self.config.filter {
            PacketFilter::All => true,
            PacketFilter::Frames => protocol::is_frame(data),
            PacketFilter::Commands => !protocol::is_frame(data),
        }
    }

    fn print_report(&self, seq: u64, data: &[u8]) {
        let header = data.first().copied().unwrap_or(0);
        println!(
            "[{seq:06}] -> 0x{header:02X} {} ({} bytes, {} lit)",
            protocol::report_name(header),
            data.len(),
            lit_count(data)
        );
        if self.config.show_hex {
            println!("{}", format_hex(data));
        }
    }
}

/// Number of non-zero payload bytes
fn lit_count(data: &[u8]) -> usize {
    data.iter().skip(1).filter(|&&b| b != 0).count()
}

/// Hex dump with 16 bytes per line and an offset column
pub fn format_hex(data: &[u8]) -> String {
    data.chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let bytes: Vec<String> = chunk.iter().map(|b| format!("{b:02x}")).collect();
            format!("  {:04x}: {}", i * 16, bytes.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl Transport for PrinterTransport {
    fn send_report(&self, data: &[u8]) -> Result<(), TransportError> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        if self.should_show(data) {
            self.print_report(seq, data);
        }
        let result = self.inner.send_report(data);
        if let Err(ref e) = result {
            println!("[{seq:06}] !! {e}");
        }
        result
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }

    fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    fn close(&self) -> Result<(), TransportError> {
        self.inner.close()
    }
}
