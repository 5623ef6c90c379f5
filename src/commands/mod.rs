//! Command handlers for the CLI application.
//!
//! This module organizes command handlers by category:
//! - `session`: Commands that drive the keyboard (run, sweep)
//! - `query`: Read-only commands (list, models, colors)
//! - `set`: Preference commands (set-model, set-color, set-port)
//! - `palette`: MK2 palette mapping (palette show/set/remove/list/clear)

pub mod palette;
pub mod query;
pub mod session;
pub mod set;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::Context as _;
use kk_driver::DriverConfig;
use kk_lightguide::{CancelToken, DeviceProfile, KeyboardModel};
use kk_transport::{BoxedTransport, HidDiscovery, PacketFilter, PrinterConfig, PrinterTransport};
use tracing::info;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;

/// State shared by every command
pub struct Context {
    config_path: PathBuf,
    printer_config: Option<PrinterConfig>,
}

impl Context {
    pub fn new(config_path: PathBuf, printer_config: Option<PrinterConfig>) -> Self {
        Self {
            config_path,
            printer_config,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load_config(&self) -> anyhow::Result<DriverConfig> {
        DriverConfig::load(&self.config_path)
            .with_context(|| format!("Failed to load {}", self.config_path.display()))
    }

    pub fn save_config(&self, config: &DriverConfig) -> CommandResult {
        config
            .save(&self.config_path)
            .with_context(|| format!("Failed to save {}", self.config_path.display()))?;
        info!("Saved {}", self.config_path.display());
        Ok(())
    }

    /// Open the keyboard for a profile.
    /// If monitoring is enabled, the transport is wrapped with Printer.
    pub fn open_keyboard(&self, profile: &DeviceProfile) -> anyhow::Result<BoxedTransport> {
        let discovery = HidDiscovery::new()?;
        let transport = discovery
            .open(profile.vendor_id(), profile.product_id)
            .with_context(|| format!("Could not connect to {}", profile.model))?;
        let transport: BoxedTransport = Box::new(transport);
        Ok(match &self.printer_config {
            Some(config) => PrinterTransport::wrap(transport, config.clone()),
            None => transport,
        })
    }
}

/// Profile for a `--keyboard` override, or the configured model
pub fn resolve_profile(
    keyboard: Option<&str>,
    config: &DriverConfig,
) -> anyhow::Result<DeviceProfile> {
    match keyboard {
        Some(name) => Ok(*name.parse::<KeyboardModel>()?.profile()),
        None => config.profile(),
    }
}

/// Cancel the token when Ctrl-C is pressed.
pub fn setup_interrupt_handler(token: CancelToken) -> CommandResult {
    ctrlc::set_handler(move || token.cancel()).context("Failed to install Ctrl-C handler")
}

/// Sleep until the token is cancelled or `keep_going` returns false.
pub fn wait_until_cancelled(token: &CancelToken, mut keep_going: impl FnMut() -> bool) {
    while !token.is_cancelled() && keep_going() {
        thread::sleep(Duration::from_millis(50));
    }
}

/// Create printer config from CLI flags
pub fn create_printer_config(
    monitor: bool,
    hex: bool,
    filter: Option<&str>,
) -> anyhow::Result<Option<PrinterConfig>> {
    if !monitor {
        return Ok(None);
    }

    let filter = match filter {
        Some(f) => f.parse::<PacketFilter>().map_err(anyhow::Error::msg)?,
        None => PacketFilter::All,
    };

    Ok(Some(
        PrinterConfig::default().with_hex(hex).with_filter(filter),
    ))
}
