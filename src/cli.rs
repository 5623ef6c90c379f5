// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kk_driver")]
#[command(author, version, about = "Komplete Kontrol Light Guide driver")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/kk-lightguide/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable transport monitoring (prints every report sent to the keyboard)
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Show raw hex dump of each monitored report
    #[arg(long, global = true)]
    pub hex: bool,

    /// Filter monitored reports (all, frames, commands)
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // === Session Commands ===
    /// Connect to the keyboard and light keys from MIDI input until Ctrl-C
    #[command(visible_aliases = ["connect", "r"])]
    Run {
        /// Keyboard model (index 0-6 or name like s61-mk2); overrides config
        #[arg(short, long)]
        keyboard: Option<String>,
        /// MIDI input port name fragment; overrides config
        #[arg(short, long)]
        port: Option<String>,
        /// Skip the connect animation
        #[arg(long)]
        no_sweep: bool,
    },

    /// Play the sweep animation without listening for MIDI
    Sweep {
        /// Keyboard model (index 0-6 or name like s61-mk2); overrides config
        #[arg(short, long)]
        keyboard: Option<String>,
        /// Number of back-and-forth passes
        #[arg(short, long, default_value = "1")]
        loops: u32,
    },

    // === Query Commands ===
    /// List connected keyboards and MIDI input ports
    #[command(visible_alias = "ls")]
    List,

    /// List supported keyboard models
    Models,

    /// Show configured colors and their encoding for the selected keyboard
    Colors,

    // === Set Commands ===
    /// Select the keyboard model
    SetModel {
        /// Model index (0-6) or name (s61-mk2, s88-mk1, ...)
        model: String,
    },

    /// Set the color for a slot
    SetColor {
        /// Slot name (default, left-thumb, ..., right-hand) or channel number 0-12
        slot: String,
        /// Color as #rrggbb
        color: String,
    },

    /// Set the MIDI input port name fragment
    SetPort {
        /// Case-insensitive substring of the port name
        name: String,
    },

    // === Palette Commands ===
    /// MK2 palette mapping
    #[command(subcommand)]
    Palette(PaletteCommands),
}

#[derive(Subcommand)]
pub enum PaletteCommands {
    /// Light the first 12 keys with a raw palette index until Ctrl-C
    Show {
        /// Palette index (0x01-0xFF)
        index: String,
    },

    /// Record the color a palette index produces
    Set {
        /// Palette index (0x01-0xFF)
        index: String,
        /// Color as #rrggbb
        color: String,
    },

    /// Forget a recorded palette index
    #[command(visible_alias = "rm")]
    Remove {
        /// Palette index
        index: String,
    },

    /// Show recorded palette entries
    #[command(visible_alias = "ls")]
    List,

    /// Drop the whole palette map (back to built-in indices)
    Clear,
}
