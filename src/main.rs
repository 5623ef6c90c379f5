//! Komplete Kontrol Light Guide Driver CLI
//!
//! Lights the keys of a Komplete Kontrol keyboard from live MIDI note events.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use kk_driver::DriverConfig;

// CLI definitions
mod cli;
use cli::{Cli, Commands, PaletteCommands};

// Command handlers
mod commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = cli.config.clone().unwrap_or_else(DriverConfig::default_path);
    debug!("Using config {:?}", config_path);

    // Create printer config if monitoring is enabled
    let printer_config =
        commands::create_printer_config(cli.monitor, cli.hex, cli.filter.as_deref())?;
    let ctx = commands::Context::new(config_path, printer_config);

    match cli.command {
        // Default: connect and listen
        None => commands::session::run(&ctx, None, None, false),

        // === Session Commands ===
        Some(Commands::Run {
            keyboard,
            port,
            no_sweep,
        }) => commands::session::run(&ctx, keyboard.as_deref(), port.as_deref(), no_sweep),
        Some(Commands::Sweep { keyboard, loops }) => {
            commands::session::sweep(&ctx, keyboard.as_deref(), loops)
        }

        // === Query Commands ===
        Some(Commands::List) => commands::query::list(),
        Some(Commands::Models) => commands::query::models(&ctx),
        Some(Commands::Colors) => commands::query::colors(&ctx),

        // === Set Commands ===
        Some(Commands::SetModel { model }) => commands::set::set_model(&ctx, &model),
        Some(Commands::SetColor { slot, color }) => commands::set::set_color(&ctx, &slot, &color),
        Some(Commands::SetPort { name }) => commands::set::set_port(&ctx, &name),

        // === Palette Commands ===
        Some(Commands::Palette(cmd)) => match cmd {
            PaletteCommands::Show { index } => commands::palette::show(&ctx, &index),
            PaletteCommands::Set { index, color } => commands::palette::set(&ctx, &index, &color),
            PaletteCommands::Remove { index } => commands::palette::remove(&ctx, &index),
            PaletteCommands::List => commands::palette::list(&ctx),
            PaletteCommands::Clear => commands::palette::clear(&ctx),
        },
    }
}
