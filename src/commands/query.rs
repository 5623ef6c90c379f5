//! Query (read-only) command handlers.

use kk_driver::list_input_ports;
use kk_lightguide::{format_palette_index, ColorEncoding, EncodedColor, KeyboardModel};
use kk_transport::HidDiscovery;

use super::{CommandResult, Context};

/// List connected keyboards and MIDI input ports
pub fn list() -> CommandResult {
    println!("Komplete Kontrol keyboards:");
    match HidDiscovery::new() {
        Ok(discovery) => {
            let devices = discovery.list_devices();
            if devices.is_empty() {
                println!("  (none found)");
            }
            for device in devices {
                println!("  {}", device.info.describe());
            }
        }
        Err(e) => eprintln!("  HID unavailable: {e}"),
    }

    println!("MIDI input ports:");
    match list_input_ports() {
        Ok(ports) if ports.is_empty() => println!("  (none found)"),
        Ok(ports) => {
            for (i, name) in ports.iter().enumerate() {
                println!("  {i}: {name}");
            }
        }
        Err(e) => eprintln!("  MIDI unavailable: {e}"),
    }
    Ok(())
}

/// List supported keyboard models
pub fn models(ctx: &Context) -> CommandResult {
    let selected = ctx.load_config()?.keyboard;
    println!("Supported models:");
    for model in KeyboardModel::ALL {
        let profile = model.profile();
        let (low, high) = profile.note_range();
        println!(
            "{} {}  {:<8} {:<26} {:04x}:{:04x}  {} keys, notes {}-{}, {}",
            if model.index() == selected { "*" } else { " " },
            model.index(),
            model.name(),
            model.display_name(),
            profile.vendor_id(),
            profile.product_id,
            profile.key_count,
            low,
            high,
            match profile.encoding() {
                ColorEncoding::Rgb7 => "RGB",
                ColorEncoding::Palette => "palette",
            }
        );
    }
    Ok(())
}

/// Show configured colors and how the selected keyboard will receive them
pub fn colors(ctx: &Context) -> CommandResult {
    let config = ctx.load_config()?;
    let session_config = config.session_config()?;
    let encoded = session_config.encoded_colors();

    println!("Colors for {}:", session_config.profile.model);
    for (slot, color) in config.colors.iter() {
        let wire = match encoded.slot(slot) {
            EncodedColor::Rgb([r, g, b]) => format!("rgb7 {r:02x} {g:02x} {b:02x}"),
            EncodedColor::Palette(index) => format!("palette {}", format_palette_index(*index)),
        };
        println!("  ch{:<2} {:<13} {}  -> {}", slot.channel(), slot.key(), color, wire);
    }
    if session_config.profile.encoding() == ColorEncoding::Palette && config.palette.is_none() {
        println!("No palette map recorded; using built-in indices (see `palette set`)");
    }
    Ok(())
}
