//! MK2 palette mapping commands.
//!
//! MK2 keyboards only accept palette indices. `palette show` lights an index
//! so its color can be identified; `palette set` records it.

use kk_lightguide::{
    format_palette_index, parse_palette_index, show_palette_index, CancelToken, LightBuffer,
    LightGuideError, Rgb,
};
use kk_transport::protocol::LIGHT_GUIDE_MODE;
use kk_transport::Transport;
use tracing::warn;

use super::{setup_interrupt_handler, wait_until_cancelled, CommandResult, Context};

/// Parse an index that can be recorded or shown (0x01-0xFF)
fn parse_mappable_index(s: &str) -> Result<u8, LightGuideError> {
    match parse_palette_index(s)? {
        0 => Err(LightGuideError::InvalidPaletteIndex(s.to_string())),
        index => Ok(index),
    }
}

/// Light the first keys with a palette index until Ctrl-C
pub fn show(ctx: &Context, index: &str) -> CommandResult {
    let index = parse_mappable_index(index)?;
    let profile = ctx.load_config()?.profile()?;

    // Fails for MK1 before the device is touched
    let mut buffer = LightBuffer::new(&profile);
    show_palette_index(&mut buffer, index)?;

    let transport = ctx.open_keyboard(&profile)?;
    let sent = transport
        .send_report(&[LIGHT_GUIDE_MODE])
        .and_then(|()| transport.send_report(buffer.snapshot()));
    if sent.is_ok() {
        println!(
            "Showing palette index {} on {}; press Ctrl-C to stop",
            format_palette_index(index),
            profile.model
        );
        let cancel = CancelToken::new();
        setup_interrupt_handler(cancel.clone())?;
        wait_until_cancelled(&cancel, || transport.is_connected());
        buffer.clear();
        if let Err(e) = transport.send_report(buffer.snapshot()) {
            warn!("Failed to turn lights off: {e}");
        }
    }
    if let Err(e) = transport.close() {
        warn!("Failed to close transport: {e}");
    }
    sent?;
    Ok(())
}

/// Record the color an index produces
pub fn set(ctx: &Context, index: &str, color: &str) -> CommandResult {
    let index = parse_mappable_index(index)?;
    let color: Rgb = color.parse()?;
    let mut config = ctx.load_config()?;
    let previous = config.palette_mut().insert(index, color);
    ctx.save_config(&config)?;
    match previous {
        Some(old) => println!(
            "Palette {}: {old} -> {color}",
            format_palette_index(index)
        ),
        None => println!("Palette {} = {color}", format_palette_index(index)),
    }
    Ok(())
}

/// Forget one recorded index
pub fn remove(ctx: &Context, index: &str) -> CommandResult {
    let index = parse_palette_index(index)?;
    let mut config = ctx.load_config()?;
    let removed = config.palette.as_mut().and_then(|p| p.remove(index));
    match removed {
        Some(color) => {
            ctx.save_config(&config)?;
            println!("Removed palette {} ({color})", format_palette_index(index));
        }
        None => println!("Palette {} is not mapped", format_palette_index(index)),
    }
    Ok(())
}

/// Print recorded entries in match order
pub fn list(ctx: &Context) -> CommandResult {
    let config = ctx.load_config()?;
    match config.palette {
        None => println!("No palette map recorded; MK2 keyboards use built-in indices"),
        Some(palette) if palette.is_empty() => {
            println!("Palette map is empty; every color maps to 0x07")
        }
        Some(palette) => {
            println!("Palette map ({} entries, earlier wins ties):", palette.len());
            for (index, color) in palette.iter() {
                println!("  {} = {color}", format_palette_index(index));
            }
        }
    }
    Ok(())
}

/// Drop the palette map entirely
pub fn clear(ctx: &Context) -> CommandResult {
    let mut config = ctx.load_config()?;
    if config.palette.take().is_some() {
        ctx.save_config(&config)?;
    }
    println!("Palette map cleared; MK2 keyboards use built-in indices");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kk_driver::DriverConfig;

    fn temp_ctx() -> (tempfile::TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path().join("config.toml"), None);
        (dir, ctx)
    }

    #[test]
    fn test_mappable_index() {
        assert_eq!(parse_mappable_index("0x2D").unwrap(), 0x2D);
        assert!(parse_mappable_index("0x00").is_err());
        assert!(parse_mappable_index("0x1FF").is_err());
    }

    #[test]
    fn test_set_keeps_insertion_order() {
        let (_dir, ctx) = temp_ctx();
        set(&ctx, "0x2F", "#0000ff").unwrap();
        set(&ctx, "0x07", "#ff0000").unwrap();
        set(&ctx, "0x2F", "#0000fe").unwrap();

        let palette = DriverConfig::load(ctx.config_path())
            .unwrap()
            .palette
            .unwrap();
        let entries: Vec<(u8, Rgb)> = palette.iter().collect();
        assert_eq!(
            entries,
            vec![(0x2F, Rgb::new(0, 0, 0xFE)), (0x07, Rgb::RED)]
        );
    }

    #[test]
    fn test_remove_and_clear() {
        let (_dir, ctx) = temp_ctx();
        set(&ctx, "0x07", "#ff0000").unwrap();
        set(&ctx, "0x2D", "#00ff00").unwrap();
        remove(&ctx, "0x07").unwrap();
        let palette = DriverConfig::load(ctx.config_path())
            .unwrap()
            .palette
            .unwrap();
        assert_eq!(palette.len(), 1);

        clear(&ctx).unwrap();
        assert!(DriverConfig::load(ctx.config_path())
            .unwrap()
            .palette
            .is_none());
    }

    #[test]
    fn test_show_rejects_mk1_before_opening() {
        let (_dir, ctx) = temp_ctx();
        // default model is an S61 MK1
        let err = show(&ctx, "0x07").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LightGuideError>(),
            Some(LightGuideError::NotSupported(_))
        ));
    }
}
