//! Set (write) command handlers.
//!
//! These only touch the preferences file; they take effect on the next `run`.

use kk_lightguide::{ColorSlot, KeyboardModel, Rgb};

use super::{CommandResult, Context};

/// Select the keyboard model
pub fn set_model(ctx: &Context, model: &str) -> CommandResult {
    let model: KeyboardModel = model.parse()?;
    let mut config = ctx.load_config()?;
    config.keyboard = model.index();
    ctx.save_config(&config)?;
    println!("Keyboard set to {} ({})", model, model.index());
    Ok(())
}

/// Set the color for one slot
pub fn set_color(ctx: &Context, slot: &str, color: &str) -> CommandResult {
    let slot: ColorSlot = slot.parse().map_err(anyhow::Error::msg)?;
    let color: Rgb = color.parse()?;
    let mut config = ctx.load_config()?;
    config.colors.set(slot, color);
    ctx.save_config(&config)?;
    println!("{slot} (channel {}) set to {color}", slot.channel());
    Ok(())
}

/// Set the MIDI port name fragment
pub fn set_port(ctx: &Context, name: &str) -> CommandResult {
    if name.trim().is_empty() {
        anyhow::bail!("MIDI port name must not be empty");
    }
    let mut config = ctx.load_config()?;
    config.midi_port = name.to_string();
    ctx.save_config(&config)?;
    println!("MIDI port set to \"{name}\"");
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
    fn test_set_model_persists() {
        let (_dir, ctx) = temp_ctx();
        set_model(&ctx, "s49-mk2").unwrap();
        assert_eq!(DriverConfig::load(ctx.config_path()).unwrap().keyboard, 2);
        assert!(set_model(&ctx, "7").is_err());
    }

    #[test]
    fn test_set_color_persists() {
        let (_dir, ctx) = temp_ctx();
        set_color(&ctx, "left-index", "#010203").unwrap();
        let config = DriverConfig::load(ctx.config_path()).unwrap();
        assert_eq!(config.colors.get(ColorSlot::LeftIndex), Rgb::new(1, 2, 3));
        assert!(set_color(&ctx, "left-index", "blue").is_err());
        assert!(set_color(&ctx, "left-elbow", "#010203").is_err());
    }

    #[test]
    fn test_set_port() {
        let (_dir, ctx) = temp_ctx();
        set_port(&ctx, "Synthesia").unwrap();
        assert_eq!(
            DriverConfig::load(ctx.config_path()).unwrap().midi_port,
            "Synthesia"
        );
        assert!(set_port(&ctx, "  ").is_err());
    }
}
