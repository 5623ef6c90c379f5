//! Session commands: drive the Light Guide.

use std::thread;

use kk_driver::MidiNoteSource;
use kk_lightguide::{
    CancelToken, DeviceProfile, LightBuffer, LightGuideError, LightGuideSession, SweepPattern,
};
use kk_transport::protocol::LIGHT_GUIDE_MODE;
use kk_transport::Transport;
use tracing::warn;

use super::{
    resolve_profile, setup_interrupt_handler, wait_until_cancelled, CommandResult, Context,
};

/// Connect, play the sweep, then follow MIDI notes until Ctrl-C
pub fn run(
    ctx: &Context,
    keyboard: Option<&str>,
    port: Option<&str>,
    no_sweep: bool,
) -> CommandResult {
    let config = ctx.load_config()?;
    let mut session_config = config.session_config()?;
    session_config.profile = resolve_profile(keyboard, &config)?;
    if no_sweep {
        session_config.sweep_loops = 0;
    }
    let port = port.unwrap_or(config.midi_port.as_str()).to_string();
    let model = session_config.profile.model;

    let transport = ctx.open_keyboard(&session_config.profile)?;
    let session =
        LightGuideSession::connect(session_config, transport, || MidiNoteSource::open(&port))?;

    println!("Connected to {model}, listening on MIDI port matching \"{port}\"");
    println!("Press Ctrl-C to stop");

    let token = session.cancel_token();
    setup_interrupt_handler(token.clone())?;
    wait_until_cancelled(&token, || session.is_running());

    let stats = session.stop()?;
    println!(
        "Disconnected: {} note event(s), {} frame(s) sent",
        stats.events, stats.frames_sent
    );
    Ok(())
}

/// Play the sweep animation once and exit
pub fn sweep(ctx: &Context, keyboard: Option<&str>, loops: u32) -> CommandResult {
    let config = ctx.load_config()?;
    let profile = resolve_profile(keyboard, &config)?;

    let transport = ctx.open_keyboard(&profile)?;
    let cancel = CancelToken::new();
    setup_interrupt_handler(cancel.clone())?;

    let result = play_sweep(&profile, loops, &transport, &cancel);
    if let Err(e) = transport.close() {
        warn!("Failed to close transport: {e}");
    }
    let sent = result?;
    println!("Sweep finished: {sent} frame(s) on {}", profile.model);
    Ok(())
}

fn play_sweep<T: Transport + ?Sized>(
    profile: &DeviceProfile,
    loops: u32,
    transport: &T,
    cancel: &CancelToken,
) -> Result<usize, LightGuideError> {
    transport.send_report(&[LIGHT_GUIDE_MODE])?;
    let mut buffer = LightBuffer::new(profile);
    SweepPattern::new(profile, loops).play(&mut buffer, transport, cancel, thread::sleep)
}
