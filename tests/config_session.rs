//! Preferences file -> session -> frames, end to end without hardware.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use kk_driver::DriverConfig;
use kk_lightguide::{ChannelNoteSource, LightGuideSession, NoteEvent};
use kk_transport::{RecordingTransport, Transport};

const MK2_CONFIG: &str = r##"
keyboard = 0
midi_port = "Synthesia"
sweep_loops = 0
shutdown_timeout_ms = 5000

[colors]
left_thumb = "#00fe00"
right_thumb = "#0000ff"

[palette]
"0x07" = "#ff0000"
"0x2D" = "#00ff00"
"0x2F" = "#0000ff"
"##;

fn wait_for_reports(transport: &RecordingTransport, count: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if transport.report_count() >= count {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    false
}

#[test]
fn palette_keyboard_uses_recorded_palette() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, MK2_CONFIG).unwrap();

    let config = DriverConfig::load(&path).unwrap();
    assert_eq!(config.midi_port, "Synthesia");
    let session_config = config.session_config().unwrap();
    assert_eq!(session_config.profile.frame_len(), 62);

    let transport = Arc::new(RecordingTransport::new());
    let (tx, source) = ChannelNoteSource::pair();
    let session =
        LightGuideSession::connect(session_config, Arc::clone(&transport), move || Ok(source))
            .unwrap();
    assert!(wait_for_reports(&transport, 3));

    // C2 is the lowest key on an S61
    tx.send(NoteEvent::note_on(1, 36, 80)).unwrap();
    tx.send(NoteEvent::note_on(6, 96, 80)).unwrap();
    assert!(wait_for_reports(&transport, 5));
    session.stop().unwrap();

    let reports = transport.reports();
    let frame = &reports[4];
    assert_eq!(frame[0], 0x81);
    assert_eq!(frame[1], 0x2D);
    assert_eq!(frame[61], 0x2F);
    assert!(!transport.is_connected());
}

#[test]
fn saved_preferences_drive_rgb_keyboard() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs").join("config.toml");

    let mut config = DriverConfig {
        keyboard: 6,
        sweep_loops: 0,
        ..Default::default()
    };
    config.colors.set(
        kk_lightguide::ColorSlot::RightHand,
        "#808080".parse().unwrap(),
    );
    config.save(&path).unwrap();

    let loaded = DriverConfig::load(&path).unwrap();
    let transport = Arc::new(RecordingTransport::new());
    let (tx, source) = ChannelNoteSource::pair();
    let session = LightGuideSession::connect(
        loaded.session_config().unwrap(),
        Arc::clone(&transport),
        move || Ok(source),
    )
    .unwrap();
    assert!(wait_for_reports(&transport, 3));

    // S25 starts at C3 (48)
    tx.send(NoteEvent::note_on(12, 50, 100)).unwrap();
    assert!(wait_for_reports(&transport, 4));
    session.stop().unwrap();

    let frame = &transport.reports()[3];
    assert_eq!(frame.len(), 76);
    assert_eq!(&frame[7..10], &[0x40, 0x40, 0x40]);
}
