//! Frame-level behavior across all supported keyboards.
//!
//! Everything here runs against in-memory buffers and the recording
//! transport; no hardware is needed.

use kk_lightguide::{
    encode_all, encode_palette, encode_rgb, ColorAssignments, EncodedColor, KeyboardModel,
    LightBuffer, NoteEvent, NoteMapper, PaletteMap, Rgb, SweepPattern, PROFILES,
};
use kk_lightguide::session::CancelToken;
use kk_transport::RecordingTransport;

fn rgb(s: &str) -> Rgb {
    s.parse().unwrap()
}

#[test]
fn frame_shape_holds_for_every_profile() {
    for profile in &PROFILES {
        let mut buffer = LightBuffer::new(profile);
        let expected_len = profile.key_count * profile.bytes_per_key() + 1;
        assert_eq!(buffer.snapshot().len(), expected_len);
        assert_eq!(buffer.snapshot()[0], profile.header());

        buffer.fill_keys(0..profile.key_count, &vec![0x7F; profile.bytes_per_key()]);
        buffer.clear();
        assert_eq!(buffer.snapshot().len(), expected_len);
        assert_eq!(buffer.snapshot()[0], profile.header());
    }
}

#[test]
fn write_outside_keyboard_leaves_frame_unchanged() {
    for profile in &PROFILES {
        let mut buffer = LightBuffer::new(profile);
        let before = buffer.snapshot().to_vec();
        let color = vec![0x11; profile.bytes_per_key()];
        buffer.write_color(-1, &color);
        buffer.write_color(profile.key_count as i32, &color);
        assert_eq!(buffer.snapshot(), &before[..], "{}", profile.model);
    }
}

#[test]
fn rgb_encoding_halves_channels() {
    assert_eq!(encode_rgb(rgb("#ffffff")), [0x7F, 0x7F, 0x7F]);
    assert_eq!(encode_rgb(rgb("#000000")), [0x00, 0x00, 0x00]);
}

#[test]
fn palette_encoding_picks_nearest() {
    let mut palette = PaletteMap::new();
    palette.insert(0x07, rgb("#ff0000"));
    palette.insert(0x2D, rgb("#00ff00"));

    assert_eq!(encode_palette(rgb("#ff0000"), &palette), 0x07);
    assert_eq!(encode_palette(rgb("#fe0101"), &palette), 0x07);
    assert_eq!(encode_palette(rgb("#10f010"), &palette), 0x2D);
}

#[test]
fn empty_palette_encodes_default_index() {
    let palette = PaletteMap::new();
    for s in ["#ff0000", "#00ff00", "#123456", "#000000"] {
        assert_eq!(encode_palette(rgb(s), &palette), 0x07);
    }

    // an empty map is still a map: every slot falls back to the default index
    let profile = KeyboardModel::S61Mk2.profile();
    let list = encode_all(profile, &ColorAssignments::default(), Some(&palette));
    assert!(list.iter().all(|c| *c == EncodedColor::Palette(0x07)));
}

#[test]
fn note_60_on_channel_1_lights_key_24_on_s61_mk1() {
    let profile = KeyboardModel::S61Mk1.profile();
    let colors = encode_all(profile, &ColorAssignments::default(), None);
    let channel_1 = *colors.get(1).unwrap();
    let mapper = NoteMapper::new(profile, colors);
    let mut buffer = LightBuffer::new(profile);

    assert!(mapper.apply(&mut buffer, &NoteEvent::note_on(1, 60, 100)));
    assert_eq!(buffer.key(24), Some(channel_1.as_bytes()));

    assert!(mapper.apply(&mut buffer, &NoteEvent::note_off(1, 60)));
    assert_eq!(buffer.key(24), Some(&[0x00u8, 0x00, 0x00][..]));
}

#[test]
fn note_on_channel_13_changes_nothing() {
    let profile = KeyboardModel::S61Mk1.profile();
    let mapper = NoteMapper::new(
        profile,
        encode_all(profile, &ColorAssignments::default(), None),
    );
    let mut buffer = LightBuffer::new(profile);
    let before = buffer.clone();

    mapper.apply(&mut buffer, &NoteEvent::note_on(13, 60, 100));
    assert_eq!(buffer, before);
}

#[test]
fn one_loop_sweep_on_25_keys() {
    let profile = KeyboardModel::S25Mk1.profile();
    let mut buffer = LightBuffer::new(profile);
    let transport = RecordingTransport::new();

    let sent = SweepPattern::new(profile, 1)
        .play(&mut buffer, &transport, &CancelToken::new(), |_| {})
        .unwrap();

    assert_eq!(sent, 50);
    let reports = transport.reports();
    assert_eq!(reports.len(), 51);
    assert!(reports[..50].iter().all(|r| r[1..].iter().any(|&b| b != 0)));
    assert_eq!(reports[50], {
        let mut off = vec![0u8; profile.frame_len()];
        off[0] = 0x82;
        off
    });
    assert!(buffer.is_dark());
}

#[test]
fn color_strings_round_trip() {
    for s in [
        "#000000", "#ffffff", "#ff0000", "#0099ff", "#6600ff", "#ffd900", "#b3ff00", "#00ffbf",
        "#a1b2c3",
    ] {
        assert_eq!(rgb(s).to_string(), s);
    }
}
