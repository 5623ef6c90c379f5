//! Back-and-forth "scanner" animation played on connect
//!
//! A bright key with dimmer neighbours on each side runs from the lowest key
//! to the highest and back, once per loop. The pattern itself is a plain
//! iterator of [`SweepStep`]s; [`SweepPattern::play`] drives it against a
//! buffer and transport.

use std::time::Duration;

use kk_transport::Transport;
use tracing::debug;

use crate::buffer::LightBuffer;
use crate::color::EncodedColor;
use crate::error::LightGuideError;
use crate::profile::{ColorEncoding, DeviceProfile};
use crate::session::CancelToken;

/// Delay between sweep frames
pub const SWEEP_FRAME_DELAY: Duration = Duration::from_millis(10);

/// Loops played when a session connects
pub const DEFAULT_SWEEP_LOOPS: u32 = 2;

/// Bright, medium and dim tiers in a profile's native encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepColors {
    pub bright: EncodedColor,
    pub medium: EncodedColor,
    pub dim: EncodedColor,
}

impl SweepColors {
    /// Red tiers for an encoding
    pub const fn for_encoding(encoding: ColorEncoding) -> Self {
        match encoding {
            ColorEncoding::Rgb7 => Self {
                bright: EncodedColor::Rgb([0x7F, 0x00, 0x00]),
                medium: EncodedColor::Rgb([0x3F, 0x00, 0x00]),
                dim: EncodedColor::Rgb([0x0F, 0x00, 0x00]),
            },
            ColorEncoding::Palette => Self {
                bright: EncodedColor::Palette(0x07),
                medium: EncodedColor::Palette(0x05),
                dim: EncodedColor::Palette(0x04),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    Forward,
    Backward,
}

/// One frame of the animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepStep {
    pub loop_index: u32,
    pub direction: SweepDirection,
    /// Key holding the bright color
    pub position: usize,
    /// How long to hold this frame
    pub delay: Duration,
}

/// Sweep animation for one profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPattern {
    key_count: usize,
    loops: u32,
    delay: Duration,
    colors: SweepColors,
}

impl SweepPattern {
    pub fn new(profile: &DeviceProfile, loops: u32) -> Self {
        Self {
            key_count: profile.key_count,
            loops,
            delay: SWEEP_FRAME_DELAY,
            colors: SweepColors::for_encoding(profile.encoding()),
        }
    }

    /// Override the per-frame delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn colors(&self) -> &SweepColors {
        &self.colors
    }

    /// Frames in the animation, excluding the final all-off frame
    pub fn frame_count(&self) -> usize {
        2 * self.key_count * self.loops as usize
    }

    /// Every step in order: forward then backward, `loops` times
    pub fn steps(&self) -> impl Iterator<Item = SweepStep> + '_ {
        let keys = self.key_count;
        (0..self.loops).flat_map(move |loop_index| {
            let forward = (0..keys).map(move |position| (SweepDirection::Forward, position));
            let backward = (0..keys)
                .rev()
                .map(move |position| (SweepDirection::Backward, position));
            forward
                .chain(backward)
                .map(move |(direction, position)| SweepStep {
                    loop_index,
                    direction,
                    position,
                    delay: self.delay,
                })
        })
    }

    /// Draw one step into the buffer, replacing whatever was there
    pub fn render(&self, buffer: &mut LightBuffer, step: &SweepStep) {
        let x = step.position as i32;
        buffer.clear();
        buffer.write_color(x, self.colors.bright.as_bytes());
        for (distance, color) in [(1, &self.colors.medium), (2, &self.colors.dim)] {
            buffer.write_color(x + distance, color.as_bytes());
            buffer.write_color(x - distance, color.as_bytes());
        }
    }

    /// Play the animation, then send one all-off frame
    ///
    /// `pace` is called with each step's delay after the frame is sent. The
    /// token is checked before every frame; a cancelled sweep still ends dark.
    /// Returns the number of animation frames sent.
    pub fn play<T, P>(
        &self,
        buffer: &mut LightBuffer,
        transport: &T,
        cancel: &CancelToken,
        mut pace: P,
    ) -> Result<usize, LightGuideError>
    where
        T: Transport + ?Sized,
        P: FnMut(Duration),
    {
        debug!(
            "Sweep: {} keys, {} loop(s), {:?}/frame",
            self.key_count, self.loops, self.delay
        );
        let mut sent = 0;
        for step in self.steps() {
            if cancel.is_cancelled() {
                debug!("Sweep cancelled after {sent} frames");
                break;
            }
            self.render(buffer, &step);
            transport.send_report(buffer.snapshot())?;
            sent += 1;
            pace(step.delay);
        }
        buffer.clear();
        transport.send_report(buffer.snapshot())?;
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::KeyboardModel;
    use kk_transport::RecordingTransport;

    #[test]
    fn test_step_order() {
        let pattern = SweepPattern::new(KeyboardModel::S25Mk1.profile(), 1);
        let positions: Vec<usize> = pattern.steps().map(|s| s.position).collect();
        let expected: Vec<usize> = (0..25).chain((0..25).rev()).collect();
        assert_eq!(positions, expected);
        assert!(pattern.steps().all(|s| s.delay == SWEEP_FRAME_DELAY));
    }

    #[test]
    fn test_step_count_per_loop() {
        let pattern = SweepPattern::new(KeyboardModel::S88Mk2.profile(), 3);
        assert_eq!(pattern.steps().count(), 2 * 88 * 3);
        assert_eq!(pattern.frame_count(), 2 * 88 * 3);
        assert_eq!(SweepPattern::new(KeyboardModel::S88Mk2.profile(), 0).steps().count(), 0);
    }

    #[test]
    fn test_render_middle() {
        let profile = KeyboardModel::S61Mk1.profile();
        let pattern = SweepPattern::new(profile, 1);
        let mut buffer = LightBuffer::new(profile);
        let step = SweepStep {
            loop_index: 0,
            direction: SweepDirection::Forward,
            position: 10,
            delay: SWEEP_FRAME_DELAY,
        };
        pattern.render(&mut buffer, &step);
        assert_eq!(buffer.key(10), Some(&[0x7Fu8, 0, 0][..]));
        assert_eq!(buffer.key(9), Some(&[0x3Fu8, 0, 0][..]));
        assert_eq!(buffer.key(11), Some(&[0x3Fu8, 0, 0][..]));
        assert_eq!(buffer.key(8), Some(&[0x0Fu8, 0, 0][..]));
        assert_eq!(buffer.key(12), Some(&[0x0Fu8, 0, 0][..]));
        assert_eq!(buffer.key(13), Some(&[0u8, 0, 0][..]));
    }

    #[test]
    fn test_render_edges() {
        let profile = KeyboardModel::S49Mk2.profile();
        let pattern = SweepPattern::new(profile, 1);
        let mut buffer = LightBuffer::new(profile);
        let first = pattern.steps().next().unwrap();
        pattern.render(&mut buffer, &first);
        assert_eq!(&buffer.snapshot()[..5], &[0x81, 0x07, 0x05, 0x04, 0x00]);

        let last = pattern.steps().nth(48).unwrap();
        assert_eq!(last.position, 48);
        pattern.render(&mut buffer, &last);
        let frame = buffer.snapshot();
        assert_eq!(&frame[46..], &[0x00, 0x04, 0x05, 0x07]);
        assert_eq!(frame[0], 0x81);
    }

    #[test]
    fn test_play_sends_frames_then_off() {
        let profile = KeyboardModel::S25Mk1.profile();
        let pattern = SweepPattern::new(profile, 1);
        let mut buffer = LightBuffer::new(profile);
        let transport = RecordingTransport::new();
        let mut delays = Vec::new();

        let sent = pattern
            .play(&mut buffer, &transport, &CancelToken::new(), |d| delays.push(d))
            .unwrap();

        assert_eq!(sent, 50);
        assert_eq!(delays.len(), 50);
        let reports = transport.reports();
        assert_eq!(reports.len(), 51);
        assert!(reports[50][1..].iter().all(|&b| b == 0));
        assert!(buffer.is_dark());
    }

    #[test]
    fn test_play_cancelled_still_ends_dark() {
        let profile = KeyboardModel::S61Mk2.profile();
        let pattern = SweepPattern::new(profile, 2);
        let mut buffer = LightBuffer::new(profile);
        let transport = RecordingTransport::new();
        let cancel = CancelToken::new();

        let mut frames = 0;
        let sent = pattern
            .play(&mut buffer, &transport, &cancel, |_| {
                frames += 1;
                if frames == 5 {
                    cancel.cancel();
                }
            })
            .unwrap();

        assert_eq!(sent, 5);
        assert_eq!(transport.report_count(), 6);
        assert!(transport.last_report().unwrap()[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_play_propagates_write_error() {
        let profile = KeyboardModel::S25Mk1.profile();
        let pattern = SweepPattern::new(profile, 1);
        let mut buffer = LightBuffer::new(profile);
        let transport = RecordingTransport::new().failing_after(3);
        let result = pattern.play(&mut buffer, &transport, &CancelToken::new(), |_| {});
        assert!(matches!(result, Err(LightGuideError::Transport(_))));
        assert_eq!(transport.report_count(), 3);
    }
}
