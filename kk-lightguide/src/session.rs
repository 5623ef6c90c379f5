//! Connected Light Guide session
//!
//! A session owns the transport, the frame buffer and the note source. On
//! connect it switches the keyboard into Light Guide mode, then hands
//! everything to one worker thread that plays the sweep and listens for
//! notes until cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use kk_transport::protocol::LIGHT_GUIDE_MODE;
use kk_transport::Transport;
use tracing::{debug, info, warn};

use crate::buffer::LightBuffer;
use crate::color::{encode_all, ColorAssignments, EncodedColorList};
use crate::error::LightGuideError;
use crate::event::NoteSource;
use crate::mapper::NoteMapper;
use crate::palette::PaletteMap;
use crate::profile::DeviceProfile;
use crate::sweep::{SweepPattern, DEFAULT_SWEEP_LOOPS};

/// Default sleep between empty polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Default time `stop` waits for the worker
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Shared cancellation flag
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything a session needs besides its transport and note source
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub profile: DeviceProfile,
    pub colors: ColorAssignments,
    /// Palette map for MK2 keyboards; `None` uses the built-in indices
    pub palette: Option<PaletteMap>,
    pub sweep_loops: u32,
    pub poll_interval: Duration,
    pub shutdown_timeout: Duration,
}

impl SessionConfig {
    pub fn new(profile: DeviceProfile) -> Self {
        Self {
            profile,
            colors: ColorAssignments::default(),
            palette: None,
            sweep_loops: DEFAULT_SWEEP_LOOPS,
            poll_interval: DEFAULT_POLL_INTERVAL,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    pub fn with_colors(mut self, colors: ColorAssignments) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_palette(mut self, palette: Option<PaletteMap>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_sweep_loops(mut self, loops: u32) -> Self {
        self.sweep_loops = loops;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    /// The 13 slots encoded for this profile
    pub fn encoded_colors(&self) -> EncodedColorList {
        encode_all(&self.profile, &self.colors, self.palette.as_ref())
    }
}

/// Counters reported when a session ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Sweep frames sent (final all-off frame excluded)
    pub sweep_frames: usize,
    /// Note events received from the source
    pub events: usize,
    /// Color frames sent in response to events
    pub frames_sent: usize,
}

type WorkerResult = Result<SessionStats, LightGuideError>;

/// A running Light Guide session
///
/// Dropping the session cancels the worker without waiting for it.
pub struct LightGuideSession {
    profile: DeviceProfile,
    cancel: CancelToken,
    shutdown_timeout: Duration,
    done_rx: flume::Receiver<WorkerResult>,
    handle: Option<JoinHandle<()>>,
}

impl LightGuideSession {
    /// Connect to a keyboard and start the worker
    ///
    /// Sends the Light Guide mode command, opens the note source and sends
    /// one all-off frame before the worker starts. If any of that fails the
    /// transport is closed before the error is returned.
    pub fn connect<T, S, F>(
        config: SessionConfig,
        transport: T,
        open_source: F,
    ) -> Result<Self, LightGuideError>
    where
        T: Transport + 'static,
        S: NoteSource + 'static,
        F: FnOnce() -> Result<S, LightGuideError>,
    {
        info!("Connecting to {}", transport.device_info().describe());

        let mut buffer = LightBuffer::new(&config.profile);
        let source = match prepare(&transport, &mut buffer, open_source) {
            Ok(source) => source,
            Err(e) => {
                if let Err(close_err) = transport.close() {
                    warn!("Failed to close transport: {close_err}");
                }
                return Err(e);
            }
        };

        let cancel = CancelToken::new();
        let (done_tx, done_rx) = flume::bounded(1);
        let worker = Worker {
            mapper: NoteMapper::new(&config.profile, config.encoded_colors()),
            sweep: SweepPattern::new(&config.profile, config.sweep_loops),
            poll_interval: config.poll_interval,
            buffer,
            transport,
            source,
            cancel: cancel.clone(),
        };

        let handle = thread::Builder::new()
            .name("light-guide".into())
            .spawn(move || {
                let result = worker.run();
                // Receiver may already be gone if the session was dropped
                let _ = done_tx.send(result);
            })?;

        Ok(Self {
            profile: config.profile,
            cancel,
            shutdown_timeout: config.shutdown_timeout,
            done_rx,
            handle: Some(handle),
        })
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Token that stops the worker when cancelled
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Whether the worker is still running
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the worker and wait up to the shutdown timeout for it to finish
    pub fn stop(mut self) -> Result<SessionStats, LightGuideError> {
        self.cancel.cancel();
        match self.done_rx.recv_timeout(self.shutdown_timeout) {
            Ok(result) => self.finish(result),
            Err(flume::RecvTimeoutError::Timeout) => {
                warn!(
                    "Light Guide worker still running after {:?}",
                    self.shutdown_timeout
                );
                Err(LightGuideError::ShutdownTimeout(self.shutdown_timeout))
            }
            Err(flume::RecvTimeoutError::Disconnected) => {
                self.finish(Err(LightGuideError::WorkerPanicked))
            }
        }
    }

    /// Block until the worker ends on its own or through the cancel token
    pub fn wait(mut self) -> Result<SessionStats, LightGuideError> {
        let result = self
            .done_rx
            .recv()
            .unwrap_or(Err(LightGuideError::WorkerPanicked));
        self.finish(result)
    }

    fn finish(&mut self, result: WorkerResult) -> WorkerResult {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                return Err(LightGuideError::WorkerPanicked);
            }
        }
        result
    }
}

impl Drop for LightGuideSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn prepare<T, S, F>(
    transport: &T,
    buffer: &mut LightBuffer,
    open_source: F,
) -> Result<S, LightGuideError>
where
    T: Transport,
    F: FnOnce() -> Result<S, LightGuideError>,
{
    transport.send_report(&[LIGHT_GUIDE_MODE])?;
    let source = open_source()?;
    buffer.clear();
    transport.send_report(buffer.snapshot())?;
    Ok(source)
}

/// State moved onto the worker thread
struct Worker<T, S> {
    mapper: NoteMapper,
    sweep: SweepPattern,
    poll_interval: Duration,
    buffer: LightBuffer,
    transport: T,
    source: S,
    cancel: CancelToken,
}

impl<T: Transport, S: NoteSource> Worker<T, S> {
    fn run(mut self) -> WorkerResult {
        let mut stats = SessionStats::default();
        let result = self.sweep_then_listen(&mut stats);
        if let Err(ref e) = result {
            warn!("Light Guide worker stopped: {e}");
        }

        self.buffer.clear();
        if let Err(e) = self.transport.send_report(self.buffer.snapshot()) {
            debug!("Final all-off frame not sent: {e}");
        }
        self.source.close();
        if let Err(e) = self.transport.close() {
            warn!("Failed to close transport: {e}");
        }
        info!(
            "Session ended: {} event(s), {} frame(s)",
            stats.events, stats.frames_sent
        );
        result.map(|()| stats)
    }

    fn sweep_then_listen(&mut self, stats: &mut SessionStats) -> Result<(), LightGuideError> {
        stats.sweep_frames = self.sweep.play(
            &mut self.buffer,
            &self.transport,
            &self.cancel,
            thread::sleep,
        )?;
        info!("Listening for notes");

        while !self.cancel.is_cancelled() {
            let events = self.source.poll();
            if events.is_empty() {
                thread::sleep(self.poll_interval);
                continue;
            }
            for event in &events {
                stats.events += 1;
                if self.mapper.apply(&mut self.buffer, event) {
                    self.transport.send_report(self.buffer.snapshot())?;
                    stats.frames_sent += 1;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ChannelNoteSource;
    use crate::profile::KeyboardModel;
    use kk_transport::RecordingTransport;

    #[test]
    fn test_cancel_token_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_config_defaults() {
        let config = SessionConfig::new(*KeyboardModel::S61Mk1.profile());
        assert_eq!(config.sweep_loops, 2);
        assert_eq!(config.poll_interval, Duration::from_millis(1));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(2));
        assert!(config.palette.is_none());
    }

    #[test]
    fn test_connect_sends_mode_then_off() {
        let transport = Arc::new(RecordingTransport::new());
        let config = SessionConfig::new(*KeyboardModel::S61Mk1.profile()).with_sweep_loops(0);
        let (_tx, source) = ChannelNoteSource::pair();

        let session =
            LightGuideSession::connect(config, Arc::clone(&transport), move || Ok(source)).unwrap();
        let stats = session.stop().unwrap();

        let reports = transport.reports();
        assert_eq!(reports[0], vec![0xA0]);
        assert_eq!(reports[1].len(), 184);
        assert_eq!(reports[1][0], 0x82);
        assert_eq!(stats.sweep_frames, 0);
        assert!(!transport.is_connected());
    }
}
