//! Fake Playback Loop
//!
//! Advances the silent video from wall-clock deltas on every display refresh
//! while the audio element plays on its own.

use crate::element::MediaSink;
use crate::events::{EventBridge, EventType};
use crate::frame::{FrameHandle, FrameHost};

/// Everything a tick touches, borrowed from the owning player
pub struct PlaybackContext<'a> {
    pub video: &'a mut dyn MediaSink,
    pub audio: &'a mut dyn MediaSink,
    pub host: &'a mut dyn FrameHost,
    pub events: &'a mut EventBridge,
}

/// Idle/Running state machine.
///
/// The outstanding frame request *is* the running state: the loop is running
/// exactly when a request is held, whatever the sinks' own pause flags say.
#[derive(Debug, Default)]
pub struct PlaybackLoop {
    frame_request: Option<FrameHandle>,
    playing_emitted: bool,
    last_tick_ms: f64,
}

impl PlaybackLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.frame_request.is_some()
    }

    /// Currently outstanding frame request
    pub fn frame_request(&self) -> Option<FrameHandle> {
        self.frame_request
    }

    /// Start the loop. Does nothing if it is already running.
    ///
    /// Re-seeds the audio clock from the video clock and runs the first tick
    /// immediately, which leaves one frame request outstanding.
    pub fn play(&mut self, cx: &mut PlaybackContext<'_>) {
        if self.is_running() {
            return;
        }

        let position = cx.video.current_time();
        cx.audio.set_current_time(position);
        tracing::debug!("Starting playback at {:.3}s", position);

        self.playing_emitted = false;
        self.last_tick_ms = cx.host.now_ms();
        self.tick(cx);
    }

    /// Stop the loop. Emits `pause` even when the loop was not running.
    pub fn pause(&mut self, cx: &mut PlaybackContext<'_>) {
        cx.audio.pause();
        if let Some(handle) = self.frame_request.take() {
            cx.host.cancel_animation_frame(handle);
            tracing::debug!("Paused at {:.3}s", cx.video.current_time());
        }
        cx.events.emit_type(EventType::Pause);
    }

    /// Run the tick for a fired frame request.
    ///
    /// Returns false for a handle that is not the outstanding request; such a
    /// frame was cancelled or superseded and is ignored.
    pub fn on_animation_frame(
        &mut self,
        handle: FrameHandle,
        cx: &mut PlaybackContext<'_>,
    ) -> bool {
        if self.frame_request != Some(handle) {
            tracing::trace!("Ignoring stale frame {:?}", handle);
            return false;
        }
        self.tick(cx);
        true
    }

    fn tick(&mut self, cx: &mut PlaybackContext<'_>) {
        // Reschedule first so the running state holds even if this tick skips
        self.frame_request = Some(cx.host.request_animation_frame());

        let now = cx.host.now_ms();

        if cx.video.ready_state().has_metadata() && cx.audio.ready_state().has_metadata() {
            if cx.audio.paused() {
                cx.audio.play();
            }

            let elapsed = (now - self.last_tick_ms) / 1000.0;
            let position = cx.video.current_time() + elapsed;
            cx.video.set_current_time(position);
            cx.events.emit_type(EventType::TimeUpdate);

            if !self.playing_emitted {
                cx.events.emit_type(EventType::Play);
                cx.events.emit_type(EventType::Playing);
                self.playing_emitted = true;
            }
        }

        self.last_tick_ms = now;
    }
}
