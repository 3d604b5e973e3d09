//! Inline Video Player
//!
//! A video-element facade backed by a muted video sink and an audible audio
//! sink. Calling code sees one player; the playback loop keeps the two
//! elements moving together.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::config::{Config, ConfigError};
use crate::element::{MediaError, MediaSink};
use crate::events::{EventBridge, EventHandler, EventType, ListenerId, MediaEvent};
use crate::frame::{FrameHandle, FrameHost, ManualFrameHost};
use crate::playback::{PlaybackContext, PlaybackLoop};
use crate::src_mapper::SrcMapper;

/// Which sink a notification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Video,
    Audio,
}

/// Notification raised by a sink
#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    LoadedMetadata,
    Error(MediaError),
}

/// Request queued by code that cannot borrow the player, such as a listener
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
}

/// Shared queue of [`PlayerCommand`]s.
///
/// Clones share one queue. The player applies queued commands once the call
/// that dispatched the current events returns.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue(Rc<RefCell<VecDeque<PlayerCommand>>>);

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: PlayerCommand) {
        self.0.borrow_mut().push_back(command);
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    fn take(&self) -> VecDeque<PlayerCommand> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Inline video player
#[derive(Debug)]
pub struct InlineVideo<V, A, H> {
    video: V,
    audio: A,
    host: H,
    mapper: SrcMapper,
    events: EventBridge,
    playback: PlaybackLoop,
    commands: CommandQueue,
}

impl<V, A, H> InlineVideo<V, A, H>
where
    V: MediaSink,
    A: MediaSink,
    H: FrameHost,
{
    /// Wrap the two sinks. The video sink is muted for the player's lifetime.
    ///
    /// Without a mapper, audio sources are derived by swapping the video
    /// source's extension for `.mp3`.
    pub fn new(mut video: V, audio: A, host: H, mapper: Option<SrcMapper>) -> Self {
        video.set_volume(0.0);
        Self {
            video,
            audio,
            host,
            mapper: mapper.unwrap_or_default(),
            events: EventBridge::new(),
            playback: PlaybackLoop::new(),
            commands: CommandQueue::new(),
        }
    }

    /// Build a player from configuration. Fails before either sink is touched.
    pub fn with_config(video: V, audio: A, host: H, config: &Config) -> Result<Self, ConfigError> {
        let mapper = config.src_mapper()?;
        Ok(Self::new(video, audio, host, Some(mapper)))
    }

    // === Sinks ===

    pub fn video_element(&self) -> &V {
        &self.video
    }

    pub fn video_element_mut(&mut self) -> &mut V {
        &mut self.video
    }

    pub fn audio_element(&self) -> &A {
        &self.audio
    }

    pub fn audio_element_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // === Attributes (forwarded to the video sink) ===

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.video.get_attribute(name)
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.video.set_attribute(name, value);
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.video.remove_attribute(name);
    }

    // === Properties ===

    pub fn src(&self) -> &str {
        self.video.src()
    }

    /// Point both sinks at new media.
    ///
    /// The video sink is reloaded right away so a frame shows before playback
    /// or seeking; the audio source comes from the mapper. No seek is done and
    /// metadata is not awaited.
    pub fn set_src(&mut self, src: &str) {
        self.video.set_src(src);
        self.video.load();

        let audio_src = self.mapper.map(src);
        tracing::debug!("Source {} (audio {})", src, audio_src);
        self.audio.set_src(&audio_src);
    }

    /// Position of the video sink, in seconds
    pub fn current_time(&self) -> f64 {
        self.video.current_time()
    }

    /// Seek both sinks to `time`
    pub fn set_current_time(&mut self, time: f64) {
        self.video.set_current_time(time);
        self.audio.set_current_time(time);
    }

    pub fn volume(&self) -> f64 {
        self.audio.volume()
    }

    /// Set the audio sink's volume, emitting `volumechange` if it changed
    pub fn set_volume(&mut self, volume: f64) {
        self.apply_volume(volume);
        self.run_queued_commands();
    }

    fn apply_volume(&mut self, volume: f64) {
        let changed = self.audio.volume() != volume;
        self.audio.set_volume(volume);
        if changed {
            self.events.emit_type(EventType::VolumeChange);
        }
    }

    pub fn duration(&self) -> f64 {
        self.video.duration()
    }

    /// True unless the playback loop holds a frame request
    pub fn paused(&self) -> bool {
        !self.playback.is_running()
    }

    // === Playback ===

    pub fn play(&mut self) {
        let (playback, mut cx) = self.split();
        playback.play(&mut cx);
        self.run_queued_commands();
    }

    pub fn pause(&mut self) {
        let (playback, mut cx) = self.split();
        playback.pause(&mut cx);
        self.run_queued_commands();
    }

    /// Dispatch a fired animation frame. Returns false if the frame was stale.
    pub fn on_animation_frame(&mut self, handle: FrameHandle) -> bool {
        let (playback, mut cx) = self.split();
        let ran = playback.on_animation_frame(handle, &mut cx);
        self.run_queued_commands();
        ran
    }

    /// Deliver a notification from one of the sinks.
    ///
    /// Video metadata is re-emitted as `loadedmetadata`; errors from either
    /// sink are forwarded as `error`.
    pub fn handle_sink_event(&mut self, kind: SinkKind, event: SinkEvent) {
        match (kind, event) {
            (SinkKind::Video, SinkEvent::LoadedMetadata) => {
                self.events.emit_type(EventType::LoadedMetadata);
            }
            (SinkKind::Audio, SinkEvent::LoadedMetadata) => {}
            (kind, SinkEvent::Error(error)) => {
                tracing::warn!("{:?} sink error: {}", kind, error);
                self.events.emit(&MediaEvent::error(error));
            }
        }
        self.run_queued_commands();
    }

    /// Handle for queueing commands from listeners
    pub fn command_queue(&self) -> CommandQueue {
        self.commands.clone()
    }

    /// Apply the commands queued so far. Commands queued while these run wait
    /// for the next dispatch.
    fn run_queued_commands(&mut self) {
        for command in self.commands.take() {
            tracing::trace!("Applying queued {:?}", command);
            match command {
                PlayerCommand::Play => {
                    let (playback, mut cx) = self.split();
                    playback.play(&mut cx);
                }
                PlayerCommand::Pause => {
                    let (playback, mut cx) = self.split();
                    playback.pause(&mut cx);
                }
                PlayerCommand::Seek(time) => self.set_current_time(time),
                PlayerCommand::SetVolume(volume) => self.apply_volume(volume),
            }
        }
    }

    fn split(&mut self) -> (&mut PlaybackLoop, PlaybackContext<'_>) {
        let cx = PlaybackContext {
            video: &mut self.video,
            audio: &mut self.audio,
            host: &mut self.host,
            events: &mut self.events,
        };
        (&mut self.playback, cx)
    }

    // === Events ===

    /// Listen for `event_type`.
    ///
    /// Handlers run while the player is mutably borrowed, so they cannot call
    /// back into it. To pause, seek or change volume from a handler, push a
    /// [`PlayerCommand`] onto [`command_queue`](Self::command_queue); it runs
    /// as soon as the current dispatch finishes.
    pub fn add_event_listener<F>(&mut self, event_type: EventType, handler: F) -> ListenerId
    where
        F: FnMut(&MediaEvent) + 'static,
    {
        self.events.subscribe(event_type, handler)
    }

    pub fn remove_event_listener(&mut self, event_type: EventType, id: ListenerId) -> bool {
        self.events.unsubscribe(event_type, id)
    }

    /// Emit an event to the slot callback and listeners
    pub fn emit(&mut self, event: &MediaEvent) {
        self.events.emit(event);
        self.run_queued_commands();
    }

    pub fn set_onerror(&mut self, handler: Option<EventHandler>) {
        self.events.set_on_error(handler);
    }

    pub fn set_onplaying(&mut self, handler: Option<EventHandler>) {
        self.events.set_on_playing(handler);
    }

    pub fn set_onloadedmetadata(&mut self, handler: Option<EventHandler>) {
        self.events.set_on_loaded_metadata(handler);
    }

    pub fn events(&self) -> &EventBridge {
        &self.events
    }
}

impl<V, A> InlineVideo<V, A, ManualFrameHost>
where
    V: MediaSink,
    A: MediaSink,
{
    /// Run one display refresh: dispatch every frame the host has due.
    /// Returns the number of ticks that ran.
    pub fn pump_frames(&mut self) -> usize {
        let due = self.host.take_due_frames();
        due.into_iter()
            .filter(|handle| self.on_animation_frame(*handle))
            .count()
    }
}
