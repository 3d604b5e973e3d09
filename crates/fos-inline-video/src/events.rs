//! Media Events
//!
//! Named-event listeners plus the `on*` callback slots of a media element.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::element::MediaError;

/// Event names emitted by the inline player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Error,
    Playing,
    LoadedMetadata,
    Play,
    Pause,
    TimeUpdate,
    VolumeChange,
}

impl EventType {
    pub const ALL: [EventType; 7] = [
        EventType::Error,
        EventType::Playing,
        EventType::LoadedMetadata,
        EventType::Play,
        EventType::Pause,
        EventType::TimeUpdate,
        EventType::VolumeChange,
    ];

    /// DOM event name
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::Error => "error",
            EventType::Playing => "playing",
            EventType::LoadedMetadata => "loadedmetadata",
            EventType::Play => "play",
            EventType::Pause => "pause",
            EventType::TimeUpdate => "timeupdate",
            EventType::VolumeChange => "volumechange",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event name outside the supported set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown media event: {0}")]
pub struct UnknownEvent(pub String);

impl FromStr for EventType {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

/// Event delivered to listeners
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub event_type: EventType,
    /// Set for `error` events only
    pub error: Option<MediaError>,
}

impl MediaEvent {
    pub fn new(event_type: EventType) -> Self {
        Self { event_type, error: None }
    }

    pub fn error(error: MediaError) -> Self {
        Self { event_type: EventType::Error, error: Some(error) }
    }
}

/// Listener registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

pub type EventHandler = Box<dyn FnMut(&MediaEvent)>;

/// Multi-subscriber emitter
#[derive(Default)]
pub struct EventEmitter {
    listeners: HashMap<EventType, Vec<(ListenerId, EventHandler)>>,
    next_id: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener; handlers run in registration order
    pub fn subscribe<F>(&mut self, event_type: EventType, handler: F) -> ListenerId
    where
        F: FnMut(&MediaEvent) + 'static,
    {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners
            .entry(event_type)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove a listener. Returns false if it was not registered for `event_type`.
    pub fn unsubscribe(&mut self, event_type: EventType, id: ListenerId) -> bool {
        let Some(listeners) = self.listeners.get_mut(&event_type) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener, _)| *listener != id);
        listeners.len() != before
    }

    pub fn emit(&mut self, event: &MediaEvent) {
        if let Some(listeners) = self.listeners.get_mut(&event.event_type) {
            for (_, handler) in listeners.iter_mut() {
                handler(event);
            }
        }
    }

    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.listeners.get(&event_type).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self
            .listeners
            .iter()
            .map(|(event_type, listeners)| (*event_type, listeners.len()))
            .collect();
        f.debug_struct("EventEmitter").field("listeners", &counts).finish()
    }
}

/// Listener channel plus `onerror`, `onplaying` and `onloadedmetadata` slots.
///
/// A slot fires whenever its event is emitted, ahead of the subscribed
/// listeners.
#[derive(Default)]
pub struct EventBridge {
    emitter: EventEmitter,
    on_error: Option<EventHandler>,
    on_playing: Option<EventHandler>,
    on_loaded_metadata: Option<EventHandler>,
}

impl EventBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, event_type: EventType, handler: F) -> ListenerId
    where
        F: FnMut(&MediaEvent) + 'static,
    {
        self.emitter.subscribe(event_type, handler)
    }

    pub fn unsubscribe(&mut self, event_type: EventType, id: ListenerId) -> bool {
        self.emitter.unsubscribe(event_type, id)
    }

    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.emitter.listener_count(event_type)
    }

    pub fn set_on_error(&mut self, handler: Option<EventHandler>) {
        self.on_error = handler;
    }

    pub fn set_on_playing(&mut self, handler: Option<EventHandler>) {
        self.on_playing = handler;
    }

    pub fn set_on_loaded_metadata(&mut self, handler: Option<EventHandler>) {
        self.on_loaded_metadata = handler;
    }

    pub fn emit(&mut self, event: &MediaEvent) {
        tracing::trace!("emit {}", event.event_type);

        let slot = match event.event_type {
            EventType::Error => self.on_error.as_mut(),
            EventType::Playing => self.on_playing.as_mut(),
            EventType::LoadedMetadata => self.on_loaded_metadata.as_mut(),
            _ => None,
        };
        if let Some(handler) = slot {
            handler(event);
        }

        self.emitter.emit(event);
    }

    /// Emit an event without payload
    pub fn emit_type(&mut self, event_type: EventType) {
        self.emit(&MediaEvent::new(event_type));
    }
}

impl fmt::Debug for EventBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBridge")
            .field("emitter", &self.emitter)
            .field("on_error", &self.on_error.is_some())
            .field("on_playing", &self.on_playing.is_some())
            .field("on_loaded_metadata", &self.on_loaded_metadata.is_some())
            .finish()
    }
}
