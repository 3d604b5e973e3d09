//! Media Elements
//!
//! The sink contract the inline player drives, plus an in-memory element
//! for hosts without a real decoder.

use std::collections::HashMap;

/// Ready state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    #[default]
    HaveNothing = 0,
    HaveMetadata = 1,
    HaveCurrentData = 2,
    HaveFutureData = 3,
    HaveEnoughData = 4,
}

impl ReadyState {
    /// Duration and seekability are known
    pub fn has_metadata(self) -> bool {
        self >= ReadyState::HaveMetadata
    }
}

/// Media error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaErrorCode {
    Aborted = 1,
    Network = 2,
    Decode = 3,
    SrcNotSupported = 4,
}

/// Error reported by a sink
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{code:?}: {message}")]
pub struct MediaError {
    pub code: MediaErrorCode,
    pub message: String,
}

impl MediaError {
    pub fn new(code: MediaErrorCode, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

/// Operations a media element must offer to be driven by the inline player.
///
/// `play()` is fire-and-forget: a sink that starts asynchronously reports
/// failure later through its own error notification, never through the call.
pub trait MediaSink {
    fn src(&self) -> &str;
    fn set_src(&mut self, src: &str);

    /// Reload the current source
    fn load(&mut self);

    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, time: f64);

    fn duration(&self) -> f64;

    fn volume(&self) -> f64;
    fn set_volume(&mut self, volume: f64);

    fn ready_state(&self) -> ReadyState;

    fn paused(&self) -> bool;
    fn play(&mut self);
    fn pause(&mut self);

    fn get_attribute(&self, name: &str) -> Option<&str>;
    fn set_attribute(&mut self, name: &str, value: &str);
    fn remove_attribute(&mut self, name: &str);
}

/// In-memory media element.
///
/// Nothing is decoded: readiness only changes through [`load`](MediaSink::load),
/// [`set_src`](MediaSink::set_src) and
/// [`finish_loading_metadata`](Self::finish_loading_metadata), and time only
/// moves when it is written.
#[derive(Debug, Clone)]
pub struct SimulatedMediaElement {
    src: String,
    ready_state: ReadyState,
    current_time: f64,
    duration: f64,
    volume: f64,
    paused: bool,
    error: Option<MediaError>,
    attributes: HashMap<String, String>,
    load_count: u32,
    play_count: u32,
}

impl SimulatedMediaElement {
    pub fn new() -> Self {
        Self {
            src: String::new(),
            ready_state: ReadyState::HaveNothing,
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            paused: true,
            error: None,
            attributes: HashMap::new(),
            load_count: 0,
            play_count: 0,
        }
    }

    /// Create an element whose metadata is already available
    pub fn with_metadata(duration: f64) -> Self {
        let mut element = Self::new();
        element.finish_loading_metadata(duration);
        element
    }

    /// Metadata arrived: duration is known and seeking is possible
    pub fn finish_loading_metadata(&mut self, duration: f64) {
        self.duration = duration;
        if self.ready_state < ReadyState::HaveMetadata {
            self.ready_state = ReadyState::HaveMetadata;
        }
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    /// Last error, if any
    pub fn error(&self) -> Option<&MediaError> {
        self.error.as_ref()
    }

    /// Number of `load()` calls so far
    pub fn load_count(&self) -> u32 {
        self.load_count
    }

    /// Number of `play()` requests so far, successful or not
    pub fn play_count(&self) -> u32 {
        self.play_count
    }

    /// Drop everything known about the previous media
    fn reset_media(&mut self) {
        self.ready_state = ReadyState::HaveNothing;
        self.duration = f64::NAN;
        self.current_time = 0.0;
        self.paused = true;
        self.error = None;
    }
}

impl Default for SimulatedMediaElement {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSink for SimulatedMediaElement {
    fn src(&self) -> &str {
        &self.src
    }

    /// A new source starts over like a reload
    fn set_src(&mut self, src: &str) {
        self.src = src.to_string();
        self.reset_media();
    }

    fn load(&mut self) {
        self.load_count += 1;
        self.reset_media();
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, time: f64) {
        let time = time.max(0.0);
        self.current_time = if self.duration.is_finite() {
            time.min(self.duration)
        } else {
            time
        };
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) {
        self.play_count += 1;
        if self.ready_state == ReadyState::HaveNothing {
            self.error = Some(MediaError::new(MediaErrorCode::Aborted, "Not enough data"));
            return;
        }
        self.paused = false;
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_element() {
        let element = SimulatedMediaElement::new();
        assert!(element.paused());
        assert_eq!(element.volume(), 1.0);
        assert!(element.duration().is_nan());
        assert!(!element.ready_state().has_metadata());
    }

    #[test]
    fn test_load_resets_state() {
        let mut element = SimulatedMediaElement::with_metadata(10.0);
        element.set_current_time(4.0);
        element.play();
        element.load();

        assert_eq!(element.ready_state(), ReadyState::HaveNothing);
        assert_eq!(element.current_time(), 0.0);
        assert!(element.paused());
        assert_eq!(element.load_count(), 1);
    }

    #[test]
    fn test_set_src_forgets_previous_media() {
        let mut element = SimulatedMediaElement::with_metadata(10.0);
        element.set_current_time(6.0);
        element.play();
        element.set_src("next.mp3");

        assert_eq!(element.src(), "next.mp3");
        assert_eq!(element.ready_state(), ReadyState::HaveNothing);
        assert!(element.duration().is_nan());
        assert_eq!(element.current_time(), 0.0);
        assert!(element.paused());
        assert_eq!(element.load_count(), 0);
    }

    #[test]
    fn test_play_without_data_fails_quietly() {
        let mut element = SimulatedMediaElement::new();
        element.play();
        assert!(element.paused());
        assert_eq!(element.error().map(|e| e.code), Some(MediaErrorCode::Aborted));
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let mut element = SimulatedMediaElement::with_metadata(5.0);
        element.set_current_time(7.5);
        assert_eq!(element.current_time(), 5.0);
        element.set_current_time(-1.0);
        assert_eq!(element.current_time(), 0.0);
    }

    #[test]
    fn test_seek_without_metadata_is_unclamped() {
        let mut element = SimulatedMediaElement::new();
        element.set_current_time(42.0);
        assert_eq!(element.current_time(), 42.0);
    }

    #[test]
    fn test_attributes() {
        let mut element = SimulatedMediaElement::new();
        element.set_attribute("poster", "still.jpg");
        assert_eq!(element.get_attribute("poster"), Some("still.jpg"));
        element.remove_attribute("poster");
        assert_eq!(element.get_attribute("poster"), None);
    }

    #[test]
    fn test_ready_state_ordering() {
        assert!(ReadyState::HaveEnoughData.has_metadata());
        assert!(ReadyState::HaveMetadata.has_metadata());
        assert!(!ReadyState::HaveNothing.has_metadata());
    }
}
