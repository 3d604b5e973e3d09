//! fOS Inline Video
//!
//! Video playback for hosts that allow audio autoplay but block inline
//! video autoplay.
//!
//! Features:
//! - Video-element facade over a muted video sink and an audio sink
//! - Frame-driven playback loop on injected display-refresh callbacks
//! - `addEventListener`-style listeners and `on*` callback slots
//! - Audio source derivation from the video source
//!
//! # Example
//! ```rust
//! use fos_inline_video::{InlineVideo, ManualFrameHost, SimulatedMediaElement};
//!
//! let mut video = InlineVideo::new(
//!     SimulatedMediaElement::with_metadata(30.0),
//!     SimulatedMediaElement::with_metadata(30.0),
//!     ManualFrameHost::new(),
//!     None,
//! );
//! video.play();
//! video.host_mut().advance(500.0);
//! video.pump_frames();
//! assert!((video.current_time() - 0.5).abs() < 1e-9);
//! ```

pub mod config;
pub mod element;
pub mod events;
pub mod frame;
pub mod playback;
pub mod player;
pub mod src_mapper;

pub use config::{Config, ConfigError};
pub use element::{MediaError, MediaErrorCode, MediaSink, ReadyState, SimulatedMediaElement};
pub use events::{
    EventBridge, EventEmitter, EventHandler, EventType, ListenerId, MediaEvent, UnknownEvent,
};
pub use frame::{FrameHandle, FrameHost, FrameStats, ManualFrameHost};
pub use playback::{PlaybackContext, PlaybackLoop};
pub use player::{CommandQueue, InlineVideo, PlayerCommand, SinkEvent, SinkKind};
pub use src_mapper::{DEFAULT_AUDIO_EXTENSION, SrcMapper};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
