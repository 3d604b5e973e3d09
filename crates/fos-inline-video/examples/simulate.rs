//! Example: drive an inline video through two seconds of fake playback
//!
//! Run with `RUST_LOG=fos_inline_video=debug` to see the state transitions.

use fos_inline_video::{
    EventType, InlineVideo, ManualFrameHost, MediaSink, SimulatedMediaElement, SinkEvent,
    SinkKind,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut video = InlineVideo::new(
        SimulatedMediaElement::new(),
        SimulatedMediaElement::new(),
        ManualFrameHost::new(),
        None,
    );

    video.add_event_listener(EventType::Playing, |_| println!("playing"));
    video.add_event_listener(EventType::Pause, |_| println!("paused"));

    video.set_src("media/intro.mp4");
    println!("video {} / audio {}", video.src(), video.audio_element().src());

    video.play();

    // Metadata shows up a few frames after playback was requested
    for frame in 0..120 {
        if frame == 5 {
            video.video_element_mut().finish_loading_metadata(30.0);
            video.audio_element_mut().finish_loading_metadata(30.0);
            video.handle_sink_event(SinkKind::Video, SinkEvent::LoadedMetadata);
        }
        video.host_mut().advance(1000.0 / 60.0);
        video.pump_frames();
    }

    println!("position {:.2}s of {:.0}s", video.current_time(), video.duration());
    video.pause();
}
