//! Source Mapping
//!
//! Derives the audio track's source from the video source.

use std::fmt;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};

/// Extension appended by the default mapping
pub const DEFAULT_AUDIO_EXTENSION: &str = "mp3";

static TRAILING_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.[a-zA-Z0-9]+$").expect("extension pattern is valid")
});

/// How an audio source is derived from a video source
pub enum SrcMapper {
    /// Replace the trailing extension
    Extension(String),
    /// Same audio source for every video
    Constant(String),
    /// Caller-supplied mapping
    Custom(Box<dyn Fn(&str) -> String>),
}

impl SrcMapper {
    /// Mapper used when none is configured: `movie.mp4` becomes `movie.mp3`
    pub fn new() -> Self {
        Self::Extension(DEFAULT_AUDIO_EXTENSION.to_string())
    }

    pub fn constant(audio_src: impl Into<String>) -> Self {
        Self::Constant(audio_src.into())
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + 'static,
    {
        Self::Custom(Box::new(f))
    }

    /// Audio source for `video_src`
    pub fn map(&self, video_src: &str) -> String {
        match self {
            Self::Extension(extension) => replace_extension(video_src, extension),
            Self::Constant(audio_src) => audio_src.clone(),
            Self::Custom(f) => f(video_src),
        }
    }
}

impl Default for SrcMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SrcMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extension(extension) => f.debug_tuple("Extension").field(extension).finish(),
            Self::Constant(audio_src) => f.debug_tuple("Constant").field(audio_src).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for SrcMapper {
    fn from(audio_src: &str) -> Self {
        Self::constant(audio_src)
    }
}

impl From<String> for SrcMapper {
    fn from(audio_src: String) -> Self {
        Self::Constant(audio_src)
    }
}

/// Swap a trailing `.ext` for `.{extension}`. Sources without one are returned as-is.
fn replace_extension(src: &str, extension: &str) -> String {
    let replacement = format!(".{extension}");
    TRAILING_EXTENSION
        .replace(src, NoExpand(&replacement))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_swaps_extension() {
        let mapper = SrcMapper::default();
        assert_eq!(mapper.map("clip/movie.mp4"), "clip/movie.mp3");
        assert_eq!(mapper.map("https://cdn.example/intro.webm"), "https://cdn.example/intro.mp3");
    }

    #[test]
    fn test_default_without_extension() {
        let mapper = SrcMapper::default();
        assert_eq!(mapper.map("clip"), "clip");
        assert_eq!(mapper.map(""), "");
        // Dot inside a directory name is not an extension
        assert_eq!(mapper.map("v1.2/clip"), "v1.2/clip");
    }

    #[test]
    fn test_default_only_last_extension() {
        let mapper = SrcMapper::default();
        assert_eq!(mapper.map("movie.final.mov"), "movie.final.mp3");
        assert_eq!(mapper.map("movie.mp4?t=1"), "movie.mp4?t=1");
    }

    #[test]
    fn test_custom_extension_is_literal() {
        let mapper = SrcMapper::Extension("$1".to_string());
        assert_eq!(mapper.map("a.mp4"), "a.$1");
    }

    #[test]
    fn test_constant_ignores_input() {
        let mapper = SrcMapper::from("soundtrack.aac");
        assert_eq!(mapper.map("a.mp4"), "soundtrack.aac");
        assert_eq!(mapper.map("b.webm"), "soundtrack.aac");
    }

    #[test]
    fn test_custom_mapper_used_verbatim() {
        let mapper = SrcMapper::custom(|src| format!("{src}#audio"));
        assert_eq!(mapper.map("a.mp4"), "a.mp4#audio");
        assert_eq!(format!("{:?}", mapper), "Custom(..)");
    }
}
