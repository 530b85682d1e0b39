pub mod audio;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod summarize;
pub mod whisper;
pub mod youtube;

pub use error::{Error, Result};

use serde::Serialize;

/// A single timestamped transcript segment
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    /// Present only for transcription-derived segments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

/// Source of the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TranscriptSource {
    Caption,
    Whisper,
}

/// Complete transcript for a video
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub title: String,
    pub language: String,
    pub source: TranscriptSource,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Space-joined text of all segments, in order. Derived on demand so it
    /// can never drift from `segments`.
    pub fn flat_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for TranscriptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptSource::Caption => write!(f, "caption"),
            TranscriptSource::Whisper => write!(f, "whisper"),
        }
    }
}

/// Passthrough network configuration for the caption fetch and audio download.
/// Neither value is inspected beyond existence.
#[derive(Debug, Clone, Default)]
pub struct NetworkOptions {
    pub proxy: Option<String>,
    pub cookies: Option<std::path::PathBuf>,
}

/// Outcome of parsing a user-supplied URL or video ID
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedUrl {
    Video(String),
    Playlist,
    Invalid,
}

/// Extract a video ID from the supported YouTube URL forms.
///
/// Playlist links (`list=` with no `v=`) are reported as [`ParsedUrl::Playlist`]
/// rather than treated as a failure. No network access occurs here.
pub fn extract_video_id(input: &str) -> ParsedUrl {
    let input = input.trim();

    // Bare 11-character video ID
    if regex::Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap().is_match(input) {
        return ParsedUrl::Video(input.to_string());
    }

    // youtu.be/ID — path segment after the last slash, query stripped
    if input.contains("youtu.be/") {
        let tail = input.rsplit('/').next().unwrap_or("");
        let id = tail.split('?').next().unwrap_or("");
        if id.is_empty() {
            return ParsedUrl::Invalid;
        }
        return ParsedUrl::Video(id.to_string());
    }

    if input.contains("youtube.com") {
        // youtube.com/watch?v=ID — value up to the next '&'
        if let Some((_, rest)) = input.split_once("v=") {
            let id = rest.split('&').next().unwrap_or("");
            if !id.is_empty() {
                return ParsedUrl::Video(id.to_string());
            }
        } else if input.contains("list=") {
            return ParsedUrl::Playlist;
        }
        return ParsedUrl::Invalid;
    }

    ParsedUrl::Invalid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_video_id() {
        assert_eq!(
            extract_video_id("dQw4w9WgXcQ"),
            ParsedUrl::Video("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            ParsedUrl::Video("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
            ParsedUrl::Video("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            ParsedUrl::Video("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url_with_query() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc123"),
            ParsedUrl::Video("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_playlist_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/playlist?list=PL123abc"),
            ParsedUrl::Playlist
        );
    }

    #[test]
    fn test_watch_url_with_list_param_is_video() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123abc"),
            ParsedUrl::Video("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_invalid_host() {
        assert_eq!(extract_video_id("https://vimeo.com/12345"), ParsedUrl::Invalid);
    }

    #[test]
    fn test_invalid_id() {
        assert_eq!(extract_video_id("not-a-valid-id"), ParsedUrl::Invalid);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), ParsedUrl::Invalid);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(
            extract_video_id("  dQw4w9WgXcQ  "),
            ParsedUrl::Video("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_flat_text_is_space_joined() {
        let t = Transcript {
            video_id: "test123".to_string(),
            title: "Test".to_string(),
            language: "en".to_string(),
            source: TranscriptSource::Caption,
            segments: vec![
                Segment {
                    text: "Hello world".to_string(),
                    start: 0.0,
                    end: None,
                },
                Segment {
                    text: "This is a test".to_string(),
                    start: 1.5,
                    end: None,
                },
            ],
        };
        assert_eq!(t.flat_text(), "Hello world This is a test");
    }

    #[test]
    fn test_flat_text_empty() {
        let t = Transcript {
            video_id: "empty".to_string(),
            title: String::new(),
            language: "en".to_string(),
            source: TranscriptSource::Caption,
            segments: vec![],
        };
        assert_eq!(t.flat_text(), "");
    }
}
