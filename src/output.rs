use crate::Transcript;

/// Render a start/end time in seconds as zero-padded `MM:SS`.
fn format_timestamp(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{minutes:02}:{secs:02}")
}

/// Render the transcript with timestamp-prefixed lines.
///
/// Caption-derived segments have no end time and render as `[MM:SS] text`;
/// transcription-derived segments render as `[MM:SS - MM:SS] text`. One
/// newline-terminated line per segment, in order.
pub fn render_timestamped(transcript: &Transcript) -> String {
    let mut out = String::new();
    for seg in &transcript.segments {
        match seg.end {
            Some(end) => out.push_str(&format!(
                "[{} - {}] {}\n",
                format_timestamp(seg.start),
                format_timestamp(end),
                seg.text
            )),
            None => out.push_str(&format!("[{}] {}\n", format_timestamp(seg.start), seg.text)),
        }
    }
    out
}

/// Render the transcript as flat text (space-joined segments, no timestamps)
pub fn render_plain(transcript: &Transcript) -> String {
    transcript.flat_text()
}

/// Render the transcript as pretty-printed JSON
pub fn render_json(transcript: &Transcript) -> String {
    serde_json::to_string_pretty(transcript).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Segment, TranscriptSource};

    fn transcript_with(segments: Vec<Segment>) -> Transcript {
        Transcript {
            video_id: "test123".to_string(),
            title: "Test Video".to_string(),
            language: "en".to_string(),
            source: TranscriptSource::Caption,
            segments,
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(59.9), "00:59");
        assert_eq!(format_timestamp(125.0), "02:05");
        assert_eq!(format_timestamp(3599.0), "59:59");
    }

    #[test]
    fn test_render_caption_segment() {
        let t = transcript_with(vec![Segment {
            text: "hello".to_string(),
            start: 125.0,
            end: None,
        }]);
        assert_eq!(render_timestamped(&t), "[02:05] hello\n");
    }

    #[test]
    fn test_render_transcription_segment() {
        let t = transcript_with(vec![Segment {
            text: "x".to_string(),
            start: 61.0,
            end: Some(130.0),
        }]);
        assert_eq!(render_timestamped(&t), "[01:01 - 02:10] x\n");
    }

    #[test]
    fn test_render_multiple_segments_in_order() {
        let t = transcript_with(vec![
            Segment { text: "one".to_string(), start: 0.0, end: None },
            Segment { text: "two".to_string(), start: 62.5, end: None },
        ]);
        assert_eq!(render_timestamped(&t), "[00:00] one\n[01:02] two\n");
    }

    #[test]
    fn test_render_empty_transcript() {
        let t = transcript_with(vec![]);
        assert_eq!(render_timestamped(&t), "");
    }

    #[test]
    fn test_render_plain() {
        let t = transcript_with(vec![
            Segment { text: "Hello world".to_string(), start: 0.0, end: None },
            Segment { text: "This is a test".to_string(), start: 1.5, end: None },
        ]);
        assert_eq!(render_plain(&t), "Hello world This is a test");
    }

    #[test]
    fn test_render_json_omits_absent_end() {
        let t = transcript_with(vec![Segment {
            text: "hi".to_string(),
            start: 0.0,
            end: None,
        }]);
        let json = render_json(&t);
        assert!(json.contains("\"start\""));
        assert!(!json.contains("\"end\""));
    }
}
