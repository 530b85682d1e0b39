use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use reqwest::multipart;

use crate::Segment;
use crate::error::{Error, Result};
use crate::pipeline::SpeechToText;

const TRANSCRIPTION_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";

/// Maximum file size for a single transcription upload (25 MB)
const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Whisper transcription model hosted on Groq
#[derive(Debug, Clone, Default)]
pub enum WhisperModel {
    #[default]
    LargeV3,
    LargeV3Turbo,
}

impl WhisperModel {
    fn api_name(&self) -> &str {
        match self {
            WhisperModel::LargeV3 => "whisper-large-v3",
            WhisperModel::LargeV3Turbo => "whisper-large-v3-turbo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "whisper-large-v3" => Some(WhisperModel::LargeV3),
            "whisper-large-v3-turbo" => Some(WhisperModel::LargeV3Turbo),
            _ => None,
        }
    }
}

/// Speech transcriber backed by Groq's Whisper endpoint.
pub struct GroqTranscriber {
    client: reqwest::Client,
    api_key: String,
    model: WhisperModel,
}

impl GroqTranscriber {
    pub fn new(client: reqwest::Client, api_key: String, model: WhisperModel) -> Self {
        GroqTranscriber { client, api_key, model }
    }
}

impl SpeechToText for GroqTranscriber {
    async fn transcribe(&self, audio: &Path, lang: &str) -> Result<Vec<Segment>> {
        let file_size = std::fs::metadata(audio)?.len();
        debug!("Audio file size: {file_size} bytes");

        if file_size > MAX_UPLOAD_BYTES {
            transcribe_chunked(&self.client, &self.api_key, audio, &self.model, lang).await
        } else {
            transcribe_file(&self.client, &self.api_key, audio, &self.model, lang).await
        }
    }
}

async fn transcribe_file(
    client: &reqwest::Client,
    api_key: &str,
    audio_path: &Path,
    model: &WhisperModel,
    lang: &str,
) -> Result<Vec<Segment>> {
    debug!("Uploading {} for transcription", audio_path.display());

    let file_bytes = std::fs::read(audio_path)?;
    let file_name = audio_path.file_name().unwrap_or_default().to_string_lossy().to_string();

    let file_part = multipart::Part::bytes(file_bytes)
        .file_name(file_name)
        .mime_str("audio/mpeg")?;

    let form = multipart::Form::new()
        .part("file", file_part)
        .text("model", model.api_name().to_string())
        .text("language", lang.to_string())
        .text("response_format", "verbose_json")
        .text("timestamp_granularities[]", "segment");

    let resp = client
        .post(TRANSCRIPTION_URL)
        .bearer_auth(api_key)
        .multipart(form)
        .send()
        .await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        return Err(Error::Api { service: "transcription", status, message });
    }

    let json: serde_json::Value = resp.json().await?;
    parse_transcription_response(&json)
}

fn parse_transcription_response(json: &serde_json::Value) -> Result<Vec<Segment>> {
    // verbose_json format has a "segments" array with start/end times
    let Some(segments) = json.get("segments").and_then(|s| s.as_array()) else {
        return Err(Error::UnexpectedResponse("transcription"));
    };

    Ok(segments
        .iter()
        .filter_map(|seg| {
            let text = seg.get("text")?.as_str()?.trim().to_string();
            let start = seg.get("start")?.as_f64()?;
            let end = seg.get("end")?.as_f64()?;
            if text.is_empty() {
                return None;
            }
            Some(Segment { text, start, end: Some(end) })
        })
        .collect())
}

/// Split an oversized file with ffmpeg and transcribe each piece, shifting
/// timestamps by the chunk offset. Chunks are written next to the source
/// file, inside the artifact's temp directory.
async fn transcribe_chunked(
    client: &reqwest::Client,
    api_key: &str,
    audio_path: &Path,
    model: &WhisperModel,
    lang: &str,
) -> Result<Vec<Segment>> {
    // Each chunk is ~20 minutes to stay under 25MB at 64kbps
    let chunk_duration_secs = 1200;
    let file_size = std::fs::metadata(audio_path)?.len();
    let estimated_duration = file_size as f64 / (64_000.0 / 8.0); // 64kbps
    let num_chunks = (estimated_duration / chunk_duration_secs as f64).ceil() as usize;
    let chunk_dir = audio_path.parent().unwrap_or_else(|| Path::new("."));

    debug!("Splitting into {num_chunks} chunks of {chunk_duration_secs}s each");

    let mut all_segments = Vec::new();

    for i in 0..num_chunks {
        let start_time = i as f64 * chunk_duration_secs as f64;
        let chunk_path: PathBuf = chunk_dir.join(format!("chunk-{i}.mp3"));

        let status = Command::new("ffmpeg")
            .args([
                "-y",
                "-i",
                &audio_path.to_string_lossy(),
                "-ss",
                &format!("{start_time}"),
                "-t",
                &format!("{chunk_duration_secs}"),
                "-acodec",
                "copy",
                &chunk_path.to_string_lossy(),
            ])
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .map_err(|e| Error::Ffmpeg(e.to_string()))?;

        if !status.success() {
            return Err(Error::Ffmpeg(format!("failed to split audio at offset {start_time}s")));
        }

        let mut segments = transcribe_file(client, api_key, &chunk_path, model, lang).await?;

        for seg in &mut segments {
            seg.start += start_time;
            if let Some(end) = seg.end.as_mut() {
                *end += start_time;
            }
        }
        all_segments.extend(segments);

        let _ = std::fs::remove_file(&chunk_path);
    }

    Ok(all_segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transcription_response_verbose_json() {
        let json = serde_json::json!({
            "text": "Hello world. This is a test.",
            "segments": [
                {
                    "id": 0,
                    "start": 0.0,
                    "end": 1.5,
                    "text": " Hello world."
                },
                {
                    "id": 1,
                    "start": 1.5,
                    "end": 3.0,
                    "text": " This is a test."
                }
            ]
        });

        let segments = parse_transcription_response(&json).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "Hello world.");
        assert!((segments[0].start - 0.0).abs() < f64::EPSILON);
        assert_eq!(segments[0].end, Some(1.5));
        assert_eq!(segments[1].text, "This is a test.");
        assert_eq!(segments[1].end, Some(3.0));
    }

    #[test]
    fn test_parse_transcription_response_missing_segments() {
        let json = serde_json::json!({ "text": "Just plain text." });
        assert!(matches!(
            parse_transcription_response(&json),
            Err(Error::UnexpectedResponse("transcription"))
        ));
    }

    #[test]
    fn test_parse_transcription_response_skips_empty_segments() {
        let json = serde_json::json!({
            "text": "",
            "segments": [
                {
                    "id": 0,
                    "start": 0.0,
                    "end": 1.0,
                    "text": "   "
                }
            ]
        });

        let segments = parse_transcription_response(&json).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn test_whisper_model_names() {
        assert_eq!(WhisperModel::LargeV3.api_name(), "whisper-large-v3");
        assert_eq!(WhisperModel::LargeV3Turbo.api_name(), "whisper-large-v3-turbo");
        assert!(WhisperModel::from_name("whisper-large-v3-turbo").is_some());
        assert!(WhisperModel::from_name("whisper-2").is_none());
    }
}
