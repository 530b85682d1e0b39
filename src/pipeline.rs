use std::future::Future;
use std::path::Path;

use log::debug;

use crate::audio::AudioArtifact;
use crate::error::{Error, Result};
use crate::{NetworkOptions, Segment, Transcript, TranscriptSource};

/// Fetches an existing caption track for a video.
pub trait CaptionSource {
    fn fetch(&self, video_id: &str, langs: &[String]) -> impl Future<Output = Result<Transcript>>;
}

/// Downloads a video's audio to a transient local artifact.
pub trait AudioSource {
    fn acquire(
        &self,
        url: &str,
        net: &NetworkOptions,
    ) -> impl Future<Output = Result<AudioArtifact>>;
}

/// Transcribes a local audio file into timestamped segments.
pub trait SpeechToText {
    fn transcribe(&self, audio: &Path, lang: &str) -> impl Future<Output = Result<Vec<Segment>>>;
}

/// Normalize a language preference list: trim entries, drop blanks, and
/// default an empty list to `["en"]`.
pub fn normalize_langs(langs: &[String]) -> Vec<String> {
    let cleaned: Vec<String> = langs
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();
    if cleaned.is_empty() {
        vec!["en".to_string()]
    } else {
        cleaned
    }
}

/// Produce a transcript for a video: captions first, then (if allowed) one
/// audio-download-plus-transcription fallback attempt.
///
/// The fallback's audio artifact is scoped to this call; it is deleted when
/// the artifact drops, on success and on every failure path. There is no
/// retry loop and no merging of segments between the two sources.
pub async fn get_transcript<C, A, S>(
    captions: &C,
    audio: &A,
    stt: &S,
    video_id: &str,
    langs: &[String],
    allow_fallback: bool,
    source_url: &str,
    net: &NetworkOptions,
) -> Result<Transcript>
where
    C: CaptionSource,
    A: AudioSource,
    S: SpeechToText,
{
    let langs = normalize_langs(langs);

    let cause = match captions.fetch(video_id, &langs).await {
        Ok(transcript) => return Ok(transcript),
        Err(e) => e,
    };

    if !allow_fallback {
        return Err(Error::unavailable(cause));
    }

    debug!("Caption fetch failed ({cause}), falling back to audio transcription");

    let artifact = audio
        .acquire(source_url, net)
        .await
        .map_err(Error::unavailable)?;

    let lang = langs[0].clone();
    let segments = stt
        .transcribe(artifact.path(), &lang)
        .await
        .map_err(Error::unavailable)?;

    Ok(Transcript {
        video_id: video_id.to_string(),
        title: artifact.title().unwrap_or_default().to_string(),
        language: lang,
        source: TranscriptSource::Whisper,
        segments,
    })
    // artifact drops here; its temp directory is removed
}
