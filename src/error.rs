use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("could not extract a video ID from: {0}")]
    InvalidInput(String),

    #[error("playlist URLs are not supported; provide a single video link")]
    UnsupportedPlaylist,

    #[error("no captions available for video {0}")]
    CaptionsUnavailable(String),

    #[error("error parsing caption data: {0}")]
    CaptionParse(String),

    #[error("audio download failed: {0}")]
    AcquisitionFailed(String),

    #[error("ffmpeg failed: {0}")]
    Ffmpeg(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{service} API returned {status}: {message}")]
    Api {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("unexpected {0} response format")]
    UnexpectedResponse(&'static str),

    #[error("transcript unavailable: {cause}")]
    TranscriptUnavailable {
        #[source]
        cause: Box<Error>,
    },

    #[error("summarization failed: {cause}")]
    SummarizationFailed {
        #[source]
        cause: Box<Error>,
    },

    #[error("invalid config file: {0}")]
    Config(String),

    #[error("{0} environment variable not set")]
    StartupMisconfiguration(&'static str),
}

impl Error {
    pub fn unavailable(cause: Error) -> Error {
        Error::TranscriptUnavailable { cause: Box::new(cause) }
    }

    pub fn summarization(cause: Error) -> Error {
        Error::SummarizationFailed { cause: Box::new(cause) }
    }

    /// Short actionable hint shown alongside the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::InvalidInput(_) => Some(
                "Supported formats: https://www.youtube.com/watch?v=ID, https://youtu.be/ID, \
                 or an 11-character video ID.",
            ),
            Error::UnsupportedPlaylist => Some("Provide a link to a single video instead."),
            Error::TranscriptUnavailable { .. } => Some(
                "Some videos have no captions; audio transcription covers them unless \
                 --no-fallback is set. Check that subtitles are public for this video.",
            ),
            Error::SummarizationFailed { .. } => Some(
                "Any summary text already printed is incomplete. Check GROQ_API_KEY, \
                 the model name, and your quota.",
            ),
            Error::StartupMisconfiguration(_) => {
                Some("Add it to your environment or a .env file and restart.")
            }
            _ => None,
        }
    }
}
