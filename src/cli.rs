use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Timestamp-prefixed lines
    Text,
    /// Flat text, no timestamps
    Plain,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytsum",
    about = "YouTube transcript summarizer with caption and Whisper fallback",
    version,
)]
pub struct Cli {
    /// YouTube video URL or video ID (reads from stdin if omitted)
    pub url: Option<String>,

    /// Summarize the transcript via LLM, streamed to stdout
    #[arg(short, long)]
    pub summarize: bool,

    /// Output format: text (default), plain, json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Comma-separated preferred caption languages, most preferred first (default: en)
    #[arg(short, long)]
    pub langs: Option<String>,

    /// Instruction sent to the model ahead of the transcript
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Write the transcript to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Don't fall back to audio transcription if captions unavailable
    #[arg(long)]
    pub no_fallback: bool,

    /// Proxy for caption fetch and audio download
    #[arg(long)]
    pub proxy: Option<String>,

    /// Netscape cookies file passed through to yt-dlp
    #[arg(long)]
    pub cookies: Option<PathBuf>,

    /// LLM model for summarization
    #[arg(long)]
    pub model: Option<String>,

    /// Show extraction method and metadata
    #[arg(short, long)]
    pub verbose: bool,
}
