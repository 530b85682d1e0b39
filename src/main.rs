use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::Command;

use eyre::{Result, bail};
use log::{debug, info};

mod cli;

use cli::{Cli, OutputFormat};
use ytsum::audio::YtDlpAcquirer;
use ytsum::config::{Config, Credentials};
use ytsum::whisper::{GroqTranscriber, WhisperModel};
use ytsum::youtube::CaptionClient;
use ytsum::{NetworkOptions, ParsedUrl};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytsum.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytsum")
        .join("logs")
}

fn tool_version(name: &str) -> Option<String> {
    Command::new(name)
        .arg("-version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| {
            String::from_utf8_lossy(&o.stdout)
                .trim()
                .lines()
                .next()
                .unwrap_or("")
                .to_string()
        })
}

fn build_after_help() -> String {
    let yt_dlp = Command::new("yt-dlp")
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string());
    let ffmpeg = tool_version("ffmpeg");

    let yt_dlp_line = match &yt_dlp {
        Some(v) => format!("  \x1b[32m✅\x1b[0m yt-dlp     {v}"),
        None => "  \x1b[31m❌\x1b[0m yt-dlp     (not found — needed for audio fallback)".to_string(),
    };
    let ffmpeg_line = match &ffmpeg {
        Some(v) => format!("  \x1b[32m✅\x1b[0m ffmpeg     {v}"),
        None => "  \x1b[31m❌\x1b[0m ffmpeg     (not found — needed for long audio)".to_string(),
    };

    let log_path = log_dir().join("ytsum.log");

    format!(
        "\nREQUIRED TOOLS:\n{yt_dlp_line}\n{ffmpeg_line}\n\nGROQ_API_KEY must be set in the environment (or a .env file).\nLogs are written to: {}",
        log_path.display()
    )
}

fn report(err: &ytsum::Error) {
    eprintln!("Error: {err}");
    if let Some(hint) = err.hint() {
        eprintln!("Hint: {hint}");
    }
}

struct Run<'a> {
    cli: &'a Cli,
    client: reqwest::Client,
    captions: CaptionClient,
    acquirer: YtDlpAcquirer,
    transcriber: GroqTranscriber,
    langs: Vec<String>,
    model: String,
    prompt: String,
    api_key: String,
    net: NetworkOptions,
}

impl Run<'_> {
    /// One full pipeline run for one URL: extract, transcribe, render,
    /// optionally summarize. Errors are recovered at this boundary.
    async fn process(&self, url_input: &str) -> ytsum::Result<()> {
        let video_id = match ytsum::extract_video_id(url_input) {
            ParsedUrl::Video(id) => id,
            ParsedUrl::Playlist => return Err(ytsum::Error::UnsupportedPlaylist),
            ParsedUrl::Invalid => return Err(ytsum::Error::InvalidInput(url_input.to_string())),
        };
        let source_url = format!("https://www.youtube.com/watch?v={video_id}");

        let transcript = ytsum::pipeline::get_transcript(
            &self.captions,
            &self.acquirer,
            &self.transcriber,
            &video_id,
            &self.langs,
            !self.cli.no_fallback,
            &source_url,
            &self.net,
        )
        .await?;

        if self.cli.verbose {
            eprintln!(
                "Video: {} ({})\nSource: {}\nLanguage: {}\nSegments: {}",
                transcript.title,
                transcript.video_id,
                transcript.source,
                transcript.language,
                transcript.segments.len(),
            );
        }

        let rendered = match self.cli.format {
            OutputFormat::Text => ytsum::output::render_timestamped(&transcript),
            OutputFormat::Plain => ytsum::output::render_plain(&transcript),
            OutputFormat::Json => ytsum::output::render_json(&transcript),
        };

        if let Some(ref path) = self.cli.output {
            std::fs::write(path, &rendered)?;
            if self.cli.verbose {
                eprintln!("Transcript written to: {}", path.display());
            }
        } else {
            println!("{rendered}");
        }

        if self.cli.summarize {
            let mut stream = ytsum::summarize::stream_summary(
                &self.client,
                &self.api_key,
                &self.model,
                &self.prompt,
                &transcript.flat_text(),
            )
            .await?;

            println!("--- Summary ---");
            let mut stdout = io::stdout();
            while let Some(fragment) = stream.next_fragment().await {
                match fragment {
                    Ok(f) => {
                        print!("{f}");
                        let _ = stdout.flush();
                    }
                    Err(e) => {
                        println!();
                        return Err(e);
                    }
                }
            }
            println!();
        }

        Ok(())
    }
}

fn parse_langs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_default();

    // Required credential; fatal before any input is accepted
    let creds = Credentials::from_env()?;

    // CLI flags take priority over config defaults
    let langs = cli
        .langs
        .as_deref()
        .or(config.default_langs.as_deref())
        .map(parse_langs)
        .unwrap_or_else(|| vec!["en".to_string()]);
    let model = cli
        .model
        .clone()
        .or(config.default_model.clone())
        .unwrap_or_else(|| ytsum::summarize::DEFAULT_MODEL.to_string());
    let prompt = cli
        .prompt
        .clone()
        .or(config.default_prompt.clone())
        .unwrap_or_else(|| ytsum::summarize::DEFAULT_PROMPT.to_string());
    let whisper_model = config
        .whisper_model
        .as_deref()
        .and_then(WhisperModel::from_name)
        .unwrap_or_default();
    let net = NetworkOptions {
        proxy: cli.proxy.clone().or(config.proxy.clone()),
        cookies: cli.cookies.clone(),
    };

    debug!("langs={langs:?} model={model} proxy={:?}", net.proxy);

    let mut builder = reqwest::Client::builder();
    if let Some(ref proxy) = net.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }
    let client = builder.build()?;

    let run = Run {
        cli: &cli,
        client: client.clone(),
        captions: CaptionClient::new(client.clone()),
        acquirer: YtDlpAcquirer,
        transcriber: GroqTranscriber::new(client, creds.groq_api_key.clone(), whisper_model),
        langs,
        model,
        prompt,
        api_key: creds.groq_api_key,
        net,
    };

    // Collect URLs: from arg or stdin
    let urls = if let Some(ref url) = cli.url {
        vec![url.clone()]
    } else {
        let stdin = io::stdin();
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    };

    if urls.iter().all(|u| u.trim().is_empty()) {
        bail!("no URL or video ID provided\n\nUsage: ytsum <URL>\n       echo <URL> | ytsum");
    }

    let mut failed = false;
    for url_input in &urls {
        let url_input = url_input.trim();
        if url_input.is_empty() {
            continue;
        }
        if let Err(e) = run.process(url_input).await {
            report(&e);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
