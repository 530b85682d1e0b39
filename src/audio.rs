use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use tempfile::TempDir;

use crate::NetworkOptions;
use crate::error::{Error, Result};
use crate::pipeline::AudioSource;

/// A downloaded audio file scoped to one orchestration call.
///
/// The file lives in its own uniquely named temp directory, which is removed
/// when the artifact drops. Concurrent orchestrations therefore never collide
/// and nothing is left on disk on any exit path.
pub struct AudioArtifact {
    temp: TempDir,
    path: PathBuf,
    title: Option<String>,
}

impl AudioArtifact {
    pub fn new(temp: TempDir, path: PathBuf) -> Self {
        AudioArtifact { temp, path, title: None }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Directory the artifact lives in; scratch files placed here (e.g. upload
    /// chunks) are removed together with the artifact.
    pub fn work_dir(&self) -> &Path {
        self.temp.path()
    }
}

/// Audio acquirer backed by the yt-dlp CLI.
pub struct YtDlpAcquirer;

impl AudioSource for YtDlpAcquirer {
    async fn acquire(&self, url: &str, net: &NetworkOptions) -> Result<AudioArtifact> {
        download_audio(url, net)
    }
}

fn ytdlp_args(url: &str, template: &str, net: &NetworkOptions) -> Vec<String> {
    let mut args: Vec<String> = [
        "--extract-audio",
        "--audio-format",
        "mp3",
        "--audio-quality",
        "9", // lowest quality = smallest file (speech doesn't need high quality)
        "--no-playlist",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    if let Some(proxy) = &net.proxy {
        args.push("--proxy".to_string());
        args.push(proxy.clone());
    }
    if let Some(cookies) = &net.cookies {
        args.push("--cookies".to_string());
        args.push(cookies.display().to_string());
    }

    args.push("-o".to_string());
    args.push(template.to_string());
    args.push(url.to_string());
    args
}

/// Download a video's audio track into a fresh temp directory.
pub fn download_audio(url: &str, net: &NetworkOptions) -> Result<AudioArtifact> {
    let temp = tempfile::Builder::new().prefix("ytsum-").tempdir()?;
    let template = temp.path().join("audio.%(ext)s");
    let output_path = temp.path().join("audio.mp3");

    debug!("Downloading audio via yt-dlp: {url}");

    let args = ytdlp_args(url, &template.to_string_lossy(), net);
    let status = Command::new("yt-dlp")
        .args(&args)
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .status();

    match status {
        Ok(s) if s.success() => {}
        Ok(s) => return Err(Error::AcquisitionFailed(format!("yt-dlp exited with status {s}"))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::AcquisitionFailed(
                "yt-dlp not found. Install it to enable audio transcription:\n  \
                 pip install yt-dlp\n  or: brew install yt-dlp"
                    .to_string(),
            ));
        }
        Err(e) => return Err(Error::AcquisitionFailed(format!("failed to run yt-dlp: {e}"))),
    }

    if !output_path.exists() {
        return Err(Error::AcquisitionFailed(format!(
            "yt-dlp did not produce expected output file: {}",
            output_path.display()
        )));
    }

    let title = get_video_title(url, net);
    Ok(AudioArtifact::new(temp, output_path).with_title(title))
}

fn get_video_title(url: &str, net: &NetworkOptions) -> Option<String> {
    let mut args = vec!["--get-title".to_string(), "--no-playlist".to_string()];
    if let Some(proxy) = &net.proxy {
        args.push("--proxy".to_string());
        args.push(proxy.clone());
    }
    args.push(url.to_string());

    Command::new("yt-dlp")
        .args(&args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ytdlp_args_basic() {
        let args = ytdlp_args("https://youtu.be/abc", "/tmp/x/audio.%(ext)s", &NetworkOptions::default());
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(!args.contains(&"--proxy".to_string()));
        assert!(!args.contains(&"--cookies".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc");
    }

    #[test]
    fn test_ytdlp_args_with_network_options() {
        let net = NetworkOptions {
            proxy: Some("socks5://127.0.0.1:9050".to_string()),
            cookies: Some(PathBuf::from("/home/user/cookies.txt")),
        };
        let args = ytdlp_args("u", "t", &net);
        let proxy_idx = args.iter().position(|a| a == "--proxy").unwrap();
        assert_eq!(args[proxy_idx + 1], "socks5://127.0.0.1:9050");
        let cookies_idx = args.iter().position(|a| a == "--cookies").unwrap();
        assert_eq!(args[cookies_idx + 1], "/home/user/cookies.txt");
    }

    #[test]
    fn test_artifact_removed_on_drop() {
        let temp = tempfile::Builder::new().prefix("ytsum-test-").tempdir().unwrap();
        let path = temp.path().join("audio.mp3");
        std::fs::write(&path, b"x").unwrap();
        let artifact = AudioArtifact::new(temp, path.clone());
        assert!(artifact.path().exists());
        drop(artifact);
        assert!(!path.exists());
    }
}
