use std::path::PathBuf;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Comma-separated language preference, most preferred first
    pub default_langs: Option<String>,
    pub default_model: Option<String>,
    pub default_prompt: Option<String>,
    pub whisper_model: Option<String>,
    pub proxy: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config =
                toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}

/// API credential required at startup. Loaded once before any input is
/// accepted and passed explicitly to the transcriber and summarizer.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub groq_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        let groq_api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| Error::StartupMisconfiguration("GROQ_API_KEY"))?;
        Ok(Credentials { groq_api_key })
    }
}
