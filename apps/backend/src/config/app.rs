use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_HINT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_HINT_MODEL: &str = "gpt-3.5-turbo";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// `None` uses the corpus compiled into the binary.
    pub words_path: Option<PathBuf>,
    pub hints: HintSettings,
    pub ws: WsSettings,
}

#[derive(Clone, PartialEq)]
pub struct HintSettings {
    /// Hints are disabled without a key.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
}

// Keeps the key out of logs.
impl std::fmt::Debug for HintSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HintSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WsSettings {
    pub heartbeat_interval: Duration,
    pub client_timeout: Duration,
}

impl Default for WsSettings {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(20),
            client_timeout: Duration::from_secs(40),
        }
    }
}

impl Config {
    /// Build from process environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let host = var("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(var("BACKEND_PORT"), "BACKEND_PORT", 3001u16)?;
        let cors_origins = parse_origins(var("CORS_ALLOWED_ORIGINS").as_deref());
        let words_path = var("WORDS_PATH").map(PathBuf::from);

        let hints = HintSettings {
            api_key: var("HINT_API_KEY").or_else(|| var("OPENAI_API_KEY")),
            api_url: var("HINT_API_URL").unwrap_or_else(|| DEFAULT_HINT_API_URL.to_string()),
            model: var("HINT_MODEL").unwrap_or_else(|| DEFAULT_HINT_MODEL.to_string()),
            timeout: Duration::from_millis(parse_or(
                var("HINT_TIMEOUT_MS"),
                "HINT_TIMEOUT_MS",
                4000u64,
            )?),
        };

        let ws = WsSettings {
            heartbeat_interval: Duration::from_secs(parse_or(
                var("WS_HEARTBEAT_SECS"),
                "WS_HEARTBEAT_SECS",
                20u64,
            )?),
            client_timeout: Duration::from_secs(parse_or(
                var("WS_CLIENT_TIMEOUT_SECS"),
                "WS_CLIENT_TIMEOUT_SECS",
                40u64,
            )?),
        };
        if ws.heartbeat_interval.is_zero() || ws.client_timeout <= ws.heartbeat_interval {
            return Err(AppError::config(
                "WS_CLIENT_TIMEOUT_SECS must be greater than a non-zero WS_HEARTBEAT_SECS",
            ));
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            words_path,
            hints,
            ws,
        })
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &str, default: T) -> Result<T, AppError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| AppError::config(format!("{key} has an invalid value: '{value}'"))),
    }
}

/// Comma-separated origins; empty, `null` and non-http entries are ignored.
/// Falls back to the local dev frontend when nothing valid is configured.
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();

    if origins.is_empty() {
        vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
        ]
    } else {
        origins
    }
}
