use std::{env, fmt, fs, path::Path, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(600);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// Secrets the bot needs before it may start polling.
#[derive(Clone)]
pub struct Credentials {
    pub api_token: String,
    pub chat_token: String,
    pub chat_id: ChatId,
}

impl Credentials {
    /// Fails with `TokenMissing` naming every empty value, not just the first.
    pub fn new(
        api_token: Option<String>,
        chat_token: Option<String>,
        chat_id: Option<String>,
    ) -> Result<Self> {
        let api_token = api_token.and_then(non_empty);
        let chat_token = chat_token.and_then(non_empty);
        let chat_id = chat_id.and_then(non_empty);

        let mut names = Vec::new();
        if api_token.is_none() {
            names.push(PRACTICUM_TOKEN);
        }
        if chat_token.is_none() {
            names.push(TELEGRAM_TOKEN);
        }
        if chat_id.is_none() {
            names.push(TELEGRAM_CHAT_ID);
        }

        match (api_token, chat_token, chat_id) {
            (Some(api_token), Some(chat_token), Some(chat_id)) => Ok(Self {
                api_token,
                chat_token,
                chat_id: ChatId(chat_id),
            }),
            _ => Err(Error::TokenMissing { names }),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("chat_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Typed, immutable configuration built once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub credentials: Credentials,
    pub endpoint: String,
    pub retry_period: Duration,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    pub announce_startup: bool,
}

impl Config {
    /// Load from the process environment, seeded from `./.env` if present.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let credentials = Credentials::new(
            lookup(PRACTICUM_TOKEN),
            lookup(TELEGRAM_TOKEN),
            lookup(TELEGRAM_CHAT_ID),
        )?;

        let endpoint = lookup("PRACTICUM_ENDPOINT")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let retry_period = positive_secs(&lookup, "RETRY_PERIOD_SECS", DEFAULT_RETRY_PERIOD)?;
        let request_timeout =
            positive_secs(&lookup, "HTTP_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT)?;
        let connect_timeout =
            positive_secs(&lookup, "HTTP_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT)?;

        let announce_startup = lookup("ANNOUNCE_STARTUP")
            .map(|s| parse_bool(&s))
            .unwrap_or(true);

        Ok(Self {
            credentials,
            endpoint,
            retry_period,
            request_timeout,
            connect_timeout,
            announce_startup,
        })
    }
}

/// Like `secs`, but zero is an error.
fn positive_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration> {
    let value = secs(lookup, key)?.unwrap_or(default);
    if value.is_zero() {
        return Err(Error::Config(format!("{key} must be > 0")));
    }
    Ok(value)
}

fn secs(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<Duration>> {
    let Some(raw) = lookup(key).and_then(non_empty) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(|v| Some(Duration::from_secs(v)))
        .map_err(|_| Error::Config(format!("{key} must be a whole number of seconds, got {raw:?}")))
}

fn parse_bool(s: &str) -> bool {
    matches!(
        s.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim().trim_start_matches("export ").trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
