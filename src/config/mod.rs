//! Configuration handling for the application.
//!
//! Everything is read from the process environment once at startup. The
//! binaries call `dotenvy::dotenv()` first, so a local `.env` file works too.
//! Missing values fall back to development defaults; values that are present
//! but unparseable are rejected with a `ConfigError`.

use std::env;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable names. Kept public so tests and tooling can refer to them.
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_LLM_API_KEY: &str = "LLM_API_KEY";
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_LLM_BASE_URL: &str = "LLM_BASE_URL";
pub const ENV_LLM_MODEL: &str = "LLM_MODEL";
pub const ENV_LLM_MAX_TOKENS: &str = "LLM_MAX_TOKENS";
pub const ENV_LLM_TEMPERATURE: &str = "LLM_TEMPERATURE";
pub const ENV_LLM_TIMEOUT_SECS: &str = "LLM_TIMEOUT_SECS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_FETCH_CONNECT_TIMEOUT_SECS: &str = "FETCH_CONNECT_TIMEOUT_SECS";
pub const ENV_FETCH_MAX_ATTEMPTS: &str = "FETCH_MAX_ATTEMPTS";
pub const ENV_FETCH_BACKOFF_MS: &str = "FETCH_BACKOFF_MS";
pub const ENV_MAX_INPUT_CHARS: &str = "MAX_INPUT_CHARS";
pub const ENV_MIN_CONTENT_CHARS: &str = "MIN_CONTENT_CHARS";
pub const ENV_RATE_LIMIT_PER_MINUTE: &str = "RATE_LIMIT_PER_MINUTE";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

/// Default development values used when environment variables are absent.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_LLM_MAX_TOKENS: u32 = 512;
const DEFAULT_LLM_TEMPERATURE: f32 = 0.7;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 60;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FETCH_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FETCH_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_FETCH_BACKOFF_MS: u64 = 500;
const DEFAULT_MAX_INPUT_CHARS: usize = 8000;
const DEFAULT_MIN_CONTENT_CHARS: usize = 100;
const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 30;

/// Settings for the outbound page fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    pub base_backoff: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_FETCH_CONNECT_TIMEOUT_SECS),
            max_attempts: DEFAULT_FETCH_MAX_ATTEMPTS,
            base_backoff: Duration::from_millis(DEFAULT_FETCH_BACKOFF_MS),
        }
    }
}

/// Settings for the remote completion service.
#[derive(Clone, PartialEq)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            max_tokens: DEFAULT_LLM_MAX_TOKENS,
            temperature: DEFAULT_LLM_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
        }
    }
}

// The key must never end up in logs.
impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Bounds applied between extraction and generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub max_input_chars: usize,
    pub min_content_chars: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            min_content_chars: DEFAULT_MIN_CONTENT_CHARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'text' or 'json', got '{}'", other)),
        }
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    bind_addr: String,
    rate_limit_per_minute: u32,
    log_format: LogFormat,
    fetch: FetchSettings,
    llm: LlmSettings,
    pipeline: PipelineSettings,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let api_key = env::var(ENV_LLM_API_KEY)
            .or_else(|_| env::var(ENV_GROQ_API_KEY))
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        let llm = LlmSettings {
            api_key,
            base_url: env::var(ENV_LLM_BASE_URL)
                .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
            model: env::var(ENV_LLM_MODEL).unwrap_or_else(|_| DEFAULT_LLM_MODEL.to_string()),
            max_tokens: parse_var(ENV_LLM_MAX_TOKENS, DEFAULT_LLM_MAX_TOKENS)?,
            temperature: parse_var(ENV_LLM_TEMPERATURE, DEFAULT_LLM_TEMPERATURE)?,
            timeout: Duration::from_secs(parse_var(
                ENV_LLM_TIMEOUT_SECS,
                DEFAULT_LLM_TIMEOUT_SECS,
            )?),
        };

        let fetch = FetchSettings {
            timeout: Duration::from_secs(parse_var(
                ENV_FETCH_TIMEOUT_SECS,
                DEFAULT_FETCH_TIMEOUT_SECS,
            )?),
            connect_timeout: Duration::from_secs(parse_var(
                ENV_FETCH_CONNECT_TIMEOUT_SECS,
                DEFAULT_FETCH_CONNECT_TIMEOUT_SECS,
            )?),
            max_attempts: parse_var(ENV_FETCH_MAX_ATTEMPTS, DEFAULT_FETCH_MAX_ATTEMPTS)?,
            base_backoff: Duration::from_millis(parse_var(
                ENV_FETCH_BACKOFF_MS,
                DEFAULT_FETCH_BACKOFF_MS,
            )?),
        };
        if fetch.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_FETCH_MAX_ATTEMPTS,
                reason: "must be at least 1".to_string(),
            });
        }

        let pipeline = PipelineSettings {
            max_input_chars: parse_var(ENV_MAX_INPUT_CHARS, DEFAULT_MAX_INPUT_CHARS)?,
            min_content_chars: parse_var(ENV_MIN_CONTENT_CHARS, DEFAULT_MIN_CONTENT_CHARS)?,
        };
        if pipeline.max_input_chars == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_MAX_INPUT_CHARS,
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            rate_limit_per_minute: parse_var(
                ENV_RATE_LIMIT_PER_MINUTE,
                DEFAULT_RATE_LIMIT_PER_MINUTE,
            )?,
            log_format: parse_var(ENV_LOG_FORMAT, LogFormat::default())?,
            fetch,
            llm,
            pipeline,
        })
    }

    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Requests per minute allowed per client IP; zero disables limiting.
    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
    pub fn fetch(&self) -> &FetchSettings {
        &self.fetch
    }
    pub fn llm(&self) -> &LlmSettings {
        &self.llm
    }
    pub fn pipeline(&self) -> PipelineSettings {
        self.pipeline
    }

    /// Development defaults (mirrors `from_env` with no env overrides).
    pub fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            rate_limit_per_minute: DEFAULT_RATE_LIMIT_PER_MINUTE,
            log_format: LogFormat::default(),
            fetch: FetchSettings::default(),
            llm: LlmSettings::default(),
            pipeline: PipelineSettings::default(),
        }
    }
}

fn parse_var<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue {
                field: key,
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            ENV_BIND_ADDR,
            ENV_LLM_API_KEY,
            ENV_GROQ_API_KEY,
            ENV_LLM_BASE_URL,
            ENV_LLM_MODEL,
            ENV_LLM_MAX_TOKENS,
            ENV_LLM_TEMPERATURE,
            ENV_LLM_TIMEOUT_SECS,
            ENV_FETCH_TIMEOUT_SECS,
            ENV_FETCH_CONNECT_TIMEOUT_SECS,
            ENV_FETCH_MAX_ATTEMPTS,
            ENV_FETCH_BACKOFF_MS,
            ENV_MAX_INPUT_CHARS,
            ENV_MIN_CONTENT_CHARS,
            ENV_RATE_LIMIT_PER_MINUTE,
            ENV_LOG_FORMAT,
        ] {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.bind_addr(), super::DEFAULT_BIND_ADDR);
        assert!(cfg.llm().api_key.is_none());
        assert_eq!(cfg.fetch().max_attempts, 3);
        assert_eq!(cfg.pipeline().max_input_chars, 8000);
        assert_eq!(cfg.log_format(), LogFormat::Text);
    }

    #[test]
    fn overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_BIND_ADDR, "0.0.0.0:9000");
            env::set_var(ENV_LLM_API_KEY, "sk-test");
            env::set_var(ENV_LLM_MODEL, "gpt-4o");
            env::set_var(ENV_FETCH_MAX_ATTEMPTS, "5");
            env::set_var(ENV_FETCH_BACKOFF_MS, "10");
            env::set_var(ENV_MAX_INPUT_CHARS, "1000");
            env::set_var(ENV_LOG_FORMAT, "json");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.llm().api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.llm().model, "gpt-4o");
        assert_eq!(cfg.fetch().max_attempts, 5);
        assert_eq!(cfg.fetch().base_backoff, Duration::from_millis(10));
        assert_eq!(cfg.pipeline().max_input_chars, 1000);
        assert_eq!(cfg.log_format(), LogFormat::Json);
        clear_env();
    }

    #[test]
    fn groq_key_is_accepted_as_fallback() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_GROQ_API_KEY, "gsk-fallback");
        }
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg.llm().api_key.as_deref(), Some("gsk-fallback"));
        clear_env();
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_LLM_API_KEY, "   ");
        }
        let cfg = Config::from_env().unwrap();
        assert!(cfg.llm().api_key.is_none());
        clear_env();
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_FETCH_MAX_ATTEMPTS, "three");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains(ENV_FETCH_MAX_ATTEMPTS));
        clear_env();
    }

    #[test]
    fn rejects_zero_attempts() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_FETCH_MAX_ATTEMPTS, "0");
        }
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let settings = LlmSettings {
            api_key: Some("sk-very-secret".to_string()),
            ..LlmSettings::default()
        };
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
