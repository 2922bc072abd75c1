use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_STATIC_DIR: &str = "app";
const DEFAULT_ALLOWED_ORIGIN_FILE: &str = "ALLOWED_ORIGIN";
const DEFAULT_API_KEY_FILE: &str = "OPENAI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT is not a valid port number: {0}")]
    InvalidPort(String),

    #[error("OPENAI_BASE_URL is not a valid URL: {0}")]
    InvalidBaseUrl(String),
}

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    pub allowed_origin: Option<String>,
    pub api_key: Option<String>,
    pub openai_base_url: String,
    pub default_model: String,
    pub static_dir: PathBuf,
    pub environment: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            allowed_origin: None,
            api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            environment: "development".to_string(),
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// The allowed origin and the API key are read from secret files whose
    /// paths can be overridden with `ALLOWED_ORIGIN_FILE` and
    /// `OPENAI_API_KEY_FILE`. A missing secret degrades the feature that
    /// needs it instead of failing startup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        let origin_file =
            lookup("ALLOWED_ORIGIN_FILE").unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN_FILE.into());
        let allowed_origin = read_secret_file(&origin_file);
        if allowed_origin.is_none() {
            tracing::warn!("No allowed origin configured, cross-origin requests will be rejected");
        }

        let key_file = lookup("OPENAI_API_KEY_FILE").unwrap_or_else(|| DEFAULT_API_KEY_FILE.into());
        let api_key = read_secret_file(&key_file).or_else(|| {
            lookup("OPENAI_API_KEY")
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
        });
        if api_key.is_none() {
            tracing::warn!("No OpenAI API key configured, upstream calls will fail authentication");
        }

        let openai_base_url = match lookup("OPENAI_BASE_URL") {
            Some(raw) => normalize_base_url(&raw)?,
            None => defaults.openai_base_url,
        };

        Ok(Self {
            port,
            allowed_origin,
            api_key,
            openai_base_url,
            default_model: lookup("DEFAULT_MODEL")
                .filter(|model| !model.trim().is_empty())
                .unwrap_or(defaults.default_model),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            environment: lookup("APP_ENV").unwrap_or(defaults.environment),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn with_allowed_origin(mut self, allowed_origin: Option<String>) -> Self {
        self.allowed_origin = allowed_origin;
        self
    }

    pub fn with_openai_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.openai_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_static_dir(mut self, static_dir: impl Into<PathBuf>) -> Self {
        self.static_dir = static_dir.into();
        self
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let parsed =
        url::Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidBaseUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

/// Reads a one-line secret file. Unreadable or blank files yield `None`.
pub fn read_secret_file(path: impl AsRef<Path>) -> Option<String> {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let value = contents.trim();
            if value.is_empty() {
                tracing::warn!("Secret file {} is empty", path.display());
                None
            } else {
                Some(value.to_string())
            }
        }
        Err(e) => {
            tracing::warn!("Could not read secret file {}: {}", path.display(), e);
            None
        }
    }
}
