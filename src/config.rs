use crate::constants::{
    API_BASE_VAR, API_KEY_FALLBACK_VAR, API_KEY_VAR, DEFAULT_GALLERY_DIR, DEFAULT_TIMEOUT_SECS,
    GALLERY_DIR_VAR, GEMINI_API_BASE, TIMEOUT_VAR,
};
use crate::error::{ImageGenError, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub gallery_dir: PathBuf,
    pub timeout: Duration,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: GEMINI_API_BASE.to_string(),
            gallery_dir: PathBuf::from(DEFAULT_GALLERY_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads the process environment. A missing API key is fatal.
    pub fn from_env() -> Result<Self> {
        let api_key = non_empty_env(API_KEY_VAR)
            .or_else(|| non_empty_env(API_KEY_FALLBACK_VAR))
            .ok_or_else(|| {
                ImageGenError::Config(format!("{} environment variable not set", API_KEY_VAR))
            })?;

        let mut config = Self::new(api_key);
        if let Some(base) = non_empty_env(API_BASE_VAR) {
            config = config.with_api_base(base);
        }
        if let Some(dir) = non_empty_env(GALLERY_DIR_VAR) {
            config = config.with_gallery_dir(dir);
        }
        if let Some(raw) = non_empty_env(TIMEOUT_VAR) {
            let secs = raw.parse::<u64>().map_err(|_| {
                ImageGenError::Config(format!("{} must be a number of seconds, got {}", TIMEOUT_VAR, raw))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_gallery_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.gallery_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
