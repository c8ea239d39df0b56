use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Upstream endpoint and credential handed to [`crate::tmdb::TmdbClient::new`].
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_TMDB_BASE.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .context("TMDB_API_KEY not set")?;
        let mut config = Self::new(api_key);
        if let Some(base) = non_empty_var("TMDB_BASE_URL") {
            config = config.with_base_url(base);
        }
        if let Some(images) = non_empty_var("TMDB_IMAGE_BASE_URL") {
            config = config.with_image_base_url(images);
        }
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tmdb: TmdbConfig,
    pub bind_addr: SocketAddr,
    /// `None` leaves the preference store unavailable.
    pub preferences_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let tmdb = TmdbConfig::from_env()?;
        let bind_raw = non_empty_var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("BIND_ADDR '{}' is not a socket address", bind_raw))?;
        let preferences_path = non_empty_var("PREFERENCES_PATH")
            .map(PathBuf::from)
            .or_else(default_preferences_path);
        Ok(Self {
            tmdb,
            bind_addr,
            preferences_path,
        })
    }
}

fn default_preferences_path() -> Option<PathBuf> {
    env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("cinescope")
            .join("preferences.json")
    })
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
