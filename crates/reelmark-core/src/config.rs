use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use reelmark_api::{
    Endpoints, SessionContext, TmdbClient, DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL,
    DEFAULT_POSTER_SIZE,
};

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub poster_size: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.into(),
            poster_size: DEFAULT_POSTER_SIZE.into(),
            timeout_secs: 30,
        }
    }
}

/// Account credentials. Empty strings mean "not configured".
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub api_key: String,
    pub session_id: String,
    pub user_id: String,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("api_key", &redact(&self.api_key))
            .field("session_id", &redact(&self.session_id))
            .field("user_id", &self.user_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "reelmark=info".into(),
        }
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "<redacted>"
    }
}

impl AppConfig {
    /// Load config: the user file if it exists, built-in defaults otherwise.
    pub fn load() -> Result<Self, CoreError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from an explicit path. Sections the file omits keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "reelmark")
    }

    /// Copy of this config with credentials blanked out, for display.
    pub fn redacted(&self) -> Self {
        let mut out = self.clone();
        out.session.api_key = redact(&self.session.api_key).into();
        out.session.session_id = redact(&self.session.session_id).into();
        out
    }

    pub fn session_context(&self) -> Result<SessionContext, CoreError> {
        let s = &self.session;
        if s.api_key.is_empty() {
            return Err(CoreError::MissingCredential("api_key"));
        }
        if s.session_id.is_empty() {
            return Err(CoreError::MissingCredential("session_id"));
        }
        if s.user_id.is_empty() {
            return Err(CoreError::MissingCredential("user_id"));
        }
        Ok(SessionContext::new(&s.api_key, &s.session_id, &s.user_id))
    }

    pub fn endpoints(&self) -> Result<Endpoints, CoreError> {
        Endpoints::parse(
            &self.api.base_url,
            &self.api.image_base_url,
            &self.api.poster_size,
        )
        .map_err(|e| CoreError::Config(e.to_string()))
    }

    pub fn http_client(&self) -> Result<reqwest::Client, CoreError> {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(self.api.timeout_secs))
            .user_agent(concat!("reelmark/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Build an API client from this config's endpoints and credentials.
    pub fn tmdb_client(&self) -> Result<TmdbClient, CoreError> {
        Ok(TmdbClient::new(
            self.http_client()?,
            self.endpoints()?,
            self.session_context()?,
        ))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
