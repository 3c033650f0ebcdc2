use crate::api_client::DEFAULT_ENDPOINT;
use crate::utils::app_paths::AppPaths;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable that overrides the configured endpoint
pub const ENDPOINT_ENV_VAR: &str = "ASK_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Full URL the query is POSTed to
    pub endpoint_url: String,

    /// Request timeout in seconds. Unset means the transport default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for icons and the busy spinner
    pub use_glyphs: bool,

    /// Icons for different parts of the screen (can be overridden)
    pub icons: IconConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub search: String,
    pub summary: String,
    pub api: String,
    pub error: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            icons: IconConfig::default(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            search: "🔍".to_string(),
            summary: "📄".to_string(),
            api: "🌐".to_string(),
            error: "❌".to_string(),
        }
    }
}

impl IconConfig {
    /// Get simple ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            search: "[?]".to_string(),
            summary: "[S]".to_string(),
            api: "[API]".to_string(),
            error: "[X]".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults when
    /// no file exists
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(target: "config", "No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        info!(target: "config", "Loaded config from {}", path.display());

        if !config.display.use_glyphs {
            config.display.icons = IconConfig::simple();
        }

        Ok(config)
    }

    /// Write the commented default config to `path`, creating parent directories
    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, Self::create_default_with_comments())?;
        Ok(())
    }

    /// Pick the endpoint: command line first, then the environment, then the file
    pub fn resolve_endpoint(&self, cli_url: Option<&str>, env_url: Option<String>) -> String {
        if let Some(url) = cli_url.filter(|u| !u.trim().is_empty()) {
            return url.to_string();
        }
        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            return url;
        }
        self.api.endpoint_url.clone()
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        format!(
            r#"# ask-cli configuration file
# Location: ~/.config/ask-cli/config.toml (Linux)
#           ~/Library/Application Support/ask-cli/config.toml (macOS)
#           %APPDATA%\ask-cli\config.toml (Windows)

[api]
# URL the query is POSTed to as {{"text": "..."}}
# Overridden by the {env} environment variable and the --url flag
endpoint_url = "{endpoint}"

# Give up on a request after this many seconds (default: no timeout)
# request_timeout_secs = 60

[display]
# Use Unicode glyphs for icons and the busy spinner
# Set to false for ASCII-only mode (better compatibility)
use_glyphs = true

# Icon configuration
# These are automatically set to ASCII when use_glyphs = false
[display.icons]
search = "🔍"
summary = "📄"
api = "🌐"
error = "❌"
"#,
            env = ENDPOINT_ENV_VAR,
            endpoint = DEFAULT_ENDPOINT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.endpoint_url, "http://localhost:8000/query");
        assert_eq!(config.api.request_timeout(), None);
        assert!(config.display.use_glyphs);
    }

    #[test]
    fn test_simple_icons() {
        let icons = IconConfig::simple();
        assert_eq!(icons.summary, "[S]");
        assert_eq!(icons.error, "[X]");
    }

    #[test]
    fn test_commented_default_parses_to_default() {
        let parsed: Config = toml::from_str(&Config::create_default_with_comments()).unwrap();
        assert_eq!(parsed.api.endpoint_url, Config::default().api.endpoint_url);
        assert_eq!(parsed.api.request_timeout_secs, None);
        assert_eq!(parsed.display.icons.search, "🔍");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[api]\nendpoint_url = \"http://10.0.0.2:9000/query\"\nrequest_timeout_secs = 30\n\n[display]\nuse_glyphs = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.endpoint_url, "http://10.0.0.2:9000/query");
        assert_eq!(config.api.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.display.icons.summary, "[S]");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.api.endpoint_url, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nendpoint_url = 3").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_write_default_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::write_default(&path).unwrap();
        assert!(Config::load_from(&path).is_ok());
    }

    #[test]
    fn test_endpoint_precedence() {
        let config = Config::default();
        assert_eq!(
            config.resolve_endpoint(Some("http://cli/query"), Some("http://env/query".into())),
            "http://cli/query"
        );
        assert_eq!(
            config.resolve_endpoint(None, Some("http://env/query".into())),
            "http://env/query"
        );
        assert_eq!(
            config.resolve_endpoint(Some(" "), Some(String::new())),
            DEFAULT_ENDPOINT
        );
    }
}
