//! Client configuration: base URL, access token and transport timeout.
//!
//! Nothing here is process-global. A `ClientConfig` is built once, from code,
//! the environment or a TOML file, and handed to `CanvasClient::new`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://canvas.instructure.com/";

/// Where the access token is looked up when nothing else names one.
pub const DEFAULT_TOKEN_FILE: &str = "~/.canvas/access_token";

pub const ENV_BASE_URL: &str = "CANVAS_BASE_URL";
pub const ENV_TOKEN: &str = "CANVAS_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` makes every request fail with `ApiError::AuthMissing`.
    pub token: Option<String>,
    /// Overall per-request limit; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// On-disk shape of the TOML config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    base_url: Option<String>,
    token: Option<String>,
    token_file: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read the token from `path`. A missing or unreadable file is not fatal:
    /// it is logged and the current token is kept.
    pub fn with_token_file(mut self, path: impl AsRef<Path>) -> Self {
        match read_access_token(path.as_ref()) {
            Ok(token) => self.token = Some(token),
            Err(e) => warn!(error = %e, "could not read access token"),
        }
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build from `CANVAS_BASE_URL` / `CANVAS_TOKEN`, falling back to the
    /// default base URL and the default token file.
    pub fn from_env() -> Self {
        let base_url = std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let config = ClientConfig::new(base_url);
        match std::env::var(ENV_TOKEN) {
            Ok(token) if !token.is_empty() => config.with_token(token),
            _ => config.with_token_file(expand_home(DEFAULT_TOKEN_FILE)),
        }
    }

    /// Load a TOML config file.
    ///
    /// Token resolution order: `token`, then `token_file`, then the default
    /// token file. Environment variables override file values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        info!("Loading client config from: {}", path.display());

        let contents = fs::read_to_string(path)
            .map_err(|e| ApiError::Config(format!("failed to read {}: {e}", path.display())))?;
        let file: FileConfig =
            toml::from_str(&contents).map_err(|e| ApiError::Config(format!("TOML parsing error: {e}")))?;

        let mut config = ClientConfig::new(file.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()));
        config.timeout = file.timeout_secs.map(Duration::from_secs);
        config = match (file.token, file.token_file) {
            (Some(token), _) => config.with_token(token),
            (None, Some(token_file)) => config.with_token_file(expand_home(&token_file)),
            (None, None) => config.with_token_file(expand_home(DEFAULT_TOKEN_FILE)),
        };

        if let Ok(base_url) = std::env::var(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Ok(token) = std::env::var(ENV_TOKEN) {
            if !token.is_empty() {
                config.token = Some(token);
            }
        }
        Ok(config)
    }
}

/// Read an access token file, dropping trailing line breaks.
pub fn read_access_token(path: &Path) -> Result<String, ApiError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ApiError::Config(format!("failed to read {}: {e}", path.display())))?;
    let token = raw.trim_end_matches(['\n', '\r']).to_string();
    if token.is_empty() {
        return Err(ApiError::Config(format!("{} is empty", path.display())));
    }
    Ok(token)
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn token_file_trailing_newline_is_stripped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "1~abcdef").unwrap();
        let config = ClientConfig::new("http://localhost").with_token_file(file.path());
        assert_eq!(config.token.as_deref(), Some("1~abcdef"));
    }

    #[test]
    fn missing_token_file_is_not_fatal() {
        let config = ClientConfig::new("http://localhost").with_token_file("/nonexistent/canvas/token");
        assert!(config.token.is_none());
        assert_eq!(config.base_url, "http://localhost");
    }

    #[test]
    fn missing_token_file_keeps_explicit_token() {
        let config = ClientConfig::new("http://localhost")
            .with_token("explicit")
            .with_token_file("/nonexistent/canvas/token");
        assert_eq!(config.token.as_deref(), Some("explicit"));
    }

    #[test]
    fn load_reads_toml_with_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token");
        fs::write(&token_path, "from-file\n").unwrap();
        let config_path = dir.path().join("canvas.toml");
        fs::write(
            &config_path,
            format!(
                "base_url = \"https://school.instructure.com/\"\ntoken_file = \"{}\"\ntimeout_secs = 30\n",
                token_path.display()
            ),
        )
        .unwrap();

        let config = ClientConfig::load(&config_path).unwrap();
        if std::env::var(ENV_BASE_URL).is_err() {
            assert_eq!(config.base_url, "https://school.instructure.com/");
        }
        if std::env::var(ENV_TOKEN).is_err() {
            assert_eq!(config.token.as_deref(), Some("from-file"));
        }
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn sub_second_timeout_is_kept() {
        let config = ClientConfig::new("http://localhost").with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("canvas.toml");
        fs::write(&config_path, "base_url = [").unwrap();
        let err = ClientConfig::load(&config_path).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn expand_home_leaves_absolute_paths() {
        assert_eq!(expand_home("/etc/token"), PathBuf::from("/etc/token"));
    }
}
