use std::path::Path;
use std::time::Duration;

use dock_scan::{ScanConfig, ScanConfigError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const DEFAULT_USERNAME: &str = "operator";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("username must not be empty")]
    EmptyUsername,

    #[error("backend_url must not be empty")]
    EmptyBackendUrl,

    #[error("request_timeout_secs must be at least 1")]
    ZeroTimeout,

    #[error(transparent)]
    Scan(#[from] ScanConfigError),
}

/// Settings for the `dock` binary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    pub backend_url: String,
    pub username: String,
    pub request_timeout_secs: u64,
    pub scan: ScanConfig,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            username: DEFAULT_USERNAME.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            scan: ScanConfig::default(),
        }
    }
}

impl DockConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load `path` if given, otherwise use defaults; then apply CLI overrides
    /// and validate.
    pub fn resolve(
        path: Option<&Path>,
        backend_url: Option<String>,
        username: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(url) = backend_url {
            config.backend_url = url;
        }
        if let Some(user) = username {
            config.username = user;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.trim().is_empty() {
            return Err(ConfigError::EmptyUsername);
        }
        if self.backend_url.trim().is_empty() {
            return Err(ConfigError::EmptyBackendUrl);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.scan.validate()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DockConfig::default();
        config.validate().unwrap();
        assert_eq!(config.scan.debounce_ms, 800);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
username = "clerk"

[scan]
debounce_ms = 500
"#
        )
        .unwrap();

        let config = DockConfig::resolve(Some(file.path()), None, None).unwrap();
        assert_eq!(config.username, "clerk");
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.scan.debounce_ms, 500);
        assert_eq!(config.scan.min_len, 6);
    }

    #[test]
    fn overrides_win() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dock.toml");
        std::fs::write(&path, "backend_url = \"http://wms:9000\"\nusername = \"clerk\"\n").unwrap();

        let config = DockConfig::resolve(
            Some(&path),
            Some("http://other:1".into()),
            Some("night-shift".into()),
        )
        .unwrap();
        assert_eq!(config.backend_url, "http://other:1");
        assert_eq!(config.username, "night-shift");
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            DockConfig::resolve(None, None, Some("  ".into())),
            Err(ConfigError::EmptyUsername)
        ));

        let config = DockConfig::parse("[scan]\nmin_len = 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Scan(ScanConfigError::ZeroMinLength))
        ));

        let config = DockConfig::parse("request_timeout_secs = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::ZeroTimeout)));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = DockConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            DockConfig::parse("username = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
