//! Suite configuration
//!
//! Layered as: built-in defaults, then an optional YAML file, then
//! `BLOGLIST_E2E_*` environment variables, then command-line flags (applied
//! by the test binary).

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{E2eError, E2eResult};

pub const ENV_APP_URL: &str = "BLOGLIST_E2E_APP_URL";
pub const ENV_API_URL: &str = "BLOGLIST_E2E_API_URL";
pub const ENV_BROWSER: &str = "BLOGLIST_E2E_BROWSER";
pub const ENV_HEADLESS: &str = "BLOGLIST_E2E_HEADLESS";
pub const ENV_TIMEOUT_MS: &str = "BLOGLIST_E2E_TIMEOUT_MS";
pub const ENV_EXTENDED_TIMEOUT_MS: &str = "BLOGLIST_E2E_EXTENDED_TIMEOUT_MS";
pub const ENV_NODE_DIR: &str = "BLOGLIST_E2E_NODE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct E2eConfig {
    /// Front-end served to the browser
    pub app_url: String,

    /// Backend receiving the fixture calls
    pub api_url: String,

    pub browser: Browser,

    pub headless: bool,

    pub viewport: Viewport,

    pub timeouts: TimeoutConfig,

    /// Directory whose `node_modules` holds `@playwright/test`
    pub node_dir: PathBuf,

    /// Results, failure screenshots and emitted scripts
    pub output_dir: PathBuf,
}

impl Default for E2eConfig {
    fn default() -> Self {
        Self {
            app_url: "http://localhost:5173".to_string(),
            api_url: "http://localhost:3003".to_string(),
            browser: Browser::Chromium,
            headless: true,
            viewport: Viewport::default(),
            timeouts: TimeoutConfig::default(),
            node_dir: PathBuf::from("."),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Actions and ordinary expectations
    pub default_ms: u64,

    /// Expectations that wait on a server round trip
    pub extended_ms: u64,

    /// How long to wait for the app and API to come up
    pub startup_ms: u64,

    /// Per fixture HTTP request
    pub request_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_ms: 5000,
            extended_ms: 15000,
            startup_ms: 30000,
            request_ms: 10000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" | "safari" => Ok(Browser::Webkit),
            other => Err(E2eError::Config(format!("unknown browser '{}'", other))),
        }
    }
}

impl E2eConfig {
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    /// Load configuration from file, falling back to defaults if it is absent
    pub fn load(path: &Path) -> E2eResult<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            Self::from_yaml(&content)
        } else {
            debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn apply_env(&mut self) -> E2eResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `BLOGLIST_E2E_*` overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> E2eResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_APP_URL) {
            self.app_url = url;
        }
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(browser) = lookup(ENV_BROWSER) {
            self.browser = browser.parse()?;
        }
        if let Some(headless) = lookup(ENV_HEADLESS) {
            self.headless = parse_bool(ENV_HEADLESS, &headless)?;
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS) {
            self.timeouts.default_ms = parse_ms(ENV_TIMEOUT_MS, &ms)?;
        }
        if let Some(ms) = lookup(ENV_EXTENDED_TIMEOUT_MS) {
            self.timeouts.extended_ms = parse_ms(ENV_EXTENDED_TIMEOUT_MS, &ms)?;
        }
        if let Some(dir) = lookup(ENV_NODE_DIR) {
            self.node_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn validate(&self) -> E2eResult<()> {
        for (field, url) in [("app_url", &self.app_url), ("api_url", &self.api_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(E2eError::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }
        if self.timeouts.default_ms == 0 {
            return Err(E2eError::Config("default timeout must be non-zero".into()));
        }
        if self.timeouts.extended_ms < self.timeouts.default_ms {
            return Err(E2eError::Config(format!(
                "extended timeout ({} ms) is shorter than the default ({} ms)",
                self.timeouts.extended_ms, self.timeouts.default_ms
            )));
        }
        Ok(())
    }

    /// API URL without a trailing slash
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// App URL without a trailing slash
    pub fn app_base(&self) -> &str {
        self.app_url.trim_end_matches('/')
    }

    pub fn screenshot_dir(&self) -> PathBuf {
        self.output_dir.join("screenshots")
    }

    pub fn script_dir(&self) -> PathBuf {
        self.output_dir.join("scripts")
    }
}

fn parse_bool(key: &str, value: &str) -> E2eResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(E2eError::Config(format!("{}: not a boolean '{}'", key, other))),
    }
}

fn parse_ms(key: &str, value: &str) -> E2eResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| E2eError::Config(format!("{}: not a millisecond count '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_point_at_local_app() {
        let config = E2eConfig::default();
        assert_eq!(config.app_url, "http://localhost:5173");
        assert_eq!(config.api_url, "http://localhost:3003");
        assert!(config.headless);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
api_url: http://127.0.0.1:4000/
browser: firefox
timeouts:
  extended_ms: 20000
"#;
        let config = E2eConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.api_base(), "http://127.0.0.1:4000");
        assert_eq!(config.app_url, "http://localhost:5173");
        assert_eq!(config.browser, Browser::Firefox);
        assert_eq!(config.timeouts.extended_ms, 20000);
        assert_eq!(config.timeouts.default_ms, 5000);
    }

    #[test]
    fn test_bundled_sample_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("e2e.yaml");
        let config = E2eConfig::load(&path).unwrap();
        assert_eq!(config.api_url, "http://localhost:3003");
        assert_eq!(config.timeouts, TimeoutConfig::default());
        config.validate().unwrap();
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = E2eConfig::load(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("test-results"));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_APP_URL, "http://app.test:8080"),
            (ENV_BROWSER, "webkit"),
            (ENV_HEADLESS, "false"),
            (ENV_TIMEOUT_MS, "2500"),
        ]
        .into_iter()
        .collect();

        let mut config = E2eConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.app_url, "http://app.test:8080");
        assert_eq!(config.browser, Browser::Webkit);
        assert!(!config.headless);
        assert_eq!(config.timeouts.default_ms, 2500);
        assert_eq!(config.api_url, "http://localhost:3003");
    }

    #[test]
    fn test_bad_env_value_is_config_error() {
        let mut config = E2eConfig::default();
        let err = config
            .apply_overrides(|key| (key == ENV_TIMEOUT_MS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, E2eError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_short_extended_timeout() {
        let mut config = E2eConfig::default();
        config.timeouts.extended_ms = 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let config = E2eConfig {
            api_url: "localhost:3003".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
