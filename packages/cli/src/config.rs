use journal_editor::EditorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "journal.config.json";
pub const SERVER_URL_ENV: &str = "JOURNAL_SERVER_URL";

/// Journal client configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL of the journal server
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_server_url() -> String {
    "http://127.0.0.1:3030".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load config from a directory, then apply `JOURNAL_SERVER_URL`
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config = Self::load_file(cwd)?;
        Ok(config.with_server_override(std::env::var(SERVER_URL_ENV).ok()))
    }

    pub fn load_file(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = Self::path_in(cwd);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn path_in(cwd: &Path) -> PathBuf {
        cwd.join(DEFAULT_CONFIG_NAME)
    }

    pub fn with_server_override(mut self, server_url: Option<String>) -> Self {
        if let Some(url) = server_url.filter(|u| !u.trim().is_empty()) {
            self.server_url = url;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
            editor: EditorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "serverUrl": "http://journal.local:8080",
            "timeoutSecs": 3,
            "editor": { "holder": "journal", "inlineToolbar": false }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.server_url, "http://journal.local:8080");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.editor.holder, "journal");
        assert!(!config.editor.inline_toolbar);
        assert_eq!(config.editor.placeholder, "Type here to write your journal...");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_url, "http://127.0.0.1:3030");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.editor, EditorConfig::default());
    }

    #[test]
    fn test_missing_file_gives_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load_file(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn test_server_override() {
        let config = Config::default().with_server_override(Some("http://other:1".into()));
        assert_eq!(config.server_url, "http://other:1");

        let config = Config::default().with_server_override(Some("  ".into()));
        assert_eq!(config.server_url, "http://127.0.0.1:3030");
    }
}
