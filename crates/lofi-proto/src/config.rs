use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use anyhow::Context;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Where the track backend lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Initial volume, 0.0 - 1.0.
    #[serde(default = "default_volume")]
    pub default_volume: f32,
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,
    #[serde(default = "default_volume_step")]
    pub volume_step: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Terminal widths below this render the mini player.
    #[serde(default = "default_mini_breakpoint")]
    pub mini_breakpoint_cols: u16,
    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding favorites and the resume session.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    /// Optional TOML list of `[[track]]` tables shown when the backend is down.
    #[serde(default = "default_fallback_tracks")]
    pub fallback_tracks: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
            seek_step_secs: default_seek_step(),
            volume_step: default_volume_step(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mini_breakpoint_cols: default_mini_breakpoint(),
            search_debounce_ms: default_search_debounce(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            fallback_tracks: default_fallback_tracks(),
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_volume() -> f32 {
    0.8
}

fn default_seek_step() -> f64 {
    5.0
}

fn default_volume_step() -> f32 {
    0.05
}

fn default_mini_breakpoint() -> u16 {
    100
}

fn default_search_debounce() -> u64 {
    400
}

fn default_store_dir() -> PathBuf {
    platform::data_dir().join("store")
}

fn default_fallback_tracks() -> PathBuf {
    platform::config_dir().join("tracks.toml")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read `path`, writing the defaults there first when it does not exist.
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.ui.mini_breakpoint_cols, 100);
        assert_eq!(config.ui.search_debounce_ms, 400);
        assert_eq!(config.player.seek_step_secs, 5.0);
        assert!(config.paths.store_dir.ends_with("lofichill/store"));
        assert!(config.paths.fallback_tracks.ends_with("lofichill/tracks.toml"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [api]
            base_url = "http://music.lan:9000"

            [ui]
            mini_breakpoint_cols = 80
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://music.lan:9000");
        assert_eq!(config.ui.mini_breakpoint_cols, 80);
        assert_eq!(config.ui.search_debounce_ms, 400);
        assert_eq!(config.player.default_volume, 0.8);
    }

    #[test]
    fn test_first_load_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.api.base_url, default_base_url());
        let again = Config::load_from(&path).unwrap();
        assert_eq!(again.ui.mini_breakpoint_cols, config.ui.mini_breakpoint_cols);
    }
}
