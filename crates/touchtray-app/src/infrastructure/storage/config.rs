//! TOML-based configuration persistence.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\TouchTray\config.toml`
//! - Linux:    `~/.config/touchtray/config.toml`
//! - macOS:    `~/Library/Application Support/TouchTray/config.toml`
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return
//! value of `some_fn()` when the field is absent from the TOML file, so the
//! app works on first run (before a config file exists) and when upgrading
//! from an older file that is missing newer fields.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub app: GeneralConfig,
}

/// Which hardware device the tray icon controls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    /// Case-insensitive substring matched against device display names.
    /// Must match exactly one present device or the app refuses to start.
    #[serde(default = "default_name_filter")]
    pub name_filter: String,
}

/// General application behaviour settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Hover text shown on the tray icon.
    #[serde(default = "default_tooltip")]
    pub tooltip: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_name_filter() -> String {
    "touch screen".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_tooltip() -> String {
    "Enable or Disable touch screen".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            app: GeneralConfig::default(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name_filter: default_name_filter(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            tooltip: default_tooltip(),
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config
/// base directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from disk, returning `AppConfig::default()` if the file
/// does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not
/// found", and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let path = config_file_path()?;

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let cfg: AppConfig = toml::from_str(&content)?;
            Ok(cfg)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Persists `config` to disk.
///
/// Creates the config directory and file if they do not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    let path = config_file_path()?;

    // Ensure directory exists before writing.
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(&path, content).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(())
}

/// Writes `config` to disk when no config file exists yet.
///
/// Returns `Ok(true)` when the file was materialised by this call and
/// `Ok(false)` when one was already present (which is then left untouched).
///
/// # Errors
///
/// Same failure modes as [`save_config`].
pub fn ensure_config_file(config: &AppConfig) -> Result<bool, ConfigError> {
    let path = config_file_path()?;
    if path.exists() {
        return Ok(false);
    }
    save_config(config)?;
    Ok(true)
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("TouchTray"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("touchtray"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("TouchTray")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── AppConfig defaults ────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_targets_touch_screen() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.device.name_filter, "touch screen");
    }

    #[test]
    fn test_app_config_default_log_level_is_info() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.app.log_level, "info");
    }

    #[test]
    fn test_app_config_default_tooltip_describes_the_toggle() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.app.tooltip, "Enable or Disable touch screen");
    }

    // ── TOML round-trip ───────────────────────────────────────────────────────

    #[test]
    fn test_app_config_serializes_and_deserializes_round_trip() {
        // Arrange
        let mut cfg = AppConfig::default();
        cfg.device.name_filter = "wacom".to_string();
        cfg.app.log_level = "debug".to_string();

        // Act
        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: AppConfig = toml::from_str(&toml_str).expect("deserialize");

        // Assert
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_deserialize_empty_toml_uses_all_defaults() {
        // Arrange: an empty file is a valid first-run config
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");

        // Assert
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_device_section_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[device]
name_filter = "elan touch"
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.device.name_filter, "elan touch");
        // Unspecified fields keep their defaults
        assert_eq!(cfg.app.log_level, "info");
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let bad_toml = "[[[ not valid toml";
        let result: Result<AppConfig, toml::de::Error> = toml::from_str(bad_toml);
        assert!(result.is_err());
    }

    // ── load/save through the file system ─────────────────────────────────────

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("touchtray_cfg_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.device.name_filter = "goodix touch".to_string();
        cfg.app.log_level = "trace".to_string();

        // Act – serialize and write manually (mirrors save_config logic)
        let content = toml::to_string_pretty(&cfg).unwrap();
        std::fs::write(&path, &content).unwrap();
        let loaded: AppConfig = toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();

        // Assert
        assert_eq!(loaded.device.name_filter, "goodix touch");
        assert_eq!(loaded.app.log_level, "trace");

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_ensure_config_file_writes_defaults_once() {
        // Arrange – point the XDG base at a private temp dir so the test
        // never touches a real user config
        let dir =
            std::env::temp_dir().join(format!("touchtray_cfg_ensure_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::env::set_var("XDG_CONFIG_HOME", &dir);

        // Act
        let first = ensure_config_file(&AppConfig::default()).expect("first run writes");
        let second = ensure_config_file(&AppConfig::default()).expect("second run is a no-op");

        // Assert
        assert!(first, "first call must materialise the file");
        assert!(!second, "an existing file must be left untouched");
        assert_eq!(load_config().expect("load"), AppConfig::default());

        // Cleanup
        std::env::remove_var("XDG_CONFIG_HOME");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        let path_result = config_file_path();
        if let Ok(path) = path_result {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir (e.g. in a stripped CI env) is also acceptable.
    }
}
