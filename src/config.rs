//! Overflow Lab Configuration
//!
//! Handles parsing and management of overflow-lab.toml configuration files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for in the current directory and its parents.
pub const CONFIG_FILE_NAME: &str = "overflow-lab.toml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure matching overflow-lab.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LabConfig {
    /// Audit log settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Built-in demonstration inputs
    #[serde(default)]
    pub demo: DemoConfig,

    /// Resource limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Interactive menu behavior
    #[serde(default)]
    pub menu: MenuConfig,
}

impl LabConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: LabConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the current directory or parents.
    pub fn load_from_cwd() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().map_err(ConfigError::Io)?;
        Self::find_and_load(&cwd)
    }

    /// Find and load configuration by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Self> {
        match Self::find(start_dir) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Locate the nearest config file at or above `start_dir`.
    pub fn find(start_dir: &Path) -> Option<PathBuf> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

/// Audit log settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditConfig {
    /// Append one line per processed input
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log file, relative to the working directory
    #[serde(default = "default_audit_path")]
    pub path: String,
}

fn default_true() -> bool {
    true
}

fn default_audit_path() -> String {
    "overflow_lab.log".to_string()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_audit_path(),
        }
    }
}

/// Inputs used when the user does not supply one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DemoConfig {
    /// Value written by the unsafe integer demo
    #[serde(default = "default_unsafe_int_value")]
    pub unsafe_int_value: i64,

    /// Index the unsafe integer demo writes to
    #[serde(default = "default_unsafe_int_index")]
    pub unsafe_int_index: usize,

    /// Index the safe integer demo writes to
    #[serde(default = "default_safe_int_index")]
    pub safe_int_index: i64,

    /// Value the safe integer demo writes
    #[serde(default = "default_sentinel")]
    pub sentinel: i32,

    #[serde(default = "default_unsafe_string")]
    pub unsafe_string: String,

    #[serde(default = "default_safe_string")]
    pub safe_string: String,

    #[serde(default = "default_unsafe_array")]
    pub unsafe_array: Vec<i32>,

    #[serde(default = "default_safe_array")]
    pub safe_array: Vec<i32>,

    /// Sequence the read demos index into
    #[serde(default = "default_read_sequence")]
    pub read_sequence: Vec<i32>,

    #[serde(default = "default_read_index")]
    pub read_index: i64,

    /// Elements requested by the allocation demo
    #[serde(default = "default_allocation_size")]
    pub allocation_size: i64,
}

fn default_unsafe_int_value() -> i64 {
    999
}

fn default_unsafe_int_index() -> usize {
    3
}

fn default_safe_int_index() -> i64 {
    1
}

fn default_sentinel() -> i32 {
    42
}

fn default_unsafe_string() -> String {
    "ThisIsAVeryLongInputThatWillOverflow".to_string()
}

fn default_safe_string() -> String {
    "SafeInput".to_string()
}

fn default_unsafe_array() -> Vec<i32> {
    vec![1, 2, 3, 4, 5, 6]
}

fn default_safe_array() -> Vec<i32> {
    vec![1, 2, 3]
}

fn default_read_sequence() -> Vec<i32> {
    vec![10, 20, 30]
}

fn default_read_index() -> i64 {
    5
}

fn default_allocation_size() -> i64 {
    1024
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            unsafe_int_value: default_unsafe_int_value(),
            unsafe_int_index: default_unsafe_int_index(),
            safe_int_index: default_safe_int_index(),
            sentinel: default_sentinel(),
            unsafe_string: default_unsafe_string(),
            safe_string: default_safe_string(),
            unsafe_array: default_unsafe_array(),
            safe_array: default_safe_array(),
            read_sequence: default_read_sequence(),
            read_index: default_read_index(),
            allocation_size: default_allocation_size(),
        }
    }
}

/// Resource limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LimitsConfig {
    /// Largest allocation, in elements, the allocation demo will attempt
    #[serde(default = "default_max_allocation")]
    pub max_allocation: usize,
}

fn default_max_allocation() -> usize {
    16 * 1024 * 1024
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_allocation: default_max_allocation(),
        }
    }
}

/// Interactive menu settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MenuConfig {
    /// Ask for a value after the variant choice (blank keeps the demo value)
    #[serde(default)]
    pub prompt_for_values: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LabConfig::default();
        assert!(config.audit.enabled);
        assert_eq!(config.audit.path, "overflow_lab.log");
        assert_eq!(config.demo.unsafe_int_value, 999);
        assert_eq!(config.demo.safe_string, "SafeInput");
        assert_eq!(config.limits.max_allocation, 16 * 1024 * 1024);
        assert!(!config.menu.prompt_for_values);
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
[audit]
enabled = false

[demo]
safe_int_index = 5
safe_array = [7, 8]

[limits]
max_allocation = 64

[menu]
prompt_for_values = true
"#;
        let config: LabConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.audit.enabled);
        assert_eq!(config.audit.path, "overflow_lab.log");
        assert_eq!(config.demo.safe_int_index, 5);
        assert_eq!(config.demo.safe_array, vec![7, 8]);
        assert_eq!(config.demo.unsafe_int_index, 3);
        assert_eq!(config.limits.max_allocation, 64);
        assert!(config.menu.prompt_for_values);
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = std::env::temp_dir().join(format!("overflow_lab_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);

        let mut config = LabConfig::default();
        config.demo.read_index = 2;
        config.save(&path).unwrap();

        let nested = dir.join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        let loaded = LabConfig::find_and_load(&nested).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/definitely/not/here/overflow-lab.toml");
        assert!(matches!(
            LabConfig::load(path),
            Err(ConfigError::NotFound(_))
        ));
    }
}
