//! Configuration management for iqraa.
//!
//! Parses `iqraa.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! Every section and field is optional; missing values fall back to the
//! defaults the theme ships with:
//!
//! ```toml
//! [scope]
//! selectors = [".post-body", "[itemprop='articleBody']", "article", ".entry-content", ".post-content", "body"]
//! done_attr = "data-iqraa-done"
//!
//! [observer]
//! debounce_ms = 80
//!
//! [media]
//! root_margin_px = 600
//! near_viewport_px = 300
//! fallback_viewport_height = 800
//!
//! [ui]
//! copy_revert_ms = 1200
//! copy_label = "نسخ الكود"
//! copied_label = "تم النسخ"
//! copy_failed_label = "فشل النسخ"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Command-line overrides.
///
/// Only the fields that are set replace values from `iqraa.toml`.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the scope selector list with a single selector.
    pub scope: Option<String>,
    /// Override the mutation debounce delay.
    pub debounce_ms: Option<u64>,
}

/// File looked up by discovery.
const CONFIG_FILENAME: &str = "iqraa.toml";

/// Engine configuration, one section per subsystem.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scope resolution and candidate flagging.
    pub scope: ScopeConfig,
    /// Mutation observation.
    pub observer: ObserverConfig,
    /// Lazy media activation.
    pub media: MediaConfig,
    /// Widget interaction.
    pub ui: UiConfig,

    /// File the configuration came from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Scope configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Scope selectors, most specific first.
    pub selectors: Vec<String>,
    /// Attribute flagging examined candidates.
    pub done_attr: String,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            selectors: [
                ".post-body",
                "[itemprop='articleBody']",
                "article",
                ".entry-content",
                ".post-content",
                "body",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            done_attr: "data-iqraa-done".to_owned(),
        }
    }
}

/// Mutation observer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Quiet period after the last mutation before a pass runs.
    pub debounce_ms: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self { debounce_ms: 80 }
    }
}

/// Lazy media configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Vertical look-ahead around the viewport.
    pub root_margin_px: u32,
    /// Distance below the viewport within which images load immediately.
    pub near_viewport_px: u32,
    /// Viewport height assumed when the surface does not report one.
    pub fallback_viewport_height: u32,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root_margin_px: 600,
            near_viewport_px: 300,
            fallback_viewport_height: 800,
        }
    }
}

/// Widget interaction configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Delay before the copy button shows its original content again.
    pub copy_revert_ms: u64,
    /// Copy button label.
    pub copy_label: String,
    /// Label shown after a successful copy.
    pub copied_label: String,
    /// Label shown after a failed copy.
    pub copy_failed_label: String,
    /// Icon markup placed before the copy label (built-in icon when unset).
    pub copy_icon: Option<String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            copy_revert_ms: 1200,
            copy_label: "نسخ الكود".to_owned(),
            copied_label: "تم النسخ".to_owned(),
            copy_failed_label: "فشل النسخ".to_owned(),
            copy_icon: None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `iqraa.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Overlay command-line values.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(scope) = &settings.scope {
            self.scope.selectors = vec![scope.clone()];
        }
        if let Some(debounce_ms) = settings.debounce_ms {
            self.observer.debounce_ms = debounce_ms;
        }
    }

    /// Walk from the working directory up to the filesystem root.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Parse and validate one file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_scope()?;
        self.validate_observer()?;
        self.validate_ui()?;
        Ok(())
    }

    /// Validate scope configuration.
    fn validate_scope(&self) -> Result<(), ConfigError> {
        if self.scope.selectors.is_empty() {
            return Err(ConfigError::Validation(
                "scope.selectors cannot be empty".to_owned(),
            ));
        }
        for selector in &self.scope.selectors {
            require_non_empty(selector, "scope.selectors entry")?;
        }

        require_non_empty(&self.scope.done_attr, "scope.done_attr")?;
        if !self.scope.done_attr.starts_with("data-") {
            return Err(ConfigError::Validation(
                "scope.done_attr must start with data-".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate observer configuration.
    fn validate_observer(&self) -> Result<(), ConfigError> {
        if self.observer.debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "observer.debounce_ms must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate UI configuration.
    fn validate_ui(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.ui.copy_label, "ui.copy_label")?;
        require_non_empty(&self.ui.copied_label, "ui.copied_label")?;
        require_non_empty(&self.ui.copy_failed_label, "ui.copy_failed_label")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scope.selectors.len(), 6);
        assert_eq!(config.scope.selectors[0], ".post-body");
        assert_eq!(config.scope.selectors[5], "body");
        assert_eq!(config.scope.done_attr, "data-iqraa-done");
        assert_eq!(config.observer.debounce_ms, 80);
        assert_eq!(config.media.root_margin_px, 600);
        assert_eq!(config.media.near_viewport_px, 300);
        assert_eq!(config.media.fallback_viewport_height, 800);
        assert_eq!(config.ui.copy_revert_ms, 1200);
        assert_eq!(config.ui.copied_label, "تم النسخ");
        assert!(config.ui.copy_icon.is_none());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.observer.debounce_ms, 80);
        assert_eq!(config.ui.copy_label, "نسخ الكود");
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml = r#"
[scope]
selectors = ["main", "body"]

[media]
root_margin_px = 200

[ui]
copy_label = "Copy"
copy_icon = "<i></i>"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.scope.selectors, vec!["main", "body"]);
        assert_eq!(config.scope.done_attr, "data-iqraa-done");
        assert_eq!(config.media.root_margin_px, 200);
        assert_eq!(config.media.near_viewport_px, 300);
        assert_eq!(config.ui.copy_label, "Copy");
        assert_eq!(config.ui.copy_icon.as_deref(), Some("<i></i>"));
        assert_eq!(config.ui.copied_label, "تم النسخ");
    }

    #[test]
    fn test_parse_invalid_type() {
        let result: Result<Config, _> = toml::from_str("[observer]\ndebounce_ms = \"soon\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings_debounce() {
        let mut config = Config::default();
        let overrides = CliSettings {
            debounce_ms: Some(250),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.observer.debounce_ms, 250);
        assert_eq!(config.scope.selectors.len(), 6); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_scope() {
        let mut config = Config::default();
        let overrides = CliSettings {
            scope: Some("#content".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.scope.selectors, vec!["#content"]);
        assert_eq!(config.observer.debounce_ms, 80); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.observer.debounce_ms, 80);
        assert_eq!(config.scope.selectors[0], ".post-body");
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_selectors() {
        let mut config = Config::default();
        config.scope.selectors.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scope.selectors"));
    }

    #[test]
    fn test_validate_blank_selector() {
        let mut config = Config::default();
        config.scope.selectors.push("  ".to_owned());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_done_attr_prefix() {
        let mut config = Config::default();
        config.scope.done_attr = "done".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("data-"));
    }

    #[test]
    fn test_validate_debounce_zero() {
        let mut config = Config::default();
        config.observer.debounce_ms = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("debounce_ms"));
    }

    #[test]
    fn test_validate_empty_label() {
        let mut config = Config::default();
        config.ui.copy_failed_label = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("ui.copy_failed_label"));
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(&path, "[observer]\ndebounce_ms = 40\n").unwrap();

        let config = Config::load(Some(path.as_path()), None).unwrap();

        assert_eq!(config.observer.debounce_ms, 40);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = Config::load(Some(path.as_path()), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("iqraa.toml");
        std::fs::write(&path, "[scope]\ndone_attr = \"processed\"\n").unwrap();

        let err = Config::load(Some(path.as_path()), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_rejects_invalid_override() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("iqraa.toml");
        std::fs::write(&path, "").unwrap();
        let overrides = CliSettings {
            debounce_ms: Some(0),
            ..Default::default()
        };

        let err = Config::load(Some(path.as_path()), Some(&overrides)).unwrap_err();

        assert!(err.to_string().contains("debounce_ms"));
    }
}
