use crate::errors::{ConverterError, Result};
use crate::formatter::{OutputMode, DEFAULT_COMPONENT_SELECTOR};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Converter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Theme values that extend the built-in property table
    pub theme: ThemeConfig,

    /// Extra or extended property entries, keyed by CSS property name
    pub properties: IndexMap<String, PropertyConfig>,

    /// Output settings
    pub output: OutputConfig,
}

/// Theme configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme extensions
    pub extend: ThemeExtend,
}

/// Theme extensions, named the way the Tailwind config names them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeExtend {
    /// Custom colors (`brand: "#0066cc"` maps to `text-brand`, `bg-brand`, ...)
    pub colors: IndexMap<String, String>,

    /// Custom font families
    #[serde(alias = "fontFamily")]
    pub font_family: IndexMap<String, Vec<String>>,

    /// Custom spacing values (`18: "4.5rem"` maps to `m-18`, `p-18`, ...)
    pub spacing: IndexMap<String, String>,
}

/// Values for a single CSS property
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyConfig {
    /// Prefix for arbitrary values; replaces the built-in one when set
    pub abbreviation: Option<String>,

    /// CSS value -> utility class
    pub values: IndexMap<String, String>,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Selector used by the `component` output mode
    pub component_selector: String,

    /// Mode used when a request does not name one
    pub default_mode: OutputMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            component_selector: DEFAULT_COMPONENT_SELECTOR.to_string(),
            default_mode: OutputMode::Classes,
        }
    }
}

impl ConverterConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConverterError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Ok(serde_yaml::from_str(&content)?)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConverterError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        serde_json::from_str(&content).map_err(|e| ConverterError::ConfigError {
            message: format!("Failed to parse JSON config: {}", e),
        })
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ConverterError::ConfigError {
                message: format!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .json",
                    path.display()
                ),
            }),
        }
    }

    /// Merge with another configuration; `other` wins on conflicting keys
    pub fn merge(mut self, other: Self) -> Self {
        self.theme.extend.colors.extend(other.theme.extend.colors);
        self.theme.extend.font_family.extend(other.theme.extend.font_family);
        self.theme.extend.spacing.extend(other.theme.extend.spacing);

        for (property, incoming) in other.properties {
            let current = self.properties.entry(property).or_default();
            if incoming.abbreviation.is_some() {
                current.abbreviation = incoming.abbreviation;
            }
            current.values.extend(incoming.values);
        }

        // Only a non-default output section overrides
        let defaults = OutputConfig::default();
        if other.output.component_selector != defaults.component_selector {
            self.output.component_selector = other.output.component_selector;
        }
        if other.output.default_mode != defaults.default_mode {
            self.output.default_mode = other.output.default_mode;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert!(config.properties.is_empty());
        assert_eq!(config.output.component_selector, ".component");
        assert_eq!(config.output.default_mode, OutputMode::Classes);
    }

    #[test]
    fn test_yaml_config_loading() {
        let yaml_content = r##"
theme:
  extend:
    colors:
      primary: "#1a73e8"
      secondary: "#ff6b6b"
    spacing:
      "18": "4.5rem"
properties:
  aspect-ratio:
    abbreviation: aspect
    values:
      "16 / 9": aspect-video
output:
  component_selector: ".card"
  default_mode: inline
"##;

        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(yaml_content.as_bytes()).unwrap();

        let config = ConverterConfig::from_file(file.path()).unwrap();
        assert_eq!(config.theme.extend.colors.get("primary"), Some(&"#1a73e8".to_string()));
        assert_eq!(config.theme.extend.spacing.get("18"), Some(&"4.5rem".to_string()));
        let aspect = &config.properties["aspect-ratio"];
        assert_eq!(aspect.abbreviation.as_deref(), Some("aspect"));
        assert_eq!(aspect.values.get("16 / 9"), Some(&"aspect-video".to_string()));
        assert_eq!(config.output.component_selector, ".card");
        assert_eq!(config.output.default_mode, OutputMode::Inline);
    }

    #[test]
    fn test_json_config_loading() {
        let json_content = r##"{
  "theme": {
    "extend": {
      "colors": {
        "brand": "#0066cc"
      },
      "fontFamily": {
        "display": ["Inter", "sans-serif"]
      }
    }
  }
}"##;

        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(json_content.as_bytes()).unwrap();

        let config = ConverterConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.theme.extend.colors.get("brand"), Some(&"#0066cc".to_string()));
        assert_eq!(config.theme.extend.font_family["display"], vec!["Inter", "sans-serif"]);
        assert_eq!(config.output.component_selector, ".component");
    }

    #[test]
    fn test_unknown_mode_in_config_falls_back() {
        let config: ConverterConfig =
            serde_json::from_str(r#"{ "output": { "default_mode": "fancy" } }"#).unwrap();
        assert_eq!(config.output.default_mode, OutputMode::Classes);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".toml").unwrap();
        let err = ConverterConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported config file format"));
    }

    #[test]
    fn test_invalid_yaml_is_yaml_error() {
        let mut file = NamedTempFile::with_suffix(".yml").unwrap();
        file.write_all(b"theme: [unclosed").unwrap();
        let err = ConverterConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConverterError::Yaml(_)));
        assert!(err.to_string().starts_with("Failed to parse YAML config"));
    }

    #[test]
    fn test_config_merge() {
        let mut base = ConverterConfig::default();
        base.theme.extend.colors.insert("primary".to_string(), "#111".to_string());

        let mut other = ConverterConfig::default();
        other.theme.extend.colors.insert("primary".to_string(), "#222".to_string());
        other.theme.extend.colors.insert("secondary".to_string(), "#333".to_string());
        other.output.component_selector = ".widget".to_string();

        let merged = base.merge(other);
        assert_eq!(merged.theme.extend.colors.get("primary"), Some(&"#222".to_string()));
        assert_eq!(merged.theme.extend.colors.get("secondary"), Some(&"#333".to_string()));
        assert_eq!(merged.output.component_selector, ".widget");
        assert_eq!(merged.output.default_mode, OutputMode::Classes);
    }
}
