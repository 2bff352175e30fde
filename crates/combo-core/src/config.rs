use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ComboError, Result};
use crate::item::{items_from_labels, Item, Mode, Size};

/// Options recognized by a single combo box instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboOptions {
    #[serde(default)]
    pub items: Vec<Item>,

    #[serde(default)]
    pub placeholder: String,

    #[serde(default, rename = "type")]
    pub mode: Mode,

    #[serde(default)]
    pub size: Size,

    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboConfig {
    #[serde(default)]
    pub widget: WidgetConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default)]
    pub mode: Mode,

    #[serde(default)]
    pub size: Size,

    #[serde(default)]
    pub disabled: bool,

    #[serde(default = "default_items")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,

    #[serde(default = "default_max_visible_rows")]
    pub max_visible_rows: u16,
}

fn default_placeholder() -> String {
    "Select an item".to_string()
}
fn default_items() -> Vec<String> {
    vec![
        "Abacus".to_string(),
        "Byte".to_string(),
        "Computer".to_string(),
        "Digital".to_string(),
    ]
}
fn default_tick_rate() -> u64 {
    100
}
fn default_max_visible_rows() -> u16 {
    8
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            widget: WidgetConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            mode: Mode::default(),
            size: Size::default(),
            disabled: false,
            items: default_items(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            max_visible_rows: default_max_visible_rows(),
        }
    }
}

impl WidgetConfig {
    /// Widget options with fresh, unselected items.
    pub fn to_options(&self) -> ComboOptions {
        ComboOptions {
            items: items_from_labels(self.items.iter().cloned()),
            placeholder: self.placeholder.clone(),
            mode: self.mode,
            size: self.size,
            disabled: self.disabled,
        }
    }
}

impl ComboConfig {
    /// Load config from ~/.config/combo/config.toml, creating defaults if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .map_err(|e| ComboError::Config(format!("Failed to read config: {e}")))?;
            let config: ComboConfig = toml::from_str(&contents)
                .map_err(|e| ComboError::Config(format!("Failed to parse config: {e}")))?;
            Ok(config)
        } else {
            let config = ComboConfig::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ComboError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&config_path, contents)?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ComboError::Config("Could not determine config directory".into()))?;
        Ok(config_dir.join("combo").join("config.toml"))
    }
}

#[derive(Deserialize)]
struct ItemsFile {
    items: Vec<String>,
}

/// Read item labels from a `.json` array of strings or a `.toml` file with
/// a top-level `items` array.
pub fn load_item_labels(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    parse_item_labels(path, &contents)
}

fn parse_item_labels(path: &Path, contents: &str) -> Result<Vec<String>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") => Ok(serde_json::from_str(contents)?),
        Some("toml") => {
            let file: ItemsFile = toml::from_str(contents).map_err(|e| {
                ComboError::Items(format!("Failed to parse {}: {e}", path.display()))
            })?;
            Ok(file.items)
        }
        _ => Err(ComboError::Items(format!(
            "Unsupported item file {} (expected .json or .toml)",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: ComboConfig = toml::from_str(
            r#"
            [widget]
            mode = "multi"
            "#,
        )
        .unwrap();
        assert_eq!(config.widget.mode, Mode::Multi);
        assert_eq!(config.widget.items.len(), 4);
        assert_eq!(config.ui.max_visible_rows, 8);
    }

    #[test]
    fn options_use_type_key() {
        let options: ComboOptions =
            serde_json::from_str(r#"{"type":"multi","items":[{"content":"Byte"}]}"#).unwrap();
        assert_eq!(options.mode, Mode::Multi);
        assert_eq!(options.items[0].content, "Byte");
        assert!(!options.disabled);
    }

    #[test]
    fn item_labels_from_toml_and_json() {
        let toml_labels =
            parse_item_labels(Path::new("a.toml"), "items = [\"x\", \"y\"]").unwrap();
        assert_eq!(toml_labels, vec!["x", "y"]);

        let json_labels = parse_item_labels(Path::new("a.JSON"), r#"["z"]"#).unwrap();
        assert_eq!(json_labels, vec!["z"]);

        assert!(matches!(
            parse_item_labels(Path::new("a.txt"), ""),
            Err(ComboError::Items(_))
        ));
    }
}
