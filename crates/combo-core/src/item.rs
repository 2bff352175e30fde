use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ComboError;

/// Stable identity of an item, independent of its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    pub content: String,
    #[serde(default)]
    pub selected: bool,
}

impl Item {
    /// A fresh, unselected item.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            content: content.into(),
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

/// Build a list of unselected items from plain labels.
pub fn items_from_labels<I, S>(labels: I) -> Vec<Item>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels.into_iter().map(Item::new).collect()
}

/// Selection behaviour of the combo box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One item at a time; picking an item returns focus to the field
    /// and collapses the dropdown.
    #[default]
    Single,
    /// Any number of items, rendered as pills. The dropdown stays open
    /// between picks.
    Multi,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Single => "single",
            Mode::Multi => "multi",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mode {
    type Err = ComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Mode::Single),
            "multi" => Ok(Mode::Multi),
            other => Err(ComboError::Config(format!(
                "Unknown combo box type '{other}' (expected 'single' or 'multi')"
            ))),
        }
    }
}

/// Presentational size hint. Has no effect on selection behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Sm,
    #[default]
    Default,
    Lg,
}

impl Size {
    /// Rows the text field occupies in the terminal.
    pub fn field_height(&self) -> u16 {
        match self {
            Size::Sm => 1,
            Size::Default => 3,
            Size::Lg => 5,
        }
    }
}

impl std::str::FromStr for Size {
    type Err = ComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sm" => Ok(Size::Sm),
            "default" => Ok(Size::Default),
            "lg" => Ok(Size::Lg),
            other => Err(ComboError::Config(format!(
                "Unknown combo box size '{other}' (expected 'sm', 'default' or 'lg')"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn items_with_same_content_are_distinct() {
        let a = Item::new("Byte");
        let b = Item::new("Byte");
        assert_ne!(a.id, b.id);
        assert_ne!(a, b);
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Multi".parse::<Mode>().unwrap(), Mode::Multi);
        assert_eq!(" single ".parse::<Mode>().unwrap(), Mode::Single);
        assert!("both".parse::<Mode>().is_err());
    }

    #[test]
    fn item_deserializes_without_id_or_flag() {
        let item: Item = serde_json::from_str(r#"{"content":"Abacus"}"#).unwrap();
        assert_eq!(item.content, "Abacus");
        assert!(!item.selected);
    }
}
