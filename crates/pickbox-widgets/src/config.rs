//! Declarative Select configuration loaded from YAML or JSON.

use crate::error::ConfigError;
use crate::intersection::IntersectionOptions;
use crate::option::SelectOption;
use crate::select::Select;
use pickbox_core::Color;
use serde::{Deserialize, Serialize};

/// Hex colours (`#rrggbb` or `#rrggbbaa`) overriding the built-in palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectTheme {
    /// Control and list background
    pub background: Option<String>,
    /// Idle border
    pub border: Option<String>,
    /// Open border and check glyph
    pub accent: Option<String>,
    /// Label and option text
    pub text: Option<String>,
    /// Placeholder text
    pub placeholder: Option<String>,
}

/// Parsed [`SelectTheme`]; `None` keeps the widget default.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThemeColors {
    /// Control and list background
    pub background: Option<Color>,
    /// Idle border
    pub border: Option<Color>,
    /// Open border and check glyph
    pub accent: Option<Color>,
    /// Label and option text
    pub text: Option<Color>,
    /// Placeholder text
    pub placeholder: Option<Color>,
}

impl SelectTheme {
    /// Parse every colour that is set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad colour.
    pub fn parse(&self) -> Result<ThemeColors, ConfigError> {
        let parse = |field: &str, hex: &Option<String>| {
            hex.as_deref()
                .map(Color::from_hex)
                .transpose()
                .map_err(|e| ConfigError::invalid(field, format!("{e}")))
        };
        Ok(ThemeColors {
            background: parse("theme.background", &self.background)?,
            border: parse("theme.border", &self.border)?,
            accent: parse("theme.accent", &self.accent)?,
            text: parse("theme.text", &self.text)?,
            placeholder: parse("theme.placeholder", &self.placeholder)?,
        })
    }
}

/// Every Select prop plus presentation values, as loaded from a document.
///
/// # Examples
///
/// ```
/// use pickbox_widgets::SelectConfig;
///
/// let config = SelectConfig::from_yaml(
///     r#"
/// label: Fruit
/// searchable: true
/// options:
///   - value: a
///     text: Apple
///   - value: b
///     text: Banana
/// "#,
/// )
/// .expect("valid config");
/// assert_eq!(config.options.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    /// Hidden field id
    pub id: Option<String>,
    /// Hidden field name
    pub name: Option<String>,
    /// Controlled value
    pub value: Option<String>,
    /// Fallback value used while `value` is unset
    pub default_value: Option<String>,
    /// Label above the control
    pub label: Option<String>,
    /// Text shown when nothing is selected
    pub placeholder: Option<String>,
    /// Show the filter box
    pub searchable: bool,
    /// Show the clear affordance
    pub allow_clear: bool,
    /// Filter box placeholder
    pub search_text: Option<String>,
    /// Start disabled
    pub disabled: bool,
    /// Extra control class
    pub class_name: Option<String>,
    /// Extra list class
    pub list_class_name: Option<String>,
    /// Option list
    pub options: Vec<SelectOption>,
    /// Minimum control width
    pub min_width: f32,
    /// Height of the value area and of each row
    pub item_height: f32,
    /// Rows shown before the list is cut off
    pub max_visible_items: usize,
    /// Observer used to flip the list
    pub observer: IntersectionOptions,
    /// Colour overrides
    pub theme: SelectTheme,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            value: None,
            default_value: None,
            label: None,
            placeholder: None,
            searchable: false,
            allow_clear: false,
            search_text: None,
            disabled: false,
            class_name: None,
            list_class_name: None,
            options: Vec::new(),
            min_width: 150.0,
            item_height: 32.0,
            max_visible_items: 8,
            observer: IntersectionOptions::default(),
            theme: SelectTheme::default(),
        }
    }
}

impl SelectConfig {
    /// Parse and validate a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or a value is out of range.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.observer.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::invalid(
                "observer.threshold",
                format!("{threshold} is outside [0, 1]"),
            ));
        }
        if !self.observer.root_margin.is_finite() {
            return Err(ConfigError::invalid(
                "observer.root_margin",
                "must be finite",
            ));
        }
        if !(self.item_height.is_finite() && self.item_height > 0.0) {
            return Err(ConfigError::invalid(
                "item_height",
                format!("{} must be positive", self.item_height),
            ));
        }
        if !(self.min_width.is_finite() && self.min_width >= 0.0) {
            return Err(ConfigError::invalid(
                "min_width",
                format!("{} must not be negative", self.min_width),
            ));
        }
        if self.max_visible_items == 0 {
            return Err(ConfigError::invalid(
                "max_visible_items",
                "at least one row must be visible",
            ));
        }
        self.theme.parse()?;
        Ok(())
    }
}

impl Select {
    /// Build a widget from a configuration.
    ///
    /// An unparseable theme is ignored; [`SelectConfig::validate`] reports it.
    #[must_use]
    pub fn from_config(config: SelectConfig) -> Self {
        let SelectConfig {
            id,
            name,
            value,
            default_value,
            label,
            placeholder,
            searchable,
            allow_clear,
            search_text,
            disabled,
            class_name,
            list_class_name,
            options,
            min_width,
            item_height,
            max_visible_items,
            observer,
            theme,
        } = config;

        let mut select = Self::new()
            .options(options)
            .searchable(searchable)
            .allow_clear(allow_clear)
            .disabled(disabled)
            .min_width(min_width)
            .item_height(item_height)
            .max_visible_items(max_visible_items)
            .observer_options(observer);

        let colors = theme.parse().unwrap_or_default();
        if let Some(color) = colors.background {
            select = select.background_color(color);
        }
        if let Some(color) = colors.border {
            select = select.border_color(color);
        }
        if let Some(color) = colors.accent {
            select = select.accent_color(color);
        }
        if let Some(color) = colors.text {
            select = select.text_color(color);
        }
        if let Some(color) = colors.placeholder {
            select = select.placeholder_color(color);
        }

        select.set_value(value);
        select.set_default_value(default_value);
        if let Some(id) = id {
            select = select.id(id);
        }
        if let Some(name) = name {
            select = select.name(name);
        }
        if let Some(label) = label {
            select = select.label(label);
        }
        if let Some(placeholder) = placeholder {
            select = select.placeholder(placeholder);
        }
        if let Some(text) = search_text {
            select = select.search_text(text);
        }
        if let Some(class) = class_name {
            select = select.class_name(class);
        }
        if let Some(class) = list_class_name {
            select = select.list_class_name(class);
        }
        select
    }
}

impl From<SelectConfig> for Select {
    fn from(config: SelectConfig) -> Self {
        Self::from_config(config)
    }
}
