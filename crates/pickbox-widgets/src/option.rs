//! Option descriptor and the widget that renders one option row.

use pickbox_core::{
    widget::LayoutResult, AccessibleRole, Canvas, Color, Constraints, Event, Point, Rect, Size,
    TextStyle, TypeId, Widget,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeMap;

/// One selectable entry of a [`Select`](crate::Select).
///
/// `value` identifies the option; it is never painted. Extra host metadata
/// travels in `attributes` and is forwarded by [`OptionView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Identity of this option among its siblings
    pub value: String,
    /// Plain label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Rich content, rendered in preference to `text`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Whether this option is disabled
    #[serde(default)]
    pub disabled: bool,
    /// Extra metadata forwarded to the rendered row
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

impl SelectOption {
    /// Create an option with a plain text label.
    #[must_use]
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: Some(text.into()),
            content: None,
            disabled: false,
            attributes: BTreeMap::new(),
        }
    }

    /// Create an option where value equals label.
    #[must_use]
    pub fn simple(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), text)
    }

    /// Create an option that carries only rich content.
    #[must_use]
    pub fn with_content(value: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: None,
            content: Some(content.into()),
            disabled: false,
            attributes: BTreeMap::new(),
        }
    }

    /// Set rich content.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Attach a metadata attribute.
    #[must_use]
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Text shown in the option row and matched by search: content, else text.
    #[must_use]
    pub fn display(&self) -> &str {
        self.content
            .as_deref()
            .or(self.text.as_deref())
            .unwrap_or_default()
    }

    /// Text shown in the closed control for the selected option: text, else content.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.text.as_deref().or(self.content.as_deref())
    }
}

/// Renders a single option: its label followed by a check glyph.
#[derive(Debug, Clone)]
pub struct OptionView {
    option: SelectOption,
    selected: bool,
    hovered: bool,
    item_height: f32,
    text_size: f32,
    text_color: Color,
    disabled_color: Color,
    selected_bg_color: Color,
    hover_bg_color: Color,
    check_color: Color,
    idle_check_color: Color,
    bounds: Rect,
}

/// Horizontal padding inside a row.
const ROW_PADDING: f32 = 8.0;
/// Width of the check glyph box.
const CHECK_SIZE: f32 = 12.0;

impl OptionView {
    /// Create a view for an option.
    #[must_use]
    pub fn new(option: SelectOption) -> Self {
        Self {
            option,
            selected: false,
            hovered: false,
            item_height: 32.0,
            text_size: 14.0,
            text_color: Color::BLACK,
            disabled_color: Color::new(0.7, 0.7, 0.7, 1.0),
            selected_bg_color: Color::new(0.9, 0.95, 1.0, 1.0),
            hover_bg_color: Color::new(0.95, 0.95, 0.95, 1.0),
            check_color: Color::new(0.2, 0.47, 0.96, 1.0),
            idle_check_color: Color::new(0.88, 0.88, 0.88, 1.0),
            bounds: Rect::default(),
        }
    }

    /// Mark this row as the selected option.
    #[must_use]
    pub const fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Mark this row as hovered.
    #[must_use]
    pub const fn hovered(mut self, hovered: bool) -> Self {
        self.hovered = hovered;
        self
    }

    /// Set row height.
    #[must_use]
    pub fn item_height(mut self, height: f32) -> Self {
        self.item_height = height.max(20.0);
        self
    }

    /// Set label color.
    #[must_use]
    pub const fn text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Set the check glyph color used when selected.
    #[must_use]
    pub const fn check_color(mut self, color: Color) -> Self {
        self.check_color = color;
        self
    }

    /// Get the underlying descriptor.
    #[must_use]
    pub const fn option(&self) -> &SelectOption {
        &self.option
    }

    /// Whether this row is drawn as selected.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        self.selected
    }

    /// Look up a forwarded metadata attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.option.attributes.get(key).map(String::as_str)
    }

    /// Points of the check glyph inside `area`.
    fn check_points(area: Rect) -> [Point; 3] {
        [
            Point::new(area.x, area.height.mul_add(0.55, area.y)),
            Point::new(
                area.width.mul_add(0.4, area.x),
                area.height.mul_add(0.9, area.y),
            ),
            Point::new(area.right(), area.height.mul_add(0.1, area.y)),
        ]
    }

    fn estimate_text_width(&self) -> f32 {
        self.option.display().chars().count() as f32 * self.text_size * 0.6
    }
}

impl Widget for OptionView {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let width = ROW_PADDING.mul_add(3.0, self.estimate_text_width()) + CHECK_SIZE;
        constraints.constrain(Size::new(width, self.item_height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        let background = if self.selected {
            Some(self.selected_bg_color)
        } else if self.hovered && !self.option.disabled {
            Some(self.hover_bg_color)
        } else {
            None
        };
        if let Some(bg) = background {
            canvas.fill_rect(self.bounds, bg);
        }

        let style = TextStyle {
            size: self.text_size,
            color: if self.option.disabled {
                self.disabled_color
            } else {
                self.text_color
            },
            ..TextStyle::default()
        };
        let text_pos = Point::new(
            self.bounds.x + ROW_PADDING,
            self.bounds.y + (self.bounds.height - self.text_size) / 2.0,
        );
        canvas.draw_text(self.option.display(), text_pos, &style);

        let check_area = Rect::new(
            self.bounds.right() - ROW_PADDING - CHECK_SIZE,
            self.bounds.y + (self.bounds.height - CHECK_SIZE) / 2.0,
            CHECK_SIZE,
            CHECK_SIZE,
        );
        let check_color = if self.selected {
            self.check_color
        } else {
            self.idle_check_color
        };
        canvas.draw_path(&Self::check_points(check_area), check_color, 2.0);
    }

    fn event(&mut self, _event: &Event) -> Option<Box<dyn Any + Send>> {
        None
    }

    fn is_interactive(&self) -> bool {
        !self.option.disabled
    }

    fn accessible_name(&self) -> Option<&str> {
        self.attribute("aria-label")
            .or_else(|| Some(self.option.display()))
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Option
    }

    fn test_id(&self) -> Option<&str> {
        self.attribute("data-testid")
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
