//! Controlled dropdown Select widget.
//!
//! The host owns the committed value: `Select` only reports choices through
//! its `on_change` callback and the [`SelectionChanged`] message, and paints
//! whatever value it was last given. The widget itself owns the transient
//! state: whether the list is open, which way it drops, the search query and
//! the filtered option list.

use crate::intersection::{IntersectionEntry, IntersectionObserver, IntersectionOptions};
use crate::option::{OptionView, SelectOption};
use crate::outside_click::OutsideClick;
use crate::search::filter_options;
use pickbox_core::{
    widget::{AccessibleRole, LayoutResult},
    Canvas, Color, Constraints, Event, FontWeight, Key, Point, Rect, Size, TextStyle, TypeId,
    Widget,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use tracing::{debug, trace};

/// Height of the label row above the value area.
const LABEL_HEIGHT: f32 = 20.0;
/// Width reserved at the right edge for the chevron.
const CHEVRON_ZONE: f32 = 24.0;
/// Side of the clear icon hit box.
const CLEAR_SIZE: f32 = 16.0;
/// Shown when there is neither a selection nor a placeholder.
const BLANK: &str = "\u{a0}";

/// Message emitted when the user picks an option or clears the selection.
///
/// A cleared selection carries an empty `value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    /// The chosen value ("" when cleared)
    pub value: String,
}

impl SelectionChanged {
    /// Whether this change clears the selection.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.value.is_empty()
    }
}

/// Message emitted when the value area toggles the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectToggled {
    /// Whether the list is now open
    pub open: bool,
}

/// Message emitted when the list closes for a reason other than a toggle,
/// a selection or a clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectClosed {
    /// Why the list closed
    pub reason: CloseReason,
}

/// Message emitted when the search query changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchChanged {
    /// Current query
    pub query: String,
    /// Number of options left visible
    pub matches: usize,
}

/// Message emitted when the open list scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectScrolled {
    /// Index of the first option row shown
    pub offset: usize,
}

/// Why the list closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseReason {
    /// The value area was clicked while open
    Toggle,
    /// A press landed outside the control
    OutsideClick,
    /// An option was selected
    Selected,
    /// The selection was cleared
    Cleared,
    /// The list left the observation root entirely
    OutOfView,
    /// The control was disabled while open
    Disabled,
}

/// Which way the option list extends from the value area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DropDirection {
    /// Below the value area
    #[default]
    Down,
    /// Above the value area
    Up,
}

impl DropDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
        }
    }

    /// Class name hosts use to style the list.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Down => "openDown",
            Self::Up => "openUp",
        }
    }
}

/// Form-submission mirror of the controlled value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HiddenField {
    /// Field id
    pub id: Option<String>,
    /// Field name
    pub name: Option<String>,
    /// Current controlled value ("" when unset)
    pub value: String,
    /// Whether the field is excluded from submission
    pub disabled: bool,
}

/// A row of the open list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListRow {
    Search,
    Option(usize),
}

/// Callback invoked with the chosen value, or "" on clear.
pub type ChangeCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Dropdown select widget.
pub struct Select {
    // Props
    options: Vec<SelectOption>,
    value: Option<String>,
    default_value: Option<String>,
    label: Option<String>,
    placeholder: Option<String>,
    searchable: bool,
    allow_clear: bool,
    search_text: Option<String>,
    disabled: bool,
    on_change: Option<ChangeCallback>,
    class_name: Option<String>,
    list_class_name: Option<String>,
    id: Option<String>,
    name: Option<String>,
    // Presentation
    min_width: f32,
    item_height: f32,
    max_visible_items: usize,
    background_color: Color,
    border_color: Color,
    focus_border_color: Color,
    text_color: Color,
    placeholder_color: Color,
    disabled_color: Color,
    test_id_value: Option<String>,
    accessible_name_value: Option<String>,
    // Transient state
    open: bool,
    direction: DropDirection,
    visible: Vec<SelectOption>,
    search_query: String,
    search_focused: bool,
    hovered_row: Option<usize>,
    scroll_offset: usize,
    bounds: Rect,
    viewport: Rect,
    // Collaborators
    outside_click: OutsideClick,
    observer: IntersectionObserver,
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

impl Select {
    /// Create a new select widget.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
            value: None,
            default_value: None,
            label: None,
            placeholder: None,
            searchable: false,
            allow_clear: false,
            search_text: None,
            disabled: false,
            on_change: None,
            class_name: None,
            list_class_name: None,
            id: None,
            name: None,
            min_width: 150.0,
            item_height: 32.0,
            max_visible_items: 8,
            background_color: Color::WHITE,
            border_color: Color::new(0.8, 0.8, 0.8, 1.0),
            focus_border_color: Color::new(0.2, 0.47, 0.96, 1.0),
            text_color: Color::BLACK,
            placeholder_color: Color::new(0.6, 0.6, 0.6, 1.0),
            disabled_color: Color::new(0.7, 0.7, 0.7, 1.0),
            test_id_value: None,
            accessible_name_value: None,
            open: false,
            direction: DropDirection::Down,
            visible: Vec::new(),
            search_query: String::new(),
            search_focused: false,
            hovered_row: None,
            scroll_offset: 0,
            bounds: Rect::default(),
            viewport: Rect::new(0.0, 0.0, f32::MAX, f32::MAX),
            outside_click: OutsideClick::new(),
            observer: IntersectionObserver::new(IntersectionOptions::default()),
        }
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Add an option.
    #[must_use]
    pub fn option(mut self, opt: SelectOption) -> Self {
        self.options.push(opt);
        self.reset_visible();
        self
    }

    /// Add multiple options.
    #[must_use]
    pub fn options(mut self, opts: impl IntoIterator<Item = SelectOption>) -> Self {
        self.options.extend(opts);
        self.reset_visible();
        self
    }

    /// Set the controlled value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the value used while no controlled value is given.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set the label shown above the control.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set placeholder text shown when nothing is selected.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    /// Enable the inline filter box.
    #[must_use]
    pub const fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Enable the clear affordance.
    #[must_use]
    pub const fn allow_clear(mut self, allow: bool) -> Self {
        self.allow_clear = allow;
        self
    }

    /// Set the filter box placeholder.
    #[must_use]
    pub fn search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Set disabled state.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the change callback.
    #[must_use]
    pub fn on_change(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Set the extra control class name.
    #[must_use]
    pub fn class_name(mut self, class: impl Into<String>) -> Self {
        self.class_name = Some(class.into());
        self
    }

    /// Set the extra list class name.
    #[must_use]
    pub fn list_class_name(mut self, class: impl Into<String>) -> Self {
        self.list_class_name = Some(class.into());
        self
    }

    /// Set the hidden field id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the hidden field name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set minimum width.
    #[must_use]
    pub fn min_width(mut self, width: f32) -> Self {
        self.min_width = width.max(50.0);
        self
    }

    /// Set item height.
    #[must_use]
    pub fn item_height(mut self, height: f32) -> Self {
        self.item_height = height.max(20.0);
        self
    }

    /// Set max visible items.
    #[must_use]
    pub fn max_visible_items(mut self, count: usize) -> Self {
        self.max_visible_items = count.max(1);
        self
    }

    /// Configure the list's intersection observer.
    #[must_use]
    pub const fn observer_options(mut self, options: IntersectionOptions) -> Self {
        self.observer = IntersectionObserver::new(options);
        self
    }

    /// Set the viewport the list is observed against.
    #[must_use]
    pub const fn viewport(mut self, viewport: Rect) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set background color.
    #[must_use]
    pub const fn background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set border color.
    #[must_use]
    pub const fn border_color(mut self, color: Color) -> Self {
        self.border_color = color;
        self
    }

    /// Set the accent color used for the open border and the check glyph.
    #[must_use]
    pub const fn accent_color(mut self, color: Color) -> Self {
        self.focus_border_color = color;
        self
    }

    /// Set text color.
    #[must_use]
    pub const fn text_color(mut self, color: Color) -> Self {
        self.text_color = color;
        self
    }

    /// Set placeholder color.
    #[must_use]
    pub const fn placeholder_color(mut self, color: Color) -> Self {
        self.placeholder_color = color;
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id_value = Some(id.into());
        self
    }

    /// Set accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name_value = Some(name.into());
        self
    }

    // =========================================================================
    // Host updates
    // =========================================================================

    /// Replace the option list. A changed list resets the search.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        if options == self.options {
            return;
        }
        self.options = options;
        self.reset_visible();
        self.hovered_row = None;
        debug!(count = self.options.len(), "select options replaced");
        self.sync_observer();
    }

    /// Feed the controlled value back in.
    pub fn set_value(&mut self, value: Option<String>) {
        self.value = value;
    }

    /// Replace the fallback value.
    pub fn set_default_value(&mut self, value: Option<String>) {
        self.default_value = value;
    }

    /// Enable or disable the control. Disabling closes an open list.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled && self.open {
            self.close(CloseReason::Disabled);
        }
    }

    /// Update the viewport and re-observe the open list.
    pub fn set_viewport(&mut self, viewport: Rect) -> Option<CloseReason> {
        self.viewport = viewport;
        self.sync_observer()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The option matching the controlled value, or the default value when
    /// no controlled value is set. First match wins.
    #[must_use]
    pub fn selected_option(&self) -> Option<&SelectOption> {
        let key = self.value.as_deref().or(self.default_value.as_deref())?;
        self.options.iter().find(|o| o.value == key)
    }

    /// Controlled value.
    #[must_use]
    pub fn get_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// All options.
    #[must_use]
    pub fn get_options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Options currently listed (after filtering).
    #[must_use]
    pub fn visible_options(&self) -> &[SelectOption] {
        &self.visible
    }

    /// Current search query.
    #[must_use]
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Whether the filter box has keyboard focus.
    #[must_use]
    pub const fn is_search_focused(&self) -> bool {
        self.search_focused
    }

    /// Check if the list is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Check if the control is disabled.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Index of the first option row shown in the open list.
    #[must_use]
    pub const fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Current drop direction.
    #[must_use]
    pub const fn direction(&self) -> DropDirection {
        self.direction
    }

    /// Whether the clear affordance is shown.
    #[must_use]
    pub fn is_clearable(&self) -> bool {
        self.allow_clear && self.selected_option().is_some()
    }

    /// Text shown in the closed value area.
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.selected_option()
            .and_then(SelectOption::summary)
            .or(self.placeholder.as_deref())
            .unwrap_or(BLANK)
    }

    /// Class string for the control root.
    #[must_use]
    pub fn control_classes(&self) -> String {
        let mut classes = vec!["select-control"];
        if self.is_clearable() {
            classes.push("clearable");
        }
        if let Some(extra) = self.class_name.as_deref().filter(|c| !c.is_empty()) {
            classes.push(extra);
        }
        if self.open {
            classes.push("is-open");
        }
        if self.disabled {
            classes.push("disabled");
        }
        classes.join(" ")
    }

    /// Class string for the option list.
    #[must_use]
    pub fn list_classes(&self) -> String {
        let mut classes = vec!["select-options", self.direction.class_name()];
        if let Some(extra) = self.list_class_name.as_deref().filter(|c| !c.is_empty()) {
            classes.push(extra);
        }
        classes.join(" ")
    }

    /// Hidden form field mirroring the controlled value.
    #[must_use]
    pub fn hidden_field(&self) -> HiddenField {
        HiddenField {
            id: self.id.clone(),
            name: self.name.clone(),
            value: self.value.clone().unwrap_or_default(),
            disabled: self.disabled,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Toggle the list. Returns the new open state; a disabled control
    /// stays closed.
    pub fn toggle(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        if self.open {
            self.close(CloseReason::Toggle);
        } else {
            self.open();
        }
        self.open
    }

    /// Choose the first listed option with `value`.
    ///
    /// Disabled options and values that are not listed are ignored and leave
    /// the list as it was.
    pub fn select_value(&mut self, value: &str) -> Option<SelectionChanged> {
        if self.disabled {
            return None;
        }
        let index = self.visible.iter().position(|o| o.value == value)?;
        self.select_index(index)
    }

    /// Clear the selection: closes the list and reports an empty value.
    pub fn clear(&mut self) -> Option<SelectionChanged> {
        if self.disabled || !self.is_clearable() {
            return None;
        }
        self.close(CloseReason::Cleared);
        self.search_query.clear();
        self.reset_visible();
        debug!("select cleared");
        self.emit_change("");
        Some(SelectionChanged {
            value: String::new(),
        })
    }

    /// Replace the search query and refilter.
    ///
    /// Returns `None` when the control is not searchable or is disabled.
    pub fn search(&mut self, query: &str) -> Option<SearchChanged> {
        if !self.searchable || self.disabled {
            return None;
        }
        query.clone_into(&mut self.search_query);
        self.visible = filter_options(&self.options, query);
        self.hovered_row = None;
        self.scroll_offset = 0;
        debug!(query, matches = self.visible.len(), "select search");
        self.sync_observer();
        Some(SearchChanged {
            query: self.search_query.clone(),
            matches: self.visible.len(),
        })
    }

    /// Scroll the open list by `rows` (negative scrolls up), clamped so the
    /// last page stays full. Returns the new offset.
    pub fn scroll_by(&mut self, rows: isize) -> usize {
        self.scroll_offset = self
            .scroll_offset
            .saturating_add_signed(rows)
            .min(self.max_scroll());
        self.scroll_offset
    }

    /// Scroll just enough for visible option `index` to be shown.
    pub fn scroll_into_view(&mut self, index: usize) {
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if index >= self.scroll_offset + self.max_visible_items {
            self.scroll_offset = index + 1 - self.max_visible_items;
        }
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    /// Apply an intersection report for the open list.
    ///
    /// A zero ratio closes the list; a non-intersecting report flips the
    /// drop direction. Both can apply to the same report.
    pub fn on_intersection(&mut self, entry: &IntersectionEntry) -> Option<CloseReason> {
        if !self.open {
            return None;
        }
        let mut closed = None;
        if entry.ratio == 0.0 {
            self.close(CloseReason::OutOfView);
            closed = Some(CloseReason::OutOfView);
        }
        if !entry.is_intersecting {
            self.direction = self.direction.flipped();
            debug!(direction = ?self.direction, ratio = entry.ratio, "select list flipped");
        }
        closed
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn open(&mut self) {
        self.open = true;
        self.hovered_row = None;
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
        if let Some(index) = self.selected_visible_index() {
            self.scroll_into_view(index);
        }
        self.outside_click.activate();
        self.observer.attach();
        debug!(direction = ?self.direction, "select opened");
        self.sync_observer();
    }

    fn close(&mut self, reason: CloseReason) {
        if !self.open {
            return;
        }
        self.open = false;
        self.search_focused = false;
        self.hovered_row = None;
        self.outside_click.deactivate();
        self.observer.detach();
        debug!(?reason, "select closed");
    }

    fn reset_visible(&mut self) {
        self.search_query.clear();
        self.visible.clone_from(&self.options);
        self.scroll_offset = 0;
    }

    fn max_scroll(&self) -> usize {
        self.visible.len().saturating_sub(self.max_visible_items)
    }

    fn selected_visible_index(&self) -> Option<usize> {
        let selected = self.selected_option()?;
        self.visible.iter().position(|o| o.value == selected.value)
    }

    fn emit_change(&self, value: &str) {
        if let Some(callback) = &self.on_change {
            callback(value);
        }
    }

    fn select_index(&mut self, index: usize) -> Option<SelectionChanged> {
        let opt = self.visible.get(index)?;
        if opt.disabled {
            trace!(value = %opt.value, "ignored disabled option");
            return None;
        }
        let value = opt.value.clone();
        self.close(CloseReason::Selected);
        debug!(value = %value, "select option chosen");
        self.emit_change(&value);
        Some(SelectionChanged { value })
    }

    /// Observe the list against the viewport; re-observe once after a flip
    /// so the new position gets reported.
    ///
    /// A clipped list only flips when the other side shows at least as much
    /// of it.
    fn sync_observer(&mut self) -> Option<CloseReason> {
        for _ in 0..2 {
            if !self.open {
                return None;
            }
            let before = self.direction;
            let entry = self.observer.observe(self.list_rect(), self.viewport)?;
            if entry.ratio > 0.0 && !entry.is_intersecting {
                let other = self
                    .observer
                    .measure(self.list_rect_for(before.flipped()), self.viewport);
                if other.ratio < entry.ratio {
                    trace!(
                        ratio = entry.ratio,
                        flipped_ratio = other.ratio,
                        "select flip skipped"
                    );
                    return None;
                }
            }
            if let Some(reason) = self.on_intersection(&entry) {
                return Some(reason);
            }
            if self.direction == before {
                return None;
            }
        }
        None
    }

    fn label_height(&self) -> f32 {
        if self.label.is_some() {
            LABEL_HEIGHT
        } else {
            0.0
        }
    }

    /// The clickable value area.
    fn value_rect(&self) -> Rect {
        Rect::new(
            self.bounds.x,
            self.bounds.y + self.label_height(),
            self.bounds.width,
            self.item_height,
        )
    }

    fn clear_rect(&self) -> Rect {
        let value = self.value_rect();
        Rect::new(
            value.right() - CHEVRON_ZONE - CLEAR_SIZE,
            value.y + (value.height - CLEAR_SIZE) / 2.0,
            CLEAR_SIZE,
            CLEAR_SIZE,
        )
    }

    fn row_count(&self) -> usize {
        usize::from(self.searchable) + self.visible.len().min(self.max_visible_items)
    }

    /// Bounds of the option list for the current direction.
    fn list_rect(&self) -> Rect {
        self.list_rect_for(self.direction)
    }

    fn list_rect_for(&self, direction: DropDirection) -> Rect {
        let value = self.value_rect();
        let height = self.row_count() as f32 * self.item_height;
        let y = match direction {
            DropDirection::Down => value.bottom(),
            DropDirection::Up => value.y - height,
        };
        Rect::new(value.x, y, value.width, height)
    }

    fn row_rect(&self, row: usize) -> Rect {
        let list = self.list_rect();
        Rect::new(
            list.x,
            (row as f32).mul_add(self.item_height, list.y),
            list.width,
            self.item_height,
        )
    }

    /// Everything that counts as "inside" for outside-click detection.
    fn control_region(&self) -> Rect {
        if self.open {
            self.bounds.union(&self.list_rect())
        } else {
            self.bounds
        }
    }

    fn row_at(&self, position: &Point) -> Option<ListRow> {
        if !self.open {
            return None;
        }
        let list = self.list_rect();
        if !list.contains_point(position) || list.height <= 0.0 {
            return None;
        }
        let row = (((position.y - list.y) / self.item_height) as usize).min(self.row_count() - 1);
        if self.searchable {
            if row == 0 {
                return Some(ListRow::Search);
            }
            return Some(ListRow::Option(row - 1 + self.scroll_offset));
        }
        Some(ListRow::Option(row + self.scroll_offset))
    }

    fn handle_press(&mut self, event: &Event, position: Point) -> Option<Box<dyn Any + Send>> {
        if self.is_clearable() && self.clear_rect().contains_point(&position) {
            // The clear icon sits inside the value area; it must not toggle.
            return self
                .clear()
                .map(|msg| Box::new(msg) as Box<dyn Any + Send>);
        }

        if self.value_rect().contains_point(&position) {
            self.search_focused = false;
            let open = self.toggle();
            return Some(Box::new(SelectToggled { open }));
        }

        if !self.open {
            return None;
        }

        match self.row_at(&position) {
            Some(ListRow::Search) => {
                self.search_focused = true;
                None
            }
            Some(ListRow::Option(index)) => {
                self.search_focused = false;
                self.select_index(index)
                    .map(|msg| Box::new(msg) as Box<dyn Any + Send>)
            }
            None if self.outside_click.check(self.control_region(), event) => {
                self.close(CloseReason::OutsideClick);
                Some(Box::new(SelectClosed {
                    reason: CloseReason::OutsideClick,
                }))
            }
            None => {
                self.search_focused = false;
                None
            }
        }
    }

    /// Arrow keys move the highlighted row and keep it in view; Enter
    /// selects it.
    fn handle_key(&mut self, key: Key) -> Option<Box<dyn Any + Send>> {
        let last = self.visible.len().checked_sub(1)?;
        let target = match (key, self.hovered_row) {
            (Key::Down, None) | (Key::Home, _) => 0,
            (Key::Down, Some(i)) => (i + 1).min(last),
            (Key::Up, None) | (Key::End, _) => last,
            (Key::Up, Some(i)) => i.min(last).saturating_sub(1),
            (Key::Enter, Some(i)) => {
                return self
                    .select_index(i)
                    .map(|msg| Box::new(msg) as Box<dyn Any + Send>);
            }
            _ => return None,
        };
        self.hovered_row = Some(target);
        self.scroll_into_view(target);
        None
    }

    fn search_message(&mut self, query: &str) -> Option<Box<dyn Any + Send>> {
        self.search(query)
            .map(|msg| Box::new(msg) as Box<dyn Any + Send>)
    }

    fn paint_value_area(&self, canvas: &mut dyn Canvas) {
        let value = self.value_rect();
        let bg = if self.disabled {
            self.disabled_color
        } else {
            self.background_color
        };
        let border = if self.open {
            self.focus_border_color
        } else {
            self.border_color
        };
        canvas.fill_rect(value, bg);
        canvas.stroke_rect(value, border, 1.0);

        let text_color = if self.disabled {
            self.disabled_color
        } else if self.selected_option().is_some() {
            self.text_color
        } else {
            self.placeholder_color
        };
        let style = TextStyle {
            color: text_color,
            ..TextStyle::default()
        };
        canvas.draw_text(
            self.display_text(),
            Point::new(value.x + 8.0, value.y + (value.height - style.size) / 2.0),
            &style,
        );

        // Chevron points down when closed, up when open.
        let cx = value.right() - CHEVRON_ZONE / 2.0;
        let cy = value.y + value.height / 2.0;
        let dy = if self.open { -3.0 } else { 3.0 };
        canvas.draw_path(
            &[
                Point::new(cx - 5.0, cy - dy),
                Point::new(cx, cy + dy),
                Point::new(cx + 5.0, cy - dy),
            ],
            self.text_color,
            1.5,
        );

        if self.is_clearable() {
            let icon = self.clear_rect().outset(-4.0);
            canvas.draw_line(
                Point::new(icon.x, icon.y),
                Point::new(icon.right(), icon.bottom()),
                self.placeholder_color,
                1.5,
            );
            canvas.draw_line(
                Point::new(icon.right(), icon.y),
                Point::new(icon.x, icon.bottom()),
                self.placeholder_color,
                1.5,
            );
        }
    }

    fn paint_list(&self, canvas: &mut dyn Canvas) {
        let list = self.list_rect();
        if list.height <= 0.0 {
            return;
        }
        canvas.fill_rect(list, self.background_color);
        canvas.stroke_rect(list, self.border_color, 1.0);
        canvas.push_clip(list);

        let mut row = 0;
        if self.searchable {
            let rect = self.row_rect(row).outset(-4.0);
            let border = if self.search_focused {
                self.focus_border_color
            } else {
                self.border_color
            };
            canvas.stroke_rect(rect, border, 1.0);
            let (text, color) = if self.search_query.is_empty() {
                (
                    self.search_text.as_deref().unwrap_or_default(),
                    self.placeholder_color,
                )
            } else {
                (self.search_query.as_str(), self.text_color)
            };
            let style = TextStyle {
                color,
                ..TextStyle::default()
            };
            canvas.draw_text(
                text,
                Point::new(rect.x + 6.0, rect.y + (rect.height - style.size) / 2.0),
                &style,
            );
            row += 1;
        }

        let selected = self.selected_option().map(|o| o.value.as_str());
        let shown = self
            .visible
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(self.max_visible_items);
        for (slot, (i, opt)) in shown.enumerate() {
            let mut view = OptionView::new(opt.clone())
                .selected(selected == Some(opt.value.as_str()))
                .hovered(self.hovered_row == Some(i))
                .item_height(self.item_height)
                .text_color(self.text_color)
                .check_color(self.focus_border_color);
            view.layout(self.row_rect(row + slot));
            view.paint(canvas);
        }

        canvas.pop_clip();
    }
}

impl Widget for Select {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        constraints.constrain(Size::new(
            self.min_width,
            self.label_height() + self.item_height,
        ))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.sync_observer();
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        if let Some(label) = &self.label {
            let style = TextStyle {
                weight: FontWeight::Semibold,
                color: if self.disabled {
                    self.disabled_color
                } else {
                    self.text_color
                },
                ..TextStyle::default()
            };
            canvas.draw_text(label, Point::new(self.bounds.x, self.bounds.y), &style);
        }

        self.paint_value_area(canvas);

        if self.open {
            self.paint_list(canvas);
        }
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        if self.disabled {
            return None;
        }

        if let Some(position) = event.press_position() {
            return self.handle_press(event, position);
        }

        match event {
            Event::MouseMove { position } => {
                self.hovered_row = match self.row_at(position) {
                    Some(ListRow::Option(i)) => Some(i),
                    _ => None,
                };
            }
            Event::TextInput { text } if self.search_focused => {
                let query = format!("{}{text}", self.search_query);
                return self.search_message(&query);
            }
            Event::KeyDown {
                key: Key::Backspace,
            } if self.search_focused => {
                let mut query = self.search_query.clone();
                if query.pop().is_some() {
                    return self.search_message(&query);
                }
            }
            Event::KeyDown { key } if self.open => {
                return self.handle_key(*key);
            }
            Event::Scroll { delta_y, .. } if self.open && *delta_y != 0.0 => {
                let rows = delta_y.abs().ceil() as isize;
                let before = self.scroll_offset;
                let offset = self.scroll_by(if *delta_y > 0.0 { -rows } else { rows });
                if offset != before {
                    return Some(Box::new(SelectScrolled { offset }));
                }
            }
            Event::Resize { width, height } => {
                let reason = self.set_viewport(Rect::new(0.0, 0.0, *width, *height));
                return reason.map(|reason| Box::new(SelectClosed { reason }) as Box<dyn Any + Send>);
            }
            Event::FocusOut => {
                self.search_focused = false;
            }
            _ => {}
        }

        None
    }

    fn is_interactive(&self) -> bool {
        !self.disabled
    }

    fn is_focusable(&self) -> bool {
        !self.disabled
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name_value
            .as_deref()
            .or(self.label.as_deref())
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::ComboBox
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id_value.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickbox_core::{MouseButton, RecordingCanvas};
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    fn fruits() -> Vec<SelectOption> {
        vec![
            SelectOption::new("a", "Apple"),
            SelectOption::new("b", "Banana"),
            SelectOption::new("c", "Cherry"),
        ]
    }

    /// Laid out at the origin: value area y 0..32, list rows from y 32.
    fn laid_out(select: Select) -> Select {
        let mut s = select.item_height(32.0);
        s.layout(Rect::new(0.0, 0.0, 200.0, 32.0));
        s
    }

    fn click(x: f32, y: f32) -> Event {
        Event::MouseDown {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |v: &str| sink.lock().unwrap().push(v.to_string()))
    }

    // =========================================================================
    // Message Tests
    // =========================================================================

    #[test]
    fn test_selection_changed_is_clear() {
        assert!(SelectionChanged {
            value: String::new()
        }
        .is_clear());
        assert!(!SelectionChanged {
            value: "a".to_string()
        }
        .is_clear());
    }

    #[test]
    fn test_drop_direction_flip_and_class() {
        assert_eq!(DropDirection::Down.flipped(), DropDirection::Up);
        assert_eq!(DropDirection::Up.flipped(), DropDirection::Down);
        assert_eq!(DropDirection::Down.class_name(), "openDown");
        assert_eq!(DropDirection::Up.class_name(), "openUp");
    }

    // =========================================================================
    // Construction Tests
    // =========================================================================

    #[test]
    fn test_select_new() {
        let s = Select::new();
        assert!(s.get_options().is_empty());
        assert!(s.selected_option().is_none());
        assert!(!s.is_open());
        assert!(!s.is_disabled());
        assert_eq!(s.direction(), DropDirection::Down);
    }

    #[test]
    fn test_select_builder_sets_visible_to_all() {
        let s = Select::new().options(fruits()).option(SelectOption::simple("Date"));
        assert_eq!(s.get_options().len(), 4);
        assert_eq!(s.visible_options(), s.get_options());
    }

    #[test]
    fn test_select_builder_minimums() {
        let s = Select::new()
            .min_width(10.0)
            .item_height(5.0)
            .max_visible_items(0);
        assert_eq!(s.min_width, 50.0);
        assert_eq!(s.item_height, 20.0);
        assert_eq!(s.max_visible_items, 1);
    }

    // =========================================================================
    // Selection Resolution Tests
    // =========================================================================

    #[test]
    fn test_default_value_used_when_value_unset() {
        let s = Select::new().options(fruits()).default_value("a");
        assert_eq!(s.selected_option().map(|o| o.value.as_str()), Some("a"));
    }

    #[test]
    fn test_value_overrides_default_value() {
        let mut s = Select::new().options(fruits()).default_value("a");
        s.set_value(Some("b".to_string()));
        assert_eq!(s.selected_option().map(|o| o.value.as_str()), Some("b"));
        assert!(!s.is_open());
    }

    #[test]
    fn test_unmatched_value_does_not_fall_back() {
        let s = Select::new().options(fruits()).value("zzz").default_value("a");
        assert!(s.selected_option().is_none());
    }

    #[test]
    fn test_duplicate_values_first_match() {
        let s = Select::new()
            .option(SelectOption::new("a", "First"))
            .option(SelectOption::new("a", "Second"))
            .value("a");
        assert_eq!(s.selected_option().and_then(SelectOption::summary), Some("First"));
    }

    #[test]
    fn test_display_text_fallbacks() {
        let s = Select::new().options(fruits()).value("b");
        assert_eq!(s.display_text(), "Banana");

        let s = Select::new().options(fruits()).placeholder("Pick a fruit");
        assert_eq!(s.display_text(), "Pick a fruit");

        let s = Select::new().options(fruits());
        assert_eq!(s.display_text(), "\u{a0}");
    }

    // =========================================================================
    // Open/Close Tests
    // =========================================================================

    #[test]
    fn test_click_value_area_opens() {
        let mut s = laid_out(Select::new().options(fruits()));
        let msg = s.event(&click(100.0, 16.0)).unwrap();
        assert!(s.is_open());
        assert_eq!(*msg.downcast::<SelectToggled>().unwrap(), SelectToggled { open: true });
    }

    #[test]
    fn test_click_value_area_twice_closes() {
        let mut s = laid_out(Select::new().options(fruits()));
        s.event(&click(100.0, 16.0));
        let msg = s.event(&click(100.0, 16.0)).unwrap();
        assert!(!s.is_open());
        assert_eq!(*msg.downcast::<SelectToggled>().unwrap(), SelectToggled { open: false });
    }

    #[test]
    fn test_disabled_never_opens() {
        let mut s = laid_out(Select::new().options(fruits()).disabled(true));
        assert!(s.event(&click(100.0, 16.0)).is_none());
        assert!(!s.toggle());
        assert!(!s.is_open());
        assert!(!s.is_interactive());
    }

    #[test]
    fn test_disabling_closes_open_list() {
        let mut s = laid_out(Select::new().options(fruits()));
        s.toggle();
        s.set_disabled(true);
        assert!(!s.is_open());
        assert!(!s.outside_click.is_active());
    }

    #[test]
    fn test_outside_click_closes() {
        let mut s = laid_out(Select::new().options(fruits()));
        s.toggle();
        assert!(s.outside_click.is_active());
        let msg = s.event(&click(500.0, 500.0)).unwrap();
        assert!(!s.is_open());
        assert!(!s.outside_click.is_active());
        assert_eq!(
            msg.downcast::<SelectClosed>().unwrap().reason,
            CloseReason::OutsideClick
        );
    }

    #[test]
    fn test_click_outside_when_closed_is_ignored() {
        let mut s = laid_out(Select::new().options(fruits()));
        assert!(s.event(&click(500.0, 500.0)).is_none());
        assert!(!s.is_open());
    }

    #[test]
    fn test_click_on_label_keeps_open() {
        let mut s = Select::new().options(fruits()).label("Fruit");
        s.layout(Rect::new(0.0, 0.0, 200.0, 52.0));
        s.toggle();
        // Label row spans y 0..20, value area 20..52.
        assert!(s.event(&click(100.0, 10.0)).is_none());
        assert!(s.is_open());
    }

    #[test]
    fn test_open_does_not_reset_filtered_list() {
        let mut s = laid_out(Select::new().options(fruits()).searchable(true));
        s.toggle();
        s.search("an");
        s.toggle();
        s.toggle();
        assert_eq!(s.visible_options().len(), 1);
        assert_eq!(s.search_query(), "an");
    }

    // =========================================================================
    // Selection Tests
    // =========================================================================

    #[test]
    fn test_click_option_selects_and_closes() {
        let (calls, cb) = recorder();
        let mut s = laid_out(Select::new().options(fruits()).on_change(cb));
        s.toggle();
        // Row 1 (Banana) spans y 64..96.
        let msg = s.event(&click(100.0, 80.0)).unwrap();
        let msg = msg.downcast::<SelectionChanged>().unwrap();
        assert_eq!(msg.value, "b");
        assert!(!s.is_open());
        assert_eq!(*calls.lock().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_selection_does_not_mutate_value() {
        let mut s = laid_out(Select::new().options(fruits()).value("a"));
        s.toggle();
        s.event(&click(100.0, 80.0));
        assert_eq!(s.get_value(), Some("a"));
        assert_eq!(s.selected_option().map(|o| o.value.as_str()), Some("a"));
    }

    #[test]
    fn test_click_disabled_option_keeps_open() {
        let (calls, cb) = recorder();
        let mut s = laid_out(
            Select::new()
                .option(SelectOption::new("a", "Apple"))
                .option(SelectOption::new("b", "Banana").disabled(true))
                .value("a")
                .on_change(cb),
        );
        s.toggle();
        assert!(s.event(&click(100.0, 80.0)).is_none());
        assert!(s.is_open());
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(s.selected_option().map(|o| o.value.as_str()), Some("a"));
    }

    #[test]
    fn test_select_value_unknown_is_ignored() {
        let mut s = laid_out(Select::new().options(fruits()));
        s.toggle();
        assert!(s.select_value("zzz").is_none());
        assert!(s.is_open());
    }

    #[test]
    fn test_select_without_callback_still_reports() {
        let mut s = laid_out(Select::new().options(fruits()));
        s.toggle();
        assert_eq!(s.select_value("c").map(|m| m.value), Some("c".to_string()));
    }

    // =========================================================================
    // Clear Tests
    // =========================================================================

    #[test]
    fn test_clear_icon_click_clears_without_toggle() {
        let (calls, cb) = recorder();
        let mut s = laid_out(
            Select::new()
                .options(fruits())
                .value("a")
                .allow_clear(true)
                .on_change(cb),
        );
        let icon = s.clear_rect().center();
        let msg = s.event(&click(icon.x, icon.y)).unwrap();
        assert!(msg.downcast::<SelectionChanged>().unwrap().is_clear());
        assert!(!s.is_open());
        assert_eq!(*calls.lock().unwrap(), vec![String::new()]);
    }

    #[test]
    fn test_clear_closes_open_list_and_restores_options() {
        let mut s = laid_out(
            Select::new()
                .options(fruits())
                .value("a")
                .allow_clear(true)
                .searchable(true),
        );
        s.toggle();
        s.search("an");
        assert!(s.clear().is_some());
        assert!(!s.is_open());
        assert_eq!(s.visible_options(), s.get_options());
        assert_eq!(s.search_query(), "");
    }

    #[test]
    fn test_clear_unavailable_without_selection() {
        let mut s = laid_out(Select::new().options(fruits()).allow_clear(true));
        assert!(!s.is_clearable());
        assert!(s.clear().is_none());
    }

    #[test]
    fn test_clear_unavailable_when_not_allowed() {
        let mut s = laid_out(Select::new().options(fruits()).value("a"));
        assert!(!s.is_clearable());
        let icon = s.clear_rect().center();
        // Falls through to the value area toggle.
        let msg = s.event(&click(icon.x, icon.y)).unwrap();
        assert!(msg.downcast::<SelectToggled>().is_ok());
    }

    // =========================================================================
    // Search Tests
    // =========================================================================

    #[test]
    fn test_search_filters_visible() {
        let mut s = Select::new()
            .option(SelectOption::new("a", "Apple"))
            .option(SelectOption::new("b", "Banana"))
            .searchable(true);
        let msg = s.search("an").unwrap();
        assert_eq!(msg.matches, 1);
        assert_eq!(s.visible_options(), &[SelectOption::new("b", "Banana")]);
        s.search("");
        assert_eq!(s.visible_options().len(), 2);
    }

    #[test]
    fn test_search_requires_searchable() {
        let mut s = Select::new().options(fruits());
        assert!(s.search("an").is_none());
        assert_eq!(s.visible_options().len(), 3);
    }

    #[test]
    fn test_typing_into_focused_search_box() {
        let mut s = laid_out(Select::new().options(fruits()).searchable(true));
        s.toggle();
        // Search row spans y 32..64.
        assert!(s.event(&click(100.0, 48.0)).is_none());
        assert!(s.is_search_focused());

        s.event(&Event::TextInput {
            text: "e".to_string(),
        });
        let msg = s
            .event(&Event::TextInput {
                text: "r".to_string(),
            })
            .unwrap();
        let msg = msg.downcast::<SearchChanged>().unwrap();
        assert_eq!(msg.query, "er");
        assert_eq!(msg.matches, 1);

        let msg = s
            .event(&Event::KeyDown {
                key: Key::Backspace,
            })
            .unwrap();
        assert_eq!(msg.downcast::<SearchChanged>().unwrap().query, "e");
        // Apple and Cherry
        assert_eq!(s.visible_options().len(), 2);
    }

    #[test]
    fn test_typing_without_focus_is_ignored() {
        let mut s = laid_out(Select::new().options(fruits()).searchable(true));
        s.toggle();
        assert!(s
            .event(&Event::TextInput {
                text: "x".to_string()
            })
            .is_none());
        assert_eq!(s.visible_options().len(), 3);
    }

    #[test]
    fn test_search_does_not_touch_value() {
        let mut s = Select::new().options(fruits()).searchable(true).value("a");
        s.search("Ban");
        assert_eq!(s.get_value(), Some("a"));
        assert_eq!(s.selected_option().map(|o| o.value.as_str()), Some("a"));
    }

    #[test]
    fn test_click_row_after_search_selects_filtered_option() {
        let mut s = laid_out(Select::new().options(fruits()).searchable(true));
        s.toggle();
        s.search("Ch");
        // First option row (Cherry) spans y 64..96 under the search row.
        let msg = s.event(&click(100.0, 80.0)).unwrap();
        assert_eq!(msg.downcast::<SelectionChanged>().unwrap().value, "c");
    }

    // =========================================================================
    // Options Update Tests
    // =========================================================================

    #[test]
    fn test_set_options_resets_search() {
        let mut s = Select::new().options(fruits()).searchable(true);
        s.search("an");
        let mut next = fruits();
        next.push(SelectOption::new("m", "Mango"));
        s.set_options(next);
        assert_eq!(s.visible_options().len(), 4);
        assert_eq!(s.search_query(), "");
    }

    #[test]
    fn test_set_same_options_keeps_search() {
        let mut s = Select::new().options(fruits()).searchable(true);
        s.search("an");
        s.set_options(fruits());
        assert_eq!(s.visible_options().len(), 1);
    }

    // =========================================================================
    // Position Tests
    // =========================================================================

    #[test]
    fn test_list_flips_up_near_viewport_bottom() {
        let mut s = Select::new()
            .options(fruits())
            .item_height(32.0)
            .viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
        s.layout(Rect::new(0.0, 540.0, 200.0, 32.0));
        s.toggle();
        assert_eq!(s.direction(), DropDirection::Up);
        assert!(s.is_open());
        assert_eq!(s.list_classes(), "select-options openUp");
    }

    #[test]
    fn test_top_of_short_viewport_stays_open_and_down() {
        let mut s = Select::new()
            .options(numbered(8))
            .viewport(Rect::new(0.0, 0.0, 400.0, 120.0));
        s.layout(Rect::new(0.0, 0.0, 200.0, 32.0));
        assert!(s.toggle());
        assert!(s.is_open());
        assert_eq!(s.direction(), DropDirection::Down);

        // Layout passes do not re-trigger the skipped flip.
        s.layout(Rect::new(0.0, 0.0, 200.0, 32.0));
        assert!(s.is_open());
        assert_eq!(s.direction(), DropDirection::Down);
    }

    #[test]
    fn test_clipped_both_ways_flips_to_larger_side() {
        // Down shows 40 of 256px, up shows 200 of 256px.
        let mut s = Select::new()
            .options(numbered(8))
            .viewport(Rect::new(0.0, 0.0, 400.0, 272.0));
        s.layout(Rect::new(0.0, 200.0, 200.0, 32.0));
        s.toggle();
        assert!(s.is_open());
        assert_eq!(s.direction(), DropDirection::Up);
    }

    #[test]
    fn test_list_stays_down_with_room() {
        let mut s = Select::new()
            .options(fruits())
            .viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
        s.layout(Rect::new(0.0, 10.0, 200.0, 32.0));
        s.toggle();
        assert_eq!(s.direction(), DropDirection::Down);
    }

    #[test]
    fn test_zero_intersection_closes() {
        let mut s = laid_out(Select::new().options(fruits()));
        s.toggle();
        let entry = IntersectionEntry {
            target: s.list_rect(),
            root: Rect::new(0.0, 0.0, 10.0, 10.0),
            ratio: 0.0,
            is_intersecting: false,
        };
        assert_eq!(s.on_intersection(&entry), Some(CloseReason::OutOfView));
        assert!(!s.is_open());
    }

    #[test]
    fn test_intersection_ignored_when_closed() {
        let mut s = laid_out(Select::new().options(fruits()));
        let entry = IntersectionEntry {
            target: Rect::default(),
            root: Rect::default(),
            ratio: 0.5,
            is_intersecting: false,
        };
        assert!(s.on_intersection(&entry).is_none());
        assert_eq!(s.direction(), DropDirection::Down);
    }

    #[test]
    fn test_resize_scrolling_list_away_closes() {
        let mut s = Select::new()
            .options(fruits())
            .viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
        s.layout(Rect::new(0.0, 300.0, 200.0, 32.0));
        s.toggle();
        let msg = s
            .event(&Event::Resize {
                width: 800.0,
                height: 100.0,
            })
            .unwrap();
        assert_eq!(
            msg.downcast::<SelectClosed>().unwrap().reason,
            CloseReason::OutOfView
        );
    }

    // =========================================================================
    // Hooks Tests
    // =========================================================================

    #[test]
    fn test_control_classes() {
        let mut s = Select::new()
            .options(fruits())
            .value("a")
            .allow_clear(true)
            .class_name("wide");
        assert_eq!(s.control_classes(), "select-control clearable wide");
        s.toggle();
        assert_eq!(s.control_classes(), "select-control clearable wide is-open");
        s.set_disabled(true);
        assert_eq!(s.control_classes(), "select-control clearable wide disabled");
    }

    #[test]
    fn test_list_classes_with_extra() {
        let s = Select::new().list_class_name("tall");
        assert_eq!(s.list_classes(), "select-options openDown tall");
    }

    #[test]
    fn test_hidden_field_mirrors_controlled_value() {
        let s = Select::new().id("fruit-id").name("fruit").default_value("a");
        assert_eq!(
            s.hidden_field(),
            HiddenField {
                id: Some("fruit-id".to_string()),
                name: Some("fruit".to_string()),
                value: String::new(),
                disabled: false,
            }
        );
        let s = Select::new().value("b");
        assert_eq!(s.hidden_field().value, "b");
    }

    #[test]
    fn test_hidden_field_mirrors_disabled() {
        let mut s = Select::new().name("fruit").value("a").disabled(true);
        assert!(s.hidden_field().disabled);
        s.set_disabled(false);
        assert!(!s.hidden_field().disabled);
    }

    // =========================================================================
    // Widget Trait Tests
    // =========================================================================

    #[test]
    fn test_select_measure_with_label() {
        let s = Select::new().label("Fruit").min_width(150.0).item_height(32.0);
        let size = s.measure(Constraints::loose(Size::new(400.0, 200.0)));
        assert_eq!(size, Size::new(150.0, 52.0));
    }

    #[test]
    fn test_select_accessibility() {
        let s = Select::new().label("Fruit").with_test_id("fruit-select");
        assert_eq!(s.accessible_role(), AccessibleRole::ComboBox);
        assert_eq!(s.accessible_name(), Some("Fruit"));
        assert_eq!(Widget::test_id(&s), Some("fruit-select"));
        assert_eq!(Widget::type_id(&s), TypeId::of::<Select>());
    }

    #[test]
    fn test_paint_closed_has_no_options() {
        let s = laid_out(Select::new().options(fruits()).placeholder("Pick"));
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.has_text("Pick"));
        assert!(!canvas.has_text("Apple"));
    }

    #[test]
    fn test_paint_open_lists_visible_options() {
        let mut s = laid_out(
            Select::new()
                .options(fruits())
                .searchable(true)
                .search_text("Filter..."),
        );
        s.toggle();
        s.search("an");
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.has_text("an"));
        assert!(canvas.has_text("Banana"));
        assert!(!canvas.has_text("Apple"));
        assert_eq!(canvas.clip_depth(), 0);
    }

    #[test]
    fn test_paint_respects_max_visible_items() {
        let mut s = laid_out(Select::new().options(fruits()).max_visible_items(2));
        s.toggle();
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.has_text("Banana"));
        assert!(!canvas.has_text("Cherry"));
    }

    #[test]
    fn test_mouse_move_tracks_hovered_option() {
        let mut s = laid_out(Select::new().options(fruits()));
        s.toggle();
        s.event(&Event::MouseMove {
            position: Point::new(100.0, 80.0),
        });
        assert_eq!(s.hovered_row, Some(1));
        s.event(&Event::MouseMove {
            position: Point::new(100.0, 500.0),
        });
        assert_eq!(s.hovered_row, None);
    }

    // =========================================================================
    // Scrolling Tests
    // =========================================================================

    fn numbered(count: usize) -> Vec<SelectOption> {
        (0..count)
            .map(|i| SelectOption::new(format!("v{i}"), format!("Opt {i}")))
            .collect()
    }

    fn wheel(delta_y: f32) -> Event {
        Event::Scroll {
            delta_x: 0.0,
            delta_y,
        }
    }

    #[test]
    fn test_long_list_last_option_selectable_after_scroll() {
        let mut s = laid_out(Select::new().options(numbered(10)));
        s.toggle();

        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.has_text("Opt 7"));
        assert!(!canvas.has_text("Opt 9"));

        let msg = s.event(&wheel(-5.0)).unwrap();
        assert_eq!(*msg.downcast::<SelectScrolled>().unwrap(), SelectScrolled { offset: 2 });

        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.has_text("Opt 9"));
        assert!(!canvas.has_text("Opt 1"));

        // Last of eight rows: y 256..288.
        let msg = s.event(&click(100.0, 270.0)).unwrap();
        assert_eq!(msg.downcast::<SelectionChanged>().unwrap().value, "v9");
        assert!(!s.is_open());
    }

    #[test]
    fn test_scroll_clamps_and_reports_only_changes() {
        let mut s = laid_out(Select::new().options(numbered(10)));
        s.toggle();
        assert!(s.event(&wheel(3.0)).is_none());
        assert_eq!(s.scroll_offset(), 0);
        s.event(&wheel(-1.0));
        assert_eq!(s.scroll_offset(), 1);
        assert_eq!(s.scroll_by(100), 2);
        assert!(s.event(&wheel(-1.0)).is_none());
        assert_eq!(s.scroll_by(-100), 0);
    }

    #[test]
    fn test_scroll_ignored_when_closed() {
        let mut s = laid_out(Select::new().options(numbered(10)));
        assert!(s.event(&wheel(-5.0)).is_none());
        assert_eq!(s.scroll_offset(), 0);
    }

    #[test]
    fn test_scroll_with_search_row() {
        let mut s = laid_out(Select::new().options(numbered(12)).searchable(true));
        s.toggle();
        s.event(&wheel(-10.0));
        assert_eq!(s.scroll_offset(), 4);
        // Search row 32..64, first option row 64..96 now shows v4.
        let msg = s.event(&click(100.0, 80.0)).unwrap();
        assert_eq!(msg.downcast::<SelectionChanged>().unwrap().value, "v4");
    }

    #[test]
    fn test_search_resets_scroll() {
        let mut s = laid_out(Select::new().options(numbered(12)).searchable(true));
        s.toggle();
        s.event(&wheel(-10.0));
        s.search("Opt 1");
        assert_eq!(s.scroll_offset(), 0);
    }

    #[test]
    fn test_open_scrolls_selected_into_view() {
        let mut s = laid_out(Select::new().options(numbered(20)).value("v15"));
        s.toggle();
        assert_eq!(s.scroll_offset(), 8);
        let mut canvas = RecordingCanvas::new();
        s.paint(&mut canvas);
        assert!(canvas.has_text("Opt 15"));
    }

    #[test]
    fn test_keys_move_highlight_and_enter_selects() {
        let mut s = laid_out(Select::new().options(numbered(10)));
        s.toggle();
        assert!(s.event(&Event::KeyDown { key: Key::End }).is_none());
        assert_eq!(s.hovered_row, Some(9));
        assert_eq!(s.scroll_offset(), 2);

        s.event(&Event::KeyDown { key: Key::Up });
        assert_eq!(s.hovered_row, Some(8));
        s.event(&Event::KeyDown { key: Key::Home });
        assert_eq!(s.scroll_offset(), 0);
        s.event(&Event::KeyDown { key: Key::Down });
        assert_eq!(s.hovered_row, Some(1));

        let msg = s.event(&Event::KeyDown { key: Key::Enter }).unwrap();
        assert_eq!(msg.downcast::<SelectionChanged>().unwrap().value, "v1");
    }

    #[test]
    fn test_keys_ignored_when_closed() {
        let mut s = laid_out(Select::new().options(numbered(3)));
        assert!(s.event(&Event::KeyDown { key: Key::Enter }).is_none());
        assert!(s.event(&Event::KeyDown { key: Key::Down }).is_none());
        assert!(!s.is_open());
        assert_eq!(s.hovered_row, None);
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    fn arb_options() -> impl Strategy<Value = Vec<SelectOption>> {
        proptest::collection::vec(("[a-e]{1,2}", "[A-Za-z]{0,6}", any::<bool>()), 1..8).prop_map(
            |raw| {
                raw.into_iter()
                    .map(|(v, t, d)| SelectOption::new(v, t).disabled(d))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_every_option_reachable_by_pointer(count in 1usize..30, pick in 0usize..30, max in 1usize..10) {
            let pick = pick % count;
            let mut s = laid_out(Select::new().options(numbered(count)).max_visible_items(max));
            s.toggle();
            s.scroll_into_view(pick);
            let slot = pick - s.scroll_offset();
            prop_assert!(slot < max);
            let y = 32.0 + (slot as f32).mul_add(32.0, 16.0);
            let msg = s.event(&click(100.0, y)).unwrap();
            prop_assert_eq!(msg.downcast::<SelectionChanged>().unwrap().value.clone(), format!("v{pick}"));
        }

        #[test]
        fn prop_select_enabled_value_reports_once(opts in arb_options(), pick in 0usize..8) {
            let pick = pick % opts.len();
            let target = opts[pick].clone();
            let (calls, cb) = recorder();
            let mut s = Select::new().options(opts.clone()).on_change(cb);
            s.toggle();
            let first = opts.iter().find(|o| o.value == target.value).cloned().unwrap();
            let result = s.select_value(&target.value);
            if first.disabled {
                prop_assert!(result.is_none());
                prop_assert!(s.is_open());
                prop_assert!(calls.lock().unwrap().is_empty());
            } else {
                prop_assert_eq!(result.map(|m| m.value), Some(target.value.clone()));
                prop_assert!(!s.is_open());
                prop_assert_eq!(calls.lock().unwrap().clone(), vec![target.value]);
            }
        }

        #[test]
        fn prop_clear_reports_empty_once_and_closes(opts in arb_options(), open in any::<bool>()) {
            let value = opts[0].value.clone();
            let (calls, cb) = recorder();
            let mut s = Select::new().options(opts).value(value).allow_clear(true).on_change(cb);
            if open {
                s.toggle();
            }
            prop_assert!(s.clear().is_some());
            prop_assert!(!s.is_open());
            prop_assert_eq!(calls.lock().unwrap().clone(), vec![String::new()]);
        }

        #[test]
        fn prop_disabled_never_opens(opts in arb_options(), ys in proptest::collection::vec(0.0f32..200.0, 1..10)) {
            let mut s = laid_out(Select::new().options(opts).disabled(true));
            for y in ys {
                s.event(&click(100.0, y));
                s.toggle();
                prop_assert!(!s.is_open());
            }
        }

        #[test]
        fn prop_visible_is_subsequence_of_options(opts in arb_options(), query in "[a-zA-Z]{0,2}") {
            let mut s = Select::new().options(opts.clone()).searchable(true);
            s.search(&query);
            let mut rest = opts.iter();
            for kept in s.visible_options() {
                prop_assert!(rest.any(|o| o == kept));
            }
        }
    }
}
