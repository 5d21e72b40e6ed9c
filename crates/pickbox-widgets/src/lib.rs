//! Dropdown Select widget and its collaborators for pickbox.

pub mod config;
pub mod error;
pub mod intersection;
pub mod option;
pub mod outside_click;
pub mod search;
pub mod select;

pub use config::{SelectConfig, SelectTheme, ThemeColors};
pub use error::ConfigError;
pub use intersection::{IntersectionEntry, IntersectionObserver, IntersectionOptions};
pub use option::{OptionView, SelectOption};
pub use outside_click::OutsideClick;
pub use search::filter_options;
pub use select::{
    ChangeCallback, CloseReason, DropDirection, HiddenField, SearchChanged, Select, SelectClosed,
    SelectScrolled, SelectToggled, SelectionChanged,
};
