//! Detection of presses that land outside a region.

use pickbox_core::{Event, Rect};

/// Reports primary presses outside a watched region.
///
/// The detector is inert until [`activate`](Self::activate)d. Owners activate
/// it while a popup is shown and deactivate it when the popup goes away, so
/// nothing fires across a closed state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutsideClick {
    active: bool,
}

impl OutsideClick {
    /// Create an inactive detector.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: false }
    }

    /// Start listening.
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Stop listening.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Set the active flag directly.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the detector is listening.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns `true` when `event` is a primary press outside `region` while active.
    ///
    /// Each event is one interaction, so a qualifying event yields `true`
    /// exactly once.
    #[must_use]
    pub fn check(&self, region: Rect, event: &Event) -> bool {
        if !self.active {
            return false;
        }
        event
            .press_position()
            .is_some_and(|pos| !region.contains_point(&pos))
    }
}
