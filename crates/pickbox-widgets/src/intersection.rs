//! Viewport intersection observation for popups.
//!
//! An [`IntersectionObserver`] watches one target rectangle against a root
//! (an explicit rectangle, or the host viewport when none is configured) and
//! reports an [`IntersectionEntry`] when the target first comes under
//! observation and whenever its intersection status changes afterwards.
//! Stable layouts produce no further entries.

use pickbox_core::Rect;
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing ratios against the threshold.
const RATIO_EPSILON: f32 = 1e-4;

/// Observer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntersectionOptions {
    /// Observation root; `None` observes against the viewport
    pub root: Option<Rect>,
    /// Margin added around the root on every side (negative shrinks it)
    pub root_margin: f32,
    /// Visible fraction of the target at which it counts as intersecting
    pub threshold: f32,
}

impl Default for IntersectionOptions {
    fn default() -> Self {
        Self {
            root: None,
            root_margin: 0.0,
            threshold: 1.0,
        }
    }
}

/// A single intersection report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    /// Observed target bounds
    pub target: Rect,
    /// Effective root bounds (margin applied)
    pub root: Rect,
    /// Visible fraction of the target in [0, 1]
    pub ratio: f32,
    /// Whether `ratio` reached the threshold
    pub is_intersecting: bool,
}

/// Watches a target and reports intersection status changes.
#[derive(Debug, Clone, Default)]
pub struct IntersectionObserver {
    options: IntersectionOptions,
    attached: bool,
    last: Option<(bool, bool)>,
}

impl IntersectionObserver {
    /// Create a detached observer.
    #[must_use]
    pub const fn new(options: IntersectionOptions) -> Self {
        Self {
            options,
            attached: false,
            last: None,
        }
    }

    /// Get the configuration.
    #[must_use]
    pub const fn options(&self) -> &IntersectionOptions {
        &self.options
    }

    /// Start observing. The next observation always reports.
    pub fn attach(&mut self) {
        self.attached = true;
        self.last = None;
    }

    /// Stop observing and forget the last status.
    pub fn detach(&mut self) {
        self.attached = false;
        self.last = None;
    }

    /// Whether a target is under observation.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.attached
    }

    /// Compute the intersection of `target` with the root without
    /// affecting the observer's status.
    #[must_use]
    pub fn measure(&self, target: Rect, viewport: Rect) -> IntersectionEntry {
        let root = self
            .options
            .root
            .unwrap_or(viewport)
            .outset(self.options.root_margin);

        let ratio = if target.area() <= 0.0 {
            if root.contains_point(&pickbox_core::Point::new(target.x, target.y)) {
                1.0
            } else {
                0.0
            }
        } else {
            target
                .intersection(&root)
                .map_or(0.0, |i| (i.area() / target.area()).clamp(0.0, 1.0))
        };

        let is_intersecting = if self.options.threshold <= 0.0 {
            ratio > 0.0
        } else {
            ratio + RATIO_EPSILON >= self.options.threshold
        };

        IntersectionEntry {
            target,
            root,
            ratio,
            is_intersecting,
        }
    }

    /// Observe `target` against the root and return an entry if the
    /// intersection status changed since the previous observation.
    pub fn observe(&mut self, target: Rect, viewport: Rect) -> Option<IntersectionEntry> {
        if !self.attached {
            return None;
        }
        let entry = self.measure(target, viewport);
        let status = (entry.is_intersecting, entry.ratio == 0.0);
        if self.last == Some(status) {
            return None;
        }
        self.last = Some(status);
        Some(entry)
    }
}
