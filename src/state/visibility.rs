//! Visibility Gate - One-shot viewport latch
//!
//! When a typewriter is configured to start only when visible, its animation
//! is held until the host element intersects the viewport by at least
//! [`VISIBILITY_THRESHOLD`] of its area. The gate then latches open and never
//! closes again, even if the element scrolls back out.
//!
//! The host feeds geometry in with [`VisibilityGate::observe`] whenever layout
//! or scrolling changes. After [`VisibilityGate::disconnect`] observations are
//! ignored.

use crate::types::Rect;

/// Fraction of the element area that must be inside the viewport.
pub const VISIBILITY_THRESHOLD: f32 = 0.1;

/// Fraction of `element` that lies inside `viewport` (0.0 to 1.0).
///
/// Zero-area elements count as fully visible when their origin is inside the
/// viewport, and invisible otherwise.
pub fn intersection_ratio(element: &Rect, viewport: &Rect) -> f32 {
    let area = element.area();
    if area == 0 {
        return if viewport.contains(element.x, element.y) { 1.0 } else { 0.0 };
    }
    match element.intersect(viewport) {
        Some(hit) => hit.area() as f32 / area as f32,
        None => 0.0,
    }
}

/// Latch that arms a typewriter once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityGate {
    armed: bool,
    connected: bool,
}

impl VisibilityGate {
    /// Gate for a component. `start_on_visible = false` yields an open gate.
    pub fn new(start_on_visible: bool) -> Self {
        Self {
            armed: !start_on_visible,
            connected: start_on_visible,
        }
    }

    /// Whether animation is permitted.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the gate still listens to observations.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Report new geometry.
    ///
    /// Returns true exactly once: on the observation that arms the gate. The
    /// gate disconnects itself after arming.
    pub fn observe(&mut self, element: &Rect, viewport: &Rect) -> bool {
        if self.armed || !self.connected {
            return false;
        }
        let visible = intersection_ratio(element, viewport) >= VISIBILITY_THRESHOLD;
        if visible {
            self.armed = true;
            self.connected = false;
        }
        visible
    }

    /// Stop observing. Safe to call repeatedly.
    pub fn disconnect(&mut self) {
        self.connected = false;
    }
}
