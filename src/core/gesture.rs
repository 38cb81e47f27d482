use std::time::Instant;

use tracing::debug;

use super::{
    navigation::{
        NavigationController,
        TransitionHandle,
    },
    Direction,
};

/// Minimum horizontal travel, in points, for a drag to count as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 50.0;

/// Travel beyond this turns a press into a drag, and the click that follows
/// it is swallowed instead of flipping the card.
pub const TAP_SLOP: f32 = 8.0;

const FLIPPED_ROTATION: f32 = 180.0;

/// Provisional transform for the card while a finger or pointer drags it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardTransform {
    pub translate_x: f32,
    pub rotate_y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// No gesture was in progress.
    Inert,
    /// Released inside the threshold; the card snaps back.
    Cancelled,
    /// A swipe the controller refused (out of bounds or already animating).
    Rejected(Direction),
    Committed(TransitionHandle),
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start_x: f32,
    delta: f32,
    moved: bool,
}

#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    threshold: f32,
    drag: Option<Drag>,
    suppress_click: bool,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_THRESHOLD)
    }
}

impl GestureRecognizer {
    pub fn new(threshold: f32) -> Self {
        Self { threshold: threshold.abs(), drag: None, suppress_click: false }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = threshold.abs();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn offset(&self) -> f32 {
        self.drag.map_or(0.0, |drag| drag.delta)
    }

    /// Starts tracking a drag. Inert while a transition runs or when there is
    /// no card to drag.
    pub fn begin(&mut self, x: f32, nav: &NavigationController) -> bool {
        if nav.is_transitioning() || nav.deck().is_empty() {
            return false;
        }

        self.drag = Some(Drag { start_x: x, delta: 0.0, moved: false });
        self.suppress_click = false;
        true
    }

    /// Updates the provisional offset. Never touches the deck.
    pub fn update(&mut self, x: f32) -> Option<f32> {
        let drag = self.drag.as_mut()?;
        drag.delta = x - drag.start_x;
        if drag.delta.abs() > TAP_SLOP {
            drag.moved = true;
        }
        Some(drag.delta)
    }

    /// Ends the drag, clearing the offset whatever the outcome. A swipe past
    /// the threshold is routed through the controller: left is next, right is
    /// previous.
    pub fn end(&mut self, nav: &mut NavigationController, now: Instant) -> GestureOutcome {
        let Some(drag) = self.drag.take() else {
            return GestureOutcome::Inert;
        };

        if drag.moved {
            self.suppress_click = true;
        }

        if drag.delta.abs() <= self.threshold {
            return GestureOutcome::Cancelled;
        }

        let direction = if drag.delta < 0.0 { Direction::Next } else { Direction::Previous };
        match nav.begin_transition(direction, now) {
            Some(handle) => {
                debug!("Swipe of {:.0} committed {:?}", drag.delta, direction);
                GestureOutcome::Committed(handle)
            }
            None => GestureOutcome::Rejected(direction),
        }
    }

    /// Drops an in-flight drag without committing anything.
    pub fn cancel(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.suppress_click = drag.moved;
        }
    }

    /// Forgets a pending click suppression once no click can follow the drag
    /// that caused it, e.g. the pointer was released without one or a new
    /// card was rendered.
    pub fn settle(&mut self) {
        self.suppress_click = false;
    }

    /// Consumes a click on the card. Returns whether it may flip the card:
    /// the first click after a real drag is swallowed.
    pub fn take_click(&mut self) -> bool {
        if self.suppress_click {
            self.suppress_click = false;
            return false;
        }
        !self.is_dragging()
    }

    pub fn transform(&self, flipped: bool) -> CardTransform {
        CardTransform {
            translate_x: self.offset(),
            rotate_y: if flipped { FLIPPED_ROTATION } else { 0.0 },
        }
    }
}
