//! Input handling module
//!
//! Turns egui pointer responses into the gestures the gallery cares about:
//! - Single and double taps, with single taps held back until a double tap
//!   is ruled out
//! - Axis-locked drags reported as `PanEvent`s (vertical drags dismiss,
//!   horizontal drags page)

use egui::{Pos2, Vec2};

use crate::transition::{PanEvent, PanPhase};

/// Double-click detection threshold, in seconds
const DOUBLE_CLICK_THRESHOLD: f64 = 0.3;

/// Maximum pointer travel between the two clicks of a double click
const DOUBLE_CLICK_SLOP: f32 = 5.0;

/// Recognized tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tap {
    Single,
    Double,
}

/// Tells single taps from double taps.
#[derive(Debug, Default)]
pub struct TapRecognizer {
    /// Time and position of a click still waiting for its partner
    pending: Option<(f64, Pos2)>,
}

impl TapRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current frame. `click` is the position of a click that
    /// landed this frame; `now` is the input time in seconds.
    pub fn update(&mut self, click: Option<Pos2>, now: f64) -> Option<Tap> {
        if let Some(pos) = click {
            if let Some((at, first)) = self.pending.take() {
                if now - at < DOUBLE_CLICK_THRESHOLD && (pos - first).length() < DOUBLE_CLICK_SLOP {
                    return Some(Tap::Double);
                }
                // Too slow or too far: the earlier click stands on its own.
                self.pending = Some((now, pos));
                return Some(Tap::Single);
            }
            self.pending = Some((now, pos));
            return None;
        }

        match self.pending {
            Some((at, _)) if now - at >= DOUBLE_CLICK_THRESHOLD => {
                self.pending = None;
                Some(Tap::Single)
            }
            _ => None,
        }
    }

    /// A single tap is still waiting to be confirmed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Travel from the press point before a drag commits to an axis.
const AXIS_SLOP: f32 = 8.0;

/// Axis a drag locked onto when it began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAxis {
    Horizontal,
    Vertical,
}

/// Accumulates a drag and reports it as pan events.
///
/// The axis is chosen from the total travel since the press, once it passes
/// `AXIS_SLOP`. Nothing is reported before that, so a press held in place
/// and then swiped sideways still pages.
#[derive(Debug, Default)]
pub struct DragTracker {
    live: bool,
    axis: Option<DragAxis>,
    translation: Vec2,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The locked axis, `None` until the drag has travelled far enough.
    pub fn axis(&self) -> Option<DragAxis> {
        self.axis
    }

    /// Feed one frame of an egui drag response. `press_origin` is where the
    /// pointer went down and `view_center` is the center of the dragged view.
    pub fn update(
        &mut self,
        response: &egui::Response,
        press_origin: Option<Pos2>,
        view_center: Pos2,
        velocity: Vec2,
    ) -> Option<(DragAxis, PanEvent)> {
        if response.drag_started() {
            self.begin();
        }
        if response.drag_stopped() {
            return self.end(PanPhase::Ended, view_center, velocity);
        }
        if response.dragged() {
            let travel = match (press_origin, response.interact_pointer_pos()) {
                (Some(origin), Some(pos)) => pos - origin,
                _ => self.translation + response.drag_delta(),
            };
            return self.change(travel, view_center, velocity);
        }
        None
    }

    /// Start tracking a drag. No event is reported until the axis locks.
    pub fn begin(&mut self) {
        self.live = true;
        self.axis = None;
        self.translation = Vec2::ZERO;
    }

    /// Feed the total travel since the press. The frame that locks the axis
    /// reports `Began`; later frames report `Changed`.
    pub fn change(&mut self, travel: Vec2, view_center: Pos2, velocity: Vec2) -> Option<(DragAxis, PanEvent)> {
        if !self.live {
            return None;
        }
        self.translation = travel;
        if let Some(axis) = self.axis {
            return Some((
                axis,
                PanEvent::new(PanPhase::Changed, view_center, travel).with_velocity(velocity),
            ));
        }
        if travel.length() < AXIS_SLOP {
            return None;
        }
        let axis = if travel.x.abs() > travel.y.abs() {
            DragAxis::Horizontal
        } else {
            DragAxis::Vertical
        };
        self.axis = Some(axis);
        Some((axis, PanEvent::new(PanPhase::Began, view_center, Vec2::ZERO)))
    }

    /// Finish the drag with `phase` (`Ended` or `Cancelled`). A drag that
    /// never locked an axis reports nothing.
    pub fn end(&mut self, phase: PanPhase, view_center: Pos2, velocity: Vec2) -> Option<(DragAxis, PanEvent)> {
        self.live = false;
        let translation = std::mem::take(&mut self.translation);
        let axis = self.axis.take()?;
        Some((axis, PanEvent::new(phase, view_center, translation).with_velocity(velocity)))
    }
}
