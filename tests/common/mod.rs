//! Shared fixtures for the transition integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use egui::{pos2, vec2, Pos2, Rect, TextureId, Vec2};
use photo_gallery::transition::ZoomableRef;
use photo_gallery::{
    ImageHandle, ImageZoomable, PanEvent, PanPhase, Screen, TransitionContext, TransitionController,
    TransitionOutcome,
};

pub const FRAME: Duration = Duration::from_millis(16);

/// Where every test drag starts.
pub const DRAG_ORIGIN: Pos2 = pos2(100.0, 100.0);

/// An endpoint that reports a fixed frame and records what the controllers
/// ask of it.
pub struct StubZoomable {
    pub frame: Rect,
    pub image: ImageHandle,
    pub transitioning: bool,
    /// Every value passed to `set_transitioning`, in order
    pub toggles: Vec<bool>,
    /// `center_if_offscreen` of every `target_frame` call, in order
    pub center_requests: Vec<bool>,
}

impl ImageZoomable for StubZoomable {
    fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    fn set_transitioning(&mut self, transitioning: bool) {
        self.transitioning = transitioning;
        self.toggles.push(transitioning);
    }

    fn target_image(&self) -> ImageHandle {
        self.image
    }

    fn target_frame(&mut self, container: Rect, center_if_offscreen: bool) -> Rect {
        self.center_requests.push(center_if_offscreen);
        self.frame.translate(-container.min.to_vec2())
    }
}

pub fn stub(frame: Rect) -> Rc<RefCell<StubZoomable>> {
    Rc::new(RefCell::new(StubZoomable {
        frame,
        image: ImageHandle::new(TextureId::Managed(42), vec2(1200.0, 800.0)),
        transitioning: false,
        toggles: Vec::new(),
        center_requests: Vec::new(),
    }))
}

/// Detail endpoint whose image is centered on [`DRAG_ORIGIN`].
pub fn detail_stub() -> Rc<RefCell<StubZoomable>> {
    stub(Rect::from_center_size(DRAG_ORIGIN, vec2(200.0, 200.0)))
}

/// Grid endpoint showing the selected cell near the top-left.
pub fn grid_stub() -> Rc<RefCell<StubZoomable>> {
    stub(Rect::from_min_size(pos2(18.0, 18.0), vec2(120.0, 90.0)))
}

pub fn container_frame() -> Rect {
    Rect::from_min_size(Pos2::ZERO, vec2(300.0, 600.0))
}

pub type Outcomes = Rc<RefCell<Vec<TransitionOutcome>>>;

pub fn outcomes() -> Outcomes {
    Rc::default()
}

pub fn context(from: Screen, to: Screen, outcomes: &Outcomes) -> TransitionContext {
    let sink = outcomes.clone();
    let frame = container_frame();
    TransitionContext::new(
        from,
        to,
        frame,
        Rect::from_min_size(Pos2::ZERO, frame.size()),
        move |outcome| sink.borrow_mut().push(outcome),
    )
}

/// Grid (inside a navigation stack) to detail.
pub fn presentation(
    grid: &Rc<RefCell<StubZoomable>>,
    detail: &Rc<RefCell<StubZoomable>>,
    outcomes: &Outcomes,
) -> TransitionContext {
    let grid: ZoomableRef = grid.clone();
    context(Screen::Navigation(vec![grid]), Screen::zoomable(detail), outcomes)
}

/// Detail back to the grid (inside a navigation stack).
pub fn dismissal(
    detail: &Rc<RefCell<StubZoomable>>,
    grid: &Rc<RefCell<StubZoomable>>,
    outcomes: &Outcomes,
) -> TransitionContext {
    let grid: ZoomableRef = grid.clone();
    context(Screen::zoomable(detail), Screen::Navigation(vec![grid]), outcomes)
}

pub fn pan(phase: PanPhase, translation: Vec2) -> PanEvent {
    PanEvent::new(phase, DRAG_ORIGIN, translation)
}

/// Begin a drag and start an interactive dismissal on it, the way a host
/// does on the first event of a vertical drag.
pub fn begin_interactive_dismissal(
    controller: &mut TransitionController,
    detail: &Rc<RefCell<StubZoomable>>,
    grid: &Rc<RefCell<StubZoomable>>,
    outcomes: &Outcomes,
) {
    controller.handle_pan(&pan(PanPhase::Began, Vec2::ZERO));
    assert!(controller.is_panning(), "drag should be live after Began");
    controller.dismiss(dismissal(detail, grid, outcomes));
}

/// Drag by `translation` and release.
pub fn drag_and_release(controller: &mut TransitionController, translation: Vec2) {
    controller.handle_pan(&pan(PanPhase::Changed, translation * 0.5));
    controller.handle_pan(&pan(PanPhase::Changed, translation));
    controller.handle_pan(&pan(PanPhase::Ended, translation));
}

/// Tick until nothing animates. Returns the number of frames that were
/// still live.
pub fn run_to_end(controller: &mut TransitionController) -> usize {
    let mut frames = 0;
    while controller.tick(FRAME) {
        frames += 1;
        assert!(frames < 10_000, "transition never finished");
    }
    frames
}

pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}
