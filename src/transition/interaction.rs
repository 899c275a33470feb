//! Gesture-driven dismissal: the floating proxy follows the drag, the detail
//! screen fades with distance, and release either hands off to the
//! animation controller or snaps back and cancels.

use std::cell::RefCell;
use std::mem;
use std::rc::Weak;
use std::time::Duration;

use egui::{Pos2, Rect, Vec2};
use tracing::{debug, info, warn};

use super::animator::AnimationController;
use super::context::{Container, FloatingProxy, Placement, SceneState, TransitionContext, ViewKey, ViewState};
use super::zoomable::ZoomableRef;
use crate::animation::{EasingFunction, Tween};
use crate::config::TransitionConfig;
use crate::geometry::{distance, with_center};

/// Phase of a press-drag-release gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// One raw drag event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanEvent {
    pub phase: PanPhase,
    /// Cumulative translation since the gesture began
    pub translation: Vec2,
    /// Pointer velocity in points per second
    pub velocity: Vec2,
    /// Center of the dragged view when the event fired
    pub view_center: Pos2,
}

impl PanEvent {
    pub fn new(phase: PanPhase, view_center: Pos2, translation: Vec2) -> Self {
        Self {
            phase,
            translation,
            velocity: Vec2::ZERO,
            view_center,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Endpoints and proxy placement, created on the first `Changed` event that
/// has a context to draw into.
struct LiveDrag {
    grid: ZoomableRef,
    detail: ZoomableRef,
    proxy_home: Rect,
}

struct DragSession {
    origin: Pos2,
    translation: Vec2,
    context: Option<TransitionContext>,
    live: Option<LiveDrag>,
}

impl DragSession {
    fn distance(&self) -> f32 {
        distance(self.origin, self.origin + self.translation)
    }
}

/// A released drag animating back to its starting point before cancelling.
struct SnapBack {
    context: TransitionContext,
    live: LiveDrag,
    tween: Tween<SceneState>,
}

enum GestureState {
    Idle,
    Dragging(DragSession),
    Settling(SnapBack),
}

/// Tracks a drag and drives an interactive dismissal frame by frame.
pub struct InteractionController {
    animator: Weak<RefCell<AnimationController>>,
    completion_threshold: f32,
    fade_distance: f32,
    snap_back_duration: Duration,
    state: GestureState,
}

impl InteractionController {
    pub fn new(animator: Weak<RefCell<AnimationController>>) -> Self {
        Self::with_config(animator, &TransitionConfig::default())
    }

    pub fn with_config(animator: Weak<RefCell<AnimationController>>, config: &TransitionConfig) -> Self {
        Self {
            animator,
            completion_threshold: config.completion_threshold,
            fade_distance: config.fade_distance.max(1.0),
            snap_back_duration: config.snap_back_duration(),
            state: GestureState::Idle,
        }
    }

    /// A pan gesture is live.
    pub fn is_panning(&self) -> bool {
        matches!(self.state, GestureState::Dragging(_))
    }

    /// A released drag is animating back.
    pub fn is_settling(&self) -> bool {
        matches!(self.state, GestureState::Settling(_))
    }

    /// Attach the context of a dismissal started while a drag is live.
    ///
    /// Without a live drag there is nothing to drive the transition, so the
    /// context is cancelled right away.
    pub fn start_interactive_transition(&mut self, mut context: TransitionContext) {
        context.set_interactive(true);
        match &mut self.state {
            GestureState::Dragging(session) if session.context.is_none() => {
                debug!("interactive dismissal attached to live drag");
                session.context = Some(context);
            }
            _ => {
                warn!("interactive transition started without a fresh drag; cancelling it");
                context.cancel_interactive();
                context.complete(false);
            }
        }
    }

    pub fn handle_pan(&mut self, event: &PanEvent) {
        match event.phase {
            PanPhase::Began => self.began(event),
            PanPhase::Changed => self.changed(event),
            PanPhase::Ended => self.ended(event),
            PanPhase::Cancelled => self.cancelled(),
        }
    }

    /// Advance a snap-back by one frame. Returns whether one is still live.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let GestureState::Settling(snap) = &mut self.state else {
            return false;
        };

        snap.tween.advance(dt);
        let state = snap.tween.value();
        snap.context.container_mut().apply(&state, ViewKey::From);

        if snap.tween.is_finished() {
            self.finish_snap_back();
            return false;
        }
        true
    }

    /// Container of the live gesture, for rendering.
    pub fn container(&self) -> Option<&Container> {
        match &self.state {
            GestureState::Idle => None,
            GestureState::Dragging(session) => session.context.as_ref().map(|c| c.container()),
            GestureState::Settling(snap) => Some(snap.context.container()),
        }
    }

    fn began(&mut self, event: &PanEvent) {
        match mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => {}
            GestureState::Dragging(session) => {
                warn!("new drag began before the previous one ended; cancelling the previous one");
                cancel_session(session);
            }
            GestureState::Settling(snap) => {
                self.state = GestureState::Settling(snap);
                self.finish_snap_back();
            }
        }

        debug!(origin = ?event.view_center, "drag began");
        self.state = GestureState::Dragging(DragSession {
            origin: event.view_center,
            translation: Vec2::ZERO,
            context: None,
            live: None,
        });
    }

    fn changed(&mut self, event: &PanEvent) {
        let GestureState::Dragging(session) = &mut self.state else {
            debug!("drag change without a live drag; ignoring");
            return;
        };
        session.translation = event.translation;
        update_drag(session, self.fade_distance);
    }

    fn ended(&mut self, event: &PanEvent) {
        let mut session = match mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Dragging(session) => session,
            other => {
                self.state = other;
                debug!("drag end without a live drag; ignoring");
                return;
            }
        };
        session.translation = event.translation;
        if session.live.is_some() {
            update_drag(&mut session, self.fade_distance);
        }

        let drag_distance = session.distance();
        let Some(context) = session.context.take() else {
            debug!(drag_distance, "drag ended with no transition attached");
            return;
        };

        match session.live.take() {
            Some(live) if drag_distance >= self.completion_threshold => {
                match self.animator.upgrade() {
                    Some(animator) => {
                        info!(drag_distance, "drag passed threshold; handing off to zoom animation");
                        animator.borrow_mut().continue_transition(context);
                    }
                    None => {
                        warn!("animation controller is gone; snapping back instead");
                        self.snap_back(context, live);
                    }
                }
            }
            Some(live) => {
                info!(drag_distance, "drag below threshold; snapping back");
                self.snap_back(context, live);
            }
            None => {
                info!(drag_distance, "drag ended before the transition became visible; cancelling");
                let mut context = context;
                context.cancel_interactive();
                context.complete(false);
            }
        }
    }

    fn cancelled(&mut self) {
        match mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Dragging(session) => {
                info!("drag cancelled");
                cancel_session(session);
            }
            other => self.state = other,
        }
    }

    fn snap_back(&mut self, context: TransitionContext, live: LiveDrag) {
        let container = context.container();
        let current = SceneState {
            proxy_frame: container.proxy().map(|p| p.frame).unwrap_or(live.proxy_home),
            view_alpha: container.view_alpha(ViewKey::From).unwrap_or(1.0),
        };
        let home = SceneState {
            proxy_frame: live.proxy_home,
            view_alpha: 1.0,
        };
        self.state = GestureState::Settling(SnapBack {
            context,
            live,
            tween: Tween::new(current, home, self.snap_back_duration, EasingFunction::EaseOut),
        });
    }

    fn finish_snap_back(&mut self) {
        let GestureState::Settling(snap) = mem::replace(&mut self.state, GestureState::Idle) else {
            return;
        };
        let SnapBack {
            mut context,
            live,
            mut tween,
        } = snap;
        tween.finish();
        context.container_mut().apply(&tween.value(), ViewKey::From);
        restore(&mut context, &live);
        context.cancel_interactive();
        context.complete(false);
    }
}

/// Lazily set up the transition, then move the proxy and fade the source.
fn update_drag(session: &mut DragSession, fade_distance: f32) {
    let Some(context) = session.context.as_mut() else {
        return;
    };
    let live = session.live.get_or_insert_with(|| begin_live(context));

    let drag_distance = distance(session.origin, session.origin + session.translation);
    let alpha = 1.0 - (drag_distance / fade_distance).min(1.0);

    let container = context.container_mut();
    container.set_proxy_frame(with_center(live.proxy_home, live.proxy_home.center() + session.translation));
    container.set_view_alpha(ViewKey::From, alpha);
}

/// Insert the destination view and the proxy and hide both endpoints' images.
fn begin_live(context: &mut TransitionContext) -> LiveDrag {
    let detail = context.from_screen().resolve_zoomable();
    let grid = context.to_screen().resolve_zoomable();

    let container_frame = context.container().frame();
    let proxy_home = detail.borrow_mut().target_frame(container_frame, false);
    let image = detail.borrow().target_image();
    let final_frame = context.final_frame(ViewKey::To);

    grid.borrow_mut().set_transitioning(true);
    detail.borrow_mut().set_transitioning(true);

    let container = context.container_mut();
    container.insert_view(ViewKey::To, ViewState::new(final_frame, 1.0), Placement::Back);
    if container.proxy().is_none() {
        container.add_proxy(FloatingProxy {
            image,
            frame: proxy_home,
        });
    }

    debug!(?proxy_home, "interactive dismissal became visible");
    LiveDrag {
        grid,
        detail,
        proxy_home,
    }
}

/// Put both endpoints back and drop the proxy.
fn restore(context: &mut TransitionContext, live: &LiveDrag) {
    live.grid.borrow_mut().set_transitioning(false);
    live.detail.borrow_mut().set_transitioning(false);
    let container = context.container_mut();
    container.remove_proxy();
    container.set_view_alpha(ViewKey::From, 1.0);
}

fn cancel_session(session: DragSession) {
    let DragSession { context, live, .. } = session;
    let Some(mut context) = context else {
        return;
    };
    if let Some(live) = live.as_ref() {
        restore(&mut context, live);
    }
    context.cancel_interactive();
    context.complete(false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{ImageHandle, ImageZoomable, Screen, TransitionOutcome};
    use egui::{pos2, vec2};
    use std::rc::Rc;

    struct Endpoint {
        frame: Rect,
        transitioning: bool,
    }

    impl ImageZoomable for Endpoint {
        fn is_transitioning(&self) -> bool {
            self.transitioning
        }
        fn set_transitioning(&mut self, transitioning: bool) {
            self.transitioning = transitioning;
        }
        fn target_image(&self) -> ImageHandle {
            ImageHandle::new(egui::TextureId::Managed(1), vec2(200.0, 200.0))
        }
        fn target_frame(&mut self, _container: Rect, _center_if_offscreen: bool) -> Rect {
            self.frame
        }
    }

    type Outcomes = Rc<RefCell<Vec<TransitionOutcome>>>;

    fn setup() -> (InteractionController, Rc<RefCell<Endpoint>>, Outcomes, TransitionContext) {
        let detail = Rc::new(RefCell::new(Endpoint {
            frame: Rect::from_center_size(pos2(100.0, 100.0), vec2(200.0, 200.0)),
            transitioning: false,
        }));
        let grid = Rc::new(RefCell::new(Endpoint {
            frame: Rect::from_min_size(pos2(18.0, 18.0), vec2(80.0, 60.0)),
            transitioning: false,
        }));
        let outcomes: Outcomes = Rc::default();
        let sink = outcomes.clone();
        let bounds = Rect::from_min_size(Pos2::ZERO, vec2(200.0, 400.0));
        let context = TransitionContext::new(
            Screen::zoomable(&detail),
            Screen::zoomable(&grid),
            bounds,
            bounds,
            move |o| sink.borrow_mut().push(o),
        );
        (InteractionController::new(Weak::new()), detail, outcomes, context)
    }

    fn event(phase: PanPhase, dy: f32) -> PanEvent {
        PanEvent::new(phase, pos2(100.0, 100.0), vec2(0.0, dy))
    }

    #[test]
    fn test_proxy_follows_drag_and_source_fades() {
        let (mut controller, detail, _outcomes, context) = setup();
        controller.handle_pan(&event(PanPhase::Began, 0.0));
        assert!(controller.is_panning());
        controller.start_interactive_transition(context);
        controller.handle_pan(&event(PanPhase::Changed, 100.0));

        let container = controller.container().expect("live drag");
        let proxy = container.proxy().expect("proxy inserted");
        assert_eq!(proxy.frame.center(), pos2(100.0, 200.0));
        assert!((container.view_alpha(ViewKey::From).unwrap_or(0.0) - 0.5).abs() < 1e-5);
        assert!(container.contains_view(ViewKey::To));
        assert!(detail.borrow().transitioning);
    }

    #[test]
    fn test_events_without_session_are_ignored() {
        let (mut controller, _detail, outcomes, _context) = setup();
        controller.handle_pan(&event(PanPhase::Changed, 10.0));
        controller.handle_pan(&event(PanPhase::Ended, 10.0));
        controller.handle_pan(&event(PanPhase::Cancelled, 10.0));
        assert!(!controller.is_panning());
        assert!(outcomes.borrow().is_empty());
    }

    #[test]
    fn test_context_without_drag_is_cancelled() {
        let (mut controller, _detail, outcomes, context) = setup();
        controller.start_interactive_transition(context);
        let outcomes = outcomes.borrow();
        assert_eq!(outcomes.len(), 1);
        assert!(!outcomes[0].success);
        assert!(outcomes[0].cancelled);
    }

    #[test]
    fn test_missing_animator_falls_back_to_snap_back() {
        let (mut controller, detail, outcomes, context) = setup();
        controller.handle_pan(&event(PanPhase::Began, 0.0));
        controller.start_interactive_transition(context);
        controller.handle_pan(&event(PanPhase::Changed, 120.0));
        controller.handle_pan(&event(PanPhase::Ended, 120.0));
        assert!(controller.is_settling());

        while controller.tick(Duration::from_millis(16)) {}
        let outcomes = outcomes.borrow();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].cancelled);
        assert!(!detail.borrow().transitioning);
    }
}
