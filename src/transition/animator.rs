//! Terminal, non-interactive zoom run between the grid and detail endpoints.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::context::{FloatingProxy, Placement, SceneState, TransitionContext, ViewKey, ViewState};
use super::zoomable::ZoomableRef;
use super::TransitionDirection;
use crate::animation::{EasingFunction, Tween};
use crate::config::TransitionConfig;

/// A run in flight. Owns the context, and through it the floating proxy,
/// until the tween finishes.
struct ActiveRun {
    context: TransitionContext,
    grid: ZoomableRef,
    detail: ZoomableRef,
    faded_view: ViewKey,
    tween: Tween<SceneState>,
}

/// Runs the spring-damped zoom that moves the floating proxy between the
/// grid and detail frames while cross-fading the two screens.
///
/// Once started a run always plays to the end; deciding whether to start it
/// at all is the interaction controller's job.
pub struct AnimationController {
    direction: TransitionDirection,
    duration: Duration,
    damping: f32,
    run: Option<ActiveRun>,
}

impl AnimationController {
    pub fn new() -> Self {
        Self::with_config(&TransitionConfig::default())
    }

    pub fn with_config(config: &TransitionConfig) -> Self {
        Self {
            direction: TransitionDirection::Presenting,
            duration: config.duration(),
            damping: config.spring_damping,
            run: None,
        }
    }

    pub fn direction(&self) -> TransitionDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: TransitionDirection) {
        self.direction = direction;
    }

    pub fn transition_duration(&self) -> Duration {
        self.duration
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Start a fresh run for the current direction.
    pub fn animate_transition(&mut self, context: TransitionContext) {
        self.start(context, false);
    }

    /// Take over a dismissal whose proxy an interactive drag has already
    /// placed. The proxy and the source view's alpha are animated from where
    /// the drag left them.
    pub(crate) fn continue_transition(&mut self, context: TransitionContext) {
        self.direction = TransitionDirection::Dismissing;
        self.start(context, true);
    }

    fn start(&mut self, mut context: TransitionContext, handoff: bool) {
        if self.run.is_some() {
            warn!("Transition started while another run is live; finishing the old run first");
            self.finish_now();
        }

        let direction = self.direction;
        let (grid, detail) = resolve_endpoints(direction, &context);

        let container_frame = context.container().frame();
        let grid_frame = grid.borrow_mut().target_frame(container_frame, true);
        let detail_frame = detail.borrow_mut().target_frame(container_frame, false);
        let final_frame = context.final_frame(ViewKey::To);
        let image = detail.borrow().target_image();

        grid.borrow_mut().set_transitioning(true);
        detail.borrow_mut().set_transitioning(true);

        let (start, end, faded_view) = match direction {
            TransitionDirection::Presenting => (
                SceneState {
                    proxy_frame: grid_frame,
                    view_alpha: 0.0,
                },
                SceneState {
                    proxy_frame: detail_frame,
                    view_alpha: 1.0,
                },
                ViewKey::To,
            ),
            TransitionDirection::Dismissing => {
                let container = context.container();
                let placed = container.proxy().filter(|_| handoff).map(|p| p.frame);
                let start = SceneState {
                    proxy_frame: placed.unwrap_or(detail_frame),
                    view_alpha: if handoff {
                        container.view_alpha(ViewKey::From).unwrap_or(1.0)
                    } else {
                        1.0
                    },
                };
                let end = SceneState {
                    proxy_frame: grid_frame,
                    view_alpha: 0.0,
                };
                (start, end, ViewKey::From)
            }
        };

        let container = context.container_mut();
        let (placement, to_alpha) = match direction {
            TransitionDirection::Presenting => (Placement::Front, 0.0),
            TransitionDirection::Dismissing => (Placement::Back, 1.0),
        };
        container.insert_view(ViewKey::To, ViewState::new(final_frame, to_alpha), placement);
        if container.proxy().is_none() {
            container.add_proxy(FloatingProxy {
                image,
                frame: start.proxy_frame,
            });
        }
        container.apply(&start, faded_view);

        info!(
            ?direction,
            handoff,
            from = ?start.proxy_frame,
            to = ?end.proxy_frame,
            "zoom transition started"
        );

        self.run = Some(ActiveRun {
            context,
            grid,
            detail,
            faded_view,
            tween: Tween::new(
                start,
                end,
                self.duration,
                EasingFunction::Spring {
                    damping: self.damping,
                },
            ),
        });
    }

    /// Advance the live run by one frame. Returns whether a run is still live.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(run) = self.run.as_mut() else {
            return false;
        };

        run.tween.advance(dt);
        let state = run.tween.value();
        run.context.container_mut().apply(&state, run.faded_view);

        if run.tween.is_finished() {
            self.complete_run();
            return false;
        }
        true
    }

    /// Jump the live run to its end state and complete it.
    pub fn finish_now(&mut self) {
        if let Some(run) = self.run.as_mut() {
            run.tween.finish();
            let state = run.tween.value();
            run.context.container_mut().apply(&state, run.faded_view);
            self.complete_run();
        }
    }

    /// Container of the live run, for rendering.
    pub fn container(&self) -> Option<&super::Container> {
        self.run.as_ref().map(|run| run.context.container())
    }

    fn complete_run(&mut self) {
        let Some(run) = self.run.take() else {
            return;
        };
        let ActiveRun {
            mut context,
            grid,
            detail,
            ..
        } = run;

        grid.borrow_mut().set_transitioning(false);
        detail.borrow_mut().set_transitioning(false);
        context.container_mut().remove_proxy();

        let success = !context.was_cancelled();
        debug!(direction = ?self.direction, success, "zoom transition finished");
        context.complete(success);
    }
}

impl Default for AnimationController {
    fn default() -> Self {
        Self::new()
    }
}

/// `(grid, detail)` for a run in `direction`.
fn resolve_endpoints(direction: TransitionDirection, context: &TransitionContext) -> (ZoomableRef, ZoomableRef) {
    let from = context.from_screen().resolve_zoomable();
    let to = context.to_screen().resolve_zoomable();
    match direction {
        TransitionDirection::Presenting => (from, to),
        TransitionDirection::Dismissing => (to, from),
    }
}
