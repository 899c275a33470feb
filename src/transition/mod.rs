//! Zoom transition between the gallery grid and the detail screen.
//!
//! `TransitionController` is the entry point a host talks to. It owns one
//! [`AnimationController`] for the terminal spring run and one
//! [`InteractionController`] for drag-to-dismiss, and reuses both across
//! every present/dismiss cycle.
//!
//! Ownership of a run moves with its [`TransitionContext`]: the interaction
//! controller holds it while a drag is live and moves it into the animation
//! controller at hand-off. The floating proxy lives in the context's
//! container, so it moves along with it.

mod animator;
mod context;
mod interaction;
mod zoomable;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::debug;

pub use animator::AnimationController;
pub use context::{
    Container, FloatingProxy, Placement, SceneState, TransitionContext, TransitionOutcome, ViewKey, ViewState,
};
pub use interaction::{InteractionController, PanEvent, PanPhase};
pub use zoomable::{ImageHandle, ImageZoomable, Screen, ZoomableRef};

use crate::config::TransitionConfig;

/// Which way a run goes. Presenting moves from the grid to the detail
/// screen; dismissing goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionDirection {
    Presenting,
    Dismissing,
}

/// Supplies the animator and interactive controller for each transition and
/// forwards drag events.
pub struct TransitionController {
    animation: Rc<RefCell<AnimationController>>,
    interaction: InteractionController,
}

impl TransitionController {
    pub fn new() -> Self {
        Self::with_config(&TransitionConfig::default())
    }

    pub fn with_config(config: &TransitionConfig) -> Self {
        let animation = Rc::new(RefCell::new(AnimationController::with_config(config)));
        let interaction = InteractionController::with_config(Rc::downgrade(&animation), config);
        Self {
            animation,
            interaction,
        }
    }

    /// Animator for a presentation.
    pub fn animator_for_presenting(&self) -> Rc<RefCell<AnimationController>> {
        self.animation.borrow_mut().set_direction(TransitionDirection::Presenting);
        self.animation.clone()
    }

    /// Animator for a dismissal.
    pub fn animator_for_dismissing(&self) -> Rc<RefCell<AnimationController>> {
        self.animation.borrow_mut().set_direction(TransitionDirection::Dismissing);
        self.animation.clone()
    }

    /// The interactive controller, only while a drag is live. Without one a
    /// dismissal falls back to the plain animator run.
    pub fn interaction_controller_for_dismissal(&mut self) -> Option<&mut InteractionController> {
        if self.interaction.is_panning() {
            Some(&mut self.interaction)
        } else {
            None
        }
    }

    /// Present the destination of `context` with the zoom animation.
    pub fn present(&mut self, context: TransitionContext) {
        self.animator_for_presenting().borrow_mut().animate_transition(context);
    }

    /// Dismiss back to the destination of `context`: interactively when a drag
    /// is live, otherwise with the plain zoom animation.
    pub fn dismiss(&mut self, context: TransitionContext) {
        let animator = self.animator_for_dismissing();
        match self.interaction_controller_for_dismissal() {
            Some(interaction) => interaction.start_interactive_transition(context),
            None => animator.borrow_mut().animate_transition(context),
        }
    }

    /// Forward a raw drag event.
    ///
    /// A new drag is not accepted while the terminal zoom is still running.
    pub fn handle_pan(&mut self, event: &PanEvent) {
        if event.phase == PanPhase::Began && self.animation.borrow().is_running() {
            debug!("drag began during a running transition; ignoring");
            return;
        }
        self.interaction.handle_pan(event);
    }

    /// Advance whichever run is live by one frame. Returns whether anything is
    /// still animating.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let animating = self.animation.borrow_mut().tick(dt);
        let settling = self.interaction.tick(dt);
        animating || settling
    }

    /// Run `f` on the container to draw this frame, if a transition is live.
    pub fn with_scene<R>(&self, f: impl FnOnce(&Container) -> R) -> Option<R> {
        let animation = self.animation.borrow();
        match animation.container() {
            Some(container) => Some(f(container)),
            None => self.interaction.container().map(f),
        }
    }

    pub fn is_panning(&self) -> bool {
        self.interaction.is_panning()
    }

    /// Nothing is animating and no drag is live.
    pub fn is_idle(&self) -> bool {
        !self.animation.borrow().is_running() && !self.interaction.is_panning() && !self.interaction.is_settling()
    }
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new()
    }
}
