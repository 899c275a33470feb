//! Per-run transition context: the two endpoint screens, the container the
//! transition draws into, and the single-use completion.

use egui::{Pos2, Rect};
use smallvec::SmallVec;
use tracing::debug;

use super::zoomable::{ImageHandle, Screen};
use crate::animation::Interpolate;

/// Identifies one of the two root views taking part in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// The screen being transitioned away from.
    From,
    /// The screen being transitioned to.
    To,
}

/// Layout and opacity of a root view inside the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub frame: Rect,
    pub alpha: f32,
}

impl ViewState {
    pub fn new(frame: Rect, alpha: f32) -> Self {
        Self { frame, alpha }
    }
}

/// Where a view lands in the container's back-to-front stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Behind every other view.
    Back,
    /// In front of every other view, still below the floating proxy.
    Front,
}

/// The overlay image that travels between the two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingProxy {
    pub image: ImageHandle,
    pub frame: Rect,
}

/// Visual state animated by both controllers: where the proxy is and how
/// opaque the fading root view is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneState {
    pub proxy_frame: Rect,
    pub view_alpha: f32,
}

impl Interpolate for SceneState {
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        Self {
            proxy_frame: <Rect as Interpolate>::lerp(&from.proxy_frame, &to.proxy_frame, t),
            view_alpha: <f32 as Interpolate>::lerp(&from.view_alpha, &to.view_alpha, t),
        }
    }
}

/// The surface a transition draws into. Frames of views and of the proxy are
/// relative to `frame.min`; the proxy always sits above every view.
#[derive(Debug, Clone)]
pub struct Container {
    frame: Rect,
    views: SmallVec<[(ViewKey, ViewState); 2]>,
    proxy: Option<FloatingProxy>,
    proxy_insertions: usize,
    proxy_removals: usize,
}

impl Container {
    /// A container showing only the source view, filling its bounds.
    pub fn new(frame: Rect) -> Self {
        let mut views = SmallVec::new();
        let bounds = Rect::from_min_size(Pos2::ZERO, frame.size());
        views.push((ViewKey::From, ViewState::new(bounds, 1.0)));
        Self {
            frame,
            views,
            proxy: None,
            proxy_insertions: 0,
            proxy_removals: 0,
        }
    }

    /// Frame in window coordinates.
    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Bounds in the container's own coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.frame.size())
    }

    pub fn contains_view(&self, key: ViewKey) -> bool {
        self.views.iter().any(|(k, _)| *k == key)
    }

    pub fn view(&self, key: ViewKey) -> Option<&ViewState> {
        self.views.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Views back to front.
    pub fn views(&self) -> impl Iterator<Item = (ViewKey, ViewState)> + '_ {
        self.views.iter().copied()
    }

    /// Insert a root view. A view that is already present keeps its place.
    pub fn insert_view(&mut self, key: ViewKey, state: ViewState, placement: Placement) {
        if self.contains_view(key) {
            debug!(?key, "view already in container, not re-inserting");
            return;
        }
        match placement {
            Placement::Back => self.views.insert(0, (key, state)),
            Placement::Front => self.views.push((key, state)),
        }
    }

    pub fn set_view_alpha(&mut self, key: ViewKey, alpha: f32) {
        if let Some((_, view)) = self.views.iter_mut().find(|(k, _)| *k == key) {
            view.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    pub fn view_alpha(&self, key: ViewKey) -> Option<f32> {
        self.view(key).map(|v| v.alpha)
    }

    /// Add the floating proxy on top of every view.
    ///
    /// # Panics
    ///
    /// Panics if a proxy is already present; a run owns exactly one.
    pub fn add_proxy(&mut self, proxy: FloatingProxy) {
        assert!(self.proxy.is_none(), "floating proxy added twice in one transition");
        self.proxy = Some(proxy);
        self.proxy_insertions += 1;
    }

    pub fn proxy(&self) -> Option<&FloatingProxy> {
        self.proxy.as_ref()
    }

    pub fn set_proxy_frame(&mut self, frame: Rect) {
        if let Some(proxy) = self.proxy.as_mut() {
            proxy.frame = frame;
        }
    }

    /// Take the proxy out of the container.
    pub fn remove_proxy(&mut self) -> Option<FloatingProxy> {
        let proxy = self.proxy.take();
        if proxy.is_some() {
            self.proxy_removals += 1;
        }
        proxy
    }

    /// How many times a proxy was added during this run.
    pub fn proxy_insertions(&self) -> usize {
        self.proxy_insertions
    }

    /// How many times a proxy was removed during this run.
    pub fn proxy_removals(&self) -> usize {
        self.proxy_removals
    }

    /// Apply an animated scene state, fading `view`.
    pub(crate) fn apply(&mut self, state: &SceneState, view: ViewKey) {
        self.set_proxy_frame(state.proxy_frame);
        self.set_view_alpha(view, state.view_alpha);
    }
}

/// What the host learns when a run terminates.
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    /// `true` when the destination screen is now the visible one.
    pub success: bool,
    /// `true` when the run was an interactive transition that got cancelled.
    pub cancelled: bool,
    /// Final state of the container, with the proxy already removed.
    pub container: Container,
}

type Completion = Box<dyn FnOnce(TransitionOutcome)>;

/// Everything one transition run needs from its host. Consumed on completion,
/// so a run can complete exactly once.
pub struct TransitionContext {
    from: Screen,
    to: Screen,
    container: Container,
    final_frame: Rect,
    interactive: bool,
    cancelled: bool,
    completion: Completion,
}

impl TransitionContext {
    /// `final_frame` is the destination's layout rectangle relative to
    /// `container_frame.min`.
    pub fn new(
        from: Screen,
        to: Screen,
        container_frame: Rect,
        final_frame: Rect,
        completion: impl FnOnce(TransitionOutcome) + 'static,
    ) -> Self {
        Self {
            from,
            to,
            container: Container::new(container_frame),
            final_frame,
            interactive: false,
            cancelled: false,
            completion: Box::new(completion),
        }
    }

    pub fn from_screen(&self) -> &Screen {
        &self.from
    }

    pub fn to_screen(&self) -> &Screen {
        &self.to
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Final layout rectangle for a root view.
    pub fn final_frame(&self, key: ViewKey) -> Rect {
        match key {
            ViewKey::To => self.final_frame,
            ViewKey::From => self
                .container
                .view(ViewKey::From)
                .map(|v| v.frame)
                .unwrap_or_else(|| self.container.bounds()),
        }
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub(crate) fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Mark an interactive run as cancelled. The run still has to be
    /// completed with [`TransitionContext::complete`].
    pub fn cancel_interactive(&mut self) {
        self.cancelled = true;
    }

    /// Report the end of the run to the host.
    pub fn complete(self, success: bool) {
        let TransitionContext {
            container,
            cancelled,
            completion,
            ..
        } = self;
        debug!(success, cancelled, "transition completed");
        completion(TransitionOutcome {
            success,
            cancelled,
            container,
        });
    }
}

impl std::fmt::Debug for TransitionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionContext")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("container", &self.container)
            .field("final_frame", &self.final_frame)
            .field("interactive", &self.interactive)
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn frame() -> Rect {
        Rect::from_min_size(pos2(10.0, 20.0), vec2(300.0, 600.0))
    }

    #[test]
    fn test_new_container_shows_source_only() {
        let container = Container::new(frame());
        assert!(container.contains_view(ViewKey::From));
        assert!(!container.contains_view(ViewKey::To));
        assert_eq!(container.bounds().min, Pos2::ZERO);
        assert_eq!(container.view(ViewKey::From).map(|v| v.frame), Some(container.bounds()));
    }

    #[test]
    fn test_insert_placement_and_no_reinsert() {
        let mut container = Container::new(frame());
        let state = ViewState::new(container.bounds(), 0.0);
        container.insert_view(ViewKey::To, state, Placement::Back);
        container.insert_view(ViewKey::To, ViewState::new(Rect::ZERO, 1.0), Placement::Front);

        let order: Vec<ViewKey> = container.views().map(|(k, _)| k).collect();
        assert_eq!(order, vec![ViewKey::To, ViewKey::From]);
        assert_eq!(container.view_alpha(ViewKey::To), Some(0.0));
    }

    #[test]
    fn test_proxy_counters() {
        let mut container = Container::new(frame());
        container.add_proxy(FloatingProxy {
            image: ImageHandle::placeholder(),
            frame: Rect::ZERO,
        });
        assert!(container.remove_proxy().is_some());
        assert!(container.remove_proxy().is_none());
        assert_eq!(container.proxy_insertions(), 1);
        assert_eq!(container.proxy_removals(), 1);
    }

    #[test]
    #[should_panic(expected = "added twice")]
    fn test_second_proxy_panics() {
        let mut container = Container::new(frame());
        let proxy = FloatingProxy {
            image: ImageHandle::placeholder(),
            frame: Rect::ZERO,
        };
        container.add_proxy(proxy);
        container.add_proxy(proxy);
    }

    #[test]
    fn test_alpha_is_clamped() {
        let mut container = Container::new(frame());
        container.set_view_alpha(ViewKey::From, 1.2);
        assert_eq!(container.view_alpha(ViewKey::From), Some(1.0));
        container.set_view_alpha(ViewKey::From, -0.1);
        assert_eq!(container.view_alpha(ViewKey::From), Some(0.0));
    }

    #[test]
    fn test_complete_reports_cancellation() {
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let mut context = TransitionContext::new(
            Screen::Opaque("a"),
            Screen::Opaque("b"),
            frame(),
            Rect::from_min_size(Pos2::ZERO, frame().size()),
            move |outcome| *sink.borrow_mut() = Some((outcome.success, outcome.cancelled)),
        );
        context.cancel_interactive();
        context.complete(false);
        assert_eq!(*seen.borrow(), Some((false, true)));
    }
}
