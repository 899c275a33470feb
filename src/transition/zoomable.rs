//! The capability every screen taking part in a zoom transition implements,
//! and the typed screen handles the controllers resolve it from.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{Rect, TextureId, Vec2};

/// A displayable image as seen by the transition: a texture plus its
/// natural size in points. No pixels travel through the core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageHandle {
    pub texture: TextureId,
    pub size: Vec2,
}

impl ImageHandle {
    pub fn new(texture: TextureId, size: Vec2) -> Self {
        Self { texture, size }
    }

    /// Stand-in for a screen with nothing to show. Geometry treats its zero
    /// size as degenerate and falls back to the container.
    pub fn placeholder() -> Self {
        Self {
            texture: TextureId::default(),
            size: Vec2::ZERO,
        }
    }
}

/// Implemented by a screen that can act as one endpoint of a zoom transition.
pub trait ImageZoomable {
    /// Whether the screen is currently hiding its own copy of the image.
    fn is_transitioning(&self) -> bool;

    /// Hide (`true`) or restore (`false`) the on-screen image so the floating
    /// proxy is the only visible copy while a transition runs.
    fn set_transitioning(&mut self, transitioning: bool);

    /// The image currently displayed.
    fn target_image(&self) -> ImageHandle;

    /// Rectangle the image occupies, relative to `container.min`, where
    /// `container` is the transition container's frame in window coordinates.
    ///
    /// With `center_if_offscreen` the screen may scroll first so the image is
    /// visible, and then reports the post-scroll rectangle.
    fn target_frame(&mut self, container: Rect, center_if_offscreen: bool) -> Rect;
}

/// Shared handle to an endpoint screen.
pub type ZoomableRef = Rc<RefCell<dyn ImageZoomable>>;

/// A screen as handed to a transition context.
pub enum Screen {
    /// A screen that implements the capability itself.
    Zoomable(ZoomableRef),
    /// A navigation stack; the top-most child is the participant.
    Navigation(Vec<ZoomableRef>),
    /// A screen that cannot take part in a zoom transition.
    Opaque(&'static str),
}

impl Screen {
    pub fn zoomable<Z: ImageZoomable + 'static>(screen: &Rc<RefCell<Z>>) -> Self {
        let handle: ZoomableRef = screen.clone();
        Screen::Zoomable(handle)
    }

    /// Resolve the participating endpoint, walking one level into a
    /// navigation stack.
    ///
    /// # Panics
    ///
    /// Panics when no endpoint can be resolved. A transition cannot run
    /// without both endpoints, so this is an integration error.
    pub fn resolve_zoomable(&self) -> ZoomableRef {
        match self {
            Screen::Zoomable(handle) => handle.clone(),
            Screen::Navigation(stack) => match stack.last() {
                Some(top) => top.clone(),
                None => panic!("navigation stack is empty; no ImageZoomable screen to transition"),
            },
            Screen::Opaque(name) => {
                panic!("screen `{name}` does not implement ImageZoomable")
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Screen::Zoomable(_) => "zoomable",
            Screen::Navigation(_) => "navigation",
            Screen::Opaque(name) => name,
        }
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Screen::Navigation(stack) => write!(f, "Screen::Navigation(depth {})", stack.len()),
            other => write!(f, "Screen::{}", other.name()),
        }
    }
}
