//! Full-screen detail screen: one image per page, horizontal paging,
//! pinch and double-click zoom, tap-toggled toolbars, and vertical drags that the host
//! turns into an interactive dismissal.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use egui::{pos2, vec2, Color32, Key, Painter, Pos2, Rect, Sense, Vec2};
use tracing::debug;

use super::data::{DataSource, MockDataSource};
use crate::animation::{EasingFunction, Tween};
use crate::config::GalleryConfig;
use crate::geometry::aspect_fit;
use crate::input::{DragAxis, DragTracker, Tap, TapRecognizer};
use crate::transition::{ImageHandle, ImageZoomable, PanEvent, PanPhase};
use crate::ui::{ToolbarButton, ToolbarOverlay};

/// Gap between neighbouring pages while paging.
const INTER_PAGE_SPACING: f32 = 10.0;

/// Fraction of the page width a horizontal drag must cover to turn the page.
const PAGE_TURN_FRACTION: f32 = 0.25;

/// Rubber-band factor for dragging past the first or last page.
const EDGE_RESISTANCE: f32 = 0.3;

const PAGE_SETTLE_DURATION: Duration = Duration::from_millis(220);
const ZOOM_DURATION: Duration = Duration::from_millis(250);

const FULL_UV: Rect = Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0));

/// What the detail screen asks of its host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetailEvent {
    /// A vertical drag on an unzoomed page, to drive a dismissal.
    Pan(PanEvent),
    /// The close button was pressed.
    Close,
    /// The current item changed to this index.
    PageChanged(usize),
}

/// Zoom of the current page. Scale 1.0 is aspect-fit; the maximum shows the
/// image at its natural size.
#[derive(Debug, Clone)]
pub struct ZoomState {
    scale: f32,
    max_scale: f32,
    animation: Option<Tween<f32>>,
}

impl ZoomState {
    pub fn new(image_size: Vec2, bounds: Vec2) -> Self {
        let max_scale = if bounds.x > 0.0 && bounds.y > 0.0 {
            (image_size.x / bounds.x).max(image_size.y / bounds.y)
        } else {
            1.0
        };
        Self {
            scale: 1.0,
            max_scale: max_scale.max(1.0),
            animation: None,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn max_scale(&self) -> f32 {
        self.max_scale
    }

    /// Zoomed in, or on the way there.
    pub fn is_zoomed(&self) -> bool {
        let target = self.animation.as_ref().map_or(self.scale, |a| *a.to());
        target > 1.0
    }

    /// Double-click behavior: from fit zoom all the way in, otherwise back to fit.
    pub fn toggle(&mut self) {
        let target = if self.is_zoomed() { 1.0 } else { self.max_scale };
        self.animation = Some(Tween::new(self.scale, target, ZOOM_DURATION, EasingFunction::EaseInOut));
    }

    /// Multiply the scale by `factor`, clamped to `[1, max_scale]`, and stop
    /// any running zoom animation. Returns the ratio actually applied.
    pub fn zoom_by(&mut self, factor: f32) -> f32 {
        self.animation = None;
        let before = self.scale;
        self.scale = (self.scale * factor).clamp(1.0, self.max_scale);
        self.scale / before
    }

    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        animation.advance(dt);
        self.scale = animation.value();
        if animation.is_finished() {
            self.animation = None;
            return false;
        }
        true
    }
}

/// How the drag in progress is being used, fixed when it begins.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DragMode {
    /// Scroll the zoomed image from `origin`.
    Scroll { origin: Vec2 },
    /// Forwarded to the host as pan events.
    Dismiss,
    /// Slide between pages.
    Page,
}

/// A page slide running to rest, turning to `target` when it lands.
struct PageSettle {
    tween: Tween<f32>,
    target: Option<usize>,
}

pub struct DetailScreen {
    data: Rc<RefCell<MockDataSource>>,
    viewport: Rect,
    background: Color32,
    zoom: ZoomState,
    scroll: Vec2,
    page_offset: f32,
    page_settle: Option<PageSettle>,
    toolbars: ToolbarOverlay,
    taps: TapRecognizer,
    drag: DragTracker,
    drag_mode: Option<DragMode>,
    transitioning: bool,
    toolbars_hidden_before_transition: bool,
    events: Vec<DetailEvent>,
}

impl DetailScreen {
    pub fn new(data: Rc<RefCell<MockDataSource>>, config: &GalleryConfig) -> Self {
        let [r, g, b] = config.background_rgb;
        Self {
            data,
            viewport: Rect::NOTHING,
            background: Color32::from_rgb(r, g, b),
            zoom: ZoomState::new(Vec2::ZERO, Vec2::ZERO),
            scroll: Vec2::ZERO,
            page_offset: 0.0,
            page_settle: None,
            toolbars: ToolbarOverlay::new(config.toolbar_fade()),
            taps: TapRecognizer::new(),
            drag: DragTracker::new(),
            drag_mode: None,
            transitioning: false,
            toolbars_hidden_before_transition: false,
            events: Vec::new(),
        }
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.toolbars.update_layout(viewport);
            self.reset_page();
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn toolbars_hidden(&self) -> bool {
        self.toolbars.is_hidden()
    }

    pub fn set_toolbars_hidden(&mut self, hidden: bool, animated: bool) {
        self.toolbars.set_hidden(hidden, animated);
    }

    /// Show the current item at fit zoom, dropping any zoom, scroll or page
    /// slide left over from earlier.
    pub fn reset_page(&mut self) {
        let image = self.data.borrow().current_image();
        self.zoom = ZoomState::new(image.size, self.viewport.size());
        self.scroll = Vec2::ZERO;
        self.page_offset = 0.0;
        self.page_settle = None;
    }

    /// Where the current image is drawn, in window coordinates, ignoring any
    /// page slide.
    pub fn image_frame(&self) -> Rect {
        let image = self.data.borrow().current_image();
        let fit = aspect_fit(image.size, self.viewport);
        Rect::from_center_size(fit.center() + self.scroll, fit.size() * self.zoom.scale())
    }

    /// Advance zoom, page and toolbar animations.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let zooming = self.zoom.tick(dt);
        if !zooming && !self.zoom.is_zoomed() {
            self.scroll = Vec2::ZERO;
        } else {
            self.scroll = self.clamp_scroll(self.scroll);
        }
        let fading = self.toolbars.tick(dt);
        let paging = self.tick_page(dt);
        zooming || fading || paging
    }

    fn tick_page(&mut self, dt: Duration) -> bool {
        let Some(settle) = self.page_settle.as_mut() else {
            return false;
        };
        settle.tween.advance(dt);
        self.page_offset = settle.tween.value();
        if !settle.tween.is_finished() {
            return true;
        }
        let target = settle.target;
        self.page_settle = None;
        self.page_offset = 0.0;
        if let Some(index) = target {
            self.go_to(index);
        }
        false
    }

    fn go_to(&mut self, index: usize) {
        self.data.borrow_mut().set_current_index(index);
        self.reset_page();
        debug!(index, "detail page changed");
        self.events.push(DetailEvent::PageChanged(index));
    }

    fn neighbour(&self, forward: bool) -> Option<usize> {
        let data = self.data.borrow();
        let index = data.current_index();
        let next = if forward { index.checked_add(1)? } else { index.checked_sub(1)? };
        data.image(next).map(|_| next)
    }

    /// Process this frame's pointer input and return what the host must act
    /// on. Taps are ignored while a transition is running; drags are not, so
    /// an interactive dismissal keeps receiving its pan events.
    pub fn handle_input(&mut self, ui: &mut egui::Ui) -> Vec<DetailEvent> {
        let response = ui.interact(self.viewport, ui.id().with("detail-page"), Sense::click_and_drag());
        let (now, velocity, press_origin) = ui.input(|i| (i.time, i.pointer.velocity(), i.pointer.press_origin()));

        if !self.transitioning {
            let mut click = response.clicked().then(|| response.interact_pointer_pos()).flatten();
            if let Some(pos) = click {
                if let Some(button) = self.toolbars.button_at(pos) {
                    self.press(button);
                    click = None;
                } else if self.toolbars.contains(pos) {
                    // Bare bar area swallows the click.
                    click = None;
                }
            }
            match self.taps.update(click, now) {
                Some(Tap::Single) => self.toolbars.set_hidden(!self.toolbars.is_hidden(), true),
                Some(Tap::Double) => self.zoom.toggle(),
                None => {}
            }

            let (zoom_delta, hover) = ui.input(|i| (i.zoom_delta(), i.pointer.hover_pos()));
            if zoom_delta != 1.0 {
                let anchor = hover.filter(|pos| self.viewport.contains(*pos));
                self.zoom_at(zoom_delta, anchor.unwrap_or(self.viewport.center()));
            }

            let (left, right) = ui.input(|i| (i.key_pressed(Key::ArrowLeft), i.key_pressed(Key::ArrowRight)));
            if left {
                self.press(ToolbarButton::Previous);
            }
            if right {
                self.press(ToolbarButton::Next);
            }
        }

        if let Some((axis, event)) = self.drag.update(&response, press_origin, self.viewport.center(), velocity) {
            self.route_drag(axis, event);
        }

        std::mem::take(&mut self.events)
    }

    /// Zoom continuously by `factor`, keeping the image point under `anchor`
    /// where it is. The scale stays within `[1, max_scale]`.
    pub fn zoom_at(&mut self, factor: f32, anchor: Pos2) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let frame = self.image_frame();
        let applied = self.zoom.zoom_by(factor);
        let image = self.data.borrow().current_image();
        let fit_center = aspect_fit(image.size, self.viewport).center();
        let center = anchor - (anchor - frame.center()) * applied;
        self.scroll = self.clamp_scroll(center - fit_center);
    }

    /// Apply a toolbar button press.
    pub fn press(&mut self, button: ToolbarButton) {
        match button {
            ToolbarButton::Close => self.events.push(DetailEvent::Close),
            ToolbarButton::Previous | ToolbarButton::Next => {
                if let Some(index) = self.neighbour(button == ToolbarButton::Next) {
                    self.go_to(index);
                }
            }
        }
    }

    /// Route one drag event by the mode chosen when the drag began.
    pub fn route_drag(&mut self, axis: DragAxis, event: PanEvent) {
        if event.phase == PanPhase::Began {
            self.drag_mode = Some(if self.zoom.is_zoomed() {
                DragMode::Scroll {
                    origin: self.scroll,
                }
            } else if axis == DragAxis::Vertical || self.transitioning {
                DragMode::Dismiss
            } else {
                self.page_settle = None;
                DragMode::Page
            });
        }

        let Some(mode) = self.drag_mode else {
            return;
        };
        let finished = matches!(event.phase, PanPhase::Ended | PanPhase::Cancelled);
        match mode {
            DragMode::Dismiss => self.events.push(DetailEvent::Pan(event)),
            DragMode::Scroll { origin } => {
                self.scroll = self.clamp_scroll(origin + event.translation);
            }
            DragMode::Page => {
                if finished {
                    self.settle_page(event.translation.x, event.phase == PanPhase::Ended);
                } else {
                    self.page_offset = self.resist(event.translation.x);
                }
            }
        }
        if finished {
            self.drag_mode = None;
        }
    }

    fn resist(&self, dx: f32) -> f32 {
        if self.neighbour(dx < 0.0).is_some() {
            dx
        } else {
            dx * EDGE_RESISTANCE
        }
    }

    fn settle_page(&mut self, dx: f32, released: bool) {
        let stride = self.viewport.width() + INTER_PAGE_SPACING;
        let forward = dx < 0.0;
        let turn = released && dx.abs() >= PAGE_TURN_FRACTION * self.viewport.width();
        let target = if turn { self.neighbour(forward) } else { None };
        let end = match target {
            Some(_) if forward => -stride,
            Some(_) => stride,
            None => 0.0,
        };
        self.page_settle = Some(PageSettle {
            tween: Tween::new(self.page_offset, end, PAGE_SETTLE_DURATION, EasingFunction::EaseOut),
            target,
        });
    }

    fn clamp_scroll(&self, scroll: Vec2) -> Vec2 {
        let image = self.data.borrow().current_image();
        let size = aspect_fit(image.size, self.viewport).size() * self.zoom.scale();
        let limit = ((size - self.viewport.size()) * 0.5).max(Vec2::ZERO);
        vec2(scroll.x.clamp(-limit.x, limit.x), scroll.y.clamp(-limit.y, limit.y))
    }

    pub fn page_offset(&self) -> f32 {
        self.page_offset
    }

    /// Paint the detail screen with opacity `alpha`. The page itself is left
    /// out while a transition draws the image in the floating proxy.
    pub fn paint(&self, painter: &Painter, alpha: f32) {
        let painter = painter.with_clip_rect(self.viewport);
        painter.rect_filled(self.viewport, 0.0, self.background.gamma_multiply(alpha));

        let data = self.data.borrow();
        let index = data.current_index();
        if !self.transitioning {
            let tint = Color32::WHITE.gamma_multiply(alpha);
            let paint_page = |image: ImageHandle, rect: Rect| {
                painter.image(image.texture, rect, FULL_UV, tint);
            };

            let slide = vec2(self.page_offset, 0.0);
            paint_page(data.current_image(), self.image_frame().translate(slide));

            let stride = vec2(self.viewport.width() + INTER_PAGE_SPACING, 0.0);
            if self.page_offset < 0.0 {
                if let Some(next) = index.checked_add(1).and_then(|i| data.image(i)) {
                    paint_page(next, aspect_fit(next.size, self.viewport).translate(slide + stride));
                }
            } else if self.page_offset > 0.0 {
                if let Some(prev) = index.checked_sub(1).and_then(|i| data.image(i)) {
                    paint_page(prev, aspect_fit(prev.size, self.viewport).translate(slide - stride));
                }
            }
        }

        let caption = format!("{} / {}", index + 1, data.number_of_items());
        self.toolbars.paint(&painter, &caption, alpha);
    }
}

impl ImageZoomable for DetailScreen {
    fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    /// Hides the page and fades the toolbars out, remembering whether they
    /// were already hidden so that state comes back afterwards.
    fn set_transitioning(&mut self, transitioning: bool) {
        if transitioning == self.transitioning {
            return;
        }
        self.transitioning = transitioning;
        if transitioning {
            self.toolbars_hidden_before_transition = self.toolbars.is_hidden();
            self.toolbars.set_hidden(true, true);
        } else {
            self.toolbars.set_hidden(self.toolbars_hidden_before_transition, true);
        }
    }

    fn target_image(&self) -> ImageHandle {
        self.data.borrow().current_image()
    }

    fn target_frame(&mut self, container: Rect, _center_if_offscreen: bool) -> Rect {
        self.image_frame().translate(-container.min.to_vec2())
    }
}
