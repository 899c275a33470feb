//! Main application module
//!
//! Hosts the grid and detail screens in one eframe window, builds a
//! transition context for every present/dismiss, drives the transition
//! controller from the egui frame clock and draws its container while a run
//! is live.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::{vec2, Color32, Painter, Pos2, Rect};
use tracing::{debug, info};

use crate::config::Config;
use crate::gallery::{render_mock_photo, DataSource, DetailEvent, DetailScreen, GridLayout, GridScreen, MockDataSource, MOCK_PHOTOS};
use crate::geometry::aspect_fill_uv;
use crate::transition::{
    Container, ImageHandle, PanPhase, Screen, TransitionContext, TransitionController, TransitionDirection, ViewKey,
    ZoomableRef,
};

/// Longest frame step fed to the animations.
const MAX_FRAME_STEP: f32 = 0.033;

/// Reported by a transition's completion once its run is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionFinished {
    pub direction: TransitionDirection,
    pub success: bool,
    pub cancelled: bool,
}

impl TransitionFinished {
    /// Whether the detail screen is on top after this run.
    pub fn detail_presented(&self, before: bool) -> bool {
        if !self.success {
            return before;
        }
        self.direction == TransitionDirection::Presenting
    }
}

/// Application state
pub struct GalleryApp {
    config: Config,
    transitions: TransitionController,
    data: Rc<RefCell<MockDataSource>>,
    grid: Rc<RefCell<GridScreen>>,
    detail: Rc<RefCell<DetailScreen>>,
    finished_tx: Sender<TransitionFinished>,
    finished_rx: Receiver<TransitionFinished>,
    /// Detail screen is the visible screen
    presented: bool,
    /// Direction of the run being drawn, if any
    scene_direction: Option<TransitionDirection>,
    /// Keeps the mock photo textures alive
    _textures: Vec<egui::TextureHandle>,
}

impl GalleryApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = Color32::from_rgb(245, 245, 245);
        cc.egui_ctx.set_visuals(visuals);

        let textures: Vec<egui::TextureHandle> = MOCK_PHOTOS
            .iter()
            .map(|photo| {
                let pixels = render_mock_photo(photo);
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [photo.width as usize, photo.height as usize],
                    pixels.as_raw(),
                );
                cc.egui_ctx.load_texture(photo.name, image, egui::TextureOptions::LINEAR)
            })
            .collect();
        let images = textures
            .iter()
            .zip(MOCK_PHOTOS.iter())
            .map(|(texture, photo)| ImageHandle::new(texture.id(), vec2(photo.width as f32, photo.height as f32)))
            .collect();
        info!(photos = textures.len(), items = config.gallery.item_count, "gallery ready");

        let data = Rc::new(RefCell::new(MockDataSource::new(images, config.gallery.item_count)));
        let grid = GridScreen::new(GridLayout::from_config(&config.gallery), data.clone());
        let detail = DetailScreen::new(data.clone(), &config.gallery);
        let (finished_tx, finished_rx) = crossbeam_channel::unbounded();

        Self {
            transitions: TransitionController::with_config(&config.transition),
            config,
            data,
            grid: Rc::new(RefCell::new(grid)),
            detail: Rc::new(RefCell::new(detail)),
            finished_tx,
            finished_rx,
            presented: false,
            scene_direction: None,
            _textures: textures,
        }
    }

    /// Build the context for a run in `direction` inside `frame`.
    fn make_context(&self, direction: TransitionDirection, frame: Rect) -> TransitionContext {
        let grid: ZoomableRef = self.grid.clone();
        let (from, to) = match direction {
            TransitionDirection::Presenting => (Screen::Navigation(vec![grid]), Screen::zoomable(&self.detail)),
            TransitionDirection::Dismissing => (Screen::zoomable(&self.detail), Screen::Navigation(vec![grid])),
        };
        let final_frame = Rect::from_min_size(Pos2::ZERO, frame.size());
        let tx = self.finished_tx.clone();
        TransitionContext::new(from, to, frame, final_frame, move |outcome| {
            let _ = tx.send(TransitionFinished {
                direction,
                success: outcome.success,
                cancelled: outcome.cancelled,
            });
        })
    }

    fn present(&mut self, index: usize, frame: Rect) {
        self.data.borrow_mut().set_current_index(index);
        self.detail.borrow_mut().reset_page();
        info!(index, "presenting detail");
        self.scene_direction = Some(TransitionDirection::Presenting);
        let context = self.make_context(TransitionDirection::Presenting, frame);
        self.transitions.present(context);
    }

    fn dismiss(&mut self, frame: Rect) {
        info!(interactive = self.transitions.is_panning(), "dismissing detail");
        self.scene_direction = Some(TransitionDirection::Dismissing);
        let context = self.make_context(TransitionDirection::Dismissing, frame);
        self.transitions.dismiss(context);
    }

    fn drain_finished(&mut self) {
        while let Ok(finished) = self.finished_rx.try_recv() {
            debug!(?finished, "transition finished");
            self.presented = finished.detail_presented(self.presented);
            self.scene_direction = None;
        }
    }

    fn handle_detail_event(&mut self, event: DetailEvent, frame: Rect) {
        match event {
            DetailEvent::Pan(pan) => {
                self.transitions.handle_pan(&pan);
                // A new drag can fast-forward a snap-back; settle that run
                // before the dismissal below starts the next one.
                self.drain_finished();
                if pan.phase == PanPhase::Began && self.transitions.is_panning() {
                    self.dismiss(frame);
                }
            }
            DetailEvent::Close => {
                if self.transitions.is_idle() {
                    self.dismiss(frame);
                }
            }
            DetailEvent::PageChanged(index) => debug!(index, "page changed"),
        }
    }

    fn paint_scene(&self, painter: &Painter) -> bool {
        let Some(direction) = self.scene_direction else {
            return false;
        };
        let grid = &self.grid;
        let detail = &self.detail;
        self.transitions
            .with_scene(|container| paint_container(painter, container, direction, grid, detail))
            .is_some()
    }
}

/// Draw the container: root views back to front, then the floating proxy.
fn paint_container(
    painter: &Painter,
    container: &Container,
    direction: TransitionDirection,
    grid: &Rc<RefCell<GridScreen>>,
    detail: &Rc<RefCell<DetailScreen>>,
) {
    for (key, view) in container.views() {
        let shows_grid = matches!(
            (direction, key),
            (TransitionDirection::Presenting, ViewKey::From) | (TransitionDirection::Dismissing, ViewKey::To)
        );
        if shows_grid {
            grid.borrow().paint(painter, view.alpha);
        } else {
            detail.borrow().paint(painter, view.alpha);
        }
    }

    if let Some(proxy) = container.proxy() {
        let rect = proxy.frame.translate(container.frame().min.to_vec2());
        let uv = aspect_fill_uv(proxy.image.size, rect.size());
        painter.with_clip_rect(container.frame()).image(proxy.image.texture, rect, uv, Color32::WHITE);
    }
}

impl eframe::App for GalleryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = Duration::from_secs_f32(ctx.input(|i| i.stable_dt).min(MAX_FRAME_STEP));
        let mut animating = self.transitions.tick(dt);
        self.drain_finished();

        egui::CentralPanel::default().frame(egui::Frame::none()).show(ctx, |ui| {
            let frame = ui.max_rect();
            self.grid.borrow_mut().set_viewport(frame);
            self.detail.borrow_mut().set_viewport(frame);
            animating |= self.detail.borrow_mut().tick(dt);

            if self.presented {
                let mut events = self.detail.borrow_mut().handle_input(ui);
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    events.push(DetailEvent::Close);
                }
                for event in events {
                    self.handle_detail_event(event, frame);
                }
            }

            if !self.paint_scene(ui.painter()) {
                if self.presented {
                    self.detail.borrow().paint(ui.painter(), 1.0);
                } else {
                    let tapped = self.grid.borrow_mut().show(ui);
                    if let Some(index) = tapped.filter(|_| self.transitions.is_idle()) {
                        self.present(index, frame);
                    }
                }
            }
        });

        if animating || !self.transitions.is_idle() {
            ctx.request_repaint();
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b] = self.config.gallery.background_rgb;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }
}
