//! Thumbnail grid screen.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use egui::{pos2, vec2, Color32, Painter, Rect, Sense, Vec2};
use tracing::debug;

use super::data::{DataSource, MockDataSource};
use crate::config::GalleryConfig;
use crate::geometry::aspect_fill_uv;
use crate::transition::{ImageHandle, ImageZoomable};

const BACKGROUND: Color32 = Color32::from_rgb(245, 245, 245);
const PLACEHOLDER: Color32 = Color32::from_rgb(225, 225, 225);

/// Fixed-column flow layout, in content coordinates (origin at the top-left
/// of the scrollable content).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub columns: usize,
    pub section_inset: f32,
    pub item_spacing: f32,
    /// Width / height of a cell
    pub aspect_ratio: f32,
}

impl GridLayout {
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            columns: config.columns.max(1),
            section_inset: config.section_inset,
            item_spacing: config.item_spacing,
            aspect_ratio: config.item_aspect_ratio,
        }
    }

    /// Cell size for a view `view_width` points wide. Widths are floored so
    /// cells land on whole points.
    pub fn item_size(&self, view_width: f32) -> Vec2 {
        let columns = self.columns as f32;
        let available = view_width - 2.0 * self.section_inset - (columns - 1.0) * self.item_spacing;
        let width = (available / columns).floor().max(1.0);
        vec2(width, width / self.aspect_ratio)
    }

    fn row_stride(&self, view_width: f32) -> f32 {
        self.item_size(view_width).y + self.item_spacing
    }

    pub fn cell_rect(&self, index: usize, view_width: f32) -> Rect {
        let size = self.item_size(view_width);
        let row = (index / self.columns) as f32;
        let column = (index % self.columns) as f32;
        let min = pos2(
            self.section_inset + column * (size.x + self.item_spacing),
            self.section_inset + row * (size.y + self.item_spacing),
        );
        Rect::from_min_size(min, size)
    }

    pub fn content_height(&self, count: usize, view_width: f32) -> f32 {
        if count == 0 {
            return 2.0 * self.section_inset;
        }
        let rows = count.div_ceil(self.columns) as f32;
        2.0 * self.section_inset + rows * self.item_size(view_width).y + (rows - 1.0) * self.item_spacing
    }

    /// Indices of cells intersecting the content span `top..bottom`.
    pub fn visible_range(&self, count: usize, view_width: f32, top: f32, bottom: f32) -> Range<usize> {
        let stride = self.row_stride(view_width);
        let first_row = ((top - self.section_inset) / stride).floor().max(0.0) as usize;
        let last_row = ((bottom - self.section_inset) / stride).ceil().max(0.0) as usize;
        let start = (first_row * self.columns).min(count);
        let end = ((last_row + 1) * self.columns).min(count);
        start..end.max(start)
    }
}

/// The grid of thumbnails. Keeps its own scroll offset so the transition can
/// scroll a cell into view before measuring it.
pub struct GridScreen {
    layout: GridLayout,
    data: Rc<RefCell<MockDataSource>>,
    viewport: Rect,
    scroll_offset: f32,
    transitioning: bool,
}

impl GridScreen {
    pub fn new(layout: GridLayout, data: Rc<RefCell<MockDataSource>>) -> Self {
        Self {
            layout,
            data,
            viewport: Rect::NOTHING,
            scroll_offset: 0.0,
            transitioning: false,
        }
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Window rectangle the grid occupies.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll());
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn max_scroll(&self) -> f32 {
        let count = self.data.borrow().number_of_items();
        (self.layout.content_height(count, self.viewport.width()) - self.viewport.height()).max(0.0)
    }

    pub fn scroll_by(&mut self, dy: f32) {
        self.scroll_offset = (self.scroll_offset + dy).clamp(0.0, self.max_scroll());
    }

    /// Cell rectangle in window coordinates at the current scroll offset.
    pub fn cell_screen_rect(&self, index: usize) -> Rect {
        self.layout
            .cell_rect(index, self.viewport.width())
            .translate(self.viewport.min.to_vec2() - vec2(0.0, self.scroll_offset))
    }

    /// Scroll so that cell `index` sits in the middle of the viewport.
    pub fn center_on(&mut self, index: usize) {
        let cell = self.layout.cell_rect(index, self.viewport.width());
        self.scroll_offset = (cell.center().y - 0.5 * self.viewport.height()).clamp(0.0, self.max_scroll());
    }

    pub fn visible_indices(&self) -> Range<usize> {
        let count = self.data.borrow().number_of_items();
        self.layout.visible_range(
            count,
            self.viewport.width(),
            self.scroll_offset,
            self.scroll_offset + self.viewport.height(),
        )
    }

    /// Handle scrolling and clicks, then paint. Returns the tapped item.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<usize> {
        if ui.rect_contains_pointer(self.viewport) {
            let dy = ui.input(|i| i.smooth_scroll_delta.y);
            if dy != 0.0 {
                self.scroll_by(-dy);
            }
        }

        let mut tapped = None;
        for index in self.visible_indices() {
            let rect = self.cell_screen_rect(index).intersect(self.viewport);
            if !rect.is_positive() {
                continue;
            }
            let response = ui.interact(rect, ui.id().with(("grid-cell", index)), Sense::click());
            if response.clicked() {
                tapped = Some(index);
            }
        }

        self.paint(ui.painter(), 1.0);
        if let Some(index) = tapped {
            debug!(index, "grid cell tapped");
        }
        tapped
    }

    /// Paint the grid with opacity `alpha`. The current cell is left empty
    /// while a transition shows its image in the floating proxy.
    pub fn paint(&self, painter: &Painter, alpha: f32) {
        let painter = painter.with_clip_rect(self.viewport);
        painter.rect_filled(self.viewport, 0.0, BACKGROUND.gamma_multiply(alpha));

        let data = self.data.borrow();
        let hidden = self.transitioning.then(|| data.current_index());
        let tint = Color32::WHITE.gamma_multiply(alpha);

        for index in self.visible_indices() {
            let rect = self.cell_screen_rect(index);
            match data.image(index) {
                Some(image) if hidden != Some(index) => {
                    let uv = aspect_fill_uv(image.size, rect.size());
                    painter.image(image.texture, rect, uv, tint);
                }
                _ => {
                    painter.rect_filled(rect, 0.0, PLACEHOLDER.gamma_multiply(alpha));
                }
            }
        }
    }
}

impl ImageZoomable for GridScreen {
    fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    fn set_transitioning(&mut self, transitioning: bool) {
        self.transitioning = transitioning;
    }

    fn target_image(&self) -> ImageHandle {
        self.data.borrow().current_image()
    }

    fn target_frame(&mut self, container: Rect, center_if_offscreen: bool) -> Rect {
        let index = self.data.borrow().current_index();
        let mut rect = self.cell_screen_rect(index);
        if center_if_offscreen && !self.viewport.contains_rect(rect) {
            self.center_on(index);
            rect = self.cell_screen_rect(index);
            debug!(index, scroll = self.scroll_offset, "scrolled grid to bring cell on screen");
        }
        rect.translate(-container.min.to_vec2())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Pos2, TextureId};

    fn layout() -> GridLayout {
        GridLayout {
            columns: 2,
            section_inset: 18.0,
            item_spacing: 10.0,
            aspect_ratio: 4.0 / 3.0,
        }
    }

    fn screen(count: usize) -> GridScreen {
        let images = vec![ImageHandle::new(TextureId::Managed(1), vec2(600.0, 400.0))];
        let data = Rc::new(RefCell::new(MockDataSource::new(images, count)));
        let mut grid = GridScreen::new(layout(), data);
        grid.set_viewport(Rect::from_min_size(Pos2::ZERO, vec2(400.0, 800.0)));
        grid
    }

    #[test]
    fn test_item_size_is_floored() {
        let size = layout().item_size(400.0);
        assert_eq!(size.x, 177.0);
        assert!((size.y - 132.75).abs() < 1e-4);
    }

    #[test]
    fn test_cell_positions() {
        let layout = layout();
        assert_eq!(layout.cell_rect(0, 400.0).min, pos2(18.0, 18.0));
        assert_eq!(layout.cell_rect(1, 400.0).min, pos2(205.0, 18.0));
        let third = layout.cell_rect(2, 400.0);
        assert_eq!(third.min.x, 18.0);
        assert!((third.min.y - (18.0 + 132.75 + 10.0)).abs() < 1e-3);
    }

    #[test]
    fn test_content_height_and_visible_range() {
        let layout = layout();
        let h = layout.content_height(3, 400.0);
        assert!((h - (36.0 + 2.0 * 132.75 + 10.0)).abs() < 1e-3);
        assert_eq!(layout.content_height(0, 400.0), 36.0);

        let range = layout.visible_range(1000, 400.0, 0.0, 300.0);
        assert_eq!(range.start, 0);
        assert!(range.end >= 4 && range.end <= 8);
        assert_eq!(layout.visible_range(3, 400.0, 0.0, 10_000.0), 0..3);
    }

    #[test]
    fn test_target_frame_scrolls_offscreen_cell_to_center() {
        let mut grid = screen(1000);
        grid.data.borrow_mut().set_current_index(40);
        let container = grid.viewport();

        let unscrolled = grid.target_frame(container, false);
        assert!(!container.contains_rect(unscrolled));
        assert_eq!(grid.scroll_offset(), 0.0);

        let frame = grid.target_frame(container, true);
        assert!(container.contains_rect(frame));
        assert!((frame.center().y - container.center().y).abs() < 1e-3);
    }

    #[test]
    fn test_target_frame_keeps_visible_cell() {
        let mut grid = screen(1000);
        grid.data.borrow_mut().set_current_index(1);
        let container = grid.viewport();
        let frame = grid.target_frame(container, true);
        assert_eq!(grid.scroll_offset(), 0.0);
        assert_eq!(frame.min, pos2(205.0, 18.0));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut grid = screen(4);
        grid.scroll_by(10_000.0);
        assert_eq!(grid.scroll_offset(), 0.0);

        let mut grid = screen(1000);
        grid.scroll_by(-50.0);
        assert_eq!(grid.scroll_offset(), 0.0);
        grid.scroll_by(1e9);
        assert_eq!(grid.scroll_offset(), grid.max_scroll());
    }

    #[test]
    fn test_transitioning_cell_paints_placeholder() {
        let mut grid = screen(6);
        grid.set_transitioning(true);

        let ctx = egui::Context::default();
        let output = ctx.run(egui::RawInput::default(), |ctx| {
            let painter = Painter::new(ctx.clone(), egui::LayerId::background(), grid.viewport());
            grid.paint(&painter, 1.0);
        });
        let placeholders = output
            .shapes
            .iter()
            .filter(|clipped| matches!(&clipped.shape, egui::Shape::Rect(rect) if rect.fill == PLACEHOLDER))
            .count();
        assert_eq!(placeholders, 1);
    }
}
