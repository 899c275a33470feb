//! UI overlay module
//!
//! The detail screen's navigation bar and toolbar: layout, hit testing,
//! the fade used to show and hide them, and painting.

use std::time::Duration;

use egui::{pos2, vec2, Align2, Color32, FontId, Painter, Pos2, Rect};

use crate::animation::{EasingFunction, Tween};

const BAR_HEIGHT: f32 = 44.0;
const BUTTON_WIDTH: f32 = 64.0;

/// Toolbar button type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarButton {
    Close,
    Previous,
    Next,
}

/// Navigation bar on top, toolbar at the bottom.
pub struct ToolbarOverlay {
    /// Target visibility; the fade may still be running
    hidden: bool,
    opacity: f32,
    fade: Option<Tween<f32>>,
    fade_duration: Duration,
    top_bar: Rect,
    bottom_bar: Rect,
    buttons: [(ToolbarButton, Rect); 3],
}

impl ToolbarOverlay {
    pub fn new(fade_duration: Duration) -> Self {
        Self {
            hidden: false,
            opacity: 1.0,
            fade: None,
            fade_duration,
            top_bar: Rect::NOTHING,
            bottom_bar: Rect::NOTHING,
            buttons: [
                (ToolbarButton::Close, Rect::NOTHING),
                (ToolbarButton::Previous, Rect::NOTHING),
                (ToolbarButton::Next, Rect::NOTHING),
            ],
        }
    }

    /// Update bar and button positions for the screen rectangle.
    pub fn update_layout(&mut self, screen: Rect) {
        self.top_bar = Rect::from_min_size(screen.min, vec2(screen.width(), BAR_HEIGHT));
        self.bottom_bar = Rect::from_min_size(
            pos2(screen.min.x, screen.max.y - BAR_HEIGHT),
            vec2(screen.width(), BAR_HEIGHT),
        );

        let button = |min: Pos2| Rect::from_min_size(min, vec2(BUTTON_WIDTH, BAR_HEIGHT));
        self.buttons = [
            (ToolbarButton::Close, button(self.top_bar.min)),
            (ToolbarButton::Previous, button(self.bottom_bar.min)),
            (
                ToolbarButton::Next,
                button(pos2(self.bottom_bar.max.x - BUTTON_WIDTH, self.bottom_bar.min.y)),
            ),
        ];
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Show or hide the bars, fading over the configured duration when
    /// `animated`.
    pub fn set_hidden(&mut self, hidden: bool, animated: bool) {
        self.hidden = hidden;
        let target = if hidden { 0.0 } else { 1.0 };
        if animated {
            self.fade = Some(Tween::new(self.opacity, target, self.fade_duration, EasingFunction::Linear));
        } else {
            self.fade = None;
            self.opacity = target;
        }
    }

    /// Advance the fade. Returns whether it is still running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(fade) = self.fade.as_mut() else {
            return false;
        };
        fade.advance(dt);
        self.opacity = fade.value();
        if fade.is_finished() {
            self.fade = None;
            return false;
        }
        true
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Which button sits under `pos`, if the bars are showing.
    pub fn button_at(&self, pos: Pos2) -> Option<ToolbarButton> {
        if self.hidden {
            return None;
        }
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(button, _)| *button)
    }

    /// Whether `pos` is over either bar while they are showing.
    pub fn contains(&self, pos: Pos2) -> bool {
        !self.hidden && (self.top_bar.contains(pos) || self.bottom_bar.contains(pos))
    }

    /// Paint the bars, multiplied by `alpha`. `caption` is centered in the toolbar.
    pub fn paint(&self, painter: &Painter, caption: &str, alpha: f32) {
        let alpha = self.opacity * alpha;
        if alpha <= 0.0 {
            return;
        }

        let bar = Color32::from_black_alpha(170).gamma_multiply(alpha);
        let text = Color32::WHITE.gamma_multiply(alpha);
        let font = FontId::proportional(16.0);

        painter.rect_filled(self.top_bar, 0.0, bar);
        painter.rect_filled(self.bottom_bar, 0.0, bar);

        for (button, rect) in &self.buttons {
            let label = match button {
                ToolbarButton::Close => "Close",
                ToolbarButton::Previous => "‹",
                ToolbarButton::Next => "›",
            };
            painter.text(rect.center(), Align2::CENTER_CENTER, label, font.clone(), text);
        }
        painter.text(self.bottom_bar.center(), Align2::CENTER_CENTER, caption, font, text);
    }
}
