//! Geometry helpers shared by the transition core and the gallery screens.
//!
//! All quantities are `egui` points. Degenerate inputs (zero or non-finite
//! sizes) never panic: the helpers fall back to the container unchanged so
//! that animation code always receives a usable rectangle.

use egui::{pos2, vec2, Pos2, Rect, Vec2};

/// Relative difference below which two aspect ratios count as equal.
const RATIO_EPSILON: f32 = 1e-4;

/// Scale `image_size` to fit inside `container`, preserving aspect ratio,
/// and center the result.
///
/// Returns `container` unchanged when either size is empty or not finite.
pub fn aspect_fit(image_size: Vec2, container: Rect) -> Rect {
    if !is_usable(image_size) || !is_usable(container.size()) {
        return container;
    }

    // A container that already has the image's shape is its own fit. Without
    // this, rounding can flip a second fit onto the other axis.
    let image_ratio = image_size.x / image_size.y;
    let container_ratio = container.width() / container.height();
    if ((container_ratio - image_ratio) / image_ratio).abs() <= RATIO_EPSILON {
        return container;
    }

    let mut width = container.width();
    let mut height = width * (image_size.y / image_size.x);

    if height > container.height() {
        height = container.height();
        width = height * (image_size.x / image_size.y);
    }

    Rect::from_center_size(container.center(), vec2(width, height))
}

/// Texture coordinates that crop an image of `image_size` so it fills a
/// target of `target_size` (aspect-fill, centered).
///
/// Returns the full `[0, 1]` range for degenerate sizes.
pub fn aspect_fill_uv(image_size: Vec2, target_size: Vec2) -> Rect {
    let full = Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0));
    if !is_usable(image_size) || !is_usable(target_size) {
        return full;
    }

    let image_aspect = image_size.x / image_size.y;
    let target_aspect = target_size.x / target_size.y;

    if image_aspect > target_aspect {
        let inset = 0.5 * (1.0 - target_aspect / image_aspect);
        Rect::from_min_max(pos2(inset, 0.0), pos2(1.0 - inset, 1.0))
    } else {
        let inset = 0.5 * (1.0 - image_aspect / target_aspect);
        Rect::from_min_max(pos2(0.0, inset), pos2(1.0, 1.0 - inset))
    }
}

/// Euclidean distance between two points.
pub fn distance(p1: Pos2, p2: Pos2) -> f32 {
    (p2 - p1).length()
}

/// Move `rect` so its center lands on `center`, keeping its size.
pub fn with_center(rect: Rect, center: Pos2) -> Rect {
    Rect::from_center_size(center, rect.size())
}

fn is_usable(size: Vec2) -> bool {
    size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn approx_rect(a: Rect, b: Rect) -> bool {
        approx_eq(a.min.x, b.min.x)
            && approx_eq(a.min.y, b.min.y)
            && approx_eq(a.max.x, b.max.x)
            && approx_eq(a.max.y, b.max.y)
    }

    #[test]
    fn test_landscape_into_square() {
        let container = Rect::from_min_size(Pos2::ZERO, vec2(300.0, 300.0));
        let fit = aspect_fit(vec2(1200.0, 800.0), container);
        assert!(approx_eq(fit.width(), 300.0));
        assert!(approx_eq(fit.height(), 200.0));
        assert!(approx_eq(fit.min.x, 0.0));
        assert!(approx_eq(fit.min.y, 50.0));
    }

    #[test]
    fn test_portrait_into_wide() {
        let container = Rect::from_min_size(pos2(10.0, 20.0), vec2(400.0, 200.0));
        let fit = aspect_fit(vec2(100.0, 200.0), container);
        assert!(approx_eq(fit.height(), 200.0));
        assert!(approx_eq(fit.width(), 100.0));
        assert!(approx_eq(fit.center().x, container.center().x));
        assert!(approx_eq(fit.min.y, 20.0));
    }

    #[test]
    fn test_fit_is_idempotent_and_contained() {
        let container = Rect::from_min_size(pos2(-40.0, 7.5), vec2(333.0, 517.0));
        for size in [vec2(1200.0, 800.0), vec2(3.0, 7.0), vec2(1.0, 1.0), vec2(4000.0, 10.0)] {
            let once = aspect_fit(size, container);
            let twice = aspect_fit(size, once);
            assert!(approx_rect(once, twice), "{size:?}: {once:?} vs {twice:?}");
            assert!(container.expand(1e-3).contains_rect(once));
            let ratio = once.width() / once.height();
            assert!((ratio - size.x / size.y).abs() / (size.x / size.y) < 1e-3);
        }
    }

    #[test]
    fn test_refit_of_thin_strip_is_stable() {
        let container = Rect::from_min_size(pos2(12.0, -40.0), vec2(390.0, 844.0));
        let image = vec2(3000.0, 10.0);
        let fit = aspect_fit(image, container);
        assert_eq!(aspect_fit(image, fit), fit);
    }

    #[test]
    fn test_degenerate_sizes_return_container() {
        let container = Rect::from_min_size(pos2(5.0, 5.0), vec2(100.0, 50.0));
        assert_eq!(aspect_fit(vec2(0.0, 10.0), container), container);
        assert_eq!(aspect_fit(vec2(10.0, 0.0), container), container);
        assert_eq!(aspect_fit(vec2(f32::NAN, 10.0), container), container);

        let empty = Rect::from_min_size(pos2(5.0, 5.0), Vec2::ZERO);
        assert_eq!(aspect_fit(vec2(10.0, 10.0), empty), empty);
    }

    #[test]
    fn test_fill_uv_crops_long_axis() {
        let uv = aspect_fill_uv(vec2(200.0, 100.0), vec2(100.0, 100.0));
        assert!(approx_eq(uv.min.x, 0.25));
        assert!(approx_eq(uv.max.x, 0.75));
        assert!(approx_eq(uv.min.y, 0.0));
        assert!(approx_eq(uv.max.y, 1.0));

        let uv = aspect_fill_uv(vec2(100.0, 400.0), vec2(100.0, 100.0));
        assert!(approx_eq(uv.min.y, 0.375));
        assert!(approx_eq(uv.max.y, 0.625));

        let full = aspect_fill_uv(Vec2::ZERO, vec2(10.0, 10.0));
        assert_eq!(full, Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0)));
    }

    #[test]
    fn test_distance() {
        assert!(approx_eq(distance(pos2(0.0, 0.0), pos2(3.0, 4.0)), 5.0));
        assert!(approx_eq(distance(pos2(100.0, 100.0), pos2(100.0, 130.0)), 30.0));
        assert_eq!(distance(pos2(1.0, 1.0), pos2(1.0, 1.0)), 0.0);
    }
}
