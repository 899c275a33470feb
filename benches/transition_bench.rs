use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use egui::{pos2, vec2, Pos2, Rect, TextureId};
use photo_gallery::geometry::aspect_fit;
use photo_gallery::transition::ZoomableRef;
use photo_gallery::{
    ImageHandle, ImageZoomable, PanEvent, PanPhase, Screen, TransitionContext, TransitionController,
};

const FRAME: Duration = Duration::from_millis(16);

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
        ImageHandle::new(TextureId::Managed(1), vec2(1200.0, 800.0))
    }

    fn target_frame(&mut self, container: Rect, _center_if_offscreen: bool) -> Rect {
        self.frame.translate(-container.min.to_vec2())
    }
}

fn endpoint(frame: Rect) -> Rc<RefCell<Endpoint>> {
    Rc::new(RefCell::new(Endpoint {
        frame,
        transitioning: false,
    }))
}

fn context(from: Screen, to: Screen) -> TransitionContext {
    let frame = Rect::from_min_size(Pos2::ZERO, vec2(390.0, 844.0));
    TransitionContext::new(from, to, frame, Rect::from_min_size(Pos2::ZERO, frame.size()), |outcome| {
        black_box(outcome.success);
    })
}

fn bench_aspect_fit(c: &mut Criterion) {
    let container = Rect::from_min_size(pos2(0.0, 47.0), vec2(390.0, 750.0));
    let sizes = [vec2(1200.0, 800.0), vec2(800.0, 1200.0), vec2(1000.0, 1000.0)];
    c.bench_function("aspect_fit", |b| {
        b.iter(|| {
            for size in sizes {
                black_box(aspect_fit(black_box(size), black_box(container)));
            }
        })
    });
}

fn bench_present_dismiss(c: &mut Criterion) {
    let grid = endpoint(Rect::from_min_size(pos2(18.0, 18.0), vec2(172.0, 129.0)));
    let detail = endpoint(Rect::from_min_size(pos2(0.0, 292.0), vec2(390.0, 260.0)));
    let mut controller = TransitionController::new();

    c.bench_function("present_then_dismiss", |b| {
        b.iter(|| {
            let grid_ref: ZoomableRef = grid.clone();
            controller.present(context(Screen::Navigation(vec![grid_ref]), Screen::zoomable(&detail)));
            while controller.tick(FRAME) {}

            let grid_ref: ZoomableRef = grid.clone();
            controller.dismiss(context(Screen::zoomable(&detail), Screen::Navigation(vec![grid_ref])));
            while controller.tick(FRAME) {}
        })
    });
}

fn bench_interactive_dismissal(c: &mut Criterion) {
    let grid = endpoint(Rect::from_min_size(pos2(18.0, 18.0), vec2(172.0, 129.0)));
    let detail = endpoint(Rect::from_min_size(pos2(0.0, 292.0), vec2(390.0, 260.0)));
    let mut controller = TransitionController::new();
    let origin = pos2(195.0, 422.0);

    c.bench_function("interactive_dismissal", |b| {
        b.iter(|| {
            controller.handle_pan(&PanEvent::new(PanPhase::Began, origin, vec2(0.0, 0.0)));
            let grid_ref: ZoomableRef = grid.clone();
            controller.dismiss(context(Screen::zoomable(&detail), Screen::Navigation(vec![grid_ref])));
            for step in 1..=30 {
                let translation = vec2(0.0, step as f32 * 4.0);
                controller.handle_pan(&PanEvent::new(PanPhase::Changed, origin, translation));
            }
            controller.handle_pan(&PanEvent::new(PanPhase::Ended, origin, vec2(0.0, 120.0)));
            while controller.tick(FRAME) {}
        })
    });
}

criterion_group!(benches, bench_aspect_fit, bench_present_dismiss, bench_interactive_dismissal);
criterion_main!(benches);
