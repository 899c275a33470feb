//! Photo gallery with an interactive zoom transition.
//!
//! The transition core lives in [`transition`]; [`gallery`] and [`app`] are
//! the egui host that shows a thumbnail grid and a paging, zoomable detail
//! screen on top of it.

pub mod animation;
pub mod app;
pub mod config;
pub mod gallery;
pub mod geometry;
pub mod input;
pub mod transition;
pub mod ui;

pub use config::Config;
pub use transition::{
    AnimationController, ImageHandle, ImageZoomable, InteractionController, PanEvent, PanPhase, Screen,
    TransitionContext, TransitionController, TransitionDirection, TransitionOutcome,
};
