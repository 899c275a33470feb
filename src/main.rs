//! Photo gallery with an interactive zoom transition
//! Built with Rust + egui (eframe)

use eframe::egui;
use photo_gallery::app::GalleryApp;
use photo_gallery::Config;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "mimalloc-allocator")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("photo_gallery=info")))
        .init();

    let config = Config::load();
    tracing::debug!(?config, "configuration loaded");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Photo Gallery")
            .with_min_inner_size([240.0, 320.0])
            .with_inner_size([420.0, 760.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Photo Gallery",
        options,
        Box::new(move |cc| Ok(Box::new(GalleryApp::new(cc, config)))),
    )
}
