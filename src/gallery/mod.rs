//! The two gallery screens and their data: a thumbnail grid and a paging,
//! zoomable detail view. Both implement `ImageZoomable` so the zoom
//! transition can travel between them.

mod data;
mod detail;
mod grid;

pub use data::{render_mock_photo, DataSource, MockDataSource, MockPhoto, MOCK_PHOTOS};
pub use detail::{DetailEvent, DetailScreen, ZoomState};
pub use grid::{GridLayout, GridScreen};
