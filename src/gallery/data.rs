//! Gallery data: a fixed number of items, each showing one of a few mock
//! photos chosen deterministically from its index.

use image::{Rgba, RgbaImage};

use crate::transition::ImageHandle;

/// Source of gallery images plus the shared "current item" selection.
pub trait DataSource {
    fn current_index(&self) -> usize;
    fn set_current_index(&mut self, index: usize);
    fn number_of_items(&self) -> usize;
    /// `None` outside `0..number_of_items()`.
    fn image(&self, index: usize) -> Option<ImageHandle>;

    /// Image of the current item, or a placeholder when there is none.
    fn current_image(&self) -> ImageHandle {
        self.image(self.current_index()).unwrap_or_else(ImageHandle::placeholder)
    }
}

/// Parameters of a procedurally drawn mock photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockPhoto {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    pub sky: [u8; 3],
    pub ground: [u8; 3],
    pub sun: [u8; 3],
}

/// Landscape, portrait and square, so aspect-fit and aspect-fill both show.
pub const MOCK_PHOTOS: [MockPhoto; 3] = [
    MockPhoto {
        name: "dusk",
        width: 600,
        height: 400,
        sky: [38, 52, 110],
        ground: [236, 128, 74],
        sun: [255, 220, 150],
    },
    MockPhoto {
        name: "forest",
        width: 400,
        height: 600,
        sky: [150, 200, 220],
        ground: [30, 90, 50],
        sun: [255, 250, 230],
    },
    MockPhoto {
        name: "harbor",
        width: 480,
        height: 480,
        sky: [200, 225, 240],
        ground: [20, 70, 120],
        sun: [255, 245, 200],
    },
];

/// Draw a mock photo: vertical sky-to-ground gradient, a horizon and a sun.
pub fn render_mock_photo(photo: &MockPhoto) -> RgbaImage {
    let (w, h) = (photo.width, photo.height);
    let horizon = h as f32 * 0.62;
    let sun_center = (w as f32 * 0.7, h as f32 * 0.35);
    let sun_radius = w.min(h) as f32 * 0.09;

    RgbaImage::from_fn(w, h, |x, y| {
        let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
        let dx = fx - sun_center.0;
        let dy = fy - sun_center.1;
        if dx * dx + dy * dy <= sun_radius * sun_radius {
            let [r, g, b] = photo.sun;
            return Rgba([r, g, b, 255]);
        }

        let t = if fy < horizon {
            0.6 * fy / horizon
        } else {
            0.6 + 0.4 * (fy - horizon) / (h as f32 - horizon)
        };
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba([
            mix(photo.sky[0], photo.ground[0]),
            mix(photo.sky[1], photo.ground[1]),
            mix(photo.sky[2], photo.ground[2]),
            255,
        ])
    })
}

/// Maps each of `count` items to one of `images`.
pub struct MockDataSource {
    images: Vec<ImageHandle>,
    count: usize,
    current_index: usize,
}

impl MockDataSource {
    pub fn new(images: Vec<ImageHandle>, count: usize) -> Self {
        Self {
            images,
            count,
            current_index: 0,
        }
    }

    /// Which mock image `index` shows. Stable across runs.
    pub fn mock_index(&self, index: usize) -> Option<usize> {
        if self.images.is_empty() {
            return None;
        }
        Some((splitmix64(index as u64) % self.images.len() as u64) as usize)
    }
}

impl DataSource for MockDataSource {
    fn current_index(&self) -> usize {
        self.current_index
    }

    fn set_current_index(&mut self, index: usize) {
        self.current_index = index.min(self.count.saturating_sub(1));
    }

    fn number_of_items(&self) -> usize {
        self.count
    }

    fn image(&self, index: usize) -> Option<ImageHandle> {
        if index >= self.count {
            return None;
        }
        self.mock_index(index).map(|i| self.images[i])
    }
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
