//! Configuration module for transition timing and gallery layout.
//! Settings live in an INI file under the platform config directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, warn};

const DEFAULT_CONFIG_INI: &str = include_str!("../config.ini");

/// Timing and thresholds of the zoom transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionConfig {
    /// Length of the presenting/dismissing zoom, in milliseconds
    pub duration_ms: u64,
    /// Spring damping ratio of the zoom (1.0 = no overshoot)
    pub spring_damping: f32,
    /// Drag distance, in points, that finishes a dismissal on release
    pub completion_threshold: f32,
    /// Drag distance, in points, over which the detail view fades out
    pub fade_distance: f32,
    /// How long a released drag takes to snap back, in milliseconds
    pub snap_back_duration_ms: u64,
}

impl TransitionConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn snap_back_duration(&self) -> Duration {
        Duration::from_millis(self.snap_back_duration_ms)
    }
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 500,
            spring_damping: 0.8,
            completion_threshold: 50.0,
            fade_distance: 200.0,
            snap_back_duration_ms: 250,
        }
    }
}

/// Grid layout and detail screen settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryConfig {
    pub columns: usize,
    pub section_inset: f32,
    pub item_spacing: f32,
    /// Width / height of a grid cell
    pub item_aspect_ratio: f32,
    pub item_count: usize,
    /// Toolbar show/hide fade, in milliseconds
    pub toolbar_fade_ms: u64,
    /// Detail background as RGB (0-255)
    pub background_rgb: [u8; 3],
}

impl GalleryConfig {
    pub fn toolbar_fade(&self) -> Duration {
        Duration::from_millis(self.toolbar_fade_ms)
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            columns: 2,
            section_inset: 18.0,
            item_spacing: 10.0,
            item_aspect_ratio: 4.0 / 3.0,
            item_count: 1000,
            toolbar_fade_ms: 100,
            background_rgb: [0, 0, 0],
        }
    }
}

/// Application configuration loaded from INI file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub transition: TransitionConfig,
    pub gallery: GalleryConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Transition,
    Gallery,
    Unknown,
}

impl Config {
    /// Get settings file path, e.g. `~/.config/photo-gallery/config.ini`.
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "photo-gallery", "photo-gallery")
            .map(|dirs| dirs.config_dir().join("config.ini"))
    }

    /// Load configuration from the default location.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                warn!("No config directory available, using built-in defaults");
                Self::parse_ini(DEFAULT_CONFIG_INI)
            }
        }
    }

    /// Load configuration from `path`, writing the default template there
    /// first if the file does not exist yet.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match fs::write(path, DEFAULT_CONFIG_INI) {
                Ok(()) => info!("Created default config at {}", path.display()),
                Err(e) => warn!("Could not write default config to {}: {}", path.display(), e),
            }
            return Self::parse_ini(DEFAULT_CONFIG_INI);
        }

        match fs::read_to_string(path) {
            Ok(content) => Self::parse_ini(&content),
            Err(e) => {
                warn!("Could not read {}: {}; using defaults", path.display(), e);
                Self::parse_ini(DEFAULT_CONFIG_INI)
            }
        }
    }

    /// Parse INI content into Config. Missing keys keep their defaults,
    /// malformed values are skipped, out-of-range values are clamped.
    pub fn parse_ini(content: &str) -> Self {
        let mut config = Config::default();
        let mut section = Section::None;

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                section = match line[1..line.len() - 1].trim().to_lowercase().as_str() {
                    "transition" => Section::Transition,
                    "gallery" => Section::Gallery,
                    other => {
                        debug!("Ignoring unknown config section [{}]", other);
                        Section::Unknown
                    }
                };
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                debug!("Ignoring config line without '=': {}", line);
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            let applied = match section {
                Section::Transition => config.transition.apply(&key, value),
                Section::Gallery => config.gallery.apply(&key, value),
                Section::None | Section::Unknown => false,
            };
            if !applied {
                debug!("Ignoring config entry {} = {}", key, value);
            }
        }

        config
    }
}

impl TransitionConfig {
    fn apply(&mut self, key: &str, value: &str) -> bool {
        match key {
            "duration_ms" => set(&mut self.duration_ms, value.parse().ok().map(|v: u64| v.min(10_000))),
            "spring_damping" => set(&mut self.spring_damping, parse_f32(value).map(|v| v.clamp(0.05, 4.0))),
            "completion_threshold" => {
                set(&mut self.completion_threshold, parse_f32(value).map(|v| v.max(0.0)))
            }
            "fade_distance" => set(&mut self.fade_distance, parse_f32(value).map(|v| v.max(1.0))),
            "snap_back_duration_ms" => {
                set(&mut self.snap_back_duration_ms, value.parse().ok().map(|v: u64| v.min(10_000)))
            }
            _ => false,
        }
    }
}

impl GalleryConfig {
    fn apply(&mut self, key: &str, value: &str) -> bool {
        match key {
            "columns" => set(&mut self.columns, value.parse().ok().map(|v: usize| v.clamp(1, 12))),
            "section_inset" => set(&mut self.section_inset, parse_f32(value).map(|v| v.max(0.0))),
            "item_spacing" => set(&mut self.item_spacing, parse_f32(value).map(|v| v.max(0.0))),
            "item_aspect_ratio" => {
                set(&mut self.item_aspect_ratio, parse_f32(value).map(|v| v.clamp(0.1, 10.0)))
            }
            "item_count" => set(&mut self.item_count, value.parse().ok()),
            "toolbar_fade_ms" => set(&mut self.toolbar_fade_ms, value.parse().ok().map(|v: u64| v.min(5_000))),
            "background_rgb" => set(&mut self.background_rgb, parse_rgb_triplet(value)),
            _ => false,
        }
    }
}

fn set<T>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *slot = v;
            true
        }
        None => false,
    }
}

fn parse_f32(value: &str) -> Option<f32> {
    value.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_rgb_triplet(value: &str) -> Option<[u8; 3]> {
    let parts: Vec<&str> = value
        .split(',')
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if parts.len() != 3 {
        return None;
    }
    let r = parts[0].parse::<u8>().ok()?;
    let g = parts[1].parse::<u8>().ok()?;
    let b = parts[2].parse::<u8>().ok()?;
    Some([r, g, b])
}
