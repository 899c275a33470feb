use std::fs;
use std::time::Duration;

use photo_gallery::Config;

/// The template spells the cell ratio with four decimals, so compare it
/// loosely and everything else exactly.
fn assert_defaults(config: &Config) {
    let defaults = Config::default();
    assert_eq!(config.transition, defaults.transition);
    assert_eq!(config.gallery.columns, defaults.gallery.columns);
    assert_eq!(config.gallery.item_count, defaults.gallery.item_count);
    assert_eq!(config.gallery.background_rgb, defaults.gallery.background_rgb);
    assert_eq!(config.gallery.toolbar_fade(), defaults.gallery.toolbar_fade());
    assert!((config.gallery.item_aspect_ratio - defaults.gallery.item_aspect_ratio).abs() < 1e-3);
}

#[test]
fn missing_file_gets_default_template() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("config.ini");

    let config = Config::load_from(&path);
    assert_defaults(&config);

    let written = fs::read_to_string(&path).expect("template written");
    assert!(written.contains("[transition]"));
    assert!(written.contains("[gallery]"));
    assert_eq!(Config::parse_ini(&written), config);
}

#[test]
fn existing_file_overrides_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.ini");
    fs::write(
        &path,
        "[transition]\n\
         duration_ms = 350\n\
         completion_threshold = 80\n\
         \n\
         [gallery]\n\
         columns = 4\n\
         toolbar_fade_ms = 0\n",
    )
    .expect("write config");

    let config = Config::load_from(&path);
    assert_eq!(config.transition.duration(), Duration::from_millis(350));
    assert_eq!(config.transition.completion_threshold, 80.0);
    assert_eq!(config.transition.fade_distance, 200.0);
    assert_eq!(config.gallery.columns, 4);
    assert_eq!(config.gallery.toolbar_fade(), Duration::ZERO);

    // Loading never rewrites an existing file.
    let after = fs::read_to_string(&path).expect("read back");
    assert!(after.contains("columns = 4"));
}

#[test]
fn unreadable_path_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    // A directory exists at the path, so reading it as a file fails.
    let config = Config::load_from(dir.path());
    assert_defaults(&config);
}
