//! Integration tests for loading configuration files from disk.

use std::fs;
use std::time::Duration;

use lintel::config::{Dimension, TaskbarMode, DEFAULT_CONFIG};
use lintel::{Config, ConfigError};
use lintel_area::BackgroundId;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lintelrc");
    fs::write(
        &path,
        "\
# panel background
rounded = 3
background_color = #202020 80

panel_items = LTC
panel_size = 90% 24
panel_background_id = 1
taskbar_mode = multi_desktop
autohide = 1
autohide_hide_timeout = 1.5
time1_format = %H:%M:%S
",
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.panel.items, "LTC");
    assert_eq!(config.panel.width, Dimension::Percent(90));
    assert_eq!(config.panel.height, Dimension::Pixels(24));
    assert_eq!(config.panel.background, BackgroundId(1));
    assert_eq!(config.taskbar.mode, TaskbarMode::MultiDesktop);
    assert!(config.panel.autohide.enabled);
    assert_eq!(config.panel.autohide.hide_timeout, Duration::from_millis(1500));
    assert_eq!(config.clock.time1_format.as_deref(), Some("%H:%M:%S"));
    assert_eq!(config.theme.background(BackgroundId(1)).border.radius, 3);
}

#[test]
fn test_malformed_lines_are_skipped() {
    // The stray line breaks the document grammar, so every other line is
    // still read one at a time.
    let config = Config::parse(
        "\
panel_items = TC
this line has no separator
panel_size = 100% 28
no_such_key = 4
",
    )
    .unwrap();
    assert_eq!(config.panel.items, "TC");
    assert_eq!(config.panel.height, Dimension::Pixels(28));
}

#[test]
fn test_invalid_values_keep_defaults() {
    let defaults = Config::parse("").unwrap();
    let config = Config::parse("panel_size = wide\nautohide = maybe\n").unwrap();
    assert_eq!(config.panel.height, defaults.panel.height);
    assert!(!config.panel.autohide.enabled);
}

#[test]
fn test_huge_timeouts_and_zero_periods_keep_defaults() {
    let defaults = Config::parse("").unwrap();
    let config = Config::parse(
        "tooltip_show_timeout = 1e300\nautohide_hide_timeout = 1e20\nbattery_update_interval = 0\n",
    )
    .unwrap();
    assert_eq!(config.tooltip.show_timeout, defaults.tooltip.show_timeout);
    assert_eq!(config.panel.autohide.hide_timeout, defaults.panel.autohide.hide_timeout);
    assert_eq!(config.battery.poll_interval, defaults.battery.poll_interval);
    assert!(!config.battery.poll_interval.is_zero());
}

#[test]
fn test_builtin_default_config() {
    let config = Config::parse(DEFAULT_CONFIG).unwrap();
    assert_eq!(config.panel.items, "TSC");
    assert_eq!(config.theme.background_count(), 3);
    assert_eq!(config.panel.background, BackgroundId(1));
    assert_eq!(config.task.maximum_size, (150, 30));
    assert_eq!(config.clock.time1_format.as_deref(), Some("%H:%M"));
}

#[test]
fn test_explicit_path_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom");
    fs::write(&path, "panel_items = B\n").unwrap();

    let config = Config::locate_and_load(Some(&path)).unwrap();
    assert_eq!(config.panel.items, "B");
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent");
    match Config::load(&path) {
        Err(ConfigError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected a read error, got {:?}", other.map(|_| ())),
    }
}
