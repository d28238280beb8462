//! Parsers for individual config values.

use std::time::Duration;

use lintel_area::{Color, ImageAdjust, Padding};

pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

/// Whitespace-separated integers; every field must parse.
pub fn parse_ints(value: &str) -> Option<Vec<i32>> {
    value.split_whitespace().map(|v| v.parse().ok()).collect()
}

/// `#RRGGBB[AA] [alpha-percent]`.
pub fn parse_color(value: &str) -> Option<Color> {
    let mut parts = value.split_whitespace();
    let color = Color::from_hex(parts.next()?)?;
    match parts.next() {
        Some(alpha) => Some(color.with_alpha_percent(alpha.parse().ok()?)),
        None => Some(color),
    }
}

/// `horizontal [vertical [spacing]]`. Missing fields repeat the
/// horizontal padding.
pub fn parse_padding(value: &str) -> Option<Padding> {
    let ints = parse_ints(value)?;
    let (h, v, s) = match ints.as_slice() {
        [h] => (*h, *h, *h),
        [h, v] => (*h, *v, *h),
        [h, v, s] => (*h, *v, *s),
        _ => return None,
    };
    Some(Padding::new(h.max(0), v.max(0), s.max(0)))
}

/// `alpha saturation brightness`.
pub fn parse_adjust(value: &str) -> Option<ImageAdjust> {
    match parse_ints(value)?.as_slice() {
        [a, s, b] => Some(ImageAdjust {
            alpha: (*a).clamp(0, 100),
            saturation: (*s).clamp(-100, 100),
            brightness: (*b).clamp(-100, 100),
        }),
        _ => None,
    }
}

/// Seconds as a decimal number.
pub fn parse_seconds(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Seconds between repeats of a timer; must be positive.
pub fn parse_period(value: &str) -> Option<Duration> {
    parse_seconds(value).filter(|d| !d.is_zero())
}

pub fn parse_index(value: &str) -> Option<usize> {
    value.trim().parse().ok()
}

/// A length in pixels or as a percentage of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Pixels(i32),
    Percent(i32),
}

impl Dimension {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        match value.strip_suffix('%') {
            Some(p) => p.parse().ok().map(|p: i32| Dimension::Percent(p.clamp(0, 100))),
            None => value.parse().ok().map(|p: i32| Dimension::Pixels(p.max(0))),
        }
    }

    pub fn resolve(self, total: i32) -> i32 {
        match self {
            Dimension::Pixels(px) => px,
            Dimension::Percent(p) => total * p / 100,
        }
    }
}

/// A command string; empty means unset.
pub fn parse_command(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
