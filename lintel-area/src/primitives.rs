//! Core primitive types for the area tree.
//!
//! Geometry is in integer pixels relative to the panel window.

use serde::Serialize;

/// A rectangle in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const ZERO: Self = Self {
        x: 0,
        y: 0,
        width: 0,
        height: 0,
    };

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Half-open containment: `[x, x + width) x [y, y + height)`.
    #[inline]
    pub fn contains_xy(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// True when nothing can be drawn in it.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Shrink by the given amounts on each side, never below zero size.
    pub fn inset(&self, left: i32, top: i32, right: i32, bottom: i32) -> Rect {
        Rect {
            x: self.x + left,
            y: self.y + top,
            width: (self.width - left - right).max(0),
            height: (self.height - top - bottom).max(0),
        }
    }

    #[inline]
    pub fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    #[inline]
    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f64 / 255.0);
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1].repeat(2));
                Some(Self::rgba(expand(0)?, expand(1)?, expand(2)?, 1.0))
            }
            6 | 8 => {
                let a = if digits.len() == 8 {
                    channel(&digits[6..8])?
                } else {
                    1.0
                };
                Some(Self::rgba(
                    channel(&digits[0..2])?,
                    channel(&digits[2..4])?,
                    channel(&digits[4..6])?,
                    a,
                ))
            }
            _ => None,
        }
    }

    /// Same color with alpha given as a percentage.
    pub fn with_alpha_percent(self, percent: f64) -> Self {
        Self {
            a: (percent / 100.0).clamp(0.0, 1.0),
            ..self
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Linear interpolation towards `other`.
    pub fn lerp(&self, other: &Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }
}

/// Panel orientation. Layout runs along the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    #[inline]
    pub fn is_horizontal(self) -> bool {
        self == Orientation::Horizontal
    }

    /// The component of `(width, height)` along the main axis.
    #[inline]
    pub fn main(self, width: i32, height: i32) -> i32 {
        if self.is_horizontal() { width } else { height }
    }

    /// The component of `(width, height)` across the main axis.
    #[inline]
    pub fn cross(self, width: i32, height: i32) -> i32 {
        if self.is_horizontal() { height } else { width }
    }
}

/// Placement of children along the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Area padding.
///
/// `horizontal` is applied at both ends of the main axis, `spacing` between
/// children and `vertical` at both ends of the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Padding {
    pub horizontal: i32,
    pub spacing: i32,
    pub vertical: i32,
}

impl Padding {
    pub const fn new(horizontal: i32, vertical: i32, spacing: i32) -> Self {
        Self {
            horizontal,
            spacing,
            vertical,
        }
    }
}

/// Which sides of a rectangle carry a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BorderSides {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Default for BorderSides {
    fn default() -> Self {
        Self::ALL
    }
}

impl BorderSides {
    pub const ALL: Self = Self {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };

    pub const NONE: Self = Self {
        top: false,
        bottom: false,
        left: false,
        right: false,
    };

    /// Parse a side list such as `TBLR` or `TB`, case-insensitive.
    pub fn parse(spec: &str) -> Self {
        let spec = spec.to_ascii_uppercase();
        Self {
            top: spec.contains('T'),
            bottom: spec.contains('B'),
            left: spec.contains('L'),
            right: spec.contains('R'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = Rect::new(10, 0, 20, 30);
        assert!(r.contains_xy(10, 0));
        assert!(r.contains_xy(29, 29));
        assert!(!r.contains_xy(30, 5));
        assert!(!r.contains_xy(15, 30));
        assert!(!r.contains_xy(9, 5));
    }

    #[test]
    fn test_zero_sized_rect_contains_nothing() {
        let r = Rect::new(0, 0, 0, 10);
        assert!(r.is_empty());
        assert!(!r.contains_xy(0, 0));
    }

    #[test]
    fn test_inset_clamps() {
        let r = Rect::new(0, 0, 4, 4).inset(3, 3, 3, 3);
        assert_eq!(r, Rect::new(3, 3, 0, 0));
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex("#ff0080").unwrap();
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 128.0 / 255.0).abs() < 1e-9);
        assert_eq!(c.a, 1.0);

        let c = Color::from_hex("#00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-9);

        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("ffffff"), None);
        assert_eq!(Color::from_hex("#ggg"), None);
        assert_eq!(Color::from_hex("#12345"), None);
    }

    #[test]
    fn test_alpha_percent() {
        let c = Color::WHITE.with_alpha_percent(60.0);
        assert!((c.a - 0.6).abs() < 1e-9);
        assert_eq!(Color::WHITE.with_alpha_percent(250.0).a, 1.0);
    }

    #[test]
    fn test_orientation_axes() {
        assert_eq!(Orientation::Horizontal.main(3, 4), 3);
        assert_eq!(Orientation::Vertical.main(3, 4), 4);
        assert_eq!(Orientation::Vertical.cross(3, 4), 3);
    }

    #[test]
    fn test_border_sides_parse() {
        let sides = BorderSides::parse("tb");
        assert!(sides.top && sides.bottom);
        assert!(!sides.left && !sides.right);
    }
}
