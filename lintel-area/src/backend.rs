//! Rendering backend seam.
//!
//! The area tree never talks to a windowing system directly. Everything it
//! paints goes through [`Renderer`], and layout only needs [`TextMeasure`].

use std::path::Path;

use serde::Serialize;

use crate::primitives::{BorderSides, Color, Rect, Size};
use crate::theme::Gradient;

/// Opaque handle to an offscreen drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PixmapId(pub u64);

/// Opaque handle to a loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ImageHandle(pub u64);

/// A font description such as `sans Bold 10`. The trailing number is the
/// point size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FontSpec(pub String);

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec("sans 10".to_string())
    }
}

impl FontSpec {
    pub fn new(desc: impl Into<String>) -> Self {
        FontSpec(desc.into())
    }

    pub fn size(&self) -> f64 {
        self.0
            .split_whitespace()
            .last()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|s| *s > 0.0)
            .unwrap_or(10.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// A single line of text laid into a rectangle.
#[derive(Debug, Clone, Copy)]
pub struct TextRun<'a> {
    pub text: &'a str,
    pub font: &'a FontSpec,
    pub color: Color,
    pub rect: Rect,
    pub align: TextAlign,
}

/// Icon color adjustments, in the ranges the config accepts
/// (alpha `0..=100`, saturation and brightness `-100..=100`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageAdjust {
    pub alpha: i32,
    pub saturation: i32,
    pub brightness: i32,
}

impl Default for ImageAdjust {
    fn default() -> Self {
        Self {
            alpha: 100,
            saturation: 0,
            brightness: 0,
        }
    }
}

/// What to fill a shape with.
#[derive(Debug, Clone, Copy)]
pub enum Paint<'a> {
    Solid(Color),
    Gradient(&'a Gradient),
}

pub trait TextMeasure {
    /// Pixel extent of `text` rendered in `font`. Multi-line text is the
    /// widest line by the sum of line heights.
    fn measure_text(&self, font: &FontSpec, text: &str) -> Size;
}

pub trait Renderer: TextMeasure {
    fn create_pixmap(&mut self, width: i32, height: i32) -> PixmapId;

    fn free_pixmap(&mut self, pixmap: PixmapId);

    /// Composite `src_rect` of `src` onto `dst` at `(dst_x, dst_y)`.
    fn copy_area(&mut self, src: PixmapId, dst: PixmapId, src_rect: Rect, dst_x: i32, dst_y: i32);

    fn fill_rect(&mut self, target: PixmapId, rect: Rect, radius: i32, paint: Paint<'_>);

    fn stroke_rect(
        &mut self,
        target: PixmapId,
        rect: Rect,
        radius: i32,
        width: i32,
        sides: BorderSides,
        color: Color,
    );

    fn draw_text(&mut self, target: PixmapId, run: &TextRun<'_>);

    /// Load an icon scaled to `size`. `None` when the file is missing or
    /// unreadable.
    fn load_image(&mut self, path: &Path, size: i32) -> Option<ImageHandle>;

    fn draw_image(&mut self, target: PixmapId, image: ImageHandle, rect: Rect, adjust: ImageAdjust);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size() {
        assert_eq!(FontSpec::new("sans Bold 12").size(), 12.0);
        assert_eq!(FontSpec::new("monospace").size(), 10.0);
        assert_eq!(FontSpec::new("sans 0").size(), 10.0);
    }
}
