//! Shared text layout for clock, battery, execp and buttons.

use crate::backend::{FontSpec, PixmapId, Renderer, TextAlign, TextMeasure, TextRun};
use crate::primitives::{Color, Rect, Size};

/// One line of text and the font it is drawn in.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub font: FontSpec,
}

impl TextLine {
    pub fn new(text: impl Into<String>, font: FontSpec) -> Self {
        Self {
            text: text.into(),
            font,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            align: TextAlign::Center,
        }
    }
}

/// Extent of a stack of lines. Empty lines take no space.
pub(crate) fn block_size(measure: &dyn TextMeasure, lines: &[TextLine]) -> Size {
    lines
        .iter()
        .filter(|l| !l.text.is_empty())
        .map(|l| measure.measure_text(&l.font, &l.text))
        .fold(Size::ZERO, |acc, s| {
            Size::new(acc.width.max(s.width), acc.height + s.height)
        })
}

/// Draw `lines` stacked and vertically centered in `content`.
pub(crate) fn draw_lines(
    renderer: &mut dyn Renderer,
    target: PixmapId,
    content: Rect,
    lines: &[TextLine],
    style: &TextStyle,
) {
    let sizes: Vec<Size> = lines
        .iter()
        .map(|l| renderer.measure_text(&l.font, &l.text))
        .collect();
    let total: i32 = sizes.iter().map(|s| s.height).sum();
    let mut y = content.y + (content.height - total) / 2;
    for (line, size) in lines.iter().zip(sizes) {
        if line.text.is_empty() {
            continue;
        }
        let rect = Rect::new(content.x, y, content.width, size.height);
        renderer.draw_text(
            target,
            &TextRun {
                text: &line.text,
                font: &line.font,
                color: style.color,
                rect,
                align: style.align,
            },
        );
        y += size.height;
    }
}
