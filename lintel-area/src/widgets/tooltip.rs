//! The tooltip window's content.
//!
//! A tooltip is the root of its own tree. It sizes itself to its text in
//! both directions regardless of panel orientation.

use crate::area::Area;
use crate::backend::{FontSpec, PixmapId, Renderer};
use crate::theme::Theme;

use super::text::{block_size, draw_lines};
use super::{content_rect, AreaBehavior, LayoutContext, TextLine, TextStyle};

#[derive(Debug, Clone)]
pub struct Tooltip {
    pub font: FontSpec,
    pub style: TextStyle,
    lines: Vec<TextLine>,
}

impl Tooltip {
    pub fn new(font: FontSpec, style: TextStyle) -> Self {
        Self {
            font,
            style,
            lines: Vec::new(),
        }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace the text. Returns true if it differs from the current one.
    pub fn set_text(&mut self, area: &mut Area, text: &str) -> bool {
        if self.text() == text {
            return false;
        }
        self.lines = text
            .lines()
            .map(|l| TextLine::new(l, self.font.clone()))
            .collect();
        area.need_resize = true;
        area.need_redraw = true;
        true
    }
}

impl AreaBehavior for Tooltip {
    fn resize(&mut self, area: &mut Area, ctx: &LayoutContext<'_>, _child_count: usize) -> bool {
        let border = ctx.theme.background(area.background).border;
        let content = block_size(ctx.measure, &self.lines);
        let width = content.width + 2 * area.padding.horizontal + border.width_lr();
        let height = content.height + 2 * area.padding.vertical + border.width_tb();
        let changed = area.width != width || area.height != height;
        area.width = width;
        area.height = height;
        changed
    }

    fn draw_foreground(
        &mut self,
        area: &Area,
        renderer: &mut dyn Renderer,
        target: PixmapId,
        theme: &Theme,
    ) {
        draw_lines(
            renderer,
            target,
            content_rect(area, theme),
            &self.lines,
            &self.style,
        );
    }
}
