//! A visual separator between panel items.

use crate::area::Area;
use crate::backend::{Paint, PixmapId, Renderer};
use crate::primitives::{Color, Orientation, Rect};
use crate::theme::Theme;

use super::{content_rect, resize_to_content, AreaBehavior, LayoutContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeparatorStyle {
    Empty,
    #[default]
    Line,
    Dots,
}

#[derive(Debug, Clone)]
pub struct Separator {
    pub style: SeparatorStyle,
    pub thickness: i32,
    pub color: Color,
    orientation: Orientation,
}

impl Separator {
    pub fn new(style: SeparatorStyle, thickness: i32, color: Color) -> Self {
        Self {
            style,
            thickness: thickness.max(0),
            color,
            orientation: Orientation::Horizontal,
        }
    }
}

impl AreaBehavior for Separator {
    fn resize(&mut self, area: &mut Area, ctx: &LayoutContext<'_>, _child_count: usize) -> bool {
        self.orientation = ctx.orientation;
        resize_to_content(area, ctx, self.thickness, self.thickness)
    }

    fn draw_foreground(
        &mut self,
        area: &Area,
        renderer: &mut dyn Renderer,
        target: PixmapId,
        theme: &Theme,
    ) {
        if self.thickness <= 0 || self.color.is_transparent() {
            return;
        }
        let content = content_rect(area, theme);
        let horizontal = self.orientation.is_horizontal();
        let t = self.thickness;
        match self.style {
            SeparatorStyle::Empty => {}
            SeparatorStyle::Line => {
                let rect = if horizontal {
                    Rect::new(content.x + (content.width - t) / 2, content.y, t, content.height)
                } else {
                    Rect::new(content.x, content.y + (content.height - t) / 2, content.width, t)
                };
                renderer.fill_rect(target, rect, 0, Paint::Solid(self.color));
            }
            SeparatorStyle::Dots => {
                let cross = if horizontal { content.height } else { content.width };
                let count = (cross + t) / (2 * t);
                if count <= 0 {
                    return;
                }
                let used = count * 2 * t - t;
                let mut offset = (cross - used) / 2;
                for _ in 0..count {
                    let rect = if horizontal {
                        Rect::new(content.x + (content.width - t) / 2, content.y + offset, t, t)
                    } else {
                        Rect::new(content.x + offset, content.y + (content.height - t) / 2, t, t)
                    };
                    renderer.fill_rect(target, rect, t / 2, Paint::Solid(self.color));
                    offset += 2 * t;
                }
            }
        }
    }
}
