//! Icon grid shared by the launcher and the system tray.
//!
//! Icons fill the cross axis first, then wrap into further columns (rows on
//! a vertical panel).

use crate::area::Area;
use crate::primitives::{Orientation, Rect};

use super::LayoutContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconGrid {
    pub icon_size: i32,
    pub spacing: i32,
}

impl IconGrid {
    pub fn new(icon_size: i32, spacing: i32) -> Self {
        Self { icon_size, spacing }
    }

    /// Icons that fit across `cross` pixels; always at least one.
    pub fn per_line(&self, cross: i32) -> i32 {
        let step = self.icon_size + self.spacing;
        if step <= 0 {
            return 1;
        }
        ((cross + self.spacing) / step).max(1)
    }

    fn span(&self, count: i32) -> i32 {
        if count <= 0 {
            0
        } else {
            count * self.icon_size + (count - 1) * self.spacing
        }
    }

    fn inner_cross(area: &Area, ctx: &LayoutContext<'_>, cross: i32) -> i32 {
        let border = ctx.theme.background(area.background).border;
        let border_cross = if ctx.orientation.is_horizontal() {
            border.width_tb()
        } else {
            border.width_lr()
        };
        (cross - border_cross - 2 * area.padding.vertical).max(0)
    }

    pub fn resize(&self, area: &mut Area, ctx: &LayoutContext<'_>, count: usize) -> bool {
        let border = ctx.theme.background(area.background).border;
        let border_main = if ctx.orientation.is_horizontal() {
            border.width_lr()
        } else {
            border.width_tb()
        };
        let per = self.per_line(Self::inner_cross(area, ctx, ctx.panel_cross));
        let count = count as i32;
        let lines = (count + per - 1) / per;
        let main = self.span(lines) + 2 * area.padding.horizontal + border_main;
        area.set_extent(ctx.orientation, main, ctx.panel_cross)
    }

    /// Panel-coordinate rectangles for `count` icons inside `area`.
    pub fn arrange(&self, area: &Area, ctx: &LayoutContext<'_>, count: usize) -> Vec<Rect> {
        let o = ctx.orientation;
        let border = ctx.theme.background(area.background).border;
        let (border_main_start, border_cross_start) = match o {
            Orientation::Horizontal => (border.left(), border.top()),
            Orientation::Vertical => (border.top(), border.left()),
        };
        let inner_cross = Self::inner_cross(area, ctx, area.cross_size(o));
        let per = self.per_line(inner_cross);
        let used = (count as i32).min(per);

        let main_start = area.main_pos(o) + border_main_start + area.padding.horizontal;
        let cross_start = area.cross_pos(o)
            + border_cross_start
            + area.padding.vertical
            + (inner_cross - self.span(used)) / 2;

        let step = self.icon_size + self.spacing;
        (0..count as i32)
            .map(|i| {
                let main = main_start + (i / per) * step;
                let cross = cross_start + (i % per) * step;
                match o {
                    Orientation::Horizontal => Rect::new(main, cross, self.icon_size, self.icon_size),
                    Orientation::Vertical => Rect::new(cross, main, self.icon_size, self.icon_size),
                }
            })
            .collect()
    }
}
