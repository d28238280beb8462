//! System tray container. The icons themselves are client windows that the
//! host moves into the rectangles laid out here.

use crate::area::Area;
use crate::primitives::Rect;

use super::{AreaBehavior, ClickEvent, IconGrid, LayoutContext};

#[derive(Debug, Clone)]
pub struct Systray {
    pub grid: IconGrid,
    needs_refresh: bool,
}

impl Systray {
    pub fn new(icon_size: i32, spacing: i32) -> Self {
        Self {
            grid: IconGrid::new(icon_size, spacing),
            needs_refresh: true,
        }
    }

    /// Icon windows must be repositioned.
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub fn mark_refreshed(&mut self) {
        self.needs_refresh = false;
    }
}

impl AreaBehavior for Systray {
    fn resize(&mut self, area: &mut Area, ctx: &LayoutContext<'_>, child_count: usize) -> bool {
        self.grid.resize(area, ctx, child_count)
    }

    fn arrange_children(
        &self,
        area: &Area,
        ctx: &LayoutContext<'_>,
        count: usize,
    ) -> Option<Vec<Rect>> {
        Some(self.grid.arrange(area, ctx, count))
    }

    fn on_change_layout(&mut self, _area: &Area) {
        self.needs_refresh = true;
    }
}

/// An embedded tray client window.
#[derive(Debug, Clone)]
pub struct TrayIcon {
    pub window: u64,
}

impl AreaBehavior for TrayIcon {
    fn handles_click(&self, _area: &Area, _event: &ClickEvent) -> bool {
        false
    }
}
