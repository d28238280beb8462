//! A per-desktop taskbar holding an optional name label and task buttons.

use crate::area::Area;
use crate::backend::{FontSpec, PixmapId, Renderer};
use crate::theme::{BackgroundId, Theme};

use super::text::{block_size, draw_lines};
use super::{content_rect, resize_to_content, AreaBehavior, LayoutContext, TextLine, TextStyle, Widget};

#[derive(Debug, Clone)]
pub struct Taskbar {
    pub desktop: usize,
    pub active: bool,
    pub active_background: BackgroundId,
    pub inactive_background: BackgroundId,
    /// Cap on a task's main-axis size; 0 lets tasks fill the bar.
    pub max_task_extent: i32,
}

impl Taskbar {
    pub fn new(desktop: usize) -> Self {
        Self {
            desktop,
            active: false,
            active_background: BackgroundId::TRANSPARENT,
            inactive_background: BackgroundId::TRANSPARENT,
            max_task_extent: 0,
        }
    }

    /// Mark this taskbar's desktop as current or not.
    pub fn set_active(&mut self, area: &mut Area, active: bool) -> bool {
        area.background = if active {
            self.active_background
        } else {
            self.inactive_background
        };
        if self.active == active {
            return false;
        }
        self.active = active;
        area.need_redraw = true;
        true
    }
}

impl AreaBehavior for Taskbar {
    fn max_child_extent(&self) -> i32 {
        self.max_task_extent
    }

    fn on_remove_child(
        &mut self,
        child: &mut Area,
        child_widget: &mut Widget,
        renderer: &mut dyn Renderer,
    ) {
        child_widget.release_resources(renderer);
        if let Some(pixmap) = child.pixmap.take() {
            renderer.free_pixmap(pixmap);
        }
    }
}

/// The desktop name shown at the start of a taskbar.
#[derive(Debug, Clone)]
pub struct TaskbarName {
    pub style: TextStyle,
    line: TextLine,
}

impl TaskbarName {
    pub fn new(name: impl Into<String>, font: FontSpec) -> Self {
        Self {
            style: TextStyle::default(),
            line: TextLine::new(name, font),
        }
    }

    pub fn name(&self) -> &str {
        &self.line.text
    }

    pub fn set_name(&mut self, area: &mut Area, name: &str) -> bool {
        if self.line.text == name {
            return false;
        }
        self.line.text = name.to_string();
        area.need_resize = true;
        area.need_redraw = true;
        true
    }
}

impl AreaBehavior for TaskbarName {
    fn resize(&mut self, area: &mut Area, ctx: &LayoutContext<'_>, _child_count: usize) -> bool {
        let content = block_size(ctx.measure, std::slice::from_ref(&self.line));
        resize_to_content(area, ctx, content.width, content.height)
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
            std::slice::from_ref(&self.line),
            &self.style,
        );
    }
}
