//! A user-defined button with optional icon and text.

use std::path::PathBuf;

use crate::area::Area;
use crate::backend::{FontSpec, ImageAdjust, ImageHandle, PixmapId, Renderer};
use crate::primitives::Rect;
use crate::theme::Theme;

use super::text::{block_size, draw_lines};
use super::{
    content_rect, resize_to_content, AreaBehavior, ButtonCommands, ClickAction, ClickEvent,
    LayoutContext, TextLine, TextStyle,
};

#[derive(Debug, Clone)]
pub struct Button {
    pub icon_path: Option<PathBuf>,
    pub font: FontSpec,
    pub style: TextStyle,
    pub commands: ButtonCommands,
    pub tooltip: Option<String>,
    pub adjust: ImageAdjust,
    lines: Vec<TextLine>,
    icon: Option<ImageHandle>,
    icon_size: i32,
}

impl Button {
    pub fn new(text: Option<&str>, icon_path: Option<PathBuf>, font: FontSpec) -> Self {
        let lines = text
            .map(|t| vec![TextLine::new(t, font.clone())])
            .unwrap_or_default();
        Self {
            icon_path,
            font,
            style: TextStyle::default(),
            commands: ButtonCommands::default(),
            tooltip: None,
            adjust: ImageAdjust::default(),
            lines,
            icon: None,
            icon_size: 0,
        }
    }
}

impl AreaBehavior for Button {
    fn resize(&mut self, area: &mut Area, ctx: &LayoutContext<'_>, _child_count: usize) -> bool {
        let border = ctx.theme.background(area.background).border;
        let border_cross = if ctx.orientation.is_horizontal() {
            border.width_tb()
        } else {
            border.width_lr()
        };
        let text = block_size(ctx.measure, &self.lines);
        self.icon_size = if self.icon_path.is_some() {
            (ctx.panel_cross - border_cross - 2 * area.padding.vertical).max(0)
        } else {
            0
        };
        let gap = if self.icon_size > 0 && text.width > 0 {
            area.padding.spacing
        } else {
            0
        };
        let (w, h) = if ctx.orientation.is_horizontal() {
            (self.icon_size + gap + text.width, text.height.max(self.icon_size))
        } else {
            (text.width.max(self.icon_size), self.icon_size + gap + text.height)
        };
        resize_to_content(area, ctx, w, h)
    }

    fn draw_foreground(
        &mut self,
        area: &Area,
        renderer: &mut dyn Renderer,
        target: PixmapId,
        theme: &Theme,
    ) {
        let content = content_rect(area, theme);
        if self.icon.is_none() && self.icon_size > 0 {
            if let Some(path) = &self.icon_path {
                self.icon = renderer.load_image(path, self.icon_size);
            }
        }
        let mut text_rect = content;
        if let Some(icon) = self.icon {
            let y = content.y + (content.height - self.icon_size) / 2;
            let rect = Rect::new(content.x, y, self.icon_size, self.icon_size);
            renderer.draw_image(target, icon, rect, self.adjust);
            let used = self.icon_size + area.padding.spacing;
            text_rect = content.inset(used, 0, 0, 0);
        }
        draw_lines(renderer, target, text_rect, &self.lines, &self.style);
    }

    fn tooltip_text(&self) -> Option<String> {
        self.tooltip.clone()
    }

    fn handles_click(&self, area: &Area, event: &ClickEvent) -> bool {
        area.on_screen
            && area.is_point_inside(event.x, event.y)
            && self.commands.command(event.button).is_some()
    }

    fn on_click(&mut self, _area: &Area, event: &ClickEvent) -> ClickAction {
        match self.commands.command(event.button) {
            Some(cmd) => ClickAction::Spawn(cmd.to_string()),
            None => ClickAction::None,
        }
    }
}
