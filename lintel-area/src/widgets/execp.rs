//! Displays the output of a periodically executed command.

use crate::area::Area;
use crate::backend::{FontSpec, PixmapId, Renderer};
use crate::theme::Theme;

use super::text::{block_size, draw_lines};
use super::{
    content_rect, resize_to_content, AreaBehavior, ButtonCommands, ClickAction, ClickEvent, LayoutContext,
    TextLine, TextStyle,
};

#[derive(Debug, Clone)]
pub struct Execp {
    pub command: String,
    /// Seconds between runs; 0 runs the command once.
    pub interval: u64,
    pub font: FontSpec,
    pub style: TextStyle,
    pub commands: ButtonCommands,
    pub tooltip: Option<String>,
    lines: Vec<TextLine>,
    running: bool,
}

impl Execp {
    pub fn new(command: impl Into<String>, interval: u64, font: FontSpec) -> Self {
        Self {
            command: command.into(),
            interval,
            font,
            style: TextStyle::default(),
            commands: ButtonCommands::default(),
            tooltip: None,
            lines: Vec::new(),
            running: false,
        }
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// A child is in flight; the next tick should not start another.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Replace the displayed output. Returns true if it changed.
    pub fn set_output(&mut self, area: &mut Area, output: &str) -> bool {
        let lines: Vec<TextLine> = output
            .trim_end()
            .lines()
            .map(|l| TextLine::new(l, self.font.clone()))
            .collect();
        if lines == self.lines {
            return false;
        }
        self.lines = lines;
        area.need_resize = true;
        area.need_redraw = true;
        true
    }
}

impl AreaBehavior for Execp {
    fn resize(&mut self, area: &mut Area, ctx: &LayoutContext<'_>, _child_count: usize) -> bool {
        let content = block_size(ctx.measure, &self.lines);
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
            &self.lines,
            &self.style,
        );
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
