//! Clock: one or two strftime-formatted lines and an optional tooltip.

use std::fmt::{Display, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use tracing::warn;

use crate::area::Area;
use crate::backend::{FontSpec, PixmapId, Renderer};
use crate::theme::Theme;

use super::text::{block_size, draw_lines};
use super::{
    content_rect, resize_to_content, AreaBehavior, ButtonCommands, ClickAction, ClickEvent, LayoutContext,
    TextLine, TextStyle,
};

#[derive(Debug, Clone)]
pub struct Clock {
    pub time1_format: String,
    pub time2_format: Option<String>,
    pub tooltip_format: Option<String>,
    pub time1_font: FontSpec,
    pub time2_font: FontSpec,
    pub style: TextStyle,
    pub commands: ButtonCommands,
    lines: Vec<TextLine>,
    tooltip: Option<String>,
}

/// True if `format` is a well-formed strftime string.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

fn shows_seconds(format: &str) -> bool {
    ["%S", "%T", "%X", "%s", "%r", "%c", "%+"]
        .iter()
        .any(|spec| format.contains(spec))
}

fn format_time<Tz: TimeZone>(format: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let mut out = String::new();
    if write!(out, "{}", now.format(format)).is_err() {
        warn!("invalid clock format '{}'", format);
        out.clear();
    }
    out
}

impl Clock {
    pub fn new(time1_format: impl Into<String>, time1_font: FontSpec) -> Self {
        Self {
            time1_format: time1_format.into(),
            time2_format: None,
            tooltip_format: None,
            time2_font: time1_font.clone(),
            time1_font,
            style: TextStyle::default(),
            commands: ButtonCommands::default(),
            lines: Vec::new(),
            tooltip: None,
        }
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    /// Whether the displayed text changes every second rather than every
    /// minute.
    pub fn ticks_every_second(&self) -> bool {
        shows_seconds(&self.time1_format)
            || self.time2_format.as_deref().is_some_and(shows_seconds)
            || self.tooltip_format.as_deref().is_some_and(shows_seconds)
    }

    /// Re-render the text for `now`. Marks the area for resize and redraw
    /// and returns true when the visible text changed.
    pub fn update<Tz: TimeZone>(&mut self, area: &mut Area, now: &DateTime<Tz>) -> bool
    where
        Tz::Offset: Display,
    {
        let mut lines = vec![TextLine::new(
            format_time(&self.time1_format, now),
            self.time1_font.clone(),
        )];
        if let Some(fmt) = &self.time2_format {
            lines.push(TextLine::new(format_time(fmt, now), self.time2_font.clone()));
        }
        self.tooltip = self.tooltip_format.as_deref().map(|f| format_time(f, now));

        if lines == self.lines {
            return false;
        }
        self.lines = lines;
        area.need_resize = true;
        area.need_redraw = true;
        true
    }
}

impl AreaBehavior for Clock {
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
