//! Application launcher: a grid of icons built from desktop entries.

use std::path::PathBuf;

use crate::area::Area;
use crate::backend::{ImageAdjust, ImageHandle, PixmapId, Renderer};
use crate::primitives::Rect;
use crate::theme::Theme;

use super::{
    content_rect, AreaBehavior, ClickAction, ClickEvent, IconGrid, LayoutContext, MouseButton,
};

#[derive(Debug, Clone)]
pub struct Launcher {
    pub grid: IconGrid,
}

impl Launcher {
    pub fn new(icon_size: i32, spacing: i32) -> Self {
        Self {
            grid: IconGrid::new(icon_size, spacing),
        }
    }
}

impl AreaBehavior for Launcher {
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
}

fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Expand an `Exec` line for launching without files: `%%` becomes `%`,
/// `%c` the application name, `%i` an `--icon` argument, and every other
/// field code is dropped.
pub fn strip_field_codes(exec: &str, name: &str, icon: Option<&str>) -> String {
    let mut out = String::with_capacity(exec.len());
    let mut chars = exec.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('c') => out.push_str(&shell_quote(name)),
            Some('i') => {
                if let Some(icon) = icon {
                    out.push_str("--icon ");
                    out.push_str(&shell_quote(icon));
                }
            }
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone)]
pub struct LauncherIcon {
    pub name: String,
    pub exec: String,
    pub icon_name: Option<String>,
    pub icon_path: Option<PathBuf>,
    pub tooltip_enabled: bool,
    pub adjust: ImageAdjust,
    icon: Option<ImageHandle>,
    load_attempted: bool,
}

impl LauncherIcon {
    pub fn new(name: impl Into<String>, exec: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exec: exec.into(),
            icon_name: None,
            icon_path: None,
            tooltip_enabled: true,
            adjust: ImageAdjust::default(),
            icon: None,
            load_attempted: false,
        }
    }

    /// The shell command run on click.
    pub fn command(&self) -> String {
        strip_field_codes(&self.exec, &self.name, self.icon_name.as_deref())
    }
}

impl AreaBehavior for LauncherIcon {
    fn draw_foreground(
        &mut self,
        area: &Area,
        renderer: &mut dyn Renderer,
        target: PixmapId,
        theme: &Theme,
    ) {
        let content = content_rect(area, theme);
        if !self.load_attempted {
            self.load_attempted = true;
            if let Some(path) = &self.icon_path {
                self.icon = renderer.load_image(path, content.width.min(content.height));
            }
        }
        if let Some(icon) = self.icon {
            renderer.draw_image(target, icon, content, self.adjust);
        }
    }

    fn tooltip_text(&self) -> Option<String> {
        self.tooltip_enabled.then(|| self.name.clone())
    }

    fn handles_click(&self, area: &Area, event: &ClickEvent) -> bool {
        area.on_screen && area.is_point_inside(event.x, event.y) && event.button == MouseButton::Left
    }

    fn on_click(&mut self, _area: &Area, _event: &ClickEvent) -> ClickAction {
        ClickAction::Spawn(self.command())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_field_codes() {
        assert_eq!(strip_field_codes("firefox %u", "Firefox", None), "firefox");
        assert_eq!(strip_field_codes("app %F --flag", "App", None), "app --flag");
        assert_eq!(strip_field_codes("echo 100%%", "x", None), "echo 100%");
        assert_eq!(
            strip_field_codes("gimp %i %c", "GIMP", Some("gimp")),
            "gimp --icon 'gimp' 'GIMP'"
        );
        assert_eq!(strip_field_codes("app %i", "App", None), "app");
    }

    #[test]
    fn test_quote_escapes_single_quotes() {
        assert_eq!(
            strip_field_codes("run %c", "Bob's", None),
            r"run 'Bob'\''s'"
        );
    }
}
