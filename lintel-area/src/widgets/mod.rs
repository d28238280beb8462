//! Panel elements.
//!
//! Every node of the area tree pairs an [`Area`] with a [`Widget`]. The
//! widget enum is a closed set; per-kind behavior lives behind
//! [`AreaBehavior`] and the enum forwards to it.

mod battery;
mod button;
mod clock;
mod container;
mod execp;
mod grid;
mod launcher;
mod panel;
mod separator;
mod systray;
mod task;
mod taskbar;
mod text;
mod tooltip;

pub use battery::{Battery, BatteryState, BatteryUpdate, ChargeStatus};
pub use button::Button;
pub use clock::{is_valid_format, Clock};
pub use container::Container;
pub use execp::Execp;
pub use grid::IconGrid;
pub use launcher::{strip_field_codes, Launcher, LauncherIcon};
pub use panel::Panel;
pub use separator::{Separator, SeparatorStyle};
pub use systray::{Systray, TrayIcon};
pub use task::{Task, TaskState, TaskStyle};
pub use taskbar::{Taskbar, TaskbarName};
pub use text::{TextLine, TextStyle};
pub use tooltip::Tooltip;

use std::str::FromStr;

use crate::area::Area;
use crate::backend::{Paint, PixmapId, Renderer, TextMeasure};
use crate::error::StyleError;
use crate::primitives::{Orientation, Rect};
use crate::theme::Theme;

/// What a layout pass knows about its surroundings.
pub struct LayoutContext<'a> {
    pub measure: &'a dyn TextMeasure,
    pub theme: &'a Theme,
    pub orientation: Orientation,
    /// Cross-axis extent available to the panel's direct children.
    pub panel_cross: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    ScrollUp,
    ScrollDown,
    Other(u8),
}

impl MouseButton {
    /// Map an X11-style button number.
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => MouseButton::Left,
            2 => MouseButton::Middle,
            3 => MouseButton::Right,
            4 => MouseButton::ScrollUp,
            5 => MouseButton::ScrollDown,
            n => MouseButton::Other(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
}

/// A per-button binding table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ButtonMap<T> {
    pub left: T,
    pub middle: T,
    pub right: T,
    pub scroll_up: T,
    pub scroll_down: T,
}

impl<T> ButtonMap<T> {
    pub fn get(&self, button: MouseButton) -> Option<&T> {
        match button {
            MouseButton::Left => Some(&self.left),
            MouseButton::Middle => Some(&self.middle),
            MouseButton::Right => Some(&self.right),
            MouseButton::ScrollUp => Some(&self.scroll_up),
            MouseButton::ScrollDown => Some(&self.scroll_down),
            MouseButton::Other(_) => None,
        }
    }
}

/// Shell commands bound to mouse buttons.
pub type ButtonCommands = ButtonMap<Option<String>>;

impl ButtonCommands {
    pub fn command(&self, button: MouseButton) -> Option<&str> {
        self.get(button).and_then(|c| c.as_deref())
    }
}

/// Window-manager action a task button can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskAction {
    #[default]
    None,
    Close,
    Toggle,
    Iconify,
    ToggleIconify,
    Shade,
    ToggleShade,
    MaximizeRestore,
    DesktopLeft,
    DesktopRight,
    NextTask,
    PrevTask,
}

impl FromStr for TaskAction {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "none" => TaskAction::None,
            "close" => TaskAction::Close,
            "toggle" => TaskAction::Toggle,
            "iconify" => TaskAction::Iconify,
            "toggle_iconify" => TaskAction::ToggleIconify,
            "shade" => TaskAction::Shade,
            "toggle_shade" => TaskAction::ToggleShade,
            "maximize_restore" => TaskAction::MaximizeRestore,
            "desktop_left" => TaskAction::DesktopLeft,
            "desktop_right" => TaskAction::DesktopRight,
            "next_task" => TaskAction::NextTask,
            "prev_task" => TaskAction::PrevTask,
            other => return Err(StyleError::UnknownTaskAction(other.to_string())),
        })
    }
}

/// Result of a click, carried out by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    None,
    /// Run a shell command.
    Spawn(String),
    Task { window: u64, action: TaskAction },
    /// Let the window manager handle the click on the root window.
    ForwardToRoot,
}

/// Per-kind hooks. Defaults give a plain container.
pub trait AreaBehavior {
    /// Recompute a `ByContent` size. Returns true if the size changed.
    fn resize(&mut self, _area: &mut Area, _ctx: &LayoutContext<'_>, _child_count: usize) -> bool {
        false
    }

    /// Upper bound for the main-axis share of `ByLayout` children; 0 means
    /// unbounded.
    fn max_child_extent(&self) -> i32 {
        0
    }

    /// Custom placement for children. `None` selects linear placement.
    fn arrange_children(
        &self,
        _area: &Area,
        _ctx: &LayoutContext<'_>,
        _count: usize,
    ) -> Option<Vec<Rect>> {
        None
    }

    fn on_change_layout(&mut self, _area: &Area) {}

    fn draw_background(
        &mut self,
        area: &Area,
        renderer: &mut dyn Renderer,
        target: PixmapId,
        theme: &Theme,
    ) {
        paint_background(area, renderer, target, theme);
    }

    fn draw_foreground(
        &mut self,
        _area: &Area,
        _renderer: &mut dyn Renderer,
        _target: PixmapId,
        _theme: &Theme,
    ) {
    }

    fn tooltip_text(&self) -> Option<String> {
        None
    }

    /// Whether this area claims the click. The default claims any click
    /// inside a visible area.
    fn handles_click(&self, area: &Area, event: &ClickEvent) -> bool {
        area.on_screen && area.is_point_inside(event.x, event.y)
    }

    fn on_click(&mut self, _area: &Area, _event: &ClickEvent) -> ClickAction {
        ClickAction::None
    }

    /// Called on the parent before `child` is detached.
    fn on_remove_child(
        &mut self,
        _child: &mut Area,
        _child_widget: &mut Widget,
        _renderer: &mut dyn Renderer,
    ) {
    }

    /// Free backend resources owned by the widget itself.
    fn release_resources(&mut self, _renderer: &mut dyn Renderer) {}
}

/// Paint an area's background and border for its current mouse state.
pub fn paint_background(area: &Area, renderer: &mut dyn Renderer, target: PixmapId, theme: &Theme) {
    let bg = theme.background(area.background);
    let state = area.effective_mouse_state();
    let rect = Rect::new(0, 0, area.width, area.height);
    let border = bg.border;

    let inner = rect.inset(border.left(), border.top(), border.right(), border.bottom());
    let fill = bg.fill_for(state);
    match bg.gradient_for(state).and_then(|id| theme.gradient(id)) {
        Some(gradient) => renderer.fill_rect(target, inner, border.radius, Paint::Gradient(gradient)),
        None if !fill.is_transparent() => {
            renderer.fill_rect(target, inner, border.radius, Paint::Solid(fill))
        }
        None => {}
    }

    let border_color = bg.border_color_for(state);
    if border.width > 0 && !border_color.is_transparent() {
        renderer.stroke_rect(
            target,
            rect,
            border.radius,
            border.width,
            border.sides,
            border_color,
        );
    }
}

/// Content rectangle in area-local coordinates: inside border and padding.
pub fn content_rect(area: &Area, theme: &Theme) -> Rect {
    let border = theme.background(area.background).border;
    let pad = area.padding;
    Rect::new(0, 0, area.width, area.height).inset(
        border.left() + pad.horizontal,
        border.top() + pad.vertical,
        border.right() + pad.horizontal,
        border.bottom() + pad.vertical,
    )
}

#[derive(Debug)]
pub enum Widget {
    Container(Container),
    Panel(Panel),
    Taskbar(Taskbar),
    TaskbarName(TaskbarName),
    Task(Task),
    Launcher(Launcher),
    LauncherIcon(LauncherIcon),
    Systray(Systray),
    TrayIcon(TrayIcon),
    Clock(Clock),
    Battery(Battery),
    Execp(Execp),
    Separator(Separator),
    Button(Button),
    Tooltip(Tooltip),
}

macro_rules! dispatch {
    ($value:expr, $w:ident => $body:expr) => {
        match $value {
            Widget::Container($w) => $body,
            Widget::Panel($w) => $body,
            Widget::Taskbar($w) => $body,
            Widget::TaskbarName($w) => $body,
            Widget::Task($w) => $body,
            Widget::Launcher($w) => $body,
            Widget::LauncherIcon($w) => $body,
            Widget::Systray($w) => $body,
            Widget::TrayIcon($w) => $body,
            Widget::Clock($w) => $body,
            Widget::Battery($w) => $body,
            Widget::Execp($w) => $body,
            Widget::Separator($w) => $body,
            Widget::Button($w) => $body,
            Widget::Tooltip($w) => $body,
        }
    };
}

impl Widget {
    pub fn kind(&self) -> &'static str {
        match self {
            Widget::Container(_) => "container",
            Widget::Panel(_) => "panel",
            Widget::Taskbar(_) => "taskbar",
            Widget::TaskbarName(_) => "taskbar_name",
            Widget::Task(_) => "task",
            Widget::Launcher(_) => "launcher",
            Widget::LauncherIcon(_) => "launcher_icon",
            Widget::Systray(_) => "systray",
            Widget::TrayIcon(_) => "tray_icon",
            Widget::Clock(_) => "clock",
            Widget::Battery(_) => "battery",
            Widget::Execp(_) => "execp",
            Widget::Separator(_) => "separator",
            Widget::Button(_) => "button",
            Widget::Tooltip(_) => "tooltip",
        }
    }

    pub fn as_panel(&self) -> Option<&Panel> {
        match self {
            Widget::Panel(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Widget::Task(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_task_mut(&mut self) -> Option<&mut Task> {
        match self {
            Widget::Task(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_taskbar_mut(&mut self) -> Option<&mut Taskbar> {
        match self {
            Widget::Taskbar(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_clock_mut(&mut self) -> Option<&mut Clock> {
        match self {
            Widget::Clock(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_battery_mut(&mut self) -> Option<&mut Battery> {
        match self {
            Widget::Battery(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_execp_mut(&mut self) -> Option<&mut Execp> {
        match self {
            Widget::Execp(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_systray_mut(&mut self) -> Option<&mut Systray> {
        match self {
            Widget::Systray(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tray_icon(&self) -> Option<&TrayIcon> {
        match self {
            Widget::TrayIcon(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_tooltip_mut(&mut self) -> Option<&mut Tooltip> {
        match self {
            Widget::Tooltip(t) => Some(t),
            _ => None,
        }
    }
}

impl AreaBehavior for Widget {
    fn resize(&mut self, area: &mut Area, ctx: &LayoutContext<'_>, child_count: usize) -> bool {
        dispatch!(self, w => w.resize(area, ctx, child_count))
    }

    fn max_child_extent(&self) -> i32 {
        dispatch!(self, w => w.max_child_extent())
    }

    fn arrange_children(
        &self,
        area: &Area,
        ctx: &LayoutContext<'_>,
        count: usize,
    ) -> Option<Vec<Rect>> {
        dispatch!(self, w => w.arrange_children(area, ctx, count))
    }

    fn on_change_layout(&mut self, area: &Area) {
        dispatch!(self, w => w.on_change_layout(area))
    }

    fn draw_background(
        &mut self,
        area: &Area,
        renderer: &mut dyn Renderer,
        target: PixmapId,
        theme: &Theme,
    ) {
        dispatch!(self, w => w.draw_background(area, renderer, target, theme))
    }

    fn draw_foreground(
        &mut self,
        area: &Area,
        renderer: &mut dyn Renderer,
        target: PixmapId,
        theme: &Theme,
    ) {
        dispatch!(self, w => w.draw_foreground(area, renderer, target, theme))
    }

    fn tooltip_text(&self) -> Option<String> {
        dispatch!(self, w => w.tooltip_text())
    }

    fn handles_click(&self, area: &Area, event: &ClickEvent) -> bool {
        dispatch!(self, w => w.handles_click(area, event))
    }

    fn on_click(&mut self, area: &Area, event: &ClickEvent) -> ClickAction {
        dispatch!(self, w => w.on_click(area, event))
    }

    fn on_remove_child(
        &mut self,
        child: &mut Area,
        child_widget: &mut Widget,
        renderer: &mut dyn Renderer,
    ) {
        dispatch!(self, w => w.on_remove_child(child, child_widget, renderer))
    }

    fn release_resources(&mut self, renderer: &mut dyn Renderer) {
        dispatch!(self, w => w.release_resources(renderer))
    }
}

/// Content-sized extent for a text-like area: content along the main axis,
/// the panel's cross extent across it.
pub(crate) fn resize_to_content(
    area: &mut Area,
    ctx: &LayoutContext<'_>,
    content_width: i32,
    content_height: i32,
) -> bool {
    let border = ctx.theme.background(area.background).border;
    let pad = area.padding;
    let main = if ctx.orientation.is_horizontal() {
        content_width + 2 * pad.horizontal + border.width_lr()
    } else {
        content_height + 2 * pad.vertical + border.width_tb()
    };
    area.set_extent(ctx.orientation, main, ctx.panel_cross)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::SizeMode;
    use crate::headless::{HeadlessRenderer, PaintOp};
    use crate::primitives::{BorderSides, Color};
    use crate::theme::{Background, Border};

    #[test]
    fn test_task_action_names() {
        assert_eq!("toggle_iconify".parse(), Ok(TaskAction::ToggleIconify));
        assert_eq!("none".parse(), Ok(TaskAction::None));
        assert!("explode".parse::<TaskAction>().is_err());
    }

    #[test]
    fn test_button_map_lookup() {
        let commands = ButtonCommands {
            left: Some("xterm".into()),
            ..Default::default()
        };
        assert_eq!(commands.command(MouseButton::Left), Some("xterm"));
        assert_eq!(commands.command(MouseButton::Right), None);
        assert_eq!(commands.command(MouseButton::Other(9)), None);
    }

    #[test]
    fn test_paint_background_uses_hover_fill() {
        let mut theme = Theme::new();
        let bg = theme.add_background(Background {
            fill: Color::BLACK,
            fill_hover: Some(Color::WHITE),
            border: Border {
                color: Color::WHITE,
                width: 1,
                radius: 0,
                sides: BorderSides::ALL,
            },
            ..Default::default()
        });
        let mut area = Area::new("a", SizeMode::ByContent)
            .with_background(bg)
            .with_mouse_effects(true)
            .with_rect(Rect::new(0, 0, 10, 10));
        area.mouse_state = crate::area::MouseState::Hover;

        let mut r = HeadlessRenderer::new();
        let pix = r.create_pixmap(10, 10);
        paint_background(&area, &mut r, pix, &theme);
        assert_eq!(
            r.ops()[0],
            PaintOp::Fill {
                target: pix,
                rect: Rect::new(1, 1, 8, 8),
                color: Some(Color::WHITE),
                gradient: None,
            }
        );
        assert!(matches!(r.ops()[1], PaintOp::Stroke { width: 1, .. }));
    }

    #[test]
    fn test_transparent_background_paints_nothing() {
        let theme = Theme::new();
        let area = Area::new("a", SizeMode::ByContent).with_rect(Rect::new(0, 0, 10, 10));
        let mut r = HeadlessRenderer::new();
        let pix = r.create_pixmap(10, 10);
        paint_background(&area, &mut r, pix, &theme);
        assert!(r.ops().is_empty());
    }
}
