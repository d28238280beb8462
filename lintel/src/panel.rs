//! Panel geometry and construction.
//!
//! Each panel is a window on one monitor whose area tree root holds the
//! items named by `panel_items`.

use lintel_area::widgets::{
    Battery, Button, Clock, Execp, Launcher, LauncherIcon, Panel, Separator, Systray, Taskbar,
    TaskbarName, TextStyle,
};
use lintel_area::{
    Area, AreaId, AreaTree, Orientation, PanelItems, PixmapId, Rect, SizeMode, TextAlign, Widget,
};
use lintel_kernel::{MonitorGeometry, TimerId, WindowId, WindowSystem};
use tracing::{debug, info};

use crate::config::{
    Config, HorizontalPosition, MonitorSelection, PanelConfig, TaskbarMode, TextConfig,
    VerticalPosition,
};

/// Runtime state of one panel.
#[derive(Debug)]
pub struct PanelState {
    pub monitor: usize,
    pub root: AreaId,
    pub window: WindowId,
    pub geometry: Rect,
    /// Where the window sits while autohidden.
    pub hidden_geometry: Rect,
    pub hidden: bool,
    /// Autohide transition waiting to be applied to the window.
    pub pending_hidden: Option<bool>,
    pub autohide_timer: Option<TimerId>,
    pub hidden_pixmap: Option<PixmapId>,
    pub items: PanelItems,
}

impl PanelState {
    pub fn orientation(&self, tree: &AreaTree) -> Orientation {
        match tree.widget(self.root) {
            Some(Widget::Panel(p)) => p.orientation,
            _ => Orientation::Horizontal,
        }
    }

    /// Current window rectangle.
    pub fn window_rect(&self) -> Rect {
        if self.hidden {
            self.hidden_geometry
        } else {
            self.geometry
        }
    }
}

/// Monitors the configuration places a panel on.
pub fn selected_monitors(
    selection: MonitorSelection,
    monitors: &[MonitorGeometry],
) -> Vec<(usize, MonitorGeometry)> {
    match selection {
        MonitorSelection::All => monitors.iter().copied().enumerate().collect(),
        MonitorSelection::Index(i) => match monitors.get(i) {
            Some(m) => vec![(i, *m)],
            None => {
                info!("monitor {} not present, using the first one", i + 1);
                monitors.iter().copied().take(1).enumerate().collect()
            }
        },
    }
}

/// Screen rectangle of a panel on `monitor`. The configured width runs
/// along the panel's main axis.
pub fn panel_rect(config: &PanelConfig, monitor: &MonitorGeometry) -> Rect {
    let o = config.position.orientation;
    let (main_total, cross_total) = if o.is_horizontal() {
        (monitor.width, monitor.height)
    } else {
        (monitor.height, monitor.width)
    };
    let main = config.width.resolve(main_total).clamp(1, main_total.max(1));
    let cross = config.height.resolve(cross_total).clamp(1, cross_total.max(1));
    let (width, height) = if o.is_horizontal() {
        (main, cross)
    } else {
        (cross, main)
    };
    let (mx, my) = config.margin;

    let x = match config.position.horizontal {
        HorizontalPosition::Left => monitor.x + mx,
        HorizontalPosition::Center => monitor.x + (monitor.width - width) / 2,
        HorizontalPosition::Right => monitor.x + monitor.width - width - mx,
    };
    let y = match config.position.vertical {
        VerticalPosition::Top => monitor.y + my,
        VerticalPosition::Center => monitor.y + (monitor.height - height) / 2,
        VerticalPosition::Bottom => monitor.y + monitor.height - height - my,
    };
    Rect::new(x, y, width, height)
}

/// The strip left on screen while a panel is autohidden, on the screen
/// edge the panel is attached to.
pub fn hidden_rect(config: &PanelConfig, shown: Rect) -> Rect {
    let strip = config.autohide.height.max(1);
    if config.position.orientation.is_horizontal() {
        let y = match config.position.vertical {
            VerticalPosition::Top => shown.y,
            _ => shown.bottom() - strip,
        };
        Rect::new(shown.x, y, shown.width, strip)
    } else {
        let x = match config.position.horizontal {
            HorizontalPosition::Left => shown.x,
            _ => shown.right() - strip,
        };
        Rect::new(x, shown.y, strip, shown.height)
    }
}

fn text_style(text: &TextConfig) -> TextStyle {
    TextStyle {
        color: text.color,
        align: TextAlign::Center,
    }
}

fn text_area(name: &str, text: &TextConfig, mouse_effects: bool) -> Area {
    Area::new(name, SizeMode::ByContent)
        .with_padding(text.padding)
        .with_background(text.background)
        .with_mouse_effects(mouse_effects)
}

/// Builds panels and their items into a shared tree.
pub struct PanelBuilder<'a> {
    pub config: &'a Config,
    pub launcher_icons: &'a [LauncherIcon],
    pub desktop_names: &'a [String],
    pub current_desktop: usize,
}

impl PanelBuilder<'_> {
    /// Create the window and area tree of a panel on `monitor`.
    pub fn build<W: WindowSystem + ?Sized>(
        &self,
        tree: &mut AreaTree,
        ws: &mut W,
        monitor_index: usize,
        monitor: &MonitorGeometry,
    ) -> PanelState {
        let cfg = &self.config.panel;
        let geometry = panel_rect(cfg, monitor);
        let hidden_geometry = hidden_rect(cfg, geometry);
        let hidden = cfg.autohide.enabled;
        let window_rect = if hidden { hidden_geometry } else { geometry };
        let window = ws.create_window(
            window_rect.x,
            window_rect.y,
            window_rect.width,
            window_rect.height,
        );

        let mut panel = Panel::new(cfg.position.orientation, monitor_index);
        panel.wm_menu = cfg.wm_menu;
        let root = tree.insert(
            Area::new(format!("panel {}", monitor_index + 1), SizeMode::ByLayout)
                .with_rect(Rect::new(0, 0, geometry.width, geometry.height))
                .with_padding(cfg.padding)
                .with_background(cfg.background),
            Widget::Panel(panel),
        );

        let items = self.build_items(tree);
        tree.set_items_order(root, &cfg.items, &items);
        ws.map_window(window);
        debug!("panel {:#x} created on monitor {}: {:?}", window, monitor_index, geometry);

        PanelState {
            monitor: monitor_index,
            root,
            window,
            geometry,
            hidden_geometry,
            hidden,
            pending_hidden: None,
            autohide_timer: None,
            hidden_pixmap: None,
            items,
        }
    }

    fn build_items(&self, tree: &mut AreaTree) -> PanelItems {
        let order = self.config.panel.items.as_str();
        let mut items = PanelItems::default();
        if order.contains('L') {
            items.launcher = Some(self.build_launcher(tree));
        }
        if order.contains('T') {
            items.taskbars = self.build_taskbars(tree);
        }
        if order.contains('S') {
            items.systray = Some(self.build_systray(tree));
        }
        if order.contains('C') {
            items.clock = self.build_clock(tree);
        }
        if order.contains('B') {
            items.battery = Some(self.build_battery(tree));
        }
        let separators = order.matches(':').count();
        items.separators = self.config.separators[..separators.min(self.config.separators.len())]
            .iter()
            .map(|s| {
                let area = Area::new("separator", SizeMode::ByContent)
                    .with_padding(s.padding)
                    .with_background(s.background);
                tree.insert(area, Widget::Separator(Separator::new(s.style, s.size, s.color)))
            })
            .collect();
        let execps = order.matches('E').count();
        items.execps = self.config.execps[..execps.min(self.config.execps.len())]
            .iter()
            .map(|e| {
                let mut execp = Execp::new(e.command.clone(), e.interval, e.font.clone());
                execp.style = text_style(&e.text);
                execp.commands = e.text.commands.clone();
                execp.tooltip = e.tooltip.clone();
                tree.insert(
                    text_area("execp", &e.text, self.config.panel.mouse_effects),
                    Widget::Execp(execp),
                )
            })
            .collect();
        let buttons = order.matches('P').count();
        items.buttons = self.config.buttons[..buttons.min(self.config.buttons.len())]
            .iter()
            .map(|b| {
                let mut button = Button::new(b.text.as_deref(), b.icon.clone(), b.font.clone());
                button.style = text_style(&b.style);
                button.commands = b.style.commands.clone();
                button.tooltip = b.tooltip.clone();
                tree.insert(
                    text_area("button", &b.style, self.config.panel.mouse_effects),
                    Widget::Button(button),
                )
            })
            .collect();
        items
    }

    fn build_launcher(&self, tree: &mut AreaTree) -> AreaId {
        let cfg = &self.config.launcher;
        let launcher = tree.insert(
            Area::new("launcher", SizeMode::ByContent)
                .with_padding(cfg.padding)
                .with_background(cfg.background),
            Widget::Launcher(Launcher::new(cfg.icon_size, cfg.padding.spacing)),
        );
        for icon in self.launcher_icons {
            let mut icon = icon.clone();
            icon.adjust = cfg.adjust;
            icon.tooltip_enabled = cfg.tooltip;
            let area = Area::new(icon.name.clone(), SizeMode::ByContent)
                .with_mouse_effects(self.config.panel.mouse_effects);
            let id = tree.insert(area, Widget::LauncherIcon(icon));
            tree.add_child(launcher, id);
        }
        launcher
    }

    /// One taskbar per desktop. In single-desktop mode only the current
    /// desktop's taskbar is shown.
    pub fn build_taskbars(&self, tree: &mut AreaTree) -> Vec<AreaId> {
        let cfg = &self.config.taskbar;
        let o = self.config.panel.position.orientation;
        let (max_w, max_h) = self.config.task.maximum_size;
        let desktops = self.desktop_names.len().max(1);

        (0..desktops)
            .map(|desktop| {
                let mut taskbar = Taskbar::new(desktop);
                taskbar.active_background = cfg.active_background;
                taskbar.inactive_background = cfg.background;
                taskbar.max_task_extent = o.main(max_w, max_h);
                let mut area = Area::new(format!("taskbar {}", desktop + 1), SizeMode::ByLayout)
                    .with_padding(cfg.padding)
                    .with_background(cfg.background);
                let current = desktop == self.current_desktop;
                taskbar.set_active(&mut area, current);
                if cfg.mode == TaskbarMode::SingleDesktop {
                    area.on_screen = current;
                }
                let id = tree.insert(area, Widget::Taskbar(taskbar));

                if cfg.show_name {
                    let label = self
                        .desktop_names
                        .get(desktop)
                        .cloned()
                        .unwrap_or_else(|| (desktop + 1).to_string());
                    let mut name = TaskbarName::new(label, cfg.name_font.clone());
                    name.style.color = cfg.name_color;
                    let name_area = Area::new("taskbar name", SizeMode::ByContent)
                        .with_padding(cfg.name_padding)
                        .with_background(cfg.name_background);
                    let name_id = tree.insert(name_area, Widget::TaskbarName(name));
                    tree.add_child(id, name_id);
                }
                id
            })
            .collect()
    }

    fn build_systray(&self, tree: &mut AreaTree) -> AreaId {
        let cfg = &self.config.systray;
        tree.insert(
            Area::new("systray", SizeMode::ByContent)
                .with_padding(cfg.padding)
                .with_background(cfg.background),
            Widget::Systray(Systray::new(cfg.icon_size, cfg.padding.spacing)),
        )
    }

    fn build_clock(&self, tree: &mut AreaTree) -> Option<AreaId> {
        let cfg = &self.config.clock;
        let format = cfg.time1_format.as_ref()?;
        let mut clock = Clock::new(format.clone(), cfg.time1_font.clone());
        clock.time2_format = cfg.time2_format.clone();
        clock.time2_font = cfg.time2_font.clone();
        clock.tooltip_format = cfg.tooltip_format.clone();
        clock.style = text_style(&cfg.text);
        clock.commands = cfg.text.commands.clone();
        Some(tree.insert(
            text_area("clock", &cfg.text, self.config.panel.mouse_effects),
            Widget::Clock(clock),
        ))
    }

    fn build_battery(&self, tree: &mut AreaTree) -> AreaId {
        let cfg = &self.config.battery;
        let mut battery = Battery::new(cfg.font1.clone(), cfg.font2.clone());
        battery.hide_above = cfg.hide_above;
        battery.low_threshold = cfg.low_threshold;
        battery.low_command = cfg.low_command.clone();
        battery.style = text_style(&cfg.text);
        battery.commands = cfg.text.commands.clone();
        tree.insert(
            text_area("battery", &cfg.text, self.config.panel.mouse_effects),
            Widget::Battery(battery),
        )
    }
}
