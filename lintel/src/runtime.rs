//! The panel process state driven by the event loop.
//!
//! All panels share one [`AreaTree`]. Event handlers update the tree and
//! the loop's redraw hook composites every panel into a fresh pixmap that
//! becomes the window background. Timers cannot reach the window system,
//! so autohide and tooltip transitions they trigger are recorded and
//! applied on the next redraw.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Timelike};
use lintel_area::widgets::{paint_background, TrayIcon};
use lintel_area::{
    Area, AreaId, AreaSnapshot, AreaTree, ClickAction, ClickEvent, MouseButton, Rect, Renderer,
    SizeMode, Widget,
};
use lintel_kernel::{
    ChildExit, ClientMessage, Display, DndMessage, Event, EventKind, EventLoop, LoopHost,
    MonitorGeometry, PointerEvent, Property, Scheduler, WindowId, WindowSystem,
};
use tracing::{debug, info, trace, warn};

use crate::battery;
use crate::config::{Config, ConfigError};
use crate::launch::{self, CapturedOutput};
use crate::launcher::LauncherLoader;
use crate::panel::{hidden_rect, panel_rect, selected_monitors, PanelBuilder, PanelState};
use crate::tasks::{self, Snapshot, TaskFactory};
use crate::tooltip::{self, TooltipChange, TooltipState};

pub struct Runtime<R: Renderer> {
    pub config: Config,
    pub tree: AreaTree,
    pub renderer: R,
    pub panels: Vec<PanelState>,
    pub tooltip: TooltipState,
    pub snapshot: Snapshot,
    monitors: Vec<MonitorGeometry>,
    tasks: TaskFactory,
    pressed: Option<AreaId>,
    captures: HashMap<AreaId, CapturedOutput>,
    dirty: bool,
}

/// How often a running executor's output pipe is emptied.
const EXECP_DRAIN_PERIOD: Duration = Duration::from_millis(50);

impl<R: Renderer + 'static> Runtime<R> {
    /// Create the panel windows and their trees from `config`.
    pub fn new<W: WindowSystem + ?Sized>(
        config: Config,
        renderer: R,
        ws: &mut W,
    ) -> Result<Self, ConfigError> {
        let snapshot = Snapshot::read(ws);
        let monitors = ws.monitors();
        if monitors.is_empty() {
            warn!("the display reports no monitors, no panel will be shown");
        }

        let launcher_icons = if config.panel.items.contains('L') {
            let loader = LauncherLoader::new(config.launcher.icon_size)?;
            config
                .launcher
                .apps
                .iter()
                .filter_map(|path| loader.load(path))
                .collect()
        } else {
            Vec::new()
        };

        let mut tree = AreaTree::new();
        let builder = PanelBuilder {
            config: &config,
            launcher_icons: &launcher_icons,
            desktop_names: &snapshot.desktop_names,
            current_desktop: snapshot.current_desktop,
        };
        let panels: Vec<PanelState> = selected_monitors(config.panel.monitor, &monitors)
            .iter()
            .map(|(index, monitor)| builder.build(&mut tree, ws, *index, monitor))
            .collect();
        let tooltip = TooltipState::create(&mut tree, ws, &config.tooltip);
        let tasks = TaskFactory {
            style: Rc::new(config.task.style.clone()),
            padding: config.task.padding,
            mouse_effects: config.panel.mouse_effects,
            mode: config.taskbar.mode,
        };
        info!("{} panels created", panels.len());

        let mut runtime = Self {
            config,
            tree,
            renderer,
            panels,
            tooltip,
            snapshot,
            monitors,
            tasks,
            pressed: None,
            captures: HashMap::new(),
            dirty: true,
        };
        runtime.sync_tasks();
        runtime.tick_clocks(&Local::now());
        Ok(runtime)
    }

    /// Route every event kind the panel handles to [`Runtime::handle`].
    pub fn register_handlers<D>(event_loop: &mut EventLoop<Self, D>)
    where
        D: Display + WindowSystem + 'static,
    {
        for kind in [
            EventKind::ButtonPress,
            EventKind::ButtonRelease,
            EventKind::Motion,
            EventKind::Leave,
            EventKind::Expose,
            EventKind::Property,
            EventKind::Configure,
            EventKind::ClientMessage,
        ] {
            event_loop.register_handler(kind, |rt: &mut Self, display: &mut D, scheduler, event| {
                rt.handle(display, scheduler, event)
            });
        }
    }

    /// Arm the clock, battery and executor timers.
    pub fn start_timers(&mut self, scheduler: &mut Scheduler<Self>) {
        if let Some(period) = self.clock_period() {
            let now = Local::now();
            let subsec = Duration::from_nanos(u64::from(now.nanosecond() % 1_000_000_000));
            let mut first = Duration::from_secs(1).saturating_sub(subsec);
            if period > Duration::from_secs(1) {
                first += Duration::from_secs(u64::from(59 - now.second() % 60));
            }
            scheduler.set_interval_after(first, period, |rt: &mut Self, _| {
                rt.tick_clocks(&Local::now());
                true
            });
        }

        if self.panels.iter().any(|p| p.items.battery.is_some()) {
            self.poll_battery();
            scheduler.set_interval(self.config.battery.poll_interval, |rt: &mut Self, _| {
                rt.poll_battery();
                true
            });
        }

        let execps: Vec<(AreaId, u64)> = self
            .panels
            .iter()
            .flat_map(|p| p.items.execps.iter().copied())
            .filter_map(|id| match self.tree.widget(id) {
                Some(Widget::Execp(e)) => Some((id, e.interval)),
                _ => None,
            })
            .collect();
        for (id, interval) in execps {
            if interval == 0 {
                scheduler.set_timeout(Duration::ZERO, move |rt: &mut Self, s| rt.run_execp(id, s));
            } else {
                scheduler.set_interval_after(
                    Duration::ZERO,
                    Duration::from_secs(interval),
                    move |rt: &mut Self, s| {
                        rt.run_execp(id, s);
                        true
                    },
                );
            }
        }
    }

    /// One second if any clock shows seconds, a minute otherwise.
    fn clock_period(&self) -> Option<Duration> {
        let clocks: Vec<bool> = self
            .panels
            .iter()
            .filter_map(|p| p.items.clock)
            .filter_map(|id| match self.tree.widget(id) {
                Some(Widget::Clock(c)) => Some(c.ticks_every_second()),
                _ => None,
            })
            .collect();
        if clocks.is_empty() {
            None
        } else if clocks.iter().any(|&s| s) {
            Some(Duration::from_secs(1))
        } else {
            Some(Duration::from_secs(60))
        }
    }

    pub fn panel_index(&self, window: WindowId) -> Option<usize> {
        self.panels.iter().position(|p| p.window == window)
    }

    /// Laid-out snapshot of every panel.
    pub fn layout_snapshot(&mut self) -> Vec<AreaSnapshot> {
        for panel in &self.panels {
            self.tree.relayout(panel.root, &self.renderer, &self.config.theme);
        }
        self.panels
            .iter()
            .filter_map(|p| self.tree.snapshot(p.root))
            .collect()
    }

    /// Destroy windows and free backend resources ahead of a reload.
    pub fn shutdown<W: WindowSystem + ?Sized>(&mut self, ws: &mut W) {
        for panel in self.panels.drain(..) {
            if let Some(pixmap) = panel.hidden_pixmap {
                self.renderer.free_pixmap(pixmap);
            }
            self.tree.destroy(panel.root, &mut self.renderer);
            ws.destroy_window(panel.window);
        }
        self.tree.destroy(self.tooltip.root, &mut self.renderer);
        ws.destroy_window(self.tooltip.window);
    }

    // --- events ---

    /// Handle an event that autohide did not consume.
    pub fn handle<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        scheduler: &mut Scheduler<Self>,
        event: &Event,
    ) {
        trace!("event {:?}", event);
        match event {
            Event::Motion(p) => self.on_motion(scheduler, p),
            Event::ButtonPress(p) => self.on_press(scheduler, p),
            Event::ButtonRelease(p) => self.on_release(ws, p),
            Event::Leave { window } => self.on_leave(scheduler, *window),
            Event::Enter { .. } => {}
            Event::Expose { window } => self.on_expose(*window),
            Event::Property { property, .. } => self.on_property(ws, property),
            Event::Configure { window, .. } => self.on_configure(ws, *window),
            Event::ClientMessage { message, .. } => self.on_client_message(message),
        }
    }

    fn on_motion(&mut self, scheduler: &mut Scheduler<Self>, p: &PointerEvent) {
        let Some(index) = self.panel_index(p.window) else {
            return;
        };
        let root = self.panels[index].root;
        let area = self.tree.innermost_area_under_point(root, p.x, p.y);
        let pressed = self.pressed.is_some() && self.pressed == area;
        self.tree.mouse_over(area, pressed);

        let g = self.panels[index].geometry;
        self.tooltip.anchor = (g.x + p.x, g.y + p.y);
        self.tooltip.panel = Some(index);
        self.set_tooltip_owner(scheduler, area);
    }

    fn on_press(&mut self, scheduler: &mut Scheduler<Self>, p: &PointerEvent) {
        let Some(index) = self.panel_index(p.window) else {
            return;
        };
        let area = self
            .tree
            .innermost_area_under_point(self.panels[index].root, p.x, p.y);
        self.pressed = area;
        self.tree.mouse_over(area, true);
        self.cancel_tooltip_timer(scheduler);
        if self.tooltip.visible {
            self.tooltip.pending = Some(TooltipChange::Hide);
        }
    }

    fn on_release<W: WindowSystem + ?Sized>(&mut self, ws: &mut W, p: &PointerEvent) {
        let Some(index) = self.panel_index(p.window) else {
            return;
        };
        let root = self.panels[index].root;
        let area = self.tree.innermost_area_under_point(root, p.x, p.y);
        self.pressed = None;
        self.tree.mouse_over(area, false);

        let event = ClickEvent {
            x: p.x,
            y: p.y,
            button: MouseButton::from_index(p.button),
        };
        if let Some((id, action)) = self.tree.click(root, &event) {
            self.perform(ws, index, id, action, p);
        }
    }

    fn perform<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        panel: usize,
        area: AreaId,
        action: ClickAction,
        p: &PointerEvent,
    ) {
        match action {
            ClickAction::None => {}
            ClickAction::Spawn(command) => {
                launch::launch(&command);
            }
            ClickAction::Task { window, action } => {
                tasks::perform(ws, &self.tree, area, window, action, &self.snapshot);
            }
            ClickAction::ForwardToRoot => {
                let g = self.panels[panel].geometry;
                ws.forward_to_root(g.x + p.x, g.y + p.y, p.button);
            }
        }
    }

    fn on_leave(&mut self, scheduler: &mut Scheduler<Self>, window: WindowId) {
        if self.panel_index(window).is_none() {
            return;
        }
        self.tree.mouse_leave();
        self.pressed = None;
        self.set_tooltip_owner(scheduler, None);
    }

    fn on_expose(&mut self, window: WindowId) {
        if self.panel_index(window).is_some() || window == self.tooltip.window {
            self.dirty = true;
        }
    }

    fn on_property<W: WindowSystem + ?Sized>(&mut self, ws: &mut W, property: &Property) {
        match property {
            Property::WindowIcon | Property::Other(_) => {}
            _ => self.refresh_snapshot(ws),
        }
    }

    /// Re-read the window manager state and update every taskbar.
    pub fn refresh_snapshot<W: WindowSystem + ?Sized>(&mut self, ws: &mut W) {
        self.snapshot = Snapshot::read(ws);
        self.ensure_taskbars();
        if self.sync_tasks() {
            self.dirty = true;
        }
    }

    /// Rebuild the taskbars of panels whose desktop count went stale.
    fn ensure_taskbars(&mut self) {
        if !self.config.panel.items.contains('T') {
            return;
        }
        let desktops = self.snapshot.desktop_names.len().max(1);
        let builder = PanelBuilder {
            config: &self.config,
            launcher_icons: &[],
            desktop_names: &self.snapshot.desktop_names,
            current_desktop: self.snapshot.current_desktop,
        };
        for panel in &mut self.panels {
            if panel.items.taskbars.len() == desktops {
                continue;
            }
            debug!("desktop count changed to {}, rebuilding taskbars", desktops);
            for id in panel.items.taskbars.drain(..) {
                self.tree.destroy(id, &mut self.renderer);
            }
            panel.items.taskbars = builder.build_taskbars(&mut self.tree);
            self.tree
                .set_items_order(panel.root, &self.config.panel.items, &panel.items);
        }
    }

    fn sync_tasks(&mut self) -> bool {
        let mut changed = false;
        for panel in &self.panels {
            changed |= self.tasks.sync(
                &mut self.tree,
                &panel.items.taskbars,
                &self.snapshot,
                &mut self.renderer,
            );
        }
        changed
    }

    /// A configure on anything but our own windows may mean the screen
    /// layout changed.
    fn on_configure<W: WindowSystem + ?Sized>(&mut self, ws: &mut W, window: WindowId) {
        if self.panel_index(window).is_some() || window == self.tooltip.window {
            return;
        }
        let monitors = ws.monitors();
        if monitors == self.monitors {
            return;
        }
        info!("monitor layout changed: {} monitors", monitors.len());
        for panel in &mut self.panels {
            let Some(monitor) = monitors.get(panel.monitor) else {
                continue;
            };
            panel.geometry = panel_rect(&self.config.panel, monitor);
            panel.hidden_geometry = hidden_rect(&self.config.panel, panel.geometry);
            if let Some(pixmap) = panel.hidden_pixmap.take() {
                self.renderer.free_pixmap(pixmap);
            }
            let r = panel.window_rect();
            ws.move_resize(panel.window, r.x, r.y, r.width, r.height);
            if let Some(root) = self.tree.get_mut(panel.root) {
                root.set_rect(Rect::new(0, 0, panel.geometry.width, panel.geometry.height));
            }
            self.tree.request_resize(panel.root);
            self.tree.set_redraw(panel.root);
        }
        self.monitors = monitors;
        self.dirty = true;
    }

    fn on_client_message(&mut self, message: &ClientMessage) {
        match message {
            ClientMessage::SystrayDock { icon } => self.dock_tray_icon(*icon),
            ClientMessage::Dnd(_) => {}
            ClientMessage::Other(name) => trace!("ignoring client message {}", name),
        }
    }

    /// Embed a tray client in the first panel that has a systray.
    fn dock_tray_icon(&mut self, window: WindowId) {
        let Some(systray) = self.panels.iter().find_map(|p| p.items.systray) else {
            debug!("no systray to dock {:#x} into", window);
            return;
        };
        let docked = self.tree.children(systray).into_iter().any(|id| {
            self.tree
                .widget(id)
                .and_then(Widget::as_tray_icon)
                .is_some_and(|icon| icon.window == window)
        });
        if docked {
            return;
        }
        let id = self.tree.insert(
            Area::new(format!("tray {window:#x}"), SizeMode::ByContent),
            Widget::TrayIcon(TrayIcon { window }),
        );
        self.tree.add_child(systray, id);
        if let Some(Widget::Systray(s)) = self.tree.widget_mut(systray) {
            s.request_refresh();
        }
        self.tree.request_resize(systray);
        debug!("tray icon {:#x} docked", window);
    }

    // --- autohide ---

    /// Autohide's view of an event. Returns true if it was consumed.
    ///
    /// Pointer events on a hidden panel are swallowed. Drag-and-drop
    /// messages are always consumed: entering shows a hidden panel and
    /// leaving hides it again.
    pub fn intercept_event<W: WindowSystem + ?Sized>(
        &mut self,
        ws: &mut W,
        scheduler: &mut Scheduler<Self>,
        event: &Event,
    ) -> bool {
        if !self.config.panel.autohide.enabled {
            return false;
        }
        let Some(index) = self.panel_index(event.window()) else {
            return false;
        };
        match event {
            Event::Enter { .. } => {
                self.schedule_autohide(index, scheduler, false);
                false
            }
            Event::Leave { .. } => {
                self.schedule_autohide(index, scheduler, true);
                false
            }
            Event::ClientMessage {
                message: ClientMessage::Dnd(dnd),
                ..
            } => {
                match dnd {
                    DndMessage::Enter { .. } => {
                        self.cancel_autohide(index, scheduler);
                        self.set_hidden(ws, index, false);
                    }
                    DndMessage::Leave => {
                        self.cancel_autohide(index, scheduler);
                        self.set_hidden(ws, index, true);
                    }
                    DndMessage::Position { .. } | DndMessage::Drop => {}
                }
                true
            }
            Event::ButtonPress(_) | Event::ButtonRelease(_) | Event::Motion(_) => {
                self.panels[index].hidden
            }
            _ => false,
        }
    }

    fn cancel_autohide(&mut self, index: usize, scheduler: &mut Scheduler<Self>) {
        let panel = &mut self.panels[index];
        if let Some(timer) = panel.autohide_timer.take() {
            scheduler.clear_interval(timer);
        }
        panel.pending_hidden = None;
    }

    /// Hide or show `index` after the configured delay.
    fn schedule_autohide(&mut self, index: usize, scheduler: &mut Scheduler<Self>, hide: bool) {
        self.cancel_autohide(index, scheduler);
        if self.panels[index].hidden == hide {
            return;
        }
        let delay = if hide {
            self.config.panel.autohide.hide_timeout
        } else {
            self.config.panel.autohide.show_timeout
        };
        let timer = scheduler.set_timeout(delay, move |rt: &mut Self, _| {
            if let Some(panel) = rt.panels.get_mut(index) {
                panel.autohide_timer = None;
                panel.pending_hidden = Some(hide);
            }
        });
        self.panels[index].autohide_timer = Some(timer);
    }

    fn set_hidden<W: WindowSystem + ?Sized>(&mut self, ws: &mut W, index: usize, hidden: bool) {
        let panel = &mut self.panels[index];
        if panel.hidden == hidden {
            return;
        }
        panel.hidden = hidden;
        let r = panel.window_rect();
        ws.move_resize(panel.window, r.x, r.y, r.width, r.height);
        debug!("autohide on panel {:#x}: hidden={}", panel.window, hidden);
        self.tree.set_redraw(panel.root);
        self.dirty = true;
    }

    fn apply_autohide<W: WindowSystem + ?Sized>(&mut self, ws: &mut W) {
        for index in 0..self.panels.len() {
            if let Some(hidden) = self.panels[index].pending_hidden.take() {
                self.set_hidden(ws, index, hidden);
            }
        }
    }

    // --- tooltip ---

    fn cancel_tooltip_timer(&mut self, scheduler: &mut Scheduler<Self>) {
        if let Some(timer) = self.tooltip.timer.take() {
            scheduler.clear_interval(timer);
        }
    }

    /// Track the area under the pointer for the tooltip. A tooltip that is
    /// already up follows the pointer at once; otherwise it appears after
    /// the show delay and goes away after the hide delay.
    fn set_tooltip_owner(&mut self, scheduler: &mut Scheduler<Self>, area: Option<AreaId>) {
        let area = area.filter(|&a| self.tree.tooltip_text(a).is_some());
        if self.tooltip.owner == area {
            return;
        }
        self.tooltip.owner = area;
        self.cancel_tooltip_timer(scheduler);

        let (change, delay) = match (area, self.tooltip.visible) {
            (Some(_), true) => {
                self.tooltip.pending = Some(TooltipChange::Show);
                self.dirty = true;
                return;
            }
            (Some(_), false) => (TooltipChange::Show, self.config.tooltip.show_timeout),
            (None, true) => (TooltipChange::Hide, self.config.tooltip.hide_timeout),
            (None, false) => return,
        };
        let timer = scheduler.set_timeout(delay, move |rt: &mut Self, _| {
            rt.tooltip.timer = None;
            rt.tooltip.pending = Some(change);
        });
        self.tooltip.timer = Some(timer);
    }

    fn show_tooltip<W: WindowSystem + ?Sized>(&mut self, ws: &mut W) {
        let text = self.tooltip.owner.and_then(|a| self.tree.tooltip_text(a));
        let (Some(text), Some(index)) = (text, self.tooltip.panel) else {
            self.hide_tooltip(ws);
            return;
        };
        self.tooltip.set_text(&mut self.tree, &text);
        self.tree
            .relayout(self.tooltip.root, &self.renderer, &self.config.theme);
        let Some(size) = self.tree.get(self.tooltip.root).map(|a| (a.width, a.height)) else {
            return;
        };
        let Some(panel) = self.panels.get(index) else {
            return;
        };
        let monitor = self
            .monitors
            .get(panel.monitor)
            .copied()
            .unwrap_or_default();
        let orientation = panel.orientation(&self.tree);
        let r = tooltip::place(size, self.tooltip.anchor, panel.geometry, orientation, &monitor);
        ws.move_resize(self.tooltip.window, r.x, r.y, r.width, r.height);
        if !self.tooltip.visible {
            ws.map_window(self.tooltip.window);
            self.tooltip.visible = true;
        }
        self.render_tooltip(ws);
    }

    fn hide_tooltip<W: WindowSystem + ?Sized>(&mut self, ws: &mut W) {
        if self.tooltip.visible {
            ws.unmap_window(self.tooltip.window);
            self.tooltip.visible = false;
        }
    }

    fn render_tooltip<W: WindowSystem + ?Sized>(&mut self, ws: &mut W) {
        let Some(area) = self.tree.get(self.tooltip.root) else {
            return;
        };
        let (width, height) = (area.width.max(1), area.height.max(1));
        let target = self.renderer.create_pixmap(width, height);
        self.tree.draw_tree(
            self.tooltip.root,
            &mut self.renderer,
            &self.config.theme,
            target,
        );
        ws.set_background(self.tooltip.window, target.0);
        self.renderer.free_pixmap(target);
    }

    // --- timers ---

    /// Update every clock for `now`.
    pub fn tick_clocks<Tz: TimeZone>(&mut self, now: &DateTime<Tz>)
    where
        Tz::Offset: std::fmt::Display,
    {
        let clocks: Vec<AreaId> = self.panels.iter().filter_map(|p| p.items.clock).collect();
        for id in clocks {
            let changed = self.tree.node_mut(id).is_some_and(|n| match &mut n.widget {
                Widget::Clock(clock) => clock.update(&mut n.area, now),
                _ => false,
            });
            if changed {
                self.tree.request_resize(id);
            }
        }
    }

    /// Read the battery and update every battery item.
    pub fn poll_battery(&mut self) {
        let Some(state) = battery::read_battery(&self.config.battery.sysfs_root) else {
            trace!("no battery found");
            return;
        };
        let items: Vec<(AreaId, AreaId)> = self
            .panels
            .iter()
            .filter_map(|p| p.items.battery.map(|b| (p.root, b)))
            .collect();
        let mut low_command = None;
        for (root, id) in items {
            let Some(update) = self.tree.node_mut(id).and_then(|n| match &mut n.widget {
                Widget::Battery(b) => Some(b.update(&mut n.area, state)),
                _ => None,
            }) else {
                continue;
            };
            if update.changed {
                self.tree.request_resize(id);
            }
            if update.visibility_changed {
                self.tree.request_resize(root);
                self.tree.set_redraw(root);
            }
            low_command = low_command.or(update.low_command);
        }
        if let Some(command) = low_command {
            info!("battery low: {}%", state.percentage);
            launch::launch(&command);
        }
    }

    /// Start an executor's command unless one is still running. Its
    /// output is drained while the child runs and replaces the displayed
    /// text when the child exits.
    pub fn run_execp(&mut self, id: AreaId, scheduler: &mut Scheduler<Self>) {
        let command = match self.tree.widget(id) {
            Some(Widget::Execp(e)) if !e.is_running() => e.command.clone(),
            Some(Widget::Execp(_)) => {
                trace!("executor {:?} still running, skipping tick", id);
                return;
            }
            _ => return,
        };
        match launch::spawn_captured(&command) {
            Ok((pid, output)) => {
                if let Some(Widget::Execp(e)) = self.tree.widget_mut(id) {
                    e.set_running(true);
                }
                self.captures.insert(id, output);
                scheduler.set_interval(EXECP_DRAIN_PERIOD, move |rt: &mut Self, _| {
                    rt.drain_execp(id)
                });
                scheduler.watch_child(pid, move |rt: &mut Self, _, exit| {
                    rt.execp_finished(id, exit)
                });
            }
            Err(e) => warn!("failed to run executor '{}': {}", command, e),
        }
    }

    /// Empty a running executor's pipe. Returns false once the executor
    /// has finished, ending the drain interval.
    fn drain_execp(&mut self, id: AreaId) -> bool {
        match self.captures.get_mut(&id) {
            Some(output) => {
                output.drain();
                true
            }
            None => false,
        }
    }

    fn execp_finished(&mut self, id: AreaId, exit: &ChildExit) {
        let output = self
            .captures
            .remove(&id)
            .map(CapturedOutput::finish)
            .unwrap_or_default();
        if !exit.success() {
            debug!("executor {} exited with failure: {:?}", exit.pid, exit.code);
        }
        let changed = self.tree.node_mut(id).is_some_and(|n| match &mut n.widget {
            Widget::Execp(e) => {
                e.set_running(false);
                e.set_output(&mut n.area, &output)
            }
            _ => false,
        });
        if changed {
            self.tree.request_resize(id);
        }
    }

    // --- drawing ---

    fn render<W: WindowSystem + ?Sized>(&mut self, ws: &mut W) {
        self.apply_autohide(ws);
        for index in 0..self.panels.len() {
            self.render_panel(ws, index);
        }
        match self.tooltip.pending.take() {
            Some(TooltipChange::Show) => self.show_tooltip(ws),
            Some(TooltipChange::Hide) => self.hide_tooltip(ws),
            None if self.tooltip.visible && self.tree.needs_refresh() => self.show_tooltip(ws),
            None => {}
        }
        self.tree.mark_refreshed();
        self.dirty = false;
    }

    /// Composite a panel into a fresh pixmap and make it the window
    /// background. A hidden panel shows only its background.
    fn render_panel<W: WindowSystem + ?Sized>(&mut self, ws: &mut W, index: usize) {
        let panel = &mut self.panels[index];
        if panel.hidden {
            let pixmap = match panel.hidden_pixmap {
                Some(pixmap) => pixmap,
                None => {
                    let r = panel.hidden_geometry;
                    let pixmap = self.renderer.create_pixmap(r.width, r.height);
                    let strip = Area::new("hidden panel", SizeMode::ByLayout)
                        .with_background(self.config.panel.background)
                        .with_rect(Rect::new(0, 0, r.width, r.height));
                    paint_background(&strip, &mut self.renderer, pixmap, &self.config.theme);
                    panel.hidden_pixmap = Some(pixmap);
                    pixmap
                }
            };
            ws.set_background(panel.window, pixmap.0);
            return;
        }

        self.tree
            .relayout(panel.root, &self.renderer, &self.config.theme);
        let g = panel.geometry;
        let target = self.renderer.create_pixmap(g.width, g.height);
        self.tree
            .draw_tree(panel.root, &mut self.renderer, &self.config.theme, target);
        ws.set_background(panel.window, target.0);
        self.renderer.free_pixmap(target);
        self.place_tray_icons(ws, index);
    }

    /// Move tray client windows onto the rectangles the systray laid out.
    fn place_tray_icons<W: WindowSystem + ?Sized>(&mut self, ws: &mut W, index: usize) {
        let Some(systray) = self.panels[index].items.systray else {
            return;
        };
        let stale = matches!(self.tree.widget(systray), Some(Widget::Systray(s)) if s.needs_refresh());
        if !stale {
            return;
        }
        for id in self.tree.children(systray) {
            let Some(node) = self.tree.node(id) else {
                continue;
            };
            let Some(icon) = node.widget.as_tray_icon() else {
                continue;
            };
            let a = &node.area;
            if a.on_screen && a.width > 0 && a.height > 0 {
                ws.move_resize(icon.window, a.x, a.y, a.width, a.height);
                ws.map_window(icon.window);
            } else {
                ws.unmap_window(icon.window);
            }
        }
        if let Some(Widget::Systray(s)) = self.tree.widget_mut(systray) {
            s.mark_refreshed();
        }
    }
}

impl<R, D> LoopHost<D> for Runtime<R>
where
    R: Renderer + 'static,
    D: Display + WindowSystem,
{
    fn intercept(&mut self, display: &mut D, scheduler: &mut Scheduler<Self>, event: &Event) -> bool {
        self.intercept_event(display, scheduler, event)
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
            || self.tree.needs_refresh()
            || self.tooltip.pending.is_some()
            || self.panels.iter().any(|p| p.pending_hidden.is_some())
    }

    fn redraw(&mut self, display: &mut D) {
        self.render(display);
    }

    fn child_exited(&mut self, _scheduler: &mut Scheduler<Self>, exit: &ChildExit) {
        debug!("child {} exited: code {:?}, signal {:?}", exit.pid, exit.code, exit.signal);
    }
}
