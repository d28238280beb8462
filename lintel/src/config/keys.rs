//! Per-key handlers.
//!
//! Sections that can repeat (`rounded`, `gradient`, `separator`, `execp`,
//! `button`) are opened by their leading key; later keys of that family
//! modify the most recently opened one.

use std::path::PathBuf;
use std::str::FromStr;

use lintel_area::widgets::{ButtonCommands, SeparatorStyle, TaskState};
use lintel_area::{
    Background, BackgroundId, BorderSides, Color, FontSpec, Gradient, GradientId, GradientKind,
    Orientation, TaskAction, Theme,
};

use super::values::{
    parse_adjust, parse_bool, parse_color, parse_command, parse_index, parse_int, parse_ints,
    parse_padding, parse_period, parse_seconds, Dimension,
};
use super::{
    ButtonConfig, Config, ConfigError, ExecpConfig, HorizontalPosition, MonitorSelection,
    SeparatorConfig, TaskbarMode, TextConfig, VerticalPosition,
};

type Result<T> = std::result::Result<T, ConfigError>;

/// Accumulates entries into a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
    backgrounds: Vec<Background>,
    gradients: Vec<Gradient>,
}

fn require<T>(value: Option<T>, key: &str, raw: &str) -> Result<T> {
    value.ok_or_else(|| ConfigError::invalid(key, raw))
}

/// The slot a `<prefix>_{l,m,r}click_command` / `_{u,d}wheel_command`
/// suffix refers to.
fn command_slot<'a>(commands: &'a mut ButtonCommands, suffix: &str) -> Option<&'a mut Option<String>> {
    match suffix {
        "lclick_command" => Some(&mut commands.left),
        "mclick_command" => Some(&mut commands.middle),
        "rclick_command" => Some(&mut commands.right),
        "uwheel_command" => Some(&mut commands.scroll_up),
        "dwheel_command" => Some(&mut commands.scroll_down),
        _ => None,
    }
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a config background index. Index 0 is transparent.
    fn background_id(&self, key: &str, raw: &str) -> Result<BackgroundId> {
        match parse_index(raw) {
            Some(i) if i <= self.backgrounds.len() => Ok(BackgroundId(i)),
            _ => Err(ConfigError::invalid(key, raw)),
        }
    }

    /// Resolve a 1-based gradient index. Index 0 means none.
    fn gradient_id(&self, key: &str, raw: &str) -> Result<Option<GradientId>> {
        match parse_index(raw) {
            Some(0) => Ok(None),
            Some(i) if i <= self.gradients.len() => Ok(Some(GradientId(i - 1))),
            _ => Err(ConfigError::invalid(key, raw)),
        }
    }

    fn last_background(&mut self, key: &str) -> Result<&mut Background> {
        self.backgrounds.last_mut().ok_or_else(|| ConfigError::NoSection {
            key: key.to_string(),
            section: "background",
        })
    }

    fn last_gradient(&mut self, key: &str) -> Result<&mut Gradient> {
        self.gradients.last_mut().ok_or_else(|| ConfigError::NoSection {
            key: key.to_string(),
            section: "gradient",
        })
    }

    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "gradient" | "start_color" | "end_color" | "color_stop" => self.apply_gradient(key, value),
            "rounded" | "border_width" | "border_sides" | "border_color" | "border_color_hover"
            | "border_color_pressed" | "background_color" | "background_color_hover"
            | "background_color_pressed" | "gradient_id" | "gradient_id_hover"
            | "gradient_id_pressed" => self.apply_background(key, value),
            "mouse_effects" => {
                self.config.panel.mouse_effects = require(parse_bool(value), key, value)?;
                Ok(())
            }
            "wm_menu" => {
                self.config.panel.wm_menu = require(parse_bool(value), key, value)?;
                Ok(())
            }
            "time1_format" => {
                self.config.clock.time1_format = parse_command(value);
                Ok(())
            }
            "time2_format" => {
                self.config.clock.time2_format = parse_command(value);
                Ok(())
            }
            "time1_font" => {
                self.config.clock.time1_font = FontSpec::new(value);
                Ok(())
            }
            "time2_font" => {
                self.config.clock.time2_font = FontSpec::new(value);
                Ok(())
            }
            "bat1_font" => {
                self.config.battery.font1 = FontSpec::new(value);
                Ok(())
            }
            "bat2_font" => {
                self.config.battery.font2 = FontSpec::new(value);
                Ok(())
            }
            "separator" => self.open_section(key, value, |c| c.separators.push(SeparatorConfig::default())),
            "execp" => self.open_section(key, value, |c| c.execps.push(ExecpConfig::default())),
            "button" => self.open_section(key, value, |c| c.buttons.push(ButtonConfig::default())),
            _ => self.apply_prefixed(key, value),
        }
    }

    fn open_section(&mut self, key: &str, value: &str, open: impl FnOnce(&mut Config)) -> Result<()> {
        if value.trim() != "new" {
            return Err(ConfigError::invalid(key, value));
        }
        open(&mut self.config);
        Ok(())
    }

    fn apply_prefixed(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(rest) = key.strip_prefix("autohide") {
            return self.apply_autohide(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("panel_") {
            return self.apply_panel(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("taskbar_") {
            return self.apply_taskbar(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("task_") {
            return self.apply_task(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("mouse_") {
            return self.apply_task_action(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("launcher_") {
            return self.apply_launcher(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("systray_") {
            return self.apply_systray(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("clock_") {
            return self.apply_clock(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("battery_") {
            return self.apply_battery(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("tooltip_") {
            return self.apply_tooltip(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("separator_") {
            return self.apply_separator(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("execp_") {
            return self.apply_execp(key, rest, value);
        }
        if let Some(rest) = key.strip_prefix("button_") {
            return self.apply_button(key, rest, value);
        }
        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn apply_gradient(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "gradient" => {
                let kind = GradientKind::from_str(value.trim()).map_err(|_| ConfigError::invalid(key, value))?;
                self.gradients
                    .push(Gradient::new(kind, Color::TRANSPARENT, Color::TRANSPARENT));
            }
            "start_color" => {
                let color = require(parse_color(value), key, value)?;
                self.last_gradient(key)?.start = color;
            }
            "end_color" => {
                let color = require(parse_color(value), key, value)?;
                self.last_gradient(key)?.end = color;
            }
            _ => {
                let (offset, color) = value
                    .trim()
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| ConfigError::invalid(key, value))?;
                let offset: f64 = offset.parse().map_err(|_| ConfigError::invalid(key, value))?;
                let color = require(parse_color(color), key, value)?;
                self.last_gradient(key)?
                    .add_stop(offset, color)
                    .map_err(|_| ConfigError::invalid(key, value))?;
            }
        }
        Ok(())
    }

    fn apply_background(&mut self, key: &str, value: &str) -> Result<()> {
        if key == "rounded" {
            let radius = require(parse_int(value), key, value)?;
            let mut background = Background::default();
            background.border.radius = radius.max(0);
            self.backgrounds.push(background);
            return Ok(());
        }
        if let Some(state) = key.strip_prefix("gradient_id") {
            let id = self.gradient_id(key, value)?;
            let bg = self.last_background(key)?;
            match state {
                "" => bg.gradient = id,
                "_hover" => bg.gradient_hover = id,
                _ => bg.gradient_pressed = id,
            }
            return Ok(());
        }
        match key {
            "border_width" => {
                let width = require(parse_int(value), key, value)?;
                self.last_background(key)?.border.width = width.max(0);
            }
            "border_sides" => {
                self.last_background(key)?.border.sides = BorderSides::parse(value.trim());
            }
            _ => {
                let color = require(parse_color(value), key, value)?;
                let bg = self.last_background(key)?;
                match key {
                    "border_color" => bg.border.color = color,
                    "border_color_hover" => bg.border_hover = Some(color),
                    "border_color_pressed" => bg.border_pressed = Some(color),
                    "background_color" => bg.fill = color,
                    "background_color_hover" => bg.fill_hover = Some(color),
                    _ => bg.fill_pressed = Some(color),
                }
            }
        }
        Ok(())
    }

    fn apply_autohide(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        let autohide = &mut self.config.panel.autohide;
        match rest {
            "" => autohide.enabled = require(parse_bool(value), key, value)?,
            "_show_timeout" => autohide.show_timeout = require(parse_seconds(value), key, value)?,
            "_hide_timeout" => autohide.hide_timeout = require(parse_seconds(value), key, value)?,
            "_height" => autohide.height = require(parse_int(value), key, value)?.max(1),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn apply_panel(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        match rest {
            "items" => self.config.panel.items = value.trim().to_string(),
            "size" => {
                let mut parts = value.split_whitespace();
                let width = parts.next().and_then(Dimension::parse);
                let height = parts.next().and_then(Dimension::parse);
                match (width, height) {
                    (Some(w), Some(h)) => {
                        self.config.panel.width = w;
                        self.config.panel.height = h;
                    }
                    _ => return Err(ConfigError::invalid(key, value)),
                }
            }
            "margin" => match parse_ints(value).as_deref() {
                Some([x, y]) => self.config.panel.margin = (*x, *y),
                _ => return Err(ConfigError::invalid(key, value)),
            },
            "padding" => self.config.panel.padding = require(parse_padding(value), key, value)?,
            "background_id" => self.config.panel.background = self.background_id(key, value)?,
            "position" => {
                let position = &mut self.config.panel.position;
                for word in value.split_whitespace() {
                    match word {
                        "top" => position.vertical = VerticalPosition::Top,
                        "bottom" => position.vertical = VerticalPosition::Bottom,
                        "left" => position.horizontal = HorizontalPosition::Left,
                        "right" => position.horizontal = HorizontalPosition::Right,
                        "center" => {
                            position.horizontal = HorizontalPosition::Center;
                        }
                        "vertical" => position.orientation = Orientation::Vertical,
                        "horizontal" => position.orientation = Orientation::Horizontal,
                        _ => return Err(ConfigError::invalid(key, value)),
                    }
                }
            }
            "monitor" => {
                self.config.panel.monitor = match value.trim() {
                    "all" => MonitorSelection::All,
                    other => match other.parse::<usize>() {
                        Ok(n) if n >= 1 => MonitorSelection::Index(n - 1),
                        _ => return Err(ConfigError::invalid(key, value)),
                    },
                }
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn apply_taskbar(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        match rest {
            "mode" => {
                self.config.taskbar.mode = match value.trim() {
                    "single_desktop" => TaskbarMode::SingleDesktop,
                    "multi_desktop" => TaskbarMode::MultiDesktop,
                    _ => return Err(ConfigError::invalid(key, value)),
                }
            }
            "padding" => self.config.taskbar.padding = require(parse_padding(value), key, value)?,
            "background_id" => self.config.taskbar.background = self.background_id(key, value)?,
            "active_background_id" => {
                self.config.taskbar.active_background = self.background_id(key, value)?
            }
            "name" => self.config.taskbar.show_name = require(parse_bool(value), key, value)?,
            "name_padding" => {
                self.config.taskbar.name_padding = require(parse_padding(value), key, value)?
            }
            "name_font" => self.config.taskbar.name_font = FontSpec::new(value),
            "name_font_color" => self.config.taskbar.name_color = require(parse_color(value), key, value)?,
            "name_background_id" => {
                self.config.taskbar.name_background = self.background_id(key, value)?
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn apply_task(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        const STATES: [(&str, TaskState); 4] = [
            ("", TaskState::Normal),
            ("active_", TaskState::Active),
            ("iconified_", TaskState::Iconified),
            ("urgent_", TaskState::Urgent),
        ];
        for (prefix, state) in STATES.iter().rev() {
            let Some(field) = rest.strip_prefix(prefix) else {
                continue;
            };
            let i = state.index();
            match field {
                "font_color" => {
                    self.config.task.style.font_colors[i] = require(parse_color(value), key, value)?;
                    return Ok(());
                }
                "background_id" => {
                    self.config.task.style.backgrounds[i] = self.background_id(key, value)?;
                    return Ok(());
                }
                "icon_asb" => {
                    self.config.task.style.icon_adjust[i] = require(parse_adjust(value), key, value)?;
                    return Ok(());
                }
                _ => {}
            }
        }

        let task = &mut self.config.task;
        match rest {
            "text" => task.style.show_text = require(parse_bool(value), key, value)?,
            "icon" => task.style.show_icon = require(parse_bool(value), key, value)?,
            "centered" => task.style.centered = require(parse_bool(value), key, value)?,
            "tooltip" => task.style.tooltip = require(parse_bool(value), key, value)?,
            "font" => task.style.font = FontSpec::new(value),
            "padding" => task.padding = require(parse_padding(value), key, value)?,
            "maximum_size" => match parse_ints(value).as_deref() {
                Some([w, h]) => task.maximum_size = ((*w).max(0), (*h).max(0)),
                _ => return Err(ConfigError::invalid(key, value)),
            },
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn apply_task_action(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        let action = TaskAction::from_str(value.trim()).map_err(|_| ConfigError::invalid(key, value))?;
        let actions = &mut self.config.task.style.actions;
        match rest {
            "left" => actions.left = action,
            "middle" => actions.middle = action,
            "right" => actions.right = action,
            "scroll_up" => actions.scroll_up = action,
            "scroll_down" => actions.scroll_down = action,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn apply_launcher(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        match rest {
            "padding" => self.config.launcher.padding = require(parse_padding(value), key, value)?,
            "background_id" => self.config.launcher.background = self.background_id(key, value)?,
            "icon_size" => self.config.launcher.icon_size = require(parse_int(value), key, value)?.max(1),
            "item_app" => self.config.launcher.apps.push(expand_home(value.trim())),
            "icon_asb" => self.config.launcher.adjust = require(parse_adjust(value), key, value)?,
            "tooltip" => self.config.launcher.tooltip = require(parse_bool(value), key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn apply_systray(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        match rest {
            "padding" => self.config.systray.padding = require(parse_padding(value), key, value)?,
            "background_id" => self.config.systray.background = self.background_id(key, value)?,
            "icon_size" => self.config.systray.icon_size = require(parse_int(value), key, value)?.max(1),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Keys every text widget understands.
    fn apply_text(&self, text: &mut TextConfig, key: &str, rest: &str, value: &str) -> Result<bool> {
        if let Some(slot) = command_slot(&mut text.commands, rest) {
            *slot = parse_command(value);
            return Ok(true);
        }
        match rest {
            "font_color" => text.color = require(parse_color(value), key, value)?,
            "padding" => text.padding = require(parse_padding(value), key, value)?,
            "background_id" => text.background = self.background_id(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn apply_clock(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        if rest == "tooltip" {
            self.config.clock.tooltip_format = parse_command(value);
            return Ok(());
        }
        let mut text = std::mem::take(&mut self.config.clock.text);
        let handled = self.apply_text(&mut text, key, rest, value);
        self.config.clock.text = text;
        match handled? {
            true => Ok(()),
            false => Err(ConfigError::UnknownKey(key.to_string())),
        }
    }

    fn apply_battery(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        let percent = |value: &str| parse_int(value).filter(|p| (0..=100).contains(p)).map(|p| p as u8);
        match rest {
            "low_status" => self.config.battery.low_threshold = require(percent(value), key, value)?,
            "low_cmd" => self.config.battery.low_command = parse_command(value),
            "hide" => {
                self.config.battery.hide_above = match require(percent(value), key, value)? {
                    0 => None,
                    p => Some(p),
                }
            }
            "update_interval" => {
                self.config.battery.poll_interval = require(parse_period(value), key, value)?
            }
            "sysfs_path" => self.config.battery.sysfs_root = expand_home(value.trim()),
            _ => {
                let mut text = std::mem::take(&mut self.config.battery.text);
                let handled = self.apply_text(&mut text, key, rest, value);
                self.config.battery.text = text;
                if !handled? {
                    return Err(ConfigError::UnknownKey(key.to_string()));
                }
            }
        }
        Ok(())
    }

    fn apply_tooltip(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        match rest {
            "show_timeout" => self.config.tooltip.show_timeout = require(parse_seconds(value), key, value)?,
            "hide_timeout" => self.config.tooltip.hide_timeout = require(parse_seconds(value), key, value)?,
            "padding" => self.config.tooltip.padding = require(parse_padding(value), key, value)?,
            "background_id" => self.config.tooltip.background = self.background_id(key, value)?,
            "font" => self.config.tooltip.font = FontSpec::new(value),
            "font_color" => self.config.tooltip.color = require(parse_color(value), key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn apply_separator(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        let background = match rest {
            "background_id" => Some(self.background_id(key, value)?),
            _ => None,
        };
        let separator = self.config.separators.last_mut().ok_or_else(|| ConfigError::NoSection {
            key: key.to_string(),
            section: "separator",
        })?;
        match rest {
            "background_id" => separator.background = background.unwrap_or_default(),
            "color" => separator.color = require(parse_color(value), key, value)?,
            "style" => {
                separator.style = match value.trim() {
                    "empty" => SeparatorStyle::Empty,
                    "line" => SeparatorStyle::Line,
                    "dots" => SeparatorStyle::Dots,
                    _ => return Err(ConfigError::invalid(key, value)),
                }
            }
            "size" => separator.size = require(parse_int(value), key, value)?.max(0),
            "padding" => separator.padding = require(parse_padding(value), key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    fn apply_execp(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        let Some(mut execp) = self.config.execps.pop() else {
            return Err(ConfigError::NoSection {
                key: key.to_string(),
                section: "execp",
            });
        };
        let result = match rest {
            "command" => {
                execp.command = value.trim().to_string();
                Ok(())
            }
            "interval" => match value.trim().parse::<u64>() {
                Ok(secs) => {
                    execp.interval = secs;
                    Ok(())
                }
                Err(_) => Err(ConfigError::invalid(key, value)),
            },
            "font" => {
                execp.font = FontSpec::new(value);
                Ok(())
            }
            "tooltip" => {
                execp.tooltip = parse_command(value);
                Ok(())
            }
            _ => match self.apply_text(&mut execp.text, key, rest, value) {
                Ok(true) => Ok(()),
                Ok(false) => Err(ConfigError::UnknownKey(key.to_string())),
                Err(e) => Err(e),
            },
        };
        self.config.execps.push(execp);
        result
    }

    fn apply_button(&mut self, key: &str, rest: &str, value: &str) -> Result<()> {
        let Some(mut button) = self.config.buttons.pop() else {
            return Err(ConfigError::NoSection {
                key: key.to_string(),
                section: "button",
            });
        };
        let result = match rest {
            "icon" => {
                button.icon = parse_command(value).map(|p| expand_home(&p));
                Ok(())
            }
            "text" => {
                button.text = parse_command(value);
                Ok(())
            }
            "tooltip" => {
                button.tooltip = parse_command(value);
                Ok(())
            }
            "font" => {
                button.font = FontSpec::new(value);
                Ok(())
            }
            _ => match self.apply_text(&mut button.style, key, rest, value) {
                Ok(true) => Ok(()),
                Ok(false) => Err(ConfigError::UnknownKey(key.to_string())),
                Err(e) => Err(e),
            },
        };
        self.config.buttons.push(button);
        result
    }

    /// Assemble the theme and hand out the finished config.
    pub fn finish(self) -> Config {
        let mut theme = Theme::new();
        for gradient in self.gradients {
            theme.add_gradient(gradient);
        }
        for background in self.backgrounds {
            theme.add_background(background);
        }
        Config { theme, ..self.config }
    }
}

/// Expand a leading `~/`.
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lintel_area::widgets::MouseButton;

    fn build(entries: &[(&str, &str)]) -> Config {
        let mut b = ConfigBuilder::new();
        for (k, v) in entries {
            b.apply(k, v).unwrap();
        }
        b.finish()
    }

    #[test]
    fn test_backgrounds_get_file_order_ids() {
        let c = build(&[
            ("rounded", "4"),
            ("background_color", "#ff0000 100"),
            ("rounded", "0"),
            ("border_width", "2"),
            ("panel_background_id", "2"),
            ("task_active_background_id", "1"),
        ]);
        assert_eq!(c.theme.background_count(), 3);
        assert_eq!(c.panel.background, BackgroundId(2));
        assert_eq!(c.theme.background(BackgroundId(1)).border.radius, 4);
        assert_eq!(c.theme.background(BackgroundId(2)).border.width, 2);
        assert_eq!(
            c.task.style.backgrounds[TaskState::Active.index()],
            BackgroundId(1)
        );
    }

    #[test]
    fn test_background_index_must_exist() {
        let mut b = ConfigBuilder::new();
        assert!(b.apply("panel_background_id", "0").is_ok());
        assert!(matches!(
            b.apply("panel_background_id", "1"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_gradient_section() {
        let c = build(&[
            ("gradient", "vertical"),
            ("start_color", "#000000"),
            ("end_color", "#ffffff"),
            ("color_stop", "50 #ff0000"),
            ("rounded", "0"),
            ("gradient_id_hover", "1"),
        ]);
        let g = c.theme.gradient(GradientId(0)).unwrap();
        assert_eq!(g.kind, GradientKind::Vertical);
        assert_eq!(g.stops().len(), 1);
        assert_eq!(
            c.theme.background(BackgroundId(1)).gradient_hover,
            Some(GradientId(0))
        );
    }

    #[test]
    fn test_section_keys_need_a_section() {
        let mut b = ConfigBuilder::new();
        assert!(matches!(
            b.apply("border_width", "1"),
            Err(ConfigError::NoSection { section: "background", .. })
        ));
        assert!(matches!(
            b.apply("execp_command", "date"),
            Err(ConfigError::NoSection { section: "execp", .. })
        ));
    }

    #[test]
    fn test_repeated_sections() {
        let c = build(&[
            ("execp", "new"),
            ("execp_command", "echo one"),
            ("execp_interval", "5"),
            ("execp", "new"),
            ("execp_command", "echo two"),
            ("execp_lclick_command", "xterm"),
        ]);
        assert_eq!(c.execps.len(), 2);
        assert_eq!(c.execps[0].interval, 5);
        assert_eq!(c.execps[1].command, "echo two");
        assert_eq!(
            c.execps[1].text.commands.command(MouseButton::Left),
            Some("xterm")
        );
    }

    #[test]
    fn test_task_actions_and_states() {
        let c = build(&[
            ("mouse_middle", "close"),
            ("task_urgent_font_color", "#ff0000"),
            ("task_iconified_icon_asb", "50 0 0"),
            ("task_maximum_size", "200 30"),
        ]);
        assert_eq!(c.task.style.actions.middle, TaskAction::Close);
        assert_eq!(c.task.style.font_colors[TaskState::Urgent.index()].r, 1.0);
        assert_eq!(c.task.style.icon_adjust[TaskState::Iconified.index()].alpha, 50);
        assert_eq!(c.task.maximum_size, (200, 30));
    }

    #[test]
    fn test_panel_keys() {
        let c = build(&[
            ("panel_size", "50% 24"),
            ("panel_position", "top left vertical"),
            ("panel_monitor", "2"),
            ("autohide", "1"),
            ("autohide_hide_timeout", "1.5"),
        ]);
        assert_eq!(c.panel.width, Dimension::Percent(50));
        assert_eq!(c.panel.height, Dimension::Pixels(24));
        assert_eq!(c.panel.position.vertical, VerticalPosition::Top);
        assert_eq!(c.panel.position.orientation, Orientation::Vertical);
        assert_eq!(c.panel.monitor, MonitorSelection::Index(1));
        assert!(c.panel.autohide.enabled);
        assert_eq!(c.panel.autohide.hide_timeout.as_millis(), 1500);
    }

    #[test]
    fn test_unknown_and_invalid() {
        let mut b = ConfigBuilder::new();
        assert!(matches!(
            b.apply("no_such_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            b.apply("panel_size", "wide"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            b.apply("mouse_left", "explode"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
