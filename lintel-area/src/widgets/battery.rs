//! Battery indicator.

use std::time::Duration;

use crate::area::Area;
use crate::backend::{FontSpec, PixmapId, Renderer};
use crate::theme::Theme;

use super::text::{block_size, draw_lines};
use super::{
    content_rect, resize_to_content, AreaBehavior, ButtonCommands, ClickAction, ClickEvent, LayoutContext,
    TextLine, TextStyle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeStatus {
    #[default]
    Unknown,
    Charging,
    Discharging,
    Full,
    NotCharging,
}

impl ChargeStatus {
    /// Map the kernel's `status` attribute.
    pub fn from_sysfs(status: &str) -> Self {
        match status.trim() {
            "Charging" => ChargeStatus::Charging,
            "Discharging" => ChargeStatus::Discharging,
            "Full" => ChargeStatus::Full,
            "Not charging" => ChargeStatus::NotCharging,
            _ => ChargeStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChargeStatus::Unknown => "Unknown",
            ChargeStatus::Charging => "Charging",
            ChargeStatus::Discharging => "Discharging",
            ChargeStatus::Full => "Full",
            ChargeStatus::NotCharging => "Not charging",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatteryState {
    pub percentage: u8,
    pub status: ChargeStatus,
    /// Time to empty while discharging, time to full while charging.
    pub time_left: Option<Duration>,
}

/// What changed after feeding a new reading.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatteryUpdate {
    pub changed: bool,
    pub visibility_changed: bool,
    /// Command to run because the charge just dropped below the threshold.
    pub low_command: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Battery {
    pub font1: FontSpec,
    pub font2: FontSpec,
    pub style: TextStyle,
    pub commands: ButtonCommands,
    /// Hide the indicator at or above this percentage.
    pub hide_above: Option<u8>,
    pub low_threshold: u8,
    pub low_command: Option<String>,
    state: Option<BatteryState>,
    low_fired: bool,
    lines: Vec<TextLine>,
}

fn format_duration(d: Duration) -> String {
    let minutes = d.as_secs() / 60;
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

impl Battery {
    pub fn new(font1: FontSpec, font2: FontSpec) -> Self {
        Self {
            font1,
            font2,
            style: TextStyle::default(),
            commands: ButtonCommands::default(),
            hide_above: None,
            low_threshold: 10,
            low_command: None,
            state: None,
            low_fired: false,
            lines: Vec::new(),
        }
    }

    pub fn state(&self) -> Option<BatteryState> {
        self.state
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn update(&mut self, area: &mut Area, state: BatteryState) -> BatteryUpdate {
        let mut result = BatteryUpdate::default();

        let visible = !self.hide_above.is_some_and(|h| state.percentage >= h);
        if area.on_screen != visible {
            area.on_screen = visible;
            result.visibility_changed = true;
        }

        let low = state.status == ChargeStatus::Discharging && state.percentage <= self.low_threshold;
        if low && !self.low_fired {
            self.low_fired = true;
            result.low_command = self.low_command.clone();
        } else if !low {
            self.low_fired = false;
        }

        let second = match (state.status, state.time_left) {
            (ChargeStatus::Charging | ChargeStatus::Discharging, Some(t)) => format_duration(t),
            (status, _) => status.label().to_string(),
        };
        let lines = vec![
            TextLine::new(format!("{}%", state.percentage), self.font1.clone()),
            TextLine::new(second, self.font2.clone()),
        ];
        self.state = Some(state);
        if lines != self.lines {
            self.lines = lines;
            area.need_resize = true;
            area.need_redraw = true;
            result.changed = true;
        }
        result
    }
}

impl AreaBehavior for Battery {
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
        let state = self.state?;
        let mut text = format!("{} {}%", state.status.label(), state.percentage);
        if let Some(t) = state.time_left {
            let suffix = match state.status {
                ChargeStatus::Charging => " until full",
                _ => " remaining",
            };
            text.push('\n');
            text.push_str(&format_duration(t));
            text.push_str(suffix);
        }
        Some(text)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::SizeMode;

    fn reading(percentage: u8, status: ChargeStatus) -> BatteryState {
        BatteryState {
            percentage,
            status,
            time_left: Some(Duration::from_secs(5400)),
        }
    }

    #[test]
    fn test_low_command_fires_once_per_crossing() {
        let mut battery = Battery::new(FontSpec::default(), FontSpec::default());
        battery.low_threshold = 10;
        battery.low_command = Some("notify-send low".into());
        let mut area = Area::new("battery", SizeMode::ByContent);

        let u = battery.update(&mut area, reading(12, ChargeStatus::Discharging));
        assert_eq!(u.low_command, None);
        let u = battery.update(&mut area, reading(9, ChargeStatus::Discharging));
        assert_eq!(u.low_command.as_deref(), Some("notify-send low"));
        let u = battery.update(&mut area, reading(8, ChargeStatus::Discharging));
        assert_eq!(u.low_command, None);

        battery.update(&mut area, reading(8, ChargeStatus::Charging));
        let u = battery.update(&mut area, reading(7, ChargeStatus::Discharging));
        assert!(u.low_command.is_some());
    }

    #[test]
    fn test_hide_threshold() {
        let mut battery = Battery::new(FontSpec::default(), FontSpec::default());
        battery.hide_above = Some(95);
        let mut area = Area::new("battery", SizeMode::ByContent);

        let u = battery.update(&mut area, reading(96, ChargeStatus::Full));
        assert!(u.visibility_changed);
        assert!(!area.on_screen);
        let u = battery.update(&mut area, reading(94, ChargeStatus::Discharging));
        assert!(u.visibility_changed);
        assert!(area.on_screen);
    }

    #[test]
    fn test_text_lines() {
        let mut battery = Battery::new(FontSpec::default(), FontSpec::default());
        let mut area = Area::new("battery", SizeMode::ByContent);
        battery.update(&mut area, reading(50, ChargeStatus::Discharging));
        assert_eq!(battery.lines()[0].text, "50%");
        assert_eq!(battery.lines()[1].text, "1:30");
        assert_eq!(
            battery.tooltip_text().as_deref(),
            Some("Discharging 50%\n1:30 remaining")
        );

        battery.update(&mut area, reading(100, ChargeStatus::Full));
        assert_eq!(battery.lines()[1].text, "Full");
    }

    #[test]
    fn test_sysfs_status() {
        assert_eq!(ChargeStatus::from_sysfs("Not charging\n"), ChargeStatus::NotCharging);
        assert_eq!(ChargeStatus::from_sysfs("bogus"), ChargeStatus::Unknown);
    }
}
