//! The `lintelrc` configuration.
//!
//! The file is tokenized by the config grammar; each `key = value` entry
//! is then handed to a per-key handler. A document the grammar rejects is
//! retried line by line so a single bad line only loses itself.

mod keys;
pub mod values;

use std::path::{Path, PathBuf};
use std::time::Duration;

use lintel_area::widgets::{ButtonCommands, SeparatorStyle, TaskStyle};
use lintel_area::{BackgroundId, Color, FontSpec, ImageAdjust, Orientation, Padding, Theme};
use lintel_parser::{ConfigEntry, ConfigParser, ParseError};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use keys::ConfigBuilder;
pub use values::Dimension;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config grammar: {0}")]
    Grammar(#[from] ParseError),

    #[error("unknown key '{0}'")]
    UnknownKey(String),

    #[error("invalid value '{value}' for '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("'{key}' appears before any {section} was declared")]
    NoSection { key: String, section: &'static str },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, value: &str) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// Built-in configuration used when no file is found.
pub const DEFAULT_CONFIG: &str = "\
# Background 1: panel
rounded = 0
border_width = 0
background_color = #000000 60
border_color = #000000 30

# Background 2: active task
rounded = 2
border_width = 1
background_color = #777777 30
border_color = #ffffff 40
background_color_hover = #aaaaaa 30

panel_items = TSC
panel_size = 100% 30
panel_padding = 2 2 4
panel_background_id = 1
panel_position = bottom center horizontal

task_active_background_id = 2
task_maximum_size = 150 30

time1_format = %H:%M
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalPosition {
    Top,
    Center,
    #[default]
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalPosition {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelPosition {
    pub vertical: VerticalPosition,
    pub horizontal: HorizontalPosition,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorSelection {
    #[default]
    All,
    Index(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AutohideConfig {
    pub enabled: bool,
    pub show_timeout: Duration,
    pub hide_timeout: Duration,
    /// Thickness of the strip left on screen while hidden.
    pub height: i32,
}

impl Default for AutohideConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            show_timeout: Duration::ZERO,
            hide_timeout: Duration::from_millis(500),
            height: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    pub items: String,
    pub width: Dimension,
    pub height: Dimension,
    pub margin: (i32, i32),
    pub padding: Padding,
    pub background: BackgroundId,
    pub position: PanelPosition,
    pub monitor: MonitorSelection,
    pub mouse_effects: bool,
    pub wm_menu: bool,
    pub autohide: AutohideConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            items: "LTSBC".to_string(),
            width: Dimension::Percent(100),
            height: Dimension::Pixels(40),
            margin: (0, 0),
            padding: Padding::default(),
            background: BackgroundId::TRANSPARENT,
            position: PanelPosition::default(),
            monitor: MonitorSelection::All,
            mouse_effects: true,
            wm_menu: false,
            autohide: AutohideConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskbarMode {
    #[default]
    SingleDesktop,
    MultiDesktop,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskbarConfig {
    pub mode: TaskbarMode,
    pub padding: Padding,
    pub background: BackgroundId,
    pub active_background: BackgroundId,
    pub show_name: bool,
    pub name_padding: Padding,
    pub name_font: FontSpec,
    pub name_color: Color,
    pub name_background: BackgroundId,
}

impl Default for TaskbarConfig {
    fn default() -> Self {
        Self {
            mode: TaskbarMode::SingleDesktop,
            padding: Padding::default(),
            background: BackgroundId::TRANSPARENT,
            active_background: BackgroundId::TRANSPARENT,
            show_name: false,
            name_padding: Padding::default(),
            name_font: FontSpec::default(),
            name_color: Color::WHITE,
            name_background: BackgroundId::TRANSPARENT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskConfig {
    pub style: TaskStyle,
    pub padding: Padding,
    /// `(width, height)` cap; the main-axis component bounds each task.
    pub maximum_size: (i32, i32),
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            style: TaskStyle::default(),
            padding: Padding::new(4, 2, 4),
            maximum_size: (140, 35),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LauncherConfig {
    pub padding: Padding,
    pub background: BackgroundId,
    pub icon_size: i32,
    pub apps: Vec<PathBuf>,
    pub adjust: ImageAdjust,
    pub tooltip: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            background: BackgroundId::TRANSPARENT,
            icon_size: 24,
            apps: Vec::new(),
            adjust: ImageAdjust::default(),
            tooltip: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystrayConfig {
    pub padding: Padding,
    pub background: BackgroundId,
    pub icon_size: i32,
}

impl Default for SystrayConfig {
    fn default() -> Self {
        Self {
            padding: Padding::default(),
            background: BackgroundId::TRANSPARENT,
            icon_size: 22,
        }
    }
}

/// Text styling shared by the text widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct TextConfig {
    pub color: Color,
    pub padding: Padding,
    pub background: BackgroundId,
    pub commands: ButtonCommands,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            padding: Padding::new(2, 0, 0),
            background: BackgroundId::TRANSPARENT,
            commands: ButtonCommands::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClockConfig {
    /// The clock exists only when this is set.
    pub time1_format: Option<String>,
    pub time2_format: Option<String>,
    pub time1_font: FontSpec,
    pub time2_font: FontSpec,
    pub tooltip_format: Option<String>,
    pub text: TextConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatteryConfig {
    pub low_threshold: u8,
    pub low_command: Option<String>,
    pub hide_above: Option<u8>,
    pub font1: FontSpec,
    pub font2: FontSpec,
    pub poll_interval: Duration,
    /// Directory holding `BAT*` power-supply entries.
    pub sysfs_root: PathBuf,
    pub text: TextConfig,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            low_threshold: 10,
            low_command: None,
            hide_above: None,
            font1: FontSpec::default(),
            font2: FontSpec::default(),
            poll_interval: Duration::from_secs(10),
            sysfs_root: PathBuf::from("/sys/class/power_supply"),
            text: TextConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipConfig {
    pub show_timeout: Duration,
    pub hide_timeout: Duration,
    pub padding: Padding,
    pub background: BackgroundId,
    pub font: FontSpec,
    pub color: Color,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            show_timeout: Duration::from_millis(500),
            hide_timeout: Duration::from_millis(100),
            padding: Padding::new(4, 4, 0),
            background: BackgroundId::TRANSPARENT,
            font: FontSpec::default(),
            color: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeparatorConfig {
    pub style: SeparatorStyle,
    pub size: i32,
    pub color: Color,
    pub padding: Padding,
    pub background: BackgroundId,
}

impl Default for SeparatorConfig {
    fn default() -> Self {
        Self {
            style: SeparatorStyle::Line,
            size: 3,
            color: Color::WHITE.with_alpha_percent(50.0),
            padding: Padding::new(1, 0, 0),
            background: BackgroundId::TRANSPARENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecpConfig {
    pub command: String,
    /// Seconds between runs; 0 runs once.
    pub interval: u64,
    pub font: FontSpec,
    pub tooltip: Option<String>,
    pub text: TextConfig,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ButtonConfig {
    pub icon: Option<PathBuf>,
    pub text: Option<String>,
    pub tooltip: Option<String>,
    pub font: FontSpec,
    pub style: TextConfig,
}

/// Everything a reload rebuilds.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub panel: PanelConfig,
    pub taskbar: TaskbarConfig,
    pub task: TaskConfig,
    pub launcher: LauncherConfig,
    pub systray: SystrayConfig,
    pub clock: ClockConfig,
    pub battery: BatteryConfig,
    pub tooltip: TooltipConfig,
    pub separators: Vec<SeparatorConfig>,
    pub execps: Vec<ExecpConfig>,
    pub buttons: Vec<ButtonConfig>,
}

impl Config {
    /// Parse a config document, skipping what cannot be understood.
    pub fn parse(text: &str) -> Result<Config, ConfigError> {
        let parser = ConfigParser::new()?;
        let entries = match parser.parse(text) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("config does not parse as a whole ({}), retrying per line", e);
                parse_lines(&parser, text)
            }
        };

        let mut builder = ConfigBuilder::new();
        for entry in &entries {
            if let Err(e) = builder.apply(&entry.key, &entry.value) {
                warn!("line {}: {}", entry.line, e);
            }
        }
        Ok(builder.finish())
    }

    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        info!("loading config from {}", path.display());
        Config::parse(&text)
    }

    /// Load `explicit` if given, else the user's config file, else the
    /// built-in default.
    pub fn locate_and_load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Config::load(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Config::load(&path),
            _ => {
                info!("no config file found, using built-in defaults");
                Config::parse(DEFAULT_CONFIG)
            }
        }
    }
}

/// `$XDG_CONFIG_HOME/lintel/lintelrc`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lintel").join("lintelrc"))
}

fn parse_lines(parser: &ConfigParser, text: &str) -> Vec<ConfigEntry> {
    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        match parser.parse_line(line, index + 1) {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => {}
            Err(e) => warn!("skipping malformed line {}: {}", index + 1, e),
        }
    }
    entries
}
