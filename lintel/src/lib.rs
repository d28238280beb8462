//! Lintel - a lightweight taskbar panel.
//!
//! This crate wires the pieces together:
//! - `config`: the `lintelrc` file and its defaults
//! - `panel`: panel geometry and the items each panel holds
//! - `tasks`: keeping taskbars in sync with the window manager
//! - `runtime`: the event loop host, timers, autohide and tooltips
//! - `launch` and `battery`: child processes and sysfs polling

pub mod battery;
pub mod config;
pub mod launch;
pub mod launcher;
pub mod panel;
pub mod runtime;
pub mod tasks;
pub mod tooltip;

pub use config::{Config, ConfigError};
pub use runtime::Runtime;
