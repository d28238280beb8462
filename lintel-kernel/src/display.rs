//! Collaborator traits for the windowing system.

use std::os::fd::AsFd;

use crate::error::LoopError;
use crate::event::{Event, WindowId};

/// An event source the loop can wait on. The descriptor becomes readable
/// when new events may be available.
pub trait Display: AsFd {
    /// True if events are queued locally and can be taken without waiting.
    fn pending(&self) -> bool;

    /// Pull whatever the connection has buffered into the local queue.
    /// Must not block.
    fn read_events(&mut self) -> Result<(), LoopError>;

    fn next_event(&mut self) -> Option<Event>;

    fn flush(&mut self) -> Result<(), LoopError> {
        Ok(())
    }
}

/// A managed top-level window as the window manager reports it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub window: WindowId,
    pub title: String,
    /// `None` for windows shown on every desktop.
    pub desktop: Option<usize>,
    pub active: bool,
    pub iconified: bool,
    pub urgent: bool,
    pub skip_taskbar: bool,
}

/// Window-manager requests a task button can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAction {
    Activate,
    Iconify,
    Close,
    ToggleShade,
    ToggleMaximize,
    MoveToDesktop(usize),
}

/// Screen area of one monitor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Window management operations the panel needs.
pub trait WindowSystem {
    fn create_window(&mut self, x: i32, y: i32, width: i32, height: i32) -> WindowId;
    fn destroy_window(&mut self, window: WindowId);
    fn map_window(&mut self, window: WindowId);
    fn unmap_window(&mut self, window: WindowId);
    fn move_resize(&mut self, window: WindowId, x: i32, y: i32, width: i32, height: i32);

    /// Show a renderer pixmap as the window's content and repaint it.
    fn set_background(&mut self, window: WindowId, pixmap: u64);

    fn monitors(&self) -> Vec<MonitorGeometry>;
    fn client_list(&self) -> Vec<ClientInfo>;
    fn desktop_count(&self) -> usize;
    fn current_desktop(&self) -> usize;
    fn desktop_names(&self) -> Vec<String>;
    fn set_current_desktop(&mut self, desktop: usize);

    fn window_action(&mut self, window: WindowId, action: WindowAction);

    /// Hand a click on empty panel space to the root window, where the
    /// window manager shows its menu.
    fn forward_to_root(&mut self, x: i32, y: i32, button: u8);
}
