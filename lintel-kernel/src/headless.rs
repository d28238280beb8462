//! In-memory display and window system.
//!
//! Events are queued with [`HeadlessDisplay::push_event`]; every push also
//! writes a byte to an internal pipe so a waiting loop wakes up. Window
//! operations are recorded for inspection.

use std::collections::{BTreeMap, VecDeque};
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::os::fd::{AsFd, BorrowedFd};

use nix::fcntl::OFlag;
use nix::unistd::pipe2;

use crate::display::{ClientInfo, Display, MonitorGeometry, WindowAction, WindowSystem};
use crate::error::LoopError;
use crate::event::{Event, WindowId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadlessWindow {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub mapped: bool,
}

/// A recorded window-system request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowOp {
    Map(WindowId),
    Unmap(WindowId),
    MoveResize {
        window: WindowId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    SetBackground { window: WindowId, pixmap: u64 },
    Action(WindowId, WindowAction),
    SetDesktop(usize),
    ForwardToRoot { x: i32, y: i32, button: u8 },
}

#[derive(Debug)]
pub struct HeadlessDisplay {
    queue: VecDeque<Event>,
    notify_read: File,
    notify_write: File,
    next_window: WindowId,
    windows: BTreeMap<WindowId, HeadlessWindow>,
    ops: Vec<WindowOp>,
    pub monitors: Vec<MonitorGeometry>,
    pub clients: Vec<ClientInfo>,
    pub desktops: Vec<String>,
    pub current_desktop: usize,
}

impl HeadlessDisplay {
    pub fn new() -> Result<Self, LoopError> {
        let (read, write) = pipe2(OFlag::O_NONBLOCK | OFlag::O_CLOEXEC)?;
        Ok(Self {
            queue: VecDeque::new(),
            notify_read: File::from(read),
            notify_write: File::from(write),
            next_window: 1,
            windows: BTreeMap::new(),
            ops: Vec::new(),
            monitors: vec![MonitorGeometry {
                x: 0,
                y: 0,
                width: 1920,
                height: 1080,
            }],
            clients: Vec::new(),
            desktops: vec!["1".to_string()],
            current_desktop: 0,
        })
    }

    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
        let _ = (&self.notify_write).write(&[1]);
    }

    /// Queue an event that was already read off the connection, so the
    /// notify descriptor stays quiet.
    pub fn push_buffered_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn window(&self, window: WindowId) -> Option<&HeadlessWindow> {
        self.windows.get(&window)
    }

    pub fn ops(&self) -> &[WindowOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<WindowOp> {
        std::mem::take(&mut self.ops)
    }
}

impl AsFd for HeadlessDisplay {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.notify_read.as_fd()
    }
}

impl Display for HeadlessDisplay {
    fn pending(&self) -> bool {
        !self.queue.is_empty()
    }

    fn read_events(&mut self) -> Result<(), LoopError> {
        let mut buf = [0u8; 64];
        loop {
            match (&self.notify_read).read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(_) => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return Ok(()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn next_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }
}

impl WindowSystem for HeadlessDisplay {
    fn create_window(&mut self, x: i32, y: i32, width: i32, height: i32) -> WindowId {
        let id = self.next_window;
        self.next_window += 1;
        self.windows.insert(
            id,
            HeadlessWindow {
                x,
                y,
                width,
                height,
                mapped: false,
            },
        );
        id
    }

    fn destroy_window(&mut self, window: WindowId) {
        self.windows.remove(&window);
    }

    fn map_window(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.mapped = true;
        }
        self.ops.push(WindowOp::Map(window));
    }

    fn unmap_window(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.mapped = false;
        }
        self.ops.push(WindowOp::Unmap(window));
    }

    fn move_resize(&mut self, window: WindowId, x: i32, y: i32, width: i32, height: i32) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.x = x;
            w.y = y;
            w.width = width;
            w.height = height;
        }
        self.ops.push(WindowOp::MoveResize {
            window,
            x,
            y,
            width,
            height,
        });
    }

    fn set_background(&mut self, window: WindowId, pixmap: u64) {
        self.ops.push(WindowOp::SetBackground { window, pixmap });
    }

    fn monitors(&self) -> Vec<MonitorGeometry> {
        self.monitors.clone()
    }

    fn client_list(&self) -> Vec<ClientInfo> {
        self.clients.clone()
    }

    fn desktop_count(&self) -> usize {
        self.desktops.len().max(1)
    }

    fn current_desktop(&self) -> usize {
        self.current_desktop
    }

    fn desktop_names(&self) -> Vec<String> {
        self.desktops.clone()
    }

    fn set_current_desktop(&mut self, desktop: usize) {
        self.current_desktop = desktop;
        self.ops.push(WindowOp::SetDesktop(desktop));
    }

    fn window_action(&mut self, window: WindowId, action: WindowAction) {
        self.ops.push(WindowOp::Action(window, action));
    }

    fn forward_to_root(&mut self, x: i32, y: i32, button: u8) {
        self.ops.push(WindowOp::ForwardToRoot { x, y, button });
    }
}
