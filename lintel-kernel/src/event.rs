//! Backend-agnostic windowing events.

/// Opaque window handle assigned by the display backend.
pub type WindowId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub window: WindowId,
    pub x: i32,
    pub y: i32,
    /// 1 left, 2 middle, 3 right, 4 scroll up, 5 scroll down.
    pub button: u8,
    /// Server timestamp in milliseconds.
    pub time: u64,
}

impl PointerEvent {
    pub fn new(window: WindowId, x: i32, y: i32, button: u8) -> Self {
        Self {
            window,
            x,
            y,
            button,
            time: 0,
        }
    }
}

/// Window-manager properties the panel tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    ClientList,
    ActiveWindow,
    CurrentDesktop,
    DesktopCount,
    DesktopNames,
    WindowTitle,
    WindowState,
    WindowDesktop,
    WindowIcon,
    Other(String),
}

/// Drag-and-drop protocol messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DndMessage {
    Enter { source: WindowId },
    Position { x: i32, y: i32 },
    Leave,
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    Dnd(DndMessage),
    /// A tray client asked to be docked.
    SystrayDock { icon: WindowId },
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ButtonPress(PointerEvent),
    ButtonRelease(PointerEvent),
    Motion(PointerEvent),
    Enter {
        window: WindowId,
    },
    Leave {
        window: WindowId,
    },
    Expose {
        window: WindowId,
    },
    Property {
        window: WindowId,
        property: Property,
    },
    Configure {
        window: WindowId,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    ClientMessage {
        window: WindowId,
        message: ClientMessage,
    },
}

/// Event discriminant used to register handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ButtonPress,
    ButtonRelease,
    Motion,
    Enter,
    Leave,
    Expose,
    Property,
    Configure,
    ClientMessage,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ButtonPress(_) => EventKind::ButtonPress,
            Event::ButtonRelease(_) => EventKind::ButtonRelease,
            Event::Motion(_) => EventKind::Motion,
            Event::Enter { .. } => EventKind::Enter,
            Event::Leave { .. } => EventKind::Leave,
            Event::Expose { .. } => EventKind::Expose,
            Event::Property { .. } => EventKind::Property,
            Event::Configure { .. } => EventKind::Configure,
            Event::ClientMessage { .. } => EventKind::ClientMessage,
        }
    }

    pub fn window(&self) -> WindowId {
        match self {
            Event::ButtonPress(p) | Event::ButtonRelease(p) | Event::Motion(p) => p.window,
            Event::Enter { window }
            | Event::Leave { window }
            | Event::Expose { window }
            | Event::Property { window, .. }
            | Event::Configure { window, .. }
            | Event::ClientMessage { window, .. } => *window,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_window() {
        let e = Event::ButtonPress(PointerEvent::new(9, 1, 2, 1));
        assert_eq!(e.kind(), EventKind::ButtonPress);
        assert_eq!(e.window(), 9);

        let e = Event::ClientMessage {
            window: 4,
            message: ClientMessage::Dnd(DndMessage::Leave),
        };
        assert_eq!(e.kind(), EventKind::ClientMessage);
        assert_eq!(e.window(), 4);
    }
}
