//! Event loop and timing for the lintel panel.

pub mod clock;
pub mod display;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod headless;
pub mod reaper;
pub mod scheduler;
pub mod signals;
pub mod wake;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use display::{ClientInfo, Display, MonitorGeometry, WindowAction, WindowSystem};
pub use error::LoopError;
pub use event::{ClientMessage, DndMessage, Event, EventKind, PointerEvent, Property, WindowId};
pub use event_loop::{EventLoop, Handler, LoopHost};
pub use headless::{HeadlessDisplay, HeadlessWindow, WindowOp};
pub use reaper::{reap_children, ChildExit};
pub use scheduler::{ChildCallback, Scheduler, TimerId};
pub use signals::{install_handlers, is_reload_or_restart, SignalFlags, SIGNALS};
pub use wake::WakePipe;
