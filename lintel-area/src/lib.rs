//! Lintel area - the panel's element tree.
//!
//! This crate contains:
//! - `AreaTree`: arena of areas with parent/child links and generational ids
//! - Layout: content-sized and layout-sized areas, alignment, item ordering
//! - Drawing: per-area pixmaps redrawn only when dirty, composited per panel
//! - Hit-testing and the hover/press mouse state machine
//! - Widgets: panel, taskbar, task, launcher, systray, clock, battery,
//!   executor, separator, button and tooltip
//! - `Renderer`: the seam to the drawing backend, with a recording
//!   implementation for tests

pub mod area;
pub mod backend;
pub mod draw;
pub mod dump;
pub mod error;
pub mod headless;
pub mod layout;
pub mod primitives;
pub mod theme;
pub mod tree;
pub mod widgets;

pub use area::{Area, AreaId, MouseState, SizeMode};
pub use backend::{
    FontSpec, ImageAdjust, ImageHandle, Paint, PixmapId, Renderer, TextAlign, TextMeasure, TextRun,
};
pub use dump::AreaSnapshot;
pub use error::StyleError;
pub use headless::{HeadlessRenderer, PaintOp};
pub use layout::PanelItems;
pub use primitives::{Alignment, BorderSides, Color, Orientation, Padding, Rect, Size};
pub use theme::{Background, BackgroundId, Border, Gradient, GradientId, GradientKind, Theme};
pub use tree::{AreaTree, Node};
pub use widgets::{AreaBehavior, ClickAction, ClickEvent, MouseButton, TaskAction, Widget};
