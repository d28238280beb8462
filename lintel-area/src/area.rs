//! The per-node state shared by every element of the panel.

use serde::Serialize;

use crate::backend::PixmapId;
use crate::primitives::{Alignment, Orientation, Padding, Rect};
use crate::theme::BackgroundId;

/// Handle to a node in an [`AreaTree`](crate::AreaTree).
///
/// Ids carry a generation so a handle to a destroyed node never aliases a
/// node later allocated in the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct AreaId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// How an area obtains its main-axis size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SizeMode {
    /// Takes a share of the space left over in the parent.
    #[default]
    ByLayout,
    /// Sizes itself from its content.
    ByContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum MouseState {
    #[default]
    Normal,
    Hover,
    Pressed,
}

#[derive(Debug, Clone)]
pub struct Area {
    pub name: String,
    /// Position relative to the panel window.
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub background: BackgroundId,
    pub on_screen: bool,
    pub size_mode: SizeMode,
    pub alignment: Alignment,
    pub padding: Padding,
    pub need_resize: bool,
    pub need_redraw: bool,
    pub mouse_state: MouseState,
    /// Whether hover and press change the background.
    pub mouse_effects: bool,
    pub(crate) children: Vec<AreaId>,
    pub(crate) parent: Option<AreaId>,
    pub(crate) panel: Option<AreaId>,
    pub(crate) changed: bool,
    pub(crate) pixmap: Option<PixmapId>,
}

impl Area {
    pub fn new(name: impl Into<String>, size_mode: SizeMode) -> Self {
        Self {
            name: name.into(),
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            background: BackgroundId::TRANSPARENT,
            on_screen: true,
            size_mode,
            alignment: Alignment::Left,
            padding: Padding::default(),
            need_resize: true,
            need_redraw: true,
            mouse_state: MouseState::Normal,
            mouse_effects: false,
            children: Vec::new(),
            parent: None,
            panel: None,
            changed: false,
            pixmap: None,
        }
    }

    pub fn with_background(mut self, background: BackgroundId) -> Self {
        self.background = background;
        self
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_mouse_effects(mut self, enabled: bool) -> Self {
        self.mouse_effects = enabled;
        self
    }

    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.set_rect(rect);
        self
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    /// Half-open containment test in panel coordinates.
    #[inline]
    pub fn is_point_inside(&self, x: i32, y: i32) -> bool {
        self.rect().contains_xy(x, y)
    }

    pub fn children(&self) -> &[AreaId] {
        &self.children
    }

    pub fn parent(&self) -> Option<AreaId> {
        self.parent
    }

    /// The panel this area belongs to. A panel is its own panel.
    pub fn panel(&self) -> Option<AreaId> {
        self.panel
    }

    pub fn pixmap(&self) -> Option<PixmapId> {
        self.pixmap
    }

    /// True when the last layout pass changed this area's geometry.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// State the background should be painted for.
    pub fn effective_mouse_state(&self) -> MouseState {
        if self.mouse_effects {
            self.mouse_state
        } else {
            MouseState::Normal
        }
    }

    pub(crate) fn main_size(&self, o: Orientation) -> i32 {
        o.main(self.width, self.height)
    }

    pub(crate) fn cross_size(&self, o: Orientation) -> i32 {
        o.cross(self.width, self.height)
    }

    pub(crate) fn main_pos(&self, o: Orientation) -> i32 {
        o.main(self.x, self.y)
    }

    pub(crate) fn cross_pos(&self, o: Orientation) -> i32 {
        o.cross(self.x, self.y)
    }

    /// Set main and cross extents. Returns true if either changed.
    pub(crate) fn set_extent(&mut self, o: Orientation, main: i32, cross: i32) -> bool {
        let (w, h) = if o.is_horizontal() { (main, cross) } else { (cross, main) };
        let changed = self.width != w || self.height != h;
        self.width = w;
        self.height = h;
        changed
    }

    /// Set main and cross positions. Returns true if either changed.
    pub(crate) fn set_position(&mut self, o: Orientation, main: i32, cross: i32) -> bool {
        let (x, y) = if o.is_horizontal() { (main, cross) } else { (cross, main) };
        let changed = self.x != x || self.y != y;
        self.x = x;
        self.y = y;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_inside_uses_panel_coordinates() {
        let area = Area::new("clock", SizeMode::ByContent).with_rect(Rect::new(100, 0, 40, 30));
        assert!(area.is_point_inside(100, 0));
        assert!(area.is_point_inside(139, 29));
        assert!(!area.is_point_inside(140, 10));
        assert!(!area.is_point_inside(99, 10));
    }

    #[test]
    fn test_effective_state_requires_effects() {
        let mut area = Area::new("task", SizeMode::ByLayout);
        area.mouse_state = MouseState::Hover;
        assert_eq!(area.effective_mouse_state(), MouseState::Normal);
        area.mouse_effects = true;
        assert_eq!(area.effective_mouse_state(), MouseState::Hover);
    }

    #[test]
    fn test_vertical_extent_swaps_axes() {
        let mut area = Area::new("x", SizeMode::ByLayout);
        assert!(area.set_extent(Orientation::Vertical, 50, 20));
        assert_eq!((area.width, area.height), (20, 50));
        assert!(!area.set_extent(Orientation::Vertical, 50, 20));
    }
}
