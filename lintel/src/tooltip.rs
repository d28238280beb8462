//! The tooltip window.
//!
//! Show and hide requests come from timers, which cannot reach the window
//! system. They are recorded as a pending change and applied on the next
//! redraw.

use lintel_area::widgets::{TextStyle, Tooltip};
use lintel_area::{Area, AreaId, AreaTree, Orientation, Rect, SizeMode, TextAlign, Widget};
use lintel_kernel::{MonitorGeometry, TimerId, WindowId, WindowSystem};

use crate::config::TooltipConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipChange {
    Show,
    Hide,
}

#[derive(Debug)]
pub struct TooltipState {
    pub root: AreaId,
    pub window: WindowId,
    /// Area whose text is (or is about to be) shown.
    pub owner: Option<AreaId>,
    pub visible: bool,
    pub timer: Option<TimerId>,
    pub pending: Option<TooltipChange>,
    /// Pointer position in screen coordinates and the panel it is over.
    pub anchor: (i32, i32),
    pub panel: Option<usize>,
}

impl TooltipState {
    pub fn create<W: WindowSystem + ?Sized>(
        tree: &mut AreaTree,
        ws: &mut W,
        config: &TooltipConfig,
    ) -> Self {
        let style = TextStyle {
            color: config.color,
            align: TextAlign::Left,
        };
        let root = tree.insert(
            Area::new("tooltip", SizeMode::ByContent)
                .with_padding(config.padding)
                .with_background(config.background),
            Widget::Tooltip(Tooltip::new(config.font.clone(), style)),
        );
        let window = ws.create_window(0, 0, 1, 1);
        Self {
            root,
            window,
            owner: None,
            visible: false,
            timer: None,
            pending: None,
            anchor: (0, 0),
            panel: None,
        }
    }

    /// Replace the text. Returns true if it changed.
    pub fn set_text(&self, tree: &mut AreaTree, text: &str) -> bool {
        let changed = tree.node_mut(self.root).is_some_and(|n| match &mut n.widget {
            Widget::Tooltip(t) => t.set_text(&mut n.area, text),
            _ => false,
        });
        if changed {
            tree.request_resize(self.root);
        }
        changed
    }

    pub fn text(&self, tree: &AreaTree) -> Option<String> {
        match tree.widget(self.root)? {
            Widget::Tooltip(t) => Some(t.text()),
            _ => None,
        }
    }
}

/// Place a tooltip of `size` next to the panel at `panel`, centered on the
/// pointer along the panel's main axis and kept inside `monitor`.
pub fn place(
    size: (i32, i32),
    anchor: (i32, i32),
    panel: Rect,
    orientation: Orientation,
    monitor: &MonitorGeometry,
) -> Rect {
    let (w, h) = size;
    let clamp = |v: i32, lo: i32, len: i32, total: i32| v.clamp(lo, (lo + total - len).max(lo));
    match orientation {
        Orientation::Horizontal => {
            let x = clamp(anchor.0 - w / 2, monitor.x, w, monitor.width);
            let below = panel.y + panel.height / 2 < monitor.y + monitor.height / 2;
            let y = if below { panel.bottom() } else { panel.y - h };
            Rect::new(x, y, w, h)
        }
        Orientation::Vertical => {
            let y = clamp(anchor.1 - h / 2, monitor.y, h, monitor.height);
            let right = panel.x + panel.width / 2 < monitor.x + monitor.width / 2;
            let x = if right { panel.right() } else { panel.x - w };
            Rect::new(x, y, w, h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONITOR: MonitorGeometry = MonitorGeometry {
        x: 0,
        y: 0,
        width: 1000,
        height: 800,
    };

    #[test]
    fn test_above_bottom_panel_and_clamped() {
        let panel = Rect::new(0, 770, 1000, 30);
        let r = place((100, 20), (500, 785), panel, Orientation::Horizontal, &MONITOR);
        assert_eq!(r, Rect::new(450, 750, 100, 20));

        let r = place((100, 20), (990, 785), panel, Orientation::Horizontal, &MONITOR);
        assert_eq!(r.x, 900);
    }

    #[test]
    fn test_below_top_panel() {
        let panel = Rect::new(0, 0, 1000, 30);
        let r = place((100, 20), (10, 5), panel, Orientation::Horizontal, &MONITOR);
        assert_eq!(r, Rect::new(0, 30, 100, 20));
    }

    #[test]
    fn test_beside_vertical_panel() {
        let panel = Rect::new(0, 0, 40, 800);
        let r = place((120, 20), (20, 400), panel, Orientation::Vertical, &MONITOR);
        assert_eq!(r, Rect::new(40, 390, 120, 20));
    }
}
