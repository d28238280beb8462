//! The root of a panel's area tree.

use crate::area::Area;
use crate::primitives::Orientation;

use super::{AreaBehavior, ClickAction, ClickEvent};

#[derive(Debug, Clone)]
pub struct Panel {
    pub orientation: Orientation,
    pub monitor: usize,
    /// Forward unclaimed clicks to the window manager.
    pub wm_menu: bool,
}

impl Panel {
    pub fn new(orientation: Orientation, monitor: usize) -> Self {
        Self {
            orientation,
            monitor,
            wm_menu: false,
        }
    }
}

impl AreaBehavior for Panel {
    fn on_click(&mut self, _area: &Area, _event: &ClickEvent) -> ClickAction {
        if self.wm_menu {
            ClickAction::ForwardToRoot
        } else {
            ClickAction::None
        }
    }
}
