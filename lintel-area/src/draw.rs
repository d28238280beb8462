//! Dirty-tracked drawing.
//!
//! Each visible area renders into its own pixmap; [`AreaTree::draw_tree`]
//! composites those onto the panel's surface.

use tracing::trace;

use crate::area::AreaId;
use crate::backend::{PixmapId, Renderer};
use crate::primitives::Rect;
use crate::theme::Theme;
use crate::tree::AreaTree;
use crate::widgets::AreaBehavior;

impl AreaTree {
    /// Redraw `id` into a fresh pixmap: background first, then content.
    ///
    /// Areas that are hidden or have no extent are left untouched, with no
    /// pixmap allocated and nothing painted.
    pub fn draw(&mut self, id: AreaId, renderer: &mut dyn Renderer, theme: &Theme) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let area = &mut node.area;
        if !area.on_screen || area.width <= 0 || area.height <= 0 {
            return;
        }
        if let Some(old) = area.pixmap.take() {
            renderer.free_pixmap(old);
        }
        let pixmap = renderer.create_pixmap(area.width, area.height);
        node.widget.draw_background(&node.area, renderer, pixmap, theme);
        node.widget.draw_foreground(&node.area, renderer, pixmap, theme);
        node.area.pixmap = Some(pixmap);
        node.area.need_redraw = false;
        trace!("drew {}", node.area.name);
    }

    /// Draw `id` only if it is marked dirty.
    pub fn refresh(&mut self, id: AreaId, renderer: &mut dyn Renderer, theme: &Theme) {
        if self.get(id).is_some_and(|a| a.need_redraw) {
            self.draw(id, renderer, theme);
        }
    }

    /// Refresh the subtree at `id` and composite it onto `target`.
    pub fn draw_tree(
        &mut self,
        id: AreaId,
        renderer: &mut dyn Renderer,
        theme: &Theme,
        target: PixmapId,
    ) {
        if !self.get(id).is_some_and(|a| a.on_screen) {
            return;
        }
        self.refresh(id, renderer, theme);
        let Some(area) = self.get(id) else {
            return;
        };
        if let Some(pixmap) = area.pixmap {
            if area.width > 0 && area.height > 0 {
                let src = Rect::new(0, 0, area.width, area.height);
                renderer.copy_area(pixmap, target, src, area.x, area.y);
            }
        }
        for child in area.children.clone() {
            self.draw_tree(child, renderer, theme, target);
        }
    }
}
