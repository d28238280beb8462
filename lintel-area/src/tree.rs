//! Arena-backed area tree.
//!
//! Parents own child ids, children point back at their parent. Widgets are
//! stored next to their area so layout and drawing can hand both to the
//! per-kind hooks in one borrow.

use tracing::{debug, trace};

use crate::area::{Area, AreaId, MouseState};
use crate::backend::Renderer;
use crate::widgets::{AreaBehavior, ClickAction, ClickEvent, Widget};

#[derive(Debug)]
pub struct Node {
    pub area: Area,
    pub widget: Widget,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

#[derive(Debug, Default)]
pub struct AreaTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    hovered: Option<AreaId>,
    needs_refresh: bool,
}

impl AreaTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node. A panel widget becomes its own panel.
    pub fn insert(&mut self, mut area: Area, widget: Widget) -> AreaId {
        let is_panel = matches!(widget, Widget::Panel(_));
        area.parent = None;
        area.children.clear();
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                AreaId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: None,
                });
                AreaId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        if is_panel {
            area.panel = Some(id);
        }
        self.slots[id.index as usize].node = Some(Node { area, widget });
        self.needs_refresh = true;
        id
    }

    pub fn contains(&self, id: AreaId) -> bool {
        self.node(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node(&self, id: AreaId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_ref())
    }

    pub fn node_mut(&mut self, id: AreaId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.node.as_mut())
    }

    pub fn get(&self, id: AreaId) -> Option<&Area> {
        self.node(id).map(|n| &n.area)
    }

    pub fn get_mut(&mut self, id: AreaId) -> Option<&mut Area> {
        self.node_mut(id).map(|n| &mut n.area)
    }

    pub fn widget(&self, id: AreaId) -> Option<&Widget> {
        self.node(id).map(|n| &n.widget)
    }

    pub fn widget_mut(&mut self, id: AreaId) -> Option<&mut Widget> {
        self.node_mut(id).map(|n| &mut n.widget)
    }

    /// Mutable access to two distinct nodes at once.
    fn pair_mut(&mut self, a: AreaId, b: AreaId) -> Option<(&mut Node, &mut Node)> {
        if a.index == b.index {
            return None;
        }
        let (lo, hi, swapped) = if a.index < b.index {
            (a, b, false)
        } else {
            (b, a, true)
        };
        let (head, tail) = self.slots.split_at_mut(hi.index as usize);
        let lo_slot = head.get_mut(lo.index as usize)?;
        let hi_slot = tail.first_mut()?;
        if lo_slot.generation != lo.generation || hi_slot.generation != hi.generation {
            return None;
        }
        let lo_node = lo_slot.node.as_mut()?;
        let hi_node = hi_slot.node.as_mut()?;
        Some(if swapped {
            (hi_node, lo_node)
        } else {
            (lo_node, hi_node)
        })
    }

    pub fn children(&self, id: AreaId) -> Vec<AreaId> {
        self.get(id).map(|a| a.children.clone()).unwrap_or_default()
    }

    pub fn parent(&self, id: AreaId) -> Option<AreaId> {
        self.get(id).and_then(|a| a.parent)
    }

    pub fn panel_of(&self, id: AreaId) -> Option<AreaId> {
        self.get(id).and_then(|a| a.panel)
    }

    /// Append `child` to `parent`. The child must be detached.
    pub fn add_child(&mut self, parent: AreaId, child: AreaId) -> bool {
        let Some(panel) = self.get(parent).map(|p| p.panel) else {
            return false;
        };
        match self.get(child) {
            Some(c) if c.parent.is_none() && child != parent => {}
            _ => return false,
        }
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
            p.need_resize = true;
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(panel) = panel {
            self.assign_panel(child, panel);
        }
        self.needs_refresh = true;
        true
    }

    fn assign_panel(&mut self, id: AreaId, panel: AreaId) {
        let children = match self.get_mut(id) {
            Some(a) => {
                a.panel = Some(panel);
                a.children.clone()
            }
            None => return,
        };
        for child in children {
            self.assign_panel(child, panel);
        }
    }

    /// Detach `child` from `parent`, letting the parent's widget release
    /// anything it cached for the child. The child stays in the arena.
    pub fn remove_child(
        &mut self,
        parent: AreaId,
        child: AreaId,
        renderer: &mut dyn Renderer,
    ) -> bool {
        let Some((p, c)) = self.pair_mut(parent, child) else {
            return false;
        };
        let Some(pos) = p.area.children.iter().position(|&id| id == child) else {
            return false;
        };
        p.widget.on_remove_child(&mut c.area, &mut c.widget, renderer);
        p.area.children.remove(pos);
        p.area.need_resize = true;
        c.area.parent = None;
        self.needs_refresh = true;
        true
    }

    /// Remove `id` and its whole subtree, freeing backend resources.
    pub fn destroy(&mut self, id: AreaId, renderer: &mut dyn Renderer) {
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id, renderer);
        }
        self.destroy_subtree(id, renderer);
        self.needs_refresh = true;
    }

    fn destroy_subtree(&mut self, id: AreaId, renderer: &mut dyn Renderer) {
        let Some(slot) = self
            .slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
        else {
            return;
        };
        let Some(mut node) = slot.node.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        if self.hovered == Some(id) {
            self.hovered = None;
        }

        trace!("destroying area {}", node.area.name);
        node.widget.release_resources(renderer);
        if let Some(pixmap) = node.area.pixmap.take() {
            renderer.free_pixmap(pixmap);
        }
        for child in node.area.children {
            self.destroy_subtree(child, renderer);
        }
    }

    /// Mark `id` and all of its descendants for redraw.
    pub fn set_redraw(&mut self, id: AreaId) {
        let children = match self.get_mut(id) {
            Some(a) => {
                a.need_redraw = true;
                a.children.clone()
            }
            None => return,
        };
        self.needs_refresh = true;
        for child in children {
            self.set_redraw(child);
        }
    }

    /// Request a layout pass starting at `id`.
    pub fn request_resize(&mut self, id: AreaId) {
        if let Some(a) = self.get_mut(id) {
            a.need_resize = true;
            self.needs_refresh = true;
        }
    }

    /// Show or hide an area. The parent is re-laid out.
    pub fn set_on_screen(&mut self, id: AreaId, on_screen: bool) {
        let parent = match self.get_mut(id) {
            Some(a) if a.on_screen != on_screen => {
                a.on_screen = on_screen;
                a.need_resize = true;
                a.parent
            }
            _ => return,
        };
        if let Some(parent) = parent {
            self.request_resize(parent);
            self.set_redraw(parent);
        }
        self.needs_refresh = true;
    }

    /// Something changed since the last frame.
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    pub fn mark_refreshed(&mut self) {
        self.needs_refresh = false;
    }

    pub(crate) fn request_refresh(&mut self) {
        self.needs_refresh = true;
    }

    pub fn is_point_inside(&self, id: AreaId, x: i32, y: i32) -> bool {
        self.get(id).is_some_and(|a| a.is_point_inside(x, y))
    }

    /// Deepest visible area under `(x, y)`, starting from `root`. When
    /// siblings overlap the last added one wins.
    pub fn innermost_area_under_point(&self, root: AreaId, x: i32, y: i32) -> Option<AreaId> {
        let root_area = self.get(root)?;
        if !root_area.on_screen || !root_area.is_point_inside(x, y) {
            return None;
        }
        let mut current = root;
        'descend: loop {
            let area = self.get(current)?;
            for &child in area.children.iter().rev() {
                if self
                    .get(child)
                    .is_some_and(|c| c.on_screen && c.is_point_inside(x, y))
                {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// Route a click to the innermost area that claims it, walking up
    /// through ancestors.
    pub fn click(&mut self, root: AreaId, event: &ClickEvent) -> Option<(AreaId, ClickAction)> {
        let mut current = self.innermost_area_under_point(root, event.x, event.y);
        while let Some(id) = current {
            let node = self.node_mut(id)?;
            if node.widget.handles_click(&node.area, event) {
                let action = node.widget.on_click(&node.area, event);
                debug!("click handled on {}: {:?}", node.area.name, action);
                return Some((id, action));
            }
            current = node.area.parent;
        }
        None
    }

    pub fn tooltip_text(&self, id: AreaId) -> Option<String> {
        self.widget(id).and_then(|w| w.tooltip_text())
    }

    pub fn hovered(&self) -> Option<AreaId> {
        self.hovered
    }

    /// Move the pointer onto `area`. The previously hovered area, if
    /// different, returns to normal first.
    pub fn mouse_over(&mut self, area: Option<AreaId>, pressed: bool) {
        if self.hovered != area {
            self.mouse_leave();
        }
        let Some(id) = area else {
            return;
        };
        let state = if pressed {
            MouseState::Pressed
        } else {
            MouseState::Hover
        };
        let Some(a) = self.get_mut(id) else {
            return;
        };
        let redraw = a.mouse_effects && a.mouse_state != state;
        a.mouse_state = state;
        self.hovered = Some(id);
        if redraw {
            self.set_redraw(id);
        }
    }

    /// Return the hovered area to normal.
    pub fn mouse_leave(&mut self) {
        let Some(id) = self.hovered.take() else {
            return;
        };
        let Some(a) = self.get_mut(id) else {
            return;
        };
        let redraw = a.mouse_effects && a.mouse_state != MouseState::Normal;
        a.mouse_state = MouseState::Normal;
        if redraw {
            self.set_redraw(id);
        }
    }

    /// Ids of `root` and its descendants in pre-order.
    pub fn descendants(&self, root: AreaId) -> Vec<AreaId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(area) = self.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(area.children.iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::SizeMode;
    use crate::headless::HeadlessRenderer;
    use crate::primitives::{Orientation, Rect};
    use crate::widgets::{Container, Panel};

    fn boxed(name: &str, rect: Rect) -> (Area, Widget) {
        (
            Area::new(name, SizeMode::ByContent).with_rect(rect),
            Widget::Container(Container),
        )
    }

    #[test]
    fn test_panel_is_assigned_to_descendants() {
        let mut tree = AreaTree::new();
        let panel = tree.insert(
            Area::new("panel", SizeMode::ByLayout),
            Widget::Panel(Panel::new(Orientation::Horizontal, 0)),
        );
        let (a, w) = boxed("outer", Rect::ZERO);
        let outer = tree.insert(a, w);
        let (a, w) = boxed("inner", Rect::ZERO);
        let inner = tree.insert(a, w);

        assert!(tree.add_child(outer, inner));
        assert_eq!(tree.panel_of(inner), None);
        assert!(tree.add_child(panel, outer));
        assert_eq!(tree.panel_of(panel), Some(panel));
        assert_eq!(tree.panel_of(inner), Some(panel));
        assert_eq!(tree.parent(inner), Some(outer));
    }

    #[test]
    fn test_add_child_rejects_attached_or_self() {
        let mut tree = AreaTree::new();
        let (a, w) = boxed("a", Rect::ZERO);
        let a = tree.insert(a, w);
        let (b, w) = boxed("b", Rect::ZERO);
        let b = tree.insert(b, w);
        let (c, w) = boxed("c", Rect::ZERO);
        let c = tree.insert(c, w);
        assert!(tree.add_child(a, b));
        assert!(!tree.add_child(c, b));
        assert!(!tree.add_child(a, a));
    }

    #[test]
    fn test_remove_child_by_identity() {
        let mut tree = AreaTree::new();
        let mut r = HeadlessRenderer::new();
        let (a, w) = boxed("parent", Rect::ZERO);
        let parent = tree.insert(a, w);
        let kids: Vec<AreaId> = (0..3)
            .map(|i| {
                let (a, w) = boxed(&format!("c{i}"), Rect::ZERO);
                let id = tree.insert(a, w);
                tree.add_child(parent, id);
                id
            })
            .collect();

        assert!(tree.remove_child(parent, kids[1], &mut r));
        assert_eq!(tree.children(parent), vec![kids[0], kids[2]]);
        assert_eq!(tree.parent(kids[1]), None);
        assert!(tree.contains(kids[1]));
        assert!(!tree.remove_child(parent, kids[1], &mut r));
    }

    #[test]
    fn test_destroy_invalidates_ids() {
        let mut tree = AreaTree::new();
        let mut r = HeadlessRenderer::new();
        let (a, w) = boxed("parent", Rect::ZERO);
        let parent = tree.insert(a, w);
        let (a, w) = boxed("child", Rect::ZERO);
        let child = tree.insert(a, w);
        tree.add_child(parent, child);

        tree.destroy(parent, &mut r);
        assert!(!tree.contains(parent));
        assert!(!tree.contains(child));
        assert!(tree.is_empty());

        let (a, w) = boxed("reused", Rect::ZERO);
        let reused = tree.insert(a, w);
        assert_ne!(reused, parent);
        assert_ne!(reused, child);
        assert!(tree.get(parent).is_none());
    }

    #[test]
    fn test_set_redraw_propagates() {
        let mut tree = AreaTree::new();
        let (a, w) = boxed("root", Rect::ZERO);
        let root = tree.insert(a, w);
        let (a, w) = boxed("leaf", Rect::ZERO);
        let leaf = tree.insert(a, w);
        tree.add_child(root, leaf);
        tree.get_mut(root).unwrap().need_redraw = false;
        tree.get_mut(leaf).unwrap().need_redraw = false;
        tree.mark_refreshed();

        tree.set_redraw(root);
        assert!(tree.get(leaf).unwrap().need_redraw);
        assert!(tree.needs_refresh());
    }

    #[test]
    fn test_descendants_preorder() {
        let mut tree = AreaTree::new();
        let ids: Vec<AreaId> = (0..4)
            .map(|i| {
                let (a, w) = boxed(&format!("n{i}"), Rect::ZERO);
                tree.insert(a, w)
            })
            .collect();
        tree.add_child(ids[0], ids[1]);
        tree.add_child(ids[1], ids[2]);
        tree.add_child(ids[0], ids[3]);
        assert_eq!(tree.descendants(ids[0]), ids);
    }
}
