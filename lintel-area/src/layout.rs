//! Two-pass layout.
//!
//! The fixed pass walks the tree post-order and lets content-sized areas
//! measure themselves; a size change there invalidates the parent. The
//! dynamic pass walks pre-order, splits the space left over in each
//! container between its layout-sized children and positions every child
//! along the main axis.

use tracing::{debug, trace};

use crate::area::{AreaId, SizeMode};
use crate::backend::TextMeasure;
use crate::primitives::{Alignment, Orientation, Rect};
use crate::theme::{Border, Theme};
use crate::tree::AreaTree;
use crate::widgets::{AreaBehavior, LayoutContext, Widget};

/// The pool of items a panel's item-order string selects from.
#[derive(Debug, Clone, Default)]
pub struct PanelItems {
    pub launcher: Option<AreaId>,
    pub taskbars: Vec<AreaId>,
    pub systray: Option<AreaId>,
    pub clock: Option<AreaId>,
    pub battery: Option<AreaId>,
    pub separators: Vec<AreaId>,
    pub execps: Vec<AreaId>,
    pub buttons: Vec<AreaId>,
}

fn border_main(border: &Border, o: Orientation) -> (i32, i32) {
    match o {
        Orientation::Horizontal => (border.left(), border.right()),
        Orientation::Vertical => (border.top(), border.bottom()),
    }
}

fn border_cross(border: &Border, o: Orientation) -> (i32, i32) {
    match o {
        Orientation::Horizontal => (border.top(), border.bottom()),
        Orientation::Vertical => (border.left(), border.right()),
    }
}

impl AreaTree {
    /// Build the layout context for the tree `root` belongs to.
    fn layout_context<'a>(
        &self,
        root: AreaId,
        measure: &'a dyn TextMeasure,
        theme: &'a Theme,
    ) -> Option<LayoutContext<'a>> {
        let panel_id = self.panel_of(root).unwrap_or(root);
        let panel = self.node(panel_id)?;
        let orientation = match &panel.widget {
            Widget::Panel(p) => p.orientation,
            _ => Orientation::Horizontal,
        };
        let area = &panel.area;
        let (start, end) = border_cross(&theme.background(area.background).border, orientation);
        let panel_cross =
            (area.cross_size(orientation) - start - end - 2 * area.padding.vertical).max(0);
        Some(LayoutContext {
            measure,
            theme,
            orientation,
            panel_cross,
        })
    }

    /// Recompute sizes and positions below `root`.
    pub fn relayout(&mut self, root: AreaId, measure: &dyn TextMeasure, theme: &Theme) {
        let Some(ctx) = self.layout_context(root, measure, theme) else {
            return;
        };
        trace!("relayout from {:?}", root);
        self.relayout_fixed(root, &ctx);
        self.relayout_dynamic(root, &ctx);
    }

    fn visible_children(&self, id: AreaId) -> Vec<AreaId> {
        self.get(id)
            .map(|a| {
                a.children
                    .iter()
                    .copied()
                    .filter(|&c| self.get(c).is_some_and(|c| c.on_screen))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn relayout_fixed(&mut self, id: AreaId, ctx: &LayoutContext<'_>) {
        if !self.get(id).is_some_and(|a| a.on_screen) {
            return;
        }
        let children = self.visible_children(id);
        for &child in &children {
            self.relayout_fixed(child, ctx);
        }

        let Some(node) = self.node_mut(id) else {
            return;
        };
        node.area.changed = false;
        if !(node.area.need_resize && node.area.size_mode == SizeMode::ByContent) {
            return;
        }
        node.area.need_resize = false;
        if node.widget.resize(&mut node.area, ctx, children.len()) {
            node.area.changed = true;
            debug!(
                "{} resized to content: {}x{}",
                node.area.name, node.area.width, node.area.height
            );
            if let Some(parent) = node.area.parent {
                self.request_resize(parent);
            }
        }
    }

    fn relayout_dynamic(&mut self, id: AreaId, ctx: &LayoutContext<'_>) {
        let Some(area) = self.get(id) else {
            return;
        };
        if !area.on_screen {
            return;
        }

        if area.need_resize && area.size_mode == SizeMode::ByLayout {
            let max = self.widget(id).map(|w| w.max_child_extent()).unwrap_or(0);
            self.relayout_with_constraint(id, max, ctx);
            if let Some(a) = self.get_mut(id) {
                a.need_resize = false;
            }
        }

        let children = self.visible_children(id);
        let Some(node) = self.node(id) else {
            return;
        };
        let rects = node
            .widget
            .arrange_children(&node.area, ctx, children.len())
            .unwrap_or_else(|| self.linear_positions(id, &children, ctx));

        for (&child, rect) in children.iter().zip(rects) {
            let Some(c) = self.get_mut(child) else {
                continue;
            };
            let moved = c.rect() != rect;
            if moved {
                c.set_rect(rect);
                c.changed = true;
            }
            if moved && c.size_mode == SizeMode::ByLayout && !c.children.is_empty() {
                c.need_resize = true;
            }
            self.relayout_dynamic(child, ctx);
        }

        let Some(node) = self.node_mut(id) else {
            return;
        };
        if node.area.changed {
            node.area.need_redraw = true;
            node.widget.on_change_layout(&node.area);
            self.request_refresh();
        }
    }

    /// Place children one after another according to the container's
    /// alignment, centered on the cross axis.
    fn linear_positions(&self, id: AreaId, children: &[AreaId], ctx: &LayoutContext<'_>) -> Vec<Rect> {
        let o = ctx.orientation;
        let Some(area) = self.get(id) else {
            return Vec::new();
        };
        let border = ctx.theme.background(area.background).border;
        let (b_start, b_end) = border_main(&border, o);
        let pad = area.padding;

        let sizes: Vec<(i32, i32)> = children
            .iter()
            .filter_map(|&c| self.get(c))
            .map(|c| (c.main_size(o), c.cross_size(o)))
            .collect();
        let total: i32 = sizes.iter().map(|(m, _)| m).sum::<i32>()
            + pad.spacing * (sizes.len() as i32 - 1).max(0);

        let main_pos = area.main_pos(o);
        let main_size = area.main_size(o);
        let mut pos = match area.alignment {
            Alignment::Left => main_pos + b_start + pad.horizontal,
            Alignment::Right => main_pos + main_size - b_end - pad.horizontal - total,
            Alignment::Center => main_pos + (main_size - total) / 2,
        };

        let cross_pos = area.cross_pos(o);
        let cross_size = area.cross_size(o);
        sizes
            .into_iter()
            .map(|(main, cross)| {
                let c = cross_pos + (cross_size - cross) / 2;
                let rect = match o {
                    Orientation::Horizontal => Rect::new(pos, c, main, cross),
                    Orientation::Vertical => Rect::new(c, pos, cross, main),
                };
                pos += main + pad.spacing;
                rect
            })
            .collect()
    }

    /// Split the free main-axis space of `id` equally between its visible
    /// layout-sized children, remainder pixels going to the first ones.
    /// `max_extent` caps each share when positive. Returns true if any
    /// child changed size.
    pub fn relayout_with_constraint(
        &mut self,
        id: AreaId,
        max_extent: i32,
        ctx: &LayoutContext<'_>,
    ) -> bool {
        let o = ctx.orientation;
        let Some(area) = self.get(id) else {
            return false;
        };
        let border = ctx.theme.background(area.background).border;
        let (bm_start, bm_end) = border_main(&border, o);
        let (bc_start, bc_end) = border_cross(&border, o);
        let pad = area.padding;
        let mut free = area.main_size(o) - bm_start - bm_end - 2 * pad.horizontal;
        let cross = (area.cross_size(o) - bc_start - bc_end - 2 * pad.vertical).max(0);

        let children = self.visible_children(id);
        let mut flexible = Vec::new();
        for &child in &children {
            let Some(c) = self.get(child) else {
                continue;
            };
            match c.size_mode {
                SizeMode::ByContent => free -= c.main_size(o),
                SizeMode::ByLayout => flexible.push(child),
            }
        }
        if !children.is_empty() {
            free -= (children.len() as i32 - 1) * pad.spacing;
        }
        if flexible.is_empty() {
            return false;
        }

        let free = free.max(0);
        let count = flexible.len() as i32;
        let (mut share, mut remainder) = (free / count, free % count);
        if max_extent > 0 && share > max_extent {
            share = max_extent;
            remainder = 0;
        }

        let mut any_changed = false;
        for child in flexible {
            let extra = if remainder > 0 {
                remainder -= 1;
                1
            } else {
                0
            };
            let Some(c) = self.get_mut(child) else {
                continue;
            };
            if c.set_extent(o, share + extra, cross) {
                c.changed = true;
                c.need_redraw = true;
                any_changed = true;
                if !c.children.is_empty() {
                    c.need_resize = true;
                }
            }
        }
        any_changed
    }

    /// Rebuild a panel's children from `order`, one character per item:
    /// `L` launcher, `T` every taskbar, `S` systray, `B` battery, `C` clock,
    /// `:` the next separator, `E` the next executor, `P` the next button.
    /// Characters whose pool is exhausted and unknown characters are skipped.
    pub fn set_items_order(&mut self, panel: AreaId, order: &str, items: &PanelItems) {
        for child in self.children(panel) {
            if let Some(c) = self.get_mut(child) {
                c.parent = None;
            }
        }
        if let Some(p) = self.get_mut(panel) {
            p.children.clear();
        }

        let mut separators = items.separators.iter();
        let mut execps = items.execps.iter();
        let mut buttons = items.buttons.iter();
        let mut selected: Vec<AreaId> = Vec::new();
        for c in order.chars() {
            match c {
                'L' => selected.extend(items.launcher),
                'T' => selected.extend(items.taskbars.iter().copied()),
                'S' => selected.extend(items.systray),
                'B' => selected.extend(items.battery),
                'C' => selected.extend(items.clock),
                ':' => selected.extend(separators.next().copied()),
                'E' => selected.extend(execps.next().copied()),
                'P' => selected.extend(buttons.next().copied()),
                other => debug!("ignoring unknown panel item '{}'", other),
            }
        }

        for id in selected {
            if self.get(id).is_some_and(|a| a.parent.is_some()) {
                continue;
            }
            if self.add_child(panel, id) {
                self.request_resize(id);
            }
        }
        self.request_resize(panel);
        self.set_redraw(panel);
    }
}
