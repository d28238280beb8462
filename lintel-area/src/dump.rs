//! Serializable snapshot of a laid-out tree.

use serde::Serialize;

use crate::area::{AreaId, SizeMode};
use crate::primitives::Rect;
use crate::tree::AreaTree;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaSnapshot {
    pub kind: &'static str,
    pub name: String,
    pub rect: Rect,
    pub on_screen: bool,
    pub size_mode: SizeMode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<AreaSnapshot>,
}

impl AreaTree {
    pub fn snapshot(&self, id: AreaId) -> Option<AreaSnapshot> {
        let node = self.node(id)?;
        Some(AreaSnapshot {
            kind: node.widget.kind(),
            name: node.area.name.clone(),
            rect: node.area.rect(),
            on_screen: node.area.on_screen,
            size_mode: node.area.size_mode,
            children: node
                .area
                .children
                .iter()
                .filter_map(|&c| self.snapshot(c))
                .collect(),
        })
    }
}
