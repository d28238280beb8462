//! A renderer that records paint operations instead of rasterizing.
//!
//! Used by tests and by the headless display backend. Text is measured with
//! a fixed advance per character derived from the font size.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::backend::{
    FontSpec, ImageAdjust, ImageHandle, Paint, PixmapId, Renderer, TextMeasure, TextRun,
};
use crate::primitives::{BorderSides, Color, Rect, Size};
use crate::theme::GradientKind;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PaintOp {
    Fill {
        target: PixmapId,
        rect: Rect,
        color: Option<Color>,
        gradient: Option<GradientKind>,
    },
    Stroke {
        target: PixmapId,
        rect: Rect,
        width: i32,
        color: Color,
    },
    Text {
        target: PixmapId,
        text: String,
        rect: Rect,
    },
    Image {
        target: PixmapId,
        image: ImageHandle,
        rect: Rect,
    },
    Copy {
        src: PixmapId,
        dst: PixmapId,
        src_rect: Rect,
        dst_x: i32,
        dst_y: i32,
    },
}

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_id: u64,
    pixmaps: HashMap<PixmapId, Size>,
    images: HashMap<ImageHandle, PathBuf>,
    ops: Vec<PaintOp>,
    created: usize,
    freed: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[PaintOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<PaintOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of draw primitives recorded, excluding compositing copies.
    pub fn paint_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| !matches!(op, PaintOp::Copy { .. }))
            .count()
    }

    pub fn live_pixmaps(&self) -> usize {
        self.pixmaps.len()
    }

    pub fn pixmap_size(&self, pixmap: PixmapId) -> Option<Size> {
        self.pixmaps.get(&pixmap).copied()
    }

    pub fn created_pixmaps(&self) -> usize {
        self.created
    }

    pub fn freed_pixmaps(&self) -> usize {
        self.freed
    }

    /// Every text string drawn onto `target`.
    pub fn texts_on(&self, target: PixmapId) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                PaintOp::Text { target: t, text, .. } if *t == target => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn alloc(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

fn advance(font: &FontSpec) -> i32 {
    (font.size() * 0.6).ceil() as i32
}

fn line_height(font: &FontSpec) -> i32 {
    (font.size() * 1.4).ceil() as i32
}

impl TextMeasure for HeadlessRenderer {
    fn measure_text(&self, font: &FontSpec, text: &str) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
        let lines = text.lines().count().max(1) as i32;
        Size::new(widest * advance(font), lines * line_height(font))
    }
}

impl Renderer for HeadlessRenderer {
    fn create_pixmap(&mut self, width: i32, height: i32) -> PixmapId {
        let id = PixmapId(self.alloc());
        self.pixmaps.insert(id, Size::new(width, height));
        self.created += 1;
        id
    }

    fn free_pixmap(&mut self, pixmap: PixmapId) {
        if self.pixmaps.remove(&pixmap).is_some() {
            self.freed += 1;
        }
    }

    fn copy_area(&mut self, src: PixmapId, dst: PixmapId, src_rect: Rect, dst_x: i32, dst_y: i32) {
        self.ops.push(PaintOp::Copy {
            src,
            dst,
            src_rect,
            dst_x,
            dst_y,
        });
    }

    fn fill_rect(&mut self, target: PixmapId, rect: Rect, _radius: i32, paint: Paint<'_>) {
        let (color, gradient) = match paint {
            Paint::Solid(c) => (Some(c), None),
            Paint::Gradient(g) => (None, Some(g.kind)),
        };
        self.ops.push(PaintOp::Fill {
            target,
            rect,
            color,
            gradient,
        });
    }

    fn stroke_rect(
        &mut self,
        target: PixmapId,
        rect: Rect,
        _radius: i32,
        width: i32,
        _sides: BorderSides,
        color: Color,
    ) {
        self.ops.push(PaintOp::Stroke {
            target,
            rect,
            width,
            color,
        });
    }

    fn draw_text(&mut self, target: PixmapId, run: &TextRun<'_>) {
        self.ops.push(PaintOp::Text {
            target,
            text: run.text.to_string(),
            rect: run.rect,
        });
    }

    fn load_image(&mut self, path: &Path, _size: i32) -> Option<ImageHandle> {
        if !path.is_file() {
            return None;
        }
        let handle = ImageHandle(self.alloc());
        self.images.insert(handle, path.to_path_buf());
        Some(handle)
    }

    fn draw_image(&mut self, target: PixmapId, image: ImageHandle, rect: Rect, _adjust: ImageAdjust) {
        self.ops.push(PaintOp::Image {
            target,
            image,
            rect,
        });
    }
}
