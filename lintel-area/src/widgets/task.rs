//! A task button representing one client window.

use std::rc::Rc;

use crate::area::{Area, MouseState};
use crate::backend::{FontSpec, ImageAdjust, ImageHandle, PixmapId, Renderer, TextAlign, TextRun};
use crate::primitives::{Color, Rect, Size};
use crate::theme::{BackgroundId, Theme};

use super::{content_rect, paint_background, AreaBehavior, ButtonMap, ClickAction, ClickEvent, TaskAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskState {
    #[default]
    Normal,
    Active,
    Iconified,
    Urgent,
}

impl TaskState {
    pub const COUNT: usize = 4;

    pub fn index(self) -> usize {
        match self {
            TaskState::Normal => 0,
            TaskState::Active => 1,
            TaskState::Iconified => 2,
            TaskState::Urgent => 3,
        }
    }
}

/// Appearance shared by every task of a panel. Arrays are indexed by
/// [`TaskState::index`].
#[derive(Debug, Clone)]
pub struct TaskStyle {
    pub font: FontSpec,
    pub font_colors: [Color; TaskState::COUNT],
    pub backgrounds: [BackgroundId; TaskState::COUNT],
    pub icon_adjust: [ImageAdjust; TaskState::COUNT],
    pub show_icon: bool,
    pub show_text: bool,
    pub centered: bool,
    pub tooltip: bool,
    pub actions: ButtonMap<TaskAction>,
}

impl Default for TaskStyle {
    fn default() -> Self {
        Self {
            font: FontSpec::default(),
            font_colors: [Color::WHITE; TaskState::COUNT],
            backgrounds: [BackgroundId::TRANSPARENT; TaskState::COUNT],
            icon_adjust: [ImageAdjust::default(); TaskState::COUNT],
            show_icon: true,
            show_text: true,
            centered: true,
            tooltip: true,
            actions: ButtonMap {
                left: TaskAction::Toggle,
                middle: TaskAction::None,
                right: TaskAction::Close,
                scroll_up: TaskAction::None,
                scroll_down: TaskAction::None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedBackground {
    pixmap: PixmapId,
    size: Size,
}

#[derive(Debug, Clone)]
pub struct Task {
    pub window: u64,
    pub desktop: Option<usize>,
    title: String,
    icon: Option<ImageHandle>,
    state: TaskState,
    style: Rc<TaskStyle>,
    state_cache: [Option<CachedBackground>; TaskState::COUNT],
}

impl Task {
    pub fn new(window: u64, title: impl Into<String>, style: Rc<TaskStyle>) -> Self {
        Self {
            window,
            desktop: None,
            title: title.into(),
            icon: None,
            state: TaskState::Normal,
            style,
            state_cache: [None; TaskState::COUNT],
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn style(&self) -> &TaskStyle {
        &self.style
    }

    /// Number of states with a cached background.
    pub fn cached_states(&self) -> usize {
        self.state_cache.iter().flatten().count()
    }

    /// Switch state and the background that goes with it.
    pub fn set_state(&mut self, area: &mut Area, state: TaskState) -> bool {
        area.background = self.style.backgrounds[state.index()];
        if self.state == state {
            return false;
        }
        self.state = state;
        area.need_redraw = true;
        true
    }

    pub fn set_title(&mut self, area: &mut Area, title: &str) -> bool {
        if self.title == title {
            return false;
        }
        self.title = title.to_string();
        area.need_redraw = true;
        true
    }

    pub fn set_icon(&mut self, area: &mut Area, icon: Option<ImageHandle>) {
        self.icon = icon;
        area.need_redraw = true;
    }

    fn free_cache(&mut self, renderer: &mut dyn Renderer) {
        for cached in self.state_cache.iter_mut() {
            if let Some(c) = cached.take() {
                renderer.free_pixmap(c.pixmap);
            }
        }
    }
}

impl AreaBehavior for Task {
    fn draw_background(
        &mut self,
        area: &Area,
        renderer: &mut dyn Renderer,
        target: PixmapId,
        theme: &Theme,
    ) {
        if area.effective_mouse_state() != MouseState::Normal {
            paint_background(area, renderer, target, theme);
            return;
        }
        let size = Size::new(area.width, area.height);
        let slot = self.state.index();
        let cached = match self.state_cache[slot] {
            Some(c) if c.size == size => c,
            stale => {
                if let Some(old) = stale {
                    renderer.free_pixmap(old.pixmap);
                }
                let pixmap = renderer.create_pixmap(size.width, size.height);
                paint_background(area, renderer, pixmap, theme);
                let c = CachedBackground { pixmap, size };
                self.state_cache[slot] = Some(c);
                c
            }
        };
        renderer.copy_area(
            cached.pixmap,
            target,
            Rect::new(0, 0, size.width, size.height),
            0,
            0,
        );
    }

    fn draw_foreground(
        &mut self,
        area: &Area,
        renderer: &mut dyn Renderer,
        target: PixmapId,
        theme: &Theme,
    ) {
        let content = content_rect(area, theme);
        let state = self.state.index();
        let mut text_rect = content;

        if self.style.show_icon {
            if let Some(icon) = self.icon {
                let size = content.height.min(content.width);
                let icon_rect = Rect::new(content.x, content.y + (content.height - size) / 2, size, size);
                renderer.draw_image(target, icon, icon_rect, self.style.icon_adjust[state]);
                text_rect = content.inset(size + area.padding.spacing, 0, 0, 0);
            }
        }

        if self.style.show_text && !self.title.is_empty() && !text_rect.is_empty() {
            renderer.draw_text(
                target,
                &TextRun {
                    text: &self.title,
                    font: &self.style.font,
                    color: self.style.font_colors[state],
                    rect: text_rect,
                    align: if self.style.centered {
                        TextAlign::Center
                    } else {
                        TextAlign::Left
                    },
                },
            );
        }
    }

    fn tooltip_text(&self) -> Option<String> {
        (self.style.tooltip && !self.title.is_empty()).then(|| self.title.clone())
    }

    fn handles_click(&self, area: &Area, event: &ClickEvent) -> bool {
        area.on_screen
            && area.is_point_inside(event.x, event.y)
            && self
                .style
                .actions
                .get(event.button)
                .is_some_and(|a| *a != TaskAction::None)
    }

    fn on_click(&mut self, _area: &Area, event: &ClickEvent) -> ClickAction {
        let action = self.style.actions.get(event.button).copied().unwrap_or_default();
        ClickAction::Task {
            window: self.window,
            action,
        }
    }

    fn release_resources(&mut self, renderer: &mut dyn Renderer) {
        self.free_cache(renderer);
    }
}
