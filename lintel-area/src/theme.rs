//! Backgrounds, borders and gradients shared by areas.
//!
//! Styles are registered once at config load and referenced by id. Index 0
//! of the background table is always the fully transparent default.

use std::str::FromStr;

use serde::Serialize;

use crate::area::MouseState;
use crate::error::StyleError;
use crate::primitives::{BorderSides, Color};

/// Index into [`Theme`]'s background table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct BackgroundId(pub usize);

impl BackgroundId {
    pub const TRANSPARENT: Self = BackgroundId(0);
}

/// Index into [`Theme`]'s gradient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GradientId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GradientKind {
    Vertical,
    Horizontal,
    Radial,
}

impl FromStr for GradientKind {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertical" => Ok(GradientKind::Vertical),
            "horizontal" => Ok(GradientKind::Horizontal),
            "radial" => Ok(GradientKind::Radial),
            other => Err(StyleError::UnknownGradientKind(other.to_string())),
        }
    }
}

/// An intermediate color stop; `offset` is a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

/// A linear or radial gradient with optional intermediate stops.
///
/// Equality is structural: same kind, same endpoint colors and the same
/// ordered list of stops.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gradient {
    pub kind: GradientKind,
    pub start: Color,
    pub end: Color,
    stops: Vec<ColorStop>,
}

impl Gradient {
    pub fn new(kind: GradientKind, start: Color, end: Color) -> Self {
        Self {
            kind,
            start,
            end,
            stops: Vec::new(),
        }
    }

    /// Insert a stop, keeping stops sorted by offset.
    pub fn add_stop(&mut self, offset: f64, color: Color) -> Result<(), StyleError> {
        if !(offset > 0.0 && offset < 100.0) {
            return Err(StyleError::StopOutOfRange(offset));
        }
        if let Some(existing) = self.stops.iter_mut().find(|s| s.offset == offset) {
            existing.color = color;
            return Ok(());
        }
        let at = self
            .stops
            .iter()
            .position(|s| s.offset > offset)
            .unwrap_or(self.stops.len());
        self.stops.insert(at, ColorStop { offset, color });
        Ok(())
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at `t` in `0.0..=1.0` along the gradient.
    pub fn color_at(&self, t: f64) -> Color {
        let pct = t.clamp(0.0, 1.0) * 100.0;
        let mut prev = ColorStop {
            offset: 0.0,
            color: self.start,
        };
        let end = ColorStop {
            offset: 100.0,
            color: self.end,
        };
        for stop in self.stops.iter().chain(std::iter::once(&end)) {
            if pct <= stop.offset {
                let span = stop.offset - prev.offset;
                if span <= 0.0 {
                    return stop.color;
                }
                return prev.color.lerp(&stop.color, (pct - prev.offset) / span);
            }
            prev = *stop;
        }
        self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Border {
    pub color: Color,
    pub width: i32,
    pub radius: i32,
    pub sides: BorderSides,
}

impl Border {
    /// Border thickness on the left and right edges combined.
    pub fn width_lr(&self) -> i32 {
        self.width * (self.sides.left as i32 + self.sides.right as i32)
    }

    /// Border thickness on the top and bottom edges combined.
    pub fn width_tb(&self) -> i32 {
        self.width * (self.sides.top as i32 + self.sides.bottom as i32)
    }

    pub fn left(&self) -> i32 {
        if self.sides.left { self.width } else { 0 }
    }

    pub fn top(&self) -> i32 {
        if self.sides.top { self.width } else { 0 }
    }

    pub fn right(&self) -> i32 {
        if self.sides.right { self.width } else { 0 }
    }

    pub fn bottom(&self) -> i32 {
        if self.sides.bottom { self.width } else { 0 }
    }
}

/// Fill and border of an area. Hover and pressed overrides fall back to
/// the base values when unset.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Background {
    pub fill: Color,
    pub fill_hover: Option<Color>,
    pub fill_pressed: Option<Color>,
    pub border: Border,
    pub border_hover: Option<Color>,
    pub border_pressed: Option<Color>,
    pub gradient: Option<GradientId>,
    pub gradient_hover: Option<GradientId>,
    pub gradient_pressed: Option<GradientId>,
}

impl Background {
    pub fn fill_for(&self, state: MouseState) -> Color {
        match state {
            MouseState::Normal => self.fill,
            MouseState::Hover => self.fill_hover.unwrap_or(self.fill),
            MouseState::Pressed => self.fill_pressed.unwrap_or(self.fill),
        }
    }

    pub fn border_color_for(&self, state: MouseState) -> Color {
        match state {
            MouseState::Normal => self.border.color,
            MouseState::Hover => self.border_hover.unwrap_or(self.border.color),
            MouseState::Pressed => self.border_pressed.unwrap_or(self.border.color),
        }
    }

    pub fn gradient_for(&self, state: MouseState) -> Option<GradientId> {
        match state {
            MouseState::Normal => self.gradient,
            MouseState::Hover => self.gradient_hover.or(self.gradient),
            MouseState::Pressed => self.gradient_pressed.or(self.gradient),
        }
    }
}

/// Registry of backgrounds and gradients.
#[derive(Debug, Clone, Serialize)]
pub struct Theme {
    backgrounds: Vec<Background>,
    gradients: Vec<Gradient>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    pub fn new() -> Self {
        Self {
            backgrounds: vec![Background::default()],
            gradients: Vec::new(),
        }
    }

    pub fn add_background(&mut self, background: Background) -> BackgroundId {
        self.backgrounds.push(background);
        BackgroundId(self.backgrounds.len() - 1)
    }

    pub fn add_gradient(&mut self, gradient: Gradient) -> GradientId {
        self.gradients.push(gradient);
        GradientId(self.gradients.len() - 1)
    }

    /// Unknown ids resolve to the transparent default.
    pub fn background(&self, id: BackgroundId) -> &Background {
        self.backgrounds
            .get(id.0)
            .unwrap_or(&self.backgrounds[BackgroundId::TRANSPARENT.0])
    }

    pub fn gradient(&self, id: GradientId) -> Option<&Gradient> {
        self.gradients.get(id.0)
    }

    /// Resolve a config index to a background id. Index 0 is transparent
    /// and index N is the N-th configured background.
    pub fn background_by_index(&self, index: usize) -> Option<BackgroundId> {
        (index < self.backgrounds.len()).then_some(BackgroundId(index))
    }

    /// Resolve a 1-based config index to a gradient id. Index 0 means none.
    pub fn gradient_by_index(&self, index: usize) -> Option<GradientId> {
        (index >= 1 && index <= self.gradients.len()).then(|| GradientId(index - 1))
    }

    pub fn background_count(&self) -> usize {
        self.backgrounds.len()
    }

    pub fn gradient_count(&self) -> usize {
        self.gradients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stops_sorted_and_bounded() {
        let mut g = Gradient::new(GradientKind::Vertical, Color::BLACK, Color::WHITE);
        g.add_stop(70.0, Color::WHITE).unwrap();
        g.add_stop(30.0, Color::BLACK).unwrap();
        assert_eq!(g.stops()[0].offset, 30.0);
        assert_eq!(g.stops()[1].offset, 70.0);

        assert_eq!(
            g.add_stop(0.0, Color::WHITE),
            Err(StyleError::StopOutOfRange(0.0))
        );
        assert!(g.add_stop(100.0, Color::WHITE).is_err());
        assert!(g.add_stop(f64::NAN, Color::WHITE).is_err());
        assert_eq!(g.stops().len(), 2);

        g.add_stop(30.0, Color::WHITE).unwrap();
        assert_eq!(g.stops().len(), 2);
        assert_eq!(g.stops()[0].color, Color::WHITE);
    }

    #[test]
    fn test_gradient_structural_equality() {
        let mut a = Gradient::new(GradientKind::Horizontal, Color::BLACK, Color::WHITE);
        let mut b = a.clone();
        assert_eq!(a, b);
        a.add_stop(50.0, Color::WHITE).unwrap();
        assert_ne!(a, b);
        b.add_stop(50.0, Color::WHITE).unwrap();
        assert_eq!(a, b);
        b.kind = GradientKind::Radial;
        assert_ne!(a, b);
    }

    #[test]
    fn test_gradient_color_at() {
        let mut g = Gradient::new(GradientKind::Vertical, Color::BLACK, Color::BLACK);
        g.add_stop(50.0, Color::WHITE).unwrap();
        assert_eq!(g.color_at(0.0), Color::BLACK);
        assert_eq!(g.color_at(0.5), Color::WHITE);
        assert_eq!(g.color_at(1.0), Color::BLACK);
        assert!((g.color_at(0.25).r - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_state_overrides_fall_back() {
        let bg = Background {
            fill: Color::BLACK,
            fill_hover: Some(Color::WHITE),
            ..Default::default()
        };
        assert_eq!(bg.fill_for(MouseState::Hover), Color::WHITE);
        assert_eq!(bg.fill_for(MouseState::Pressed), Color::BLACK);
        assert_eq!(bg.border_color_for(MouseState::Pressed), bg.border.color);
    }

    #[test]
    fn test_theme_default_is_transparent() {
        let theme = Theme::new();
        assert!(theme.background(BackgroundId(0)).fill.is_transparent());
        assert!(theme.background(BackgroundId(42)).fill.is_transparent());
        assert_eq!(theme.gradient_by_index(1), None);
    }

    #[test]
    fn test_border_widths_respect_sides() {
        let border = Border {
            width: 2,
            sides: BorderSides::parse("TB"),
            ..Default::default()
        };
        assert_eq!(border.width_lr(), 0);
        assert_eq!(border.width_tb(), 4);
    }
}
