//! Container-Rahmen, Chrome-Maße der Tabellen und die daraus folgende Zeichenfläche.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Position einer Tabelle relativ zur Zeichenfläche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableSide {
    Left,
    Right,
    Top,
}

impl TableSide {
    /// Gegenüberliegende Tabelle (Top ist sich selbst gegenüber nicht definiert).
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Top => Self::Left,
        }
    }

    /// Alle Seiten in fester Reihenfolge.
    pub const ALL: [TableSide; 3] = [TableSide::Left, TableSide::Right, TableSide::Top];
}

/// Größe des Host-Containers in Pixeln.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
}

impl Frame {
    /// Erstellt einen Rahmen.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Ausmaße der Tabellen um die Zeichenfläche.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChromeLayout {
    pub left_width: f32,
    pub left_height: f32,
    pub right_width: f32,
    pub right_height: f32,
    pub top_width: f32,
    pub top_height: f32,
}

impl ChromeLayout {
    /// Zeichenfläche, die dieses Chrome im gegebenen Rahmen frei lässt.
    pub fn canvas(&self, frame: Frame) -> CanvasRect {
        CanvasRect::new(
            Vec2::new(self.left_width, self.top_height),
            Vec2::new(
                (frame.width - self.left_width - self.right_width).max(0.0),
                (frame.height - self.top_height).max(0.0),
            ),
        )
    }

    /// Lineare Interpolation zwischen zwei Chrome-Zuständen (`t` in 0..=1).
    pub fn lerp(&self, other: &ChromeLayout, t: f32) -> ChromeLayout {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        ChromeLayout {
            left_width: mix(self.left_width, other.left_width),
            left_height: mix(self.left_height, other.left_height),
            right_width: mix(self.right_width, other.right_width),
            right_height: mix(self.right_height, other.right_height),
            top_width: mix(self.top_width, other.top_width),
            top_height: mix(self.top_height, other.top_height),
        }
    }
}

/// Rechteck der Zeichenfläche.
///
/// `origin` ist die Lage im Host-Container; alle Layout-Koordinaten
/// sind relativ zur linken oberen Ecke der Fläche.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl CanvasRect {
    /// Erstellt ein Rechteck.
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Rechteck am Ursprung mit gegebener Größe.
    pub fn sized(width: f32, height: f32) -> Self {
        Self::new(Vec2::ZERO, Vec2::new(width, height))
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Mittelpunkt in Flächen-Koordinaten.
    pub fn center(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Gibt `true` zurück, wenn der Punkt (Flächen-Koordinaten) innerhalb liegt.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.size.x && point.y <= self.size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn canvas_is_frame_minus_chrome() {
        let chrome = ChromeLayout {
            left_width: 200.0,
            left_height: 400.0,
            top_width: 600.0,
            top_height: 200.0,
            ..Default::default()
        };
        let canvas = chrome.canvas(Frame::new(800.0, 600.0));
        assert_relative_eq!(canvas.origin.x, 200.0);
        assert_relative_eq!(canvas.origin.y, 200.0);
        assert_relative_eq!(canvas.width(), 600.0);
        assert_relative_eq!(canvas.height(), 400.0);
    }

    #[test]
    fn lerp_clamps_progress() {
        let a = ChromeLayout::default();
        let b = ChromeLayout {
            left_width: 100.0,
            ..Default::default()
        };
        assert_relative_eq!(a.lerp(&b, 0.5).left_width, 50.0);
        assert_relative_eq!(a.lerp(&b, 2.0).left_width, 100.0);
    }
}
