//! Zeichen-Vertrag zwischen Engine und Host.
//!
//! Die Engine zeichnet nie selbst; sie erzeugt `DrawCall`s, die der Host
//! in seinem Backend (SVG, Canvas, GPU) ausführt.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::PathSpec;
use crate::core::{EdgeId, EntityId};

/// Stabile ID eines gezeichneten Elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PathId {
    /// Kante (Map oder Link)
    Edge(EdgeId),
    /// Beschriftung einer Kante
    EdgeLabel(EdgeId),
    /// Glyph eines Devices oder Signals
    Node(EntityId),
    /// Beschriftung eines Glyphs
    NodeLabel(EntityId),
    /// Vorschau-Kurve eines Zieh-Vorgangs
    DragPreview,
    /// Pfeilspitze der Vorschau
    DragArrow,
    /// Markierung des aktuellen Ziel-Ankers
    DragTarget,
    /// Vorschau-Glyph beim Platzieren auf dem Canvas
    PlacementPreview,
    /// Beschriftung des Vorschau-Glyphs
    PlacementLabel,
    /// Hover-Cursor im Grid
    GridCursor,
}

impl fmt::Display for PathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edge(id) => write!(f, "edge:{id}"),
            Self::EdgeLabel(id) => write!(f, "label:{id}"),
            Self::Node(id) => write!(f, "node:{id}"),
            Self::NodeLabel(id) => write!(f, "node-label:{id}"),
            Self::DragPreview => f.write_str("drag:preview"),
            Self::DragArrow => f.write_str("drag:arrow"),
            Self::DragTarget => f.write_str("drag:target"),
            Self::PlacementPreview => f.write_str("placement:preview"),
            Self::PlacementLabel => f.write_str("placement:label"),
            Self::GridCursor => f.write_str("grid:cursor"),
        }
    }
}

/// Pfeilspitzen-Stil an einem Pfadende.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArrowHead {
    #[default]
    None,
    BlockWideLong,
}

/// Darstellungsattribute eines Pfades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathAttributes {
    pub stroke: [f32; 4],
    pub stroke_width: f32,
    pub fill: Option<[f32; 4]>,
    pub opacity: f32,
    pub dashed: bool,
    pub arrow_start: ArrowHead,
    pub arrow_end: ArrowHead,
}

impl Default for PathAttributes {
    fn default() -> Self {
        Self {
            stroke: [0.0, 0.0, 0.0, 1.0],
            stroke_width: 1.0,
            fill: None,
            opacity: 1.0,
            dashed: false,
            arrow_start: ArrowHead::None,
            arrow_end: ArrowHead::None,
        }
    }
}

impl PathAttributes {
    /// Unsichtbare Variante (Deckkraft 0, übrige Attribute unverändert).
    pub fn hidden(mut self) -> Self {
        self.opacity = 0.0;
        self
    }
}

/// Attribute einer Beschriftung.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextAttributes {
    pub font_size: f32,
    pub fill: [f32; 4],
    pub opacity: f32,
}

impl Default for TextAttributes {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            fill: [0.0, 0.0, 0.0, 1.0],
            opacity: 1.0,
        }
    }
}

/// Zeitverlauf einer Animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseOut,
}

/// Rückmelde-Token einer Animation. Der Host meldet den Abschluss mit diesem Token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationToken(pub u64);

/// Einzelner Zeichenauftrag an den Host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCall {
    /// Pfad sofort zeichnen oder ersetzen
    DrawPath {
        id: PathId,
        spec: PathSpec,
        attrs: PathAttributes,
    },
    /// Pfad über die Dauer zum neuen Zustand animieren
    AnimatePath {
        id: PathId,
        spec: PathSpec,
        attrs: PathAttributes,
        duration_ms: u32,
        easing: Easing,
        on_complete: Option<AnimationToken>,
    },
    /// Pfad oder Beschriftung entfernen
    RemovePath { id: PathId },
    /// Beschriftung zeichnen oder ersetzen
    DrawText {
        id: PathId,
        position: Vec2,
        text: String,
        attrs: TextAttributes,
    },
}

impl DrawCall {
    /// ID des betroffenen Elements.
    pub fn id(&self) -> &PathId {
        match self {
            Self::DrawPath { id, .. }
            | Self::AnimatePath { id, .. }
            | Self::RemovePath { id }
            | Self::DrawText { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ids_render_stable_keys() {
        assert_eq!(
            PathId::Edge(EdgeId::new("a/x->b/y")).to_string(),
            "edge:a/x->b/y"
        );
        assert_eq!(PathId::Node(EntityId::new("a")).to_string(), "node:a");
        assert_eq!(PathId::GridCursor.to_string(), "grid:cursor");
    }

    #[test]
    fn draw_call_serializes_with_op_tag() {
        let call = DrawCall::RemovePath {
            id: PathId::DragPreview,
        };
        let json = serde_json::to_string(&call).expect("Serialisierung sollte klappen");
        assert!(json.contains("\"op\":\"remove_path\""));
        assert_eq!(call.id(), &PathId::DragPreview);
    }
}
