//! Platzieren und Verschieben von Signal-Glyphen auf dem Canvas.

use glam::Vec2;

use super::{PointerEvent, PointerKind};
use crate::core::{CanvasRect, EntityId};
use crate::shared::geometry::{self, Rect};
use crate::shared::{PathSpec, ViewOptions};

/// Zustand des Platzierungs-Automaten.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PlacementPhase {
    #[default]
    Idle,
    /// Signal wird aus der Tabelle auf die Fläche gezogen
    Placing { id: EntityId },
    /// Platziertes Glyph wird verschoben; `grab` ist der Abstand Zeiger → Zentrum
    Moving { id: EntityId, grab: Vec2 },
}

/// Auswirkung eines Platzierungs-Schritts.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementEffect {
    /// Vorschau-Glyph mit Beschriftung zeichnen
    Preview {
        glyph: PathSpec,
        label_at: Vec2,
        label: String,
    },
    ClearPreview,
    /// Signal wurde abgelegt
    Placed { id: EntityId, center: Vec2 },
    /// Platziertes Signal wurde verschoben
    Moved { id: EntityId, center: Vec2 },
}

/// Führt Platzieren und Verschieben auf dem Canvas.
#[derive(Debug, Clone, Default)]
pub struct PlacementController {
    phase: PlacementPhase,
}

impl PlacementController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &PlacementPhase {
        &self.phase
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.phase, PlacementPhase::Idle)
    }

    /// Beginnt das Ablegen eines Signals aus der Tabelle.
    pub fn begin_placing(&mut self, id: EntityId) -> bool {
        if self.is_active() {
            return false;
        }
        log::debug!("Platzierung gestartet: {}", id);
        self.phase = PlacementPhase::Placing { id };
        true
    }

    /// Beginnt das Verschieben eines platzierten Glyphs.
    pub fn begin_moving(&mut self, id: EntityId, pointer: Vec2, center: Vec2) -> bool {
        if self.is_active() {
            return false;
        }
        self.phase = PlacementPhase::Moving {
            id,
            grab: pointer - center,
        };
        true
    }

    pub fn handle_pointer(
        &mut self,
        event: &PointerEvent,
        canvas: CanvasRect,
        options: &ViewOptions,
    ) -> Vec<PlacementEffect> {
        let clamp = |p: Vec2| Vec2::new(p.x.max(options.canvas_min_drop_x), p.y);

        match (std::mem::take(&mut self.phase), event.kind) {
            (PlacementPhase::Placing { id }, PointerKind::Move | PointerKind::Enter) => {
                let center = clamp(event.position);
                let glyph = geometry::canvas_glyph(
                    center,
                    Vec2::from(options.canvas_glyph_size),
                    None,
                    options.canvas_port_offset,
                    options.canvas_port_radius,
                );
                let label = id.to_string();
                self.phase = PlacementPhase::Placing { id };
                vec![PlacementEffect::Preview {
                    glyph,
                    label_at: center,
                    label,
                }]
            }
            (PlacementPhase::Placing { id }, PointerKind::Leave) => {
                self.phase = PlacementPhase::Placing { id };
                vec![PlacementEffect::ClearPreview]
            }
            (PlacementPhase::Placing { id }, PointerKind::Up) => {
                let surface = Rect::new(0.0, 0.0, canvas.width(), canvas.height());
                if surface.contains(event.position) {
                    let center = clamp(event.position);
                    log::debug!("Signal {} abgelegt bei {:?}", id, center);
                    vec![
                        PlacementEffect::ClearPreview,
                        PlacementEffect::Placed { id, center },
                    ]
                } else {
                    log::debug!("Platzierung von {} abgebrochen", id);
                    vec![PlacementEffect::ClearPreview]
                }
            }
            (PlacementPhase::Moving { id, grab }, PointerKind::Move) => {
                let center = clamp(event.position - grab);
                self.phase = PlacementPhase::Moving {
                    id: id.clone(),
                    grab,
                };
                vec![PlacementEffect::Moved { id, center }]
            }
            (PlacementPhase::Moving { .. }, PointerKind::Up) => Vec::new(),
            (phase, _) => {
                self.phase = phase;
                Vec::new()
            }
        }
    }

    /// Bricht jede laufende Platzierung ab.
    pub fn cancel(&mut self) -> Vec<PlacementEffect> {
        match std::mem::take(&mut self.phase) {
            PlacementPhase::Placing { .. } => vec![PlacementEffect::ClearPreview],
            PlacementPhase::Moving { .. } | PlacementPhase::Idle => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(kind: PointerKind, x: f32, y: f32) -> PointerEvent {
        PointerEvent::new(kind, Vec2::new(x, y))
    }

    #[test]
    fn drop_inside_canvas_places_clamped() {
        let options = ViewOptions::default();
        let canvas = CanvasRect::sized(400.0, 300.0);
        let mut ctrl = PlacementController::new();
        assert!(ctrl.begin_placing(EntityId::new("a/x")));

        let preview = ctrl.handle_pointer(&event(PointerKind::Move, 10.0, 40.0), canvas, &options);
        assert!(matches!(
            preview.as_slice(),
            [PlacementEffect::Preview { label_at, .. }] if *label_at == Vec2::new(60.0, 40.0)
        ));

        let dropped = ctrl.handle_pointer(&event(PointerKind::Up, 20.0, 40.0), canvas, &options);
        assert_eq!(
            dropped.last(),
            Some(&PlacementEffect::Placed {
                id: EntityId::new("a/x"),
                center: Vec2::new(60.0, 40.0),
            })
        );
        assert!(!ctrl.is_active());
    }

    #[test]
    fn drop_outside_canvas_cancels() {
        let options = ViewOptions::default();
        let canvas = CanvasRect::sized(400.0, 300.0);
        let mut ctrl = PlacementController::new();
        ctrl.begin_placing(EntityId::new("a/x"));
        let effects = ctrl.handle_pointer(&event(PointerKind::Up, -20.0, 40.0), canvas, &options);
        assert_eq!(effects, vec![PlacementEffect::ClearPreview]);
        assert!(!ctrl.is_active());
    }

    #[test]
    fn moving_keeps_grab_offset() {
        let options = ViewOptions::default();
        let canvas = CanvasRect::sized(400.0, 300.0);
        let mut ctrl = PlacementController::new();
        ctrl.begin_moving(EntityId::new("a/x"), Vec2::new(110.0, 105.0), Vec2::new(100.0, 100.0));
        let effects =
            ctrl.handle_pointer(&event(PointerKind::Move, 210.0, 155.0), canvas, &options);
        assert_eq!(
            effects,
            vec![PlacementEffect::Moved {
                id: EntityId::new("a/x"),
                center: Vec2::new(200.0, 150.0),
            }]
        );
        ctrl.handle_pointer(&event(PointerKind::Up, 210.0, 155.0), canvas, &options);
        assert!(!ctrl.is_active());
    }
}
