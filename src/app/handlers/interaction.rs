//! Handler für Zieh-Vorgänge, Canvas-Platzierung und Grid-Cursor.
//!
//! Die Automaten liefern Effekte; hier werden sie in Zeichen-, Chrome- und
//! Modell-Aufträge übersetzt.

use glam::Vec2;

use crate::app::interaction::{
    CompatibilityOracle, DragSource, InteractionEffect, PlacementEffect, PointerEvent,
};
use crate::app::outbox::ChromeCall;
use crate::app::render_pass::{self, PassTiming};
use crate::app::view_mode::ViewMode;
use crate::app::AppState;
use crate::core::{EntityId, TableSide};
use crate::shared::{geometry, DrawCall, PathAttributes, PathId, TextAttributes, ViewOptions};

/// Bereitet einen Zieh-Vorgang an einer Tabellenzeile vor.
pub fn arm_row_drag(state: &mut AppState, side: TableSide, id: EntityId) {
    // Links auf sich selbst gibt es nur in der Geräteübersicht
    let allow_self = state.mode() == ViewMode::List && state.focus.is_overview();
    // ein noch nicht gestarteter Vorgang wird durch den neuen Klick ersetzt
    if state.interaction.is_armed() {
        cancel_drag(state);
    }
    state.interaction.arm(DragSource::Row { side, id }, allow_self);
}

/// Bereitet einen Zieh-Vorgang an einem freien Anker vor.
pub fn arm_anchor_drag(state: &mut AppState, id: EntityId, position: Vec2) {
    state
        .interaction
        .arm(DragSource::Anchor { id, position }, false);
}

/// Leitet ein Zeiger-Ereignis an den Zieh-Automaten weiter.
pub fn forward_drag_pointer(
    state: &mut AppState,
    oracle: &dyn CompatibilityOracle,
    event: PointerEvent,
) {
    let mut interaction = std::mem::take(&mut state.interaction);
    let effects = interaction.handle_pointer(&event, &state.drag_context(oracle));
    state.interaction = interaction;
    apply_effects(state, effects);
}

/// Schaltet das Stumm-Flag des laufenden Zieh-Vorgangs um.
pub fn toggle_muted(state: &mut AppState, oracle: &dyn CompatibilityOracle) {
    let mut interaction = std::mem::take(&mut state.interaction);
    let effects = interaction.toggle_muted(&state.drag_context(oracle));
    state.interaction = interaction;
    apply_effects(state, effects);
}

/// Bricht einen laufenden Zieh-Vorgang ab und entfernt die Vorschau.
pub fn cancel_drag(state: &mut AppState) {
    let effects = state.interaction.cancel();
    apply_effects(state, effects);
}

/// Beginnt das Ablegen eines Signals auf dem Canvas.
pub fn begin_placement(state: &mut AppState, id: EntityId) {
    if state.model.find_signal(&id).is_none() {
        log::warn!("Unbekanntes Signal kann nicht platziert werden: {}", id);
        return;
    }
    state.placement.begin_placing(id);
}

/// Beginnt das Verschieben eines platzierten Glyphs.
pub fn begin_glyph_move(state: &mut AppState, id: EntityId, pointer: Vec2) {
    let Some(center) = state.canvas_placements.get(&id) else {
        return;
    };
    state.placement.begin_moving(id, pointer, center);
}

/// Leitet ein Zeiger-Ereignis an die Platzierung weiter.
pub fn forward_placement_pointer(state: &mut AppState, event: PointerEvent) {
    let canvas = state.canvas();
    let effects = state
        .placement
        .handle_pointer(&event, canvas, &state.options);
    apply_placement_effects(state, effects);
}

/// Bricht Platzierung oder Verschieben ab.
pub fn cancel_placement(state: &mut AppState) {
    let effects = state.placement.cancel();
    apply_placement_effects(state, effects);
}

/// Führt den Grid-Cursor nach.
pub fn update_grid_cursor(state: &mut AppState, position: Vec2) {
    let update = state.grid_cursor.update(&state.tables, position);
    apply_cursor_update(state, update);
}

/// Entfernt den Grid-Cursor.
pub fn clear_grid_cursor(state: &mut AppState) {
    let update = state.grid_cursor.clear();
    apply_cursor_update(state, update);
}

fn apply_cursor_update(state: &mut AppState, update: crate::app::interaction::CursorUpdate) {
    for (side, id) in update.unhighlight {
        state
            .outbox
            .chrome(ChromeCall::HighlightRow { side, id, on: false });
    }
    for (side, id) in update.highlight {
        state
            .outbox
            .chrome(ChromeCall::HighlightRow { side, id, on: true });
    }
    match update.path {
        Some(spec) => state.outbox.draw(DrawCall::DrawPath {
            id: PathId::GridCursor,
            spec,
            attrs: PathAttributes {
                fill: Some(state.options.edge_color_selected),
                opacity: 0.5,
                ..Default::default()
            },
        }),
        None => state.outbox.draw(DrawCall::RemovePath {
            id: PathId::GridCursor,
        }),
    }
}

fn preview_attributes(options: &ViewOptions, muted: bool) -> PathAttributes {
    PathAttributes {
        stroke: options.edge_color,
        stroke_width: options.edge_stroke_width,
        dashed: muted,
        ..Default::default()
    }
}

/// Übersetzt Effekte des Zieh-Automaten in Aufträge.
pub(crate) fn apply_effects(state: &mut AppState, effects: Vec<InteractionEffect>) {
    for effect in effects {
        match effect {
            InteractionEffect::HighlightRow { side, id, on } => {
                state
                    .outbox
                    .chrome(ChromeCall::HighlightRow { side, id, on });
            }
            InteractionEffect::FadeRows { side, ids, faded } => {
                state
                    .outbox
                    .chrome(ChromeCall::FadeRows { side, ids, faded });
            }
            InteractionEffect::Preview { path, arrow, muted } => {
                state.outbox.draw(DrawCall::DrawPath {
                    id: PathId::DragPreview,
                    spec: path,
                    attrs: preview_attributes(&state.options, muted),
                });
                state.outbox.draw(DrawCall::DrawPath {
                    id: PathId::DragArrow,
                    spec: arrow,
                    attrs: PathAttributes {
                        fill: Some(state.options.edge_color),
                        ..preview_attributes(&state.options, false)
                    },
                });
            }
            InteractionEffect::CandidateMarker(Some(position)) => {
                state.outbox.draw(DrawCall::DrawPath {
                    id: PathId::DragTarget,
                    spec: geometry::circle(position, state.options.signal_glyph_radius),
                    attrs: PathAttributes {
                        stroke: state.options.edge_color_selected,
                        stroke_width: 2.0,
                        ..Default::default()
                    },
                });
            }
            InteractionEffect::CandidateMarker(None) => {
                state.outbox.draw(DrawCall::RemovePath {
                    id: PathId::DragTarget,
                });
            }
            InteractionEffect::ClearPreview => {
                for id in [PathId::DragPreview, PathId::DragArrow, PathId::DragTarget] {
                    state.outbox.draw(DrawCall::RemovePath { id });
                }
            }
            InteractionEffect::Request(request) => state.outbox.request(request),
        }
    }
}

fn apply_placement_effects(state: &mut AppState, effects: Vec<PlacementEffect>) {
    let mut relayout = false;
    for effect in effects {
        match effect {
            PlacementEffect::Preview {
                glyph,
                label_at,
                label,
            } => {
                state.outbox.draw(DrawCall::DrawPath {
                    id: PathId::PlacementPreview,
                    spec: glyph,
                    attrs: PathAttributes {
                        fill: Some(state.options.glyph_fill_color),
                        opacity: state.options.staged_opacity,
                        ..Default::default()
                    },
                });
                state.outbox.draw(DrawCall::DrawText {
                    id: PathId::PlacementLabel,
                    position: label_at,
                    text: label,
                    attrs: TextAttributes::default(),
                });
            }
            PlacementEffect::ClearPreview => {
                for id in [PathId::PlacementPreview, PathId::PlacementLabel] {
                    state.outbox.draw(DrawCall::RemovePath { id });
                }
            }
            PlacementEffect::Placed { id, center } => {
                let min_x = state.options.canvas_min_drop_x;
                let center = state.canvas_placements.place(id.clone(), center, min_x);
                log::info!("Signal {} auf dem Canvas abgelegt bei {:?}", id, center);
                relayout = true;
            }
            PlacementEffect::Moved { id, center } => {
                let min_x = state.options.canvas_min_drop_x;
                relayout |= state.canvas_placements.move_to(&id, center, min_x);
            }
        }
    }
    if relayout {
        render_pass::run(state, PassTiming::immediate());
    }
}
