//! Handler für Zeilen- und Kanten-Selektion sowie das Löschen.

use glam::Vec2;

use crate::app::outbox::{ChromeCall, ModelRequest};
use crate::app::render_pass::{self, PassTiming};
use crate::app::state::{Selectable, SweepState};
use crate::app::AppState;
use crate::core::{EdgeId, EntityId, TableSide};
use crate::shared::geometry;

/// Schaltet die Selektion einer sichtbaren Zeile um.
pub fn toggle_row(state: &mut AppState, side: TableSide, id: EntityId) {
    let item = Selectable::Row {
        side,
        id: id.clone(),
    };
    let Some(on) = state.selection.toggle(item, &state.view.visible) else {
        log::debug!("Zeile {} nicht sichtbar, Selektion unverändert", id);
        return;
    };
    state
        .outbox
        .chrome(ChromeCall::HighlightRow { side, id, on });
}

/// Selektiert alle Zeilen zwischen der zuletzt umgeschalteten und `id`.
pub fn select_row_range(state: &mut AppState, side: TableSide, id: EntityId) {
    let order = state.tables.get(side).visible_ids();
    for added in state.selection.select_range(side, &id, &order) {
        state.outbox.chrome(ChromeCall::HighlightRow {
            side,
            id: added,
            on: true,
        });
    }
}

/// Beginnt eine Linien-Selektion; ein Klick trifft Kanten in Klick-Toleranz.
pub fn begin_sweep(state: &mut AppState, position: Vec2, additive: bool) {
    let mut restyle = false;
    if !additive {
        restyle |= clear_selection(state);
    }

    // zwei Diagonalen durch den Klickpunkt, gefüllte Zellen per Flächentest
    let t = state.options.click_tolerance;
    let (a, b) = (position - Vec2::splat(t), position + Vec2::splat(t));
    let hits: Vec<EdgeId> = visible_edges_crossing(state, a, b)
        .into_iter()
        .chain(visible_edges_crossing(
            state,
            position + Vec2::new(-t, t),
            position + Vec2::new(t, -t),
        ))
        .chain(visible_filled_edges_at(state, position))
        .collect();
    restyle |= select_edges(state, hits);

    state.sweep = Some(SweepState {
        start: position,
        last: position,
        active: false,
    });
    if restyle {
        render_pass::run(state, PassTiming::immediate());
    }
}

/// Führt die Linien-Selektion nach; selektiert alle gekreuzten Kanten.
pub fn update_sweep(state: &mut AppState, position: Vec2) {
    let Some(mut sweep) = state.sweep else {
        return;
    };
    if !sweep.active {
        let delta = position - sweep.start;
        if delta.x.abs() + delta.y.abs() < state.options.min_selection_drag {
            return;
        }
        sweep.active = true;
    }

    let hits = visible_edges_crossing(state, sweep.last, position);
    sweep.last = position;
    state.sweep = Some(sweep);
    if select_edges(state, hits) {
        render_pass::run(state, PassTiming::immediate());
    }
}

/// Beendet die Linien-Selektion.
pub fn end_sweep(state: &mut AppState) {
    state.sweep = None;
}

/// Selektiert alle sichtbaren Kanten.
pub fn select_all_edges(state: &mut AppState) {
    let edges: Vec<EdgeId> = state
        .view
        .edges
        .keys()
        .filter(|id| state.view.visible.edges.contains(*id))
        .cloned()
        .collect();
    if select_edges(state, edges) {
        render_pass::run(state, PassTiming::immediate());
    }
}

/// Hebt jede Selektion auf.
pub fn deselect_all(state: &mut AppState) {
    if clear_selection(state) {
        render_pass::run(state, PassTiming::immediate());
    }
}

/// Fordert das Entfernen aller sichtbar selektierten Kanten an.
///
/// Das Modell selbst bleibt unverändert, bis der Host die Änderung meldet.
pub fn delete_selected(state: &mut AppState) {
    let selected = state.selection.selected_edges(&state.view.visible);
    if selected.is_empty() {
        return;
    }
    for id in &selected {
        if let Some(map) = state.model.maps.get(id) {
            for src in &map.srcs {
                state.outbox.request(ModelRequest::Disconnect {
                    src: src.clone(),
                    dst: map.dst.clone(),
                });
            }
        } else if let Some(link) = state.model.links.get(id) {
            state.outbox.request(ModelRequest::Unlink {
                src: link.src.clone(),
                dst: link.dst.clone(),
            });
        }
    }
    log::info!("{} Kanten zum Löschen angefordert", selected.len());
    deselect_all(state);
}

/// Sichtbare Kanten, deren Pfad die Strecke `a–b` schneidet.
fn visible_edges_crossing(state: &AppState, a: Vec2, b: Vec2) -> Vec<EdgeId> {
    let samples = state.options.selection_samples;
    state
        .view
        .edges
        .iter()
        .filter(|(id, _)| state.view.visible.edges.contains(*id))
        .filter(|(_, edge)| geometry::path_crosses_segment(&edge.path, a, b, samples))
        .map(|(id, _)| id.clone())
        .collect()
}

/// Sichtbare gefüllte Kanten (Grid-Zellen), deren Fläche `point` enthält.
fn visible_filled_edges_at(state: &AppState, point: Vec2) -> Vec<EdgeId> {
    state
        .view
        .edges
        .iter()
        .filter(|(id, _)| state.view.visible.edges.contains(*id))
        .filter(|(_, edge)| edge.attrs.fill.is_some())
        .filter(|(_, edge)| geometry::path_contains_point(&edge.path, point))
        .map(|(id, _)| id.clone())
        .collect()
}

/// Gibt `true` zurück, wenn mindestens eine Kante neu selektiert wurde.
fn select_edges(state: &mut AppState, edges: Vec<EdgeId>) -> bool {
    let mut any = false;
    for id in edges {
        any |= state.selection.select(Selectable::Edge(id));
    }
    any
}

/// Hebt alles auf; gibt `true` zurück, wenn Kanten betroffen waren.
fn clear_selection(state: &mut AppState) -> bool {
    let mut edges = false;
    for item in state.selection.deselect_all() {
        match item {
            Selectable::Row { side, id } => {
                state
                    .outbox
                    .chrome(ChromeCall::HighlightRow { side, id, on: false });
            }
            Selectable::Edge(_) => edges = true,
        }
    }
    edges
}
