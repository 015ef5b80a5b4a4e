//! Handler für Änderungen am Netzwerk-Modell.

use std::sync::Arc;

use crate::app::scheduler::ReconcileReason;
use crate::app::state::Selectable;
use crate::app::AppState;
use crate::core::{ChangeKind, ModelEvent, NetworkModel};
use crate::shared::{DrawCall, PathId};

/// Ersetzt den Modell-Snapshot; ein laufender Zieh-Vorgang wird abgebrochen.
pub fn reset(state: &mut AppState, model: NetworkModel) {
    log::info!(
        "Modell ersetzt: {} Devices, {} Maps, {} Links",
        model.devices.len(),
        model.maps.len(),
        model.links.len()
    );
    super::interaction::cancel_drag(state);
    super::interaction::cancel_placement(state);
    state.model = Arc::new(model);
    prune(state);
    state.scheduler.schedule(ReconcileReason::ModelReset);
}

/// Wendet ein Änderungsereignis an und fordert einen Abgleich an.
///
/// Ein laufender Zieh-Vorgang bleibt unberührt; er hält Quelle und Ziel per ID.
pub fn apply_event(state: &mut AppState, event: ModelEvent) {
    if event.change == ChangeKind::Removing {
        if let Some(id) = event.entity.edge_id() {
            if let Some(edge) = state.view.edges.shift_remove(id) {
                if edge.label.is_some() {
                    state.outbox.draw(DrawCall::RemovePath {
                        id: PathId::EdgeLabel(id.clone()),
                    });
                }
                state.outbox.draw(DrawCall::RemovePath {
                    id: PathId::Edge(id.clone()),
                });
            }
        }
    }

    let changed = Arc::make_mut(&mut state.model).apply(&event);
    if !changed {
        log::debug!("Ereignis ohne Wirkung: {:?} {:?}", event.change, event.kind());
        return;
    }
    prune(state);
    if state.scheduler.schedule(ReconcileReason::Model(event.kind())) {
        log::debug!("Abgleich angefordert ({:?})", event.kind());
    }
}

/// Verwirft Selektion und Platzierungen verschwundener Entitäten.
fn prune(state: &mut AppState) {
    let model = &state.model;
    state.selection.retain(|item| match item {
        Selectable::Row { id, .. } => {
            model.find_device(id).is_some() || model.find_signal(id).is_some()
        }
        Selectable::Edge(id) => model.maps.contains_key(id) || model.links.contains_key(id),
    });
    state.canvas_placements.retain_existing(model);
}
