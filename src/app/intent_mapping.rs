//! Mapping von Host-Intents auf mutierende App-Commands.
//!
//! Zeiger-Ereignisse hängen vom aktiven Modus und vom Interaktions-Zustand ab:
//! laufende Platzierung vor laufendem Zieh-Vorgang vor Selektion.

use glam::Vec2;

use super::interaction::{PointerEvent, PointerKind};
use super::tables::ListFocus;
use super::view_mode::ViewMode;
use super::{AppCommand, AppIntent, AppState};
use crate::core::{EntityId, TableSide};

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::ModelReset { model } => vec![AppCommand::ResetModel { model }],
        AppIntent::EntityChanged { event } => vec![AppCommand::ApplyModelEvent { event }],
        AppIntent::ReconcileTick => {
            if state.scheduler.is_pending() {
                vec![AppCommand::RunReconcilePass]
            } else {
                Vec::new()
            }
        }
        AppIntent::FrameResized { width, height } => {
            vec![AppCommand::ResizeFrame { width, height }]
        }
        AppIntent::ModeKeyPressed { key } => match ViewMode::from_key(key) {
            Some(mode) => vec![AppCommand::SwitchMode { mode }],
            None => Vec::new(),
        },
        AppIntent::ModeSelected { mode } => vec![AppCommand::SwitchMode { mode }],
        AppIntent::AnimationFinished { token } => vec![AppCommand::FinishAnimation { token }],
        AppIntent::Pointer { event } => map_pointer(state, event),
        AppIntent::RowMouseDown { side, id, shift } => match state.mode() {
            ViewMode::Canvas if id.is_signal() && state.canvas_placements.get(&id).is_none() => {
                vec![AppCommand::BeginPlacement { id }]
            }
            mode => map_row_down(mode, side, id, shift),
        },
        AppIntent::SearchChanged { side, text } => vec![AppCommand::SetSearch { side, text }],
        AppIntent::ShowUnmappedToggled { show } => vec![AppCommand::SetShowUnmapped { show }],
        AppIntent::MuteModifierPressed => vec![AppCommand::ToggleDragMuted],
        AppIntent::DeleteRequested => vec![AppCommand::DeleteSelected],
        AppIntent::SelectAllRequested => vec![AppCommand::SelectAllEdges],
        AppIntent::DeselectAllRequested => vec![AppCommand::DeselectAll],
        AppIntent::FocusRequested { device } => vec![AppCommand::SetFocus {
            focus: device.map_or(ListFocus::Overview, ListFocus::Device),
        }],
        AppIntent::TableScrolled { side, offset } => {
            vec![AppCommand::ScrollTable { side, offset }]
        }
        AppIntent::TableSorted { side, order } => vec![AppCommand::SortTable { side, order }],
        AppIntent::DragAborted => vec![AppCommand::CancelDrag],
        AppIntent::OptionsChanged { options } => vec![AppCommand::ApplyOptions { options }],
    }
}

/// Klick auf eine Tabellenzeile.
///
/// Ohne Shift ersetzt die Zeile die bisherige Selektion, mit Shift wird der
/// Bereich seit der zuletzt umgeschalteten Zeile ergänzt. Die geklickte Zeile
/// wird in beiden Fällen umgeschaltet.
fn map_row_down(mode: ViewMode, side: TableSide, id: EntityId, shift: bool) -> Vec<AppCommand> {
    let mut commands = if shift {
        vec![AppCommand::SelectRowRange {
            side,
            id: id.clone(),
        }]
    } else {
        vec![AppCommand::DeselectAll]
    };
    commands.push(AppCommand::ToggleRowSelection {
        side,
        id: id.clone(),
    });
    if mode == ViewMode::List && !shift {
        commands.push(AppCommand::ArmRowDrag { side, id });
    }
    commands
}

/// Zeiger-Ereignisse der Zeichenfläche.
fn map_pointer(state: &AppState, event: PointerEvent) -> Vec<AppCommand> {
    if state.placement.is_active() {
        return vec![AppCommand::ForwardPlacementPointer { event }];
    }
    // ein Klick auf die Fläche verwirft einen noch nicht gestarteten Zieh-Vorgang
    let mut commands = Vec::new();
    if state.interaction.is_armed() && event.kind == PointerKind::Down {
        commands.push(AppCommand::CancelDrag);
    } else if !state.interaction.is_idle() {
        return vec![AppCommand::ForwardDragPointer { event }];
    }
    commands.extend(map_surface_pointer(state, event));
    commands
}

/// Zeiger-Ereignisse ohne laufenden Zieh- oder Platzierungsvorgang.
fn map_surface_pointer(state: &AppState, event: PointerEvent) -> Vec<AppCommand> {
    let mode = state.mode();
    match event.kind {
        PointerKind::Down => {
            if !mode.is_table_mode() {
                let hit = state
                    .view
                    .anchor_index
                    .nearest(event.position)
                    .filter(|hit| hit.distance <= state.options.anchor_snap_radius);
                if let Some(hit) = hit {
                    return vec![AppCommand::ArmAnchorDrag {
                        id: hit.id,
                        position: hit.position,
                    }];
                }
            }
            if mode == ViewMode::Canvas {
                let size = Vec2::from(state.options.canvas_glyph_size);
                if let Some(id) = state.canvas_placements.glyph_at(event.position, size) {
                    return vec![AppCommand::BeginGlyphMove {
                        id: id.clone(),
                        pointer: event.position,
                    }];
                }
            }
            vec![AppCommand::BeginSweep {
                position: event.position,
                additive: event.shift,
            }]
        }
        PointerKind::Move if state.sweep.is_some() => vec![AppCommand::UpdateSweep {
            position: event.position,
        }],
        PointerKind::Move if mode == ViewMode::Grid => vec![AppCommand::UpdateGridCursor {
            position: event.position,
        }],
        PointerKind::Up if state.sweep.is_some() => vec![AppCommand::EndSweep],
        PointerKind::Leave => {
            let mut commands = Vec::new();
            if state.sweep.is_some() {
                commands.push(AppCommand::EndSweep);
            }
            if mode == ViewMode::Grid {
                commands.push(AppCommand::ClearGridCursor);
            }
            commands
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests;
