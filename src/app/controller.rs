//! Application Controller für zentrale Event-Verarbeitung.

use super::interaction::{CompatibilityOracle, ExistingMapsOracle};
use super::outbox::{ChromeCall, OutboxBatch};
use super::{AppCommand, AppIntent, AppState};

/// Orchestriert Host-Intents und Handler auf den AppState.
pub struct AppController {
    /// Entscheidet, welche Verbindungen beim Ziehen angeboten werden
    oracle: Box<dyn CompatibilityOracle>,
}

impl Default for AppController {
    fn default() -> Self {
        Self::new()
    }
}

impl AppController {
    /// Erstellt einen neuen Controller; bestehende Maps sperren Duplikate.
    pub fn new() -> Self {
        Self::with_oracle(Box::new(ExistingMapsOracle))
    }

    /// Erstellt einen Controller mit eigener Kompatibilitätsprüfung.
    pub fn with_oracle(oracle: Box<dyn CompatibilityOracle>) -> Self {
        Self { oracle }
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    pub fn handle_intent(&mut self, state: &mut AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command)?;
        }

        Ok(())
    }

    /// Übergibt alle seit dem letzten Aufruf gesammelten Aufträge an den Host.
    pub fn drain_outbox(&self, state: &mut AppState) -> OutboxBatch {
        state.outbox.drain()
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);
        use super::handlers;
        let oracle = self.oracle.as_ref();

        match command {
            // === Modell ===
            AppCommand::ResetModel { model } => handlers::model::reset(state, model),
            AppCommand::ApplyModelEvent { event } => handlers::model::apply_event(state, event),

            // === Ansicht & Abgleich ===
            AppCommand::RunReconcilePass => handlers::view::run_reconcile_pass(state),
            AppCommand::ResizeFrame { width, height } => {
                handlers::view::resize_frame(state, width, height)
            }
            AppCommand::SwitchMode { mode } => handlers::view::switch_mode(state, mode),
            AppCommand::FinishAnimation { token } => {
                handlers::view::finish_animation(state, token)
            }
            AppCommand::SetFocus { focus } => handlers::view::set_focus(state, focus),
            AppCommand::ScrollTable { side, offset } => {
                handlers::view::scroll_table(state, side, offset)
            }
            AppCommand::SortTable { side, order } => {
                handlers::view::sort_table(state, side, order)?
            }
            AppCommand::ApplyOptions { options } => {
                handlers::view::apply_options(state, options)?
            }

            // === Verbinden (Zieh-Vorgang) ===
            AppCommand::ArmRowDrag { side, id } => {
                handlers::interaction::arm_row_drag(state, side, id)
            }
            AppCommand::ArmAnchorDrag { id, position } => {
                handlers::interaction::arm_anchor_drag(state, id, position)
            }
            AppCommand::ForwardDragPointer { event } => {
                handlers::interaction::forward_drag_pointer(state, oracle, event)
            }
            AppCommand::ToggleDragMuted => handlers::interaction::toggle_muted(state, oracle),
            AppCommand::CancelDrag => {
                handlers::interaction::cancel_drag(state);
                handlers::interaction::cancel_placement(state);
            }

            // === Canvas-Platzierung ===
            AppCommand::BeginPlacement { id } => handlers::interaction::begin_placement(state, id),
            AppCommand::BeginGlyphMove { id, pointer } => {
                handlers::interaction::begin_glyph_move(state, id, pointer)
            }
            AppCommand::ForwardPlacementPointer { event } => {
                handlers::interaction::forward_placement_pointer(state, event)
            }

            // === Grid-Cursor ===
            AppCommand::UpdateGridCursor { position } => {
                handlers::interaction::update_grid_cursor(state, position)
            }
            AppCommand::ClearGridCursor => handlers::interaction::clear_grid_cursor(state),

            // === Selektion ===
            AppCommand::ToggleRowSelection { side, id } => {
                handlers::selection::toggle_row(state, side, id)
            }
            AppCommand::SelectRowRange { side, id } => {
                handlers::selection::select_row_range(state, side, id)
            }
            AppCommand::BeginSweep { position, additive } => {
                handlers::selection::begin_sweep(state, position, additive)
            }
            AppCommand::UpdateSweep { position } => {
                handlers::selection::update_sweep(state, position)
            }
            AppCommand::EndSweep => handlers::selection::end_sweep(state),
            AppCommand::SelectAllEdges => handlers::selection::select_all_edges(state),
            AppCommand::DeselectAll => handlers::selection::deselect_all(state),
            AppCommand::DeleteSelected => handlers::selection::delete_selected(state),

            // === Filter ===
            AppCommand::SetSearch { side, text } => {
                handlers::filter::set_search(state, side, &text)
            }
            AppCommand::SetShowUnmapped { show } => {
                handlers::filter::set_show_unmapped(state, show)
            }
        }

        // höchstens eine Meldung pro Batch
        if state.selection.take_changed()
            && !state.outbox.chrome_calls().contains(&ChromeCall::SelectionChanged)
        {
            state.outbox.chrome(ChromeCall::SelectionChanged);
        }

        Ok(())
    }
}
