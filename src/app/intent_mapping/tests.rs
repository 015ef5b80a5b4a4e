use glam::Vec2;

use crate::app::interaction::{DragSource, PointerEvent, PointerKind};
use crate::app::scheduler::ReconcileReason;
use crate::app::tables::ListFocus;
use crate::app::view_mode::ViewMode;
use crate::app::{AppCommand, AppIntent, AppState};
use crate::core::{AnchorIndex, EntityId, Frame, TableSide};
use crate::shared::AnimationToken;

use super::map_intent_to_commands;

fn state_in(mode: ViewMode) -> AppState {
    let mut state = AppState::new();
    state.view.frame = Frame::new(800.0, 600.0);
    let frame = state.view.frame;
    state
        .view_mode
        .begin_switch(mode, frame, &state.options, AnimationToken(1));
    state
}

fn pointer(kind: PointerKind, x: f32, y: f32) -> AppIntent {
    AppIntent::Pointer {
        event: PointerEvent::new(kind, Vec2::new(x, y)),
    }
}

#[test]
fn mode_keys_map_to_switch_commands() {
    let state = AppState::new();

    let commands = map_intent_to_commands(&state, AppIntent::ModeKeyPressed { key: '4' });
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::SwitchMode {
            mode: ViewMode::Grid
        }]
    ));

    let commands = map_intent_to_commands(&state, AppIntent::ModeKeyPressed { key: 'x' });
    assert!(commands.is_empty());
}

#[test]
fn reconcile_tick_only_runs_pending_pass() {
    let mut state = AppState::new();
    assert!(map_intent_to_commands(&state, AppIntent::ReconcileTick).is_empty());

    state.scheduler.schedule(ReconcileReason::Filter);
    let commands = map_intent_to_commands(&state, AppIntent::ReconcileTick);
    assert!(matches!(commands.as_slice(), [AppCommand::RunReconcilePass]));
}

#[test]
fn list_row_down_replaces_selection_and_arms_drag() {
    let state = AppState::new();
    let id = EntityId::new("a/x");

    let commands = map_intent_to_commands(
        &state,
        AppIntent::RowMouseDown {
            side: TableSide::Left,
            id: id.clone(),
            shift: false,
        },
    );
    assert!(matches!(
        commands.as_slice(),
        [
            AppCommand::DeselectAll,
            AppCommand::ToggleRowSelection { .. },
            AppCommand::ArmRowDrag { .. }
        ]
    ));

    let commands = map_intent_to_commands(
        &state,
        AppIntent::RowMouseDown {
            side: TableSide::Left,
            id,
            shift: true,
        },
    );
    assert!(matches!(
        commands.as_slice(),
        [
            AppCommand::SelectRowRange { .. },
            AppCommand::ToggleRowSelection { .. }
        ]
    ));
}

#[test]
fn canvas_row_down_on_unplaced_signal_starts_placement() {
    let mut state = state_in(ViewMode::Canvas);
    let id = EntityId::new("a/x");

    let commands = map_intent_to_commands(
        &state,
        AppIntent::RowMouseDown {
            side: TableSide::Left,
            id: id.clone(),
            shift: false,
        },
    );
    assert!(matches!(commands.as_slice(), [AppCommand::BeginPlacement { .. }]));

    state
        .canvas_placements
        .place(id.clone(), Vec2::new(200.0, 100.0), 60.0);
    let commands = map_intent_to_commands(
        &state,
        AppIntent::RowMouseDown {
            side: TableSide::Left,
            id,
            shift: false,
        },
    );
    assert!(matches!(
        commands.as_slice(),
        [
            AppCommand::DeselectAll,
            AppCommand::ToggleRowSelection { .. }
        ]
    ));
}

#[test]
fn free_mode_pointer_down_prefers_anchor_over_sweep() {
    let mut state = state_in(ViewMode::Hive);
    let id = EntityId::new("a/x");
    state.view.anchor_index = AnchorIndex::from_points([(&id, Vec2::new(100.0, 100.0))]);

    let commands = map_intent_to_commands(&state, pointer(PointerKind::Down, 105.0, 100.0));
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::ArmAnchorDrag { position, .. }] if *position == Vec2::new(100.0, 100.0)
    ));

    let commands = map_intent_to_commands(&state, pointer(PointerKind::Down, 300.0, 300.0));
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::BeginSweep {
            additive: false,
            ..
        }]
    ));
}

#[test]
fn active_drag_receives_pointer_events() {
    let mut state = AppState::new();
    state.interaction.arm(
        DragSource::Row {
            side: TableSide::Left,
            id: EntityId::new("a/x"),
        },
        false,
    );

    let commands = map_intent_to_commands(&state, pointer(PointerKind::Move, 10.0, 10.0));
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::ForwardDragPointer { .. }]
    ));
}

#[test]
fn surface_down_while_armed_cancels_and_starts_sweep() {
    let mut state = AppState::new();
    state.interaction.arm(
        DragSource::Row {
            side: TableSide::Left,
            id: EntityId::new("a/x"),
        },
        false,
    );

    let commands = map_intent_to_commands(&state, pointer(PointerKind::Down, 50.0, 50.0));
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::CancelDrag, AppCommand::BeginSweep { .. }]
    ));
}

#[test]
fn grid_moves_drive_the_cursor() {
    let state = state_in(ViewMode::Grid);

    let commands = map_intent_to_commands(&state, pointer(PointerKind::Move, 10.0, 10.0));
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::UpdateGridCursor { .. }]
    ));

    let commands = map_intent_to_commands(&state, pointer(PointerKind::Leave, 10.0, 10.0));
    assert!(matches!(commands.as_slice(), [AppCommand::ClearGridCursor]));
}

#[test]
fn focus_request_without_device_selects_overview() {
    let state = AppState::new();

    let commands = map_intent_to_commands(&state, AppIntent::FocusRequested { device: None });
    assert!(matches!(
        commands.as_slice(),
        [AppCommand::SetFocus {
            focus: ListFocus::Overview
        }]
    ));
}
