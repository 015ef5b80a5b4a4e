use approx::assert_relative_eq;
use glam::Vec2;
use mapper_view::core::AnchorSlot;
use mapper_view::shared::geometry;
use mapper_view::{
    AppController, AppIntent, AppState, ChromeCall, Device, DrawCall, EntityId, Map,
    NetworkModel, PathId, PointerEvent, PointerKind, SignalDirection, TableSide, ViewMode,
};

fn three_devices() -> NetworkModel {
    let mut model = NetworkModel::new();
    for (name, port) in [("a", 9000), ("b", 9001), ("c", 9002)] {
        model.add_device(
            Device::new(name, "10.0.0.1", port)
                .with_signal("out", SignalDirection::Output)
                .with_signal("in", SignalDirection::Input),
        );
    }
    model.add_map(Map::new(
        EntityId::signal("a", "out"),
        EntityId::signal("c", "in"),
    ));
    model.add_map(Map::new(
        EntityId::signal("b", "out"),
        EntityId::signal("a", "in"),
    ));
    model
}

fn setup(model: NetworkModel, width: f32, height: f32) -> (AppController, AppState) {
    let mut controller = AppController::new();
    let mut state = AppState::new();
    for intent in [
        AppIntent::FrameResized { width, height },
        AppIntent::ModelReset { model },
        AppIntent::ReconcileTick,
    ] {
        controller
            .handle_intent(&mut state, intent)
            .expect("Setup-Intent sollte ohne Fehler durchlaufen");
    }
    (controller, state)
}

fn send(controller: &mut AppController, state: &mut AppState, intent: AppIntent) {
    controller
        .handle_intent(state, intent)
        .expect("Intent sollte ohne Fehler durchlaufen");
}

fn pointer(kind: PointerKind, x: f32, y: f32) -> AppIntent {
    AppIntent::Pointer {
        event: PointerEvent::new(kind, Vec2::new(x, y)),
    }
}

#[test]
fn test_hive_spokes_are_spaced_by_45_degrees() {
    let (mut controller, mut state) = setup(three_devices(), 600.0, 600.0);
    send(
        &mut controller,
        &mut state,
        AppIntent::ModeSelected {
            mode: ViewMode::Hive,
        },
    );

    for (index, name) in ["a", "b", "c"].into_iter().enumerate() {
        let anchor = state
            .view
            .anchors
            .get(&EntityId::new(name), AnchorSlot::Free)
            .expect("Device sollte einen Anker haben");
        let direction = anchor.velocity.expect("Speiche sollte eine Richtung haben");
        let angle = direction.y.atan2(direction.x).to_degrees();
        assert_relative_eq!(angle, index as f32 * -45.0, epsilon = 1e-3);
    }

    let report = state.view.last_report.as_ref().expect("Durchlauf erwartet");
    assert_eq!(report.mode, ViewMode::Hive);
    assert_eq!(report.drawn_edges.len(), 2);
    assert!(state.view.nodes.contains_key(&EntityId::new("b")));
}

#[test]
fn test_graph_layout_is_deterministic_for_same_seed() {
    let run = || {
        let (mut controller, mut state) = setup(three_devices(), 800.0, 600.0);
        send(
            &mut controller,
            &mut state,
            AppIntent::ModeSelected {
                mode: ViewMode::Graph,
            },
        );
        state
            .view
            .edges
            .iter()
            .map(|(id, edge)| (id.clone(), edge.path.clone()))
            .collect::<Vec<_>>()
    };

    let first = run();
    let second = run();
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[test]
fn test_canvas_placement_drops_signal_and_draws_glyph() {
    let (mut controller, mut state) = setup(three_devices(), 1000.0, 600.0);
    send(
        &mut controller,
        &mut state,
        AppIntent::ModeSelected {
            mode: ViewMode::Canvas,
        },
    );
    state.outbox.drain();
    let id = EntityId::signal("a", "out");

    send(
        &mut controller,
        &mut state,
        AppIntent::RowMouseDown {
            side: TableSide::Left,
            id: id.clone(),
            shift: false,
        },
    );
    assert!(state.placement.is_active());

    send(&mut controller, &mut state, pointer(PointerKind::Move, 10.0, 200.0));
    let batch = state.outbox.drain();
    assert!(batch.draw_calls.iter().any(|call| matches!(
        call,
        DrawCall::DrawPath {
            id: PathId::PlacementPreview,
            ..
        }
    )));

    send(&mut controller, &mut state, pointer(PointerKind::Up, 300.0, 200.0));

    assert!(!state.placement.is_active());
    let center = state
        .canvas_placements
        .get(&id)
        .expect("Signal sollte platziert sein");
    assert_relative_eq!(center.x, 300.0);
    assert_relative_eq!(center.y, 200.0);
    let batch = state.outbox.drain();
    assert!(batch.draw_calls.iter().any(|call| matches!(
        call,
        DrawCall::RemovePath {
            id: PathId::PlacementPreview
        }
    )));
    assert!(batch.draw_calls.iter().any(|call| matches!(
        call,
        DrawCall::DrawPath { id: PathId::Node(node), .. } if *node == id
    )));
}

#[test]
fn test_canvas_drop_outside_surface_cancels_placement() {
    let (mut controller, mut state) = setup(three_devices(), 1000.0, 600.0);
    send(
        &mut controller,
        &mut state,
        AppIntent::ModeSelected {
            mode: ViewMode::Canvas,
        },
    );
    let id = EntityId::signal("b", "out");
    send(
        &mut controller,
        &mut state,
        AppIntent::RowMouseDown {
            side: TableSide::Left,
            id: id.clone(),
            shift: false,
        },
    );

    send(&mut controller, &mut state, pointer(PointerKind::Up, -50.0, 200.0));

    assert!(!state.placement.is_active());
    assert!(state.canvas_placements.get(&id).is_none());
}

#[test]
fn test_mode_switch_animates_chrome_and_second_switch_supersedes() {
    let (mut controller, mut state) = setup(three_devices(), 1000.0, 600.0);
    state.outbox.drain();

    send(&mut controller, &mut state, AppIntent::ModeKeyPressed { key: '3' });
    let batch = state.outbox.drain();
    let token = batch.chrome_calls.iter().find_map(|call| match call {
        ChromeCall::AnimateChrome { token, .. } => Some(*token),
        _ => None,
    });
    assert!(token.is_some(), "erster Wechsel sollte animiert sein");
    assert!(state.view_mode.in_flight());

    send(&mut controller, &mut state, AppIntent::ModeKeyPressed { key: '5' });
    let batch = state.outbox.drain();
    assert!(batch
        .chrome_calls
        .iter()
        .any(|call| matches!(call, ChromeCall::SetChrome { .. })));
    assert_eq!(state.mode(), ViewMode::Hive);
    assert!(!state.view_mode.in_flight());

    // veraltetes Token des übersprungenen Übergangs wird ignoriert
    send(
        &mut controller,
        &mut state,
        AppIntent::AnimationFinished {
            token: token.expect("Token geprüft"),
        },
    );
    assert_eq!(state.mode(), ViewMode::Hive);
}

#[test]
fn test_grid_cursor_highlights_row_and_column() {
    let (mut controller, mut state) = setup(three_devices(), 1000.0, 600.0);
    send(
        &mut controller,
        &mut state,
        AppIntent::ModeSelected {
            mode: ViewMode::Grid,
        },
    );
    state.outbox.drain();

    send(&mut controller, &mut state, pointer(PointerKind::Move, 5.0, 5.0));

    let batch = state.outbox.drain();
    assert!(batch.draw_calls.iter().any(|call| matches!(
        call,
        DrawCall::DrawPath {
            id: PathId::GridCursor,
            ..
        }
    )));
    assert!(batch.chrome_calls.iter().any(|call| matches!(
        call,
        ChromeCall::HighlightRow {
            side: TableSide::Top,
            on: true,
            ..
        }
    )));

    send(&mut controller, &mut state, pointer(PointerKind::Leave, 5.0, 5.0));
    let batch = state.outbox.drain();
    assert!(batch.draw_calls.iter().any(|call| matches!(
        call,
        DrawCall::RemovePath {
            id: PathId::GridCursor
        }
    )));
}

#[test]
fn test_grid_click_inside_filled_cell_selects_map() {
    let (mut controller, mut state) = setup(three_devices(), 1000.0, 600.0);
    send(
        &mut controller,
        &mut state,
        AppIntent::ModeSelected {
            mode: ViewMode::Grid,
        },
    );
    let map_id = Map::new(EntityId::signal("a", "out"), EntityId::signal("c", "in")).id;
    let outline = state
        .view
        .edges
        .get(&map_id)
        .expect("Zelle sollte gezeichnet sein")
        .path
        .flatten();
    let center = geometry::centroid(&outline[0][..3]).expect("Dreieck erwartet");

    send(&mut controller, &mut state, pointer(PointerKind::Down, center.x, center.y));
    send(&mut controller, &mut state, pointer(PointerKind::Up, center.x, center.y));

    assert!(state.selection.is_edge_selected(&map_id));
}

#[test]
fn test_hidden_device_signals_are_not_drag_anchors() {
    let mut model = three_devices();
    if let Some(device) = model.devices.get_mut(&EntityId::new("c")) {
        device.hidden = true;
    }
    let (mut controller, mut state) = setup(model, 600.0, 600.0);
    send(
        &mut controller,
        &mut state,
        AppIntent::ModeSelected {
            mode: ViewMode::Hive,
        },
    );

    let hits = state.view.anchor_index.within_radius(Vec2::ZERO, 1.0e6);
    assert!(!hits.is_empty());
    let hidden = [EntityId::signal("c", "in"), EntityId::signal("c", "out")];
    assert!(hits.iter().all(|hit| !hidden.contains(&hit.id)));
}
