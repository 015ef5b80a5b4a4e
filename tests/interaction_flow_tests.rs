use glam::Vec2;
use mapper_view::{
    AppController, AppIntent, AppState, ChromeCall, Device, DrawCall, EntityId, Link, Map,
    ModelRequest, NetworkModel, PathId, PointerEvent, PointerKind, SignalDirection, TableSide,
    ViewMode,
};

/// Devices `A` (zwei Ausgänge) und `B` (ein Eingang), verlinkt, Fokus auf `A`.
fn focused_on_a(with_map: bool) -> (AppController, AppState) {
    let mut model = NetworkModel::new();
    model.add_device(
        Device::new("A", "10.0.0.1", 9000)
            .with_signal("x0", SignalDirection::Output)
            .with_signal("x1", SignalDirection::Output),
    );
    model.add_device(Device::new("B", "10.0.0.2", 9001).with_signal("y0", SignalDirection::Input));
    model.add_link(Link::new(EntityId::new("A"), EntityId::new("B")));
    if with_map {
        model.add_map(Map::new(
            EntityId::signal("A", "x0"),
            EntityId::signal("B", "y0"),
        ));
    }

    let mut controller = AppController::new();
    let mut state = AppState::new();
    for intent in [
        AppIntent::FrameResized {
            width: 1000.0,
            height: 600.0,
        },
        AppIntent::ModelReset { model },
        AppIntent::ReconcileTick,
        AppIntent::FocusRequested {
            device: Some(EntityId::new("A")),
        },
        AppIntent::ReconcileTick,
    ] {
        controller
            .handle_intent(&mut state, intent)
            .expect("Setup-Intent sollte ohne Fehler durchlaufen");
    }
    state.outbox.drain();
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

/// Startet einen Zieh-Vorgang an `A/x0` und bewegt den Zeiger nahe an die rechte Tabelle.
fn drag_towards_right_table(controller: &mut AppController, state: &mut AppState) {
    send(
        controller,
        state,
        AppIntent::RowMouseDown {
            side: TableSide::Left,
            id: EntityId::signal("A", "x0"),
            shift: false,
        },
    );
    // Fläche ist 200 breit, 30 vor dem rechten Rand greift die Schwelle
    send(controller, state, pointer(PointerKind::Move, 170.0, 5.0));
}

#[test]
fn test_drag_near_opposite_edge_snaps_to_row_and_commits_connect() {
    let (mut controller, mut state) = focused_on_a(false);
    assert!((state.canvas().width() - 200.0).abs() < 1e-3);

    drag_towards_right_table(&mut controller, &mut state);

    assert!(state.interaction.is_tracking());
    let candidate = state
        .interaction
        .candidate()
        .expect("Zeile unter dem Zeiger sollte Ziel sein");
    assert_eq!(candidate.id, EntityId::signal("B", "y0"));
    assert!((candidate.position.y - 12.0).abs() < 1e-3);
    assert!((candidate.position.x - 200.0).abs() < 1e-3);

    let batch = state.outbox.drain();
    assert!(batch.chrome_calls.contains(&ChromeCall::HighlightRow {
        side: TableSide::Right,
        id: EntityId::signal("B", "y0"),
        on: true,
    }));
    assert!(batch.draw_calls.iter().any(|call| matches!(
        call,
        DrawCall::DrawPath {
            id: PathId::DragPreview,
            ..
        }
    )));

    send(&mut controller, &mut state, pointer(PointerKind::Up, 170.0, 5.0));

    assert!(state.interaction.is_idle());
    let batch = state.outbox.drain();
    assert_eq!(
        batch.model_requests,
        vec![ModelRequest::Connect {
            src: EntityId::signal("A", "x0"),
            dst: EntityId::signal("B", "y0"),
            muted: false,
        }]
    );
    assert!(state.map_count() == 0, "das Modell ändert sich erst durch den Host");
}

#[test]
fn test_mute_modifier_while_tracking_requests_muted_map() {
    let (mut controller, mut state) = focused_on_a(false);
    drag_towards_right_table(&mut controller, &mut state);
    state.outbox.drain();

    send(&mut controller, &mut state, AppIntent::MuteModifierPressed);
    let batch = state.outbox.drain();
    assert!(batch.draw_calls.iter().any(|call| matches!(
        call,
        DrawCall::DrawPath {
            id: PathId::DragPreview,
            attrs,
            ..
        } if attrs.dashed
    )));

    send(&mut controller, &mut state, pointer(PointerKind::Up, 170.0, 5.0));
    let batch = state.outbox.drain();
    assert!(matches!(
        batch.model_requests.as_slice(),
        [ModelRequest::Connect { muted: true, .. }]
    ));
}

#[test]
fn test_mode_switch_while_tracking_leaves_no_orphan_preview() {
    let (mut controller, mut state) = focused_on_a(false);
    drag_towards_right_table(&mut controller, &mut state);
    state.outbox.drain();

    send(&mut controller, &mut state, AppIntent::ModeKeyPressed { key: '4' });

    assert_eq!(state.mode(), ViewMode::Grid);
    assert!(state.interaction.is_idle());
    let batch = state.outbox.drain();
    let removed = batch.draw_calls.iter().position(|call| {
        matches!(
            call,
            DrawCall::RemovePath {
                id: PathId::DragPreview
            }
        )
    });
    assert!(removed.is_some(), "Vorschau sollte entfernt werden");
    assert!(!batch.draw_calls.iter().any(|call| matches!(
        call,
        DrawCall::DrawPath {
            id: PathId::DragPreview,
            ..
        }
    )));
    assert!(batch.model_requests.is_empty());
}

#[test]
fn test_drag_abort_clears_preview_without_request() {
    let (mut controller, mut state) = focused_on_a(false);
    drag_towards_right_table(&mut controller, &mut state);
    state.outbox.drain();

    send(&mut controller, &mut state, AppIntent::DragAborted);

    assert!(state.interaction.is_idle());
    let batch = state.outbox.drain();
    assert!(batch.model_requests.is_empty());
    assert!(batch.chrome_calls.contains(&ChromeCall::HighlightRow {
        side: TableSide::Right,
        id: EntityId::signal("B", "y0"),
        on: false,
    }));
}

#[test]
fn test_click_on_edge_selects_it_and_delete_requests_disconnect() {
    let (mut controller, mut state) = focused_on_a(true);
    let map_id = Map::new(EntityId::signal("A", "x0"), EntityId::signal("B", "y0")).id;
    let midpoint = state
        .view
        .edge_path(&map_id)
        .and_then(|path| path.midpoint())
        .expect("Kante sollte gezeichnet sein");

    send(&mut controller, &mut state, pointer(PointerKind::Down, midpoint.x, midpoint.y));
    send(&mut controller, &mut state, pointer(PointerKind::Up, midpoint.x, midpoint.y));

    assert!(state.selection.is_edge_selected(&map_id));
    assert!(state.sweep.is_none());
    let batch = state.outbox.drain();
    assert!(batch.chrome_calls.contains(&ChromeCall::SelectionChanged));
    assert!(batch.draw_calls.iter().any(|call| matches!(
        call,
        DrawCall::DrawPath { id: PathId::Edge(id), attrs, .. }
            if *id == map_id && attrs.stroke == state.options.edge_color_selected
    )));

    send(&mut controller, &mut state, AppIntent::DeleteRequested);

    let batch = state.outbox.drain();
    assert_eq!(
        batch.model_requests,
        vec![ModelRequest::Disconnect {
            src: EntityId::signal("A", "x0"),
            dst: EntityId::signal("B", "y0"),
        }]
    );
    assert!(state.selection.is_empty());
    assert_eq!(state.map_count(), 1);
}

#[test]
fn test_click_on_empty_surface_clears_edge_selection() {
    let (mut controller, mut state) = focused_on_a(true);
    send(&mut controller, &mut state, AppIntent::SelectAllRequested);
    assert_eq!(state.selection.len(), 1);

    send(&mut controller, &mut state, pointer(PointerKind::Down, 100.0, 400.0));

    assert!(state.selection.is_empty());
}

#[test]
fn test_surface_click_after_row_press_selects_edge() {
    let (mut controller, mut state) = focused_on_a(true);
    let map_id = Map::new(EntityId::signal("A", "x0"), EntityId::signal("B", "y0")).id;
    let midpoint = state
        .view
        .edge_path(&map_id)
        .and_then(|path| path.midpoint())
        .expect("Kante sollte gezeichnet sein");

    send(
        &mut controller,
        &mut state,
        AppIntent::RowMouseDown {
            side: TableSide::Left,
            id: EntityId::signal("A", "x0"),
            shift: false,
        },
    );
    assert!(!state.interaction.is_idle());

    send(&mut controller, &mut state, pointer(PointerKind::Down, midpoint.x, midpoint.y));
    send(&mut controller, &mut state, pointer(PointerKind::Up, midpoint.x, midpoint.y));

    assert!(state.interaction.is_idle());
    assert!(state.selection.is_edge_selected(&map_id));
    assert_eq!(state.selection.len(), 1, "Zeilen-Selektion wird ersetzt");
}
