//! Mapper-View Demo-Host.
//!
//! Lädt ein Netzwerk-Modell (JSON) oder ein Beispielnetz, spielt eine kurze
//! Sitzung durch alle Ansichten und gibt die Aufträge je Schritt als JSON aus.

use anyhow::Context;
use mapper_view::{
    AppController, AppIntent, AppState, ChangeKind, Device, EntityId, Map, ModelEntity,
    ModelEvent, NetworkModel, SignalDirection, ViewMode, ViewOptions,
};

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Mapper-View v{} startet...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        log::error!("Abbruch: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let options = ViewOptions::load_from_file(&ViewOptions::config_path());
    let model = match std::env::args().nth(1) {
        Some(path) => load_model(&path)?,
        None => sample_model(),
    };

    let mut state = AppState::with_options(options);
    let mut controller = AppController::new();

    step(&mut controller, &mut state, "resize", AppIntent::FrameResized {
        width: 1000.0,
        height: 600.0,
    })?;
    step(&mut controller, &mut state, "model", AppIntent::ModelReset { model })?;
    step(&mut controller, &mut state, "tick", AppIntent::ReconcileTick)?;

    let map = Map::new(
        EntityId::signal("synth", "freq"),
        EntityId::signal("mixer", "gain"),
    );
    step(&mut controller, &mut state, "map", AppIntent::EntityChanged {
        event: ModelEvent {
            change: ChangeKind::Added,
            entity: ModelEntity::Map(map),
        },
    })?;
    step(&mut controller, &mut state, "tick", AppIntent::ReconcileTick)?;

    for mode in [ViewMode::Grid, ViewMode::Hive, ViewMode::Graph, ViewMode::Canvas] {
        step(&mut controller, &mut state, mode.name(), AppIntent::ModeSelected { mode })?;
    }

    log::info!(
        "Sitzung beendet: {} Maps, {} Links, {} Commands",
        state.map_count(),
        state.link_count(),
        state.command_log.len()
    );
    Ok(())
}

/// Verarbeitet einen Intent und gibt die gesammelten Aufträge aus.
fn step(
    controller: &mut AppController,
    state: &mut AppState,
    label: &str,
    intent: AppIntent,
) -> anyhow::Result<()> {
    controller.handle_intent(state, intent)?;
    let batch = controller.drain_outbox(state);
    if batch.is_empty() {
        return Ok(());
    }
    let json = serde_json::to_string(&batch).context("Outbox nicht serialisierbar")?;
    println!("{{\"step\":\"{}\",\"batch\":{}}}", label, json);
    Ok(())
}

fn load_model(path: &str) -> anyhow::Result<NetworkModel> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Modell nicht lesbar: {}", path))?;
    let model = serde_json::from_str(&content)
        .with_context(|| format!("Modell fehlerhaft: {}", path))?;
    log::info!("Modell geladen aus: {}", path);
    Ok(model)
}

fn sample_model() -> NetworkModel {
    let mut model = NetworkModel::new();
    model.add_device(
        Device::new("synth", "192.168.0.10", 9000)
            .with_signal("freq", SignalDirection::Output)
            .with_signal("amp", SignalDirection::Output),
    );
    model.add_device(
        Device::new("mixer", "192.168.0.11", 9001).with_signal("gain", SignalDirection::Input),
    );
    model
}
