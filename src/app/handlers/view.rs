//! Handler für Ansicht, Modus-Wechsel, Tabellen und Optionen.

use crate::app::layout::GraphPlacements;
use crate::app::outbox::ChromeCall;
use crate::app::render_pass::{self, PassTiming};
use crate::app::scheduler::ReconcileReason;
use crate::app::tables::{ListFocus, Tables};
use crate::app::view_mode::ViewMode;
use crate::app::AppState;
use crate::core::{EntityId, Frame, TableSide};
use crate::shared::{AnimationToken, ViewOptions};

/// Führt den anstehenden Abgleich aus (Tick vom Host).
pub fn run_reconcile_pass(state: &mut AppState) {
    let Some(pending) = state.scheduler.take() else {
        return;
    };
    let timing = if pending.is_animated() {
        PassTiming::animated(state.options.animation_duration_ms)
    } else {
        PassTiming::immediate()
    };
    log::debug!(
        "Abgleich #{} ({} Anforderungen)",
        pending.generation,
        pending.reasons.len()
    );
    render_pass::run(state, timing);
}

/// Übernimmt einen neuen Rahmen; Chrome und Fläche springen ohne Animation.
pub fn resize_frame(state: &mut AppState, width: f32, height: f32) {
    let frame = Frame::new(width.max(0.0), height.max(0.0));
    if frame == state.view.frame {
        return;
    }
    state.view.frame = frame;
    let layout = state.view_mode.resize(frame, &state.options);
    state.outbox.chrome(ChromeCall::SetChrome { layout });
    render_pass::run(state, PassTiming::immediate());
}

/// Wechselt den Ansichtsmodus.
///
/// Laufende Zieh- und Platzierungsvorgänge werden abgebrochen, die Fläche
/// geleert und im neuen Modus neu gezeichnet.
pub fn switch_mode(state: &mut AppState, mode: ViewMode) {
    if mode == state.mode() && !state.view_mode.in_flight() {
        return;
    }
    super::interaction::cancel_drag(state);
    super::interaction::cancel_placement(state);
    super::interaction::clear_grid_cursor(state);
    state.sweep = None;

    let token = state.view.next_token();
    let frame = state.view.frame;
    let plan = state
        .view_mode
        .begin_switch(mode, frame, &state.options, token);

    render_pass::clear_surface(state);
    state.outbox.chrome(plan.chrome_call);
    // der Moduswechsel zeichnet ohnehin alles neu
    state.scheduler.cancel();
    render_pass::run(
        state,
        PassTiming {
            duration_ms: plan.redraw_ms,
            intro: false,
        },
    );
}

/// Meldet das Ende einer Animation (Chrome-Übergang oder Kanten-Einblendung).
pub fn finish_animation(state: &mut AppState, token: AnimationToken) {
    if state.view_mode.finish(token) {
        log::debug!("Übergang nach {} abgeschlossen", state.mode());
        return;
    }
    if render_pass::finish_intro(state, token) {
        return;
    }
    log::debug!("Veraltetes Animations-Token {:?} ignoriert", token);
}

/// Scrollt eine Tabelle; Kanten folgen sofort.
pub fn scroll_table(state: &mut AppState, side: TableSide, offset: f32) {
    if state.tables.get_mut(side).set_scroll(offset) {
        render_pass::run(state, PassTiming::immediate());
    }
}

/// Übernimmt die vom Host sortierte Zeilenreihenfolge.
///
/// Unbekannte Zeilen in der Reihenfolge gelten als inkonsistente Eingabe.
pub fn sort_table(
    state: &mut AppState,
    side: TableSide,
    order: Vec<EntityId>,
) -> anyhow::Result<()> {
    let table = state.tables.get_mut(side);
    if let Some(unknown) = order.iter().find(|id| !table.contains(id)) {
        anyhow::bail!(
            "Sortierung für {:?} enthält unbekannte Zeile {}",
            side,
            unknown
        );
    }
    table.set_order(order);
    render_pass::run(state, PassTiming::immediate());
    Ok(())
}

/// Wechselt den Fokus der Listen-Ansicht.
pub fn set_focus(state: &mut AppState, focus: ListFocus) {
    if focus == state.focus {
        return;
    }
    if let ListFocus::Device(device) = &focus {
        if state.model.linked_devices(device).is_empty() {
            log::info!("Device {} hat keine Links, Fokus bleibt unverändert", device);
            return;
        }
    }
    log::info!("Fokus gewechselt: {:?}", focus);
    super::interaction::cancel_drag(state);
    state.focus = focus;
    state.scheduler.schedule(ReconcileReason::Focus);
}

/// Übernimmt neue Optionen und zeichnet alles neu.
pub fn apply_options(state: &mut AppState, options: ViewOptions) -> anyhow::Result<()> {
    if !(options.row_height > 0.0 && options.column_width > 0.0) {
        anyhow::bail!(
            "Ungültige Zeilenmaße: Höhe {}, Breite {}",
            options.row_height,
            options.column_width
        );
    }
    super::interaction::cancel_drag(state);
    super::interaction::cancel_placement(state);
    if options.graph_seed != state.options.graph_seed {
        state.graph_placements = GraphPlacements::new(options.graph_seed);
    }
    state.tables = Tables::new(options.row_height, options.column_width);
    state.options = options;

    let layout = state.view_mode.resize(state.view.frame, &state.options);
    state.outbox.chrome(ChromeCall::SetChrome { layout });
    render_pass::clear_surface(state);
    // neu erzeugte Tabellen werden vollständig an den Host gemeldet
    state.view.tabs = None;
    render_pass::run(state, PassTiming::immediate());
    log::info!("Optionen übernommen");
    Ok(())
}
