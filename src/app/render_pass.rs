//! Abgleich-Durchlauf: Tabellen, Anker, Glyphen und Kanten neu berechnen
//! und nur die Unterschiede zum zuletzt Gezeichneten an den Host geben.
//!
//! Ein Durchlauf bricht nie ab. Kanten, deren Geometrie sich nicht bestimmen
//! lässt, werden ausgelassen und im `PassReport` vermerkt.

use glam::Vec2;
use indexmap::IndexMap;

use super::layout::{
    self, EdgeGeometry, EdgeLabel, EdgeRef, LayoutContext, LayoutError, LayoutStrategy,
};
use super::outbox::ChromeCall;
use super::state::{DrawnEdge, DrawnNode, PassReport, Selectable, VisibleSet};
use super::tables::{self, ListFocus};
use super::view_mode::ViewMode;
use super::AppState;
use crate::core::{AnchorIndex, AnchorMap, AnchorSlot, EdgeId, MapStatus, NetworkModel, TableSide};
use crate::shared::{
    AnimationToken, ArrowHead, DrawCall, Easing, PathAttributes, PathId, TextAttributes,
    ViewOptions,
};

/// Zeitverhalten eines Durchlaufs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassTiming {
    /// Dauer für geänderte Kanten (0 = sofort)
    pub duration_ms: u32,
    /// Neue Kanten mit Einblend-Animation
    pub intro: bool,
}

impl PassTiming {
    /// Alles springt sofort in den Endzustand.
    pub fn immediate() -> Self {
        Self {
            duration_ms: 0,
            intro: false,
        }
    }

    /// Geänderte Kanten animieren, neue Kanten einblenden.
    pub fn animated(duration_ms: u32) -> Self {
        Self {
            duration_ms,
            intro: duration_ms > 0,
        }
    }
}

/// Eine berechnete, noch nicht gezeichnete Kante.
struct LaidOutEdge {
    geometry: EdgeGeometry,
    attrs: PathAttributes,
}

/// Führt einen vollständigen Durchlauf für den aktiven Modus aus.
pub fn run(state: &mut AppState, timing: PassTiming) -> PassReport {
    let mode = state.mode();
    fall_back_to_overview(state);
    refresh_tables(state, mode);
    emit_tabs(state, mode);
    if mode == ViewMode::Graph {
        let canvas = state.canvas();
        let added = state.graph_placements.ensure(&state.model, canvas);
        if added > 0 {
            log::debug!("{} Signale im Graph neu platziert", added);
        }
    }

    let strategy = layout::strategy_for(mode);
    let ctx = state.layout_context();
    let anchors = strategy.compute_positions(&ctx);
    let glyphs = strategy.node_glyphs(&ctx, &anchors);

    let mut laid_out: IndexMap<EdgeId, LaidOutEdge> = IndexMap::new();
    let mut skipped = Vec::new();
    for edge in layout::edges_for(mode, &state.focus, &state.model) {
        match layout_edge(&ctx, strategy.as_ref(), &anchors, edge) {
            Ok((geometry, hidden)) => {
                let selected = state.selection.is_edge_selected(edge.id());
                let attrs = edge_attributes(&state.options, &geometry, edge, selected, hidden);
                laid_out.insert(edge.id().clone(), LaidOutEdge { geometry, attrs });
            }
            Err(err) => {
                log_skip(edge.id(), &err);
                skipped.push((edge.id().clone(), err));
            }
        }
    }
    let anchor_index = build_anchor_index(mode, &anchors, &state.model, &state.options);

    draw_glyphs(state, glyphs);
    let drawn_edges = draw_edges(state, laid_out, timing);
    state.view.anchors = anchors;
    state.view.anchor_index = anchor_index;
    update_visible(state);

    log::debug!(
        "Abgleich ({}): {} Kanten gezeichnet, {} übersprungen",
        mode,
        drawn_edges.len(),
        skipped.len()
    );
    let report = PassReport {
        mode,
        drawn_edges,
        skipped,
    };
    state.view.last_report = Some(report.clone());
    report
}

/// Entfernt alles Gezeichnete von der Fläche (Moduswechsel, neue Optionen).
pub fn clear_surface(state: &mut AppState) {
    for (id, edge) in std::mem::take(&mut state.view.edges) {
        if edge.label.is_some() {
            state.outbox.draw(DrawCall::RemovePath {
                id: PathId::EdgeLabel(id.clone()),
            });
        }
        state.outbox.draw(DrawCall::RemovePath {
            id: PathId::Edge(id),
        });
    }
    for (id, node) in std::mem::take(&mut state.view.nodes) {
        if node.label.is_some() {
            state.outbox.draw(DrawCall::RemovePath {
                id: PathId::NodeLabel(id.clone()),
            });
        }
        state.outbox.draw(DrawCall::RemovePath {
            id: PathId::Node(id),
        });
    }
    state.view.pending_intros.clear();
    state.view.anchors = AnchorMap::new();
    state.view.anchor_index = AnchorIndex::empty();
}

/// Setzt die Einblend-Animation einer neuen Kante fort (Mitte → volle Kurve).
///
/// Gibt `false` zurück, wenn das Token zu keiner laufenden Einblendung gehört.
pub fn finish_intro(state: &mut AppState, token: AnimationToken) -> bool {
    let Some(id) = state.view.pending_intros.remove(&token) else {
        return false;
    };
    if let Some(edge) = state.view.edges.get(&id) {
        state.outbox.draw(DrawCall::AnimatePath {
            id: PathId::Edge(id.clone()),
            spec: edge.path.clone(),
            attrs: edge.attrs,
            duration_ms: state.options.animation_duration_ms / 2,
            easing: Easing::EaseOut,
            on_complete: None,
        });
    }
    true
}

/// Verlässt den Device-Fokus, wenn das Device verschwunden ist oder keine Links mehr hat.
fn fall_back_to_overview(state: &mut AppState) {
    let ListFocus::Device(device) = &state.focus else {
        return;
    };
    if state.model.find_device(device).is_none() || state.model.linked_devices(device).is_empty() {
        log::info!("Fokus auf {} aufgehoben, zurück zur Geräteübersicht", device);
        state.focus = ListFocus::Overview;
    }
}

/// Baut die Tabelleninhalte neu, wendet den Filter an und meldet Änderungen an den Host.
fn refresh_tables(state: &mut AppState, mode: ViewMode) {
    let canvas = state.canvas();
    let before = TableSide::ALL.map(|side| {
        let table = state.tables.get(side);
        (table.headers().to_vec(), table.rows().to_vec())
    });

    for (side, content) in tables::build_contents(mode, &state.focus, &state.model) {
        state
            .tables
            .get_mut(side)
            .set_content(content.headers, content.rows);
    }
    state.tables.left.set_cross(canvas.width());
    state.tables.right.set_cross(canvas.width());
    state.tables.top.set_cross(canvas.height());
    state
        .filter
        .apply(&mut state.tables, &state.model, mode, &state.focus);

    for (side, (headers, rows)) in TableSide::ALL.into_iter().zip(before) {
        let table = state.tables.get(side);
        if table.headers() != headers.as_slice() {
            state.outbox.chrome(ChromeCall::SetTableHeaders {
                side,
                columns: table.headers().to_vec(),
            });
        }
        if table.rows() == rows.as_slice() {
            continue;
        }
        state.outbox.chrome(ChromeCall::SetTableRows {
            side,
            rows: table.rows().to_vec(),
        });
        // neu gesetzte Zeilen verlieren ihre Hervorhebung im Host
        let selected: Vec<_> = table
            .visible_rows()
            .filter(|row| {
                state.selection.is_selected(&Selectable::Row {
                    side,
                    id: row.id.clone(),
                })
            })
            .map(|row| row.id.clone())
            .collect();
        for id in selected {
            state
                .outbox
                .chrome(ChromeCall::HighlightRow { side, id, on: true });
        }
    }
}

fn emit_tabs(state: &mut AppState, mode: ViewMode) {
    let (tabs, active) = if mode == ViewMode::List {
        let tabs = tables::focus_tabs(&state.model)
            .iter()
            .map(ToString::to_string)
            .collect();
        let active = match &state.focus {
            ListFocus::Device(device) => Some(device.to_string()),
            ListFocus::Overview => None,
        };
        (tabs, active)
    } else {
        (Vec::new(), None)
    };
    if state.view.tabs.as_ref() == Some(&(tabs.clone(), active.clone())) {
        return;
    }
    state.outbox.chrome(ChromeCall::SetTabs {
        tabs: tabs.clone(),
        active: active.clone(),
    });
    state.view.tabs = Some((tabs, active));
}

/// Berechnet eine Kante; `hidden` markiert Kanten, die unsichtbar erhalten bleiben.
fn layout_edge(
    ctx: &LayoutContext<'_>,
    strategy: &dyn LayoutStrategy,
    anchors: &AnchorMap,
    edge: EdgeRef<'_>,
) -> Result<(EdgeGeometry, bool), LayoutError> {
    let dst = edge.destination();
    let map_hidden = matches!(edge, EdgeRef::Map(map) if map.hidden);
    let dst_hidden = map_hidden || ctx.model.is_hidden(dst);

    if !strategy.keeps_hidden_edges() {
        if dst_hidden {
            return Err(LayoutError::HiddenEndpoint(dst.clone()));
        }
        // teilweise ausgeblendete Quellen behandelt die Strategie selbst
        return strategy
            .compute_edge_path(ctx, anchors, edge)
            .map(|geometry| (geometry, false));
    }

    let geometry = strategy.compute_edge_path(ctx, anchors, edge)?;
    let hidden = dst_hidden || edge.sources().iter().any(|src| ctx.model.is_hidden(src));
    Ok((geometry, hidden))
}

fn edge_attributes(
    options: &ViewOptions,
    geometry: &EdgeGeometry,
    edge: EdgeRef<'_>,
    selected: bool,
    hidden: bool,
) -> PathAttributes {
    let (muted, staged) = match edge {
        EdgeRef::Map(map) => (map.muted, map.status == MapStatus::Staged),
        EdgeRef::Link(_) => (false, false),
    };
    let long_enough = geometry.path.total_length() >= options.min_arrow_length;
    let arrow = |wanted: bool| {
        if wanted && long_enough && !geometry.filled {
            ArrowHead::BlockWideLong
        } else {
            ArrowHead::None
        }
    };
    let color = if selected {
        options.edge_color_selected
    } else {
        options.edge_color
    };

    let attrs = PathAttributes {
        stroke: color,
        stroke_width: if selected {
            options.edge_stroke_width_selected
        } else {
            options.edge_stroke_width
        },
        fill: geometry
            .filled
            .then_some(if selected { color } else { options.grid_fill_color }),
        opacity: if staged { options.staged_opacity } else { 1.0 },
        dashed: muted,
        arrow_start: arrow(geometry.arrow_start),
        arrow_end: arrow(geometry.arrow_end),
    };
    if hidden {
        attrs.hidden()
    } else {
        attrs
    }
}

fn node_attributes(options: &ViewOptions, filled: bool) -> PathAttributes {
    PathAttributes {
        stroke: options.edge_color,
        stroke_width: 1.0,
        fill: filled.then_some(options.glyph_fill_color),
        ..Default::default()
    }
}

fn log_skip(id: &EdgeId, err: &LayoutError) {
    match err {
        LayoutError::InvalidMap(..) => log::warn!("Kante {} übersprungen: {}", id, err),
        _ => log::debug!("Kante {} übersprungen: {}", id, err),
    }
}

/// Ziehbare Anker: sichtbare Signale der freien Ansichten, im Canvas die Ports.
fn build_anchor_index(
    mode: ViewMode,
    anchors: &AnchorMap,
    model: &NetworkModel,
    options: &ViewOptions,
) -> AnchorIndex {
    let shown = anchors
        .in_slot(AnchorSlot::Free)
        .filter(|(id, _)| !model.is_hidden(id));
    match mode {
        ViewMode::List | ViewMode::Grid => AnchorIndex::empty(),
        ViewMode::Canvas => AnchorIndex::from_points(shown.map(|(id, anchor)| {
            let side = anchor.velocity.unwrap_or(Vec2::ZERO);
            (id, anchor.position + side * options.canvas_port_offset)
        })),
        ViewMode::Hive | ViewMode::Graph => AnchorIndex::from_points(
            shown
                .filter(|(id, _)| id.is_signal())
                .map(|(id, anchor)| (id, anchor.position)),
        ),
    }
}

fn draw_glyphs(state: &mut AppState, glyphs: Vec<layout::NodeGlyph>) {
    let mut previous = std::mem::take(&mut state.view.nodes);
    for glyph in glyphs {
        let old = previous.shift_remove(&glyph.id);
        let next = DrawnNode {
            path: glyph.path,
            filled: glyph.filled,
            label: glyph.label,
        };
        if old.as_ref().map(|o| (&o.path, o.filled)) != Some((&next.path, next.filled)) {
            state.outbox.draw(DrawCall::DrawPath {
                id: PathId::Node(glyph.id.clone()),
                spec: next.path.clone(),
                attrs: node_attributes(&state.options, next.filled),
            });
        }
        emit_label(
            state,
            PathId::NodeLabel(glyph.id.clone()),
            old.and_then(|o| o.label).as_ref(),
            next.label.as_ref(),
        );
        state.view.nodes.insert(glyph.id, next);
    }
    for (id, old) in previous {
        if old.label.is_some() {
            state.outbox.draw(DrawCall::RemovePath {
                id: PathId::NodeLabel(id.clone()),
            });
        }
        state.outbox.draw(DrawCall::RemovePath {
            id: PathId::Node(id),
        });
    }
}

/// Gleicht die Kanten ab und gibt die gezeichneten IDs zurück.
fn draw_edges(
    state: &mut AppState,
    laid_out: IndexMap<EdgeId, LaidOutEdge>,
    timing: PassTiming,
) -> Vec<EdgeId> {
    let mut previous = std::mem::take(&mut state.view.edges);
    let mut drawn = Vec::with_capacity(laid_out.len());

    for (id, LaidOutEdge { geometry, attrs }) in laid_out {
        let path_id = PathId::Edge(id.clone());
        let old = previous.shift_remove(&id);
        match &old {
            None => match (&geometry.intro, timing.intro) {
                (Some((stub, halfway)), true) => {
                    let token = state.view.next_token();
                    state.outbox.draw(DrawCall::DrawPath {
                        id: path_id,
                        spec: stub.clone(),
                        attrs,
                    });
                    state.outbox.draw(DrawCall::AnimatePath {
                        id: PathId::Edge(id.clone()),
                        spec: halfway.clone(),
                        attrs,
                        duration_ms: timing.duration_ms / 2,
                        easing: Easing::Linear,
                        on_complete: Some(token),
                    });
                    state.view.pending_intros.insert(token, id.clone());
                }
                _ => state.outbox.draw(DrawCall::DrawPath {
                    id: path_id,
                    spec: geometry.path.clone(),
                    attrs,
                }),
            },
            Some(old) if old.path == geometry.path && old.attrs == attrs => {}
            Some(_) if timing.duration_ms > 0 => state.outbox.draw(DrawCall::AnimatePath {
                id: path_id,
                spec: geometry.path.clone(),
                attrs,
                duration_ms: timing.duration_ms,
                easing: Easing::EaseOut,
                on_complete: None,
            }),
            Some(_) => state.outbox.draw(DrawCall::DrawPath {
                id: path_id,
                spec: geometry.path.clone(),
                attrs,
            }),
        }

        emit_label(
            state,
            PathId::EdgeLabel(id.clone()),
            old.and_then(|o| o.label).as_ref(),
            geometry.label.as_ref(),
        );
        state.view.edges.insert(
            id.clone(),
            DrawnEdge {
                path: geometry.path,
                attrs,
                label: geometry.label,
            },
        );
        drawn.push(id);
    }

    for (id, old) in previous {
        if old.label.is_some() {
            state.outbox.draw(DrawCall::RemovePath {
                id: PathId::EdgeLabel(id.clone()),
            });
        }
        state.outbox.draw(DrawCall::RemovePath {
            id: PathId::Edge(id.clone()),
        });
        state.view.pending_intros.retain(|_, edge| edge != &id);
    }
    drawn
}

fn emit_label(state: &mut AppState, id: PathId, old: Option<&EdgeLabel>, next: Option<&EdgeLabel>) {
    match next {
        Some(label) if old != Some(label) => state.outbox.draw(DrawCall::DrawText {
            id,
            position: label.position,
            text: label.text.clone(),
            attrs: TextAttributes::default(),
        }),
        Some(_) => {}
        None if old.is_some() => state.outbox.draw(DrawCall::RemovePath { id }),
        None => {}
    }
}

/// Aktualisiert die Menge sichtbarer Zeilen und Kanten.
///
/// Meldet `SelectionChanged`, wenn sich dadurch die sichtbare Selektion ändert.
fn update_visible(state: &mut AppState) {
    let mut visible = VisibleSet::default();
    for table in state.tables.iter() {
        for row in table.visible_rows() {
            visible.rows.insert((table.side(), row.id.clone()));
        }
    }
    visible.edges = state
        .view
        .edges
        .iter()
        .filter(|(_, edge)| edge.attrs.opacity > 0.0)
        .map(|(id, _)| id.clone())
        .collect();

    let before = state.selection.selected(&state.view.visible);
    let after = state.selection.selected(&visible);
    state.view.visible = visible;
    if before != after {
        state.outbox.chrome(ChromeCall::SelectionChanged);
    }
}
