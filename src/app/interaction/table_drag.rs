//! Zieh-Vorgang zwischen den Tabellen der Listen-Ansicht.
//!
//! Die Zieltabelle wird geometrisch bestimmt: entfernt sich der Zeiger um
//! mehr als die halbe Flächenbreite vom Start, wechselt sie auf die Gegenseite.
//! Nahe eines Tabellenrands rastet die Vorschau auf die Zeile unter dem Zeiger ein.

use super::{DragContext, DragSession, DragSource, DragTarget, InteractionEffect, PointerEvent};
use crate::app::outbox::ModelRequest;
use crate::core::{EntityId, TableSide};
use crate::shared::geometry;

/// Startet eine Sitzung an der Zeile; `None`, wenn die Zeile nicht sichtbar ist.
pub(super) fn begin(
    side: TableSide,
    id: &EntityId,
    allow_self: bool,
    ctx: &DragContext<'_>,
) -> Option<DragSession> {
    let start = ctx.tables.get(side).anchor_point(id)?;
    Some(DragSession::new(
        DragSource::Row {
            side,
            id: id.clone(),
        },
        start,
        allow_self,
    ))
}

/// Verarbeitet eine Zeigerbewegung während `Tracking`.
pub(super) fn update(
    session: &mut DragSession,
    event: &PointerEvent,
    ctx: &DragContext<'_>,
) -> Vec<InteractionEffect> {
    let DragSource::Row { side: src_side, .. } = session.source else {
        return Vec::new();
    };
    let width = ctx.canvas.width();
    let threshold = ctx.options.clamp_threshold;
    let pointer = event.position;
    let absdiff = (pointer.x - session.start.x).abs();

    let mut effects = Vec::new();
    let target_side = if absdiff >= width * 0.5 {
        src_side.opposite()
    } else {
        src_side
    };
    if session.target_side != Some(target_side) {
        effects.extend(retarget(session, target_side, ctx));
    }

    let mut end = pointer;
    let clamped_side = if absdiff < threshold {
        end.x = session.start.x;
        Some(src_side)
    } else if width - absdiff < threshold {
        end.x = ctx.tables.get(src_side.opposite()).cross_edge();
        Some(src_side.opposite())
    } else {
        None
    };

    let hovered = match &event.row {
        Some((side, id)) => Some((*side, id.clone())),
        None => clamped_side.and_then(|side| {
            ctx.tables
                .get(side)
                .row_at(pointer.y)
                .map(|row| (side, row.id.clone()))
        }),
    };
    effects.extend(check_target(session, hovered, ctx));

    let control_end = session.candidate.as_ref().map(|target| target.position.y);
    if let Some(target) = &session.candidate {
        end = target.position;
    }
    let (path, arrow) = geometry::drag_preview(
        session.start,
        end,
        control_end,
        width,
        ctx.options.self_loop_pull,
    );
    effects.push(session.preview(path, arrow));
    effects
}

/// Wechselt die Zieltabelle und graut im Signal-Fokus unverbindbare Zeilen aus.
fn retarget(
    session: &mut DragSession,
    target_side: TableSide,
    ctx: &DragContext<'_>,
) -> Vec<InteractionEffect> {
    session.target_side = Some(target_side);
    if ctx.focus.is_overview() {
        return Vec::new();
    }

    let mut effects: Vec<InteractionEffect> = session
        .faded
        .drain(..)
        .map(|(side, ids)| InteractionEffect::FadeRows {
            side,
            ids,
            faded: false,
        })
        .collect();

    let src = session.source.id();
    let candidates: Vec<EntityId> = ctx
        .tables
        .get(target_side)
        .rows()
        .iter()
        .map(|row| row.id.clone())
        .collect();
    let ids = ctx.oracle.incompatible_with(ctx.model, src, &candidates);
    if !ids.is_empty() {
        effects.push(InteractionEffect::FadeRows {
            side: target_side,
            ids: ids.clone(),
            faded: true,
        });
        session.faded.push((target_side, ids));
    }
    effects
}

/// Prüft die Zeile unter dem Zeiger als Ziel.
///
/// Idempotent: dasselbe Ziel erneut erzeugt keine Effekte. Unverbindbare
/// Zeilen werden abgelehnt; ein bisheriges Ziel wird dann aufgegeben.
fn check_target(
    session: &mut DragSession,
    hovered: Option<(TableSide, EntityId)>,
    ctx: &DragContext<'_>,
) -> Vec<InteractionEffect> {
    let next = hovered
        .filter(|(side, id)| accepts(session, *side, id, ctx))
        .and_then(|(side, id)| {
            let position = ctx.tables.get(side).anchor_point(&id)?;
            Some(DragTarget {
                id,
                side: Some(side),
                position,
            })
        });

    let unchanged = match (&session.candidate, &next) {
        (Some(current), Some(next)) => current.id == next.id && current.side == next.side,
        (None, None) => true,
        _ => false,
    };
    if unchanged {
        // Position kann sich durch Scrollen verschoben haben
        session.candidate = next;
        return Vec::new();
    }

    let mut effects = Vec::new();
    if let Some(DragTarget {
        id, side: Some(side), ..
    }) = session.candidate.take()
    {
        effects.push(InteractionEffect::HighlightRow { side, id, on: false });
    }
    if let Some(target) = &next {
        if let Some(side) = target.side {
            effects.push(InteractionEffect::HighlightRow {
                side,
                id: target.id.clone(),
                on: true,
            });
        }
    }
    session.candidate = next;
    effects
}

fn accepts(session: &DragSession, side: TableSide, id: &EntityId, ctx: &DragContext<'_>) -> bool {
    let src = session.source.id();
    if id == src {
        return session.allow_self;
    }
    let faded = session
        .faded
        .iter()
        .any(|(faded_side, ids)| *faded_side == side && ids.contains(id));
    !faded && ctx.oracle.is_compatible(ctx.model, src, id)
}

/// Anfrage für ein abgeschlossenes Ziel; Quelle ist immer die linke Seite.
pub(super) fn request(
    side: TableSide,
    id: &EntityId,
    target: &DragTarget,
    muted: bool,
    ctx: &DragContext<'_>,
) -> ModelRequest {
    let (src, dst) = if side == TableSide::Right && target.side == Some(TableSide::Left) {
        (target.id.clone(), id.clone())
    } else {
        (id.clone(), target.id.clone())
    };
    if ctx.focus.is_overview() {
        ModelRequest::Link { src, dst }
    } else {
        ModelRequest::Connect { src, dst, muted }
    }
}

