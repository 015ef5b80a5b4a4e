//! Zieh-Vorgang zwischen frei platzierten Ankern (Hive, Graph, Canvas).

use super::{DragContext, DragSession, DragTarget, InteractionEffect, PointerEvent};
use crate::app::outbox::ModelRequest;
use crate::core::EntityId;
use crate::shared::{geometry, ArrowFacing};

/// Verarbeitet eine Zeigerbewegung: nächster verbindbarer Anker im Fangradius wird Ziel.
pub(super) fn update(
    session: &mut DragSession,
    event: &PointerEvent,
    ctx: &DragContext<'_>,
) -> Vec<InteractionEffect> {
    let src = session.source.id().clone();
    let src_direction = ctx.model.find_signal(&src).map(|sig| sig.direction);
    let hit = ctx
        .index
        .nearest_matching(event.position, ctx.options.anchor_snap_radius, |id| {
            if id == &src {
                return false;
            }
            let opposite = match (src_direction, ctx.model.find_signal(id)) {
                (Some(dir), Some(sig)) => sig.direction == dir.opposite(),
                _ => false,
            };
            opposite && ctx.oracle.is_compatible(ctx.model, &src, id)
        });

    let mut effects = Vec::new();
    let next = hit.map(|m| DragTarget {
        id: m.id,
        side: None,
        position: m.position,
    });
    let changed = session.candidate.as_ref().map(|c| &c.id) != next.as_ref().map(|n| &n.id);
    if changed {
        effects.push(InteractionEffect::CandidateMarker(
            next.as_ref().map(|target| target.position),
        ));
    }
    session.candidate = next;

    let end = session
        .candidate
        .as_ref()
        .map_or(event.position, |target| target.position);
    let facing = if end.x >= session.start.x {
        ArrowFacing::Right
    } else {
        ArrowFacing::Left
    };
    let path = geometry::line(session.start, end);
    let arrow = geometry::arrow_head(end, facing);
    effects.push(session.preview(path, arrow));
    effects
}

/// Anfrage für ein abgeschlossenes Ziel; der Ausgang ist immer die Quelle.
pub(super) fn request(
    id: &EntityId,
    target: &DragTarget,
    muted: bool,
    ctx: &DragContext<'_>,
) -> ModelRequest {
    let source_is_output = ctx.model.find_signal(id).map_or(true, |sig| sig.is_output());
    let (src, dst) = if source_is_output {
        (id.clone(), target.id.clone())
    } else {
        (target.id.clone(), id.clone())
    };
    ModelRequest::Connect { src, dst, muted }
}
