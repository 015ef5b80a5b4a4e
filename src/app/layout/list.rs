//! Listen-Ansicht: Quellen links, Ziele rechts, Kurven über die Mitte.

use glam::Vec2;

use super::{EdgeGeometry, EdgeLabel, EdgeRef, LayoutContext, LayoutError, LayoutStrategy};
use crate::app::view_mode::ViewMode;
use crate::core::{AnchorMap, AnchorPosition, AnchorSlot, EntityId, TableSide};
use crate::shared::{geometry, ListCurve, PathSpec};

const LEFT: AnchorSlot = AnchorSlot::Table(TableSide::Left);
const RIGHT: AnchorSlot = AnchorSlot::Table(TableSide::Right);

/// Layout der Listen-Ansicht.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListLayout;

impl ListLayout {
    fn resolve(
        anchors: &AnchorMap,
        id: &EntityId,
        preference: &[AnchorSlot],
    ) -> Result<(AnchorSlot, AnchorPosition), LayoutError> {
        anchors
            .resolve(id, preference)
            .ok_or_else(|| LayoutError::UnresolvedRow(id.clone()))
    }

    fn curve(
        ctx: &LayoutContext<'_>,
        from: (AnchorSlot, AnchorPosition),
        to: (AnchorSlot, AnchorPosition),
    ) -> (PathSpec, ListCurve) {
        let same_side = match (from.0, to.0) {
            (LEFT, LEFT) => Some(true),
            (RIGHT, RIGHT) => Some(false),
            _ => None,
        };
        geometry::list_bezier(
            from.1.position,
            to.1.position,
            ctx.canvas.width(),
            same_side,
            ctx.options.list_same_side_bow,
            ctx.options.list_same_side_factor,
        )
    }
}

impl LayoutStrategy for ListLayout {
    fn mode(&self) -> ViewMode {
        ViewMode::List
    }

    fn compute_positions(&self, ctx: &LayoutContext<'_>) -> AnchorMap {
        let mut anchors = AnchorMap::new();
        for (side, slot, inward) in [
            (TableSide::Left, LEFT, Vec2::X),
            (TableSide::Right, RIGHT, Vec2::NEG_X),
        ] {
            let table = ctx.tables.get(side);
            for row in table.visible_rows() {
                if let Some(point) = table.anchor_point(&row.id) {
                    anchors.insert(row.id.clone(), slot, AnchorPosition::directed(point, inward));
                }
            }
        }
        anchors
    }

    fn compute_edge_path(
        &self,
        ctx: &LayoutContext<'_>,
        anchors: &AnchorMap,
        edge: EdgeRef<'_>,
    ) -> Result<EdgeGeometry, LayoutError> {
        let dst = Self::resolve(anchors, edge.destination(), &[RIGHT, LEFT])?;

        match edge {
            EdgeRef::Link(link) => {
                let src = Self::resolve(anchors, &link.src, &[LEFT, RIGHT])?;
                let (path, curve) = Self::curve(ctx, src, dst);
                let mut geometry = EdgeGeometry::stroked(path);
                geometry.arrow_end = link.num_maps[0] > 0;
                geometry.arrow_start = link.num_maps[1] > 0;
                geometry.label = Some(EdgeLabel {
                    position: Vec2::new(curve.h_center, curve.v_center),
                    text: (link.num_maps[0] + link.num_maps[1]).to_string(),
                });
                Ok(geometry)
            }
            EdgeRef::Map(map) => {
                if map.srcs.is_empty() {
                    return Err(LayoutError::InvalidMap(
                        map.id.clone(),
                        "keine Quellen".into(),
                    ));
                }
                let mut path = PathSpec::new();
                let mut first_curve = None;
                for src_id in &map.srcs {
                    let src = Self::resolve(anchors, src_id, &[LEFT, RIGHT])?;
                    let (segment, curve) = Self::curve(ctx, src, dst);
                    first_curve.get_or_insert((src.1.position, curve));
                    path = path.append(segment);
                }
                let mut geometry = EdgeGeometry::stroked(path);
                geometry.intro = first_curve.map(|(from, curve)| {
                    geometry::list_intro_stages(from, curve, ctx.canvas.width())
                });
                Ok(geometry)
            }
        }
    }

    fn keeps_hidden_edges(&self) -> bool {
        true
    }
}
