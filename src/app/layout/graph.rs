//! Graph-Ansicht: Signale an reproduzierbar zufälligen Positionen.

use glam::Vec2;

use super::{
    free_edge, EdgeGeometry, EdgeRef, LayoutContext, LayoutError, LayoutStrategy, NodeGlyph,
};
use crate::app::view_mode::ViewMode;
use crate::core::{AnchorMap, AnchorPosition, AnchorSlot};
use crate::shared::geometry;

/// Layout der Graph-Ansicht.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphLayout;

impl LayoutStrategy for GraphLayout {
    fn mode(&self) -> ViewMode {
        ViewMode::Graph
    }

    fn compute_positions(&self, ctx: &LayoutContext<'_>) -> AnchorMap {
        let mut anchors = AnchorMap::new();
        for (id, position) in ctx.graph_placements.iter() {
            if ctx.model.find_signal(id).is_some() {
                anchors.insert(id.clone(), AnchorSlot::Free, AnchorPosition::at(position));
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
        let EdgeRef::Map(map) = edge else {
            return Err(LayoutError::InvalidMap(edge.id().clone(), "Link im Graph".into()));
        };
        let center = ctx.canvas.center();
        let inflation = ctx.options.graph_inflation;
        free_edge(ctx, anchors, map, |from, to| {
            let mid =
                geometry::inflate_from((from.position + to.position) * 0.5, center, inflation);
            geometry::smooth_curve(from.position, mid, to.position)
        })
    }

    fn node_glyphs(&self, ctx: &LayoutContext<'_>, anchors: &AnchorMap) -> Vec<NodeGlyph> {
        let radius = ctx.options.signal_glyph_radius;
        anchors
            .in_slot(AnchorSlot::Free)
            .filter(|(id, _)| !ctx.model.is_hidden(id))
            .map(|(id, anchor)| NodeGlyph {
                id: id.clone(),
                path: geometry::circle(anchor.position, radius),
                filled: true,
                label: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::layout::{CanvasPlacements, GraphPlacements};
    use crate::app::tables::{ListFocus, Tables};
    use crate::core::{CanvasRect, Device, EntityId, Map, NetworkModel, SignalDirection};
    use crate::shared::{PathCommand, ViewOptions};
    use approx::assert_relative_eq;

    #[test]
    fn control_point_is_pushed_away_from_center() {
        let mut model = NetworkModel::new();
        model.add_device(
            Device::new("a", "h", 1)
                .with_signal("out", SignalDirection::Output)
                .with_signal("in", SignalDirection::Input),
        );
        let canvas = CanvasRect::sized(400.0, 400.0);
        let mut graph_placements = GraphPlacements::new(7);
        graph_placements.ensure(&model, canvas);

        let options = ViewOptions::default();
        let tables = Tables::new(24.0, 24.0);
        let focus = ListFocus::Overview;
        let canvas_placements = CanvasPlacements::default();
        let ctx = LayoutContext {
            model: &model,
            canvas,
            tables: &tables,
            options: &options,
            focus: &focus,
            canvas_placements: &canvas_placements,
            graph_placements: &graph_placements,
        };
        let anchors = GraphLayout.compute_positions(&ctx);
        assert_eq!(anchors.len(), 2);

        let map = Map::new(EntityId::new("a/out"), EntityId::new("a/in"));
        let geometry = GraphLayout
            .compute_edge_path(&ctx, &anchors, EdgeRef::Map(&map))
            .expect("Kante erwartet");
        let from = graph_placements.get(&EntityId::new("a/out")).expect("Position");
        let to = graph_placements.get(&EntityId::new("a/in")).expect("Position");
        let mid = (from + to) * 0.5;
        let expected = mid + (mid - canvas.center()) * 0.2;
        match geometry.path.commands()[1] {
            PathCommand::CurveTo { c1, c2, .. } => {
                assert_eq!(c1, from);
                assert_relative_eq!(c2.x, expected.x, epsilon = 1e-3);
                assert_relative_eq!(c2.y, expected.y, epsilon = 1e-3);
            }
            other => panic!("Kurve erwartet, war {other:?}"),
        }
    }
}
