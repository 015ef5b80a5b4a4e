//! Canvas-Ansicht: vom Benutzer abgelegte Signal-Glyphen mit seitlichen Ports.

use glam::Vec2;

use super::{
    free_edge, EdgeGeometry, EdgeLabel, EdgeRef, LayoutContext, LayoutError, LayoutStrategy,
    NodeGlyph,
};
use crate::app::view_mode::ViewMode;
use crate::core::{AnchorMap, AnchorPosition, AnchorSlot, SignalDirection};
use crate::shared::geometry;

/// Layout der Canvas-Ansicht.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanvasLayout;

/// Port-Seite eines Signals: Eingänge links (-1), Ausgänge rechts (+1).
fn port_side(direction: SignalDirection) -> f32 {
    match direction {
        SignalDirection::Input => -1.0,
        SignalDirection::Output => 1.0,
    }
}

impl LayoutStrategy for CanvasLayout {
    fn mode(&self) -> ViewMode {
        ViewMode::Canvas
    }

    fn compute_positions(&self, ctx: &LayoutContext<'_>) -> AnchorMap {
        let mut anchors = AnchorMap::new();
        for (id, center) in ctx.canvas_placements.iter() {
            let Some(signal) = ctx.model.find_signal(id) else {
                continue;
            };
            let side = port_side(signal.direction);
            anchors.insert(
                id.clone(),
                AnchorSlot::Free,
                AnchorPosition::directed(center, Vec2::new(side, 0.0)),
            );
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
            return Err(LayoutError::InvalidMap(edge.id().clone(), "Link im Canvas".into()));
        };
        let glyph_width = ctx.options.canvas_glyph_size[0];
        let margin = ctx.options.canvas_control_margin;
        free_edge(ctx, anchors, map, |from, to| {
            // Sammelknoten haben keine Richtung: ausgehend rechts, eingehend links
            let from_side = from.velocity.map_or(1.0, |v| v.x.signum());
            let to_side = to.velocity.map_or(-1.0, |v| v.x.signum());
            geometry::canvas_bezier(
                from.position,
                from_side,
                to.position,
                to_side,
                glyph_width,
                margin,
            )
        })
    }

    fn node_glyphs(&self, ctx: &LayoutContext<'_>, anchors: &AnchorMap) -> Vec<NodeGlyph> {
        let size = Vec2::from(ctx.options.canvas_glyph_size);
        anchors
            .in_slot(AnchorSlot::Free)
            .map(|(id, anchor)| NodeGlyph {
                id: id.clone(),
                path: geometry::canvas_glyph(
                    anchor.position,
                    size,
                    anchor.velocity.map(|v| v.x.signum()),
                    ctx.options.canvas_port_offset,
                    ctx.options.canvas_port_radius,
                ),
                filled: true,
                label: Some(EdgeLabel {
                    position: anchor.position,
                    text: id.to_string(),
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::layout::{CanvasPlacements, GraphPlacements};
    use crate::app::tables::{ListFocus, Tables};
    use crate::core::{CanvasRect, Device, EntityId, Map, NetworkModel};
    use crate::shared::{PathCommand, ViewOptions};

    #[test]
    fn edge_leaves_output_port_and_enters_input_port() {
        let mut model = NetworkModel::new();
        model.add_device(Device::new("a", "h", 1).with_signal("out", SignalDirection::Output));
        model.add_device(Device::new("b", "h", 2).with_signal("in", SignalDirection::Input));
        let mut placements = CanvasPlacements::new();
        placements.place(EntityId::new("a/out"), Vec2::new(100.0, 50.0), 60.0);
        placements.place(EntityId::new("b/in"), Vec2::new(300.0, 150.0), 60.0);

        let options = ViewOptions::default();
        let tables = Tables::new(24.0, 24.0);
        let focus = ListFocus::Overview;
        let graph_placements = GraphPlacements::default();
        let ctx = LayoutContext {
            model: &model,
            canvas: CanvasRect::sized(500.0, 400.0),
            tables: &tables,
            options: &options,
            focus: &focus,
            canvas_placements: &placements,
            graph_placements: &graph_placements,
        };
        let anchors = CanvasLayout.compute_positions(&ctx);
        let map = Map::new(EntityId::new("a/out"), EntityId::new("b/in"));
        let geometry = CanvasLayout
            .compute_edge_path(&ctx, &anchors, EdgeRef::Map(&map))
            .expect("Kante sollte auflösbar sein");

        // halbe Glyphenbreite (50) plus Abstand (6)
        assert_eq!(geometry.path.start_point(), Some(Vec2::new(156.0, 50.0)));
        match geometry.path.commands()[1] {
            PathCommand::CurveTo { to, .. } => assert_eq!(to, Vec2::new(244.0, 150.0)),
            other => panic!("Kurve erwartet, war {other:?}"),
        }

        let glyphs = CanvasLayout.node_glyphs(&ctx, &anchors);
        assert_eq!(glyphs.len(), 2);
    }

    #[test]
    fn unplaced_signal_has_no_anchor() {
        let mut model = NetworkModel::new();
        model.add_device(Device::new("a", "h", 1).with_signal("out", SignalDirection::Output));
        let placements = CanvasPlacements::new();
        let options = ViewOptions::default();
        let tables = Tables::new(24.0, 24.0);
        let focus = ListFocus::Overview;
        let graph_placements = GraphPlacements::default();
        let ctx = LayoutContext {
            model: &model,
            canvas: CanvasRect::sized(500.0, 400.0),
            tables: &tables,
            options: &options,
            focus: &focus,
            canvas_placements: &placements,
            graph_placements: &graph_placements,
        };
        let anchors = CanvasLayout.compute_positions(&ctx);
        let map = Map::new(EntityId::new("a/out"), EntityId::new("b/in"));
        assert_eq!(
            CanvasLayout.compute_edge_path(&ctx, &anchors, EdgeRef::Map(&map)),
            Err(LayoutError::MissingAnchor(EntityId::new("b/in")))
        );
    }
}
