//! Hive-Ansicht: ein Viertelkreis-Fächer von Speichen, eine pro Device.
//!
//! Der Ursprung liegt unten links. Die Speichen teilen 90° gleichmäßig auf,
//! die Signale eines Devices sitzen in gleichen Abständen auf seiner Speiche.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::{
    free_edge, EdgeGeometry, EdgeRef, LayoutContext, LayoutError, LayoutStrategy, NodeGlyph,
};
use crate::app::view_mode::ViewMode;
use crate::core::{AnchorMap, AnchorPosition, AnchorSlot};
use crate::shared::geometry;

/// Layout der Hive-Ansicht.
#[derive(Debug, Clone, Copy, Default)]
pub struct HiveLayout;

impl HiveLayout {
    /// Ursprung und Halbachsen des Fächers.
    fn frame(ctx: &LayoutContext<'_>) -> (Vec2, Vec2) {
        let margin = ctx.options.hive_margin_x;
        let origin = Vec2::new(margin, ctx.canvas.height() - ctx.options.hive_margin_bottom);
        let extent = Vec2::new(
            ctx.canvas.width() - 2.0 * margin,
            ctx.canvas.height() - 2.0 * margin,
        );
        (origin, extent.max(Vec2::ZERO))
    }
}

impl LayoutStrategy for HiveLayout {
    fn mode(&self) -> ViewMode {
        ViewMode::Hive
    }

    fn compute_positions(&self, ctx: &LayoutContext<'_>) -> AnchorMap {
        let mut anchors = AnchorMap::new();
        let (origin, extent) = Self::frame(ctx);
        let count = ctx.model.devices.len();
        let inc = FRAC_PI_2 / count.saturating_sub(1).max(1) as f32;

        for (index, device) in ctx.model.devices.values().enumerate() {
            let angle = -(index as f32) * inc;
            let spoke = Vec2::new(extent.x * angle.cos(), extent.y * angle.sin());
            anchors.insert(
                device.id.clone(),
                AnchorSlot::Free,
                AnchorPosition::directed(origin + spoke, spoke.normalize_or_zero()),
            );

            let signals = device.signals.len();
            for (k, signal) in device.signals.values().enumerate() {
                let fraction = (k + 1) as f32 / signals as f32;
                anchors.insert(
                    signal.id.clone(),
                    AnchorSlot::Free,
                    AnchorPosition::at(origin + spoke * fraction),
                );
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
            return Err(LayoutError::InvalidMap(edge.id().clone(), "Link im Hive".into()));
        };
        let (origin, _) = Self::frame(ctx);
        let bow = ctx.options.hive_bow;
        free_edge(ctx, anchors, map, |from, to| {
            let mid = (from.position + to.position) * 0.5;
            let control = origin + (mid - origin) * bow;
            geometry::smooth_curve(from.position, control, to.position)
        })
    }

    /// Speichen der Devices und Kreise der Signale.
    fn node_glyphs(&self, ctx: &LayoutContext<'_>, anchors: &AnchorMap) -> Vec<NodeGlyph> {
        let (origin, _) = Self::frame(ctx);
        let radius = ctx.options.signal_glyph_radius;
        anchors
            .in_slot(AnchorSlot::Free)
            .filter(|(id, _)| !ctx.model.is_hidden(id))
            .map(|(id, anchor)| {
                let (path, filled) = if id.is_signal() {
                    (geometry::circle(anchor.position, radius), true)
                } else {
                    (geometry::line(origin, anchor.position), false)
                };
                NodeGlyph {
                    id: id.clone(),
                    path,
                    filled,
                    label: None,
                }
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
    use crate::shared::ViewOptions;
    use approx::assert_relative_eq;

    fn three_devices() -> NetworkModel {
        let mut model = NetworkModel::new();
        for (name, port) in [("a", 1), ("b", 2), ("c", 3)] {
            model.add_device(
                Device::new(name, "h", port)
                    .with_signal("out", SignalDirection::Output)
                    .with_signal("in", SignalDirection::Input),
            );
        }
        model
    }

    fn with_ctx<R>(model: &NetworkModel, f: impl FnOnce(&LayoutContext<'_>) -> R) -> R {
        let options = ViewOptions::default();
        let tables = Tables::new(24.0, 24.0);
        let focus = ListFocus::Overview;
        let canvas_placements = CanvasPlacements::default();
        let graph_placements = GraphPlacements::default();
        let ctx = LayoutContext {
            model,
            canvas: CanvasRect::sized(500.0, 500.0),
            tables: &tables,
            options: &options,
            focus: &focus,
            canvas_placements: &canvas_placements,
            graph_placements: &graph_placements,
        };
        f(&ctx)
    }

    #[test]
    fn spokes_split_a_quarter_circle() {
        let model = three_devices();
        let anchors = with_ctx(&model, |ctx| HiveLayout.compute_positions(ctx));
        let origin = Vec2::new(50.0, 475.0);
        for (index, name) in ["a", "b", "c"].iter().enumerate() {
            let tip = anchors
                .get(&EntityId::new(*name), AnchorSlot::Free)
                .expect("Speiche erwartet")
                .position;
            let d = tip - origin;
            let expected = -(index as f32) * std::f32::consts::FRAC_PI_4;
            assert_relative_eq!(d.y.atan2(d.x), expected, epsilon = 1e-4);
        }
    }

    #[test]
    fn last_signal_sits_on_spoke_tip() {
        let model = three_devices();
        let anchors = with_ctx(&model, |ctx| HiveLayout.compute_positions(ctx));
        let tip = anchors
            .get(&EntityId::new("a"), AnchorSlot::Free)
            .map(|a| a.position);
        let last = anchors
            .get(&EntityId::new("a/in"), AnchorSlot::Free)
            .map(|a| a.position);
        assert_eq!(tip, last);
        let first = anchors
            .get(&EntityId::new("a/out"), AnchorSlot::Free)
            .map(|a| a.position.x);
        assert_eq!(first, Some(50.0 + 400.0 * 0.5));
    }

    #[test]
    fn edges_bow_toward_origin() {
        let model = three_devices();
        let map = Map::new(EntityId::new("a/out"), EntityId::new("c/in"));
        let geometry = with_ctx(&model, |ctx| {
            let anchors = HiveLayout.compute_positions(ctx);
            HiveLayout.compute_edge_path(ctx, &anchors, EdgeRef::Map(&map))
        })
        .expect("Kante erwartet");
        let origin = Vec2::new(50.0, 475.0);
        let mid = geometry.path.midpoint().expect("Mittelpunkt erwartet");
        let from = geometry.path.start_point().expect("Startpunkt erwartet");
        let to = geometry.path.current_point().expect("Endpunkt erwartet");
        let chord_mid = (from + to) * 0.5;
        assert!(mid.distance(origin) < chord_mid.distance(origin));
    }

    #[test]
    fn single_device_points_right() {
        let mut model = NetworkModel::new();
        model.add_device(Device::new("solo", "h", 1).with_signal("x", SignalDirection::Output));
        let anchors = with_ctx(&model, |ctx| HiveLayout.compute_positions(ctx));
        let tip = anchors
            .get(&EntityId::new("solo"), AnchorSlot::Free)
            .map(|a| a.position);
        assert_eq!(tip, Some(Vec2::new(450.0, 475.0)));
    }
}
