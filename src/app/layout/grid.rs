//! Matrix-Ansicht: Eingänge als Zeilen links, Ausgänge als Spalten oben.

use glam::Vec2;

use super::{EdgeGeometry, EdgeRef, LayoutContext, LayoutError, LayoutStrategy, NodeGlyph};
use crate::app::view_mode::ViewMode;
use crate::core::{AnchorMap, AnchorPosition, AnchorSlot, EntityId, TableSide};
use crate::shared::{geometry, PathSpec};

const ROWS: AnchorSlot = AnchorSlot::Table(TableSide::Left);
const COLUMNS: AnchorSlot = AnchorSlot::Table(TableSide::Top);

/// Layout der Matrix-Ansicht.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridLayout;

/// Geometrie-Art einer Grid-Kante.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GridShape {
    Forward,
    Reversed,
    Columns,
    Rows,
}

impl GridLayout {
    /// Ein Quell/Ziel-Paar; Vorrang: Spalte→Zeile, Zeile→Spalte, Spalte↔Spalte, Zeile↔Zeile.
    fn segment(
        ctx: &LayoutContext<'_>,
        src: &EntityId,
        dst: &EntityId,
    ) -> Result<(GridShape, PathSpec), LayoutError> {
        let rows = ctx.tables.get(TableSide::Left);
        let columns = ctx.tables.get(TableSide::Top);
        let (src_col, src_row) = (columns.row_pos(src), rows.row_pos(src));
        let (dst_col, dst_row) = (columns.row_pos(dst), rows.row_pos(dst));

        if let (Some(col), Some(row)) = (src_col, dst_row) {
            return Ok((GridShape::Forward, geometry::grid_forward_quad(col, row)));
        }
        if let (Some(row), Some(col)) = (src_row, dst_col) {
            return Ok((GridShape::Reversed, geometry::grid_reversed_quad(col, row)));
        }
        if let (Some(a), Some(b)) = (src_col, dst_col) {
            return Ok((
                GridShape::Columns,
                geometry::edge_hugging_curve(Vec2::new(a.cx(), 0.0), Vec2::new(b.cx(), 0.0)),
            ));
        }
        if let (Some(a), Some(b)) = (src_row, dst_row) {
            return Ok((
                GridShape::Rows,
                geometry::edge_hugging_curve(Vec2::new(0.0, a.cy()), Vec2::new(0.0, b.cy())),
            ));
        }
        let missing = if src_col.is_none() && src_row.is_none() { src } else { dst };
        Err(LayoutError::UnresolvedRow(missing.clone()))
    }
}

impl LayoutStrategy for GridLayout {
    fn mode(&self) -> ViewMode {
        ViewMode::Grid
    }

    fn compute_positions(&self, ctx: &LayoutContext<'_>) -> AnchorMap {
        let mut anchors = AnchorMap::new();
        for (side, slot, inward) in [
            (TableSide::Left, ROWS, Vec2::X),
            (TableSide::Top, COLUMNS, Vec2::Y),
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
        _anchors: &AnchorMap,
        edge: EdgeRef<'_>,
    ) -> Result<EdgeGeometry, LayoutError> {
        let sources = edge.sources();
        if sources.is_empty() {
            return Err(LayoutError::InvalidMap(edge.id().clone(), "keine Quellen".into()));
        }
        let mut path = PathSpec::new();
        let mut first_shape = None;
        for src in sources {
            let (shape, segment) = Self::segment(ctx, src, edge.destination())?;
            first_shape.get_or_insert(shape);
            path = path.append(segment);
        }
        Ok(match first_shape {
            Some(GridShape::Forward | GridShape::Reversed) => EdgeGeometry::filled(path),
            _ => EdgeGeometry::stroked(path),
        })
    }

    /// Device-Bänder über die volle Zeilen- bzw. Spaltenausdehnung.
    fn node_glyphs(&self, ctx: &LayoutContext<'_>, _anchors: &AnchorMap) -> Vec<NodeGlyph> {
        let mut glyphs = Vec::new();
        for side in [TableSide::Left, TableSide::Top] {
            let table = ctx.tables.get(side);
            for row in table.visible_rows().filter(|row| !row.id.is_signal()) {
                if let Some(rect) = table.row_pos(&row.id) {
                    glyphs.push(NodeGlyph {
                        id: row.id.clone(),
                        path: geometry::rect(rect),
                        filled: true,
                        label: None,
                    });
                }
            }
        }
        glyphs
    }

    fn keeps_hidden_edges(&self) -> bool {
        true
    }
}
