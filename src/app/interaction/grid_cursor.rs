//! Hover-Cursor der Matrix-Ansicht.

use glam::Vec2;

use crate::app::tables::Tables;
use crate::core::{EntityId, TableSide};
use crate::shared::{geometry, PathSpec};

/// Aktuell hervorgehobene Zeile (links) und Spalte (oben).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridCursor {
    hover: Option<(EntityId, EntityId)>,
}

/// Ergebnis einer Cursor-Aktualisierung.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorUpdate {
    /// Abzuschaltende Hervorhebungen
    pub unhighlight: Vec<(TableSide, EntityId)>,
    /// Neue Hervorhebungen
    pub highlight: Vec<(TableSide, EntityId)>,
    /// Neuer Cursor-Pfad; `None` entfernt ihn
    pub path: Option<PathSpec>,
}

impl GridCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(row, column)` unter dem Zeiger.
    pub fn hover(&self) -> Option<&(EntityId, EntityId)> {
        self.hover.as_ref()
    }

    /// Bestimmt Zeile und Spalte unter dem Zeiger und den Cursor-Pfad.
    pub fn update(&mut self, tables: &Tables, pointer: Vec2) -> CursorUpdate {
        let rows = tables.get(TableSide::Left);
        let columns = tables.get(TableSide::Top);
        let hit = rows
            .row_at(pointer.y)
            .zip(columns.row_at(pointer.x))
            .map(|(row, column)| (row.id.clone(), column.id.clone()));

        let Some((row, column)) = hit else {
            return self.clear();
        };
        let (Some(row_rect), Some(column_rect)) = (rows.row_pos(&row), columns.row_pos(&column))
        else {
            return self.clear();
        };

        let mut update = CursorUpdate {
            path: Some(geometry::grid_cursor(row_rect, column_rect)),
            ..Default::default()
        };
        if self.hover.as_ref() != Some(&(row.clone(), column.clone())) {
            if let Some((old_row, old_column)) = self.hover.take() {
                update.unhighlight = vec![(TableSide::Left, old_row), (TableSide::Top, old_column)];
            }
            update.highlight = vec![
                (TableSide::Left, row.clone()),
                (TableSide::Top, column.clone()),
            ];
            self.hover = Some((row, column));
        }
        update
    }

    /// Entfernt Cursor und Hervorhebung.
    pub fn clear(&mut self) -> CursorUpdate {
        CursorUpdate {
            unhighlight: self
                .hover
                .take()
                .map(|(row, column)| vec![(TableSide::Left, row), (TableSide::Top, column)])
                .unwrap_or_default(),
            highlight: Vec::new(),
            path: None,
        }
    }
}
