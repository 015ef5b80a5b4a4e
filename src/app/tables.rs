//! Tabellen um die Zeichenfläche: Inhalt, Reihenfolge, Scroll und Zeilen-Geometrie.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::view_mode::ViewMode;
use crate::core::{EntityId, NetworkModel, SignalDirection, TableSide};
use crate::shared::Rect;

/// Kopfzeile der linken Übersichtstabelle.
pub const OVERVIEW_LEFT_HEADERS: [&str; 4] = ["name", "outputs", "IP", "port"];
/// Kopfzeile der rechten Übersichtstabelle.
pub const OVERVIEW_RIGHT_HEADERS: [&str; 4] = ["name", "inputs", "IP", "port"];
/// Kopfzeile aller Signal-Tabellen.
pub const SIGNAL_HEADERS: [&str; 6] = ["name", "type", "length", "units", "min", "max"];

/// Eine Zeile (bzw. Spalte der oberen Tabelle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: EntityId,
    pub cells: Vec<String>,
    pub visible: bool,
}

impl TableRow {
    pub fn new(id: EntityId, cells: Vec<String>) -> Self {
        Self {
            id,
            cells,
            visible: true,
        }
    }
}

/// Fokus der Listen-Ansicht: Geräteübersicht oder ein einzelnes Device.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ListFocus {
    #[default]
    Overview,
    Device(EntityId),
}

impl ListFocus {
    pub fn is_overview(&self) -> bool {
        matches!(self, Self::Overview)
    }
}

/// Ausrichtung einer Tabelle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAxis {
    /// Einträge untereinander (links, rechts)
    Rows,
    /// Einträge nebeneinander (oben)
    Columns,
}

/// Eine Tabelle mit ihren Zeilen in Anzeige-Reihenfolge.
#[derive(Debug, Clone)]
pub struct RowTable {
    side: TableSide,
    axis: TableAxis,
    extent: f32,
    cross: f32,
    scroll: f32,
    headers: Vec<String>,
    rows: Vec<TableRow>,
    order: Option<Vec<EntityId>>,
}

impl RowTable {
    /// Erstellt eine leere Tabelle. `extent` ist Zeilenhöhe bzw. Spaltenbreite.
    pub fn new(side: TableSide, extent: f32) -> Self {
        let axis = match side {
            TableSide::Top => TableAxis::Columns,
            TableSide::Left | TableSide::Right => TableAxis::Rows,
        };
        Self {
            side,
            axis,
            extent,
            cross: 0.0,
            scroll: 0.0,
            headers: Vec::new(),
            rows: Vec::new(),
            order: None,
        }
    }

    pub fn side(&self) -> TableSide {
        self.side
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Ersetzt Kopfzeile und Zeilen. Eine externe Sortierung bleibt erhalten.
    ///
    /// Sichtbarkeits-Flags bereits bekannter Zeilen werden übernommen.
    pub fn set_content(&mut self, headers: Vec<String>, mut rows: Vec<TableRow>) {
        for row in &mut rows {
            if let Some(existing) = self.rows.iter().find(|r| r.id == row.id) {
                row.visible = existing.visible;
            }
        }
        self.headers = headers;
        self.rows = rows;
        self.apply_order();
    }

    /// Setzt eine externe Reihenfolge (z.B. nach Sortierung im Host).
    ///
    /// Nicht genannte Zeilen folgen in bisheriger Reihenfolge.
    pub fn set_order(&mut self, order: Vec<EntityId>) {
        self.order = Some(order);
        self.apply_order();
    }

    /// Setzt den Scroll-Versatz; gibt `true` zurück, wenn er sich geändert hat.
    pub fn set_scroll(&mut self, offset: f32) -> bool {
        let offset = offset.max(0.0);
        if (self.scroll - offset).abs() < f32::EPSILON {
            return false;
        }
        self.scroll = offset;
        true
    }

    /// Setzt die Ausdehnung quer zur Tabelle (Breite bzw. Höhe der Fläche).
    pub fn set_cross(&mut self, cross: f32) {
        self.cross = cross;
    }

    /// Setzt die Sichtbarkeit aller Zeilen über ein Prädikat.
    pub fn set_visibility(&mut self, mut visible: impl FnMut(&TableRow) -> bool) {
        for row in &mut self.rows {
            row.visible = visible(row);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sichtbare Zeilen in Anzeige-Reihenfolge.
    pub fn visible_rows(&self) -> impl Iterator<Item = &TableRow> {
        self.rows.iter().filter(|row| row.visible)
    }

    pub fn visible_ids(&self) -> Vec<EntityId> {
        self.visible_rows().map(|row| row.id.clone()).collect()
    }

    pub fn is_visible(&self, id: &EntityId) -> bool {
        self.visible_rows().any(|row| &row.id == id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.rows.iter().any(|row| &row.id == id)
    }

    /// Rechteck einer sichtbaren Zeile in Flächen-Koordinaten.
    pub fn row_pos(&self, id: &EntityId) -> Option<Rect> {
        let index = self.visible_rows().position(|row| &row.id == id)?;
        Some(self.rect_at_index(index))
    }

    /// Sichtbare Zeile unter der Koordinate entlang der Tabellenachse.
    pub fn row_at(&self, coord: f32) -> Option<&TableRow> {
        let shifted = coord + self.scroll;
        if shifted < 0.0 || self.extent <= 0.0 {
            return None;
        }
        let index = (shifted / self.extent).floor() as usize;
        self.visible_rows().nth(index)
    }

    /// Ankerpunkt einer sichtbaren Zeile am Rand zur Fläche.
    pub fn anchor_point(&self, id: &EntityId) -> Option<Vec2> {
        let rect = self.row_pos(id)?;
        Some(match self.side {
            TableSide::Left => Vec2::new(0.0, rect.cy()),
            TableSide::Right => Vec2::new(self.cross_edge(), rect.cy()),
            TableSide::Top => Vec2::new(rect.cx(), 0.0),
        })
    }

    /// x-Lage des Tabellenrands zur Fläche (nur links/rechts sinnvoll).
    pub fn cross_edge(&self) -> f32 {
        match self.side {
            TableSide::Right => self.cross,
            TableSide::Left | TableSide::Top => 0.0,
        }
    }

    fn rect_at_index(&self, index: usize) -> Rect {
        let offset = index as f32 * self.extent - self.scroll;
        match self.axis {
            TableAxis::Rows => Rect::new(0.0, offset, self.cross, self.extent),
            TableAxis::Columns => Rect::new(offset, 0.0, self.extent, self.cross),
        }
    }

    fn apply_order(&mut self) {
        let Some(order) = &self.order else {
            return;
        };
        let rank = |id: &EntityId| order.iter().position(|o| o == id).unwrap_or(usize::MAX);
        // stabil: ungenannte Zeilen behalten ihre relative Reihenfolge
        self.rows.sort_by_key(|row| rank(&row.id));
    }
}

/// Die drei Tabellen um die Zeichenfläche.
#[derive(Debug, Clone)]
pub struct Tables {
    pub left: RowTable,
    pub right: RowTable,
    pub top: RowTable,
}

impl Tables {
    pub fn new(row_height: f32, column_width: f32) -> Self {
        Self {
            left: RowTable::new(TableSide::Left, row_height),
            right: RowTable::new(TableSide::Right, row_height),
            top: RowTable::new(TableSide::Top, column_width),
        }
    }

    pub fn get(&self, side: TableSide) -> &RowTable {
        match side {
            TableSide::Left => &self.left,
            TableSide::Right => &self.right,
            TableSide::Top => &self.top,
        }
    }

    pub fn get_mut(&mut self, side: TableSide) -> &mut RowTable {
        match side {
            TableSide::Left => &mut self.left,
            TableSide::Right => &mut self.right,
            TableSide::Top => &mut self.top,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RowTable> {
        [&self.left, &self.right, &self.top].into_iter()
    }

    /// Seite, auf der eine Zeile sichtbar ist (links vor rechts vor oben).
    pub fn side_of(&self, id: &EntityId) -> Option<TableSide> {
        self.iter()
            .find(|table| table.is_visible(id))
            .map(RowTable::side)
    }
}

/// Kopfzeile und Zeilen einer Tabelle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableContent {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TableContent {
    fn with_headers(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Baut die Tabelleninhalte `[left, right, top]` für Modus und Fokus.
pub fn build_contents(
    mode: ViewMode,
    focus: &ListFocus,
    model: &NetworkModel,
) -> [(TableSide, TableContent); 3] {
    let mut left = TableContent::default();
    let mut right = TableContent::default();
    let mut top = TableContent::default();

    match mode {
        ViewMode::List => match focus {
            ListFocus::Overview => {
                left = TableContent::with_headers(&OVERVIEW_LEFT_HEADERS);
                right = TableContent::with_headers(&OVERVIEW_RIGHT_HEADERS);
                for dev in model.devices.values() {
                    if dev.num_outputs > 0 {
                        let cells = dev.cells(SignalDirection::Output);
                        left.rows.push(TableRow::new(dev.id.clone(), cells));
                    }
                    if dev.num_inputs > 0 {
                        let cells = dev.cells(SignalDirection::Input);
                        right.rows.push(TableRow::new(dev.id.clone(), cells));
                    }
                }
            }
            ListFocus::Device(device) => {
                left = TableContent::with_headers(&SIGNAL_HEADERS);
                right = TableContent::with_headers(&SIGNAL_HEADERS);
                let mut shown = vec![device.clone()];
                shown.extend(model.linked_devices(device));
                for dev_id in &shown {
                    let Some(dev) = model.find_device(dev_id) else {
                        continue;
                    };
                    for sig in dev.signals.values() {
                        let row = TableRow::new(sig.id.clone(), sig.cells());
                        match sig.direction {
                            SignalDirection::Output => left.rows.push(row),
                            SignalDirection::Input => right.rows.push(row),
                        }
                    }
                }
            }
        },
        ViewMode::Grid => {
            left = TableContent::with_headers(&["name"]);
            top = TableContent::with_headers(&["name"]);
            for dev in model.devices.values() {
                if dev.num_inputs > 0 {
                    left.rows.push(TableRow::new(dev.id.clone(), vec![dev.id.to_string()]));
                    left.rows.extend(
                        dev.signals_in(SignalDirection::Input)
                            .map(|sig| TableRow::new(sig.id.clone(), vec![sig.id.to_string()])),
                    );
                }
                if dev.num_outputs > 0 {
                    top.rows.push(TableRow::new(dev.id.clone(), vec![dev.id.to_string()]));
                    top.rows.extend(
                        dev.signals_in(SignalDirection::Output)
                            .map(|sig| TableRow::new(sig.id.clone(), vec![sig.id.to_string()])),
                    );
                }
            }
        }
        ViewMode::Canvas => {
            left = TableContent::with_headers(&SIGNAL_HEADERS);
            left.rows.extend(
                model
                    .signals()
                    .map(|sig| TableRow::new(sig.id.clone(), sig.cells())),
            );
        }
        ViewMode::Hive | ViewMode::Graph => {}
    }

    [
        (TableSide::Left, left),
        (TableSide::Right, right),
        (TableSide::Top, top),
    ]
}

/// Tabs der Listen-Ansicht: alle Devices, die an einem Link beteiligt sind.
pub fn focus_tabs(model: &NetworkModel) -> Vec<EntityId> {
    let mut tabs: Vec<EntityId> = Vec::new();
    for link in model.links.values() {
        for id in [&link.src, &link.dst] {
            if !tabs.contains(id) {
                tabs.push(id.clone());
            }
        }
    }
    tabs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Device, Link};
    use approx::assert_relative_eq;

    fn table_with(ids: &[&str]) -> RowTable {
        let mut table = RowTable::new(TableSide::Left, 24.0);
        table.set_cross(400.0);
        table.set_content(
            vec!["name".into()],
            ids.iter()
                .map(|id| TableRow::new(EntityId::new(*id), vec![id.to_string()]))
                .collect(),
        );
        table
    }

    #[test]
    fn row_pos_skips_hidden_rows() {
        let mut table = table_with(&["a", "b", "c"]);
        table.set_visibility(|row| row.id.as_str() != "a");
        let rect = table.row_pos(&EntityId::new("c")).expect("Zeile c sichtbar");
        assert_relative_eq!(rect.top, 24.0);
        assert_relative_eq!(rect.cy(), 36.0);
        assert!(table.row_pos(&EntityId::new("a")).is_none());
    }

    #[test]
    fn row_at_respects_scroll() {
        let mut table = table_with(&["a", "b", "c"]);
        assert_eq!(table.row_at(30.0).map(|r| r.id.as_str()), Some("b"));
        assert!(table.set_scroll(24.0));
        assert_eq!(table.row_at(30.0).map(|r| r.id.as_str()), Some("c"));
        assert!(table.row_at(80.0).is_none());
        assert!(table.row_at(-30.0).is_none());
    }

    #[test]
    fn external_order_survives_content_refresh() {
        let mut table = table_with(&["a", "b", "c"]);
        table.set_order(vec![EntityId::new("c"), EntityId::new("a")]);
        let ids: Vec<_> = table.rows().iter().map(|r| r.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        table.set_content(
            vec![],
            ["a", "b", "c", "d"]
                .iter()
                .map(|id| TableRow::new(EntityId::new(*id), vec![]))
                .collect(),
        );
        let ids: Vec<_> = table.rows().iter().map(|r| r.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn right_anchor_sits_on_canvas_edge() {
        let mut table = RowTable::new(TableSide::Right, 24.0);
        table.set_cross(400.0);
        table.set_content(vec![], vec![TableRow::new(EntityId::new("b"), vec![])]);
        assert_eq!(
            table.anchor_point(&EntityId::new("b")),
            Some(Vec2::new(400.0, 12.0))
        );
    }

    #[test]
    fn overview_contents_split_by_direction() {
        let mut model = NetworkModel::new();
        let mut a = Device::new("A", "h", 1);
        a.num_outputs = 2;
        let mut b = Device::new("B", "h", 2);
        b.num_inputs = 1;
        model.add_device(a);
        model.add_device(b);
        let [(_, left), (_, right), (_, top)] =
            build_contents(ViewMode::List, &ListFocus::Overview, &model);
        assert_eq!(left.headers, OVERVIEW_LEFT_HEADERS.to_vec());
        assert_eq!(left.rows.len(), 1);
        assert_eq!(left.rows[0].cells[1], "2");
        assert_eq!(right.rows[0].id, EntityId::new("B"));
        assert!(top.rows.is_empty());
    }

    #[test]
    fn tabs_list_linked_devices_once() {
        let mut model = NetworkModel::new();
        model.add_link(Link::new(EntityId::new("a"), EntityId::new("b")));
        model.add_link(Link::new(EntityId::new("b"), EntityId::new("c")));
        assert_eq!(
            focus_tabs(&model),
            vec![EntityId::new("a"), EntityId::new("b"), EntityId::new("c")]
        );
    }
}
