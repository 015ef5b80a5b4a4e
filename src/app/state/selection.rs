use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::{EdgeId, EntityId, TableSide};

/// Ein selektierbares Element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selectable {
    /// Zeile einer Tabelle
    Row { side: TableSide, id: EntityId },
    /// Gezeichnete Kante
    Edge(EdgeId),
}

/// Menge der aktuell sichtbaren Elemente (nach dem letzten Layout-Durchlauf).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleSet {
    pub rows: HashSet<(TableSide, EntityId)>,
    pub edges: HashSet<EdgeId>,
}

impl VisibleSet {
    pub fn contains(&self, item: &Selectable) -> bool {
        match item {
            Selectable::Row { side, id } => self.rows.contains(&(*side, id.clone())),
            Selectable::Edge(id) => self.edges.contains(id),
        }
    }
}

/// Selektierte Zeilen und Kanten.
///
/// Die Rohmenge wird unabhängig von der Sichtbarkeit gehalten; nach außen
/// sichtbar ist immer nur die Schnittmenge mit den aktuell sichtbaren Elementen.
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    /// Rohmenge (Arc für O(1)-Clone in Snapshots)
    items: Arc<IndexSet<Selectable>>,
    /// Zuletzt umgeschaltete Zeile je Tabelle (Anker für Bereichsselektion)
    last_row: Option<(TableSide, EntityId)>,
    changed: bool,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable Rohmenge (CoW: klont nur wenn nötig).
    #[inline]
    fn items_mut(&mut self) -> &mut IndexSet<Selectable> {
        Arc::make_mut(&mut self.items)
    }

    /// Selektiert ein Element; gibt `true` zurück, wenn es neu selektiert wurde.
    pub fn select(&mut self, item: Selectable) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items_mut().insert(item);
        self.changed = true;
        true
    }

    /// Hebt die Selektion eines Elements auf; gibt `true` zurück, wenn es selektiert war.
    pub fn deselect(&mut self, item: &Selectable) -> bool {
        if !self.items.contains(item) {
            return false;
        }
        self.items_mut().shift_remove(item);
        self.changed = true;
        true
    }

    /// Schaltet ein sichtbares Element um; unsichtbare werden ignoriert.
    ///
    /// Gibt den neuen Zustand zurück (`Some(true)` = selektiert).
    pub fn toggle(&mut self, item: Selectable, visible: &VisibleSet) -> Option<bool> {
        if !visible.contains(&item) {
            return None;
        }
        if let Selectable::Row { side, id } = &item {
            self.last_row = Some((*side, id.clone()));
        }
        if self.deselect(&item) {
            Some(false)
        } else {
            self.select(item);
            Some(true)
        }
    }

    /// Selektiert alle Zeilen zwischen der zuletzt umgeschalteten und `id`.
    ///
    /// `order` ist die sichtbare Zeilenfolge der Tabelle. Endpunkte sind
    /// ausgenommen; bereits selektierte Zeilen bleiben unverändert. `id` wird
    /// zum neuen Anker. Gibt die neu selektierten IDs zurück.
    pub fn select_range(
        &mut self,
        side: TableSide,
        id: &EntityId,
        order: &[EntityId],
    ) -> Vec<EntityId> {
        let Some((last_side, last_id)) = self.last_row.replace((side, id.clone())) else {
            return Vec::new();
        };
        if last_side != side {
            return Vec::new();
        }
        let (Some(a), Some(b)) = (
            order.iter().position(|o| o == &last_id),
            order.iter().position(|o| o == id),
        ) else {
            return Vec::new();
        };
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut added = Vec::new();
        for row_id in order.iter().take(hi).skip(lo + 1) {
            if self.select(Selectable::Row {
                side,
                id: row_id.clone(),
            }) {
                added.push(row_id.clone());
            }
        }
        added
    }

    /// Hebt jede Selektion auf und gibt die vorher selektierten Elemente zurück.
    pub fn deselect_all(&mut self) -> Vec<Selectable> {
        self.last_row = None;
        if self.items.is_empty() {
            return Vec::new();
        }
        let removed: Vec<Selectable> = self.items.iter().cloned().collect();
        self.items_mut().clear();
        self.changed = true;
        removed
    }

    /// Rohzustand eines Elements (unabhängig von Sichtbarkeit).
    pub fn is_selected(&self, item: &Selectable) -> bool {
        self.items.contains(item)
    }

    /// Ist die Kante selektiert?
    pub fn is_edge_selected(&self, id: &EdgeId) -> bool {
        self.items.contains(&Selectable::Edge(id.clone()))
    }

    /// Sichtbare Selektion: Rohmenge geschnitten mit den sichtbaren Elementen.
    pub fn selected(&self, visible: &VisibleSet) -> Vec<Selectable> {
        self.items
            .iter()
            .filter(|item| visible.contains(item))
            .cloned()
            .collect()
    }

    /// Sichtbar selektierte Kanten.
    pub fn selected_edges(&self, visible: &VisibleSet) -> Vec<EdgeId> {
        self.selected(visible)
            .into_iter()
            .filter_map(|item| match item {
                Selectable::Edge(id) => Some(id),
                Selectable::Row { .. } => None,
            })
            .collect()
    }

    /// Entfernt Elemente, deren Entität nicht mehr existiert.
    pub fn retain(&mut self, mut keep: impl FnMut(&Selectable) -> bool) {
        if self.items.iter().all(&mut keep) {
            return;
        }
        self.items_mut().retain(|item| keep(item));
        self.changed = true;
    }

    /// Liefert und löscht das Änderungs-Flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str) -> Selectable {
        Selectable::Row {
            side: TableSide::Left,
            id: EntityId::new(id),
        }
    }

    fn visible(ids: &[&str]) -> VisibleSet {
        VisibleSet {
            rows: ids
                .iter()
                .map(|id| (TableSide::Left, EntityId::new(*id)))
                .collect(),
            edges: HashSet::new(),
        }
    }

    #[test]
    fn toggle_ignores_invisible_rows() {
        let mut sel = SelectionModel::new();
        assert_eq!(sel.toggle(row("a"), &visible(&["b"])), None);
        assert_eq!(sel.toggle(row("b"), &visible(&["b"])), Some(true));
        assert_eq!(sel.toggle(row("b"), &visible(&["b"])), Some(false));
        assert!(sel.is_empty());
    }

    #[test]
    fn selected_is_subset_of_visible() {
        let mut sel = SelectionModel::new();
        sel.select(row("a"));
        sel.select(row("b"));
        assert_eq!(sel.selected(&visible(&["b"])), vec![row("b")]);
        // wieder sichtbar: Selektion bleibt erhalten
        assert_eq!(sel.selected(&visible(&["a", "b"])).len(), 2);
    }

    #[test]
    fn range_selects_rows_between() {
        let mut sel = SelectionModel::new();
        let order: Vec<EntityId> = ["a", "b", "c", "d"]
            .iter()
            .map(|s| EntityId::new(*s))
            .collect();
        let vis = visible(&["a", "b", "c", "d"]);
        sel.toggle(row("a"), &vis);
        let added = sel.select_range(TableSide::Left, &EntityId::new("d"), &order);
        assert_eq!(added, vec![EntityId::new("b"), EntityId::new("c")]);
        // der Klick selbst schaltet "d" anschließend um
        assert_eq!(sel.toggle(row("d"), &vis), Some(true));
        assert_eq!(sel.len(), 4);

        // "d" ist jetzt Anker: Bereich nach oben bis "b"
        sel.deselect(&row("c"));
        let added = sel.select_range(TableSide::Left, &EntityId::new("b"), &order);
        assert_eq!(added, vec![EntityId::new("c")]);
    }

    #[test]
    fn deselect_all_forgets_range_anchor() {
        let mut sel = SelectionModel::new();
        let order: Vec<EntityId> = ["a", "b", "c"].iter().map(|s| EntityId::new(*s)).collect();
        sel.toggle(row("a"), &visible(&["a", "b", "c"]));
        sel.deselect_all();
        assert!(sel
            .select_range(TableSide::Left, &EntityId::new("c"), &order)
            .is_empty());
    }

    #[test]
    fn deselect_all_reports_removed_items() {
        let mut sel = SelectionModel::new();
        sel.select(row("a"));
        sel.select(Selectable::Edge(EdgeId::new("e")));
        assert!(sel.take_changed());
        assert_eq!(sel.deselect_all().len(), 2);
        assert!(sel.take_changed());
        assert!(sel.deselect_all().is_empty());
        assert!(!sel.take_changed());
    }
}
