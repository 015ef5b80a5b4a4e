//! Tabellen-Filter: Suchtext pro Tabelle und "unverbundene anzeigen".

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use super::tables::{ListFocus, TableRow, Tables};
use super::view_mode::ViewMode;
use crate::core::{EntityId, NetworkModel, TableSide};

/// Kompilierter Suchtext einer Tabelle.
#[derive(Debug, Clone)]
struct SearchPattern {
    text: String,
    regex: Option<Regex>,
}

impl SearchPattern {
    fn new(text: &str) -> Self {
        // Ungültige Ausdrücke fallen auf Teilstring-Suche zurück
        let regex = RegexBuilder::new(text).case_insensitive(true).build().ok();
        if regex.is_none() {
            log::debug!("Suchtext ist kein gültiger Ausdruck, nutze Teilstring: {}", text);
        }
        Self {
            text: text.to_string(),
            regex,
        }
    }

    fn matches(&self, cells: &[String]) -> bool {
        if self.text.is_empty() {
            return true;
        }
        match &self.regex {
            Some(regex) => cells.iter().any(|cell| regex.is_match(cell)),
            None => {
                let needle = self.text.to_lowercase();
                cells.iter().any(|cell| cell.to_lowercase().contains(&needle))
            }
        }
    }
}

/// Sichtbarkeitsregeln der Tabellenzeilen.
#[derive(Debug, Clone)]
pub struct FilterModel {
    searches: HashMap<TableSide, SearchPattern>,
    show_unmapped: bool,
}

impl Default for FilterModel {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterModel {
    /// Ohne Suchtext, unverbundene Zeilen sichtbar.
    pub fn new() -> Self {
        Self {
            searches: HashMap::new(),
            show_unmapped: true,
        }
    }

    /// Setzt den Suchtext einer Tabelle; gibt `true` zurück, wenn er sich geändert hat.
    pub fn set_search(&mut self, side: TableSide, text: &str) -> bool {
        if self.search(side) == text {
            return false;
        }
        if text.is_empty() {
            self.searches.remove(&side);
        } else {
            self.searches.insert(side, SearchPattern::new(text));
        }
        true
    }

    pub fn search(&self, side: TableSide) -> &str {
        self.searches
            .get(&side)
            .map_or("", |pattern| pattern.text.as_str())
    }

    /// Setzt "unverbundene anzeigen"; gibt `true` zurück, wenn es sich geändert hat.
    pub fn set_show_unmapped(&mut self, show: bool) -> bool {
        let changed = self.show_unmapped != show;
        self.show_unmapped = show;
        changed
    }

    pub fn show_unmapped(&self) -> bool {
        self.show_unmapped
    }

    /// Prüft eine Zeile: `(unverbundene sichtbar || verbunden) && Suchtreffer`.
    pub fn is_row_visible(&self, side: TableSide, row: &TableRow, connected: bool) -> bool {
        let search_ok = self
            .searches
            .get(&side)
            .map_or(true, |pattern| pattern.matches(&row.cells));
        (self.show_unmapped || connected) && search_ok
    }

    /// Setzt die Sichtbarkeit aller Tabellenzeilen.
    pub fn apply(
        &self,
        tables: &mut Tables,
        model: &NetworkModel,
        mode: ViewMode,
        focus: &ListFocus,
    ) {
        let use_links = mode == ViewMode::List && focus.is_overview();
        for side in TableSide::ALL {
            tables.get_mut(side).set_visibility(|row| {
                let connected = is_connected(model, &row.id, use_links);
                self.is_row_visible(side, row, connected)
            });
        }
    }
}

/// Gibt `true` zurück, wenn die Entität an einer Kante der aktuellen Ansicht hängt.
///
/// In der Geräteübersicht zählen Links, sonst Maps. Device-Zeilen außerhalb
/// der Übersicht gelten als verbunden, wenn eines ihrer Signale es ist.
pub fn is_connected(model: &NetworkModel, id: &EntityId, use_links: bool) -> bool {
    if use_links {
        return model.is_linked(id);
    }
    if id.is_signal() {
        return model.is_mapped(id);
    }
    model
        .find_device(id)
        .map_or(false, |dev| dev.signals.keys().any(|sig| model.is_mapped(sig)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, cells: &[&str]) -> TableRow {
        TableRow::new(
            EntityId::new(id),
            cells.iter().map(|c| c.to_string()).collect(),
        )
    }

    #[test]
    fn search_is_case_insensitive_over_all_cells() {
        let mut filter = FilterModel::new();
        assert!(filter.set_search(TableSide::Right, "FREQ"));
        assert!(filter.is_row_visible(TableSide::Right, &row("b/freq", &["b/freq", "f"]), false));
        assert!(!filter.is_row_visible(TableSide::Right, &row("b/gain", &["b/gain", "f"]), false));
        assert!(filter.is_row_visible(TableSide::Left, &row("b/gain", &["b/gain"]), false));
    }

    #[test]
    fn invalid_regex_falls_back_to_substring() {
        let mut filter = FilterModel::new();
        filter.set_search(TableSide::Left, "a(");
        assert!(filter.is_row_visible(TableSide::Left, &row("x", &["dev/a(1)"]), true));
        assert!(!filter.is_row_visible(TableSide::Left, &row("x", &["dev/b"]), true));
    }

    #[test]
    fn hiding_unmapped_requires_connection() {
        let mut filter = FilterModel::new();
        assert!(filter.set_show_unmapped(false));
        assert!(!filter.set_show_unmapped(false));
        assert!(!filter.is_row_visible(TableSide::Left, &row("a/x", &["a/x"]), false));
        assert!(filter.is_row_visible(TableSide::Left, &row("a/x", &["a/x"]), true));
    }

    #[test]
    fn unchanged_search_reports_no_change() {
        let mut filter = FilterModel::new();
        assert!(!filter.set_search(TableSide::Left, ""));
        assert!(filter.set_search(TableSide::Left, "x"));
        assert!(!filter.set_search(TableSide::Left, "x"));
        assert_eq!(filter.search(TableSide::Left), "x");
    }
}
